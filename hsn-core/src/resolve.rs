//! Lookup resolution: exact, prefix, or not found

use crate::{ClassificationEntry, ClassificationTable};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_EXACT_LENGTH_THRESHOLD: usize = 4;
pub const DEFAULT_MAX_PREFIX_RESULTS: usize = 20;

/// A sanitized lookup query: one or more ASCII digits.
///
/// Only [`sanitize`] constructs it, so the resolver never sees an empty or
/// non-digit query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip every non-digit character from user input.
///
/// Returns `None` when no digits remain; callers show an idle state instead
/// of resolving.
pub fn sanitize(raw: &str) -> Option<Query> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        Some(Query(digits))
    }
}

/// How exact and prefix matching are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupPolicy {
    /// Exact match at any length, then prefix match at any length
    #[default]
    ExactFirst,
    /// Queries of exactly the threshold length are prefixes only; every
    /// other length is exact only
    LengthSplit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupOptions {
    /// Only consulted by [`LookupPolicy::LengthSplit`]
    pub exact_length_threshold: usize,
    pub max_prefix_results: usize,
    pub policy: LookupPolicy,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            exact_length_threshold: DEFAULT_EXACT_LENGTH_THRESHOLD,
            max_prefix_results: DEFAULT_MAX_PREFIX_RESULTS,
            policy: LookupPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    ExactMatch {
        entry: ClassificationEntry,
    },
    PrefixMatches {
        prefix: String,
        /// At most `max_prefix_results`, in table order
        matches: Vec<ClassificationEntry>,
        /// Untruncated count, always >= matches.len()
        total_found: usize,
    },
    NotFound,
}

/// Resolve a sanitized query against a table. Pure and deterministic.
pub fn resolve(
    query: &Query,
    table: &ClassificationTable,
    options: &LookupOptions,
) -> QueryResult {
    let (try_exact, try_prefix) = match options.policy {
        LookupPolicy::ExactFirst => (true, true),
        LookupPolicy::LengthSplit => {
            let is_prefix_length = query.as_str().len() == options.exact_length_threshold;
            (!is_prefix_length, is_prefix_length)
        }
    };

    if try_exact {
        if let Some(entry) = table.get(query.as_str()) {
            return QueryResult::ExactMatch {
                entry: entry.clone(),
            };
        }
    }

    if try_prefix {
        if let Some(result) = prefix_matches(query.as_str(), table, options.max_prefix_results) {
            return result;
        }
    }

    QueryResult::NotFound
}

fn prefix_matches(prefix: &str, table: &ClassificationTable, limit: usize) -> Option<QueryResult> {
    let mut matches = Vec::new();
    let mut total_found = 0usize;

    for entry in table.with_prefix(prefix) {
        total_found += 1;
        if matches.len() < limit {
            matches.push(entry.clone());
        }
    }

    if total_found == 0 {
        return None;
    }

    Some(QueryResult::PrefixMatches {
        prefix: prefix.to_string(),
        matches,
        total_found,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rate, TableBuilder};

    fn rate(s: &str) -> Rate {
        s.parse().unwrap()
    }

    fn q(raw: &str) -> Query {
        sanitize(raw).unwrap()
    }

    fn cereals() -> ClassificationTable {
        let mut builder = TableBuilder::new();
        let names = [
            "Wheat and meslin",
            "Rye",
            "Barley",
            "Oats",
            "Maize (corn)",
            "Rice",
            "Grain sorghum",
            "Buckwheat, millet and canary seed; other cereals",
        ];
        for (i, name) in names.iter().enumerate() {
            builder
                .push_parts(&format!("100{}", i + 1), name, rate("0"))
                .unwrap();
        }
        builder
            .push_parts("8409", "Parts for spark-ignition engines", rate("28"))
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(q("84-09").as_str(), "8409");
        assert_eq!(q(" 1001 ").as_str(), "1001");
        assert_eq!(q("HSN: 0101").as_str(), "0101");
        assert!(sanitize("").is_none());
        assert!(sanitize("abc-/").is_none());
        // Non-ASCII digits are stripped too
        assert!(sanitize("١٢٣").is_none());
    }

    #[test]
    fn test_exact_match() {
        let table = cereals();
        let result = resolve(&q("1001"), &table, &LookupOptions::default());
        match result {
            QueryResult::ExactMatch { entry } => {
                assert_eq!(entry.code, "1001");
                assert_eq!(entry.description, "Wheat and meslin");
                assert_eq!(entry.rate, Rate::ZERO);
            }
            other => panic!("expected exact match, got {:?}", other),
        }
    }

    #[test]
    fn test_every_entry_resolves_to_itself() {
        let table = cereals();
        let options = LookupOptions::default();
        for entry in table.iter() {
            let result = resolve(&q(&entry.code), &table, &options);
            assert_eq!(
                result,
                QueryResult::ExactMatch {
                    entry: entry.clone()
                }
            );
        }
    }

    #[test]
    fn test_prefix_returns_all_in_table_order() {
        let table = cereals();
        let result = resolve(&q("100"), &table, &LookupOptions::default());
        match result {
            QueryResult::PrefixMatches {
                prefix,
                matches,
                total_found,
            } => {
                assert_eq!(prefix, "100");
                assert_eq!(total_found, 8);
                let codes: Vec<_> = matches.iter().map(|e| e.code.as_str()).collect();
                assert_eq!(
                    codes,
                    vec!["1001", "1002", "1003", "1004", "1005", "1006", "1007", "1008"]
                );
            }
            other => panic!("expected prefix matches, got {:?}", other),
        }
    }

    #[test]
    fn test_not_found() {
        let table = cereals();
        let options = LookupOptions::default();
        assert_eq!(resolve(&q("9999"), &table, &options), QueryResult::NotFound);
        assert_eq!(resolve(&q("10010"), &table, &options), QueryResult::NotFound);
        assert_eq!(
            resolve(&q("1"), &ClassificationTable::default(), &options),
            QueryResult::NotFound
        );
    }

    #[test]
    fn test_prefix_truncates_but_counts_all() {
        let mut builder = TableBuilder::new();
        for i in 0..25 {
            builder
                .push_parts(&format!("01{:02}", i), "Live animals", rate("12"))
                .unwrap();
        }
        let table = builder.build();

        let result = resolve(&q("01"), &table, &LookupOptions::default());
        match result {
            QueryResult::PrefixMatches {
                matches,
                total_found,
                ..
            } => {
                assert_eq!(matches.len(), 20);
                assert_eq!(total_found, 25);
                assert_eq!(matches[0].code, "0100");
                assert_eq!(matches[19].code, "0119");
            }
            other => panic!("expected prefix matches, got {:?}", other),
        }
    }

    #[test]
    fn test_sanitized_input_resolves_exactly() {
        let table = cereals();
        let result = resolve(&q("84-09"), &table, &LookupOptions::default());
        assert!(matches!(result, QueryResult::ExactMatch { ref entry } if entry.code == "8409"));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let table = cereals();
        let options = LookupOptions::default();
        for raw in ["1001", "10", "9999"] {
            let query = q(raw);
            assert_eq!(
                resolve(&query, &table, &options),
                resolve(&query, &table, &options)
            );
        }
    }

    #[test]
    fn test_exact_beats_prefix_for_short_codes() {
        let mut builder = TableBuilder::new();
        builder.push_parts("84", "Machinery", rate("18")).unwrap();
        builder.push_parts("8471", "Computers", rate("18")).unwrap();
        let table = builder.build();

        let result = resolve(&q("84"), &table, &LookupOptions::default());
        assert!(matches!(result, QueryResult::ExactMatch { ref entry } if entry.code == "84"));
    }

    #[test]
    fn test_length_split_policy() {
        let mut builder = TableBuilder::new();
        builder.push_parts("8471", "Computers", rate("18")).unwrap();
        builder.push_parts("847130", "Laptops", rate("18")).unwrap();
        builder.push_parts("84", "Machinery", rate("18")).unwrap();
        let table = builder.build();
        let options = LookupOptions {
            policy: LookupPolicy::LengthSplit,
            ..LookupOptions::default()
        };

        // Threshold-length queries are prefix searches, even on an exact hit
        match resolve(&q("8471"), &table, &options) {
            QueryResult::PrefixMatches { total_found, .. } => assert_eq!(total_found, 2),
            other => panic!("expected prefix matches, got {:?}", other),
        }
        // Other lengths are exact only
        assert!(matches!(
            resolve(&q("847130"), &table, &options),
            QueryResult::ExactMatch { .. }
        ));
        assert_eq!(resolve(&q("847"), &table, &options), QueryResult::NotFound);
        assert!(matches!(
            resolve(&q("84"), &table, &options),
            QueryResult::ExactMatch { .. }
        ));
    }
}
