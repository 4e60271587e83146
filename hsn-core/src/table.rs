//! The classification table and its builder

use crate::{ClassificationEntry, HsnError, Rate};
use serde::Serialize;
use std::collections::HashMap;

/// Ordered, immutable collection of classification entries.
///
/// Built once through [`TableBuilder`], which enforces that every code is a
/// non-empty digit string, every description is non-empty, and no code
/// repeats. A refreshed table replaces the old one whole; there is no
/// in-place mutation.
#[derive(Debug, Clone, Default)]
pub struct ClassificationTable {
    entries: Vec<ClassificationEntry>,
    by_code: HashMap<String, usize>,
}

/// Free-text search hits, in table order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub term: String,
    pub matches: Vec<ClassificationEntry>,
    /// Untruncated number of hits
    pub total_found: usize,
}

impl ClassificationTable {
    pub fn builder() -> TableBuilder {
        TableBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in table order
    pub fn iter(&self) -> impl Iterator<Item = &ClassificationEntry> {
        self.entries.iter()
    }

    /// Exact lookup by code
    pub fn get(&self, code: &str) -> Option<&ClassificationEntry> {
        self.by_code.get(code).map(|&idx| &self.entries[idx])
    }

    /// Entries whose code starts with `prefix`, in table order
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a ClassificationEntry> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry.code.starts_with(prefix))
    }

    /// Case-insensitive substring search over codes and descriptions.
    ///
    /// An empty (or all-whitespace) term matches every entry.
    pub fn search(&self, term: &str, limit: usize) -> SearchResult {
        let needle = term.trim().to_lowercase();
        let mut matches = Vec::new();
        let mut total_found = 0usize;

        for entry in &self.entries {
            let hit = needle.is_empty()
                || entry.code.contains(&needle)
                || entry.description.to_lowercase().contains(&needle);
            if !hit {
                continue;
            }
            total_found += 1;
            if matches.len() < limit {
                matches.push(entry.clone());
            }
        }

        SearchResult {
            term: term.trim().to_string(),
            matches,
            total_found,
        }
    }
}

/// Accumulates validated rows into a [`ClassificationTable`]
#[derive(Debug, Default)]
pub struct TableBuilder {
    entries: Vec<ClassificationEntry>,
    by_code: HashMap<String, usize>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row. Rows are numbered from 1 in error messages.
    pub fn push(&mut self, entry: ClassificationEntry) -> crate::Result<()> {
        let row = self.entries.len() + 1;
        self.push_row(row, entry)
    }

    /// Add a row, reporting errors against the caller's row number
    pub fn push_row(&mut self, row: usize, entry: ClassificationEntry) -> crate::Result<()> {
        let code = entry.code.trim();

        if code.is_empty() {
            return Err(HsnError::InvalidEntry {
                row,
                reason: "empty HSN code".to_string(),
            });
        }
        if !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(HsnError::InvalidEntry {
                row,
                reason: format!("HSN code {:?} contains non-digit characters", code),
            });
        }
        if entry.description.trim().is_empty() {
            return Err(HsnError::InvalidEntry {
                row,
                reason: format!("empty description for HSN code {}", code),
            });
        }
        if self.by_code.contains_key(code) {
            return Err(HsnError::DuplicateCode {
                code: code.to_string(),
                row,
            });
        }

        let entry = ClassificationEntry {
            code: code.to_string(),
            description: entry.description.trim().to_string(),
            rate: entry.rate,
        };
        self.by_code.insert(entry.code.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Convenience for pushing from raw parts
    pub fn push_parts(&mut self, code: &str, description: &str, rate: Rate) -> crate::Result<()> {
        self.push(ClassificationEntry::new(code, description, rate))
    }

    pub fn build(self) -> ClassificationTable {
        ClassificationTable {
            entries: self.entries,
            by_code: self.by_code,
        }
    }
}
