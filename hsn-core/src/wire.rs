//! JSON shapes shared by hsn-service and the CLI

use crate::{ClassificationEntry, QueryResult, Rate, SearchResult};
use serde::{Deserialize, Serialize};

/// One row as it appears on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryView {
    pub hsn_code: String,
    pub description: String,
    pub gst_rate: Rate,
}

impl From<&ClassificationEntry> for EntryView {
    fn from(entry: &ClassificationEntry) -> Self {
        Self {
            hsn_code: entry.code.clone(),
            description: entry.description.clone(),
            gst_rate: entry.rate,
        }
    }
}

/// Successful lookup body. Not-found has no body of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LookupResponse {
    ExactSearch {
        hsn_code: String,
        description: String,
        gst_rate: Rate,
    },
    PrefixSearch {
        prefix: String,
        total_found: usize,
        results: Vec<EntryView>,
    },
}

impl LookupResponse {
    /// `None` for [`QueryResult::NotFound`]
    pub fn from_result(result: &QueryResult) -> Option<Self> {
        match result {
            QueryResult::ExactMatch { entry } => Some(LookupResponse::ExactSearch {
                hsn_code: entry.code.clone(),
                description: entry.description.clone(),
                gst_rate: entry.rate,
            }),
            QueryResult::PrefixMatches {
                prefix,
                matches,
                total_found,
            } => Some(LookupResponse::PrefixSearch {
                prefix: prefix.clone(),
                total_found: *total_found,
                results: matches.iter().map(EntryView::from).collect(),
            }),
            QueryResult::NotFound => None,
        }
    }

    /// Rows to render, one for exact, many for prefix
    pub fn rows(&self) -> Vec<EntryView> {
        match self {
            LookupResponse::ExactSearch {
                hsn_code,
                description,
                gst_rate,
            } => vec![EntryView {
                hsn_code: hsn_code.clone(),
                description: description.clone(),
                gst_rate: *gst_rate,
            }],
            LookupResponse::PrefixSearch { results, .. } => results.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub term: String,
    pub total_found: usize,
    pub results: Vec<EntryView>,
}

impl From<&SearchResult> for SearchResponse {
    fn from(result: &SearchResult) -> Self {
        Self {
            term: result.term.clone(),
            total_found: result.total_found,
            results: result.matches.iter().map(EntryView::from).collect(),
        }
    }
}
