//! Error types for hsn operations

use serde::Serialize;
use std::path::PathBuf;

/// Structured error payload shared between service and client.
///
/// Used as the HTTP error body in hsn-service and parsed from service
/// responses in the CLI.
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    pub hint: String,
}

impl ErrorEnvelope {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn not_found(code: &str) -> Self {
        Self::new(
            "not_found",
            format!("No data found for HSN code {}", code),
            "Try a shorter prefix such as the first two or four digits",
        )
    }

    pub fn invalid_query() -> Self {
        Self::new(
            "invalid_query",
            "hsn_code parameter is required and must contain digits",
            "Pass a numeric HSN code, e.g. ?hsn_code=8471",
        )
    }

    pub fn internal(msg: &str) -> Self {
        Self::new("internal_error", msg, "Check service logs for details")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HsnError {
    #[error("No digits in query {0:?}")]
    EmptyQuery(String),

    #[error("Invalid entry at row {row}: {reason}")]
    InvalidEntry { row: usize, reason: String },

    #[error("Duplicate HSN code {code} at row {row}")]
    DuplicateCode { code: String, row: usize },

    #[error("Invalid rate: {0}")]
    InvalidRate(String),

    #[error("Missing column {0} in table header")]
    MissingColumn(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config already exists at {}", .0.display())]
    ConfigExists(PathBuf),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Remote table fetch failed: {0}")]
    Remote(String),

    #[error("Service error [{code}]: {message} ({hint})")]
    ServiceError {
        code: String,
        message: String,
        hint: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
