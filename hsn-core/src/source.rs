//! Table sources: built-in, CSV file, or remote CSV
//!
//! All sources go through the same [`crate::TableBuilder`], so a table loaded from
//! any of them satisfies the same invariants.

use crate::builtin::builtin_table;
use crate::{ClassificationEntry, ClassificationTable, HsnError, Rate};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

pub const CODE_COLUMN: &str = "HSN_CD";
pub const DESCRIPTION_COLUMN: &str = "HSN_Description";
pub const RATE_COLUMN: &str = "Rate";

/// Where the classification table comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    Builtin,
    Csv(PathBuf),
    Remote(String),
}

impl TableSource {
    /// Interpret a source string: `builtin`, an http(s) URL, or a file path
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("builtin") {
            TableSource::Builtin
        } else if raw.starts_with("http://") || raw.starts_with("https://") {
            TableSource::Remote(raw.to_string())
        } else {
            TableSource::Csv(PathBuf::from(raw))
        }
    }

    /// Load a fresh table. Blocking for file and remote sources.
    pub fn load(&self) -> crate::Result<ClassificationTable> {
        match self {
            TableSource::Builtin => builtin_table(),
            TableSource::Csv(path) => load_csv_file(path),
            TableSource::Remote(url) => fetch_remote(url),
        }
    }
}

impl fmt::Display for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableSource::Builtin => write!(f, "builtin"),
            TableSource::Csv(path) => write!(f, "{}", path.display()),
            TableSource::Remote(url) => write!(f, "{}", url),
        }
    }
}

pub fn load_csv_file(path: &Path) -> crate::Result<ClassificationTable> {
    let file = std::fs::File::open(path)?;
    parse_csv(file)
}

/// Parse CSV with `HSN_CD`, `HSN_Description` and `Rate` header columns.
///
/// Codes are kept as text so leading zeros survive. Extra columns are
/// ignored.
pub fn parse_csv<R: Read>(reader: R) -> crate::Result<ClassificationTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == name)
            .ok_or_else(|| HsnError::MissingColumn(name.to_string()))
    };
    let code_idx = column(CODE_COLUMN)?;
    let description_idx = column(DESCRIPTION_COLUMN)?;
    let rate_idx = column(RATE_COLUMN)?;

    let mut builder = ClassificationTable::builder();
    for (i, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = i + 1;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let field = |idx: usize| record.get(idx).unwrap_or("");
        let rate: Rate = field(rate_idx).parse().map_err(|e| HsnError::InvalidEntry {
            row,
            reason: format!("{}", e),
        })?;

        builder.push_row(
            row,
            ClassificationEntry::new(field(code_idx), field(description_idx), rate),
        )?;
    }

    Ok(builder.build())
}

#[cfg(feature = "remote")]
fn fetch_remote(url: &str) -> crate::Result<ClassificationTable> {
    let resp = reqwest::blocking::get(url).map_err(|e| HsnError::Remote(e.to_string()))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(HsnError::Remote(format!("HTTP {} from {}", status, url)));
    }

    let body = resp.text().map_err(|e| HsnError::Remote(e.to_string()))?;
    parse_csv(body.as_bytes())
}

#[cfg(not(feature = "remote"))]
fn fetch_remote(url: &str) -> crate::Result<ClassificationTable> {
    Err(HsnError::Remote(format!(
        "cannot fetch {}: built without the remote feature",
        url
    )))
}
