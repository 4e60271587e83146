//! HSN Core - classification code lookups
//!
//! This library holds the classification table, the lookup resolver that
//! turns a user-entered code into an exact, prefix or not-found result, and
//! the rate bucketing shared by every presentation surface.

pub mod bucket;
pub mod builtin;
pub mod config;
pub mod entry;
pub mod error;
pub mod resolve;
pub mod source;
pub mod table;
pub mod wire;

pub use bucket::RateBucket;
pub use config::Config;
pub use entry::{ClassificationEntry, Rate};
pub use error::{ErrorEnvelope, HsnError};
pub use resolve::{resolve, sanitize, LookupOptions, LookupPolicy, Query, QueryResult};
pub use source::TableSource;
pub use table::{ClassificationTable, SearchResult, TableBuilder};
pub use wire::{LookupResponse, SearchResponse};

/// Result type alias for hsn operations
pub type Result<T> = std::result::Result<T, HsnError>;
