//! Configuration for hsn lookups

use crate::resolve::{DEFAULT_EXACT_LENGTH_THRESHOLD, DEFAULT_MAX_PREFIX_RESULTS};
use crate::{HsnError, LookupOptions, LookupPolicy, TableSource};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up in the working directory when no config is given
pub const DEFAULT_CONFIG_FILE: &str = "hsn.toml";

/// Default configuration as TOML
pub const DEFAULT_CONFIG: &str = r#"# HSN Lookup Configuration

[lookup]
# Query length treated as a prefix under the "length_split" policy
exact_length_threshold = 4
# Maximum entries returned for a prefix search
max_prefix_results = 20
# "exact_first": exact match at any length, then prefix match
# "length_split": threshold-length queries are prefixes, all others exact
policy = "exact_first"
# Maximum entries returned for a description search
search_limit = 20

[table]
# "builtin", a CSV file path, or an http(s) URL serving CSV.
# CSV needs HSN_CD, HSN_Description and Rate columns.
source = "builtin"

[service]
bind = "127.0.0.1"
port = 8080
"#;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default = "default_exact_length_threshold")]
    pub exact_length_threshold: usize,
    #[serde(default = "default_max_prefix_results")]
    pub max_prefix_results: usize,
    #[serde(default)]
    pub policy: LookupPolicy,
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_source")]
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_exact_length_threshold() -> usize {
    DEFAULT_EXACT_LENGTH_THRESHOLD
}
fn default_max_prefix_results() -> usize {
    DEFAULT_MAX_PREFIX_RESULTS
}
fn default_search_limit() -> usize {
    20
}
fn default_source() -> String {
    "builtin".to_string()
}
fn default_bind() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            exact_length_threshold: default_exact_length_threshold(),
            max_prefix_results: default_max_prefix_results(),
            policy: LookupPolicy::default(),
            search_limit: default_search_limit(),
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load an explicit config, else `hsn.toml` in the working directory,
    /// else defaults
    pub fn discover(explicit: Option<&Path>) -> crate::Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    Self::load(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse and validate config from a TOML string
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| HsnError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config, refusing to overwrite
    pub fn init(path: &Path) -> crate::Result<()> {
        if path.exists() {
            return Err(HsnError::ConfigExists(path.to_path_buf()));
        }
        std::fs::write(path, DEFAULT_CONFIG)?;
        Ok(())
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.lookup.max_prefix_results == 0 {
            return Err(HsnError::ConfigParse(
                "lookup.max_prefix_results must be at least 1".to_string(),
            ));
        }
        if self.lookup.exact_length_threshold == 0 {
            return Err(HsnError::ConfigParse(
                "lookup.exact_length_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn lookup_options(&self) -> LookupOptions {
        LookupOptions {
            exact_length_threshold: self.lookup.exact_length_threshold,
            max_prefix_results: self.lookup.max_prefix_results,
            policy: self.lookup.policy,
        }
    }

    pub fn table_source(&self) -> TableSource {
        TableSource::parse(&self.table.source)
    }
}
