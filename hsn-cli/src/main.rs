//! HSN CLI - look up HSN codes and their GST rates

#[cfg(feature = "service")]
mod client;
mod output;

use clap::{Parser, Subcommand};
use hsn_core::{
    resolve, sanitize, ClassificationTable, Config, ErrorEnvelope, HsnError, LookupResponse,
    Query, RateBucket, SearchResponse, TableSource,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hsn")]
#[command(about = "HSN code and GST rate lookup", long_about = None)]
struct Cli {
    /// Config file (default: ./hsn.toml if present)
    #[arg(long, global = true, env = "HSN_CONFIG")]
    config: Option<PathBuf>,

    /// Table source: "builtin", a CSV path, or a URL (overrides config)
    #[arg(long, global = true)]
    table: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Service URL for remote lookups (e.g., http://localhost:8080)
    #[arg(long, global = true, env = "HSN_SERVICE_URL")]
    service_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up an HSN code, exactly or by prefix
    Lookup {
        /// HSN code or prefix; non-digits are ignored (e.g., "84-09")
        code: String,
    },

    /// Search codes and descriptions by text
    Search {
        /// Text to look for (case-insensitive)
        term: String,

        /// Maximum results (default from config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List every entry in the table
    Table,

    /// Write a default hsn.toml
    Init {
        /// Where to write the config
        #[arg(default_value = hsn_core::config::DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Lookup { code } => cmd_lookup(&cli, code),
        Commands::Search { term, limit } => cmd_search(&cli, term, *limit),
        Commands::Table => cmd_table(&cli),
        Commands::Init { path } => cmd_init(path),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            if cli.json {
                let envelope = match &e {
                    HsnError::ServiceError {
                        code,
                        message,
                        hint,
                    } => ErrorEnvelope::new(code.as_str(), message.as_str(), hint.as_str()),
                    _ => ErrorEnvelope::new("error", e.to_string(), ""),
                };
                match serde_json::to_string_pretty(&envelope) {
                    Ok(text) => eprintln!("{}", text),
                    Err(_) => eprintln!("Error: {}", e),
                }
            } else {
                eprintln!("Error: {}", e);
            }
            std::process::exit(1);
        }
    }
}

fn load_config(cli: &Cli) -> hsn_core::Result<Config> {
    Config::discover(cli.config.as_deref())
}

fn load_table(cli: &Cli, config: &Config) -> hsn_core::Result<ClassificationTable> {
    let source = match &cli.table {
        Some(raw) => TableSource::parse(raw),
        None => config.table_source(),
    };
    source.load()
}

/// Resolve against a locally loaded table
fn lookup_local(
    table: &ClassificationTable,
    config: &Config,
    query: &Query,
) -> Option<LookupResponse> {
    let result = resolve(query, table, &config.lookup_options());
    LookupResponse::from_result(&result)
}

#[cfg(feature = "service")]
fn lookup_remote(service_url: &str, query: &Query) -> Option<LookupResponse> {
    let client = client::ServiceClient::new(service_url);
    match client.lookup(query) {
        Ok(response) => response,
        Err(e) => {
            // Transport failures show the same empty state as a miss
            eprintln!("Warning: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "service"))]
fn lookup_remote(_service_url: &str, _query: &Query) -> Option<LookupResponse> {
    eprintln!("Warning: built without service support, --service-url ignored");
    None
}

/// Returns Ok(false) when nothing was found
fn cmd_lookup(cli: &Cli, raw: &str) -> hsn_core::Result<bool> {
    use colored::Colorize;

    let Some(query) = sanitize(raw) else {
        return Err(HsnError::EmptyQuery(raw.to_string()));
    };

    let response = match &cli.service_url {
        Some(url) => lookup_remote(url, &query),
        None => {
            let config = load_config(cli)?;
            let table = load_table(cli, &config)?;
            lookup_local(&table, &config, &query)
        }
    };

    match response {
        Some(response) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                output::print_lookup(&response);
            }
            Ok(true)
        }
        None => {
            if cli.json {
                let envelope = ErrorEnvelope::not_found(query.as_str());
                println!("{}", serde_json::to_string_pretty(&envelope)?);
            } else {
                println!("{}", output::NO_DATA.yellow());
            }
            Ok(false)
        }
    }
}

fn cmd_search(cli: &Cli, term: &str, limit: Option<usize>) -> hsn_core::Result<bool> {
    let config = load_config(cli)?;
    let table = load_table(cli, &config)?;
    let limit = limit.unwrap_or(config.lookup.search_limit);

    let response = SearchResponse::from(&table.search(term, limit));
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        output::print_search(&response);
    }
    Ok(response.total_found > 0)
}

fn cmd_table(cli: &Cli) -> hsn_core::Result<bool> {
    let config = load_config(cli)?;
    let table = load_table(cli, &config)?;

    if cli.json {
        let rows: Vec<_> = table
            .iter()
            .map(|entry| {
                serde_json::json!({
                    "hsn_code": entry.code,
                    "description": entry.description,
                    "gst_rate": entry.rate,
                    "bucket": RateBucket::of(entry.rate),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for entry in table.iter() {
            println!("{}", output::format_row(&entry.into()));
        }
        println!("({} entries)", table.len());
    }
    Ok(true)
}

fn cmd_init(path: &std::path::Path) -> hsn_core::Result<bool> {
    use colored::Colorize;

    Config::init(path)?;
    println!("{} {}", "Created".green(), path.display());
    Ok(true)
}
