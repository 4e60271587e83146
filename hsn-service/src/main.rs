mod error;
mod metrics;
mod routes;
mod state;

use clap::Parser;
use hsn_core::{Config, TableSource};
use state::{AppState, SharedState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hsn-service")]
#[command(about = "HTTP service for HSN code and GST rate lookups", long_about = None)]
struct Args {
    /// Config file (default: ./hsn.toml if present)
    #[arg(long, env = "HSN_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind (overrides config)
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Load the table from a CSV file (overrides config)
    #[arg(long, conflicts_with = "table_url")]
    table: Option<PathBuf>,

    /// Fetch the table as CSV from a URL (overrides config)
    #[arg(long)]
    table_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hsn_service=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::discover(args.config.as_deref())?;

    let source = match (args.table, args.table_url) {
        (Some(path), _) => TableSource::Csv(path),
        (None, Some(url)) => TableSource::Remote(url),
        (None, None) => config.table_source(),
    };

    let load_source = source.clone();
    let table = tokio::task::spawn_blocking(move || load_source.load())
        .await?
        .map_err(|e| {
            tracing::error!(error = %e, source = %source, "failed to load classification table");
            e
        })?;
    info!(entries = table.len(), source = %source, "classification table loaded");

    let state: SharedState = Arc::new(AppState::new(
        table,
        source,
        config.lookup_options(),
        config.lookup.search_limit,
    ));
    let app = routes::router(state);

    let bind = args.bind.unwrap_or(config.service.bind);
    let port = args.port.unwrap_or(config.service.port);
    let addr = format!("{}:{}", bind, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "hsn-service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("hsn-service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
