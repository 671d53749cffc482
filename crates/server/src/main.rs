//! playlens HTTP server binary.
//!
//! Loads the dataset export once, builds the engines, and serves the
//! query and recommendation endpoints.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use data_loader::DatasetStore;
use server::{AnalyticsService, router};

/// Analytics and recommendation API over the platform usage export
#[derive(Parser)]
#[command(name = "playlens-server")]
struct Args {
    /// Path to the dataset export (CSV)
    #[arg(short, long, default_value = "data/interactions.csv")]
    data: PathBuf,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("Loading dataset from {}", args.data.display());
    let start = Instant::now();
    let store = Arc::new(
        DatasetStore::load_from_csv(&args.data).context("Failed to load dataset export")?,
    );
    info!("Dataset loaded in {:.2?}", start.elapsed());

    let service = AnalyticsService::new(store)
        .with_timeout(Duration::from_secs(args.timeout_secs));
    let app = router(service);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("Failed to bind {}", args.addr))?;
    info!("Listening on {}", args.addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
