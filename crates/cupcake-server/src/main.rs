//! Cupcake Server - HTTP API for the cupcake store
//!
//! NOT FOR PRODUCTION USE: records live in memory and are checkpointed to a
//! single JSON file on every change.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cupcake_core::CupcakeStore;
use cupcake_server::{API_PREFIX, CupcakeServer, config::Config};

/// Cupcake Server CLI arguments
#[derive(Parser, Debug)]
#[command(name = "cupcake-server")]
#[command(about = "Cupcake REST API server", long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Record store backing file (overrides config file and environment)
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Directory holding server.toml
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "cupcake_server=debug,cupcake_core=debug,tower_http=debug".into()
        })
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "cupcake_server=info,cupcake_core=info,tower_http=info".into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rt = tokio::runtime::Builder::new_multi_thread()
        .thread_name("cupcake-worker")
        .enable_all()
        .build()?;

    rt.block_on(async_main(args))
}

async fn async_main(args: Args) -> anyhow::Result<()> {
    let mut config = Config::from_env(&args.config_dir);
    if let Some(data_file) = args.data_file {
        config = config.with_data_file(data_file);
    }

    if let Some(parent) = config
        .data_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)?;
    }

    let store = Arc::new(CupcakeStore::open(&config.data_file));
    info!(
        "Using cupcake data file {:?} ({} records)",
        config.data_file,
        store.len()
    );

    let app = cupcake_server::router(CupcakeServer::new(store));

    let listener = TcpListener::bind(config.http_addr()).await?;
    info!(
        "Http server is running at {} (API under {})",
        listener.local_addr()?,
        API_PREFIX
    );
    info!(
        "Https port {} is served by the TLS-terminating front end",
        config.https_port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
