//! Billy CLI entry point.

use anyhow::Context as _;
use billy::error::ProvisionError;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "billy")]
#[command(about = "Personal assistant backend with a semantic memory store")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting Billy...");

    let config = billy::config::Config::load()
        .with_context(|| "failed to load configuration from environment")?;

    tracing::info!(
        collection = %config.collection_name,
        dimension = config.vector_size,
        metric = %config.vector_distance,
        mode = ?config.retrieval_mode,
        "Configuration loaded"
    );

    let state = billy::build_api_state(&config)?;

    // Startup provisioning. A schema mismatch is an operator error and
    // halts the process; an unreachable store is tolerated here because
    // every save/search re-checks provisioning anyway.
    match state.memory.store().provision().await {
        Ok(()) => tracing::info!("Memory collection ready"),
        Err(error @ ProvisionError::SchemaMismatch { .. }) => {
            return Err(anyhow::Error::new(error)
                .context("memory collection schema does not match configuration"));
        }
        Err(error) => {
            tracing::warn!(%error, "memory collection not ready yet, will retry per request");
        }
    }

    let server = billy::api::start_http_server(config.bind_addr, state);

    tokio::select! {
        result = server => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Billy stopped");
    Ok(())
}
