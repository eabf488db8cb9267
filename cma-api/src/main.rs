//! cma-api - read-side HTTP facade for the activities item store
//!
//! Serves the canonical JSON store to the site front end. Read-only: every
//! write to the store goes through cma-import.

use anyhow::Result;
use clap::Parser;
use cma_api::{build_router, AppState};
use cma_common::config::DataPaths;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "cma-api", about = "Chiang Mai activities read API")]
struct Cli {
    /// Data directory holding the item store
    /// (falls back to $CMA_DATA_DIR, the config file, then ./data)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Listen port
    #[arg(long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    info!("Starting cma-api v{}", env!("CARGO_PKG_VERSION"));

    let paths = DataPaths::resolve(cli.data_dir.as_deref());
    let store_path = paths.items_file();
    info!("Item store: {}", store_path.display());
    if !store_path.exists() {
        info!("Store file does not exist yet; serving an empty listing until an import runs");
    }

    let state = AppState::new(store_path);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", cli.port)).await?;
    info!("Listening on http://127.0.0.1:{}", cli.port);
    info!("Health check: http://127.0.0.1:{}/api/health", cli.port);

    axum::serve(listener, app).await?;

    Ok(())
}
