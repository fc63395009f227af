//! dirfetch - directory listing downloader.
//!
//! Fetches an HTML index of files and downloads every linked file into a
//! local folder, sequentially or across a bounded worker pool.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dirfetch::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "dirfetch=info"
    } else {
        "dirfetch=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    cli::run().await
}
