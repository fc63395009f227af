//! Command-line interface.

mod fetch;
mod progress;

use std::path::PathBuf;

use clap::Parser;

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "dirfetch")]
#[command(about = "Download every file linked from an HTML directory listing")]
#[command(version)]
pub struct Cli {
    /// URL of the directory listing page
    url: String,

    /// Folder to save downloaded files into
    #[arg(short, long, env = "DIRFETCH_OUTPUT_DIR", default_value = "downloads")]
    output_dir: PathBuf,

    /// Overwrite files that already exist locally
    #[arg(long, env = "DIRFETCH_OVERWRITE")]
    overwrite: bool,

    /// Download files in parallel instead of one at a time
    #[arg(short, long)]
    parallel: bool,

    /// Number of parallel download workers
    #[arg(short, long, default_value = "5")]
    workers: usize,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// User-Agent header override (default: a desktop browser)
    #[arg(long, env = "DIRFETCH_USER_AGENT")]
    user_agent: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings {
        base_url: cli.url,
        download_dir: cli.output_dir,
        allow_override: cli.overwrite,
        parallel: cli.parallel,
        workers: cli.workers,
        request_timeout: cli.timeout,
        user_agent: cli.user_agent,
    };

    fetch::cmd_fetch(&settings).await
}
