//! Run configuration.

use std::fs;
use std::path::PathBuf;

/// Immutable configuration for a single run, constructed once at startup
/// from CLI flags and environment variables.
#[derive(Debug, Clone)]
pub struct Settings {
    /// URL of the directory listing page.
    pub base_url: String,
    /// Folder downloaded files are written into.
    pub download_dir: PathBuf,
    /// Overwrite files that already exist locally.
    pub allow_override: bool,
    /// Run downloads on a worker pool instead of one at a time.
    pub parallel: bool,
    /// Worker pool size in parallel mode.
    pub workers: usize,
    /// Per-request timeout in seconds.
    pub request_timeout: u64,
    /// User-Agent override. `None` impersonates a desktop browser.
    pub user_agent: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            download_dir: PathBuf::from("downloads"),
            allow_override: false,
            parallel: false,
            workers: 5,
            request_timeout: 30,
            user_agent: None,
        }
    }
}

impl Settings {
    /// Create the download folder (including parents) if absent.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.download_dir).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create download directory '{}': {}",
                    self.download_dir.display(),
                    e
                ),
            )
        })
    }
}
