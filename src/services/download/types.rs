//! Download service types, events, and errors.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Configuration for a download run.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Folder downloaded files are written into.
    pub download_dir: PathBuf,
    /// Overwrite files that already exist locally.
    pub allow_override: bool,
    /// Run on a worker pool instead of one task at a time.
    pub parallel: bool,
    /// Worker pool size in parallel mode.
    pub workers: usize,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// User-Agent override.
    pub user_agent: Option<String>,
}

/// Terminal status of a single task. Every task reaches exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded,
    Skipped,
    Failed,
}

/// Events emitted by fetch workers during a run.
#[derive(Debug, Clone)]
pub enum DownloadEvent {
    /// Transfer starting; `total` is the probed content length, if known.
    Started {
        worker_id: usize,
        filename: String,
        total: Option<u64>,
    },
    /// Cumulative bytes written for the worker's current file.
    Progress { worker_id: usize, bytes: u64 },
    /// Destination already exists and overwriting is disallowed.
    Skipped { worker_id: usize, filename: String },
    /// Destination exists and is about to be replaced.
    Overwriting { worker_id: usize, filename: String },
    /// File fully written to disk.
    Completed { worker_id: usize, filename: String },
    /// Transfer or filesystem error; the task is terminal.
    Failed {
        worker_id: usize,
        filename: String,
        error: String,
    },
}

/// Result of a download run.
#[derive(Debug, Clone, Copy, Default)]
pub struct DownloadResult {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Errors that can occur while fetching a single file.
///
/// These are caught at the worker boundary and converted into a `Failed`
/// event; they never abort sibling tasks.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned HTTP {0}")]
    Status(StatusCode),

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}
