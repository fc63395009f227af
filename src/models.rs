//! Data models for dirfetch.

/// One file to download: the absolute URL plus the local filename to write.
///
/// Created by the link extractor per qualifying anchor and consumed exactly
/// once by a fetch worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub url: String,
    pub filename: String,
}
