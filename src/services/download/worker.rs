//! Fetch-and-persist worker: one task in, one terminal outcome out.

use std::path::Path;

use futures::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::types::{DownloadConfig, DownloadEvent, DownloadOutcome, FetchError};
use crate::http_client::HttpClient;
use crate::models::DownloadTask;

/// Download one file to its destination, reporting progress along the way.
///
/// If the destination exists and overwriting is disallowed, no network
/// request is made at all. Errors are converted into a `Failed` event here;
/// a partial file left behind by a mid-stream failure is an accepted
/// artifact (downloads are not resumable).
pub(crate) async fn fetch_task(
    client: &HttpClient,
    config: &DownloadConfig,
    task: &DownloadTask,
    worker_id: usize,
    events: &mpsc::Sender<DownloadEvent>,
) -> DownloadOutcome {
    let dest = config.download_dir.join(&task.filename);

    if dest.exists() {
        if !config.allow_override {
            let _ = events
                .send(DownloadEvent::Skipped {
                    worker_id,
                    filename: task.filename.clone(),
                })
                .await;
            return DownloadOutcome::Skipped;
        }

        let _ = events
            .send(DownloadEvent::Overwriting {
                worker_id,
                filename: task.filename.clone(),
            })
            .await;
    }

    let total = probe_length(client, &task.url).await;
    let _ = events
        .send(DownloadEvent::Started {
            worker_id,
            filename: task.filename.clone(),
            total,
        })
        .await;

    match transfer(client, task, &dest, worker_id, events).await {
        Ok(bytes) => {
            debug!("downloaded {} ({} bytes)", task.filename, bytes);
            let _ = events
                .send(DownloadEvent::Completed {
                    worker_id,
                    filename: task.filename.clone(),
                })
                .await;
            DownloadOutcome::Downloaded
        }
        Err(e) => {
            warn!("download of {} failed: {}", task.url, e);
            let _ = events
                .send(DownloadEvent::Failed {
                    worker_id,
                    filename: task.filename.clone(),
                    error: e.to_string(),
                })
                .await;
            DownloadOutcome::Failed
        }
    }
}

/// HEAD probe for the expected content length.
///
/// A failed probe degrades the progress display to byte-count-only; it
/// never blocks the download itself.
async fn probe_length(client: &HttpClient, url: &str) -> Option<u64> {
    match client.head(url).await {
        Ok(head) if head.is_success() => head.content_length(),
        Ok(head) => {
            debug!("length probe for {} returned HTTP {}", url, head.status);
            None
        }
        Err(e) => {
            debug!("length probe for {} failed: {}", url, e);
            None
        }
    }
}

/// Stream the response body to the destination file chunk by chunk.
async fn transfer(
    client: &HttpClient,
    task: &DownloadTask,
    dest: &Path,
    worker_id: usize,
    events: &mpsc::Sender<DownloadEvent>,
) -> Result<u64, FetchError> {
    let response = client.get(&task.url).await?;
    if !response.is_success() {
        return Err(FetchError::Status(response.status));
    }

    // Truncates any existing content when overwriting
    let mut file = fs::File::create(dest).await?;
    let mut stream = response.into_inner().bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
        let _ = events
            .send(DownloadEvent::Progress {
                worker_id,
                bytes: written,
            })
            .await;
    }

    file.flush().await?;
    Ok(written)
}
