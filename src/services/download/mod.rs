//! File download service.
//!
//! Drains a task list either sequentially or with a fixed-size pool of
//! tokio workers. Workers emit `DownloadEvent`s for progress tracking;
//! rendering is left to the caller.

mod types;
mod worker;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::http_client::HttpClient;
use crate::models::DownloadTask;

pub use types::{DownloadConfig, DownloadEvent, DownloadOutcome, DownloadResult, FetchError};

/// Service that downloads a batch of tasks to the configured folder.
pub struct DownloadService {
    config: DownloadConfig,
}

impl DownloadService {
    /// Create a new download service.
    pub fn new(config: DownloadConfig) -> Self {
        Self { config }
    }

    /// Download every task, sequentially or on a fixed-size worker pool.
    ///
    /// Submission follows task order; completion order in parallel mode is
    /// whichever worker finishes first. A failed task never aborts its
    /// siblings, and every task reaches exactly one terminal outcome.
    pub async fn download(
        &self,
        tasks: Vec<DownloadTask>,
        event_tx: mpsc::Sender<DownloadEvent>,
    ) -> anyhow::Result<DownloadResult> {
        let downloaded = Arc::new(AtomicUsize::new(0));
        let skipped = Arc::new(AtomicUsize::new(0));
        let failed = Arc::new(AtomicUsize::new(0));

        if self.config.parallel {
            let queue: Arc<Mutex<VecDeque<DownloadTask>>> =
                Arc::new(Mutex::new(tasks.into_iter().collect()));
            let mut handles = Vec::with_capacity(self.config.workers);

            for worker_id in 0..self.config.workers {
                let config = self.config.clone();
                let queue = queue.clone();
                let events = event_tx.clone();
                let downloaded = downloaded.clone();
                let skipped = skipped.clone();
                let failed = failed.clone();

                handles.push(tokio::spawn(async move {
                    let client =
                        match HttpClient::new(config.request_timeout, config.user_agent.as_deref())
                        {
                            Ok(c) => c,
                            Err(e) => {
                                tracing::error!("failed to build HTTP client: {}", e);
                                return;
                            }
                        };

                    loop {
                        let task = queue.lock().await.pop_front();
                        let Some(task) = task else { break };

                        let outcome =
                            worker::fetch_task(&client, &config, &task, worker_id, &events).await;
                        record(outcome, &downloaded, &skipped, &failed);
                    }
                }));
            }

            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::error!("download worker panicked: {}", e);
                }
            }
        } else {
            let client =
                HttpClient::new(self.config.request_timeout, self.config.user_agent.as_deref())?;

            for task in &tasks {
                let outcome = worker::fetch_task(&client, &self.config, task, 0, &event_tx).await;
                record(outcome, &downloaded, &skipped, &failed);
            }
        }

        Ok(DownloadResult {
            downloaded: downloaded.load(Ordering::Relaxed),
            skipped: skipped.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
        })
    }
}

fn record(
    outcome: DownloadOutcome,
    downloaded: &AtomicUsize,
    skipped: &AtomicUsize,
    failed: &AtomicUsize,
) {
    match outcome {
        DownloadOutcome::Downloaded => downloaded.fetch_add(1, Ordering::Relaxed),
        DownloadOutcome::Skipped => skipped.fetch_add(1, Ordering::Relaxed),
        DownloadOutcome::Failed => failed.fetch_add(1, Ordering::Relaxed),
    };
}
