//! Fetch command: orchestrates the index fetch, link extraction, and the
//! download run, rendering worker events to the console.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use console::style;
use tokio::sync::mpsc;
use url::Url;

use super::progress::DownloadProgress;
use crate::config::Settings;
use crate::http_client::HttpClient;
use crate::listing;
use crate::services::{DownloadConfig, DownloadEvent, DownloadService};

/// Download every file linked from the configured directory listing.
pub async fn cmd_fetch(settings: &Settings) -> anyhow::Result<()> {
    settings.ensure_directories()?;

    let base_url = Url::parse(&settings.base_url)
        .with_context(|| format!("invalid listing URL '{}'", settings.base_url))?;

    let mode = if settings.parallel {
        "PARALLEL"
    } else {
        "SEQUENTIAL"
    };
    println!("{} Running in {} mode", style("[INFO]").cyan(), mode);

    let timeout = Duration::from_secs(settings.request_timeout);
    let client = HttpClient::new(timeout, settings.user_agent.as_deref())?;

    // The index fetch is the one fatal network operation: without a listing
    // there is no task list to attempt.
    let html = client
        .get_text(base_url.as_str())
        .await
        .with_context(|| format!("failed to fetch directory listing {}", base_url))?;

    let tasks = listing::extract_tasks(&html, &base_url);
    if tasks.is_empty() {
        println!(
            "{} No downloadable files found in listing",
            style("[INFO]").cyan()
        );
        return Ok(());
    }

    let worker_slots = if settings.parallel { settings.workers } else { 1 };
    println!(
        "{} Found {} files in listing",
        style("[INFO]").cyan(),
        tasks.len()
    );

    let progress = Arc::new(DownloadProgress::new(worker_slots, tasks.len() as u64));

    // Event channel between the download workers and this UI layer
    let (event_tx, mut event_rx) = mpsc::channel::<DownloadEvent>(100);

    let progress_clone = progress.clone();
    let event_handler = tokio::spawn(async move {
        let mut downloaded = 0usize;
        let mut skipped = 0usize;
        let mut failed = 0usize;

        while let Some(event) = event_rx.recv().await {
            match event {
                DownloadEvent::Started {
                    worker_id,
                    filename,
                    total,
                } => {
                    progress_clone
                        .start_download(worker_id, &filename, total)
                        .await;
                }
                DownloadEvent::Progress { worker_id, bytes } => {
                    progress_clone.update_progress(worker_id, bytes).await;
                }
                DownloadEvent::Skipped { filename, .. } => {
                    skipped += 1;
                    progress_clone.println(&format!(
                        "{} {}: already exists.",
                        style("[SKIP]").yellow(),
                        filename
                    ));
                    progress_clone.set_summary(downloaded, skipped, failed);
                    progress_clone.bump();
                }
                DownloadEvent::Overwriting { filename, .. } => {
                    progress_clone.println(&format!(
                        "{} {}...",
                        style("[OVERWRITE]").magenta(),
                        filename
                    ));
                }
                DownloadEvent::Completed {
                    worker_id,
                    filename,
                } => {
                    downloaded += 1;
                    progress_clone.println(&format!(
                        "{} {}",
                        style("[DOWNLOAD COMPLETE]").green(),
                        filename
                    ));
                    progress_clone.set_summary(downloaded, skipped, failed);
                    progress_clone.finish_download(worker_id).await;
                }
                DownloadEvent::Failed {
                    worker_id,
                    filename,
                    error,
                } => {
                    failed += 1;
                    progress_clone.println(&format!(
                        "{} {}: {}",
                        style("[ERROR]").red(),
                        filename,
                        error
                    ));
                    progress_clone.set_summary(downloaded, skipped, failed);
                    progress_clone.finish_download(worker_id).await;
                }
            }
        }
    });

    let service = DownloadService::new(DownloadConfig {
        download_dir: settings.download_dir.clone(),
        allow_override: settings.allow_override,
        parallel: settings.parallel,
        workers: settings.workers,
        request_timeout: timeout,
        user_agent: settings.user_agent.clone(),
    });

    let result = service.download(tasks, event_tx).await?;

    if let Err(e) = event_handler.await {
        tracing::warn!("event handler task failed: {}", e);
    }
    progress.finish().await;

    println!(
        "{} Downloaded {} files",
        style("✓").green(),
        result.downloaded
    );
    if result.skipped > 0 {
        println!(
            "  {} {} skipped (already present)",
            style("→").dim(),
            result.skipped
        );
    }
    if result.failed > 0 {
        println!("  {} {} failed", style("!").yellow(), result.failed);
    }

    Ok(())
}
