//! Multi-progress display for concurrent downloads.

use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tokio::sync::Mutex;

/// Manages a pool of progress bars, one slot per download worker, plus a
/// summary bar tracking the whole run.
///
/// Status lines printed through [`DownloadProgress::println`] go through the
/// underlying `MultiProgress`, so they are emitted atomically and never
/// interleave with the bars.
pub struct DownloadProgress {
    multi: MultiProgress,
    slots: Mutex<Vec<ProgressBar>>,
    summary_bar: ProgressBar,
}

impl DownloadProgress {
    /// Create a new display with one slot per worker.
    pub fn new(num_workers: usize, total_tasks: u64) -> Self {
        let multi = MultiProgress::new();

        // Summary bar at the top
        let summary_bar = multi.add(ProgressBar::new(total_tasks));
        summary_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
                .unwrap()
                .progress_chars("█▓░"),
        );
        summary_bar.set_message("Downloading");

        let mut slots = Vec::with_capacity(num_workers);
        for _ in 0..num_workers {
            let bar = multi.add(ProgressBar::new(0));
            bar.set_style(idle_style());
            bar.set_message("idle");
            slots.push(bar);
        }

        Self {
            multi,
            slots: Mutex::new(slots),
            summary_bar,
        }
    }

    /// Begin showing progress for a file on the worker's slot.
    pub async fn start_download(&self, worker_id: usize, filename: &str, total_bytes: Option<u64>) {
        let slots = self.slots.lock().await;
        let Some(bar) = slots.get(worker_id) else {
            return;
        };

        bar.set_length(total_bytes.unwrap_or(0));
        bar.set_position(0);
        bar.set_message(truncate_filename(filename, 35));

        if total_bytes.is_none() {
            // Unknown size - byte count and rate only
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("  {spinner:.cyan} {wide_msg} {bytes} {binary_bytes_per_sec}")
                    .unwrap(),
            );
        } else {
            bar.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "  {spinner:.cyan} {wide_msg} [{bar:25.cyan/blue}] {bytes}/{total_bytes} {binary_bytes_per_sec}",
                    )
                    .unwrap()
                    .progress_chars("━╸─"),
            );
        }

        bar.enable_steady_tick(Duration::from_millis(100));
    }

    /// Update the byte position of a worker's current file.
    pub async fn update_progress(&self, worker_id: usize, bytes: u64) {
        let slots = self.slots.lock().await;
        if let Some(bar) = slots.get(worker_id) {
            bar.set_position(bytes);
        }
    }

    /// Clear a worker's slot once its file reached a terminal state.
    pub async fn finish_download(&self, worker_id: usize) {
        let slots = self.slots.lock().await;
        if let Some(bar) = slots.get(worker_id) {
            bar.disable_steady_tick();
            bar.set_style(idle_style());
            bar.set_message("idle");
            bar.set_length(0);
            bar.set_position(0);
        }

        self.summary_bar.inc(1);
    }

    /// Advance the summary bar for a task that never occupied a slot.
    pub fn bump(&self) {
        self.summary_bar.inc(1);
    }

    /// Update the summary message.
    pub fn set_summary(&self, downloaded: usize, skipped: usize, failed: usize) {
        self.summary_bar.set_message(format!(
            "Downloaded: {} | Skipped: {} | Failed: {}",
            downloaded, skipped, failed
        ));
    }

    /// Finish all progress bars and clear the display.
    pub async fn finish(&self) {
        let slots = self.slots.lock().await;
        for bar in slots.iter() {
            bar.finish_and_clear();
        }
        self.summary_bar.finish_and_clear();
    }

    /// Print a message that coordinates with the progress display.
    /// This prevents the message from corrupting the progress bars.
    pub fn println(&self, message: &str) {
        let _ = self.multi.println(message);
    }
}

fn idle_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("  {spinner:.dim} {wide_msg}")
        .unwrap()
        .progress_chars("━╸─")
}

/// Truncate a filename for display, keeping the extension visible.
fn truncate_filename(name: &str, max_len: usize) -> String {
    if name.len() <= max_len {
        return name.to_string();
    }

    // Try to keep the extension
    if let Some(dot_pos) = name.rfind('.') {
        let ext = &name[dot_pos..];
        if ext.len() < max_len - 4 {
            let prefix_len = max_len - ext.len() - 3;
            return format!("{}...{}", &name[..prefix_len], ext);
        }
    }

    // Just truncate
    format!("{}...", &name[..max_len - 3])
}
