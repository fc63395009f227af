//! Link extraction from HTML directory listings.

use scraper::{Html, Selector};
use url::Url;

use crate::models::DownloadTask;
use crate::utils::sanitize_filename;

/// Extract download tasks from a directory listing page.
///
/// Collects every anchor's `href`, skips directory-like links (trailing
/// `/`), reduces each remaining href to its final path segment with query
/// string and fragment cut off, sanitizes it, and resolves the result
/// against `base_url`. Anchor order is preserved and duplicate filenames are
/// kept as-is; later tasks with the same name overwrite the same local path.
///
/// Pure function of its inputs; performs no I/O.
pub fn extract_tasks(html: &str, base_url: &Url) -> Vec<DownloadTask> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("a") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut tasks = Vec::new();

    for element in document.select(&selector) {
        let href = match element.value().attr("href") {
            Some(h) => h,
            None => continue,
        };

        // Parent directory links and subfolders
        if href.is_empty() || href.ends_with('/') {
            continue;
        }

        let filename = sanitize_filename(basename(href));
        if filename.is_empty() {
            continue;
        }

        let url = match base_url.join(&filename) {
            Ok(u) => u,
            Err(_) => continue,
        };

        tasks.push(DownloadTask {
            url: url.to_string(),
            filename,
        });
    }

    tasks
}

/// Final path segment of an href, with query string and fragment cut off.
fn basename(href: &str) -> &str {
    let path = href.split(['?', '#']).next().unwrap_or("");
    path.rsplit('/').next().unwrap_or("")
}
