//! End-to-end download flow tests against a local mock HTTP server.

use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;
use url::Url;

use dirfetch::http_client::HttpClient;
use dirfetch::listing;
use dirfetch::models::DownloadTask;
use dirfetch::services::{DownloadConfig, DownloadEvent, DownloadService};

fn test_config(dir: &TempDir, allow_override: bool, parallel: bool) -> DownloadConfig {
    DownloadConfig {
        download_dir: dir.path().to_path_buf(),
        allow_override,
        parallel,
        workers: 3,
        request_timeout: Duration::from_secs(5),
        user_agent: None,
    }
}

/// Drain worker events in the background so senders never block, returning
/// the collected events once all senders are dropped.
fn spawn_event_drain() -> (
    mpsc::Sender<DownloadEvent>,
    tokio::task::JoinHandle<Vec<DownloadEvent>>,
) {
    let (tx, mut rx) = mpsc::channel(100);
    let handle = tokio::spawn(async move {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    });
    (tx, handle)
}

#[tokio::test]
async fn existing_file_is_skipped_without_content_request() {
    let mut server = mockito::Server::new_async().await;
    let get_mock = server
        .mock("GET", "/data.bin")
        .expect(0)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("data.bin"), b"already here").unwrap();

    let task = DownloadTask {
        url: format!("{}/data.bin", server.url()),
        filename: "data.bin".into(),
    };

    // Idempotent: both invocations skip without touching the network
    for _ in 0..2 {
        let (tx, handle) = spawn_event_drain();
        let service = DownloadService::new(test_config(&dir, false, false));
        let result = service.download(vec![task.clone()], tx).await.unwrap();
        let events = handle.await.unwrap();

        assert_eq!(result.skipped, 1);
        assert_eq!(result.downloaded, 0);
        assert_eq!(result.failed, 0);
        assert!(matches!(events[0], DownloadEvent::Skipped { .. }));
    }

    get_mock.assert_async().await;
    assert_eq!(
        std::fs::read(dir.path().join("data.bin")).unwrap(),
        b"already here"
    );
}

#[tokio::test]
async fn overwrite_replaces_existing_content() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/report.csv")
        .with_body("id,total\n1,2\n")
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("report.csv");
    std::fs::write(&dest, "x".repeat(4096)).unwrap();

    let task = DownloadTask {
        url: format!("{}/report.csv", server.url()),
        filename: "report.csv".into(),
    };

    let (tx, handle) = spawn_event_drain();
    let service = DownloadService::new(test_config(&dir, true, false));
    let result = service.download(vec![task], tx).await.unwrap();
    let events = handle.await.unwrap();

    assert_eq!(result.downloaded, 1);
    assert!(events
        .iter()
        .any(|e| matches!(e, DownloadEvent::Overwriting { .. })));

    // The old 4096-byte content is fully replaced, not partially rewritten
    assert_eq!(std::fs::read(&dest).unwrap(), b"id,total\n1,2\n");
}

#[tokio::test]
async fn failed_task_does_not_abort_siblings() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/a.txt")
        .with_body("alpha")
        .create_async()
        .await;
    server
        .mock("GET", "/missing.txt")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("GET", "/c.txt")
        .with_body("gamma")
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let tasks = ["a.txt", "missing.txt", "c.txt"]
        .iter()
        .map(|name| DownloadTask {
            url: format!("{}/{}", server.url(), name),
            filename: (*name).into(),
        })
        .collect();

    let (tx, handle) = spawn_event_drain();
    let service = DownloadService::new(test_config(&dir, false, true));
    let result = service.download(tasks, tx).await.unwrap();
    let events = handle.await.unwrap();

    assert_eq!(result.downloaded, 2);
    assert_eq!(result.failed, 1);
    assert!(events.iter().any(
        |e| matches!(e, DownloadEvent::Failed { filename, .. } if filename == "missing.txt")
    ));

    assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"alpha");
    assert_eq!(std::fs::read(dir.path().join("c.txt")).unwrap(), b"gamma");
    // The 404 task never produced a file
    assert!(!dir.path().join("missing.txt").exists());
}

#[tokio::test]
async fn failed_length_probe_still_downloads() {
    // No HEAD mock is registered, so the probe gets an error status back
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/blob.bin")
        .with_body("payload")
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let task = DownloadTask {
        url: format!("{}/blob.bin", server.url()),
        filename: "blob.bin".into(),
    };

    let (tx, handle) = spawn_event_drain();
    let service = DownloadService::new(test_config(&dir, false, false));
    let result = service.download(vec![task], tx).await.unwrap();
    let events = handle.await.unwrap();

    assert_eq!(result.downloaded, 1);
    assert!(events
        .iter()
        .any(|e| matches!(e, DownloadEvent::Started { total: None, .. })));
    assert_eq!(std::fs::read(dir.path().join("blob.bin")).unwrap(), b"payload");
}

#[tokio::test]
async fn length_probe_reports_expected_size() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("HEAD", "/sized.bin")
        .with_header("content-length", "11")
        .create_async()
        .await;
    server
        .mock("GET", "/sized.bin")
        .with_body("hello world")
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let task = DownloadTask {
        url: format!("{}/sized.bin", server.url()),
        filename: "sized.bin".into(),
    };

    let (tx, handle) = spawn_event_drain();
    let service = DownloadService::new(test_config(&dir, false, false));
    let result = service.download(vec![task], tx).await.unwrap();
    let events = handle.await.unwrap();

    assert_eq!(result.downloaded, 1);
    assert!(events
        .iter()
        .any(|e| matches!(e, DownloadEvent::Started { total: Some(11), .. })));
}

#[tokio::test]
async fn listing_page_drives_a_full_run() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/files/")
        .with_body(
            r#"<html><body>
            <a href="../">Parent</a>
            <a href="notes.txt">notes.txt</a>
            <a href="archive/">archive/</a>
            <a href="data.csv?download=1">data.csv</a>
            </body></html>"#,
        )
        .create_async()
        .await;
    server
        .mock("GET", "/files/notes.txt")
        .with_body("some notes")
        .create_async()
        .await;
    server
        .mock("GET", "/files/data.csv")
        .with_body("a,b\n1,2\n")
        .create_async()
        .await;

    let base_url = Url::parse(&format!("{}/files/", server.url())).unwrap();
    let client = HttpClient::new(Duration::from_secs(5), None).unwrap();
    let html = client.get_text(base_url.as_str()).await.unwrap();

    let tasks = listing::extract_tasks(&html, &base_url);
    let names: Vec<&str> = tasks.iter().map(|t| t.filename.as_str()).collect();
    assert_eq!(names, ["notes.txt", "data.csv"]);

    let dir = TempDir::new().unwrap();
    let (tx, handle) = spawn_event_drain();
    let service = DownloadService::new(test_config(&dir, false, true));
    let result = service.download(tasks, tx).await.unwrap();
    handle.await.unwrap();

    assert_eq!(result.downloaded, 2);
    assert_eq!(
        std::fs::read(dir.path().join("notes.txt")).unwrap(),
        b"some notes"
    );
    assert_eq!(
        std::fs::read(dir.path().join("data.csv")).unwrap(),
        b"a,b\n1,2\n"
    );
}
