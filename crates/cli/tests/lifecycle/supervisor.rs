//! Supervisor-driven lifecycles, run in-process with captured logs

use crate::common::LogCapture;
use cli_lib::{PeriodSource, Settings, Supervisor};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

const POLL: Duration = Duration::from_millis(50);

fn supervisor_for(folder: &Path, period: Duration) -> Supervisor {
    let settings = Settings::from_lookup(|_| None).with_folder(Some(folder.to_path_buf()));
    Supervisor::new(Settings {
        period: PeriodSource::Fixed(period),
        ..settings
    })
    .with_poll_interval(POLL)
}

async fn pause(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test]
async fn test_waits_then_watches_new_folder() {
    let capture = LogCapture::new();
    let _guard = tracing::subscriber::set_default(capture.subscriber());

    let temp_dir = TempDir::new().unwrap();
    let folder = temp_dir.path().join("watched");
    let folder_str = folder.display().to_string();

    let task = tokio::spawn(supervisor_for(&folder, Duration::from_secs(60)).run());
    pause(200).await;

    assert_eq!(capture.count("INFO", &["Waiting for folder", folder_str.as_str()]), 1);
    assert_eq!(capture.count("INFO", &["Monitoring folder"]), 0);

    std::fs::create_dir(&folder).unwrap();
    pause(400).await;

    assert_eq!(capture.count("INFO", &["is created", folder_str.as_str()]), 1);
    assert_eq!(capture.count("INFO", &["Monitoring folder", folder_str.as_str()]), 1);

    task.abort();
}

#[tokio::test]
async fn test_marked_children_are_reported() {
    let capture = LogCapture::new();
    let _guard = tracing::subscriber::set_default(capture.subscriber());

    let temp_dir = TempDir::new().unwrap();
    let folder = temp_dir.path().join("watched");
    std::fs::create_dir(&folder).unwrap();

    let task = tokio::spawn(supervisor_for(&folder, Duration::from_secs(60)).run());
    pause(300).await;

    let banned = folder.join("content-banned-report.txt");
    let plain = folder.join("report.txt");
    std::fs::write(&banned, b"x").unwrap();
    std::fs::write(&plain, b"x").unwrap();
    pause(300).await;

    let banned_str = banned.display().to_string();
    let plain_str = plain.display().to_string();
    assert_eq!(capture.count("INFO", &["File created:", banned_str.as_str()]), 1);
    assert_eq!(capture.count("INFO", &[plain_str.as_str()]), 0);

    task.abort();
}

#[tokio::test]
async fn test_rename_restarts_wait_on_configured_path() {
    let capture = LogCapture::new();
    let _guard = tracing::subscriber::set_default(capture.subscriber());

    let temp_dir = TempDir::new().unwrap();
    let folder = temp_dir.path().join("watched");
    let renamed = temp_dir.path().join("renamed");
    let folder_str = folder.display().to_string();
    let renamed_str = renamed.display().to_string();
    std::fs::create_dir(&folder).unwrap();

    let task = tokio::spawn(supervisor_for(&folder, Duration::from_secs(60)).run());
    pause(300).await;

    std::fs::rename(&folder, &renamed).unwrap();
    pause(500).await;

    assert_eq!(
        capture.count(
            "WARN",
            &["Folder renamed from", folder_str.as_str(), renamed_str.as_str()]
        ),
        1
    );
    assert_eq!(capture.count("CRITICAL", &["monitoring terminated."]), 1);

    // The outer loop is back on the configured path, not the new one
    assert_eq!(capture.count("INFO", &["Waiting for folder", folder_str.as_str()]), 2);
    assert_eq!(capture.count("INFO", &["Waiting for folder", renamed_str.as_str()]), 0);

    // Recreating the configured folder starts a fresh session
    std::fs::create_dir(&folder).unwrap();
    pause(400).await;
    assert_eq!(capture.count("INFO", &["is created", folder_str.as_str()]), 2);

    task.abort();
}

#[tokio::test]
async fn test_delete_logs_termination_before_next_wait() {
    let capture = LogCapture::new();
    let _guard = tracing::subscriber::set_default(capture.subscriber());

    let temp_dir = TempDir::new().unwrap();
    let folder = temp_dir.path().join("watched");
    let folder_str = folder.display().to_string();
    std::fs::create_dir(&folder).unwrap();

    let period = Duration::from_millis(300);
    let task = tokio::spawn(supervisor_for(&folder, period).run());
    pause(200).await;

    std::fs::remove_dir(&folder).unwrap();
    // One period for the heartbeat to notice, plus slack
    tokio::time::sleep(period + Duration::from_millis(500)).await;

    let terminated =
        capture.matching("CRITICAL", &["monitoring terminated.", folder_str.as_str()]);
    let waits = capture.matching("INFO", &["Waiting for folder", folder_str.as_str()]);
    assert_eq!(terminated.len(), 1);
    assert_eq!(waits.len(), 2);
    assert!(terminated[0].0 < waits[1].0, "termination must precede the next wait");
    assert_eq!(capture.count("WARN", &["Folder renamed"]), 0);

    task.abort();
}
