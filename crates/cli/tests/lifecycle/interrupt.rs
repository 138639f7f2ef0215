//! The binary end to end: environment config, lifecycle, Ctrl-C exit

use crate::common::DirwatchProcess;
use std::thread::sleep;
use std::time::Duration;
use tempfile::TempDir;

#[cfg(unix)]
#[test]
fn test_full_lifecycle_then_interrupt() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let folder = temp_dir.path().join("watched");
    let renamed = temp_dir.path().join("renamed");

    let process = DirwatchProcess::spawn(&folder, "1")?;
    sleep(Duration::from_millis(800));

    std::fs::create_dir(&folder)?;
    // Existence poll is one second
    sleep(Duration::from_millis(1800));

    std::fs::write(folder.join("content-banned-notes.txt"), b"x")?;
    sleep(Duration::from_millis(300));

    std::fs::rename(&folder, &renamed)?;
    sleep(Duration::from_millis(800));

    let output = process.interrupt(Duration::from_secs(10))?;
    let folder_str = folder.display().to_string();
    let renamed_str = renamed.display().to_string();

    assert!(output.success(), "exit code {}: {}", output.exit_code, output.stderr);
    assert_eq!(output.count(&["[INFO]", "Waiting for folder", folder_str.as_str()]), 2);
    assert_eq!(output.count(&["[INFO]", "File created:", "content-banned-notes.txt"]), 1);
    assert_eq!(
        output.count(&["[WARN]", "Folder renamed from", folder_str.as_str(), renamed_str.as_str()]),
        1
    );
    assert_eq!(output.count(&["[CRITICAL]", "monitoring terminated."]), 1);
    assert_eq!(output.count(&["[INFO]", "Monitoring terminated by user."]), 1);
    assert_eq!(output.count(&["Monitoring script terminated"]), 0);

    // The thread id lives in the line prefix, not in the message
    let created = output.count(&["[INFO] [Thread ID: ", "is created", folder_str.as_str()]);
    assert_eq!(created, 1);
    assert_eq!(output.count(&["is created with Thread ID"]), 0);

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_invalid_periodicity_falls_back() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let folder = temp_dir.path().join("watched");
    std::fs::create_dir(&folder)?;

    let process = DirwatchProcess::spawn(&folder, "often")?;
    sleep(Duration::from_millis(1000));

    let output = process.interrupt(Duration::from_secs(10))?;

    assert!(output.success(), "exit code {}: {}", output.exit_code, output.stderr);
    assert_eq!(output.count(&["[WARN]", "Invalid PERIODICITY value"]), 1);
    assert_eq!(output.count(&["[INFO]", "Monitoring folder"]), 1);

    Ok(())
}
