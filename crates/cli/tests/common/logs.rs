//! In-memory log capture
//!
//! Installs the binary's own line format so assertions see exactly what an
//! operator would.

use cli_lib::logging::FolderLogFormat;
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscriber writing uncoloured lines into this capture
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .with_ansi(false)
            .event_format(FolderLogFormat)
            .with_writer(self.clone())
            .with_max_level(tracing::Level::INFO)
            .finish()
    }

    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.buf.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Lines tagged `[level]` containing every needle
    pub fn matching(&self, level: &str, needles: &[&str]) -> Vec<(usize, String)> {
        let tag = format!("[{}]", level);
        self.lines()
            .into_iter()
            .enumerate()
            .filter(|(_, line)| line.contains(&tag) && needles.iter().all(|n| line.contains(n)))
            .collect()
    }

    pub fn count(&self, level: &str, needles: &[&str]) -> usize {
        self.matching(level, needles).len()
    }
}

pub struct CaptureWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CaptureWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter {
            buf: Arc::clone(&self.buf),
        }
    }
}
