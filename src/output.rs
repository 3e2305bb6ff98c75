use std::io::{self, Write};

use serde::Serialize;
use tracing::info;

use crate::app::{
    DetectResult, ProgressEvent, ProgressSink, ProgressStatus, ReadResult, VisibilityResult,
    WriteResult,
};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    /// Progress lines on stderr.
    Interactive,
    NonInteractive,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_detect(result: &DetectResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_read(result: &ReadResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_visibility(result: &VisibilityResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_write(result: &WriteResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

/// Forwards progress to the log; the JSON result stays alone on stdout.
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn event(&self, event: ProgressEvent) {
        let elapsed_ms = event.elapsed.map(|elapsed| elapsed.as_millis() as u64);
        match event.status {
            ProgressStatus::Reading | ProgressStatus::Skipped => {}
            _ => info!(status = ?event.status, elapsed_ms, "{}", event.message),
        }
    }
}

pub fn progress_sink(mode: OutputMode) -> &'static dyn ProgressSink {
    match mode {
        OutputMode::Interactive => &LogProgress,
        OutputMode::NonInteractive => &JsonOutput,
    }
}
