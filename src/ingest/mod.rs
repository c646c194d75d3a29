//! Run-log discovery and event loading
//!
//! The pipeline writes one directory per run under a logs root, with the
//! run's events in `events.jsonl` (one JSON event per line). Loading is
//! lenient the way the rest of the crate is: blank and unparseable lines
//! are skipped with a warning rather than failing the whole run.

use crate::event::AgentEvent;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// File name of the per-run event log.
pub const EVENTS_FILE: &str = "events.jsonl";

/// Errors from run-log access.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Events file not found: {}", .0.display())]
    EventsNotFound(PathBuf),
}

/// Result type for ingest operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// List run ids under a logs root, newest first.
///
/// Run ids embed their start time, so reverse-lexicographic order is
/// newest-first. A missing logs root is an empty listing, not an error.
pub fn list_runs(logs_dir: &Path) -> IngestResult<Vec<String>> {
    if !logs_dir.exists() {
        return Ok(Vec::new());
    }
    let mut runs = Vec::new();
    for entry in std::fs::read_dir(logs_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            runs.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    runs.sort_by(|a, b| b.cmp(a));
    Ok(runs)
}

/// Path of a run's event log under a logs root.
pub fn run_events_path(logs_dir: &Path, run_id: &str) -> PathBuf {
    logs_dir.join(run_id).join(EVENTS_FILE)
}

/// Load a run's events from its `events.jsonl`.
pub fn read_run_events(logs_dir: &Path, run_id: &str) -> IngestResult<Vec<AgentEvent>> {
    let path = run_events_path(logs_dir, run_id);
    if !path.exists() {
        return Err(IngestError::EventsNotFound(path));
    }
    let raw = std::fs::read_to_string(&path)?;
    Ok(parse_events(&raw))
}

/// Parse JSONL event content, skipping lines that are blank or fail to
/// deserialize. Useful for callers that fetched the body themselves.
pub fn parse_events(raw: &str) -> Vec<AgentEvent> {
    let mut events = Vec::new();
    for (lineno, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<AgentEvent>(line) {
            Ok(event) => events.push(event),
            Err(err) => {
                warn!(line = lineno + 1, error = %err, "skipping malformed event line");
            }
        }
    }
    events
}
