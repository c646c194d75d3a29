//! Raw event model for multi-agent pipeline run logs
//!
//! One `AgentEvent` per line of a run's `events.jsonl`. Events are treated
//! as read-only input everywhere in this crate; derived views copy what
//! they need and never mutate the source sequence.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single timestamped record of agent activity.
///
/// Only the fields the reconstruction logic reads are modeled. `input` and
/// `output` are arbitrary JSON payloads; `parent_ids` is kept as a raw
/// value and validated as an array at use sites, so an unexpected shape
/// degrades to "no parents" rather than a deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEvent {
    /// Emitting agent or subsystem (e.g., "AgenticRetrieval", "Researcher 3")
    #[serde(default)]
    pub source: String,
    /// Kind of activity (e.g., "reasoning", "search_result")
    pub event_type: String,
    /// Emission time as written by the pipeline, kept verbatim
    #[serde(default)]
    pub timestamp: String,
    /// Payload handed to the agent, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    /// Payload produced by the agent, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    /// Explicit causal parents, as positional indices or id strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_ids: Option<Value>,
}

impl AgentEvent {
    /// Round number declared in `input.round`, when it is an integer >= 1.
    pub fn round_number(&self) -> Option<u32> {
        self.input
            .as_ref()?
            .get("round")?
            .as_u64()
            .filter(|&n| n >= 1)
            .and_then(|n| u32::try_from(n).ok())
    }

    /// Round number with the documented default of 1 for absent or
    /// malformed values.
    pub fn round(&self) -> u32 {
        self.round_number().unwrap_or(1)
    }

    /// Parent references as a slice; non-array shapes yield an empty slice.
    pub fn parents(&self) -> &[Value] {
        self.parent_ids
            .as_ref()
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Timestamp parsed to UTC, if it matches a known pipeline format.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

/// Parse a log timestamp.
///
/// The pipeline emits RFC 3339 in most paths and the Python logging format
/// (`2025-11-25 02:32:30,191`) in older runs; ISO timestamps without an
/// offset also appear and are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S,%3f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// An event paired with its position in the original sequence.
///
/// The positional tag is produced as a new derived record so the input
/// sequence itself stays untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedEvent {
    /// Zero-based position in the ingested sequence
    pub index: usize,
    /// Value copy of the source event
    pub event: AgentEvent,
}

impl IndexedEvent {
    pub fn new(index: usize, event: &AgentEvent) -> Self {
        Self {
            index,
            event: event.clone(),
        }
    }
}
