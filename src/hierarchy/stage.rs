//! Derived workflow hierarchy: stages, rounds, and researcher groups

use crate::event::IndexedEvent;
use serde::{Deserialize, Serialize};

/// Top-level phase bucket inferred from an event's source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Retrieval/analysis iteration by the core research agents
    Research,
    /// Per-researcher community forecasting
    Community,
    /// Final output and everything not recognized as the other two
    Consensus,
}

impl StageKind {
    /// Stable stage identifier used by rendering consumers.
    pub fn id(&self) -> &'static str {
        match self {
            StageKind::Research => "research",
            StageKind::Community => "community",
            StageKind::Consensus => "consensus",
        }
    }

    /// Human-readable stage name.
    pub fn display_name(&self) -> &'static str {
        match self {
            StageKind::Research => "Research & Iteration",
            StageKind::Community => "Community Forecasting",
            StageKind::Consensus => "Final Output",
        }
    }
}

/// Phase of a research round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundKind {
    Retrieval,
    Analysis,
}

impl RoundKind {
    fn id_prefix(&self) -> &'static str {
        match self {
            RoundKind::Retrieval => "retrieval",
            RoundKind::Analysis => "analysis",
        }
    }

    fn display_prefix(&self) -> &'static str {
        match self {
            RoundKind::Retrieval => "Retrieval Round",
            RoundKind::Analysis => "Analysis Round",
        }
    }
}

/// Atomic grouping unit within the Research stage.
///
/// Rounds alternate between retrieval and analysis; two rounds may share a
/// `number` when the pipeline interleaves the phases, so `id` is unique only
/// together with position in the stage's round list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// `retrieval-<n>` or `analysis-<n>`
    pub id: String,
    pub kind: RoundKind,
    pub number: u32,
    /// Display name, e.g. "Retrieval Round 2"
    pub name: String,
    /// Events in assignment order (authoring order, never re-sorted)
    pub events: Vec<IndexedEvent>,
    /// Timestamp of the event that opened the round
    pub start_time: String,
    /// Timestamp of the last event assigned to the round
    pub end_time: String,
}

impl Round {
    /// Open a fresh round at the given event timestamp.
    pub(crate) fn open(kind: RoundKind, number: u32, timestamp: &str) -> Self {
        Self {
            id: format!("{}-{}", kind.id_prefix(), number),
            kind,
            number,
            name: format!("{} {}", kind.display_prefix(), number),
            events: Vec::new(),
            start_time: timestamp.to_string(),
            end_time: timestamp.to_string(),
        }
    }
}

/// Per-source bucket of events within the Community stage.
///
/// Groups appear in first-seen order; each group's events are sorted by
/// timestamp after the build pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearcherGroup {
    /// Raw `source` string of the member events
    pub name: String,
    pub events: Vec<IndexedEvent>,
}

impl ResearcherGroup {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            events: Vec::new(),
        }
    }
}

/// Kind-specific children of a stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageBody {
    Research { rounds: Vec<Round> },
    Community { researchers: Vec<ResearcherGroup> },
    Consensus { events: Vec<IndexedEvent> },
}

/// One emitted stage of the reconstructed workflow.
///
/// `start_time` is the timestamp of the first event assigned to the stage
/// and `end_time` that of the last-assigned event; both follow assignment
/// order, not timestamp order. Stages with no children are never emitted,
/// so both fields are populated on every stage a build returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: String,
    pub name: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(flatten)]
    pub body: StageBody,
}

impl Stage {
    pub fn kind(&self) -> StageKind {
        match self.body {
            StageBody::Research { .. } => StageKind::Research,
            StageBody::Community { .. } => StageKind::Community,
            StageBody::Consensus { .. } => StageKind::Consensus,
        }
    }

    /// Total events held by this stage's leaves.
    pub fn event_count(&self) -> usize {
        match &self.body {
            StageBody::Research { rounds } => rounds.iter().map(|r| r.events.len()).sum(),
            StageBody::Community { researchers } => {
                researchers.iter().map(|g| g.events.len()).sum()
            }
            StageBody::Consensus { events } => events.len(),
        }
    }
}
