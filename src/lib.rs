//! Tracery: Trace Reconstruction Engine
//!
//! Rebuilds structured views from the flat, timestamped event log a
//! multi-agent research pipeline writes per run.
//!
//! # Core Concepts
//!
//! - **Hierarchy**: stages (Research, Community, Consensus) with rounds and
//!   researcher groups, inferred from event attributes in a single pass
//! - **Graph**: one node per event, edges from explicit parent references,
//!   handed to an external layout algorithm
//! - **Classification**: per-value render categories for arbitrary JSON
//!   payloads, plus a language sniff for code
//!
//! # Example
//!
//! ```
//! use tracery::{build_graph, build_hierarchy};
//!
//! let events = tracery::ingest::parse_events("");
//! assert!(build_hierarchy(&events).is_empty());
//! assert!(build_graph(&events).is_empty());
//! ```

mod classify;
mod event;
mod graph;
mod hierarchy;
pub mod ingest;

pub use classify::{classify, detect_language, Language, RenderCategory};
pub use event::{parse_timestamp, AgentEvent, IndexedEvent};
pub use graph::{audit_graph, build_graph, GraphAudit, GraphEdge, GraphNode, TraceGraph};
pub use hierarchy::{
    build_hierarchy, ResearcherGroup, Round, RoundKind, Stage, StageBody, StageKind,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
