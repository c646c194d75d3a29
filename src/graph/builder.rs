//! Event graph construction from explicit parent references
//!
//! Nodes are 1:1 with input events, identified by stringified positional
//! index. Edges come solely from each event's `parent_ids`; no causal
//! inference happens here, and layout is left to an external algorithm.

use crate::event::AgentEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A node of the event graph, one per input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Stringified positional index of the source event
    pub id: String,
    /// Display label derived from the event (see `node_label`)
    pub label: String,
    pub event_type: String,
    pub source: String,
    pub timestamp: String,
    /// Zero-based position in the input sequence
    pub index: usize,
    /// Value copy of the source event, for detail rendering on selection
    pub event: AgentEvent,
}

/// A directed edge from a parent event's node to its child's node.
///
/// Duplicate parent references produce duplicate edges on purpose; the
/// builder passes the log's parent list through unmodified apart from
/// dropping self-loops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// `e<source>-<target>`
    pub id: String,
    pub source: String,
    pub target: String,
}

/// Node/edge set for one run, ready for external layout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TraceGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl TraceGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Build the event graph for one run.
///
/// Pure and total: every event yields exactly one node, every `parent_ids`
/// entry yields one edge unless it points at its own node, and an empty
/// input yields an empty graph.
pub fn build_graph(events: &[AgentEvent]) -> TraceGraph {
    let mut graph = TraceGraph::default();

    for (index, event) in events.iter().enumerate() {
        let node_id = index.to_string();
        graph.nodes.push(GraphNode {
            id: node_id.clone(),
            label: node_label(event),
            event_type: event.event_type.clone(),
            source: event.source.clone(),
            timestamp: event.timestamp.clone(),
            index,
            event: event.clone(),
        });

        for parent in event.parents() {
            let parent_id = id_string(parent);
            // Self-loops are silently dropped, not treated as errors.
            if parent_id == node_id {
                continue;
            }
            graph.edges.push(GraphEdge {
                id: format!("e{}-{}", parent_id, node_id),
                source: parent_id,
                target: node_id.clone(),
            });
        }
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built event graph"
    );
    graph
}

/// Derive a node's display label.
///
/// Base label is the event type with underscores replaced by spaces. A
/// researcher source prefixes its first whitespace-delimited token, and
/// reasoning events collapse to `Reasoning (R<n>)` with `?` standing in
/// for a missing round.
fn node_label(event: &AgentEvent) -> String {
    let mut label = event.event_type.replace('_', " ");
    if event.source.contains("Researcher") {
        if let Some(first) = event.source.split_whitespace().next() {
            label = format!("{} {}", first, label);
        }
    }
    if event.event_type == "reasoning" {
        let marker = event
            .round_number()
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string());
        label = format!("Reasoning (R{})", marker);
    }
    label
}

/// Stringify a parent reference: string entries as-is, anything else via
/// its JSON rendering (so numeric indices match stringified node ids).
fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
