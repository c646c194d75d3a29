//! Event graph construction and audit

mod audit;
mod builder;

pub use audit::{audit_graph, GraphAudit};
pub use builder::{build_graph, GraphEdge, GraphNode, TraceGraph};
