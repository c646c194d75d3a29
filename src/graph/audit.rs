//! Structural audit of a built event graph
//!
//! Reports nodes with no incoming edge (other than the first node, which is
//! the natural root of a run) and nodes unreachable from the first node.
//! The audit only reports; it never rejects a graph.

use super::builder::TraceGraph;
use std::collections::{HashMap, HashSet, VecDeque};

/// Findings from auditing one graph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GraphAudit {
    /// Node ids with in-degree 0, excluding the first node
    pub orphans: Vec<String>,
    /// Node ids not reachable from the first node by directed BFS
    pub unreachable: Vec<String>,
    /// Edge ids whose source or target has no matching node
    pub dangling_edges: Vec<String>,
}

impl GraphAudit {
    pub fn is_clean(&self) -> bool {
        self.orphans.is_empty() && self.unreachable.is_empty() && self.dangling_edges.is_empty()
    }
}

/// Audit a graph's connectivity.
///
/// An empty graph is trivially clean. Edges referencing unknown node ids
/// (a parent index past the end of the log, say) are reported as dangling
/// and excluded from the connectivity walk.
pub fn audit_graph(graph: &TraceGraph) -> GraphAudit {
    let mut audit = GraphAudit::default();
    let Some(root) = graph.nodes.first() else {
        return audit;
    };

    let known: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut in_degree: HashMap<&str, usize> = HashMap::new();

    for edge in &graph.edges {
        if !known.contains(edge.source.as_str()) || !known.contains(edge.target.as_str()) {
            audit.dangling_edges.push(edge.id.clone());
            continue;
        }
        adjacency
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
        *in_degree.entry(edge.target.as_str()).or_default() += 1;
    }

    audit.orphans = graph
        .nodes
        .iter()
        .skip(1)
        .filter(|n| !in_degree.contains_key(n.id.as_str()))
        .map(|n| n.id.clone())
        .collect();

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    visited.insert(root.id.as_str());
    queue.push_back(root.id.as_str());
    while let Some(current) = queue.pop_front() {
        for &next in adjacency.get(current).into_iter().flatten() {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    audit.unreachable = graph
        .nodes
        .iter()
        .filter(|n| !visited.contains(n.id.as_str()))
        .map(|n| n.id.clone())
        .collect();

    audit
}

#[cfg(test)]
mod tests {
    use super::super::builder::build_graph;
    use super::*;
    use crate::event::AgentEvent;
    use serde_json::{json, Value};

    fn event(parent_ids: Option<Value>) -> AgentEvent {
        AgentEvent {
            source: "AnalystAgent".to_string(),
            event_type: "analysis".to_string(),
            timestamp: "2025-11-25T02:32:30Z".to_string(),
            input: None,
            output: None,
            parent_ids,
        }
    }

    #[test]
    fn empty_graph_is_clean() {
        assert!(audit_graph(&TraceGraph::default()).is_clean());
    }

    #[test]
    fn fully_chained_graph_is_clean() {
        let events = vec![
            event(None),
            event(Some(json!([0]))),
            event(Some(json!([1]))),
        ];
        let audit = audit_graph(&build_graph(&events));
        assert!(audit.is_clean(), "unexpected findings: {:?}", audit);
    }

    #[test]
    fn detached_node_is_orphaned_and_unreachable() {
        let events = vec![event(None), event(Some(json!([0]))), event(None)];
        let audit = audit_graph(&build_graph(&events));
        assert_eq!(audit.orphans, vec!["2"]);
        assert_eq!(audit.unreachable, vec!["2"]);
        assert!(audit.dangling_edges.is_empty());
    }

    #[test]
    fn root_is_never_an_orphan() {
        let events = vec![event(None), event(Some(json!([0])))];
        let audit = audit_graph(&build_graph(&events));
        assert!(audit.orphans.is_empty());
        assert!(audit.unreachable.is_empty());
    }

    #[test]
    fn out_of_range_parent_is_a_dangling_edge() {
        let events = vec![event(None), event(Some(json!([7])))];
        let audit = audit_graph(&build_graph(&events));
        assert_eq!(audit.dangling_edges, vec!["e7-1"]);
        // The target of a dangling edge still counts as disconnected.
        assert_eq!(audit.orphans, vec!["1"]);
    }
}
