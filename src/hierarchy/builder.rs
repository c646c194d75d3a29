//! Workflow hierarchy reconstruction from a flat event sequence
//!
//! A single forward pass assigns every event to exactly one stage and, for
//! the Research stage, to exactly one round. Round boundaries come from the
//! event content (source kind + `input.round`), not from array position, so
//! the pass carries two open-round pointers that act as a tiny two-state
//! machine: opening a retrieval round closes any open analysis round and
//! vice versa.

use super::stage::{ResearcherGroup, Round, RoundKind, Stage, StageBody, StageKind};
use crate::event::{AgentEvent, IndexedEvent};
use tracing::debug;

/// Exact sources that belong to the Research stage.
const RETRIEVAL_SOURCE: &str = "AgenticRetrieval";
const ANALYSIS_SOURCES: [&str; 2] = ["AnalystAgent", "SupervisorAgent"];

/// Classify an event source into its stage.
///
/// Consensus is the deliberate catch-all: an empty, missing, or unrecognized
/// source lands there rather than being rejected.
fn stage_for(source: &str) -> StageKind {
    if source == RETRIEVAL_SOURCE || ANALYSIS_SOURCES.contains(&source) {
        StageKind::Research
    } else if source.contains("Researcher") || source == "Community" {
        StageKind::Community
    } else {
        StageKind::Consensus
    }
}

/// First/last assignment timestamps of a stage under construction.
#[derive(Default)]
struct Span {
    start: Option<String>,
    end: Option<String>,
}

impl Span {
    /// Record an assignment: the start is set once, the end every time.
    fn touch(&mut self, timestamp: &str) {
        if self.start.is_none() {
            self.start = Some(timestamp.to_string());
        }
        self.end = Some(timestamp.to_string());
    }
}

/// Build the stage → round/group → event hierarchy for one run.
///
/// Pure and total: any well-formed event sequence produces a result, and an
/// empty sequence produces an empty stage list. Stages appear in fixed
/// Research, Community, Consensus order and only when non-empty.
pub fn build_hierarchy(events: &[AgentEvent]) -> Vec<Stage> {
    let mut rounds: Vec<Round> = Vec::new();
    let mut researchers: Vec<ResearcherGroup> = Vec::new();
    let mut consensus_events: Vec<IndexedEvent> = Vec::new();

    let mut research_span = Span::default();
    let mut community_span = Span::default();
    let mut consensus_span = Span::default();

    // Open-round pointers, as indices into `rounds`. A pointer survives only
    // while consecutive research events keep its kind and round number.
    let mut open_retrieval: Option<usize> = None;
    let mut open_analysis: Option<usize> = None;

    for (index, event) in events.iter().enumerate() {
        match stage_for(&event.source) {
            StageKind::Research => {
                research_span.touch(&event.timestamp);
                let number = event.round();
                let kind = if event.source == RETRIEVAL_SOURCE {
                    RoundKind::Retrieval
                } else {
                    RoundKind::Analysis
                };
                let (open, other) = match kind {
                    RoundKind::Retrieval => (&mut open_retrieval, &mut open_analysis),
                    RoundKind::Analysis => (&mut open_analysis, &mut open_retrieval),
                };
                let slot = match *open {
                    Some(slot) if rounds[slot].number == number => slot,
                    _ => {
                        // Opening a round of one kind always invalidates the
                        // other pointer, so a later event of the other kind
                        // starts a fresh round even for a repeated number.
                        rounds.push(Round::open(kind, number, &event.timestamp));
                        *other = None;
                        let slot = rounds.len() - 1;
                        *open = Some(slot);
                        slot
                    }
                };
                rounds[slot].events.push(IndexedEvent::new(index, event));
                rounds[slot].end_time = event.timestamp.clone();
            }
            StageKind::Community => {
                community_span.touch(&event.timestamp);
                let slot = match researchers.iter().position(|g| g.name == event.source) {
                    Some(slot) => slot,
                    None => {
                        researchers.push(ResearcherGroup::new(&event.source));
                        researchers.len() - 1
                    }
                };
                researchers[slot].events.push(IndexedEvent::new(index, event));
            }
            StageKind::Consensus => {
                consensus_span.touch(&event.timestamp);
                consensus_events.push(IndexedEvent::new(index, event));
            }
        }
    }

    // Community and consensus leaves are time-ordered for display; rounds
    // keep their assignment order, which is the authoring order.
    for group in &mut researchers {
        sort_by_timestamp(&mut group.events);
    }
    sort_by_timestamp(&mut consensus_events);

    let mut stages = Vec::new();
    if !rounds.is_empty() {
        stages.push(make_stage(
            StageKind::Research,
            research_span,
            StageBody::Research { rounds },
        ));
    }
    if !researchers.is_empty() {
        stages.push(make_stage(
            StageKind::Community,
            community_span,
            StageBody::Community { researchers },
        ));
    }
    if !consensus_events.is_empty() {
        stages.push(make_stage(
            StageKind::Consensus,
            consensus_span,
            StageBody::Consensus {
                events: consensus_events,
            },
        ));
    }

    debug!(
        events = events.len(),
        stages = stages.len(),
        "built workflow hierarchy"
    );
    stages
}

fn make_stage(kind: StageKind, span: Span, body: StageBody) -> Stage {
    Stage {
        id: kind.id().to_string(),
        name: kind.display_name().to_string(),
        start_time: span.start,
        end_time: span.end,
        body,
    }
}

/// Stable ascending sort by parsed timestamp; unparseable timestamps sort
/// first and ties keep their input order.
fn sort_by_timestamp(events: &mut [IndexedEvent]) {
    events.sort_by_key(|e| e.event.parsed_timestamp());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(source: &str, event_type: &str, timestamp: &str, round: Option<u32>) -> AgentEvent {
        AgentEvent {
            source: source.to_string(),
            event_type: event_type.to_string(),
            timestamp: timestamp.to_string(),
            input: round.map(|n| json!({ "round": n })),
            output: None,
            parent_ids: None,
        }
    }

    fn ts(second: u32) -> String {
        format!("2025-11-25T02:32:{:02}Z", second)
    }

    #[test]
    fn empty_input_yields_no_stages() {
        assert!(build_hierarchy(&[]).is_empty());
    }

    #[test]
    fn source_classification_priority() {
        assert_eq!(stage_for("AgenticRetrieval"), StageKind::Research);
        assert_eq!(stage_for("AnalystAgent"), StageKind::Research);
        assert_eq!(stage_for("SupervisorAgent"), StageKind::Research);
        assert_eq!(stage_for("Researcher 3"), StageKind::Community);
        assert_eq!(stage_for("SeniorResearcher"), StageKind::Community);
        assert_eq!(stage_for("Community"), StageKind::Community);
        assert_eq!(stage_for("ConsensusEngine"), StageKind::Consensus);
        assert_eq!(stage_for(""), StageKind::Consensus);
    }

    #[test]
    fn stages_appear_in_fixed_order_when_populated() {
        let events = vec![
            event("FinalWriter", "summary", &ts(5), None),
            event("Researcher 1", "forecast", &ts(3), None),
            event("AgenticRetrieval", "search_result", &ts(1), Some(1)),
        ];
        let stages = build_hierarchy(&events);
        let kinds: Vec<_> = stages.iter().map(Stage::kind).collect();
        assert_eq!(
            kinds,
            vec![StageKind::Research, StageKind::Community, StageKind::Consensus]
        );
    }

    #[test]
    fn consecutive_same_round_events_share_a_round() {
        let events = vec![
            event("AgenticRetrieval", "search_result", &ts(1), Some(1)),
            event("AgenticRetrieval", "search_result", &ts(2), Some(1)),
            event("AgenticRetrieval", "search_result", &ts(3), Some(2)),
        ];
        let stages = build_hierarchy(&events);
        let StageBody::Research { rounds } = &stages[0].body else {
            panic!("expected research stage");
        };
        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds[0].id, "retrieval-1");
        assert_eq!(rounds[0].events.len(), 2);
        assert_eq!(rounds[1].id, "retrieval-2");
        assert_eq!(rounds[1].events.len(), 1);
    }

    #[test]
    fn interleaved_kinds_reopen_rounds_for_the_same_number() {
        let events = vec![
            event("AgenticRetrieval", "search_result", &ts(1), Some(1)),
            event("AnalystAgent", "analysis", &ts(2), Some(1)),
            event("AgenticRetrieval", "search_result", &ts(3), Some(1)),
        ];
        let stages = build_hierarchy(&events);
        let StageBody::Research { rounds } = &stages[0].body else {
            panic!("expected research stage");
        };
        let ids: Vec<&str> = rounds.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["retrieval-1", "analysis-1", "retrieval-1"]);
        assert!(rounds.iter().all(|r| r.events.len() == 1));
    }

    #[test]
    fn supervisor_and_analyst_share_the_analysis_round() {
        let events = vec![
            event("AnalystAgent", "analysis", &ts(1), Some(2)),
            event("SupervisorAgent", "review", &ts(2), Some(2)),
        ];
        let stages = build_hierarchy(&events);
        let StageBody::Research { rounds } = &stages[0].body else {
            panic!("expected research stage");
        };
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].kind, RoundKind::Analysis);
        assert_eq!(rounds[0].events.len(), 2);
    }

    #[test]
    fn missing_round_defaults_to_one() {
        let events = vec![
            event("AgenticRetrieval", "search_result", &ts(1), None),
            event("AgenticRetrieval", "search_result", &ts(2), Some(1)),
        ];
        let stages = build_hierarchy(&events);
        let StageBody::Research { rounds } = &stages[0].body else {
            panic!("expected research stage");
        };
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].number, 1);
    }

    #[test]
    fn researcher_groups_key_on_exact_source_and_sort_events() {
        let events = vec![
            event("Researcher 2", "forecast", &ts(9), None),
            event("Researcher 1", "forecast", &ts(8), None),
            event("Researcher 2", "reasoning", &ts(4), None),
        ];
        let stages = build_hierarchy(&events);
        let StageBody::Community { researchers } = &stages[0].body else {
            panic!("expected community stage");
        };
        // First-seen order among groups
        assert_eq!(researchers[0].name, "Researcher 2");
        assert_eq!(researchers[1].name, "Researcher 1");
        // Ascending timestamps inside a group, regardless of input order
        let times: Vec<&str> = researchers[0]
            .events
            .iter()
            .map(|e| e.event.timestamp.as_str())
            .collect();
        assert_eq!(times, vec![ts(4).as_str(), ts(9).as_str()]);
    }

    #[test]
    fn stage_span_tracks_assignment_order() {
        // The second research event carries an earlier timestamp; end_time
        // still follows assignment order per the single forward pass.
        let events = vec![
            event("AgenticRetrieval", "search_result", &ts(10), Some(1)),
            event("AgenticRetrieval", "search_result", &ts(5), Some(1)),
        ];
        let stages = build_hierarchy(&events);
        assert_eq!(stages[0].start_time.as_deref(), Some(ts(10).as_str()));
        assert_eq!(stages[0].end_time.as_deref(), Some(ts(5).as_str()));
    }

    #[test]
    fn every_event_lands_in_exactly_one_leaf() {
        let events = vec![
            event("AgenticRetrieval", "search_result", &ts(1), Some(1)),
            event("AnalystAgent", "analysis", &ts(2), Some(1)),
            event("Researcher 1", "forecast", &ts(3), None),
            event("Community", "aggregate", &ts(4), None),
            event("FinalWriter", "summary", &ts(5), None),
            event("", "status", &ts(6), None),
        ];
        let stages = build_hierarchy(&events);
        let mut seen: Vec<usize> = Vec::new();
        for stage in &stages {
            match &stage.body {
                StageBody::Research { rounds } => {
                    seen.extend(rounds.iter().flat_map(|r| r.events.iter().map(|e| e.index)))
                }
                StageBody::Community { researchers } => seen.extend(
                    researchers
                        .iter()
                        .flat_map(|g| g.events.iter().map(|e| e.index)),
                ),
                StageBody::Consensus { events } => {
                    seen.extend(events.iter().map(|e| e.index))
                }
            }
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..events.len()).collect::<Vec<_>>());
    }

    #[test]
    fn rebuild_is_structurally_equal() {
        let events = vec![
            event("AgenticRetrieval", "search_result", &ts(1), Some(1)),
            event("Researcher 1", "forecast", &ts(2), None),
            event("FinalWriter", "summary", &ts(3), None),
        ];
        assert_eq!(build_hierarchy(&events), build_hierarchy(&events));
    }
}
