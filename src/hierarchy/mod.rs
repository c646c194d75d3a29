//! Workflow hierarchy reconstruction

mod builder;
mod stage;

pub use builder::build_hierarchy;
pub use stage::{ResearcherGroup, Round, RoundKind, Stage, StageBody, StageKind};
