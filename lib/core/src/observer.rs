//! Injectable observability for the matching pipeline
//!
//! The pipeline never logs on its own. Callers pass a [`MatchObserver`];
//! [`TracingObserver`] forwards everything to `tracing`.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::archetype::Gender;
use crate::filter::BmiStrategy;
use crate::normalize::MuscularityLevel;

/// Pipeline states, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    Fetching,
    MuscularGating,
    BmiGatingStrict,
    BmiGatingRelaxed,
    Scoring,
    Ranking,
    Done,
}

impl fmt::Display for MatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchStage::Fetching => "fetching",
            MatchStage::MuscularGating => "muscular_gating",
            MatchStage::BmiGatingStrict => "bmi_gating_strict",
            MatchStage::BmiGatingRelaxed => "bmi_gating_relaxed",
            MatchStage::Scoring => "scoring",
            MatchStage::Ranking => "ranking",
            MatchStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Non-fatal conditions the pipeline recovers from through a fallback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchCondition {
    /// The compatibility matrix has no entry; the muscularity gate was skipped
    NoCompatibleMuscularity { level: MuscularityLevel },
    /// Too few strict BMI survivors; the relaxed pass was run
    InsufficientCandidatesAfterBmiFilter { found: usize, required: usize },
}

pub trait MatchObserver: Send + Sync {
    fn unmapped_term(&self, _raw: &str, _fallback: MuscularityLevel) {}

    fn invalid_archetype(&self, _id: &str, _reason: &str) {}

    fn gender_mismatch(&self, _id: &str, _expected: Gender) {}

    fn condition(&self, _condition: &MatchCondition) {}

    fn stage_completed(&self, _stage: MatchStage, _remaining: usize) {}

    fn selection_complete(&self, _selected: usize, _strategy: BmiStrategy, _coherence: f64) {}
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl MatchObserver for NoopObserver {}

/// Forwards events to the `tracing` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl MatchObserver for TracingObserver {
    fn unmapped_term(&self, raw: &str, fallback: MuscularityLevel) {
        tracing::warn!(raw, fallback = %fallback, "unmapped muscularity term");
    }

    fn invalid_archetype(&self, id: &str, reason: &str) {
        tracing::warn!(id, reason, "skipping invalid archetype row");
    }

    fn gender_mismatch(&self, id: &str, expected: Gender) {
        tracing::warn!(id, expected = %expected, "catalog returned archetype of the wrong gender");
    }

    fn condition(&self, condition: &MatchCondition) {
        match condition {
            MatchCondition::NoCompatibleMuscularity { level } => {
                tracing::warn!(level = %level, "no compatible muscularity levels, gate skipped");
            }
            MatchCondition::InsufficientCandidatesAfterBmiFilter { found, required } => {
                tracing::info!(found, required, "strict BMI filter too narrow, relaxing");
            }
        }
    }

    fn stage_completed(&self, stage: MatchStage, remaining: usize) {
        tracing::debug!(stage = %stage, remaining, "match stage completed");
    }

    fn selection_complete(&self, selected: usize, strategy: BmiStrategy, coherence: f64) {
        tracing::info!(selected, strategy = %strategy, coherence, "archetype selection complete");
    }
}

/// An event captured by [`RecordingObserver`]
#[derive(Debug, Clone, PartialEq)]
pub enum ObservedEvent {
    Unmapped(String),
    InvalidArchetype { id: String, reason: String },
    GenderMismatch(String),
    Condition(MatchCondition),
    Stage(MatchStage, usize),
    Complete { selected: usize, strategy: BmiStrategy },
}

/// Keeps every event in memory, for tests and diagnostics endpoints
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().clone()
    }

    pub fn unmapped(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::Unmapped(raw) => Some(raw.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn conditions(&self) -> Vec<MatchCondition> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::Condition(c) => Some(c.clone()),
                _ => None,
            })
            .collect()
    }

    /// Stages in the order they completed
    pub fn stages(&self) -> Vec<MatchStage> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::Stage(stage, _) => Some(*stage),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ObservedEvent) {
        self.events.lock().push(event);
    }
}

impl MatchObserver for RecordingObserver {
    fn unmapped_term(&self, raw: &str, _fallback: MuscularityLevel) {
        self.push(ObservedEvent::Unmapped(raw.to_string()));
    }

    fn invalid_archetype(&self, id: &str, reason: &str) {
        self.push(ObservedEvent::InvalidArchetype {
            id: id.to_string(),
            reason: reason.to_string(),
        });
    }

    fn gender_mismatch(&self, id: &str, _expected: Gender) {
        self.push(ObservedEvent::GenderMismatch(id.to_string()));
    }

    fn condition(&self, condition: &MatchCondition) {
        self.push(ObservedEvent::Condition(condition.clone()));
    }

    fn stage_completed(&self, stage: MatchStage, remaining: usize) {
        self.push(ObservedEvent::Stage(stage, remaining));
    }

    fn selection_complete(&self, selected: usize, strategy: BmiStrategy, _coherence: f64) {
        self.push(ObservedEvent::Complete { selected, strategy });
    }
}
