//! Classification pipeline components
//!
//! Rules are evaluated first by `rule_evaluator`. When none fires, the
//! heuristic components contribute professional/personal scores which
//! `decision_engine` folds into a single verdict.

pub mod decision_engine;
pub mod lead_matcher;
pub mod rule_evaluator;
pub mod score_model;

#[cfg(test)]
pub mod precedence_test;

use crate::models::Conversation;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lower-cased views of the fields the heuristics look at, computed once per
/// conversation.
#[derive(Debug, Clone)]
pub struct ScoringInput<'a> {
    pub conversation: &'a Conversation,
    pub text: String,
    pub participant: String,
}

impl<'a> ScoringInput<'a> {
    pub fn new(conversation: &'a Conversation) -> Self {
        Self {
            conversation,
            text: conversation.message_text().to_lowercase(),
            participant: conversation.participant_name.to_lowercase(),
        }
    }
}

/// Common result type for heuristic components
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentResult {
    pub component_name: String,
    pub professional_score: f64,
    pub personal_score: f64,
    pub evidence: Vec<String>,
    pub matched_lead_id: Option<Uuid>,
}

impl ComponentResult {
    pub fn empty(component_name: &str) -> Self {
        Self {
            component_name: component_name.to_string(),
            ..Default::default()
        }
    }
}

/// Trait for all heuristic components
pub trait AnalysisComponent: Send + Sync {
    fn analyze(&self, input: &ScoringInput<'_>) -> ComponentResult;
    fn name(&self) -> &str;
    fn priority(&self) -> u8; // Lower number = higher priority
}
