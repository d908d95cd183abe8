//! Decision Engine Component
//!
//! Combines the rule layer with the heuristic components. A firing rule is
//! returned verbatim; otherwise component scores are summed and the verdict
//! is gated on dominance (confidence) and total evidence.

use crate::components::rule_evaluator::RuleEvaluator;
use crate::components::{AnalysisComponent, ScoringInput};
use crate::heuristic_config::DecisionThresholds;
use crate::models::{Classification, ClassificationMethod, ClassificationResult, Conversation};

// Absorbs accumulated float error so that e.g. two 0.15 hits clear a 0.30 bar.
const SCORE_EPSILON: f64 = 1e-9;

pub struct DecisionEngine {
    rules: RuleEvaluator,
    components: Vec<Box<dyn AnalysisComponent>>,
    thresholds: DecisionThresholds,
}

impl DecisionEngine {
    pub fn new(
        rules: RuleEvaluator,
        mut components: Vec<Box<dyn AnalysisComponent>>,
        thresholds: DecisionThresholds,
    ) -> Self {
        // Lower number = higher priority; also fixes the order of reasons.
        components.sort_by_key(|c| c.priority());
        Self {
            rules,
            components,
            thresholds,
        }
    }

    pub fn rules(&self) -> &RuleEvaluator {
        &self.rules
    }

    /// Make the final decision for one conversation.
    pub fn make_decision(&self, conversation: &Conversation) -> ClassificationResult {
        let input = ScoringInput::new(conversation);

        if let Some(result) = self.rules.evaluate_input(&input) {
            return result;
        }

        self.heuristic_decision(&input)
    }

    fn heuristic_decision(&self, input: &ScoringInput<'_>) -> ClassificationResult {
        let mut professional_score = 0.0;
        let mut personal_score = 0.0;
        let mut reasons = Vec::new();
        let mut matched_lead_id = None;

        for component in &self.components {
            let result = component.analyze(input);
            professional_score += result.professional_score;
            personal_score += result.personal_score;
            reasons.extend(result.evidence);
            if matched_lead_id.is_none() {
                matched_lead_id = result.matched_lead_id;
            }
        }

        let total_score = professional_score + personal_score;
        let dominant_score = f64::max(professional_score, personal_score);
        let confidence = if total_score > 0.0 {
            dominant_score / total_score
        } else {
            0.0
        };

        // Ties never auto-classify, even under a lowered confidence threshold.
        let decisive = total_score > 0.0
            && confidence + SCORE_EPSILON >= self.thresholds.min_confidence
            && total_score + SCORE_EPSILON >= self.thresholds.min_total_score
            && professional_score != personal_score;

        let classification = if decisive {
            if professional_score > personal_score {
                Classification::Professional
            } else {
                Classification::Personal
            }
        } else {
            if reasons.is_empty() {
                reasons.push("No indicators found".to_string());
            } else {
                reasons.push(format!(
                    "Insufficient signal (score {:.2}, confidence {:.2}), needs manual review",
                    total_score, confidence
                ));
            }
            Classification::Unclassified
        };

        log::debug!(
            "Conversation {} scored professional={:.2} personal={:.2} confidence={:.2} -> {}",
            input.conversation.id,
            professional_score,
            personal_score,
            confidence,
            classification
        );

        ClassificationResult {
            classification,
            confidence,
            reasons,
            method: ClassificationMethod::Auto,
            professional_score,
            personal_score,
            rule_id: None,
            matched_lead_id,
        }
    }
}
