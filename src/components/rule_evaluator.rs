//! User rule evaluation
//!
//! Rules are tried in priority order and the first active rule that matches
//! decides the classification outright. Pattern rules are compiled once per
//! snapshot; an expression that fails to compile never matches.

use crate::components::ScoringInput;
use crate::heuristic_config::RuleConfidence;
use crate::models::{
    ClassificationMethod, ClassificationResult, Conversation, FilterRule, RuleType,
};
use regex::{Regex, RegexBuilder};

struct CompiledRule {
    rule: FilterRule,
    value: String,
    pattern: Option<Regex>,
}

impl CompiledRule {
    fn compile(rule: &FilterRule) -> Self {
        let pattern = match rule.rule_type {
            RuleType::Pattern => compile_pattern(&rule.rule_value)
                .map_err(|e| {
                    log::warn!(
                        "Pattern rule {} has an invalid expression '{}', it will never match: {}",
                        rule.id,
                        rule.rule_value,
                        e
                    );
                })
                .ok(),
            _ => None,
        };

        Self {
            rule: rule.clone(),
            value: rule.rule_value.to_lowercase(),
            pattern,
        }
    }

    fn matches(&self, input: &ScoringInput<'_>) -> bool {
        if self.value.trim().is_empty() {
            return false;
        }

        match self.rule.rule_type {
            RuleType::Keyword => input.text.contains(self.value.as_str()),
            RuleType::Participant => input.participant.contains(self.value.as_str()),
            RuleType::Relationship => input
                .conversation
                .profile_url()
                .to_lowercase()
                .contains(self.value.as_str()),
            RuleType::Pattern => match &self.pattern {
                Some(regex) => {
                    regex.is_match(input.conversation.message_text())
                        || regex.is_match(&input.conversation.participant_name)
                }
                None => false,
            },
        }
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

pub struct RuleEvaluator {
    rules: Vec<CompiledRule>,
    confidence: RuleConfidence,
}

impl RuleEvaluator {
    /// Build an evaluator from a consistent snapshot of the user's rules.
    /// Inactive rules are dropped; the rest are stably sorted by priority.
    pub fn new(rules: &[FilterRule], confidence: &RuleConfidence) -> Self {
        let mut active: Vec<&FilterRule> = rules.iter().filter(|r| r.is_active).collect();
        active.sort_by_key(|r| r.priority);

        Self {
            rules: active.into_iter().map(CompiledRule::compile).collect(),
            confidence: confidence.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn evaluate(&self, conversation: &Conversation) -> Option<ClassificationResult> {
        self.evaluate_input(&ScoringInput::new(conversation))
    }

    pub(crate) fn evaluate_input(&self, input: &ScoringInput<'_>) -> Option<ClassificationResult> {
        let compiled = self.rules.iter().find(|c| c.matches(input))?;
        let rule = &compiled.rule;

        log::debug!(
            "Conversation {} matched {} rule {} -> {}",
            input.conversation.id,
            rule.rule_type,
            rule.id,
            rule.target_classification
        );

        Some(ClassificationResult {
            classification: rule.target_classification,
            confidence: self.confidence_for(rule.rule_type),
            reasons: vec![format!(
                "Matched {} rule: \"{}\"",
                rule.rule_type, rule.rule_value
            )],
            method: ClassificationMethod::Rule,
            professional_score: 0.0,
            personal_score: 0.0,
            rule_id: Some(rule.id),
            matched_lead_id: None,
        })
    }

    fn confidence_for(&self, rule_type: RuleType) -> f64 {
        match rule_type {
            RuleType::Keyword => self.confidence.keyword,
            RuleType::Participant => self.confidence.participant,
            RuleType::Relationship => self.confidence.relationship,
            RuleType::Pattern => self.confidence.pattern,
        }
    }

    /// Report rules that can never fire. Problems are warnings, not errors:
    /// evaluation always proceeds past them.
    pub fn validate(rules: &[FilterRule]) -> Vec<String> {
        let mut warnings = Vec::new();
        for rule in rules {
            if rule.rule_value.trim().is_empty() {
                warnings.push(format!(
                    "Rule {} ({}) has an empty value and will never match",
                    rule.id, rule.rule_type
                ));
                continue;
            }
            if rule.rule_type == RuleType::Pattern {
                if let Err(e) = compile_pattern(&rule.rule_value) {
                    warnings.push(format!(
                        "Rule {} has an invalid pattern '{}': {}",
                        rule.id, rule.rule_value, e
                    ));
                }
            }
        }
        warnings
    }
}
