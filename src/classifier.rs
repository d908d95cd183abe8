use crate::components::decision_engine::DecisionEngine;
use crate::components::lead_matcher::{LeadMatcher, LeadRoster};
use crate::components::rule_evaluator::RuleEvaluator;
use crate::components::score_model::ScoreModel;
use crate::components::AnalysisComponent;
use crate::heuristic_config::ClassifierConfig;
use crate::models::{ClassificationResult, Conversation, FilterRule, Lead};

/// Classifies conversations against one consistent snapshot of a user's
/// rules and lead roster. Rebuild it whenever either changes.
pub struct ClassificationEngine {
    engine: DecisionEngine,
    lead_count: usize,
}

impl ClassificationEngine {
    pub fn new(config: &ClassifierConfig, rules: &[FilterRule], leads: Vec<Lead>) -> Self {
        let rule_evaluator = RuleEvaluator::new(rules, &config.rule_confidence);
        let roster = LeadRoster::new(leads);
        let lead_count = roster.len();

        let components: Vec<Box<dyn AnalysisComponent>> = vec![
            Box::new(ScoreModel::new(&config.dictionaries, &config.scoring)),
            Box::new(LeadMatcher::new(roster, &config.scoring)),
        ];

        log::debug!(
            "Built classification engine: {} active rules, {} leads",
            rule_evaluator.len(),
            lead_count
        );

        Self {
            engine: DecisionEngine::new(rule_evaluator, components, config.thresholds.clone()),
            lead_count,
        }
    }

    /// Default tuning, given rules and roster.
    pub fn with_defaults(rules: &[FilterRule], leads: Vec<Lead>) -> Self {
        Self::new(&ClassifierConfig::default(), rules, leads)
    }

    pub fn classify(&self, conversation: &Conversation) -> ClassificationResult {
        self.engine.make_decision(conversation)
    }

    pub fn active_rule_count(&self) -> usize {
        self.engine.rules().len()
    }

    pub fn lead_count(&self) -> usize {
        self.lead_count
    }
}
