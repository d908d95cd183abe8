use crate::models::{Classification, ClassificationMethod, ClassificationResult, FilterRule};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Tallies over a batch of classification results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationStats {
    pub total: u64,
    pub professional: u64,
    pub personal: u64,
    pub unclassified: u64,
    pub by_rule: u64,
    pub by_auto: u64,
    pub by_manual: u64,
    pub lead_matches: u64,
    pub rule_hits: HashMap<Uuid, u64>,
}

impl ClassificationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ClassificationResult>,
    {
        let mut stats = Self::new();
        for result in results {
            stats.record(result);
        }
        stats
    }

    pub fn record(&mut self, result: &ClassificationResult) {
        self.total += 1;

        match result.classification {
            Classification::Professional => self.professional += 1,
            Classification::Personal => self.personal += 1,
            Classification::Unclassified => self.unclassified += 1,
        }

        match result.method {
            ClassificationMethod::Rule => self.by_rule += 1,
            ClassificationMethod::Auto => self.by_auto += 1,
            ClassificationMethod::Manual => self.by_manual += 1,
        }

        if let Some(rule_id) = result.rule_id {
            *self.rule_hits.entry(rule_id).or_insert(0) += 1;
        }
        if result.matched_lead_id.is_some() {
            self.lead_matches += 1;
        }
    }

    /// Share of results decided without human review.
    pub fn auto_classification_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.total - self.unclassified) as f64 / self.total as f64
    }

    /// Active rules that never fired in the recorded results.
    pub fn unmatched_rules<'a>(&self, rules: &'a [FilterRule]) -> Vec<&'a FilterRule> {
        rules
            .iter()
            .filter(|r| r.is_active && !self.rule_hits.contains_key(&r.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RuleType;

    fn result(
        classification: Classification,
        method: ClassificationMethod,
        rule_id: Option<Uuid>,
    ) -> ClassificationResult {
        ClassificationResult {
            classification,
            confidence: 0.9,
            reasons: Vec::new(),
            method,
            professional_score: 0.0,
            personal_score: 0.0,
            rule_id,
            matched_lead_id: None,
        }
    }

    #[test]
    fn test_tallies_and_rate() {
        let fired = FilterRule::new(Uuid::nil(), RuleType::Keyword, "a", Classification::Personal);
        let idle = FilterRule::new(Uuid::nil(), RuleType::Keyword, "b", Classification::Personal);
        let results = vec![
            result(Classification::Personal, ClassificationMethod::Rule, Some(fired.id)),
            result(Classification::Professional, ClassificationMethod::Auto, None),
            result(Classification::Unclassified, ClassificationMethod::Auto, None),
            result(Classification::Personal, ClassificationMethod::Rule, Some(fired.id)),
        ];

        let stats = ClassificationStats::from_results(&results);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.personal, 2);
        assert_eq!(stats.unclassified, 1);
        assert_eq!(stats.by_rule, 2);
        assert_eq!(stats.rule_hits[&fired.id], 2);
        assert_eq!(stats.auto_classification_rate(), 0.75);

        let rules = [fired, idle.clone()];
        let unmatched = stats.unmatched_rules(&rules);
        assert_eq!(unmatched.len(), 1);
        assert_eq!(unmatched[0].id, idle.id);
    }

    #[test]
    fn test_empty_stats() {
        let stats = ClassificationStats::new();
        assert_eq!(stats.auto_classification_rate(), 0.0);
    }
}
