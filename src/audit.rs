//! Audit entry construction.
//!
//! Entries are built from the state *before* a transition plus what the
//! transition is about to apply. Callers append them; nothing here mutates
//! conversations or rules.

use crate::models::{
    AuditAction, AuditEntry, Classification, ClassificationMethod, ClassificationResult,
    Conversation, FilterRule,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

pub struct AuditRecorder;

impl AuditRecorder {
    /// Entry for an engine result about to be written into `previous`.
    pub fn classification(previous: &Conversation, result: &ClassificationResult) -> AuditEntry {
        Self::entry(
            previous.user_id,
            Some(previous.id),
            Self::transition_action(previous.classification),
            Some(previous.classification),
            Some(result.classification),
            Some(result.method),
            result.reason_text(),
            json!({
                "confidence": result.confidence,
                "previous_method": previous.classification_method,
                "previous_confidence": previous.confidence,
                "rule_id": result.rule_id,
                "lead_id": result.matched_lead_id,
            }),
        )
    }

    /// Entry for a user forcing `classification` on `previous`.
    pub fn manual_override(
        previous: &Conversation,
        classification: Classification,
        reason: &str,
    ) -> AuditEntry {
        Self::entry(
            previous.user_id,
            Some(previous.id),
            Self::transition_action(previous.classification),
            Some(previous.classification),
            Some(classification),
            Some(ClassificationMethod::Manual),
            reason.to_string(),
            json!({
                "confidence": 1.0,
                "previous_method": previous.classification_method,
                "previous_confidence": previous.confidence,
            }),
        )
    }

    /// Entry for flipping the exclusion flag. Classification is unchanged.
    pub fn exclusion(conversation: &Conversation, excluded: bool, reason: &str) -> AuditEntry {
        let action = if excluded {
            AuditAction::Excluded
        } else {
            AuditAction::Included
        };

        Self::entry(
            conversation.user_id,
            Some(conversation.id),
            action,
            Some(conversation.classification),
            Some(conversation.classification),
            Some(ClassificationMethod::Manual),
            reason.to_string(),
            json!({ "was_excluded": conversation.is_excluded }),
        )
    }

    pub fn rule_created(rule: &FilterRule) -> AuditEntry {
        Self::rule_entry(AuditAction::RuleCreated, rule, "Rule created")
    }

    pub fn rule_deleted(rule: &FilterRule) -> AuditEntry {
        Self::rule_entry(AuditAction::RuleDeleted, rule, "Rule deleted")
    }

    /// A deactivated rule leaves evaluation like a deleted one, but its row
    /// stays; `metadata.deactivated` tells the two apart.
    pub fn rule_deactivated(rule: &FilterRule) -> AuditEntry {
        let mut entry = Self::rule_entry(AuditAction::RuleDeleted, rule, "Rule deactivated");
        entry.metadata["deactivated"] = json!(true);
        entry
    }

    pub fn rule_activated(rule: &FilterRule) -> AuditEntry {
        let mut entry = Self::rule_entry(AuditAction::RuleCreated, rule, "Rule activated");
        entry.metadata["reactivated"] = json!(true);
        entry
    }

    fn rule_entry(action: AuditAction, rule: &FilterRule, verb: &str) -> AuditEntry {
        Self::entry(
            rule.user_id,
            None,
            action,
            None,
            Some(rule.target_classification),
            Some(ClassificationMethod::Rule),
            format!("{verb}: {} \"{}\"", rule.rule_type, rule.rule_value),
            json!({
                "rule_id": rule.id,
                "rule_type": rule.rule_type,
                "rule_value": rule.rule_value,
                "priority": rule.priority,
                "is_active": rule.is_active,
            }),
        )
    }

    fn transition_action(previous: Classification) -> AuditAction {
        match previous {
            Classification::Unclassified => AuditAction::Classified,
            _ => AuditAction::Reclassified,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn entry(
        user_id: Uuid,
        conversation_id: Option<Uuid>,
        action: AuditAction,
        previous_classification: Option<Classification>,
        new_classification: Option<Classification>,
        method: Option<ClassificationMethod>,
        reason: String,
        metadata: serde_json::Value,
    ) -> AuditEntry {
        AuditEntry {
            id: Uuid::new_v4(),
            user_id,
            conversation_id,
            action,
            previous_classification,
            new_classification,
            method,
            reason,
            metadata,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RuleType;

    fn result(classification: Classification) -> ClassificationResult {
        ClassificationResult {
            classification,
            confidence: 0.8,
            reasons: vec!["a".to_string(), "b".to_string()],
            method: ClassificationMethod::Auto,
            professional_score: 0.6,
            personal_score: 0.15,
            rule_id: None,
            matched_lead_id: None,
        }
    }

    #[test]
    fn test_first_classification_is_classified() {
        let conversation = Conversation::new(Uuid::new_v4(), "t", "Jane");
        let entry =
            AuditRecorder::classification(&conversation, &result(Classification::Professional));
        assert_eq!(entry.action, AuditAction::Classified);
        assert_eq!(entry.user_id, conversation.user_id);
        assert_eq!(entry.conversation_id, Some(conversation.id));
        assert_eq!(entry.previous_classification, Some(Classification::Unclassified));
        assert_eq!(entry.new_classification, Some(Classification::Professional));
        assert_eq!(entry.method, Some(ClassificationMethod::Auto));
        assert_eq!(entry.reason, "a; b");
        assert_eq!(entry.metadata["confidence"], json!(0.8));
    }

    #[test]
    fn test_change_from_classified_is_reclassified() {
        let mut conversation = Conversation::new(Uuid::new_v4(), "t", "Jane");
        conversation.classification = Classification::Personal;
        let entry =
            AuditRecorder::classification(&conversation, &result(Classification::Professional));
        assert_eq!(entry.action, AuditAction::Reclassified);
        assert_eq!(entry.previous_classification, Some(Classification::Personal));
    }

    #[test]
    fn test_exclusion_keeps_classification() {
        let mut conversation = Conversation::new(Uuid::new_v4(), "t", "Jane");
        conversation.classification = Classification::Professional;

        let excluded = AuditRecorder::exclusion(&conversation, true, "hide");
        assert_eq!(excluded.action, AuditAction::Excluded);
        assert_eq!(excluded.previous_classification, excluded.new_classification);

        let included = AuditRecorder::exclusion(&conversation, false, "show");
        assert_eq!(included.action, AuditAction::Included);
    }

    #[test]
    fn test_rule_entries_have_no_conversation() {
        let rule = FilterRule::new(
            Uuid::new_v4(),
            RuleType::Keyword,
            "invoice",
            Classification::Professional,
        );
        let created = AuditRecorder::rule_created(&rule);
        assert_eq!(created.action, AuditAction::RuleCreated);
        assert!(created.conversation_id.is_none());
        assert_eq!(created.metadata["rule_id"], json!(rule.id));
        assert_eq!(created.reason, "Rule created: keyword \"invoice\"");

        let deleted = AuditRecorder::rule_deleted(&rule);
        assert_eq!(deleted.action, AuditAction::RuleDeleted);
        assert_eq!(deleted.user_id, rule.user_id);
    }
}
