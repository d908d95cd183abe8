//! Conversation state transitions.
//!
//! Classification moves between unclassified, professional and personal with
//! no terminal state. The exclusion flag is orthogonal and only changes on an
//! explicit exclude/include. Every transition yields exactly one audit entry.

use crate::audit::AuditRecorder;
use crate::models::{
    AuditEntry, Classification, ClassificationMethod, ClassificationResult, Conversation,
};
use chrono::Utc;

/// Write an engine result into `conversation`.
pub fn apply_result(conversation: &mut Conversation, result: &ClassificationResult) -> AuditEntry {
    let entry = AuditRecorder::classification(conversation, result);

    conversation.classification = result.classification;
    conversation.classification_method = result.method;
    conversation.classification_reason = result.reason_text();
    conversation.confidence = result.confidence;
    if conversation.lead_id.is_none() {
        conversation.lead_id = result.matched_lead_id;
    }
    conversation.updated_at = Utc::now();

    entry
}

/// Force a classification chosen by the user, bypassing scoring.
pub fn manual_override(
    conversation: &mut Conversation,
    classification: Classification,
    reason: Option<&str>,
) -> AuditEntry {
    let reason = reason
        .filter(|r| !r.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Manually set to {classification}"));
    let entry = AuditRecorder::manual_override(conversation, classification, &reason);

    conversation.classification = classification;
    conversation.classification_method = ClassificationMethod::Manual;
    conversation.classification_reason = reason;
    conversation.confidence = 1.0;
    conversation.updated_at = Utc::now();

    entry
}

/// Exclude (`true`) or include (`false`) a conversation. Classification is
/// left untouched.
pub fn set_excluded(conversation: &mut Conversation, excluded: bool) -> AuditEntry {
    let reason = if excluded {
        "Excluded from business workflows"
    } else {
        "Included in business workflows"
    };
    let entry = AuditRecorder::exclusion(conversation, excluded, reason);

    conversation.is_excluded = excluded;
    conversation.updated_at = Utc::now();

    entry
}
