//! Domain records shared by the classification pipeline.
//!
//! `Conversation`, `FilterRule` and `AuditEntry` mirror the persisted rows owned
//! by the calling service. `ClassificationResult` is ephemeral and only lives
//! between the engine and whoever writes it back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Professional,
    Personal,
    #[default]
    Unclassified,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Professional => "professional",
            Classification::Personal => "personal",
            Classification::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMethod {
    #[default]
    Auto,
    Manual,
    Rule,
}

impl ClassificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationMethod::Auto => "auto",
            ClassificationMethod::Manual => "manual",
            ClassificationMethod::Rule => "rule",
        }
    }
}

impl fmt::Display for ClassificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One thread between the platform user and a single external participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub lead_id: Option<Uuid>,
    pub thread_id: String,
    #[serde(default)]
    pub participant_name: String,
    #[serde(default)]
    pub participant_profile_url: Option<String>,
    #[serde(default)]
    pub classification: Classification,
    #[serde(default)]
    pub classification_method: ClassificationMethod,
    #[serde(default)]
    pub classification_reason: String,
    #[serde(default)]
    pub confidence: f64,
    /// Hides the thread from business workflows regardless of classification.
    #[serde(default)]
    pub is_excluded: bool,
    #[serde(default)]
    pub last_message_preview: Option<String>,
    #[serde(default)]
    pub last_message_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// A freshly synced thread: unclassified, not excluded.
    pub fn new(user_id: Uuid, thread_id: &str, participant_name: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            lead_id: None,
            thread_id: thread_id.to_string(),
            participant_name: participant_name.to_string(),
            participant_profile_url: None,
            classification: Classification::Unclassified,
            classification_method: ClassificationMethod::Auto,
            classification_reason: String::new(),
            confidence: 0.0,
            is_excluded: false,
            last_message_preview: None,
            last_message_at: None,
            metadata: serde_json::Map::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_preview(mut self, preview: &str) -> Self {
        self.last_message_preview = Some(preview.to_string());
        self.last_message_at = Some(Utc::now());
        self
    }

    pub fn with_profile_url(mut self, url: &str) -> Self {
        self.participant_profile_url = Some(url.to_string());
        self
    }

    pub fn message_text(&self) -> &str {
        self.last_message_preview.as_deref().unwrap_or("")
    }

    pub fn profile_url(&self) -> &str {
        self.participant_profile_url.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    Keyword,
    Participant,
    Relationship,
    Pattern,
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Keyword => "keyword",
            RuleType::Participant => "participant",
            RuleType::Relationship => "relationship",
            RuleType::Pattern => "pattern",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-authored override. Lower `priority` is evaluated first; rules with
/// equal priority keep the order they were supplied in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRule {
    pub id: Uuid,
    pub user_id: Uuid,
    pub rule_type: RuleType,
    pub rule_value: String,
    pub target_classification: Classification,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub priority: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl FilterRule {
    pub fn new(
        user_id: Uuid,
        rule_type: RuleType,
        rule_value: &str,
        target_classification: Classification,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            rule_type,
            rule_value: rule_value.to_string(),
            target_classification,
            is_active: true,
            priority: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Classified,
    Reclassified,
    Excluded,
    Included,
    RuleCreated,
    RuleDeleted,
}

/// Immutable record of one transition. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub conversation_id: Option<Uuid>,
    pub action: AuditAction,
    pub previous_classification: Option<Classification>,
    pub new_classification: Option<Classification>,
    pub method: Option<ClassificationMethod>,
    pub reason: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Read-only view of a sales lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
}

impl Lead {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            company: None,
            profile_url: None,
        }
    }

    pub fn with_company(mut self, company: &str) -> Self {
        self.company = Some(company.to_string());
        self
    }

    pub fn with_profile_url(mut self, url: &str) -> Self {
        self.profile_url = Some(url.to_string());
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// The engine's verdict for one conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub classification: Classification,
    pub confidence: f64,
    pub reasons: Vec<String>,
    pub method: ClassificationMethod,
    #[serde(default)]
    pub professional_score: f64,
    #[serde(default)]
    pub personal_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_lead_id: Option<Uuid>,
}

impl ClassificationResult {
    pub fn reason_text(&self) -> String {
        self.reasons.join("; ")
    }
}
