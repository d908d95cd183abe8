//! Per-user rule management.
//!
//! `RuleBook` holds one user's rules and hands out ordered snapshots for the
//! engine. Every mutation produces the matching audit entry; callers are
//! expected to rebuild the engine and re-run ambiguous conversations after a
//! mutation.

use crate::audit::AuditRecorder;
use crate::models::{AuditEntry, Classification, FilterRule, RuleType};
use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    user_id: Uuid,
    rules: Vec<FilterRule>,
}

impl RuleBook {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            rules: Vec::new(),
        }
    }

    /// Load existing rows. Rules owned by another user are rejected.
    pub fn from_rules(user_id: Uuid, rules: Vec<FilterRule>) -> Result<Self> {
        if let Some(foreign) = rules.iter().find(|r| r.user_id != user_id) {
            bail!(
                "Rule {} belongs to user {}, not {}",
                foreign.id,
                foreign.user_id,
                user_id
            );
        }
        Ok(Self { user_id, rules })
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn create_rule(
        &mut self,
        rule_type: RuleType,
        rule_value: &str,
        target: Classification,
        priority: i32,
    ) -> Result<(FilterRule, AuditEntry)> {
        if rule_value.trim().is_empty() {
            bail!("Rule value must not be empty");
        }

        let rule = FilterRule::new(self.user_id, rule_type, rule_value, target)
            .with_priority(priority);
        let entry = AuditRecorder::rule_created(&rule);
        log::info!(
            "Created {} rule {} for user {} -> {}",
            rule.rule_type,
            rule.id,
            self.user_id,
            target
        );

        self.rules.push(rule.clone());
        Ok((rule, entry))
    }

    /// All rules, active or not, in evaluation order.
    pub fn list(&self) -> Vec<FilterRule> {
        let mut rules = self.rules.clone();
        rules.sort_by_key(|r| r.priority);
        rules
    }

    /// Active rules only, in evaluation order.
    pub fn snapshot(&self) -> Vec<FilterRule> {
        self.list().into_iter().filter(|r| r.is_active).collect()
    }

    pub fn get(&self, rule_id: Uuid) -> Option<&FilterRule> {
        self.rules.iter().find(|r| r.id == rule_id)
    }

    /// Keep the row but take it out of evaluation.
    pub fn deactivate(&mut self, rule_id: Uuid) -> Result<(FilterRule, AuditEntry)> {
        let rule = self.set_active(rule_id, false)?.clone();
        let entry = AuditRecorder::rule_deactivated(&rule);
        log::info!("Deactivated rule {} for user {}", rule.id, self.user_id);
        Ok((rule, entry))
    }

    pub fn activate(&mut self, rule_id: Uuid) -> Result<(FilterRule, AuditEntry)> {
        let rule = self.set_active(rule_id, true)?.clone();
        let entry = AuditRecorder::rule_activated(&rule);
        log::info!("Activated rule {} for user {}", rule.id, self.user_id);
        Ok((rule, entry))
    }

    pub fn delete(&mut self, rule_id: Uuid) -> Result<(FilterRule, AuditEntry)> {
        let idx = self
            .rules
            .iter()
            .position(|r| r.id == rule_id)
            .ok_or_else(|| anyhow!("Rule {rule_id} not found"))?;

        let rule = self.rules.remove(idx);
        let entry = AuditRecorder::rule_deleted(&rule);
        log::info!("Deleted rule {} for user {}", rule.id, self.user_id);
        Ok((rule, entry))
    }

    fn set_active(&mut self, rule_id: Uuid, active: bool) -> Result<&FilterRule> {
        let rule = self
            .rules
            .iter_mut()
            .find(|r| r.id == rule_id)
            .ok_or_else(|| anyhow!("Rule {rule_id} not found"))?;

        rule.is_active = active;
        rule.updated_at = Utc::now();
        Ok(&*rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
