//! Lead cross-referencing
//!
//! Looks the participant up in the user's lead roster, by name containment or
//! by normalized profile URL. A hit boosts the professional score.

use crate::components::{AnalysisComponent, ComponentResult, ScoringInput};
use crate::heuristic_config::ScoringWeights;
use crate::models::Lead;
use std::collections::HashMap;

/// Strip trailing slashes and case-fold a profile URL.
pub fn normalize_profile_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_lowercase()
}

/// Pre-indexed lead roster. Lookups always return the lead with the lowest
/// roster index among all matches.
pub struct LeadRoster {
    leads: Vec<Lead>,
    names: Vec<String>,
    url_index: HashMap<String, usize>,
}

impl LeadRoster {
    pub fn new(leads: Vec<Lead>) -> Self {
        let names = leads.iter().map(|l| l.full_name().to_lowercase()).collect();

        let mut url_index = HashMap::new();
        for (idx, lead) in leads.iter().enumerate() {
            if let Some(url) = lead.profile_url.as_deref() {
                let normalized = normalize_profile_url(url);
                if !normalized.is_empty() {
                    url_index.entry(normalized).or_insert(idx);
                }
            }
        }

        Self {
            leads,
            names,
            url_index,
        }
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    /// `participant` must already be lower-cased.
    pub fn find(&self, participant: &str, profile_url: &str) -> Option<&Lead> {
        let participant = participant.trim();
        let normalized_url = normalize_profile_url(profile_url);

        let url_hit = if normalized_url.is_empty() {
            None
        } else {
            self.url_index.get(&normalized_url).copied()
        };

        // Only names ahead of the URL hit can win.
        let limit = url_hit.unwrap_or(self.names.len());
        let name_hit = if participant.is_empty() {
            None
        } else {
            self.names[..limit].iter().position(|name| {
                !name.is_empty()
                    && (participant.contains(name.as_str()) || name.contains(participant))
            })
        };

        name_hit.or(url_hit).map(|idx| &self.leads[idx])
    }
}

pub struct LeadMatcher {
    roster: LeadRoster,
    lead_boost: f64,
}

impl LeadMatcher {
    pub fn new(roster: LeadRoster, weights: &ScoringWeights) -> Self {
        Self {
            roster,
            lead_boost: weights.lead_boost,
        }
    }
}

impl AnalysisComponent for LeadMatcher {
    fn analyze(&self, input: &ScoringInput<'_>) -> ComponentResult {
        let Some(lead) = self
            .roster
            .find(&input.participant, input.conversation.profile_url())
        else {
            return ComponentResult::empty(self.name());
        };

        let reason = match lead.company.as_deref().filter(|c| !c.trim().is_empty()) {
            Some(company) => format!("Matches known lead: {} ({})", lead.full_name(), company),
            None => format!("Matches known lead: {}", lead.full_name()),
        };
        log::debug!(
            "Conversation {} matched lead {} ({})",
            input.conversation.id,
            lead.id,
            lead.full_name()
        );

        ComponentResult {
            component_name: self.name().to_string(),
            professional_score: self.lead_boost,
            personal_score: 0.0,
            evidence: vec![reason],
            matched_lead_id: Some(lead.id),
        }
    }

    fn name(&self) -> &str {
        "LeadMatcher"
    }

    fn priority(&self) -> u8 {
        20
    }
}
