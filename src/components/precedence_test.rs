//! End-to-end behaviour of the full pipeline: rule precedence, threshold
//! gating, lead boosts and the audit trail produced by applying results.

use crate::batch::BatchClassifier;
use crate::classifier::ClassificationEngine;
use crate::heuristic_config::ClassifierConfig;
use crate::lifecycle::{apply_result, manual_override, set_excluded};
use crate::models::{
    AuditAction, Classification, ClassificationMethod, Conversation, FilterRule, Lead, RuleType,
};
use uuid::Uuid;

fn user() -> Uuid {
    Uuid::from_u128(0x42)
}

fn rule(rule_type: RuleType, value: &str, target: Classification) -> FilterRule {
    FilterRule::new(user(), rule_type, value, target)
}

fn thread(name: &str, preview: &str) -> Conversation {
    Conversation::new(user(), "thread", name).with_preview(preview)
}

#[test]
fn test_identical_inputs_give_identical_results() {
    let rules = [rule(RuleType::Pattern, r"\bdeal\b", Classification::Professional)];
    let leads = vec![Lead::new("Jane", "Doe")];
    let engine = ClassificationEngine::with_defaults(&rules, leads);
    let conversation = thread("Jane Doe", "happy birthday! also the invoice");

    assert_eq!(engine.classify(&conversation), engine.classify(&conversation));
}

#[test]
fn test_rule_overrides_heuristics() {
    let rules = [rule(RuleType::Keyword, "lunch plans", Classification::Personal)];
    let engine = ClassificationEngine::with_defaults(&rules, Vec::new());
    let conversation = thread(
        "Sam Lee",
        "let's discuss the Q4 supply chain lunch plans review",
    );

    let result = engine.classify(&conversation);
    assert_eq!(result.classification, Classification::Personal);
    assert_eq!(result.method, ClassificationMethod::Rule);
    assert_eq!(result.confidence, 0.95);

    // Without the rule the professional terms outweigh the personal one.
    let heuristic = ClassificationEngine::with_defaults(&[], Vec::new()).classify(&conversation);
    assert!(heuristic.professional_score > heuristic.personal_score);
    assert_ne!(heuristic.classification, Classification::Personal);
}

#[test]
fn test_first_matching_rule_decides() {
    let rules = [
        rule(RuleType::Keyword, "review", Classification::Professional),
        rule(RuleType::Keyword, "review", Classification::Personal),
    ];
    let engine = ClassificationEngine::with_defaults(&rules, Vec::new());
    let result = engine.classify(&thread("Sam Lee", "quick review?"));
    assert_eq!(result.classification, Classification::Professional);
    assert_eq!(result.rule_id, Some(rules[0].id));
}

#[test]
fn test_equal_scores_stay_unclassified() {
    let engine = ClassificationEngine::with_defaults(&[], Vec::new());
    let result = engine.classify(&thread("Sam Lee", "happy birthday! also the invoice"));
    assert_eq!(result.classification, Classification::Unclassified);
    assert_eq!(result.confidence, 0.5);
    assert_eq!(result.method, ClassificationMethod::Auto);
    assert!(result
        .reasons
        .iter()
        .any(|r| r.contains("needs manual review")));
}

#[test]
fn test_total_score_threshold_boundary() {
    let engine = ClassificationEngine::with_defaults(&[], Vec::new());
    let at_threshold = engine.classify(&thread("Sam Lee", "pricing and contract"));
    assert_eq!(at_threshold.classification, Classification::Professional);
    assert_eq!(at_threshold.confidence, 1.0);

    let mut config = ClassifierConfig::default();
    config.scoring.phrase_weight = 0.145;
    let engine = ClassificationEngine::new(&config, &[], Vec::new());
    let below = engine.classify(&thread("Sam Lee", "pricing and contract"));
    assert_eq!(below.classification, Classification::Unclassified);
    assert_eq!(below.confidence, 1.0);
}

#[test]
fn test_single_hit_is_not_enough() {
    let engine = ClassificationEngine::with_defaults(&[], Vec::new());
    let result = engine.classify(&thread("Sam Lee", "see the proposal"));
    assert_eq!(result.classification, Classification::Unclassified);
    assert_eq!(result.confidence, 1.0);
}

#[test]
fn test_lead_match_alone_classifies_professional() {
    let leads = vec![
        Lead::new("Jane", "Doe").with_company("Acme"),
        Lead::new("Robert", "Paulson").with_profile_url("https://linkedin.com/in/bob/"),
    ];
    let engine = ClassificationEngine::with_defaults(&[], leads);

    let by_name = engine.classify(&Conversation::new(user(), "t1", "Jane Doe"));
    assert_eq!(by_name.classification, Classification::Professional);
    assert_eq!(by_name.confidence, 1.0);
    assert_eq!(by_name.professional_score, 0.4);
    assert_eq!(by_name.reasons, vec!["Matches known lead: Jane Doe (Acme)"]);

    let by_url = engine.classify(
        &Conversation::new(user(), "t2", "Bob").with_profile_url("https://LinkedIn.com/in/bob"),
    );
    assert_eq!(by_url.classification, Classification::Professional);
}

#[test]
fn test_malformed_pattern_never_blocks_classification() {
    let rules = [rule(RuleType::Pattern, "(?P<broken", Classification::Personal)];
    let engine = ClassificationEngine::with_defaults(&rules, Vec::new());
    let result = engine.classify(&thread("Sam Lee", "pricing and contract"));
    assert_eq!(result.classification, Classification::Professional);
    assert_eq!(result.method, ClassificationMethod::Auto);
}

#[test]
fn test_rule_targeting_unclassified_forces_review() {
    let rules = [rule(RuleType::Keyword, "contract", Classification::Unclassified)];
    let engine = ClassificationEngine::with_defaults(&rules, Vec::new());
    let result = engine.classify(&thread("Sam Lee", "pricing and contract"));
    assert_eq!(result.classification, Classification::Unclassified);
    assert_eq!(result.method, ClassificationMethod::Rule);
}

#[test]
fn test_each_transition_writes_one_audit_entry() {
    let engine = ClassificationEngine::with_defaults(&[], Vec::new());
    let mut conversation = thread("Sam Lee", "pricing and contract");
    let mut log = Vec::new();

    let result = engine.classify(&conversation);
    log.push(apply_result(&mut conversation, &result));
    log.push(manual_override(&mut conversation, Classification::Personal, None));
    log.push(set_excluded(&mut conversation, true));
    log.push(set_excluded(&mut conversation, false));

    let actions: Vec<AuditAction> = log.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::Classified,
            AuditAction::Reclassified,
            AuditAction::Excluded,
            AuditAction::Included,
        ]
    );
    assert_eq!(log[0].previous_classification, Some(Classification::Unclassified));
    assert_eq!(log[0].new_classification, Some(Classification::Professional));
    assert_eq!(log[1].previous_classification, Some(Classification::Professional));
    assert_eq!(log[1].new_classification, Some(Classification::Personal));
    assert_eq!(log[2].new_classification, Some(Classification::Personal));
    assert!(log.iter().all(|e| e.conversation_id == Some(conversation.id)));
}

#[test]
fn test_batch_rerun_is_idempotent() {
    let rules = [rule(RuleType::Participant, "mom", Classification::Personal)];
    let engine = ClassificationEngine::with_defaults(&rules, vec![Lead::new("Jane", "Doe")]);
    let conversations = vec![
        thread("Mom", "call me"),
        thread("Jane Doe", "hi"),
        thread("Sam Lee", "hey"),
    ];

    let batch = BatchClassifier::new(&engine);
    let first = batch.classify_all(&conversations);
    let second = batch.classify_all(&conversations);
    assert_eq!(first, second);
    assert_eq!(first[&conversations[0].id].method, ClassificationMethod::Rule);
    assert_eq!(first[&conversations[1].id].classification, Classification::Professional);
    assert_eq!(first[&conversations[2].id].classification, Classification::Unclassified);
}
