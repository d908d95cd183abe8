//! Bulk classification.
//!
//! Items are independent: each conversation is classified against the same
//! immutable engine snapshot, so the parallel path produces exactly what the
//! sequential one does.

use crate::classifier::ClassificationEngine;
use crate::lifecycle;
use crate::models::{
    AuditEntry, Classification, ClassificationMethod, ClassificationResult, Conversation,
};
use std::collections::HashMap;
use std::thread;
use uuid::Uuid;

pub struct BatchClassifier<'a> {
    engine: &'a ClassificationEngine,
}

impl<'a> BatchClassifier<'a> {
    pub fn new(engine: &'a ClassificationEngine) -> Self {
        Self { engine }
    }

    pub fn classify_all(
        &self,
        conversations: &[Conversation],
    ) -> HashMap<Uuid, ClassificationResult> {
        conversations
            .iter()
            .map(|c| (c.id, self.engine.classify(c)))
            .collect()
    }

    /// Same output as `classify_all`, spread across up to `workers` threads.
    pub fn classify_parallel(
        &self,
        conversations: &[Conversation],
        workers: usize,
    ) -> HashMap<Uuid, ClassificationResult> {
        let workers = workers.max(1);
        if workers == 1 || conversations.len() < 2 {
            return self.classify_all(conversations);
        }

        let chunk_size = conversations.len().div_ceil(workers);
        thread::scope(|scope| {
            let handles: Vec<_> = conversations
                .chunks(chunk_size)
                .map(|chunk| scope.spawn(move || self.classify_all(chunk)))
                .collect();

            let mut results = HashMap::with_capacity(conversations.len());
            for handle in handles {
                match handle.join() {
                    Ok(partial) => results.extend(partial),
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
            results
        })
    }

    /// Re-run the engine over conversations still awaiting a decision
    /// (unclassified and not set by hand). Results that differ from the stored
    /// state are written back, each with one audit entry; unchanged results
    /// leave the conversation and the audit log alone.
    pub fn reclassify_ambiguous(&self, conversations: &mut [Conversation]) -> Vec<AuditEntry> {
        let mut entries = Vec::new();
        let mut evaluated = 0;
        let mut resolved = 0;

        for conversation in conversations.iter_mut().filter(|c| is_ambiguous(c)) {
            evaluated += 1;
            let result = self.engine.classify(conversation);
            if !changes_state(conversation, &result) {
                continue;
            }
            if result.classification != Classification::Unclassified {
                resolved += 1;
            }
            entries.push(lifecycle::apply_result(conversation, &result));
        }

        log::info!(
            "Re-evaluated {} ambiguous conversations: {} updated, {} resolved",
            evaluated,
            entries.len(),
            resolved
        );
        entries
    }
}

fn changes_state(conversation: &Conversation, result: &ClassificationResult) -> bool {
    conversation.classification != result.classification
        || conversation.classification_method != result.method
        || conversation.confidence != result.confidence
}

fn is_ambiguous(conversation: &Conversation) -> bool {
    conversation.classification == Classification::Unclassified
        && conversation.classification_method != ClassificationMethod::Manual
}
