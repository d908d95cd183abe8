pub mod audit;
pub mod batch;
pub mod classifier;
pub mod components;
pub mod heuristic_config;
pub mod lifecycle;
pub mod models;
pub mod rules;
pub mod statistics;

pub use audit::AuditRecorder;
pub use batch::BatchClassifier;
pub use classifier::ClassificationEngine;
pub use heuristic_config::ClassifierConfig;
pub use models::{
    AuditAction, AuditEntry, Classification, ClassificationMethod, ClassificationResult,
    Conversation, FilterRule, Lead, RuleType,
};
pub use rules::RuleBook;
pub use statistics::ClassificationStats;
