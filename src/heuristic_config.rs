use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const DEFAULT_PERSONAL_PHRASES: &[&str] = &[
    "mom",
    "dad",
    "family",
    "birthday",
    "wedding",
    "vacation",
    "weekend plans",
    "dinner",
    "lunch plans",
    "party",
    "kids",
    "love you",
    "miss you",
    "happy holidays",
    "hey buddy",
    "what's up",
    "how have you been",
    "long time no see",
    "congrats on the baby",
    "see you soon",
];

const DEFAULT_PROFESSIONAL_PHRASES: &[&str] = &[
    "meeting",
    "proposal",
    "pricing",
    "contract",
    "demo",
    "quote",
    "invoice",
    "partnership",
    "budget",
    "roadmap",
    "q1",
    "q2",
    "q3",
    "q4",
    "supply chain",
    "procurement",
    "enterprise",
    "saas",
    "revenue",
    "opportunity",
    "schedule a call",
    "follow up",
    "your company",
    "decision maker",
    "solution",
];

/// Tunable knobs for the heuristic and rule layers. Immutable once an engine
/// has been built from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub thresholds: DecisionThresholds,
    #[serde(default)]
    pub scoring: ScoringWeights,
    #[serde(default)]
    pub rule_confidence: RuleConfidence,
    #[serde(default)]
    pub dictionaries: PhraseDictionaries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecisionThresholds {
    pub min_confidence: f64,
    pub min_total_score: f64,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            min_confidence: 0.70,
            min_total_score: 0.30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringWeights {
    pub phrase_weight: f64, // per dictionary hit
    pub lead_boost: f64,    // added to the professional score on a roster match
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            phrase_weight: 0.15,
            lead_boost: 0.4,
        }
    }
}

/// Fixed confidence reported when a rule of the given type fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfidence {
    pub keyword: f64,
    pub participant: f64,
    pub relationship: f64,
    pub pattern: f64,
}

impl Default for RuleConfidence {
    fn default() -> Self {
        Self {
            keyword: 0.95,
            participant: 0.95,
            relationship: 0.90,
            pattern: 0.90,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhraseDictionaries {
    pub personal: Vec<String>,
    pub professional: Vec<String>,
}

impl Default for PhraseDictionaries {
    fn default() -> Self {
        Self {
            personal: DEFAULT_PERSONAL_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            professional: DEFAULT_PROFESSIONAL_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl ClassifierConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: ClassifierConfig =
            serde_yaml::from_str(content).context("Failed to parse classifier config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read classifier config: {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Invalid classifier config: {}", path.display()))?;
        log::info!(
            "Loaded classifier config from {} ({} personal, {} professional phrases)",
            path.display(),
            config.dictionaries.personal.len(),
            config.dictionaries.professional.len()
        );
        Ok(config)
    }

    /// Load from `path` when given, falling back to the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load(path).unwrap_or_else(|e| {
                log::warn!("Failed to load classifier config, using defaults: {e:#}");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize classifier config")
    }

    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, value: f64| -> Result<()> {
            if !(0.0..=1.0).contains(&value) {
                bail!("{name} must be within [0, 1], got {value}");
            }
            Ok(())
        };

        unit("thresholds.min_confidence", self.thresholds.min_confidence)?;
        unit("rule_confidence.keyword", self.rule_confidence.keyword)?;
        unit("rule_confidence.participant", self.rule_confidence.participant)?;
        unit("rule_confidence.relationship", self.rule_confidence.relationship)?;
        unit("rule_confidence.pattern", self.rule_confidence.pattern)?;

        if self.thresholds.min_total_score < 0.0 {
            bail!(
                "thresholds.min_total_score must not be negative, got {}",
                self.thresholds.min_total_score
            );
        }
        if self.scoring.phrase_weight <= 0.0 {
            bail!("scoring.phrase_weight must be positive");
        }
        if self.scoring.lead_boost < 0.0 {
            bail!("scoring.lead_boost must not be negative");
        }
        if self.dictionaries.personal.is_empty() || self.dictionaries.professional.is_empty() {
            bail!("both phrase dictionaries must contain at least one phrase");
        }
        if let Some(blank) = self
            .dictionaries
            .personal
            .iter()
            .chain(&self.dictionaries.professional)
            .find(|p| p.trim().is_empty())
        {
            bail!("phrase dictionaries must not contain blank entries ({blank:?})");
        }
        Ok(())
    }
}
