//! Phrase-dictionary scoring
//!
//! Every personal or professional phrase found in the message text or the
//! participant name adds a fixed weight to its side and one line of evidence.

use crate::components::{AnalysisComponent, ComponentResult, ScoringInput};
use crate::heuristic_config::{PhraseDictionaries, ScoringWeights};

pub struct ScoreModel {
    personal: Vec<String>,
    professional: Vec<String>,
    phrase_weight: f64,
}

impl ScoreModel {
    pub fn new(dictionaries: &PhraseDictionaries, weights: &ScoringWeights) -> Self {
        let normalize = |phrases: &[String]| -> Vec<String> {
            phrases
                .iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect()
        };

        Self {
            personal: normalize(&dictionaries.personal),
            professional: normalize(&dictionaries.professional),
            phrase_weight: weights.phrase_weight,
        }
    }

    /// Score already lower-cased text and participant name.
    /// Returns `(professional, personal, reasons)`.
    pub fn score(&self, text: &str, participant: &str) -> (f64, f64, Vec<String>) {
        let mut reasons = Vec::new();

        let personal = self.scan(&self.personal, text, participant, "Personal", &mut reasons);
        let professional = self.scan(
            &self.professional,
            text,
            participant,
            "Professional",
            &mut reasons,
        );

        (professional, personal, reasons)
    }

    fn scan(
        &self,
        phrases: &[String],
        text: &str,
        participant: &str,
        label: &str,
        reasons: &mut Vec<String>,
    ) -> f64 {
        let mut score = 0.0;
        for phrase in phrases {
            if text.contains(phrase.as_str()) || participant.contains(phrase.as_str()) {
                score += self.phrase_weight;
                reasons.push(format!("{label} indicator: \"{phrase}\""));
            }
        }
        score
    }
}

impl AnalysisComponent for ScoreModel {
    fn analyze(&self, input: &ScoringInput<'_>) -> ComponentResult {
        let (professional_score, personal_score, evidence) =
            self.score(&input.text, &input.participant);

        ComponentResult {
            component_name: self.name().to_string(),
            professional_score,
            personal_score,
            evidence,
            matched_lead_id: None,
        }
    }

    fn name(&self) -> &str {
        "ScoreModel"
    }

    fn priority(&self) -> u8 {
        10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ScoreModel {
        ScoreModel::new(&PhraseDictionaries::default(), &ScoringWeights::default())
    }

    #[test]
    fn test_counts_each_phrase_once() {
        let (professional, personal, reasons) =
            model().score("meeting about the meeting agenda", "jane doe");
        assert_eq!(professional, 0.15);
        assert_eq!(personal, 0.0);
        assert_eq!(reasons, vec!["Professional indicator: \"meeting\"".to_string()]);
    }

    #[test]
    fn test_scores_both_dictionaries() {
        let (professional, personal, reasons) =
            model().score("happy birthday! also, can you send the invoice?", "jane doe");
        assert_eq!(professional, 0.15);
        assert_eq!(personal, 0.15);
        // personal reasons come first
        assert!(reasons[0].starts_with("Personal indicator"));
        assert!(reasons[1].starts_with("Professional indicator"));
    }

    #[test]
    fn test_participant_name_is_scanned() {
        let (professional, _, reasons) = model().score("", "acme procurement team");
        assert_eq!(professional, 0.15);
        assert_eq!(reasons.len(), 1);
    }

    #[test]
    fn test_empty_input_has_no_hits() {
        let (professional, personal, reasons) = model().score("", "");
        assert_eq!(professional, 0.0);
        assert_eq!(personal, 0.0);
        assert!(reasons.is_empty());
    }

    #[test]
    fn test_custom_dictionary_is_normalized() {
        let dictionaries = PhraseDictionaries {
            personal: vec!["  Grandma ".to_string()],
            professional: vec!["RFP".to_string()],
        };
        let model = ScoreModel::new(&dictionaries, &ScoringWeights::default());
        let (professional, personal, _) = model.score("grandma says hi, rfp attached", "");
        assert_eq!(professional, 0.15);
        assert_eq!(personal, 0.15);
    }
}
