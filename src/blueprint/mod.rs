//! Blueprint generation
//!
//! Everything between "a list of papers" and "a validated set of startup
//! ideas": the prompt contract sent to the generation service, best-effort
//! JSON extraction from raw model output, strict structural validation, and
//! the model-fallback orchestrator that ties them together.

use serde::{Deserialize, Serialize};

use crate::rubric::Category;

pub mod extract;
pub mod generator;
pub mod prompt;
pub mod validate;

/// Paper substructure echoed back by the model inside each idea.
///
/// Every field is best-effort: the model copies what it was given, and the
/// validator deliberately does not check this block, so nothing here may be
/// required for deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PaperInfo {
    pub title: String,
    pub url: String,
    pub authors: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub arxiv_id: Option<String>,
    pub published_at: Option<String>,
    pub primary_category: Option<String>,
}

/// The four rubric dimensions, each judged 0-10 by the model.
///
/// Stored as f64 because the validator accepts any JSON number; the rubric
/// decides how fractional values are totaled. Missing dimensions default
/// to 0 rather than failing deserialization.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoreSet {
    pub demand_urgency: f64,
    pub pricing_power: f64,
    pub distribution_ease: f64,
    pub speed_to_mvp: f64,
}

/// One generated startup idea.
///
/// Created from a validated payload; `category` and `total_score` are
/// attached once by the rubric and the record is immutable afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct IdeaCandidate {
    pub startup_name: String,
    pub value_proposition: String,
    pub why_this_paper: String,
    pub technical_core: String,
    pub implementation: String,
    pub tech_stack: Vec<String>,
    pub resume_bullets: Vec<String>,
    pub paper: PaperInfo,
    pub scores: ScoreSet,

    /// Derived by the rubric after generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    /// Derived by the rubric after generation; matches the clamped total
    /// used to select `category`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_score: Option<i64>,
}

/// Terminal artifact of one orchestration run. Either fully valid (built
/// from an accepted payload) or the run reported failure, never partial.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationResult {
    pub research_themes: Vec<String>,
    pub ideas: Vec<IdeaCandidate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_payload() {
        let raw = r#"{
            "researchThemes": ["agents", "rag", "slm"],
            "ideas": [{
                "startupName": "RouteLab",
                "valueProposition": "One. Two.",
                "whyThisPaper": "Because.",
                "technicalCore": "sparse routing",
                "implementation": "serve it",
                "techStack": ["rust", "tokio", "sqlite", "tracing", "reqwest"],
                "resumeBullets": ["a", "b", "c"],
                "paper": {"title": "T", "url": "U", "arxivId": "2601.01234"},
                "scores": {"demand_urgency": 7, "pricing_power": 6,
                           "distribution_ease": 7, "speed_to_mvp": 6}
            }]
        }"#;

        let result: GenerationResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.research_themes.len(), 3);
        assert_eq!(result.ideas.len(), 1);

        let idea = &result.ideas[0];
        assert_eq!(idea.startup_name, "RouteLab");
        assert_eq!(idea.scores.demand_urgency, 7.0);
        assert_eq!(idea.paper.arxiv_id.as_deref(), Some("2601.01234"));
        assert_eq!(idea.category, None);
        assert_eq!(idea.total_score, None);
    }

    #[test]
    fn tolerates_missing_optional_fields() {
        let raw = r#"{
            "researchThemes": ["a", "b", "c"],
            "ideas": [{
                "startupName": "Bare",
                "scores": {"demand_urgency": 1, "pricing_power": 1,
                           "distribution_ease": 1, "speed_to_mvp": 1}
            }]
        }"#;

        let result: GenerationResult = serde_json::from_str(raw).unwrap();
        let idea = &result.ideas[0];
        assert_eq!(idea.startup_name, "Bare");
        assert!(idea.value_proposition.is_empty());
        assert!(idea.tech_stack.is_empty());
        assert_eq!(idea.paper, PaperInfo::default());
    }

    #[test]
    fn missing_score_dimension_defaults_to_zero() {
        let scores: ScoreSet = serde_json::from_str(r#"{"demand_urgency": 5}"#).unwrap();
        assert_eq!(scores.demand_urgency, 5.0);
        assert_eq!(scores.pricing_power, 0.0);
        assert_eq!(scores.distribution_ease, 0.0);
        assert_eq!(scores.speed_to_mvp, 0.0);
    }
}
