//! Simulated assistant answers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// AI assistants whose answers are simulated.
///
/// Variant order is the display order used everywhere results are grouped.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LlmModel {
    ChatGpt,
    Gemini,
    Perplexity,
}

impl LlmModel {
    /// Human-readable product name.
    pub fn display_name(&self) -> &'static str {
        match self {
            LlmModel::ChatGpt => "ChatGPT",
            LlmModel::Gemini => "Gemini",
            LlmModel::Perplexity => "Perplexity",
        }
    }
}

/// Tone of a simulated answer toward the brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// One simulated answer from one model for one content variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub id: String,
    pub variant_id: String,
    pub model: LlmModel,
    pub brand_cited: bool,
    pub snippet: String,
    pub timestamp: DateTime<Utc>,
    /// Confidence in `[0, 1]`
    pub confidence_score: f64,
    pub sentiment: Sentiment,
    #[serde(default)]
    pub is_control: bool,
}

impl SimulationResult {
    /// Builds a result with a fresh id and the current timestamp.
    pub fn new(
        variant_id: impl Into<String>,
        model: LlmModel,
        brand_cited: bool,
        snippet: impl Into<String>,
        confidence_score: f64,
        sentiment: Sentiment,
        is_control: bool,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            variant_id: variant_id.into(),
            model,
            brand_cited,
            snippet: snippet.into(),
            timestamp: Utc::now(),
            confidence_score: confidence_score.clamp(0.0, 1.0),
            sentiment,
            is_control,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_model_wire_names() {
        let names: Vec<String> = LlmModel::iter().map(|m| m.to_string()).collect();
        assert_eq!(names, vec!["chatgpt", "gemini", "perplexity"]);
        assert_eq!(LlmModel::from_str("gemini").unwrap(), LlmModel::Gemini);
        assert_eq!(
            serde_json::to_string(&LlmModel::ChatGpt).unwrap(),
            "\"chatgpt\""
        );
    }

    #[test]
    fn test_confidence_is_clamped() {
        let result = SimulationResult::new(
            "v1",
            LlmModel::Perplexity,
            true,
            "snippet",
            1.4,
            Sentiment::Positive,
            false,
        );
        assert_eq!(result.confidence_score, 1.0);
        assert!(!result.id.is_empty());
    }
}
