//! Result aggregation and winner selection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{OptimlyError, Result};
use crate::simulation::{LlmModel, SimulationResult};

/// Groups results by model. Within a group, input order is kept.
pub fn group_by_model(results: &[SimulationResult]) -> BTreeMap<LlmModel, Vec<SimulationResult>> {
    let mut groups: BTreeMap<LlmModel, Vec<SimulationResult>> = BTreeMap::new();
    for result in results {
        groups.entry(result.model).or_default().push(result.clone());
    }
    groups
}

/// The user's chosen winning result per model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelWinners {
    winners: BTreeMap<LlmModel, String>,
}

impl ModelWinners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `result_id` as the winner for `model`, replacing any earlier
    /// choice. The result must be one of `model`'s results.
    pub fn select(
        &mut self,
        model: LlmModel,
        result_id: &str,
        results: &[SimulationResult],
    ) -> Result<()> {
        let belongs = results
            .iter()
            .any(|r| r.model == model && r.id == result_id);
        if !belongs {
            return Err(OptimlyError::InvalidWinnerAssignment {
                model: model.to_string(),
                result_id: result_id.to_string(),
            });
        }

        debug!(%model, result_id, "winner selected");
        self.winners.insert(model, result_id.to_string());
        Ok(())
    }

    pub fn get(&self, model: LlmModel) -> Option<&str> {
        self.winners.get(&model).map(String::as_str)
    }

    /// Winners in model order.
    pub fn iter(&self) -> impl Iterator<Item = (LlmModel, &str)> {
        self.winners.iter().map(|(m, id)| (*m, id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.winners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }
}

/// Variant id that won for the most models.
///
/// Ties go to the variant that entered the tally first.
pub fn winning_variant_overall(
    winners: &ModelWinners,
    results: &[SimulationResult],
) -> Option<String> {
    let mut tally: Vec<(&str, usize)> = Vec::new();
    for (_, result_id) in winners.iter() {
        let Some(result) = results.iter().find(|r| r.id == result_id) else {
            continue;
        };
        match tally.iter_mut().find(|(id, _)| *id == result.variant_id) {
            Some((_, count)) => *count += 1,
            None => tally.push((result.variant_id.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (variant_id, count) in tally {
        if best.is_none_or(|(_, max)| count > max) {
            best = Some((variant_id, count));
        }
    }
    best.map(|(variant_id, _)| variant_id.to_string())
}

/// Confidence gain of the winner over the control, in percentage points.
pub fn confidence_delta(
    winner: Option<&SimulationResult>,
    control: Option<&SimulationResult>,
) -> Option<i32> {
    match (winner, control) {
        (Some(w), Some(c)) => {
            Some(((w.confidence_score - c.confidence_score) * 100.0).round() as i32)
        }
        _ => None,
    }
}

/// Summary block sent along with exported winners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinnerSummary {
    pub total_models: usize,
    pub winners_selected: usize,
    pub avg_confidence: f64,
}

impl WinnerSummary {
    pub fn compute(winners: &ModelWinners, results: &[SimulationResult]) -> Self {
        let total_models = group_by_model(results).len();
        let confidences: Vec<f64> = winners
            .iter()
            .filter_map(|(_, id)| results.iter().find(|r| r.id == id))
            .map(|r| r.confidence_score)
            .collect();
        let avg_confidence = if confidences.is_empty() {
            0.0
        } else {
            confidences.iter().sum::<f64>() / confidences.len() as f64
        };

        Self {
            total_models,
            winners_selected: winners.len(),
            avg_confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Sentiment;

    fn result(id: &str, variant_id: &str, model: LlmModel, confidence: f64) -> SimulationResult {
        let mut r = SimulationResult::new(
            variant_id,
            model,
            true,
            "snippet",
            confidence,
            Sentiment::Positive,
            variant_id == "control",
        );
        r.id = id.to_string();
        r
    }

    fn fixture() -> Vec<SimulationResult> {
        vec![
            result("r1", "v1", LlmModel::ChatGpt, 0.9),
            result("r2", "v2", LlmModel::Perplexity, 0.7),
            result("r3", "v1", LlmModel::Gemini, 0.85),
            result("r4", "v2", LlmModel::ChatGpt, 0.6),
            result("r5", "v1", LlmModel::Perplexity, 0.75),
        ]
    }

    #[test]
    fn test_group_by_model_keeps_insertion_order() {
        let groups = group_by_model(&fixture());
        let chatgpt: Vec<&str> = groups[&LlmModel::ChatGpt]
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(chatgpt, vec!["r1", "r4"]);
        assert_eq!(groups[&LlmModel::Gemini].len(), 1);
        assert_eq!(groups.keys().count(), 3);
    }

    #[test]
    fn test_select_rejects_result_from_other_model() {
        let results = fixture();
        let mut winners = ModelWinners::new();

        let err = winners
            .select(LlmModel::Gemini, "r1", &results)
            .unwrap_err();
        assert_eq!(
            err,
            OptimlyError::InvalidWinnerAssignment {
                model: "gemini".into(),
                result_id: "r1".into()
            }
        );
        assert!(winners.is_empty());
    }

    #[test]
    fn test_select_last_write_wins() {
        let results = fixture();
        let mut winners = ModelWinners::new();
        winners.select(LlmModel::ChatGpt, "r1", &results).unwrap();
        winners.select(LlmModel::ChatGpt, "r4", &results).unwrap();
        assert_eq!(winners.get(LlmModel::ChatGpt), Some("r4"));
        assert_eq!(winners.len(), 1);
    }

    #[test]
    fn test_overall_winner_by_count() {
        let results = vec![
            result("r1", "v1", LlmModel::ChatGpt, 0.9),
            result("r1g", "v1", LlmModel::Gemini, 0.9),
            result("r2", "v2", LlmModel::Perplexity, 0.7),
        ];
        let mut winners = ModelWinners::new();
        winners.select(LlmModel::ChatGpt, "r1", &results).unwrap();
        winners.select(LlmModel::Gemini, "r1g", &results).unwrap();
        winners.select(LlmModel::Perplexity, "r2", &results).unwrap();

        assert_eq!(
            winning_variant_overall(&winners, &results),
            Some("v1".to_string())
        );
    }

    #[test]
    fn test_overall_winner_tie_goes_to_first_tallied() {
        let results = fixture();
        let mut winners = ModelWinners::new();
        winners.select(LlmModel::ChatGpt, "r4", &results).unwrap();
        winners.select(LlmModel::Gemini, "r3", &results).unwrap();

        assert_eq!(
            winning_variant_overall(&winners, &results),
            Some("v2".to_string())
        );
        assert_eq!(winning_variant_overall(&ModelWinners::new(), &results), None);
    }

    #[test]
    fn test_confidence_delta_rounds() {
        let winner = result("w", "v1", LlmModel::ChatGpt, 0.876);
        let control = result("c", "control", LlmModel::ChatGpt, 0.62);
        assert_eq!(confidence_delta(Some(&winner), Some(&control)), Some(26));
        assert_eq!(confidence_delta(Some(&winner), None), None);
    }

    #[test]
    fn test_summary_averages_selected_winners() {
        let results = fixture();
        let mut winners = ModelWinners::new();
        winners.select(LlmModel::ChatGpt, "r1", &results).unwrap();
        winners.select(LlmModel::Perplexity, "r2", &results).unwrap();

        let summary = WinnerSummary::compute(&winners, &results);
        assert_eq!(summary.total_models, 3);
        assert_eq!(summary.winners_selected, 2);
        assert!((summary.avg_confidence - 0.8).abs() < 1e-9);
    }
}
