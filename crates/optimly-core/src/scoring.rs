//! Scoring heuristics.
//!
//! Pure lookup functions that turn raw confidence and citation signals into
//! the tiers, percentages and positions shown to the user. Thresholds are
//! part of the product behaviour: the `>` vs `>=` choice at each boundary is
//! intentional and covered by tests.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::query::QueryResult;
use crate::simulation::SimulationResult;

/// Keywords that put content into the higher content-match band.
pub const CONTENT_MATCH_KEYWORDS: [&str; 4] = ["sustainable", "eco", "ethical", "organic"];

const KEYWORD_MATCH_RANGE: Range<u8> = 75..95;
const BASE_MATCH_RANGE: Range<u8> = 45..75;

/// Visibility bucket for a set of confidence scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum VisibilityTier {
    High,
    Medium,
    Low,
    Absent,
}

/// Where the brand appears inside a simulated answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MentionPosition {
    Top,
    Mid,
    Bottom,
    Omitted,
}

/// Maps the average of `scores` to a tier.
///
/// An empty slice has nothing to average and yields `Absent`.
pub fn visibility_tier(scores: &[f64]) -> VisibilityTier {
    if scores.is_empty() {
        return VisibilityTier::Absent;
    }
    let avg = scores.iter().sum::<f64>() / scores.len() as f64;

    if avg >= 0.7 {
        VisibilityTier::High
    } else if avg >= 0.4 {
        VisibilityTier::Medium
    } else if avg > 0.0 {
        VisibilityTier::Low
    } else {
        VisibilityTier::Absent
    }
}

/// Percentage shown for a variant's simulated answer.
pub fn derived_variant_score(result: &SimulationResult) -> u8 {
    if result.is_control {
        65
    } else if result.brand_cited && result.confidence_score > 0.8 {
        92
    } else if result.brand_cited && result.confidence_score > 0.6 {
        78
    } else if result.brand_cited {
        64
    } else {
        34
    }
}

pub fn brand_mention_position(result: &SimulationResult) -> MentionPosition {
    if !result.brand_cited {
        MentionPosition::Omitted
    } else if result.confidence_score > 0.8 {
        MentionPosition::Top
    } else if result.confidence_score > 0.6 {
        MentionPosition::Mid
    } else {
        MentionPosition::Bottom
    }
}

/// Whether the content mentions any of [`CONTENT_MATCH_KEYWORDS`], ignoring case.
pub fn has_match_keyword(content: &str) -> bool {
    let lower = content.to_lowercase();
    CONTENT_MATCH_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Half-open range a content-match score is drawn from.
pub fn content_match_range(content: &str) -> Range<u8> {
    if has_match_keyword(content) {
        KEYWORD_MATCH_RANGE
    } else {
        BASE_MATCH_RANGE
    }
}

/// Visibility summary for one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicVisibility {
    pub topic: String,
    pub query_count: usize,
    pub mentioned_count: usize,
    pub tier: VisibilityTier,
}

/// Groups query results by topic in first-seen order and tiers each topic.
///
/// A query where the brand was not mentioned contributes a score of zero.
pub fn topic_visibility(results: &[QueryResult]) -> Vec<TopicVisibility> {
    let mut topics: Vec<(&str, Vec<&QueryResult>)> = Vec::new();
    for result in results {
        match topics.iter_mut().find(|(topic, _)| *topic == result.topic) {
            Some((_, group)) => group.push(result),
            None => topics.push((result.topic.as_str(), vec![result])),
        }
    }

    topics
        .into_iter()
        .map(|(topic, group)| {
            let scores: Vec<f64> = group
                .iter()
                .map(|r| if r.mentioned { r.confidence_score } else { 0.0 })
                .collect();
            TopicVisibility {
                topic: topic.to_string(),
                query_count: group.len(),
                mentioned_count: group.iter().filter(|r| r.mentioned).count(),
                tier: visibility_tier(&scores),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{LlmModel, Sentiment};

    fn result(brand_cited: bool, confidence: f64, is_control: bool) -> SimulationResult {
        SimulationResult::new(
            "v1",
            LlmModel::ChatGpt,
            brand_cited,
            "snippet",
            confidence,
            Sentiment::Neutral,
            is_control,
        )
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(visibility_tier(&[0.9, 0.5]), VisibilityTier::High);
        assert_eq!(visibility_tier(&[0.7]), VisibilityTier::High);
        assert_eq!(visibility_tier(&[0.699999]), VisibilityTier::Medium);
        assert_eq!(visibility_tier(&[0.4]), VisibilityTier::Medium);
        assert_eq!(visibility_tier(&[0.399]), VisibilityTier::Low);
        assert_eq!(visibility_tier(&[0.01]), VisibilityTier::Low);
        assert_eq!(visibility_tier(&[0.0, 0.0]), VisibilityTier::Absent);
    }

    #[test]
    fn test_tier_of_empty_input_is_absent() {
        assert_eq!(visibility_tier(&[]), VisibilityTier::Absent);
    }

    #[test]
    fn test_control_short_circuits_derived_score() {
        assert_eq!(derived_variant_score(&result(true, 0.95, true)), 65);
        assert_eq!(derived_variant_score(&result(false, 0.1, true)), 65);
    }

    #[test]
    fn test_derived_score_table() {
        assert_eq!(derived_variant_score(&result(true, 0.81, false)), 92);
        assert_eq!(derived_variant_score(&result(true, 0.8, false)), 78);
        assert_eq!(derived_variant_score(&result(true, 0.61, false)), 78);
        assert_eq!(derived_variant_score(&result(true, 0.6, false)), 64);
        assert_eq!(derived_variant_score(&result(true, 0.05, false)), 64);
        assert_eq!(derived_variant_score(&result(false, 0.99, false)), 34);
    }

    #[test]
    fn test_mention_position_uses_strict_thresholds() {
        assert_eq!(
            brand_mention_position(&result(true, 0.8, false)),
            MentionPosition::Mid
        );
        assert_eq!(
            brand_mention_position(&result(true, 0.81, false)),
            MentionPosition::Top
        );
        assert_eq!(
            brand_mention_position(&result(true, 0.6, false)),
            MentionPosition::Bottom
        );
        assert_eq!(
            brand_mention_position(&result(false, 0.99, false)),
            MentionPosition::Omitted
        );
    }

    #[test]
    fn test_content_match_range_keywords() {
        assert_eq!(content_match_range("Our ECO range"), 75..95);
        assert_eq!(content_match_range("Organic cotton basics"), 75..95);
        assert_eq!(content_match_range("Fast shipping on all shoes"), 45..75);
    }

    #[test]
    fn test_topic_visibility_groups_in_first_seen_order() {
        let rows = vec![
            QueryResult {
                query_id: "q1".into(),
                topic: "Running".into(),
                mentioned: true,
                confidence_score: 0.9,
            },
            QueryResult {
                query_id: "q2".into(),
                topic: "Hiking".into(),
                mentioned: false,
                confidence_score: 0.8,
            },
            QueryResult {
                query_id: "q3".into(),
                topic: "Running".into(),
                mentioned: true,
                confidence_score: 0.5,
            },
        ];

        let summary = topic_visibility(&rows);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].topic, "Running");
        assert_eq!(summary[0].tier, VisibilityTier::High);
        assert_eq!(summary[0].mentioned_count, 2);
        assert_eq!(summary[1].topic, "Hiking");
        assert_eq!(summary[1].tier, VisibilityTier::Absent);
    }
}
