//! Outputs of the intent-detection and content-match mock operations.

use serde::{Deserialize, Serialize};

use crate::query::FunnelStage;

/// Detected search intent for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentAnalysis {
    pub query: String,
    pub persona: String,
    pub funnel_stage: FunnelStage,
    /// Templated intent description
    pub intent: String,
}

/// Content-match score with its explanation.
///
/// Recomputing the match replaces the previous value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Integer in `0..=100`
    pub score: u8,
    pub explanation: String,
}

/// Per-dimension scores shown next to a [`MatchResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub relevance: u8,
    pub authority: u8,
    pub specificity: u8,
}

/// Full output of a content-match scoring run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMatchReport {
    pub result: MatchResult,
    pub breakdown: MatchBreakdown,
}
