//! Discovery query domain model.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

/// Buyer-journey stage a query belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum FunnelStage {
    #[default]
    Awareness,
    Consideration,
    Decision,
}

/// A prompt a persona might ask an AI assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryQuery {
    /// Unique within the owning [`QueryList`](super::QueryList)
    pub id: String,
    pub query: String,
    pub topic: String,
    pub persona: String,
    pub funnel_stage: FunnelStage,
}

impl DiscoveryQuery {
    /// Creates a query with a freshly generated id.
    pub fn new(
        query: impl Into<String>,
        topic: impl Into<String>,
        persona: impl Into<String>,
        funnel_stage: FunnelStage,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            query: query.into(),
            topic: topic.into(),
            persona: persona.into(),
            funnel_stage,
        }
    }
}

/// A single-field edit applied in place to a [`DiscoveryQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum QueryField {
    Query(String),
    Topic(String),
    Persona(String),
    FunnelStage(FunnelStage),
}

impl QueryField {
    pub(crate) fn apply(self, target: &mut DiscoveryQuery) {
        match self {
            QueryField::Query(value) => target.query = value,
            QueryField::Topic(value) => target.topic = value,
            QueryField::Persona(value) => target.persona = value,
            QueryField::FunnelStage(stage) => target.funnel_stage = stage,
        }
    }
}

/// A generated query together with its strategic value estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySuggestion {
    pub query: DiscoveryQuery,
    /// `0..=100`
    pub strategic_score: u8,
}

/// Observed visibility of the brand for one tracked query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub query_id: String,
    pub topic: String,
    pub mentioned: bool,
    pub confidence_score: f64,
}
