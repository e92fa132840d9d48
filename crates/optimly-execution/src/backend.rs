//! Backend seam for the simulated operations.
//!
//! Callers depend on [`Backend`] only, so the mock can be replaced by a real
//! model integration without touching the use cases.

use async_trait::async_trait;
use optimly_core::Result;
use optimly_core::query::{FunnelStage, QuerySuggestion};
use optimly_core::simulation::{ContentMatchReport, IntentAnalysis, LlmModel, SimulationResult};
use optimly_core::variant::ContentVariant;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Every operation a backend offers. Used as the loading key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    DetectIntent,
    ScoreContentMatch,
    RunSimulation,
    GenerateQueries,
    GeneratePersonas,
    GenerateTopics,
    GenerateAiVariant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentRequest {
    pub query: String,
    pub persona: String,
    pub funnel_stage: FunnelStage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRequest {
    pub brand_name: String,
    pub query: String,
    pub variants: Vec<ContentVariant>,
    pub models: Vec<LlmModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryGenerationRequest {
    pub brand_name: String,
    pub topics: Vec<String>,
    pub personas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantRequest {
    pub brand_name: String,
    pub query: String,
    pub persona: String,
    pub funnel_stage: FunnelStage,
    pub base_content: String,
    /// 1-based number used in the generated variant's name
    pub ordinal: usize,
}

/// Source of intent analysis, match scores, simulated answers and
/// suggestions.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn detect_intent(&self, request: &IntentRequest) -> Result<IntentAnalysis>;

    async fn score_content_match(&self, content: &str, query: &str)
    -> Result<ContentMatchReport>;

    /// One result per (variant, model) pair, variants outermost.
    async fn run_simulation(&self, request: &SimulationRequest) -> Result<Vec<SimulationResult>>;

    async fn generate_queries(
        &self,
        request: &QueryGenerationRequest,
    ) -> Result<Vec<QuerySuggestion>>;

    async fn generate_personas(&self, brand_name: &str, industry: &str) -> Result<Vec<String>>;

    async fn generate_topics(&self, brand_name: &str, industry: &str) -> Result<Vec<String>>;

    async fn generate_ai_variant(&self, request: &VariantRequest) -> Result<ContentVariant>;
}
