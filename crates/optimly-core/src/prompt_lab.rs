//! Prompt lab: the simulator flow.
//!
//! Three explicit steps (Simulate → Generate Variants → Compare/Export) run on
//! a [`WizardSession`](crate::wizard::WizardSession). Inside each step the
//! panels are revealed cumulatively by the data gathered so far, see
//! [`visible_panels`].

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::aggregation::{
    ModelWinners, WinnerSummary, confidence_delta, group_by_model, winning_variant_overall,
};
use crate::error::{OptimlyError, Result};
use crate::query::FunnelStage;
use crate::scoring::{MentionPosition, brand_mention_position, derived_variant_score};
use crate::simulation::{ContentMatchReport, IntentAnalysis, LlmModel, SimulationResult};
use crate::variant::{ContentVariant, VariantSet};
use crate::wizard::WizardFlow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum PromptLabStep {
    Simulate,
    #[strum(to_string = "Generate Variants")]
    GenerateVariants,
    #[strum(to_string = "Compare & Export")]
    CompareExport,
}

const PROMPT_LAB_STEPS: [PromptLabStep; 3] = [
    PromptLabStep::Simulate,
    PromptLabStep::GenerateVariants,
    PromptLabStep::CompareExport,
];

/// UI sections whose visibility depends on data presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Panel {
    QueryInput,
    IntentDetection,
    ContentMatch,
    BaselineResults,
    VariantEditor,
    VariantResults,
    WinnerSelection,
    Export,
}

/// Everything a prompt lab session accumulates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptLabData {
    pub brand_name: String,
    pub query: String,
    pub persona: String,
    pub funnel_stage: FunnelStage,
    pub intent: Option<IntentAnalysis>,
    pub content_match: Option<ContentMatchReport>,
    pub variants: VariantSet,
    pub baseline_results: Vec<SimulationResult>,
    pub variant_results: Vec<SimulationResult>,
    pub winners: ModelWinners,
}

impl PromptLabData {
    /// The user's original content, stored as the control variant.
    pub fn set_content(&mut self, content: impl Into<String>) -> Result<()> {
        self.variants.upsert_control(ContentVariant::control(content)?)
    }

    pub fn content(&self) -> Option<&str> {
        self.variants.control().map(ContentVariant::content)
    }

    /// Baseline and variant results together, the pool winners are picked from.
    pub fn comparison_results(&self) -> Vec<SimulationResult> {
        self.baseline_results
            .iter()
            .chain(self.variant_results.iter())
            .cloned()
            .collect()
    }

    pub fn select_winner(&mut self, model: LlmModel, result_id: &str) -> Result<()> {
        let pool = self.comparison_results();
        self.winners.select(model, result_id, &pool)
    }

    fn has_candidate_results(&self) -> bool {
        self.variant_results.iter().any(|r| !r.is_control)
    }
}

/// Panels shown for `step` given the data collected so far.
pub fn visible_panels(step: PromptLabStep, data: &PromptLabData) -> Vec<Panel> {
    let mut panels = vec![Panel::QueryInput];
    if data.intent.is_some() {
        panels.push(Panel::IntentDetection);
    }
    if data.content_match.is_some() {
        panels.push(Panel::ContentMatch);
    }
    if !data.baseline_results.is_empty() {
        panels.push(Panel::BaselineResults);
    }
    if step != PromptLabStep::Simulate {
        panels.push(Panel::VariantEditor);
        if !data.variant_results.is_empty() {
            panels.push(Panel::VariantResults);
        }
    }
    if step == PromptLabStep::CompareExport {
        panels.push(Panel::WinnerSelection);
        if !data.winners.is_empty() {
            panels.push(Panel::Export);
        }
    }
    panels
}

/// Side-by-side view of one model's winner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelComparison {
    pub model: LlmModel,
    pub winner: SimulationResult,
    pub variant_name: String,
    pub content: String,
    pub derived_score: u8,
    pub position: MentionPosition,
    /// Gain over the control answer from the same model, if one exists
    pub confidence_delta: Option<i32>,
}

/// Artifact of a finished prompt lab run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabOutcome {
    pub comparisons: Vec<ModelComparison>,
    pub overall_winner: Option<String>,
    pub summary: WinnerSummary,
}

impl LabOutcome {
    pub fn build(data: &PromptLabData) -> Result<Self> {
        let results = data.comparison_results();
        let groups = group_by_model(&results);

        let mut comparisons = Vec::with_capacity(data.winners.len());
        for (model, result_id) in data.winners.iter() {
            let winner = results
                .iter()
                .find(|r| r.id == result_id)
                .ok_or_else(|| OptimlyError::not_found("simulation result", result_id))?;
            let variant = data
                .variants
                .get(&winner.variant_id)
                .ok_or_else(|| OptimlyError::not_found("content variant", &winner.variant_id))?;
            let control = groups
                .get(&model)
                .and_then(|group| group.iter().find(|r| r.is_control));

            comparisons.push(ModelComparison {
                model,
                winner: winner.clone(),
                variant_name: variant.name().to_string(),
                content: variant.content().to_string(),
                derived_score: derived_variant_score(winner),
                position: brand_mention_position(winner),
                confidence_delta: confidence_delta(Some(winner), control),
            });
        }

        Ok(Self {
            comparisons,
            overall_winner: winning_variant_overall(&data.winners, &results),
            summary: WinnerSummary::compute(&data.winners, &results),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PromptLabFlow;

impl WizardFlow for PromptLabFlow {
    type Step = PromptLabStep;
    type Fields = PromptLabData;
    type Artifact = LabOutcome;

    fn steps(&self) -> &'static [PromptLabStep] {
        &PROMPT_LAB_STEPS
    }

    fn validate(&self, step: PromptLabStep, data: &PromptLabData) -> Result<()> {
        let missing = match step {
            PromptLabStep::Simulate if data.baseline_results.is_empty() => {
                Some("Run the simulation before generating variants")
            }
            PromptLabStep::GenerateVariants if !data.has_candidate_results() => {
                Some("Simulate at least one variant before comparing")
            }
            PromptLabStep::CompareExport if data.winners.is_empty() => {
                Some("Select a winner for at least one model")
            }
            _ => None,
        };

        match missing {
            Some(message) => Err(OptimlyError::validation(step.to_string(), message)),
            None => Ok(()),
        }
    }

    fn complete(&self, data: &PromptLabData) -> Result<LabOutcome> {
        LabOutcome::build(data)
    }
}
