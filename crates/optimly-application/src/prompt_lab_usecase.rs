//! Prompt lab use case.
//!
//! Drives one simulator session: the user's query and content go through
//! intent detection, content match scoring and a baseline simulation, then
//! variants are written or generated, simulated, compared per model and
//! exported.
//!
//! Every backend call goes through the session's [`OperationTracker`]. Once
//! the session is abandoned no result or edit is written back, even one that
//! finished just before.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use optimly_core::aggregation::ModelWinners;
use optimly_core::prompt_lab::{
    LabOutcome, Panel, PromptLabData, PromptLabFlow, PromptLabStep, visible_panels,
};
use optimly_core::query::FunnelStage;
use optimly_core::simulation::{ContentMatchReport, IntentAnalysis, LlmModel, SimulationResult};
use optimly_core::variant::{ContentVariant, ContentVariantDraft, VariantField};
use optimly_core::wizard::{AdvanceOutcome, WizardSession};
use optimly_core::{OptimlyError, Result};
use optimly_execution::{
    Backend, IntentRequest, Operation, OperationTracker, SimulationRequest, VariantRequest,
};
use optimly_interaction::{CmsExportPayload, CmsWebhookClient, WinnerDownload, clipboard_text};
use strum::IntoEnumIterator;
use tokio::sync::{RwLock, RwLockWriteGuard};
use tracing::{debug, info};
use uuid::Uuid;

pub struct PromptLabUseCase {
    session: RwLock<WizardSession<PromptLabFlow>>,
    backend: Arc<dyn Backend>,
    tracker: OperationTracker,
    webhook: CmsWebhookClient,
}

impl PromptLabUseCase {
    pub fn new(
        backend: Arc<dyn Backend>,
        webhook: CmsWebhookClient,
        brand_name: impl Into<String>,
    ) -> Self {
        let data = PromptLabData {
            brand_name: brand_name.into(),
            ..Default::default()
        };
        Self {
            session: RwLock::new(WizardSession::with_fields(PromptLabFlow, data)),
            backend,
            tracker: OperationTracker::new(),
            webhook,
        }
    }

    pub async fn position(&self) -> (usize, PromptLabStep) {
        let session = self.session.read().await;
        (session.current_step_index(), session.current_step())
    }

    pub async fn data(&self) -> PromptLabData {
        self.session.read().await.fields().clone()
    }

    pub async fn panels(&self) -> Vec<Panel> {
        let session = self.session.read().await;
        visible_panels(session.current_step(), session.fields())
    }

    pub async fn set_query(
        &self,
        query: impl Into<String>,
        persona: impl Into<String>,
        funnel_stage: FunnelStage,
    ) -> Result<()> {
        self.edit(|data| {
            data.query = query.into();
            data.persona = persona.into();
            data.funnel_stage = funnel_stage;
            Ok(())
        })
        .await
    }

    /// Stores the user's content as the control variant.
    pub async fn set_content(&self, content: impl Into<String>) -> Result<()> {
        self.edit(|data| data.set_content(content)).await
    }

    pub async fn detect_intent(&self) -> Result<IntentAnalysis> {
        let request = {
            let session = self.session.read().await;
            let data = session.fields();
            require_query(data)?;
            IntentRequest {
                query: data.query.clone(),
                persona: data.persona.clone(),
                funnel_stage: data.funnel_stage,
            }
        };

        let intent = self
            .tracker
            .run(
                Operation::DetectIntent,
                self.backend.detect_intent(&request),
            )
            .await?;

        self.edit(|data| {
            data.intent = Some(intent.clone());
            Ok(())
        })
        .await?;
        Ok(intent)
    }

    pub async fn score_content(&self) -> Result<ContentMatchReport> {
        let (content, query) = {
            let session = self.session.read().await;
            let data = session.fields();
            require_query(data)?;
            (require_content(data)?.to_string(), data.query.clone())
        };

        let report = self
            .tracker
            .run(
                Operation::ScoreContentMatch,
                self.backend.score_content_match(&content, &query),
            )
            .await?;

        self.edit(|data| {
            data.content_match = Some(report.clone());
            Ok(())
        })
        .await?;
        Ok(report)
    }

    /// Simulates the control content against every model. Replaces earlier
    /// baseline results and clears winners that referenced them.
    pub async fn run_baseline_simulation(&self) -> Result<Vec<SimulationResult>> {
        let request = {
            let session = self.session.read().await;
            let data = session.fields();
            require_query(data)?;
            require_content(data)?;
            let control = data
                .variants
                .control()
                .cloned()
                .ok_or_else(|| OptimlyError::not_found("content variant", "control"))?;
            simulation_request(data, vec![control])
        };

        let results = self
            .tracker
            .run(
                Operation::RunSimulation,
                self.backend.run_simulation(&request),
            )
            .await?;

        self.edit(|data| {
            data.baseline_results = results.clone();
            prune_winners(data);
            Ok(())
        })
        .await?;
        info!(results = results.len(), "baseline simulation stored");
        Ok(results)
    }

    /// Adds a hand-written variant. A missing id is generated.
    pub async fn add_variant(&self, mut draft: ContentVariantDraft) -> Result<ContentVariant> {
        if draft.id.as_deref().is_none_or(|id| id.trim().is_empty()) {
            draft.id = Some(Uuid::new_v4().to_string());
        }
        let variant = ContentVariant::from_draft(draft)?;
        self.edit(|data| data.variants.insert(variant.clone()))
            .await?;
        debug!(variant_id = variant.id(), "variant added");
        Ok(variant)
    }

    pub async fn edit_variant(&self, id: &str, field: VariantField) -> Result<ContentVariant> {
        self.edit(|data| data.variants.update(id, field).cloned())
            .await
    }

    /// Removes a variant along with its simulation results.
    pub async fn remove_variant(&self, id: &str) -> Result<()> {
        self.edit(|data| {
            data.variants.remove(id)?;
            data.baseline_results.retain(|r| r.variant_id != id);
            data.variant_results.retain(|r| r.variant_id != id);
            prune_winners(data);
            Ok(())
        })
        .await
    }

    /// Asks the backend to rewrite the control content and adds the result
    /// as a new variant.
    pub async fn generate_ai_variant(&self) -> Result<ContentVariant> {
        let request = {
            let session = self.session.read().await;
            let data = session.fields();
            VariantRequest {
                brand_name: data.brand_name.clone(),
                query: data.query.clone(),
                persona: data.persona.clone(),
                funnel_stage: data.funnel_stage,
                base_content: require_content(data)?.to_string(),
                ordinal: data.variants.candidates().count() + 1,
            }
        };

        let variant = self
            .tracker
            .run(
                Operation::GenerateAiVariant,
                self.backend.generate_ai_variant(&request),
            )
            .await?;

        self.edit(|data| data.variants.insert(variant.clone()))
            .await?;
        info!(variant = variant.name(), "AI variant added");
        Ok(variant)
    }

    /// Simulates every non-control variant against every model.
    pub async fn run_variant_simulation(&self) -> Result<Vec<SimulationResult>> {
        let request = {
            let session = self.session.read().await;
            let data = session.fields();
            require_query(data)?;
            let candidates: Vec<ContentVariant> = data.variants.candidates().cloned().collect();
            if candidates.is_empty() {
                return Err(OptimlyError::validation(
                    PromptLabStep::GenerateVariants.to_string(),
                    "Add at least one variant to simulate",
                ));
            }
            simulation_request(data, candidates)
        };

        let results = self
            .tracker
            .run(
                Operation::RunSimulation,
                self.backend.run_simulation(&request),
            )
            .await?;

        self.edit(|data| {
            data.variant_results = results.clone();
            prune_winners(data);
            Ok(())
        })
        .await?;
        info!(results = results.len(), "variant simulation stored");
        Ok(results)
    }

    pub async fn select_winner(&self, model: LlmModel, result_id: &str) -> Result<()> {
        self.edit(|data| data.select_winner(model, result_id)).await
    }

    pub async fn advance(&self) -> Result<AdvanceOutcome<LabOutcome>> {
        self.active_session().await?.advance()
    }

    pub async fn retreat(&self) -> Result<usize> {
        self.active_session().await?.retreat()
    }

    /// Per-model comparison and summary for the current winners.
    pub async fn outcome(&self) -> Result<LabOutcome> {
        LabOutcome::build(self.session.read().await.fields())
    }

    /// Posts the selected winners to the CMS webhook at `url`.
    pub async fn ship_to_cms(&self, url: &str) -> Result<CmsExportPayload> {
        let outcome = self.outcome().await?;
        if outcome.comparisons.is_empty() {
            return Err(OptimlyError::validation(
                PromptLabStep::CompareExport.to_string(),
                "Select at least one winner before exporting",
            ));
        }
        let payload = self.webhook.payload_for(&outcome);
        self.webhook.ship(url, &payload).await?;
        Ok(payload)
    }

    /// Clipboard text for a variant.
    pub async fn copy_variant(&self, id: &str) -> Result<String> {
        let session = self.session.read().await;
        session
            .fields()
            .variants
            .get(id)
            .map(clipboard_text)
            .ok_or_else(|| OptimlyError::not_found("content variant", id))
    }

    /// Writes `model`'s winning variant into `dir`.
    pub async fn download_winner(&self, model: LlmModel, dir: &Path) -> Result<PathBuf> {
        let outcome = self.outcome().await?;
        let comparison = outcome
            .comparisons
            .iter()
            .find(|c| c.model == model)
            .ok_or_else(|| OptimlyError::not_found("winner", model.to_string()))?;
        WinnerDownload::build(comparison).save_to(dir)
    }

    pub fn is_loading(&self, operation: Operation) -> bool {
        self.tracker.is_loading(operation)
    }

    /// Cancels pending backend calls and ends the session for edits. Results
    /// still waiting to be written are discarded.
    pub fn abandon(&self) {
        self.tracker.cancel_all();
    }

    async fn edit<R>(&self, edit: impl FnOnce(&mut PromptLabData) -> Result<R>) -> Result<R> {
        let mut session = self.active_session().await?;
        edit(session.fields_mut()?)
    }

    /// Write access, checked against abandonment after the lock is taken.
    async fn active_session(&self) -> Result<RwLockWriteGuard<'_, WizardSession<PromptLabFlow>>> {
        let session = self.session.write().await;
        if self.tracker.is_cancelled() {
            return Err(OptimlyError::Cancelled("prompt lab session abandoned".to_string()));
        }
        Ok(session)
    }
}

fn require_query(data: &PromptLabData) -> Result<()> {
    if data.query.trim().is_empty() {
        return Err(OptimlyError::validation(
            PromptLabStep::Simulate.to_string(),
            "Enter a query to simulate",
        ));
    }
    Ok(())
}

fn require_content(data: &PromptLabData) -> Result<&str> {
    data.content().ok_or_else(|| {
        OptimlyError::validation(
            PromptLabStep::Simulate.to_string(),
            "Paste your content before running this step",
        )
    })
}

fn simulation_request(data: &PromptLabData, variants: Vec<ContentVariant>) -> SimulationRequest {
    SimulationRequest {
        brand_name: data.brand_name.clone(),
        query: data.query.clone(),
        variants,
        models: LlmModel::iter().collect(),
    }
}

/// Re-selects only the winners whose result still exists.
fn prune_winners(data: &mut PromptLabData) {
    let pool = data.comparison_results();
    let mut kept = ModelWinners::new();
    for (model, result_id) in data.winners.iter() {
        if kept.select(model, result_id, &pool).is_err() {
            debug!(%model, result_id, "dropping stale winner");
        }
    }
    data.winners = kept;
}
