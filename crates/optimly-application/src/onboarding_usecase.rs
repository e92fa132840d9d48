//! Brand onboarding use case.
//!
//! Wraps a [`WizardSession<OnboardingFlow>`] with the mock backend so the
//! persona, topic and query steps can be pre-filled with suggestions.

use std::sync::Arc;

use optimly_core::brand::Brand;
use optimly_core::query::QuerySuggestion;
use optimly_core::wizard::{
    AdvanceOutcome, OnboardingFields, OnboardingFlow, OnboardingStep, WizardSession,
};
use optimly_core::{OptimlyError, Result};
use optimly_execution::{Backend, Operation, OperationTracker, QueryGenerationRequest};
use tokio::sync::{RwLock, RwLockWriteGuard};
use tracing::info;

pub struct OnboardingUseCase {
    session: RwLock<WizardSession<OnboardingFlow>>,
    backend: Arc<dyn Backend>,
    tracker: OperationTracker,
}

impl OnboardingUseCase {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            session: RwLock::new(WizardSession::new(OnboardingFlow)),
            backend,
            tracker: OperationTracker::new(),
        }
    }

    /// 1-based index and the step shown there.
    pub async fn position(&self) -> (usize, OnboardingStep) {
        let session = self.session.read().await;
        (session.current_step_index(), session.current_step())
    }

    pub async fn fields(&self) -> OnboardingFields {
        self.session.read().await.fields().clone()
    }

    pub async fn is_completed(&self) -> bool {
        self.session.read().await.is_completed()
    }

    /// Applies a field-level edit. Fails once the wizard has completed or
    /// the session was abandoned.
    pub async fn edit<R>(&self, edit: impl FnOnce(&mut OnboardingFields) -> R) -> Result<R> {
        let mut session = self.active_session().await?;
        Ok(edit(session.fields_mut()?))
    }

    pub async fn advance(&self) -> Result<AdvanceOutcome<Brand>> {
        let outcome = self.active_session().await?.advance()?;
        if let AdvanceOutcome::Completed(brand) = &outcome {
            info!(brand = %brand.name, queries = brand.queries.len(), "brand launched");
        }
        Ok(outcome)
    }

    pub async fn retreat(&self) -> Result<usize> {
        self.active_session().await?.retreat()
    }

    /// Asks the backend for personas and adds the new ones to the list.
    pub async fn suggest_personas(&self) -> Result<Vec<String>> {
        let (brand, industry) = self.brand_and_industry().await;
        let personas = self
            .tracker
            .run(
                Operation::GeneratePersonas,
                self.backend.generate_personas(&brand, &industry),
            )
            .await?;

        self.edit(|fields| {
            personas
                .into_iter()
                .filter(|p| fields.add_persona(p))
                .collect()
        })
        .await
    }

    /// Asks the backend for topics and adds the new ones to the list.
    pub async fn suggest_topics(&self) -> Result<Vec<String>> {
        let (brand, industry) = self.brand_and_industry().await;
        let topics = self
            .tracker
            .run(
                Operation::GenerateTopics,
                self.backend.generate_topics(&brand, &industry),
            )
            .await?;

        self.edit(|fields| {
            topics
                .into_iter()
                .filter(|t| fields.add_topic(t))
                .collect()
        })
        .await
    }

    /// Generates queries for every topic and funnel stage and appends them.
    pub async fn suggest_queries(&self) -> Result<Vec<QuerySuggestion>> {
        let request = {
            let session = self.session.read().await;
            let fields = session.fields();
            if fields.topics.is_empty() {
                return Err(OptimlyError::validation(
                    OnboardingStep::Queries.to_string(),
                    "Add at least one topic before generating queries",
                ));
            }
            QueryGenerationRequest {
                brand_name: fields.brand_name.clone(),
                topics: fields.topics.clone(),
                personas: fields.personas.clone(),
            }
        };

        let suggestions = self
            .tracker
            .run(
                Operation::GenerateQueries,
                self.backend.generate_queries(&request),
            )
            .await?;

        let mut session = self.active_session().await?;
        session
            .fields_mut()?
            .queries
            .extend(suggestions.iter().map(|s| s.query.clone()))?;
        Ok(suggestions)
    }

    pub fn is_loading(&self, operation: Operation) -> bool {
        self.tracker.is_loading(operation)
    }

    /// Drops the session's pending suggestion calls. Every later change,
    /// including a result that was already on its way back, is rejected.
    pub fn abandon(&self) {
        self.tracker.cancel_all();
    }

    /// Write access, checked against abandonment after the lock is taken.
    async fn active_session(&self) -> Result<RwLockWriteGuard<'_, WizardSession<OnboardingFlow>>> {
        let session = self.session.write().await;
        if self.tracker.is_cancelled() {
            return Err(OptimlyError::Cancelled("onboarding session abandoned".to_string()));
        }
        Ok(session)
    }

    async fn brand_and_industry(&self) -> (String, String) {
        let session = self.session.read().await;
        let fields = session.fields();
        (fields.brand_name.clone(), fields.industry.clone())
    }
}
