//! Entry point that wires config, backend and session registries together.

use std::sync::Arc;

use optimly_core::Result;
use optimly_core::config::OptimlyConfig;
use optimly_execution::{Backend, Clock, MockBackend};
use optimly_interaction::CmsWebhookClient;
use tracing::info;

use crate::onboarding_usecase::OnboardingUseCase;
use crate::prompt_lab_usecase::PromptLabUseCase;
use crate::session::SessionRegistry;

/// Holds every live session. Sessions share the backend and webhook client
/// but nothing else.
pub struct OptimlyApp {
    backend: Arc<dyn Backend>,
    webhook: CmsWebhookClient,
    onboarding: SessionRegistry<OnboardingUseCase>,
    labs: SessionRegistry<PromptLabUseCase>,
}

impl OptimlyApp {
    pub fn new(backend: Arc<dyn Backend>, webhook: CmsWebhookClient) -> Self {
        Self {
            backend,
            webhook,
            onboarding: SessionRegistry::new(),
            labs: SessionRegistry::new(),
        }
    }

    /// Builds the mock backend from `config`, sleeping on `clock`.
    pub fn from_config(config: &OptimlyConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let backend = MockBackend::new(clock, config.mock_delays.clone(), config.rng_seed)?;
        let webhook = CmsWebhookClient::new(&config.webhook)?;
        Ok(Self::new(Arc::new(backend), webhook))
    }

    pub async fn start_onboarding(&self) -> (String, Arc<OnboardingUseCase>) {
        let session = Arc::new(OnboardingUseCase::new(Arc::clone(&self.backend)));
        let id = self.onboarding.register(Arc::clone(&session)).await;
        info!(session_id = %id, "onboarding session started");
        (id, session)
    }

    pub async fn start_prompt_lab(
        &self,
        brand_name: impl Into<String>,
    ) -> (String, Arc<PromptLabUseCase>) {
        let session = Arc::new(PromptLabUseCase::new(
            Arc::clone(&self.backend),
            self.webhook.clone(),
            brand_name,
        ));
        let id = self.labs.register(Arc::clone(&session)).await;
        info!(session_id = %id, "prompt lab session started");
        (id, session)
    }

    pub async fn onboarding(&self, session_id: &str) -> Option<Arc<OnboardingUseCase>> {
        self.onboarding.get(session_id).await
    }

    pub async fn prompt_lab(&self, session_id: &str) -> Option<Arc<PromptLabUseCase>> {
        self.labs.get(session_id).await
    }

    /// Closes a session of either kind, cancelling its pending calls.
    /// Returns whether a session was found.
    pub async fn abandon(&self, session_id: &str) -> bool {
        if let Some(session) = self.onboarding.remove(session_id).await {
            session.abandon();
        } else if let Some(session) = self.labs.remove(session_id).await {
            session.abandon();
        } else {
            return false;
        }
        info!(session_id, "session abandoned");
        true
    }
}
