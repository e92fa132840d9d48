//! CmsWebhookClient - ships winning variants to an external CMS.
//!
//! Fire-and-forget: the response body is never read and any HTTP status is
//! treated as delivered. Only a transport failure is reported.

use std::time::Duration;

use chrono::{DateTime, Utc};
use optimly_core::aggregation::WinnerSummary;
use optimly_core::config::WebhookConfig;
use optimly_core::prompt_lab::LabOutcome;
use optimly_core::simulation::LlmModel;
use optimly_core::{OptimlyError, Result};
use reqwest::{Client, Url};
use serde::Serialize;
use tracing::{info, warn};

/// One exported winner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinningVariantEntry {
    pub model: LlmModel,
    #[serde(rename = "variantName")]
    pub variant_name: String,
    pub content: String,
    #[serde(rename = "confidenceScore")]
    pub confidence_score: f64,
}

/// JSON body POSTed to the webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CmsExportPayload {
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub winning_variants: Vec<WinningVariantEntry>,
    pub summary: WinnerSummary,
}

impl CmsExportPayload {
    pub fn from_outcome(outcome: &LabOutcome, source: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            source: source.into(),
            winning_variants: outcome
                .comparisons
                .iter()
                .map(|c| WinningVariantEntry {
                    model: c.model,
                    variant_name: c.variant_name.clone(),
                    content: c.content.clone(),
                    confidence_score: c.winner.confidence_score,
                })
                .collect(),
            summary: outcome.summary.clone(),
        }
    }
}

/// HTTP client for the CMS export webhook.
#[derive(Clone)]
pub struct CmsWebhookClient {
    client: Client,
    source: String,
}

impl CmsWebhookClient {
    pub fn new(config: &WebhookConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| OptimlyError::webhook(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            source: config.source.clone(),
        })
    }

    /// Payload for `outcome`, stamped with the configured source tag.
    pub fn payload_for(&self, outcome: &LabOutcome) -> CmsExportPayload {
        CmsExportPayload::from_outcome(outcome, self.source.as_str())
    }

    /// POSTs `payload` to `url`. No retry.
    pub async fn ship(&self, url: &str, payload: &CmsExportPayload) -> Result<()> {
        let url = Url::parse(url.trim())
            .map_err(|err| OptimlyError::webhook(format!("invalid webhook URL '{url}': {err}")))?;

        let response = self
            .client
            .post(url.clone())
            .json(payload)
            .send()
            .await
            .map_err(|err| OptimlyError::webhook(format!("webhook request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "webhook answered with a non-success status");
        }
        info!(%url, winners = payload.winning_variants.len(), "shipped winners to CMS");
        Ok(())
    }
}
