//! Brand record produced by completing onboarding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::query::DiscoveryQuery;

/// A tracked brand with the discovery setup gathered during onboarding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub industry: String,
    pub competitors: Vec<String>,
    pub personas: Vec<String>,
    pub topics: Vec<String>,
    pub queries: Vec<DiscoveryQuery>,
    pub created_at: DateTime<Utc>,
}
