//! Runtime configuration.
//!
//! Read from `~/.config/optimly/config.toml`. Every key is optional; a missing
//! file yields the defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{OptimlyError, Result};

/// Root configuration structure for config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimlyConfig {
    /// Seed for the mock backend's random source; entropy when absent
    pub rng_seed: Option<u64>,
    pub mock_delays: MockDelays,
    pub webhook: WebhookConfig,
}

/// Artificial latency per mock operation, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockDelays {
    pub detect_intent: u64,
    pub score_content_match: u64,
    pub run_simulation: u64,
    pub generate_queries: u64,
    pub generate_personas: u64,
    pub generate_topics: u64,
    pub generate_ai_variant: u64,
}

impl Default for MockDelays {
    fn default() -> Self {
        Self {
            detect_intent: 1500,
            score_content_match: 2000,
            run_simulation: 3000,
            generate_queries: 2000,
            generate_personas: 1000,
            generate_topics: 1000,
            generate_ai_variant: 2500,
        }
    }
}

impl MockDelays {
    pub fn as_duration(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }
}

/// CMS export webhook settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Value of the `source` field in exported payloads
    pub source: String,
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            source: "optimly-prompt-lab".to_string(),
            timeout_secs: 10,
        }
    }
}

impl OptimlyConfig {
    /// Loads from the default location, falling back to defaults if the file
    /// does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&default_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        if self.webhook.source.trim().is_empty() {
            return Err(OptimlyError::config("webhook.source cannot be empty"));
        }
        if self.webhook.timeout_secs == 0 {
            return Err(OptimlyError::config("webhook.timeout_secs must be positive"));
        }
        Ok(())
    }
}

/// Returns the path to the configuration file: ~/.config/optimly/config.toml
pub fn default_config_path() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| OptimlyError::config("Could not determine home directory"))?;
    Ok(home.join(".config").join("optimly").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = OptimlyConfig::load_from(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, OptimlyConfig::default());
        assert_eq!(config.mock_delays.run_simulation, 3000);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "rng_seed = 7\n[mock_delays]\ndetect_intent = 10\n[webhook]\nsource = \"demo\"\n",
        )
        .unwrap();

        let config = OptimlyConfig::load_from(&path).unwrap();
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.mock_delays.detect_intent, 10);
        assert_eq!(config.mock_delays.score_content_match, 2000);
        assert_eq!(config.webhook.source, "demo");
        assert_eq!(config.webhook.timeout_secs, 10);
    }

    #[test]
    fn test_invalid_toml_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "rng_seed = [").unwrap();

        let err = OptimlyConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, OptimlyError::Serialization { .. }));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[webhook]\ntimeout_secs = 0\n").unwrap();

        assert!(matches!(
            OptimlyConfig::load_from(&path),
            Err(OptimlyError::Config(_))
        ));
    }
}
