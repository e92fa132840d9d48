//! Local exports: clipboard text and downloadable winner files.

use std::path::{Path, PathBuf};

use optimly_core::Result;
use optimly_core::prompt_lab::ModelComparison;
use optimly_core::variant::ContentVariant;
use tracing::info;

/// Plain text placed on the clipboard for "copy content".
pub fn clipboard_text(variant: &ContentVariant) -> String {
    variant.content().to_string()
}

/// A winning variant rendered as a plain-text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerDownload {
    pub file_name: String,
    pub contents: String,
}

fn slug(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        "variant".to_string()
    } else {
        trimmed.to_string()
    }
}

impl WinnerDownload {
    pub fn build(comparison: &ModelComparison) -> Self {
        let file_name = format!(
            "optimly-{}-{}.txt",
            comparison.model,
            slug(&comparison.variant_name)
        );

        let mut contents = format!(
            "Model: {}\nVariant: {}\nConfidence: {:.0}%\nScore: {}%\nMention position: {}\n",
            comparison.model.display_name(),
            comparison.variant_name,
            comparison.winner.confidence_score * 100.0,
            comparison.derived_score,
            comparison.position,
        );
        if let Some(delta) = comparison.confidence_delta {
            contents.push_str(&format!("Change vs control: {delta:+} pts\n"));
        }
        contents.push('\n');
        contents.push_str(&comparison.content);
        contents.push('\n');

        Self {
            file_name,
            contents,
        }
    }

    /// Writes the file into `dir` and returns its path.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.contents)?;
        info!(path = %path.display(), "winner downloaded");
        Ok(path)
    }
}
