//! Content variant domain model and its boundary validator.

use serde::{Deserialize, Serialize};

use crate::error::{OptimlyError, Result};
use crate::query::FunnelStage;

/// Reserved id of the baseline ("control") content.
pub const CONTROL_VARIANT_ID: &str = "control";

const DEFAULT_VARIANT_NAME: &str = "Untitled variant";
const DEFAULT_FORMAT: &str = "article";

/// A piece of content whose visibility is simulated.
///
/// Only constructed through [`ContentVariant::from_draft`], so every instance
/// has a non-blank id and content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentVariant {
    id: String,
    name: String,
    content: String,
    format: String,
    topic: String,
    persona: String,
    query: String,
    funnel_stage: FunnelStage,
    is_control: bool,
}

/// Loosely-shaped variant as received from a caller.
///
/// Missing fields are resolved once, in [`ContentVariant::from_draft`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentVariantDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub persona: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub funnel_stage: Option<FunnelStage>,
    #[serde(default)]
    pub is_control: Option<bool>,
}

/// A single-field edit applied to a [`ContentVariant`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum VariantField {
    Name(String),
    Content(String),
    Format(String),
    Topic(String),
    Persona(String),
    Query(String),
    FunnelStage(FunnelStage),
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(OptimlyError::validation(
            "Content Variant",
            format!("{field} is required"),
        )),
    }
}

impl ContentVariant {
    /// Validates a draft: `id` and `content` must be non-blank, every other
    /// field falls back to an explicit default.
    pub fn from_draft(draft: ContentVariantDraft) -> Result<Self> {
        let id = required(draft.id, "id")?;
        let content = required(draft.content, "content")?;
        let is_control = draft.is_control.unwrap_or(false) || id == CONTROL_VARIANT_ID;

        Ok(Self {
            name: draft
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_VARIANT_NAME.to_string()),
            format: draft
                .format
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FORMAT.to_string()),
            topic: draft.topic.unwrap_or_default(),
            persona: draft.persona.unwrap_or_default(),
            query: draft.query.unwrap_or_default(),
            funnel_stage: draft.funnel_stage.unwrap_or_default(),
            id,
            content,
            is_control,
        })
    }

    /// Convenience for the baseline content the user pasted in.
    pub fn control(content: impl Into<String>) -> Result<Self> {
        Self::from_draft(ContentVariantDraft {
            id: Some(CONTROL_VARIANT_ID.to_string()),
            name: Some("Original content".to_string()),
            content: Some(content.into()),
            is_control: Some(true),
            ..Default::default()
        })
    }

    /// Applies an edit. Blank content is rejected; text is stored verbatim.
    pub fn apply(&mut self, field: VariantField) -> Result<()> {
        match field {
            VariantField::Name(value) => self.name = value,
            VariantField::Content(value) => {
                if value.trim().is_empty() {
                    return Err(OptimlyError::validation(
                        "Content Variant",
                        "content is required",
                    ));
                }
                self.content = value;
            }
            VariantField::Format(value) => self.format = value,
            VariantField::Topic(value) => self.topic = value,
            VariantField::Persona(value) => self.persona = value,
            VariantField::Query(value) => self.query = value,
            VariantField::FunnelStage(stage) => self.funnel_stage = stage,
        }
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn funnel_stage(&self) -> FunnelStage {
        self.funnel_stage
    }

    pub fn is_control(&self) -> bool {
        self.is_control
    }
}

impl<'de> Deserialize<'de> for ContentVariant {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let draft = ContentVariantDraft::deserialize(deserializer)?;
        ContentVariant::from_draft(draft).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_get_explicit_defaults() {
        let variant = ContentVariant::from_draft(ContentVariantDraft {
            id: Some("v1".into()),
            content: Some("Our organic cotton tees".into()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(variant.name(), "Untitled variant");
        assert_eq!(variant.format(), "article");
        assert_eq!(variant.topic(), "");
        assert_eq!(variant.funnel_stage(), FunnelStage::Awareness);
        assert!(!variant.is_control());
    }

    #[test]
    fn test_blank_content_is_rejected() {
        let err = ContentVariant::from_draft(ContentVariantDraft {
            id: Some("v1".into()),
            content: Some("   ".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_reserved_id_marks_control() {
        let variant = ContentVariant::from_draft(ContentVariantDraft {
            id: Some(CONTROL_VARIANT_ID.into()),
            content: Some("baseline".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(variant.is_control());
    }

    #[test]
    fn test_content_edit_round_trips_verbatim() {
        let mut variant = ContentVariant::control("before").unwrap();
        let edited = "  Eco-friendly  sneakers,\nmade to last.  ";

        variant
            .apply(VariantField::Content(edited.to_string()))
            .unwrap();

        assert_eq!(variant.content(), edited);
    }

    #[test]
    fn test_deserialize_goes_through_validator() {
        let ok: ContentVariant =
            serde_json::from_str(r#"{"id":"v2","content":"hello","funnelStage":"Decision"}"#)
                .unwrap();
        assert_eq!(ok.funnel_stage(), FunnelStage::Decision);

        let missing = serde_json::from_str::<ContentVariant>(r#"{"id":"v3"}"#);
        assert!(missing.is_err());
    }
}
