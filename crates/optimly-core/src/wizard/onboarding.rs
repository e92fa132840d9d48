//! Brand onboarding flow.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use super::session::WizardFlow;
use crate::brand::Brand;
use crate::error::{OptimlyError, Result};
use crate::query::QueryList;

/// The seven onboarding steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum OnboardingStep {
    #[strum(to_string = "Brand Name")]
    BrandName,
    Industry,
    Competitors,
    Personas,
    Topics,
    Queries,
    Launch,
}

const ONBOARDING_STEPS: [OnboardingStep; 7] = [
    OnboardingStep::BrandName,
    OnboardingStep::Industry,
    OnboardingStep::Competitors,
    OnboardingStep::Personas,
    OnboardingStep::Topics,
    OnboardingStep::Queries,
    OnboardingStep::Launch,
];

/// Input accumulated across onboarding steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingFields {
    pub brand_name: String,
    pub industry: String,
    pub competitors: Vec<String>,
    pub personas: Vec<String>,
    pub topics: Vec<String>,
    pub queries: QueryList,
}

/// Pushes a trimmed, non-blank value unless it is already present
/// (case-insensitive). Returns whether the list changed.
fn push_unique(list: &mut Vec<String>, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || list.iter().any(|v| v.eq_ignore_ascii_case(value)) {
        return false;
    }
    list.push(value.to_string());
    true
}

/// Removes entries matching `value` under the same rule as [`push_unique`].
fn remove_value(list: &mut Vec<String>, value: &str) -> bool {
    let value = value.trim();
    let before = list.len();
    list.retain(|v| !v.eq_ignore_ascii_case(value));
    list.len() != before
}

fn has_entry(list: &[String]) -> bool {
    list.iter().any(|v| !v.trim().is_empty())
}

impl OnboardingFields {
    pub fn set_brand_name(&mut self, name: impl Into<String>) {
        self.brand_name = name.into();
    }

    pub fn set_industry(&mut self, industry: impl Into<String>) {
        self.industry = industry.into();
    }

    pub fn add_competitor(&mut self, name: &str) -> bool {
        push_unique(&mut self.competitors, name)
    }

    pub fn remove_competitor(&mut self, name: &str) -> bool {
        remove_value(&mut self.competitors, name)
    }

    pub fn add_persona(&mut self, persona: &str) -> bool {
        push_unique(&mut self.personas, persona)
    }

    pub fn remove_persona(&mut self, persona: &str) -> bool {
        remove_value(&mut self.personas, persona)
    }

    pub fn add_topic(&mut self, topic: &str) -> bool {
        push_unique(&mut self.topics, topic)
    }

    pub fn remove_topic(&mut self, topic: &str) -> bool {
        remove_value(&mut self.topics, topic)
    }
}

/// Brand onboarding: Name → Industry → Competitors → Personas → Topics →
/// Queries → Launch. Competitors may be left empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnboardingFlow;

impl WizardFlow for OnboardingFlow {
    type Step = OnboardingStep;
    type Fields = OnboardingFields;
    type Artifact = Brand;

    fn steps(&self) -> &'static [OnboardingStep] {
        &ONBOARDING_STEPS
    }

    fn validate(&self, step: OnboardingStep, fields: &OnboardingFields) -> Result<()> {
        let missing = match step {
            OnboardingStep::BrandName if fields.brand_name.trim().is_empty() => {
                Some("Please enter your brand name")
            }
            OnboardingStep::Industry if fields.industry.trim().is_empty() => {
                Some("Please select an industry")
            }
            OnboardingStep::Personas if !has_entry(&fields.personas) => {
                Some("Add at least one persona")
            }
            OnboardingStep::Topics if !has_entry(&fields.topics) => Some("Add at least one topic"),
            OnboardingStep::Queries if fields.queries.is_empty() => {
                Some("Add at least one discovery query")
            }
            _ => None,
        };

        match missing {
            Some(message) => Err(OptimlyError::validation(step.to_string(), message)),
            None => Ok(()),
        }
    }

    fn complete(&self, fields: &OnboardingFields) -> Result<Brand> {
        Ok(Brand {
            id: Uuid::new_v4().to_string(),
            name: fields.brand_name.trim().to_string(),
            industry: fields.industry.trim().to_string(),
            competitors: fields.competitors.clone(),
            personas: fields.personas.clone(),
            topics: fields.topics.clone(),
            queries: fields.queries.as_slice().to_vec(),
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_titles() {
        assert_eq!(OnboardingStep::BrandName.to_string(), "Brand Name");
        assert_eq!(OnboardingStep::Launch.to_string(), "Launch");
    }

    #[test]
    fn test_push_unique_ignores_blank_and_duplicates() {
        let mut fields = OnboardingFields::default();
        assert!(fields.add_competitor("Allbirds"));
        assert!(!fields.add_competitor("allbirds"));
        assert!(!fields.add_competitor("   "));
        assert!(fields.add_competitor(" Veja "));
        assert_eq!(fields.competitors, vec!["Allbirds", "Veja"]);
        assert!(fields.remove_competitor("Veja"));
        assert!(!fields.remove_competitor("Veja"));
    }

    #[test]
    fn test_remove_matches_like_add() {
        let mut fields = OnboardingFields::default();
        fields.add_competitor("Allbirds");
        fields.add_persona("Trail Runner");
        fields.add_topic("Recovery");

        assert!(fields.remove_competitor("allbirds"));
        assert!(fields.remove_persona("  trail runner "));
        assert!(fields.remove_topic("RECOVERY"));
        assert!(fields.competitors.is_empty());
        assert!(fields.personas.is_empty());
        assert!(fields.topics.is_empty());
    }

    #[test]
    fn test_competitors_step_is_optional() {
        let fields = OnboardingFields::default();
        assert!(OnboardingFlow
            .validate(OnboardingStep::Competitors, &fields)
            .is_ok());
        assert!(OnboardingFlow
            .validate(OnboardingStep::Personas, &fields)
            .is_err());
    }
}
