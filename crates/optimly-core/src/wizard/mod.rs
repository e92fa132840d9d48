//! Multi-step wizard state machines.
//!
//! - `session`: the generic `WizardSession` driven by a `WizardFlow`
//! - `onboarding`: the seven-step brand onboarding flow
//!
//! The prompt lab reuses `WizardSession` for its three top-level steps; see
//! [`crate::prompt_lab`].

mod onboarding;
mod session;

pub use onboarding::{OnboardingFields, OnboardingFlow, OnboardingStep};
pub use session::{AdvanceOutcome, WizardFlow, WizardSession};
