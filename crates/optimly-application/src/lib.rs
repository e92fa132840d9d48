//! Application layer for Optimly.
//!
//! Use cases that tie the wizard state machines to the mock backend and the
//! export surfaces. Each session owns its own state and operation tracker.

pub mod app;
pub mod onboarding_usecase;
pub mod prompt_lab_usecase;
pub mod session;

pub use app::OptimlyApp;
pub use onboarding_usecase::OnboardingUseCase;
pub use prompt_lab_usecase::PromptLabUseCase;
pub use session::SessionRegistry;
