//! Simulation domain module.
//!
//! - `model`: simulated answers (`SimulationResult`, `LlmModel`, `Sentiment`)
//! - `analysis`: intent detection and content-match outputs

mod analysis;
mod model;

pub use analysis::{ContentMatchReport, IntentAnalysis, MatchBreakdown, MatchResult};
pub use model::{LlmModel, Sentiment, SimulationResult};
