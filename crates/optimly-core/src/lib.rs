//! Domain layer for Optimly.
//!
//! Holds the entities, scoring heuristics, aggregation rules and the wizard
//! state machines. Nothing here performs I/O beyond reading the config file.

pub mod aggregation;
pub mod brand;
pub mod config;
pub mod error;
pub mod prompt_lab;
pub mod query;
pub mod scoring;
pub mod simulation;
pub mod variant;
pub mod wizard;

// Re-export common error type
pub use error::{OptimlyError, Result};
