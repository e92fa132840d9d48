//! Discovery query domain module.
//!
//! - `model`: `DiscoveryQuery`, `FunnelStage`, field edits, suggestions and
//!   per-query visibility observations
//! - `list`: `QueryList`, the id-unique collection owned by a session

mod list;
mod model;

pub use list::QueryList;
pub use model::{DiscoveryQuery, FunnelStage, QueryField, QueryResult, QuerySuggestion};
