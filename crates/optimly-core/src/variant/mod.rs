//! Content variant domain module.
//!
//! - `model`: `ContentVariant`, its `ContentVariantDraft` boundary shape and
//!   field edits
//! - `set`: `VariantSet`, the ordered collection owned by a prompt lab session

mod model;
mod set;

pub use model::{CONTROL_VARIANT_ID, ContentVariant, ContentVariantDraft, VariantField};
pub use set::VariantSet;
