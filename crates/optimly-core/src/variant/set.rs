use serde::Serialize;

use super::model::{ContentVariant, VariantField};
use crate::error::{OptimlyError, Result};

const ENTITY: &str = "content variant";

/// Insertion-ordered variants with unique ids and at most one control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VariantSet {
    items: Vec<ContentVariant>,
}

impl VariantSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, variant: ContentVariant) -> Result<()> {
        if self.get(variant.id()).is_some() {
            return Err(OptimlyError::duplicate_id(ENTITY, variant.id()));
        }
        if variant.is_control() {
            if let Some(existing) = self.control() {
                return Err(OptimlyError::DuplicateControl {
                    existing: existing.id().to_string(),
                });
            }
        }
        self.items.push(variant);
        Ok(())
    }

    /// Replaces the control variant, or inserts it if none exists yet.
    pub fn upsert_control(&mut self, variant: ContentVariant) -> Result<()> {
        if !variant.is_control() {
            return Err(OptimlyError::internal(format!(
                "variant '{}' is not a control variant",
                variant.id()
            )));
        }
        match self.items.iter_mut().find(|v| v.is_control()) {
            Some(slot) => *slot = variant,
            None => self.items.insert(0, variant),
        }
        Ok(())
    }

    pub fn update(&mut self, id: &str, field: VariantField) -> Result<&ContentVariant> {
        let variant = self
            .items
            .iter_mut()
            .find(|v| v.id() == id)
            .ok_or_else(|| OptimlyError::not_found(ENTITY, id))?;
        variant.apply(field)?;
        Ok(variant)
    }

    pub fn remove(&mut self, id: &str) -> Result<ContentVariant> {
        let index = self
            .items
            .iter()
            .position(|v| v.id() == id)
            .ok_or_else(|| OptimlyError::not_found(ENTITY, id))?;
        Ok(self.items.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&ContentVariant> {
        self.items.iter().find(|v| v.id() == id)
    }

    pub fn control(&self) -> Option<&ContentVariant> {
        self.items.iter().find(|v| v.is_control())
    }

    /// Variants other than the control, in insertion order.
    pub fn candidates(&self) -> impl Iterator<Item = &ContentVariant> {
        self.items.iter().filter(|v| !v.is_control())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentVariant> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::ContentVariantDraft;

    fn variant(id: &str, is_control: bool) -> ContentVariant {
        ContentVariant::from_draft(ContentVariantDraft {
            id: Some(id.into()),
            content: Some(format!("content of {id}")),
            is_control: Some(is_control),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_second_control_is_rejected() {
        let mut set = VariantSet::new();
        set.insert(variant("control", true)).unwrap();

        let err = set.insert(variant("baseline-2", true)).unwrap_err();
        assert_eq!(
            err,
            OptimlyError::DuplicateControl {
                existing: "control".into()
            }
        );
    }

    #[test]
    fn test_upsert_control_replaces_in_place() {
        let mut set = VariantSet::new();
        set.insert(variant("v1", false)).unwrap();
        set.upsert_control(ContentVariant::control("first").unwrap())
            .unwrap();
        set.upsert_control(ContentVariant::control("second").unwrap())
            .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.control().unwrap().content(), "second");
        assert_eq!(set.candidates().count(), 1);
    }

    #[test]
    fn test_update_content_is_read_back_exactly() {
        let mut set = VariantSet::new();
        set.insert(variant("v1", false)).unwrap();

        set.update("v1", VariantField::Content("New copy, ethically sourced.".into()))
            .unwrap();

        assert_eq!(
            set.get("v1").unwrap().content(),
            "New copy, ethically sourced."
        );
    }
}
