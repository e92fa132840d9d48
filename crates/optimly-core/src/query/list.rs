use serde::{Deserialize, Serialize};

use super::model::{DiscoveryQuery, QueryField};
use crate::error::{OptimlyError, Result};

const ENTITY: &str = "discovery query";

/// Ordered list of discovery queries with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryList {
    items: Vec<DiscoveryQuery>,
}

impl QueryList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a query, rejecting an id that is already present.
    pub fn add(&mut self, query: DiscoveryQuery) -> Result<()> {
        if self.contains(&query.id) {
            return Err(OptimlyError::duplicate_id(ENTITY, query.id));
        }
        self.items.push(query);
        Ok(())
    }

    /// Appends generated queries. Stops at the first duplicate id and leaves
    /// the list untouched in that case.
    pub fn extend(&mut self, queries: impl IntoIterator<Item = DiscoveryQuery>) -> Result<()> {
        let mut staged = self.items.clone();
        for query in queries {
            if staged.iter().any(|q| q.id == query.id) {
                return Err(OptimlyError::duplicate_id(ENTITY, query.id));
            }
            staged.push(query);
        }
        self.items = staged;
        Ok(())
    }

    /// Edits one field of the query with the given id.
    pub fn update(&mut self, id: &str, field: QueryField) -> Result<&DiscoveryQuery> {
        let query = self
            .items
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| OptimlyError::not_found(ENTITY, id))?;
        field.apply(query);
        Ok(query)
    }

    /// Removes and returns the query with the given id.
    pub fn remove(&mut self, id: &str) -> Result<DiscoveryQuery> {
        let index = self
            .items
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| OptimlyError::not_found(ENTITY, id))?;
        Ok(self.items.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&DiscoveryQuery> {
        self.items.iter().find(|q| q.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiscoveryQuery> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[DiscoveryQuery] {
        &self.items
    }
}

impl<'de> Deserialize<'de> for QueryList {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let items = Vec::<DiscoveryQuery>::deserialize(deserializer)?;
        let mut list = QueryList::new();
        list.extend(items).map_err(serde::de::Error::custom)?;
        Ok(list)
    }
}
