//! Manager for uniqueness constraints
//!
//! Handles creation, dropping, and enforcement of (label, property)
//! uniqueness constraints for the in-process graph store.

use super::unique_index::UniqueIndex;
use crate::graph::{Label, NodeId, PropertyMap};
use std::collections::{BTreeMap, BTreeSet};

/// Key identifying one uniqueness constraint
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintKey {
    pub label: Label,
    pub property: String,
}

/// A uniqueness violation found while indexing a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub key: ConstraintKey,
    pub value: String,
    pub existing: NodeId,
}

/// All uniqueness constraints of a store
#[derive(Debug, Default)]
pub struct ConstraintManager {
    constraints: BTreeMap<ConstraintKey, UniqueIndex>,
}

impl ConstraintManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constraint. Returns false when it already existed.
    pub fn create(&mut self, key: ConstraintKey, index: UniqueIndex) -> bool {
        if self.constraints.contains_key(&key) {
            return false;
        }
        self.constraints.insert(key, index);
        true
    }

    pub fn exists(&self, label: &Label, property: &str) -> bool {
        self.constraints.contains_key(&ConstraintKey {
            label: label.clone(),
            property: property.to_string(),
        })
    }

    /// Drop every constraint, returning how many were dropped
    pub fn drop_all(&mut self) -> usize {
        let count = self.constraints.len();
        self.constraints.clear();
        count
    }

    pub fn keys(&self) -> Vec<ConstraintKey> {
        self.constraints.keys().cloned().collect()
    }

    pub fn index(&self, label: &Label, property: &str) -> Option<&UniqueIndex> {
        self.constraints.get(&ConstraintKey {
            label: label.clone(),
            property: property.to_string(),
        })
    }

    /// Check a prospective node against every applicable constraint without
    /// changing anything.
    pub fn check(
        &self,
        labels: &BTreeSet<Label>,
        properties: &PropertyMap,
    ) -> Result<(), Violation> {
        for (key, index) in &self.constraints {
            if !labels.contains(&key.label) {
                continue;
            }
            if let Some(value) = properties.get(&key.property) {
                if let Some(existing) = index.get(value) {
                    return Err(Violation {
                        key: key.clone(),
                        value: value.to_string(),
                        existing,
                    });
                }
            }
        }
        Ok(())
    }

    /// Index a node that already passed `check`
    pub fn insert(&mut self, node_id: NodeId, labels: &BTreeSet<Label>, properties: &PropertyMap) {
        for (key, index) in self.constraints.iter_mut() {
            if !labels.contains(&key.label) {
                continue;
            }
            if let Some(value) = properties.get(&key.property) {
                // check() ran first, so a clash here means a caller skipped it
                let _ = index.insert(value, node_id);
            }
        }
    }

    pub fn remove(&mut self, node_id: NodeId, labels: &BTreeSet<Label>, properties: &PropertyMap) {
        for (key, index) in self.constraints.iter_mut() {
            if !labels.contains(&key.label) {
                continue;
            }
            if let Some(value) = properties.get(&key.property) {
                index.remove(value, node_id);
            }
        }
    }
}
