//! Hash index backing one uniqueness constraint

use crate::graph::{NodeId, PropertyValue};
use std::collections::HashMap;

/// Value -> owning node for one (label, property) pair
#[derive(Debug, Clone, Default)]
pub struct UniqueIndex {
    index: HashMap<String, NodeId>,
}

impl UniqueIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node currently holding `value`, if any
    pub fn get(&self, value: &PropertyValue) -> Option<NodeId> {
        value.index_key().and_then(|key| self.index.get(key).copied())
    }

    /// Record `value` for `node_id`. Returns the existing owner when the
    /// value is already taken by a different node; nothing is changed then.
    pub fn insert(&mut self, value: &PropertyValue, node_id: NodeId) -> Result<(), NodeId> {
        let Some(key) = value.index_key() else {
            return Ok(());
        };
        match self.index.get(key) {
            Some(&owner) if owner != node_id => Err(owner),
            _ => {
                self.index.insert(key.to_string(), node_id);
                Ok(())
            }
        }
    }

    pub fn remove(&mut self, value: &PropertyValue, node_id: NodeId) {
        if let Some(key) = value.index_key() {
            if self.index.get(key) == Some(&node_id) {
                self.index.remove(key);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
