//! Node in the in-process property graph

use super::property::{PropertyMap, PropertyValue};
use super::types::{Label, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A labelled node with properties.
///
/// Nodes created by the bulk loader carry exactly one label, but the store
/// does not rely on that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub labels: BTreeSet<Label>,
    pub properties: PropertyMap,
}

impl Node {
    pub fn new(
        id: NodeId,
        labels: impl IntoIterator<Item = Label>,
        properties: PropertyMap,
    ) -> Self {
        Node {
            id,
            labels: labels.into_iter().collect(),
            properties,
        }
    }

    pub fn has_label(&self, label: &Label) -> bool {
        self.labels.contains(label)
    }

    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// The `uid` every pipeline node carries, if set
    pub fn uid(&self) -> Option<&str> {
        self.get_property("uid").and_then(PropertyValue::as_str)
    }
}
