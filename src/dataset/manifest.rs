//! Run-scoped record of exported datasets
//!
//! The manifest lists every exported dataset in production order together
//! with what the loader needs to import it. It is append-only; the loader
//! reads it, never edits it.

use crate::graph::{EdgeType, Label};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDataset {
    pub location: PathBuf,
    pub label: Label,
}

/// How an edge endpoint is found in the store: the node of `label` whose
/// `store_attribute` equals the row's `dataset_column` cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointMatch {
    pub label: Label,
    pub store_attribute: String,
    pub dataset_column: String,
}

impl EndpointMatch {
    /// Match on the store-side `uid`
    pub fn uid(label: &str, dataset_column: &str) -> Self {
        EndpointMatch {
            label: Label::new(label),
            store_attribute: "uid".to_string(),
            dataset_column: dataset_column.to_string(),
        }
    }
}

/// Relationship shape of an edge dataset, independent of where it is stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeShape {
    pub relationship: EdgeType,
    pub source: EndpointMatch,
    pub target: EndpointMatch,
    pub directional: bool,
    /// Columns copied onto the relationship; `None` sets no properties
    pub attributes: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDataset {
    pub location: PathBuf,
    #[serde(flatten)]
    pub shape: EdgeShape,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DatasetDescriptor {
    Nodes(NodeDataset),
    Edges(EdgeDataset),
}

impl DatasetDescriptor {
    pub fn location(&self) -> &Path {
        match self {
            DatasetDescriptor::Nodes(d) => &d.location,
            DatasetDescriptor::Edges(d) => &d.location,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    entries: Vec<DatasetDescriptor>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, descriptor: DatasetDescriptor) {
        self.entries.push(descriptor);
    }

    pub fn iter(&self) -> impl Iterator<Item = &DatasetDescriptor> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn node_datasets(&self) -> impl Iterator<Item = &NodeDataset> {
        self.entries.iter().filter_map(|entry| match entry {
            DatasetDescriptor::Nodes(d) => Some(d),
            DatasetDescriptor::Edges(_) => None,
        })
    }

    pub fn edge_datasets(&self) -> impl Iterator<Item = &EdgeDataset> {
        self.entries.iter().filter_map(|entry| match entry {
            DatasetDescriptor::Edges(d) => Some(d),
            DatasetDescriptor::Nodes(_) => None,
        })
    }

    /// Every edge endpoint label must be produced by some node dataset
    pub fn validate(&self) -> Result<(), String> {
        let labels: BTreeSet<&Label> = self.node_datasets().map(|d| &d.label).collect();
        for edge in self.edge_datasets() {
            for endpoint in [&edge.shape.source, &edge.shape.target] {
                if !labels.contains(&endpoint.label) {
                    return Err(format!(
                        "{} dataset {} matches {} nodes but no node dataset has that label",
                        edge.shape.relationship,
                        edge.location.display(),
                        endpoint.label
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
