//! Node and edge datasets, their merge, export and manifest

pub mod manifest;
pub mod merge;
pub mod table;
pub mod writer;

pub use manifest::{DatasetDescriptor, EdgeDataset, EdgeShape, EndpointMatch, Manifest, NodeDataset};
pub use merge::{merge_tables, AttributeMerger};
pub use table::Table;
pub use writer::{read_table, DatasetWriter};

use crate::graph::Label;

/// A finished node table, one row per UID
#[derive(Debug, Clone)]
pub struct NodeSet {
    pub name: String,
    pub label: Label,
    pub table: Table,
}

/// A finished edge table plus how to load it
#[derive(Debug, Clone)]
pub struct EdgeSet {
    pub name: String,
    pub shape: EdgeShape,
    pub table: Table,
}

/// Build output in production order
#[derive(Debug, Clone)]
pub enum Dataset {
    Nodes(NodeSet),
    Edges(EdgeSet),
}

impl Dataset {
    pub fn name(&self) -> &str {
        match self {
            Dataset::Nodes(set) => &set.name,
            Dataset::Edges(set) => &set.name,
        }
    }

    pub fn table(&self) -> &Table {
        match self {
            Dataset::Nodes(set) => &set.table,
            Dataset::Edges(set) => &set.table,
        }
    }
}
