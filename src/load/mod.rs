//! Load orchestration
//!
//! A [`GraphTarget`] is anything offering CSV-style bulk import plus
//! pattern-create. [`load_manifest`] drives one through the fixed sequence:
//!
//! 1. reset: delete bounded batches until the store is empty, then drop
//!    every uniqueness constraint
//! 2. constrain: a `uid` uniqueness constraint per configured label
//! 3. every node dataset
//! 4. every edge dataset
//!
//! Edge loads match existing nodes rather than creating them, so all node
//! datasets finish before the first edge dataset starts. The first failing
//! step aborts the run.

pub mod cypher;
pub mod embedded;

pub use cypher::CypherScriptTarget;
pub use embedded::EmbeddedTarget;

use crate::config::PipelineConfig;
use crate::dataset::{EdgeDataset, Manifest};
use crate::error::{PipelineError, PipelineResult};
use crate::graph::{GraphError, Label};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset {location} has no column '{column}'")]
    MissingColumn { location: PathBuf, column: String },

    #[error("Target error: {0}")]
    Target(String),
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Bulk-load primitives of a target graph store
#[async_trait]
pub trait GraphTarget: Send + Sync {
    /// Detach-delete up to `limit` elements; returns how many went
    async fn delete_batch(&self, limit: usize) -> LoadResult<usize>;

    /// Drop every uniqueness constraint; returns how many were dropped
    async fn drop_uniqueness_constraints(&self) -> LoadResult<usize>;

    async fn create_uniqueness_constraint(&self, label: &Label, property: &str) -> LoadResult<()>;

    /// One node of `label` per row, with a property per column present in
    /// the dataset
    async fn create_nodes_from_dataset(&self, location: &Path, label: &Label) -> LoadResult<usize>;

    /// One relationship per row between the matched source and target
    async fn create_edges_from_dataset(&self, dataset: &EdgeDataset) -> LoadResult<usize>;
}

/// What one dataset load produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetLoad {
    pub location: PathBuf,
    /// Node label or relationship type
    pub kind: String,
    pub created: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub deleted: usize,
    pub constraints_dropped: usize,
    pub constraints_created: usize,
    pub nodes: Vec<DatasetLoad>,
    pub edges: Vec<DatasetLoad>,
}

impl LoadReport {
    pub fn total_nodes(&self) -> usize {
        self.nodes.iter().map(|d| d.created).sum()
    }

    pub fn total_edges(&self) -> usize {
        self.edges.iter().map(|d| d.created).sum()
    }
}

/// Reset `target` and load every dataset in `manifest`
pub async fn load_manifest<T>(
    target: &T,
    manifest: &Manifest,
    config: &PipelineConfig,
) -> PipelineResult<LoadReport>
where
    T: GraphTarget + ?Sized,
{
    manifest.validate().map_err(PipelineError::Manifest)?;
    let mut report = LoadReport::default();

    let batch = config.delete_batch_size.max(1);
    loop {
        let deleted = target
            .delete_batch(batch)
            .await
            .map_err(PipelineError::load("reset"))?;
        if deleted == 0 {
            break;
        }
        report.deleted += deleted;
        debug!("Deleted batch of {}", deleted);
    }
    report.constraints_dropped = target
        .drop_uniqueness_constraints()
        .await
        .map_err(PipelineError::load("drop constraints"))?;
    info!(
        "Reset target: {} elements deleted, {} constraints dropped",
        report.deleted, report.constraints_dropped
    );

    for label in &config.constraint_labels {
        target
            .create_uniqueness_constraint(label, "uid")
            .await
            .map_err(PipelineError::load(format!("constrain {}", label)))?;
        report.constraints_created += 1;
    }
    info!("Created {} uniqueness constraints", report.constraints_created);

    for dataset in manifest.node_datasets() {
        let created = target
            .create_nodes_from_dataset(&dataset.location, &dataset.label)
            .await
            .map_err(PipelineError::load(format!("nodes {}", dataset.location.display())))?;
        info!("Loaded {} {} nodes from {}", created, dataset.label, dataset.location.display());
        report.nodes.push(DatasetLoad {
            location: dataset.location.clone(),
            kind: dataset.label.to_string(),
            created,
        });
    }

    for dataset in manifest.edge_datasets() {
        let created = target
            .create_edges_from_dataset(dataset)
            .await
            .map_err(PipelineError::load(format!("edges {}", dataset.location.display())))?;
        info!(
            "Loaded {} {} edges from {}",
            created,
            dataset.shape.relationship,
            dataset.location.display()
        );
        report.edges.push(DatasetLoad {
            location: dataset.location.clone(),
            kind: dataset.shape.relationship.to_string(),
            created,
        });
    }

    info!(
        "Load finished: {} nodes, {} edges",
        report.total_nodes(),
        report.total_edges()
    );
    Ok(report)
}
