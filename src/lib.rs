//! PSC Graph
//!
//! Turns company register, persons-with-significant-control (PSC), officer,
//! statement and exemption filings into a deduplicated property graph of who
//! controls and who works for which company, including candidate links
//! between person records that probably describe the same human.
//!
//! # Stages
//!
//! - [`source`]: typed input collections and reference tables
//! - [`identity`]: UIDs and join keys derived from partial record fields
//! - [`entity`]: one canonical node table per label, merged on UID
//! - [`relationship`]: deduplicated edge tables
//! - [`matcher`]: `PROBABLY_SAME_PERSON` candidates from join-key blocks
//! - [`dataset`] and [`load`]: export, manifest, and ordered bulk load into
//!   a [`load::GraphTarget`]
//!
//! ## Example Usage
//!
//! ```no_run
//! use psc_graph::{EmbeddedTarget, Pipeline, PipelineConfig};
//!
//! # async fn run() -> psc_graph::PipelineResult<()> {
//! let pipeline = Pipeline::new(PipelineConfig::from_file("pipeline.yaml")?);
//! let target = EmbeddedTarget::new();
//! let report = pipeline.run(&target).await?;
//! println!("{} nodes, {} edges", report.total_nodes(), report.total_edges());
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod dataset;
pub mod entity;
pub mod error;
pub mod graph;
pub mod identity;
pub mod index;
pub mod load;
pub mod matcher;
pub mod pipeline;
pub mod relationship;
pub mod source;

// Re-export main types for convenience
pub use config::{InputConfig, PipelineConfig};

pub use dataset::{
    AttributeMerger, Dataset, DatasetDescriptor, EdgeDataset, EdgeSet, EdgeShape, EndpointMatch,
    Manifest, NodeDataset, NodeSet, Table,
};

pub use error::{PipelineError, PipelineResult};

pub use graph::{
    Edge, EdgeId, EdgeType, GraphError, GraphResult, GraphStore, Label, Node, NodeId,
    PropertyMap, PropertyValue,
};

pub use identity::{
    derive_company_control_uid, derive_join_key, derive_legal_person_uid, derive_person_uid,
    BirthMonth, PersonIdentity,
};

pub use load::{
    CypherScriptTarget, EmbeddedTarget, GraphTarget, LoadError, LoadReport, LoadResult,
};

pub use matcher::{match_people, MatchReport};

pub use pipeline::{build, export, BuildOutput, Pipeline};

pub use source::{SourceError, SourceResult, SourceSnapshot};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
