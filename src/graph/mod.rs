//! In-process property graph
//!
//! Labelled nodes, typed (optionally undirected) edges, string-first
//! properties and uniqueness constraints. This is the embedded load target;
//! the pipeline itself never mutates it except through the bulk-load
//! primitives in [`crate::load`].

pub mod edge;
pub mod node;
pub mod property;
pub mod store;
pub mod types;

pub use edge::Edge;
pub use node::Node;
pub use property::{PropertyMap, PropertyValue};
pub use store::{GraphError, GraphResult, GraphStatistics, GraphStore};
pub use types::{EdgeId, EdgeType, Label, NodeId};
