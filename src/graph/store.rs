//! In-memory graph storage
//!
//! The embedded load target. Nodes and edges live in slot arenas addressed by
//! their ids, with adjacency lists, a label index, an edge-type index, and
//! optional uniqueness constraints that are enforced on every insert.

use super::edge::Edge;
use super::node::Node;
use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeId, EdgeType, Label, NodeId};
use crate::index::{ConstraintKey, ConstraintManager, UniqueIndex};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("Invalid edge: source node {0} does not exist")]
    InvalidEdgeSource(NodeId),

    #[error("Invalid edge: target node {0} does not exist")]
    InvalidEdgeTarget(NodeId),

    #[error("Uniqueness constraint on :{label}({property}) violated by value {value} (held by {existing})")]
    ConstraintViolation {
        label: Label,
        property: String,
        value: String,
        existing: NodeId,
    },
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Per-label and per-type counts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphStatistics {
    pub nodes_by_label: BTreeMap<Label, usize>,
    pub edges_by_type: BTreeMap<EdgeType, usize>,
}

/// In-memory graph storage
///
/// - nodes: slot per NodeId
/// - edges: slot per EdgeId
/// - outgoing/incoming: adjacency lists per node slot
/// - label_index: Label -> NodeIds
/// - edge_type_index: EdgeType -> EdgeIds
#[derive(Debug)]
pub struct GraphStore {
    nodes: Vec<Option<Node>>,
    edges: Vec<Option<Edge>>,
    outgoing: Vec<Vec<EdgeId>>,
    incoming: Vec<Vec<EdgeId>>,
    free_node_ids: Vec<u64>,
    free_edge_ids: Vec<u64>,
    label_index: HashMap<Label, HashSet<NodeId>>,
    edge_type_index: HashMap<EdgeType, HashSet<EdgeId>>,
    constraints: ConstraintManager,
    next_node_id: u64,
    next_edge_id: u64,
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        GraphStore {
            nodes: Vec::with_capacity(1024),
            edges: Vec::with_capacity(4096),
            outgoing: Vec::with_capacity(1024),
            incoming: Vec::with_capacity(1024),
            free_node_ids: Vec::new(),
            free_edge_ids: Vec::new(),
            label_index: HashMap::new(),
            edge_type_index: HashMap::new(),
            constraints: ConstraintManager::new(),
            next_node_id: 1,
            next_edge_id: 1,
        }
    }

    /// Create a node, enforcing every uniqueness constraint that applies to
    /// its labels. Nothing is written when a constraint is violated.
    pub fn create_node(
        &mut self,
        labels: Vec<Label>,
        properties: PropertyMap,
    ) -> GraphResult<NodeId> {
        let label_set: BTreeSet<Label> = labels.iter().cloned().collect();
        self.constraints
            .check(&label_set, &properties)
            .map_err(|v| GraphError::ConstraintViolation {
                label: v.key.label,
                property: v.key.property,
                value: v.value,
                existing: v.existing,
            })?;

        let node_id = NodeId::new(self.allocate_node_id());
        let idx = node_id.slot();
        if idx >= self.nodes.len() {
            self.nodes.resize(idx + 1, None);
            self.outgoing.resize(idx + 1, Vec::new());
            self.incoming.resize(idx + 1, Vec::new());
        }

        self.constraints.insert(node_id, &label_set, &properties);
        for label in &labels {
            self.label_index.entry(label.clone()).or_default().insert(node_id);
        }

        self.nodes[idx] = Some(Node::new(node_id, labels, properties));
        Ok(node_id)
    }

    fn allocate_node_id(&mut self) -> u64 {
        self.free_node_ids.pop().unwrap_or_else(|| {
            let id = self.next_node_id;
            self.next_node_id += 1;
            id
        })
    }

    fn allocate_edge_id(&mut self) -> u64 {
        self.free_edge_ids.pop().unwrap_or_else(|| {
            let id = self.next_edge_id;
            self.next_edge_id += 1;
            id
        })
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.slot()).and_then(Option::as_ref)
    }

    pub fn has_node(&self, id: NodeId) -> bool {
        self.get_node(id).is_some()
    }

    /// Nodes with `label` whose `property` equals `value`.
    ///
    /// Uses the uniqueness index when one exists for (label, property),
    /// otherwise scans the label index.
    pub fn find_nodes(&self, label: &Label, property: &str, value: &PropertyValue) -> Vec<NodeId> {
        if value.is_null() {
            return Vec::new();
        }
        if let Some(index) = self.constraints.index(label, property) {
            return index.get(value).into_iter().collect();
        }
        self.label_index
            .get(label)
            .map(|ids| {
                let mut found: Vec<NodeId> = ids
                    .iter()
                    .copied()
                    .filter(|&id| {
                        self.get_node(id)
                            .and_then(|n| n.get_property(property))
                            .map_or(false, |v| v == value)
                    })
                    .collect();
                found.sort();
                found
            })
            .unwrap_or_default()
    }

    /// Create an edge between two existing nodes
    pub fn create_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        edge_type: impl Into<EdgeType>,
        directed: bool,
        properties: PropertyMap,
    ) -> GraphResult<EdgeId> {
        if !self.has_node(source) {
            return Err(GraphError::InvalidEdgeSource(source));
        }
        if !self.has_node(target) {
            return Err(GraphError::InvalidEdgeTarget(target));
        }

        let edge_id = EdgeId::new(self.allocate_edge_id());
        let idx = edge_id.slot();
        if idx >= self.edges.len() {
            self.edges.resize(idx + 1, None);
        }

        let edge_type = edge_type.into();
        self.outgoing[source.slot()].push(edge_id);
        self.incoming[target.slot()].push(edge_id);
        self.edge_type_index.entry(edge_type.clone()).or_default().insert(edge_id);

        self.edges[idx] = Some(Edge::new(edge_id, source, target, edge_type, directed, properties));
        Ok(edge_id)
    }

    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.slot()).and_then(Option::as_ref)
    }

    pub fn delete_edge(&mut self, id: EdgeId) -> GraphResult<Edge> {
        let edge = self
            .edges
            .get_mut(id.slot())
            .and_then(Option::take)
            .ok_or(GraphError::EdgeNotFound(id))?;

        self.free_edge_ids.push(id.as_u64());
        if let Some(set) = self.edge_type_index.get_mut(&edge.edge_type) {
            set.remove(&id);
        }
        if let Some(adj) = self.outgoing.get_mut(edge.source.slot()) {
            adj.retain(|&eid| eid != id);
        }
        if let Some(adj) = self.incoming.get_mut(edge.target.slot()) {
            adj.retain(|&eid| eid != id);
        }
        Ok(edge)
    }

    /// Delete a node together with every edge touching it
    pub fn delete_node(&mut self, id: NodeId) -> GraphResult<Node> {
        let idx = id.slot();
        let node = self
            .nodes
            .get_mut(idx)
            .and_then(Option::take)
            .ok_or(GraphError::NodeNotFound(id))?;

        self.free_node_ids.push(id.as_u64());
        for label in &node.labels {
            if let Some(set) = self.label_index.get_mut(label) {
                set.remove(&id);
            }
        }
        self.constraints.remove(id, &node.labels, &node.properties);

        let outgoing = std::mem::take(&mut self.outgoing[idx]);
        let incoming = std::mem::take(&mut self.incoming[idx]);
        for edge_id in outgoing.iter().chain(incoming.iter()) {
            // Self-loops appear in both lists; the second delete is a miss
            let _ = self.delete_edge(*edge_id);
        }
        Ok(node)
    }

    /// Detach-delete at most `limit` nodes. Returns how many were deleted,
    /// so callers can loop until it reaches zero.
    pub fn delete_batch(&mut self, limit: usize) -> usize {
        let victims: Vec<NodeId> = self
            .nodes
            .iter()
            .flatten()
            .map(|n| n.id)
            .take(limit)
            .collect();
        victims
            .into_iter()
            .filter(|&id| self.delete_node(id).is_ok())
            .count()
    }

    /// Create a uniqueness constraint on (label, property).
    ///
    /// Fails without creating anything when existing nodes already share a
    /// value. Returns false when the constraint already existed.
    pub fn create_unique_constraint(&mut self, label: &Label, property: &str) -> GraphResult<bool> {
        if self.constraints.exists(label, property) {
            return Ok(false);
        }

        let mut index = UniqueIndex::new();
        let mut members: Vec<NodeId> = self
            .label_index
            .get(label)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default();
        members.sort();
        for id in members {
            let Some(value) = self.get_node(id).and_then(|n| n.get_property(property)) else {
                continue;
            };
            if let Err(existing) = index.insert(value, id) {
                return Err(GraphError::ConstraintViolation {
                    label: label.clone(),
                    property: property.to_string(),
                    value: value.to_string(),
                    existing,
                });
            }
        }

        Ok(self.constraints.create(
            ConstraintKey {
                label: label.clone(),
                property: property.to_string(),
            },
            index,
        ))
    }

    /// Drop every uniqueness constraint, returning how many were dropped
    pub fn drop_unique_constraints(&mut self) -> usize {
        self.constraints.drop_all()
    }

    pub fn constraints(&self) -> Vec<ConstraintKey> {
        self.constraints.keys()
    }

    pub fn get_outgoing_edges(&self, node_id: NodeId) -> Vec<&Edge> {
        self.outgoing
            .get(node_id.slot())
            .map(|ids| ids.iter().filter_map(|&id| self.get_edge(id)).collect())
            .unwrap_or_default()
    }

    pub fn get_incoming_edges(&self, node_id: NodeId) -> Vec<&Edge> {
        self.incoming
            .get(node_id.slot())
            .map(|ids| ids.iter().filter_map(|&id| self.get_edge(id)).collect())
            .unwrap_or_default()
    }

    pub fn get_nodes_by_label(&self, label: &Label) -> Vec<&Node> {
        self.label_index
            .get(label)
            .map(|ids| ids.iter().filter_map(|&id| self.get_node(id)).collect())
            .unwrap_or_default()
    }

    pub fn get_edges_by_type(&self, edge_type: &EdgeType) -> Vec<&Edge> {
        self.edge_type_index
            .get(edge_type)
            .map(|ids| ids.iter().filter_map(|&id| self.get_edge(id)).collect())
            .unwrap_or_default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().flatten().count()
    }

    pub fn statistics(&self) -> GraphStatistics {
        GraphStatistics {
            nodes_by_label: self
                .label_index
                .iter()
                .filter(|(_, ids)| !ids.is_empty())
                .map(|(label, ids)| (label.clone(), ids.len()))
                .collect(),
            edges_by_type: self
                .edge_type_index
                .iter()
                .filter(|(_, ids)| !ids.is_empty())
                .map(|(edge_type, ids)| (edge_type.clone(), ids.len()))
                .collect(),
        }
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
