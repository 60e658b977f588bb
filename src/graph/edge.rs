//! Edge in the in-process property graph

use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeId, EdgeType, NodeId};
use serde::{Deserialize, Serialize};

/// A typed relationship between two nodes.
///
/// `directed == false` marks a symmetric relationship such as
/// `PROBABLY_SAME_PERSON`; it is still stored once, with `source`/`target`
/// recording the order the loader saw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub edge_type: EdgeType,
    pub directed: bool,
    pub properties: PropertyMap,
}

impl Edge {
    pub fn new(
        id: EdgeId,
        source: NodeId,
        target: NodeId,
        edge_type: impl Into<EdgeType>,
        directed: bool,
        properties: PropertyMap,
    ) -> Self {
        Edge {
            id,
            source,
            target,
            edge_type: edge_type.into(),
            directed,
            properties,
        }
    }

    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// True when this edge joins `a` and `b`, honouring direction
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        if self.directed {
            self.source == a && self.target == b
        } else {
            (self.source == a && self.target == b) || (self.source == b && self.target == a)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directed_edge_connects_one_way() {
        let edge = Edge::new(
            EdgeId::new(1),
            NodeId::new(1),
            NodeId::new(2),
            EdgeType::CONTROLS,
            true,
            PropertyMap::new(),
        );
        assert!(edge.connects(NodeId::new(1), NodeId::new(2)));
        assert!(!edge.connects(NodeId::new(2), NodeId::new(1)));
    }

    #[test]
    fn test_undirected_edge_connects_both_ways() {
        let mut props = PropertyMap::new();
        props.insert("note".to_string(), "x".into());
        let edge = Edge::new(
            EdgeId::new(2),
            NodeId::new(5),
            NodeId::new(6),
            EdgeType::PROBABLY_SAME_PERSON,
            false,
            props,
        );
        assert!(edge.connects(NodeId::new(6), NodeId::new(5)));
        assert_eq!(edge.get_property("note").and_then(PropertyValue::as_str), Some("x"));
    }
}
