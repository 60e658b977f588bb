//! Identifier and name types shared by the graph store and the dataset manifest

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-internal handle for a node. Not the same thing as a node's `uid`
/// property, which is the identity the pipeline derives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        NodeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub(crate) fn slot(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Store-internal handle for an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EdgeId(pub u64);

impl EdgeId {
    pub fn new(id: u64) -> Self {
        EdgeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub(crate) fn slot(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

/// Node label, e.g. `Company` or `Person`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub const COMPANY: &'static str = "Company";
    pub const PERSON: &'static str = "Person";
    pub const LEGAL_PERSON: &'static str = "LegalPerson";
    pub const EXEMPTION: &'static str = "Exemption";
    pub const STATEMENT: &'static str = "Statement";
    pub const SUPER_SECURE: &'static str = "SuperSecure";
    pub const POSTCODE: &'static str = "Postcode";

    pub fn new(label: impl Into<String>) -> Self {
        Label(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Every label the pipeline produces, in the order constraints are created
    pub fn all_entity_labels() -> Vec<Label> {
        [
            Self::PERSON,
            Self::COMPANY,
            Self::EXEMPTION,
            Self::STATEMENT,
            Self::SUPER_SECURE,
            Self::POSTCODE,
            Self::LEGAL_PERSON,
        ]
        .into_iter()
        .map(Label::new)
        .collect()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label(s.to_string())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label(s)
    }
}

/// Relationship type, e.g. `CONTROLS` or `OFFICER_OF`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EdgeType(String);

impl EdgeType {
    pub const CONTROLS: &'static str = "CONTROLS";
    pub const OFFICER_OF: &'static str = "OFFICER_OF";
    pub const EXEMPT: &'static str = "EXEMPT";
    pub const STATES: &'static str = "STATES";
    pub const ADDRESS: &'static str = "ADDRESS";
    pub const PROBABLY_SAME_PERSON: &'static str = "PROBABLY_SAME_PERSON";

    pub fn new(edge_type: impl Into<String>) -> Self {
        EdgeType(edge_type.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeType {
    fn from(s: &str) -> Self {
        EdgeType(s.to_string())
    }
}

impl From<String> for EdgeType {
    fn from(s: String) -> Self {
        EdgeType(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_display() {
        assert_eq!(NodeId::new(7).to_string(), "NodeId(7)");
        assert_eq!(EdgeId::new(9).to_string(), "EdgeId(9)");
        assert!(NodeId::new(1) < NodeId::new(2));
    }

    #[test]
    fn test_entity_labels_cover_every_constraint_label() {
        let labels = Label::all_entity_labels();
        assert_eq!(labels.len(), 7);
        assert_eq!(labels[0].as_str(), "Person");
        assert!(labels.contains(&Label::new("LegalPerson")));
    }

    #[test]
    fn test_label_serializes_as_plain_string() {
        let json = serde_json::to_string(&Label::new(Label::COMPANY)).unwrap();
        assert_eq!(json, "\"Company\"");
        let edge: EdgeType = serde_json::from_str("\"CONTROLS\"").unwrap();
        assert_eq!(edge.as_str(), EdgeType::CONTROLS);
    }
}
