//! Property values carried by nodes and edges

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A bulk-imported cell. Every dataset column arrives as text, so a value
/// is either a string or absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    Null,
}

impl PropertyValue {
    /// Interpret a dataset cell. Empty cells are null, never `""`.
    pub fn from_cell(cell: &str) -> Self {
        if cell.is_empty() {
            PropertyValue::Null
        } else {
            PropertyValue::Text(cell.to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            PropertyValue::Null => None,
        }
    }

    /// Key used by uniqueness indexes. Nulls never take part in uniqueness.
    pub fn index_key(&self) -> Option<&str> {
        self.as_str()
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(s) => write!(f, "'{}'", s),
            PropertyValue::Null => f.write_str("null"),
        }
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Text(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

/// Properties of one node or edge
pub type PropertyMap = HashMap<String, PropertyValue>;
