//! Schema document types.

use serde::{Deserialize, Serialize};

/// Machine-readable description of every reachable endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Entries in match order.
    pub entries: Vec<SchemaEntry>,
}

/// One endpoint of the active table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaEntry {
    /// Fully qualified route name, `null` for unnamed patterns.
    pub name: Option<String>,
    pub path_template: String,
    /// `exact` or `prefix`.
    pub kind: String,
    pub parameters: Vec<SchemaParameter>,
    pub target_ref: String,
}

/// A placeholder and the constraint its values must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaParameter {
    pub name: String,
    pub constraint: String,
}

impl SchemaDocument {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry by fully qualified name.
    pub fn find(&self, name: &str) -> Option<&SchemaEntry> {
        self.entries.iter().find(|e| e.name.as_deref() == Some(name))
    }
}
