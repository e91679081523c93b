//! Schema export from the active route table.

use sha2::{Digest, Sha256};

use crate::routing::{PatternKind, Router};
use crate::schema::document::{SchemaDocument, SchemaEntry, SchemaParameter};

/// Walks a built [`Router`] and describes its endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaExporter;

impl SchemaExporter {
    /// Describe every active entry, in match order.
    pub fn export(router: &Router) -> SchemaDocument {
        let entries = router
            .entries()
            .iter()
            .map(|entry| SchemaEntry {
                name: entry.name().map(str::to_string),
                path_template: entry.template().source().to_string(),
                kind: match entry.kind() {
                    PatternKind::Exact => "exact".to_string(),
                    PatternKind::Prefix => "prefix".to_string(),
                },
                parameters: entry
                    .template()
                    .params()
                    .map(|(name, converter)| SchemaParameter {
                        name: name.to_string(),
                        constraint: converter.constraint(),
                    })
                    .collect(),
                target_ref: entry.target().to_string(),
            })
            .collect();
        SchemaDocument { entries }
    }

    /// Pretty JSON rendering of a document.
    pub fn to_json(document: &SchemaDocument) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(document)
    }

    /// Strong ETag for a rendered document.
    pub fn etag(json: &str) -> String {
        format!("\"{}\"", hex::encode(Sha256::digest(json.as_bytes())))
    }
}

/// A document rendered once and reused until the table is replaced.
#[derive(Debug, Clone)]
pub struct SchemaSnapshot {
    pub document: SchemaDocument,
    pub json: String,
    pub etag: String,
}

impl SchemaSnapshot {
    pub fn capture(router: &Router) -> Result<Self, serde_json::Error> {
        let document = SchemaExporter::export(router);
        let json = SchemaExporter::to_json(&document)?;
        let etag = SchemaExporter::etag(&json);
        Ok(Self {
            document,
            json,
            etag,
        })
    }
}
