//! API schema export.
//!
//! # Data Flow
//! ```text
//! Router (active, flattened table)
//!     → exporter.rs (walk entries in match order)
//!     → document.rs (SchemaDocument: name, pathTemplate, parameters, targetRef)
//!     → JSON text + ETag (cached per table generation by the server)
//! ```
//!
//! # Design Decisions
//! - Reads the same entry list `resolve` uses, so docs cannot drift from routing
//! - Pure: no clock, no randomness, no hash-map iteration order
//! - Field names and order are stable for round-trip tooling

pub mod document;
pub mod exporter;

pub use document::{SchemaDocument, SchemaEntry, SchemaParameter};
pub use exporter::{SchemaExporter, SchemaSnapshot};
