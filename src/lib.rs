//! Hierarchical API request router.
//!
//! Sub-domains declare route groups; feature flags decide which optional
//! groups are mounted; the resulting flat table resolves request paths,
//! reverses route names into URLs and exports a machine-readable schema.

// Core
pub mod catalog;
pub mod routing;
pub mod schema;

// Serving
pub mod admin;
pub mod http;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{FeatureFlags, Router, RoutingError};
pub use schema::SchemaExporter;
