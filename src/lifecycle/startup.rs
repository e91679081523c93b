//! Startup orchestration.
//!
//! # Responsibilities
//! - Assemble the route table from the catalog and configured flags
//! - Record its shape in logs and metrics
//!
//! # Design Decisions
//! - Fail fast: a table that cannot be built is fatal at startup
//! - The same function rebuilds the table on reload, off the request path

use thiserror::Error;

use crate::catalog;
use crate::config::{ConfigError, RouterConfig};
use crate::observability::metrics;
use crate::routing::{Router, RoutingError};

/// Reasons the process cannot start.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("route table error: {0}")]
    Routing(#[from] RoutingError),

    #[error("schema rendering failed: {0}")]
    Schema(#[from] serde_json::Error),
}

/// Build the route table for `config`.
pub fn assemble(config: &RouterConfig) -> Result<Router, StartupError> {
    let enabled: Vec<&str> = config
        .features
        .iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect();
    tracing::info!(features = ?enabled, "Assembling route table");

    let router = Router::build(&catalog::root_mounts(), &config.features)?;
    metrics::record_table(router.len(), router.excluded_groups());
    Ok(router)
}
