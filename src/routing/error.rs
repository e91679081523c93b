//! Routing error types.

use thiserror::Error;

/// Errors produced while assembling or querying the route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// No entry in the active table accepts the path.
    #[error("no route matches path '{path}'")]
    NotFound { path: String },

    /// Two active entries share a fully qualified name.
    #[error("duplicate route name '{name}' (declared by '{first}' and '{second}')")]
    DuplicateRouteName {
        name: String,
        first: String,
        second: String,
    },

    /// Reverse lookup for a name the active table does not contain.
    #[error("unknown route name '{name}'")]
    UnknownRouteName { name: String },

    /// Reverse lookup without a value for a required placeholder.
    #[error("route '{route}' requires parameter '{param}'")]
    MissingParameter { route: String, param: String },

    /// Reverse lookup with a value rejected by the placeholder's converter.
    #[error("value '{value}' is not valid for parameter '{param}' ({constraint}) of route '{route}'")]
    InvalidParameterValue {
        route: String,
        param: String,
        constraint: String,
        value: String,
    },

    /// A template could not be parsed or compiled.
    #[error("invalid pattern '{template}': {reason}")]
    InvalidPattern { template: String, reason: String },
}

impl RoutingError {
    pub(crate) fn invalid_pattern(template: impl Into<String>, reason: impl Into<String>) -> Self {
        RoutingError::InvalidPattern {
            template: template.into(),
            reason: reason.into(),
        }
    }
}
