//! Response bodies and error mapping.
//!
//! # Responsibilities
//! - Shape the dispatch result returned for a resolved path
//! - Map routing errors to HTTP status codes with a JSON body
//!
//! # Design Decisions
//! - Every error body is `{"error": <code>, "message": <text>}`
//! - Table construction errors never reach a request; they map to 500 if they do

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::routing::{RouteMatch, RoutingError};

/// Body returned when a path resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRecord {
    pub route: Option<String>,
    pub target: String,
    pub params: BTreeMap<String, String>,
    pub remainder: Option<String>,
}

impl From<RouteMatch<'_>> for DispatchRecord {
    fn from(m: RouteMatch<'_>) -> Self {
        Self {
            route: m.name().map(str::to_string),
            target: m.target().to_string(),
            params: m.params,
            remainder: m.remainder,
        }
    }
}

/// Error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// Error surfaced by dispatch and control handlers.
#[derive(Debug)]
pub enum ApiError {
    Routing(RoutingError),
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Routing(RoutingError::NotFound { .. })
            | ApiError::Routing(RoutingError::UnknownRouteName { .. }) => StatusCode::NOT_FOUND,
            ApiError::Routing(RoutingError::MissingParameter { .. })
            | ApiError::Routing(RoutingError::InvalidParameterValue { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Routing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Routing(RoutingError::NotFound { .. }) => "not_found",
            ApiError::Routing(RoutingError::UnknownRouteName { .. }) => "unknown_route_name",
            ApiError::Routing(RoutingError::MissingParameter { .. }) => "missing_parameter",
            ApiError::Routing(RoutingError::InvalidParameterValue { .. }) => "invalid_parameter_value",
            ApiError::Routing(_) => "route_table_error",
            ApiError::BadRequest(_) => "bad_request",
        }
    }
}

impl From<RoutingError> for ApiError {
    fn from(e: RoutingError) -> Self {
        ApiError::Routing(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Routing(e) => e.to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
        };
        if status.is_server_error() {
            tracing::error!(error = %message, "Request failed");
        }
        let body = ErrorBody {
            error: self.code().to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
