use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::response::{ApiError, DispatchRecord};
use crate::http::server::AppState;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub version: String,
    pub status: String,
    pub generation: u64,
    pub entries: usize,
    pub excluded_groups: usize,
    pub features: Vec<String>,
    pub schema_etag: String,
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReverseRequest {
    pub name: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReverseResponse {
    pub name: String,
    /// Table form, no leading slash.
    pub path: String,
    /// Request path the server answers on.
    pub url: String,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let inner = state.current();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "operational".to_string(),
        generation: inner.generation,
        entries: inner.router.len(),
        excluded_groups: inner.router.excluded_groups(),
        features: inner
            .config
            .features
            .iter()
            .filter_map(|(name, on)| on.then(|| name.to_string()))
            .collect(),
        schema_etag: inner.schema.etag.clone(),
    })
}

/// Schema of the active table, with conditional GET support.
pub async fn get_routes(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let inner = state.current();
    let etag = inner.schema.etag.clone();

    let unchanged = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').any(|tag| tag.trim() == etag || tag.trim() == "*"))
        .unwrap_or(false);

    if unchanged {
        return (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response();
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::ETAG, etag),
        ],
        inner.schema.json.clone(),
    )
        .into_response()
}

pub async fn get_resolve(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<DispatchRecord>, ApiError> {
    let path = query
        .path
        .ok_or_else(|| ApiError::BadRequest("query parameter 'path' is required".to_string()))?;
    let path = path.strip_prefix('/').unwrap_or(&path);

    let inner = state.current();
    let m = inner.router.resolve(path)?;
    Ok(Json(DispatchRecord::from(m)))
}

pub async fn post_reverse(
    State(state): State<AppState>,
    Json(request): Json<ReverseRequest>,
) -> Result<Json<ReverseResponse>, ApiError> {
    let inner = state.current();
    let path = inner.router.reverse(&request.name, request.params)?;
    Ok(Json(ReverseResponse {
        url: format!("/{}", path),
        path,
        name: request.name,
    }))
}
