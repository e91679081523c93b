//! Control API mounted under `/_router`.
//!
//! Read-only views of the active route table plus resolve/reverse probes.
//! Every route sits behind bearer authentication; when `admin.enabled` is
//! false in the active configuration the whole surface answers 404.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub fn setup_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/status", get(get_status))
        .route("/routes", get(get_routes))
        .route("/resolve", get(get_resolve))
        .route("/reverse", post(post_reverse))
        .layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
