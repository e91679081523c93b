//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatch fallback and control API
//! - Wire up middleware (tracing, limits, request ID, timeout)
//! - Bind server to listener
//! - Swap in a rebuilt route table when configuration changes
//! - Drain in-flight requests on shutdown
//!
//! # Design Decisions
//! - The active table lives behind an `ArcSwap`; requests never block on a reload
//! - A configuration that fails to build keeps the current table serving
//! - Listener settings are read once; changing them needs a restart

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin::setup_admin_router;
use crate::config::validation::validate_config;
use crate::config::{ConfigError, RouterConfig};
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response::{ApiError, DispatchRecord};
use crate::lifecycle::{self, StartupError};
use crate::observability::metrics;
use crate::routing::Router as RouteTable;
use crate::schema::SchemaSnapshot;

/// Everything a request needs, replaced as a unit on reload.
#[derive(Debug)]
pub struct RouterState {
    pub config: RouterConfig,
    pub router: RouteTable,
    pub schema: SchemaSnapshot,
    /// Incremented on every successful reload.
    pub generation: u64,
}

impl RouterState {
    pub fn new(config: RouterConfig, router: RouteTable, generation: u64) -> Result<Self, StartupError> {
        let schema = SchemaSnapshot::capture(&router)?;
        Ok(Self {
            config,
            router,
            schema,
            generation,
        })
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<RouterState>>,
}

impl AppState {
    pub fn new(state: RouterState) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(state)),
        }
    }

    /// Snapshot of the active state.
    pub fn current(&self) -> Arc<RouterState> {
        self.inner.load_full()
    }

    /// Rebuild the table for `config` and swap it in.
    ///
    /// On error the active state is left untouched.
    pub fn apply_config(&self, config: RouterConfig) -> Result<u64, StartupError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let previous = self.current();
        if previous.config.listener.bind_address != config.listener.bind_address {
            tracing::warn!(
                active = %previous.config.listener.bind_address,
                requested = %config.listener.bind_address,
                "Listener address changes take effect after restart"
            );
        }

        let router = lifecycle::assemble(&config)?;
        let generation = previous.generation + 1;
        let next = RouterState::new(config, router, generation)?;
        let entries = next.router.len();
        self.inner.store(Arc::new(next));

        tracing::info!(generation, entries, "Route table swapped");
        Ok(generation)
    }
}

/// HTTP server fronting the route table.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server serving `router` under `config`.
    pub fn new(config: RouterConfig, router: RouteTable) -> Result<Self, StartupError> {
        let request_secs = config.timeouts.request_secs;
        let max_concurrency = config.listener.max_connections;
        let state = AppState::new(RouterState::new(config, router, 0)?);
        let router = Self::build_router(request_secs, max_concurrency, state.clone());
        Ok(Self { router, state })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(request_secs: u64, max_concurrency: usize, state: AppState) -> Router {
        Router::new()
            .nest("/_router", setup_admin_router(state.clone()))
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id(request),
                )
            }))
            .layer(set_request_id_layer())
            .layer(request_timeout_layer(Duration::from_secs(request_secs)))
            .layer(concurrency_limit_layer(max_concurrency))
    }

    /// Shared state handle, for callers that reload out of band.
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Each configuration received on `config_updates` rebuilds the table;
    /// a message on `shutdown` stops accepting and drains in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let active = self.state.current();
        tracing::info!(
            address = %addr,
            entries = active.router.len(),
            "HTTP server starting"
        );
        drop(active);

        let state = self.state.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match state.apply_config(config) {
                    Ok(_) => metrics::record_reload("applied"),
                    Err(e) => {
                        tracing::error!(error = %e, "Rejected configuration, keeping current route table");
                        metrics::record_reload("rejected");
                    }
                }
            }
        });

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Answers 408 once a request outlives `timeout`.
fn request_timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

/// One semaphore shared by every route the layer is applied to.
///
/// axum layers each route and the fallback separately, so a per-service
/// limit would multiply the cap.
fn concurrency_limit_layer(max: usize) -> GlobalConcurrencyLimitLayer {
    GlobalConcurrencyLimitLayer::new(max)
}

/// Resolve the request path against the active table.
async fn dispatch_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let start = Instant::now();
    let current = state.current();
    let path = uri.path();
    let path = path.strip_prefix('/').unwrap_or(path);

    match current.router.resolve(path) {
        Ok(m) => {
            let record = DispatchRecord::from(m);
            tracing::debug!(
                path = %path,
                route = record.route.as_deref().unwrap_or("-"),
                target = %record.target,
                "Resolved"
            );
            metrics::record_request("matched", record.route.as_deref().unwrap_or(&record.target), start);
            Json(record).into_response()
        }
        Err(e) => {
            tracing::debug!(path = %path, "No route matched");
            metrics::record_request("not_found", "none", start);
            ApiError::from(e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use tower::{service_fn, Layer, Service, ServiceExt};

    use super::*;

    #[tokio::test]
    async fn test_concurrency_limit_is_shared_across_services() {
        let layer = concurrency_limit_layer(1);
        let mut control = layer.layer(service_fn(|_: ()| async { Ok::<_, Infallible>(()) }));
        let mut dispatch = layer.layer(service_fn(|_: ()| async { Ok::<_, Infallible>(()) }));

        // A ready service holds its permit until called.
        control.ready().await.unwrap();
        let blocked = tokio::time::timeout(Duration::from_millis(50), dispatch.ready()).await;
        assert!(blocked.is_err());

        control.call(()).await.unwrap();
        let freed = tokio::time::timeout(Duration::from_millis(50), dispatch.ready()).await;
        assert!(freed.is_ok());
    }

    #[tokio::test]
    async fn test_slow_request_times_out_with_408() {
        let slow = service_fn(|_: Request<Body>| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, Infallible>(Response::new(Body::empty()))
        });
        let service = request_timeout_layer(Duration::from_millis(20)).layer(slow);

        let response = service.oneshot(Request::new(Body::empty())).await.unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
