//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use api_router::config::RouterConfig;
use api_router::http::HttpServer;
use api_router::lifecycle::{self, Shutdown};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

pub const API_KEY: &str = "test-admin-key";

/// A router bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub config_updates: mpsc::UnboundedSender<RouterConfig>,
    shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestServer {
    pub async fn start(config: RouterConfig) -> Self {
        let router = lifecycle::assemble(&config).unwrap();
        let server = HttpServer::new(config, router).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.subscribe();
        let (config_updates, updates_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let _ = server.run(listener, updates_rx, server_shutdown).await;
        });

        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .no_proxy()
            .build()
            .unwrap();

        Self {
            addr,
            client,
            config_updates,
            shutdown,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn control(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(&format!("/_router{}", path)))
            .bearer_auth(API_KEY)
    }

    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

/// Configuration with the control API enabled.
#[allow(dead_code)]
pub fn admin_config() -> RouterConfig {
    let mut config = RouterConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.admin.enabled = true;
    config.admin.api_key = API_KEY.to_string();
    config
}

/// Poll `check` until it returns true or the deadline passes.
#[allow(dead_code)]
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..50 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}
