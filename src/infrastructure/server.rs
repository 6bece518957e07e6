use axum::{Json, Router};
use log::info;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::domain::repositories::{PageRequest, Sort, DEFAULT_PAGE_SIZE};

/// HTTP server shared by every service: bind, report the bound address, and
/// serve a router until a shutdown signal arrives.
pub struct HttpServer {
    listener: TcpListener,
    addr: SocketAddr,
}

impl HttpServer {
    /// Bind `host:port`; port 0 picks a free port (used by the tests).
    pub async fn bind(host: &str, port: u16) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(format!("{}:{}", host, port)).await?;
        let addr = listener.local_addr()?;
        Ok(Self { listener, addr })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn serve(self, app: Router) -> anyhow::Result<()> {
        info!("Listening on {}", self.addr);
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

/// Liveness probe handler mounted on every service.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "UP" }))
}

/// Build a page request from the conventional `page`, `size`, and
/// `sort=field,asc` query parameters.
pub fn page_request(page: Option<usize>, size: Option<usize>, sort: Option<&str>) -> PageRequest {
    PageRequest::new(
        page.unwrap_or(0),
        size.filter(|s| *s > 0).unwrap_or(DEFAULT_PAGE_SIZE),
    )
    .with_sort(sort.and_then(Sort::parse))
}
