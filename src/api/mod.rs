mod cors;
mod error;
mod handlers;

pub use cors::cors_middleware;
pub use error::ApiError;

use crate::config::Config;
use crate::store::ProxyStore;
use crate::upstream::FilterApi;
use anyhow::{Context, Result};
use axum::{
    http::{header, StatusCode, Uri},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use rust_embed::RustEmbed;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[derive(RustEmbed)]
#[folder = "$OUT_DIR/ui"]
struct Asset;

pub struct ApiState {
    upstream: Arc<dyn FilterApi>,
    store: ProxyStore,
    config: Config,
}

impl ApiState {
    pub fn new(upstream: Arc<dyn FilterApi>, store: ProxyStore, config: Config) -> Arc<Self> {
        Arc::new(Self {
            upstream,
            store,
            config,
        })
    }
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/config", get(handlers::get_config))
        .route(
            "/api/getDomainStatusAll",
            get(handlers::get_domain_status_all),
        )
        .route("/api/setDomainStatus", post(handlers::set_domain_status))
        .route("/api/getBlockingStatus", get(handlers::get_blocking_status))
        .route("/api/setBlockingStatus", post(handlers::set_blocking_status))
        .fallback(static_handler)
        .layer(middleware::from_fn(cors_middleware))
        .with_state(state)
}

/// Binds `addr` and serves until `shutdown` resolves.
pub async fn start_api_server(
    state: Arc<ApiState>,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;
    Ok(())
}

async fn static_handler(uri: Uri) -> impl IntoResponse {
    let path = uri.path().trim_start_matches('/');
    let path = if path.is_empty() { "index.html" } else { path };

    match Asset::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}
