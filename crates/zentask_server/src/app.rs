//! Router assembly and server lifecycle.
//!
//! # Responsibility
//! - Build the shared [`AppState`] from configuration.
//! - Mount every route plus request logging and CORS layers.
//! - Serve until ctrl-c.

use crate::routes;
use crate::store::Store;
use anyhow::Context;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use log::{info, warn};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use zentask_core::{AppConfig, TokenKeys};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub keys: Arc<TokenKeys>,
}

impl AppState {
    pub fn new(store: Store, keys: TokenKeys) -> Self {
        Self {
            store,
            keys: Arc::new(keys),
        }
    }

    /// Opens the configured database and derives token keys from the secret.
    pub fn open(config: &AppConfig) -> anyhow::Result<Self> {
        let store = Store::open(&config.database)
            .with_context(|| format!("failed to open database `{}`", config.database))?;
        Ok(Self::new(store, TokenKeys::from_secret(&config.jwt_secret)))
    }
}

/// Builds the HTTP router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", axum::routing::get(routes::root))
        .nest("/api/auth", routes::auth::router())
        .nest("/api/projects", routes::projects::router())
        .nest("/api/tasks", routes::tasks::router())
        .nest("/api/dashboard", routes::dashboard::router())
        .layer(middleware::from_fn(log_requests))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let outcome = if status.is_client_error() || status.is_server_error() {
        "error"
    } else {
        "ok"
    };
    info!(
        "event=http_request module=server status={} method={} path={} http_status={} duration_ms={}",
        outcome,
        method,
        path,
        status.as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}

/// Binds `config.bind_addr` and serves until ctrl-c.
pub async fn run_server(config: &AppConfig) -> anyhow::Result<()> {
    let state = AppState::open(config)?;
    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind `{}`", config.bind_addr))?;
    let local_addr = listener.local_addr()?;
    info!(
        "event=server_start module=server status=ok addr={} database={}",
        local_addr, config.database
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=server_stop module=server status=error error=ctrl_c_handler:{err}");
    }
}

#[cfg(test)]
mod tests {
    use super::{build_router, AppState};
    use crate::store::Store;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use zentask_core::db::open_db_in_memory;
    use zentask_core::TokenKeys;

    fn app() -> axum::Router {
        let store = Store::from_connection(open_db_in_memory().unwrap());
        build_router(AppState::new(store, TokenKeys::from_secret("unit-secret")))
    }

    #[tokio::test]
    async fn root_is_public() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_route_without_token_is_unauthorized() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/projects")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
