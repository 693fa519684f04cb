//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve on a bound listener

use std::sync::Arc;
use std::time::Duration;

use axum::{http::HeaderValue, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ListenerConfig, ResourcesConfig};
use crate::health::{FailoverSignal, LatestRound};
use crate::http::handlers;
use crate::http::render::HomeTemplate;
use crate::http::request::MakeRequestUuid;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Read-only view of the failover flag.
    pub failover: Arc<dyn FailoverSignal>,
    pub resources: Arc<ResourcesConfig>,
    pub template: Arc<HomeTemplate>,
    pub reports: LatestRound,
    /// Pre-built `Set-Cookie` value.
    pub cookie: HeaderValue,
}

/// HTTP server for the home page and diagnostics.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &ListenerConfig, state: AppState) -> Self {
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ListenerConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::home))
            .route("/generic", get(handlers::generic))
            .route("/generic/{*rest}", get(handlers::generic))
            .route("/item/{name}", get(handlers::item))
            .route("/status", get(handlers::status))
            .fallback(handlers::not_found)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router).await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
