//! Startup orchestration.
//!
//! # Responsibilities
//! - Build every subsystem from a validated configuration
//! - Start the failover monitor alongside the HTTP server
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Failover state exists before the server, so the first request reads it
//! - Listener binds last

use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::http::header::InvalidHeaderValue;
use axum::http::HeaderValue;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::health::{FailoverMonitor, FailoverState, HttpProber, LatestRound, Resource};
use crate::http::{AppState, HomeTemplate, HttpServer, TemplateError};
use crate::lifecycle::shutdown::Shutdown;

/// Errors that stop the process during startup or serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load template {path}: {source}")]
    Template {
        path: String,
        #[source]
        source: TemplateError,
    },

    #[error("invalid cookie: {0}")]
    Cookie(#[from] InvalidHeaderValue),

    #[error("failed to build probe client: {0}")]
    ProbeClient(#[from] reqwest::Error),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}

/// A fully wired server, bound but not yet serving.
pub struct Application {
    listener: TcpListener,
    server: HttpServer,
    monitor: FailoverMonitor<HttpProber>,
    failover: FailoverState,
    reports: LatestRound,
}

impl Application {
    /// Build all subsystems and bind the listener.
    pub async fn build(config: ServerConfig) -> Result<Self, StartupError> {
        let template_path = config.site.template_path.as_deref();
        let template = HomeTemplate::load(template_path.map(Path::new)).map_err(|source| StartupError::Template {
            path: template_path.unwrap_or("<embedded>").to_string(),
            source,
        })?;
        let cookie = HeaderValue::from_str(&format!("{}={}", config.site.cookie_name, config.site.cookie_value))?;

        let failover = FailoverState::new();
        let monitor = FailoverMonitor::new(
            HttpProber::new(&config.monitor)?,
            Resource::from_pair(&config.resources.primary),
            failover.clone(),
            config.monitor.clone(),
        );
        let reports = monitor.latest();

        let state = AppState {
            failover: Arc::new(failover.clone()),
            resources: Arc::new(config.resources.clone()),
            template: Arc::new(template),
            reports: reports.clone(),
            cookie,
        };
        let server = HttpServer::new(&config.listener, state);

        let listener = TcpListener::bind(&config.listener.bind_address)
            .await
            .map_err(|source| StartupError::Bind {
                address: config.listener.bind_address.clone(),
                source,
            })?;

        tracing::info!(
            bind_address = %config.listener.bind_address,
            primary_image = %config.resources.primary.image_url,
            primary_style = %config.resources.primary.style_url,
            monitor_enabled = config.monitor.enabled,
            "Application initialized"
        );

        Ok(Self {
            listener,
            server,
            monitor,
            failover,
            reports,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Handle to the failover flag the monitor drives.
    pub fn failover(&self) -> FailoverState {
        self.failover.clone()
    }

    pub fn reports(&self) -> LatestRound {
        self.reports.clone()
    }

    /// Serve until shutdown is broadcast or the server fails.
    pub async fn run(self, shutdown: &Shutdown) -> Result<(), StartupError> {
        let monitor = tokio::spawn(self.monitor.run(shutdown.subscribe()));
        let mut stop = shutdown.subscribe();

        let result = tokio::select! {
            res = self.server.run(self.listener) => res.map_err(StartupError::Serve),
            _ = stop.recv() => {
                tracing::info!("Stopping HTTP server");
                Ok(())
            }
        };

        monitor.abort();
        result
    }
}
