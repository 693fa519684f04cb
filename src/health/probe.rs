//! Resource probing.
//!
//! # Responsibilities
//! - Fetch every monitored resource once per round, concurrently
//! - Bound each fetch by the configured timeout
//! - Classify outcomes: reachable only on a 200 response

use std::fmt;
use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures_util::future::join_all;
use reqwest::{Client, StatusCode};
use serde::{Serialize, Serializer};
use thiserror::Error;
use tokio::time;

use crate::config::{MonitorConfig, ResourcePair};

/// Role of a resource on the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Image,
    Style,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Style => "style",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote resource whose reachability is monitored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub kind: ResourceKind,
    pub url: String,
}

impl Resource {
    pub fn new(kind: ResourceKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
        }
    }

    /// The monitored set for a pair: image first, then stylesheet.
    pub fn from_pair(pair: &ResourcePair) -> Vec<Resource> {
        vec![
            Resource::new(ResourceKind::Image, pair.image_url.clone()),
            Resource::new(ResourceKind::Style, pair.style_url.clone()),
        ]
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.url)
    }
}

/// Why a resource was classified unreachable.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ProbeError {
    /// Connection refused, DNS failure, TLS error, broken response.
    #[error("network error: {0}")]
    Network(String),

    /// The fetch did not complete within the deadline.
    #[error("timed out after {0} ms")]
    Timeout(u64),

    /// The server answered with something other than 200.
    #[error("unexpected status {0}")]
    Status(u16),
}

impl ProbeError {
    /// Short label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ProbeError::Network(_) => "network",
            ProbeError::Timeout(_) => "timeout",
            ProbeError::Status(_) => "status",
        }
    }
}

/// Outcome of checking one resource in one round.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    pub resource: Resource,
    pub reachable: bool,
    #[serde(serialize_with = "unix_millis")]
    pub observed_at: SystemTime,
    /// Cause when unreachable.
    pub failure: Option<ProbeError>,
}

impl ProbeResult {
    pub fn new(resource: Resource, outcome: Result<(), ProbeError>) -> Self {
        Self {
            resource,
            reachable: outcome.is_ok(),
            observed_at: SystemTime::now(),
            failure: outcome.err(),
        }
    }
}

/// Serialize a timestamp as milliseconds since the Unix epoch.
pub(crate) fn unix_millis<S: Serializer>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
    let millis = time
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;
    serializer.serialize_u64(millis)
}

/// A single reachability check against one resource.
///
/// Implementations only perform the fetch. The deadline is applied by
/// [`probe`] around every call, so a check that never resolves is still
/// abandoned. A retry policy belongs in a `Probe` that wraps another one.
pub trait Probe: Send + Sync {
    fn check(&self, resource: &Resource) -> impl Future<Output = Result<(), ProbeError>> + Send;
}

/// Check every resource concurrently and wait for all of them.
///
/// Results come back in input order. Each check is bounded by `timeout`;
/// a check that exceeds it is dropped, releasing its connection, and is
/// reported as [`ProbeError::Timeout`].
pub async fn probe<P: Probe>(prober: &P, resources: &[Resource], timeout: Duration) -> Vec<ProbeResult> {
    let checks = resources.iter().map(|resource| async move {
        let outcome = match time::timeout(timeout, prober.check(resource)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ProbeError::Timeout(timeout.as_millis() as u64)),
        };
        ProbeResult::new(resource.clone(), outcome)
    });
    join_all(checks).await
}

/// Probes resources with an HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    timeout: Duration,
}

impl HttpProber {
    /// Proxies from the environment are ignored: reachability is measured
    /// from this host directly.
    pub fn new(config: &MonitorConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            timeout: config.timeout(),
        })
    }
}

impl Probe for HttpProber {
    async fn check(&self, resource: &Resource) -> Result<(), ProbeError> {
        let response = self
            .client
            .get(&resource.url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProbeError::Timeout(self.timeout.as_millis() as u64)
                } else {
                    ProbeError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::OK {
            Ok(())
        } else {
            Err(ProbeError::Status(status.as_u16()))
        }
    }
}
