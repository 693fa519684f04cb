//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from the TOML config file.

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the failover server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address, request timeout).
    pub listener: ListenerConfig,

    /// Primary and fallback resource pairs.
    pub resources: ResourcesConfig,

    /// Availability monitor settings.
    pub monitor: MonitorConfig,

    /// Home page and cookie settings.
    pub site: SiteConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ServerConfig {
    /// Replace the port of the bind address, keeping the host.
    ///
    /// Leaves the address untouched when it does not parse; validation
    /// reports that case.
    pub fn with_port(mut self, port: u16) -> Self {
        if let Ok(mut addr) = self.listener.bind_address.parse::<SocketAddr>() {
            addr.set_port(port);
            self.listener.bind_address = addr.to_string();
        }
        self
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8097").
    pub bind_address: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8097".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// The two resource pairs the home page can embed.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ResourcesConfig {
    /// Monitored pair, rendered while every primary resource is reachable.
    pub primary: ResourcePair,

    /// Pair rendered while failover is active. Never probed.
    pub fallback: ResourcePair,
}

/// An image URL and a stylesheet URL rendered together.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ResourcePair {
    pub image_url: String,
    pub style_url: String,
}

/// Availability monitor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Enable the background monitor.
    pub enabled: bool,

    /// Interval between probe rounds in milliseconds.
    pub interval_ms: u64,

    /// Per-resource fetch timeout in milliseconds.
    pub timeout_ms: u64,

    /// User-Agent header sent with every probe.
    pub user_agent: String,
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 10_000,
            timeout_ms: 5_000,
            user_agent: "failover-server-probe".to_string(),
        }
    }
}

/// Home page and cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Optional path to a home page template. The embedded template is used when unset.
    pub template_path: Option<String>,

    /// Name of the cookie set on every page response.
    pub cookie_name: String,

    /// Value of the cookie set on every page response.
    pub cookie_value: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            template_path: None,
            cookie_name: "testcookiename".to_string(),
            cookie_value: "testcookievalue".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("pretty" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8097");
        assert_eq!(config.monitor.interval(), Duration::from_secs(10));
        assert_eq!(config.monitor.timeout(), Duration::from_secs(5));
        assert!(config.monitor.enabled);
        assert_eq!(config.site.cookie_name, "testcookiename");
    }

    #[test]
    fn test_with_port() {
        let config = ServerConfig::default().with_port(9000);
        assert_eq!(config.listener.bind_address, "0.0.0.0:9000");

        let mut broken = ServerConfig::default();
        broken.listener.bind_address = "nonsense".into();
        let broken = broken.with_port(9000);
        assert_eq!(broken.listener.bind_address, "nonsense");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [monitor]
            interval_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.monitor.interval_ms, 250);
        assert_eq!(config.monitor.timeout_ms, 5_000);
        assert_eq!(config.listener.request_timeout_secs, 30);
    }
}
