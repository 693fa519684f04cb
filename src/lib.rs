//! Home page server with resource failover.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::ServerConfig;
pub use health::{FailoverMonitor, FailoverState};
pub use http::HttpServer;
pub use lifecycle::{Application, Shutdown};
