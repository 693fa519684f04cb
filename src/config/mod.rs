//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → CLI overrides (bind address, port)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → handed to startup, split into per-subsystem sections
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; resources are fixed at startup
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, read_config, ConfigError};
pub use schema::ServerConfig;
pub use schema::ListenerConfig;
pub use schema::MonitorConfig;
pub use schema::ObservabilityConfig;
pub use schema::ResourcePair;
pub use schema::ResourcesConfig;
pub use schema::SiteConfig;
pub use validation::{validate_config, ValidationError};
