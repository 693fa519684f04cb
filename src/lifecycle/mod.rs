//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → template, cookie, prober → monitor + server → bind
//!
//! Running:
//!     Monitor task and HTTP server run side by side
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     Ctrl+C → broadcast → monitor loop exits, server stops accepting
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then core, then listener
//! - No connection draining; in-flight requests are dropped on exit

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{Application, StartupError};
