//! HTTP request layer.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → handlers.rs
//!         → FailoverSignal::mode()
//!         → render.rs (primary or fallback pair into the template)
//!     → Send to client
//! ```

pub mod handlers;
pub mod render;
pub mod request;
pub mod server;

pub use render::{HomeTemplate, RenderContext, TemplateError};
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
