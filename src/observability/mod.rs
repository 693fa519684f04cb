//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Monitor and request layer produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event (round, url, request id)
//! - Metrics are cheap and optional; no recorder means no cost

pub mod logging;
pub mod metrics;
