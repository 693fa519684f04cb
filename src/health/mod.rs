//! Resource availability and failover subsystem.
//!
//! # Data Flow
//! ```text
//! Monitor loop (monitor.rs):
//!     Periodic timer
//!     → probe.rs checks every primary resource concurrently
//!     → round aggregated (all outcomes known)
//!     → state.rs updated once
//!     → round report published for /status
//!
//! Request layer:
//!     → reads state.rs through FailoverSignal
//!     → renders primary or fallback resource pair
//! ```
//!
//! # Design Decisions
//! - Failover is all-or-nothing: one unreachable resource switches the whole pair
//! - No hysteresis or retries; an outcome stands until the next round
//! - Network errors are data, never fatal to the loop

pub mod monitor;
pub mod probe;
pub mod state;

pub use monitor::{aggregate, FailoverMonitor, LatestRound, RoundReport};
pub use probe::{probe, HttpProber, Probe, ProbeError, ProbeResult, Resource, ResourceKind};
pub use state::{FailoverMode, FailoverSignal, FailoverState};
