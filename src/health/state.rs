//! Failover state.
//!
//! # States
//! - Primary: primary resources are rendered
//! - Fallback: fallback resources are rendered
//!
//! # State Transitions
//! ```text
//! Primary → Fallback: a probe round had at least one unreachable resource
//! Fallback → Primary: a probe round had every resource reachable
//! ```
//!
//! # Design Decisions
//! - One writer (the monitor), many readers (request handlers)
//! - Stored in a single atomic byte; a read sees the old or the new mode, never a mix
//! - Request handlers receive a read-only [`FailoverSignal`]

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use serde::Serialize;

/// Which resource set is being served.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailoverMode {
    Primary = 0,
    Fallback = 1,
}

impl FailoverMode {
    pub fn from_active(active: bool) -> Self {
        if active {
            FailoverMode::Fallback
        } else {
            FailoverMode::Primary
        }
    }

    pub fn is_active(self) -> bool {
        self == FailoverMode::Fallback
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FailoverMode::Primary => "primary",
            FailoverMode::Fallback => "fallback",
        }
    }
}

impl From<u8> for FailoverMode {
    fn from(val: u8) -> Self {
        match val {
            0 => FailoverMode::Primary,
            _ => FailoverMode::Fallback,
        }
    }
}

impl fmt::Display for FailoverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of the failover flag handed to the request layer.
pub trait FailoverSignal: Send + Sync {
    fn is_active(&self) -> bool;

    fn mode(&self) -> FailoverMode {
        FailoverMode::from_active(self.is_active())
    }
}

/// Shared failover flag. Clones share the same cell.
#[derive(Debug, Clone, Default)]
pub struct FailoverState {
    mode: Arc<AtomicU8>,
}

impl FailoverState {
    /// Create a state in `Primary` mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// True while failover is active.
    pub fn get(&self) -> bool {
        self.mode().is_active()
    }

    pub fn mode(&self) -> FailoverMode {
        FailoverMode::from(self.mode.load(Ordering::Acquire))
    }

    /// Publish a new value, returning the mode it replaced.
    pub fn set(&self, active: bool) -> FailoverMode {
        let next = FailoverMode::from_active(active);
        FailoverMode::from(self.mode.swap(next as u8, Ordering::AcqRel))
    }
}

impl FailoverSignal for FailoverState {
    fn is_active(&self) -> bool {
        self.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize};

    #[test]
    fn test_starts_primary() {
        let state = FailoverState::new();
        assert!(!state.get());
        assert_eq!(state.mode(), FailoverMode::Primary);
    }

    #[test]
    fn test_set_returns_previous() {
        let state = FailoverState::new();
        assert_eq!(state.set(true), FailoverMode::Primary);
        assert_eq!(state.set(true), FailoverMode::Fallback);
        assert_eq!(state.set(false), FailoverMode::Fallback);
        assert!(!state.get());
    }

    #[test]
    fn test_clones_share_cell() {
        let writer = FailoverState::new();
        let reader: Arc<dyn FailoverSignal> = Arc::new(writer.clone());

        writer.set(true);
        assert!(reader.is_active());
        assert_eq!(reader.mode(), FailoverMode::Fallback);
    }

    #[test]
    fn test_concurrent_reads_see_whole_values() {
        let state = FailoverState::new();
        let done = AtomicBool::new(false);
        let reads = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    loop {
                        let raw = state.mode.load(Ordering::Acquire);
                        assert!(raw == FailoverMode::Primary as u8 || raw == FailoverMode::Fallback as u8);
                        reads.fetch_add(1, Ordering::Relaxed);
                        if done.load(Ordering::Relaxed) {
                            break;
                        }
                    }
                });
            }

            for i in 0..10_000 {
                state.set(i % 2 == 0);
            }
            done.store(true, Ordering::Relaxed);
        });

        // Last write was i = 9999 → inactive.
        assert!(!state.get());
        assert!(reads.load(Ordering::Relaxed) > 0);
    }
}
