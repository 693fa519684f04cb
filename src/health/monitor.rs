//! Failover monitor loop.
//!
//! # Responsibilities
//! - Run a probe round every interval
//! - Aggregate the round before touching shared state
//! - Publish the resulting mode and the round report

use std::sync::Arc;
use std::time::{Instant, SystemTime};

use arc_swap::ArcSwapOption;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::config::MonitorConfig;
use crate::health::probe::{probe, unix_millis, Probe, ProbeResult, Resource};
use crate::health::state::{FailoverMode, FailoverState};
use crate::observability::metrics;

/// Aggregate of one complete probe round.
#[derive(Debug, Clone, Serialize)]
pub struct RoundReport {
    /// 1-based round counter.
    pub round: u64,
    pub mode: FailoverMode,
    pub results: Vec<ProbeResult>,
    #[serde(serialize_with = "unix_millis")]
    pub completed_at: SystemTime,
    pub duration_ms: u64,
}

impl RoundReport {
    pub fn unreachable(&self) -> impl Iterator<Item = &ProbeResult> {
        self.results.iter().filter(|r| !r.reachable)
    }
}

/// Mode implied by a finished round: any unreachable resource means fallback.
pub fn aggregate(results: &[ProbeResult]) -> FailoverMode {
    FailoverMode::from_active(results.iter().any(|r| !r.reachable))
}

/// Latest round report, swapped in atomically after each round.
#[derive(Debug, Clone, Default)]
pub struct LatestRound(Arc<ArcSwapOption<RoundReport>>);

impl LatestRound {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until the first round completes.
    pub fn load(&self) -> Option<Arc<RoundReport>> {
        self.0.load_full()
    }

    pub(crate) fn publish(&self, report: Arc<RoundReport>) {
        self.0.store(Some(report));
    }
}

/// Periodically probes the primary resources and drives [`FailoverState`].
pub struct FailoverMonitor<P> {
    prober: P,
    resources: Vec<Resource>,
    state: FailoverState,
    latest: LatestRound,
    config: MonitorConfig,
    rounds: u64,
}

impl<P: Probe> FailoverMonitor<P> {
    pub fn new(prober: P, resources: Vec<Resource>, state: FailoverState, config: MonitorConfig) -> Self {
        Self {
            prober,
            resources,
            state,
            latest: LatestRound::new(),
            config,
            rounds: 0,
        }
    }

    /// Handle to the reports this monitor publishes.
    pub fn latest(&self) -> LatestRound {
        self.latest.clone()
    }

    /// Run rounds until shutdown is broadcast. The first round starts immediately.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        if !self.config.enabled {
            tracing::info!("Failover monitor disabled");
            return;
        }

        tracing::info!(
            interval_ms = self.config.interval_ms,
            timeout_ms = self.config.timeout_ms,
            resources = self.resources.len(),
            "Failover monitor starting"
        );

        let mut ticker = time::interval(self.config.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_round().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Failover monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Probe every resource once, then update the failover state.
    pub async fn run_round(&mut self) -> Arc<RoundReport> {
        self.rounds += 1;
        let round = self.rounds;
        let started = Instant::now();

        let results = probe(&self.prober, &self.resources, self.config.timeout()).await;

        for result in &results {
            metrics::record_probe(result);
            if let Some(failure) = &result.failure {
                tracing::warn!(
                    round,
                    kind = %result.resource.kind,
                    url = %result.resource.url,
                    error = %failure,
                    "Resource unreachable"
                );
            }
        }

        // Every outcome is known at this point. The report goes out before
        // the flag so a reader never sees a mode newer than the latest report.
        let mode = aggregate(&results);
        let duration = started.elapsed();
        let report = Arc::new(RoundReport {
            round,
            mode,
            results,
            completed_at: SystemTime::now(),
            duration_ms: duration.as_millis() as u64,
        });
        self.latest.publish(report.clone());
        let previous = self.state.set(mode.is_active());

        if previous != mode {
            metrics::record_transition(mode);
            match mode {
                FailoverMode::Fallback => tracing::warn!(
                    round,
                    unreachable = report.unreachable().count(),
                    "Failover activated, serving fallback resources"
                ),
                FailoverMode::Primary => tracing::info!(
                    round,
                    "All primary resources reachable, failover cleared"
                ),
            }
        } else {
            tracing::debug!(round, mode = %mode, duration_ms = duration.as_millis() as u64, "Probe round complete");
        }
        metrics::record_round(mode, duration);

        report
    }
}
