//! Periodic snapshot refresh.
//!
//! Refreshes run inline on the scheduler's own task, one after another. A
//! refresh that outlasts the period delays the next one and missed ticks
//! are skipped rather than replayed.

use chrono::Local;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use crate::config::CalendarConfig;
use crate::publisher::SnapshotPublisher;
use crate::snapshot::{build_snapshot, BuildOutcome};
use crate::source::EventSource;

/// Build a snapshot for the current local week.
pub async fn build_now(calendars: &[CalendarConfig], source: &dyn EventSource) -> BuildOutcome {
    let started = Instant::now();
    let outcome = build_snapshot(calendars, source, &Local::now()).await;

    tracing::info!(
        "Built snapshot for week of {} in {:?}: {} events, {} dropped, {} of {} calendars failed",
        outcome.snapshot.week_start,
        started.elapsed(),
        outcome.report.total_events(),
        outcome.report.total_dropped(),
        outcome.report.failed_calendars(),
        calendars.len()
    );

    outcome
}

pub struct RefreshScheduler {
    calendars: Arc<[CalendarConfig]>,
    source: Arc<dyn EventSource>,
    publisher: SnapshotPublisher,
    period: Duration,
}

impl RefreshScheduler {
    pub fn new(
        calendars: Arc<[CalendarConfig]>,
        source: Arc<dyn EventSource>,
        publisher: SnapshotPublisher,
        period: Duration,
    ) -> Self {
        Self {
            calendars,
            source,
            publisher,
            period,
        }
    }

    /// Build and publish one snapshot.
    pub async fn refresh(&self) {
        tracing::debug!("Running refresh cycle");
        let outcome = build_now(&self.calendars, self.source.as_ref()).await;
        self.publisher.publish(outcome);
    }

    /// Refresh every period until `shutdown` turns true or its sender is
    /// dropped.
    ///
    /// The first refresh happens one period from now; the caller publishes
    /// the startup snapshot itself.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = time::interval_at(time::Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!("Refresh scheduler started (interval: {:?})", self.period);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.refresh().await,
                _ = stop_requested(&mut shutdown) => break,
            }
        }

        tracing::info!("Refresh scheduler stopped");
    }
}

/// Resolves once shutdown is signalled or the signal sender is gone.
async fn stop_requested(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
