//! Holds the snapshot readers see.
//!
//! A refresh builds a complete new [`FamilySnapshot`] and then replaces the
//! published value in one step. Readers clone an `Arc` to whatever is
//! current and keep using it for the rest of their request, so they never
//! see a partially built week and never wait for a refresh to finish.

use family_types::{FamilySnapshot, RefreshReport};
use std::sync::Arc;
use tokio::sync::watch;

use crate::snapshot::BuildOutcome;

/// Snapshot and report published together.
#[derive(Debug, Clone)]
struct Published {
    snapshot: Arc<FamilySnapshot>,
    report: Arc<RefreshReport>,
}

impl From<BuildOutcome> for Published {
    fn from(outcome: BuildOutcome) -> Self {
        Self {
            snapshot: Arc::new(outcome.snapshot),
            report: Arc::new(outcome.report),
        }
    }
}

/// Writer side, owned by the refresh task.
#[derive(Debug)]
pub struct SnapshotPublisher {
    tx: watch::Sender<Published>,
}

impl SnapshotPublisher {
    /// Start publishing with an already built first snapshot.
    pub fn new(initial: BuildOutcome) -> Self {
        let (tx, _) = watch::channel(Published::from(initial));
        Self { tx }
    }

    /// Replace the current snapshot.
    pub fn publish(&self, outcome: BuildOutcome) {
        self.tx.send_replace(Published::from(outcome));
    }

    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            rx: self.tx.subscribe(),
        }
    }
}

/// Reader side, cloned into every request handler.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    rx: watch::Receiver<Published>,
}

impl SnapshotReader {
    pub fn current(&self) -> Arc<FamilySnapshot> {
        Arc::clone(&self.rx.borrow().snapshot)
    }

    /// Report of the refresh that produced [`current`](Self::current).
    pub fn report(&self) -> Arc<RefreshReport> {
        Arc::clone(&self.rx.borrow().report)
    }

    /// Snapshot and report from the same publish.
    pub fn current_with_report(&self) -> (Arc<FamilySnapshot>, Arc<RefreshReport>) {
        let published = self.rx.borrow();
        (
            Arc::clone(&published.snapshot),
            Arc::clone(&published.report),
        )
    }

    /// Wait until a snapshot newer than the last one seen is published.
    ///
    /// Returns `false` once the publisher is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
