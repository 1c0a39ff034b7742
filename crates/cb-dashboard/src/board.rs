//! Active call board.
//!
//! Holds the active-call set between feed refreshes. A one-second ticker
//! recomputes each call's elapsed duration; dropping the [`TickerHandle`]
//! stops it.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared_types::{Call, CallStatus};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Default ticker period.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Counters shown above the active-call list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardStats {
    pub active: usize,
    pub waiting: usize,
    pub drivers: usize,
    pub companies: usize,
}

#[derive(Debug, Default)]
struct BoardInner {
    calls: Vec<Call>,
    /// Ended ids still present in the feed; a refresh must not bring them back
    ended: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct ActiveCallBoard {
    inner: RwLock<BoardInner>,
}

impl ActiveCallBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_calls(calls: Vec<Call>) -> Self {
        let board = Self::new();
        board.replace(calls);
        board
    }

    /// Replace the call set with a fresh feed snapshot. Durations already
    /// measured for surviving calls are kept.
    pub fn replace(&self, calls: Vec<Call>) {
        let mut inner = self.inner.write();
        let previous: Vec<(String, Option<u64>)> = inner
            .calls
            .iter()
            .map(|c| (c.id.clone(), c.duration))
            .collect();

        // Ids absent from the feed cannot reappear, so only the ended ids
        // still being reported need remembering.
        inner
            .ended
            .retain(|id| calls.iter().any(|c| c.id == *id));
        let ended = &inner.ended;
        let mut fresh: Vec<Call> = calls
            .into_iter()
            .filter(|c| !ended.contains(&c.id))
            .collect();
        for call in &mut fresh {
            let measured = previous
                .iter()
                .find(|(id, _)| *id == call.id)
                .and_then(|(_, d)| *d);
            call.duration = max_duration(call.duration, measured);
        }
        inner.calls = fresh;
    }

    /// Recompute every call's duration as whole seconds since its start.
    /// Durations never go down and never go negative.
    pub fn tick(&self, now: DateTime<Utc>) {
        let mut inner = self.inner.write();
        for call in inner.calls.iter_mut() {
            call.duration = max_duration(call.duration, Some(call.elapsed_secs(now)));
        }
    }

    /// Remove a call from the active set. Returns false if it was not there.
    pub fn end_call(&self, id: &str) -> bool {
        let mut inner = self.inner.write();
        let before = inner.calls.len();
        inner.calls.retain(|c| c.id != id);
        let removed = inner.calls.len() != before;
        if removed {
            inner.ended.insert(id.to_string());
            debug!(call_id = id, "Call ended");
        }
        removed
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.read().calls.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().calls.is_empty()
    }

    /// Ended calls still suppressed on refresh.
    pub fn ended_count(&self) -> usize {
        self.inner.read().ended.len()
    }

    pub fn stats(&self) -> BoardStats {
        let inner = self.inner.read();
        let count = |status| inner.calls.iter().filter(|c| c.status == status).count();
        let drivers: BTreeSet<&str> = inner.calls.iter().map(|c| c.driver_id.as_str()).collect();
        let companies: BTreeSet<&str> =
            inner.calls.iter().map(|c| c.company_id.as_str()).collect();

        BoardStats {
            active: count(CallStatus::Active),
            waiting: count(CallStatus::Waiting),
            drivers: drivers.len(),
            companies: companies.len(),
        }
    }

    /// Spawn the periodic ticker on the current tokio runtime.
    pub fn start_ticker(self: &Arc<Self>, period: Duration) -> TickerHandle {
        let board = Arc::clone(self);
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                board.tick(Utc::now());
            }
        });
        TickerHandle { task }
    }
}

fn max_duration(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// Running ticker. Aborted on drop.
#[derive(Debug)]
pub struct TickerHandle {
    task: JoinHandle<()>,
}

impl TickerHandle {
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
