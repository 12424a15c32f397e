//! Dashboard engine: in-memory snapshot, fetch cycles and the poll loop.
//!
//! This module provides the stateful half of the dashboard view:
//! - Fetch cycles that load stats and recent reviews as one snapshot
//! - Failure handling per [`FailurePolicy`] (demo fallback or keep stale)
//! - A monotonic sequence guard so late responses never overwrite newer ones
//! - A background poll loop owned by a [`DashboardHandle`]

use crate::config::FailurePolicy;
use crate::models::{DashboardStats, Review};
use crate::services::data_source::{DashboardSnapshot, DashboardSource};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, DropGuard};

/// Which state the dashboard page is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewPhase {
    /// Nothing to show yet; a fetch is pending or in flight.
    Loading,

    /// A snapshot is on screen (live or demo).
    Ready,

    /// The last fetch failed; the previous snapshot is still shown.
    ErrorWithStaleData,

    /// A fetch failed before any snapshot was applied; only the error is shown.
    ErrorWithoutData,
}

/// Where the current snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    Live,
    Demo,
}

/// Dashboard state as seen by the view.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub stats: DashboardStats,

    /// Recent reviews in backend order.
    pub recent_reviews: Vec<Review>,

    /// Error from the last cycle, only set under [`FailurePolicy::KeepStale`].
    pub error: Option<String>,

    /// Origin of the current snapshot, `None` before the first cycle finishes.
    pub origin: Option<DataOrigin>,

    /// When the current snapshot was applied.
    pub updated_at: Option<DateTime<Utc>>,

    /// Whether any fetch cycle is in flight.
    pub loading: bool,

    /// Sequence number of the cycle that produced this snapshot.
    pub applied_seq: u64,
}

impl DashboardState {
    /// Derive the page state.
    pub fn phase(&self) -> ViewPhase {
        if self.error.is_some() {
            if self.origin.is_some() {
                ViewPhase::ErrorWithStaleData
            } else {
                ViewPhase::ErrorWithoutData
            }
        } else if self.recent_reviews.is_empty() && (self.loading || self.origin.is_none()) {
            ViewPhase::Loading
        } else {
            ViewPhase::Ready
        }
    }
}

/// Result of a single fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The cycle's snapshot replaced the previous one.
    Applied(DataOrigin),

    /// The cycle failed and the previous snapshot was kept.
    Failed(String),

    /// A newer cycle had already been applied; this result was discarded.
    Superseded,
}

/// Decrements the in-flight counter when a cycle ends or is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Owns the dashboard snapshot and runs fetch cycles.
pub struct DashboardEngine<P, F> {
    /// Source tried first on every cycle.
    primary: P,

    /// Source used when the primary fails under [`FailurePolicy::Fallback`].
    fallback: F,

    policy: FailurePolicy,

    state: RwLock<DashboardState>,

    /// Last sequence number handed out.
    next_seq: AtomicU64,

    in_flight: AtomicUsize,
}

impl<P: DashboardSource, F: DashboardSource> DashboardEngine<P, F> {
    /// Create a new engine with an empty snapshot.
    pub fn new(primary: P, fallback: F, policy: FailurePolicy) -> Self {
        Self {
            primary,
            fallback,
            policy,
            state: RwLock::new(DashboardState::default()),
            next_seq: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> DashboardState {
        let mut state = self.state.read().await.clone();
        state.loading = self.in_flight.load(Ordering::SeqCst) > 0;
        state
    }

    /// Run one fetch cycle.
    ///
    /// Loads stats and recent reviews from the primary source. On failure the
    /// configured policy decides between the fallback snapshot and keeping the
    /// current one. The result is applied only if no newer cycle got there first.
    pub async fn refresh(&self) -> CycleOutcome {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let _in_flight = InFlight::enter(&self.in_flight);

        let result = match self.primary.load().await {
            Ok(snapshot) => Ok((snapshot, DataOrigin::Live)),
            Err(e) => {
                log::error!("[dashboard] Failed to fetch dashboard data: {}", e);
                match self.policy {
                    FailurePolicy::Fallback => {
                        log::warn!(
                            "[dashboard] Using {} data for demonstration",
                            self.fallback.name()
                        );
                        self.fallback
                            .load()
                            .await
                            .map(|snapshot| (snapshot, DataOrigin::Demo))
                            .map_err(|fe| fe.to_string())
                    }
                    FailurePolicy::KeepStale => Err(e.to_string()),
                }
            }
        };

        self.finish(seq, result).await
    }

    async fn finish(
        &self,
        seq: u64,
        result: Result<(DashboardSnapshot, DataOrigin), String>,
    ) -> CycleOutcome {
        let mut state = self.state.write().await;

        if seq <= state.applied_seq {
            log::debug!(
                "[dashboard] Discarding cycle {} (cycle {} already applied)",
                seq,
                state.applied_seq
            );
            return CycleOutcome::Superseded;
        }

        state.applied_seq = seq;

        match result {
            Ok((snapshot, origin)) => {
                state.stats = snapshot.stats;
                state.recent_reviews = snapshot.recent_reviews;
                state.error = None;
                state.origin = Some(origin);
                state.updated_at = Some(Utc::now());
                log::info!(
                    "[dashboard] Applied {:?} snapshot: {} reviews (cycle {})",
                    origin,
                    state.recent_reviews.len(),
                    seq
                );
                CycleOutcome::Applied(origin)
            }
            Err(message) => {
                state.error = Some(message.clone());
                CycleOutcome::Failed(message)
            }
        }
    }

    /// Start the background poll loop.
    ///
    /// The first cycle runs immediately, then one per `interval`. Each tick
    /// spawns its own cycle, so a slow backend never delays the schedule.
    /// The loop stops when [`DashboardHandle::stop`] is called or the last
    /// handle is dropped; cycles already in flight run to completion.
    pub fn start(self: &Arc<Self>, interval: Duration) -> DashboardHandle {
        let cancel_token = CancellationToken::new();
        let cancelled = cancel_token.clone();
        let engine = Arc::clone(self);

        tokio::spawn(async move {
            log::info!("[dashboard] Poller started, interval={}s", interval.as_secs());

            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        let engine = Arc::clone(&engine);
                        tokio::spawn(async move {
                            engine.refresh().await;
                        });
                    }
                }
            }

            log::info!("[dashboard] Poller stopped");
        });

        DashboardHandle {
            _guard: Arc::new(cancel_token.clone().drop_guard()),
            cancel_token,
        }
    }
}

/// Lifecycle handle for the background poll loop.
///
/// Clones share the loop; it is cancelled once every clone is dropped.
#[derive(Clone)]
pub struct DashboardHandle {
    cancel_token: CancellationToken,
    _guard: Arc<DropGuard>,
}

impl DashboardHandle {
    /// Stop the poll loop.
    pub fn stop(&self) {
        self.cancel_token.cancel();
    }

    /// Whether the poll loop is still scheduled.
    pub fn is_running(&self) -> bool {
        !self.cancel_token.is_cancelled()
    }
}
