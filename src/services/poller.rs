//! Periodic fetch of the pattern feed.
//!
//! The poller runs on a single task: a cycle that is still in flight when the
//! next tick comes due makes that tick get skipped, so cycles never overlap
//! and completions can't land out of order. Results are published through
//! [`PatternState`], whose watch channel hands readers whole snapshots only.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::pattern_client::{FetchError, PatternClient};
use crate::models::{DashboardSnapshot, PatternSet};

// `tokio::time::interval` panics on a zero period.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|p| p.into_inner())
}

/// Shared view state: the latest snapshot plus a publish gate.
///
/// Once closed, the state is frozen. Closing takes the same lock as
/// publishing, so nothing lands after [`PatternState::close`] returns.
pub struct PatternState {
    tx: watch::Sender<DashboardSnapshot>,
    open: Mutex<bool>,
}

impl Default for PatternState {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(DashboardSnapshot::default());
        Self {
            tx,
            open: Mutex::new(true),
        }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.tx.borrow().clone()
    }

    pub fn patterns(&self) -> Arc<PatternSet> {
        Arc::clone(&self.tx.borrow().patterns)
    }

    /// Receiver that wakes whenever a new snapshot is published.
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.tx.subscribe()
    }

    pub fn is_open(&self) -> bool {
        *lock(&self.open)
    }

    pub fn close(&self) {
        *lock(&self.open) = false;
    }

    /// Replace the pattern set wholesale. Returns false if the state is closed.
    pub fn apply_success(&self, patterns: PatternSet, at: DateTime<Utc>) -> bool {
        let open = lock(&self.open);
        if !*open {
            return false;
        }
        self.tx.send_modify(|snapshot| {
            snapshot.patterns = Arc::new(patterns);
            snapshot.status.cycles += 1;
            snapshot.status.last_success = Some(at);
            snapshot.status.last_error = None;
            snapshot.status.consecutive_failures = 0;
        });
        true
    }

    /// Record a failed cycle. The pattern set itself is left untouched.
    pub fn apply_failure(&self, error: &FetchError, at: DateTime<Utc>) -> bool {
        let open = lock(&self.open);
        if !*open {
            return false;
        }
        self.tx.send_modify(|snapshot| {
            snapshot.status.cycles += 1;
            snapshot.status.last_failure = Some(at);
            snapshot.status.last_error = Some(error.to_string());
            snapshot.status.consecutive_failures += 1;
        });
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Updated,
    Failed,
    /// The fetch finished after teardown; its result was dropped.
    Discarded,
}

/// One fetch-and-apply iteration. Never fails: errors are logged and
/// recorded in the poll status.
pub async fn fetch_cycle(client: &PatternClient, state: &PatternState) -> CycleOutcome {
    let result = client.fetch_patterns().await;
    let now = Utc::now();

    match result {
        Ok(patterns) => {
            let (network, users) = (
                patterns.company_network_patterns.len(),
                patterns.user_repeat_patterns.len(),
            );
            if !state.apply_success(patterns, now) {
                log::debug!("[Poller] Dropping fetch result that resolved after stop");
                return CycleOutcome::Discarded;
            }
            log::info!(
                "[Poller] Patterns refreshed: {} network, {} user",
                network,
                users
            );
            CycleOutcome::Updated
        }
        Err(e) => {
            if !state.apply_failure(&e, now) {
                return CycleOutcome::Discarded;
            }
            log::warn!(
                "[Poller] Fetch from {} failed (kind={}): {}",
                client.url(),
                e.kind(),
                e
            );
            CycleOutcome::Failed
        }
    }
}

/// Owns the refresh timer. Dropping the poller stops it.
pub struct Poller {
    state: Arc<PatternState>,
    token: CancellationToken,
    refresh: Arc<Notify>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Poller {
    /// Fetch once right away, then every `interval`.
    ///
    /// Must be called from within a tokio runtime. Intervals shorter than
    /// one millisecond are raised to one millisecond.
    pub fn start(client: PatternClient, interval: Duration, state: Arc<PatternState>) -> Self {
        let interval = interval.max(MIN_INTERVAL);
        let token = CancellationToken::new();
        let refresh = Arc::new(Notify::new());

        log::info!(
            "[Poller] Started, polling {} every {:?}",
            client.url(),
            interval
        );
        let task = tokio::spawn(run_loop(
            client,
            interval,
            Arc::clone(&state),
            token.clone(),
            Arc::clone(&refresh),
        ));

        Self {
            state,
            token,
            refresh,
            task: Mutex::new(Some(task)),
        }
    }

    pub fn state(&self) -> &Arc<PatternState> {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Run a cycle now instead of waiting for the next tick.
    pub fn refresh_now(&self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.refresh.notify_one();
        true
    }

    /// Cancel the timer and freeze the state. Safe to call more than once.
    pub fn stop(&self) {
        self.state.close();
        self.token.cancel();
        if let Some(task) = lock(&self.task).take() {
            task.abort();
            log::info!("[Poller] Stopped");
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_loop(
    client: PatternClient,
    interval: Duration,
    state: Arc<PatternState>,
    token: CancellationToken,
    refresh: Arc<Notify>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        // The first tick completes immediately, which gives the startup fetch.
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
            _ = refresh.notified() => {
                log::info!("[Poller] Manual refresh requested");
                ticker.reset();
            }
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = fetch_cycle(&client, &state) => {}
        }
    }
}
