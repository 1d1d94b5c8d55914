//! In-memory leaderboard store.
//!
//! Holds the last computed ranking and the report of the refresh that
//! produced it. Nothing survives a restart.
//!
//! Refreshes are single-flight: a writer must hold a `RefreshGuard`, and
//! only one guard can exist at a time. Readers always see either the
//! previous ranking or the new one, never a cleared store.

use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::models::{LeaderboardEntry, RefreshReport};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("A leaderboard refresh is already running")]
    RefreshInProgress,
}

#[derive(Debug, Default)]
struct Snapshot {
    entries: Vec<LeaderboardEntry>,
    last_report: Option<RefreshReport>,
}

/// Process-wide leaderboard state.
#[derive(Debug, Default)]
pub struct LeaderboardStore {
    snapshot: RwLock<Snapshot>,
    refresh_lock: Mutex<()>,
}

impl LeaderboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current ranking, empty before the first refresh.
    pub async fn entries(&self) -> Vec<LeaderboardEntry> {
        self.snapshot.read().await.entries.clone()
    }

    /// Report of the most recent refresh, if any.
    pub async fn last_report(&self) -> Option<RefreshReport> {
        self.snapshot.read().await.last_report.clone()
    }

    /// Whether a refresh currently holds the guard.
    pub fn is_refreshing(&self) -> bool {
        self.refresh_lock.try_lock().is_err()
    }

    /// Claim the right to replace the ranking.
    pub fn try_begin_refresh(&self) -> Result<RefreshGuard<'_>, StorageError> {
        let permit = self
            .refresh_lock
            .try_lock()
            .map_err(|_| StorageError::RefreshInProgress)?;
        Ok(RefreshGuard {
            store: self,
            _permit: permit,
        })
    }
}

/// Exclusive right to replace the store's ranking.
pub struct RefreshGuard<'a> {
    store: &'a LeaderboardStore,
    _permit: MutexGuard<'a, ()>,
}

impl RefreshGuard<'_> {
    /// Swap in a new ranking and its report in one step.
    pub async fn commit(self, entries: Vec<LeaderboardEntry>, report: RefreshReport) {
        let mut snapshot = self.store.snapshot.write().await;
        snapshot.entries = entries;
        snapshot.last_report = Some(report);
    }
}
