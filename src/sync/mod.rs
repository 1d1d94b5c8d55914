//! Sync orchestrator.
//!
//! Runs the refresh pipeline:
//! 1. Fetch the clan's league group
//! 2. Walk its rounds, fetching and summarizing each war
//! 3. Consolidate the summaries into a sorted leaderboard
//! 4. Swap the result into the store

mod rounds;

pub use rounds::*;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, warn};

use crate::calculate::consolidate;
use crate::config::AppConfig;
use crate::fetch::{ClashClient, FetchError, WarApi};
use crate::models::{ClanIdentity, LeaderboardEntry, RefreshReport, RefreshStatus};
use crate::storage::{LeaderboardStore, StorageError};

/// Errors that can occur during sync.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// A computed ranking and the report describing how it was obtained.
#[derive(Debug, Clone)]
pub struct SyncResult {
    pub entries: Vec<LeaderboardEntry>,
    pub report: RefreshReport,
}

/// Sync orchestrator.
pub struct SyncOrchestrator {
    api: Arc<dyn WarApi>,
    clan: ClanIdentity,
    max_concurrent_fetches: usize,
}

impl SyncOrchestrator {
    /// Create a new sync orchestrator.
    pub fn new(api: Arc<dyn WarApi>, clan: ClanIdentity, max_concurrent_fetches: usize) -> Self {
        Self {
            api,
            clan,
            max_concurrent_fetches,
        }
    }

    /// Build an orchestrator talking to the configured remote API.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let client = ClashClient::new(&config.api)?;
        Ok(Self::new(
            Arc::new(client),
            config.clan.identity(),
            config.api.max_concurrent_fetches,
        ))
    }

    /// Run the pipeline without touching any store.
    pub async fn sync_once(&self) -> SyncResult {
        let started_at = Utc::now();
        info!(
            "Refreshing leaderboard for clan {} via {}",
            self.clan.tag,
            self.api.name()
        );

        let group = match self.api.league_group(&self.clan.tag).await {
            Ok(group) => group,
            Err(e) => {
                let msg = format!("League group fetch failed: {}", e);
                warn!("{}", msg);
                return SyncResult {
                    entries: Vec::new(),
                    report: RefreshReport {
                        status: RefreshStatus::Failed,
                        league_state: None,
                        wars_fetched: 0,
                        wars_skipped: 0,
                        players: 0,
                        failed_wars: Vec::new(),
                        errors: vec![msg],
                        started_at,
                        completed_at: Utc::now(),
                    },
                };
            }
        };

        let Some(outcome) = walk_league(
            self.api.as_ref(),
            &self.clan,
            &group,
            self.max_concurrent_fetches,
        )
        .await
        else {
            warn!("League state is {}, leaderboard left empty", group.state);
            return SyncResult {
                entries: Vec::new(),
                report: RefreshReport {
                    status: RefreshStatus::Inactive,
                    league_state: Some(group.state),
                    wars_fetched: 0,
                    wars_skipped: 0,
                    players: 0,
                    failed_wars: Vec::new(),
                    errors: Vec::new(),
                    started_at,
                    completed_at: Utc::now(),
                },
            };
        };

        let entries = consolidate(outcome.summaries);
        let status = if !outcome.failures.is_empty() {
            if outcome.wars_fetched == 0 && outcome.wars_skipped == 0 {
                RefreshStatus::Failed
            } else {
                RefreshStatus::Partial
            }
        } else if entries.is_empty() {
            RefreshStatus::Empty
        } else {
            RefreshStatus::Refreshed
        };

        info!(
            "Leaderboard computed: {} players from {} wars ({} failed)",
            entries.len(),
            outcome.wars_fetched,
            outcome.failures.len()
        );

        SyncResult {
            report: RefreshReport {
                status,
                league_state: Some(group.state),
                wars_fetched: outcome.wars_fetched,
                wars_skipped: outcome.wars_skipped,
                players: entries.len() as u32,
                failed_wars: outcome.failures,
                errors: Vec::new(),
                started_at,
                completed_at: Utc::now(),
            },
            entries,
        }
    }

    /// Run the pipeline and replace the store's ranking with the result.
    ///
    /// Fails without fetching anything when another refresh holds the store.
    pub async fn refresh(&self, store: &LeaderboardStore) -> Result<RefreshReport, SyncError> {
        let guard = store.try_begin_refresh()?;
        let SyncResult { entries, report } = self.sync_once().await;
        guard.commit(entries, report.clone()).await;
        Ok(report)
    }

    /// Refresh the store every `period` until the task is dropped.
    ///
    /// Returns immediately when `period` is too large to schedule.
    pub async fn run_periodic(self: Arc<Self>, store: Arc<LeaderboardStore>, period: Duration) {
        let Some(first_tick) = Instant::now().checked_add(period) else {
            warn!("Refresh period {:?} is too large, periodic refresh disabled", period);
            return;
        };
        let mut ticker = interval_at(first_tick, period);

        info!("Starting periodic refresh every {:?}", period);

        loop {
            ticker.tick().await;

            match self.refresh(&store).await {
                Ok(report) => {
                    info!(
                        "Periodic refresh finished: {:?}, {} players",
                        report.status, report.players
                    );
                }
                Err(e) => {
                    debug!("Periodic refresh skipped: {}", e);
                }
            }
        }
    }
}
