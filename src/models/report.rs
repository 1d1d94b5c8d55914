//! Outcome of a leaderboard refresh.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LeagueState, Tag};

/// A war whose record could not be retrieved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarFailure {
    pub war_tag: Tag,
    pub error: String,
}

/// How a refresh ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshStatus {
    /// Every war was fetched and the leaderboard has rows
    Refreshed,
    /// Some wars failed; the leaderboard holds what succeeded
    Partial,
    /// The league is active but produced no rows
    Empty,
    /// The league is not in war or ended
    Inactive,
    /// Nothing could be fetched
    Failed,
}

/// Summary of one refresh, returned to the caller and kept for status queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshReport {
    pub status: RefreshStatus,
    pub league_state: Option<LeagueState>,
    pub wars_fetched: u32,
    pub wars_skipped: u32,
    pub players: u32,
    pub failed_wars: Vec<WarFailure>,
    pub errors: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}
