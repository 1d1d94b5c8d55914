//! League round walking.
//!
//! Turns a league group into the flat list of member summaries of every
//! war the tracked clan fought, isolating each war's fetch failure.

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::calculate::summarize_war;
use crate::fetch::{fetch_war_rosters, FetchError, WarApi};
use crate::models::{ClanIdentity, LeagueGroup, LeagueRound, MemberSummary, Tag, WarFailure};

/// Everything gathered from one pass over the league rounds.
#[derive(Debug, Clone, Default)]
pub struct RoundOutcome {
    /// Summaries in round-then-war order
    pub summaries: Vec<MemberSummary>,
    /// Wars fetched that involve the tracked clan
    pub wars_fetched: u32,
    /// Wars fetched that involve other clans of the group
    pub wars_skipped: u32,
    pub failures: Vec<WarFailure>,
}

/// Walk the rounds of a league group.
///
/// Returns `None` when the league is neither in war nor ended; no war is
/// fetched in that case.
pub async fn walk_league(
    api: &dyn WarApi,
    clan: &ClanIdentity,
    group: &LeagueGroup,
    max_concurrent_fetches: usize,
) -> Option<RoundOutcome> {
    if !group.state.is_active() {
        info!("League is {}, nothing to walk", group.state);
        return None;
    }
    Some(walk_rounds(api, clan, &group.rounds, max_concurrent_fetches).await)
}

/// Fetch and summarize every real war of the given rounds.
///
/// `#0` bye slots are skipped. Fetches run concurrently up to
/// `max_concurrent_fetches`, but results are collected in round-then-war
/// order before anything is returned.
pub async fn walk_rounds(
    api: &dyn WarApi,
    clan: &ClanIdentity,
    rounds: &[LeagueRound],
    max_concurrent_fetches: usize,
) -> RoundOutcome {
    let war_tags: Vec<Tag> = rounds
        .iter()
        .flat_map(|round| round.war_tags.iter())
        .filter(|tag| {
            if tag.is_placeholder() {
                debug!("Skipping placeholder war slot");
                false
            } else {
                true
            }
        })
        .cloned()
        .collect();

    info!("Fetching {} league wars", war_tags.len());

    let results: Vec<(Tag, Result<_, FetchError>)> = stream::iter(war_tags)
        .map(|war_tag| async move {
            let result = fetch_war_rosters(api, &war_tag, clan).await;
            (war_tag, result)
        })
        .buffered(max_concurrent_fetches.max(1))
        .collect()
        .await;

    let mut outcome = RoundOutcome::default();
    for (war_tag, result) in results {
        match result {
            Ok(Some(rosters)) => {
                outcome.wars_fetched += 1;
                outcome
                    .summaries
                    .extend(summarize_war(&rosters.own, &rosters.opponents));
            }
            Ok(None) => outcome.wars_skipped += 1,
            Err(e) => {
                warn!("Failed to fetch war {}: {}", war_tag, e);
                outcome.failures.push(WarFailure {
                    war_tag,
                    error: e.to_string(),
                });
            }
        }
    }

    outcome
}
