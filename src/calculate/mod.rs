//! Leaderboard calculation engine.
//!
//! Pure functions over already-fetched war data:
//! - Effective stars for a member's counted attack
//! - Per-war member summaries
//! - Cross-war consolidation into a sorted leaderboard

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::models::{LeaderboardEntry, MemberSummary, OpponentDescriptor, Tag, WarMember};

/// Result of scoring a member's counted attack.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackScore {
    pub opponent_tag: Option<Tag>,
    pub stars: u32,
    pub percentage: f64,
}

impl AttackScore {
    fn none() -> Self {
        Self {
            opponent_tag: None,
            stars: 0,
            percentage: 0.0,
        }
    }
}

/// Build the opponent descriptors for one war.
pub fn opponent_descriptors(opponents: &[WarMember]) -> Vec<OpponentDescriptor> {
    opponents.iter().map(OpponentDescriptor::from).collect()
}

/// Townhall level a target is judged at.
///
/// The lowest townhall among opponents placed above the target on the map
/// (smaller map position) that are also below the target's townhall. Falls
/// back to the target's own level when there is none.
pub fn effective_opponent_townhall(
    target: &OpponentDescriptor,
    opponents: &[OpponentDescriptor],
) -> u32 {
    opponents
        .iter()
        .filter(|o| {
            o.map_position < target.map_position && o.townhall_level < target.townhall_level
        })
        .map(|o| o.townhall_level)
        .min()
        .unwrap_or(target.townhall_level)
}

/// Score a member's first attack of the war.
///
/// Later attacks are ignored. A successful hit (stars > 0) on a target whose
/// effective townhall is above the attacker's own earns one bonus star per
/// level of difference.
pub fn score_attack(member: &WarMember, opponents: &[OpponentDescriptor]) -> AttackScore {
    let Some(attack) = member.attacks.first() else {
        return AttackScore::none();
    };

    let Some(target) = opponents.iter().find(|o| o.tag == attack.defender_tag) else {
        debug!(
            "Attack by {} targets {} which is not on the opposing roster",
            member.tag, attack.defender_tag
        );
        return AttackScore {
            opponent_tag: Some(attack.defender_tag.clone()),
            ..AttackScore::none()
        };
    };

    let opponent_th = effective_opponent_townhall(target, opponents);
    let stars = if member.townhall_level < opponent_th && attack.stars != 0 {
        attack.stars + (opponent_th - member.townhall_level)
    } else {
        attack.stars
    };

    AttackScore {
        opponent_tag: Some(attack.defender_tag.clone()),
        stars,
        percentage: attack.destruction_percentage,
    }
}

/// Summarize one war from the tracked clan's side, in roster order.
pub fn summarize_war(own: &[WarMember], opponents: &[WarMember]) -> Vec<MemberSummary> {
    let descriptors = opponent_descriptors(opponents);

    own.iter()
        .map(|member| {
            let score = score_attack(member, &descriptors);
            MemberSummary {
                tag: member.tag.clone(),
                name: member.name.clone(),
                townhall_level: member.townhall_level,
                opponent_tag: score.opponent_tag,
                stars: score.stars,
                percentage: score.percentage,
            }
        })
        .collect()
}

/// Leaderboard order: stars descending, then percentage descending.
pub fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.stars
        .cmp(&a.stars)
        .then_with(|| b.percentage.total_cmp(&a.percentage))
}

/// Merge per-war summaries into one row per player, sorted for display.
///
/// Exact ties keep the order in which the players were first seen.
pub fn consolidate<I>(summaries: I) -> Vec<LeaderboardEntry>
where
    I: IntoIterator<Item = MemberSummary>,
{
    let mut entries: Vec<LeaderboardEntry> = Vec::new();
    let mut index_by_tag: HashMap<Tag, usize> = HashMap::new();

    for summary in summaries {
        match index_by_tag.get(&summary.tag) {
            Some(&i) => entries[i].absorb(&summary),
            None => {
                index_by_tag.insert(summary.tag.clone(), entries.len());
                entries.push(LeaderboardEntry::from_summary(&summary));
            }
        }
    }

    entries.sort_by(compare_entries);
    entries
}
