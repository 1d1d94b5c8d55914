//! Cross-war leaderboard rows.

use serde::{Deserialize, Serialize};

use super::{MemberSummary, Tag};

/// A player's totals across every war seen since the last refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub tag: Tag,
    pub name: String,
    pub stars: u32,
    pub percentage: f64,
}

impl LeaderboardEntry {
    /// Start an entry from a player's first sighting.
    pub fn from_summary(summary: &MemberSummary) -> Self {
        Self {
            tag: summary.tag.clone(),
            name: summary.name.clone(),
            stars: summary.stars,
            percentage: summary.percentage,
        }
    }

    /// Add another war's result onto the running totals.
    ///
    /// The name stays as first seen.
    pub fn absorb(&mut self, summary: &MemberSummary) {
        self.stars += summary.stars;
        self.percentage += summary.percentage;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, stars: u32, percentage: f64) -> MemberSummary {
        MemberSummary {
            tag: Tag::from("#P1"),
            name: name.to_string(),
            townhall_level: 12,
            opponent_tag: Some(Tag::from("#O1")),
            stars,
            percentage,
        }
    }

    #[test]
    fn test_absorb_sums_and_keeps_first_name() {
        let mut entry = LeaderboardEntry::from_summary(&summary("Alice", 2, 50.0));
        entry.absorb(&summary("Alice (renamed)", 3, 80.0));

        assert_eq!(entry.name, "Alice");
        assert_eq!(entry.stars, 5);
        assert_eq!(entry.percentage, 130.0);
    }

    #[test]
    fn test_entry_json_shape() {
        let entry = LeaderboardEntry::from_summary(&summary("Alice", 4, 97.5));
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["tag"], "#P1");
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["stars"], 4);
        assert_eq!(json["percentage"], 97.5);
    }
}
