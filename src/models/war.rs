//! Payloads of the remote war-data API.
//!
//! Only the fields the leaderboard needs are modelled; everything else in
//! the responses is ignored during deserialization.

use serde::{Deserialize, Serialize};

use super::Tag;

/// State of a clan war league group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LeagueState {
    Preparation,
    InWar,
    Ended,
    NotInWar,
    #[serde(other)]
    Unknown,
}

impl LeagueState {
    /// Wars only carry attack data once the league is running or over.
    pub fn is_active(&self) -> bool {
        matches!(self, LeagueState::InWar | LeagueState::Ended)
    }
}

impl std::fmt::Display for LeagueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeagueState::Preparation => write!(f, "preparation"),
            LeagueState::InWar => write!(f, "inWar"),
            LeagueState::Ended => write!(f, "ended"),
            LeagueState::NotInWar => write!(f, "notInWar"),
            LeagueState::Unknown => write!(f, "unknown"),
        }
    }
}

/// `GET /clans/{clanTag}/currentwar/leaguegroup`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueGroup {
    pub state: LeagueState,
    #[serde(default)]
    pub rounds: Vec<LeagueRound>,
}

impl LeagueGroup {
    pub fn new(state: LeagueState, rounds: Vec<LeagueRound>) -> Self {
        Self { state, rounds }
    }
}

/// One league round: the wars fought simultaneously by the group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueRound {
    #[serde(default)]
    pub war_tags: Vec<Tag>,
}

impl LeagueRound {
    pub fn new<I, T>(war_tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Tag>,
    {
        Self {
            war_tags: war_tags.into_iter().map(Into::into).collect(),
        }
    }
}

/// `GET /clanwarleagues/wars/{warTag}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClanWar {
    pub clan: WarClan,
    pub opponent: WarClan,
}

/// One side of a war.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarClan {
    #[serde(default)]
    pub tag: Option<Tag>,
    pub name: String,
    #[serde(default)]
    pub members: Vec<WarMember>,
}

impl WarClan {
    pub fn new(tag: impl Into<Tag>, name: impl Into<String>, members: Vec<WarMember>) -> Self {
        Self {
            tag: Some(tag.into()),
            name: name.into(),
            members,
        }
    }
}

/// A roster entry of one war side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarMember {
    pub tag: Tag,
    pub name: String,
    pub townhall_level: u32,
    pub map_position: u32,
    #[serde(default)]
    pub attacks: Vec<Attack>,
}

impl WarMember {
    pub fn new(
        tag: impl Into<Tag>,
        name: impl Into<String>,
        townhall_level: u32,
        map_position: u32,
    ) -> Self {
        Self {
            tag: tag.into(),
            name: name.into(),
            townhall_level,
            map_position,
            attacks: Vec::new(),
        }
    }

    /// Append an attack to this member's record.
    pub fn with_attack(
        mut self,
        defender_tag: impl Into<Tag>,
        stars: u32,
        destruction_percentage: f64,
    ) -> Self {
        self.attacks.push(Attack {
            defender_tag: defender_tag.into(),
            stars,
            destruction_percentage,
        });
        self
    }
}

/// A single attack made during a war.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attack {
    pub defender_tag: Tag,
    pub stars: u32,
    pub destruction_percentage: f64,
}

/// How the tracked clan is recognized on a war record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClanIdentity {
    pub tag: Tag,
    /// Display name, only consulted when a war side carries no tag.
    pub name: Option<String>,
}

impl ClanIdentity {
    pub fn new(tag: impl Into<Tag>, name: Option<String>) -> Self {
        Self {
            tag: tag.into(),
            name,
        }
    }

    /// Whether the given war side is the tracked clan.
    pub fn matches(&self, side: &WarClan) -> bool {
        match &side.tag {
            Some(tag) => *tag == self.tag,
            None => self.name.as_deref() == Some(side.name.as_str()),
        }
    }
}

/// The two rosters of a war, oriented from the tracked clan's side.
#[derive(Debug, Clone)]
pub struct WarRosters {
    pub own: Vec<WarMember>,
    pub opponents: Vec<WarMember>,
}

impl ClanWar {
    /// Orient the war around the tracked clan.
    ///
    /// Returns `None` when neither side is the tracked clan.
    pub fn into_rosters(self, clan: &ClanIdentity) -> Option<WarRosters> {
        if clan.matches(&self.clan) {
            Some(WarRosters {
                own: self.clan.members,
                opponents: self.opponent.members,
            })
        } else if clan.matches(&self.opponent) {
            Some(WarRosters {
                own: self.opponent.members,
                opponents: self.clan.members,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAR_JSON: &str = r##"{
        "state": "warEnded",
        "teamSize": 15,
        "clan": {
            "tag": "#2LPOGLU2U",
            "name": "Tranquility",
            "members": [
                {
                    "tag": "#P1",
                    "name": "Alice",
                    "townhallLevel": 12,
                    "mapPosition": 1,
                    "attacks": [
                        {
                            "attackerTag": "#P1",
                            "defenderTag": "#O1",
                            "stars": 3,
                            "destructionPercentage": 100,
                            "order": 4,
                            "duration": 95
                        }
                    ]
                },
                {
                    "tag": "#P2",
                    "name": "Bob",
                    "townhallLevel": 10,
                    "mapPosition": 2
                }
            ]
        },
        "opponent": {
            "tag": "#OPP",
            "name": "Rivals",
            "members": [
                { "tag": "#O1", "name": "Eve", "townhallLevel": 12, "mapPosition": 1 }
            ]
        }
    }"##;

    #[test]
    fn test_parse_war_payload() {
        let war: ClanWar = serde_json::from_str(WAR_JSON).unwrap();
        assert_eq!(war.clan.name, "Tranquility");
        assert_eq!(war.clan.members.len(), 2);

        let alice = &war.clan.members[0];
        assert_eq!(alice.townhall_level, 12);
        assert_eq!(alice.attacks[0].defender_tag, Tag::from("#O1"));
        assert_eq!(alice.attacks[0].destruction_percentage, 100.0);

        // Members who have not attacked come without an attacks field
        assert!(war.clan.members[1].attacks.is_empty());
    }

    #[test]
    fn test_parse_league_group() {
        let json = r##"{
            "state": "inWar",
            "season": "2026-10",
            "rounds": [
                { "warTags": ["#0", "#0"] },
                { "warTags": ["#W1", "#W2"] }
            ]
        }"##;
        let group: LeagueGroup = serde_json::from_str(json).unwrap();
        assert_eq!(group.state, LeagueState::InWar);
        assert_eq!(group.rounds.len(), 2);
        assert!(group.rounds[0].war_tags[0].is_placeholder());
        assert_eq!(group.rounds[1].war_tags[1], Tag::from("#W2"));
    }

    #[test]
    fn test_unknown_league_state() {
        let group: LeagueGroup = serde_json::from_str(r#"{"state": "somethingNew"}"#).unwrap();
        assert_eq!(group.state, LeagueState::Unknown);
        assert!(group.rounds.is_empty());
    }

    #[test]
    fn test_league_state_is_active() {
        assert!(LeagueState::InWar.is_active());
        assert!(LeagueState::Ended.is_active());
        assert!(!LeagueState::Preparation.is_active());
        assert!(!LeagueState::NotInWar.is_active());
        assert!(!LeagueState::Unknown.is_active());
    }

    #[test]
    fn test_rosters_when_tracked_clan_is_clan_side() {
        let war: ClanWar = serde_json::from_str(WAR_JSON).unwrap();
        let identity = ClanIdentity::new("#2LPOGLU2U", None);

        let rosters = war.into_rosters(&identity).unwrap();
        assert_eq!(rosters.own.len(), 2);
        assert_eq!(rosters.opponents[0].tag, Tag::from("#O1"));
    }

    #[test]
    fn test_rosters_when_tracked_clan_is_opponent_side() {
        let war: ClanWar = serde_json::from_str(WAR_JSON).unwrap();
        let identity = ClanIdentity::new("#OPP", None);

        let rosters = war.into_rosters(&identity).unwrap();
        assert_eq!(rosters.own.len(), 1);
        assert_eq!(rosters.opponents.len(), 2);
    }

    #[test]
    fn test_rosters_when_neither_side_matches() {
        let war: ClanWar = serde_json::from_str(WAR_JSON).unwrap();
        let identity = ClanIdentity::new("#SOMEONEELSE", Some("Tranquility".to_string()));

        // Tag mismatch wins over a matching display name
        assert!(war.into_rosters(&identity).is_none());
    }

    #[test]
    fn test_name_fallback_for_untagged_side() {
        let side = WarClan {
            tag: None,
            name: "Tranquility".to_string(),
            members: Vec::new(),
        };
        assert!(ClanIdentity::new("#2LPOGLU2U", Some("Tranquility".to_string())).matches(&side));
        assert!(!ClanIdentity::new("#2LPOGLU2U", None).matches(&side));
    }
}
