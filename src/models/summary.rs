//! Per-war results of the tracked clan's members.

use serde::{Deserialize, Serialize};

use super::{Tag, WarMember};

/// One member's result in a single war.
///
/// `stars` are effective stars and may exceed the raw 0-3 range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub tag: Tag,
    pub name: String,
    pub townhall_level: u32,
    /// Defender of the counted attack, `None` when the member did not attack.
    /// Serialized as `""` in that case.
    #[serde(default, with = "empty_as_none")]
    pub opponent_tag: Option<Tag>,
    pub stars: u32,
    pub percentage: f64,
}

/// The slice of an opposing roster entry used to judge a target's strength.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpponentDescriptor {
    pub tag: Tag,
    pub townhall_level: u32,
    pub map_position: u32,
}

impl From<&WarMember> for OpponentDescriptor {
    fn from(member: &WarMember) -> Self {
        Self {
            tag: member.tag.clone(),
            townhall_level: member.townhall_level,
            map_position: member.map_position,
        }
    }
}

mod empty_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::models::Tag;

    pub fn serialize<S>(tag: &Option<Tag>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(tag.as_ref().map(Tag::as_str).unwrap_or(""))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Tag>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|s| !s.trim().is_empty()).map(Tag::new))
    }
}
