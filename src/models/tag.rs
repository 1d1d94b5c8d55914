//! Player, clan and war tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// War tag the league group uses for a bye slot.
const PLACEHOLDER_WAR_TAG: &str = "#0";

/// A game tag such as `#2LPOGLU2U`.
///
/// Tags are normalized on construction: surrounding whitespace is trimmed,
/// letters are upper-cased and a leading `#` is added when missing, so
/// `2lpoglu2u` and `#2LPOGLU2U` compare equal.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    /// Create a tag, normalizing its spelling.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let trimmed = raw.as_ref().trim();
        let body = trimmed.strip_prefix('#').unwrap_or(trimmed);
        Self(format!("#{}", body.to_ascii_uppercase()))
    }

    /// Get the tag as a string slice, including the leading `#`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the `#0` bye slot of a league round.
    pub fn is_placeholder(&self) -> bool {
        self.0 == PLACEHOLDER_WAR_TAG
    }

    /// Whether the tag carries anything besides the `#`.
    pub fn is_empty(&self) -> bool {
        self.0.len() <= 1
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self.0)
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_normalizes_case_and_prefix() {
        assert_eq!(Tag::new("2lpoglu2u"), Tag::new("#2LPOGLU2U"));
        assert_eq!(Tag::new(" #abc ").as_str(), "#ABC");
    }

    #[test]
    fn test_placeholder_war_tag() {
        assert!(Tag::from("#0").is_placeholder());
        assert!(!Tag::from("#8QJ2L0V9C").is_placeholder());
    }

    #[test]
    fn test_empty_tag() {
        assert!(Tag::new("").is_empty());
        assert!(Tag::new("#").is_empty());
        assert!(!Tag::new("#P1").is_empty());
    }

    #[test]
    fn test_tag_serde_is_a_plain_string() {
        let tag: Tag = serde_json::from_str("\"#p1\"").unwrap();
        assert_eq!(tag.as_str(), "#P1");
        assert_eq!(serde_json::to_string(&tag).unwrap(), "\"#P1\"");
    }

    #[test]
    fn test_tag_debug() {
        assert_eq!(format!("{:?}", Tag::from("#P1")), "Tag(#P1)");
    }
}
