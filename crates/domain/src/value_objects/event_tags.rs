//! Event tags value object
//!
//! A small normalized set of labels attached to an event. Tags are trimmed,
//! inner whitespace is collapsed and they are lower-cased before
//! de-duplication, so `"Rock"`, `" rock "` and `"ROCK"` are the same tag.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

pub const MAX_TAGS: usize = 10;
pub const MAX_TAG_LENGTH: usize = 30;

static TAG_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9À-ÿ\s-]+$").expect("valid regex"));

/// Normalized set of event tags.
///
/// # Invariants
///
/// - at most 10 tags
/// - each tag is 1..=30 characters of letters, digits, accented letters,
///   spaces or hyphens
/// - stored lower-case and sorted; equality is set equality
///
/// # Example
///
/// ```
/// use eventia_domain::EventTags;
///
/// let tags = EventTags::from_string("Rock, rock , MÚSICA").unwrap();
/// assert_eq!(tags.to_vec(), vec!["música".to_string(), "rock".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct EventTags(BTreeSet<String>);

impl EventTags {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from raw tags. Blank entries are ignored.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when a tag is too long, contains
    /// characters outside the allowed set, or there are more than 10 distinct
    /// tags after normalization.
    pub fn new<I, S>(tags: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for raw in tags {
            let tag = collapse_whitespace(raw.as_ref());
            if tag.is_empty() {
                continue;
            }
            validate(&tag)?;
            set.insert(tag.to_lowercase());
        }
        if set.len() > MAX_TAGS {
            return Err(DomainError::validation(format!(
                "No se permiten más de {} etiquetas",
                MAX_TAGS
            )));
        }
        Ok(Self(set))
    }

    /// Parse a comma-separated list (`"rock, jazz"`).
    pub fn from_string(value: &str) -> Result<Self, DomainError> {
        Self::new(value.split(','))
    }

    /// Returns a copy with `tag` added.
    pub fn add(&self, tag: &str) -> Result<Self, DomainError> {
        Self::new(self.0.iter().map(String::as_str).chain(std::iter::once(tag)))
    }

    /// Returns a copy without `tag` (matched after normalization).
    pub fn remove(&self, tag: &str) -> Self {
        let tag = normalize(tag);
        Self(self.0.iter().filter(|t| **t != tag).cloned().collect())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(&normalize(tag))
    }

    /// True when at least one tag is shared with `other`.
    pub fn intersects(&self, other: &EventTags) -> bool {
        self.0.iter().any(|t| other.0.contains(t))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize(raw: &str) -> String {
    collapse_whitespace(raw).to_lowercase()
}

/// Checks the tag as written, before lower-casing.
fn validate(tag: &str) -> Result<(), DomainError> {
    if tag.chars().count() > MAX_TAG_LENGTH {
        return Err(DomainError::validation(format!(
            "La etiqueta '{}' no puede exceder {} caracteres",
            tag, MAX_TAG_LENGTH
        )));
    }
    if !TAG_CHARSET.is_match(tag) {
        return Err(DomainError::validation(format!(
            "La etiqueta '{}' contiene caracteres no permitidos",
            tag
        )));
    }
    Ok(())
}

impl fmt::Display for EventTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_vec().join(", "))
    }
}

impl TryFrom<Vec<String>> for EventTags {
    type Error = DomainError;

    fn try_from(tags: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(tags)
    }
}

impl From<EventTags> for Vec<String> {
    fn from(tags: EventTags) -> Vec<String> {
        tags.0.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_normalizes_and_dedups() {
        let tags = EventTags::from_string("Rock, rock , MÚSICA").unwrap();
        assert_eq!(tags.to_vec(), vec!["música", "rock"]);
    }

    #[test]
    fn ten_tags_allowed_eleven_rejected() {
        let ten: Vec<String> = (0..10).map(|i| format!("tag{}", i)).collect();
        assert_eq!(EventTags::new(&ten).unwrap().len(), 10);

        let eleven: Vec<String> = (0..11).map(|i| format!("tag{}", i)).collect();
        assert!(EventTags::new(&eleven).is_err());
    }

    #[test]
    fn duplicates_do_not_count_towards_limit() {
        let mut tags: Vec<String> = (0..10).map(|i| format!("tag{}", i)).collect();
        tags.push("TAG0".to_string());
        assert_eq!(EventTags::new(&tags).unwrap().len(), 10);
    }

    #[test]
    fn rejects_long_tags() {
        let long = "a".repeat(31);
        assert!(EventTags::new([long.as_str()]).is_err());
        let max = "a".repeat(30);
        assert!(EventTags::new([max.as_str()]).is_ok());
    }

    #[test]
    fn rejects_disallowed_characters() {
        assert!(EventTags::new(["rock&roll"]).is_err());
        assert!(EventTags::new(["#live"]).is_err());
        assert!(EventTags::new(["hip-hop", "café concert"]).is_ok());
    }

    #[test]
    fn charset_applies_before_lowercasing() {
        // U+0178 folds to U+00FF, which is inside the accented range
        assert!(EventTags::new(["Ÿes"]).is_err());
        assert!(EventTags::new(["ÀLBUM"]).is_ok());
    }

    #[test]
    fn inner_whitespace_is_collapsed() {
        let tags = EventTags::new(["live   music"]).unwrap();
        assert!(tags.contains("Live Music"));
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a = EventTags::new(["jazz", "blues"]).unwrap();
        let b = EventTags::new(["Blues", "JAZZ"]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn add_and_remove_return_new_sets() {
        let tags = EventTags::new(["jazz"]).unwrap();
        let added = tags.add("Soul").unwrap();
        assert!(added.contains("soul"));
        assert!(!tags.contains("soul"));
        assert_eq!(added.remove("SOUL"), tags);
    }

    #[test]
    fn blank_entries_are_ignored() {
        let tags = EventTags::from_string("rock,, ,jazz").unwrap();
        assert_eq!(tags.len(), 2);
    }
}
