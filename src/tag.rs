//! Defines the [`Tags`] type, the tag list attached to a document.

use crate::util::scalar_to_string;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// An ordered set of tag names. Tags are trimmed, blank tags are dropped and
/// duplicates are removed keeping the first occurrence, so the order authors
/// wrote them in is preserved.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tags(Vec<String>);

impl Tags {
    /// Builds a tag set from any sequence of names.
    pub fn new<I, S>(tags: I) -> Tags
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.as_ref().trim();
            if !tag.is_empty() && !names.iter().any(|t| t == tag) {
                names.push(tag.to_owned());
            }
        }
        Tags(names)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<'de> Deserialize<'de> for Tags {
    /// Accepts either a single scalar (`tags: rust`) or a sequence of scalars
    /// (`tags: [rust, 2024]`). Numbers and booleans are stringified.
    fn deserialize<D>(deserializer: D) -> Result<Tags, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Tags::default()),
            Value::Sequence(items) => items
                .into_iter()
                .map(|item| {
                    scalar_to_string(item)
                        .ok_or_else(|| de::Error::custom("tags must be strings"))
                })
                .collect::<Result<Vec<String>, D::Error>>()
                .map(Tags::new),
            other => scalar_to_string(other)
                .map(|tag| Tags::new(Some(tag)))
                .ok_or_else(|| {
                    de::Error::custom("tags must be a string or a list of strings")
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dedupes_and_drops_blanks() {
        let tags = Tags::new(vec!["rust", " rust ", "", "notes", "  "]);
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["rust", "notes"]);
    }

    #[test]
    fn test_deserialize_sequence() -> Result<(), serde_yaml::Error> {
        let tags: Tags = serde_yaml::from_str("[随笔, 2024, true]")?;
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["随笔", "2024", "true"]);
        Ok(())
    }

    #[test]
    fn test_deserialize_single_string() -> Result<(), serde_yaml::Error> {
        let tags: Tags = serde_yaml::from_str("travel")?;
        assert_eq!(tags.len(), 1);
        Ok(())
    }

    #[test]
    fn test_deserialize_rejects_nested_lists() {
        assert!(serde_yaml::from_str::<Tags>("[[a, b]]").is_err());
    }
}
