//! Property paths.

use crate::error::{ValueError, ValueResult};
use std::fmt;
use std::str::FromStr;

/// One segment of a property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment(String);

impl Segment {
    /// Returns the segment text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interprets the segment as an array index.
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        self.0.parse().ok()
    }
}

/// A dot-separated path to a property of an entity.
///
/// The first segment names a top-level property exposed by the entity;
/// the remaining segments descend into the value it holds. `"id"` and
/// `"profile.address.city"` are both valid paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    raw: String,
    segments: Vec<Segment>,
}

impl PropertyPath {
    /// Parses a path.
    ///
    /// Fails if the path is empty or contains an empty segment.
    pub fn parse(raw: &str) -> ValueResult<Self> {
        if raw.is_empty() {
            return Err(ValueError::invalid_path(raw, "path is empty"));
        }

        let segments = raw
            .split('.')
            .map(|s| {
                if s.trim().is_empty() {
                    Err(ValueError::invalid_path(raw, "path contains an empty segment"))
                } else {
                    Ok(Segment(s.to_string()))
                }
            })
            .collect::<ValueResult<Vec<_>>>()?;

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The top-level property this path starts from.
    #[must_use]
    pub fn root(&self) -> &str {
        // parse() guarantees at least one segment
        self.segments.first().map_or("", Segment::as_str)
    }

    /// Segments after the root.
    #[must_use]
    pub fn tail(&self) -> &[Segment] {
        self.segments.get(1..).unwrap_or(&[])
    }

    /// Whether the path is a single top-level property.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.segments.len() == 1
    }

    /// Returns the path as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for PropertyPath {
    type Err = ValueError;

    fn from_str(s: &str) -> ValueResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for PropertyPath {
    type Error = ValueError;

    fn try_from(s: &str) -> ValueResult<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_path() {
        let path = PropertyPath::parse("id").unwrap();
        assert!(path.is_simple());
        assert_eq!(path.root(), "id");
        assert!(path.tail().is_empty());
    }

    #[test]
    fn nested_path() {
        let path: PropertyPath = "profile.address.city".parse().unwrap();
        assert!(!path.is_simple());
        assert_eq!(path.root(), "profile");
        assert_eq!(path.tail().len(), 2);
        assert_eq!(path.tail()[1].as_str(), "city");
        assert_eq!(path.to_string(), "profile.address.city");
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            PropertyPath::parse(""),
            Err(ValueError::InvalidPath { .. })
        ));
        assert!(PropertyPath::parse("a..b").is_err());
        assert!(PropertyPath::parse(".a").is_err());
        assert!(PropertyPath::parse("a. ").is_err());
    }

    #[test]
    fn numeric_segments_index_arrays() {
        let path = PropertyPath::parse("items.2").unwrap();
        assert_eq!(path.tail()[0].as_index(), Some(2));
        assert_eq!(Segment("x".into()).as_index(), None);
    }
}
