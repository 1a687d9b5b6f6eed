// src/form/path.rs
//! Dotted paths into a form document (`"education.0.degree"`)

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Largest digit segment treated as an array index. Arrays are stored
/// densely, so bigger digit runs are kept as object keys instead.
pub const MAX_INDEX: usize = 9_999;

/// One step of a path: an object key or an array index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    /// Classify a raw segment. All-digit segments up to [`MAX_INDEX`] are
    /// indices, anything else (including the empty string) is a literal key.
    pub fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Some(index) = raw.parse::<usize>().ok().filter(|i| *i <= MAX_INDEX) {
                return Segment::Index(index);
            }
        }
        Segment::Key(raw.to_string())
    }

    /// Index segment, or its decimal key when past [`MAX_INDEX`]
    pub fn index(index: usize) -> Self {
        if index <= MAX_INDEX {
            Segment::Index(index)
        } else {
            Segment::Key(index.to_string())
        }
    }

    fn normalized(self) -> Self {
        match self {
            Segment::Index(index) => Segment::index(index),
            key => key,
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Segment::Index(index) if *index <= MAX_INDEX)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FormPath {
    segments: Vec<Segment>,
}

impl FormPath {
    /// Path addressing the whole document
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dotted path. Never fails: `"a..b"` yields an empty key in the middle.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path.split('.').map(Segment::parse).collect(),
        }
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self {
            segments: segments.into_iter().map(Segment::normalized).collect(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(Segment::Key(key.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::index(index));
        self
    }
}

/// Dotted text form. Keys built with [`FormPath::key`] that contain `.` or
/// are all digits do not parse back to the same path.
impl fmt::Display for FormPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for FormPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for FormPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for FormPath {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classifies_segments() {
        let path = FormPath::parse("education.0.degree");
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("education".to_string()),
                Segment::Index(0),
                Segment::Key("degree".to_string()),
            ]
        );
    }

    #[test]
    fn test_mixed_digit_segment_is_key() {
        assert_eq!(Segment::parse("0a"), Segment::Key("0a".to_string()));
        assert_eq!(Segment::parse("-1"), Segment::Key("-1".to_string()));
        assert_eq!(Segment::parse("007"), Segment::Index(7));
    }

    #[test]
    fn test_index_past_limit_is_key() {
        assert_eq!(Segment::parse("9999"), Segment::Index(MAX_INDEX));
        assert_eq!(Segment::parse("10000"), Segment::Key("10000".to_string()));
        assert_eq!(
            Segment::parse("18446744073709551615"),
            Segment::Key("18446744073709551615".to_string())
        );
        assert_eq!(
            Segment::parse("99999999999999999999999"),
            Segment::Key("99999999999999999999999".to_string())
        );
    }

    #[test]
    fn test_builders_apply_index_limit() {
        let built = FormPath::root().key("education").index(usize::MAX);
        assert_eq!(built, FormPath::parse("education.18446744073709551615"));

        let raw = FormPath::from_segments(vec![Segment::Index(MAX_INDEX + 1)]);
        assert_eq!(raw.segments(), &[Segment::Key("10000".to_string())]);
    }

    #[test]
    fn test_dotted_key_does_not_round_trip() {
        let path = FormPath::root().key("a.b");
        assert_eq!(path.to_string(), "a.b");
        assert_eq!(FormPath::parse("a.b").len(), 2);
    }

    #[test]
    fn test_empty_segments_are_literal_keys() {
        let path = FormPath::parse("a..b");
        assert_eq!(path.len(), 3);
        assert_eq!(path.segments()[1], Segment::Key(String::new()));
    }

    #[test]
    fn test_display_rejoins_with_dots() {
        let path = FormPath::root()
            .key("jobPreferences")
            .key("preferredLocations")
            .index(0)
            .key("city");
        assert_eq!(path.to_string(), "jobPreferences.preferredLocations.0.city");
        assert_eq!(FormPath::parse(&path.to_string()), path);
    }
}
