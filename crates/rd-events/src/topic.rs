//! Hierarchical event topics and wildcard patterns.

use std::fmt;

/// A hierarchical event name, e.g. `doc-title.Operation.describe-instances`.
///
/// Segments are separated by `.`; names composed of several path components
/// within a single segment are hyphen-joined (`docs-adding-section.mydoc-intro`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Topic(String);

impl Topic {
    /// Create a topic from a full dot-separated name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Create a topic by dot-joining an event name and its trailing segments.
    #[must_use]
    pub fn from_segments<S: AsRef<str>>(event: &str, rest: &[S]) -> Self {
        let mut name = String::from(event);
        for segment in rest {
            name.push('.');
            name.push_str(segment.as_ref());
        }
        Self(name)
    }

    /// The full topic name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the dot-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Topic {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Topic {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// One segment of a [`TopicPattern`].
#[derive(Clone, Debug, PartialEq, Eq)]
enum PatternSegment {
    Literal(String),
    /// `*` — matches exactly one topic segment.
    Any,
}

/// A parsed subscription pattern matched segment-wise against topics.
///
/// Matching is hierarchical: the pattern's segments must be a prefix of the
/// topic's segments, with `*` standing in for exactly one segment. So
/// `doc-title` matches `doc-title.Provider.aws`, and `doc-subitem.Provider.*.*`
/// requires two segments after the provider kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicPattern {
    segments: Vec<PatternSegment>,
}

impl TopicPattern {
    /// Parse a dot-separated pattern, `*` being the single-segment wildcard.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let segments = pattern
            .split('.')
            .map(|segment| match segment {
                "*" => PatternSegment::Any,
                literal => PatternSegment::Literal(literal.to_owned()),
            })
            .collect();
        Self { segments }
    }

    /// Whether this pattern matches the given topic.
    #[must_use]
    pub fn matches(&self, topic: &Topic) -> bool {
        let mut topic_segments = topic.segments();
        for pattern_segment in &self.segments {
            let Some(topic_segment) = topic_segments.next() else {
                return false;
            };
            match pattern_segment {
                PatternSegment::Any => {}
                PatternSegment::Literal(literal) => {
                    if literal != topic_segment {
                        return false;
                    }
                }
            }
        }
        true
    }
}

impl From<&str> for TopicPattern {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

impl From<String> for TopicPattern {
    fn from(pattern: String) -> Self {
        Self::new(&pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_from_segments() {
        let topic = Topic::from_segments("doc-title", &["Operation", "describe-instances"]);
        assert_eq!(topic.as_str(), "doc-title.Operation.describe-instances");
        assert_eq!(topic.segments().count(), 3);
    }

    #[test]
    fn test_exact_match() {
        let pattern = TopicPattern::new("doc-title.Provider.aws");
        assert!(pattern.matches(&Topic::new("doc-title.Provider.aws")));
        assert!(!pattern.matches(&Topic::new("doc-title.Provider.gcp")));
    }

    #[test]
    fn test_wildcard_matches_one_segment() {
        let pattern = TopicPattern::new("doc-title.Provider.*");
        assert!(pattern.matches(&Topic::new("doc-title.Provider.aws")));
        assert!(pattern.matches(&Topic::new("doc-title.Provider.gcp")));
        assert!(!pattern.matches(&Topic::new("doc-title.Provider")));
        assert!(!pattern.matches(&Topic::new("doc-title.Service.s3")));
    }

    #[test]
    fn test_prefix_match_is_hierarchical() {
        let pattern = TopicPattern::new("doc-title");
        assert!(pattern.matches(&Topic::new("doc-title")));
        assert!(pattern.matches(&Topic::new("doc-title.Provider.aws")));
        assert!(!pattern.matches(&Topic::new("doc-description.Provider.aws")));
    }

    #[test]
    fn test_double_wildcard() {
        let pattern = TopicPattern::new("doc-subitem.Provider.*.*");
        assert!(pattern.matches(&Topic::new("doc-subitem.Provider.aws.s3")));
        assert!(!pattern.matches(&Topic::new("doc-subitem.Provider.aws")));
    }

    #[test]
    fn test_wildcard_in_the_middle() {
        let pattern = TopicPattern::new("doc-option.*.*.instance-id");
        assert!(pattern.matches(&Topic::new(
            "doc-option.Operation.describe-instances.instance-id"
        )));
        assert!(!pattern.matches(&Topic::new("doc-option.Operation.describe-instances.dry-run")));
    }
}
