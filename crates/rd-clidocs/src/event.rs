//! Typed doc-build event vocabulary and payload.
//!
//! The set of document-build events is fixed and known at compile time, so
//! it is modeled as an enum rather than free-form strings; the enum still
//! knows how to spell itself as a hierarchical topic
//! (`doc-title.Operation.describe-instances`) for the wildcard bus, keeping
//! external observers able to subscribe with patterns like
//! `doc-title.Operation.*`.

use std::cell::RefCell;
use std::rc::Rc;

use rd_document::DocumentStructure;
use rd_events::{EventBus, Topic, TopicPattern};

use crate::model::{GlobalOption, Operation, Parameter, Provider, Service};

/// Shared handle to the document under construction.
pub type SharedDoc = Rc<RefCell<DocumentStructure>>;

/// Wrap a document for shared use by event handlers.
#[must_use]
pub fn shared_doc(doc: DocumentStructure) -> SharedDoc {
    Rc::new(RefCell::new(doc))
}

/// Bus carrying doc-build events.
pub type DocEventBus = EventBus<DocEvent>;

/// Kind of entity a document describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Provider,
    Service,
    Operation,
}

impl EntityKind {
    /// The topic segment for this entity kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Provider => "Provider",
            Self::Service => "Service",
            Self::Operation => "Operation",
        }
    }
}

/// The fixed vocabulary of document-build events, fired in order by the
/// drivers in [`crate::driver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocEventKind {
    Title,
    Description,
    SynopsisStart,
    SynopsisOption,
    SynopsisEnd,
    OptionsStart,
    Option,
    OptionExample,
    OptionsEnd,
    Examples,
    SubitemsStart,
    Subitem,
    SubitemsEnd,
}

impl DocEventKind {
    /// Every event kind, in the order drivers fire them for an operation.
    pub const ALL: [Self; 13] = [
        Self::Title,
        Self::Description,
        Self::SynopsisStart,
        Self::SynopsisOption,
        Self::SynopsisEnd,
        Self::OptionsStart,
        Self::Option,
        Self::OptionExample,
        Self::OptionsEnd,
        Self::Examples,
        Self::SubitemsStart,
        Self::Subitem,
        Self::SubitemsEnd,
    ];

    /// The event-name topic prefix.
    #[must_use]
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Title => "doc-title",
            Self::Description => "doc-description",
            Self::SynopsisStart => "doc-synopsis-start",
            Self::SynopsisOption => "doc-synopsis-option",
            Self::SynopsisEnd => "doc-synopsis-end",
            Self::OptionsStart => "doc-options-start",
            Self::Option => "doc-option",
            Self::OptionExample => "doc-option-example",
            Self::OptionsEnd => "doc-options-end",
            Self::Examples => "doc-examples",
            Self::SubitemsStart => "doc-subitems-start",
            Self::Subitem => "doc-subitem",
            Self::SubitemsEnd => "doc-subitems-end",
        }
    }

    /// Whether topics of this kind carry a per-item trailing segment.
    #[must_use]
    pub fn has_argument(self) -> bool {
        matches!(
            self,
            Self::SynopsisOption | Self::Option | Self::OptionExample | Self::Subitem
        )
    }

    /// Registration pattern for all entities of `kind`, e.g.
    /// `doc-option.Operation.*.*`.
    #[must_use]
    pub fn pattern(self, kind: EntityKind) -> TopicPattern {
        let mut pattern = format!("{}.{}.*", self.event_name(), kind.as_str());
        if self.has_argument() {
            pattern.push_str(".*");
        }
        TopicPattern::new(&pattern)
    }

    /// Concrete topic for one entity (and one item, for per-item kinds).
    #[must_use]
    pub fn topic(self, kind: EntityKind, entity: &str, argument: Option<&str>) -> Topic {
        match argument {
            Some(argument) => Topic::from_segments(
                self.event_name(),
                &[kind.as_str(), entity, argument],
            ),
            None => Topic::from_segments(self.event_name(), &[kind.as_str(), entity]),
        }
    }
}

/// The entity a doc-build event is about.
#[derive(Clone)]
pub enum Subject {
    Provider(Rc<Provider>),
    Service(Rc<Service>),
    Operation(Rc<Operation>),
}

impl Subject {
    /// The entity kind of this subject.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Provider(_) => EntityKind::Provider,
            Self::Service(_) => EntityKind::Service,
            Self::Operation(_) => EntityKind::Operation,
        }
    }

    /// The topic segment naming this subject.
    #[must_use]
    pub fn topic_segment(&self) -> &str {
        match self {
            Self::Provider(provider) => &provider.name,
            Self::Service(service) => &service.endpoint_prefix,
            Self::Operation(operation) => &operation.name,
        }
    }
}

/// Per-item payload of `doc-option`, `doc-synopsis-option`,
/// `doc-option-example` and `doc-subitem` events.
#[derive(Clone)]
pub enum DocArgument {
    Parameter(Rc<Parameter>),
    GlobalOption(Rc<GlobalOption>),
    Service(Rc<Service>),
    Operation(Rc<Operation>),
}

impl DocArgument {
    /// The topic segment naming this item.
    #[must_use]
    pub fn topic_segment(&self) -> &str {
        match self {
            Self::Parameter(parameter) => parameter.topic_segment(),
            Self::GlobalOption(option) => option.topic_segment(),
            Self::Service(service) => &service.endpoint_prefix,
            Self::Operation(operation) => &operation.cli_name,
        }
    }
}

/// One doc-build event: what happened, to which entity, into which document.
#[derive(Clone)]
pub struct DocEvent {
    pub kind: DocEventKind,
    pub subject: Subject,
    pub doc: SharedDoc,
    pub argument: Option<DocArgument>,
}

impl DocEvent {
    /// The concrete topic this event dispatches under.
    #[must_use]
    pub fn topic(&self) -> Topic {
        self.kind.topic(
            self.subject.kind(),
            self.subject.topic_segment(),
            self.argument.as_ref().map(DocArgument::topic_segment),
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_pattern_shapes() {
        assert_eq!(
            DocEventKind::Title.pattern(EntityKind::Provider),
            TopicPattern::new("doc-title.Provider.*")
        );
        assert_eq!(
            DocEventKind::Option.pattern(EntityKind::Operation),
            TopicPattern::new("doc-option.Operation.*.*")
        );
    }

    #[test]
    fn test_topic_construction() {
        let topic = DocEventKind::SynopsisOption.topic(
            EntityKind::Operation,
            "DescribeInstances",
            Some("instance-id"),
        );
        assert_eq!(
            topic.as_str(),
            "doc-synopsis-option.Operation.DescribeInstances.instance-id"
        );
    }

    #[test]
    fn test_patterns_match_their_topics() {
        for kind in DocEventKind::ALL {
            let argument = kind.has_argument().then_some("item");
            let topic = kind.topic(EntityKind::Service, "s3", argument);
            assert!(kind.pattern(EntityKind::Service).matches(&topic));
        }
    }
}
