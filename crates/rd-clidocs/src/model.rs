//! Read-only API description model.
//!
//! The documentation engine treats the API description as an opaque tree it
//! only queries: names, types, documentation strings, choices. Entities are
//! shared through `Rc` handles so events can carry them cheaply; nothing here
//! is mutated after construction.

use std::rc::Rc;

/// Shape of a parameter value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamKind {
    #[default]
    String,
    Integer,
    Boolean,
    Float,
    Double,
    Timestamp,
    Blob,
    /// Homogeneous list of `member` values.
    List { member: Box<Parameter> },
    /// Mapping of `key` scalars to `value` values.
    Map {
        key: Box<Parameter>,
        value: Box<Parameter>,
    },
    /// Named members, in declaration order.
    Structure { members: Vec<Parameter> },
}

impl ParamKind {
    /// Whether this is a scalar (non-aggregate) kind.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            Self::List { .. } | Self::Map { .. } | Self::Structure { .. }
        )
    }

    /// Whether this is the boolean kind (flag-style CLI arguments).
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::Boolean)
    }

    /// The wire-level type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Float => "float",
            Self::Double => "double",
            Self::Timestamp => "timestamp",
            Self::Blob => "blob",
            Self::List { .. } => "list",
            Self::Map { .. } => "map",
            Self::Structure { .. } => "structure",
        }
    }

    /// Human-facing type label: lists of scalars read as `list of <kind>`.
    #[must_use]
    pub fn type_display(&self) -> String {
        match self {
            Self::List { member } if member.kind.is_scalar() => {
                format!("list of {}", member.kind.type_name())
            }
            other => other.type_name().to_owned(),
        }
    }
}

/// One operation parameter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    /// Wire name, e.g. `InstanceId`.
    pub name: String,
    /// CLI-facing name, e.g. `--instance-id`.
    pub cli_name: String,
    pub kind: ParamKind,
    pub required: bool,
    /// Restricted-HTML documentation string. May be empty.
    pub documentation: String,
    /// Enumerated valid values. Empty when unconstrained.
    pub choices: Vec<String>,
}

impl Parameter {
    /// The CLI name without its leading dashes, used in event topics.
    #[must_use]
    pub fn topic_segment(&self) -> &str {
        self.cli_name.trim_start_matches('-')
    }
}

/// One provider-level (global) CLI option.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalOption {
    /// Flag name including dashes, e.g. `--region`.
    pub name: String,
    /// Placeholder shown after the flag, e.g. `region-name`.
    pub metavar: Option<String>,
    /// Restricted-HTML help string. May be empty.
    pub help: String,
    /// Enumerated valid values. Empty when unconstrained.
    pub choices: Vec<String>,
}

impl GlobalOption {
    /// The flag name without its leading dashes, used in event topics.
    #[must_use]
    pub fn topic_segment(&self) -> &str {
        self.name.trim_start_matches('-')
    }
}

/// One service operation.
#[derive(Clone, Debug, Default)]
pub struct Operation {
    /// Wire name, e.g. `DescribeInstances`.
    pub name: String,
    /// CLI-facing name, e.g. `describe-instances`.
    pub cli_name: String,
    /// Restricted-HTML documentation string. May be empty.
    pub documentation: String,
    pub params: Vec<Rc<Parameter>>,
}

/// One service of a provider.
#[derive(Clone, Debug, Default)]
pub struct Service {
    /// Short routing prefix, e.g. `ec2`. Doubles as the service's CLI name.
    pub endpoint_prefix: String,
    /// Full display name, e.g. `Amazon Elastic Compute Cloud`.
    pub full_name: String,
    /// Restricted-HTML documentation string. May be empty.
    pub documentation: String,
    pub operations: Vec<Rc<Operation>>,
}

/// The top-level CLI provider.
#[derive(Clone, Debug, Default)]
pub struct Provider {
    /// Provider CLI name, e.g. `aws`.
    pub name: String,
    /// Restricted-HTML description string.
    pub description: String,
    /// Usage synopsis line.
    pub synopsis: String,
    /// Restricted-HTML usage help shown under the synopsis.
    pub help_usage: String,
    pub options: Vec<Rc<GlobalOption>>,
    pub services: Vec<Rc<Service>>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_type_display() {
        let scalar_list = ParamKind::List {
            member: Box::new(Parameter {
                kind: ParamKind::String,
                ..Parameter::default()
            }),
        };
        assert_eq!(scalar_list.type_display(), "list of string");

        let nested_list = ParamKind::List {
            member: Box::new(Parameter {
                kind: ParamKind::Structure { members: vec![] },
                ..Parameter::default()
            }),
        };
        assert_eq!(nested_list.type_display(), "list");
        assert_eq!(ParamKind::Boolean.type_display(), "boolean");
    }

    #[test]
    fn test_topic_segment_strips_dashes() {
        let param = Parameter {
            cli_name: "--instance-id".to_owned(),
            ..Parameter::default()
        };
        assert_eq!(param.topic_segment(), "instance-id");
    }

    #[test]
    fn test_scalar_classification() {
        assert!(ParamKind::Timestamp.is_scalar());
        assert!(!ParamKind::Structure { members: vec![] }.is_scalar());
        assert!(ParamKind::Boolean.is_boolean());
        assert!(!ParamKind::String.is_boolean());
    }
}
