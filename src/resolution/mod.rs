/// Resolution Engine
///
/// Classifies incoming entity identifiers, dispatches directory lookups,
/// expands group aliases into their members, and assembles the ordered
/// response.

pub mod classifier;
pub mod expander;
pub mod resolver;

pub use classifier::{classify, LookupPlan};
pub use expander::GroupExpander;
pub use resolver::EntityResolver;

use crate::directory::EntityRecord;
use serde::{Deserialize, Serialize};

/// Recognized identifier kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Email,
    Username,
}

impl IdentifierKind {
    /// Parse the wire-level type tag; None for unrecognized kinds
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "email" => Some(Self::Email),
            "username" => Some(Self::Username),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Username => "username",
        }
    }
}

/// One caller-supplied identifier to resolve.
///
/// The `type` tag arrives as a string and is validated by the orchestrator
/// before any directory call is made; absent fields deserialize to empty
/// strings and are rejected there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityIdentifier {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub identifier: String,
}

/// Resolution outcome for one identifier.
///
/// `entity_representations` is empty when nothing matched and holds more
/// than one record for ambiguous matches; both are valid outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityResolution {
    pub original_identifier: EntityIdentifier,
    pub entity_representations: Vec<EntityRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_recognized() {
        assert_eq!(IdentifierKind::parse("email"), Some(IdentifierKind::Email));
        assert_eq!(IdentifierKind::parse("username"), Some(IdentifierKind::Username));
    }

    #[test]
    fn test_kind_parse_unrecognized() {
        assert_eq!(IdentifierKind::parse("somebadtype"), None);
        assert_eq!(IdentifierKind::parse(""), None);
        assert_eq!(IdentifierKind::parse("Email"), None);
    }

    #[test]
    fn test_identifier_wire_format() {
        let parsed: EntityIdentifier =
            serde_json::from_str(r#"{"identifier": "bob@sample.org", "type": "email"}"#).unwrap();
        assert_eq!(parsed.kind, "email");
        assert_eq!(parsed.identifier, "bob@sample.org");

        let json = serde_json::to_string(&parsed).unwrap();
        assert!(json.contains(r#""type":"email""#));
    }

    #[test]
    fn test_missing_type_deserializes_empty() {
        let parsed: EntityIdentifier =
            serde_json::from_str(r#"{"identifier": "bob@sample.org"}"#).unwrap();
        assert_eq!(parsed.kind, "");
        assert_eq!(IdentifierKind::parse(&parsed.kind), None);
    }

    #[test]
    fn test_resolution_echoes_original_identifier() {
        let resolution = EntityResolution {
            original_identifier: EntityIdentifier {
                kind: "username".to_string(),
                identifier: "bob.smith".to_string(),
            },
            entity_representations: Vec::new(),
        };

        let json = serde_json::to_string(&resolution).unwrap();
        assert!(json.contains(r#""original_identifier""#));
        assert!(json.contains(r#""entity_representations":[]"#));
    }
}
