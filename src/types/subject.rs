//! Who is asking: subjects and digital twin identifiers.

use std::fmt::{Display, Formatter, Result as FmtResult};

use strum_macros::{AsRefStr, EnumString};

use super::typed_value::TypedValue;

/// Discriminant carried by subject descriptors under `subjectType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr, EnumString)]
pub enum SubjectType {
    /// The id is an opaque bearer credential.
    #[default]
    #[strum(serialize = "token")]
    Token,
    #[strum(serialize = "id")]
    DigitalTwinId,
    #[strum(serialize = "property")]
    Property,
    #[strum(serialize = "external_id")]
    ExternalId,
}

/// The subject of an authorization request.
#[derive(Debug, Clone, PartialEq)]
pub enum SubjectDescriptor {
    AccessToken(String),
    DigitalTwinId(String),
    DigitalTwinProperty {
        property_type: String,
        value: TypedValue,
    },
    ExternalId {
        node_type: String,
        external_id: String,
    },
}

impl SubjectDescriptor {
    pub fn subject_type(&self) -> SubjectType {
        match self {
            SubjectDescriptor::AccessToken(_) => SubjectType::Token,
            SubjectDescriptor::DigitalTwinId(_) => SubjectType::DigitalTwinId,
            SubjectDescriptor::DigitalTwinProperty { .. } => SubjectType::Property,
            SubjectDescriptor::ExternalId { .. } => SubjectType::ExternalId,
        }
    }
}

// Tokens are never printed, only their kind.
impl Display for SubjectDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SubjectDescriptor::AccessToken(_) => write!(f, "token(..)"),
            SubjectDescriptor::DigitalTwinId(id) => write!(f, "id({id})"),
            SubjectDescriptor::DigitalTwinProperty { property_type, .. } => {
                write!(f, "property({property_type})")
            }
            SubjectDescriptor::ExternalId {
                node_type,
                external_id,
            } => write!(f, "external_id({node_type}/{external_id})"),
        }
    }
}

/// Digital twin identifier of the older message generation.
///
/// Its shape has no discriminant; the variant follows from which keys are present.
#[derive(Debug, Clone, PartialEq)]
pub enum DigitalTwinIdentifier {
    AccessToken(String),
    DigitalTwin { id: String, tenant_id: String },
    PropertyFilter {
        property_type: String,
        value: TypedValue,
    },
}

impl Display for DigitalTwinIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DigitalTwinIdentifier::AccessToken(_) => write!(f, "token(..)"),
            DigitalTwinIdentifier::DigitalTwin { id, tenant_id } => {
                write!(f, "digital_twin({id}@{tenant_id})")
            }
            DigitalTwinIdentifier::PropertyFilter { property_type, .. } => {
                write!(f, "property({property_type})")
            }
        }
    }
}
