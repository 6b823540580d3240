//! Typed replies of the identity service.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::typed_value::TypedValue;

/// A digital twin reference with binary UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DigitalTwinRef {
    pub id: Vec<u8>,
    pub tenant_id: Vec<u8>,
}

/// Details about a valid access token.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenInfo {
    pub customer_id: Vec<u8>,
    pub app_space_id: Vec<u8>,
    pub application_id: Vec<u8>,
    pub subject: Option<DigitalTwinRef>,
    pub impersonated: Option<DigitalTwinRef>,
    pub expire_time: Option<DateTime<Utc>>,
    pub token_claims: Map<String, Value>,
    pub session_claims: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenIntrospection {
    pub active: bool,
    pub token_info: Option<TokenInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyDefinition {
    pub context: String,
    pub property: String,
    pub property_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyMeta {
    pub assurance_level: i32,
    pub issuer: String,
    pub primary: bool,
    pub verifier: String,
    pub verification_time: Option<DateTime<Utc>>,
}

/// One property of a digital twin.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Property {
    pub id: String,
    pub definition: PropertyDefinition,
    pub meta: PropertyMeta,
    /// `None` renders as null.
    pub value: Option<TypedValue>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DigitalTwinProperties {
    pub token_info: Option<TokenInfo>,
    pub properties: Vec<Property>,
}
