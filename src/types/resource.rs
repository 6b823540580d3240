//! What is being asked about: resources, references and type filters.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A resource with the actions to check.
///
/// Deserialization is deliberately lenient: `externalId`, `external_id` and
/// `id` all name the identifier, absent fields default to empty and unknown
/// fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    #[serde(default, alias = "external_id", alias = "id")]
    pub external_id: String,
    #[serde(default, rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub actions: Vec<String>,
}

impl ResourceDescriptor {
    pub fn new(
        external_id: impl Into<String>,
        resource_type: impl Into<String>,
        actions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            external_id: external_id.into(),
            resource_type: resource_type.into(),
            actions: actions.into_iter().map(Into::into).collect(),
        }
    }
}

impl Display for ResourceDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}::{}[{}]",
            self.resource_type,
            self.external_id,
            self.actions.join(",")
        )
    }
}

/// Resource reference of the older generation: `{id, label}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct ResourceReference {
    pub id: String,
    pub label: String,
}

/// A resource type to enumerate, optionally narrowed to some actions.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct ResourceTypeFilter {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use yare::parameterized;

    #[parameterized(
        camel = { json!({"externalId": "res1", "type": "Type", "actions": ["READ"]}) },
        snake = { json!({"external_id": "res1", "type": "Type", "actions": ["READ"]}) },
        plain_id = { json!({"id": "res1", "type": "Type", "actions": ["READ"]}) },
        extra_fields = { json!({"externalId": "res1", "type": "Type", "actions": ["READ"], "note": 1}) },
    )]
    fn test_descriptor_accepts_id_spellings(input: serde_json::Value) {
        let descriptor: ResourceDescriptor = serde_json::from_value(input).unwrap();
        assert_eq!(descriptor, ResourceDescriptor::new("res1", "Type", ["READ"]));
    }

    #[test]
    fn test_descriptor_defaults_missing_fields() {
        let descriptor: ResourceDescriptor = serde_json::from_value(json!({"type": "Type"})).unwrap();
        assert_eq!(descriptor.external_id, "");
        assert!(descriptor.actions.is_empty());
    }

    #[test]
    fn test_descriptor_serializes_camel_case() {
        let descriptor = ResourceDescriptor::new("res1", "Type", ["READ"]);
        assert_eq!(
            serde_json::to_value(&descriptor).unwrap(),
            json!({"externalId": "res1", "type": "Type", "actions": ["READ"]})
        );
        assert_eq!(descriptor.to_string(), "Type::res1[READ]");
    }

    #[test]
    fn test_type_filter_omits_empty_actions() {
        let filter = ResourceTypeFilter {
            resource_type: "Type".to_string(),
            actions: vec![],
        };
        assert_eq!(serde_json::to_value(&filter).unwrap(), json!({"type": "Type"}));
    }
}
