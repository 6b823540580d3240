//! Extraction of typed subjects and resources from policy values.

use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::BuiltinError;
use crate::types::{
    DigitalTwinIdentifier, ResourceDescriptor, ResourceReference, ResourceTypeFilter,
    SubjectDescriptor, SubjectType, TypedValue,
};

const SUBJECT_TYPE_KEYS: [&str; 2] = ["subjectType", "subject_type"];
const EXTERNAL_ID_KEYS: [&str; 3] = ["externalId", "external_id", "id"];

fn as_object<'a>(value: &'a Value, name: &str) -> Result<&'a Map<String, Value>, BuiltinError> {
    value
        .as_object()
        .ok_or_else(|| BuiltinError::type_mismatch(name, value, "object"))
}

fn as_array<'a>(value: &'a Value, name: &str) -> Result<&'a Vec<Value>, BuiltinError> {
    value
        .as_array()
        .ok_or_else(|| BuiltinError::type_mismatch(name, value, "array"))
}

fn required_str<'a>(
    object: &'a Map<String, Value>,
    field: &str,
    path: &str,
) -> Result<&'a str, BuiltinError> {
    let value = object
        .get(field)
        .ok_or_else(|| BuiltinError::missing_field(path))?;
    value
        .as_str()
        .ok_or_else(|| BuiltinError::type_mismatch(path, value, "string"))
}

/// Read a subject descriptor, `{"id": .., "subjectType": .., ..}`.
///
/// Without a discriminant the id is an access token.
pub fn resolve_subject(value: &Value) -> Result<SubjectDescriptor, BuiltinError> {
    let subject = as_object(value, "subject")?;
    let id = required_str(subject, "id", "id")?;

    let subject_type = match SUBJECT_TYPE_KEYS
        .iter()
        .find_map(|key| subject.get(*key).map(|v| (*key, v)))
    {
        None => SubjectType::default(),
        Some((key, raw)) => raw
            .as_str()
            .and_then(|s| SubjectType::from_str(s).ok())
            .ok_or_else(|| {
                BuiltinError::type_mismatch(key, raw, "one of token, id, property, external_id")
            })?,
    };

    let descriptor = match subject_type {
        SubjectType::Token => SubjectDescriptor::AccessToken(id.to_string()),
        SubjectType::DigitalTwinId => SubjectDescriptor::DigitalTwinId(id.to_string()),
        SubjectType::Property => SubjectDescriptor::DigitalTwinProperty {
            property_type: required_str(subject, "property", "property")?.to_string(),
            value: TypedValue::from(id),
        },
        SubjectType::ExternalId => SubjectDescriptor::ExternalId {
            node_type: required_str(subject, "type", "type")?.to_string(),
            external_id: id.to_string(),
        },
    };

    debug!(event = "Subject", phase = "Resolved", subject = %descriptor);
    Ok(descriptor)
}

/// Read a digital twin identifier of the older generation.
///
/// The variant is chosen by which keys are present.
pub fn resolve_identifier(value: &Value) -> Result<DigitalTwinIdentifier, BuiltinError> {
    let expected = "string, {digital_twin_id, tenant_id} or {property_type, property_value}";
    let identifier = match value {
        Value::String(token) => DigitalTwinIdentifier::AccessToken(token.clone()),
        Value::Object(object)
            if object.contains_key("digital_twin_id") || object.contains_key("tenant_id") =>
        {
            DigitalTwinIdentifier::DigitalTwin {
                id: required_str(object, "digital_twin_id", "digital_twin_id")?.to_string(),
                tenant_id: required_str(object, "tenant_id", "tenant_id")?.to_string(),
            }
        }
        Value::Object(object)
            if object.contains_key("property_type") || object.contains_key("property_value") =>
        {
            DigitalTwinIdentifier::PropertyFilter {
                property_type: required_str(object, "property_type", "property_type")?.to_string(),
                value: TypedValue::from(required_str(object, "property_value", "property_value")?),
            }
        }
        other => {
            return Err(BuiltinError::type_mismatch(
                "digital_twin_identifier",
                other,
                expected,
            ));
        }
    };

    debug!(event = "Identifier", phase = "Resolved", identifier = %identifier);
    Ok(identifier)
}

/// Keep only the first present identifier synonym, under its canonical name.
fn canonical_resource(object: &Map<String, Value>) -> Value {
    let mut canonical = object.clone();
    let external_id = EXTERNAL_ID_KEYS
        .iter()
        .find_map(|key| object.get(*key).cloned());
    for key in EXTERNAL_ID_KEYS {
        canonical.remove(key);
    }
    if let Some(external_id) = external_id {
        canonical.insert(EXTERNAL_ID_KEYS[0].to_string(), external_id);
    }
    Value::Object(canonical)
}

/// Read free-form resource descriptors.
///
/// Each element is mapped onto the resource schema as a whole: `externalId`,
/// `external_id` and `id` are synonyms in that order of priority, absent
/// fields are empty and unknown fields are ignored.
pub fn resolve_resources(value: &Value) -> Result<Vec<ResourceDescriptor>, BuiltinError> {
    let resources = as_array(value, "resources")?
        .iter()
        .enumerate()
        .map(|(i, element)| {
            let path = format!("resources[{i}]");
            let object = as_object(element, &path)?;
            ResourceDescriptor::deserialize(canonical_resource(object)).map_err(|e| {
                BuiltinError::type_mismatch(path, element, format!("resource ({e})"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        event = "Resources",
        phase = "Resolved",
        resources = resources.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
    );
    Ok(resources)
}

/// Read `[{id, label}]` resource references.
pub fn resolve_resource_references(value: &Value) -> Result<Vec<ResourceReference>, BuiltinError> {
    as_array(value, "resources")?
        .iter()
        .enumerate()
        .map(|(i, element)| {
            let path = format!("resources[{i}]");
            let object = as_object(element, &path)?;
            Ok(ResourceReference {
                id: required_str(object, "id", &format!("{path}.id"))?.to_string(),
                label: required_str(object, "label", &format!("{path}.label"))?.to_string(),
            })
        })
        .collect()
}

/// Read `[{type, actions?}]` resource type filters.
pub fn resolve_resource_types(value: &Value) -> Result<Vec<ResourceTypeFilter>, BuiltinError> {
    as_array(value, "resource_types")?
        .iter()
        .enumerate()
        .map(|(i, element)| {
            let path = format!("resource_types[{i}]");
            let object = as_object(element, &path)?;
            let actions = match object.get("actions") {
                None | Some(Value::Null) => Vec::new(),
                Some(actions) => resolve_strings(actions, &format!("{path}.actions"))?,
            };
            Ok(ResourceTypeFilter {
                resource_type: required_str(object, "type", &format!("{path}.type"))?.to_string(),
                actions,
            })
        })
        .collect()
}

/// Read a single string argument.
pub fn resolve_string(value: &Value, name: &str) -> Result<String, BuiltinError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| BuiltinError::type_mismatch(name, value, "string"))
}

/// Read an array of strings; every element must be a string.
pub fn resolve_strings(value: &Value, name: &str) -> Result<Vec<String>, BuiltinError> {
    as_array(value, name)?
        .iter()
        .enumerate()
        .map(|(i, item)| resolve_string(item, &format!("{name}[{i}]")))
        .collect()
}
