//! Rendering of typed service replies as policy values.
//!
//! Every operation has its own nesting and field names; the three
//! authorization shapes are not interchangeable.

use serde_json::{Map, Value, json};
use uuid::{Uuid, Variant};

use crate::codec;
use crate::error::{BuiltinError, StatusError};
use crate::types::{
    DigitalTwinProperties, IsAuthorizedByIdentifierResponse, IsAuthorizedResponse, Property,
    TokenInfo, TokenIntrospection, WhatAuthorizedResponse, WhoAuthorizedResponse,
    decision_seconds,
};

/// `{error, decisionTime, decisions: type → key → action → {allow}}`
pub fn render_is_authorized(response: &IsAuthorizedResponse) -> Result<Value, BuiltinError> {
    Ok(json!({
        "error": null,
        "decisionTime": decision_seconds(response.decision_time),
        "decisions": serde_json::to_value(&response.decisions)?,
    }))
}

/// `{error, decision_time, decisions: type → action → [{externalId}]}`
pub fn render_what_authorized(response: &WhatAuthorizedResponse) -> Result<Value, BuiltinError> {
    Ok(json!({
        "error": null,
        "decision_time": decision_seconds(response.decision_time),
        "decisions": serde_json::to_value(&response.decisions)?,
    }))
}

/// `{error, decisionTime, decisions: type → key → action → [{externalId}]}`
pub fn render_who_authorized(response: &WhoAuthorizedResponse) -> Result<Value, BuiltinError> {
    Ok(json!({
        "error": null,
        "decisionTime": decision_seconds(response.decision_time),
        "decisions": serde_json::to_value(&response.decisions)?,
    }))
}

/// `{error, decision_time, decisions: reference → {allow_actions: {action: bool}}}`
pub fn render_is_authorized_by_identifier(
    response: &IsAuthorizedByIdentifierResponse,
) -> Result<Value, BuiltinError> {
    Ok(json!({
        "error": null,
        "decision_time": decision_seconds(response.decision_time),
        "decisions": serde_json::to_value(&response.decisions)?,
    }))
}

/// Token introspection. Token details are present only for tokens the service knows.
pub fn render_identity(introspection: &TokenIntrospection) -> Result<Value, BuiltinError> {
    let mut object = Map::new();
    object.insert("error".to_string(), Value::Null);
    object.insert("active".to_string(), Value::Bool(introspection.active));
    if let Some(info) = &introspection.token_info {
        insert_token_info(&mut object, info)?;
    }
    Ok(Value::Object(object))
}

pub fn render_identity_properties(
    response: &DigitalTwinProperties,
) -> Result<Value, BuiltinError> {
    let mut token_info = Map::new();
    if let Some(info) = &response.token_info {
        insert_token_info(&mut token_info, info)?;
        token_info.insert("active".to_string(), Value::Bool(true));
    }
    let properties = response
        .properties
        .iter()
        .map(render_property)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(json!({
        "error": null,
        "token_info": token_info,
        "properties": properties,
    }))
}

fn insert_token_info(object: &mut Map<String, Value>, info: &TokenInfo) -> Result<(), BuiltinError> {
    let subject = info.subject.clone().unwrap_or_default();
    let impersonated_id = match &info.impersonated {
        Some(twin) => optional_uuid(&twin.id, "ImpersonatedId")?,
        None => String::new(),
    };
    let fields = [
        ("expire", json!(decision_seconds(info.expire_time))),
        ("customerId", json!(optional_uuid(&info.customer_id, "CustomerId")?)),
        ("appSpaceId", json!(optional_uuid(&info.app_space_id, "AppSpaceId")?)),
        ("applicationId", json!(optional_uuid(&info.application_id, "ApplicationId")?)),
        ("subjectId", json!(optional_uuid(&subject.id, "SubjectId")?)),
        ("tenantId", json!(optional_uuid(&subject.tenant_id, "TenantId")?)),
        ("impersonatedId", json!(impersonated_id)),
        ("tokenClaims", Value::Object(info.token_claims.clone())),
        ("sessionClaims", Value::Object(info.session_claims.clone())),
    ];
    object.extend(fields.into_iter().map(|(k, v)| (k.to_string(), v)));
    Ok(())
}

fn render_property(property: &Property) -> Result<Value, BuiltinError> {
    let value = match &property.value {
        Some(value) => codec::encode(value)?,
        None => Value::Null,
    };
    let meta = &property.meta;
    Ok(json!({
        "id": property.id,
        "definition": {
            "context": property.definition.context,
            "property": property.definition.property,
            "type": property.definition.property_type,
        },
        "meta": {
            "assuranceLevel": meta.assurance_level,
            "issuer": meta.issuer,
            "primary": meta.primary,
            "verifier": meta.verifier,
            "verificationTime": meta.verification_time.as_ref().map(codec::format_time),
        },
        "value": value,
    }))
}

/// Canonical string form of a binary UUID, empty when absent.
pub fn optional_uuid(bytes: &[u8], field: &'static str) -> Result<String, BuiltinError> {
    if bytes.is_empty() {
        return Ok(String::new());
    }
    let uuid = Uuid::from_slice(bytes).map_err(|e| BuiltinError::InvalidUuid {
        field,
        reason: e.to_string(),
    })?;
    if uuid.get_variant() != Variant::RFC4122 {
        return Err(BuiltinError::InvalidUuid {
            field,
            reason: "invalid UUID, must be valid RFC4122 variant".to_string(),
        });
    }
    Ok(uuid.to_string())
}

/// The structured error of a request the service rejected.
pub fn user_error(status: &StatusError) -> Value {
    let mut error = Map::new();
    error.insert("message".to_string(), json!(status.message));
    error.insert("code".to_string(), json!(status.code.code()));
    error.insert("codeName".to_string(), json!(status.code.as_ref()));
    if let Some(origin) = &status.origin {
        error.insert("origin".to_string(), json!(origin));
    }
    Value::Object(error)
}

/// `{error: {message, code, codeName, origin?}}`
pub fn render_user_error(status: &StatusError) -> Value {
    json!({ "error": user_error(status) })
}
