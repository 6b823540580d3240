//! Data model types for requests, replies and typed values.
//!
//! Wire shapes:
//! - Typed value: `{"stringValue": "x"}`, `{"arrayValue": {"values": [..]}}`
//! - Subject: `{"id": "..", "subjectType": "token" | "id" | "property" | "external_id"}`
//! - Resource: `{"externalId": "..", "type": "..", "actions": [..]}`
//! - Legacy identifier: `".."`, `{"digital_twin_id", "tenant_id"}` or
//!   `{"property_type", "property_value"}`

mod decision;
mod identity;
mod input_param;
mod request;
mod resource;
mod subject;
mod typed_value;

pub use decision::{
    ActionDecision, AllowActions, ExternalRef, IsAuthorizedByIdentifierResponse,
    IsAuthorizedResponse, ResourceDecisions, ResourceSubjects, WhatAuthorizedResponse,
    WhoAuthorizedResponse, decision_seconds,
};
pub use identity::{
    DigitalTwinProperties, DigitalTwinRef, Property, PropertyDefinition, PropertyMeta, TokenInfo,
    TokenIntrospection,
};
pub use input_param::InputParam;
pub use request::{
    InputParams, IsAuthorizedByIdentifierRequest, IsAuthorizedRequest, RequestSubject,
    WhatAuthorizedRequest, WhoAuthorizedRequest,
};
pub use resource::{ResourceDescriptor, ResourceReference, ResourceTypeFilter};
pub use subject::{DigitalTwinIdentifier, SubjectDescriptor, SubjectType};
pub use typed_value::{GeoPoint, TypedValue};
