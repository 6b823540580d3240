//! Typed replies of the authorization service.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Allow flag for one action on one resource.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash, Default)]
pub struct ActionDecision {
    pub allow: bool,
}

/// A resource or subject named by its external id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExternalRef {
    pub external_id: String,
}

impl ExternalRef {
    pub fn new(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
        }
    }
}

/// Per-action allow flags of the older generation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Default)]
pub struct AllowActions {
    pub allow_actions: BTreeMap<String, bool>,
}

/// Resource key → action → decision.
pub type ResourceDecisions = BTreeMap<String, BTreeMap<String, ActionDecision>>;

/// Resource key → action → subjects.
pub type ResourceSubjects = BTreeMap<String, BTreeMap<String, Vec<ExternalRef>>>;

/// Decisions keyed by resource type, then resource key, then action.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IsAuthorizedResponse {
    pub decision_time: Option<DateTime<Utc>>,
    pub decisions: BTreeMap<String, ResourceDecisions>,
}

/// Permitted resources keyed by resource type, then action.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WhatAuthorizedResponse {
    pub decision_time: Option<DateTime<Utc>>,
    pub decisions: BTreeMap<String, BTreeMap<String, Vec<ExternalRef>>>,
}

/// Permitted subjects keyed by resource type, then resource key, then action.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WhoAuthorizedResponse {
    pub decision_time: Option<DateTime<Utc>>,
    pub decisions: BTreeMap<String, ResourceSubjects>,
}

/// Decisions of the older generation, keyed by resource reference.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IsAuthorizedByIdentifierResponse {
    pub decision_time: Option<DateTime<Utc>>,
    pub decisions: BTreeMap<String, AllowActions>,
}

/// Seconds since the epoch, zero when the service sent no timestamp.
pub fn decision_seconds(decision_time: Option<DateTime<Utc>>) -> i64 {
    decision_time.map_or(0, |t| t.timestamp())
}
