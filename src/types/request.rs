//! Typed requests sent to the authorization service.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::input_param::InputParam;
use super::resource::{ResourceDescriptor, ResourceReference, ResourceTypeFilter};
use super::subject::{DigitalTwinIdentifier, SubjectDescriptor};

pub type InputParams = BTreeMap<String, InputParam>;

/// Who a request is about, in either message generation.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestSubject {
    Subject(SubjectDescriptor),
    Identifier(DigitalTwinIdentifier),
}

impl Display for RequestSubject {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RequestSubject::Subject(subject) => subject.fmt(f),
            RequestSubject::Identifier(identifier) => identifier.fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IsAuthorizedRequest {
    pub subject: SubjectDescriptor,
    pub resources: Vec<ResourceDescriptor>,
    pub input_params: InputParams,
    pub policy_tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhatAuthorizedRequest {
    pub subject: RequestSubject,
    pub resource_types: Vec<ResourceTypeFilter>,
    pub input_params: InputParams,
    pub policy_tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhoAuthorizedRequest {
    pub resources: Vec<ResourceDescriptor>,
    pub input_params: InputParams,
    pub policy_tags: Vec<String>,
}

/// Older generation: one action list applied to every referenced resource.
#[derive(Debug, Clone, PartialEq)]
pub struct IsAuthorizedByIdentifierRequest {
    pub identifier: DigitalTwinIdentifier,
    pub actions: Vec<String>,
    pub resources: Vec<ResourceReference>,
}
