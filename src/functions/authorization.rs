use serde_json::Value;
use tracing::debug;

use crate::classify::classify;
use crate::client::Clients;
use crate::error::BuiltinError;
use crate::input_params::{ParamSyntax, parse_input_params};
use crate::options::{parse_policy_tags, validate_options};
use crate::resolver::{
    resolve_identifier, resolve_resource_references, resolve_resource_types, resolve_resources,
    resolve_strings, resolve_subject,
};
use crate::response::{
    render_is_authorized, render_is_authorized_by_identifier, render_what_authorized,
    render_who_authorized,
};
use crate::types::{
    IsAuthorizedByIdentifierRequest, IsAuthorizedRequest, RequestSubject, WhatAuthorizedRequest,
    WhoAuthorizedRequest,
};

use super::ApiGeneration;

fn arity(expected: usize, args: &[Value]) -> BuiltinError {
    BuiltinError::Arity {
        expected,
        actual: args.len(),
    }
}

/// `indy.is_authorized(subject, resources, options)`
pub(super) async fn is_authorized(clients: &Clients, args: &[Value]) -> Result<Value, BuiltinError> {
    let [subject, resources, options] = args else {
        return Err(arity(3, args));
    };
    let options = validate_options(options).map_err(|e| e.at(3))?;
    let request = IsAuthorizedRequest {
        subject: resolve_subject(subject).map_err(|e| e.at(1))?,
        resources: resolve_resources(resources).map_err(|e| e.at(2))?,
        input_params: options
            .input_params(ParamSyntax::Inferred)
            .map_err(|e| e.at(3))?,
        policy_tags: options.policy_tags(),
    };

    debug!(
        event = "IsAuthorized",
        phase = "Request",
        subject = %request.subject,
        resources = request.resources.len(),
        input_params = request.input_params.len(),
        policy_tags = ?request.policy_tags
    );

    let client = clients.authorization()?;
    classify(client.is_authorized(request).await, render_is_authorized)
}

/// `indy.is_authorized(digital_twin_identifier, actions, resources)` of the identifier generation.
pub(super) async fn is_authorized_by_identifier(
    clients: &Clients,
    args: &[Value],
) -> Result<Value, BuiltinError> {
    let [identifier, actions, resources] = args else {
        return Err(arity(3, args));
    };
    let request = IsAuthorizedByIdentifierRequest {
        identifier: resolve_identifier(identifier).map_err(|e| e.at(1))?,
        actions: resolve_strings(actions, "actions").map_err(|e| e.at(2))?,
        resources: resolve_resource_references(resources).map_err(|e| e.at(3))?,
    };

    debug!(
        event = "IsAuthorized",
        phase = "Request",
        identifier = %request.identifier,
        actions = ?request.actions,
        resources = request.resources.len()
    );

    let client = clients.authorization()?;
    classify(
        client.is_authorized_by_identifier(request).await,
        render_is_authorized_by_identifier,
    )
}

/// `indy.what_authorized(subject, resource_types, options)`
pub(super) async fn what_authorized(
    clients: &Clients,
    generation: ApiGeneration,
    args: &[Value],
) -> Result<Value, BuiltinError> {
    let [subject, resource_types, options] = args else {
        return Err(arity(3, args));
    };
    let options = validate_options(options).map_err(|e| e.at(3))?;
    let subject = match generation {
        ApiGeneration::Subject => resolve_subject(subject).map(RequestSubject::Subject),
        ApiGeneration::Identifier => resolve_identifier(subject).map(RequestSubject::Identifier),
    }
    .map_err(|e| e.at(1))?;
    let request = WhatAuthorizedRequest {
        subject,
        resource_types: resolve_resource_types(resource_types).map_err(|e| e.at(2))?,
        input_params: options
            .input_params(ParamSyntax::Inferred)
            .map_err(|e| e.at(3))?,
        policy_tags: options.policy_tags(),
    };

    debug!(
        event = "WhatAuthorized",
        phase = "Request",
        subject = %request.subject,
        resource_types = request.resource_types.len(),
        input_params = request.input_params.len(),
        policy_tags = ?request.policy_tags
    );

    let client = clients.authorization()?;
    classify(client.what_authorized(request).await, render_what_authorized)
}

/// `indy.who_authorized(resources, inputParams, policyTags)`
pub(super) async fn who_authorized(clients: &Clients, args: &[Value]) -> Result<Value, BuiltinError> {
    let [resources, input_params, policy_tags] = args else {
        return Err(arity(3, args));
    };
    let request = WhoAuthorizedRequest {
        resources: resolve_resources(resources).map_err(|e| e.at(1))?,
        input_params: parse_input_params(Some(input_params), ParamSyntax::Tagged)
            .map_err(|e| e.at(2))?,
        policy_tags: parse_policy_tags(Some(policy_tags)),
    };

    debug!(
        event = "WhoAuthorized",
        phase = "Request",
        resources = request.resources.len(),
        input_params = request.input_params.len(),
        policy_tags = ?request.policy_tags
    );

    let client = clients.authorization()?;
    classify(client.who_authorized(request).await, render_who_authorized)
}
