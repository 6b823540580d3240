//! The builtin functions exposed to policies.
//!
//! Each call validates its arguments, builds one typed request, makes exactly
//! one client call and renders the reply (or the recoverable error) as a
//! policy value.

mod authorization;
mod decl;
mod identity;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use tracing::debug;

use crate::client::Clients;
use crate::config::FunctionsConfig;
use crate::error::BuiltinError;

pub use decl::{ArgDecl, ArgType, FunctionDecl};

use decl::{
    ACTIONS, DIGITAL_TWIN_IDENTIFIER, IDENTITY_RETURNS, INPUT_PARAMS, OPTIONS, POLICY_TAGS,
    PROPERTIES, RESOURCE_REFERENCES, RESOURCE_TYPES, RESOURCES, SUBJECT, TOKEN,
};

/// Message shapes spoken by the builtins.
///
/// The two generations are not compatible; a host picks one.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ApiGeneration {
    /// Subjects with a `subjectType` discriminant and free-form resources.
    #[default]
    Subject,
    /// Digital twin identifiers and `{id, label}` resource references.
    Identifier,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter,
)]
pub enum BuiltinName {
    #[strum(serialize = "indy.is_authorized")]
    IsAuthorized,
    #[strum(serialize = "indy.what_authorized")]
    WhatAuthorized,
    #[strum(serialize = "indy.who_authorized")]
    WhoAuthorized,
    #[strum(serialize = "indy.identity")]
    Identity,
    #[strum(serialize = "indy.identity_properties")]
    IdentityProperties,
}

/// The builtins of one API generation, bound to their clients.
#[derive(Debug, Clone)]
pub struct Builtins {
    generation: ApiGeneration,
    clients: Clients,
}

impl Builtins {
    pub fn new(generation: ApiGeneration, clients: Clients) -> Self {
        Self {
            generation,
            clients,
        }
    }

    pub fn from_config(config: &FunctionsConfig, clients: Clients) -> Self {
        Self::new(config.generation, clients)
    }

    pub fn generation(&self) -> ApiGeneration {
        self.generation
    }

    pub fn declarations(&self) -> Vec<FunctionDecl> {
        BuiltinName::iter()
            .map(|name| declare(self.generation, name))
            .collect()
    }

    pub fn declaration(&self, name: &str) -> Result<FunctionDecl, BuiltinError> {
        let name = BuiltinName::from_str(name)
            .map_err(|_| BuiltinError::UnknownFunction(name.to_string()))?;
        Ok(declare(self.generation, name))
    }

    /// Invoke a builtin by name with positional arguments.
    pub async fn call(&self, name: &str, args: &[Value]) -> Result<Value, BuiltinError> {
        let decl = self.declaration(name)?;
        decl.check_args(args)?;

        debug!(
            event = "Builtin",
            phase = "Call",
            function = name,
            generation = self.generation.as_ref()
        );

        let clients = &self.clients;
        match (decl.name, self.generation) {
            (BuiltinName::IsAuthorized, ApiGeneration::Subject) => {
                authorization::is_authorized(clients, args).await
            }
            (BuiltinName::IsAuthorized, ApiGeneration::Identifier) => {
                authorization::is_authorized_by_identifier(clients, args).await
            }
            (BuiltinName::WhatAuthorized, generation) => {
                authorization::what_authorized(clients, generation, args).await
            }
            (BuiltinName::WhoAuthorized, _) => authorization::who_authorized(clients, args).await,
            (BuiltinName::Identity, _) => identity::identity(clients, args).await,
            (BuiltinName::IdentityProperties, _) => {
                identity::identity_properties(clients, args).await
            }
        }
    }
}

fn declare(generation: ApiGeneration, name: BuiltinName) -> FunctionDecl {
    let (args, returns, memoize): (&'static [ArgDecl], &'static [&'static str], bool) =
        match (name, generation) {
            (BuiltinName::IsAuthorized, ApiGeneration::Subject) => (
                &[SUBJECT, RESOURCES, OPTIONS],
                &["error", "decisionTime", "decisions"],
                false,
            ),
            (BuiltinName::IsAuthorized, ApiGeneration::Identifier) => (
                &[DIGITAL_TWIN_IDENTIFIER, ACTIONS, RESOURCE_REFERENCES],
                &["error", "decision_time", "decisions"],
                false,
            ),
            (BuiltinName::WhatAuthorized, ApiGeneration::Subject) => (
                &[SUBJECT, RESOURCE_TYPES, OPTIONS],
                &["error", "decision_time", "decisions"],
                false,
            ),
            (BuiltinName::WhatAuthorized, ApiGeneration::Identifier) => (
                &[DIGITAL_TWIN_IDENTIFIER, RESOURCE_TYPES, OPTIONS],
                &["error", "decision_time", "decisions"],
                false,
            ),
            (BuiltinName::WhoAuthorized, _) => (
                &[RESOURCES, INPUT_PARAMS, POLICY_TAGS],
                &["error", "decisionTime", "decisions"],
                false,
            ),
            (BuiltinName::Identity, _) => (&[TOKEN], IDENTITY_RETURNS, true),
            (BuiltinName::IdentityProperties, _) => (
                &[TOKEN, PROPERTIES],
                &["error", "token_info", "properties"],
                true,
            ),
        };
    FunctionDecl {
        name,
        args,
        returns,
        memoize,
    }
}

#[cfg(test)]
mod tests;
