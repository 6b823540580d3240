//! The options argument of the authorization builtins.

use itertools::Itertools;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::BuiltinError;
use crate::input_params::{ParamSyntax, parse_input_params};
use crate::types::InputParams;

/// The two spellings of the option keys. A call uses exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionKeys {
    /// `input_params`, `policy_tags`
    Snake,
    /// `inputParams`, `policyTags`
    #[default]
    Camel,
}

impl OptionKeys {
    pub fn input_params(self) -> &'static str {
        match self {
            OptionKeys::Snake => "input_params",
            OptionKeys::Camel => "inputParams",
        }
    }

    pub fn policy_tags(self) -> &'static str {
        match self {
            OptionKeys::Snake => "policy_tags",
            OptionKeys::Camel => "policyTags",
        }
    }

    fn allows(self, key: &str) -> bool {
        key == self.input_params() || key == self.policy_tags()
    }

    /// Snake keys take precedence as soon as one of them is present.
    fn detect(object: &Map<String, Value>) -> Self {
        if object.keys().any(|key| OptionKeys::Snake.allows(key)) {
            OptionKeys::Snake
        } else {
            OptionKeys::Camel
        }
    }
}

/// An options object whose keys passed validation.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedOptions<'a> {
    keys: OptionKeys,
    object: Option<&'a Map<String, Value>>,
}

impl<'a> ValidatedOptions<'a> {
    pub fn keys(&self) -> OptionKeys {
        self.keys
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.object.and_then(|object| object.get(key))
    }

    pub fn policy_tags(&self) -> Vec<String> {
        parse_policy_tags(self.get(self.keys.policy_tags()))
    }

    pub fn input_params(&self, syntax: ParamSyntax) -> Result<InputParams, BuiltinError> {
        parse_input_params(self.get(self.keys.input_params()), syntax)
    }
}

/// Check the option keys against the allow-list.
///
/// `null` is treated as no options. Every rejected key is reported, sorted.
pub fn validate_options(options: &Value) -> Result<ValidatedOptions<'_>, BuiltinError> {
    let object = match options {
        Value::Null => None,
        Value::Object(object) => Some(object),
        other => return Err(BuiltinError::type_mismatch("options", other, "object")),
    };

    let keys = object.map(OptionKeys::detect).unwrap_or_default();
    if let Some(object) = object {
        let rejected: Vec<String> = object
            .keys()
            .filter(|key| !keys.allows(key))
            .sorted()
            .cloned()
            .collect();
        if !rejected.is_empty() {
            return Err(BuiltinError::InvalidOption { keys: rejected });
        }
    }

    debug!(event = "Options", phase = "Validated", keys = ?keys);
    Ok(ValidatedOptions { keys, object })
}

/// Collect the string entries of a tag array.
///
/// Anything that is not an array yields no tags; non-string entries are dropped.
pub fn parse_policy_tags(tags: Option<&Value>) -> Vec<String> {
    let Some(items) = tags.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item.as_str() {
            Some(tag) => Some(tag.to_string()),
            None => {
                debug!(event = "Options", phase = "PolicyTags", dropped = %item);
                None
            }
        })
        .collect()
}
