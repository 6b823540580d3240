//! Adapter between the builtins and one policy evaluation of the host.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::FunctionsConfig;
use crate::error::BuiltinError;
use crate::functions::Builtins;

/// An aborting builtin error, prefixed with the function name.
#[derive(Debug, Error)]
#[error("{function}: {source}")]
pub struct HostError {
    pub function: String,
    #[source]
    pub source: BuiltinError,
}

/// State of a single policy evaluation.
///
/// Memoizable builtins are called at most once per distinct argument list.
/// In strict mode errors abort the evaluation; otherwise they are logged and
/// the call yields no result.
#[derive(Debug)]
pub struct Evaluation<'a> {
    builtins: &'a Builtins,
    strict: bool,
    memo: HashMap<(String, String), Value>,
}

impl<'a> Evaluation<'a> {
    pub fn new(builtins: &'a Builtins, strict: bool) -> Self {
        Self {
            builtins,
            strict,
            memo: HashMap::new(),
        }
    }

    pub fn from_config(builtins: &'a Builtins, config: &FunctionsConfig) -> Self {
        Self::new(builtins, config.strict_builtin_errors)
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub async fn call(&mut self, name: &str, args: &[Value]) -> Result<Option<Value>, HostError> {
        let memoize = self
            .builtins
            .declaration(name)
            .is_ok_and(|decl| decl.memoize);
        let key = (name.to_string(), Value::Array(args.to_vec()).to_string());

        if memoize {
            if let Some(hit) = self.memo.get(&key) {
                debug!(event = "Builtin", phase = "Memoized", function = name);
                return Ok(Some(hit.clone()));
            }
        }

        match self.builtins.call(name, args).await {
            Ok(value) => {
                if memoize {
                    self.memo.insert(key, value.clone());
                }
                Ok(Some(value))
            }
            Err(source) if self.strict => Err(HostError {
                function: name.to_string(),
                source,
            }),
            Err(source) => {
                warn!(
                    event = "Builtin",
                    phase = "Error",
                    function = name,
                    error = %source
                );
                Ok(None)
            }
        }
    }
}
