//! Host-facing configuration of the builtins.

use serde::{Deserialize, Serialize};

use crate::error::BuiltinError;
use crate::functions::ApiGeneration;

/// Read from the host's plugin configuration, e.g.
/// `{"generation": "identifier", "strict_builtin_errors": true}`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FunctionsConfig {
    /// Which message shapes the builtins speak.
    pub generation: ApiGeneration,
    /// Abort evaluation on builtin errors instead of yielding no result.
    pub strict_builtin_errors: bool,
}

impl FunctionsConfig {
    pub fn from_json(text: &str) -> Result<Self, BuiltinError> {
        serde_json::from_str(text).map_err(|e| BuiltinError::InvalidConfig(e.to_string()))
    }
}
