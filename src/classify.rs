//! Split failed calls into aborting errors and results the policy can inspect.

use serde_json::Value;
use tracing::debug;

use crate::error::{BuiltinError, RpcError, StatusError};
use crate::response::render_user_error;

/// Keep request-validation statuses; turn everything else into an aborting error.
///
/// The decision is made on the error kind and status code, never on the message.
pub fn classify_error(err: RpcError) -> Result<StatusError, BuiltinError> {
    match err {
        RpcError::Status(status) if !status.code.is_service_failure() => {
            debug!(
                event = "Classify",
                phase = "Recoverable",
                code = status.code.as_ref(),
                message = status.message
            );
            Ok(status)
        }
        fatal => {
            debug!(event = "Classify", phase = "Fatal", error = %fatal);
            Err(BuiltinError::Service(fatal))
        }
    }
}

/// Render a successful reply, or the recoverable error in its place.
pub fn classify<T>(
    outcome: Result<T, RpcError>,
    render: impl FnOnce(&T) -> Result<Value, BuiltinError>,
) -> Result<Value, BuiltinError> {
    match outcome {
        Ok(reply) => render(&reply),
        Err(err) => classify_error(err).map(|status| render_user_error(&status)),
    }
}
