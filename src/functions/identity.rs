use serde_json::Value;
use tracing::debug;

use crate::classify::classify;
use crate::client::Clients;
use crate::error::BuiltinError;
use crate::resolver::{resolve_string, resolve_strings};
use crate::response::{render_identity, render_identity_properties};

/// `indy.identity(token)`: token introspection.
pub(super) async fn identity(clients: &Clients, args: &[Value]) -> Result<Value, BuiltinError> {
    let [token] = args else {
        return Err(BuiltinError::Arity {
            expected: 1,
            actual: args.len(),
        });
    };
    let token = resolve_string(token, "token").map_err(|e| e.at(1))?;

    debug!(event = "Identity", phase = "Request");

    let client = clients.identity()?;
    classify(client.introspect_token(&token).await, render_identity)
}

/// `indy.identity_properties(token, properties)`: the token owner's properties.
pub(super) async fn identity_properties(
    clients: &Clients,
    args: &[Value],
) -> Result<Value, BuiltinError> {
    let [token, properties] = args else {
        return Err(BuiltinError::Arity {
            expected: 2,
            actual: args.len(),
        });
    };
    let token = resolve_string(token, "token").map_err(|e| e.at(1))?;
    let properties = resolve_strings(properties, "properties").map_err(|e| e.at(2))?;

    debug!(event = "IdentityProperties", phase = "Request", properties = ?properties);

    let client = clients.identity()?;
    classify(
        client.digital_twin_by_token(&token, &properties).await,
        render_identity_properties,
    )
}
