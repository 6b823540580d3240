use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};

use super::*;
use crate::client::{AuthorizationClient, IdentityClient};
use crate::error::{ClientError, RpcError, StatusCode, StatusError};
use crate::types::{
    DigitalTwinProperties, IsAuthorizedByIdentifierRequest, IsAuthorizedByIdentifierResponse,
    IsAuthorizedRequest, IsAuthorizedResponse, TokenIntrospection, WhatAuthorizedRequest,
    WhatAuthorizedResponse, WhoAuthorizedRequest, WhoAuthorizedResponse,
};

mod identity;

const ACCESS_TOKEN: &str = "eyJhbGciOiJFUzI1NiJ9.test-access-token.signature";

fn decision_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 8, 8, 8, 8, 8).unwrap()
}

/// Records every request and answers with canned replies, or with `failure` when set.
#[derive(Default)]
struct MockAuthorization {
    failure: Option<RpcError>,
    is_reply: IsAuthorizedResponse,
    legacy_reply: IsAuthorizedByIdentifierResponse,
    what_reply: WhatAuthorizedResponse,
    who_reply: WhoAuthorizedResponse,
    is_requests: Mutex<Vec<IsAuthorizedRequest>>,
    legacy_requests: Mutex<Vec<IsAuthorizedByIdentifierRequest>>,
    what_requests: Mutex<Vec<WhatAuthorizedRequest>>,
    who_requests: Mutex<Vec<WhoAuthorizedRequest>>,
}

impl MockAuthorization {
    fn failing(err: impl Into<RpcError>) -> Self {
        Self {
            failure: Some(err.into()),
            ..Self::default()
        }
    }

    fn answer<T: Clone>(&self, reply: &T) -> Result<T, RpcError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(reply.clone()),
        }
    }
}

#[async_trait]
impl AuthorizationClient for MockAuthorization {
    async fn is_authorized(
        &self,
        request: IsAuthorizedRequest,
    ) -> Result<IsAuthorizedResponse, RpcError> {
        self.is_requests.lock().unwrap().push(request);
        self.answer(&self.is_reply)
    }

    async fn is_authorized_by_identifier(
        &self,
        request: IsAuthorizedByIdentifierRequest,
    ) -> Result<IsAuthorizedByIdentifierResponse, RpcError> {
        self.legacy_requests.lock().unwrap().push(request);
        self.answer(&self.legacy_reply)
    }

    async fn what_authorized(
        &self,
        request: WhatAuthorizedRequest,
    ) -> Result<WhatAuthorizedResponse, RpcError> {
        self.what_requests.lock().unwrap().push(request);
        self.answer(&self.what_reply)
    }

    async fn who_authorized(
        &self,
        request: WhoAuthorizedRequest,
    ) -> Result<WhoAuthorizedResponse, RpcError> {
        self.who_requests.lock().unwrap().push(request);
        self.answer(&self.who_reply)
    }
}

#[derive(Default)]
struct MockIdentity {
    failure: Option<RpcError>,
    introspection: TokenIntrospection,
    properties: DigitalTwinProperties,
    calls: AtomicUsize,
    requested_properties: Mutex<Vec<Vec<String>>>,
}

impl MockIdentity {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer<T: Clone>(&self, reply: &T) -> Result<T, RpcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(reply.clone()),
        }
    }
}

#[async_trait]
impl IdentityClient for MockIdentity {
    async fn introspect_token(&self, _token: &str) -> Result<TokenIntrospection, RpcError> {
        self.answer(&self.introspection)
    }

    async fn digital_twin_by_token(
        &self,
        _token: &str,
        properties: &[String],
    ) -> Result<DigitalTwinProperties, RpcError> {
        self.requested_properties
            .lock()
            .unwrap()
            .push(properties.to_vec());
        self.answer(&self.properties)
    }
}

fn subject_builtins(authorization: Arc<MockAuthorization>) -> Builtins {
    Builtins::new(
        ApiGeneration::Subject,
        Clients::new().with_authorization(authorization),
    )
}

fn identity_builtins(identity: Arc<MockIdentity>) -> Builtins {
    Builtins::new(ApiGeneration::Subject, Clients::new().with_identity(identity))
}

fn validation_failure() -> StatusError {
    StatusError::new(
        StatusCode::InvalidArgument,
        "Actions: value must contain between 1 and 5 items",
    )
}

fn resources_arg() -> Value {
    json!([{"externalId": "res1", "type": "Type", "actions": ["READ"]}])
}

#[test]
fn test_missing_endpoint_error_text() {
    let err: BuiltinError = RpcError::from(ClientError::MissingEndpoint).into();
    assert_eq!(err.to_string(), "missing endpoint");
}
