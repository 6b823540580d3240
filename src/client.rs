//! The remote services, as seen by the builtins.
//!
//! Clients are passed in explicitly; building, pooling and caching them is
//! up to the embedding host.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{ClientError, RpcError};
use crate::types::{
    DigitalTwinProperties, IsAuthorizedByIdentifierRequest, IsAuthorizedByIdentifierResponse,
    IsAuthorizedRequest, IsAuthorizedResponse, TokenIntrospection, WhatAuthorizedRequest,
    WhatAuthorizedResponse, WhoAuthorizedRequest, WhoAuthorizedResponse,
};

/// One call per operation, a single attempt each. Cancellation and timeouts belong to the caller.
#[async_trait]
pub trait AuthorizationClient: Send + Sync {
    async fn is_authorized(
        &self,
        request: IsAuthorizedRequest,
    ) -> Result<IsAuthorizedResponse, RpcError>;

    async fn is_authorized_by_identifier(
        &self,
        request: IsAuthorizedByIdentifierRequest,
    ) -> Result<IsAuthorizedByIdentifierResponse, RpcError>;

    async fn what_authorized(
        &self,
        request: WhatAuthorizedRequest,
    ) -> Result<WhatAuthorizedResponse, RpcError>;

    async fn who_authorized(
        &self,
        request: WhoAuthorizedRequest,
    ) -> Result<WhoAuthorizedResponse, RpcError>;
}

#[async_trait]
pub trait IdentityClient: Send + Sync {
    async fn introspect_token(&self, token: &str) -> Result<TokenIntrospection, RpcError>;

    /// Fetch the digital twin owning `token`, restricted to the named properties.
    async fn digital_twin_by_token(
        &self,
        token: &str,
        properties: &[String],
    ) -> Result<DigitalTwinProperties, RpcError>;
}

/// The client handles available to one set of builtins.
#[derive(Clone, Default)]
pub struct Clients {
    authorization: Option<Arc<dyn AuthorizationClient>>,
    identity: Option<Arc<dyn IdentityClient>>,
}

impl Clients {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_authorization(mut self, client: Arc<dyn AuthorizationClient>) -> Self {
        self.authorization = Some(client);
        self
    }

    pub fn with_identity(mut self, client: Arc<dyn IdentityClient>) -> Self {
        self.identity = Some(client);
        self
    }

    pub fn authorization(&self) -> Result<&dyn AuthorizationClient, RpcError> {
        self.authorization
            .as_deref()
            .ok_or(RpcError::Client(ClientError::MissingEndpoint))
    }

    pub fn identity(&self) -> Result<&dyn IdentityClient, RpcError> {
        self.identity
            .as_deref()
            .ok_or(RpcError::Client(ClientError::MissingEndpoint))
    }
}

impl Debug for Clients {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Clients")
            .field("authorization", &self.authorization.is_some())
            .field("identity", &self.identity.is_some())
            .finish()
    }
}
