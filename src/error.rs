use std::fmt::{Display, Formatter, Result as FmtResult};

use serde_json::Value;
use strum_macros::{AsRefStr, Display as StrumDisplay, EnumString, FromRepr};
use thiserror::Error;

/// Errors raised while translating builtin arguments or service replies.
///
/// Every variant aborts the builtin call. Recoverable request-validation
/// failures never show up here; they are rendered into the result's
/// `error` field instead (see [`crate::classify`]).
#[derive(Debug, Error)]
pub enum BuiltinError {
    #[error("{key}: unexpected value {value}, expected {expected}")]
    TypeMismatch {
        key: String,
        value: Value,
        expected: String,
    },

    #[error("missing required field {field}")]
    MissingField { field: String },

    #[error("invalid option keys: {}", .keys.join(", "))]
    InvalidOption { keys: Vec<String> },

    #[error("invalid input parameter {name}: {value}")]
    InvalidInputParameter { name: String, value: Value },

    #[error("value of kind '{kind}' cannot be converted to a policy value")]
    UnsupportedValueKind { kind: String },

    #[error("cannot parse {field} UUID: {reason}")]
    InvalidUuid { field: &'static str, reason: String },

    #[error("operand {pos} {source}")]
    Operand {
        pos: usize,
        source: Box<BuiltinError>,
    },

    #[error(transparent)]
    Service(#[from] RpcError),

    #[error("unknown builtin function {0}")]
    UnknownFunction(String),

    #[error("expected {expected} arguments, got {actual}")]
    Arity { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot render result: {0}")]
    Render(#[from] serde_json::Error),
}

impl BuiltinError {
    pub fn type_mismatch(key: impl Into<String>, value: &Value, expected: impl Into<String>) -> Self {
        BuiltinError::TypeMismatch {
            key: key.into(),
            value: value.clone(),
            expected: expected.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        BuiltinError::MissingField {
            field: field.into(),
        }
    }

    /// Attach the 1-based argument position to a local parsing error.
    ///
    /// Service errors and errors that already carry a position are returned unchanged.
    pub fn at(self, pos: usize) -> Self {
        match self {
            BuiltinError::Service(_) | BuiltinError::Operand { .. } => self,
            other => BuiltinError::Operand {
                pos,
                source: Box::new(other),
            },
        }
    }

    /// True when the error came from the remote service or its client rather than local parsing.
    pub fn is_service_error(&self) -> bool {
        matches!(self, BuiltinError::Service(_))
    }
}

/// gRPC-style status codes reported by the authorization and identity services.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, StrumDisplay, EnumString, FromRepr,
)]
#[repr(i32)]
pub enum StatusCode {
    Ok = 0,
    Canceled = 1,
    Unknown = 2,
    InvalidArgument = 3,
    DeadlineExceeded = 4,
    NotFound = 5,
    AlreadyExists = 6,
    PermissionDenied = 7,
    ResourceExhausted = 8,
    FailedPrecondition = 9,
    Aborted = 10,
    OutOfRange = 11,
    Unimplemented = 12,
    Internal = 13,
    Unavailable = 14,
    DataLoss = 15,
    Unauthenticated = 16,
}

impl StatusCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Codes that mean the service itself failed, as opposed to rejecting the request content.
    pub fn is_service_failure(self) -> bool {
        matches!(
            self,
            StatusCode::Canceled
                | StatusCode::Unknown
                | StatusCode::DeadlineExceeded
                | StatusCode::ResourceExhausted
                | StatusCode::Unimplemented
                | StatusCode::Internal
                | StatusCode::Unavailable
                | StatusCode::DataLoss
        )
    }
}

/// A status returned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusError {
    pub code: StatusCode,
    pub message: String,
    /// Nested diagnostic from the request validation layer, if any.
    pub origin: Option<String>,
}

impl StatusError {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

impl Display for StatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "code = {} desc = {}", self.code, self.message)?;
        if let Some(origin) = &self.origin {
            write!(f, ": {origin}")?;
        }
        Ok(())
    }
}

/// Failures while building or reaching the RPC client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("missing endpoint")]
    MissingEndpoint,

    #[error("invalid client configuration: {0}")]
    Configuration(String),

    #[error("failed to connect: {0}")]
    Connection(String),
}

/// Outcome of a failed RPC call, before classification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RpcError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("client error: {0}")]
    Status(StatusError),
}

impl From<StatusError> for RpcError {
    fn from(err: StatusError) -> Self {
        RpcError::Status(err)
    }
}

impl RpcError {
    /// Client and infrastructure failures abort the builtin; everything else is request validation.
    pub fn is_service_error(&self) -> bool {
        match self {
            RpcError::Client(_) => true,
            RpcError::Status(status) => status.code.is_service_failure(),
        }
    }
}
