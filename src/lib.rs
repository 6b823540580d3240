// src/lib.rs
pub use client::{AuthorizationClient, Clients, IdentityClient};
pub use config::FunctionsConfig;
pub use error::{BuiltinError, ClientError, RpcError, StatusCode, StatusError};
pub use functions::{ApiGeneration, ArgDecl, ArgType, BuiltinName, Builtins, FunctionDecl};
pub use host::{Evaluation, HostError};

pub mod classify;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod functions;
pub mod host;
pub mod input_params;
pub mod options;
pub mod resolver;
pub mod response;
pub mod types;
