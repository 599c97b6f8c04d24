//! JSON-RPC 2.0 protocol types.
//!
//! The request/response model used between the control connection and the
//! dispatcher:
//! - `JsonRpcRequest`  -- inbound method call or notification
//! - `JsonRpcResponse` -- outbound success or error, never both
//! - `error_codes`     -- the fixed error code taxonomy
//! - `serializer`      -- parse/validate helpers and response builders
//!
//! A request without an id is a notification and never receives a response.

pub mod error_codes;
pub mod serializer;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CommandError;

/// Protocol version tag carried by every request and response.
pub const JSONRPC_VERSION: &str = "2.0";

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Incoming JSON-RPC request.
///
/// Immutable after deserialization; `params` may be object-shaped,
/// array-shaped, or absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl JsonRpcRequest {
    /// Build an outbound request. A `None` id makes it a notification.
    pub fn new(method: impl Into<String>, params: Option<Value>, id: Option<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            method: method.into(),
            params,
            id,
        }
    }

    /// Build an outbound notification (no id, no response expected).
    pub fn notification(method: impl Into<String>, params: Option<Value>) -> Self {
        Self::new(method, params, None)
    }

    /// A request with an absent (or empty) id is a notification and must
    /// never receive a response.
    pub fn is_notification(&self) -> bool {
        self.id.as_deref().map_or(true, str::is_empty)
    }

    /// Valid iff the version tag equals "2.0" and the method is non-empty.
    pub fn is_valid(&self) -> bool {
        self.jsonrpc == JSONRPC_VERSION && !self.method.is_empty()
    }

    /// Parameters as a JSON object, if object-shaped.
    pub fn params_object(&self) -> Option<&Map<String, Value>> {
        self.params.as_ref()?.as_object()
    }

    /// Parameters as a JSON array, if array-shaped.
    pub fn params_array(&self) -> Option<&Vec<Value>> {
        self.params.as_ref()?.as_array()
    }

    /// Named parameter from object-shaped params, decoded into `T`.
    pub fn param<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let value = self.params_object()?.get(name)?;
        serde_json::from_value(value.clone()).ok()
    }

    /// Positional parameter from array-shaped params, decoded into `T`.
    pub fn param_at<T: DeserializeOwned>(&self, index: usize) -> Option<T> {
        let value = self.params_array()?.get(index)?;
        serde_json::from_value(value.clone()).ok()
    }

    /// The whole params payload decoded into `T`.
    ///
    /// Absent params or a shape mismatch fail with a classified
    /// parameter-parsing error.
    pub fn params_as<T: DeserializeOwned>(&self) -> Result<T, CommandError> {
        let params = self
            .params
            .as_ref()
            .ok_or_else(|| CommandError::parameter_parsing("request params are absent"))?;
        serde_json::from_value(params.clone())
            .map_err(|e| CommandError::parameter_parsing(format!("failed to convert params: {}", e)))
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Error object carried by an error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Outgoing JSON-RPC response.
///
/// Exactly one of the two forms is ever serialized; the id echoes the
/// request's id verbatim (or null when the request's id was unknowable,
/// e.g. after a parse failure).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcResponse {
    Success {
        jsonrpc: String,
        id: Option<String>,
        result: Value,
    },
    Error {
        jsonrpc: String,
        id: Option<String>,
        error: JsonRpcError,
    },
}

impl JsonRpcResponse {
    /// Build a success response.
    pub fn success(id: Option<String>, result: Value) -> Self {
        Self::Success {
            jsonrpc: JSONRPC_VERSION.into(),
            id,
            result,
        }
    }

    /// Build an error response.
    pub fn error(
        id: Option<String>,
        code: i32,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        Self::Error {
            jsonrpc: JSONRPC_VERSION.into(),
            id,
            error: JsonRpcError {
                code,
                message: message.into(),
                data,
            },
        }
    }

    /// The response's id, as echoed from the request.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Success { id, .. } | Self::Error { id, .. } => id.as_deref(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}
