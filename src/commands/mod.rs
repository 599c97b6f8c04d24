//! Command contract and registry.
//!
//! A command is a named unit of work the dispatcher can invoke with the
//! request's params and id. Commands are constructed and registered during
//! the load phase, before concurrent dispatch begins, and live for the
//! process lifetime.

pub mod registry;

pub use registry::CommandRegistry;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CommandError;

/// An executable command keyed by name in the registry.
///
/// `execute` runs on a dispatch worker thread; implementations that mutate
/// host state hop onto the host thread through an
/// [`EventBridge`](crate::bridge::EventBridge) they captured at
/// construction.
pub trait Command: Send + Sync {
    /// Unique dispatch key for this command.
    fn name(&self) -> &str;

    /// Execute with the request's params (Null when absent) and id.
    fn execute(&self, params: &Value, request_id: Option<&str>) -> Result<Value, CommandError>;
}

/// Decode a command's params into a typed shape.
///
/// The schema-validated step every command body should run before touching
/// its parameters: a mismatch fails with `PARAMETER_PARSING_FAILED` rather
/// than an untyped error deep inside the command.
pub fn decode_params<T: DeserializeOwned>(params: &Value) -> Result<T, CommandError> {
    serde_json::from_value(params.clone()).map_err(|e| {
        CommandError::parameter_parsing(format!("Failed to parse command parameters: {}", e))
    })
}

/// Conventional result envelope commands may return as their payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl CommandResult {
    /// Successful result with an optional payload.
    pub fn ok(data: Option<Value>) -> Self {
        Self {
            success: true,
            data,
            error_message: None,
        }
    }

    /// Failed result with a message and optional payload.
    pub fn error(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            success: false,
            data,
            error_message: Some(message.into()),
        }
    }

    /// The envelope as a JSON value, for returning from `Command::execute`.
    pub fn into_value(self) -> Value {
        serde_json::to_value(&self).unwrap_or(Value::Null)
    }
}
