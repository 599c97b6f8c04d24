//! Classified execution failures.
//!
//! `CommandError` is the one failure type that crosses component
//! boundaries: command bodies return it, the bridge carries it through the
//! completion slot, the transactional runner wraps work failures into it,
//! and the dispatcher maps it onto the wire as a JSON-RPC error object.

use serde_json::Value;
use thiserror::Error;

use crate::protocol::error_codes;

/// A failure with a wire-visible error code, a message, and optional
/// structured data for the response's `data` field.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct CommandError {
    pub code: i32,
    pub message: String,
    pub data: Option<Value>,
}

impl CommandError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attach structured data to the failure.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(error_codes::INTERNAL_ERROR, message)
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(error_codes::INVALID_PARAMS, message)
    }

    pub fn parameter_parsing(message: impl Into<String>) -> Self {
        Self::new(error_codes::PARAMETER_PARSING_FAILED, message)
    }

    /// The bridge gave up waiting for the host thread.
    pub fn timeout(command: &str) -> Self {
        Self::new(
            error_codes::COMMAND_EXECUTION_TIMEOUT,
            format!("Command {} execution timed out", command),
        )
    }

    /// A transaction's unit of work failed; wraps the original cause.
    pub fn transaction_failed(name: &str, cause: &CommandError) -> Self {
        Self::new(
            error_codes::TRANSACTION_FAILED,
            format!("Transaction '{}' failed: {}", name, cause.message),
        )
        .with_data(serde_json::json!({
            "code": cause.code,
            "message": cause.message,
        }))
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            error_codes::METHOD_NOT_FOUND,
            format!("Unknown method: {}", method),
        )
    }

    pub fn registration_failed(name: &str) -> Self {
        Self::new(
            error_codes::COMMAND_REGISTRATION_FAILED,
            format!("Command '{}' is already registered", name),
        )
    }
}
