//! Request parsing and response building.
//!
//! `try_parse_request` is the dispatcher's entry point: it distinguishes
//! malformed payloads (parse error) from schema-invalid requests (invalid
//! request) from usable ones, handing back a pre-built serialized error
//! response for the first two. Callers branch solely on that error response
//! being present.

use serde_json::Value;

use super::error_codes;
use super::{JsonRpcRequest, JsonRpcResponse};

/// Serialized fallback if a response itself cannot be serialized. Our
/// response types only hold JSON values, so this path is unreachable in
/// practice.
const INTERNAL_ERROR_RESPONSE: &str =
    r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Internal JSON-RPC error."}}"#;

fn serialize_response(response: &JsonRpcResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|_| INTERNAL_ERROR_RESPONSE.to_string())
}

/// Deserialize a JSON-RPC request from raw text.
pub fn parse_request(raw: &str) -> Result<JsonRpcRequest, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Serialized success response.
pub fn success_response(id: Option<String>, result: Value) -> String {
    serialize_response(&JsonRpcResponse::success(id, result))
}

/// Serialized error response.
pub fn error_response(
    id: Option<String>,
    code: i32,
    message: impl Into<String>,
    data: Option<Value>,
) -> String {
    serialize_response(&JsonRpcResponse::error(id, code, message, data))
}

/// Pre-built response for a malformed payload.
pub fn parse_error_response() -> String {
    error_response(None, error_codes::PARSE_ERROR, "Parse error", None)
}

/// Pre-built response for a schema-invalid request.
pub fn invalid_request_response() -> String {
    error_response(None, error_codes::INVALID_REQUEST, "Invalid Request", None)
}

/// Parse and validate a request.
///
/// Three outcomes: `Ok(request)` for a usable request; `Err(response)` with
/// a Parse-Error response for malformed JSON; `Err(response)` with an
/// Invalid-Request response for structurally valid JSON that fails
/// validation (wrong version tag or empty method).
pub fn try_parse_request(raw: &str) -> Result<JsonRpcRequest, String> {
    match parse_request(raw) {
        Ok(request) if request.is_valid() => Ok(request),
        Ok(_) => Err(invalid_request_response()),
        Err(_) => Err(parse_error_response()),
    }
}
