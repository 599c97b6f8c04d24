//! JSON-RPC error code taxonomy.
//!
//! Four disjoint bands: the standard JSON-RPC 2.0 codes (plus the reserved
//! server range), host-API operation errors, plugin/bridge errors, and
//! general application errors. Values are wire-visible and fixed; clients
//! match on them, so never renumber.

// ---------------------------------------------------------------------------
// Standard JSON-RPC 2.0 error codes (-32768 to -32000)
// ---------------------------------------------------------------------------

/// Invalid JSON was received by the server.
pub const PARSE_ERROR: i32 = -32700;

/// The JSON sent is not a valid Request object.
pub const INVALID_REQUEST: i32 = -32600;

/// The requested method does not exist or is unavailable.
pub const METHOD_NOT_FOUND: i32 = -32601;

/// Invalid method parameter(s).
pub const INVALID_PARAMS: i32 = -32602;

/// Internal JSON-RPC error.
pub const INTERNAL_ERROR: i32 = -32603;

/// Start of the reserved implementation-defined server error range.
pub const SERVER_ERROR_START: i32 = -32000;

/// End of the reserved server error range.
pub const SERVER_ERROR_END: i32 = -32099;

// ---------------------------------------------------------------------------
// Host API operation errors (-33000 to -33099)
// ---------------------------------------------------------------------------

/// A host API operation failed.
pub const HOST_API_ERROR: i32 = -33000;

/// Command execution exceeded the configured timeout.
pub const COMMAND_EXECUTION_TIMEOUT: i32 = -33001;

/// The current host document could not be obtained.
pub const DOCUMENT_NOT_AVAILABLE: i32 = -33002;

/// A host transaction could not be committed or rolled back.
pub const TRANSACTION_FAILED: i32 = -33003;

/// The requested model element does not exist or has been deleted.
pub const ELEMENT_NOT_FOUND: i32 = -33004;

/// A new model element could not be created.
pub const ELEMENT_CREATION_FAILED: i32 = -33005;

/// An existing model element could not be modified.
pub const ELEMENT_MODIFICATION_FAILED: i32 = -33006;

/// A model element could not be deleted.
pub const ELEMENT_DELETION_FAILED: i32 = -33007;

/// The provided geometry data is invalid or incorrectly formatted.
pub const INVALID_GEOMETRY_DATA: i32 = -33008;

/// The requested model view does not exist.
pub const VIEW_NOT_FOUND: i32 = -33009;

// ---------------------------------------------------------------------------
// Plugin / bridge errors (-33100 to -33199)
// ---------------------------------------------------------------------------

/// A command could not be registered.
pub const COMMAND_REGISTRATION_FAILED: i32 = -33100;

/// The dispatch service could not be started.
pub const SERVICE_STARTUP_FAILED: i32 = -33101;

/// The host event used to reach the host thread could not be created.
pub const EVENT_CREATION_FAILED: i32 = -33102;

/// Signaling or running work on the host thread failed.
pub const EVENT_EXECUTION_FAILED: i32 = -33103;

/// The command was cancelled by the user or the system.
pub const COMMAND_CANCELLED: i32 = -33104;

/// Command parameters could not be parsed or converted.
pub const PARAMETER_PARSING_FAILED: i32 = -33105;

// ---------------------------------------------------------------------------
// General application errors (-33200 to -33299)
// ---------------------------------------------------------------------------

/// The client lacks permission for the requested operation.
pub const UNAUTHORIZED: i32 = -33200;

/// The requested resource is unavailable or does not exist.
pub const RESOURCE_UNAVAILABLE: i32 = -33201;

/// Request processing timed out.
pub const REQUEST_TIMEOUT: i32 = -33202;

/// The session identifier is invalid or has expired.
pub const INVALID_SESSION: i32 = -33203;

/// Service configuration error.
pub const CONFIGURATION_ERROR: i32 = -33204;

/// File or network I/O error.
pub const IO_ERROR: i32 = -33205;

/// Whether `code` falls inside the reserved server error range.
pub fn is_server_error(code: i32) -> bool {
    (SERVER_ERROR_END..=SERVER_ERROR_START).contains(&code)
}

/// The fixed human-readable description for an error code.
///
/// Unknown codes inside the reserved server range describe as a generic
/// server error; everything else unknown describes as an unknown error.
pub fn describe(code: i32) -> &'static str {
    match code {
        PARSE_ERROR => "Invalid JSON was received by the server.",
        INVALID_REQUEST => "The JSON sent is not a valid Request object.",
        METHOD_NOT_FOUND => "The method does not exist / is not available.",
        INVALID_PARAMS => "Invalid method parameter(s).",
        INTERNAL_ERROR => "Internal JSON-RPC error.",

        HOST_API_ERROR => "Host API operation failed.",
        COMMAND_EXECUTION_TIMEOUT => "Command execution timed out.",
        DOCUMENT_NOT_AVAILABLE => "Host document is not available.",
        TRANSACTION_FAILED => "Host transaction failed.",
        ELEMENT_NOT_FOUND => "Model element not found.",
        ELEMENT_CREATION_FAILED => "Failed to create model element.",
        ELEMENT_MODIFICATION_FAILED => "Failed to modify model element.",
        ELEMENT_DELETION_FAILED => "Failed to delete model element.",
        INVALID_GEOMETRY_DATA => "Invalid geometry data.",
        VIEW_NOT_FOUND => "Model view not found.",

        COMMAND_REGISTRATION_FAILED => "Failed to register command.",
        SERVICE_STARTUP_FAILED => "Failed to start service.",
        EVENT_CREATION_FAILED => "Failed to create host event.",
        EVENT_EXECUTION_FAILED => "Host event execution failed.",
        COMMAND_CANCELLED => "Command was cancelled.",
        PARAMETER_PARSING_FAILED => "Failed to parse command parameters.",

        UNAUTHORIZED => "Unauthorized access.",
        RESOURCE_UNAVAILABLE => "Resource is unavailable.",
        REQUEST_TIMEOUT => "Request timed out.",
        INVALID_SESSION => "Invalid session.",
        CONFIGURATION_ERROR => "Configuration error.",
        IO_ERROR => "I/O error.",

        _ if is_server_error(code) => "Server error.",
        _ => "Unknown error.",
    }
}
