//! JSON-RPC command bridge for driving a single-threaded host application.
//!
//! A network-facing control thread submits JSON-RPC requests; registered
//! commands execute them, hopping onto the host application's single
//! mutation thread through the invocation bridge and wrapping mutations in
//! host transactions.
//!
//! Architecture:
//! - `protocol/`    -- JSON-RPC request/response model, error codes, serializer
//! - `commands/`    -- `Command` trait and the name-keyed registry
//! - `bridge/`      -- cross-thread invocation with bounded waits
//! - `transaction/` -- transactional runner with failure interception
//! - `dispatch/`    -- parse -> lookup -> execute -> respond glue
//! - `config/`      -- timeout and failure-policy configuration
//! - `logging`      -- tracing setup (rolling file + stderr)
//! - `version`      -- host version compatibility checks
//!
//! The host thread itself belongs to the host application: this crate only
//! signals it (through a [`HostScheduler`] implementation the host
//! provides) and waits, bounded by a timeout, for completion. A timed-out
//! wait is abandonment, not cancellation -- the work may still run.

pub mod bridge;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod transaction;
pub mod version;

pub use bridge::{
    EventBridge, HostScheduler, HostWork, Invocation, PendingInvocation, ScheduleError,
    DEFAULT_TIMEOUT_MS,
};
pub use commands::{decode_params, Command, CommandRegistry, CommandResult};
pub use config::{BridgeConfig, ServiceConfig};
pub use dispatch::CommandDispatcher;
pub use error::CommandError;
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};
pub use transaction::{
    FailureKind, FailurePolicy, FailureRecord, FailureResolution, Severity, TransactionHost,
    TransactionOutcome, TransactionRunner, TransactionStatus,
};
pub use version::HostVersion;
