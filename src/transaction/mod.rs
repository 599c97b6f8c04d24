//! Transactional execution with failure interception.
//!
//! Wraps a unit of work in a host transaction, classifies every failure
//! notification the host raised while it ran, and decides commit or
//! rollback. Runs on the host thread, typically inside work handed over by
//! the [`bridge`](crate::bridge).
//!
//! Outcomes are built fresh for every run; nothing carries over between
//! invocations on a reused runner.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::CommandError;

// ---------------------------------------------------------------------------
// Failure records
// ---------------------------------------------------------------------------

/// Severity of a failure notification raised by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "Warning"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// Stable identifier for a failure kind, used by the ignore-lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FailureKind(String);

impl FailureKind {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FailureKind {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for FailureKind {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One failure notification raised by the host during a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureRecord {
    pub severity: Severity,
    pub kind: FailureKind,
    pub description: String,
}

impl FailureRecord {
    pub fn new(
        severity: Severity,
        kind: impl Into<FailureKind>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            kind: kind.into(),
            description: description.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Final status of one transaction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Committed,
    RolledBack,
}

/// Aggregated result of running one unit of work under the runner.
///
/// Immutable once returned; a new one is built for every run.
#[derive(Debug, Clone)]
pub struct TransactionOutcome {
    pub status: TransactionStatus,
    pub error_count: usize,
    pub warning_count: usize,
    /// Ordered "{severity}: {description}" lines, including suppressed
    /// warnings and auto-resolved errors.
    pub messages: Vec<String>,
    /// Set when the unit of work itself failed: the classified
    /// transaction-failed error wrapping the original cause.
    pub failure: Option<CommandError>,
}

impl TransactionOutcome {
    fn rolled_back_empty() -> Self {
        Self {
            status: TransactionStatus::RolledBack,
            error_count: 0,
            warning_count: 0,
            messages: Vec::new(),
            failure: None,
        }
    }

    pub fn committed(&self) -> bool {
        self.status == TransactionStatus::Committed
    }

    /// The outcome as a command result: committed maps to `Ok`, anything
    /// else to the classified failure (or a generic transaction-failed).
    pub fn into_result(self) -> Result<(), CommandError> {
        if self.committed() {
            return Ok(());
        }
        Err(self.failure.unwrap_or_else(|| {
            CommandError::new(
                crate::protocol::error_codes::TRANSACTION_FAILED,
                "Transaction was rolled back",
            )
        }))
    }
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// How intercepted failures are treated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailurePolicy {
    /// Delete all warnings during preprocessing.
    #[serde(default = "default_true")]
    pub suppress_warnings: bool,
    /// Auto-resolve all errors.
    #[serde(default)]
    pub resolve_errors: bool,
    /// Warning kinds deleted even when `suppress_warnings` is off.
    #[serde(default)]
    pub ignored_warnings: HashSet<FailureKind>,
    /// Error kinds auto-resolved even when `resolve_errors` is off.
    #[serde(default)]
    pub ignored_errors: HashSet<FailureKind>,
}

fn default_true() -> bool {
    true
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self {
            suppress_warnings: true,
            resolve_errors: false,
            ignored_warnings: HashSet::new(),
            ignored_errors: HashSet::new(),
        }
    }
}

impl FailurePolicy {
    /// Add a warning kind to ignore (delete) regardless of
    /// `suppress_warnings`.
    pub fn ignore_warning(mut self, kind: impl Into<FailureKind>) -> Self {
        self.ignored_warnings.insert(kind.into());
        self
    }

    /// Add an error kind to resolve automatically regardless of
    /// `resolve_errors`.
    pub fn ignore_error(mut self, kind: impl Into<FailureKind>) -> Self {
        self.ignored_errors.insert(kind.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Host seam
// ---------------------------------------------------------------------------

/// Instruction sent back to the host for an intercepted failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureResolution {
    /// Delete/suppress the warning instead of surfacing it.
    DeleteWarning,
    /// Resolve the error automatically.
    ResolveError,
}

/// The host's transaction primitives (external collaborator).
///
/// Begin/commit/rollback atomicity is the host's guarantee; failure
/// notifications raised while the work ran are drained at decision time.
pub trait TransactionHost {
    /// Start a named transaction. `false` means it could not start.
    fn begin(&mut self, name: &str) -> bool;

    /// Whether a transaction is started and not yet ended.
    fn is_open(&self) -> bool;

    fn commit(&mut self) -> TransactionStatus;

    fn rollback(&mut self) -> TransactionStatus;

    /// Failure notifications raised since `begin`, in order.
    fn take_failures(&mut self) -> Vec<FailureRecord>;

    /// Apply a resolution decided by the failure policy.
    fn resolve(&mut self, record: &FailureRecord, resolution: FailureResolution);
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Executes units of work inside host transactions under a failure policy.
pub struct TransactionRunner {
    policy: FailurePolicy,
}

impl TransactionRunner {
    pub fn new(policy: FailurePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &FailurePolicy {
        &self.policy
    }

    /// Run `work` inside a transaction named `name` on `host`.
    ///
    /// Must be called on the host thread. Every run builds a fresh outcome.
    pub fn run<H, F>(&self, host: &mut H, name: &str, work: F) -> TransactionOutcome
    where
        H: TransactionHost,
        F: FnOnce(&mut H) -> Result<(), CommandError>,
    {
        if !host.begin(name) {
            warn!(transaction = name, "transaction could not start");
            return TransactionOutcome::rolled_back_empty();
        }

        match work(host) {
            Ok(()) => self.settle(host, name),
            Err(cause) => {
                error!(transaction = name, "transaction work failed: {}", cause);
                if host.is_open() {
                    host.rollback();
                }
                TransactionOutcome {
                    status: TransactionStatus::RolledBack,
                    error_count: 0,
                    warning_count: 0,
                    messages: vec![format!("Exception: {}", cause)],
                    failure: Some(CommandError::transaction_failed(name, &cause)),
                }
            }
        }
    }

    /// Classify intercepted failures and decide commit vs rollback.
    fn settle<H: TransactionHost>(&self, host: &mut H, name: &str) -> TransactionOutcome {
        let records = host.take_failures();
        let mut error_count = 0;
        let mut warning_count = 0;
        let mut messages = Vec::with_capacity(records.len());
        let mut all_errors_ignored = true;

        for record in &records {
            debug!(
                transaction = name,
                severity = %record.severity,
                kind = %record.kind,
                "host failure: {}",
                record.description
            );
            messages.push(format!("{}: {}", record.severity, record.description));

            match record.severity {
                Severity::Warning => {
                    warning_count += 1;
                    if self.policy.suppress_warnings
                        || self.policy.ignored_warnings.contains(&record.kind)
                    {
                        host.resolve(record, FailureResolution::DeleteWarning);
                    }
                }
                Severity::Error => {
                    error_count += 1;
                    if !self.policy.ignored_errors.contains(&record.kind) {
                        all_errors_ignored = false;
                    }
                    if self.policy.resolve_errors
                        || self.policy.ignored_errors.contains(&record.kind)
                    {
                        host.resolve(record, FailureResolution::ResolveError);
                    }
                }
            }
        }

        let must_roll_back = error_count > 0 && !self.policy.resolve_errors && !all_errors_ignored;
        let status = if must_roll_back {
            host.rollback()
        } else {
            host.commit()
        };

        TransactionOutcome {
            status,
            error_count,
            warning_count,
            messages,
            failure: None,
        }
    }
}
