//! Cross-thread invocation bridge.
//!
//! Lets a caller thread hand a unit of work to the host application's
//! single mutation thread and block, bounded by a timeout, until the work
//! completes. Each call gets its own buffered one-shot channel: the work
//! closure runs on the host thread and sends its result into the channel;
//! the caller waits on the receiver with `recv_timeout`.
//!
//! There is no cancellation. A timed-out wait only means the caller stopped
//! waiting -- the host thread may still execute the work afterwards, and
//! its completion send lands in the abandoned channel and is discarded.
//! After a timeout the caller must treat host state as unknown.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::error::CommandError;
use crate::protocol::error_codes;

/// Default bound on a bridge wait, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// A unit of work queued for the host thread.
///
/// Receives exclusive access to the host context while it runs; the host
/// thread is the only place such access exists.
pub type HostWork<C> = Box<dyn FnOnce(&mut C) + Send + 'static>;

/// Scheduling primitive owned by the host application.
///
/// The host guarantees queued work runs exactly once, on its own thread, at
/// the next opportunity it processes pending signals. This crate never
/// creates or manages that thread; it only signals it and waits.
pub trait HostScheduler<C>: Send + Sync {
    /// Queue work for the host thread.
    fn signal(&self, work: HostWork<C>) -> Result<(), ScheduleError>;
}

/// The host scheduler refused or failed to queue a work item.
#[derive(Debug, Clone, Error)]
#[error("host scheduler rejected the work item: {reason}")]
pub struct ScheduleError {
    pub reason: String,
}

impl ScheduleError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Outcome of one bounded bridge wait.
#[derive(Debug)]
pub enum Invocation<T> {
    /// The host thread ran the work; execution failures ride in the result.
    Completed(Result<T, CommandError>),
    /// The wait elapsed first. The work may or may not still run later.
    TimedOut,
}

/// Receiver half of one in-flight invocation.
///
/// Created per call, never reused. Its lifecycle is Idle (created) ->
/// Raised (work signaled to the host) -> Completed (result received);
/// dropping it abandons the invocation without affecting the host side.
pub struct PendingInvocation<T> {
    rx: Receiver<Result<T, CommandError>>,
}

impl<T> PendingInvocation<T> {
    /// Block until the host thread completes the work or `timeout` elapses.
    pub fn wait(self, timeout: Duration) -> Invocation<T> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => Invocation::Completed(result),
            Err(RecvTimeoutError::Timeout) => {
                debug!(timeout_ms = timeout.as_millis() as u64, "bridge wait timed out");
                Invocation::TimedOut
            }
            // The scheduler dropped the work without running it, e.g. the
            // host is shutting down and discarded its queue.
            Err(RecvTimeoutError::Disconnected) => Invocation::Completed(Err(CommandError::new(
                error_codes::EVENT_EXECUTION_FAILED,
                "host discarded the work before it ran",
            ))),
        }
    }
}

/// The bridge: signals the host scheduler and waits for completion.
///
/// Stateless between calls -- every `invoke` creates a fresh
/// [`PendingInvocation`], so concurrent invokes on one bridge are
/// independent. Their host-side bodies never interleave (the host thread is
/// single-threaded), but the pickup order across concurrent callers is the
/// host's choice and must not be assumed stable.
pub struct EventBridge<C> {
    scheduler: Arc<dyn HostScheduler<C>>,
    timeout: Duration,
}

impl<C: 'static> EventBridge<C> {
    /// Bridge with the default 10 s wait bound.
    pub fn new(scheduler: Arc<dyn HostScheduler<C>>) -> Self {
        Self::with_timeout(scheduler, Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }

    pub fn with_timeout(scheduler: Arc<dyn HostScheduler<C>>, timeout: Duration) -> Self {
        Self { scheduler, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Signal the host and return the pending invocation without waiting.
    pub fn raise<T, F>(&self, work: F) -> Result<PendingInvocation<T>, CommandError>
    where
        T: Send + 'static,
        F: FnOnce(&mut C) -> Result<T, CommandError> + Send + 'static,
    {
        // Buffered slot: the host-side send never blocks, and a send into
        // an abandoned (timed-out) channel is discarded.
        let (tx, rx) = mpsc::sync_channel(1);
        let work: HostWork<C> = Box::new(move |ctx| {
            let _ = tx.send(work(ctx));
        });
        self.scheduler
            .signal(work)
            .map_err(|e| CommandError::new(error_codes::EVENT_EXECUTION_FAILED, e.to_string()))?;
        Ok(PendingInvocation { rx })
    }

    /// Signal the host and wait for completion, bounded by this bridge's
    /// timeout.
    pub fn invoke<T, F>(&self, work: F) -> Invocation<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut C) -> Result<T, CommandError> + Send + 'static,
    {
        match self.raise(work) {
            Ok(pending) => pending.wait(self.timeout),
            Err(e) => Invocation::Completed(Err(e)),
        }
    }

    /// `invoke`, with a timeout mapped to the classified timeout failure
    /// for `command_name`. The convenience entry point for command bodies.
    pub fn invoke_for<T, F>(&self, command_name: &str, work: F) -> Result<T, CommandError>
    where
        T: Send + 'static,
        F: FnOnce(&mut C) -> Result<T, CommandError> + Send + 'static,
    {
        match self.invoke(work) {
            Invocation::Completed(result) => result,
            Invocation::TimedOut => Err(CommandError::timeout(command_name)),
        }
    }
}
