//! Operation status for user-triggered flows
//!
//! Each flow owns one [`StatusStateMachine`]. The status is published over a `watch` channel so a
//! UI can observe it, and an atomic in-flight flag makes a second trigger a no-op while an
//! operation runs.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Idle,
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperationStatus {
    pub kind: StatusKind,
    pub message: String,
}

impl OperationStatus {
    pub fn idle() -> Self {
        Self { kind: StatusKind::Idle, message: String::new() }
    }

    pub fn pending(message: impl Into<String>) -> Self {
        Self { kind: StatusKind::Pending, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: StatusKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: StatusKind::Error, message: message.into() }
    }

    pub fn is_pending(&self) -> bool {
        self.kind == StatusKind::Pending
    }
}

impl Default for OperationStatus {
    fn default() -> Self {
        Self::idle()
    }
}

pub struct StatusStateMachine {
    status: watch::Sender<OperationStatus>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when dropped, whichever way the operation ends.
#[must_use]
pub struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    /// Claim `flag`, or `None` if it is already held.
    pub fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl StatusStateMachine {
    pub fn new() -> Self {
        let (status, _) = watch::channel(OperationStatus::idle());
        Self { status, in_flight: AtomicBool::new(false) }
    }

    pub fn current(&self) -> OperationStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<OperationStatus> {
        self.status.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claim the flow and move to Pending. `None` if an operation is already in flight.
    pub fn try_begin(&self, message: impl Into<String>) -> Option<InFlightGuard<'_>> {
        let guard = InFlightGuard::acquire(&self.in_flight)?;
        self.status.send_replace(OperationStatus::pending(message));
        Some(guard)
    }

    /// Update the Pending message mid-operation.
    pub fn set_pending(&self, message: impl Into<String>) {
        self.status.send_replace(OperationStatus::pending(message));
    }

    pub fn succeed(&self, message: impl Into<String>) {
        self.status.send_replace(OperationStatus::success(message));
    }

    pub fn fail(&self, message: impl Into<String>) {
        self.status.send_replace(OperationStatus::error(message));
    }

    /// Report a validation problem. Ignored while an operation is in flight.
    pub fn reject(&self, message: impl Into<String>) {
        if self.is_busy() {
            return;
        }
        self.status.send_replace(OperationStatus::error(message));
    }

    pub fn reset(&self) {
        if self.is_busy() {
            return;
        }
        self.status.send_replace(OperationStatus::idle());
    }
}

impl Default for StatusStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
