// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared controller context and per-operation cancellation.
//!
//! [`Context`] is handed to every reconciliation by the `kube` controller runtime.
//! [`OperationContext`] bounds a single reconcile/delete call: it is threaded
//! through the secret read and every PowerDNS request so that a cancelled or
//! timed out operation stops at the next network call.

use crate::config::OperatorConfig;
use crate::reconcilers::actuator::RecordActuator;
use kube::Client;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Shared context passed to the `DNSRecord` controller.
#[derive(Clone)]
pub struct Context {
    /// Kubernetes client for status and finalizer patches
    pub client: Client,

    /// Record actuator performing the PowerDNS side of each operation
    pub actuator: Arc<RecordActuator>,

    /// Operator configuration
    pub config: OperatorConfig,

    /// Root token cancelled on shutdown; each operation gets a child token
    pub shutdown: CancellationToken,
}

impl Context {
    /// Create an [`OperationContext`] bounded by the configured operation timeout.
    #[must_use]
    pub fn operation(&self) -> OperationContext {
        OperationContext::from_token(self.shutdown.child_token())
            .with_timeout(self.config.operation_timeout())
    }
}

/// Why an operation was aborted.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationError {
    #[error("operation cancelled")]
    Cancelled,
    #[error("operation deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation signal plus optional deadline for one operation.
#[derive(Clone, Debug, Default)]
pub struct OperationContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl OperationContext {
    /// An operation that is never cancelled and has no deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing cancellation token.
    #[must_use]
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Set the deadline to `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Set an absolute deadline. An earlier existing deadline wins.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        });
        self
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancel this operation (and every clone of this context).
    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Run `fut` unless the operation is cancelled or its deadline passes first.
    ///
    /// Cancellation is checked before `fut` is polled, so an already cancelled
    /// context never starts the call.
    ///
    /// # Errors
    ///
    /// Returns [`CancellationError`] if the token fires or the deadline elapses
    /// before `fut` completes.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, CancellationError>
    where
        F: Future,
    {
        if self.token.is_cancelled() {
            return Err(CancellationError::Cancelled);
        }

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(CancellationError::Cancelled),
            () = deadline => Err(CancellationError::DeadlineExceeded),
            output = fut => Ok(output),
        }
    }
}
