//! Per-call cancellation and deadline context.
//!
//! Every gallery operation takes a [`CallContext`]. Capability implementations
//! (HTTP-backed services, cache backends) wrap their blocking I/O in
//! [`CallContext::run`] so a cancelled token or an elapsed deadline surfaces as
//! [`BridgeError::Cancelled`] / [`BridgeError::DeadlineExceeded`] from the first
//! call that reaches it. Callers above the capabilities add no timeouts of
//! their own.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{BridgeError, Result};

/// Cancellation token plus an optional deadline, cloned into each call.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context that is never cancelled and has no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context driven by an existing cancellation token.
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            cancellation: token,
            deadline: None,
        }
    }

    /// Set the deadline to `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Set an absolute deadline. An earlier existing deadline wins.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    /// Context sharing this one's deadline whose token is a child of this one's.
    pub fn child(&self) -> Self {
        Self {
            cancellation: self.cancellation.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Fails if the context is already cancelled or past its deadline.
    pub fn check(&self) -> Result<()> {
        if self.cancellation.is_cancelled() {
            return Err(BridgeError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(BridgeError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Drive `fut` to completion unless the context is cancelled or expires first.
    ///
    /// The future is dropped as soon as either happens.
    pub async fn run<F, T, E>(&self, fut: F) -> std::result::Result<T, E>
    where
        F: Future<Output = std::result::Result<T, E>>,
        E: From<BridgeError>,
    {
        self.check()?;

        let deadline = self.deadline;
        let expiry = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(BridgeError::Cancelled.into()),
            _ = expiry => Err(BridgeError::DeadlineExceeded.into()),
            result = fut => result,
        }
    }
}
