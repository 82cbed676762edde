//! # Request Context
//!
//! Carries the caller's cancellation signal and deadline through every downstream call.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation token plus an optional deadline for one request.
///
/// Cheap to clone; clones share the same token.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

/// Returned when a request is cancelled or its deadline passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("request cancelled or deadline exceeded")]
pub struct Cancelled;

impl RequestContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::default().deadline(Instant::now() + timeout)
    }

    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// The token that cancels this request.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_done(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Fails fast if the request is already cancelled or past its deadline.
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_done() {
            return Err(Cancelled);
        }
        Ok(())
    }

    /// Runs `fut` until it completes, the token is cancelled, or the deadline passes.
    /// In the latter two cases `fut` is dropped and `Cancelled` is returned.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Cancelled> {
        self.check()?;
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Cancelled),
            _ = deadline => Err(Cancelled),
            output = fut => Ok(output),
        }
    }
}
