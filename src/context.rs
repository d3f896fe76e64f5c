//! Per-request cancellation and deadline.
//!
//! A [`RequestContext`] travels with one inbound call. It carries an optional
//! deadline and a cancellation signal shared by every clone of the context.

use std::future::pending;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// Cancellation signal and deadline for a single request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    cancel: watch::Receiver<bool>,
    deadline: Option<Instant>,
}

/// Handle that cancels the context it was created with.
#[derive(Debug)]
pub struct CancelHandle {
    cancel: watch::Sender<bool>,
}

impl CancelHandle {
    /// Cancel the associated context and all of its clones.
    pub fn cancel(&self) {
        // send_replace never fails, even with no receivers left
        self.cancel.send_replace(true);
    }
}

impl RequestContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self {
            cancel: rx,
            deadline: None,
        }
    }

    /// A context that can be cancelled through the returned handle.
    pub fn with_cancel() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        (
            Self {
                cancel: rx,
                deadline: None,
            },
            CancelHandle { cancel: tx },
        )
    }

    /// Set a deadline `timeout` from now.
    ///
    /// An existing earlier deadline is kept.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < candidate => existing,
            _ => candidate,
        });
        self
    }

    /// The deadline, if one was set.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the caller has cancelled.
    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Resolves once the caller cancels. Never resolves otherwise.
    pub async fn cancelled(&self) {
        let mut cancel = self.cancel.clone();
        loop {
            if *cancel.borrow_and_update() {
                return;
            }
            if cancel.changed().await.is_err() {
                // Sender gone without cancelling
                pending::<()>().await;
            }
        }
    }

    /// Resolves when the deadline passes. Never resolves without a deadline.
    pub async fn expired(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => pending::<()>().await,
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::background()
    }
}
