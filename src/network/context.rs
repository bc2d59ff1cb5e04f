//! Call Context
//!
//! Carries the caller's deadline and cancel signal into a query.

use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};

/// Deadline and cancellation carried by a single call
///
/// Clones share the same cancel signal.
#[derive(Debug, Clone)]
pub struct Context {
    /// Absolute deadline, if any
    deadline: Option<Instant>,

    /// Becomes ready (disconnected) once the paired handle cancels
    done: Receiver<()>,
}

/// Cancels every clone of the [`Context`] it was created with
///
/// Dropping the handle also cancels.
#[derive(Debug)]
pub struct CancelHandle {
    _tx: Sender<()>,
}

impl CancelHandle {
    /// Signal cancellation
    pub fn cancel(self) {}
}

impl Context {
    /// A context that is never canceled and has no deadline
    pub fn background() -> Self {
        Self {
            deadline: None,
            done: channel::never(),
        }
    }

    /// A context that expires at `deadline`
    pub fn with_deadline(deadline: Instant) -> Self {
        Self::background().deadline_at(deadline)
    }

    /// A context that expires `timeout` from now
    ///
    /// A timeout too large to represent leaves the context without a deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().timeout(timeout)
    }

    /// A cancelable context and its handle
    pub fn with_cancel() -> (Self, CancelHandle) {
        let (tx, rx) = channel::bounded(0);
        let ctx = Self {
            deadline: None,
            done: rx,
        };
        (ctx, CancelHandle { _tx: tx })
    }

    /// Tighten the deadline; an earlier existing deadline wins
    pub fn deadline_at(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Tighten the deadline to `timeout` from now
    pub fn timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.deadline_at(deadline),
            None => self,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; `Some(ZERO)` once it has passed
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.remaining() == Some(Duration::ZERO)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.done.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Receiver that becomes ready when the context is canceled
    pub fn done(&self) -> &Receiver<()> {
        &self.done
    }

    /// Combine a locally configured bound with the context deadline
    ///
    /// Returns the tighter of the two, or `None` if neither is set.
    pub fn bound(&self, local: Option<Duration>) -> Option<Duration> {
        match (self.remaining(), local) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}
