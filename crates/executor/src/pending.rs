//! Pending result slots.
//!
//! Queuing a command on a batch or transaction returns a [`Pending<T>`]
//! immediately. The unit keeps the sending half (a `Slot`) and settles it
//! exactly once when it executes:
//!
//! ```text
//! Queued ──resolve──> Resolved   (reply or executor error)
//!    └────cancel────> Cancelled  (transaction aborted, or unit dropped)
//! ```
//!
//! A `Pending<T>` never resolves early: until the unit executes, awaiting it
//! stays pending and [`Pending::result`] reports a programming error.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use keyspace_core::{Error, Reply, Result};
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::dispatch::Convert;

/// Lifecycle of a pending result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Waiting for the unit to execute
    Queued,
    /// Settled with a reply or an executor error
    Resolved,
    /// The unit did not commit; no result will arrive
    Cancelled,
}

type Deliver = Box<dyn FnOnce(Result<Reply>) + Send>;

/// The unit-side half of a pending result.
pub(crate) struct Slot {
    deliver: Option<Deliver>,
    state: Arc<Mutex<SlotState>>,
}

impl Slot {
    /// A new slot and the caller's handle to it.
    pub(crate) fn new<T: Send + 'static>(convert: Convert<T>) -> (Slot, Pending<T>) {
        let (tx, rx) = oneshot::channel::<Result<T>>();
        let state = Arc::new(Mutex::new(SlotState::Queued));
        let deliver: Deliver = Box::new(move |reply: Result<Reply>| {
            // The receiver may already be gone; nothing to report then.
            let _ = tx.send(reply.and_then(convert));
        });
        let slot = Slot {
            deliver: Some(deliver),
            state: state.clone(),
        };
        (
            slot,
            Pending {
                rx,
                state,
                taken: false,
            },
        )
    }

    /// Settle with the command's reply or error.
    pub(crate) fn resolve(mut self, reply: Result<Reply>) {
        if let Some(deliver) = self.deliver.take() {
            *self.state.lock() = SlotState::Resolved;
            deliver(reply);
        }
    }

    /// Settle as cancelled.
    pub(crate) fn cancel(mut self) {
        if let Some(deliver) = self.deliver.take() {
            *self.state.lock() = SlotState::Cancelled;
            deliver(Err(Error::Cancelled));
        }
    }
}

impl Drop for Slot {
    fn drop(&mut self) {
        if self.deliver.take().is_some() {
            *self.state.lock() = SlotState::Cancelled;
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("state", &*self.state.lock())
            .finish()
    }
}

/// Handle to the eventual result of a queued command.
///
/// Await it, or read it without blocking via [`Pending::result`] once the
/// unit has executed.
#[must_use = "a pending result does nothing unless read"]
pub struct Pending<T> {
    rx: oneshot::Receiver<Result<T>>,
    state: Arc<Mutex<SlotState>>,
    taken: bool,
}

impl<T> Pending<T> {
    /// Current slot state.
    pub fn state(&self) -> SlotState {
        *self.state.lock()
    }

    /// Whether the slot was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.state() == SlotState::Cancelled
    }

    /// Read the result without blocking.
    ///
    /// # Errors
    ///
    /// - [`Error::Cancelled`] if the unit did not commit
    /// - [`Error::Programming`] if the unit has not executed yet, or the
    ///   result was already taken
    /// - the command's own error, if it failed
    pub fn result(&mut self) -> Result<T> {
        if self.taken {
            return Err(Error::programming("pending result already taken"));
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.taken = true;
                result
            }
            Err(oneshot::error::TryRecvError::Empty) => Err(Error::programming(
                "pending result is not available until the unit has executed",
            )),
            Err(oneshot::error::TryRecvError::Closed) => {
                self.taken = true;
                Err(Error::Cancelled)
            }
        }
    }
}

impl<T> Future for Pending<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.taken {
            return Poll::Ready(Err(Error::programming("pending result already taken")));
        }
        Pin::new(&mut this.rx).poll(cx).map(|received| {
            this.taken = true;
            received.unwrap_or(Err(Error::Cancelled))
        })
    }
}

impl<T> fmt::Debug for Pending<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending")
            .field("state", &self.state())
            .finish()
    }
}
