//! The Executor - the collaborator that actually talks to the store.
//!
//! This layer never performs I/O. Everything that reaches the store goes
//! through an [`Executor`]: single commands, pipelined batches, and atomic
//! conditional commits. Implementations own connections, retries and
//! protocol framing; the facade only rewrites what it hands over.

use std::future::{ready, Future};
use std::pin::Pin;

use keyspace_core::{Command, Probe, Reply, Result};

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The executor's decision on a conditional commit.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitVerdict {
    /// Whether every condition held and the commands were applied
    pub committed: bool,
    /// Outcome of each probe, in submission order
    pub probe_results: Vec<bool>,
    /// One reply per queued command, in submission order; empty when not
    /// committed
    pub replies: Vec<Result<Reply>>,
}

impl CommitVerdict {
    /// A committed verdict carrying `replies`.
    pub fn committed(probe_results: Vec<bool>, replies: Vec<Result<Reply>>) -> Self {
        CommitVerdict {
            committed: true,
            probe_results,
            replies,
        }
    }

    /// An aborted verdict.
    pub fn aborted(probe_results: Vec<bool>) -> Self {
        CommitVerdict {
            committed: false,
            probe_results,
            replies: Vec::new(),
        }
    }
}

/// Store access used by every facade in this crate.
///
/// # Thread Safety
///
/// Executors are shared behind `Arc<dyn Executor>` by databases, batches and
/// transactions, so implementations must be `Send + Sync`.
///
/// The async forms default to running the blocking form and returning a
/// ready future; executors with a real async transport override them.
pub trait Executor: Send + Sync + 'static {
    /// Run one command.
    fn execute(&self, command: Command) -> Result<Reply>;

    /// Run one command asynchronously.
    fn execute_async(&self, command: Command) -> BoxFuture<'static, Result<Reply>> {
        Box::pin(ready(self.execute(command)))
    }

    /// Run commands as one pipelined batch, without atomicity.
    ///
    /// The outer error is a transport failure; per-command failures are
    /// reported in the returned vector, one entry per command in order.
    fn submit_batch(&self, commands: Vec<Command>) -> Result<Vec<Result<Reply>>>;

    /// Asynchronous form of [`Executor::submit_batch`].
    fn submit_batch_async(
        &self,
        commands: Vec<Command>,
    ) -> BoxFuture<'static, Result<Vec<Result<Reply>>>> {
        Box::pin(ready(self.submit_batch(commands)))
    }

    /// Evaluate every probe and, only if all are satisfied, apply every
    /// command as one atomic unit.
    fn commit(&self, probes: Vec<Probe>, commands: Vec<Command>) -> Result<CommitVerdict>;

    /// Asynchronous form of [`Executor::commit`].
    fn commit_async(
        &self,
        probes: Vec<Probe>,
        commands: Vec<Command>,
    ) -> BoxFuture<'static, Result<CommitVerdict>> {
        Box::pin(ready(self.commit(probes, commands)))
    }
}
