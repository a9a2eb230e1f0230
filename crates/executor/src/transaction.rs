//! Conditional, all-or-nothing transactions.
//!
//! A [`Transaction`] accumulates commands and [`Condition`]s. `execute`
//! submits the condition probes and the queued commands to the executor as
//! one atomic unit:
//!
//! - committed: every condition is marked satisfied, every pending result
//!   resolves with its reply in queue order, `execute` returns `Ok(true)`
//! - aborted: every condition is marked unsatisfied, every pending result is
//!   cancelled, `execute` returns `Ok(false)`
//! - executor failure: every pending result fails with the executor's
//!   error, which `execute` also returns
//!
//! There is no partial resolution.

use std::fmt;
use std::future::ready;
use std::sync::Arc;

use keyspace_core::{Command, Condition, Error, Result};
use parking_lot::Mutex;
use tracing::debug;

use crate::batch::Batch;
use crate::dispatch::{Conditional, Connection, Convert, Dispatch, Execute};
use crate::executor::{BoxFuture, CommitVerdict, Executor};
use crate::pending::Pending;
use crate::unit::{InFlight, Submission, Unit, UnitStatus};

/// A condition attached to a transaction, with its post-execution verdict.
#[derive(Debug, Clone)]
pub struct ConditionResult {
    condition: Condition,
    satisfied: Arc<Mutex<Option<bool>>>,
}

impl ConditionResult {
    pub(crate) fn new(condition: Condition) -> Self {
        ConditionResult {
            condition,
            satisfied: Arc::new(Mutex::new(None)),
        }
    }

    /// The condition as it was attached.
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// `None` until the transaction executes; then whether it committed.
    pub fn was_satisfied(&self) -> Option<bool> {
        *self.satisfied.lock()
    }

    pub(crate) fn mark(&self, satisfied: bool) {
        *self.satisfied.lock() = Some(satisfied);
    }

    /// Same verdict cell, reported against a different condition.
    pub(crate) fn relabel(self, condition: Condition) -> Self {
        ConditionResult {
            condition,
            satisfied: self.satisfied,
        }
    }
}

/// Commands and conditions submitted as one atomic unit.
pub struct Transaction {
    unit: Arc<Unit>,
}

impl Transaction {
    pub(crate) fn new(executor: Arc<dyn Executor>) -> Self {
        Transaction {
            unit: Arc::new(Unit::new(executor, "transaction")),
        }
    }

    /// Current lifecycle state.
    pub fn status(&self) -> UnitStatus {
        self.unit.status()
    }

    /// Number of commands queued and not yet submitted.
    pub fn len(&self) -> usize {
        self.unit.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn settle(unit: &Unit, mut submission: Submission, verdict: Result<CommitVerdict>) -> Result<bool> {
    match verdict {
        Ok(verdict) if verdict.committed => {
            // Conditions only count as satisfied once every slot resolved.
            let conditions = std::mem::take(&mut submission.conditions);
            let resolved = submission.resolve_all(verdict.replies);
            for condition in &conditions {
                condition.mark(resolved.is_ok());
            }
            match resolved {
                Ok(()) => {
                    debug!("transaction committed");
                    unit.finish(UnitStatus::Committed);
                    Ok(true)
                }
                Err(e) => {
                    unit.finish(UnitStatus::Aborted);
                    Err(e)
                }
            }
        }
        Ok(verdict) => {
            debug!(probes = ?verdict.probe_results, "transaction aborted by condition");
            submission.mark_conditions(false);
            submission.cancel_all();
            unit.finish(UnitStatus::Aborted);
            Ok(false)
        }
        Err(e) => {
            submission.mark_conditions(false);
            submission.fail_all(&e);
            unit.finish(UnitStatus::Aborted);
            Err(e)
        }
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("status", &self.status())
            .field("queued", &self.len())
            .finish()
    }
}

impl Dispatch for Transaction {
    type Output<T: Send + 'static> = Result<Pending<T>>;

    fn dispatch<T: Send + 'static>(&self, command: Command, convert: Convert<T>) -> Result<Pending<T>> {
        self.unit.queue(command, convert)
    }

    fn fail<T: Send + 'static>(&self, error: Error) -> Result<Pending<T>> {
        Err(error)
    }
}

impl Conditional for Transaction {
    fn add_condition(&self, condition: Condition) -> Result<ConditionResult> {
        self.unit.add_condition(condition)
    }
}

impl Execute for Transaction {
    type Outcome = bool;

    fn execute(&self) -> Result<bool> {
        let mut submission = self.unit.submit()?;
        let probes = submission.probes();
        let commands = std::mem::take(&mut submission.commands);
        let verdict = self.unit.executor().commit(probes, commands);
        settle(&self.unit, submission, verdict)
    }

    fn execute_async(&self) -> BoxFuture<'static, Result<bool>> {
        let mut submission = match self.unit.submit() {
            Ok(s) => s,
            Err(e) => return Box::pin(ready(Err(e))),
        };
        let probes = submission.probes();
        let commands = std::mem::take(&mut submission.commands);
        let fut = self.unit.executor().commit_async(probes, commands);
        let in_flight = InFlight::new(self.unit.clone());
        Box::pin(async move {
            let verdict = fut.await;
            let settled = settle(in_flight.unit(), submission, verdict);
            in_flight.disarm();
            settled
        })
    }
}

impl Connection for Transaction {
    type Batch = Batch;
    type Transaction = Transaction;

    fn create_batch(&self) -> Result<Batch> {
        Err(Error::programming("cannot open a batch inside a transaction"))
    }

    fn create_transaction(&self) -> Result<Transaction> {
        Err(Error::programming("transactions do not nest"))
    }
}
