//! Pipelined, non-atomic batches.

use std::fmt;
use std::future::ready;
use std::sync::Arc;

use keyspace_core::{Command, Error, Reply, Result};

use crate::dispatch::{Connection, Convert, Dispatch, Execute};
use crate::executor::{BoxFuture, Executor};
use crate::pending::Pending;
use crate::transaction::Transaction;
use crate::unit::{InFlight, Submission, Unit, UnitStatus};

/// Commands queued for one pipelined submission.
///
/// Every command method returns a [`Pending`] immediately. `execute` sends
/// the whole queue in one round and resolves each pending result, in queue
/// order, with its own reply or error. A batch always commits; there are no
/// conditions and no atomicity.
pub struct Batch {
    unit: Arc<Unit>,
}

impl Batch {
    pub(crate) fn new(executor: Arc<dyn Executor>) -> Self {
        Batch {
            unit: Arc::new(Unit::new(executor, "batch")),
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

fn settle(
    unit: &Unit,
    submission: Submission,
    outcome: Result<Vec<Result<Reply>>>,
) -> Result<()> {
    match outcome {
        Ok(replies) => match submission.resolve_all(replies) {
            Ok(()) => {
                unit.finish(UnitStatus::Committed);
                Ok(())
            }
            Err(e) => {
                unit.finish(UnitStatus::Aborted);
                Err(e)
            }
        },
        Err(e) => {
            submission.fail_all(&e);
            unit.finish(UnitStatus::Aborted);
            Err(e)
        }
    }
}

impl fmt::Debug for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Batch")
            .field("status", &self.status())
            .field("queued", &self.len())
            .finish()
    }
}

impl Dispatch for Batch {
    type Output<T: Send + 'static> = Result<Pending<T>>;

    fn dispatch<T: Send + 'static>(&self, command: Command, convert: Convert<T>) -> Result<Pending<T>> {
        self.unit.queue(command, convert)
    }

    fn fail<T: Send + 'static>(&self, error: Error) -> Result<Pending<T>> {
        Err(error)
    }
}

impl Execute for Batch {
    type Outcome = ();

    fn execute(&self) -> Result<()> {
        let mut submission = self.unit.submit()?;
        let commands = std::mem::take(&mut submission.commands);
        let outcome = self.unit.executor().submit_batch(commands);
        settle(&self.unit, submission, outcome)
    }

    fn execute_async(&self) -> BoxFuture<'static, Result<()>> {
        let mut submission = match self.unit.submit() {
            Ok(s) => s,
            Err(e) => return Box::pin(ready(Err(e))),
        };
        let commands = std::mem::take(&mut submission.commands);
        let fut = self.unit.executor().submit_batch_async(commands);
        let in_flight = InFlight::new(self.unit.clone());
        Box::pin(async move {
            let outcome = fut.await;
            let settled = settle(in_flight.unit(), submission, outcome);
            in_flight.disarm();
            settled
        })
    }
}

impl Connection for Batch {
    type Batch = Batch;
    type Transaction = Transaction;

    fn create_batch(&self) -> Result<Batch> {
        Err(Error::programming("batches do not nest"))
    }

    fn create_transaction(&self) -> Result<Transaction> {
        Err(Error::programming("cannot open a transaction inside a batch"))
    }
}
