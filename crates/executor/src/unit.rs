//! Queue discipline shared by batches and transactions.
//!
//! A unit moves through `Building -> Submitted -> {Committed, Aborted}`.
//! Commands and conditions may only be added while `Building`; the first
//! `execute` drains the queue and moves to `Submitted`; settling moves to a
//! terminal state. Queued commands keep their insertion order from queue to
//! executor to slot resolution.

use std::sync::Arc;

use keyspace_core::{Command, Condition, Error, Probe, Reply, Result};
use parking_lot::Mutex;
use tracing::debug;

use crate::dispatch::Convert;
use crate::executor::Executor;
use crate::pending::{Pending, Slot};
use crate::transaction::ConditionResult;

/// Lifecycle of a batch or transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitStatus {
    /// Accepting commands and conditions
    Building,
    /// Handed to the executor
    Submitted,
    /// Applied; every pending result resolved
    Committed,
    /// Not applied; every pending result cancelled or failed
    Aborted,
}

#[derive(Debug)]
struct UnitState {
    status: UnitStatus,
    commands: Vec<Command>,
    slots: Vec<Slot>,
    conditions: Vec<ConditionResult>,
}

/// The drained contents of a unit at submission time.
pub(crate) struct Submission {
    pub(crate) commands: Vec<Command>,
    pub(crate) slots: Vec<Slot>,
    pub(crate) conditions: Vec<ConditionResult>,
}

impl Submission {
    /// Probes for every attached condition, in attachment order.
    pub(crate) fn probes(&self) -> Vec<Probe> {
        self.conditions.iter().map(|c| c.condition().probe()).collect()
    }

    /// Resolve every slot in order with its reply.
    ///
    /// Returns an invariant violation, after failing every slot with it,
    /// when the executor did not return exactly one reply per command.
    pub(crate) fn resolve_all(self, replies: Vec<Result<Reply>>) -> Result<()> {
        if replies.len() != self.slots.len() {
            let err = Error::invariant(format!(
                "executor returned {} replies for {} queued commands",
                replies.len(),
                self.slots.len()
            ));
            self.fail_all(&err);
            return Err(err);
        }
        for (slot, reply) in self.slots.into_iter().zip(replies) {
            slot.resolve(reply);
        }
        Ok(())
    }

    /// Settle every slot with `error`.
    pub(crate) fn fail_all(self, error: &Error) {
        for slot in self.slots {
            slot.resolve(Err(error.clone()));
        }
    }

    /// Cancel every slot.
    pub(crate) fn cancel_all(self) {
        for slot in self.slots {
            slot.cancel();
        }
    }

    /// Record the verdict on every condition.
    pub(crate) fn mark_conditions(&self, satisfied: bool) {
        for condition in &self.conditions {
            condition.mark(satisfied);
        }
    }
}

/// A queue of commands bound to one executor.
pub(crate) struct Unit {
    executor: Arc<dyn Executor>,
    state: Mutex<UnitState>,
    label: &'static str,
}

impl Unit {
    pub(crate) fn new(executor: Arc<dyn Executor>, label: &'static str) -> Self {
        Unit {
            executor,
            state: Mutex::new(UnitState {
                status: UnitStatus::Building,
                commands: Vec::new(),
                slots: Vec::new(),
                conditions: Vec::new(),
            }),
            label,
        }
    }

    pub(crate) fn executor(&self) -> &Arc<dyn Executor> {
        &self.executor
    }

    pub(crate) fn status(&self) -> UnitStatus {
        self.state.lock().status
    }

    pub(crate) fn len(&self) -> usize {
        self.state.lock().commands.len()
    }

    fn ensure_building(&self, state: &UnitState, action: &str) -> Result<()> {
        match state.status {
            UnitStatus::Building => Ok(()),
            _ => Err(Error::programming(format!(
                "cannot {} after the {} was executed",
                action, self.label
            ))),
        }
    }

    /// Queue `command` and hand back its pending result.
    pub(crate) fn queue<T: Send + 'static>(
        &self,
        command: Command,
        convert: Convert<T>,
    ) -> Result<Pending<T>> {
        let mut state = self.state.lock();
        self.ensure_building(&state, "queue a command")?;
        let (slot, pending) = Slot::new(convert);
        state.commands.push(command);
        state.slots.push(slot);
        Ok(pending)
    }

    pub(crate) fn add_condition(&self, condition: Condition) -> Result<ConditionResult> {
        let mut state = self.state.lock();
        self.ensure_building(&state, "add a condition")?;
        let result = ConditionResult::new(condition);
        state.conditions.push(result.clone());
        Ok(result)
    }

    /// Drain the queue and move to `Submitted`.
    pub(crate) fn submit(&self) -> Result<Submission> {
        let mut state = self.state.lock();
        if state.status != UnitStatus::Building {
            return Err(Error::programming(format!(
                "{} already executed",
                self.label
            )));
        }
        state.status = UnitStatus::Submitted;
        let submission = Submission {
            commands: std::mem::take(&mut state.commands),
            slots: std::mem::take(&mut state.slots),
            conditions: std::mem::take(&mut state.conditions),
        };
        debug!(
            unit = self.label,
            commands = submission.commands.len(),
            conditions = submission.conditions.len(),
            "submitting"
        );
        Ok(submission)
    }

    pub(crate) fn finish(&self, status: UnitStatus) {
        debug!(unit = self.label, ?status, "settled");
        self.state.lock().status = status;
    }
}

/// Owns a unit while an async submission is in flight.
///
/// If the future carrying it is dropped before settling, the unit is
/// marked `Aborted`; its slots cancel themselves as the submission drops.
pub(crate) struct InFlight {
    unit: Arc<Unit>,
    settled: bool,
}

impl InFlight {
    pub(crate) fn new(unit: Arc<Unit>) -> Self {
        InFlight {
            unit,
            settled: false,
        }
    }

    pub(crate) fn unit(&self) -> &Unit {
        &self.unit
    }

    /// The submission settled normally.
    pub(crate) fn disarm(mut self) {
        self.settled = true;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.settled {
            debug!(unit = self.unit.label, "submission dropped before settling");
            self.unit.finish(UnitStatus::Aborted);
        }
    }
}
