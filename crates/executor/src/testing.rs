//! A scripted executor for tests.
//!
//! [`RecordingExecutor`] never talks to a store. It answers each command
//! from a table of scripted replies (exact command text first, then command
//! name, otherwise nil), evaluates transaction probes against the same
//! table, and records every submission so a test can assert exactly what
//! crossed the executor boundary.
//!
//! ```
//! use std::sync::Arc;
//! use keyspace_executor::testing::RecordingExecutor;
//! use keyspace_executor::{Database, Reply, StringCommands};
//!
//! let exec = Arc::new(RecordingExecutor::new());
//! exec.reply_to("GET", Reply::bulk("v"));
//!
//! let db = Database::new(exec.clone());
//! assert_eq!(db.get("k").unwrap().as_deref(), Some(&b"v"[..]));
//! assert_eq!(exec.commands()[0].to_string(), "GET k");
//! ```

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::debug;

use keyspace_core::{Command, Error, Probe, Reply, Result};

use crate::executor::{CommitVerdict, Executor};

/// One call that reached the executor.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    /// A single command
    Command(Command),
    /// A pipelined batch
    Batch(Vec<Command>),
    /// A conditional commit
    Commit {
        /// Probes in submission order
        probes: Vec<Probe>,
        /// Commands in submission order
        commands: Vec<Command>,
    },
}

#[derive(Default)]
struct Script {
    exact: HashMap<String, Result<Reply>>,
    by_name: HashMap<String, Result<Reply>>,
    fail_commit: Option<Error>,
    fail_batch: Option<Error>,
    log: Vec<Recorded>,
}

impl Script {
    fn answer(&self, command: &Command) -> Result<Reply> {
        if let Some(reply) = self.exact.get(&command.to_string()) {
            return reply.clone();
        }
        if let Some(reply) = self.by_name.get(&command.name().to_ascii_uppercase()) {
            return reply.clone();
        }
        Ok(Reply::Nil)
    }
}

/// Scripted executor recording every submission.
#[derive(Default)]
pub struct RecordingExecutor {
    script: Mutex<Script>,
}

impl RecordingExecutor {
    /// Executor answering nil to everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every command named `name` with `reply`.
    pub fn reply_to(&self, name: &str, reply: Reply) {
        self.script
            .lock()
            .by_name
            .insert(name.to_ascii_uppercase(), Ok(reply));
    }

    /// Answer every command named `name` with `error`.
    pub fn error_for(&self, name: &str, error: Error) {
        self.script
            .lock()
            .by_name
            .insert(name.to_ascii_uppercase(), Err(error));
    }

    /// Answer the command whose display text is exactly `command` (for
    /// example `"GET app:user"`) with `reply`. Takes precedence over
    /// [`reply_to`](Self::reply_to).
    pub fn reply_to_command(&self, command: &str, reply: Reply) {
        self.script.lock().exact.insert(command.to_string(), Ok(reply));
    }

    /// Fail the next conditional commit with `error`.
    pub fn fail_next_commit(&self, error: Error) {
        self.script.lock().fail_commit = Some(error);
    }

    /// Fail the next batch submission with `error`.
    pub fn fail_next_batch(&self, error: Error) {
        self.script.lock().fail_batch = Some(error);
    }

    /// Everything that reached the executor, in order.
    pub fn submissions(&self) -> Vec<Recorded> {
        self.script.lock().log.clone()
    }

    /// Every command that reached the executor, flattened across
    /// submissions. Probes are not included.
    pub fn commands(&self) -> Vec<Command> {
        self.script
            .lock()
            .log
            .iter()
            .flat_map(|r| match r {
                Recorded::Command(c) => vec![c.clone()],
                Recorded::Batch(cs) => cs.clone(),
                Recorded::Commit { commands, .. } => commands.clone(),
            })
            .collect()
    }

    /// Every probe submitted with a commit, in order.
    pub fn probes(&self) -> Vec<Probe> {
        self.script
            .lock()
            .log
            .iter()
            .flat_map(|r| match r {
                Recorded::Commit { probes, .. } => probes.clone(),
                _ => Vec::new(),
            })
            .collect()
    }

    /// Forget recorded submissions; scripted replies are kept.
    pub fn clear(&self) {
        self.script.lock().log.clear();
    }
}

impl Executor for RecordingExecutor {
    fn execute(&self, command: Command) -> Result<Reply> {
        let mut script = self.script.lock();
        let reply = script.answer(&command);
        script.log.push(Recorded::Command(command));
        reply
    }

    fn submit_batch(&self, commands: Vec<Command>) -> Result<Vec<Result<Reply>>> {
        let mut script = self.script.lock();
        let replies = commands.iter().map(|c| script.answer(c)).collect();
        script.log.push(Recorded::Batch(commands));
        match script.fail_batch.take() {
            Some(error) => Err(error),
            None => Ok(replies),
        }
    }

    fn commit(&self, probes: Vec<Probe>, commands: Vec<Command>) -> Result<CommitVerdict> {
        let mut script = self.script.lock();
        let forced = script.fail_commit.take();
        let mut probe_results = Vec::with_capacity(probes.len());
        let mut probe_error = None;
        for probe in &probes {
            let outcome = script
                .answer(probe.command())
                .and_then(|reply| probe.is_satisfied_by(&reply));
            match outcome {
                Ok(held) => probe_results.push(held),
                Err(e) => {
                    probe_error.get_or_insert(e);
                    probe_results.push(false);
                }
            }
        }
        let replies: Vec<Result<Reply>> = commands.iter().map(|c| script.answer(c)).collect();
        script.log.push(Recorded::Commit { probes, commands });

        if let Some(error) = forced.or(probe_error) {
            return Err(error);
        }
        if probe_results.iter().all(|held| *held) {
            debug!(commands = replies.len(), "recorded commit applied");
            Ok(CommitVerdict::committed(probe_results, replies))
        } else {
            debug!("recorded commit aborted by a probe");
            Ok(CommitVerdict::aborted(probe_results))
        }
    }
}
