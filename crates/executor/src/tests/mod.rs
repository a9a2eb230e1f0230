//! Test modules for the executor crate.

use std::sync::Arc;

use crate::testing::RecordingExecutor;
use crate::{Database, KeyPrefixed, WithKeyPrefix};

pub mod async_surface;
pub mod batch;
pub mod prefixed;

/// A database over a fresh recording executor.
fn recording() -> (Arc<RecordingExecutor>, Database) {
    let exec = Arc::new(RecordingExecutor::new());
    let db = Database::new(exec.clone());
    (exec, db)
}

/// A database confined to `app:` over a fresh recording executor.
fn namespaced() -> (Arc<RecordingExecutor>, KeyPrefixed<Database>) {
    let (exec, db) = recording();
    let tenant = db.with_key_prefix("app:").unwrap();
    (exec, tenant)
}

/// Display text of every command that reached the executor.
fn sent(exec: &RecordingExecutor) -> Vec<String> {
    exec.commands().iter().map(|c| c.to_string()).collect()
}
