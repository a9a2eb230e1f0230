//! # Keyspace Executor
//!
//! A virtualizing command facade for a Redis-style key-value store.
//!
//! This is the only crate users need to import. It provides:
//! - [`Database`] / [`AsyncDatabase`] - the sync and async facades
//! - [`KeyPrefixed`] - confines any facade to a key namespace
//! - [`Batch`] / [`Transaction`] - queued units with [`Pending`] results
//! - [`Condition`] - read-only assertions gating a transaction
//! - [`Executor`] - the collaborator that actually reaches the store
//!
//! ## Quick Start
//!
//! ```text
//! use keyspace_executor::prelude::*;
//!
//! let db = Database::new(executor);
//! let tenant = db.with_key_prefix("tenant-a:")?;
//!
//! // Physically `SET tenant-a:user:1 alice`
//! tenant.set("user:1", "alice")?;
//!
//! // Physically `KEYS tenant-a:user:*`; replies come back as `user:1`
//! let keys = tenant.keys("user:*")?;
//! ```
//!
//! ## Call Styles
//!
//! Every typed command is written once, against [`Dispatch`]:
//!
//! | Facade | `db.get("k")` returns |
//! |--------|------------------------|
//! | [`Database`] | `Result<Option<Bytes>>` |
//! | [`AsyncDatabase`] | `BoxFuture<Result<Option<Bytes>>>` |
//! | [`Batch`], [`Transaction`] | `Result<Pending<Option<Bytes>>>` |
//! | [`KeyPrefixed<D>`] | whatever `D` returns |
//!
//! ## Transactions
//!
//! ```text
//! let tx = tenant.create_transaction()?;
//! tx.add_condition(Condition::key_not_exists("lock"))?;
//! let set = tx.set("lock", "me")?;
//! if tx.execute()? {
//!     set.await?;
//! }
//! ```

#![warn(missing_docs)]

pub mod api;
mod batch;
mod config;
mod convert;
mod database;
mod dispatch;
mod executor;
mod pending;
mod prefixed;
pub mod testing;
mod transaction;
mod types;
mod unit;

// Test modules
#[cfg(test)]
mod tests;

// =============================================================================
// Public API - Everything users need is re-exported here
// =============================================================================

pub use api::{
    GeoCommands, HashCommands, HyperLogLogCommands, KeyCommands, ListCommands,
    ScriptingCommands, SetCommands, SortedSetCommands, StreamCommands, StringCommands,
};
pub use batch::Batch;
pub use config::KeyspaceConfig;
pub use convert::{keyed_pairs, optional_pair, pairs, FromReply};
pub use database::{AsyncDatabase, Database};
pub use dispatch::{Conditional, Connection, Convert, Dispatch, Execute};
pub use executor::{BoxFuture, CommitVerdict, Executor};
pub use pending::{Pending, SlotState};
pub use prefixed::{KeyPrefixed, WithKeyPrefix};
pub use transaction::{ConditionResult, Transaction};
pub use types::*;
pub use unit::UnitStatus;

// Re-export the core types so users don't need keyspace-core directly
pub use keyspace_core::{
    Arg, Bytes, Command, CommandKind, Comparison, Condition, ConditionKind, Error, KeyCodec,
    Measure, Probe, RedisKey, Reply, Result, Target,
};

/// Traits and types for glob import.
pub mod prelude {
    pub use crate::api::{
        GeoCommands, HashCommands, HyperLogLogCommands, KeyCommands, ListCommands,
        ScriptingCommands, SetCommands, SortedSetCommands, StreamCommands, StringCommands,
    };
    pub use crate::{
        AsyncDatabase, Batch, Bytes, Condition, Conditional, Connection, Database, Dispatch,
        Error, Execute, KeyPrefixed, Reply, Result, Transaction, WithKeyPrefix,
    };
}
