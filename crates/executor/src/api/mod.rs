//! The typed command surface.
//!
//! One trait per data family. Every method is written once against
//! [`Dispatch`] and has a blanket implementation for every dispatcher, so
//! the same call works synchronously on a [`Database`](crate::Database),
//! as a future on an [`AsyncDatabase`](crate::AsyncDatabase), queued on a
//! [`Batch`](crate::Batch) or [`Transaction`](crate::Transaction), and
//! inside a namespace through [`KeyPrefixed`](crate::KeyPrefixed).
//!
//! | Family | Trait |
//! |--------|-------|
//! | Generic keys | [`KeyCommands`] |
//! | Strings | [`StringCommands`] |
//! | Hashes | [`HashCommands`] |
//! | Lists | [`ListCommands`] |
//! | Sets | [`SetCommands`] |
//! | Sorted sets | [`SortedSetCommands`] |
//! | Streams | [`StreamCommands`] |
//! | HyperLogLog | [`HyperLogLogCommands`] |
//! | Geo | [`GeoCommands`] |
//! | Scripting | [`ScriptingCommands`] |

mod geo;
mod hashes;
mod hyperloglog;
mod keys;
mod lists;
mod scripting;
mod sets;
mod sorted_sets;
mod streams;
mod strings;

pub use geo::GeoCommands;
pub use hashes::HashCommands;
pub use hyperloglog::HyperLogLogCommands;
pub use keys::KeyCommands;
pub use lists::ListCommands;
pub use scripting::ScriptingCommands;
pub use sets::SetCommands;
pub use sorted_sets::SortedSetCommands;
pub use streams::StreamCommands;
pub use strings::StringCommands;

use keyspace_core::{Command, RedisKey};

/// Collect keys so their count can precede them.
pub(crate) fn collect_keys<K: Into<RedisKey>>(keys: impl IntoIterator<Item = K>) -> Vec<RedisKey> {
    keys.into_iter().map(Into::into).collect()
}

/// Append `numkeys key [key ...]`.
pub(crate) fn numkeys(command: Command, keys: Vec<RedisKey>) -> Command {
    command.arg(keys.len()).keys(keys)
}
