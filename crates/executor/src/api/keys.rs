//! Generic key operations.

use bytes::Bytes;
use keyspace_core::{Arg, Command, CommandKind, RedisKey};

use crate::dispatch::Dispatch;
use crate::types::{KeyType, ScanPage, SortOptions};

/// Commands that act on keys regardless of their value type.
pub trait KeyCommands: Dispatch {
    // =========================================================================
    // Existence and deletion
    // =========================================================================

    /// Delete keys; returns how many existed.
    fn del<K: Into<RedisKey>>(&self, keys: impl IntoIterator<Item = K>) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::Del).keys(keys))
    }

    /// Delete keys, reclaiming memory in the background.
    fn unlink<K: Into<RedisKey>>(&self, keys: impl IntoIterator<Item = K>) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::Unlink).keys(keys))
    }

    /// Count how many of `keys` exist. A key listed twice counts twice.
    fn exists<K: Into<RedisKey>>(&self, keys: impl IntoIterator<Item = K>) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::Exists).keys(keys))
    }

    /// Update last-access time; returns how many existed.
    fn touch<K: Into<RedisKey>>(&self, keys: impl IntoIterator<Item = K>) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::Touch).keys(keys))
    }

    // =========================================================================
    // Expiration
    // =========================================================================

    /// Set a timeout in seconds. Returns `false` if the key does not exist.
    fn expire(&self, key: impl Into<RedisKey>, seconds: i64) -> Self::Output<bool> {
        self.send::<bool>(Command::new(CommandKind::Expire).key(key).arg(seconds))
    }

    /// Set a timeout in milliseconds.
    fn pexpire(&self, key: impl Into<RedisKey>, millis: i64) -> Self::Output<bool> {
        self.send::<bool>(Command::new(CommandKind::PExpire).key(key).arg(millis))
    }

    /// Expire at a unix time in seconds.
    fn expire_at(&self, key: impl Into<RedisKey>, unix_seconds: i64) -> Self::Output<bool> {
        self.send::<bool>(Command::new(CommandKind::ExpireAt).key(key).arg(unix_seconds))
    }

    /// Expire at a unix time in milliseconds.
    fn pexpire_at(&self, key: impl Into<RedisKey>, unix_millis: i64) -> Self::Output<bool> {
        self.send::<bool>(Command::new(CommandKind::PExpireAt).key(key).arg(unix_millis))
    }

    /// Absolute expiry in seconds; `-1` without expiry, `-2` when missing.
    fn expire_time(&self, key: impl Into<RedisKey>) -> Self::Output<i64> {
        self.send::<i64>(Command::new(CommandKind::ExpireTime).key(key))
    }

    /// Absolute expiry in milliseconds.
    fn pexpire_time(&self, key: impl Into<RedisKey>) -> Self::Output<i64> {
        self.send::<i64>(Command::new(CommandKind::PExpireTime).key(key))
    }

    /// Remove the timeout.
    fn persist(&self, key: impl Into<RedisKey>) -> Self::Output<bool> {
        self.send::<bool>(Command::new(CommandKind::Persist).key(key))
    }

    /// Remaining time to live in seconds; `-1` without expiry, `-2` when missing.
    fn ttl(&self, key: impl Into<RedisKey>) -> Self::Output<i64> {
        self.send::<i64>(Command::new(CommandKind::Ttl).key(key))
    }

    /// Remaining time to live in milliseconds.
    fn pttl(&self, key: impl Into<RedisKey>) -> Self::Output<i64> {
        self.send::<i64>(Command::new(CommandKind::PTtl).key(key))
    }

    // =========================================================================
    // Inspection and movement
    // =========================================================================

    /// Value type stored at `key`.
    fn key_type(&self, key: impl Into<RedisKey>) -> Self::Output<KeyType> {
        self.send::<KeyType>(Command::new(CommandKind::Type).key(key))
    }

    /// Rename `key`, overwriting `new_key`.
    fn rename(&self, key: impl Into<RedisKey>, new_key: impl Into<RedisKey>) -> Self::Output<()> {
        self.send::<()>(Command::new(CommandKind::Rename).key(key).key(new_key))
    }

    /// Rename `key` only if `new_key` does not exist.
    fn rename_nx(
        &self,
        key: impl Into<RedisKey>,
        new_key: impl Into<RedisKey>,
    ) -> Self::Output<bool> {
        self.send::<bool>(Command::new(CommandKind::RenameNx).key(key).key(new_key))
    }

    /// Copy `source` to `destination`.
    fn copy(
        &self,
        source: impl Into<RedisKey>,
        destination: impl Into<RedisKey>,
        replace: bool,
    ) -> Self::Output<bool> {
        self.send::<bool>(
            Command::new(CommandKind::Copy)
                .key(source)
                .key(destination)
                .token_if(replace, "REPLACE"),
        )
    }

    /// Move `key` to another logical database.
    fn move_to_db(&self, key: impl Into<RedisKey>, db: i64) -> Self::Output<bool> {
        self.send::<bool>(Command::new(CommandKind::Move).key(key).arg(db))
    }

    /// Serialized value, or `None` if the key does not exist.
    fn dump(&self, key: impl Into<RedisKey>) -> Self::Output<Option<Bytes>> {
        self.send::<Option<Bytes>>(Command::new(CommandKind::Dump).key(key))
    }

    /// Recreate a key from a [`dump`](KeyCommands::dump) payload.
    fn restore(
        &self,
        key: impl Into<RedisKey>,
        ttl_millis: i64,
        payload: impl Into<Arg>,
        replace: bool,
    ) -> Self::Output<()> {
        self.send::<()>(
            Command::new(CommandKind::Restore)
                .key(key)
                .arg(ttl_millis)
                .arg(payload)
                .token_if(replace, "REPLACE"),
        )
    }

    /// Internal encoding of the value.
    fn object_encoding(&self, key: impl Into<RedisKey>) -> Self::Output<Option<String>> {
        self.send::<Option<String>>(
            Command::new(CommandKind::Object)
                .token("ENCODING")
                .key(key),
        )
    }

    /// Seconds since the key was last accessed.
    fn object_idle_time(&self, key: impl Into<RedisKey>) -> Self::Output<Option<i64>> {
        self.send::<Option<i64>>(
            Command::new(CommandKind::Object)
                .token("IDLETIME")
                .key(key),
        )
    }

    /// Bytes used by the key and its value.
    fn memory_usage(&self, key: impl Into<RedisKey>) -> Self::Output<Option<u64>> {
        self.send::<Option<u64>>(Command::new(CommandKind::Memory).token("USAGE").key(key))
    }

    // =========================================================================
    // Enumeration
    // =========================================================================

    /// Keys matching a glob pattern.
    ///
    /// Inside a namespace the pattern is prefixed and the returned keys are
    /// decoded, so only the namespace's own keys are visible.
    fn keys(&self, pattern: &str) -> Self::Output<Vec<RedisKey>> {
        self.send::<Vec<RedisKey>>(Command::new(CommandKind::Keys).arg(pattern))
    }

    /// One page of an incremental key scan.
    fn scan(
        &self,
        cursor: u64,
        pattern: Option<&str>,
        count: Option<u64>,
    ) -> Self::Output<ScanPage> {
        // Always send MATCH so a namespace can scope the enumeration.
        let mut cmd = Command::new(CommandKind::Scan)
            .arg(cursor)
            .token("MATCH")
            .arg(pattern.unwrap_or("*"));
        if let Some(count) = count {
            cmd = cmd.token("COUNT").arg(count);
        }
        self.send::<ScanPage>(cmd)
    }

    /// A random key from the whole keyspace.
    ///
    /// Not available inside a namespace: the store cannot restrict the pick
    /// to a prefix, so a prefixed facade fails with
    /// [`Error::UnsupportedInNamespace`](keyspace_core::Error::UnsupportedInNamespace).
    fn random_key(&self) -> Self::Output<Option<RedisKey>> {
        self.send::<Option<RedisKey>>(Command::new(CommandKind::RandomKey))
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    /// Sort a list, set or sorted set.
    fn sort(&self, key: impl Into<RedisKey>, options: &SortOptions) -> Self::Output<Vec<Option<Bytes>>> {
        self.send::<Vec<Option<Bytes>>>(Command::new(CommandKind::Sort).key(key).args(options.args()))
    }

    /// Sort and store the result; returns the stored length.
    fn sort_store(
        &self,
        key: impl Into<RedisKey>,
        options: &SortOptions,
        destination: impl Into<RedisKey>,
    ) -> Self::Output<u64> {
        self.send::<u64>(
            Command::new(CommandKind::Sort)
                .key(key)
                .args(options.args())
                .token("STORE")
                .key(destination),
        )
    }

    /// Read-only sort.
    fn sort_ro(&self, key: impl Into<RedisKey>, options: &SortOptions) -> Self::Output<Vec<Option<Bytes>>> {
        self.send::<Vec<Option<Bytes>>>(Command::new(CommandKind::SortRo).key(key).args(options.args()))
    }

    // =========================================================================
    // Connection
    // =========================================================================

    /// Round-trip check.
    fn ping(&self) -> Self::Output<String> {
        self.send::<String>(Command::new(CommandKind::Ping))
    }

    /// Echo a message back.
    fn echo(&self, message: impl Into<Arg>) -> Self::Output<Bytes> {
        self.send::<Bytes>(Command::new(CommandKind::Echo).arg(message))
    }
}

impl<D: Dispatch> KeyCommands for D {}
