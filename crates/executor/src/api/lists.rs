//! List operations.

use bytes::Bytes;
use keyspace_core::{Arg, Command, CommandKind, RedisKey};

use super::{collect_keys, numkeys};
use crate::dispatch::Dispatch;
use crate::types::{InsertPosition, KeyedValue, ListSide};

/// Commands over list values, including blocking pops.
pub trait ListCommands: Dispatch {
    /// Prepend values; returns the new length.
    fn lpush<V: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        values: impl IntoIterator<Item = V>,
    ) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::LPush).key(key).args(values))
    }

    /// Append values; returns the new length.
    fn rpush<V: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        values: impl IntoIterator<Item = V>,
    ) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::RPush).key(key).args(values))
    }

    /// Prepend only if the list exists.
    fn lpushx<V: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        values: impl IntoIterator<Item = V>,
    ) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::LPushX).key(key).args(values))
    }

    /// Append only if the list exists.
    fn rpushx<V: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        values: impl IntoIterator<Item = V>,
    ) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::RPushX).key(key).args(values))
    }

    /// Remove and return the head.
    fn lpop(&self, key: impl Into<RedisKey>) -> Self::Output<Option<Bytes>> {
        self.send::<Option<Bytes>>(Command::new(CommandKind::LPop).key(key))
    }

    /// Remove and return up to `count` head elements.
    fn lpop_count(&self, key: impl Into<RedisKey>, count: u64) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(Command::new(CommandKind::LPop).key(key).arg(count))
    }

    /// Remove and return the tail.
    fn rpop(&self, key: impl Into<RedisKey>) -> Self::Output<Option<Bytes>> {
        self.send::<Option<Bytes>>(Command::new(CommandKind::RPop).key(key))
    }

    /// Remove and return up to `count` tail elements.
    fn rpop_count(&self, key: impl Into<RedisKey>, count: u64) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(Command::new(CommandKind::RPop).key(key).arg(count))
    }

    /// Length of the list.
    fn llen(&self, key: impl Into<RedisKey>) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::LLen).key(key))
    }

    /// Elements between two inclusive indexes.
    fn lrange(&self, key: impl Into<RedisKey>, start: i64, stop: i64) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(Command::new(CommandKind::LRange).key(key).arg(start).arg(stop))
    }

    /// Element at `index`.
    fn lindex(&self, key: impl Into<RedisKey>, index: i64) -> Self::Output<Option<Bytes>> {
        self.send::<Option<Bytes>>(Command::new(CommandKind::LIndex).key(key).arg(index))
    }

    /// Overwrite the element at `index`.
    fn lset(&self, key: impl Into<RedisKey>, index: i64, value: impl Into<Arg>) -> Self::Output<()> {
        self.send::<()>(Command::new(CommandKind::LSet).key(key).arg(index).arg(value))
    }

    /// Insert next to `pivot`; returns the new length, or `-1` without a pivot.
    fn linsert(
        &self,
        key: impl Into<RedisKey>,
        position: InsertPosition,
        pivot: impl Into<Arg>,
        value: impl Into<Arg>,
    ) -> Self::Output<i64> {
        self.send::<i64>(
            Command::new(CommandKind::LInsert)
                .key(key)
                .token(position.token())
                .arg(pivot)
                .arg(value),
        )
    }

    /// Remove occurrences of `value`.
    fn lrem(&self, key: impl Into<RedisKey>, count: i64, value: impl Into<Arg>) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::LRem).key(key).arg(count).arg(value))
    }

    /// Keep only the given inclusive range.
    fn ltrim(&self, key: impl Into<RedisKey>, start: i64, stop: i64) -> Self::Output<()> {
        self.send::<()>(Command::new(CommandKind::LTrim).key(key).arg(start).arg(stop))
    }

    /// Index of the first match.
    fn lpos(&self, key: impl Into<RedisKey>, value: impl Into<Arg>) -> Self::Output<Option<i64>> {
        self.send::<Option<i64>>(Command::new(CommandKind::LPos).key(key).arg(value))
    }

    // =========================================================================
    // Moves between lists
    // =========================================================================

    /// Pop the tail of `source` onto the head of `destination`.
    fn rpoplpush(
        &self,
        source: impl Into<RedisKey>,
        destination: impl Into<RedisKey>,
    ) -> Self::Output<Option<Bytes>> {
        self.send::<Option<Bytes>>(Command::new(CommandKind::RPopLPush).key(source).key(destination))
    }

    /// Move an element between lists.
    fn lmove(
        &self,
        source: impl Into<RedisKey>,
        destination: impl Into<RedisKey>,
        from: ListSide,
        to: ListSide,
    ) -> Self::Output<Option<Bytes>> {
        self.send::<Option<Bytes>>(
            Command::new(CommandKind::LMove)
                .key(source)
                .key(destination)
                .token(from.token())
                .token(to.token()),
        )
    }

    /// Blocking [`lmove`](ListCommands::lmove).
    fn blmove(
        &self,
        source: impl Into<RedisKey>,
        destination: impl Into<RedisKey>,
        from: ListSide,
        to: ListSide,
        timeout_secs: f64,
    ) -> Self::Output<Option<Bytes>> {
        self.send::<Option<Bytes>>(
            Command::new(CommandKind::BLMove)
                .key(source)
                .key(destination)
                .token(from.token())
                .token(to.token())
                .arg(timeout_secs),
        )
    }

    /// Blocking [`rpoplpush`](ListCommands::rpoplpush).
    fn brpoplpush(
        &self,
        source: impl Into<RedisKey>,
        destination: impl Into<RedisKey>,
        timeout_secs: f64,
    ) -> Self::Output<Option<Bytes>> {
        self.send::<Option<Bytes>>(
            Command::new(CommandKind::BRPopLPush)
                .key(source)
                .key(destination)
                .arg(timeout_secs),
        )
    }

    // =========================================================================
    // Multi-key pops
    // =========================================================================

    /// Pop the head of the first non-empty list, waiting up to the timeout.
    ///
    /// The reply names the list it came from; inside a namespace that key is
    /// decoded.
    fn blpop<K: Into<RedisKey>>(
        &self,
        keys: impl IntoIterator<Item = K>,
        timeout_secs: f64,
    ) -> Self::Output<Option<KeyedValue>> {
        self.send::<Option<KeyedValue>>(Command::new(CommandKind::BLPop).keys(keys).arg(timeout_secs))
    }

    /// Pop the tail of the first non-empty list, waiting up to the timeout.
    fn brpop<K: Into<RedisKey>>(
        &self,
        keys: impl IntoIterator<Item = K>,
        timeout_secs: f64,
    ) -> Self::Output<Option<KeyedValue>> {
        self.send::<Option<KeyedValue>>(Command::new(CommandKind::BRPop).keys(keys).arg(timeout_secs))
    }

    /// Pop up to `count` elements from the first non-empty list.
    fn lmpop<K: Into<RedisKey>>(
        &self,
        keys: impl IntoIterator<Item = K>,
        side: ListSide,
        count: Option<u64>,
    ) -> Self::Output<Option<(RedisKey, Vec<Bytes>)>> {
        let mut cmd = numkeys(Command::new(CommandKind::LMPop), collect_keys(keys)).token(side.token());
        if let Some(count) = count {
            cmd = cmd.token("COUNT").arg(count);
        }
        self.send::<Option<(RedisKey, Vec<Bytes>)>>(cmd)
    }

    /// Blocking [`lmpop`](ListCommands::lmpop).
    fn blmpop<K: Into<RedisKey>>(
        &self,
        timeout_secs: f64,
        keys: impl IntoIterator<Item = K>,
        side: ListSide,
        count: Option<u64>,
    ) -> Self::Output<Option<(RedisKey, Vec<Bytes>)>> {
        let cmd = Command::new(CommandKind::BLMPop).arg(timeout_secs);
        let mut cmd = numkeys(cmd, collect_keys(keys)).token(side.token());
        if let Some(count) = count {
            cmd = cmd.token("COUNT").arg(count);
        }
        self.send::<Option<(RedisKey, Vec<Bytes>)>>(cmd)
    }
}

impl<D: Dispatch> ListCommands for D {}
