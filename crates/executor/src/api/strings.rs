//! String operations.

use bytes::Bytes;
use keyspace_core::{Arg, Command, CommandKind, RedisKey};

use crate::dispatch::Dispatch;
use crate::types::{Expiry, SetCondition};

/// Commands over string values, counters and bitmaps.
pub trait StringCommands: Dispatch {
    /// Value at `key`, or `None`.
    fn get(&self, key: impl Into<RedisKey>) -> Self::Output<Option<Bytes>> {
        self.send::<Option<Bytes>>(Command::new(CommandKind::Get).key(key))
    }

    /// Unconditionally set `key` to `value`.
    fn set(&self, key: impl Into<RedisKey>, value: impl Into<Arg>) -> Self::Output<()> {
        self.send::<()>(Command::new(CommandKind::Set).key(key).arg(value))
    }

    /// Set with an existence guard and optional expiry.
    ///
    /// Returns `false` when the guard prevented the write.
    fn set_with(
        &self,
        key: impl Into<RedisKey>,
        value: impl Into<Arg>,
        condition: SetCondition,
        expiry: Option<Expiry>,
    ) -> Self::Output<bool> {
        let mut cmd = Command::new(CommandKind::Set).key(key).arg(value);
        if let Some(token) = condition.token() {
            cmd = cmd.token(token);
        }
        if let Some(expiry) = expiry {
            cmd = cmd.args(expiry.args());
        }
        self.send::<bool>(cmd)
    }

    /// Set only if absent.
    fn set_nx(&self, key: impl Into<RedisKey>, value: impl Into<Arg>) -> Self::Output<bool> {
        self.send::<bool>(Command::new(CommandKind::SetNx).key(key).arg(value))
    }

    /// Set with a timeout in seconds.
    fn set_ex(
        &self,
        key: impl Into<RedisKey>,
        seconds: u64,
        value: impl Into<Arg>,
    ) -> Self::Output<()> {
        self.send::<()>(Command::new(CommandKind::SetEx).key(key).arg(seconds).arg(value))
    }

    /// Set with a timeout in milliseconds.
    fn pset_ex(
        &self,
        key: impl Into<RedisKey>,
        millis: u64,
        value: impl Into<Arg>,
    ) -> Self::Output<()> {
        self.send::<()>(Command::new(CommandKind::PSetEx).key(key).arg(millis).arg(value))
    }

    /// Set and return the previous value.
    fn get_set(&self, key: impl Into<RedisKey>, value: impl Into<Arg>) -> Self::Output<Option<Bytes>> {
        self.send::<Option<Bytes>>(Command::new(CommandKind::GetSet).key(key).arg(value))
    }

    /// Get and delete.
    fn get_del(&self, key: impl Into<RedisKey>) -> Self::Output<Option<Bytes>> {
        self.send::<Option<Bytes>>(Command::new(CommandKind::GetDel).key(key))
    }

    /// Get and change the expiry.
    fn get_ex(&self, key: impl Into<RedisKey>, expiry: Expiry) -> Self::Output<Option<Bytes>> {
        self.send::<Option<Bytes>>(Command::new(CommandKind::GetEx).key(key).args(expiry.args()))
    }

    /// Substring by inclusive byte offsets; negative offsets count from the end.
    fn get_range(&self, key: impl Into<RedisKey>, start: i64, end: i64) -> Self::Output<Bytes> {
        self.send::<Bytes>(Command::new(CommandKind::GetRange).key(key).arg(start).arg(end))
    }

    /// Overwrite part of the value; returns the new length.
    fn set_range(
        &self,
        key: impl Into<RedisKey>,
        offset: u64,
        value: impl Into<Arg>,
    ) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::SetRange).key(key).arg(offset).arg(value))
    }

    /// Append; returns the new length.
    fn append(&self, key: impl Into<RedisKey>, value: impl Into<Arg>) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::Append).key(key).arg(value))
    }

    /// Length of the value in bytes.
    fn strlen(&self, key: impl Into<RedisKey>) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::StrLen).key(key))
    }

    // =========================================================================
    // Counters
    // =========================================================================

    /// Increment by one.
    fn incr(&self, key: impl Into<RedisKey>) -> Self::Output<i64> {
        self.send::<i64>(Command::new(CommandKind::Incr).key(key))
    }

    /// Increment by `delta`.
    fn incr_by(&self, key: impl Into<RedisKey>, delta: i64) -> Self::Output<i64> {
        self.send::<i64>(Command::new(CommandKind::IncrBy).key(key).arg(delta))
    }

    /// Increment by a float.
    fn incr_by_float(&self, key: impl Into<RedisKey>, delta: f64) -> Self::Output<f64> {
        self.send::<f64>(Command::new(CommandKind::IncrByFloat).key(key).arg(delta))
    }

    /// Decrement by one.
    fn decr(&self, key: impl Into<RedisKey>) -> Self::Output<i64> {
        self.send::<i64>(Command::new(CommandKind::Decr).key(key))
    }

    /// Decrement by `delta`.
    fn decr_by(&self, key: impl Into<RedisKey>, delta: i64) -> Self::Output<i64> {
        self.send::<i64>(Command::new(CommandKind::DecrBy).key(key).arg(delta))
    }

    // =========================================================================
    // Multi-key
    // =========================================================================

    /// Values of several keys; one entry per key, in order.
    fn mget<K: Into<RedisKey>>(
        &self,
        keys: impl IntoIterator<Item = K>,
    ) -> Self::Output<Vec<Option<Bytes>>> {
        self.send::<Vec<Option<Bytes>>>(Command::new(CommandKind::MGet).keys(keys))
    }

    /// Set several keys at once.
    fn mset<K: Into<RedisKey>, V: Into<Arg>>(
        &self,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Self::Output<()> {
        let mut cmd = Command::new(CommandKind::MSet);
        for (k, v) in pairs {
            cmd = cmd.key(k).arg(v);
        }
        self.send::<()>(cmd)
    }

    /// Set several keys only if none exists.
    fn mset_nx<K: Into<RedisKey>, V: Into<Arg>>(
        &self,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Self::Output<bool> {
        let mut cmd = Command::new(CommandKind::MSetNx);
        for (k, v) in pairs {
            cmd = cmd.key(k).arg(v);
        }
        self.send::<bool>(cmd)
    }

    // =========================================================================
    // Bitmaps
    // =========================================================================

    /// Bit at `offset`.
    fn get_bit(&self, key: impl Into<RedisKey>, offset: u64) -> Self::Output<bool> {
        self.send::<bool>(Command::new(CommandKind::GetBit).key(key).arg(offset))
    }

    /// Set the bit at `offset`; returns the previous bit.
    fn set_bit(&self, key: impl Into<RedisKey>, offset: u64, value: bool) -> Self::Output<bool> {
        self.send::<bool>(
            Command::new(CommandKind::SetBit)
                .key(key)
                .arg(offset)
                .arg(value as i64),
        )
    }

    /// Count set bits, optionally within a byte range.
    fn bit_count(&self, key: impl Into<RedisKey>, range: Option<(i64, i64)>) -> Self::Output<u64> {
        let mut cmd = Command::new(CommandKind::BitCount).key(key);
        if let Some((start, end)) = range {
            cmd = cmd.arg(start).arg(end);
        }
        self.send::<u64>(cmd)
    }

    /// Position of the first bit equal to `bit`.
    fn bit_pos(&self, key: impl Into<RedisKey>, bit: bool) -> Self::Output<i64> {
        self.send::<i64>(Command::new(CommandKind::BitPos).key(key).arg(bit as i64))
    }

    /// Raw `BITFIELD` subcommands.
    fn bit_field<A: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        operations: impl IntoIterator<Item = A>,
    ) -> Self::Output<Vec<Option<i64>>> {
        self.send::<Vec<Option<i64>>>(Command::new(CommandKind::BitField).key(key).args(operations))
    }

    /// Read-only `BITFIELD_RO` subcommands.
    fn bit_field_ro<A: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        operations: impl IntoIterator<Item = A>,
    ) -> Self::Output<Vec<Option<i64>>> {
        self.send::<Vec<Option<i64>>>(Command::new(CommandKind::BitFieldRo).key(key).args(operations))
    }

    /// Bitwise operation (`AND`, `OR`, `XOR`, `NOT`) into `destination`.
    fn bit_op<K: Into<RedisKey>>(
        &self,
        operation: &str,
        destination: impl Into<RedisKey>,
        keys: impl IntoIterator<Item = K>,
    ) -> Self::Output<u64> {
        self.send::<u64>(
            Command::new(CommandKind::BitOp)
                .arg(operation)
                .key(destination)
                .keys(keys),
        )
    }

    /// Longest common subsequence of two string values.
    fn lcs(&self, key1: impl Into<RedisKey>, key2: impl Into<RedisKey>) -> Self::Output<Bytes> {
        self.send::<Bytes>(Command::new(CommandKind::Lcs).key(key1).key(key2))
    }
}

impl<D: Dispatch> StringCommands for D {}
