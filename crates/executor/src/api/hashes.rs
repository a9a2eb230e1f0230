//! Hash operations.

use bytes::Bytes;
use keyspace_core::{Arg, Command, CommandKind, RedisKey};

use crate::convert::pairs;
use crate::dispatch::Dispatch;
use crate::types::ScanPage;

/// Commands over hash values.
pub trait HashCommands: Dispatch {
    /// Value of `field`.
    fn hget(&self, key: impl Into<RedisKey>, field: impl Into<Arg>) -> Self::Output<Option<Bytes>> {
        self.send::<Option<Bytes>>(Command::new(CommandKind::HGet).key(key).arg(field))
    }

    /// Set one field; returns `1` if the field is new.
    fn hset(
        &self,
        key: impl Into<RedisKey>,
        field: impl Into<Arg>,
        value: impl Into<Arg>,
    ) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::HSet).key(key).arg(field).arg(value))
    }

    /// Set several fields; returns how many were new.
    fn hset_multiple<F: Into<Arg>, V: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        entries: impl IntoIterator<Item = (F, V)>,
    ) -> Self::Output<u64> {
        let mut cmd = Command::new(CommandKind::HSet).key(key);
        for (f, v) in entries {
            cmd = cmd.arg(f).arg(v);
        }
        self.send::<u64>(cmd)
    }

    /// Set `field` only if absent.
    fn hset_nx(
        &self,
        key: impl Into<RedisKey>,
        field: impl Into<Arg>,
        value: impl Into<Arg>,
    ) -> Self::Output<bool> {
        self.send::<bool>(Command::new(CommandKind::HSetNx).key(key).arg(field).arg(value))
    }

    /// Values of several fields, one entry per field.
    fn hmget<F: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        fields: impl IntoIterator<Item = F>,
    ) -> Self::Output<Vec<Option<Bytes>>> {
        self.send::<Vec<Option<Bytes>>>(Command::new(CommandKind::HMGet).key(key).args(fields))
    }

    /// Legacy multi-field set.
    fn hmset<F: Into<Arg>, V: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        entries: impl IntoIterator<Item = (F, V)>,
    ) -> Self::Output<()> {
        let mut cmd = Command::new(CommandKind::HMSet).key(key);
        for (f, v) in entries {
            cmd = cmd.arg(f).arg(v);
        }
        self.send::<()>(cmd)
    }

    /// Delete fields; returns how many existed.
    fn hdel<F: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        fields: impl IntoIterator<Item = F>,
    ) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::HDel).key(key).args(fields))
    }

    /// Whether `field` exists.
    fn hexists(&self, key: impl Into<RedisKey>, field: impl Into<Arg>) -> Self::Output<bool> {
        self.send::<bool>(Command::new(CommandKind::HExists).key(key).arg(field))
    }

    /// Every field and value.
    fn hgetall(&self, key: impl Into<RedisKey>) -> Self::Output<Vec<(Bytes, Bytes)>> {
        self.send_with(Command::new(CommandKind::HGetAll).key(key), pairs::<Bytes, Bytes>)
    }

    /// Every field name.
    fn hkeys(&self, key: impl Into<RedisKey>) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(Command::new(CommandKind::HKeys).key(key))
    }

    /// Every value.
    fn hvals(&self, key: impl Into<RedisKey>) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(Command::new(CommandKind::HVals).key(key))
    }

    /// Number of fields.
    fn hlen(&self, key: impl Into<RedisKey>) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::HLen).key(key))
    }

    /// Length of a field's value.
    fn hstrlen(&self, key: impl Into<RedisKey>, field: impl Into<Arg>) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::HStrLen).key(key).arg(field))
    }

    /// Increment an integer field.
    fn hincr_by(
        &self,
        key: impl Into<RedisKey>,
        field: impl Into<Arg>,
        delta: i64,
    ) -> Self::Output<i64> {
        self.send::<i64>(Command::new(CommandKind::HIncrBy).key(key).arg(field).arg(delta))
    }

    /// Increment a float field.
    fn hincr_by_float(
        &self,
        key: impl Into<RedisKey>,
        field: impl Into<Arg>,
        delta: f64,
    ) -> Self::Output<f64> {
        self.send::<f64>(
            Command::new(CommandKind::HIncrByFloat)
                .key(key)
                .arg(field)
                .arg(delta),
        )
    }

    /// Random field names; a negative count allows repeats.
    fn hrandfield(&self, key: impl Into<RedisKey>, count: i64) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(Command::new(CommandKind::HRandField).key(key).arg(count))
    }

    /// One page of a field scan; items alternate field and value.
    ///
    /// The pattern matches field names, not keys, so it is never prefixed.
    fn hscan(
        &self,
        key: impl Into<RedisKey>,
        cursor: u64,
        pattern: Option<&str>,
        count: Option<u64>,
    ) -> Self::Output<ScanPage<Bytes>> {
        let mut cmd = Command::new(CommandKind::HScan).key(key).arg(cursor);
        if let Some(pattern) = pattern {
            cmd = cmd.token("MATCH").arg(pattern);
        }
        if let Some(count) = count {
            cmd = cmd.token("COUNT").arg(count);
        }
        self.send::<ScanPage<Bytes>>(cmd)
    }
}

impl<D: Dispatch> HashCommands for D {}
