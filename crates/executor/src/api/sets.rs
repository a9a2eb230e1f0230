//! Set operations.

use bytes::Bytes;
use keyspace_core::{Arg, Command, CommandKind, RedisKey};

use super::{collect_keys, numkeys};
use crate::dispatch::Dispatch;
use crate::types::ScanPage;

/// Commands over set values.
pub trait SetCommands: Dispatch {
    /// Add members; returns how many were new.
    fn sadd<M: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        members: impl IntoIterator<Item = M>,
    ) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::SAdd).key(key).args(members))
    }

    /// Remove members; returns how many existed.
    fn srem<M: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        members: impl IntoIterator<Item = M>,
    ) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::SRem).key(key).args(members))
    }

    /// Every member.
    fn smembers(&self, key: impl Into<RedisKey>) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(Command::new(CommandKind::SMembers).key(key))
    }

    /// Whether `member` is in the set.
    fn sismember(&self, key: impl Into<RedisKey>, member: impl Into<Arg>) -> Self::Output<bool> {
        self.send::<bool>(Command::new(CommandKind::SIsMember).key(key).arg(member))
    }

    /// Membership of several members, one flag per member.
    fn smismember<M: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        members: impl IntoIterator<Item = M>,
    ) -> Self::Output<Vec<bool>> {
        self.send::<Vec<bool>>(Command::new(CommandKind::SMIsMember).key(key).args(members))
    }

    /// Number of members.
    fn scard(&self, key: impl Into<RedisKey>) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::SCard).key(key))
    }

    /// Remove and return a random member.
    fn spop(&self, key: impl Into<RedisKey>) -> Self::Output<Option<Bytes>> {
        self.send::<Option<Bytes>>(Command::new(CommandKind::SPop).key(key))
    }

    /// Remove and return up to `count` random members.
    fn spop_count(&self, key: impl Into<RedisKey>, count: u64) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(Command::new(CommandKind::SPop).key(key).arg(count))
    }

    /// Random members; a negative count allows repeats.
    fn srandmember(&self, key: impl Into<RedisKey>, count: i64) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(Command::new(CommandKind::SRandMember).key(key).arg(count))
    }

    /// One page of a member scan. The pattern matches members.
    fn sscan(
        &self,
        key: impl Into<RedisKey>,
        cursor: u64,
        pattern: Option<&str>,
        count: Option<u64>,
    ) -> Self::Output<ScanPage<Bytes>> {
        let mut cmd = Command::new(CommandKind::SScan).key(key).arg(cursor);
        if let Some(pattern) = pattern {
            cmd = cmd.token("MATCH").arg(pattern);
        }
        if let Some(count) = count {
            cmd = cmd.token("COUNT").arg(count);
        }
        self.send::<ScanPage<Bytes>>(cmd)
    }

    /// Move `member` between sets.
    fn smove(
        &self,
        source: impl Into<RedisKey>,
        destination: impl Into<RedisKey>,
        member: impl Into<Arg>,
    ) -> Self::Output<bool> {
        self.send::<bool>(
            Command::new(CommandKind::SMove)
                .key(source)
                .key(destination)
                .arg(member),
        )
    }

    // =========================================================================
    // Set algebra
    // =========================================================================

    /// Members of the first set absent from the others.
    fn sdiff<K: Into<RedisKey>>(&self, keys: impl IntoIterator<Item = K>) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(Command::new(CommandKind::SDiff).keys(keys))
    }

    /// Store [`sdiff`](SetCommands::sdiff); returns the stored size.
    fn sdiffstore<K: Into<RedisKey>>(
        &self,
        destination: impl Into<RedisKey>,
        keys: impl IntoIterator<Item = K>,
    ) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::SDiffStore).key(destination).keys(keys))
    }

    /// Intersection.
    fn sinter<K: Into<RedisKey>>(&self, keys: impl IntoIterator<Item = K>) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(Command::new(CommandKind::SInter).keys(keys))
    }

    /// Store the intersection.
    fn sinterstore<K: Into<RedisKey>>(
        &self,
        destination: impl Into<RedisKey>,
        keys: impl IntoIterator<Item = K>,
    ) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::SInterStore).key(destination).keys(keys))
    }

    /// Size of the intersection, stopping early at `limit`.
    fn sintercard<K: Into<RedisKey>>(
        &self,
        keys: impl IntoIterator<Item = K>,
        limit: Option<u64>,
    ) -> Self::Output<u64> {
        let mut cmd = numkeys(Command::new(CommandKind::SInterCard), collect_keys(keys));
        if let Some(limit) = limit {
            cmd = cmd.token("LIMIT").arg(limit);
        }
        self.send::<u64>(cmd)
    }

    /// Union.
    fn sunion<K: Into<RedisKey>>(&self, keys: impl IntoIterator<Item = K>) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(Command::new(CommandKind::SUnion).keys(keys))
    }

    /// Store the union.
    fn sunionstore<K: Into<RedisKey>>(
        &self,
        destination: impl Into<RedisKey>,
        keys: impl IntoIterator<Item = K>,
    ) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::SUnionStore).key(destination).keys(keys))
    }
}

impl<D: Dispatch> SetCommands for D {}
