//! Sorted set operations.

use bytes::Bytes;
use keyspace_core::{Arg, Command, CommandKind, RedisKey};

use super::{collect_keys, numkeys};
use crate::convert::{keyed_pairs, pairs};
use crate::dispatch::Dispatch;
use crate::types::{Aggregate, KeyedMember, LexBound, PopOrder, ScanPage, ScoreBound};

/// Commands over sorted set values.
pub trait SortedSetCommands: Dispatch {
    /// Add or update `(score, member)` pairs; returns how many were new.
    fn zadd<M: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        members: impl IntoIterator<Item = (f64, M)>,
    ) -> Self::Output<u64> {
        let mut cmd = Command::new(CommandKind::ZAdd).key(key);
        for (score, member) in members {
            cmd = cmd.arg(score).arg(member);
        }
        self.send::<u64>(cmd)
    }

    /// Remove members.
    fn zrem<M: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        members: impl IntoIterator<Item = M>,
    ) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::ZRem).key(key).args(members))
    }

    /// Number of members.
    fn zcard(&self, key: impl Into<RedisKey>) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::ZCard).key(key))
    }

    /// Members with scores in range.
    fn zcount(&self, key: impl Into<RedisKey>, min: ScoreBound, max: ScoreBound) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::ZCount).key(key).arg(min).arg(max))
    }

    /// Members in a lex range.
    fn zlexcount(&self, key: impl Into<RedisKey>, min: LexBound, max: LexBound) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::ZLexCount).key(key).arg(min).arg(max))
    }

    /// Score of `member`.
    fn zscore(&self, key: impl Into<RedisKey>, member: impl Into<Arg>) -> Self::Output<Option<f64>> {
        self.send::<Option<f64>>(Command::new(CommandKind::ZScore).key(key).arg(member))
    }

    /// Scores of several members.
    fn zmscore<M: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        members: impl IntoIterator<Item = M>,
    ) -> Self::Output<Vec<Option<f64>>> {
        self.send::<Vec<Option<f64>>>(Command::new(CommandKind::ZMScore).key(key).args(members))
    }

    /// Increment a member's score; returns the new score.
    fn zincrby(
        &self,
        key: impl Into<RedisKey>,
        delta: f64,
        member: impl Into<Arg>,
    ) -> Self::Output<f64> {
        self.send::<f64>(Command::new(CommandKind::ZIncrBy).key(key).arg(delta).arg(member))
    }

    /// Rank by ascending score.
    fn zrank(&self, key: impl Into<RedisKey>, member: impl Into<Arg>) -> Self::Output<Option<u64>> {
        self.send::<Option<u64>>(Command::new(CommandKind::ZRank).key(key).arg(member))
    }

    /// Rank by descending score.
    fn zrevrank(&self, key: impl Into<RedisKey>, member: impl Into<Arg>) -> Self::Output<Option<u64>> {
        self.send::<Option<u64>>(Command::new(CommandKind::ZRevRank).key(key).arg(member))
    }

    // =========================================================================
    // Range reads
    // =========================================================================

    /// Members by rank.
    fn zrange(&self, key: impl Into<RedisKey>, start: i64, stop: i64) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(Command::new(CommandKind::ZRange).key(key).arg(start).arg(stop))
    }

    /// Members and scores by rank.
    fn zrange_with_scores(
        &self,
        key: impl Into<RedisKey>,
        start: i64,
        stop: i64,
    ) -> Self::Output<Vec<(Bytes, f64)>> {
        self.send_with(
            Command::new(CommandKind::ZRange)
                .key(key)
                .arg(start)
                .arg(stop)
                .token("WITHSCORES"),
            pairs::<Bytes, f64>,
        )
    }

    /// Members by descending rank.
    fn zrevrange(&self, key: impl Into<RedisKey>, start: i64, stop: i64) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(Command::new(CommandKind::ZRevRange).key(key).arg(start).arg(stop))
    }

    /// Members by score.
    fn zrangebyscore(
        &self,
        key: impl Into<RedisKey>,
        min: ScoreBound,
        max: ScoreBound,
    ) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(Command::new(CommandKind::ZRangeByScore).key(key).arg(min).arg(max))
    }

    /// Members by descending score.
    fn zrevrangebyscore(
        &self,
        key: impl Into<RedisKey>,
        max: ScoreBound,
        min: ScoreBound,
    ) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(Command::new(CommandKind::ZRevRangeByScore).key(key).arg(max).arg(min))
    }

    /// Members in a lex range.
    fn zrangebylex(
        &self,
        key: impl Into<RedisKey>,
        min: LexBound,
        max: LexBound,
    ) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(Command::new(CommandKind::ZRangeByLex).key(key).arg(min).arg(max))
    }

    /// Members in a lex range, descending.
    fn zrevrangebylex(
        &self,
        key: impl Into<RedisKey>,
        max: LexBound,
        min: LexBound,
    ) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(Command::new(CommandKind::ZRevRangeByLex).key(key).arg(max).arg(min))
    }

    /// Store a rank range of `source` into `destination`.
    fn zrangestore(
        &self,
        destination: impl Into<RedisKey>,
        source: impl Into<RedisKey>,
        start: i64,
        stop: i64,
    ) -> Self::Output<u64> {
        self.send::<u64>(
            Command::new(CommandKind::ZRangeStore)
                .key(destination)
                .key(source)
                .arg(start)
                .arg(stop),
        )
    }

    // =========================================================================
    // Range removal
    // =========================================================================

    /// Remove by rank.
    fn zremrangebyrank(&self, key: impl Into<RedisKey>, start: i64, stop: i64) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::ZRemRangeByRank).key(key).arg(start).arg(stop))
    }

    /// Remove by score.
    fn zremrangebyscore(
        &self,
        key: impl Into<RedisKey>,
        min: ScoreBound,
        max: ScoreBound,
    ) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::ZRemRangeByScore).key(key).arg(min).arg(max))
    }

    /// Remove by lex range.
    fn zremrangebylex(&self, key: impl Into<RedisKey>, min: LexBound, max: LexBound) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::ZRemRangeByLex).key(key).arg(min).arg(max))
    }

    // =========================================================================
    // Pops
    // =========================================================================

    /// Remove and return the lowest-scored members.
    fn zpopmin(&self, key: impl Into<RedisKey>, count: u64) -> Self::Output<Vec<(Bytes, f64)>> {
        self.send_with(
            Command::new(CommandKind::ZPopMin).key(key).arg(count),
            pairs::<Bytes, f64>,
        )
    }

    /// Remove and return the highest-scored members.
    fn zpopmax(&self, key: impl Into<RedisKey>, count: u64) -> Self::Output<Vec<(Bytes, f64)>> {
        self.send_with(
            Command::new(CommandKind::ZPopMax).key(key).arg(count),
            pairs::<Bytes, f64>,
        )
    }

    /// Blocking pop of the lowest-scored member across several sets.
    fn bzpopmin<K: Into<RedisKey>>(
        &self,
        keys: impl IntoIterator<Item = K>,
        timeout_secs: f64,
    ) -> Self::Output<Option<KeyedMember>> {
        self.send::<Option<KeyedMember>>(Command::new(CommandKind::BZPopMin).keys(keys).arg(timeout_secs))
    }

    /// Blocking pop of the highest-scored member across several sets.
    fn bzpopmax<K: Into<RedisKey>>(
        &self,
        keys: impl IntoIterator<Item = K>,
        timeout_secs: f64,
    ) -> Self::Output<Option<KeyedMember>> {
        self.send::<Option<KeyedMember>>(Command::new(CommandKind::BZPopMax).keys(keys).arg(timeout_secs))
    }

    /// Pop from the first non-empty sorted set.
    fn zmpop<K: Into<RedisKey>>(
        &self,
        keys: impl IntoIterator<Item = K>,
        order: PopOrder,
        count: Option<u64>,
    ) -> Self::Output<Option<(RedisKey, Vec<(Bytes, f64)>)>> {
        let mut cmd = numkeys(Command::new(CommandKind::ZMPop), collect_keys(keys)).token(order.token());
        if let Some(count) = count {
            cmd = cmd.token("COUNT").arg(count);
        }
        self.send_with(cmd, keyed_pairs::<RedisKey, Bytes, f64>)
    }

    /// Blocking [`zmpop`](SortedSetCommands::zmpop).
    fn bzmpop<K: Into<RedisKey>>(
        &self,
        timeout_secs: f64,
        keys: impl IntoIterator<Item = K>,
        order: PopOrder,
        count: Option<u64>,
    ) -> Self::Output<Option<(RedisKey, Vec<(Bytes, f64)>)>> {
        let cmd = Command::new(CommandKind::BZMPop).arg(timeout_secs);
        let mut cmd = numkeys(cmd, collect_keys(keys)).token(order.token());
        if let Some(count) = count {
            cmd = cmd.token("COUNT").arg(count);
        }
        self.send_with(cmd, keyed_pairs::<RedisKey, Bytes, f64>)
    }

    /// Random members; a negative count allows repeats.
    fn zrandmember(&self, key: impl Into<RedisKey>, count: i64) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(Command::new(CommandKind::ZRandMember).key(key).arg(count))
    }

    /// One page of a member scan; items alternate member and score.
    fn zscan(
        &self,
        key: impl Into<RedisKey>,
        cursor: u64,
        pattern: Option<&str>,
        count: Option<u64>,
    ) -> Self::Output<ScanPage<Bytes>> {
        let mut cmd = Command::new(CommandKind::ZScan).key(key).arg(cursor);
        if let Some(pattern) = pattern {
            cmd = cmd.token("MATCH").arg(pattern);
        }
        if let Some(count) = count {
            cmd = cmd.token("COUNT").arg(count);
        }
        self.send::<ScanPage<Bytes>>(cmd)
    }

    // =========================================================================
    // Set algebra
    // =========================================================================

    /// Union of several sorted sets.
    fn zunion<K: Into<RedisKey>>(
        &self,
        keys: impl IntoIterator<Item = K>,
        aggregate: Aggregate,
    ) -> Self::Output<Vec<Bytes>> {
        let cmd = numkeys(Command::new(CommandKind::ZUnion), collect_keys(keys));
        self.send::<Vec<Bytes>>(cmd.token("AGGREGATE").token(aggregate.token()))
    }

    /// Intersection of several sorted sets.
    fn zinter<K: Into<RedisKey>>(
        &self,
        keys: impl IntoIterator<Item = K>,
        aggregate: Aggregate,
    ) -> Self::Output<Vec<Bytes>> {
        let cmd = numkeys(Command::new(CommandKind::ZInter), collect_keys(keys));
        self.send::<Vec<Bytes>>(cmd.token("AGGREGATE").token(aggregate.token()))
    }

    /// Members of the first set absent from the others.
    fn zdiff<K: Into<RedisKey>>(&self, keys: impl IntoIterator<Item = K>) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(numkeys(Command::new(CommandKind::ZDiff), collect_keys(keys)))
    }

    /// Size of the intersection, stopping early at `limit`.
    fn zintercard<K: Into<RedisKey>>(
        &self,
        keys: impl IntoIterator<Item = K>,
        limit: Option<u64>,
    ) -> Self::Output<u64> {
        let mut cmd = numkeys(Command::new(CommandKind::ZInterCard), collect_keys(keys));
        if let Some(limit) = limit {
            cmd = cmd.token("LIMIT").arg(limit);
        }
        self.send::<u64>(cmd)
    }

    /// Store a weighted union; returns the stored size.
    fn zunionstore<K: Into<RedisKey>>(
        &self,
        destination: impl Into<RedisKey>,
        keys: impl IntoIterator<Item = K>,
        weights: Option<&[f64]>,
        aggregate: Aggregate,
    ) -> Self::Output<u64> {
        let cmd = Command::new(CommandKind::ZUnionStore).key(destination);
        let mut cmd = numkeys(cmd, collect_keys(keys));
        if let Some(weights) = weights {
            cmd = cmd.token("WEIGHTS").args(weights.iter().copied());
        }
        self.send::<u64>(cmd.token("AGGREGATE").token(aggregate.token()))
    }

    /// Store a weighted intersection.
    fn zinterstore<K: Into<RedisKey>>(
        &self,
        destination: impl Into<RedisKey>,
        keys: impl IntoIterator<Item = K>,
        weights: Option<&[f64]>,
        aggregate: Aggregate,
    ) -> Self::Output<u64> {
        let cmd = Command::new(CommandKind::ZInterStore).key(destination);
        let mut cmd = numkeys(cmd, collect_keys(keys));
        if let Some(weights) = weights {
            cmd = cmd.token("WEIGHTS").args(weights.iter().copied());
        }
        self.send::<u64>(cmd.token("AGGREGATE").token(aggregate.token()))
    }

    /// Store the difference.
    fn zdiffstore<K: Into<RedisKey>>(
        &self,
        destination: impl Into<RedisKey>,
        keys: impl IntoIterator<Item = K>,
    ) -> Self::Output<u64> {
        let cmd = Command::new(CommandKind::ZDiffStore).key(destination);
        self.send::<u64>(numkeys(cmd, collect_keys(keys)))
    }
}

impl<D: Dispatch> SortedSetCommands for D {}
