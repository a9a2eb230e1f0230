//! Stream operations.

use keyspace_core::{Arg, Command, CommandKind, RedisKey, Reply};

use crate::dispatch::Dispatch;
use crate::types::{KeyedStream, StreamEntry};

fn streams_tail<K: Into<RedisKey>, I: Into<Arg>>(
    mut cmd: Command,
    streams: impl IntoIterator<Item = (K, I)>,
) -> Command {
    let (keys, ids): (Vec<RedisKey>, Vec<Arg>) = streams
        .into_iter()
        .map(|(k, id)| (k.into(), id.into()))
        .unzip();
    cmd = cmd.token("STREAMS").keys(keys);
    cmd.args(ids)
}

/// Commands over streams and consumer groups.
pub trait StreamCommands: Dispatch {
    /// Append an entry; `id` is usually `*`. Returns the entry id.
    fn xadd<F: Into<Arg>, V: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        id: &str,
        fields: impl IntoIterator<Item = (F, V)>,
    ) -> Self::Output<String> {
        let mut cmd = Command::new(CommandKind::XAdd).key(key).arg(id);
        for (f, v) in fields {
            cmd = cmd.arg(f).arg(v);
        }
        self.send::<String>(cmd)
    }

    /// Number of entries.
    fn xlen(&self, key: impl Into<RedisKey>) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::XLen).key(key))
    }

    /// Entries between two ids (`-` and `+` for the ends).
    fn xrange(
        &self,
        key: impl Into<RedisKey>,
        start: &str,
        end: &str,
        count: Option<u64>,
    ) -> Self::Output<Vec<StreamEntry>> {
        let mut cmd = Command::new(CommandKind::XRange).key(key).arg(start).arg(end);
        if let Some(count) = count {
            cmd = cmd.token("COUNT").arg(count);
        }
        self.send::<Vec<StreamEntry>>(cmd)
    }

    /// Entries in reverse order.
    fn xrevrange(
        &self,
        key: impl Into<RedisKey>,
        end: &str,
        start: &str,
        count: Option<u64>,
    ) -> Self::Output<Vec<StreamEntry>> {
        let mut cmd = Command::new(CommandKind::XRevRange).key(key).arg(end).arg(start);
        if let Some(count) = count {
            cmd = cmd.token("COUNT").arg(count);
        }
        self.send::<Vec<StreamEntry>>(cmd)
    }

    /// Delete entries by id.
    fn xdel<I: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        ids: impl IntoIterator<Item = I>,
    ) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::XDel).key(key).args(ids))
    }

    /// Trim to at most `max_len` entries; `~` trimming when `approximate`.
    fn xtrim_maxlen(
        &self,
        key: impl Into<RedisKey>,
        max_len: u64,
        approximate: bool,
    ) -> Self::Output<u64> {
        let mark = if approximate { "~" } else { "=" };
        self.send::<u64>(
            Command::new(CommandKind::XTrim)
                .key(key)
                .token("MAXLEN")
                .token(mark)
                .arg(max_len),
        )
    }

    /// Read from several streams after the given ids.
    ///
    /// Each result names its stream; inside a namespace those keys are
    /// decoded. A timeout with `block` yields an empty vector.
    fn xread<K: Into<RedisKey>, I: Into<Arg>>(
        &self,
        streams: impl IntoIterator<Item = (K, I)>,
        count: Option<u64>,
        block_millis: Option<u64>,
    ) -> Self::Output<Vec<KeyedStream>> {
        let mut cmd = Command::new(CommandKind::XRead);
        if let Some(count) = count {
            cmd = cmd.token("COUNT").arg(count);
        }
        if let Some(block) = block_millis {
            cmd = cmd.token("BLOCK").arg(block);
        }
        self.send::<Vec<KeyedStream>>(streams_tail(cmd, streams))
    }

    /// Read as a member of a consumer group.
    fn xreadgroup<K: Into<RedisKey>, I: Into<Arg>>(
        &self,
        group: &str,
        consumer: &str,
        streams: impl IntoIterator<Item = (K, I)>,
        count: Option<u64>,
        block_millis: Option<u64>,
    ) -> Self::Output<Vec<KeyedStream>> {
        let mut cmd = Command::new(CommandKind::XReadGroup)
            .token("GROUP")
            .arg(group)
            .arg(consumer);
        if let Some(count) = count {
            cmd = cmd.token("COUNT").arg(count);
        }
        if let Some(block) = block_millis {
            cmd = cmd.token("BLOCK").arg(block);
        }
        self.send::<Vec<KeyedStream>>(streams_tail(cmd, streams))
    }

    /// Acknowledge processed entries.
    fn xack<I: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        group: &str,
        ids: impl IntoIterator<Item = I>,
    ) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::XAck).key(key).arg(group).args(ids))
    }

    /// Pending-entries summary of a group, as returned by the store.
    fn xpending(&self, key: impl Into<RedisKey>, group: &str) -> Self::Output<Reply> {
        self.send::<Reply>(Command::new(CommandKind::XPending).key(key).arg(group))
    }

    /// Take ownership of idle pending entries.
    fn xclaim<I: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        group: &str,
        consumer: &str,
        min_idle_millis: u64,
        ids: impl IntoIterator<Item = I>,
    ) -> Self::Output<Vec<StreamEntry>> {
        self.send::<Vec<StreamEntry>>(
            Command::new(CommandKind::XClaim)
                .key(key)
                .arg(group)
                .arg(consumer)
                .arg(min_idle_millis)
                .args(ids),
        )
    }

    /// Scan-and-claim idle pending entries.
    fn xautoclaim(
        &self,
        key: impl Into<RedisKey>,
        group: &str,
        consumer: &str,
        min_idle_millis: u64,
        start: &str,
        count: Option<u64>,
    ) -> Self::Output<Reply> {
        let mut cmd = Command::new(CommandKind::XAutoClaim)
            .key(key)
            .arg(group)
            .arg(consumer)
            .arg(min_idle_millis)
            .arg(start);
        if let Some(count) = count {
            cmd = cmd.token("COUNT").arg(count);
        }
        self.send::<Reply>(cmd)
    }

    /// Create a consumer group starting at `id` (`$` for new entries only).
    fn xgroup_create(
        &self,
        key: impl Into<RedisKey>,
        group: &str,
        id: &str,
        mkstream: bool,
    ) -> Self::Output<()> {
        self.send::<()>(
            Command::new(CommandKind::XGroup)
                .token("CREATE")
                .key(key)
                .arg(group)
                .arg(id)
                .token_if(mkstream, "MKSTREAM"),
        )
    }

    /// Destroy a consumer group.
    fn xgroup_destroy(&self, key: impl Into<RedisKey>, group: &str) -> Self::Output<bool> {
        self.send::<bool>(
            Command::new(CommandKind::XGroup)
                .token("DESTROY")
                .key(key)
                .arg(group),
        )
    }

    /// Stream metadata, as returned by the store.
    fn xinfo_stream(&self, key: impl Into<RedisKey>) -> Self::Output<Reply> {
        self.send::<Reply>(Command::new(CommandKind::XInfo).token("STREAM").key(key))
    }
}

impl<D: Dispatch> StreamCommands for D {}
