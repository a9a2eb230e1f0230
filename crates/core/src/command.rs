//! The operation table and queued commands
//!
//! [`CommandKind`] is the instruction set of the facade. Every variant
//! carries, in one table entry, its wire name, the [`Signature`] that says
//! which arguments are keys, and the [`ReplyShape`] that says where keys come
//! back in the reply. Nothing else in the crate knows per-command key
//! positions: the codec walks these tables.
//!
//! [`CommandKind::Custom`] is the generic entry point. Its arguments are
//! classified by runtime type instead: each [`Arg::Key`] is a key, every
//! other argument is opaque, regardless of position.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::key::RedisKey;
use crate::signature::{ArgumentRole, ReplyShape, Roles, Signature, Tail};
use crate::value::Arg;

const K: ArgumentRole = ArgumentRole::Key;
const O: ArgumentRole = ArgumentRole::Opaque;
const SORT_BY: ArgumentRole = ArgumentRole::Pattern(&["nosort"]);
const SORT_GET: ArgumentRole = ArgumentRole::Pattern(&["#"]);

macro_rules! command_table {
    ($( $(#[$doc:meta])* $variant:ident => $name:literal, $sig:expr, $shape:ident; )*) => {
        /// Every operation the facade knows how to virtualize.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum CommandKind {
            $( $(#[$doc])* $variant, )*
            /// Arbitrary command issued through the generic entry point
            Custom(String),
        }

        impl CommandKind {
            /// Wire name of the command.
            pub fn name(&self) -> &str {
                match self {
                    $( CommandKind::$variant => $name, )*
                    CommandKind::Custom(name) => name,
                }
            }

            /// Argument metadata; `None` for [`CommandKind::Custom`].
            pub fn signature(&self) -> Option<&'static Signature> {
                match self {
                    $( CommandKind::$variant => {
                        const SIG: Signature = $sig;
                        Some(&SIG)
                    } )*
                    CommandKind::Custom(_) => None,
                }
            }

            /// Where keys appear in the reply.
            pub fn reply_shape(&self) -> ReplyShape {
                match self {
                    $( CommandKind::$variant => ReplyShape::$shape, )*
                    CommandKind::Custom(_) => ReplyShape::Plain,
                }
            }

            /// Every table-driven kind, in table order.
            pub fn all() -> &'static [CommandKind] {
                static ALL: &[CommandKind] = &[ $( CommandKind::$variant, )* ];
                ALL
            }
        }
    };
}

command_table! {
    // ==================== Generic keys ====================
    /// DEL key [key ...]
    Del => "DEL", Signature::new(&[], Tail::Keys), Plain;
    /// UNLINK key [key ...]
    Unlink => "UNLINK", Signature::new(&[], Tail::Keys), Plain;
    /// EXISTS key [key ...]
    Exists => "EXISTS", Signature::new(&[], Tail::Keys), Plain;
    /// TOUCH key [key ...]
    Touch => "TOUCH", Signature::new(&[], Tail::Keys), Plain;
    /// EXPIRE key seconds [NX|XX|GT|LT]
    Expire => "EXPIRE", Signature::key(), Plain;
    /// PEXPIRE key milliseconds [NX|XX|GT|LT]
    PExpire => "PEXPIRE", Signature::key(), Plain;
    /// EXPIREAT key unix-time-seconds
    ExpireAt => "EXPIREAT", Signature::key(), Plain;
    /// PEXPIREAT key unix-time-milliseconds
    PExpireAt => "PEXPIREAT", Signature::key(), Plain;
    /// EXPIRETIME key
    ExpireTime => "EXPIRETIME", Signature::key(), Plain;
    /// PEXPIRETIME key
    PExpireTime => "PEXPIRETIME", Signature::key(), Plain;
    /// PERSIST key
    Persist => "PERSIST", Signature::key(), Plain;
    /// TTL key
    Ttl => "TTL", Signature::key(), Plain;
    /// PTTL key
    PTtl => "PTTL", Signature::key(), Plain;
    /// TYPE key
    Type => "TYPE", Signature::key(), Plain;
    /// RENAME key newkey
    Rename => "RENAME", Signature::fixed(&[K, K]), Plain;
    /// RENAMENX key newkey
    RenameNx => "RENAMENX", Signature::fixed(&[K, K]), Plain;
    /// COPY source destination [DB db] [REPLACE]
    Copy => "COPY", Signature::fixed(&[K, K]), Plain;
    /// MOVE key db
    Move => "MOVE", Signature::key(), Plain;
    /// DUMP key
    Dump => "DUMP", Signature::key(), Plain;
    /// RESTORE key ttl serialized-value [REPLACE]
    Restore => "RESTORE", Signature::key(), Plain;
    /// OBJECT subcommand key
    Object => "OBJECT", Signature::fixed(&[O, K]), Plain;
    /// MEMORY USAGE key [SAMPLES count]
    Memory => "MEMORY", Signature::fixed(&[O, K]), Plain;
    /// KEYS pattern
    Keys => "KEYS", Signature::key(), Keys;
    /// SCAN cursor [MATCH pattern] [COUNT count] [TYPE type]
    Scan => "SCAN", Signature::new(&[O], Tail::Options(&[("MATCH", K)])), ScanPage;
    /// RANDOMKEY
    RandomKey => "RANDOMKEY", Signature::none(), Unscoped;
    /// SORT key [BY pattern] [LIMIT offset count] [GET pattern ...] [ASC|DESC] [ALPHA] [STORE destination]
    Sort => "SORT", Signature::new(&[K], Tail::Options(&[("BY", SORT_BY), ("GET", SORT_GET), ("STORE", K)])), Plain;
    /// SORT_RO key [BY pattern] [LIMIT offset count] [GET pattern ...] [ASC|DESC] [ALPHA]
    SortRo => "SORT_RO", Signature::new(&[K], Tail::Options(&[("BY", SORT_BY), ("GET", SORT_GET)])), Plain;
    /// PING [message]
    Ping => "PING", Signature::none(), Plain;
    /// ECHO message
    Echo => "ECHO", Signature::none(), Plain;

    // ==================== Strings ====================
    /// GET key
    Get => "GET", Signature::key(), Plain;
    /// SET key value [NX|XX] [GET] [EX|PX|KEEPTTL]
    Set => "SET", Signature::key(), Plain;
    /// SETNX key value
    SetNx => "SETNX", Signature::key(), Plain;
    /// SETEX key seconds value
    SetEx => "SETEX", Signature::key(), Plain;
    /// PSETEX key milliseconds value
    PSetEx => "PSETEX", Signature::key(), Plain;
    /// GETSET key value
    GetSet => "GETSET", Signature::key(), Plain;
    /// GETDEL key
    GetDel => "GETDEL", Signature::key(), Plain;
    /// GETEX key [EX|PX|EXAT|PXAT|PERSIST]
    GetEx => "GETEX", Signature::key(), Plain;
    /// GETRANGE key start end
    GetRange => "GETRANGE", Signature::key(), Plain;
    /// SETRANGE key offset value
    SetRange => "SETRANGE", Signature::key(), Plain;
    /// APPEND key value
    Append => "APPEND", Signature::key(), Plain;
    /// STRLEN key
    StrLen => "STRLEN", Signature::key(), Plain;
    /// INCR key
    Incr => "INCR", Signature::key(), Plain;
    /// INCRBY key increment
    IncrBy => "INCRBY", Signature::key(), Plain;
    /// INCRBYFLOAT key increment
    IncrByFloat => "INCRBYFLOAT", Signature::key(), Plain;
    /// DECR key
    Decr => "DECR", Signature::key(), Plain;
    /// DECRBY key decrement
    DecrBy => "DECRBY", Signature::key(), Plain;
    /// MGET key [key ...]
    MGet => "MGET", Signature::new(&[], Tail::Keys), Plain;
    /// MSET key value [key value ...]
    MSet => "MSET", Signature::new(&[], Tail::Groups(&[K, O])), Plain;
    /// MSETNX key value [key value ...]
    MSetNx => "MSETNX", Signature::new(&[], Tail::Groups(&[K, O])), Plain;
    /// GETBIT key offset
    GetBit => "GETBIT", Signature::key(), Plain;
    /// SETBIT key offset value
    SetBit => "SETBIT", Signature::key(), Plain;
    /// BITCOUNT key [start end [BYTE|BIT]]
    BitCount => "BITCOUNT", Signature::key(), Plain;
    /// BITPOS key bit [start [end [BYTE|BIT]]]
    BitPos => "BITPOS", Signature::key(), Plain;
    /// BITFIELD key [GET|SET|INCRBY ...]
    BitField => "BITFIELD", Signature::key(), Plain;
    /// BITFIELD_RO key [GET encoding offset ...]
    BitFieldRo => "BITFIELD_RO", Signature::key(), Plain;
    /// BITOP operation destkey key [key ...]
    BitOp => "BITOP", Signature::new(&[O, K], Tail::Keys), Plain;
    /// LCS key1 key2 [LEN] [IDX] [MINMATCHLEN len] [WITHMATCHLEN]
    Lcs => "LCS", Signature::fixed(&[K, K]), Plain;

    // ==================== Hashes ====================
    /// HGET key field
    HGet => "HGET", Signature::key(), Plain;
    /// HSET key field value [field value ...]
    HSet => "HSET", Signature::key(), Plain;
    /// HSETNX key field value
    HSetNx => "HSETNX", Signature::key(), Plain;
    /// HMGET key field [field ...]
    HMGet => "HMGET", Signature::key(), Plain;
    /// HMSET key field value [field value ...]
    HMSet => "HMSET", Signature::key(), Plain;
    /// HDEL key field [field ...]
    HDel => "HDEL", Signature::key(), Plain;
    /// HEXISTS key field
    HExists => "HEXISTS", Signature::key(), Plain;
    /// HGETALL key
    HGetAll => "HGETALL", Signature::key(), Plain;
    /// HKEYS key
    HKeys => "HKEYS", Signature::key(), Plain;
    /// HVALS key
    HVals => "HVALS", Signature::key(), Plain;
    /// HLEN key
    HLen => "HLEN", Signature::key(), Plain;
    /// HSTRLEN key field
    HStrLen => "HSTRLEN", Signature::key(), Plain;
    /// HINCRBY key field increment
    HIncrBy => "HINCRBY", Signature::key(), Plain;
    /// HINCRBYFLOAT key field increment
    HIncrByFloat => "HINCRBYFLOAT", Signature::key(), Plain;
    /// HRANDFIELD key [count [WITHVALUES]]
    HRandField => "HRANDFIELD", Signature::key(), Plain;
    /// HSCAN key cursor [MATCH pattern] [COUNT count]; the pattern matches fields
    HScan => "HSCAN", Signature::key(), Plain;

    // ==================== Lists ====================
    /// LPUSH key element [element ...]
    LPush => "LPUSH", Signature::key(), Plain;
    /// RPUSH key element [element ...]
    RPush => "RPUSH", Signature::key(), Plain;
    /// LPUSHX key element [element ...]
    LPushX => "LPUSHX", Signature::key(), Plain;
    /// RPUSHX key element [element ...]
    RPushX => "RPUSHX", Signature::key(), Plain;
    /// LPOP key [count]
    LPop => "LPOP", Signature::key(), Plain;
    /// RPOP key [count]
    RPop => "RPOP", Signature::key(), Plain;
    /// LLEN key
    LLen => "LLEN", Signature::key(), Plain;
    /// LRANGE key start stop
    LRange => "LRANGE", Signature::key(), Plain;
    /// LINDEX key index
    LIndex => "LINDEX", Signature::key(), Plain;
    /// LSET key index element
    LSet => "LSET", Signature::key(), Plain;
    /// LINSERT key BEFORE|AFTER pivot element
    LInsert => "LINSERT", Signature::key(), Plain;
    /// LREM key count element
    LRem => "LREM", Signature::key(), Plain;
    /// LTRIM key start stop
    LTrim => "LTRIM", Signature::key(), Plain;
    /// LPOS key element [RANK rank] [COUNT num] [MAXLEN len]
    LPos => "LPOS", Signature::key(), Plain;
    /// RPOPLPUSH source destination
    RPopLPush => "RPOPLPUSH", Signature::fixed(&[K, K]), Plain;
    /// LMOVE source destination LEFT|RIGHT LEFT|RIGHT
    LMove => "LMOVE", Signature::fixed(&[K, K]), Plain;
    /// BLMOVE source destination LEFT|RIGHT LEFT|RIGHT timeout
    BLMove => "BLMOVE", Signature::fixed(&[K, K]), Plain;
    /// BRPOPLPUSH source destination timeout
    BRPopLPush => "BRPOPLPUSH", Signature::fixed(&[K, K]), Plain;
    /// BLPOP key [key ...] timeout
    BLPop => "BLPOP", Signature::new(&[], Tail::KeysExceptLast(1)), KeyedHead;
    /// BRPOP key [key ...] timeout
    BRPop => "BRPOP", Signature::new(&[], Tail::KeysExceptLast(1)), KeyedHead;
    /// LMPOP numkeys key [key ...] LEFT|RIGHT [COUNT count]
    LMPop => "LMPOP", Signature::new(&[], Tail::NumKeys), KeyedHead;
    /// BLMPOP timeout numkeys key [key ...] LEFT|RIGHT [COUNT count]
    BLMPop => "BLMPOP", Signature::new(&[O], Tail::NumKeys), KeyedHead;

    // ==================== Sets ====================
    /// SADD key member [member ...]
    SAdd => "SADD", Signature::key(), Plain;
    /// SREM key member [member ...]
    SRem => "SREM", Signature::key(), Plain;
    /// SMEMBERS key
    SMembers => "SMEMBERS", Signature::key(), Plain;
    /// SISMEMBER key member
    SIsMember => "SISMEMBER", Signature::key(), Plain;
    /// SMISMEMBER key member [member ...]
    SMIsMember => "SMISMEMBER", Signature::key(), Plain;
    /// SCARD key
    SCard => "SCARD", Signature::key(), Plain;
    /// SPOP key [count]
    SPop => "SPOP", Signature::key(), Plain;
    /// SRANDMEMBER key [count]
    SRandMember => "SRANDMEMBER", Signature::key(), Plain;
    /// SSCAN key cursor [MATCH pattern] [COUNT count]; the pattern matches members
    SScan => "SSCAN", Signature::key(), Plain;
    /// SMOVE source destination member
    SMove => "SMOVE", Signature::fixed(&[K, K]), Plain;
    /// SDIFF key [key ...]
    SDiff => "SDIFF", Signature::new(&[], Tail::Keys), Plain;
    /// SDIFFSTORE destination key [key ...]
    SDiffStore => "SDIFFSTORE", Signature::new(&[], Tail::Keys), Plain;
    /// SINTER key [key ...]
    SInter => "SINTER", Signature::new(&[], Tail::Keys), Plain;
    /// SINTERSTORE destination key [key ...]
    SInterStore => "SINTERSTORE", Signature::new(&[], Tail::Keys), Plain;
    /// SINTERCARD numkeys key [key ...] [LIMIT limit]
    SInterCard => "SINTERCARD", Signature::new(&[], Tail::NumKeys), Plain;
    /// SUNION key [key ...]
    SUnion => "SUNION", Signature::new(&[], Tail::Keys), Plain;
    /// SUNIONSTORE destination key [key ...]
    SUnionStore => "SUNIONSTORE", Signature::new(&[], Tail::Keys), Plain;

    // ==================== Sorted sets ====================
    /// ZADD key [NX|XX] [GT|LT] [CH] [INCR] score member [score member ...]
    ZAdd => "ZADD", Signature::key(), Plain;
    /// ZREM key member [member ...]
    ZRem => "ZREM", Signature::key(), Plain;
    /// ZCARD key
    ZCard => "ZCARD", Signature::key(), Plain;
    /// ZCOUNT key min max
    ZCount => "ZCOUNT", Signature::key(), Plain;
    /// ZLEXCOUNT key min max
    ZLexCount => "ZLEXCOUNT", Signature::key(), Plain;
    /// ZSCORE key member
    ZScore => "ZSCORE", Signature::key(), Plain;
    /// ZMSCORE key member [member ...]
    ZMScore => "ZMSCORE", Signature::key(), Plain;
    /// ZINCRBY key increment member
    ZIncrBy => "ZINCRBY", Signature::key(), Plain;
    /// ZRANK key member
    ZRank => "ZRANK", Signature::key(), Plain;
    /// ZREVRANK key member
    ZRevRank => "ZREVRANK", Signature::key(), Plain;
    /// ZRANGE key start stop [BYSCORE|BYLEX] [REV] [LIMIT offset count] [WITHSCORES]
    ZRange => "ZRANGE", Signature::key(), Plain;
    /// ZREVRANGE key start stop [WITHSCORES]
    ZRevRange => "ZREVRANGE", Signature::key(), Plain;
    /// ZRANGEBYSCORE key min max [WITHSCORES] [LIMIT offset count]
    ZRangeByScore => "ZRANGEBYSCORE", Signature::key(), Plain;
    /// ZREVRANGEBYSCORE key max min [WITHSCORES] [LIMIT offset count]
    ZRevRangeByScore => "ZREVRANGEBYSCORE", Signature::key(), Plain;
    /// ZRANGEBYLEX key min max [LIMIT offset count]
    ZRangeByLex => "ZRANGEBYLEX", Signature::key(), Plain;
    /// ZREVRANGEBYLEX key max min [LIMIT offset count]
    ZRevRangeByLex => "ZREVRANGEBYLEX", Signature::key(), Plain;
    /// ZRANGESTORE dst src min max [BYSCORE|BYLEX] [REV] [LIMIT offset count]
    ZRangeStore => "ZRANGESTORE", Signature::fixed(&[K, K]), Plain;
    /// ZREMRANGEBYRANK key start stop
    ZRemRangeByRank => "ZREMRANGEBYRANK", Signature::key(), Plain;
    /// ZREMRANGEBYSCORE key min max
    ZRemRangeByScore => "ZREMRANGEBYSCORE", Signature::key(), Plain;
    /// ZREMRANGEBYLEX key min max
    ZRemRangeByLex => "ZREMRANGEBYLEX", Signature::key(), Plain;
    /// ZPOPMIN key [count]
    ZPopMin => "ZPOPMIN", Signature::key(), Plain;
    /// ZPOPMAX key [count]
    ZPopMax => "ZPOPMAX", Signature::key(), Plain;
    /// BZPOPMIN key [key ...] timeout
    BZPopMin => "BZPOPMIN", Signature::new(&[], Tail::KeysExceptLast(1)), KeyedHead;
    /// BZPOPMAX key [key ...] timeout
    BZPopMax => "BZPOPMAX", Signature::new(&[], Tail::KeysExceptLast(1)), KeyedHead;
    /// ZMPOP numkeys key [key ...] MIN|MAX [COUNT count]
    ZMPop => "ZMPOP", Signature::new(&[], Tail::NumKeys), KeyedHead;
    /// BZMPOP timeout numkeys key [key ...] MIN|MAX [COUNT count]
    BZMPop => "BZMPOP", Signature::new(&[O], Tail::NumKeys), KeyedHead;
    /// ZRANDMEMBER key [count [WITHSCORES]]
    ZRandMember => "ZRANDMEMBER", Signature::key(), Plain;
    /// ZSCAN key cursor [MATCH pattern] [COUNT count]; the pattern matches members
    ZScan => "ZSCAN", Signature::key(), Plain;
    /// ZUNION numkeys key [key ...] [WEIGHTS ...] [AGGREGATE ...] [WITHSCORES]
    ZUnion => "ZUNION", Signature::new(&[], Tail::NumKeys), Plain;
    /// ZINTER numkeys key [key ...] [WEIGHTS ...] [AGGREGATE ...] [WITHSCORES]
    ZInter => "ZINTER", Signature::new(&[], Tail::NumKeys), Plain;
    /// ZDIFF numkeys key [key ...] [WITHSCORES]
    ZDiff => "ZDIFF", Signature::new(&[], Tail::NumKeys), Plain;
    /// ZINTERCARD numkeys key [key ...] [LIMIT limit]
    ZInterCard => "ZINTERCARD", Signature::new(&[], Tail::NumKeys), Plain;
    /// ZUNIONSTORE destination numkeys key [key ...] [WEIGHTS ...] [AGGREGATE ...]
    ZUnionStore => "ZUNIONSTORE", Signature::new(&[K], Tail::NumKeys), Plain;
    /// ZINTERSTORE destination numkeys key [key ...] [WEIGHTS ...] [AGGREGATE ...]
    ZInterStore => "ZINTERSTORE", Signature::new(&[K], Tail::NumKeys), Plain;
    /// ZDIFFSTORE destination numkeys key [key ...]
    ZDiffStore => "ZDIFFSTORE", Signature::new(&[K], Tail::NumKeys), Plain;

    // ==================== Streams ====================
    /// XADD key [NOMKSTREAM] [MAXLEN|MINID ...] id field value [field value ...]
    XAdd => "XADD", Signature::key(), Plain;
    /// XLEN key
    XLen => "XLEN", Signature::key(), Plain;
    /// XRANGE key start end [COUNT count]
    XRange => "XRANGE", Signature::key(), Plain;
    /// XREVRANGE key end start [COUNT count]
    XRevRange => "XREVRANGE", Signature::key(), Plain;
    /// XDEL key id [id ...]
    XDel => "XDEL", Signature::key(), Plain;
    /// XTRIM key MAXLEN|MINID [=|~] threshold
    XTrim => "XTRIM", Signature::key(), Plain;
    /// XACK key group id [id ...]
    XAck => "XACK", Signature::key(), Plain;
    /// XPENDING key group [[IDLE min-idle-time] start end count [consumer]]
    XPending => "XPENDING", Signature::key(), Plain;
    /// XCLAIM key group consumer min-idle-time id [id ...]
    XClaim => "XCLAIM", Signature::key(), Plain;
    /// XAUTOCLAIM key group consumer min-idle-time start [COUNT count]
    XAutoClaim => "XAUTOCLAIM", Signature::key(), Plain;
    /// XREAD [COUNT count] [BLOCK milliseconds] STREAMS key [key ...] id [id ...]
    XRead => "XREAD", Signature::new(&[], Tail::Streams), KeyedEntries;
    /// XREADGROUP GROUP group consumer [COUNT count] [BLOCK ms] [NOACK] STREAMS key [key ...] id [id ...]
    XReadGroup => "XREADGROUP", Signature::new(&[O, O, O], Tail::Streams), KeyedEntries;
    /// XGROUP CREATE|SETID|DESTROY|CREATECONSUMER|DELCONSUMER key ...
    XGroup => "XGROUP", Signature::fixed(&[O, K]), Plain;
    /// XINFO STREAM|GROUPS|CONSUMERS key ...
    XInfo => "XINFO", Signature::fixed(&[O, K]), Plain;

    // ==================== HyperLogLog ====================
    /// PFADD key [element ...]
    PfAdd => "PFADD", Signature::key(), Plain;
    /// PFCOUNT key [key ...]
    PfCount => "PFCOUNT", Signature::new(&[], Tail::Keys), Plain;
    /// PFMERGE destkey [sourcekey ...]
    PfMerge => "PFMERGE", Signature::new(&[], Tail::Keys), Plain;

    // ==================== Geo ====================
    /// GEOADD key [NX|XX] [CH] longitude latitude member [...]
    GeoAdd => "GEOADD", Signature::key(), Plain;
    /// GEODIST key member1 member2 [unit]
    GeoDist => "GEODIST", Signature::key(), Plain;
    /// GEOHASH key [member ...]
    GeoHash => "GEOHASH", Signature::key(), Plain;
    /// GEOPOS key [member ...]
    GeoPos => "GEOPOS", Signature::key(), Plain;
    /// GEOSEARCH key FROMMEMBER|FROMLONLAT ... BYRADIUS|BYBOX ...
    GeoSearch => "GEOSEARCH", Signature::key(), Plain;
    /// GEOSEARCHSTORE destination source FROMMEMBER|FROMLONLAT ... [STOREDIST]
    GeoSearchStore => "GEOSEARCHSTORE", Signature::fixed(&[K, K]), Plain;
    /// GEORADIUS key longitude latitude radius unit [...] [STORE key] [STOREDIST key]
    GeoRadius => "GEORADIUS", Signature::new(&[K, O, O, O, O], Tail::Options(&[("STORE", K), ("STOREDIST", K)])), Plain;
    /// GEORADIUSBYMEMBER key member radius unit [...] [STORE key] [STOREDIST key]
    GeoRadiusByMember => "GEORADIUSBYMEMBER", Signature::new(&[K, O, O, O], Tail::Options(&[("STORE", K), ("STOREDIST", K)])), Plain;

    // ==================== Scripting ====================
    /// EVAL script numkeys [key ...] [arg ...]
    Eval => "EVAL", Signature::new(&[O], Tail::NumKeys), Plain;
    /// EVALSHA sha1 numkeys [key ...] [arg ...]
    EvalSha => "EVALSHA", Signature::new(&[O], Tail::NumKeys), Plain;
    /// EVAL_RO script numkeys [key ...] [arg ...]
    EvalRo => "EVAL_RO", Signature::new(&[O], Tail::NumKeys), Plain;
    /// EVALSHA_RO sha1 numkeys [key ...] [arg ...]
    EvalShaRo => "EVALSHA_RO", Signature::new(&[O], Tail::NumKeys), Plain;
    /// FCALL function numkeys [key ...] [arg ...]
    FCall => "FCALL", Signature::new(&[O], Tail::NumKeys), Plain;
    /// FCALL_RO function numkeys [key ...] [arg ...]
    FCallRo => "FCALL_RO", Signature::new(&[O], Tail::NumKeys), Plain;
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A command ready for the executor: an operation plus its arguments.
///
/// Built with the chaining helpers:
///
/// ```
/// use keyspace_core::{Command, CommandKind};
///
/// let cmd = Command::new(CommandKind::Set)
///     .key("user:1")
///     .arg("alice")
///     .token("NX");
/// assert_eq!(cmd.to_string(), "SET user:1 alice NX");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    kind: CommandKind,
    args: Vec<Arg>,
}

impl Command {
    /// Command with no arguments yet.
    pub fn new(kind: CommandKind) -> Self {
        Command {
            kind,
            args: Vec::new(),
        }
    }

    /// Generic command whose keys are identified by runtime type.
    pub fn custom(name: impl Into<String>, args: impl IntoIterator<Item = Arg>) -> Self {
        Command {
            kind: CommandKind::Custom(name.into()),
            args: args.into_iter().collect(),
        }
    }

    /// Append a key argument.
    pub fn key(mut self, key: impl Into<RedisKey>) -> Self {
        self.args.push(Arg::Key(key.into()));
        self
    }

    /// Append several key arguments.
    pub fn keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<RedisKey>,
    {
        self.args.extend(keys.into_iter().map(|k| Arg::Key(k.into())));
        self
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append a keyword.
    pub fn token(mut self, word: &'static str) -> Self {
        self.args.push(Arg::token(word));
        self
    }

    /// Append a keyword when `on` is set.
    pub fn token_if(self, on: bool, word: &'static str) -> Self {
        if on {
            self.token(word)
        } else {
            self
        }
    }

    /// Append an optional argument.
    pub fn arg_opt<A: Into<Arg>>(self, arg: Option<A>) -> Self {
        match arg {
            Some(a) => self.arg(a),
            None => self,
        }
    }

    /// The operation.
    pub fn kind(&self) -> &CommandKind {
        &self.kind
    }

    /// Wire name.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Arguments, in wire order.
    pub fn arguments(&self) -> &[Arg] {
        &self.args
    }

    /// Split into kind and arguments.
    pub fn into_parts(self) -> (CommandKind, Vec<Arg>) {
        (self.kind, self.args)
    }

    /// Rebuild from parts.
    pub fn from_parts(kind: CommandKind, args: Vec<Arg>) -> Self {
        Command { kind, args }
    }

    /// Where keys appear in the reply.
    pub fn reply_shape(&self) -> ReplyShape {
        self.kind.reply_shape()
    }

    /// One role per argument.
    ///
    /// Table-driven kinds use their [`Signature`]; custom commands treat
    /// exactly the [`Arg::Key`] elements as keys.
    pub fn classify(&self) -> Result<Roles> {
        match self.kind.signature() {
            Some(sig) => sig.classify(self.kind.name(), &self.args),
            None => Ok(self
                .args
                .iter()
                .map(|a| if a.is_key() { ArgumentRole::Key } else { ArgumentRole::Opaque })
                .collect()),
        }
    }

    /// Arguments in key-bearing positions.
    pub fn key_arguments(&self) -> Result<Vec<&Arg>> {
        let roles = self.classify()?;
        Ok(self
            .args
            .iter()
            .zip(roles.iter())
            .filter(|(_, role)| role.is_key_bearing())
            .map(|(arg, _)| arg)
            .collect())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.name())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_names_are_unique() {
        let mut seen = HashSet::new();
        for kind in CommandKind::all() {
            assert!(seen.insert(kind.name()), "duplicate name {}", kind.name());
        }
        assert!(CommandKind::all().len() >= 150);
    }

    #[test]
    fn test_every_table_entry_has_signature() {
        for kind in CommandKind::all() {
            assert!(kind.signature().is_some(), "{} lacks a signature", kind);
        }
        assert!(CommandKind::Custom("X".into()).signature().is_none());
    }

    #[test]
    fn test_only_randomkey_is_unscoped() {
        let unscoped: Vec<_> = CommandKind::all()
            .iter()
            .filter(|k| k.reply_shape() == ReplyShape::Unscoped)
            .collect();
        assert_eq!(unscoped, vec![&CommandKind::RandomKey]);
    }

    #[test]
    fn test_custom_classification_is_runtime_typed() {
        let cmd = Command::custom(
            "CUSTOM",
            vec![Arg::from("arg1"), Arg::Key(RedisKey::from("arg2"))],
        );
        let roles = cmd.classify().unwrap();
        assert_eq!(roles.as_slice(), &[ArgumentRole::Opaque, ArgumentRole::Key]);
    }

    #[test]
    fn test_typed_classification_is_positional() {
        // A key-typed value in an opaque slot stays opaque.
        let cmd = Command::new(CommandKind::Set)
            .key("k")
            .arg(RedisKey::from("not-a-key"));
        let roles = cmd.classify().unwrap();
        assert_eq!(roles.as_slice(), &[ArgumentRole::Key, ArgumentRole::Opaque]);
    }

    #[test]
    fn test_key_arguments_for_sort() {
        let cmd = Command::new(CommandKind::Sort)
            .key("list")
            .token("BY")
            .arg("weight_*")
            .token("GET")
            .arg("#")
            .token("STORE")
            .key("dst");
        let keys: Vec<String> = cmd
            .key_arguments()
            .unwrap()
            .into_iter()
            .map(|a| a.to_string())
            .collect();
        assert_eq!(keys, vec!["list", "weight_*", "#", "dst"]);
    }

    #[test]
    fn test_display() {
        let cmd = Command::new(CommandKind::Expire).key("k").arg(10i64);
        assert_eq!(cmd.to_string(), "EXPIRE k 10");
    }

    #[test]
    fn test_command_serializes() {
        let cmd = Command::new(CommandKind::Get).key("k");
        let json = serde_json::to_string(&cmd).unwrap();
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, back);
    }
}
