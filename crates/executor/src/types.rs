//! Supporting types for command arguments and typed results.
//!
//! Option types render themselves as argument tokens; result types decode
//! themselves from replies via [`FromReply`].

use bytes::Bytes;
use keyspace_core::{Arg, Error, RedisKey, Reply, Result};
use serde::{Deserialize, Serialize};

use crate::convert::{pairs, FromReply};

// =============================================================================
// Argument options
// =============================================================================

/// Existence guard for `SET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SetCondition {
    /// Always write
    #[default]
    Always,
    /// `NX`: only when the key is absent
    IfNotExists,
    /// `XX`: only when the key exists
    IfExists,
}

impl SetCondition {
    pub(crate) fn token(self) -> Option<&'static str> {
        match self {
            SetCondition::Always => None,
            SetCondition::IfNotExists => Some("NX"),
            SetCondition::IfExists => Some("XX"),
        }
    }
}

/// Expiration attached to a write or read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expiry {
    /// `EX seconds`
    Seconds(u64),
    /// `PX milliseconds`
    Milliseconds(u64),
    /// `EXAT unix-seconds`
    AtSeconds(u64),
    /// `PXAT unix-milliseconds`
    AtMilliseconds(u64),
    /// `KEEPTTL` (SET only)
    KeepTtl,
    /// `PERSIST` (GETEX only)
    Persist,
}

impl Expiry {
    pub(crate) fn args(self) -> Vec<Arg> {
        match self {
            Expiry::Seconds(n) => vec![Arg::token("EX"), Arg::from(n)],
            Expiry::Milliseconds(n) => vec![Arg::token("PX"), Arg::from(n)],
            Expiry::AtSeconds(n) => vec![Arg::token("EXAT"), Arg::from(n)],
            Expiry::AtMilliseconds(n) => vec![Arg::token("PXAT"), Arg::from(n)],
            Expiry::KeepTtl => vec![Arg::token("KEEPTTL")],
            Expiry::Persist => vec![Arg::token("PERSIST")],
        }
    }
}

/// End of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListSide {
    /// Head
    Left,
    /// Tail
    Right,
}

impl ListSide {
    pub(crate) fn token(self) -> &'static str {
        match self {
            ListSide::Left => "LEFT",
            ListSide::Right => "RIGHT",
        }
    }
}

/// Where `LINSERT` places the element relative to the pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertPosition {
    /// `BEFORE`
    Before,
    /// `AFTER`
    After,
}

impl InsertPosition {
    pub(crate) fn token(self) -> &'static str {
        match self {
            InsertPosition::Before => "BEFORE",
            InsertPosition::After => "AFTER",
        }
    }
}

/// Score bound for range queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScoreBound {
    /// `score`
    Inclusive(f64),
    /// `(score`
    Exclusive(f64),
    /// `-inf`
    NegInfinity,
    /// `+inf`
    PosInfinity,
}

impl From<ScoreBound> for Arg {
    fn from(bound: ScoreBound) -> Self {
        match bound {
            ScoreBound::Inclusive(s) => Arg::Float(s),
            ScoreBound::Exclusive(s) => Arg::from(format!("({}", Arg::Float(s))),
            ScoreBound::NegInfinity => Arg::token("-inf"),
            ScoreBound::PosInfinity => Arg::token("+inf"),
        }
    }
}

/// Lexicographic bound for range queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LexBound {
    /// `[value`
    Inclusive(Bytes),
    /// `(value`
    Exclusive(Bytes),
    /// `-`
    Min,
    /// `+`
    Max,
}

impl LexBound {
    /// Rendered bound, as the store expects it.
    pub fn to_bytes(&self) -> Bytes {
        fn marked(mark: u8, value: &[u8]) -> Bytes {
            let mut v = Vec::with_capacity(value.len() + 1);
            v.push(mark);
            v.extend_from_slice(value);
            Bytes::from(v)
        }
        match self {
            LexBound::Inclusive(v) => marked(b'[', v),
            LexBound::Exclusive(v) => marked(b'(', v),
            LexBound::Min => Bytes::from_static(b"-"),
            LexBound::Max => Bytes::from_static(b"+"),
        }
    }
}

impl From<LexBound> for Arg {
    fn from(bound: LexBound) -> Self {
        Arg::Bytes(bound.to_bytes())
    }
}

/// Score aggregation for `ZUNION`/`ZINTER` families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Aggregate {
    /// `SUM`
    #[default]
    Sum,
    /// `MIN`
    Min,
    /// `MAX`
    Max,
}

impl Aggregate {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Aggregate::Sum => "SUM",
            Aggregate::Min => "MIN",
            Aggregate::Max => "MAX",
        }
    }
}

/// Options for `SORT` and `SORT_RO`.
///
/// `by` and `get` are key patterns: inside a namespace they are prefixed,
/// except for the `nosort` and `#` sentinels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOptions {
    /// `BY pattern`
    pub by: Option<String>,
    /// `LIMIT offset count`
    pub limit: Option<(i64, i64)>,
    /// `GET pattern`, repeatable
    pub get: Vec<String>,
    /// `DESC`
    pub descending: bool,
    /// `ALPHA`
    pub alpha: bool,
}

impl SortOptions {
    pub(crate) fn args(&self) -> Vec<Arg> {
        let mut args = Vec::new();
        if let Some(by) = &self.by {
            args.push(Arg::token("BY"));
            args.push(Arg::from(by.as_str()));
        }
        if let Some((offset, count)) = self.limit {
            args.extend([Arg::token("LIMIT"), Arg::from(offset), Arg::from(count)]);
        }
        for pattern in &self.get {
            args.push(Arg::token("GET"));
            args.push(Arg::from(pattern.as_str()));
        }
        if self.descending {
            args.push(Arg::token("DESC"));
        }
        if self.alpha {
            args.push(Arg::token("ALPHA"));
        }
        args
    }
}

/// Which end of a sorted set a multi-key pop takes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopOrder {
    /// Lowest scores first
    Min,
    /// Highest scores first
    Max,
}

impl PopOrder {
    pub(crate) fn token(self) -> &'static str {
        match self {
            PopOrder::Min => "MIN",
            PopOrder::Max => "MAX",
        }
    }
}

/// Distance unit for geo commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GeoUnit {
    /// `m`
    #[default]
    Meters,
    /// `km`
    Kilometers,
    /// `mi`
    Miles,
    /// `ft`
    Feet,
}

impl GeoUnit {
    pub(crate) fn token(self) -> &'static str {
        match self {
            GeoUnit::Meters => "m",
            GeoUnit::Kilometers => "km",
            GeoUnit::Miles => "mi",
            GeoUnit::Feet => "ft",
        }
    }
}

// =============================================================================
// Typed results
// =============================================================================

/// Value type reported by `TYPE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyType {
    /// Key does not exist
    None,
    /// String
    String,
    /// List
    List,
    /// Set
    Set,
    /// Sorted set
    SortedSet,
    /// Hash
    Hash,
    /// Stream
    Stream,
    /// Module or future type
    Other(String),
}

impl FromReply for KeyType {
    fn from_reply(reply: Reply) -> Result<Self> {
        let name = String::from_reply(reply)?;
        Ok(match name.as_str() {
            "none" => KeyType::None,
            "string" => KeyType::String,
            "list" => KeyType::List,
            "set" => KeyType::Set,
            "zset" => KeyType::SortedSet,
            "hash" => KeyType::Hash,
            "stream" => KeyType::Stream,
            _ => KeyType::Other(name),
        })
    }
}

/// One page of a cursor scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanPage<T = RedisKey> {
    /// Cursor for the next call; `0` when the scan is complete
    pub cursor: u64,
    /// Items returned by this page
    pub items: Vec<T>,
}

impl<T: FromReply> FromReply for ScanPage<T> {
    fn from_reply(reply: Reply) -> Result<Self> {
        let (cursor, items): (u64, Vec<T>) = FromReply::from_reply(reply)?;
        Ok(ScanPage { cursor, items })
    }
}

/// One stream entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamEntry {
    /// Entry id (`ms-seq`)
    pub id: String,
    /// Field/value pairs in insertion order
    pub fields: Vec<(Bytes, Bytes)>,
}

impl FromReply for StreamEntry {
    fn from_reply(reply: Reply) -> Result<Self> {
        match reply {
            Reply::Array(items) if items.len() == 2 => {
                let mut it = items.into_iter();
                match (it.next(), it.next()) {
                    (Some(id), Some(fields)) => Ok(StreamEntry {
                        id: String::from_reply(id)?,
                        fields: pairs(fields)?,
                    }),
                    _ => Err(Error::unexpected("stream entry", "short array")),
                }
            }
            other => Err(Error::unexpected("stream entry", other)),
        }
    }
}

/// Entries read from one stream by `XREAD`/`XREADGROUP`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedStream {
    /// The stream's key
    pub key: RedisKey,
    /// Entries read
    pub entries: Vec<StreamEntry>,
}

impl FromReply for KeyedStream {
    fn from_reply(reply: Reply) -> Result<Self> {
        let (key, entries): (RedisKey, Vec<StreamEntry>) = FromReply::from_reply(reply)?;
        Ok(KeyedStream { key, entries })
    }
}

/// Element popped by a blocking or multi-key pop, with its source key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedValue {
    /// Key the element came from
    pub key: RedisKey,
    /// The element
    pub value: Bytes,
}

impl FromReply for KeyedValue {
    fn from_reply(reply: Reply) -> Result<Self> {
        let (key, value): (RedisKey, Bytes) = FromReply::from_reply(reply)?;
        Ok(KeyedValue { key, value })
    }
}

/// Sorted-set member popped by `BZPOPMIN`/`BZPOPMAX`, with its source key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedMember {
    /// Key the member came from
    pub key: RedisKey,
    /// The member
    pub member: Bytes,
    /// Its score
    pub score: f64,
}

impl FromReply for KeyedMember {
    fn from_reply(reply: Reply) -> Result<Self> {
        let (key, member, score): (RedisKey, Bytes, f64) = FromReply::from_reply(reply)?;
        Ok(KeyedMember { key, member, score })
    }
}
