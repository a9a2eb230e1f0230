//! Argument and reply shapes
//!
//! [`Arg`] is the closed set of shapes a command argument can take. Its
//! variant is the argument's runtime type: on the generic command path only
//! [`Arg::Key`] elements are treated as keys, wherever they sit in the list.
//!
//! [`Reply`] is the store's answer, as handed back by the executor. Error
//! replies never appear here; the executor reports them as
//! [`Error::Server`](crate::Error::Server).

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::key::RedisKey;

/// A command argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Arg {
    /// A key reference
    Key(RedisKey),
    /// Opaque bytes: values, fields, members, keywords
    Bytes(Bytes),
    /// Integer argument
    Int(i64),
    /// Floating point argument
    Float(f64),
}

impl Arg {
    /// A static keyword token such as `WITHSCORES`.
    pub fn token(word: &'static str) -> Self {
        Arg::Bytes(Bytes::from_static(word.as_bytes()))
    }

    /// Borrow the bytes of a key or bytes argument.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Arg::Key(k) => Some(k.as_bytes()),
            Arg::Bytes(b) => Some(b),
            Arg::Int(_) | Arg::Float(_) => None,
        }
    }

    /// Integer view, parsing byte arguments when needed.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Arg::Int(n) => Some(*n),
            Arg::Bytes(b) => std::str::from_utf8(b).ok()?.parse().ok(),
            Arg::Key(_) | Arg::Float(_) => None,
        }
    }

    /// Case-insensitive keyword comparison.
    pub fn is_token(&self, word: &str) -> bool {
        match self {
            Arg::Bytes(b) => b.eq_ignore_ascii_case(word.as_bytes()),
            _ => false,
        }
    }

    /// Whether this is a runtime-typed key.
    pub fn is_key(&self) -> bool {
        matches!(self, Arg::Key(_))
    }

    /// Wire rendering of the argument.
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Arg::Key(k) => k.clone().into_bytes(),
            Arg::Bytes(b) => b.clone(),
            Arg::Int(n) => Bytes::from(n.to_string()),
            Arg::Float(f) => Bytes::from(format_float(*f)),
        }
    }
}

/// Render a float the way the store parses it.
pub(crate) fn format_float(f: f64) -> String {
    if f.is_infinite() {
        let sign = if f > 0.0 { "+" } else { "-" };
        format!("{}inf", sign)
    } else {
        f.to_string()
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Key(k) => write!(f, "{}", k),
            Arg::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
            Arg::Int(n) => write!(f, "{}", n),
            Arg::Float(x) => f.write_str(&format_float(*x)),
        }
    }
}

impl From<RedisKey> for Arg {
    fn from(k: RedisKey) -> Self {
        Arg::Key(k)
    }
}

impl From<&RedisKey> for Arg {
    fn from(k: &RedisKey) -> Self {
        Arg::Key(k.clone())
    }
}

impl From<Bytes> for Arg {
    fn from(b: Bytes) -> Self {
        Arg::Bytes(b)
    }
}

impl From<Vec<u8>> for Arg {
    fn from(v: Vec<u8>) -> Self {
        Arg::Bytes(Bytes::from(v))
    }
}

impl From<&[u8]> for Arg {
    fn from(s: &[u8]) -> Self {
        Arg::Bytes(Bytes::copy_from_slice(s))
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Bytes(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Bytes(Bytes::from(s))
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Arg::Bytes(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<i64> for Arg {
    fn from(n: i64) -> Self {
        Arg::Int(n)
    }
}

impl From<i32> for Arg {
    fn from(n: i32) -> Self {
        Arg::Int(n as i64)
    }
}

impl From<u32> for Arg {
    fn from(n: u32) -> Self {
        Arg::Int(n as i64)
    }
}

impl From<usize> for Arg {
    fn from(n: usize) -> Self {
        Arg::Int(n as i64)
    }
}

impl From<u64> for Arg {
    fn from(n: u64) -> Self {
        // Counts and TTLs above i64::MAX are not meaningful to the store.
        Arg::Int(n.min(i64::MAX as u64) as i64)
    }
}

impl From<f64> for Arg {
    fn from(f: f64) -> Self {
        Arg::Float(f)
    }
}

/// A reply from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reply {
    /// Null bulk / null array
    Nil,
    /// Simple status string such as `OK` or `QUEUED`
    Status(String),
    /// Integer reply
    Int(i64),
    /// Double reply
    Double(f64),
    /// Bulk string
    Bulk(Bytes),
    /// Array (or flattened map) of replies
    Array(Vec<Reply>),
}

impl Reply {
    /// `OK` status.
    pub fn ok() -> Self {
        Reply::Status("OK".to_string())
    }

    /// Bulk reply from anything convertible to bytes.
    pub fn bulk(b: impl Into<Bytes>) -> Self {
        Reply::Bulk(b.into())
    }

    /// Array of bulk replies.
    pub fn bulks<I, B>(items: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        Reply::Array(items.into_iter().map(|b| Reply::Bulk(b.into())).collect())
    }

    /// Whether the reply is nil.
    pub fn is_nil(&self) -> bool {
        matches!(self, Reply::Nil)
    }

    /// Borrow bulk or status bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Reply::Bulk(b) => Some(b),
            Reply::Status(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Integer view; nil counts as zero, bulk strings are parsed.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Reply::Int(n) => Some(*n),
            Reply::Nil => Some(0),
            Reply::Bulk(b) => std::str::from_utf8(b).ok()?.trim().parse().ok(),
            _ => None,
        }
    }

    /// Float view; bulk strings are parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Reply::Double(d) => Some(*d),
            Reply::Int(n) => Some(*n as f64),
            Reply::Bulk(b) => parse_float(b),
            _ => None,
        }
    }

    /// Short type name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Reply::Nil => "nil",
            Reply::Status(_) => "status",
            Reply::Int(_) => "integer",
            Reply::Double(_) => "double",
            Reply::Bulk(_) => "bulk",
            Reply::Array(_) => "array",
        }
    }
}

/// Parse a store-rendered float, accepting `inf` spellings.
pub(crate) fn parse_float(b: &[u8]) -> Option<f64> {
    let s = std::str::from_utf8(b).ok()?.trim();
    match s.to_ascii_lowercase().as_str() {
        "inf" | "+inf" => Some(f64::INFINITY),
        "-inf" => Some(f64::NEG_INFINITY),
        other => other.parse().ok(),
    }
}
