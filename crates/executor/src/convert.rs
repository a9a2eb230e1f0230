//! Reply conversion.
//!
//! [`FromReply`] turns a raw [`Reply`] into the typed result a command
//! method promises. A reply with the wrong shape is reported as
//! [`Error::UnexpectedReply`] rather than coerced.

use bytes::Bytes;
use keyspace_core::{Error, RedisKey, Reply, Result};

/// Conversion from a store reply.
pub trait FromReply: Sized + Send + 'static {
    /// Convert `reply`, or report why it does not fit.
    fn from_reply(reply: Reply) -> Result<Self>;
}

impl FromReply for Reply {
    fn from_reply(reply: Reply) -> Result<Self> {
        Ok(reply)
    }
}

impl FromReply for () {
    fn from_reply(_reply: Reply) -> Result<Self> {
        Ok(())
    }
}

impl FromReply for bool {
    fn from_reply(reply: Reply) -> Result<Self> {
        match reply {
            Reply::Int(n) => Ok(n != 0),
            Reply::Nil => Ok(false),
            Reply::Status(s) => Ok(s.eq_ignore_ascii_case("OK")),
            Reply::Bulk(ref b) if &b[..] == b"1" => Ok(true),
            Reply::Bulk(ref b) if &b[..] == b"0" => Ok(false),
            other => Err(Error::unexpected("boolean", other)),
        }
    }
}

impl FromReply for i64 {
    fn from_reply(reply: Reply) -> Result<Self> {
        match reply {
            Reply::Int(n) => Ok(n),
            Reply::Bulk(_) => reply
                .as_int()
                .ok_or_else(|| Error::unexpected("integer", &reply)),
            other => Err(Error::unexpected("integer", other)),
        }
    }
}

impl FromReply for u64 {
    fn from_reply(reply: Reply) -> Result<Self> {
        let n = i64::from_reply(reply)?;
        u64::try_from(n).map_err(|_| Error::unexpected("non-negative integer", n))
    }
}

impl FromReply for f64 {
    fn from_reply(reply: Reply) -> Result<Self> {
        reply
            .as_f64()
            .ok_or_else(|| Error::unexpected("float", &reply))
    }
}

impl FromReply for Bytes {
    fn from_reply(reply: Reply) -> Result<Self> {
        match reply {
            Reply::Bulk(b) => Ok(b),
            Reply::Status(s) => Ok(Bytes::from(s)),
            Reply::Int(n) => Ok(Bytes::from(n.to_string())),
            other => Err(Error::unexpected("bulk string", other)),
        }
    }
}

impl FromReply for String {
    fn from_reply(reply: Reply) -> Result<Self> {
        match reply {
            Reply::Status(s) => Ok(s),
            Reply::Bulk(b) => {
                String::from_utf8(b.to_vec()).map_err(|_| Error::unexpected("utf-8 string", b))
            }
            other => Err(Error::unexpected("string", other)),
        }
    }
}

impl FromReply for RedisKey {
    fn from_reply(reply: Reply) -> Result<Self> {
        Bytes::from_reply(reply).map(RedisKey::from)
    }
}

impl<T: FromReply> FromReply for Option<T> {
    fn from_reply(reply: Reply) -> Result<Self> {
        match reply {
            Reply::Nil => Ok(None),
            other => T::from_reply(other).map(Some),
        }
    }
}

impl<T: FromReply> FromReply for Vec<T> {
    fn from_reply(reply: Reply) -> Result<Self> {
        match reply {
            Reply::Array(items) => items.into_iter().map(T::from_reply).collect(),
            Reply::Nil => Ok(Vec::new()),
            other => Err(Error::unexpected("array", other)),
        }
    }
}

impl<A: FromReply, B: FromReply> FromReply for (A, B) {
    fn from_reply(reply: Reply) -> Result<Self> {
        match reply {
            Reply::Array(items) if items.len() == 2 => {
                let mut it = items.into_iter();
                match (it.next(), it.next()) {
                    (Some(a), Some(b)) => Ok((A::from_reply(a)?, B::from_reply(b)?)),
                    _ => Err(Error::unexpected("pair", "short array")),
                }
            }
            other => Err(Error::unexpected("pair", other)),
        }
    }
}

impl<A: FromReply, B: FromReply, C: FromReply> FromReply for (A, B, C) {
    fn from_reply(reply: Reply) -> Result<Self> {
        match reply {
            Reply::Array(items) if items.len() == 3 => {
                let mut it = items.into_iter();
                match (it.next(), it.next(), it.next()) {
                    (Some(a), Some(b), Some(c)) => {
                        Ok((A::from_reply(a)?, B::from_reply(b)?, C::from_reply(c)?))
                    }
                    _ => Err(Error::unexpected("triple", "short array")),
                }
            }
            other => Err(Error::unexpected("triple", other)),
        }
    }
}

/// Pairs from either a flat `[a, b, a, b]` array or nested `[[a, b], ...]`.
///
/// Map-like replies (`HGETALL`, `WITHSCORES`) come back flat on RESP2 and
/// nested on RESP3; both are accepted.
pub fn pairs<A: FromReply, B: FromReply>(reply: Reply) -> Result<Vec<(A, B)>> {
    let items = match reply {
        Reply::Array(items) => items,
        Reply::Nil => return Ok(Vec::new()),
        other => return Err(Error::unexpected("array of pairs", other)),
    };
    if items.iter().all(|i| matches!(i, Reply::Array(_))) && !items.is_empty() {
        return items.into_iter().map(<(A, B)>::from_reply).collect();
    }
    if items.len() % 2 != 0 {
        return Err(Error::unexpected("even-length array", items.len()));
    }
    let mut out = Vec::with_capacity(items.len() / 2);
    let mut it = items.into_iter();
    while let (Some(a), Some(b)) = (it.next(), it.next()) {
        out.push((A::from_reply(a)?, B::from_reply(b)?));
    }
    Ok(out)
}

/// Optional pair: nil maps to `None`.
pub fn optional_pair<A: FromReply, B: FromReply>(reply: Reply) -> Result<Option<(A, B)>> {
    match reply {
        Reply::Nil => Ok(None),
        other => <(A, B)>::from_reply(other).map(Some),
    }
}

/// `[head, pairs]` where the second element is a flat or nested pair list.
pub fn keyed_pairs<K: FromReply, A: FromReply, B: FromReply>(
    reply: Reply,
) -> Result<Option<(K, Vec<(A, B)>)>> {
    match reply {
        Reply::Nil => Ok(None),
        Reply::Array(items) if items.len() == 2 => {
            let mut it = items.into_iter();
            match (it.next(), it.next()) {
                (Some(head), Some(rest)) => Ok(Some((K::from_reply(head)?, pairs(rest)?))),
                _ => Err(Error::unexpected("keyed pairs", "short array")),
            }
        }
        other => Err(Error::unexpected("keyed pairs", other)),
    }
}
