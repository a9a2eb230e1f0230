//! Byte keys
//!
//! A [`RedisKey`] is an arbitrary byte sequence. The same type carries both
//! logical keys (what the caller supplies and receives) and physical keys
//! (the logical key with the namespace prefix prepended). Which one a given
//! value is depends only on which side of a [`KeyCodec`](crate::KeyCodec)
//! it sits.

use std::fmt;

use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};

/// A store key.
///
/// Cloning is cheap: the bytes are reference counted.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct RedisKey(Bytes);

impl RedisKey {
    /// Create a key from anything convertible to bytes.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        RedisKey(bytes.into())
    }

    /// Borrow the raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the key, returning the underlying buffer.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the key starts with `prefix`.
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.0.starts_with(prefix)
    }

    /// `prefix ++ self` in a single allocation.
    pub fn prepend(&self, prefix: &[u8]) -> RedisKey {
        let mut buf = BytesMut::with_capacity(prefix.len() + self.0.len());
        buf.extend_from_slice(prefix);
        buf.extend_from_slice(&self.0);
        RedisKey(buf.freeze())
    }

    /// The key with its first `n` bytes removed, sharing the same buffer.
    pub(crate) fn strip(&self, n: usize) -> RedisKey {
        RedisKey(self.0.slice(n..))
    }
}

impl fmt::Debug for RedisKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RedisKey({:?})", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Display for RedisKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl AsRef<[u8]> for RedisKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Bytes> for RedisKey {
    fn from(b: Bytes) -> Self {
        RedisKey(b)
    }
}

impl From<Vec<u8>> for RedisKey {
    fn from(v: Vec<u8>) -> Self {
        RedisKey(Bytes::from(v))
    }
}

impl From<&[u8]> for RedisKey {
    fn from(s: &[u8]) -> Self {
        RedisKey(Bytes::copy_from_slice(s))
    }
}

impl From<String> for RedisKey {
    fn from(s: String) -> Self {
        RedisKey(Bytes::from(s))
    }
}

impl From<&String> for RedisKey {
    fn from(s: &String) -> Self {
        RedisKey(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<&str> for RedisKey {
    fn from(s: &str) -> Self {
        RedisKey(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<&RedisKey> for RedisKey {
    fn from(k: &RedisKey) -> Self {
        k.clone()
    }
}

impl From<RedisKey> for Bytes {
    fn from(k: RedisKey) -> Self {
        k.0
    }
}
