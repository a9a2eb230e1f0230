//! Key namespace codec
//!
//! [`KeyCodec`] is the bijection between logical keys and physical keys:
//! `encode(k) = prefix ++ k`, `decode(prefix ++ k) = k`. Every key-bearing
//! argument a command carries is encoded on the way in, and every key the
//! store hands back is decoded on the way out, so callers only ever see
//! logical keys.
//!
//! Decoding a physical key that does not start with the prefix means a key
//! escaped the namespace. That is never papered over: it is reported as
//! [`Error::InvariantViolation`].

use std::sync::Arc;

use bytes::Bytes;
use tracing::warn;

use crate::command::{Command, CommandKind};
use crate::condition::Condition;
use crate::error::{Error, Result};
use crate::key::RedisKey;
use crate::signature::{ArgumentRole, ReplyShape};
use crate::value::{Arg, Reply};

/// Commands that are rejected on the generic path inside a namespace.
///
/// They either return a key from the whole keyspace or act on every key
/// regardless of prefix.
pub const UNSCOPED_COMMANDS: &[&str] = &["RANDOMKEY", "FLUSHDB", "FLUSHALL", "SWAPDB"];

/// Prefix-based key translation.
///
/// Cheap to clone; the same codec is shared by a facade and every batch or
/// transaction created from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCodec {
    prefix: Bytes,
    unscoped: Arc<[String]>,
}

impl KeyCodec {
    /// Codec for `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an empty prefix, which would make the
    /// namespace indistinguishable from the whole keyspace.
    pub fn new(prefix: impl Into<Bytes>) -> Result<Self> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(Error::Config {
                reason: "key prefix must not be empty".to_string(),
            });
        }
        Ok(KeyCodec {
            prefix,
            unscoped: Arc::from(Vec::new()),
        })
    }

    /// Also reject these command names on the generic path.
    pub fn with_unscoped_commands<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.into().to_ascii_uppercase())
            .collect();
        self.unscoped = Arc::from(names);
        self
    }

    /// The namespace prefix.
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// Logical to physical.
    pub fn encode(&self, key: &RedisKey) -> RedisKey {
        key.prepend(&self.prefix)
    }

    /// Physical to logical.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvariantViolation`] when `key` lacks the prefix.
    pub fn decode(&self, key: &RedisKey) -> Result<RedisKey> {
        if !key.starts_with(&self.prefix) {
            warn!(
                key = %key,
                prefix = %String::from_utf8_lossy(&self.prefix),
                "reply key outside the namespace"
            );
            return Err(Error::invariant(format!(
                "key '{}' does not carry the namespace prefix '{}'",
                key,
                String::from_utf8_lossy(&self.prefix)
            )));
        }
        Ok(key.strip(self.prefix.len()))
    }

    fn decode_bytes(&self, bytes: &Bytes) -> Result<Bytes> {
        self.decode(&RedisKey::from(bytes.clone()))
            .map(RedisKey::into_bytes)
    }

    /// Whether `command` cannot be confined to the namespace.
    pub fn is_unscoped(&self, command: &Command) -> bool {
        match command.kind() {
            CommandKind::Custom(name) => {
                UNSCOPED_COMMANDS
                    .iter()
                    .any(|n| n.eq_ignore_ascii_case(name))
                    || self.unscoped.iter().any(|n| n.eq_ignore_ascii_case(name))
            }
            kind => kind.reply_shape() == ReplyShape::Unscoped,
        }
    }

    /// Rewrite every key-bearing argument of `command`.
    ///
    /// Argument count and order are preserved. Keys are encoded; pattern
    /// tokens are encoded unless they equal a registered sentinel; opaque
    /// arguments pass through untouched.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedInNamespace`] for unscoped commands
    /// - [`Error::Programming`] when a numeric argument sits in a key slot or
    ///   the arguments do not fit the command's signature
    pub fn encode_command(&self, command: Command) -> Result<Command> {
        if self.is_unscoped(&command) {
            warn!(command = %command.name(), "rejected unscoped command inside namespace");
            return Err(Error::UnsupportedInNamespace {
                command: command.name().to_string(),
            });
        }

        let roles = command.classify()?;
        let (kind, args) = command.into_parts();
        let args = args
            .into_iter()
            .zip(roles.iter())
            .map(|(arg, role)| self.encode_arg(kind.name(), arg, *role))
            .collect::<Result<Vec<_>>>()?;
        Ok(Command::from_parts(kind, args))
    }

    fn encode_arg(&self, command: &str, arg: Arg, role: ArgumentRole) -> Result<Arg> {
        let key = match (role, arg) {
            (ArgumentRole::Opaque, arg) => return Ok(arg),
            (ArgumentRole::Pattern(sentinels), Arg::Bytes(b))
                if sentinels.iter().any(|s| &b[..] == s.as_bytes()) =>
            {
                return Ok(Arg::Bytes(b))
            }
            (_, Arg::Key(k)) => k,
            (_, Arg::Bytes(b)) => RedisKey::from(b),
            (_, other) => {
                return Err(Error::programming(format!(
                    "{}: numeric argument {} in a key position",
                    command, other
                )))
            }
        };
        Ok(Arg::Key(self.encode(&key)))
    }

    /// Decode the keys a reply carries, according to `shape`.
    ///
    /// Replies whose structure does not match the shape (nil, error-free
    /// empty results, unexpected types) pass through unchanged; only keys
    /// found where the shape says keys live are decoded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvariantViolation`] when such a key lacks the prefix.
    pub fn decode_reply(&self, shape: ReplyShape, reply: Reply) -> Result<Reply> {
        match shape {
            ReplyShape::Plain | ReplyShape::Unscoped => Ok(reply),
            ReplyShape::Key => self.decode_key_reply(reply),
            ReplyShape::Keys => self.decode_key_array(reply),
            ReplyShape::KeyedHead => match reply {
                Reply::Array(mut items) => {
                    if let Some(head) = items.first_mut() {
                        let taken = std::mem::replace(head, Reply::Nil);
                        *head = self.decode_key_reply(taken)?;
                    }
                    Ok(Reply::Array(items))
                }
                other => Ok(other),
            },
            ReplyShape::KeyedEntries => match reply {
                Reply::Array(entries) => entries
                    .into_iter()
                    .map(|entry| self.decode_reply(ReplyShape::KeyedHead, entry))
                    .collect::<Result<Vec<_>>>()
                    .map(Reply::Array),
                other => Ok(other),
            },
            ReplyShape::ScanPage => match reply {
                Reply::Array(mut page) if page.len() == 2 => {
                    let keys = std::mem::replace(&mut page[1], Reply::Nil);
                    page[1] = self.decode_key_array(keys)?;
                    Ok(Reply::Array(page))
                }
                other => Ok(other),
            },
        }
    }

    fn decode_key_reply(&self, reply: Reply) -> Result<Reply> {
        match reply {
            Reply::Bulk(b) => self.decode_bytes(&b).map(Reply::Bulk),
            other => Ok(other),
        }
    }

    fn decode_key_array(&self, reply: Reply) -> Result<Reply> {
        match reply {
            Reply::Array(items) => items
                .into_iter()
                .map(|item| self.decode_key_reply(item))
                .collect::<Result<Vec<_>>>()
                .map(Reply::Array),
            other => Ok(other),
        }
    }

    /// Rewrite the key a condition depends on.
    pub fn encode_condition(&self, condition: Condition) -> Condition {
        let key = self.encode(condition.key());
        condition.with_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn codec() -> KeyCodec {
        KeyCodec::new("prefix:").unwrap()
    }

    fn rendered(cmd: &Command) -> Vec<String> {
        cmd.arguments().iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_empty_prefix_rejected() {
        assert!(matches!(KeyCodec::new(""), Err(Error::Config { .. })));
    }

    #[test]
    fn test_decode_rejects_foreign_key() {
        let err = codec().decode(&RedisKey::from("other:k")).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation { .. }));
    }

    #[test]
    fn test_encode_scalar_key() {
        let cmd = Command::new(CommandKind::Set).key("a").arg("v");
        let out = codec().encode_command(cmd).unwrap();
        assert_eq!(rendered(&out), vec!["prefix:a", "v"]);
    }

    #[test]
    fn test_encode_preserves_array_length() {
        let cmd = Command::new(CommandKind::Del).keys(["a", "b", "c"]);
        let out = codec().encode_command(cmd).unwrap();
        assert_eq!(rendered(&out), vec!["prefix:a", "prefix:b", "prefix:c"]);
    }

    #[test]
    fn test_mset_pairs() {
        let cmd = Command::new(CommandKind::MSet)
            .key("a")
            .arg("1")
            .key("b")
            .arg("2");
        let out = codec().encode_command(cmd).unwrap();
        assert_eq!(rendered(&out), vec!["prefix:a", "1", "prefix:b", "2"]);
    }

    #[test]
    fn test_sort_sentinels() {
        let cmd = Command::new(CommandKind::Sort)
            .key("list")
            .token("BY")
            .arg("nosort")
            .token("GET")
            .arg("#")
            .token("GET")
            .arg("by");
        let out = codec().encode_command(cmd).unwrap();
        assert_eq!(
            rendered(&out),
            vec!["prefix:list", "BY", "nosort", "GET", "#", "GET", "prefix:by"]
        );
    }

    #[test]
    fn test_georadius_member_named_like_option() {
        let cmd = Command::new(CommandKind::GeoRadiusByMember)
            .key("geo")
            .arg("STORE")
            .arg(5.0)
            .token("km");
        let out = codec().encode_command(cmd).unwrap();
        assert_eq!(rendered(&out), vec!["prefix:geo", "STORE", "5", "km"]);

        let cmd = Command::new(CommandKind::GeoRadiusByMember)
            .key("geo")
            .arg("storedist")
            .arg(5.0)
            .token("km")
            .token("STORE")
            .key("dst");
        let out = codec().encode_command(cmd).unwrap();
        assert_eq!(
            rendered(&out),
            vec!["prefix:geo", "storedist", "5", "km", "STORE", "prefix:dst"]
        );
    }

    #[test]
    fn test_georadius_store_destination() {
        let cmd = Command::new(CommandKind::GeoRadius)
            .key("geo")
            .arg(13.4)
            .arg(52.5)
            .arg(10.0)
            .token("km")
            .token("STOREDIST")
            .key("dst");
        let out = codec().encode_command(cmd).unwrap();
        assert_eq!(
            rendered(&out),
            vec!["prefix:geo", "13.4", "52.5", "10", "km", "STOREDIST", "prefix:dst"]
        );
    }

    #[test]
    fn test_xreadgroup_consumer_named_streams() {
        let cmd = Command::new(CommandKind::XReadGroup)
            .token("GROUP")
            .arg("streams")
            .arg("STREAMS")
            .token("STREAMS")
            .key("s")
            .arg(">");
        let out = codec().encode_command(cmd).unwrap();
        assert_eq!(
            rendered(&out),
            vec!["GROUP", "streams", "STREAMS", "STREAMS", "prefix:s", ">"]
        );
    }

    #[test]
    fn test_custom_runtime_typed() {
        let cmd = Command::custom(
            "CUSTOM",
            vec![Arg::from("arg1"), Arg::Key(RedisKey::from("arg2"))],
        );
        let out = codec().encode_command(cmd).unwrap();
        assert_eq!(rendered(&out), vec!["arg1", "prefix:arg2"]);
    }

    #[test]
    fn test_unscoped_rejected() {
        let err = codec()
            .encode_command(Command::new(CommandKind::RandomKey))
            .unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedInNamespace {
                command: "RANDOMKEY".into()
            }
        );

        let err = codec()
            .encode_command(Command::custom("flushall", vec![]))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedInNamespace { .. }));
    }

    #[test]
    fn test_configured_unscoped_names() {
        let codec = codec().with_unscoped_commands(["debug"]);
        let err = codec
            .encode_command(Command::custom("DEBUG", vec![Arg::from("SLEEP")]))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedInNamespace { .. }));
    }

    #[test]
    fn test_numeric_key_is_programming_error() {
        let cmd = Command::new(CommandKind::Get).arg(5i64);
        let err = codec().encode_command(cmd).unwrap_err();
        assert!(matches!(err, Error::Programming { .. }));
    }

    #[test]
    fn test_decode_scan_page() {
        let reply = Reply::Array(vec![
            Reply::bulk("0"),
            Reply::bulks(["prefix:a", "prefix:b"]),
        ]);
        let out = codec().decode_reply(ReplyShape::ScanPage, reply).unwrap();
        assert_eq!(
            out,
            Reply::Array(vec![Reply::bulk("0"), Reply::bulks(["a", "b"])])
        );
    }

    #[test]
    fn test_decode_keyed_head_nil_passes() {
        let out = codec().decode_reply(ReplyShape::KeyedHead, Reply::Nil).unwrap();
        assert_eq!(out, Reply::Nil);
    }

    #[test]
    fn test_decode_keyed_entries() {
        let reply = Reply::Array(vec![Reply::Array(vec![
            Reply::bulk("prefix:s"),
            Reply::Array(vec![]),
        ])]);
        let out = codec()
            .decode_reply(ReplyShape::KeyedEntries, reply)
            .unwrap();
        assert_eq!(
            out,
            Reply::Array(vec![Reply::Array(vec![
                Reply::bulk("s"),
                Reply::Array(vec![])
            ])])
        );
    }

    #[test]
    fn test_decode_keys_breach() {
        let reply = Reply::bulks(["prefix:a", "stray"]);
        let err = codec().decode_reply(ReplyShape::Keys, reply).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation { .. }));
    }

    #[test]
    fn test_condition_rewritten() {
        let c = codec().encode_condition(Condition::key_exists("k"));
        assert_eq!(c.key().as_bytes(), b"prefix:k");
    }

    proptest! {
        #[test]
        fn prop_round_trip(prefix in prop::collection::vec(any::<u8>(), 1..8),
                           key in prop::collection::vec(any::<u8>(), 0..32)) {
            let codec = KeyCodec::new(prefix).unwrap();
            let key = RedisKey::from(key);
            prop_assert_eq!(codec.decode(&codec.encode(&key)).unwrap(), key);
        }

        #[test]
        fn prop_encode_injective(a in prop::collection::vec(any::<u8>(), 0..16),
                                 b in prop::collection::vec(any::<u8>(), 0..16)) {
            let codec = codec();
            let (ka, kb) = (RedisKey::from(a), RedisKey::from(b));
            prop_assert_eq!(ka == kb, codec.encode(&ka) == codec.encode(&kb));
        }
    }
}
