//! Transaction conditions
//!
//! A [`Condition`] is a read-only assertion about store state that gates
//! whether a transaction's commands take effect. Each condition compiles to
//! exactly one probe command ([`Condition::probe`]); the executor runs the
//! probes at commit time and [`Probe::is_satisfied_by`] decides each one from
//! the probe's reply.
//!
//! Conditions reference exactly one key, which is what
//! [`Condition::dependent_keys`] reports and what a namespaced transaction
//! rewrites before the probe is issued.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::command::{Command, CommandKind};
use crate::error::{Error, Result};
use crate::key::RedisKey;
use crate::value::{format_float, parse_float, Reply};

/// The part of a key a condition looks at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Target {
    /// The key itself (string value for equality)
    Key,
    /// A field of a hash
    HashField(Bytes),
    /// An element of a list by index
    ListIndex(i64),
    /// A member of a set
    SetMember(Bytes),
    /// A member of a sorted set (score for equality)
    SortedSetMember(Bytes),
}

/// A length measured by a length condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Measure {
    /// STRLEN
    StringLength,
    /// HLEN
    HashLength,
    /// LLEN
    ListLength,
    /// SCARD
    SetLength,
    /// ZCARD
    SortedSetLength,
    /// ZCOUNT over an inclusive score range
    SortedSetScoreRange {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },
    /// ZLEXCOUNT over a lex range (`[a`, `(b`, `-`, `+`)
    SortedSetLexRange {
        /// Lower bound
        min: Bytes,
        /// Upper bound
        max: Bytes,
    },
    /// XLEN
    StreamLength,
}

/// Comparison applied by a length condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    /// `==`
    Equal,
    /// `>`
    GreaterThan,
    /// `<`
    LessThan,
}

impl Comparison {
    fn holds(self, actual: i64, expected: u64) -> bool {
        let actual = actual.max(0) as u64;
        match self {
            Comparison::Equal => actual == expected,
            Comparison::GreaterThan => actual > expected,
            Comparison::LessThan => actual < expected,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Comparison::Equal => "==",
            Comparison::GreaterThan => ">",
            Comparison::LessThan => "<",
        }
    }
}

/// What a condition asserts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConditionKind {
    /// The target exists
    KeyExists(Target),
    /// The target does not exist
    KeyNotExists(Target),
    /// The target's value equals the expected bytes; `None` means absent
    ValueEqual(Target, Option<Bytes>),
    /// The target's value differs from the expected bytes; `None` means absent
    ValueNotEqual(Target, Option<Bytes>),
    /// A length compares against an expected count
    Length(Measure, Comparison, u64),
}

/// A condition over one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    key: RedisKey,
    kind: ConditionKind,
}

impl Condition {
    /// Condition from its parts.
    pub fn new(key: impl Into<RedisKey>, kind: ConditionKind) -> Self {
        Condition {
            key: key.into(),
            kind,
        }
    }

    // ==================== Factories ====================

    /// The key exists.
    pub fn key_exists(key: impl Into<RedisKey>) -> Self {
        Self::new(key, ConditionKind::KeyExists(Target::Key))
    }

    /// The key does not exist.
    pub fn key_not_exists(key: impl Into<RedisKey>) -> Self {
        Self::new(key, ConditionKind::KeyNotExists(Target::Key))
    }

    /// The string value equals `value`.
    pub fn string_equal(key: impl Into<RedisKey>, value: impl Into<Bytes>) -> Self {
        Self::new(key, ConditionKind::ValueEqual(Target::Key, Some(value.into())))
    }

    /// The string value is absent or differs from `value`.
    pub fn string_not_equal(key: impl Into<RedisKey>, value: impl Into<Bytes>) -> Self {
        Self::new(key, ConditionKind::ValueNotEqual(Target::Key, Some(value.into())))
    }

    /// The hash has `field`.
    pub fn hash_exists(key: impl Into<RedisKey>, field: impl Into<Bytes>) -> Self {
        Self::new(key, ConditionKind::KeyExists(Target::HashField(field.into())))
    }

    /// The hash lacks `field`.
    pub fn hash_not_exists(key: impl Into<RedisKey>, field: impl Into<Bytes>) -> Self {
        Self::new(key, ConditionKind::KeyNotExists(Target::HashField(field.into())))
    }

    /// The hash field equals `value`.
    pub fn hash_equal(
        key: impl Into<RedisKey>,
        field: impl Into<Bytes>,
        value: impl Into<Bytes>,
    ) -> Self {
        Self::new(
            key,
            ConditionKind::ValueEqual(Target::HashField(field.into()), Some(value.into())),
        )
    }

    /// The hash field is absent or differs from `value`.
    pub fn hash_not_equal(
        key: impl Into<RedisKey>,
        field: impl Into<Bytes>,
        value: impl Into<Bytes>,
    ) -> Self {
        Self::new(
            key,
            ConditionKind::ValueNotEqual(Target::HashField(field.into()), Some(value.into())),
        )
    }

    /// The list has an element at `index`.
    pub fn list_index_exists(key: impl Into<RedisKey>, index: i64) -> Self {
        Self::new(key, ConditionKind::KeyExists(Target::ListIndex(index)))
    }

    /// The list has no element at `index`.
    pub fn list_index_not_exists(key: impl Into<RedisKey>, index: i64) -> Self {
        Self::new(key, ConditionKind::KeyNotExists(Target::ListIndex(index)))
    }

    /// The list element at `index` equals `value`.
    pub fn list_index_equal(key: impl Into<RedisKey>, index: i64, value: impl Into<Bytes>) -> Self {
        Self::new(
            key,
            ConditionKind::ValueEqual(Target::ListIndex(index), Some(value.into())),
        )
    }

    /// The list element at `index` is absent or differs from `value`.
    pub fn list_index_not_equal(
        key: impl Into<RedisKey>,
        index: i64,
        value: impl Into<Bytes>,
    ) -> Self {
        Self::new(
            key,
            ConditionKind::ValueNotEqual(Target::ListIndex(index), Some(value.into())),
        )
    }

    /// The set contains `member`.
    pub fn set_contains(key: impl Into<RedisKey>, member: impl Into<Bytes>) -> Self {
        Self::new(key, ConditionKind::KeyExists(Target::SetMember(member.into())))
    }

    /// The set does not contain `member`.
    pub fn set_not_contains(key: impl Into<RedisKey>, member: impl Into<Bytes>) -> Self {
        Self::new(key, ConditionKind::KeyNotExists(Target::SetMember(member.into())))
    }

    /// The sorted set contains `member`.
    pub fn sorted_set_contains(key: impl Into<RedisKey>, member: impl Into<Bytes>) -> Self {
        Self::new(
            key,
            ConditionKind::KeyExists(Target::SortedSetMember(member.into())),
        )
    }

    /// The sorted set does not contain `member`.
    pub fn sorted_set_not_contains(key: impl Into<RedisKey>, member: impl Into<Bytes>) -> Self {
        Self::new(
            key,
            ConditionKind::KeyNotExists(Target::SortedSetMember(member.into())),
        )
    }

    /// The score of `member` equals `score`.
    pub fn sorted_set_score_equal(
        key: impl Into<RedisKey>,
        member: impl Into<Bytes>,
        score: f64,
    ) -> Self {
        Self::new(
            key,
            ConditionKind::ValueEqual(
                Target::SortedSetMember(member.into()),
                Some(Bytes::from(format_float(score))),
            ),
        )
    }

    /// `member` is absent or its score differs from `score`.
    pub fn sorted_set_score_not_equal(
        key: impl Into<RedisKey>,
        member: impl Into<Bytes>,
        score: f64,
    ) -> Self {
        Self::new(
            key,
            ConditionKind::ValueNotEqual(
                Target::SortedSetMember(member.into()),
                Some(Bytes::from(format_float(score))),
            ),
        )
    }

    /// The measured length equals `length`.
    pub fn length_equal(key: impl Into<RedisKey>, measure: Measure, length: u64) -> Self {
        Self::new(key, ConditionKind::Length(measure, Comparison::Equal, length))
    }

    /// The measured length is greater than `length`.
    pub fn length_greater_than(key: impl Into<RedisKey>, measure: Measure, length: u64) -> Self {
        Self::new(key, ConditionKind::Length(measure, Comparison::GreaterThan, length))
    }

    /// The measured length is less than `length`.
    pub fn length_less_than(key: impl Into<RedisKey>, measure: Measure, length: u64) -> Self {
        Self::new(key, ConditionKind::Length(measure, Comparison::LessThan, length))
    }

    // ==================== Accessors ====================

    /// The key the condition reads.
    pub fn key(&self) -> &RedisKey {
        &self.key
    }

    /// What the condition asserts.
    pub fn kind(&self) -> &ConditionKind {
        &self.kind
    }

    /// Every key the condition references.
    pub fn dependent_keys(&self) -> Vec<&RedisKey> {
        vec![&self.key]
    }

    /// Same assertion over a different key.
    pub fn with_key(self, key: RedisKey) -> Self {
        Condition { key, ..self }
    }

    /// Human-readable description, used in diagnostics.
    pub fn describe(&self) -> String {
        self.to_string()
    }

    /// Compile to the read-only probe that decides this condition.
    pub fn probe(&self) -> Probe {
        let key = self.key.clone();
        let command = match &self.kind {
            ConditionKind::KeyExists(target)
            | ConditionKind::KeyNotExists(target)
            | ConditionKind::ValueEqual(target, _)
            | ConditionKind::ValueNotEqual(target, _) => {
                let exists_only = matches!(
                    self.kind,
                    ConditionKind::KeyExists(_) | ConditionKind::KeyNotExists(_)
                );
                target_probe(key, target, exists_only)
            }
            ConditionKind::Length(measure, _, _) => measure_probe(key, measure),
        };
        Probe {
            condition: self.clone(),
            command,
        }
    }
}

fn target_probe(key: RedisKey, target: &Target, exists_only: bool) -> Command {
    match target {
        Target::Key if exists_only => Command::new(CommandKind::Exists).key(key),
        Target::Key => Command::new(CommandKind::Get).key(key),
        Target::HashField(field) if exists_only => {
            Command::new(CommandKind::HExists).key(key).arg(field.clone())
        }
        Target::HashField(field) => Command::new(CommandKind::HGet).key(key).arg(field.clone()),
        Target::ListIndex(index) => Command::new(CommandKind::LIndex).key(key).arg(*index),
        Target::SetMember(member) => {
            Command::new(CommandKind::SIsMember).key(key).arg(member.clone())
        }
        Target::SortedSetMember(member) => {
            Command::new(CommandKind::ZScore).key(key).arg(member.clone())
        }
    }
}

fn measure_probe(key: RedisKey, measure: &Measure) -> Command {
    match measure {
        Measure::StringLength => Command::new(CommandKind::StrLen).key(key),
        Measure::HashLength => Command::new(CommandKind::HLen).key(key),
        Measure::ListLength => Command::new(CommandKind::LLen).key(key),
        Measure::SetLength => Command::new(CommandKind::SCard).key(key),
        Measure::SortedSetLength => Command::new(CommandKind::ZCard).key(key),
        Measure::SortedSetScoreRange { min, max } => Command::new(CommandKind::ZCount)
            .key(key)
            .arg(*min)
            .arg(*max),
        Measure::SortedSetLexRange { min, max } => Command::new(CommandKind::ZLexCount)
            .key(key)
            .arg(min.clone())
            .arg(max.clone()),
        Measure::StreamLength => Command::new(CommandKind::XLen).key(key),
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = &self.key;
        match &self.kind {
            ConditionKind::KeyExists(target) => write!(f, "{} exists", TargetDisplay(key, target)),
            ConditionKind::KeyNotExists(target) => {
                write!(f, "{} does not exist", TargetDisplay(key, target))
            }
            ConditionKind::ValueEqual(target, expected) => write!(
                f,
                "{} equals {}",
                TargetDisplay(key, target),
                ExpectedDisplay(expected)
            ),
            ConditionKind::ValueNotEqual(target, expected) => write!(
                f,
                "{} does not equal {}",
                TargetDisplay(key, target),
                ExpectedDisplay(expected)
            ),
            ConditionKind::Length(measure, comparison, length) => {
                let what = match measure {
                    Measure::StringLength => format!("length of string '{}'", key),
                    Measure::HashLength => format!("length of hash '{}'", key),
                    Measure::ListLength => format!("length of list '{}'", key),
                    Measure::SetLength => format!("length of set '{}'", key),
                    Measure::SortedSetLength => format!("length of sorted set '{}'", key),
                    Measure::SortedSetScoreRange { min, max } => format!(
                        "members of sorted set '{}' scored in [{}, {}]",
                        key,
                        format_float(*min),
                        format_float(*max)
                    ),
                    Measure::SortedSetLexRange { min, max } => format!(
                        "members of sorted set '{}' between {} and {}",
                        key,
                        String::from_utf8_lossy(min),
                        String::from_utf8_lossy(max)
                    ),
                    Measure::StreamLength => format!("length of stream '{}'", key),
                };
                write!(f, "{} {} {}", what, comparison.symbol(), length)
            }
        }
    }
}

struct TargetDisplay<'a>(&'a RedisKey, &'a Target);

impl fmt::Display for TargetDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self.0;
        match self.1 {
            Target::Key => write!(f, "key '{}'", key),
            Target::HashField(field) => write!(
                f,
                "hash '{}' field '{}'",
                key,
                String::from_utf8_lossy(field)
            ),
            Target::ListIndex(index) => write!(f, "list '{}' index {}", key, index),
            Target::SetMember(member) => write!(
                f,
                "set '{}' member '{}'",
                key,
                String::from_utf8_lossy(member)
            ),
            Target::SortedSetMember(member) => write!(
                f,
                "sorted set '{}' member '{}'",
                key,
                String::from_utf8_lossy(member)
            ),
        }
    }
}

struct ExpectedDisplay<'a>(&'a Option<Bytes>);

impl fmt::Display for ExpectedDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "'{}'", String::from_utf8_lossy(value)),
            None => f.write_str("nothing"),
        }
    }
}

/// A compiled condition: the probe command plus the rule that decides it.
#[derive(Debug, Clone, PartialEq)]
pub struct Probe {
    condition: Condition,
    command: Command,
}

impl Probe {
    /// The condition this probe decides.
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// The read-only command to run against the store.
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Split into condition and command.
    pub fn into_parts(self) -> (Condition, Command) {
        (self.condition, self.command)
    }

    /// Decide the condition from the probe's reply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedReply`] when the reply does not have the
    /// shape the probe command produces.
    pub fn is_satisfied_by(&self, reply: &Reply) -> Result<bool> {
        match &self.condition.kind {
            ConditionKind::KeyExists(target) => present(target, reply),
            ConditionKind::KeyNotExists(target) => present(target, reply).map(|p| !p),
            ConditionKind::ValueEqual(target, expected) => matches_value(target, expected, reply),
            ConditionKind::ValueNotEqual(target, expected) => {
                matches_value(target, expected, reply).map(|m| !m)
            }
            ConditionKind::Length(_, comparison, length) => match reply {
                Reply::Int(n) => Ok(comparison.holds(*n, *length)),
                Reply::Nil => Ok(comparison.holds(0, *length)),
                other => Err(Error::unexpected("integer length", other)),
            },
        }
    }
}

/// Whether the probed target is present.
fn present(target: &Target, reply: &Reply) -> Result<bool> {
    match (target, reply) {
        (Target::Key | Target::HashField(_) | Target::SetMember(_), Reply::Int(n)) => Ok(*n > 0),
        (Target::ListIndex(_) | Target::SortedSetMember(_), reply) => Ok(!reply.is_nil()),
        (_, other) => Err(Error::unexpected("integer existence flag", other)),
    }
}

/// Whether the probed value matches the expectation.
fn matches_value(target: &Target, expected: &Option<Bytes>, reply: &Reply) -> Result<bool> {
    let actual: Option<&[u8]> = match (target, reply) {
        (_, Reply::Nil) => None,
        (Target::SetMember(member), Reply::Int(n)) => (*n > 0).then_some(&member[..]),
        (Target::SortedSetMember(_), Reply::Double(score)) => {
            return Ok(expected
                .as_deref()
                .and_then(parse_float)
                .map_or(false, |e| e == *score));
        }
        (_, Reply::Bulk(b)) => Some(&b[..]),
        (_, other) => return Err(Error::unexpected("bulk value or nil", other)),
    };

    match (target, actual, expected.as_deref()) {
        (_, None, None) => Ok(true),
        (_, None, Some(_)) | (_, Some(_), None) => Ok(false),
        // Scores compare numerically so "1" matches "1.0".
        (Target::SortedSetMember(_), Some(a), Some(e)) => match (parse_float(a), parse_float(e)) {
            (Some(a), Some(e)) => Ok(a == e),
            _ => Ok(a == e),
        },
        (_, Some(a), Some(e)) => Ok(a == e),
    }
}
