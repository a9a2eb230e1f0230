//! Per-operation key metadata
//!
//! Every operation in the command table carries a [`Signature`]: the roles
//! of its leading positional arguments plus a [`Tail`] rule describing how
//! the remaining arguments are classified. One classification routine,
//! [`Signature::classify`], turns a concrete argument list into one
//! [`ArgumentRole`] per argument. The codec then transforms only the
//! key-bearing positions.
//!
//! The roles collapse the shapes a key can take in a signature:
//!
//! | Shape | Expressed as |
//! |-------|--------------|
//! | scalar key | `ArgumentRole::Key` in `fixed` |
//! | key array | `Tail::Keys`, `Tail::KeysExceptLast`, `Tail::NumKeys` |
//! | key half of a pair | `Tail::Groups(&[Key, Opaque])` |
//! | stream-position key | `Tail::Streams` |
//! | pattern token | `ArgumentRole::Pattern(sentinels)` |
//!
//! Arrays are never resized: classification yields exactly one role per
//! argument.

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::value::Arg;

/// How a single argument is treated by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentRole {
    /// Key reference: always prefixed
    Key,
    /// Key reference unless it equals one of the registered sentinels,
    /// which pass through verbatim
    Pattern(&'static [&'static str]),
    /// Never transformed
    Opaque,
}

impl ArgumentRole {
    /// Whether this role may carry a key.
    pub fn is_key_bearing(&self) -> bool {
        !matches!(self, ArgumentRole::Opaque)
    }
}

/// Classification rule for arguments past the fixed slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tail {
    /// Remaining arguments are opaque
    Opaque,
    /// Remaining arguments are all keys
    Keys,
    /// Remaining arguments are keys except the last `n` (blocking timeouts)
    KeysExceptLast(usize),
    /// Remaining arguments repeat the given group of roles
    Groups(&'static [ArgumentRole]),
    /// A key count followed by that many keys; the rest is opaque
    NumKeys,
    /// Opaque until the `STREAMS` keyword, then N keys followed by N ids
    Streams,
    /// Opaque, except that each listed keyword gives the following
    /// argument the paired role
    Options(&'static [(&'static str, ArgumentRole)]),
}

/// Argument metadata of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Roles of the leading positional arguments
    pub fixed: &'static [ArgumentRole],
    /// Rule for everything after `fixed`
    pub tail: Tail,
}

/// Per-argument classification result; most commands fit inline.
pub type Roles = SmallVec<[ArgumentRole; 8]>;

impl Signature {
    /// Signature with fixed slots and a tail rule.
    pub const fn new(fixed: &'static [ArgumentRole], tail: Tail) -> Self {
        Signature { fixed, tail }
    }

    /// Fixed slots followed by opaque arguments.
    pub const fn fixed(fixed: &'static [ArgumentRole]) -> Self {
        Signature {
            fixed,
            tail: Tail::Opaque,
        }
    }

    /// One key followed by opaque arguments; the most common shape.
    pub const fn key() -> Self {
        Signature {
            fixed: &[ArgumentRole::Key],
            tail: Tail::Opaque,
        }
    }

    /// No key-bearing arguments at all.
    pub const fn none() -> Self {
        Signature {
            fixed: &[],
            tail: Tail::Opaque,
        }
    }

    /// Classify `args` into one role per argument.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Programming`] when the arguments cannot fit the
    /// signature: a key count that is not an integer or exceeds the
    /// argument list, a stream read without `STREAMS`, or an odd number of
    /// stream arguments.
    pub fn classify(&self, command: &str, args: &[Arg]) -> Result<Roles> {
        let mut roles = Roles::with_capacity(args.len());
        let fixed = self.fixed.len().min(args.len());
        roles.extend_from_slice(&self.fixed[..fixed]);
        let rest = &args[fixed..];

        match self.tail {
            Tail::Opaque => push_n(&mut roles, ArgumentRole::Opaque, rest.len()),
            Tail::Keys => push_n(&mut roles, ArgumentRole::Key, rest.len()),
            Tail::KeysExceptLast(n) => {
                let keys = rest.len().saturating_sub(n);
                push_n(&mut roles, ArgumentRole::Key, keys);
                push_n(&mut roles, ArgumentRole::Opaque, rest.len() - keys);
            }
            Tail::Groups([]) => push_n(&mut roles, ArgumentRole::Opaque, rest.len()),
            Tail::Groups(group) => {
                for i in 0..rest.len() {
                    roles.push(group[i % group.len()]);
                }
            }
            Tail::NumKeys => {
                if let Some(count) = rest.first() {
                    let n = count
                        .as_int()
                        .filter(|n| *n >= 0)
                        .map(|n| n as usize)
                        .ok_or_else(|| {
                            Error::programming(format!(
                                "{}: key count must be a non-negative integer, got {}",
                                command, count
                            ))
                        })?;
                    if n > rest.len() - 1 {
                        return Err(Error::programming(format!(
                            "{}: key count {} exceeds the {} arguments supplied",
                            command,
                            n,
                            rest.len() - 1
                        )));
                    }
                    roles.push(ArgumentRole::Opaque);
                    push_n(&mut roles, ArgumentRole::Key, n);
                    push_n(&mut roles, ArgumentRole::Opaque, rest.len() - 1 - n);
                }
            }
            Tail::Streams => {
                let at = rest
                    .iter()
                    .position(|a| a.is_token("STREAMS"))
                    .ok_or_else(|| Error::programming(format!("{}: missing STREAMS", command)))?;
                let pairs = rest.len() - at - 1;
                if pairs % 2 != 0 {
                    return Err(Error::programming(format!(
                        "{}: STREAMS needs one id per key, got {} arguments",
                        command, pairs
                    )));
                }
                push_n(&mut roles, ArgumentRole::Opaque, at + 1);
                push_n(&mut roles, ArgumentRole::Key, pairs / 2);
                push_n(&mut roles, ArgumentRole::Opaque, pairs / 2);
            }
            Tail::Options(options) => {
                let mut pending: Option<ArgumentRole> = None;
                for arg in rest {
                    if let Some(role) = pending.take() {
                        roles.push(role);
                        continue;
                    }
                    roles.push(ArgumentRole::Opaque);
                    pending = options
                        .iter()
                        .find(|(word, _)| arg.is_token(word))
                        .map(|(_, role)| *role);
                }
            }
        }

        debug_assert_eq!(roles.len(), args.len());
        Ok(roles)
    }
}

fn push_n(roles: &mut Roles, role: ArgumentRole, n: usize) {
    roles.extend(std::iter::repeat(role).take(n));
}

/// Where keys appear in an operation's reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyShape {
    /// No keys in the reply
    Plain,
    /// A single key or nil
    Key,
    /// An array of keys
    Keys,
    /// An array whose first element is the key the reply came from
    KeyedHead,
    /// An array of `[key, payload]` pairs (multi-stream reads)
    KeyedEntries,
    /// `[cursor, [keys...]]`
    ScanPage,
    /// The store picks a key from the whole keyspace; cannot be scoped
    Unscoped,
}
