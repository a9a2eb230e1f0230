//! Core types for keyspace
//!
//! This crate defines the leaf types shared by every facade layer:
//! - RedisKey: byte key as seen by callers and by the store
//! - Arg / Reply: closed sets of argument and reply shapes
//! - Signature / ArgumentRole / ReplyShape: per-operation key metadata
//! - CommandKind / Command: the operation table and a queued command
//! - KeyCodec: prefix encode/decode plus command and reply rewriting
//! - Condition / Probe: read-only assertions gating a transaction
//! - Error: the error taxonomy shared with the executor layer

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod command;
pub mod condition;
pub mod error;
pub mod key;
pub mod signature;
pub mod value;

pub use codec::{KeyCodec, UNSCOPED_COMMANDS};
pub use command::{Command, CommandKind};
pub use condition::{Comparison, Condition, ConditionKind, Measure, Probe, Target};
pub use error::{Error, Result};
pub use key::RedisKey;
pub use signature::{ArgumentRole, ReplyShape, Signature, Tail};
pub use value::{Arg, Reply};

/// Re-exported so callers can build values without a direct `bytes` dependency.
pub use bytes::Bytes;
