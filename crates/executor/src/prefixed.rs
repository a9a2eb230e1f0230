//! The virtualizing decorator.
//!
//! [`KeyPrefixed<D>`] wraps any [`Dispatch`] implementation and confines it
//! to one key namespace. On the way in, every key-bearing argument is
//! encoded by the [`KeyCodec`]; on the way out, every key in the reply is
//! decoded before the caller's conversion runs. Batches and transactions
//! opened through it are wrapped with the same codec, so the namespace
//! holds for queued work too.
//!
//! Decorators compose: `KeyPrefixed<KeyPrefixed<D>>` stores keys as
//! `inner_prefix ++ outer_prefix ++ key`.
//!
//! Rejections (unscoped commands, malformed arguments) never reach the
//! store: they come back through the inner facade's own error path, so a
//! rejected call on a transaction fails at queue time.

use bytes::Bytes;
use keyspace_core::{Command, Condition, Error, KeyCodec, Result};

use crate::dispatch::{Conditional, Connection, Convert, Dispatch, Execute};
use crate::executor::BoxFuture;
use crate::transaction::ConditionResult;

/// A facade confined to one key namespace.
#[derive(Debug, Clone)]
pub struct KeyPrefixed<D> {
    inner: D,
    codec: KeyCodec,
}

impl<D> KeyPrefixed<D> {
    /// Wrap `inner` with `codec`.
    pub fn new(inner: D, codec: KeyCodec) -> Self {
        KeyPrefixed { inner, codec }
    }

    /// The codec applied by this layer.
    pub fn codec(&self) -> &KeyCodec {
        &self.codec
    }
}

impl<D: Dispatch> Dispatch for KeyPrefixed<D> {
    type Output<T: Send + 'static> = D::Output<T>;

    fn dispatch<T: Send + 'static>(&self, command: Command, convert: Convert<T>) -> D::Output<T> {
        let shape = command.reply_shape();
        let command = match self.codec.encode_command(command) {
            Ok(command) => command,
            Err(e) => return self.inner.fail::<T>(e),
        };
        let codec = self.codec.clone();
        self.inner.dispatch(
            command,
            Box::new(move |reply| convert(codec.decode_reply(shape, reply)?)),
        )
    }

    fn fail<T: Send + 'static>(&self, error: Error) -> D::Output<T> {
        self.inner.fail::<T>(error)
    }
}

impl<D: Connection> Connection for KeyPrefixed<D> {
    type Batch = KeyPrefixed<D::Batch>;
    type Transaction = KeyPrefixed<D::Transaction>;

    fn create_batch(&self) -> Result<Self::Batch> {
        Ok(KeyPrefixed::new(self.inner.create_batch()?, self.codec.clone()))
    }

    fn create_transaction(&self) -> Result<Self::Transaction> {
        Ok(KeyPrefixed::new(
            self.inner.create_transaction()?,
            self.codec.clone(),
        ))
    }
}

impl<D: Execute> Execute for KeyPrefixed<D> {
    type Outcome = D::Outcome;

    fn execute(&self) -> Result<D::Outcome> {
        self.inner.execute()
    }

    fn execute_async(&self) -> BoxFuture<'static, Result<D::Outcome>> {
        self.inner.execute_async()
    }
}

impl<D: Conditional> Conditional for KeyPrefixed<D> {
    /// The condition's key is rewritten into the namespace; the returned
    /// result still reports the condition as the caller wrote it.
    fn add_condition(&self, condition: Condition) -> Result<ConditionResult> {
        let encoded = self.codec.encode_condition(condition.clone());
        let result = self.inner.add_condition(encoded)?;
        Ok(result.relabel(condition))
    }
}

/// Confine any dispatcher to a key namespace.
pub trait WithKeyPrefix: Dispatch + Sized {
    /// Wrap `self` so every key is stored under `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an empty prefix.
    fn with_key_prefix(self, prefix: impl Into<Bytes>) -> Result<KeyPrefixed<Self>> {
        Ok(KeyPrefixed::new(self, KeyCodec::new(prefix)?))
    }
}

impl<D: Dispatch> WithKeyPrefix for D {}
