//! Routing primitives shared by every facade.
//!
//! Every typed command method in [`crate::api`] is written once, against
//! [`Dispatch`]. What a call returns is decided by the implementor through
//! the generic associated type [`Dispatch::Output`]:
//!
//! | Implementor | `Output<T>` |
//! |-------------|-------------|
//! | [`Database`](crate::Database) | `Result<T>` |
//! | [`AsyncDatabase`](crate::AsyncDatabase) | `BoxFuture<'static, Result<T>>` |
//! | [`Batch`](crate::Batch), [`Transaction`](crate::Transaction) | `Result<Pending<T>>` |
//! | [`KeyPrefixed<D>`](crate::KeyPrefixed) | `D::Output<T>` |

use keyspace_core::{Arg, Command, Condition, Error, Reply, Result};

use crate::convert::FromReply;
use crate::executor::BoxFuture;
use crate::transaction::ConditionResult;

/// Deferred conversion applied to a command's reply.
pub type Convert<T> = Box<dyn FnOnce(Reply) -> Result<T> + Send>;

/// One routing primitive for the whole command surface.
pub trait Dispatch {
    /// What a command call produces for a result of type `T`.
    type Output<T: Send + 'static>;

    /// Route `command`; `convert` turns its eventual reply into a `T`.
    fn dispatch<T: Send + 'static>(&self, command: Command, convert: Convert<T>)
        -> Self::Output<T>;

    /// An output that fails with `error` without contacting the store.
    fn fail<T: Send + 'static>(&self, error: Error) -> Self::Output<T>;

    /// Route `command`, converting the reply with [`FromReply`].
    fn send<T: FromReply>(&self, command: Command) -> Self::Output<T> {
        self.dispatch(command, Box::new(T::from_reply))
    }

    /// Route `command` with a custom conversion.
    fn send_with<T, F>(&self, command: Command, convert: F) -> Self::Output<T>
    where
        T: Send + 'static,
        F: FnOnce(Reply) -> Result<T> + Send + 'static,
    {
        self.dispatch(command, Box::new(convert))
    }

    /// Generic entry point: an arbitrary command by name.
    ///
    /// Keys are identified by runtime type: every [`Arg::Key`] is a key,
    /// every other argument is opaque.
    fn execute_command<I>(&self, name: &str, args: I) -> Self::Output<Reply>
    where
        I: IntoIterator<Item = Arg>,
    {
        self.send::<Reply>(Command::custom(name, args))
    }
}

/// A dispatcher that can open batches and transactions.
///
/// Batches and transactions do not nest: calling either method on a batch
/// or transaction fails with [`Error::Programming`].
pub trait Connection: Dispatch {
    /// Batch type produced by this connection.
    type Batch: Dispatch + Execute<Outcome = ()>;
    /// Transaction type produced by this connection.
    type Transaction: Dispatch + Execute<Outcome = bool> + Conditional;

    /// Open a pipelined batch.
    fn create_batch(&self) -> Result<Self::Batch>;

    /// Open a conditional transaction.
    fn create_transaction(&self) -> Result<Self::Transaction>;
}

/// A unit of queued work that can be submitted once.
pub trait Execute {
    /// What a successful submission reports.
    type Outcome: Send + 'static;

    /// Submit the unit and wait for it to settle.
    fn execute(&self) -> Result<Self::Outcome>;

    /// Submit the unit; the future settles with it.
    fn execute_async(&self) -> BoxFuture<'static, Result<Self::Outcome>>;
}

/// A unit that accepts conditions.
pub trait Conditional {
    /// Attach a condition; only valid before the unit is executed.
    fn add_condition(&self, condition: Condition) -> Result<ConditionResult>;
}
