//! Direct facades over an executor.
//!
//! [`Database`] answers every command synchronously; [`AsyncDatabase`]
//! answers with futures. Both are stateless handles: cloning shares the
//! executor, and batches or transactions opened from either are bound to
//! the same executor.

use std::fmt;
use std::future::ready;
use std::sync::Arc;

use keyspace_core::{Command, Error, Result};

use crate::batch::Batch;
use crate::dispatch::{Connection, Convert, Dispatch};
use crate::executor::{BoxFuture, Executor};
use crate::transaction::Transaction;

/// Synchronous command surface.
///
/// # Example
///
/// ```ignore
/// use keyspace_executor::prelude::*;
///
/// let db = Database::new(executor);
/// db.set("greeting", "hello")?;
/// assert_eq!(db.get("greeting")?, Some("hello".into()));
/// ```
#[derive(Clone)]
pub struct Database {
    executor: Arc<dyn Executor>,
}

impl Database {
    /// Wrap an executor.
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Database { executor }
    }

    /// The same executor behind the asynchronous surface.
    pub fn to_async(&self) -> AsyncDatabase {
        AsyncDatabase::new(self.executor.clone())
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

impl Dispatch for Database {
    type Output<T: Send + 'static> = Result<T>;

    fn dispatch<T: Send + 'static>(&self, command: Command, convert: Convert<T>) -> Result<T> {
        let reply = self.executor.execute(command)?;
        convert(reply)
    }

    fn fail<T: Send + 'static>(&self, error: Error) -> Result<T> {
        Err(error)
    }
}

impl Connection for Database {
    type Batch = Batch;
    type Transaction = Transaction;

    fn create_batch(&self) -> Result<Batch> {
        Ok(Batch::new(self.executor.clone()))
    }

    fn create_transaction(&self) -> Result<Transaction> {
        Ok(Transaction::new(self.executor.clone()))
    }
}

/// Asynchronous command surface.
///
/// Every command method returns a boxed future. Batches and transactions
/// opened here are the same types as the synchronous ones; submit them with
/// [`Execute::execute_async`](crate::Execute::execute_async).
#[derive(Clone)]
pub struct AsyncDatabase {
    executor: Arc<dyn Executor>,
}

impl AsyncDatabase {
    /// Wrap an executor.
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        AsyncDatabase { executor }
    }

    /// The same executor behind the synchronous surface.
    pub fn to_sync(&self) -> Database {
        Database::new(self.executor.clone())
    }
}

impl fmt::Debug for AsyncDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncDatabase").finish_non_exhaustive()
    }
}

impl Dispatch for AsyncDatabase {
    type Output<T: Send + 'static> = BoxFuture<'static, Result<T>>;

    fn dispatch<T: Send + 'static>(
        &self,
        command: Command,
        convert: Convert<T>,
    ) -> BoxFuture<'static, Result<T>> {
        let fut = self.executor.execute_async(command);
        Box::pin(async move { convert(fut.await?) })
    }

    fn fail<T: Send + 'static>(&self, error: Error) -> BoxFuture<'static, Result<T>> {
        Box::pin(ready(Err(error)))
    }
}

impl Connection for AsyncDatabase {
    type Batch = Batch;
    type Transaction = Transaction;

    fn create_batch(&self) -> Result<Batch> {
        Ok(Batch::new(self.executor.clone()))
    }

    fn create_transaction(&self) -> Result<Transaction> {
        Ok(Transaction::new(self.executor.clone()))
    }
}
