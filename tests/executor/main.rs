//! Executor Layer Tests
//!
//! End-to-end tests for the keyspace facade:
//! - namespaces over a real (in-memory) store
//! - the physical wire form of rewritten commands
//! - conditional transactions and batches
//! - misuse of queued units
//! - the async surface

mod common;

mod async_flow;
mod misuse;
mod namespace;
mod transactions;
mod wire_forms;
