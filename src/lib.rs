//! Keyspace - key-namespace virtualization for Redis-style clients
//!
//! Keyspace puts a typed command surface in front of any store reachable
//! through an [`Executor`], and lets a caller confine that surface to a key
//! prefix so several tenants can share one physical keyspace.
//!
//! # Quick Start
//!
//! ```ignore
//! use keyspace::prelude::*;
//!
//! let db = Database::new(executor);
//! let tenant = db.with_key_prefix("tenant-a:")?;
//!
//! // Physically `SET tenant-a:user:123 Alice`
//! tenant.set("user:123", "Alice")?;
//!
//! // Keys come back without the prefix
//! let keys = tenant.keys("user:*")?;
//! ```
//!
//! # Architecture
//!
//! Every typed command builds a [`Command`] and hands it to a [`Dispatch`]
//! implementor. [`KeyPrefixed`] rewrites key arguments on the way in and
//! key-bearing replies on the way out. [`Batch`] and [`Transaction`] queue
//! commands and resolve [`Pending`] results when executed.

// Re-export the public API from keyspace-executor
pub use keyspace_executor::*;
