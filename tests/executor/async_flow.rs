//! The async surface over the in-memory store.

use std::sync::Arc;

use crate::common::*;
use keyspace::prelude::*;
use keyspace::RedisKey;

#[tokio::test]
async fn async_namespace_round_trip() {
    let store = MemoryStore::new();
    let adb = AsyncDatabase::new(store.clone());
    let tenant = adb.with_key_prefix("async:").unwrap();

    tenant.set("k", "v").await.unwrap();
    assert_eq!(tenant.get("k").await.unwrap(), Some(Bytes::from("v")));
    assert_eq!(tenant.keys("*").await.unwrap(), vec![RedisKey::from("k")]);
    assert_eq!(store.raw_keys(), vec!["async:k"]);
}

#[tokio::test]
async fn async_transaction_resolves_awaited_results() {
    let store = MemoryStore::new();
    let adb = AsyncDatabase::new(store.clone());
    let tenant = adb.with_key_prefix("t:").unwrap();

    let tx = tenant.create_transaction().unwrap();
    tx.add_condition(Condition::key_not_exists("lock")).unwrap();
    let lock = tx.set("lock", "me").unwrap();
    let count = tx.incr("count").unwrap();

    assert!(tx.execute_async().await.unwrap());
    lock.await.unwrap();
    assert_eq!(count.await.unwrap(), 1);
}

#[tokio::test]
async fn pending_result_awaited_from_another_task() {
    let store: Arc<MemoryStore> = MemoryStore::new();
    let db = Database::new(store);
    db.set("k", "shared").unwrap();

    let batch = db.create_batch().unwrap();
    let pending = batch.get("k").unwrap();
    let waiter = tokio::spawn(pending);

    batch.execute_async().await.unwrap();
    let value = waiter.await.unwrap().unwrap();
    assert_eq!(value, Some(Bytes::from("shared")));
}
