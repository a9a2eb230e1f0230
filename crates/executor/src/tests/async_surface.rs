//! Tests for the asynchronous surface.

use super::{recording, sent};
use crate::prelude::*;
use crate::RedisKey;

#[tokio::test]
async fn test_async_get() {
    let (exec, db) = recording();
    exec.reply_to("GET", Reply::bulk("v"));
    let adb = db.to_async();
    assert_eq!(adb.get("k").await.unwrap(), Some(Bytes::from("v")));
    assert_eq!(sent(&exec), vec!["GET k"]);
}

#[tokio::test]
async fn test_async_prefixed_decodes() {
    let (exec, db) = recording();
    exec.reply_to("KEYS", Reply::bulks(["app:x"]));
    let tenant = db.to_async().with_key_prefix("app:").unwrap();
    let keys = tenant.keys("*").await.unwrap();
    assert_eq!(keys, vec![RedisKey::from("x")]);
    assert_eq!(sent(&exec), vec!["KEYS app:*"]);
}

#[tokio::test]
async fn test_async_rejection_is_ready_error() {
    let (exec, db) = recording();
    let tenant = db.to_async().with_key_prefix("app:").unwrap();
    let err = tenant.random_key().await.unwrap_err();
    assert!(matches!(err, Error::UnsupportedInNamespace { .. }));
    assert!(exec.submissions().is_empty());
}

#[tokio::test]
async fn test_async_transaction_pending_awaited() {
    let (exec, db) = recording();
    exec.reply_to("INCR", Reply::Int(9));
    let adb = db.to_async();

    let tx = adb.create_transaction().unwrap();
    let counter = tx.incr("c").unwrap();
    assert!(tx.execute_async().await.unwrap());
    assert_eq!(counter.await.unwrap(), 9);
}

#[tokio::test]
async fn test_async_batch() {
    let (exec, db) = recording();
    exec.reply_to("ECHO", Reply::bulk("hi"));
    let batch = db.to_async().create_batch().unwrap();
    let echo = batch.echo("hi").unwrap();
    batch.execute_async().await.unwrap();
    assert_eq!(echo.await.unwrap(), Bytes::from("hi"));
    assert!(batch.execute_async().await.is_err());
}

#[tokio::test]
async fn test_pending_awaits_settlement_from_another_task() {
    let (exec, db) = recording();
    exec.reply_to("GET", Reply::bulk("late"));
    let tx = db.create_transaction().unwrap();
    let pending = tx.get("k").unwrap();

    let waiter = tokio::spawn(pending);
    tokio::task::yield_now().await;
    assert!(tx.execute().unwrap());
    assert_eq!(waiter.await.unwrap().unwrap(), Some(Bytes::from("late")));
}
