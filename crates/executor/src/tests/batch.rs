//! Tests for pipelined batches.

use super::{namespaced, recording, sent};
use crate::prelude::*;
use crate::testing::Recorded;
use crate::{RedisKey, SlotState, UnitStatus};

#[test]
fn test_batch_resolves_in_order() {
    let (exec, db) = recording();
    exec.reply_to_command("GET a", Reply::bulk("1"));
    exec.reply_to_command("GET b", Reply::bulk("2"));

    let batch = db.create_batch().unwrap();
    let mut a = batch.get("a").unwrap();
    let mut b = batch.get("b").unwrap();
    assert_eq!(batch.len(), 2);
    assert!(exec.submissions().is_empty());

    batch.execute().unwrap();
    assert_eq!(batch.status(), UnitStatus::Committed);
    assert_eq!(a.result().unwrap(), Some(Bytes::from("1")));
    assert_eq!(b.result().unwrap(), Some(Bytes::from("2")));
    assert_eq!(
        exec.submissions(),
        vec![Recorded::Batch(exec.commands())]
    );
}

#[test]
fn test_pending_not_ready_before_execute() {
    let (_exec, db) = recording();
    let batch = db.create_batch().unwrap();
    let mut p = batch.ping().unwrap();
    assert_eq!(p.state(), SlotState::Queued);
    assert!(matches!(p.result(), Err(Error::Programming { .. })));
}

#[test]
fn test_per_command_errors_stay_per_command() {
    let (exec, db) = recording();
    exec.error_for(
        "INCR",
        Error::Server {
            message: "WRONGTYPE".into(),
        },
    );
    exec.reply_to("GET", Reply::bulk("v"));

    let batch = db.create_batch().unwrap();
    let mut incr = batch.incr("k").unwrap();
    let mut get = batch.get("k").unwrap();
    batch.execute().unwrap();

    assert!(incr.result().unwrap_err().is_executor_error());
    assert_eq!(get.result().unwrap(), Some(Bytes::from("v")));
}

#[test]
fn test_transport_failure_fails_every_slot() {
    let (exec, db) = recording();
    let reset = Error::Connection {
        reason: "reset".into(),
    };
    exec.fail_next_batch(reset.clone());

    let batch = db.create_batch().unwrap();
    let mut a = batch.get("a").unwrap();
    let mut b = batch.get("b").unwrap();
    assert_eq!(batch.execute().unwrap_err(), reset);
    assert_eq!(batch.status(), UnitStatus::Aborted);
    assert_eq!(a.result().unwrap_err(), reset);
    assert_eq!(b.result().unwrap_err(), reset);
}

#[test]
fn test_double_execute_is_programming_error() {
    let (_exec, db) = recording();
    let batch = db.create_batch().unwrap();
    batch.execute().unwrap();
    assert!(matches!(
        batch.execute().unwrap_err(),
        Error::Programming { .. }
    ));
}

#[test]
fn test_queue_after_execute_is_programming_error() {
    let (_exec, db) = recording();
    let batch = db.create_batch().unwrap();
    batch.execute().unwrap();
    assert!(matches!(
        batch.get("k").unwrap_err(),
        Error::Programming { .. }
    ));
}

#[test]
fn test_batches_do_not_nest() {
    let (_exec, db) = recording();
    let batch = db.create_batch().unwrap();
    assert!(matches!(
        batch.create_batch().err(),
        Some(Error::Programming { .. })
    ));
    assert!(matches!(
        batch.create_transaction().err(),
        Some(Error::Programming { .. })
    ));
}

#[test]
fn test_dropped_batch_cancels_pending() {
    let (exec, db) = recording();
    let batch = db.create_batch().unwrap();
    let mut p = batch.get("k").unwrap();
    drop(batch);
    assert!(p.is_cancelled());
    assert_eq!(p.result().unwrap_err(), Error::Cancelled);
    assert!(exec.submissions().is_empty());
}

#[test]
fn test_prefixed_batch_encodes_and_decodes() {
    let (exec, tenant) = namespaced();
    exec.reply_to("KEYS", Reply::bulks(["app:x"]));

    let batch = tenant.create_batch().unwrap();
    let set = batch.set("x", "1").unwrap();
    let mut keys = batch.keys("*").unwrap();
    batch.execute().unwrap();

    drop(set);
    assert_eq!(keys.result().unwrap(), vec![RedisKey::from("x")]);
    assert_eq!(sent(&exec), vec!["SET app:x 1", "KEYS app:*"]);
}

#[test]
fn test_prefixed_batch_rejects_unscoped_at_queue_time() {
    let (exec, tenant) = namespaced();
    let batch = tenant.create_batch().unwrap();
    assert!(matches!(
        batch.random_key().unwrap_err(),
        Error::UnsupportedInNamespace { .. }
    ));
    batch.execute().unwrap();
    assert_eq!(exec.submissions(), vec![Recorded::Batch(Vec::new())]);
}

#[test]
fn test_dropped_async_execute_aborts() {
    let (_exec, db) = recording();
    let batch = db.create_batch().unwrap();
    let mut p = batch.get("k").unwrap();

    drop(batch.execute_async());
    assert_eq!(batch.status(), UnitStatus::Aborted);
    assert_eq!(p.result().unwrap_err(), Error::Cancelled);
    assert!(matches!(batch.execute(), Err(Error::Programming { .. })));
}
