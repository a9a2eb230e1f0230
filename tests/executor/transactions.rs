//! Transactions and batches against the in-memory store.

use crate::common::*;
use keyspace::prelude::*;
use keyspace::{Measure, RedisKey, SlotState, UnitStatus};

#[test]
fn committed_transaction_applies_in_order() {
    let (_store, db) = memory_db();
    let tx = db.create_transaction().unwrap();
    let mut first = tx.incr("n").unwrap();
    let mut second = tx.incr("n").unwrap();
    let mut read = tx.get("n").unwrap();

    assert!(tx.execute().unwrap());
    assert_eq!(first.result().unwrap(), 1);
    assert_eq!(second.result().unwrap(), 2);
    assert_eq!(read.result().unwrap(), Some(Bytes::from("2")));
}

#[test]
fn failed_condition_leaves_store_untouched() {
    let (store, db) = memory_db();
    db.set("lock", "held").unwrap();

    let tx = db.create_transaction().unwrap();
    let guard = tx.add_condition(Condition::key_not_exists("lock")).unwrap();
    let mut write = tx.set("data", "x").unwrap();

    assert!(!tx.execute().unwrap());
    assert_eq!(guard.was_satisfied(), Some(false));
    assert_eq!(write.state(), SlotState::Cancelled);
    assert_eq!(write.result().unwrap_err(), Error::Cancelled);
    assert_eq!(store.raw_keys(), vec!["lock"]);
}

#[test]
fn every_condition_must_hold() {
    let (_store, db) = memory_db();
    db.set("version", "3").unwrap();
    db.rpush("items", ["a", "b"]).unwrap();

    let tx = db.create_transaction().unwrap();
    let version = tx.add_condition(Condition::string_equal("version", "3")).unwrap();
    let short = tx
        .add_condition(Condition::length_less_than("items", Measure::ListLength, 2))
        .unwrap();
    tx.set("version", "4").unwrap();

    assert!(!tx.execute().unwrap());
    assert_eq!(version.was_satisfied(), Some(false));
    assert_eq!(short.was_satisfied(), Some(false));
    assert_eq!(db.get("version").unwrap(), Some(Bytes::from("3")));
}

#[test]
fn prefixed_conditions_probe_physical_keys() {
    let (store, db) = memory_db();
    let tenant = tenant(&db, "app:");
    tenant.hset("user", "name", "alice").unwrap();
    // Same logical name outside the namespace must not satisfy the probe.
    db.set("flag", "1").unwrap();

    let tx = tenant.create_transaction().unwrap();
    let has_name = tx.add_condition(Condition::hash_exists("user", "name")).unwrap();
    let no_flag = tx.add_condition(Condition::key_not_exists("flag")).unwrap();
    let mut set = tx.set("flag", "2").unwrap();

    assert!(tx.execute().unwrap());
    assert_eq!(has_name.was_satisfied(), Some(true));
    assert_eq!(no_flag.was_satisfied(), Some(true));
    assert_eq!(has_name.condition().key(), &RedisKey::from("user"));
    set.result().unwrap();
    assert_eq!(store.raw_keys(), vec!["app:flag", "app:user", "flag"]);
}

#[test]
fn prefixed_transaction_recorded_wire_form() {
    let (exec, db) = recording_db();
    exec.reply_to("HEXISTS", Reply::Int(1));
    let tenant = tenant(&db, "app:");

    let tx = tenant.create_transaction().unwrap();
    tx.add_condition(Condition::hash_exists("user", "name")).unwrap();
    tx.del(["user"]).unwrap();
    assert!(tx.execute().unwrap());

    let probes: Vec<String> = exec.probes().iter().map(|p| p.command().to_string()).collect();
    assert_eq!(probes, vec!["HEXISTS app:user name"]);
    assert_eq!(sent(&exec), vec!["DEL app:user"]);
}

#[test]
fn batch_results_follow_queue_order() {
    let (_store, db) = memory_db();
    let tenant = tenant(&db, "b:");
    let batch = tenant.create_batch().unwrap();
    let mut pushed = batch.rpush("q", ["1", "2", "3"]).unwrap();
    let mut len = batch.llen("q").unwrap();
    let mut keys = batch.keys("*").unwrap();

    assert_eq!(len.state(), SlotState::Queued);
    batch.execute().unwrap();
    assert_eq!(pushed.result().unwrap(), 3);
    assert_eq!(len.result().unwrap(), 3);
    assert_eq!(keys.result().unwrap(), vec![RedisKey::from("q")]);
}

#[test]
fn batch_command_errors_are_isolated() {
    let (_store, db) = memory_db();
    db.rpush("list", ["x"]).unwrap();

    let batch = db.create_batch().unwrap();
    let mut bad = batch.incr("list").unwrap();
    let mut good = batch.incr("counter").unwrap();
    batch.execute().unwrap();

    assert!(matches!(bad.result(), Err(Error::Server { .. })));
    assert_eq!(good.result().unwrap(), 1);
}

#[test]
fn empty_transaction_commits() {
    let (_store, db) = memory_db();
    let tx = db.create_transaction().unwrap();
    assert!(tx.is_empty());
    assert!(tx.execute().unwrap());
    assert_eq!(tx.status(), UnitStatus::Committed);
}
