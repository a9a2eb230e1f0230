//! Misuse of batches and transactions.

use crate::common::*;
use keyspace::prelude::*;

fn is_programming(err: &Error) -> bool {
    matches!(err, Error::Programming { .. })
}

#[test]
fn result_before_execute_is_an_error() {
    let (_store, db) = memory_db();
    let batch = db.create_batch().unwrap();
    let mut get = batch.get("k").unwrap();
    assert!(is_programming(&get.result().unwrap_err()));
}

#[test]
fn transaction_executes_once() {
    let (_store, db) = memory_db();
    let tx = db.create_transaction().unwrap();
    tx.set("k", "v").unwrap();
    assert!(tx.execute().unwrap());
    assert!(is_programming(&tx.execute().unwrap_err()));
    assert!(is_programming(&tx.get("k").unwrap_err()));
    assert!(is_programming(
        &tx.add_condition(Condition::key_exists("k")).unwrap_err()
    ));
}

#[test]
fn units_do_not_nest() {
    let (_store, db) = memory_db();
    let tenant = tenant(&db, "app:");
    let batch = tenant.create_batch().unwrap();
    let tx = tenant.create_transaction().unwrap();

    assert!(is_programming(&batch.create_batch().err().unwrap()));
    assert!(is_programming(&batch.create_transaction().err().unwrap()));
    assert!(is_programming(&tx.create_batch().err().unwrap()));
    assert!(is_programming(&tx.create_transaction().err().unwrap()));
}

#[test]
fn unscoped_command_rejected_when_queued() {
    let (store, db) = memory_db();
    db.set("outside", "x").unwrap();
    let tenant = tenant(&db, "app:");
    let tx = tenant.create_transaction().unwrap();

    let err = tx.random_key().unwrap_err();
    assert!(matches!(err, Error::UnsupportedInNamespace { .. }));
    assert!(tx.execute().unwrap());
    assert_eq!(store.raw_keys(), vec!["outside"]);
}

#[test]
fn empty_prefix_is_refused() {
    let (_store, db) = memory_db();
    assert!(matches!(
        db.with_key_prefix("").err().unwrap(),
        Error::Config { .. }
    ));
}

#[test]
fn dropped_batch_cancels_its_results() {
    let (store, db) = memory_db();
    let batch = db.create_batch().unwrap();
    let mut set = batch.set("k", "v").unwrap();
    drop(batch);

    assert_eq!(set.result().unwrap_err(), Error::Cancelled);
    assert!(store.raw_keys().is_empty());
}
