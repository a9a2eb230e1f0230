//! Physical command forms produced by a namespace.

use crate::common::*;
use keyspace::prelude::*;
use keyspace::{Arg, RedisKey, SortOptions};

#[test]
fn sort_sentinels_are_left_alone() {
    let (exec, db) = recording_db();
    let tenant = tenant(&db, "prefix:");

    let options = SortOptions {
        by: Some("nosort".into()),
        get: vec!["#".into(), "by".into()],
        ..SortOptions::default()
    };
    tenant.sort("list", &options).unwrap();
    assert_eq!(
        sent(&exec),
        vec!["SORT prefix:list BY nosort GET # GET prefix:by"]
    );
}

#[test]
fn custom_command_prefixes_keys_by_table() {
    let (exec, db) = recording_db();
    let tenant = tenant(&db, "prefix:");

    tenant
        .execute_command("CUSTOM", [Arg::from("arg1"), Arg::from(RedisKey::from("arg2"))])
        .unwrap();
    assert_eq!(sent(&exec), vec!["CUSTOM arg1 prefix:arg2"]);
}

#[test]
fn generic_path_prefixes_only_key_typed_arguments() {
    let (exec, db) = recording_db();
    let tenant = tenant(&db, "prefix:");

    tenant
        .execute_command("SET", [Arg::from(RedisKey::from("k")), Arg::from("v")])
        .unwrap();
    tenant
        .execute_command("SET", [Arg::from("raw"), Arg::from("v")])
        .unwrap();
    assert_eq!(sent(&exec), vec!["SET prefix:k v", "SET raw v"]);
}

#[test]
fn randomkey_never_reaches_the_executor() {
    let (exec, db) = recording_db();
    let tenant = tenant(&db, "prefix:");

    assert!(tenant.random_key().is_err());
    assert!(tenant.execute_command("RANDOMKEY", Vec::<Arg>::new()).is_err());
    assert!(exec.submissions().is_empty());
}

#[test]
fn scan_is_always_scoped() {
    let (exec, db) = recording_db();
    exec.reply_to(
        "SCAN",
        Reply::Array(vec![Reply::bulk("0"), Reply::bulks(["prefix:a"])]),
    );
    let tenant = tenant(&db, "prefix:");

    let page = tenant.scan(0, None, Some(10)).unwrap();
    assert_eq!(page.items, vec![RedisKey::from("a")]);
    assert_eq!(sent(&exec), vec!["SCAN 0 MATCH prefix:* COUNT 10"]);
}

#[test]
fn blocking_pop_decodes_the_key() {
    let (exec, db) = recording_db();
    exec.reply_to("BLPOP", Reply::bulks(["prefix:jobs", "payload"]));
    let tenant = tenant(&db, "prefix:");

    let popped = tenant.blpop(["jobs", "other"], 1.0).unwrap().unwrap();
    assert_eq!(popped.key, RedisKey::from("jobs"));
    assert_eq!(popped.value, Bytes::from("payload"));
    assert_eq!(sent(&exec), vec!["BLPOP prefix:jobs prefix:other 1"]);
}

#[test]
fn eval_prefixes_only_declared_keys() {
    let (exec, db) = recording_db();
    let tenant = tenant(&db, "prefix:");

    tenant
        .eval("return KEYS[2]", ["k1", "k2"], ["notakey"])
        .unwrap();
    assert_eq!(
        sent(&exec),
        vec!["EVAL return KEYS[2] 2 prefix:k1 prefix:k2 notakey"]
    );
}
