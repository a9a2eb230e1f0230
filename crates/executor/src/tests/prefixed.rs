//! Tests for key namespace virtualization.

use super::{namespaced, recording, sent};
use crate::prelude::*;
use crate::{Arg, GeoUnit, KeyspaceConfig, RedisKey, SortOptions};

#[test]
fn test_scalar_key_is_prefixed() {
    let (exec, tenant) = namespaced();
    tenant.get("user").unwrap();
    assert_eq!(sent(&exec), vec!["GET app:user"]);
}

#[test]
fn test_values_are_not_prefixed() {
    let (exec, tenant) = namespaced();
    tenant.set("k", "k").unwrap();
    tenant.mset([("a", "1"), ("b", "2")]).unwrap();
    assert_eq!(sent(&exec), vec!["SET app:k k", "MSET app:a 1 app:b 2"]);
}

#[test]
fn test_key_array_keeps_length_and_order() {
    let (exec, tenant) = namespaced();
    exec.reply_to("DEL", Reply::Int(3));
    assert_eq!(tenant.del(["c", "a", "b"]).unwrap(), 3);
    assert_eq!(sent(&exec), vec!["DEL app:c app:a app:b"]);
}

#[test]
fn test_keys_pattern_and_reply_decoded() {
    let (exec, tenant) = namespaced();
    exec.reply_to("KEYS", Reply::bulks(["app:a", "app:b"]));
    let keys = tenant.keys("*").unwrap();
    assert_eq!(keys, vec![RedisKey::from("a"), RedisKey::from("b")]);
    assert_eq!(sent(&exec), vec!["KEYS app:*"]);
}

#[test]
fn test_foreign_reply_key_is_invariant_violation() {
    let (exec, tenant) = namespaced();
    exec.reply_to("KEYS", Reply::bulks(["app:a", "other:b"]));
    assert!(matches!(
        tenant.keys("*").unwrap_err(),
        Error::InvariantViolation { .. }
    ));
}

#[test]
fn test_scan_always_scoped() {
    let (exec, tenant) = namespaced();
    exec.reply_to(
        "SCAN",
        Reply::Array(vec![Reply::bulk("7"), Reply::bulks(["app:x"])]),
    );
    let page = tenant.scan(0, None, Some(10)).unwrap();
    assert_eq!(page.cursor, 7);
    assert_eq!(page.items, vec![RedisKey::from("x")]);
    assert_eq!(sent(&exec), vec!["SCAN 0 MATCH app:* COUNT 10"]);
}

#[test]
fn test_random_key_rejected_without_contacting_store() {
    let (exec, tenant) = namespaced();
    let err = tenant.random_key().unwrap_err();
    assert_eq!(
        err,
        Error::UnsupportedInNamespace {
            command: "RANDOMKEY".into()
        }
    );
    assert!(exec.submissions().is_empty());
}

#[test]
fn test_generic_unscoped_names_rejected() {
    let (exec, tenant) = namespaced();
    for name in ["FLUSHDB", "flushall", "SWAPDB", "RANDOMKEY"] {
        let err = tenant.execute_command(name, Vec::new()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedInNamespace { .. }), "{}", name);
    }
    assert!(exec.submissions().is_empty());
}

#[test]
fn test_custom_command_prefixes_only_key_typed_args() {
    let (exec, tenant) = namespaced();
    tenant
        .execute_command(
            "CUSTOM",
            [Arg::from("arg1"), Arg::from(RedisKey::from("arg2"))],
        )
        .unwrap();
    assert_eq!(sent(&exec), vec!["CUSTOM arg1 app:arg2"]);
}

#[test]
fn test_sort_sentinels_pass_through() {
    let (exec, tenant) = namespaced();
    let options = SortOptions {
        by: Some("nosort".into()),
        get: vec!["#".into(), "by".into()],
        ..SortOptions::default()
    };
    tenant.sort("list", &options).unwrap();

    let weighted = SortOptions {
        by: Some("w_*".into()),
        ..SortOptions::default()
    };
    tenant.sort("list", &weighted).unwrap();
    assert_eq!(
        sent(&exec),
        vec![
            "SORT app:list BY nosort GET # GET app:by",
            "SORT app:list BY app:w_*",
        ]
    );
}

#[test]
fn test_sort_store_destination_prefixed() {
    let (exec, tenant) = namespaced();
    exec.reply_to("SORT", Reply::Int(0));
    tenant
        .sort_store("list", &SortOptions::default(), "dst")
        .unwrap();
    assert_eq!(sent(&exec), vec!["SORT app:list STORE app:dst"]);
}

#[test]
fn test_blocking_pop_key_decoded() {
    let (exec, tenant) = namespaced();
    exec.reply_to("BLPOP", Reply::bulks(["app:q2", "job"]));
    let popped = tenant.blpop(["q1", "q2"], 1.5).unwrap().unwrap();
    assert_eq!(popped.key, RedisKey::from("q2"));
    assert_eq!(popped.value, Bytes::from("job"));
    assert_eq!(sent(&exec), vec!["BLPOP app:q1 app:q2 1.5"]);
}

#[test]
fn test_blocking_pop_timeout_is_none() {
    let (_exec, tenant) = namespaced();
    assert_eq!(tenant.brpop(["q"], 0.0).unwrap(), None);
}

#[test]
fn test_numkeys_commands() {
    let (exec, tenant) = namespaced();
    exec.reply_to("SINTERCARD", Reply::Int(1));
    tenant.eval("return KEYS[1]", ["k1", "k2"], ["k3"]).unwrap();
    tenant.sintercard(["a", "b"], Some(5)).unwrap();
    assert_eq!(
        sent(&exec),
        vec![
            "EVAL return KEYS[1] 2 app:k1 app:k2 k3",
            "SINTERCARD 2 app:a app:b LIMIT 5",
        ]
    );
}

#[test]
fn test_stream_read_keys_encoded_and_decoded() {
    let (exec, tenant) = namespaced();
    exec.reply_to(
        "XREAD",
        Reply::Array(vec![Reply::Array(vec![
            Reply::bulk("app:s"),
            Reply::Array(vec![Reply::Array(vec![
                Reply::bulk("1-0"),
                Reply::bulks(["f", "v"]),
            ])]),
        ])]),
    );
    let streams = tenant.xread([("s", "0")], None, None).unwrap();
    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0].key, RedisKey::from("s"));
    assert_eq!(streams[0].entries[0].id, "1-0");
    assert_eq!(sent(&exec), vec!["XREAD STREAMS app:s 0"]);
}

#[test]
fn test_geo_member_named_store_is_not_a_key() {
    let (exec, tenant) = namespaced();
    exec.reply_to("GEORADIUSBYMEMBER", Reply::Array(Vec::new()));
    exec.reply_to_command(
        "GEORADIUSBYMEMBER app:geo STOREDIST 5 km STORE app:dst",
        Reply::Int(2),
    );

    let found = tenant
        .georadiusbymember("geo", "store", 5.0, GeoUnit::Kilometers)
        .unwrap();
    assert!(found.is_empty());
    let stored = tenant
        .georadiusbymember_store("geo", "STOREDIST", 5.0, GeoUnit::Kilometers, "dst")
        .unwrap();
    assert_eq!(stored, 2);
    assert_eq!(
        sent(&exec),
        vec![
            "GEORADIUSBYMEMBER app:geo store 5 km",
            "GEORADIUSBYMEMBER app:geo STOREDIST 5 km STORE app:dst",
        ]
    );
}

#[test]
fn test_group_read_with_consumer_named_streams() {
    let (exec, tenant) = namespaced();
    exec.reply_to("XREADGROUP", Reply::Array(Vec::new()));
    let streams = tenant
        .xreadgroup("g", "streams", [("s", ">")], None, None)
        .unwrap();
    assert!(streams.is_empty());
    assert_eq!(sent(&exec), vec!["XREADGROUP GROUP g streams STREAMS app:s >"]);
}

#[test]
fn test_nested_prefixes_compose() {
    let (exec, db) = recording();
    let inner = db.with_key_prefix("a:").unwrap();
    let outer = inner.with_key_prefix("b:").unwrap();
    exec.reply_to("KEYS", Reply::bulks(["a:b:k"]));

    outer.get("k").unwrap();
    let keys = outer.keys("*").unwrap();
    assert_eq!(keys, vec![RedisKey::from("k")]);
    assert_eq!(sent(&exec), vec!["GET a:b:k", "KEYS a:b:*"]);
}

#[test]
fn test_empty_prefix_rejected() {
    let (_exec, db) = recording();
    assert!(matches!(
        db.with_key_prefix("").unwrap_err(),
        Error::Config { .. }
    ));
}

#[test]
fn test_facades_are_debug() {
    let (_exec, tenant) = namespaced();
    let text = format!("{:?}", tenant);
    assert!(text.contains("KeyPrefixed"));
    assert!(text.contains("Database"));
    assert!(format!("{:?}", tenant.create_batch().unwrap()).contains("Building"));
}

#[test]
fn test_config_applies_extra_unscoped_names() {
    let (exec, db) = recording();
    let config = KeyspaceConfig::from_toml(
        r#"
key_prefix = "cfg:"
unscoped_commands = ["DEBUG"]
"#,
    )
    .unwrap();
    let tenant = config.apply(db).unwrap();

    tenant.get("k").unwrap();
    let err = tenant
        .execute_command("debug", [Arg::from("SLEEP")])
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedInNamespace { .. }));
    assert_eq!(sent(&exec), vec!["GET cfg:k"]);
}

mod prop {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_keys_round_trip_through_namespace(key in "[a-z0-9:_]{1,16}") {
            let (exec, tenant) = namespaced();
            exec.reply_to("KEYS", Reply::bulks([format!("app:{}", key)]));

            tenant.get(key.as_str()).unwrap();
            let keys = tenant.keys("*").unwrap();
            prop_assert_eq!(keys, vec![RedisKey::from(key.as_str())]);
            prop_assert_eq!(sent(&exec)[0].clone(), format!("GET app:{}", key));
        }
    }
}
