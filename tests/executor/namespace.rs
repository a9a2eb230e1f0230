//! Namespace round trips against the in-memory store.

use crate::common::*;
use keyspace::prelude::*;
use keyspace::RedisKey;

#[test]
fn set_then_get_inside_namespace() {
    let (store, db) = memory_db();
    let tenant = tenant(&db, "app:");

    tenant.set("user:1", "alice").unwrap();
    assert_eq!(tenant.get("user:1").unwrap(), Some(Bytes::from("alice")));
    assert_eq!(store.raw_keys(), vec!["app:user:1"]);

    // The unprefixed facade sees the physical name.
    assert_eq!(db.get("user:1").unwrap(), None);
    assert_eq!(db.get("app:user:1").unwrap(), Some(Bytes::from("alice")));
}

#[test]
fn tenants_are_isolated() {
    let (_store, db) = memory_db();
    let a = tenant(&db, "a:");
    let b = tenant(&db, "b:");

    a.set("counter", "1").unwrap();
    b.set("counter", "2").unwrap();
    a.set("only-a", "x").unwrap();

    assert_eq!(a.get("counter").unwrap(), Some(Bytes::from("1")));
    assert_eq!(b.get("counter").unwrap(), Some(Bytes::from("2")));
    assert_eq!(b.exists(["only-a"]).unwrap(), 0);

    let mut keys = a.keys("*").unwrap();
    keys.sort();
    assert_eq!(keys, vec![RedisKey::from("counter"), RedisKey::from("only-a")]);
    assert_eq!(b.keys("*").unwrap(), vec![RedisKey::from("counter")]);
}

#[test]
fn keys_pattern_is_scoped_and_decoded() {
    let (_store, db) = memory_db();
    db.set("user:outside", "x").unwrap();
    let tenant = tenant(&db, "app:");
    tenant.set("user:1", "a").unwrap();
    tenant.set("user:2", "b").unwrap();
    tenant.set("order:1", "c").unwrap();

    let mut keys = tenant.keys("user:*").unwrap();
    keys.sort();
    assert_eq!(keys, vec![RedisKey::from("user:1"), RedisKey::from("user:2")]);
}

#[test]
fn multi_key_commands_round_trip() {
    let (store, db) = memory_db();
    let tenant = tenant(&db, "t:");

    tenant.mset([("a", "1"), ("b", "2")]).unwrap();
    let values = tenant.mget(["a", "missing", "b"]).unwrap();
    assert_eq!(
        values,
        vec![Some(Bytes::from("1")), None, Some(Bytes::from("2"))]
    );
    assert_eq!(tenant.del(["a", "b", "missing"]).unwrap(), 2);
    assert!(store.raw_keys().is_empty());
}

#[test]
fn values_are_never_prefixed() {
    let (_store, db) = memory_db();
    let tenant = tenant(&db, "app:");
    tenant.rpush("queue", ["job:1", "job:2"]).unwrap();
    tenant.hset("h", "field", "user:1").unwrap();

    assert_eq!(
        tenant.lrange("queue", 0, -1).unwrap(),
        vec![Bytes::from("job:1"), Bytes::from("job:2")]
    );
    assert_eq!(tenant.hget("h", "field").unwrap(), Some(Bytes::from("user:1")));
}

#[test]
fn nested_namespaces_compose() {
    let (store, db) = memory_db();
    let inner = tenant(&db, "outer:").with_key_prefix("inner:").unwrap();

    inner.set("k", "v").unwrap();
    assert_eq!(store.raw_keys(), vec!["outer:inner:k"]);
    assert_eq!(inner.keys("*").unwrap(), vec![RedisKey::from("k")]);
}

#[test]
fn random_key_is_refused_inside_namespace() {
    let (_store, db) = memory_db();
    db.set("elsewhere", "x").unwrap();
    let tenant = tenant(&db, "app:");

    let err = tenant.random_key().unwrap_err();
    assert!(matches!(err, Error::UnsupportedInNamespace { .. }));
    // Outside a namespace the command is passed through.
    assert_eq!(db.random_key().unwrap(), Some(RedisKey::from("elsewhere")));
}

#[test]
fn config_file_builds_a_namespace() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("keyspace.toml");
    std::fs::write(&path, "key_prefix = \"cfg:\"\n").unwrap();

    let (store, db) = memory_db();
    let config = keyspace::KeyspaceConfig::from_file(&path).unwrap();
    let tenant = config.apply(db).unwrap();
    tenant.incr("hits").unwrap();
    assert_eq!(tenant.incr("hits").unwrap(), 2);
    assert_eq!(store.raw_keys(), vec!["cfg:hits"]);
}
