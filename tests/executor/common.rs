//! Common test utilities for executor tests

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;

use keyspace::testing::RecordingExecutor;
use keyspace::{
    Arg, Command, CommitVerdict, Database, Error, Executor, KeyPrefixed, Probe, Reply, Result,
    WithKeyPrefix,
};

#[derive(Debug, Clone)]
enum Value {
    Str(Bytes),
    List(VecDeque<Bytes>),
    Hash(BTreeMap<Bytes, Bytes>),
}

/// A tiny in-memory store speaking a subset of the command set.
///
/// Commits hold the store lock for probes and commands together, so a
/// commit is atomic with respect to every other call.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<BTreeMap<Bytes, Value>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Physical key names, sorted.
    pub fn raw_keys(&self) -> Vec<String> {
        self.data
            .lock()
            .keys()
            .map(|k| String::from_utf8_lossy(k).into_owned())
            .collect()
    }
}

fn wrongtype() -> Error {
    Error::Server {
        message: "WRONGTYPE Operation against a key holding the wrong kind of value".into(),
    }
}

fn parse_int(b: &Bytes) -> Result<i64> {
    std::str::from_utf8(b)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::Server {
            message: "ERR value is not an integer or out of range".into(),
        })
}

fn glob(pattern: &[u8], text: &[u8]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some((b'*', rest)) => (0..=text.len()).any(|i| glob(rest, &text[i..])),
        Some((b'?', rest)) => !text.is_empty() && glob(rest, &text[1..]),
        Some((c, rest)) => text.first() == Some(c) && glob(rest, &text[1..]),
    }
}

fn apply(data: &mut BTreeMap<Bytes, Value>, command: &Command) -> Result<Reply> {
    let name = command.name().to_ascii_uppercase();
    let args: Vec<Bytes> = command.arguments().iter().map(Arg::to_bytes).collect();
    match (name.as_str(), args.as_slice()) {
        ("PING", []) => Ok(Reply::Status("PONG".into())),
        ("GET", [k]) => match data.get(k) {
            None => Ok(Reply::Nil),
            Some(Value::Str(v)) => Ok(Reply::Bulk(v.clone())),
            Some(_) => Err(wrongtype()),
        },
        ("SET", [k, v]) => {
            data.insert(k.clone(), Value::Str(v.clone()));
            Ok(Reply::ok())
        }
        ("MSET", pairs) if !pairs.is_empty() && pairs.len() % 2 == 0 => {
            for pair in pairs.chunks(2) {
                data.insert(pair[0].clone(), Value::Str(pair[1].clone()));
            }
            Ok(Reply::ok())
        }
        ("MGET", keys) => Ok(Reply::Array(
            keys.iter()
                .map(|k| match data.get(k) {
                    Some(Value::Str(v)) => Reply::Bulk(v.clone()),
                    _ => Reply::Nil,
                })
                .collect(),
        )),
        ("DEL", keys) => Ok(Reply::Int(
            keys.iter().filter(|k| data.remove(*k).is_some()).count() as i64,
        )),
        ("EXISTS", keys) => Ok(Reply::Int(
            keys.iter().filter(|k| data.contains_key(*k)).count() as i64,
        )),
        ("INCR", [k]) => {
            let current = match data.get(k) {
                None => 0,
                Some(Value::Str(v)) => parse_int(v)?,
                Some(_) => return Err(wrongtype()),
            };
            let next = current + 1;
            data.insert(k.clone(), Value::Str(Bytes::from(next.to_string())));
            Ok(Reply::Int(next))
        }
        ("RPUSH", [k, values @ ..]) if !values.is_empty() => {
            let entry = data
                .entry(k.clone())
                .or_insert_with(|| Value::List(VecDeque::new()));
            match entry {
                Value::List(list) => {
                    list.extend(values.iter().cloned());
                    Ok(Reply::Int(list.len() as i64))
                }
                _ => Err(wrongtype()),
            }
        }
        ("LLEN", [k]) => match data.get(k) {
            None => Ok(Reply::Int(0)),
            Some(Value::List(list)) => Ok(Reply::Int(list.len() as i64)),
            Some(_) => Err(wrongtype()),
        },
        ("LRANGE", [k, start, stop]) => {
            let list = match data.get(k) {
                None => return Ok(Reply::Array(Vec::new())),
                Some(Value::List(list)) => list,
                Some(_) => return Err(wrongtype()),
            };
            let len = list.len() as i64;
            let norm = |i: i64| if i < 0 { (len + i).max(0) } else { i.min(len) };
            let (from, to) = (norm(parse_int(start)?), norm(parse_int(stop)?) + 1);
            Ok(Reply::Array(
                list.iter()
                    .skip(from as usize)
                    .take((to - from).max(0) as usize)
                    .cloned()
                    .map(Reply::Bulk)
                    .collect(),
            ))
        }
        ("HSET", [k, fields @ ..]) if !fields.is_empty() && fields.len() % 2 == 0 => {
            let entry = data
                .entry(k.clone())
                .or_insert_with(|| Value::Hash(BTreeMap::new()));
            match entry {
                Value::Hash(hash) => {
                    let mut added = 0;
                    for pair in fields.chunks(2) {
                        if hash.insert(pair[0].clone(), pair[1].clone()).is_none() {
                            added += 1;
                        }
                    }
                    Ok(Reply::Int(added))
                }
                _ => Err(wrongtype()),
            }
        }
        ("HGET", [k, f]) => match data.get(k) {
            None => Ok(Reply::Nil),
            Some(Value::Hash(hash)) => Ok(hash.get(f).cloned().map_or(Reply::Nil, Reply::Bulk)),
            Some(_) => Err(wrongtype()),
        },
        ("HEXISTS", [k, f]) => match data.get(k) {
            None => Ok(Reply::Int(0)),
            Some(Value::Hash(hash)) => Ok(Reply::Int(hash.contains_key(f) as i64)),
            Some(_) => Err(wrongtype()),
        },
        ("KEYS", [pattern]) => Ok(Reply::Array(
            data.keys()
                .filter(|k| glob(pattern, k))
                .cloned()
                .map(Reply::Bulk)
                .collect(),
        )),
        ("RANDOMKEY", []) => Ok(data.keys().next().cloned().map_or(Reply::Nil, Reply::Bulk)),
        _ => Err(Error::Server {
            message: format!("ERR unknown command '{}'", command),
        }),
    }
}

impl Executor for MemoryStore {
    fn execute(&self, command: Command) -> Result<Reply> {
        apply(&mut self.data.lock(), &command)
    }

    fn submit_batch(&self, commands: Vec<Command>) -> Result<Vec<Result<Reply>>> {
        let mut data = self.data.lock();
        Ok(commands.iter().map(|c| apply(&mut data, c)).collect())
    }

    fn commit(&self, probes: Vec<Probe>, commands: Vec<Command>) -> Result<CommitVerdict> {
        let mut data = self.data.lock();
        let mut probe_results = Vec::with_capacity(probes.len());
        for probe in &probes {
            let reply = apply(&mut data, probe.command())?;
            probe_results.push(probe.is_satisfied_by(&reply)?);
        }
        if !probe_results.iter().all(|held| *held) {
            return Ok(CommitVerdict::aborted(probe_results));
        }
        let replies = commands.iter().map(|c| apply(&mut data, c)).collect();
        Ok(CommitVerdict::committed(probe_results, replies))
    }
}

/// A database over a fresh in-memory store.
pub fn memory_db() -> (Arc<MemoryStore>, Database) {
    let store = MemoryStore::new();
    let db = Database::new(store.clone());
    (store, db)
}

/// A database over a fresh recording executor.
pub fn recording_db() -> (Arc<RecordingExecutor>, Database) {
    let exec = Arc::new(RecordingExecutor::new());
    let db = Database::new(exec.clone());
    (exec, db)
}

/// `db` confined to `prefix`.
pub fn tenant(db: &Database, prefix: &str) -> KeyPrefixed<Database> {
    db.clone().with_key_prefix(prefix.to_string()).unwrap()
}

/// Display text of every command that reached a recording executor.
pub fn sent(exec: &RecordingExecutor) -> Vec<String> {
    exec.commands().iter().map(|c| c.to_string()).collect()
}
