//! Scripts and functions.
//!
//! Keys passed to a script are counted and prefixed like any other key
//! list; the script body and its plain arguments are never touched. A
//! script that builds key names itself escapes the namespace.

use keyspace_core::{Arg, Command, CommandKind, RedisKey, Reply};

use super::{collect_keys, numkeys};
use crate::dispatch::Dispatch;

fn script_call<K: Into<RedisKey>, A: Into<Arg>>(
    kind: CommandKind,
    head: &str,
    keys: impl IntoIterator<Item = K>,
    args: impl IntoIterator<Item = A>,
) -> Command {
    numkeys(Command::new(kind).arg(head), collect_keys(keys)).args(args)
}

/// Server-side scripting.
pub trait ScriptingCommands: Dispatch {
    /// Run a Lua script.
    fn eval<K: Into<RedisKey>, A: Into<Arg>>(
        &self,
        script: &str,
        keys: impl IntoIterator<Item = K>,
        args: impl IntoIterator<Item = A>,
    ) -> Self::Output<Reply> {
        self.send::<Reply>(script_call(CommandKind::Eval, script, keys, args))
    }

    /// Run a cached script by SHA1.
    fn evalsha<K: Into<RedisKey>, A: Into<Arg>>(
        &self,
        sha: &str,
        keys: impl IntoIterator<Item = K>,
        args: impl IntoIterator<Item = A>,
    ) -> Self::Output<Reply> {
        self.send::<Reply>(script_call(CommandKind::EvalSha, sha, keys, args))
    }

    /// Read-only [`eval`](ScriptingCommands::eval).
    fn eval_ro<K: Into<RedisKey>, A: Into<Arg>>(
        &self,
        script: &str,
        keys: impl IntoIterator<Item = K>,
        args: impl IntoIterator<Item = A>,
    ) -> Self::Output<Reply> {
        self.send::<Reply>(script_call(CommandKind::EvalRo, script, keys, args))
    }

    /// Read-only [`evalsha`](ScriptingCommands::evalsha).
    fn evalsha_ro<K: Into<RedisKey>, A: Into<Arg>>(
        &self,
        sha: &str,
        keys: impl IntoIterator<Item = K>,
        args: impl IntoIterator<Item = A>,
    ) -> Self::Output<Reply> {
        self.send::<Reply>(script_call(CommandKind::EvalShaRo, sha, keys, args))
    }

    /// Call a library function.
    fn fcall<K: Into<RedisKey>, A: Into<Arg>>(
        &self,
        function: &str,
        keys: impl IntoIterator<Item = K>,
        args: impl IntoIterator<Item = A>,
    ) -> Self::Output<Reply> {
        self.send::<Reply>(script_call(CommandKind::FCall, function, keys, args))
    }

    /// Read-only [`fcall`](ScriptingCommands::fcall).
    fn fcall_ro<K: Into<RedisKey>, A: Into<Arg>>(
        &self,
        function: &str,
        keys: impl IntoIterator<Item = K>,
        args: impl IntoIterator<Item = A>,
    ) -> Self::Output<Reply> {
        self.send::<Reply>(script_call(CommandKind::FCallRo, function, keys, args))
    }
}

impl<D: Dispatch> ScriptingCommands for D {}
