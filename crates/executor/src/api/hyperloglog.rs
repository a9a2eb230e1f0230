//! HyperLogLog operations.

use keyspace_core::{Arg, Command, CommandKind, RedisKey};

use crate::dispatch::Dispatch;

/// Probabilistic cardinality counters.
pub trait HyperLogLogCommands: Dispatch {
    /// Add elements; `true` if the estimate changed.
    fn pfadd<E: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        elements: impl IntoIterator<Item = E>,
    ) -> Self::Output<bool> {
        self.send::<bool>(Command::new(CommandKind::PfAdd).key(key).args(elements))
    }

    /// Estimated cardinality of the union of `keys`.
    fn pfcount<K: Into<RedisKey>>(&self, keys: impl IntoIterator<Item = K>) -> Self::Output<u64> {
        self.send::<u64>(Command::new(CommandKind::PfCount).keys(keys))
    }

    /// Merge `sources` into `destination`.
    fn pfmerge<K: Into<RedisKey>>(
        &self,
        destination: impl Into<RedisKey>,
        sources: impl IntoIterator<Item = K>,
    ) -> Self::Output<()> {
        self.send::<()>(Command::new(CommandKind::PfMerge).key(destination).keys(sources))
    }
}

impl<D: Dispatch> HyperLogLogCommands for D {}
