//! Geospatial operations.

use bytes::Bytes;
use keyspace_core::{Arg, Command, CommandKind, RedisKey};

use crate::dispatch::Dispatch;
use crate::types::GeoUnit;

/// Commands over geo-indexed sorted sets.
pub trait GeoCommands: Dispatch {
    /// Add `(longitude, latitude, member)` triples; returns how many were new.
    fn geoadd<M: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        members: impl IntoIterator<Item = (f64, f64, M)>,
    ) -> Self::Output<u64> {
        let mut cmd = Command::new(CommandKind::GeoAdd).key(key);
        for (lon, lat, member) in members {
            cmd = cmd.arg(lon).arg(lat).arg(member);
        }
        self.send::<u64>(cmd)
    }

    /// Distance between two members, `None` if either is missing.
    fn geodist(
        &self,
        key: impl Into<RedisKey>,
        a: impl Into<Arg>,
        b: impl Into<Arg>,
        unit: GeoUnit,
    ) -> Self::Output<Option<f64>> {
        self.send::<Option<f64>>(
            Command::new(CommandKind::GeoDist)
                .key(key)
                .arg(a)
                .arg(b)
                .token(unit.token()),
        )
    }

    /// Geohash strings of members.
    fn geohash<M: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        members: impl IntoIterator<Item = M>,
    ) -> Self::Output<Vec<Option<String>>> {
        self.send::<Vec<Option<String>>>(Command::new(CommandKind::GeoHash).key(key).args(members))
    }

    /// `(longitude, latitude)` of members.
    fn geopos<M: Into<Arg>>(
        &self,
        key: impl Into<RedisKey>,
        members: impl IntoIterator<Item = M>,
    ) -> Self::Output<Vec<Option<(f64, f64)>>> {
        self.send::<Vec<Option<(f64, f64)>>>(Command::new(CommandKind::GeoPos).key(key).args(members))
    }

    /// Members within `radius` of `member`, nearest first.
    fn geosearch(
        &self,
        key: impl Into<RedisKey>,
        member: impl Into<Arg>,
        radius: f64,
        unit: GeoUnit,
        count: Option<u64>,
    ) -> Self::Output<Vec<Bytes>> {
        let mut cmd = Command::new(CommandKind::GeoSearch)
            .key(key)
            .token("FROMMEMBER")
            .arg(member)
            .token("BYRADIUS")
            .arg(radius)
            .token(unit.token())
            .token("ASC");
        if let Some(count) = count {
            cmd = cmd.token("COUNT").arg(count);
        }
        self.send::<Vec<Bytes>>(cmd)
    }

    /// Store a [`geosearch`](GeoCommands::geosearch) result.
    ///
    /// With `store_dist` the destination holds distances instead of
    /// positions.
    fn geosearchstore(
        &self,
        destination: impl Into<RedisKey>,
        source: impl Into<RedisKey>,
        member: impl Into<Arg>,
        radius: f64,
        unit: GeoUnit,
        store_dist: bool,
    ) -> Self::Output<u64> {
        self.send::<u64>(
            Command::new(CommandKind::GeoSearchStore)
                .key(destination)
                .key(source)
                .token("FROMMEMBER")
                .arg(member)
                .token("BYRADIUS")
                .arg(radius)
                .token(unit.token())
                .token_if(store_dist, "STOREDIST"),
        )
    }

    /// Members within `radius` of a position.
    fn georadius(
        &self,
        key: impl Into<RedisKey>,
        longitude: f64,
        latitude: f64,
        radius: f64,
        unit: GeoUnit,
    ) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(
            Command::new(CommandKind::GeoRadius)
                .key(key)
                .arg(longitude)
                .arg(latitude)
                .arg(radius)
                .token(unit.token()),
        )
    }

    /// Store a [`georadius`](GeoCommands::georadius) result under `destination`.
    fn georadius_store(
        &self,
        key: impl Into<RedisKey>,
        longitude: f64,
        latitude: f64,
        radius: f64,
        unit: GeoUnit,
        destination: impl Into<RedisKey>,
    ) -> Self::Output<u64> {
        self.send::<u64>(
            Command::new(CommandKind::GeoRadius)
                .key(key)
                .arg(longitude)
                .arg(latitude)
                .arg(radius)
                .token(unit.token())
                .token("STORE")
                .key(destination),
        )
    }

    /// Members within `radius` of another member.
    fn georadiusbymember(
        &self,
        key: impl Into<RedisKey>,
        member: impl Into<Arg>,
        radius: f64,
        unit: GeoUnit,
    ) -> Self::Output<Vec<Bytes>> {
        self.send::<Vec<Bytes>>(
            Command::new(CommandKind::GeoRadiusByMember)
                .key(key)
                .arg(member)
                .arg(radius)
                .token(unit.token()),
        )
    }

    /// Store a [`georadiusbymember`](GeoCommands::georadiusbymember) result.
    fn georadiusbymember_store(
        &self,
        key: impl Into<RedisKey>,
        member: impl Into<Arg>,
        radius: f64,
        unit: GeoUnit,
        destination: impl Into<RedisKey>,
    ) -> Self::Output<u64> {
        self.send::<u64>(
            Command::new(CommandKind::GeoRadiusByMember)
                .key(key)
                .arg(member)
                .arg(radius)
                .token(unit.token())
                .token("STORE")
                .key(destination),
        )
    }
}

impl<D: Dispatch> GeoCommands for D {}
