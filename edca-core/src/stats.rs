//! Aggregated delay, success and throughput statistics.
//!
//! [`RunStats`] rolls decomposed [`DelaySeries`] up per `(station, link)`,
//! per station and for the whole run. Obtain one via
//! [`RunStats::aggregate`].

use crate::{
    decompose::DelaySeries,
    id::{SeriesKey, StationId},
    measure::Throughput,
    traffic::TrafficPlan,
};
use std::{collections::BTreeMap, ops::AddAssign, time::Duration};
use tracing::warn;

/// Success counts and accumulated delays of a set of packets.
///
/// Every mean of an empty set is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregateStats {
    /// Delivered packets.
    pub success_count: u64,
    /// Transmission attempts, `success_count` plus every failure.
    pub attempt_count: u64,
    pub total_queuing: Duration,
    pub total_access: Duration,
}

impl AggregateStats {
    pub fn from_series(series: &DelaySeries) -> Self {
        series
            .samples()
            .iter()
            .fold(Self::default(), |mut stats, sample| {
                stats.success_count += 1;
                stats.attempt_count += 1 + u64::from(sample.failures);
                stats.total_queuing += sample.queuing;
                stats.total_access += sample.access;
                stats
            })
    }

    pub fn mean_queuing(&self) -> Duration {
        self.mean(self.total_queuing)
    }

    pub fn mean_access(&self) -> Duration {
        self.mean(self.total_access)
    }

    /// Always `mean_queuing() + mean_access()`.
    pub fn mean_end_to_end(&self) -> Duration {
        self.mean_queuing() + self.mean_access()
    }

    /// Fraction of attempts that succeeded, `0` when nothing was sent.
    pub fn success_probability(&self) -> f64 {
        if self.attempt_count == 0 {
            0.0
        } else {
            self.success_count as f64 / self.attempt_count as f64
        }
    }

    pub fn throughput(&self, payload_bytes: u32, window: Duration) -> Throughput {
        Throughput::delivered(self.success_count, payload_bytes, window)
    }

    fn mean(&self, total: Duration) -> Duration {
        match self.success_count {
            0 => Duration::ZERO,
            n => Duration::from_nanos((total.as_nanos() / u128::from(n)) as u64),
        }
    }
}

impl AddAssign<&AggregateStats> for AggregateStats {
    fn add_assign(&mut self, rhs: &AggregateStats) {
        self.success_count += rhs.success_count;
        self.attempt_count += rhs.attempt_count;
        self.total_queuing += rhs.total_queuing;
        self.total_access += rhs.total_access;
    }
}

/// Statistics of one configured station over all its links.
#[derive(Debug, Clone, PartialEq)]
pub struct StationStats {
    pub station: StationId,
    pub stats: AggregateStats,
    pub throughput: Throughput,
}

/// Statistics of a whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    /// Every decomposed series, configured station or not.
    pub series: BTreeMap<SeriesKey, AggregateStats>,
    /// One entry per station of the plan, in station order.
    pub stations: Vec<StationStats>,
    /// Sum over the stations of the plan.
    pub global: AggregateStats,
    /// Sum of the stations' throughput.
    pub throughput: Throughput,
}

impl RunStats {
    /// Aggregate `series` over the stations of `plan`, counting
    /// `payload_bytes` per delivered packet for throughput.
    ///
    /// Stations without any sample get zero statistics. Series of nodes
    /// that are not in the plan, such as the access point, are kept in
    /// [`RunStats::series`] but left out of the station and global
    /// figures.
    pub fn aggregate(
        plan: &TrafficPlan,
        series: &[DelaySeries],
        payload_bytes: u32,
        window: Duration,
    ) -> Self {
        let per_series: BTreeMap<SeriesKey, AggregateStats> = series
            .iter()
            .map(|s| (s.key(), AggregateStats::from_series(s)))
            .collect();

        let mut per_station: BTreeMap<StationId, AggregateStats> =
            plan.stations().map(|s| (s, AggregateStats::default())).collect();
        for (key, stats) in &per_series {
            match per_station.get_mut(&key.station) {
                Some(total) => *total += stats,
                None => warn!(%key, "series of a station outside the traffic plan ignored"),
            }
        }

        let stations: Vec<StationStats> = per_station
            .into_iter()
            .map(|(station, stats)| StationStats {
                station,
                throughput: stats.throughput(payload_bytes, window),
                stats,
            })
            .collect();

        let mut global = AggregateStats::default();
        stations.iter().for_each(|s| global += &s.stats);
        let throughput = stations.iter().map(|s| s.throughput).sum();

        Self {
            series: per_series,
            stations,
            global,
            throughput,
        }
    }
}
