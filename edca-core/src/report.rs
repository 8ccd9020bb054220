//! Delimited text rows of an experiment run.
//!
//! A [`Report`] is one row per station,
//!
//! ```text
//! station,throughput,mean_queuing_ms,mean_access_ms,mean_e2e_ms
//! ```
//!
//! followed by a single summary row,
//!
//! ```text
//! success_probability,throughput,mean_queuing_ms,mean_access_ms,mean_e2e_ms,
//! seed,window_s,payload_size,mcs,channel_width,stations,arrival_rate,be_cw_base,be_cw_stage
//! ```
//!
//! Rows carry no header so that the output of successive runs can be
//! appended to the same file.

use crate::{
    category::AccessCategory,
    config::ExperimentConfig,
    decompose::{decompose_batch, DecompositionError},
    id::StationId,
    record::RecordBatch,
    stats::RunStats,
    traffic::{ArrivalRate, TrafficPlan},
};
use std::{fmt, io, time::Duration};

fn millis(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1e6
}

#[derive(Debug, Clone, PartialEq)]
pub struct StationRow {
    pub station: StationId,
    pub throughput: f64,
    pub mean_queuing_ms: f64,
    pub mean_access_ms: f64,
    pub mean_end_to_end_ms: f64,
}

impl fmt::Display for StationRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.station,
            self.throughput,
            self.mean_queuing_ms,
            self.mean_access_ms,
            self.mean_end_to_end_ms
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub success_probability: f64,
    pub throughput: f64,
    pub mean_queuing_ms: f64,
    pub mean_access_ms: f64,
    pub mean_end_to_end_ms: f64,
    pub seed: u64,
    pub observation_window_s: f64,
    pub payload_size: u32,
    pub mcs: u8,
    pub channel_width: u16,
    pub station_count: usize,
    pub arrival_rate: ArrivalRate,
    pub base_cw_min: u64,
    pub cw_stage: u32,
}

impl fmt::Display for SummaryRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            self.success_probability,
            self.throughput,
            self.mean_queuing_ms,
            self.mean_access_ms,
            self.mean_end_to_end_ms,
            self.seed,
            self.observation_window_s,
            self.payload_size,
            self.mcs,
            self.channel_width,
            self.station_count,
            self.arrival_rate,
            self.base_cw_min,
            self.cw_stage,
        )
    }
}

/// All output rows of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub stations: Vec<StationRow>,
    pub summary: SummaryRow,
}

impl Report {
    /// Decompose and aggregate `batch`, then format the result.
    ///
    /// Nothing is produced unless every series decomposes.
    ///
    /// # Errors
    ///
    /// The first series with inconsistent timing.
    pub fn analyze(
        config: &ExperimentConfig,
        plan: &TrafficPlan,
        batch: &RecordBatch,
    ) -> Result<Self, DecompositionError> {
        let series = decompose_batch(batch)?;
        let stats = RunStats::aggregate(
            plan,
            &series,
            config.payload_bytes,
            config.observation_window,
        );
        Ok(Self::new(config, &stats))
    }

    pub fn new(config: &ExperimentConfig, stats: &RunStats) -> Self {
        let unit = config.throughput_unit;

        let stations = stats
            .stations
            .iter()
            .map(|s| StationRow {
                station: s.station,
                throughput: s.throughput.in_unit(unit),
                mean_queuing_ms: millis(s.stats.mean_queuing()),
                mean_access_ms: millis(s.stats.mean_access()),
                mean_end_to_end_ms: millis(s.stats.mean_end_to_end()),
            })
            .collect();

        let best_effort = &config.categories[AccessCategory::BestEffort];
        let summary = SummaryRow {
            success_probability: stats.global.success_probability(),
            throughput: stats.throughput.in_unit(unit),
            mean_queuing_ms: millis(stats.global.mean_queuing()),
            mean_access_ms: millis(stats.global.mean_access()),
            mean_end_to_end_ms: millis(stats.global.mean_end_to_end()),
            seed: config.seed,
            observation_window_s: config.observation_window.as_secs_f64(),
            payload_size: config.payload_bytes,
            mcs: config.mcs,
            channel_width: config.channel_width,
            station_count: config.station_count,
            arrival_rate: config.arrival_rate,
            base_cw_min: best_effort.cw_base,
            cw_stage: best_effort.cw_stage,
        };

        Self { stations, summary }
    }

    /// Write every row, each terminated by a newline.
    pub fn write_to<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        for row in &self.stations {
            writeln!(out, "{row}")?;
        }
        writeln!(out, "{}", self.summary)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.stations {
            writeln!(f, "{row}")?;
        }
        writeln!(f, "{}", self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{id::LinkId, record::PacketRecord, time::Timestamp};

    fn record(station: u32, enqueued_ms: u64, dequeued_ms: u64, failures: u32) -> PacketRecord {
        PacketRecord {
            station: StationId::new(station),
            link: LinkId::PRIMARY,
            enqueued: Timestamp::from_nanos(enqueued_ms * 1_000_000),
            dequeued: Timestamp::from_nanos(dequeued_ms * 1_000_000),
            failures,
        }
    }

    fn config() -> ExperimentConfig {
        ExperimentConfig {
            station_count: 2,
            observation_window: Duration::from_secs(1),
            ..Default::default()
        }
    }

    #[test]
    fn rows() {
        let config = config();
        let plan = TrafficPlan::assign(&config, "0,0").unwrap();
        let batch: RecordBatch = [
            record(1, 100, 140, 0),
            record(1, 150, 380, 1),
            record(1, 400, 420, 0),
        ]
        .into_iter()
        .collect();

        let report = Report::analyze(&config, &plan, &batch).unwrap();

        assert_eq!(report.stations.len(), 2);
        // 2 packets of 1500 bytes in one second
        assert_eq!(report.stations[0].to_string(), "1,0.024,0,125,125");
        assert_eq!(report.stations[1].to_string(), "2,0,0,0,0");
        assert_eq!(
            report.summary.to_string(),
            "0.6666666666666666,0.024,0,125,125,6,1,1500,6,20,2,0.00001,15,6"
        );
    }

    #[test]
    fn rows_share_the_summary_payload() {
        let config = config();
        let plan = TrafficPlan::assign(&config, "3,0").unwrap();
        let batch: RecordBatch = [
            record(1, 100, 140, 0),
            record(1, 150, 380, 1),
            record(1, 400, 420, 0),
        ]
        .into_iter()
        .collect();

        let report = Report::analyze(&config, &plan, &batch).unwrap();

        // voice payload is 250 bytes, the row still counts 1500
        assert_eq!(report.stations[0].to_string(), "1,0.024,0,125,125");
        assert_eq!(report.summary.payload_size, 1_500);
        assert_eq!(report.summary.throughput, 0.024);
    }

    #[test]
    fn nanosecond_delays_in_millis() {
        let config = config();
        let plan = TrafficPlan::assign(&config, "").unwrap();
        let batch: RecordBatch = [(0, 10), (10, 11)]
            .into_iter()
            .map(|(enqueued, dequeued)| PacketRecord {
                station: StationId::new(1),
                link: LinkId::PRIMARY,
                enqueued: Timestamp::from_nanos(enqueued),
                dequeued: Timestamp::from_nanos(dequeued),
                failures: 0,
            })
            .collect();

        let report = Report::analyze(&config, &plan, &batch).unwrap();
        assert_eq!(report.stations[0].to_string(), "1,0.012,0,0.000001,0.000001");
    }

    #[test]
    fn write_appends_lines() {
        let config = config();
        let plan = TrafficPlan::assign(&config, "").unwrap();
        let report = Report::analyze(&config, &plan, &RecordBatch::new()).unwrap();

        let mut out = Vec::new();
        report.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text, report.to_string());
        assert_eq!(text.lines().count(), 3);
        assert!(text.ends_with('\n'));
        assert!(text.starts_with("1,0,0,0,0\n2,0,0,0,0\n0,0,0,0,0,"));
    }

    #[test]
    fn inconsistent_batch_yields_no_report() {
        let config = config();
        let plan = TrafficPlan::assign(&config, "").unwrap();
        let batch: RecordBatch = [record(2, 10, 50, 0), record(2, 20, 40, 0)]
            .into_iter()
            .collect();
        assert!(matches!(
            Report::analyze(&config, &plan, &batch),
            Err(DecompositionError::NonMonotonic { .. })
        ));
    }
}
