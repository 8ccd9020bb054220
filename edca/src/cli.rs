use clap::Parser;
use edca_core::{
    ArrivalRate, CategorySettings, ExperimentConfig, LengthPolicy, PerCategory, ThroughputUnit,
    defaults::*, time::parse_duration, traffic::ArrivalRateError,
};
use std::{path::PathBuf, time::Duration};
use tracing::Level;

/// Derive the EDCA parameter set and traffic profiles of a single-BSS
/// Wi-Fi experiment, then turn the simulator's per-packet records into
/// per-station delay and throughput rows.
#[derive(Debug, Clone, Parser)]
#[command(name = "edca", version)]
pub struct Args {
    /// Packet records produced by the simulator, one
    /// `station,link,enqueue_ns,dequeue_ns,failures` line per delivered packet
    #[arg(long, short = 'r')]
    pub records: PathBuf,

    /// File the result rows are appended to
    #[arg(long, short = 'o', default_value = "wifi-dcf.dat")]
    pub output: PathBuf,

    /// Number of stations
    #[arg(long = "n-sld", default_value_t = DEFAULT_STATION_COUNT)]
    pub station_count: usize,

    /// Access category of every station (0=BE, 1=BK, 2=VI, 3=VO),
    /// separated by commas or spaces. Empty puts every station in BE
    #[arg(long, default_value = "")]
    pub node_acs: String,

    /// Pad (with BE) or truncate a category list that does not match the
    /// station count instead of rejecting it
    #[arg(long)]
    pub legacy_pad: bool,

    #[arg(long, default_value_t = DEFAULT_BE_CW_BASE)]
    pub ac_be_cw_min: u64,
    #[arg(long, default_value_t = DEFAULT_BE_CW_STAGE)]
    pub ac_be_cw_stage: u32,
    #[arg(long, default_value_t = DEFAULT_BK_CW_BASE)]
    pub ac_bk_cw_min: u64,
    #[arg(long, default_value_t = DEFAULT_BK_CW_STAGE)]
    pub ac_bk_cw_stage: u32,
    #[arg(long, default_value_t = DEFAULT_VI_CW_BASE)]
    pub ac_vi_cw_min: u64,
    #[arg(long, default_value_t = DEFAULT_VI_CW_STAGE)]
    pub ac_vi_cw_stage: u32,
    #[arg(long, default_value_t = DEFAULT_VO_CW_BASE)]
    pub ac_vo_cw_min: u64,
    #[arg(long, default_value_t = DEFAULT_VO_CW_STAGE)]
    pub ac_vo_cw_stage: u32,

    #[arg(long, default_value_t = DEFAULT_BE_AIFSN)]
    pub ac_be_aifsn: u8,
    #[arg(long, default_value_t = DEFAULT_BK_AIFSN)]
    pub ac_bk_aifsn: u8,
    #[arg(long, default_value_t = DEFAULT_VI_AIFSN)]
    pub ac_vi_aifsn: u8,
    #[arg(long, default_value_t = DEFAULT_VO_AIFSN)]
    pub ac_vo_aifsn: u8,

    #[arg(long, default_value = "0us", value_parser = parse_duration)]
    pub ac_be_txop_limit: Duration,
    #[arg(long, default_value = "0us", value_parser = parse_duration)]
    pub ac_bk_txop_limit: Duration,
    #[arg(long, default_value = "3008us", value_parser = parse_duration)]
    pub ac_vi_txop_limit: Duration,
    #[arg(long, default_value = "1504us", value_parser = parse_duration)]
    pub ac_vo_txop_limit: Duration,

    /// Application payload in bytes, reported in the summary row
    #[arg(long, default_value_t = DEFAULT_PAYLOAD_SIZE)]
    pub payload_size: u32,
    #[arg(long, default_value_t = DEFAULT_BE_PAYLOAD_SIZE)]
    pub payload_be: u32,
    #[arg(long, default_value_t = DEFAULT_BK_PAYLOAD_SIZE)]
    pub payload_bk: u32,
    #[arg(long, default_value_t = DEFAULT_VI_PAYLOAD_SIZE)]
    pub payload_vi: u32,
    #[arg(long, default_value_t = DEFAULT_VO_PAYLOAD_SIZE)]
    pub payload_vo: u32,

    /// Per-station arrival rate, in packets per slot
    #[arg(long, alias = "per-sld-lambda", default_value_t = DEFAULT_ARRIVAL_RATE)]
    pub arrival_rate: f64,

    #[arg(long, default_value = "9us", value_parser = parse_duration)]
    pub slot_time: Duration,

    /// Length of the statistics collection window (e.g. `60s`)
    #[arg(long, default_value = "60s", value_parser = parse_duration)]
    pub simulation_time: Duration,

    /// Seed of the run
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub rng_run: u64,

    #[arg(long, default_value_t = DEFAULT_MCS)]
    pub mcs: u8,

    /// Channel width in MHz
    #[arg(long, default_value_t = DEFAULT_CHANNEL_WIDTH)]
    pub channel_width: u16,

    /// Unit of the throughput columns: bps, kbps, mbps or gbps
    #[arg(long, default_value = "mbps")]
    pub throughput_unit: ThroughputUnit,

    /// Log level, overridden by `RUST_LOG`
    #[arg(long, default_value = "info")]
    pub log_level: Level,
}

impl Args {
    /// The experiment configuration described by the arguments.
    ///
    /// # Errors
    ///
    /// An arrival rate outside `(0, 1]`.
    pub fn experiment(&self) -> Result<ExperimentConfig, ArrivalRateError> {
        let category = |cw_base, cw_stage, aifsn, txop_limit, payload_bytes| CategorySettings {
            cw_base,
            cw_stage,
            aifsn,
            txop_limit,
            payload_bytes,
        };

        Ok(ExperimentConfig {
            station_count: self.station_count,
            categories: PerCategory {
                best_effort: category(
                    self.ac_be_cw_min,
                    self.ac_be_cw_stage,
                    self.ac_be_aifsn,
                    self.ac_be_txop_limit,
                    self.payload_be,
                ),
                background: category(
                    self.ac_bk_cw_min,
                    self.ac_bk_cw_stage,
                    self.ac_bk_aifsn,
                    self.ac_bk_txop_limit,
                    self.payload_bk,
                ),
                video: category(
                    self.ac_vi_cw_min,
                    self.ac_vi_cw_stage,
                    self.ac_vi_aifsn,
                    self.ac_vi_txop_limit,
                    self.payload_vi,
                ),
                voice: category(
                    self.ac_vo_cw_min,
                    self.ac_vo_cw_stage,
                    self.ac_vo_aifsn,
                    self.ac_vo_txop_limit,
                    self.payload_vo,
                ),
            },
            payload_bytes: self.payload_size,
            arrival_rate: ArrivalRate::new(self.arrival_rate)?,
            slot_time: self.slot_time,
            observation_window: self.simulation_time,
            seed: self.rng_run,
            mcs: self.mcs,
            channel_width: self.channel_width,
            throughput_unit: self.throughput_unit,
            length_policy: if self.legacy_pad {
                LengthPolicy::PadWithBestEffort
            } else {
                LengthPolicy::Strict
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_setup() {
        let args = Args::parse_from(["edca", "--records", "records.csv"]);
        assert_eq!(args.experiment().unwrap(), ExperimentConfig::default());
        assert_eq!(args.output, PathBuf::from("wifi-dcf.dat"));
        assert_eq!(args.log_level, Level::INFO);
    }

    #[test]
    fn overrides() {
        let args = Args::parse_from([
            "edca",
            "-r",
            "records.csv",
            "--n-sld",
            "3",
            "--node-acs",
            "0,2,3",
            "--ac-vo-cw-min",
            "8",
            "--ac-vi-txop-limit",
            "0us",
            "--per-sld-lambda",
            "0.01",
            "--simulation-time",
            "1s 500ms",
            "--throughput-unit",
            "kbps",
            "--legacy-pad",
        ]);
        let config = args.experiment().unwrap();

        assert_eq!(config.station_count, 3);
        assert_eq!(args.node_acs, "0,2,3");
        assert_eq!(config.categories.voice.cw_base, 8);
        assert_eq!(config.categories.video.txop_limit, Duration::ZERO);
        assert_eq!(config.arrival_rate.value(), 0.01);
        assert_eq!(config.observation_window, Duration::from_millis(1_500));
        assert_eq!(config.throughput_unit, ThroughputUnit::Kbps);
        assert_eq!(config.length_policy, LengthPolicy::PadWithBestEffort);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Args::try_parse_from(["edca", "-r", "x", "--simulation-time", "60"]).is_err());
        assert!(Args::try_parse_from(["edca", "-r", "x", "--throughput-unit", "MiB"]).is_err());
        assert!(Args::try_parse_from(["edca"]).is_err());

        let args = Args::parse_from(["edca", "-r", "x", "--arrival-rate", "2"]);
        assert!(args.experiment().is_err());
    }
}
