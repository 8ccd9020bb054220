use crate::{
    category::PerCategory,
    defaults::*,
    measure::ThroughputUnit,
    traffic::{ArrivalRate, LengthPolicy},
};
use std::time::Duration;

/// Configuration of one access category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySettings {
    /// Contention window base (`cw_min + 1`).
    pub cw_base: u64,
    /// Number of times the window may double.
    pub cw_stage: u32,
    pub aifsn: u8,
    pub txop_limit: Duration,
    /// Application payload, in bytes, of stations using this category.
    pub payload_bytes: u32,
}

/// Everything the analysis needs to know about an experiment run.
///
/// The [`Default`] value is the reference setup described in
/// [`defaults`](crate::defaults).
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    pub station_count: usize,
    pub categories: PerCategory<CategorySettings>,
    /// Payload size echoed in the summary row.
    pub payload_bytes: u32,
    pub arrival_rate: ArrivalRate,
    pub slot_time: Duration,
    pub observation_window: Duration,
    pub seed: u64,
    pub mcs: u8,
    /// Channel width in MHz.
    pub channel_width: u16,
    pub throughput_unit: ThroughputUnit,
    pub length_policy: LengthPolicy,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            station_count: DEFAULT_STATION_COUNT,
            categories: PerCategory {
                best_effort: CategorySettings {
                    cw_base: DEFAULT_BE_CW_BASE,
                    cw_stage: DEFAULT_BE_CW_STAGE,
                    aifsn: DEFAULT_BE_AIFSN,
                    txop_limit: DEFAULT_BE_TXOP_LIMIT,
                    payload_bytes: DEFAULT_BE_PAYLOAD_SIZE,
                },
                background: CategorySettings {
                    cw_base: DEFAULT_BK_CW_BASE,
                    cw_stage: DEFAULT_BK_CW_STAGE,
                    aifsn: DEFAULT_BK_AIFSN,
                    txop_limit: DEFAULT_BK_TXOP_LIMIT,
                    payload_bytes: DEFAULT_BK_PAYLOAD_SIZE,
                },
                video: CategorySettings {
                    cw_base: DEFAULT_VI_CW_BASE,
                    cw_stage: DEFAULT_VI_CW_STAGE,
                    aifsn: DEFAULT_VI_AIFSN,
                    txop_limit: DEFAULT_VI_TXOP_LIMIT,
                    payload_bytes: DEFAULT_VI_PAYLOAD_SIZE,
                },
                voice: CategorySettings {
                    cw_base: DEFAULT_VO_CW_BASE,
                    cw_stage: DEFAULT_VO_CW_STAGE,
                    aifsn: DEFAULT_VO_AIFSN,
                    txop_limit: DEFAULT_VO_TXOP_LIMIT,
                    payload_bytes: DEFAULT_VO_PAYLOAD_SIZE,
                },
            },
            payload_bytes: DEFAULT_PAYLOAD_SIZE,
            arrival_rate: ArrivalRate::DEFAULT,
            slot_time: DEFAULT_SLOT_TIME,
            observation_window: DEFAULT_OBSERVATION_WINDOW,
            seed: DEFAULT_SEED,
            mcs: DEFAULT_MCS,
            channel_width: DEFAULT_CHANNEL_WIDTH,
            throughput_unit: ThroughputUnit::default(),
            length_policy: LengthPolicy::default(),
        }
    }
}
