//! Default experiment settings.
//!
//! These reproduce the single-BSS setup the analytics were written for:
//! an 802.11be access point at 5 GHz, five single-link stations, MCS 6 on
//! a 20 MHz channel, and the EDCA windows below.

use std::time::Duration;

/// Default contention window base for best effort.
///
/// ```
/// # use edca_core::defaults::*;
/// assert_eq!(DEFAULT_BE_CW_BASE * 2u64.pow(DEFAULT_BE_CW_STAGE) - 1, 959);
/// ```
pub const DEFAULT_BE_CW_BASE: u64 = 15;
pub const DEFAULT_BE_CW_STAGE: u32 = 6;
pub const DEFAULT_BK_CW_BASE: u64 = 15;
pub const DEFAULT_BK_CW_STAGE: u32 = 6;
pub const DEFAULT_VI_CW_BASE: u64 = 7;
pub const DEFAULT_VI_CW_STAGE: u32 = 1;
pub const DEFAULT_VO_CW_BASE: u64 = 3;
pub const DEFAULT_VO_CW_STAGE: u32 = 1;

pub const DEFAULT_BE_AIFSN: u8 = 3;
pub const DEFAULT_BK_AIFSN: u8 = 7;
pub const DEFAULT_VI_AIFSN: u8 = 2;
pub const DEFAULT_VO_AIFSN: u8 = 2;

pub const DEFAULT_BE_TXOP_LIMIT: Duration = Duration::ZERO;
pub const DEFAULT_BK_TXOP_LIMIT: Duration = Duration::ZERO;
pub const DEFAULT_VI_TXOP_LIMIT: Duration = Duration::from_micros(3_008);
pub const DEFAULT_VO_TXOP_LIMIT: Duration = Duration::from_micros(1_504);

/// Application payload, in bytes, reported in the summary row.
pub const DEFAULT_PAYLOAD_SIZE: u32 = 1_500;
pub const DEFAULT_BE_PAYLOAD_SIZE: u32 = 1_500;
pub const DEFAULT_BK_PAYLOAD_SIZE: u32 = 1_500;
pub const DEFAULT_VI_PAYLOAD_SIZE: u32 = 1_200;
pub const DEFAULT_VO_PAYLOAD_SIZE: u32 = 250;

pub const DEFAULT_STATION_COUNT: usize = 5;

/// Per-station packet arrival rate, in packets per slot.
pub const DEFAULT_ARRIVAL_RATE: f64 = 0.00001;

/// OFDM slot time at 5 GHz.
pub const DEFAULT_SLOT_TIME: Duration = Duration::from_micros(9);

/// Length of the statistics collection window.
pub const DEFAULT_OBSERVATION_WINDOW: Duration = Duration::from_secs(60);

/// Upper bound (exclusive) of the random application start offset.
pub const MAX_START_OFFSET: Duration = Duration::from_secs(1);

pub const DEFAULT_SEED: u64 = 6;
pub const DEFAULT_MCS: u8 = 6;

/// Channel width, in MHz.
pub const DEFAULT_CHANNEL_WIDTH: u16 = 20;
