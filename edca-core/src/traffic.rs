//! Per-station traffic profiles.
//!
//! Every station is given an access category from a compact list of
//! category codes (`0=BE, 1=BK, 2=VI, 3=VO`), and the category decides
//! how its packets arrive: video and voice are periodic, best effort and
//! background follow a Bernoulli process with one trial per slot.

use crate::{
    category::AccessCategory, config::ExperimentConfig, defaults::MAX_START_OFFSET,
    id::StationId,
};
use logos::{Lexer, Logos};
use rand_chacha::ChaChaRng;
use rand_core::{Rng, SeedableRng as _};
use std::{fmt, time::Duration};
use thiserror::Error;
use tracing::{info, warn};

/// Direction of a station's traffic relative to the access point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Uplink,
    Downlink,
}

/// Packet arrival process of a station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArrivalModel {
    /// One packet every `interval`.
    Deterministic { interval: Duration },
    /// In every slot a packet arrives with the given probability.
    Bernoulli { probability_per_slot: f64 },
}

impl ArrivalModel {
    /// Arrival model used for `category`, configured for an offered load
    /// of `rate` packets per slot.
    ///
    /// ```
    /// # use edca_core::{AccessCategory, ArrivalModel, ArrivalRate};
    /// # use std::time::Duration;
    /// let rate = ArrivalRate::new(0.001).unwrap();
    /// let slot = Duration::from_micros(9);
    /// assert_eq!(
    ///     ArrivalModel::for_category(AccessCategory::Voice, rate, slot),
    ///     ArrivalModel::Deterministic { interval: Duration::from_millis(9) },
    /// );
    /// ```
    pub fn for_category(category: AccessCategory, rate: ArrivalRate, slot_time: Duration) -> Self {
        match category {
            AccessCategory::Video | AccessCategory::Voice => Self::Deterministic {
                interval: rate.interval(slot_time),
            },
            AccessCategory::BestEffort | AccessCategory::Background => Self::Bernoulli {
                probability_per_slot: rate.value(),
            },
        }
    }

    pub fn is_deterministic(&self) -> bool {
        matches!(self, Self::Deterministic { .. })
    }
}

/// Offered load of a station, in packets per slot.
///
/// Valid rates lie in `(0.0, 1.0]`: a rate is both the Bernoulli success
/// probability and the reciprocal of the deterministic inter-arrival
/// time in slots.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ArrivalRate(f64);

#[derive(Debug, Clone, Copy, Error)]
#[error("arrival rate must be in (0.0, 1.0] packets per slot, got {0}")]
pub struct ArrivalRateError(f64);

impl ArrivalRate {
    pub const DEFAULT: Self = Self(crate::defaults::DEFAULT_ARRIVAL_RATE);

    /// # Errors
    ///
    /// Returns [`ArrivalRateError`] if `rate` is NaN, not positive or
    /// greater than `1.0`.
    pub fn new(rate: f64) -> Result<Self, ArrivalRateError> {
        if rate > 0.0 && rate <= 1.0 {
            Ok(Self(rate))
        } else {
            Err(ArrivalRateError(rate))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Deterministic inter-arrival time: `slot_time / rate`, rounded to
    /// the nanosecond.
    pub fn interval(self, slot_time: Duration) -> Duration {
        Duration::from_nanos((slot_time.as_nanos() as f64 / self.0).round() as u64)
    }
}

impl Default for ArrivalRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ArrivalRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What to do when the category list and the station count disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthPolicy {
    /// Reject the configuration.
    #[default]
    Strict,
    /// Pad missing stations with best effort and silently drop extra
    /// entries.
    PadWithBestEffort,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
    #[error("invalid access category {code} at position {position}, expected 0..=3")]
    InvalidCategory { position: usize, code: i64 },
    #[error("unexpected `{token}' in access category list")]
    InvalidToken { token: String },
    #[error("access category list has {found} entries but there are {expected} stations")]
    StationCountMismatch { expected: usize, found: usize },
    #[error("{count} stations do not fit the station id space")]
    TooManyStations { count: usize },
}

/// Traffic of one station. Built once at configuration time.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficProfile {
    pub station: StationId,
    pub direction: Direction,
    pub category: AccessCategory,
    pub arrival: ArrivalModel,
    pub payload_bytes: u32,
    /// Delay before the station's application starts generating packets.
    pub start_offset: Duration,
}

/// The traffic profiles of all stations, in station order.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficPlan {
    profiles: Vec<TrafficProfile>,
}

impl TrafficPlan {
    /// Build the profiles of `config.station_count` stations from
    /// `category_list`.
    ///
    /// An empty list puts every station in best effort. A list whose
    /// length differs from the station count is handled according to
    /// `config.length_policy`.
    ///
    /// ```
    /// # use edca_core::{AccessCategory, ExperimentConfig, TrafficPlan};
    /// let config = ExperimentConfig { station_count: 3, ..Default::default() };
    /// let plan = TrafficPlan::assign(&config, "0,2,3").unwrap();
    /// assert_eq!(plan.profiles()[1].category, AccessCategory::Video);
    /// ```
    ///
    /// # Errors
    ///
    /// Any malformed or out of range code, and a length mismatch under
    /// [`LengthPolicy::Strict`].
    pub fn assign(config: &ExperimentConfig, category_list: &str) -> Result<Self, AssignmentError> {
        let stations = config.station_count;
        if u32::try_from(stations).is_err() {
            return Err(AssignmentError::TooManyStations { count: stations });
        }
        let mut categories = parse_category_list(category_list)?;

        if categories.is_empty() {
            info!(stations, "no access categories given, every station uses BE");
            categories = vec![AccessCategory::BestEffort; stations];
        } else if categories.len() != stations {
            match config.length_policy {
                LengthPolicy::Strict => {
                    return Err(AssignmentError::StationCountMismatch {
                        expected: stations,
                        found: categories.len(),
                    });
                }
                LengthPolicy::PadWithBestEffort => {
                    warn!(
                        stations,
                        found = categories.len(),
                        "access category list resized to the station count"
                    );
                    categories.resize(stations, AccessCategory::BestEffort);
                }
            }
        }

        let mut rng = ChaChaRng::seed_from_u64(config.seed);
        let profiles = categories
            .into_iter()
            .enumerate()
            .map(|(index, category)| {
                let station = StationId::for_index(index)
                    .ok_or(AssignmentError::TooManyStations { count: stations })?;
                Ok(TrafficProfile {
                    station,
                    direction: Direction::Uplink,
                    category,
                    arrival: ArrivalModel::for_category(
                        category,
                        config.arrival_rate,
                        config.slot_time,
                    ),
                    payload_bytes: config.categories[category].payload_bytes,
                    start_offset: start_offset(rng.next_u64()),
                })
            })
            .collect::<Result<Vec<_>, AssignmentError>>()?;

        Ok(Self { profiles })
    }

    pub fn profiles(&self) -> &[TrafficProfile] {
        &self.profiles
    }

    pub fn get(&self, station: StationId) -> Option<&TrafficProfile> {
        self.profiles.iter().find(|p| p.station == station)
    }

    pub fn stations(&self) -> impl Iterator<Item = StationId> + '_ {
        self.profiles.iter().map(|p| p.station)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl<'a> IntoIterator for &'a TrafficPlan {
    type Item = &'a TrafficProfile;
    type IntoIter = std::slice::Iter<'a, TrafficProfile>;
    fn into_iter(self) -> Self::IntoIter {
        self.profiles.iter()
    }
}

/// Map 64 random bits onto `[0, MAX_START_OFFSET)`.
fn start_offset(bits: u64) -> Duration {
    // fixed point: bits / 2^64 is strictly below 1
    let nanos = (u128::from(bits) * MAX_START_OFFSET.as_nanos()) >> 64;
    Duration::from_nanos(nanos as u64)
}

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t\r\n\f,]+")]
enum ListToken {
    #[regex("[+-]?[0-9]+")]
    Code,
}

/// Parse a comma and/or whitespace separated list of category codes.
///
/// ```
/// # use edca_core::{traffic::parse_category_list, AccessCategory};
/// assert_eq!(
///     parse_category_list("0, 3 1").unwrap(),
///     vec![AccessCategory::BestEffort, AccessCategory::Voice, AccessCategory::Background],
/// );
/// assert!(parse_category_list("0,4").is_err());
/// ```
///
/// # Errors
///
/// [`AssignmentError::InvalidToken`] for anything that is not an
/// integer, [`AssignmentError::InvalidCategory`] for integers outside
/// `0..=3`.
pub fn parse_category_list(list: &str) -> Result<Vec<AccessCategory>, AssignmentError> {
    let mut lex = Lexer::<'_, ListToken>::new(list);
    let mut categories = Vec::new();

    while let Some(next) = lex.next() {
        let invalid_token = || AssignmentError::InvalidToken {
            token: lex.slice().to_owned(),
        };
        let ListToken::Code = next.map_err(|()| invalid_token())?;
        let code: i64 = lex.slice().parse().map_err(|_| invalid_token())?;

        let category = u8::try_from(code)
            .ok()
            .and_then(AccessCategory::from_code)
            .ok_or(AssignmentError::InvalidCategory {
                position: categories.len(),
                code,
            })?;
        categories.push(category);
    }

    Ok(categories)
}
