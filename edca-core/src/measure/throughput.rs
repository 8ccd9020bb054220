use std::{fmt, str::FromStr, time::Duration};

/// Unit in which throughput values are reported.
///
/// Units are decimal (`1kbps = 1_000bps`), as is customary for link
/// rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThroughputUnit {
    Bps,
    Kbps,
    #[default]
    Mbps,
    Gbps,
}

impl ThroughputUnit {
    pub const fn bits_per_second(self) -> f64 {
        match self {
            Self::Bps => 1.0,
            Self::Kbps => 1e3,
            Self::Mbps => 1e6,
            Self::Gbps => 1e9,
        }
    }
}

impl fmt::Display for ThroughputUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bps => "bps",
            Self::Kbps => "kbps",
            Self::Mbps => "mbps",
            Self::Gbps => "gbps",
        })
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown throughput unit `{0}', expected one of bps, kbps, mbps, gbps")]
pub struct ThroughputUnitParseError(String);

impl FromStr for ThroughputUnit {
    type Err = ThroughputUnitParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bps" => Ok(Self::Bps),
            "kbps" => Ok(Self::Kbps),
            "mbps" => Ok(Self::Mbps),
            "gbps" => Ok(Self::Gbps),
            _ => Err(ThroughputUnitParseError(s.to_owned())),
        }
    }
}

/// Delivered application throughput.
///
/// ```
/// # use edca_core::measure::{Throughput, ThroughputUnit};
/// # use std::time::Duration;
/// // 1000 packets of 1500 bytes in 60 seconds
/// let thpt = Throughput::delivered(1_000, 1_500, Duration::from_secs(60));
/// assert_eq!(thpt.in_unit(ThroughputUnit::Kbps), 200.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Throughput(f64);

impl Throughput {
    pub const ZERO: Self = Self(0.0);

    /// Throughput of `packets` payloads of `payload_bytes` delivered over
    /// `window`. An empty window yields zero rather than an infinite rate.
    pub fn delivered(packets: u64, payload_bytes: u32, window: Duration) -> Self {
        let seconds = window.as_secs_f64();
        if seconds == 0.0 {
            return Self::ZERO;
        }
        let bits = packets as f64 * f64::from(payload_bytes) * 8.0;
        Self(bits / seconds)
    }

    pub fn bits_per_second(self) -> f64 {
        self.0
    }

    pub fn in_unit(self, unit: ThroughputUnit) -> f64 {
        self.0 / unit.bits_per_second()
    }
}

impl std::ops::Add for Throughput {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::iter::Sum for Throughput {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, t| acc + t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivered() {
        let thpt = Throughput::delivered(2, 1_500, Duration::from_secs(1));
        assert_eq!(thpt.bits_per_second(), 24_000.0);
        assert_eq!(thpt.in_unit(ThroughputUnit::Mbps), 0.024);
    }

    #[test]
    fn empty_window_is_zero() {
        assert_eq!(
            Throughput::delivered(10, 1_500, Duration::ZERO),
            Throughput::ZERO
        );
    }

    #[test]
    fn sum() {
        let total: Throughput = [1u64, 2, 3]
            .into_iter()
            .map(|n| Throughput::delivered(n, 125, Duration::from_secs(1)))
            .sum();
        assert_eq!(total.bits_per_second(), 6_000.0);
    }

    #[test]
    fn parse_unit() {
        assert_eq!("Mbps".parse::<ThroughputUnit>().unwrap(), ThroughputUnit::Mbps);
        assert_eq!("gbps".parse::<ThroughputUnit>().unwrap(), ThroughputUnit::Gbps);
        assert!("MiB/s".parse::<ThroughputUnit>().is_err());
    }

    #[test]
    fn unit_display_round_trip() {
        for unit in [
            ThroughputUnit::Bps,
            ThroughputUnit::Kbps,
            ThroughputUnit::Mbps,
            ThroughputUnit::Gbps,
        ] {
            assert_eq!(unit.to_string().parse::<ThroughputUnit>().unwrap(), unit);
        }
    }
}
