use anyhow::{anyhow, bail, ensure, Result};
use logos::{Lexer, Logos};
use std::{fmt, str::FromStr, time::Duration};

/// A point in simulated time, in nanoseconds since the start of the run.
///
/// Timestamps are integers so that differences between them are exact:
/// a packet's queuing delay plus its access delay is always its
/// end-to-end delay, to the nanosecond.
///
/// ```
/// # use edca_core::Timestamp;
/// # use std::time::Duration;
/// let enqueued = Timestamp::from_nanos(100);
/// let dequeued = Timestamp::from_nanos(140);
/// assert_eq!(dequeued.duration_since(enqueued), Duration::from_nanos(40));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    #[inline]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    #[inline]
    pub const fn as_nanos(self) -> u64 {
        self.0
    }

    /// Time elapsed from `earlier` to `self`.
    ///
    /// Saturates to zero if `earlier` is after `self`. Callers that need
    /// to reject such pairs must compare the timestamps first.
    #[inline]
    pub fn duration_since(self, earlier: Self) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(earlier.0))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

impl FromStr for Timestamp {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .map(Self)
            .map_err(|error| anyhow!("invalid timestamp `{s}': {error}"))
    }
}

/// Parse a human readable duration such as `60s`, `9us` or `1s 500ms`.
///
/// Every number must be followed by a unit (`ns`, `us`/`μs`, `ms`, `s`,
/// `m`). Fractions are accepted (`1.5s`) and rounded to the nanosecond.
/// Successive terms are summed.
///
/// ```
/// # use edca_core::time::parse_duration;
/// # use std::time::Duration;
/// assert_eq!(parse_duration("1s 500ms").unwrap(), Duration::from_millis(1_500));
/// assert_eq!(parse_duration("9us").unwrap(), Duration::from_micros(9));
/// ```
pub fn parse_duration(s: &str) -> Result<Duration> {
    let mut lex = Lexer::<'_, Token>::new(s);
    let mut total = Duration::ZERO;
    let mut terms = 0usize;

    while let Some(next) = lex.next() {
        let token = next.map_err(|()| anyhow!("Unexpected input `{}' in {s:?}", lex.slice()))?;
        ensure!(
            token == Token::Value,
            "Expecting a number before `{}' in {s:?}",
            lex.slice()
        );
        let value = lex.slice();

        let Some(Ok(unit)) = lex.next() else {
            bail!("Expecting a unit after `{value}' in {s:?}")
        };
        let nanos_per_unit: u64 = match unit {
            Token::NanoSeconds => 1,
            Token::MicroSeconds => 1_000,
            Token::MilliSeconds => 1_000_000,
            Token::Seconds => 1_000_000_000,
            Token::Minutes => 60_000_000_000,
            Token::Value => bail!("Expecting a unit after `{value}' in {s:?}"),
        };

        let term = if value.contains('.') {
            let value: f64 = value.parse()?;
            let nanos = (value * nanos_per_unit as f64).round();
            ensure!(nanos < u64::MAX as f64, "Duration {s:?} is too large");
            Duration::from_nanos(nanos as u64)
        } else {
            let value: u64 = value.parse()?;
            let nanos = value
                .checked_mul(nanos_per_unit)
                .ok_or_else(|| anyhow!("Duration {s:?} is too large"))?;
            Duration::from_nanos(nanos)
        };

        total = total
            .checked_add(term)
            .ok_or_else(|| anyhow!("Duration {s:?} is too large"))?;
        terms += 1;
    }

    ensure!(terms > 0, "Empty duration");
    Ok(total)
}

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t\n\f]+")]
enum Token {
    #[token("ns")]
    NanoSeconds,
    #[regex("us|μs|µs")]
    MicroSeconds,
    #[token("ms")]
    MilliSeconds,
    #[token("s")]
    Seconds,
    #[token("m")]
    Minutes,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Value,
}
