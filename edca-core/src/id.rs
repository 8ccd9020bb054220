use anyhow::anyhow;
use std::{fmt, str};

/// Identifier of a node of the basic service set.
///
/// Node `0` is the access point; the stations configured from the
/// category list are numbered from `1` in list order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StationId(u32);

impl StationId {
    pub const ACCESS_POINT: Self = StationId::new(0);

    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Identifier of the `index`-th station of the category list.
    ///
    /// ```
    /// # use edca_core::StationId;
    /// assert_eq!(StationId::for_index(0), Some(StationId::new(1)));
    /// ```
    ///
    /// `None` when the index has no id.
    pub fn for_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok()?.checked_add(1).map(Self)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl str::FromStr for StationId {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .map(Self)
            .map_err(|error| anyhow!("invalid station id `{s}': {error}"))
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of one of a station's affiliated links.
///
/// Single-link stations only ever use link `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkId(u8);

impl LinkId {
    pub const PRIMARY: Self = LinkId::new(0);

    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl str::FromStr for LinkId {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .map(Self)
            .map_err(|error| anyhow!("invalid link id `{s}': {error}"))
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Composite key of a per-station, per-link packet series.
///
/// Ordering is station first, then link, so iterating a map keyed by
/// [`SeriesKey`] visits a station's links contiguously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesKey {
    pub station: StationId,
    pub link: LinkId,
}

impl SeriesKey {
    pub const fn new(station: StationId, link: LinkId) -> Self {
        Self { station, link }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(station {}, link {})", self.station, self.link)
    }
}
