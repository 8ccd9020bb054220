//! Per-packet completion records produced by the MAC layer.
//!
//! The text form is one record per line:
//!
//! ```text
//! station,link,enqueue_ns,dequeue_ns,failures
//! 5,0,100,140,0
//! 5,0,150,380,1
//! ```
//!
//! Blank lines, `#` comments and a header line starting with `station`
//! are ignored.

use crate::{
    id::{LinkId, SeriesKey, StationId},
    time::Timestamp,
};
use std::{collections::BTreeMap, io::BufRead, str::FromStr};
use thiserror::Error;

/// A successfully delivered packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketRecord {
    pub station: StationId,
    pub link: LinkId,
    /// When the packet entered the MAC queue.
    pub enqueued: Timestamp,
    /// When the packet left the queue after its successful transmission.
    pub dequeued: Timestamp,
    /// Failed attempts before the successful one.
    pub failures: u32,
}

impl PacketRecord {
    pub fn key(&self) -> SeriesKey {
        SeriesKey::new(self.station, self.link)
    }

    /// Transmission attempts spent on this packet, the successful one
    /// included.
    pub fn attempts(&self) -> u64 {
        1 + u64::from(self.failures)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordParseError {
    #[error("missing field `{0}'")]
    MissingField(&'static str),
    #[error("invalid {field} `{value}'")]
    InvalidField { field: &'static str, value: String },
    #[error("unexpected trailing field `{0}'")]
    TrailingField(String),
}

const FIELDS: [&str; 5] = ["station", "link", "enqueue_ns", "dequeue_ns", "failures"];

impl FromStr for PacketRecord {
    type Err = RecordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split(',').map(str::trim);
        let mut next = |index: usize| {
            fields
                .next()
                .filter(|f| !f.is_empty())
                .ok_or(RecordParseError::MissingField(FIELDS[index]))
        };

        fn parse<T: FromStr>(field: &'static str, value: &str) -> Result<T, RecordParseError> {
            value.parse().map_err(|_| RecordParseError::InvalidField {
                field,
                value: value.to_owned(),
            })
        }

        let record = Self {
            station: parse(FIELDS[0], next(0)?)?,
            link: parse(FIELDS[1], next(1)?)?,
            enqueued: parse(FIELDS[2], next(2)?)?,
            dequeued: parse(FIELDS[3], next(3)?)?,
            failures: parse(FIELDS[4], next(4)?)?,
        };

        if let Some(extra) = fields.next() {
            return Err(RecordParseError::TrailingField(extra.to_owned()));
        }

        Ok(record)
    }
}

#[derive(Debug, Error)]
pub enum RecordsError {
    #[error("failed to read packet records")]
    Io(#[from] std::io::Error),
    #[error("packet record on line {line}: {source}")]
    Line {
        line: usize,
        source: RecordParseError,
    },
}

/// A complete batch of records, grouped per `(station, link)`.
///
/// Records keep their arrival order inside each series; series are
/// iterated in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordBatch {
    series: BTreeMap<SeriesKey, Vec<PacketRecord>>,
}

impl RecordBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: PacketRecord) {
        self.series.entry(record.key()).or_default().push(record);
    }

    /// Read a batch from its text form.
    ///
    /// # Errors
    ///
    /// I/O failures and the first malformed line, with its 1-based line
    /// number.
    pub fn read<R: BufRead>(reader: R) -> Result<Self, RecordsError> {
        let mut batch = Self::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("station") {
                continue;
            }

            let record = line.parse().map_err(|source| RecordsError::Line {
                line: index + 1,
                source,
            })?;
            batch.push(record);
        }

        Ok(batch)
    }

    pub fn series(&self) -> impl Iterator<Item = (SeriesKey, &[PacketRecord])> {
        self.series
            .iter()
            .map(|(key, records)| (*key, records.as_slice()))
    }

    pub fn get(&self, key: SeriesKey) -> Option<&[PacketRecord]> {
        self.series.get(&key).map(Vec::as_slice)
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl FromIterator<PacketRecord> for RecordBatch {
    fn from_iter<I: IntoIterator<Item = PacketRecord>>(iter: I) -> Self {
        let mut batch = Self::new();
        iter.into_iter().for_each(|record| batch.push(record));
        batch
    }
}
