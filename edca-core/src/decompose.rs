//! Split of every packet's end-to-end delay into a queuing part and a
//! channel access part.
//!
//! A packet becomes *head-of-line*, and starts contending for the
//! channel, once it is in the queue and the packet before it in the same
//! `(station, link)` queue has left:
//!
//! ```text
//! hol[i]      = max(enqueue[i], dequeue[i - 1])
//! queuing[i]  = hol[i] - enqueue[i]
//! access[i]   = dequeue[i] - hol[i]
//! ```
//!
//! The first packet of a series has no predecessor in the batch, but the
//! collection window may have opened with packets already queued, so its
//! head-of-line time is unknown. It is dropped: a series of `m` records
//! yields `m - 1` samples.

use crate::{
    id::SeriesKey,
    record::{PacketRecord, RecordBatch},
    time::Timestamp,
};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Delay decomposition of one packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelaySample {
    pub head_of_line: Timestamp,
    pub queuing: Duration,
    pub access: Duration,
    /// `dequeue - enqueue`, always `queuing + access`.
    pub end_to_end: Duration,
    /// Failed attempts before the packet got through.
    pub failures: u32,
}

/// The samples of one `(station, link)` series, in record order and
/// without the first record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelaySeries {
    key: SeriesKey,
    samples: Vec<DelaySample>,
}

impl DelaySeries {
    pub fn key(&self) -> SeriesKey {
        self.key
    }

    pub fn samples(&self) -> &[DelaySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Inconsistent timing in the records of a series.
///
/// `index` is the position of the offending record in the series, first
/// record included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecompositionError {
    #[error("record {index} of {key} leaves the queue ({dequeued}) before entering it ({enqueued})")]
    DequeueBeforeEnqueue {
        key: SeriesKey,
        index: usize,
        enqueued: Timestamp,
        dequeued: Timestamp,
    },
    #[error("record {index} of {key} completes ({dequeued}) before the previous record ({previous})")]
    NonMonotonic {
        key: SeriesKey,
        index: usize,
        previous: Timestamp,
        dequeued: Timestamp,
    },
}

impl DecompositionError {
    /// The series that failed.
    pub fn key(&self) -> SeriesKey {
        match self {
            Self::DequeueBeforeEnqueue { key, .. } | Self::NonMonotonic { key, .. } => *key,
        }
    }
}

/// Decompose the records of one series.
///
/// ```
/// # use edca_core::{decompose, LinkId, PacketRecord, SeriesKey, StationId, Timestamp};
/// # use std::time::Duration;
/// let key = SeriesKey::new(StationId::new(5), LinkId::PRIMARY);
/// let record = |enqueued, dequeued| PacketRecord {
///     station: key.station,
///     link: key.link,
///     enqueued: Timestamp::from_nanos(enqueued),
///     dequeued: Timestamp::from_nanos(dequeued),
///     failures: 0,
/// };
/// let series = decompose(key, &[record(100, 140), record(150, 380)]).unwrap();
///
/// assert_eq!(series.len(), 1);
/// assert_eq!(series.samples()[0].access, Duration::from_nanos(230));
/// ```
///
/// # Errors
///
/// A record that is dequeued before it is enqueued, or that completes
/// before its predecessor in the series.
pub fn decompose(key: SeriesKey, records: &[PacketRecord]) -> Result<DelaySeries, DecompositionError> {
    let mut samples = Vec::with_capacity(records.len().saturating_sub(1));
    let mut previous: Option<Timestamp> = None;

    for (index, record) in records.iter().enumerate() {
        let PacketRecord {
            enqueued, dequeued, ..
        } = *record;

        if dequeued < enqueued {
            return Err(DecompositionError::DequeueBeforeEnqueue {
                key,
                index,
                enqueued,
                dequeued,
            });
        }

        if let Some(previous) = previous {
            if dequeued < previous {
                return Err(DecompositionError::NonMonotonic {
                    key,
                    index,
                    previous,
                    dequeued,
                });
            }

            let head_of_line = enqueued.max(previous);
            samples.push(DelaySample {
                head_of_line,
                queuing: head_of_line.duration_since(enqueued),
                access: dequeued.duration_since(head_of_line),
                end_to_end: dequeued.duration_since(enqueued),
                failures: record.failures,
            });
        }

        previous = Some(dequeued);
    }

    debug!(%key, records = records.len(), samples = samples.len(), "series decomposed");

    Ok(DelaySeries { key, samples })
}

/// Decompose every series of `batch`, in key order.
///
/// # Errors
///
/// The error of the first series (in key order) that fails.
pub fn decompose_batch(batch: &RecordBatch) -> Result<Vec<DelaySeries>, DecompositionError> {
    batch
        .series()
        .map(|(key, records)| decompose(key, records))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{LinkId, StationId};

    fn key() -> SeriesKey {
        SeriesKey::new(StationId::new(5), LinkId::PRIMARY)
    }

    fn records(enqueue: &[u64], dequeue: &[u64], failures: &[u32]) -> Vec<PacketRecord> {
        enqueue
            .iter()
            .zip(dequeue)
            .zip(failures)
            .map(|((&e, &d), &f)| PacketRecord {
                station: key().station,
                link: key().link,
                enqueued: Timestamp::from_nanos(e),
                dequeued: Timestamp::from_nanos(d),
                failures: f,
            })
            .collect()
    }

    fn nanos(values: impl IntoIterator<Item = Duration>) -> Vec<u128> {
        values.into_iter().map(|d| d.as_nanos()).collect()
    }

    #[test]
    fn reference_series() {
        let input = records(&[100, 150, 400], &[140, 380, 420], &[0, 1, 0]);
        let series = decompose(key(), &input).unwrap();
        let samples = series.samples();

        assert_eq!(series.key(), key());
        assert_eq!(
            samples.iter().map(|s| s.head_of_line.as_nanos()).collect::<Vec<_>>(),
            vec![150, 400]
        );
        assert_eq!(nanos(samples.iter().map(|s| s.queuing)), vec![0, 0]);
        assert_eq!(nanos(samples.iter().map(|s| s.access)), vec![230, 20]);
        assert_eq!(nanos(samples.iter().map(|s| s.end_to_end)), vec![230, 20]);
        assert_eq!(
            samples.iter().map(|s| s.failures).collect::<Vec<_>>(),
            vec![1, 0]
        );
    }

    #[test]
    fn backlogged_queue() {
        // second packet arrives while the first is still being served
        let input = records(&[0, 10, 20], &[50, 90, 95], &[0, 0, 2]);
        let series = decompose(key(), &input).unwrap();
        let samples = series.samples();

        assert_eq!(samples[0].head_of_line, Timestamp::from_nanos(50));
        assert_eq!(nanos(samples.iter().map(|s| s.queuing)), vec![40, 70]);
        assert_eq!(nanos(samples.iter().map(|s| s.access)), vec![40, 5]);
    }

    #[test]
    fn head_of_line_bounds_and_exact_sum() {
        let enqueue = [3, 7, 7, 12, 40, 41, 41, 90];
        let dequeue = [9, 11, 30, 30, 45, 60, 75, 91];
        let input = records(&enqueue, &dequeue, &[0; 8]);
        let series = decompose(key(), &input).unwrap();
        assert_eq!(series.len(), enqueue.len() - 1);

        for (i, sample) in series.samples().iter().enumerate() {
            let index = i + 1;
            assert!(sample.head_of_line.as_nanos() >= dequeue[index - 1]);
            assert!(sample.head_of_line.as_nanos() >= enqueue[index]);
            assert_eq!(sample.queuing + sample.access, sample.end_to_end);
        }
    }

    #[test]
    fn short_series() {
        assert!(decompose(key(), &[]).unwrap().is_empty());
        let single = records(&[5], &[8], &[3]);
        assert!(decompose(key(), &single).unwrap().is_empty());
    }

    #[test]
    fn dequeue_before_enqueue() {
        let input = records(&[100, 150, 400], &[140, 380, 390], &[0, 0, 0]);
        let error = decompose(key(), &input).unwrap_err();
        assert_eq!(
            error,
            DecompositionError::DequeueBeforeEnqueue {
                key: key(),
                index: 2,
                enqueued: Timestamp::from_nanos(400),
                dequeued: Timestamp::from_nanos(390),
            }
        );
        assert_eq!(error.key(), key());
    }

    #[test]
    fn first_record_is_still_validated() {
        let input = records(&[100, 150], &[90, 380], &[0, 0]);
        assert!(matches!(
            decompose(key(), &input),
            Err(DecompositionError::DequeueBeforeEnqueue { index: 0, .. })
        ));
    }

    #[test]
    fn out_of_order_completion() {
        let input = records(&[100, 110], &[200, 150], &[0, 0]);
        assert_eq!(
            decompose(key(), &input),
            Err(DecompositionError::NonMonotonic {
                key: key(),
                index: 1,
                previous: Timestamp::from_nanos(200),
                dequeued: Timestamp::from_nanos(150),
            })
        );
    }

    #[test]
    fn error_names_the_series() {
        let input = records(&[100, 110], &[200, 150], &[0, 0]);
        let message = decompose(key(), &input).unwrap_err().to_string();
        assert!(message.contains("(station 5, link 0)"), "{message}");
    }

    #[test]
    fn batch_fails_on_bad_key() {
        let mut batch: RecordBatch = records(&[1, 2], &[3, 4], &[0, 0]).into_iter().collect();
        let bad = SeriesKey::new(StationId::new(7), LinkId::new(1));
        batch.push(PacketRecord {
            station: bad.station,
            link: bad.link,
            enqueued: Timestamp::from_nanos(10),
            dequeued: Timestamp::from_nanos(5),
            failures: 0,
        });

        assert_eq!(decompose_batch(&batch).unwrap_err().key(), bad);
    }

    #[test]
    fn batch_in_key_order() {
        let mut batch = RecordBatch::new();
        for station in [3u32, 1, 2] {
            for (e, d) in [(0u64, 5u64), (1, 9)] {
                batch.push(PacketRecord {
                    station: StationId::new(station),
                    link: LinkId::PRIMARY,
                    enqueued: Timestamp::from_nanos(e),
                    dequeued: Timestamp::from_nanos(d),
                    failures: 0,
                });
            }
        }
        let stations: Vec<_> = decompose_batch(&batch)
            .unwrap()
            .iter()
            .map(|s| s.key().station.get())
            .collect();
        assert_eq!(stations, vec![1, 2, 3]);
    }
}
