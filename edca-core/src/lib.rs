/*!
# EDCA experiment analytics

Configuration derivation and post-run analysis for single-BSS Wi-Fi
channel-access experiments:

* [`EdcaParameters`]: contention window bounds, AIFSN and TXOP limit of
  every access category;
* [`TrafficPlan`]: per-station access category and arrival model;
* [`decompose`]: split of each delivered packet's delay into queuing and
  channel access;
* [`RunStats`] and [`Report`]: per-station and global success, delay
  and throughput figures.

The simulator itself (PHY, MAC state machine, traffic generators) is not
part of this crate: it consumes the configuration produced here and
produces the [`PacketRecord`]s analysed here.
*/

mod category;
pub mod config;
mod decompose;
pub mod defaults;
mod edca;
mod id;
pub mod measure;
pub mod record;
pub mod report;
pub mod stats;
pub mod time;
pub mod traffic;

pub use self::{
    category::{AccessCategory, AccessCategoryParseError, PerCategory},
    config::{CategorySettings, ExperimentConfig},
    decompose::{decompose, decompose_batch, DecompositionError, DelaySample, DelaySeries},
    edca::{ContentionParameters, CwDerivationError, EdcaDerivationError, EdcaParameters},
    id::{LinkId, SeriesKey, StationId},
    measure::{Throughput, ThroughputUnit},
    record::{PacketRecord, RecordBatch, RecordsError},
    report::Report,
    stats::{AggregateStats, RunStats, StationStats},
    time::Timestamp,
    traffic::{
        ArrivalModel, ArrivalRate, AssignmentError, Direction, LengthPolicy, TrafficPlan,
        TrafficProfile,
    },
};
