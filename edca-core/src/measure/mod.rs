mod throughput;

pub use self::throughput::{Throughput, ThroughputUnit, ThroughputUnitParseError};
