/*!
# EDCA experiment runner

Command line front end of [`edca_core`]: reads the configuration and the
simulator's packet records, and appends the result rows to the output
file.

*/

mod cli;
pub mod logging;
mod run;
mod sink;

// convenient re-export of the `edca_core` objects a run deals with
pub use edca_core::{
    AccessCategory, ExperimentConfig, PacketRecord, RecordBatch, Report, TrafficPlan,
};

pub use self::{
    cli::Args,
    run::{EXIT_INCONSISTENT_DATA, EXIT_INVALID_INPUT, RunError, run},
    sink::ReportSink,
};
