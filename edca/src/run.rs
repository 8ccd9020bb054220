use crate::{cli::Args, sink::ReportSink};
use edca_core::{
    AssignmentError, DecompositionError, EdcaDerivationError, EdcaParameters, RecordBatch,
    RecordsError, Report, TrafficPlan, traffic::ArrivalRateError,
};
use std::{fs::File, io::BufReader, path::PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Exit status of invalid configuration.
pub const EXIT_INVALID_INPUT: u8 = 2;
/// Exit status of inconsistent packet records.
pub const EXIT_INCONSISTENT_DATA: u8 = 3;

/// Fatal failure of a run. No row is written when a run fails.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    ArrivalRate(#[from] ArrivalRateError),
    #[error(transparent)]
    Edca(#[from] EdcaDerivationError),
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
    #[error("{}: {source}", path.display())]
    Records { path: PathBuf, source: RecordsError },
    #[error(transparent)]
    Decomposition(#[from] DecompositionError),
    #[error(transparent)]
    Output(#[from] anyhow::Error),
}

impl RunError {
    /// Process exit status: input validation and data consistency
    /// failures each have their own, everything else is `1`.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ArrivalRate(_) | Self::Edca(_) | Self::Assignment(_) => EXIT_INVALID_INPUT,
            Self::Decomposition(_)
            | Self::Records {
                source: RecordsError::Line { .. },
                ..
            } => EXIT_INCONSISTENT_DATA,
            Self::Records { .. } | Self::Output(_) => 1,
        }
    }
}

/// Derive the configuration, analyse the records and append the rows.
///
/// The rows are only written once the whole report has been computed.
pub fn run(args: &Args) -> Result<Report, RunError> {
    let config = args.experiment()?;

    let edca = EdcaParameters::derive(&config.categories)?;
    for (category, params) in edca.iter() {
        info!(
            %category,
            cw_min = params.cw_min(),
            cw_max = params.cw_max(),
            aifsn = params.aifsn(),
            txop_limit = ?params.txop_limit(),
            "EDCA parameters"
        );
    }

    let plan = TrafficPlan::assign(&config, &args.node_acs)?;
    for profile in &plan {
        debug!(
            station = %profile.station,
            category = %profile.category,
            tid = profile.category.low_tid(),
            arrival = ?profile.arrival,
            payload_bytes = profile.payload_bytes,
            start_offset = ?profile.start_offset,
            "traffic profile"
        );
    }

    let mut sink = ReportSink::append(&args.output)?;

    let batch = read_records(args)?;
    info!(
        records = batch.len(),
        path = %args.records.display(),
        "packet records loaded"
    );

    let report = Report::analyze(&config, &plan, &batch)?;

    sink.write(&report)?;
    info!(
        rows = report.stations.len() + 1,
        path = %sink.path().display(),
        success_probability = report.summary.success_probability,
        "report written"
    );
    sink.finish()?;

    Ok(report)
}

fn read_records(args: &Args) -> Result<RecordBatch, RunError> {
    let records = |source| RunError::Records {
        path: args.records.clone(),
        source,
    };
    let file = File::open(&args.records).map_err(|error| records(RecordsError::Io(error)))?;
    RecordBatch::read(BufReader::new(file)).map_err(records)
}
