use clap::Parser as _;
use edca::Args;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = edca::logging::init(args.log_level) {
        eprintln!("{error:#}");
        return ExitCode::FAILURE;
    }

    match edca::run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error:#}");
            ExitCode::from(error.exit_code())
        }
    }
}
