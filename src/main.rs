use std::process::ExitCode;
use clap::Parser;
use log::error;
use cloud_orchestrator::cli::{self, Cli};
use cloud_orchestrator::logger::StdoutLogger;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = StdoutLogger::init(cli.log_level()) {
        eprintln!("can't install logger: {}", err);
    }

    let result = cli::run(&cli);
    if let Err(err) = &result {
        error!("{}", err);
    }
    ExitCode::from(cli::exit_status(&result))
}
