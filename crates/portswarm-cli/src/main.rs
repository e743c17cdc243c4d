use portswarm_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // File logging first; fall back to stderr when the state dir is unusable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("portswarm error: {:#}", err);
        std::process::exit(1);
    }
}
