use std::process::ExitCode;

use beacon_exec::{ConsumerArgs, consumer};
use beacon_observe::{LoggerConfig, logger_init};
use tracing::{error, info};

fn main() -> ExitCode {
    match LoggerConfig::from_env() {
        Ok(cfg) => {
            if let Err(e) = logger_init(&cfg) {
                eprintln!("beacon-consumer: logger init failed: {e}");
            }
        }
        Err(e) => eprintln!("beacon-consumer: bad logger config: {e}"),
    }

    let args = match ConsumerArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            error!(error = %e, "bad arguments");
            eprintln!("usage: beacon-consumer [--framing tagged|sentinel] [--surface auto|terminal|console] [--title <text>]");
            return ExitCode::from(2);
        }
    };

    match consumer::run(&args) {
        Ok(outcome) => {
            info!(?outcome, "consumer exiting");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "consumer failed");
            ExitCode::FAILURE
        }
    }
}
