use shardstage::{cli, logging};

fn main() {
    // Initialize logging as early as possible; a missing state dir must not
    // keep the tool from running.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    match cli::run_from_args() {
        Ok(report) if report.is_failure() => std::process::exit(1),
        Ok(_) => {}
        Err(err) => {
            eprintln!("shardstage error: {:#}", err);
            std::process::exit(1);
        }
    }
}
