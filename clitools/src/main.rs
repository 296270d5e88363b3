//! `clitools` executable: runs the linked tool named by `CLI_TOOL`.

use std::process::ExitCode;

use anyhow::Result;
use clitools::cli;
use clitools::config::ProcessEnvironment;

fn main() -> Result<ExitCode> {
    if let Err(err) = clitools::telemetry::try_init() {
        eprintln!("warning: tracing already initialised: {err}");
    }

    let args = cli::collect_args(std::env::args_os().skip(1))?;
    if cli::dispatch(&ProcessEnvironment, &args)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
