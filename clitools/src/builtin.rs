//! Tools linked into every `clitools` build with the `builtin` feature.

use std::io::{self, Write};

use crate::cli_tool;
use crate::registry::{CliTool, ToolFault};

/// Writes its arguments to standard output, separated by single spaces.
#[cli_tool(crate = crate::registry)]
#[derive(Debug, Default, Clone, Copy)]
pub struct Echo;

impl CliTool for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Prints its arguments to standard output"
    }

    fn run_main(&self, args: &[String]) -> Result<bool, ToolFault> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", args.join(" "))?;
        Ok(true)
    }
}
