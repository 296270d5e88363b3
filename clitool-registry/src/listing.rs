//! Human-readable rendering of the tool set.

use std::io::{self, Write};

use clitool_primitives::CliTool;

/// Width of the right-aligned name column.
pub const NAME_WIDTH: usize = 10;

const WRAP_INDENT: &str = "    ";
const COLUMN_GAP: &str = "  ";

/// Writes one `name  description` row per tool.
///
/// Names longer than [`NAME_WIDTH`] push the description onto the next line,
/// indented by four spaces.
///
/// # Errors
///
/// Propagates any error returned by `out`.
pub fn write_listing<'a, I>(out: &mut dyn Write, tools: I) -> io::Result<()>
where
    I: IntoIterator<Item = &'a dyn CliTool>,
{
    for tool in tools {
        let name = tool.name();
        write!(out, "{name:>NAME_WIDTH$}")?;
        if name.chars().count() > NAME_WIDTH {
            writeln!(out)?;
            out.write_all(WRAP_INDENT.as_bytes())?;
        } else {
            out.write_all(COLUMN_GAP.as_bytes())?;
        }
        writeln!(out, "{}", tool.description())?;
    }
    Ok(())
}
