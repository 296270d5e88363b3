//! Process-level entry point behind the `clitools` executable.

use std::ffi::OsString;

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use crate::config::{Environment, loader};
use crate::registry::{DispatchError, ToolDispatcher};

/// Converts raw process arguments into the strings handed to tools.
///
/// Arguments are numbered from 1, matching their position after the program
/// name.
///
/// # Errors
///
/// Returns an error naming the first argument that is not valid UTF-8.
pub fn collect_args<I>(args: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .enumerate()
        .map(|(index, arg)| {
            arg.into_string()
                .map_err(|_| anyhow!("argument {} is not valid UTF-8", index + 1))
        })
        .collect()
}

/// Builds the link-time discovering dispatcher, applying the configuration
/// file named by [`loader::CONFIG_PATH_KEY`] when `env` sets it.
///
/// # Errors
///
/// Returns an error when the configuration file cannot be loaded or one of
/// its patterns does not compile.
pub fn dispatcher(env: &dyn Environment) -> Result<ToolDispatcher> {
    let Some(path) = env.var(loader::CONFIG_PATH_KEY) else {
        return Ok(ToolDispatcher::default());
    };
    let config = loader::from_path(&path)
        .with_context(|| format!("failed to load configuration from {path}"))?;
    Ok(ToolDispatcher::from_config(&config)?)
}

/// Runs the tool selected by `env` with `args` and returns its verdict.
///
/// # Errors
///
/// Returns the tool's own fault unchanged, or an error when configuration
/// loading or diagnostics output fails.
pub fn dispatch(env: &dyn Environment, args: &[String]) -> Result<bool> {
    let mut dispatcher = dispatcher(env)?;
    debug!(?dispatcher, "dispatcher ready");
    match dispatcher.run(env, args) {
        Ok(verdict) => Ok(verdict),
        Err(DispatchError::Tool { fault, .. }) => Err(fault),
        Err(err) => Err(err.into()),
    }
}
