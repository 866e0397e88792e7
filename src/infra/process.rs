use std::ffi::OsStr;

use tokio::process::Command;
use tracing::debug;

use crate::domain::build::CommandOutput;
use crate::error::AppResult;

/// Runs `program` to completion and captures stdout followed by stderr.
///
/// Only a failure to launch is an error; the exit status is left to the caller.
pub async fn run_captured<I, S>(program: &str, args: I) -> AppResult<CommandOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command.args(args);
    debug!(command = ?command.as_std(), "running");

    let output = command.output().await.map_err(|err| {
        std::io::Error::new(err.kind(), format!("failed to run {program}: {err}"))
    })?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    debug!(program, exit_code = ?output.status.code(), "finished");

    Ok(CommandOutput {
        output: combined,
        exit_code: output.status.code(),
    })
}
