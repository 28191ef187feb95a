//! Shared adb invocation helpers

use std::process::Output;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};

/// Build an adb command with an optional `-s <serial>` device specifier
pub(crate) fn adb_command(adb_path: &str, serial: Option<&str>) -> Command {
    let mut cmd = Command::new(adb_path);
    if let Some(serial) = serial {
        cmd.arg("-s").arg(serial);
    }
    cmd.kill_on_drop(true);
    cmd
}

/// Run a command to completion, failing if it outlives `timeout`
pub(crate) async fn run(mut cmd: Command, timeout: Duration, what: &str) -> Result<Output> {
    debug!("Running {}: {:?}", what, cmd.as_std());

    tokio::time::timeout(timeout, cmd.output())
        .await
        .map_err(|_| Error::Timeout(format!("{} timeout after {:?}", what, timeout)))?
        .map_err(Error::Io)
}

/// Like [`run`], but a non-zero exit status is an error
pub(crate) async fn run_checked(cmd: Command, timeout: Duration, what: &str) -> Result<Output> {
    let output = run(cmd, timeout, what).await?;
    if !output.status.success() {
        return Err(Error::CommandFailed(format!(
            "{} failed ({}): {}",
            what,
            output.status,
            combined_output(&output)
        )));
    }
    Ok(output)
}

pub(crate) fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{}{}", stdout, stderr).trim().to_string()
}
