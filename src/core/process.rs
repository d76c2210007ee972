//! Process execution utilities with timeout support
//!
//! Provides helpers for running external processes (yt-dlp and the ffmpeg it
//! drives) with configurable timeouts so a hung process cannot block a request
//! forever.

use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

/// Failure to obtain an `Output` from a child process.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The binary could not be started (missing, not executable, ...)
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting for the child failed
    #[error("failed to wait for `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The child did not finish in time and was killed
    #[error("`{program}` timed out after {}s", .timeout.as_secs())]
    TimedOut { program: String, timeout: Duration },
}

/// Run an async Command with a timeout.
///
/// stdout and stderr are captured. The child is spawned with `kill_on_drop`,
/// so on timeout dropping the pending future kills it.
pub async fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> Result<Output, ProcessError> {
    let program = cmd.as_std().get_program().to_string_lossy().into_owned();

    let child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ProcessError::Spawn {
            program: program.clone(),
            source,
        })?;

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(source)) => Err(ProcessError::Wait { program, source }),
        Err(_) => {
            log::error!("{} process timed out after {}s, killing", program, timeout.as_secs());
            Err(ProcessError::TimedOut { program, timeout })
        }
    }
}
