//! External codec processes.
//!
//! Every child is spawned with `kill_on_drop(true)` and awaited under a
//! timeout: when the future is dropped or the deadline passes the child is
//! killed and reaped, so no decoder keeps its input file open.

use crate::error::ConvertError;
use std::ffi::OsString;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Run `program args...` to completion, returning its captured output
pub async fn run_tool(program: &Path, args: &[OsString], timeout: Duration) -> Result<Output, ConvertError> {
    debug!("Command: {:?} {:?}", program, args);

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConvertError::MissingDependency(format!(
                    "{} could not be started (use --ffmpeg to point at its folder)",
                    program.display()
                ))
            } else {
                ConvertError::Io(e)
            }
        })?;

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(output) => Ok(output?),
        Err(_) => Err(ConvertError::Timeout(timeout.as_secs())),
    }
}

/// Run ffmpeg/ffprobe and turn a non-zero exit into `ConvertError::FFmpeg`
pub async fn run_ffmpeg(program: &Path, args: &[OsString], timeout: Duration) -> Result<Output, ConvertError> {
    let start_time = std::time::Instant::now();
    let output = run_tool(program, args, timeout).await?;

    if !output.status.success() {
        return Err(ConvertError::FFmpeg(stderr_tail(&output.stderr, output.status)));
    }

    debug!("{} finished in {:.1}s", program.display(), start_time.elapsed().as_secs_f64());
    Ok(output)
}

/// Last meaningful stderr line, or the exit status when stderr is empty
fn stderr_tail(stderr: &[u8], status: std::process::ExitStatus) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .map(str::to_string)
        .unwrap_or_else(|| format!("exited with {}", status))
}
