use super::error::EngineError;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Captured result of a successful external tool run.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs `executable` with `args` to completion and captures its output.
///
/// Blocks the calling thread for the full duration of the tool; no timeout is
/// applied. A non-zero exit status is reported as [`EngineError::ToolFailed`].
pub(crate) fn run_tool(
    tool: &'static str,
    executable: &Path,
    args: &[OsString],
) -> Result<ToolOutput, EngineError> {
    debug!("Running {} {:?} {:?}", tool, executable, args);

    let output = Command::new(executable)
        .args(args)
        .output()
        .map_err(|source| EngineError::ToolUnavailable {
            tool,
            path: executable.to_path_buf(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(EngineError::ToolFailed {
            tool,
            status: output.status.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    debug!("{} finished ({} bytes of stdout).", tool, stdout.len());
    Ok(ToolOutput { stdout, stderr })
}
