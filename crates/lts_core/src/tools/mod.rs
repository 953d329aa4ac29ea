//! External tool resolution and the shared command runner.
//!
//! Every external process (ffprobe, ffmpeg, zbarimg) runs through
//! [`run_command`], which enforces a bounded timeout so a frozen tool
//! cannot stall the whole batch.

use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::config::ToolSettings;

/// Poll interval while waiting for a child process.
const WAIT_POLL: Duration = Duration::from_millis(25);

/// Errors from resolving or running external tools.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Tool binary not found on PATH or at the configured location.
    #[error("external tool not found: {name} (install it or set tools.{name} in the config file)")]
    Missing { name: String },

    /// Failed to spawn the process at all.
    #[error("failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// Tool exited with a non-zero status.
    #[error("{tool} failed with exit code {exit_code}: {stderr}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        stderr: String,
    },

    /// Tool did not finish within the allowed time and was killed.
    #[error("{tool} timed out after {timeout_secs}s and was killed")]
    Timeout { tool: String, timeout_secs: u64 },

    /// I/O error while driving the child process.
    #[error("I/O error while running {tool}: {source}")]
    Io {
        tool: String,
        #[source]
        source: std::io::Error,
    },
}

/// Captured result of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Resolved locations of the external collaborators.
#[derive(Debug, Clone)]
pub struct ToolPaths {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
    pub zbarimg: PathBuf,
}

impl ToolPaths {
    /// Resolve all tools, honoring explicit paths from settings first.
    pub fn resolve(settings: &ToolSettings) -> Result<Self, ToolError> {
        Ok(Self {
            ffmpeg: resolve_tool("ffmpeg", &settings.ffmpeg)?,
            ffprobe: resolve_tool("ffprobe", &settings.ffprobe)?,
            zbarimg: resolve_tool("zbarimg", &settings.zbarimg)?,
        })
    }
}

/// Find a tool binary: a non-empty configured path wins, otherwise PATH.
pub fn resolve_tool(name: &str, configured: &str) -> Result<PathBuf, ToolError> {
    if !configured.is_empty() {
        let path = PathBuf::from(configured);
        if path.is_file() {
            return Ok(path);
        }
        tracing::warn!(
            "configured path for {} does not exist ({}), falling back to PATH",
            name,
            path.display()
        );
    }
    which::which(name).map_err(|_| ToolError::Missing {
        name: name.to_string(),
    })
}

/// Run a command to completion with a bounded timeout, capturing stdout
/// and stderr. A non-zero exit is NOT an error here; callers that want
/// that policy use [`run_checked`].
pub fn run_command<S: AsRef<OsStr>>(
    program: &Path,
    args: &[S],
    timeout: Duration,
) -> Result<CommandOutput, ToolError> {
    let tool = tool_name(program);

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ToolError::Spawn {
            tool: tool.clone(),
            source: e,
        })?;

    // Drain both pipes on threads so a chatty tool can't deadlock on a
    // full pipe buffer while we poll for exit.
    let stdout_pipe = child.stdout.take().expect("stdout was piped");
    let stderr_pipe = child.stderr.take().expect("stderr was piped");
    let stdout_thread = std::thread::spawn(move || read_all(stdout_pipe));
    let stderr_thread = std::thread::spawn(move || read_all(stderr_pipe));

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = stdout_thread.join();
                    let _ = stderr_thread.join();
                    return Err(ToolError::Timeout {
                        tool,
                        timeout_secs: timeout.as_secs(),
                    });
                }
                std::thread::sleep(WAIT_POLL);
            }
            Err(e) => {
                let _ = child.kill();
                return Err(ToolError::Io { tool, source: e });
            }
        }
    };

    let stdout = stdout_thread.join().unwrap_or_default();
    let stderr = stderr_thread.join().unwrap_or_default();

    Ok(CommandOutput {
        exit_code: status.code().unwrap_or(-1),
        stdout,
        stderr,
    })
}

/// Run a command and treat any non-zero exit as [`ToolError::CommandFailed`].
pub fn run_checked<S: AsRef<OsStr>>(
    program: &Path,
    args: &[S],
    timeout: Duration,
) -> Result<CommandOutput, ToolError> {
    let output = run_command(program, args, timeout)?;
    if !output.success() {
        return Err(ToolError::CommandFailed {
            tool: tool_name(program),
            exit_code: output.exit_code,
            stderr: output.stderr.trim().to_string(),
        });
    }
    Ok(output)
}

fn tool_name(program: &Path) -> String {
    program
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| program.display().to_string())
}

fn read_all(mut pipe: impl Read) -> String {
    let mut buf = Vec::new();
    let _ = pipe.read_to_end(&mut buf);
    String::from_utf8_lossy(&buf).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_and_captures_stdout() {
        let out = run_command(Path::new("/bin/echo"), &["hello"], Duration::from_secs(5)).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[test]
    fn nonzero_exit_is_not_an_error_unchecked() {
        let out = run_command(
            Path::new("/bin/sh"),
            &["-c", "exit 3"],
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(out.exit_code, 3);
    }

    #[test]
    fn run_checked_rejects_nonzero_exit() {
        let err = run_checked(
            Path::new("/bin/sh"),
            &["-c", "echo boom >&2; exit 1"],
            Duration::from_secs(5),
        )
        .unwrap_err();
        match err {
            ToolError::CommandFailed {
                exit_code, stderr, ..
            } => {
                assert_eq!(exit_code, 1);
                assert!(stderr.contains("boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn kills_on_timeout() {
        let err = run_command(
            Path::new("/bin/sh"),
            &["-c", "sleep 30"],
            Duration::from_millis(200),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::Timeout { .. }));
    }

    #[test]
    fn missing_tool_is_reported() {
        let err = resolve_tool("definitely-not-a-real-tool-xyz", "").unwrap_err();
        assert!(matches!(err, ToolError::Missing { .. }));
    }
}
