//! Sandboxed ngspice execution.
//!
//! [`SimulationSandbox`] runs an analysis command against an untrusted
//! netlist: each run gets its own [`Workspace`], the simulator runs as a
//! child process with that workspace as its working directory, output
//! streams are captured, and a wall-clock timeout hard-terminates runs
//! that hang on malformed input. The netlist is never parsed here; it is
//! opaque text.

mod workspace;

pub use workspace::{Workspace, INPUT_FILE_NAME};

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::config::SimulationConfig;

/// Classified result of one simulator invocation.
///
/// Exactly one variant is produced per run; no fault escapes as a panic or
/// error to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationOutcome {
    /// Simulator exited with code 0
    Success { stdout: String, stderr: String },

    /// Simulator exited with a non-zero code
    ToolError {
        exit_code: i32,
        stdout: String,
        stderr: String,
    },

    /// Simulator exceeded the wall-clock bound and was killed
    Timeout { limit: Duration },

    /// The run could not be performed at all (tool missing, filesystem fault)
    Internal { message: String },
}

/// Sandboxed simulator harness.
#[derive(Debug, Clone)]
pub struct SimulationSandbox {
    binary: PathBuf,
    timeout: Duration,
}

impl SimulationSandbox {
    /// Create a sandbox from the simulation configuration
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            timeout: config.timeout(),
        }
    }

    /// Override the wall-clock timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run `command` against `netlist` inside a fresh workspace.
    ///
    /// The workspace is dropped before returning, on every branch, so no
    /// generated simulator artifacts outlive the call.
    pub async fn run(&self, command: &str, netlist: &str) -> SimulationOutcome {
        let workspace = match Workspace::create() {
            Ok(workspace) => workspace,
            Err(e) => {
                return SimulationOutcome::Internal {
                    message: format!("failed to create workspace: {}", e),
                }
            }
        };

        if let Err(e) = workspace.write_input(netlist, command) {
            return SimulationOutcome::Internal {
                message: format!("failed to write input file: {}", e),
            };
        }

        tracing::debug!(
            binary = %self.binary.display(),
            workspace = %workspace.path().display(),
            "invoking simulator"
        );

        self.invoke(workspace.path()).await
    }

    /// Spawn the simulator in `workdir` and classify its outcome.
    ///
    /// The workspace path is passed to the spawn API as the child's working
    /// directory; the process-global current directory is never touched, so
    /// concurrent runs cannot interfere through it.
    async fn invoke(&self, workdir: &Path) -> SimulationOutcome {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-b")
            .arg(INPUT_FILE_NAME)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A timed-out run drops the child handle; this makes that drop
            // terminate the process instead of orphaning it.
            .kill_on_drop(true);

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return SimulationOutcome::Internal {
                    message: format!("failed to launch {}: {}", self.binary.display(), e),
                }
            }
        };

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

                if output.status.success() {
                    SimulationOutcome::Success { stdout, stderr }
                } else {
                    let exit_code = output.status.code().unwrap_or(-1);
                    tracing::warn!(exit_code, "simulator exited with failure");
                    SimulationOutcome::ToolError {
                        exit_code,
                        stdout,
                        stderr,
                    }
                }
            }
            Ok(Err(e)) => SimulationOutcome::Internal {
                message: format!("failed to collect simulator output: {}", e),
            },
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "simulator timed out, killed");
                SimulationOutcome::Timeout {
                    limit: self.timeout,
                }
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Instant;
    use tempfile::TempDir;

    /// Write an executable shell script standing in for the simulator.
    fn fake_tool(dir: &TempDir, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("fake-ngspice");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();

        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();

        path
    }

    fn sandbox_with(binary: PathBuf, timeout: Duration) -> SimulationSandbox {
        SimulationSandbox::new(&SimulationConfig {
            binary,
            timeout_ms: timeout.as_millis() as u64,
        })
    }

    #[tokio::test]
    async fn test_success_captures_stdout_and_cleans_workspace() {
        let dir = TempDir::new().unwrap();
        // Print the workspace path, then the input file
        let tool = fake_tool(&dir, "pwd\ncat \"$2\"");
        let sandbox = sandbox_with(tool, Duration::from_secs(5));

        let outcome = sandbox.run("op", "R1 1 0 1k\nV1 1 0 5").await;

        let stdout = match outcome {
            SimulationOutcome::Success { stdout, .. } => stdout,
            other => panic!("expected success, got {:?}", other),
        };

        assert!(stdout.contains("R1 1 0 1k"));
        assert!(stdout.contains(".control"));
        assert!(stdout.contains("op"));

        // First line is the workspace path; it must be gone after the call
        let workspace = stdout.lines().next().unwrap();
        assert!(workspace.contains("ngspice-run-"));
        assert!(!Path::new(workspace).exists());
    }

    #[tokio::test]
    async fn test_input_file_passed_by_relative_name() {
        let dir = TempDir::new().unwrap();
        let tool = fake_tool(&dir, "echo \"$1 $2\"");
        let sandbox = sandbox_with(tool, Duration::from_secs(5));

        let outcome = sandbox.run("op", "R1 1 0 1k").await;

        match outcome {
            SimulationOutcome::Success { stdout, .. } => {
                assert_eq!(stdout, format!("-b {}", INPUT_FILE_NAME));
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_tool_error_with_code_and_stderr() {
        let dir = TempDir::new().unwrap();
        let tool = fake_tool(&dir, "echo 'singular matrix' >&2\nexit 3");
        let sandbox = sandbox_with(tool, Duration::from_secs(5));

        let outcome = sandbox.run("op", "bogus netlist").await;

        match outcome {
            SimulationOutcome::ToolError {
                exit_code, stderr, ..
            } => {
                assert_eq!(exit_code, 3);
                assert!(stderr.contains("singular matrix"));
            }
            other => panic!("expected tool error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_hanging_tool_times_out() {
        let dir = TempDir::new().unwrap();
        let tool = fake_tool(&dir, "sleep 30");
        let limit = Duration::from_millis(200);
        let sandbox = sandbox_with(tool, limit);

        let start = Instant::now();
        let outcome = sandbox.run("tran 1u 1m", "R1 1 0 1k").await;
        let elapsed = start.elapsed();

        assert_eq!(outcome, SimulationOutcome::Timeout { limit });
        assert!(elapsed < Duration::from_secs(5), "timed out too late: {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_missing_binary_is_internal_error() {
        let sandbox = sandbox_with(
            PathBuf::from("/nonexistent/ngspice"),
            Duration::from_secs(1),
        );

        let outcome = sandbox.run("op", "R1 1 0 1k").await;

        match outcome {
            SimulationOutcome::Internal { message } => {
                assert!(message.contains("failed to launch"));
            }
            other => panic!("expected internal error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_concurrent_runs_use_distinct_workspaces() {
        let dir = TempDir::new().unwrap();
        let tool = fake_tool(&dir, "pwd");
        let sandbox = sandbox_with(tool, Duration::from_secs(5));

        let (a, b) = tokio::join!(
            sandbox.run("op", "R1 1 0 1k"),
            sandbox.run("op", "R1 1 0 1k")
        );

        let (path_a, path_b) = match (a, b) {
            (
                SimulationOutcome::Success { stdout: a, .. },
                SimulationOutcome::Success { stdout: b, .. },
            ) => (a, b),
            other => panic!("expected two successes, got {:?}", other),
        };

        assert_ne!(path_a, path_b);
    }
}
