//! Subprocess execution
//!
//! The generator is run through the [`ProcessRunner`] trait so the
//! invocation logic can be exercised without spawning anything.

use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

/// Result of a subprocess execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,

    /// Process exit code, `None` when killed by a signal
    pub exit_code: Option<i32>,

    /// Execution duration
    pub duration: Duration,
}

impl CommandResult {
    /// Create a CommandResult from an exit status
    pub fn from_status(status: ExitStatus, duration: Duration) -> Self {
        Self {
            success: status.success(),
            exit_code: status.code(),
            duration,
        }
    }
}

/// Runs an external program to completion
pub trait ProcessRunner {
    /// Run `program` with `args` inside `cwd` and wait for it to exit
    ///
    /// Output is streamed to the terminal as it is produced. An error means
    /// the program could not be started; a non-zero exit is reported in the
    /// returned [`CommandResult`].
    fn run(&mut self, program: &str, args: &[String], cwd: &Path) -> Result<CommandResult>;
}

/// [`ProcessRunner`] spawning real child processes
#[derive(Debug, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&mut self, program: &str, args: &[String], cwd: &Path) -> Result<CommandResult> {
        run_command(program, args, cwd)
    }
}

/// Run a command, inheriting stdout/stderr, and block until it exits
///
/// There is no timeout; an interrupt reaches the child through the shared
/// process group and ends both.
pub fn run_command(program: &str, args: &[String], cwd: &Path) -> Result<CommandResult> {
    let start = Instant::now();

    let status = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to execute {}", program))?;

    Ok(CommandResult::from_status(status, start.elapsed()))
}

/// Check if a command exists in PATH
pub fn command_exists(program: &str) -> bool {
    which::which(program).is_ok()
}

#[cfg(test)]
pub mod testing {
    //! Test doubles for [`ProcessRunner`]

    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use anyhow::Result;

    use super::{CommandResult, ProcessRunner};

    /// Records every call instead of spawning, answering with `exit_code`
    #[derive(Debug, Default)]
    pub struct RecordingRunner {
        pub calls: Vec<(String, Vec<String>, PathBuf)>,
        pub exit_code: i32,
    }

    impl ProcessRunner for RecordingRunner {
        fn run(&mut self, program: &str, args: &[String], cwd: &Path) -> Result<CommandResult> {
            self.calls
                .push((program.to_string(), args.to_vec(), cwd.to_path_buf()));
            Ok(CommandResult {
                success: self.exit_code == 0,
                exit_code: Some(self.exit_code),
                duration: Duration::from_millis(1),
            })
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_command_success() {
        let temp = TempDir::new().unwrap();
        let result = run_command("true", &[], temp.path()).unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
    }

    #[test]
    fn test_run_command_reports_exit_code() {
        let temp = TempDir::new().unwrap();
        let args = vec!["-c".to_string(), "exit 3".to_string()];
        let result = run_command("sh", &args, temp.path()).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn test_run_command_uses_working_directory() {
        let temp = TempDir::new().unwrap();
        let args = vec!["-c".to_string(), "touch marker".to_string()];
        let result = SystemRunner.run("sh", &args, temp.path()).unwrap();
        assert!(result.success);
        assert!(temp.path().join("marker").is_file());
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(run_command("definitely-not-a-real-program-xyz", &[], temp.path()).is_err());
        assert!(!command_exists("definitely-not-a-real-program-xyz"));
        assert!(command_exists("sh"));
    }
}
