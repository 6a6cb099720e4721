//! External command execution behind the [`Executor`] seam.
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use anyhow::Result;

use crate::error::ExecError;

/// Result of a command execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecResult {
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, or `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl From<ExitStatus> for ExecResult {
    fn from(status: ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
        }
    }
}

/// Narrow interface over external processes.
///
/// Production code uses [`SystemExecutor`]; tests substitute a fake that
/// records invocations and returns canned statuses.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run `program` with `args` and extra environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Spawn`] if the program cannot be started and
    /// [`ExecError::Failed`] if it exits non-zero.
    fn run_with_env(&self, program: &str, args: &[&str], env: &[(&str, &str)])
    -> Result<ExecResult>;

    /// Resolve `program` on `PATH`.
    fn which(&self, program: &str) -> Option<PathBuf>;

    /// Run `program` with `args`. Fails if the command exits non-zero.
    ///
    /// # Errors
    ///
    /// Same as [`Executor::run_with_env`].
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.run_with_env(program, args, &[])
    }
}

/// [`Executor`] that spawns real processes.
///
/// Standard streams are inherited so installer output and password prompts
/// reach the user unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExecResult> {
        tracing::debug!("exec: {program} {}", args.join(" "));
        let mut cmd = Command::new(program);
        cmd.args(args);
        for (key, value) in env {
            cmd.env(key, value);
        }
        let status = cmd.status().map_err(|source| ExecError::Spawn {
            program: program.to_string(),
            source,
        })?;
        let result = ExecResult::from(status);
        if !result.success {
            return Err(ExecError::Failed {
                program: program.to_string(),
                code: result.code,
            }
            .into());
        }
        Ok(result)
    }

    fn which(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

/// Recording fake for unit and integration tests.
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::path::PathBuf;
    use std::sync::{Mutex, PoisonError};

    use anyhow::Result;

    use super::{ExecResult, Executor};
    use crate::error::ExecError;

    /// Records every command line and answers `which` from a fixed list.
    ///
    /// A command fails with the configured code when its joined command line
    /// contains a registered needle.
    #[derive(Debug, Default)]
    pub struct RecordingExecutor {
        calls: Mutex<Vec<String>>,
        envs: Mutex<Vec<Vec<(String, String)>>>,
        programs: Vec<String>,
        failures: Vec<(String, i32)>,
    }

    impl RecordingExecutor {
        /// Create a fake with no programs on `PATH` and no failures.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Make `which` find each of `programs` under `/usr/bin`.
        #[must_use]
        pub fn with_programs(mut self, programs: &[&str]) -> Self {
            self.programs
                .extend(programs.iter().map(ToString::to_string));
            self
        }

        /// Fail any command line containing `needle` with exit `code`.
        #[must_use]
        pub fn failing_on(mut self, needle: &str, code: i32) -> Self {
            self.failures.push((needle.to_string(), code));
            self
        }

        /// All command lines run so far, in order.
        #[must_use]
        pub fn calls(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Environment passed with each call, in order.
        #[must_use]
        pub fn envs(&self) -> Vec<Vec<(String, String)>> {
            self.envs
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl Executor for RecordingExecutor {
        fn run_with_env(
            &self,
            program: &str,
            args: &[&str],
            env: &[(&str, &str)],
        ) -> Result<ExecResult> {
            let line = std::iter::once(program)
                .chain(args.iter().copied())
                .collect::<Vec<_>>()
                .join(" ");
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(line.clone());
            self.envs
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(
                    env.iter()
                        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                        .collect(),
                );
            if let Some((_, code)) = self.failures.iter().find(|(n, _)| line.contains(n)) {
                return Err(ExecError::Failed {
                    program: program.to_string(),
                    code: Some(*code),
                }
                .into());
            }
            Ok(ExecResult {
                success: true,
                code: Some(0),
            })
        }

        fn which(&self, program: &str) -> Option<PathBuf> {
            self.programs
                .iter()
                .any(|p| p == program)
                .then(|| PathBuf::from("/usr/bin").join(program))
        }
    }
}
