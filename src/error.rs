//! Domain-specific error types for the bootstrap engine.
//!
//! Internal modules return typed errors built with [`thiserror`]; the install
//! command converts them to [`anyhow::Error`] with `?` and attaches task
//! context. At the process boundary [`exit_code`] walks the error chain to
//! decide the exit status.
//!
//! # Error hierarchy
//!
//! ```text
//! PlatformError: unsupported host OS (fatal before any side effect)
//! ExecError:     external command could not start or exited non-zero
//! LinkError:     symlink reconciliation failures
//! ConfigError:   run configuration and manifest loading
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise from platform detection.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The host operating system is neither macOS nor Linux.
    #[error("unsupported operating system: {os}")]
    Unsupported {
        /// Operating system identifier reported by the compile target.
        os: String,
    },
}

/// Errors that arise from running external commands.
#[derive(Error, Debug)]
pub enum ExecError {
    /// The program exited with a non-zero status.
    #[error("command '{program}' failed ({})", describe_exit(.code))]
    Failed {
        /// Program that was invoked.
        program: String,
        /// Exit code, or `None` when the process was killed by a signal.
        code: Option<i32>,
    },

    /// The program could not be started at all.
    #[error("failed to execute '{program}': {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O error from the spawn attempt.
        source: std::io::Error,
    },
}

/// Errors that arise while reconciling a symlink.
#[derive(Error, Debug)]
pub enum LinkError {
    /// The repository file the link should point at does not exist.
    #[error("source does not exist: {}", .0.display())]
    SourceMissing(PathBuf),

    /// Moving existing content into the backup directory failed.
    ///
    /// Attached as context to the underlying move error.
    #[error("could not back up {} to {}", .path.display(), .backup_root.display())]
    Backup {
        /// Path of the content being backed up.
        path: PathBuf,
        /// Backup directory for this run.
        backup_root: PathBuf,
    },

    /// The symlink itself could not be created.
    #[error("could not create link {} -> {}: {source}", .link.display(), .target.display())]
    Create {
        /// Path where the link was to be created.
        link: PathBuf,
        /// Path the link was to point at.
        target: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise from building the run configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `HOME` is unset or empty.
    #[error("HOME environment variable is not set")]
    MissingHome,

    /// No dotfiles repository could be located.
    #[error("cannot determine dotfiles root. Use --root or set DOTFILES_ROOT")]
    RootNotFound,

    /// A package manifest exists but could not be read.
    #[error("IO error reading manifest {}: {source}", .path.display())]
    Manifest {
        /// Path to the manifest file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

#[allow(clippy::ref_option)]
fn describe_exit(code: &Option<i32>) -> String {
    code.map_or_else(
        || "terminated by signal".to_string(),
        |code| format!("exit {code}"),
    )
}

/// Map a failure to the process exit status.
///
/// The first [`ExecError::Failed`] in the chain with a usable exit code wins,
/// so a failing installer's own status is propagated. Everything else maps
/// to `1`.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| match cause.downcast_ref::<ExecError>() {
            Some(ExecError::Failed {
                code: Some(code), ..
            }) => u8::try_from(*code).ok().filter(|&c| c != 0),
            _ => None,
        })
        .unwrap_or(1)
}
