//! Dotfiles bootstrap engine.
//!
//! Prepares a macOS or Linux machine for a dotfiles checkout: detects the
//! platform, installs system packages, bootstraps Homebrew, oh-my-zsh, its
//! plugins and nvm, switches the login shell to zsh, and finally links the
//! repository's configuration files into the home directory, backing up
//! anything real that was in the way.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: run configuration, the link table and package manifests
//! - **[`resources`]**: idempotent `check + apply` primitives
//! - **[`tasks`]**: named units of work wired to resources, run in order
//! - **[`commands`]**: top-level orchestration of the install run
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod resources;
pub mod tasks;

/// Build version: `DOTFILES_VERSION` from the build script when available,
/// else the package version.
pub const VERSION: &str = match option_env!("DOTFILES_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};
