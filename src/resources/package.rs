//! Package installation resource.
use std::fmt;
use std::path::Path;

use anyhow::{Context as _, Result};

use super::{Applicable, ResourceChange};
use crate::exec::Executor;

/// Homebrew binaries checked when `brew` is not yet on `PATH` (fresh install).
const BREW_BINARIES: [&str; 2] = ["/opt/homebrew/bin/brew", "/usr/local/bin/brew"];

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// Homebrew (macOS).
    Brew,
    /// Debian/Ubuntu `apt-get`.
    Apt,
    /// Fedora/RHEL `dnf`.
    Dnf,
    /// Arch Linux `pacman`.
    Pacman,
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brew => write!(f, "brew"),
            Self::Apt => write!(f, "apt"),
            Self::Dnf => write!(f, "dnf"),
            Self::Pacman => write!(f, "pacman"),
        }
    }
}

impl PackageManager {
    /// Linux managers in detection priority order, with the binary that
    /// identifies each one.
    pub const LINUX_PRIORITY: [(&'static str, Self); 3] =
        [("apt-get", Self::Apt), ("dnf", Self::Dnf), ("pacman", Self::Pacman)];

    /// Program and leading arguments that install a single package.
    fn install_prefix(self, brew: &str) -> (String, Vec<&'static str>) {
        match self {
            Self::Brew => (brew.to_string(), vec!["install"]),
            Self::Apt => ("sudo".to_string(), vec!["apt-get", "install", "-y"]),
            Self::Dnf => ("sudo".to_string(), vec!["dnf", "install", "-y"]),
            Self::Pacman => (
                "sudo".to_string(),
                vec!["pacman", "-S", "--needed", "--noconfirm"],
            ),
        }
    }
}

/// Resolve the `brew` program, preferring `PATH` and falling back to the
/// standard install prefixes.
#[must_use]
pub fn brew_program(executor: &dyn Executor) -> String {
    if let Some(path) = executor.which("brew") {
        return path.to_string_lossy().into_owned();
    }
    BREW_BINARIES
        .iter()
        .find(|p| Path::new(p).exists())
        .map_or_else(|| "brew".to_string(), ToString::to_string)
}

/// Refresh the package index where the manager needs it before installs.
///
/// Only `apt` keeps a stale index between runs; the others are a no-op.
///
/// # Errors
///
/// Returns an error if the refresh command fails.
pub fn refresh_index(manager: PackageManager, executor: &dyn Executor) -> Result<bool> {
    if manager == PackageManager::Apt {
        executor
            .run("sudo", &["apt-get", "update"])
            .context("refresh apt package index")?;
        return Ok(true);
    }
    Ok(false)
}

/// Install everything listed in a Brewfile, letting Homebrew parse it.
///
/// # Errors
///
/// Returns an error if `brew bundle` exits non-zero.
pub fn bundle_install(executor: &dyn Executor, brewfile: &Path) -> Result<()> {
    let brew = brew_program(executor);
    let file = brewfile.to_string_lossy();
    executor
        .run(&brew, &["bundle", "--file", &file])
        .with_context(|| format!("brew bundle --file {file}"))?;
    Ok(())
}

/// A system package that can be installed.
#[derive(Debug)]
pub struct PackageResource<'a> {
    /// Package name.
    pub name: String,
    /// Package manager to use.
    pub manager: PackageManager,
    executor: &'a dyn Executor,
}

impl<'a> PackageResource<'a> {
    /// Create a new package resource.
    #[must_use]
    pub const fn new(name: String, manager: PackageManager, executor: &'a dyn Executor) -> Self {
        Self {
            name,
            manager,
            executor,
        }
    }

    /// The full command line that installs this package.
    #[must_use]
    pub fn command_line(&self) -> String {
        let brew = if self.manager == PackageManager::Brew {
            brew_program(self.executor)
        } else {
            String::new()
        };
        let (program, args) = self.manager.install_prefix(&brew);
        format!("{program} {} {}", args.join(" "), self.name)
    }
}

impl Applicable for PackageResource<'_> {
    fn description(&self) -> String {
        format!("{} ({})", self.name, self.manager)
    }

    fn apply(&self) -> Result<ResourceChange> {
        let name = self.name.trim();
        if name.is_empty() {
            return Ok(ResourceChange::Skipped {
                reason: "empty package name".to_string(),
            });
        }
        let brew = if self.manager == PackageManager::Brew {
            brew_program(self.executor)
        } else {
            String::new()
        };
        let (program, prefix) = self.manager.install_prefix(&brew);
        let mut args: Vec<&str> = prefix;
        args.push(name);
        self.executor.run(&program, &args)?;
        Ok(ResourceChange::Applied)
    }
}
