//! Package manifests: one package name per line, `#` comments and blank lines ignored.
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::resources::package::PackageManager;

/// Packages installed when the detected manager has no manifest.
pub const DEFAULT_PACKAGES: [&str; 7] = ["git", "zsh", "curl", "tmux", "neovim", "ripgrep", "fzf"];

/// Package providing `fd`, whose name differs between distributions.
const fn fd_package(manager: PackageManager) -> &'static str {
    match manager {
        PackageManager::Apt | PackageManager::Dnf => "fd-find",
        PackageManager::Brew | PackageManager::Pacman => "fd",
    }
}

/// Extract package names from manifest text.
///
/// Lines are trimmed; empty lines and lines starting with `#` are dropped.
/// Applying this to its own output yields the same list.
///
/// # Examples
///
/// ```
/// use dotfiles_bootstrap::config::manifest::parse;
///
/// let packages = parse("\n# comment\nneovim\n\nripgrep\n");
/// assert_eq!(packages, ["neovim", "ripgrep"]);
/// ```
#[must_use]
pub fn parse(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect()
}

/// Load and parse a manifest.
///
/// Returns `Ok(None)` if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Manifest`] if the file exists but cannot be read.
pub fn load(path: &Path) -> Result<Option<Vec<String>>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(parse(&content))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Manifest {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Manifest location for a package manager.
///
/// Homebrew reads `Brewfile` at the repository root; Linux managers read
/// `packages/<manager>.txt`.
#[must_use]
pub fn manifest_path(root: &Path, manager: PackageManager) -> PathBuf {
    match manager {
        PackageManager::Brew => root.join("Brewfile"),
        PackageManager::Apt | PackageManager::Dnf | PackageManager::Pacman => {
            root.join("packages").join(format!("{manager}.txt"))
        }
    }
}

/// Built-in package list for `manager`.
#[must_use]
pub fn default_packages(manager: PackageManager) -> Vec<String> {
    DEFAULT_PACKAGES
        .iter()
        .copied()
        .chain(std::iter::once(fd_package(manager)))
        .map(ToString::to_string)
        .collect()
}
