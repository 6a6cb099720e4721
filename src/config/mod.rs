//! Run configuration, the symlink table, and package manifests.
pub mod links;
pub mod manifest;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::ConfigError;

/// Directory under `$HOME` that collects displaced files, one subdirectory per run.
pub const BACKUP_DIR: &str = ".dotfiles_backup";

/// Files whose presence identifies a dotfiles checkout.
const REPO_MARKERS: [&str; 3] = ["zsh/.zshrc", "git/.gitconfig", "packages"];

/// Immutable configuration for a single run.
///
/// Built once at startup (normally by [`Config::from_env`]) and shared by
/// every task, so tests can point the whole run at a synthetic home
/// directory without touching the real environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the dotfiles repository (link sources, manifests).
    pub root: PathBuf,
    /// Home directory that receives the symlinks.
    pub home: PathBuf,
    /// oh-my-zsh custom directory that receives plugins.
    pub zsh_custom: PathBuf,
    /// Login shell from `SHELL`, if set.
    pub shell: Option<String>,
    /// Backup directory for this run (`~/.dotfiles_backup/<start time>`).
    pub backup_root: PathBuf,
    /// Preview changes without applying them.
    pub dry_run: bool,
    /// Running under CI, where interactive steps such as `chsh` are skipped.
    pub ci: bool,
}

impl Config {
    /// Create a configuration rooted at `root` for the given home directory,
    /// with defaults for everything else and a backup stamp of `started`.
    #[must_use]
    pub fn new(root: PathBuf, home: PathBuf, started: DateTime<Local>) -> Self {
        let zsh_custom = home.join(".oh-my-zsh").join("custom");
        let backup_root = home.join(BACKUP_DIR).join(backup_stamp(started));
        Self {
            root,
            home,
            zsh_custom,
            shell: None,
            backup_root,
            dry_run: false,
            ci: false,
        }
    }

    /// Build the configuration from `HOME`, `SHELL`, `ZSH_CUSTOM` and `CI`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingHome`] if `HOME` is unset or empty.
    pub fn from_env(root: PathBuf, dry_run: bool) -> Result<Self, ConfigError> {
        let home = non_empty_var("HOME").ok_or(ConfigError::MissingHome)?;
        let mut config = Self::new(root, PathBuf::from(home), Local::now());
        if let Some(custom) = non_empty_var("ZSH_CUSTOM") {
            config.zsh_custom = PathBuf::from(custom);
        }
        config.shell = non_empty_var("SHELL");
        config.ci = std::env::var_os("CI").is_some();
        config.dry_run = dry_run;
        Ok(config)
    }

    /// Override the login shell.
    #[must_use]
    pub fn with_shell(mut self, shell: Option<&str>) -> Self {
        self.shell = shell.map(ToString::to_string);
        self
    }

    /// Override the oh-my-zsh custom directory.
    #[must_use]
    pub fn with_zsh_custom(mut self, zsh_custom: PathBuf) -> Self {
        self.zsh_custom = zsh_custom;
        self
    }

    /// Enable or disable dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Mark the run as executing under CI.
    #[must_use]
    pub const fn with_ci(mut self, ci: bool) -> Self {
        self.ci = ci;
        self
    }

    /// oh-my-zsh installation directory.
    #[must_use]
    pub fn oh_my_zsh_dir(&self) -> PathBuf {
        self.home.join(".oh-my-zsh")
    }

    /// nvm installation directory.
    #[must_use]
    pub fn nvm_dir(&self) -> PathBuf {
        self.home.join(".nvm")
    }

    /// Install directory of the oh-my-zsh plugin `name`.
    #[must_use]
    pub fn plugin_dir(&self, name: &str) -> PathBuf {
        self.zsh_custom.join("plugins").join(name)
    }
}

/// Format a run start time as the backup directory name.
#[must_use]
pub fn backup_stamp(started: DateTime<Local>) -> String {
    started.format("%Y%m%d_%H%M%S").to_string()
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Whether `dir` looks like a dotfiles checkout.
fn is_repo_root(dir: &Path) -> bool {
    REPO_MARKERS.iter().any(|m| dir.join(m).exists())
}

/// Anchor a user-supplied root at `cwd` so link sources are absolute.
///
/// Symlinks store their target text verbatim and resolve it relative to the
/// link's own directory, so a relative root would dangle once linked into
/// `$HOME`. Existing paths are also canonicalized.
fn anchor_root(root: &Path, cwd: &Path) -> PathBuf {
    let joined = if root.is_absolute() {
        root.to_path_buf()
    } else {
        cwd.join(root)
    };
    dunce::canonicalize(&joined).unwrap_or(joined)
}

/// Anchor a user-supplied root at the process working directory.
fn absolute_root(root: &Path) -> Result<PathBuf, ConfigError> {
    let cwd = if root.is_relative() {
        std::env::current_dir().map_err(|_| ConfigError::RootNotFound)?
    } else {
        PathBuf::new()
    };
    Ok(anchor_root(root, &cwd))
}

/// Resolve the dotfiles root directory.
///
/// Order: explicit `--root`, `DOTFILES_ROOT`, a checkout containing the
/// running binary (`target/<profile>/` or `bin/`), then the current directory.
/// The result is always absolute.
///
/// # Errors
///
/// Returns [`ConfigError::RootNotFound`] if no candidate looks like a
/// dotfiles checkout, or a relative root is given and the working
/// directory cannot be read.
pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(root) = explicit {
        return absolute_root(root);
    }

    if let Some(root) = non_empty_var("DOTFILES_ROOT") {
        return absolute_root(Path::new(&root));
    }

    if let Ok(exe) = std::env::current_exe()
        && let Some(parent) = exe.parent()
    {
        let candidates = [
            parent.join("../.."), // target/release/ → repo root
            parent.join(".."),    // bin/ → repo root
        ];
        for candidate in &candidates {
            if is_repo_root(candidate)
                && let Ok(root) = dunce::canonicalize(candidate)
            {
                return Ok(root);
            }
        }
    }

    if let Ok(cwd) = std::env::current_dir()
        && is_repo_root(&cwd)
    {
        return Ok(cwd);
    }

    Err(ConfigError::RootNotFound)
}
