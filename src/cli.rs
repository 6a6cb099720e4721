//! Command-line interface.
use std::path::PathBuf;

use clap::{ArgAction, CommandFactory as _, Parser};

use crate::platform::Platform;
use crate::tasks::Selection;

/// Bootstrap a development environment and link dotfiles into place.
#[derive(Parser, Debug)]
#[command(
    name = "dotfiles-bootstrap",
    about = "Bootstrap a development environment and link dotfiles into place",
    version = crate::VERSION,
    disable_help_flag = true
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Skip system package installation
    #[arg(long)]
    pub skip_packages: bool,

    /// Skip Homebrew, oh-my-zsh, plugins, nvm and the login shell
    #[arg(long)]
    pub skip_deps: bool,

    /// Only create symlinks (implies --skip-packages and --skip-deps)
    #[arg(long)]
    pub links_only: bool,

    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Show debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Override dotfiles root directory
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Print help and the detected platform
    #[arg(short = 'h', long, action = ArgAction::SetTrue)]
    pub help: bool,
}

impl Cli {
    /// Task groups selected by the skip flags.
    #[must_use]
    pub const fn selection(&self) -> Selection {
        if self.links_only {
            return Selection::links_only();
        }
        Selection {
            skip_deps: self.skip_deps,
            skip_packages: self.skip_packages,
        }
    }
}

/// Usage text followed by the platform detection summary.
#[must_use]
pub fn render_help(platform: &Platform) -> String {
    let usage = Cli::command().render_help();
    format!("{usage}\nDetected platform:\n  {}\n", platform.summary())
}
