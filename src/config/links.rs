//! The fixed table of symlinks installed into the home directory.
use std::path::{Path, PathBuf};

/// Whether a link source is a single file or a whole directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// A regular file.
    File,
    /// A directory linked as a unit.
    Directory,
}

/// A symlink to create: `source` (in the repository) → `destination` (in `$HOME`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSpec {
    /// Path relative to the repository root.
    pub source: &'static str,
    /// Path relative to the home directory.
    pub destination: &'static str,
    /// Expected kind of the source.
    pub kind: LinkKind,
}

impl LinkSpec {
    /// Absolute source path under `root`.
    #[must_use]
    pub fn source_path(&self, root: &Path) -> PathBuf {
        root.join(self.source)
    }

    /// Absolute destination path under `home`.
    #[must_use]
    pub fn destination_path(&self, home: &Path) -> PathBuf {
        home.join(self.destination)
    }
}

/// Every managed symlink, in installation order.
pub const LINKS: &[LinkSpec] = &[
    LinkSpec {
        source: "zsh/.zshrc",
        destination: ".zshrc",
        kind: LinkKind::File,
    },
    LinkSpec {
        source: "zsh/.zprofile",
        destination: ".zprofile",
        kind: LinkKind::File,
    },
    LinkSpec {
        source: "git/.gitconfig",
        destination: ".gitconfig",
        kind: LinkKind::File,
    },
    LinkSpec {
        source: "git/.gitignore_global",
        destination: ".gitignore_global",
        kind: LinkKind::File,
    },
    LinkSpec {
        source: "tmux/.tmux.conf",
        destination: ".tmux.conf",
        kind: LinkKind::File,
    },
    LinkSpec {
        source: "nvim",
        destination: ".config/nvim",
        kind: LinkKind::Directory,
    },
    LinkSpec {
        source: "alacritty",
        destination: ".config/alacritty",
        kind: LinkKind::Directory,
    },
];
