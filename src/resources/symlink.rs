//! Symlink resource.
use anyhow::{Context as _, Result};
use std::io;
use std::path::{Path, PathBuf};

use super::helpers::fs::{ensure_parent_dir, move_into};
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::config::links::LinkKind;
use crate::error::LinkError;

/// What currently occupies a destination path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupant {
    /// Nothing is there.
    Absent,
    /// A symbolic link, whether or not its target exists.
    Symlink,
    /// A regular file or directory.
    Real,
}

/// Classify `path` without following a symlink at its final component.
///
/// # Errors
///
/// Returns an error if the path cannot be inspected for a reason other than
/// not existing (e.g., permission denied on a parent).
pub fn classify(path: &Path) -> io::Result<Occupant> {
    match path.symlink_metadata() {
        Ok(meta) if meta.file_type().is_symlink() => Ok(Occupant::Symlink),
        Ok(_) => Ok(Occupant::Real),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Occupant::Absent),
        Err(e) => Err(e),
    }
}

/// Replace whatever occupies `destination` with a symlink to `source`.
///
/// An existing symlink is removed without backup. Real content is moved
/// into `backup_root` (created on first use) under its base name. Returns
/// where displaced content was moved, if anything was.
///
/// # Errors
///
/// Returns [`LinkError::SourceMissing`] if `source` does not exist, and an
/// error for any filesystem operation that fails. Nothing is rolled back.
pub fn link(source: &Path, destination: &Path, backup_root: &Path) -> Result<Option<PathBuf>> {
    if !source.exists() {
        return Err(LinkError::SourceMissing(source.to_path_buf()).into());
    }
    ensure_parent_dir(destination)?;

    let occupant =
        classify(destination).with_context(|| format!("inspect {}", destination.display()))?;
    let backup = match occupant {
        Occupant::Absent => None,
        Occupant::Symlink => {
            std::fs::remove_file(destination)
                .with_context(|| format!("remove existing link: {}", destination.display()))?;
            None
        }
        Occupant::Real => Some(move_into(destination, backup_root).with_context(|| {
            LinkError::Backup {
                path: destination.to_path_buf(),
                backup_root: backup_root.to_path_buf(),
            }
        })?),
    };

    create_symlink(source, destination).map_err(|source_err| LinkError::Create {
        link: destination.to_path_buf(),
        target: source.to_path_buf(),
        source: source_err,
    })?;
    Ok(backup)
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn create_symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are only managed on Unix hosts",
    ))
}

/// A symlink resource that can be checked and applied.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The source file/directory (what the symlink points to).
    pub source: PathBuf,
    /// The target path (where the symlink will be created).
    pub target: PathBuf,
    /// Expected kind of `source`.
    pub kind: LinkKind,
    /// Where displaced real content is moved.
    pub backup_root: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf, kind: LinkKind, backup_root: PathBuf) -> Self {
        Self {
            source,
            target,
            kind,
            backup_root,
        }
    }

    /// Reconcile the link, returning where displaced content was backed up.
    ///
    /// # Errors
    ///
    /// See [`link`].
    pub fn link(&self) -> Result<Option<PathBuf>> {
        link(&self.source, &self.target, &self.backup_root)
    }
}

impl Applicable for SymlinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.link()?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for SymlinkResource {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.source.exists() {
            return Ok(ResourceState::Invalid {
                reason: format!("source does not exist: {}", self.source.display()),
            });
        }
        let source_is_dir = self.source.is_dir();
        match (self.kind, source_is_dir) {
            (LinkKind::File, true) => {
                return Ok(ResourceState::Invalid {
                    reason: format!("expected a file: {}", self.source.display()),
                });
            }
            (LinkKind::Directory, false) => {
                return Ok(ResourceState::Invalid {
                    reason: format!("expected a directory: {}", self.source.display()),
                });
            }
            _ => {}
        }

        let occupant =
            classify(&self.target).with_context(|| format!("inspect {}", self.target.display()))?;
        match occupant {
            Occupant::Absent => Ok(ResourceState::Missing),
            Occupant::Symlink => {
                let existing = std::fs::read_link(&self.target)
                    .with_context(|| format!("read link {}", self.target.display()))?;
                if existing == self.source {
                    Ok(ResourceState::Correct)
                } else {
                    Ok(ResourceState::Incorrect {
                        current: format!("points to {}", existing.display()),
                    })
                }
            }
            Occupant::Real => Ok(ResourceState::Incorrect {
                current: if self.target.is_dir() {
                    "real directory".to_string()
                } else {
                    "real file".to_string()
                },
            }),
        }
    }
}
