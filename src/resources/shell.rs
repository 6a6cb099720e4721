//! Default login shell resource.
use anyhow::{Result, bail};

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// A resource for configuring the default login shell.
#[derive(Debug)]
pub struct DefaultShellResource<'a> {
    /// Target shell name (e.g., "zsh").
    target_shell: String,
    /// Login shell currently configured (`SHELL`).
    current_shell: Option<String>,
    /// Executor for running system commands.
    executor: &'a dyn Executor,
}

impl<'a> DefaultShellResource<'a> {
    /// Create a new default shell resource.
    #[must_use]
    pub fn new(target_shell: &str, current_shell: Option<&str>, executor: &'a dyn Executor) -> Self {
        Self {
            target_shell: target_shell.to_string(),
            current_shell: current_shell.map(ToString::to_string),
            executor,
        }
    }
}

impl Applicable for DefaultShellResource<'_> {
    fn description(&self) -> String {
        format!("default shell → {}", self.target_shell)
    }

    fn apply(&self) -> Result<ResourceChange> {
        let Some(path) = self.executor.which(&self.target_shell) else {
            bail!("{} is not on PATH", self.target_shell);
        };
        let path = path.to_string_lossy();
        self.executor.run("chsh", &["-s", &path])?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for DefaultShellResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        let suffix = format!("/{}", self.target_shell);
        Ok(match self.current_shell.as_deref() {
            None | Some("") => ResourceState::Missing,
            Some(shell) if shell.ends_with(&suffix) => ResourceState::Correct,
            Some(shell) => ResourceState::Incorrect {
                current: shell.to_string(),
            },
        })
    }
}
