//! Named tasks that orchestrate resource changes, run in a fixed order.
pub mod context;
pub mod dependencies;
pub mod packages;
mod processing;
pub mod shell;
pub mod symlinks;

pub use context::Context;
pub use processing::{TaskResult, TaskStats, process_resources};

use anyhow::Result;

use crate::logging::TaskStatus;

/// Coarse grouping used by the `--skip-*` command-line flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskGroup {
    /// Homebrew, oh-my-zsh, plugins, nvm and the login shell.
    Dependencies,
    /// System packages.
    Packages,
    /// Symlinks into the home directory.
    Links,
}

/// Which task groups the user asked to run.
///
/// # Examples
///
/// ```
/// use dotfiles_bootstrap::tasks::{Selection, TaskGroup};
///
/// let links_only = Selection::links_only();
/// assert!(links_only.includes(TaskGroup::Links));
/// assert!(!links_only.includes(TaskGroup::Packages));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    /// Skip the dependency installers.
    pub skip_deps: bool,
    /// Skip system package installation.
    pub skip_packages: bool,
}

impl Selection {
    /// Only reconcile symlinks.
    #[must_use]
    pub const fn links_only() -> Self {
        Self {
            skip_deps: true,
            skip_packages: true,
        }
    }

    /// Whether tasks in `group` should run.
    #[must_use]
    pub const fn includes(self, group: TaskGroup) -> bool {
        match group {
            TaskGroup::Dependencies => !self.skip_deps,
            TaskGroup::Packages => !self.skip_packages,
            TaskGroup::Links => true,
        }
    }

    /// The flag that deselects `group`, if any.
    #[must_use]
    pub const fn flag_for(group: TaskGroup) -> Option<&'static str> {
        match group {
            TaskGroup::Dependencies => Some("--skip-deps"),
            TaskGroup::Packages => Some("--skip-packages"),
            TaskGroup::Links => None,
        }
    }
}

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Group this task belongs to.
    fn group(&self) -> TaskGroup;

    /// Whether this task should run on the current platform.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if an external command fails or a file operation
    /// is not permitted.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The complete set of tasks run by the install command, in execution order.
#[must_use]
pub fn all_install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(dependencies::InstallPackageManager),
        Box::new(packages::InstallPackages),
        Box::new(dependencies::InstallShellFramework),
        Box::new(dependencies::InstallShellPlugins),
        Box::new(dependencies::InstallVersionManager),
        Box::new(shell::ConfigureShell),
        Box::new(symlinks::InstallSymlinks),
    ]
}

/// Execute a task, recording the result in the logger.
///
/// # Errors
///
/// Returns the task's error, with the task name as context, after
/// recording it as failed. Callers stop the run at the first error.
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<()> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return Ok(());
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
        }
        Err(e) => {
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            return Err(e.context(task.name().to_string()));
        }
    }
    Ok(())
}
