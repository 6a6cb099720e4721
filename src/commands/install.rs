//! The install command: run every selected task in order, stopping at the
//! first failure.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::Cli;
use crate::config::{self, Config};
use crate::error::PlatformError;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger, TaskStatus};
use crate::platform::Platform;
use crate::tasks::{self, Context, Selection};

/// Run the install command against the real system.
///
/// Prints the task summary when every task succeeded.
///
/// # Errors
///
/// Returns an error if the platform is unsupported, the configuration
/// cannot be built, or any task fails.
pub fn run(cli: &Cli, log: &Arc<Logger>) -> Result<()> {
    let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);
    let platform = Platform::detect(&*executor);
    ensure_supported(&platform)?;

    let root = config::resolve_root(cli.root.as_deref())?;
    let config = Config::from_env(root, cli.dry_run)?;

    run_with(
        config,
        platform,
        executor,
        Arc::clone(log) as Arc<dyn Log>,
        cli.selection(),
    )?;
    log.print_summary();
    Ok(())
}

/// Run the selected install tasks with explicit dependencies.
///
/// Deselected tasks are recorded as skipped with the flag that removed
/// them. The first failing task ends the run.
///
/// # Errors
///
/// Returns [`PlatformError::Unsupported`] before any side effect on an
/// unsupported host, otherwise the first task error.
pub fn run_with(
    config: Config,
    platform: Platform,
    executor: Arc<dyn Executor>,
    log: Arc<dyn Log>,
    selection: Selection,
) -> Result<()> {
    ensure_supported(&platform)?;

    log.info(&format!("dotfiles-bootstrap {}", crate::VERSION));
    log.info(&format!("platform: {}", platform.summary()));
    log.debug(&format!("root: {}", config.root.display()));
    if config.dry_run {
        log.info("dry run: no changes will be made");
    }

    let ctx = Context::new(Arc::new(config), Arc::new(platform), log, executor);
    for task in tasks::all_install_tasks() {
        if !selection.includes(task.group()) {
            let flag = Selection::flag_for(task.group());
            ctx.log.debug(&format!("skipping task: {}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, flag);
            continue;
        }
        tasks::execute(task.as_ref(), &ctx)?;
    }
    Ok(())
}

fn ensure_supported(platform: &Platform) -> Result<(), PlatformError> {
    if platform.is_supported() {
        Ok(())
    } else {
        Err(PlatformError::Unsupported {
            os: std::env::consts::OS.to_string(),
        })
    }
}
