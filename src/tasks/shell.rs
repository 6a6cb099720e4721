//! Default login shell configuration.
use anyhow::Result;

use super::{Context, Task, TaskGroup, TaskResult, process_resources};
use crate::resources::shell::DefaultShellResource;

/// Configure the default shell to zsh.
#[derive(Debug)]
pub struct ConfigureShell;

impl Task for ConfigureShell {
    fn name(&self) -> &'static str {
        "Configure default shell"
    }

    fn group(&self) -> TaskGroup {
        TaskGroup::Dependencies
    }

    fn should_run(&self, ctx: &Context) -> bool {
        // chsh prompts for a password, which CI cannot answer
        ctx.platform.is_supported() && ctx.executor.which("zsh").is_some() && !ctx.config.ci
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resource =
            DefaultShellResource::new("zsh", ctx.config.shell.as_deref(), &*ctx.executor);
        process_resources(ctx, std::iter::once(resource), "configure")
    }
}
