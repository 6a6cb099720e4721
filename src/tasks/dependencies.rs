//! Tasks that bootstrap third-party tools from their upstream installers.
use anyhow::Result;

use super::{Context, Task, TaskGroup, TaskResult, process_resources};
use crate::resources::dependency::{DependencyResource, ZSH_PLUGINS};

/// Install Homebrew on macOS.
#[derive(Debug)]
pub struct InstallPackageManager;

impl Task for InstallPackageManager {
    fn name(&self) -> &'static str {
        "Install package manager"
    }

    fn group(&self) -> TaskGroup {
        TaskGroup::Dependencies
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.is_macos()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resource = DependencyResource::homebrew(&*ctx.executor);
        process_resources(ctx, std::iter::once(resource), "install")
    }
}

/// Install oh-my-zsh, keeping any existing `.zshrc`.
#[derive(Debug)]
pub struct InstallShellFramework;

impl Task for InstallShellFramework {
    fn name(&self) -> &'static str {
        "Install shell framework"
    }

    fn group(&self) -> TaskGroup {
        TaskGroup::Dependencies
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.is_supported()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resource = DependencyResource::oh_my_zsh(&ctx.config, &*ctx.executor);
        process_resources(ctx, std::iter::once(resource), "install")
    }
}

/// Clone the oh-my-zsh plugins into `$ZSH_CUSTOM/plugins`.
#[derive(Debug)]
pub struct InstallShellPlugins;

impl Task for InstallShellPlugins {
    fn name(&self) -> &'static str {
        "Install shell plugins"
    }

    fn group(&self) -> TaskGroup {
        TaskGroup::Dependencies
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.is_supported()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resources = ZSH_PLUGINS.iter().map(|(name, url)| {
            DependencyResource::zsh_plugin(&ctx.config, name, url, &*ctx.executor)
        });
        process_resources(ctx, resources, "install")
    }
}

/// Install the pinned nvm release.
#[derive(Debug)]
pub struct InstallVersionManager;

impl Task for InstallVersionManager {
    fn name(&self) -> &'static str {
        "Install version manager"
    }

    fn group(&self) -> TaskGroup {
        TaskGroup::Dependencies
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.is_supported()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resource = DependencyResource::nvm(&ctx.config, &*ctx.executor);
        process_resources(ctx, std::iter::once(resource), "install")
    }
}
