//! System package installation.
use anyhow::{Context as _, Result};

use super::{Context, Task, TaskGroup, TaskResult, TaskStats};
use crate::config::manifest;
use crate::resources::Applicable as _;
use crate::resources::package::{self, PackageManager, PackageResource};

/// Install system packages with the detected package manager.
///
/// Homebrew installs from the repository `Brewfile` when present; Linux
/// managers read `packages/<manager>.txt`. Without a manifest the built-in
/// default list is installed one package at a time.
#[derive(Debug)]
pub struct InstallPackages;

impl Task for InstallPackages {
    fn name(&self) -> &'static str {
        "Install packages"
    }

    fn group(&self) -> TaskGroup {
        TaskGroup::Packages
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.is_supported()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let Some(manager) = ctx.platform.package_manager else {
            ctx.log
                .warn("no supported package manager found (apt-get, dnf, pacman)");
            return Ok(TaskResult::Skipped(
                "no supported package manager".to_string(),
            ));
        };

        let manifest_path = manifest::manifest_path(ctx.root(), manager);
        if manager == PackageManager::Brew && manifest_path.exists() {
            return install_bundle(ctx, &manifest_path);
        }

        let packages = if manager == PackageManager::Brew {
            None
        } else {
            manifest::load(&manifest_path)?
        };
        let packages = if let Some(list) = packages {
            ctx.log
                .debug(&format!("using manifest {}", manifest_path.display()));
            list
        } else {
            ctx.log.debug(&format!(
                "no manifest at {}, using default packages",
                manifest_path.display()
            ));
            manifest::default_packages(manager)
        };

        if packages.is_empty() {
            return Ok(TaskResult::Skipped("manifest lists no packages".to_string()));
        }
        install_each(ctx, manager, packages)
    }
}

/// Hand the whole Brewfile to `brew bundle`.
fn install_bundle(ctx: &Context, brewfile: &std::path::Path) -> Result<TaskResult> {
    if ctx.dry_run() {
        ctx.log.dry_run(&format!(
            "would run: {} bundle --file {}",
            package::brew_program(&*ctx.executor),
            brewfile.display()
        ));
        return Ok(TaskResult::DryRun);
    }
    ctx.log
        .info(&format!("installing from {}", brewfile.display()));
    package::bundle_install(&*ctx.executor, brewfile)?;
    Ok(TaskResult::Ok)
}

/// Install `packages` one at a time, stopping at the first failure.
fn install_each(
    ctx: &Context,
    manager: PackageManager,
    packages: Vec<String>,
) -> Result<TaskResult> {
    let resources: Vec<PackageResource<'_>> = packages
        .into_iter()
        .map(|name| PackageResource::new(name, manager, &*ctx.executor))
        .collect();

    let mut stats = TaskStats::new();
    if ctx.dry_run() {
        if manager == PackageManager::Apt {
            ctx.log.dry_run("would run: sudo apt-get update");
        }
        for resource in &resources {
            ctx.log
                .dry_run(&format!("would run: {}", resource.command_line()));
            stats.changed += 1;
        }
        return Ok(stats.finish(ctx));
    }

    if package::refresh_index(manager, &*ctx.executor)? {
        ctx.log.debug("refreshed package index");
    }
    for resource in &resources {
        ctx.log.info(&format!("install: {}", resource.description()));
        let change = resource
            .apply()
            .with_context(|| format!("install {}", resource.description()))?;
        stats.record(&change);
    }
    Ok(stats.finish(ctx))
}
