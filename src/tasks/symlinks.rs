//! Symlink reconciliation into the home directory.
use anyhow::{Context as _, Result};

use super::{Context, Task, TaskGroup, TaskResult, TaskStats};
use crate::config::links::{LINKS, LinkSpec};
use crate::resources::symlink::SymlinkResource;
use crate::resources::{Applicable as _, Resource as _, ResourceState};

/// Create every managed symlink, backing up real files in the way.
#[derive(Debug)]
pub struct InstallSymlinks;

impl InstallSymlinks {
    fn resource(ctx: &Context, spec: &LinkSpec) -> SymlinkResource {
        SymlinkResource::new(
            spec.source_path(ctx.root()),
            spec.destination_path(ctx.home()),
            spec.kind,
            ctx.config.backup_root.clone(),
        )
    }
}

impl Task for InstallSymlinks {
    fn name(&self) -> &'static str {
        "Install symlinks"
    }

    fn group(&self) -> TaskGroup {
        TaskGroup::Links
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut stats = TaskStats::new();
        for spec in LINKS {
            let resource = Self::resource(ctx, spec);
            let desc = format!("~/{}", spec.destination);
            match resource.current_state()? {
                ResourceState::Invalid { reason } => {
                    ctx.log.warn(&format!("skipping {desc}: {reason}"));
                    stats.skipped += 1;
                }
                ResourceState::Correct => {
                    ctx.log.debug(&format!("ok: {desc}"));
                    stats.already_ok += 1;
                }
                ResourceState::Missing => {
                    if ctx.dry_run() {
                        ctx.log.dry_run(&format!("would link {desc} -> {}", spec.source));
                    } else {
                        link(ctx, &resource, &desc)?;
                    }
                    stats.changed += 1;
                }
                ResourceState::Incorrect { current } => {
                    if ctx.dry_run() {
                        ctx.log.dry_run(&format!(
                            "would link {desc} -> {} (currently {current})",
                            spec.source
                        ));
                    } else {
                        link(ctx, &resource, &desc)?;
                    }
                    stats.changed += 1;
                }
            }
        }
        Ok(stats.finish(ctx))
    }
}

fn link(ctx: &Context, resource: &SymlinkResource, desc: &str) -> Result<()> {
    let backup = resource
        .link()
        .with_context(|| format!("link {}", resource.description()))?;
    if let Some(moved) = backup {
        ctx.log
            .info(&format!("backed up {desc} to {}", moved.display()));
    }
    ctx.log.debug(&format!("linked {}", resource.description()));
    Ok(())
}
