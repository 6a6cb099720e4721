//! Task results, counters, and the shared check-then-apply loop.
use anyhow::{Context as _, Result};

use super::context::Context;
use crate::resources::{Resource, ResourceChange, ResourceState};

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use dotfiles_bootstrap::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let skipped = TaskResult::Skipped("no supported package manager".into());
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task was skipped at run time.
    Skipped(String),
    /// Task ran in dry-run mode.
    DryRun,
}

/// Counters for tasks that process many items.
///
/// # Examples
///
/// ```
/// use dotfiles_bootstrap::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 1, already_ok: 2, skipped: 3 };
/// assert_eq!(stats.summary(false), "1 changed, 2 already ok, 3 skipped");
/// assert_eq!(stats.summary(true), "1 would change, 2 already ok, 3 skipped");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Number of items changed or applied.
    pub changed: u32,
    /// Number of items already in the correct state.
    pub already_ok: u32,
    /// Number of items skipped.
    pub skipped: u32,
}

impl TaskStats {
    /// Create a new empty stats counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Format the summary string (e.g. "3 changed, 10 already ok, 1 skipped").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        if self.skipped > 0 {
            format!(
                "{} {verb}, {} already ok, {} skipped",
                self.changed, self.already_ok, self.skipped
            )
        } else {
            format!("{} {verb}, {} already ok", self.changed, self.already_ok)
        }
    }

    /// Count the outcome of one applied change.
    pub const fn record(&mut self, change: &ResourceChange) {
        match change {
            ResourceChange::Applied => self.changed += 1,
            ResourceChange::Skipped { .. } => self.skipped += 1,
        }
    }

    /// Log the summary and return the appropriate `TaskResult`.
    #[must_use]
    pub fn finish(self, ctx: &Context) -> TaskResult {
        ctx.log.info(&self.summary(ctx.dry_run()));
        if ctx.dry_run() {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        }
    }
}

impl std::ops::AddAssign for TaskStats {
    fn add_assign(&mut self, other: Self) {
        self.changed += other.changed;
        self.already_ok += other.already_ok;
        self.skipped += other.skipped;
    }
}

/// Check each resource and apply the ones that are missing or incorrect.
///
/// Stops at the first failing resource. In dry-run mode nothing is applied;
/// each pending change is logged instead.
///
/// # Errors
///
/// Returns the first error from a state check or an apply, with the
/// resource description as context.
pub fn process_resources<R: Resource>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    verb: &str,
) -> Result<TaskResult> {
    let mut stats = TaskStats::new();
    for resource in resources {
        let current = resource.current_state()?;
        stats += process_single(ctx, &resource, current, verb)?;
    }
    Ok(stats.finish(ctx))
}

/// `install` → `installed`, `configure` → `configured`.
fn past_tense(verb: &str) -> String {
    if verb.ends_with('e') {
        format!("{verb}d")
    } else {
        format!("{verb}ed")
    }
}

/// Process a single resource given its current state, returning a stats delta.
fn process_single<R: Resource>(
    ctx: &Context,
    resource: &R,
    state: ResourceState,
    verb: &str,
) -> Result<TaskStats> {
    let desc = resource.description();
    let mut delta = TaskStats::new();
    match state {
        ResourceState::Correct => {
            ctx.log.info(&format!("ok: {desc} (already {})", past_tense(verb)));
            delta.already_ok += 1;
        }
        ResourceState::Invalid { reason } => {
            ctx.log.warn(&format!("skipping {desc}: {reason}"));
            delta.skipped += 1;
        }
        ResourceState::Missing | ResourceState::Incorrect { .. } => {
            if ctx.dry_run() {
                let msg = if let ResourceState::Incorrect { ref current } = state {
                    format!("would {verb} {desc} (currently {current})")
                } else {
                    format!("would {verb}: {desc}")
                };
                ctx.log.dry_run(&msg);
                delta.changed += 1;
                return Ok(delta);
            }
            ctx.log.info(&format!("{verb}: {desc}"));
            let change = resource
                .apply()
                .with_context(|| format!("{verb} {desc}"))?;
            delta.record(&change);
        }
    }
    Ok(delta)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::Applicable;
    use crate::tasks::test_helpers::{linux_context, test_config};
    use std::path::Path;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    struct Counting<'a> {
        state: ResourceState,
        fail: bool,
        applied: &'a AtomicU32,
    }

    impl Applicable for Counting<'_> {
        fn description(&self) -> String {
            format!("{:?}", self.state)
        }

        fn apply(&self) -> Result<ResourceChange> {
            self.applied.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("boom");
            }
            Ok(ResourceChange::Applied)
        }
    }

    impl Resource for Counting<'_> {
        fn current_state(&self) -> Result<ResourceState> {
            Ok(self.state.clone())
        }
    }

    fn counting(state: ResourceState, applied: &AtomicU32) -> Counting<'_> {
        Counting {
            state,
            fail: false,
            applied,
        }
    }

    #[test]
    fn summary_omits_zero_skipped() {
        let stats = TaskStats {
            changed: 3,
            already_ok: 10,
            skipped: 0,
        };
        assert_eq!(stats.summary(false), "3 changed, 10 already ok");
    }

    #[test]
    fn record_counts_applied_and_skipped() {
        let mut stats = TaskStats::new();
        stats.record(&ResourceChange::Applied);
        stats.record(&ResourceChange::Skipped {
            reason: "not in repositories".to_string(),
        });
        assert_eq!(stats.summary(false), "1 changed, 0 already ok, 1 skipped");
    }

    #[test]
    fn add_assign_sums_counters() {
        let mut a = TaskStats {
            changed: 1,
            already_ok: 2,
            skipped: 3,
        };
        a += TaskStats {
            changed: 1,
            already_ok: 1,
            skipped: 1,
        };
        assert_eq!(
            a,
            TaskStats {
                changed: 2,
                already_ok: 3,
                skipped: 4
            }
        );
    }

    #[test]
    fn applies_only_what_needs_change() {
        let (ctx, log, _exec) = linux_context(test_config(Path::new("/home/u")));
        let applied = AtomicU32::new(0);
        let resources = vec![
            counting(ResourceState::Missing, &applied),
            counting(ResourceState::Correct, &applied),
            counting(
                ResourceState::Incorrect {
                    current: "other".to_string(),
                },
                &applied,
            ),
            counting(
                ResourceState::Invalid {
                    reason: "bad".to_string(),
                },
                &applied,
            ),
        ];

        let result = process_resources(&ctx, resources, "install").unwrap();

        assert_eq!(result, TaskResult::Ok);
        assert_eq!(applied.load(Ordering::SeqCst), 2);
        assert!(log.contains("info", "2 changed, 1 already ok, 1 skipped"));
        assert!(log.contains("warn", "skipping Invalid"));
        assert!(log.contains("info", "ok: Correct (already installed)"));
    }

    #[test]
    fn satisfied_resource_is_reported_without_verbose() {
        let (ctx, log, _exec) = linux_context(test_config(Path::new("/home/u")));
        let applied = AtomicU32::new(0);

        process_resources(
            &ctx,
            vec![counting(ResourceState::Correct, &applied)],
            "configure",
        )
        .unwrap();

        assert_eq!(
            log.lines("info").first().map(String::as_str),
            Some("ok: Correct (already configured)")
        );
        assert!(log.lines("debug").is_empty());
    }

    #[test]
    fn dry_run_applies_nothing() {
        let config = test_config(Path::new("/home/u")).with_dry_run(true);
        let (ctx, log, _exec) = linux_context(config);
        let applied = AtomicU32::new(0);

        let result = process_resources(
            &ctx,
            vec![counting(ResourceState::Missing, &applied)],
            "install",
        )
        .unwrap();

        assert_eq!(result, TaskResult::DryRun);
        assert_eq!(applied.load(Ordering::SeqCst), 0);
        assert!(log.contains("dry_run", "would install: Missing"));
    }

    #[test]
    fn stops_at_first_failure() {
        let (ctx, _log, _exec) = linux_context(test_config(Path::new("/home/u")));
        let applied = AtomicU32::new(0);
        let resources = vec![
            Counting {
                state: ResourceState::Missing,
                fail: true,
                applied: &applied,
            },
            counting(ResourceState::Missing, &applied),
        ];

        let err = process_resources(&ctx, resources, "install").unwrap_err();

        assert_eq!(applied.load(Ordering::SeqCst), 1, "second resource never applied");
        assert!(format!("{err:#}").contains("install Missing: boom"));
    }
}
