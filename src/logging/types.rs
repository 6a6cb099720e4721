//! Task records and the [`Log`] seam that tasks write through.

/// Outcome of one task, as shown in the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Ran and applied (or confirmed) its changes.
    Ok,
    /// Not relevant on this platform.
    NotApplicable,
    /// Deselected by a flag, or its prerequisites are missing.
    Skipped,
    /// Ran in dry-run mode.
    DryRun,
    /// Returned an error and ended the run.
    Failed,
}

impl TaskStatus {
    /// Every status, in the order the summary totals list them.
    pub const ALL: [Self; 5] = [
        Self::Ok,
        Self::NotApplicable,
        Self::Skipped,
        Self::DryRun,
        Self::Failed,
    ];

    /// Label used in the summary totals.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NotApplicable => "n/a",
            Self::Skipped => "skipped",
            Self::DryRun => "dry-run",
            Self::Failed => "failed",
        }
    }

    /// Summary glyph and the ANSI colour it is drawn in.
    pub(super) const fn marker(self) -> (&'static str, &'static str) {
        match self {
            Self::Ok => ("✓", "\x1b[32m"),
            Self::NotApplicable => ("·", "\x1b[2m"),
            Self::Skipped => ("○", "\x1b[33m"),
            Self::DryRun => ("~", "\x1b[37m"),
            Self::Failed => ("✗", "\x1b[31m"),
        }
    }
}

/// One finished task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEntry {
    /// Task name, e.g. `Install symlinks`.
    pub name: String,
    /// How the task ended.
    pub status: TaskStatus,
    /// Detail such as a skip reason or a change count.
    pub message: Option<String>,
}

impl TaskEntry {
    /// Record `name` ending with `status`.
    #[must_use]
    pub fn new(name: &str, status: TaskStatus, message: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.map(ToString::to_string),
        }
    }

    /// Coloured summary line: `✓ Install symlinks (7 changed)`.
    pub(super) fn summary_line(&self) -> String {
        let (glyph, colour) = self.status.marker();
        let detail = self
            .message
            .as_deref()
            .map(|m| format!(" ({m})"))
            .unwrap_or_default();
        format!("{colour}{glyph} {}{detail}\x1b[0m", self.name)
    }
}

/// Where tasks send progress messages and their final status.
///
/// Implemented by [`Logger`](super::Logger) for real runs and by an
/// in-memory recorder in tests.
pub trait Log: Send + Sync {
    /// Section header.
    fn stage(&self, msg: &str);
    /// Progress line.
    fn info(&self, msg: &str);
    /// Detail shown on the console only with `--verbose`.
    fn debug(&self, msg: &str);
    /// Recoverable problem.
    fn warn(&self, msg: &str);
    /// Failure.
    fn error(&self, msg: &str);
    /// Action that a dry run would have taken.
    fn dry_run(&self, msg: &str);
    /// Remember how task `name` ended, for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}
