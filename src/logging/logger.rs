//! The production [`Log`]: tracing events plus the task record behind the
//! run summary.
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET, log_path};
use super::types::{Log, TaskEntry, TaskStatus};

/// Emits every message as a [`tracing`] event and remembers task outcomes.
///
/// Rendering and the log file belong to the subscriber installed by
/// [`init_subscriber`](super::init_subscriber); this type only knows where
/// that file lives so the summary can point at it.
#[derive(Debug)]
pub struct Logger {
    entries: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Logger for `command`, whose summary names that command's log file.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::writing_to(log_path(command))
    }

    fn writing_to(log_file: Option<PathBuf>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            log_file,
        }
    }

    fn entries(&self) -> Vec<TaskEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Print one line per recorded task, the totals, and the log file path.
    ///
    /// Prints nothing when no task was recorded.
    #[allow(clippy::print_stdout)]
    pub fn print_summary(&self) {
        let entries = self.entries();
        if entries.is_empty() {
            return;
        }

        println!();
        self.stage("Summary");
        for entry in &entries {
            self.info(&entry.summary_line());
        }
        println!();
        self.info(&totals(&entries));
        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

/// `N tasks: a ok, b n/a, c skipped, d dry-run, e failed`, each count coloured.
fn totals(entries: &[TaskEntry]) -> String {
    let counts = TaskStatus::ALL
        .iter()
        .map(|&status| {
            let n = entries.iter().filter(|e| e.status == status).count();
            let (_, colour) = status.marker();
            format!("{colour}{n} {}\x1b[0m", status.label())
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} tasks: {counts}", entries.len())
}

impl Log for Logger {
    fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(TaskEntry::new(name, status, message));
    }
}
