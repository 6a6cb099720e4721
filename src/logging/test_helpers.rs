//! In-memory [`Log`] for unit and integration tests.
use std::sync::{Mutex, PoisonError};

use super::{Log, TaskEntry, TaskStatus};

/// Keeps every message, tagged with its level, and every task record.
#[derive(Debug, Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<(&'static str, String)>>,
    tasks: Mutex<Vec<TaskEntry>>,
}

impl RecordingLog {
    fn push(&self, level: &'static str, msg: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, msg.to_string()));
    }

    /// Messages logged at `level` (`"info"`, `"warn"`, `"dry_run"`, ...).
    #[must_use]
    pub fn lines(&self, level: &str) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Whether any message at `level` contains `needle`.
    #[must_use]
    pub fn contains(&self, level: &str, needle: &str) -> bool {
        self.lines(level).iter().any(|m| m.contains(needle))
    }

    /// Recorded task results, in order.
    #[must_use]
    pub fn tasks(&self) -> Vec<TaskEntry> {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Status recorded for the task called `name`.
    #[must_use]
    pub fn status_of(&self, name: &str) -> Option<TaskStatus> {
        self.tasks()
            .into_iter()
            .find(|t| t.name == name)
            .map(|t| t.status)
    }
}

impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(TaskEntry::new(name, status, message));
    }
}
