// Shared helpers for integration tests.
//
// Provides a temporary repository and home directory pair and re-exports the
// crate's recording executor and logger, so each integration test can drive
// a full install run without touching the real system.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use dotfiles_bootstrap::config::Config;
use dotfiles_bootstrap::config::links::{LINKS, LinkKind};
use dotfiles_bootstrap::exec::Executor;
pub use dotfiles_bootstrap::exec::test_helpers::RecordingExecutor;
use dotfiles_bootstrap::logging::Log;
pub use dotfiles_bootstrap::logging::test_helpers::RecordingLog;
use dotfiles_bootstrap::platform::Platform;
use dotfiles_bootstrap::tasks::Selection;

/// A dotfiles checkout and an empty home directory under one temp dir.
pub struct TestEnv {
    tmp: tempfile::TempDir,
    /// Repository root.
    pub repo: PathBuf,
    /// Synthetic home directory.
    pub home: PathBuf,
}

impl TestEnv {
    /// Create a repository containing every link source, and an empty home.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let repo = tmp.path().join("repo");
        let home = tmp.path().join("home");
        std::fs::create_dir_all(&home).expect("create home");
        for spec in LINKS {
            let path = spec.source_path(&repo);
            match spec.kind {
                LinkKind::File => {
                    std::fs::create_dir_all(path.parent().expect("source parent"))
                        .expect("create source parent");
                    std::fs::write(&path, spec.source).expect("write link source");
                }
                LinkKind::Directory => std::fs::create_dir_all(&path).expect("create source dir"),
            }
        }
        Self { tmp, repo, home }
    }

    /// Write `content` to `rel` under the home directory.
    pub fn with_home_file(self, rel: &str, content: &str) -> Self {
        let path = self.home.join(rel);
        std::fs::create_dir_all(path.parent().expect("home file parent"))
            .expect("create home file parent");
        std::fs::write(path, content).expect("write home file");
        self
    }

    /// Write `content` to `rel` under the repository root.
    pub fn with_repo_file(self, rel: &str, content: &str) -> Self {
        let path = self.repo.join(rel);
        std::fs::create_dir_all(path.parent().expect("repo file parent"))
            .expect("create repo file parent");
        std::fs::write(path, content).expect("write repo file");
        self
    }

    /// Configuration for a run against this environment.
    pub fn config(&self) -> Config {
        Config::new(self.repo.clone(), self.home.clone(), chrono::Local::now())
            .with_shell(Some("/bin/bash"))
    }

    /// Path of `rel` under the home directory.
    pub fn home_path(&self, rel: &str) -> PathBuf {
        self.home.join(rel)
    }

    /// Root of the temp dir holding both trees.
    pub fn tmp(&self) -> &Path {
        self.tmp.path()
    }
}

/// Run the install tasks with the given doubles.
pub fn install(
    config: Config,
    platform: Platform,
    executor: &Arc<RecordingExecutor>,
    log: &Arc<RecordingLog>,
    selection: Selection,
) -> Result<()> {
    dotfiles_bootstrap::commands::install::run_with(
        config,
        platform,
        Arc::clone(executor) as Arc<dyn Executor>,
        Arc::clone(log) as Arc<dyn Log>,
        selection,
    )
}
