#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
#![cfg(unix)]
//! Integration tests for the `install` command.
//!
//! These tests drive the full task list through
//! [`run_with`](dotfiles_bootstrap::commands::install::run_with) against a
//! temporary repository and home directory, with a fake executor standing in
//! for package managers and installers.

mod common;

use std::collections::HashSet;
use std::fs;
use std::sync::Arc;

use common::*;
use dotfiles_bootstrap::config::links::LINKS;
use dotfiles_bootstrap::error::{PlatformError, exit_code};
use dotfiles_bootstrap::logging::TaskStatus;
use dotfiles_bootstrap::platform::{Distro, Os, Platform};
use dotfiles_bootstrap::resources::package::PackageManager;
use dotfiles_bootstrap::tasks::{self, Selection};

fn debian() -> Platform {
    Platform::new(Os::Linux, Distro::Debian, Some(PackageManager::Apt))
}

fn doubles(executor: RecordingExecutor) -> (Arc<RecordingExecutor>, Arc<RecordingLog>) {
    (Arc::new(executor), Arc::new(RecordingLog::default()))
}

// ---------------------------------------------------------------------------
// Task list
// ---------------------------------------------------------------------------

/// Any addition, removal, rename, or reordering of an install task fails here.
#[test]
fn install_task_names() {
    let names: Vec<String> = tasks::all_install_tasks()
        .iter()
        .map(|t| t.name().to_string())
        .collect();
    insta::assert_snapshot!(names.join("\n"), @r"
    Install package manager
    Install packages
    Install shell framework
    Install shell plugins
    Install version manager
    Configure default shell
    Install symlinks
    ");
}

#[test]
fn install_task_names_are_unique() {
    let tasks = tasks::all_install_tasks();
    let mut seen = HashSet::new();
    for task in &tasks {
        assert!(seen.insert(task.name().to_string()), "duplicate: {}", task.name());
    }
}

// ---------------------------------------------------------------------------
// Full runs
// ---------------------------------------------------------------------------

#[test]
fn full_run_on_debian_installs_in_order() {
    let env = TestEnv::new();
    let (exec, log) = doubles(RecordingExecutor::new().with_programs(&["zsh"]));

    install(env.config(), debian(), &exec, &log, Selection::default()).unwrap();

    let calls = exec.calls();
    assert_eq!(calls[0], "sudo apt-get update");
    assert_eq!(calls[1], "sudo apt-get install -y git");
    assert_eq!(calls[8], "sudo apt-get install -y fd-find");
    assert!(calls[9].starts_with("sh -c"), "oh-my-zsh next: {}", calls[9]);
    assert!(calls[10..13].iter().all(|c| c.starts_with("git clone --depth=1")));
    assert!(calls[13].starts_with("bash -c"), "nvm next: {}", calls[13]);
    assert_eq!(calls[14], "chsh -s /usr/bin/zsh");
    assert_eq!(calls.len(), 15);

    for spec in LINKS {
        let dest = spec.destination_path(&env.home);
        assert_eq!(fs::read_link(&dest).unwrap(), spec.source_path(&env.repo));
    }
    assert_eq!(log.status_of("Install package manager"), Some(TaskStatus::NotApplicable));
    assert_eq!(log.status_of("Install symlinks"), Some(TaskStatus::Ok));
}

#[test]
fn links_only_makes_no_executor_calls() {
    let env = TestEnv::new();
    let (exec, log) = doubles(RecordingExecutor::new().with_programs(&["zsh"]));

    install(env.config(), debian(), &exec, &log, Selection::links_only()).unwrap();

    assert!(exec.calls().is_empty());
    assert!(fs::read_link(env.home_path(".zshrc")).is_ok());
    for name in ["Install packages", "Install shell plugins", "Configure default shell"] {
        assert_eq!(log.status_of(name), Some(TaskStatus::Skipped), "{name}");
    }
}

#[test]
fn skip_packages_still_installs_dependencies() {
    let env = TestEnv::new();
    let (exec, log) = doubles(RecordingExecutor::new());
    let selection = Selection {
        skip_packages: true,
        skip_deps: false,
    };

    install(env.config(), debian(), &exec, &log, selection).unwrap();

    let calls = exec.calls();
    assert!(!calls.iter().any(|c| c.contains("apt-get")));
    assert!(calls.iter().any(|c| c.starts_with("git clone")));
}

#[test]
fn satisfied_dependencies_are_not_reinstalled() {
    let env = TestEnv::new();
    let config = env.config();
    fs::create_dir_all(config.oh_my_zsh_dir()).unwrap();
    fs::create_dir_all(config.nvm_dir()).unwrap();
    for plugin in ["zsh-autosuggestions", "zsh-syntax-highlighting", "zsh-completions"] {
        fs::create_dir_all(config.plugin_dir(plugin)).unwrap();
    }
    let (exec, log) = doubles(RecordingExecutor::new());
    let selection = Selection {
        skip_packages: true,
        skip_deps: false,
    };

    install(config, debian(), &exec, &log, selection).unwrap();

    assert!(exec.calls().is_empty(), "got {:?}", exec.calls());
    assert!(log.contains("info", "ok: oh-my-zsh (already installed)"));
    assert!(log.contains("info", "ok: nvm (already installed)"));
}

// ---------------------------------------------------------------------------
// Failure handling
// ---------------------------------------------------------------------------

#[test]
fn failing_package_stops_the_run_with_its_exit_code() {
    let env = TestEnv::new();
    let (exec, log) = doubles(RecordingExecutor::new().failing_on("install -y neovim", 100));

    let err = install(env.config(), debian(), &exec, &log, Selection::default()).unwrap_err();

    assert_eq!(exit_code(&err), 100);
    assert!(format!("{err:#}").starts_with("Install packages: install neovim (apt)"));
    let calls = exec.calls();
    assert_eq!(calls.last().unwrap(), "sudo apt-get install -y neovim");
    assert!(!calls.iter().any(|c| c.starts_with("git clone")));
    assert!(!env.home_path(".zshrc").exists(), "symlinks never reached");
    assert_eq!(log.status_of("Install packages"), Some(TaskStatus::Failed));
    assert_eq!(log.status_of("Install symlinks"), None);
}

#[test]
fn unsupported_platform_is_fatal_before_side_effects() {
    let env = TestEnv::new();
    let (exec, log) = doubles(RecordingExecutor::new());
    let other = Platform::new(Os::Other, Distro::Unknown, None);

    let err = install(env.config(), other, &exec, &log, Selection::default()).unwrap_err();

    assert!(err.downcast_ref::<PlatformError>().is_some());
    assert_eq!(exit_code(&err), 1);
    assert!(exec.calls().is_empty());
    assert!(!env.home_path(".zshrc").exists());
}

#[test]
fn missing_package_manager_is_only_a_warning() {
    let env = TestEnv::new();
    let (exec, log) = doubles(RecordingExecutor::new());
    let bare = Platform::new(Os::Linux, Distro::Unknown, None);

    install(env.config(), bare, &exec, &log, Selection::default()).unwrap();

    assert_eq!(log.status_of("Install packages"), Some(TaskStatus::Skipped));
    assert!(log.contains("warn", "no supported package manager"));
    assert_eq!(log.status_of("Install symlinks"), Some(TaskStatus::Ok));
}

// ---------------------------------------------------------------------------
// Symlink reconciliation
// ---------------------------------------------------------------------------

#[test]
fn existing_zshrc_is_backed_up_then_linked() {
    let env = TestEnv::new().with_home_file(".zshrc", "# hand-written\n");
    let config = env.config();
    let backup_root = config.backup_root.clone();
    let (exec, log) = doubles(RecordingExecutor::new());

    install(config, debian(), &exec, &log, Selection::links_only()).unwrap();

    assert_eq!(
        fs::read_link(env.home_path(".zshrc")).unwrap(),
        env.repo.join("zsh/.zshrc")
    );
    assert_eq!(
        fs::read_to_string(backup_root.join(".zshrc")).unwrap(),
        "# hand-written\n"
    );
    assert!(backup_root.starts_with(env.home.join(".dotfiles_backup")));
}

#[test]
fn existing_config_directory_is_backed_up_whole() {
    let env = TestEnv::new().with_home_file(".config/nvim/init.lua", "-- mine\n");
    let config = env.config();
    let backup_root = config.backup_root.clone();
    let (exec, log) = doubles(RecordingExecutor::new());

    install(config, debian(), &exec, &log, Selection::links_only()).unwrap();

    assert!(fs::symlink_metadata(env.home_path(".config/nvim")).unwrap().file_type().is_symlink());
    assert_eq!(
        fs::read_to_string(backup_root.join("nvim/init.lua")).unwrap(),
        "-- mine\n"
    );
}

#[test]
fn second_run_is_a_no_op() {
    let env = TestEnv::new().with_home_file(".gitconfig", "[user]\n");
    let (exec, log) = doubles(RecordingExecutor::new());
    install(env.config(), debian(), &exec, &log, Selection::links_only()).unwrap();
    let backups_after_first: Vec<_> = fs::read_dir(env.home.join(".dotfiles_backup"))
        .unwrap()
        .collect();

    let (exec2, log2) = doubles(RecordingExecutor::new());
    install(env.config(), debian(), &exec2, &log2, Selection::links_only()).unwrap();

    assert!(
        log2.lines("info")
            .iter()
            .any(|l| l == "0 changed, 7 already ok")
    );
    let backups_after_second: Vec<_> = fs::read_dir(env.home.join(".dotfiles_backup"))
        .unwrap()
        .collect();
    assert_eq!(backups_after_first.len(), backups_after_second.len());
}

#[test]
fn dry_run_changes_nothing() {
    let env = TestEnv::new()
        .with_home_file(".zshrc", "old")
        .with_repo_file("packages/apt.txt", "neovim\n");
    let config = env.config().with_dry_run(true);
    let (exec, log) = doubles(RecordingExecutor::new().with_programs(&["zsh"]));

    install(config, debian(), &exec, &log, Selection::default()).unwrap();

    assert!(exec.calls().is_empty());
    assert_eq!(fs::read_to_string(env.home_path(".zshrc")).unwrap(), "old");
    assert!(!env.home.join(".dotfiles_backup").exists());
    assert!(!env.home_path(".gitconfig").exists());
    assert!(
        log.lines("dry_run")
            .iter()
            .any(|l| l == "would run: sudo apt-get install -y neovim")
    );
    assert_eq!(log.status_of("Install symlinks"), Some(TaskStatus::DryRun));
}
