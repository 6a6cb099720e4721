//! Third-party tools bootstrapped from their upstream installers.
use std::path::PathBuf;

use anyhow::Result;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::config::Config;
use crate::exec::Executor;

/// Homebrew's official installer.
const HOMEBREW_INSTALLER: &str = "https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh";
/// oh-my-zsh's official installer.
const OH_MY_ZSH_INSTALLER: &str =
    "https://raw.githubusercontent.com/ohmyzsh/ohmyzsh/master/tools/install.sh";
/// Pinned nvm release.
pub const NVM_VERSION: &str = "v0.40.1";
/// Directories where a Homebrew installation lives.
const HOMEBREW_PREFIXES: [&str; 2] = ["/opt/homebrew", "/usr/local/Homebrew"];

/// oh-my-zsh plugins installed into `$ZSH_CUSTOM/plugins`, as `(name, repository)`.
pub const ZSH_PLUGINS: [(&str, &str); 3] = [
    (
        "zsh-autosuggestions",
        "https://github.com/zsh-users/zsh-autosuggestions",
    ),
    (
        "zsh-syntax-highlighting",
        "https://github.com/zsh-users/zsh-syntax-highlighting.git",
    ),
    (
        "zsh-completions",
        "https://github.com/zsh-users/zsh-completions",
    ),
];

/// Shell snippet that downloads `url` and runs it with `interpreter`.
///
/// The download is captured first so a failed fetch aborts instead of
/// running an empty script.
fn fetch_and_run(url: &str, interpreter: &str, extra_args: &str) -> String {
    format!(r#"set -e; script="$(curl -fsSL {url})"; {interpreter} -c "$script"{extra_args}"#)
}

/// A tool that is present when a marker path exists, and otherwise
/// installed by running an external installer.
#[derive(Debug)]
pub struct DependencyResource<'a> {
    /// Display name.
    pub name: String,
    /// Paths whose existence means the tool is installed.
    pub markers: Vec<PathBuf>,
    /// Program on `PATH` that also counts as installed.
    probe: Option<&'static str>,
    /// Installer program.
    pub program: String,
    /// Installer arguments.
    pub args: Vec<String>,
    /// Extra environment for the installer.
    env: Vec<(&'static str, &'static str)>,
    executor: &'a dyn Executor,
}

impl<'a> DependencyResource<'a> {
    /// Homebrew, via its non-interactive installer.
    #[must_use]
    pub fn homebrew(executor: &'a dyn Executor) -> Self {
        Self {
            name: "Homebrew".to_string(),
            markers: HOMEBREW_PREFIXES.iter().map(PathBuf::from).collect(),
            probe: Some("brew"),
            program: "/bin/bash".to_string(),
            args: vec![
                "-c".to_string(),
                fetch_and_run(HOMEBREW_INSTALLER, "/bin/bash", ""),
            ],
            env: vec![("NONINTERACTIVE", "1")],
            executor,
        }
    }

    /// oh-my-zsh, installed unattended and without replacing `~/.zshrc`.
    #[must_use]
    pub fn oh_my_zsh(config: &Config, executor: &'a dyn Executor) -> Self {
        Self {
            name: "oh-my-zsh".to_string(),
            markers: vec![config.oh_my_zsh_dir()],
            probe: None,
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                fetch_and_run(
                    OH_MY_ZSH_INSTALLER,
                    "sh",
                    r#" "" --unattended --keep-zshrc"#,
                ),
            ],
            env: Vec::new(),
            executor,
        }
    }

    /// An oh-my-zsh plugin, shallow-cloned into `$ZSH_CUSTOM/plugins/<name>`.
    #[must_use]
    pub fn zsh_plugin(config: &Config, name: &str, url: &str, executor: &'a dyn Executor) -> Self {
        let dir = config.plugin_dir(name);
        Self {
            name: name.to_string(),
            args: vec![
                "clone".to_string(),
                "--depth=1".to_string(),
                url.to_string(),
                dir.to_string_lossy().into_owned(),
            ],
            markers: vec![dir],
            probe: None,
            program: "git".to_string(),
            env: Vec::new(),
            executor,
        }
    }

    /// nvm, with `PROFILE=/dev/null` so the installer leaves shell
    /// startup files alone.
    #[must_use]
    pub fn nvm(config: &Config, executor: &'a dyn Executor) -> Self {
        let url = format!("https://raw.githubusercontent.com/nvm-sh/nvm/{NVM_VERSION}/install.sh");
        Self {
            name: "nvm".to_string(),
            markers: vec![config.nvm_dir()],
            probe: None,
            program: "bash".to_string(),
            args: vec![
                "-c".to_string(),
                format!("set -o pipefail; curl -fsSL {url} | bash"),
            ],
            env: vec![("PROFILE", "/dev/null")],
            executor,
        }
    }

    /// The installer command line, for dry-run output.
    #[must_use]
    pub fn command_line(&self) -> String {
        let env: String = self
            .env
            .iter()
            .map(|(k, v)| format!("{k}={v} "))
            .collect();
        format!("{env}{} {}", self.program, self.args.join(" "))
    }
}

impl Applicable for DependencyResource<'_> {
    fn description(&self) -> String {
        self.name.clone()
    }

    fn apply(&self) -> Result<ResourceChange> {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        self.executor
            .run_with_env(&self.program, &args, &self.env)?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for DependencyResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        let present = self.markers.iter().any(|m| m.exists())
            || self.probe.is_some_and(|p| self.executor.which(p).is_some());
        Ok(if present {
            ResourceState::Correct
        } else {
            ResourceState::Missing
        })
    }
}
