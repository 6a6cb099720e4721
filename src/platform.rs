//! Host platform and package-manager detection.
use std::fmt;

use crate::exec::Executor;
use crate::resources::package::PackageManager;

/// Location of the distribution identification file on Linux.
const OS_RELEASE: &str = "/etc/os-release";

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Apple macOS.
    MacOs,
    /// Any Linux distribution.
    Linux,
    /// Any other target; installs refuse to run here.
    Other,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MacOs => write!(f, "macos"),
            Self::Linux => write!(f, "linux"),
            Self::Other => write!(f, "{}", std::env::consts::OS),
        }
    }
}

/// Linux distribution family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distro {
    /// Debian, Ubuntu and derivatives.
    Debian,
    /// Fedora, RHEL and derivatives.
    Fedora,
    /// Arch Linux and derivatives.
    Arch,
    /// Unrecognised or not Linux.
    Unknown,
}

impl fmt::Display for Distro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debian => write!(f, "debian"),
            Self::Fedora => write!(f, "fedora"),
            Self::Arch => write!(f, "arch"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Platform information for the current system.
///
/// Computed once at startup and never mutated. `package_manager` is `None`
/// only on Linux hosts where none of the known managers is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Host operating system.
    pub os: Os,
    /// Linux distribution family (`Unknown` off Linux).
    pub distro: Distro,
    /// Native package manager, if one was found.
    pub package_manager: Option<PackageManager>,
}

impl Platform {
    /// Detect the current platform.
    ///
    /// Never fails: unknown hosts resolve to `Distro::Unknown` and no
    /// package manager.
    #[must_use]
    pub fn detect(executor: &dyn Executor) -> Self {
        let os = Self::detect_os();
        let os_release = if os == Os::Linux {
            std::fs::read_to_string(OS_RELEASE).ok()
        } else {
            None
        };
        Self::from_parts(os, os_release.as_deref(), executor)
    }

    /// Build platform information from an OS, the contents of
    /// `/etc/os-release` (if any), and an executor used to probe `PATH`.
    #[must_use]
    pub fn from_parts(os: Os, os_release: Option<&str>, executor: &dyn Executor) -> Self {
        let distro = match (os, os_release) {
            (Os::Linux, Some(contents)) => parse_distro(contents),
            _ => Distro::Unknown,
        };
        let package_manager = match os {
            Os::MacOs => Some(PackageManager::Brew),
            Os::Linux => PackageManager::LINUX_PRIORITY
                .iter()
                .find(|(binary, _)| executor.which(binary).is_some())
                .map(|(_, manager)| *manager),
            Os::Other => None,
        };
        Self {
            os,
            distro,
            package_manager,
        }
    }

    /// Create a platform with explicit values.
    #[must_use]
    pub const fn new(os: Os, distro: Distro, package_manager: Option<PackageManager>) -> Self {
        Self {
            os,
            distro,
            package_manager,
        }
    }

    /// Whether the host runs macOS.
    #[must_use]
    pub fn is_macos(&self) -> bool {
        self.os == Os::MacOs
    }

    /// Whether installs can run on this host.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.os != Os::Other
    }

    /// One-line human-readable summary, e.g. `linux (debian), package manager: apt`.
    #[must_use]
    pub fn summary(&self) -> String {
        let manager = self
            .package_manager
            .map_or_else(|| "none".to_string(), |m| m.to_string());
        match self.os {
            Os::Linux => format!("{} ({}), package manager: {manager}", self.os, self.distro),
            Os::MacOs | Os::Other => format!("{}, package manager: {manager}", self.os),
        }
    }

    const fn detect_os() -> Os {
        if cfg!(target_os = "macos") {
            Os::MacOs
        } else if cfg!(target_os = "linux") {
            Os::Linux
        } else {
            Os::Other
        }
    }
}

/// Classify a distribution from `/etc/os-release` contents.
///
/// `ID` is consulted first, then each token of `ID_LIKE`.
#[must_use]
pub fn parse_distro(os_release: &str) -> Distro {
    let field = |key: &str| {
        os_release.lines().find_map(|line| {
            let (k, v) = line.trim().split_once('=')?;
            (k == key).then(|| v.trim().trim_matches(|c| c == '"' || c == '\'').to_lowercase())
        })
    };

    let id = field("ID");
    let id_like = field("ID_LIKE").unwrap_or_default();
    id.iter()
        .map(String::as_str)
        .chain(id_like.split_whitespace())
        .find_map(classify_id)
        .unwrap_or(Distro::Unknown)
}

fn classify_id(id: &str) -> Option<Distro> {
    match id {
        "debian" | "ubuntu" | "linuxmint" | "pop" => Some(Distro::Debian),
        "fedora" | "rhel" | "centos" | "rocky" | "almalinux" => Some(Distro::Fedora),
        "arch" | "manjaro" | "endeavouros" => Some(Distro::Arch),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::exec::test_helpers::RecordingExecutor;

    #[test]
    fn platform_detect_never_panics() {
        let p = Platform::detect(&RecordingExecutor::new());
        if p.is_macos() {
            assert_eq!(p.package_manager, Some(PackageManager::Brew));
        }
    }

    #[test]
    fn apt_wins_over_dnf() {
        let executor = RecordingExecutor::new().with_programs(&["dnf", "apt-get"]);
        let p = Platform::from_parts(Os::Linux, None, &executor);
        assert_eq!(p.package_manager, Some(PackageManager::Apt));
    }

    #[test]
    fn dnf_wins_over_pacman() {
        let executor = RecordingExecutor::new().with_programs(&["pacman", "dnf"]);
        let p = Platform::from_parts(Os::Linux, None, &executor);
        assert_eq!(p.package_manager, Some(PackageManager::Dnf));
    }

    #[test]
    fn pacman_detected_alone() {
        let executor = RecordingExecutor::new().with_programs(&["pacman"]);
        let p = Platform::from_parts(Os::Linux, None, &executor);
        assert_eq!(p.package_manager, Some(PackageManager::Pacman));
    }

    #[test]
    fn linux_without_manager_is_none() {
        let p = Platform::from_parts(Os::Linux, None, &RecordingExecutor::new());
        assert_eq!(p.package_manager, None);
        assert_eq!(p.distro, Distro::Unknown);
        assert!(p.is_supported());
    }

    #[test]
    fn macos_always_uses_brew() {
        let p = Platform::from_parts(Os::MacOs, None, &RecordingExecutor::new());
        assert_eq!(p.package_manager, Some(PackageManager::Brew));
    }

    #[test]
    fn other_os_is_unsupported() {
        let p = Platform::from_parts(Os::Other, None, &RecordingExecutor::new());
        assert!(!p.is_supported());
        assert_eq!(p.package_manager, None);
    }

    #[test]
    fn parse_distro_from_id() {
        assert_eq!(parse_distro("NAME=\"Arch Linux\"\nID=arch\n"), Distro::Arch);
        assert_eq!(parse_distro("ID=fedora\nVERSION_ID=40\n"), Distro::Fedora);
        assert_eq!(parse_distro("ID=\"debian\"\n"), Distro::Debian);
    }

    #[test]
    fn parse_distro_falls_back_to_id_like() {
        let contents = "ID=pika\nID_LIKE=\"ubuntu debian\"\n";
        assert_eq!(parse_distro(contents), Distro::Debian);
        assert_eq!(parse_distro("ID=nobara\nID_LIKE=\"fedora\"\n"), Distro::Fedora);
    }

    #[test]
    fn parse_distro_unknown() {
        assert_eq!(parse_distro("ID=nixos\n"), Distro::Unknown);
        assert_eq!(parse_distro(""), Distro::Unknown);
    }

    #[test]
    fn from_parts_reads_distro_only_on_linux() {
        let executor = RecordingExecutor::new();
        let linux = Platform::from_parts(Os::Linux, Some("ID=ubuntu\n"), &executor);
        assert_eq!(linux.distro, Distro::Debian);
        let mac = Platform::from_parts(Os::MacOs, Some("ID=ubuntu\n"), &executor);
        assert_eq!(mac.distro, Distro::Unknown);
    }

    #[test]
    fn summary_formats() {
        let p = Platform::new(Os::Linux, Distro::Debian, Some(PackageManager::Apt));
        assert_eq!(p.summary(), "linux (debian), package manager: apt");
        let p = Platform::new(Os::Linux, Distro::Unknown, None);
        assert_eq!(p.summary(), "linux (unknown), package manager: none");
        let p = Platform::new(Os::MacOs, Distro::Unknown, Some(PackageManager::Brew));
        assert_eq!(p.summary(), "macos, package manager: brew");
    }
}
