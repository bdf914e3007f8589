//! Package manager selection and tool availability probing

use std::fmt;
use std::path::PathBuf;

/// Package manager used for installs and printed commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Npm,
    Yarn,
}

impl PackageManager {
    /// Pick the package manager that launched us, from `$npm_execpath`
    pub fn detect(npm_execpath: Option<&str>) -> Self {
        match npm_execpath {
            Some(path) if path.contains("yarn") => PackageManager::Yarn,
            _ => PackageManager::Npm,
        }
    }

    pub fn from_env() -> Self {
        Self::detect(std::env::var("npm_execpath").ok().as_deref())
    }

    /// Binary name
    pub fn binary(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
        }
    }

    pub fn install_command(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm install",
            PackageManager::Yarn => "yarn",
        }
    }

    /// Prefix for running package scripts (`npm run dev`, `yarn dev`)
    pub fn run_prefix(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm run",
            PackageManager::Yarn => "yarn",
        }
    }

    pub fn add_command(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm install",
            PackageManager::Yarn => "yarn add",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

/// Result of looking a binary up in `$PATH`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    Present(PathBuf),
    Absent,
    ProbeFailed(String),
}

impl Capability {
    pub fn probe(binary: &str) -> Self {
        match which::which(binary) {
            Ok(path) => Capability::Present(path),
            Err(which::Error::CannotFindBinaryPath) => Capability::Absent,
            Err(e) => Capability::ProbeFailed(e.to_string()),
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Capability::Present(_))
    }
}

/// Tool availability, probed once per invocation and passed down
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub package_manager: PackageManager,
    pub package_manager_binary: Capability,
    pub git: Capability,
}

impl Capabilities {
    pub fn probe(package_manager: PackageManager) -> Self {
        Self {
            package_manager,
            package_manager_binary: Capability::probe(package_manager.binary()),
            git: Capability::probe("git"),
        }
    }
}
