//! Host platform identification.
use std::fmt;
use std::str::FromStr;

use crate::error::PlatformError;

/// A Nix system identifier such as `x86_64-linux` or `aarch64-darwin`.
///
/// The identifier picks the default package set, so it is always injected
/// explicitly rather than looked up while settings are being resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
    system: String,
}

impl Platform {
    /// Parse a `<arch>-<os>` system identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::InvalidSystem`] if the identifier is empty or
    /// does not consist of exactly two non-empty `-`-separated parts.
    pub fn parse(system: &str) -> Result<Self, PlatformError> {
        let trimmed = system.trim();
        match trimmed.split_once('-') {
            Some((arch, os)) if !arch.is_empty() && !os.is_empty() && !os.contains('-') => {
                Ok(Self {
                    system: trimmed.to_string(),
                })
            }
            _ => Err(PlatformError::InvalidSystem(system.to_string())),
        }
    }

    /// Detect the platform this binary was built for.
    #[must_use]
    pub fn detect() -> Self {
        let os = if cfg!(target_os = "macos") {
            "darwin"
        } else {
            std::env::consts::OS
        };
        Self {
            system: format!("{}-{os}", std::env::consts::ARCH),
        }
    }

    /// The full system identifier.
    #[must_use]
    pub fn system(&self) -> &str {
        &self.system
    }

    /// The architecture half of the identifier.
    #[must_use]
    pub fn arch(&self) -> &str {
        self.system.split_once('-').map_or("", |(arch, _)| arch)
    }

    /// The operating-system half of the identifier.
    #[must_use]
    pub fn os(&self) -> &str {
        self.system.split_once('-').map_or("", |(_, os)| os)
    }

    /// Whether the identifier names a Darwin (macOS) host.
    #[must_use]
    pub fn is_darwin(&self) -> bool {
        self.os() == "darwin"
    }

    /// Whether the identifier names a Linux host.
    #[must_use]
    pub fn is_linux(&self) -> bool {
        self.os() == "linux"
    }
}

impl FromStr for Platform {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.system)
    }
}
