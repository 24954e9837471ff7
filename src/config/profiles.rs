//! Target profiles: the host configuration systems a module is rendered for.
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// The host configuration system a settings object targets.
///
/// Each profile carries its own option schema: only `system` has the
/// `clean` block and `flake`, only `home` has `alias`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// System-level declarative OS configuration.
    #[default]
    System,
    /// Home-directory configuration.
    Home,
}

/// All known profile names.
pub const PROFILE_NAMES: &[&str] = &["system", "home"];

impl Profile {
    /// The canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Home => "home",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" | "darwin" | "os" => Ok(Self::System),
            "home" | "home-manager" => Ok(Self::Home),
            other => Err(format!(
                "invalid profile '{other}': must be one of {}",
                PROFILE_NAMES.join(", ")
            )),
        }
    }
}
