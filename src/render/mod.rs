//! Pure mapping from validated settings to host artifacts.
//!
//! The three outputs are independent of each other; none reads another's
//! result.
pub mod environment;
pub mod packages;
pub mod service;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::host::HostSettings;
use crate::config::settings::{PackageRef, Settings};
pub use service::ScheduledService;

/// Everything rendered for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered {
    /// Packages to install.
    pub packages: Vec<PackageRef>,
    /// Environment variables to export.
    pub environment: BTreeMap<String, String>,
    /// Periodic cleanup job, if any.
    pub service: Option<ScheduledService>,
}

/// Render all artifacts.
#[must_use]
pub fn render_all(settings: &Settings, host: &HostSettings) -> Rendered {
    Rendered {
        packages: packages::render(settings),
        environment: environment::render(settings),
        service: service::render(settings, host),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::fragment::SettingsFragment;
    use crate::config::profiles::Profile;
    use crate::platform::Platform;

    #[test]
    fn rendering_is_deterministic() {
        let fragment: SettingsFragment = toml::from_str(
            "enable = true\nflake = \"/f\"\nos.flake = \"/o\"\nhome.flake = \"/h\"\n[clean]\nenable = true\ninterval = { Weekday = 1, Hour = 2, Minute = 3 }\n",
        )
        .unwrap();
        let settings = Settings::resolve(
            Profile::System,
            fragment,
            &Platform::parse("aarch64-darwin").unwrap(),
        );
        let host = HostSettings::default();
        let first = serde_json::to_string(&render_all(&settings, &host)).unwrap();
        let second = serde_json::to_string(&render_all(&settings, &host)).unwrap();
        assert_eq!(first, second);
    }
}
