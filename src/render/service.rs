//! Scheduled cleanup service rendering.
use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::host::HostSettings;
use crate::config::settings::{IntervalSpec, Settings};

/// Name of the registered cleanup job.
pub const SERVICE_NAME: &str = "nh-clean";

/// Process environment variable selecting the Nix store connection.
pub const NIX_REMOTE: &str = "NIX_REMOTE";

/// Descriptor of a periodic background job for the host service manager.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledService {
    /// Job name.
    pub name: String,
    /// Command line the job runs.
    pub command: String,
    /// Calendar trigger, passed through verbatim.
    pub trigger: IntervalSpec,
    /// Whether the job also runs as soon as it is registered.
    pub run_on_registration: bool,
    /// Identity the job runs as; `None` leaves it to the service manager.
    pub user: Option<String>,
    /// Extra process environment.
    pub environment: BTreeMap<String, String>,
}

/// The cleanup job, when the system profile enables it.
///
/// `NIX_REMOTE` is always set: `daemon` when the host talks to the Nix
/// daemon, empty otherwise.
#[must_use]
pub fn render(settings: &Settings, host: &HostSettings) -> Option<ScheduledService> {
    let Settings::System(system) = settings else {
        return None;
    };
    if !system.clean.enable {
        return None;
    }

    let mut command = format!("{} clean all", system.package.executable());
    if !system.clean.extra_args.is_empty() {
        command.push(' ');
        command.push_str(&system.clean.extra_args);
    }

    let nix_remote = if host.use_daemon { "daemon" } else { "" };

    Some(ScheduledService {
        name: SERVICE_NAME.to_string(),
        command,
        trigger: system.clean.interval.clone(),
        run_on_registration: false,
        user: system.clean.user.clone(),
        environment: BTreeMap::from([(NIX_REMOTE.to_string(), nix_remote.to_string())]),
    })
}
