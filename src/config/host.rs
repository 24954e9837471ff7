//! Settings owned by the host system that cross-module rules read.
use serde::Serialize;

use super::fragment::HostFragment;

/// Resolved host settings.
///
/// These are not options of the nh module; they mirror options of other
/// modules on the same host that the validator and the service renderer
/// consult.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HostSettings {
    /// The host's own automatic garbage collection is enabled.
    pub gc_automatic: bool,
    /// The host runs Nix through the daemon.
    pub use_daemon: bool,
}

impl HostSettings {
    /// Apply defaults (everything off) to a merged host fragment.
    #[must_use]
    pub fn resolve(fragment: HostFragment) -> Self {
        Self {
            gc_automatic: fragment.gc_automatic.unwrap_or(false),
            use_daemon: fragment.use_daemon.unwrap_or(false),
        }
    }
}
