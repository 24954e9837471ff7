//! Partial settings and the merge that combines them.
//!
//! A fragment holds only what one configuration file defines. Fragments are
//! folded left to right with [`SettingsFragment::merge`]; the strategy for
//! each option matches its [`MergeStrategy`](super::schema::MergeStrategy)
//! declaration.
use std::collections::BTreeMap;

use serde::Deserialize;

/// A package as written in a fragment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PackageDef {
    /// Plain path; the main program keeps its default.
    Path(String),
    /// Path with an explicit main program.
    Full {
        /// Package location (store path or attribute path).
        path: String,
        /// Executable name under `bin/`.
        #[serde(rename = "mainProgram")]
        main_program: Option<String>,
    },
}

/// `os.flake` / `home.flake` sub-table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlakeFragment {
    /// Flake directory, if defined.
    pub flake: Option<String>,
}

/// `clean` sub-table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CleanFragment {
    /// `clean.enable`.
    pub enable: Option<bool>,
    /// `clean.user`.
    pub user: Option<String>,
    /// `clean.interval`.
    pub interval: Option<BTreeMap<String, toml::Value>>,
    /// `clean.extraArgs`.
    #[serde(rename = "extraArgs")]
    pub extra_args: Option<String>,
}

/// Module options defined by a single fragment; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFragment {
    /// `enable`.
    pub enable: Option<bool>,
    /// `package`.
    pub package: Option<PackageDef>,
    /// `alias` (home profile).
    pub alias: Option<bool>,
    /// `flake` (system profile).
    pub flake: Option<String>,
    /// `os.*`.
    #[serde(default)]
    pub os: FlakeFragment,
    /// `home.*`.
    #[serde(default)]
    pub home: FlakeFragment,
    /// `clean.*` (system profile).
    #[serde(default)]
    pub clean: CleanFragment,
}

impl SettingsFragment {
    /// Combine `self` with a `later` fragment.
    ///
    /// Scalars take the later definition when present. `clean.interval`
    /// is merged key by key, the later fragment winning per key.
    #[must_use]
    pub fn merge(self, later: Self) -> Self {
        Self {
            enable: later.enable.or(self.enable),
            package: later.package.or(self.package),
            alias: later.alias.or(self.alias),
            flake: later.flake.or(self.flake),
            os: FlakeFragment {
                flake: later.os.flake.or(self.os.flake),
            },
            home: FlakeFragment {
                flake: later.home.flake.or(self.home.flake),
            },
            clean: CleanFragment {
                enable: later.clean.enable.or(self.clean.enable),
                user: later.clean.user.or(self.clean.user),
                interval: union(self.clean.interval, later.clean.interval),
                extra_args: later.clean.extra_args.or(self.clean.extra_args),
            },
        }
    }
}

fn union<V>(
    earlier: Option<BTreeMap<String, V>>,
    later: Option<BTreeMap<String, V>>,
) -> Option<BTreeMap<String, V>> {
    match (earlier, later) {
        (Some(mut base), Some(over)) => {
            base.extend(over);
            Some(base)
        }
        (base, over) => over.or(base),
    }
}

/// Fold fragments in order into a single fragment.
#[must_use]
pub fn merge_all(fragments: impl IntoIterator<Item = SettingsFragment>) -> SettingsFragment {
    fragments
        .into_iter()
        .fold(SettingsFragment::default(), SettingsFragment::merge)
}

/// External host settings defined by a single fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostFragment {
    /// Whether the host's own automatic garbage collection is enabled.
    pub gc_automatic: Option<bool>,
    /// Whether the host runs Nix through the daemon.
    pub use_daemon: Option<bool>,
}

impl HostFragment {
    /// Combine `self` with a `later` fragment; the last writer wins.
    #[must_use]
    pub fn merge(self, later: Self) -> Self {
        Self {
            gc_automatic: later.gc_automatic.or(self.gc_automatic),
            use_daemon: later.use_daemon.or(self.use_daemon),
        }
    }
}
