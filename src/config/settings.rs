//! Resolved, immutable settings for one evaluation.
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::fragment::{PackageDef, SettingsFragment};
use super::profiles::Profile;
use crate::platform::Platform;

/// Main program of the default package.
pub const DEFAULT_MAIN_PROGRAM: &str = "nh_darwin";

/// Main program of the compatibility alias package.
pub const ALIAS_MAIN_PROGRAM: &str = "nh";

/// Reference to an installable package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageRef {
    /// Package location (store path or attribute path).
    pub path: String,
    /// Executable name under `bin/`.
    pub main_program: String,
}

impl PackageRef {
    /// Create a package reference.
    #[must_use]
    pub fn new(path: impl Into<String>, main_program: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            main_program: main_program.into(),
        }
    }

    /// The default nh package for `platform`.
    #[must_use]
    pub fn default_for(platform: &Platform) -> Self {
        Self::new(
            format!("packages.{}.default", platform.system()),
            DEFAULT_MAIN_PROGRAM,
        )
    }

    /// The package providing the `nh` alias for `platform`.
    #[must_use]
    pub fn alias_for(platform: &Platform) -> Self {
        Self::new(
            format!("packages.{}.alias", platform.system()),
            ALIAS_MAIN_PROGRAM,
        )
    }

    /// Path of the main executable.
    #[must_use]
    pub fn executable(&self) -> String {
        format!(
            "{}/bin/{}",
            self.path.trim_end_matches('/'),
            self.main_program
        )
    }

    fn from_def(def: PackageDef, fallback: &Self) -> Self {
        match def {
            PackageDef::Path(path) => Self::new(path, fallback.main_program.clone()),
            PackageDef::Full { path, main_program } => Self::new(
                path,
                main_program.unwrap_or_else(|| fallback.main_program.clone()),
            ),
        }
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// A flake directory path, kept exactly as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlakePath(String);

impl FlakePath {
    /// Wrap a path verbatim.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The path as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the path names a single `.nix` file (case-sensitive).
    #[must_use]
    #[allow(clippy::case_sensitive_file_extension_comparisons)]
    pub fn is_nix_file(&self) -> bool {
        self.0.ends_with(".nix")
    }
}

impl fmt::Display for FlakePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Calendar trigger handed to the service manager without interpretation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IntervalSpec(BTreeMap<String, toml::Value>);

impl IntervalSpec {
    /// Wrap a mapping verbatim.
    #[must_use]
    pub const fn new(entries: BTreeMap<String, toml::Value>) -> Self {
        Self(entries)
    }

    /// The raw entries.
    #[must_use]
    pub const fn entries(&self) -> &BTreeMap<String, toml::Value> {
        &self.0
    }
}

impl Default for IntervalSpec {
    /// Weekly, on Sunday.
    fn default() -> Self {
        Self(BTreeMap::from([(
            "Weekday".to_string(),
            toml::Value::Integer(0),
        )]))
    }
}

/// Periodic cleanup settings (system profile only).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanSettings {
    /// Whether the cleanup job is registered.
    pub enable: bool,
    /// Identity the job runs as.
    pub user: Option<String>,
    /// Schedule trigger.
    pub interval: IntervalSpec,
    /// Single-line string appended to the command.
    pub extra_args: String,
}

/// Resolved settings of the system profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemSettings {
    /// Top-level toggle.
    pub enable: bool,
    /// Package to install.
    pub package: PackageRef,
    /// Exported as `NH_FLAKE`.
    pub flake: Option<FlakePath>,
    /// Exported as `NH_OS_FLAKE`.
    pub os_flake: Option<FlakePath>,
    /// Exported as `NH_HOME_FLAKE`.
    pub home_flake: Option<FlakePath>,
    /// Periodic cleanup.
    pub clean: CleanSettings,
}

/// Resolved settings of the home profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeSettings {
    /// Top-level toggle.
    pub enable: bool,
    /// Package to install.
    pub package: PackageRef,
    /// Whether the alias package is installed too.
    pub alias: bool,
    /// Package installed when `alias` is set.
    pub alias_package: PackageRef,
    /// Exported as `NH_OS_FLAKE`.
    pub os_flake: Option<FlakePath>,
    /// Exported as `NH_HOME_FLAKE`.
    pub home_flake: Option<FlakePath>,
}

/// Settings of either profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "profile", rename_all = "lowercase")]
pub enum Settings {
    /// System profile.
    System(SystemSettings),
    /// Home profile.
    Home(HomeSettings),
}

impl Settings {
    /// Apply defaults to a merged fragment.
    ///
    /// Options that do not belong to `profile` are ignored; the schema check
    /// has already rejected or reported them.
    #[must_use]
    pub fn resolve(profile: Profile, fragment: SettingsFragment, platform: &Platform) -> Self {
        let default_package = PackageRef::default_for(platform);
        let package = fragment.package.map_or_else(
            || default_package.clone(),
            |def| PackageRef::from_def(def, &default_package),
        );
        let os_flake = fragment.os.flake.map(FlakePath::new);
        let home_flake = fragment.home.flake.map(FlakePath::new);
        let enable = fragment.enable.unwrap_or(false);

        match profile {
            Profile::System => {
                let clean = fragment.clean;
                let extra_args = clean.extra_args.unwrap_or_default();
                Self::System(SystemSettings {
                    enable,
                    package,
                    flake: fragment.flake.map(FlakePath::new),
                    os_flake,
                    home_flake,
                    clean: CleanSettings {
                        enable: clean.enable.unwrap_or(false),
                        user: clean.user,
                        interval: clean.interval.map(IntervalSpec::new).unwrap_or_default(),
                        extra_args: extra_args
                            .strip_suffix('\n')
                            .unwrap_or(&extra_args)
                            .to_string(),
                    },
                })
            }
            Profile::Home => Self::Home(HomeSettings {
                enable,
                package,
                alias: fragment.alias.unwrap_or(false),
                alias_package: PackageRef::alias_for(platform),
                os_flake,
                home_flake,
            }),
        }
    }

    /// The profile these settings belong to.
    #[must_use]
    pub const fn profile(&self) -> Profile {
        match self {
            Self::System(_) => Profile::System,
            Self::Home(_) => Profile::Home,
        }
    }

    /// The top-level toggle.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        match self {
            Self::System(s) => s.enable,
            Self::Home(h) => h.enable,
        }
    }

    /// Every flake path option declared by the profile, with its option name.
    #[must_use]
    pub fn flake_paths(&self) -> Vec<(&'static str, Option<&FlakePath>)> {
        match self {
            Self::System(s) => vec![
                ("flake", s.flake.as_ref()),
                ("os.flake", s.os_flake.as_ref()),
                ("home.flake", s.home_flake.as_ref()),
            ],
            Self::Home(h) => vec![
                ("os.flake", h.os_flake.as_ref()),
                ("home.flake", h.home_flake.as_ref()),
            ],
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn darwin() -> Platform {
        Platform::parse("aarch64-darwin").unwrap()
    }

    fn fragment(src: &str) -> SettingsFragment {
        toml::from_str(src).unwrap()
    }

    #[test]
    fn default_package_depends_on_platform() {
        let linux = Platform::parse("x86_64-linux").unwrap();
        assert_eq!(
            PackageRef::default_for(&darwin()).path,
            "packages.aarch64-darwin.default"
        );
        assert_eq!(
            PackageRef::default_for(&linux).path,
            "packages.x86_64-linux.default"
        );
    }

    #[test]
    fn executable_joins_bin_and_main_program() {
        let p = PackageRef::new("/nix/store/abc-nh_darwin/", "nh_darwin");
        assert_eq!(p.executable(), "/nix/store/abc-nh_darwin/bin/nh_darwin");
    }

    #[test]
    fn nix_suffix_is_case_sensitive() {
        assert!(FlakePath::new("/etc/nixos/flake.nix").is_nix_file());
        assert!(!FlakePath::new("/etc/nixos/flake.NIX").is_nix_file());
        assert!(!FlakePath::new("/etc/nixos").is_nix_file());
        assert!(!FlakePath::new("/etc/nixos.nix/").is_nix_file());
    }

    #[test]
    fn resolve_empty_system_fragment_uses_defaults() {
        let settings = Settings::resolve(Profile::System, SettingsFragment::default(), &darwin());
        let Settings::System(s) = settings else {
            panic!("expected system settings");
        };
        assert!(!s.enable);
        assert_eq!(s.package, PackageRef::default_for(&darwin()));
        assert!(s.flake.is_none() && s.os_flake.is_none() && s.home_flake.is_none());
        assert!(!s.clean.enable);
        assert_eq!(s.clean.interval, IntervalSpec::default());
        assert_eq!(s.clean.extra_args, "");
    }

    #[test]
    fn resolve_home_ignores_system_only_options() {
        let settings = Settings::resolve(
            Profile::Home,
            fragment("enable = true\nalias = true\nflake = \"/x\"\n[clean]\nenable = true\n"),
            &darwin(),
        );
        let Settings::Home(h) = settings else {
            panic!("expected home settings");
        };
        assert!(h.enable && h.alias);
        assert_eq!(h.alias_package, PackageRef::alias_for(&darwin()));
    }

    #[test]
    fn resolve_keeps_default_main_program_for_plain_path() {
        let settings = Settings::resolve(
            Profile::System,
            fragment("package = \"/nix/store/abc-nh\"\n"),
            &darwin(),
        );
        let Settings::System(s) = settings else {
            panic!("expected system settings");
        };
        assert_eq!(s.package, PackageRef::new("/nix/store/abc-nh", DEFAULT_MAIN_PROGRAM));
    }

    #[test]
    fn resolve_interval_replaces_default() {
        let settings = Settings::resolve(
            Profile::System,
            fragment("[clean.interval]\nHour = 3\n"),
            &darwin(),
        );
        let Settings::System(s) = settings else {
            panic!("expected system settings");
        };
        assert_eq!(s.clean.interval.entries().len(), 1);
        assert!(!s.clean.interval.entries().contains_key("Weekday"));
    }

    #[test]
    fn resolve_strips_single_trailing_newline_from_extra_args() {
        let settings = Settings::resolve(
            Profile::System,
            fragment("[clean]\nextraArgs = \"--keep 5\\n\"\n"),
            &darwin(),
        );
        let Settings::System(s) = settings else {
            panic!("expected system settings");
        };
        assert_eq!(s.clean.extra_args, "--keep 5");
    }

    #[test]
    fn flake_paths_follow_profile_schema() {
        let system = Settings::resolve(Profile::System, SettingsFragment::default(), &darwin());
        let home = Settings::resolve(Profile::Home, SettingsFragment::default(), &darwin());
        let names = |s: &Settings| s.flake_paths().iter().map(|(n, _)| *n).collect::<Vec<_>>();
        assert_eq!(names(&system), ["flake", "os.flake", "home.flake"]);
        assert_eq!(names(&home), ["os.flake", "home.flake"]);
    }
}
