//! Environment variable rendering.
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::config::settings::{FlakePath, Settings};

/// Flake used by every subcommand (system profile only).
pub const NH_FLAKE: &str = "NH_FLAKE";
/// Flake used by `nh os`.
pub const NH_OS_FLAKE: &str = "NH_OS_FLAKE";
/// Flake used by `nh home`.
pub const NH_HOME_FLAKE: &str = "NH_HOME_FLAKE";

/// Environment variables to export.
///
/// Empty when the module is disabled. Otherwise a key is present only when
/// its option is set, and the value is the path exactly as written. An unset
/// option adds no key at all, so consumers fall back to nh's own default
/// instead of seeing an empty string.
#[must_use]
pub fn render(settings: &Settings) -> BTreeMap<String, String> {
    if !settings.enabled() {
        return BTreeMap::new();
    }

    let entries: [(&str, Option<&FlakePath>); 3] = match settings {
        Settings::System(s) => [
            (NH_FLAKE, s.flake.as_ref()),
            (NH_OS_FLAKE, s.os_flake.as_ref()),
            (NH_HOME_FLAKE, s.home_flake.as_ref()),
        ],
        Settings::Home(h) => [
            (NH_FLAKE, None),
            (NH_OS_FLAKE, h.os_flake.as_ref()),
            (NH_HOME_FLAKE, h.home_flake.as_ref()),
        ],
    };

    entries
        .into_iter()
        .filter_map(|(name, path)| path.map(|p| (name.to_string(), p.as_str().to_string())))
        .collect()
}

/// Render `export NAME='value'` lines for a POSIX shell session.
#[must_use]
pub fn shell_exports(vars: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for (name, value) in vars {
        let quoted = value.replace('\'', r"'\''");
        let _ = writeln!(out, "export {name}='{quoted}'");
    }
    out
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::fragment::SettingsFragment;
    use crate::config::profiles::Profile;
    use crate::platform::Platform;

    fn resolve(profile: Profile, src: &str) -> Settings {
        let fragment: SettingsFragment = toml::from_str(src).unwrap();
        Settings::resolve(profile, fragment, &Platform::parse("aarch64-darwin").unwrap())
    }

    #[test]
    fn unset_paths_add_no_keys() {
        assert!(render(&resolve(Profile::System, "enable = true\n")).is_empty());
        assert!(render(&resolve(Profile::Home, "enable = true\n")).is_empty());
    }

    #[test]
    fn os_flake_is_exported_verbatim() {
        let vars = render(&resolve(Profile::System, "enable = true\nos.flake = \"/etc/nix-darwin/\"\n"));
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[NH_OS_FLAKE], "/etc/nix-darwin/");
    }

    #[test]
    fn empty_string_is_distinct_from_unset() {
        let vars = render(&resolve(Profile::Home, "enable = true\nhome.flake = \"\"\n"));
        assert_eq!(vars.get(NH_HOME_FLAKE).map(String::as_str), Some(""));
        assert!(!vars.contains_key(NH_OS_FLAKE));
    }

    #[test]
    fn system_profile_exports_all_three() {
        let vars = render(&resolve(
            Profile::System,
            "enable = true\nflake = \"/a\"\nos.flake = \"/b\"\nhome.flake = \"~/c\"\n",
        ));
        let keys: Vec<&str> = vars.keys().map(String::as_str).collect();
        assert_eq!(keys, [NH_FLAKE, NH_HOME_FLAKE, NH_OS_FLAKE]);
        assert_eq!(vars[NH_HOME_FLAKE], "~/c");
    }

    #[test]
    fn home_profile_never_exports_nh_flake() {
        let vars = render(&resolve(Profile::Home, "enable = true\nos.flake = \"/b\"\n"));
        assert!(!vars.contains_key(NH_FLAKE));
    }

    #[test]
    fn disabled_module_exports_nothing() {
        let system = resolve(
            Profile::System,
            "enable = false\nflake = \"/etc/nixos\"\nos.flake = \"/etc/nixos\"\n",
        );
        assert!(render(&system).is_empty());
        let home = resolve(Profile::Home, "os.flake = \"/a\"\nhome.flake = \"/b\"\n");
        assert!(render(&home).is_empty());
    }

    #[test]
    fn shell_exports_quote_values() {
        let vars = BTreeMap::from([
            (NH_OS_FLAKE.to_string(), "/etc/nix-darwin".to_string()),
            (NH_HOME_FLAKE.to_string(), "/home/o'neil/flake".to_string()),
        ]);
        insta::assert_snapshot!(shell_exports(&vars), @r"
        export NH_HOME_FLAKE='/home/o'\''neil/flake'
        export NH_OS_FLAKE='/etc/nix-darwin'
        ");
    }
}
