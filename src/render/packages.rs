//! Package list rendering.
use crate::config::settings::{PackageRef, Settings};

/// Packages to install, in insertion order.
///
/// Empty when the module is disabled. The home profile appends the alias
/// package after the main one when `alias` is set. Duplicates are kept; the
/// host package installation is idempotent.
#[must_use]
pub fn render(settings: &Settings) -> Vec<PackageRef> {
    match settings {
        Settings::System(s) if s.enable => vec![s.package.clone()],
        Settings::Home(h) if h.enable => {
            let mut packages = vec![h.package.clone()];
            if h.alias {
                packages.push(h.alias_package.clone());
            }
            packages
        }
        _ => Vec::new(),
    }
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
        Settings::resolve(profile, fragment, &Platform::parse("x86_64-darwin").unwrap())
    }

    #[test]
    fn disabled_installs_nothing() {
        assert!(render(&resolve(Profile::System, "")).is_empty());
        assert!(render(&resolve(Profile::Home, "alias = true\n")).is_empty());
    }

    #[test]
    fn enabled_installs_main_package() {
        let packages = render(&resolve(Profile::Home, "enable = true\n"));
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].path, "packages.x86_64-darwin.default");
    }

    #[test]
    fn alias_is_installed_second() {
        let packages = render(&resolve(Profile::Home, "enable = true\nalias = true\n"));
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].main_program, "nh_darwin");
        assert_eq!(packages[1].main_program, "nh");
    }

    #[test]
    fn system_profile_has_no_alias() {
        let packages = render(&resolve(Profile::System, "enable = true\n"));
        assert_eq!(packages.len(), 1);
    }

    #[test]
    fn duplicates_are_not_removed() {
        let packages = render(&resolve(
            Profile::Home,
            "enable = true\nalias = true\npackage = { path = \"packages.x86_64-darwin.alias\", mainProgram = \"nh\" }\n",
        ));
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0], packages[1]);
    }
}
