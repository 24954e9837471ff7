//! Option schema: every recognised setting, its type, default and docs.
//!
//! Fragments are checked against the declarations of the active
//! [`Profile`] before they are deserialised, so a type error names the
//! offending option and file instead of surfacing as a serde message.
use serde::Serialize;

use super::profiles::Profile;
use crate::error::SchemaError;

/// The kind of value an option accepts.
///
/// New kinds can be added without touching the merge or validation code;
/// only [`ValueKind::check`] needs to learn about them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum ValueKind {
    /// `true` / `false`.
    Bool,
    /// An optional filesystem path; absence means null.
    NullOrPath,
    /// An optional string; absence means null.
    NullOrStr,
    /// A free-form string-keyed mapping passed through verbatim.
    Attrs,
    /// A string without line breaks (one trailing newline is tolerated).
    SingleLineStr,
    /// A package reference: a path string or `{ path, mainProgram }`.
    Package,
}

impl ValueKind {
    /// Human-readable type name, as shown in errors and `options` output.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::NullOrPath => "null or path",
            Self::NullOrStr => "null or string",
            Self::Attrs => "attribute set",
            Self::SingleLineStr => "single-line string",
            Self::Package => "package",
        }
    }

    /// Type-check a raw TOML value against this kind.
    ///
    /// # Errors
    ///
    /// Returns a description of the mismatch.
    pub fn check(self, value: &toml::Value) -> Result<(), String> {
        match (self, value) {
            (Self::Bool, toml::Value::Boolean(_))
            | (Self::NullOrPath | Self::NullOrStr, toml::Value::String(_)) => Ok(()),
            (Self::Attrs, toml::Value::Table(t)) => check_attrs(t),
            (Self::SingleLineStr, toml::Value::String(s)) => check_single_line(s),
            (Self::Package, toml::Value::String(s)) => {
                if s.trim().is_empty() {
                    Err("package path is empty".to_string())
                } else {
                    Ok(())
                }
            }
            (Self::Package, toml::Value::Table(t)) => check_package_table(t),
            (_, other) => Err(format!("got {}", other.type_str())),
        }
    }
}

fn check_single_line(s: &str) -> Result<(), String> {
    let body = s.strip_suffix('\n').unwrap_or(s);
    if body.contains(['\n', '\r']) {
        Err("value contains a line break".to_string())
    } else {
        Ok(())
    }
}

/// Date-times have no JSON form; they would leak toml's private wrapper.
fn check_attrs(table: &toml::Table) -> Result<(), String> {
    fn check_value(key: &str, value: &toml::Value) -> Result<(), String> {
        match value {
            toml::Value::Datetime(_) => Err(format!("`{key}` must not be a date-time")),
            toml::Value::Array(items) => items.iter().try_for_each(|v| check_value(key, v)),
            toml::Value::Table(inner) => check_attrs(inner),
            _ => Ok(()),
        }
    }
    table.iter().try_for_each(|(key, value)| check_value(key, value))
}

fn check_package_table(table: &toml::Table) -> Result<(), String> {
    for (key, value) in table {
        match (key.as_str(), value) {
            ("path" | "mainProgram", toml::Value::String(_)) => {}
            ("path" | "mainProgram", other) => {
                return Err(format!("`{key}` must be a string, got {}", other.type_str()));
            }
            _ => return Err(format!("unexpected key `{key}` in package")),
        }
    }
    if table.contains_key("path") {
        Ok(())
    } else {
        Err("package table requires `path`".to_string())
    }
}

/// How definitions of one option from several fragments are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    /// The last fragment that defines the option wins.
    Override,
    /// Mappings are merged key by key; the last fragment wins per key.
    Union,
}

/// Declaration of a single option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionDecl {
    /// Dotted option path relative to the module root.
    pub name: &'static str,
    /// Accepted value kind.
    pub kind: ValueKind,
    /// Rendered default value.
    pub default: &'static str,
    /// Human-readable documentation.
    pub description: &'static str,
    /// Merge strategy across fragments.
    pub merge: MergeStrategy,
}

const ENABLE: OptionDecl = OptionDecl {
    name: "enable",
    kind: ValueKind::Bool,
    default: "false",
    description: "Whether to install nh and export its environment.",
    merge: MergeStrategy::Override,
};

const PACKAGE: OptionDecl = OptionDecl {
    name: "package",
    kind: ValueKind::Package,
    default: "packages.<system>.default",
    description: "The nh package to install.",
    merge: MergeStrategy::Override,
};

const ALIAS: OptionDecl = OptionDecl {
    name: "alias",
    kind: ValueKind::Bool,
    default: "false",
    description: "Whether to also install the package that provides the `nh` alias.",
    merge: MergeStrategy::Override,
};

const FLAKE: OptionDecl = OptionDecl {
    name: "flake",
    kind: ValueKind::NullOrPath,
    default: "null",
    description: "The path that will be used for the `NH_FLAKE` environment variable. \
                  Must be a flake directory, not a .nix file.",
    merge: MergeStrategy::Override,
};

const OS_FLAKE: OptionDecl = OptionDecl {
    name: "os.flake",
    kind: ValueKind::NullOrPath,
    default: "null",
    description: "The path that will be used for the `NH_OS_FLAKE` environment variable. \
                  Must be a flake directory, not a .nix file.",
    merge: MergeStrategy::Override,
};

const HOME_FLAKE: OptionDecl = OptionDecl {
    name: "home.flake",
    kind: ValueKind::NullOrPath,
    default: "null",
    description: "The path that will be used for the `NH_HOME_FLAKE` environment variable. \
                  Must be a flake directory, not a .nix file.",
    merge: MergeStrategy::Override,
};

const CLEAN_ENABLE: OptionDecl = OptionDecl {
    name: "clean.enable",
    kind: ValueKind::Bool,
    default: "false",
    description: "Whether to periodically garbage collect with `nh clean all`. Requires `enable`.",
    merge: MergeStrategy::Override,
};

const CLEAN_USER: OptionDecl = OptionDecl {
    name: "clean.user",
    kind: ValueKind::NullOrStr,
    default: "null",
    description: "User that runs the cleanup job.",
    merge: MergeStrategy::Override,
};

const CLEAN_INTERVAL: OptionDecl = OptionDecl {
    name: "clean.interval",
    kind: ValueKind::Attrs,
    default: "{ Weekday = 0 }",
    description: "Calendar interval passed verbatim to the service manager.",
    merge: MergeStrategy::Union,
};

const CLEAN_EXTRA_ARGS: OptionDecl = OptionDecl {
    name: "clean.extraArgs",
    kind: ValueKind::SingleLineStr,
    default: "\"\"",
    description: "Options appended to `nh clean all`.",
    merge: MergeStrategy::Override,
};

const SYSTEM_OPTIONS: &[OptionDecl] = &[
    ENABLE,
    PACKAGE,
    FLAKE,
    OS_FLAKE,
    HOME_FLAKE,
    CLEAN_ENABLE,
    CLEAN_USER,
    CLEAN_INTERVAL,
    CLEAN_EXTRA_ARGS,
];

const HOME_OPTIONS: &[OptionDecl] = &[ENABLE, PACKAGE, ALIAS, OS_FLAKE, HOME_FLAKE];

/// All options declared for `profile`, in documentation order.
#[must_use]
pub const fn declarations(profile: Profile) -> &'static [OptionDecl] {
    match profile {
        Profile::System => SYSTEM_OPTIONS,
        Profile::Home => HOME_OPTIONS,
    }
}

/// Look up a single declaration by dotted name.
#[must_use]
pub fn find(profile: Profile, name: &str) -> Option<&'static OptionDecl> {
    declarations(profile).iter().find(|d| d.name == name)
}

/// Whether `name` is a proper prefix of some declared option path.
fn is_prefix(profile: Profile, name: &str) -> bool {
    declarations(profile).iter().any(|d| {
        d.name
            .strip_prefix(name)
            .is_some_and(|rest| rest.starts_with('.'))
    })
}

/// Outcome of a successful schema check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    /// Undeclared options that were dropped because strict mode was off.
    pub ignored: Vec<String>,
}

/// Check a raw `[nh]` table against the declarations of `profile`.
///
/// Undeclared keys are an error in `strict` mode; otherwise they are removed
/// from `table` and listed in the report.
///
/// # Errors
///
/// Returns [`SchemaError::UnknownOption`] or [`SchemaError::TypeMismatch`].
pub fn check_table(
    profile: Profile,
    table: &mut toml::Table,
    strict: bool,
    origin: &str,
) -> Result<SchemaReport, SchemaError> {
    let mut report = SchemaReport::default();
    let walker = Walker {
        profile,
        strict,
        origin,
    };
    walker.walk(table, "", &mut report)?;
    Ok(report)
}

struct Walker<'a> {
    profile: Profile,
    strict: bool,
    origin: &'a str,
}

impl Walker<'_> {
    fn walk(
        &self,
        table: &mut toml::Table,
        prefix: &str,
        report: &mut SchemaReport,
    ) -> Result<(), SchemaError> {
        let keys: Vec<String> = table.keys().cloned().collect();
        for key in keys {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };

            if let Some(decl) = find(self.profile, &path) {
                if let Some(value) = table.get(&key) {
                    decl.kind
                        .check(value)
                        .map_err(|message| self.mismatch(&path, decl.kind.describe(), message))?;
                }
            } else if is_prefix(self.profile, &path) {
                match table.get_mut(&key) {
                    Some(toml::Value::Table(inner)) => self.walk(inner, &path, report)?,
                    Some(other) => {
                        let message = format!("got {}", other.type_str());
                        return Err(self.mismatch(&path, "attribute set", message));
                    }
                    None => {}
                }
            } else if self.strict {
                return Err(SchemaError::UnknownOption {
                    option: path,
                    profile: self.profile.to_string(),
                    origin: self.origin.to_string(),
                });
            } else {
                table.remove(&key);
                report.ignored.push(path);
            }
        }
        Ok(())
    }

    fn mismatch(&self, option: &str, expected: &str, message: String) -> SchemaError {
        SchemaError::TypeMismatch {
            option: option.to_string(),
            expected: expected.to_string(),
            origin: self.origin.to_string(),
            message,
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn table(src: &str) -> toml::Table {
        toml::from_str(src).unwrap()
    }

    #[test]
    fn system_profile_declares_clean_but_not_alias() {
        assert!(find(Profile::System, "clean.enable").is_some());
        assert!(find(Profile::System, "flake").is_some());
        assert!(find(Profile::System, "alias").is_none());
    }

    #[test]
    fn home_profile_declares_alias_but_not_clean() {
        assert!(find(Profile::Home, "alias").is_some());
        assert!(find(Profile::Home, "clean.enable").is_none());
        assert!(find(Profile::Home, "flake").is_none());
        assert!(find(Profile::Home, "os.flake").is_some());
    }

    #[test]
    fn attrs_options_merge_by_union() {
        for profile in [Profile::System, Profile::Home] {
            for decl in declarations(profile) {
                let expected = if decl.kind == ValueKind::Attrs {
                    MergeStrategy::Union
                } else {
                    MergeStrategy::Override
                };
                assert_eq!(decl.merge, expected, "{}", decl.name);
            }
        }
    }

    #[test]
    fn accepts_well_typed_system_table() {
        let mut t = table(
            r#"
enable = true
package = "/nix/store/abc-nh_darwin"
flake = "/etc/nix-darwin"
os.flake = "/etc/nix-darwin"
[clean]
enable = true
user = "root"
extraArgs = "--keep 5"
interval = { Weekday = 0, Hour = 3 }
"#,
        );
        let report = check_table(Profile::System, &mut t, true, "test.toml").unwrap();
        assert!(report.ignored.is_empty());
    }

    #[test]
    fn strict_mode_rejects_unknown_option() {
        let mut t = table("[clean]\nenable = true\n");
        let err = check_table(Profile::Home, &mut t, true, "home.toml").unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownOption {
                option: "clean".to_string(),
                profile: "home".to_string(),
                origin: "home.toml".to_string(),
            }
        );
    }

    #[test]
    fn strict_mode_rejects_unknown_nested_option() {
        let mut t = table("[clean]\nenabled = true\n");
        let err = check_table(Profile::System, &mut t, true, "a.toml").unwrap_err();
        assert!(matches!(err, SchemaError::UnknownOption { ref option, .. } if option == "clean.enabled"));
    }

    #[test]
    fn lenient_mode_drops_unknown_options() {
        let mut t = table("enable = true\nalias = true\n[os]\nflake = \"/etc\"\nextra = 1\n");
        let report = check_table(Profile::System, &mut t, false, "a.toml").unwrap();
        assert_eq!(report.ignored, vec!["alias".to_string(), "os.extra".to_string()]);
        assert!(!t.contains_key("alias"));
        assert!(t["os"].as_table().unwrap().contains_key("flake"));
        assert!(!t["os"].as_table().unwrap().contains_key("extra"));
    }

    #[test]
    fn rejects_wrong_scalar_type() {
        let mut t = table("enable = \"yes\"\n");
        let err = check_table(Profile::System, &mut t, true, "a.toml").unwrap_err();
        assert_eq!(
            err.to_string(),
            "The option `enable` in a.toml is not of type `boolean`: got string"
        );
    }

    #[test]
    fn rejects_scalar_where_table_expected() {
        let mut t = table("clean = true\n");
        let err = check_table(Profile::System, &mut t, true, "a.toml").unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch { ref expected, .. } if expected == "attribute set"));
    }

    #[test]
    fn single_line_string_rejects_embedded_newline() {
        assert!(ValueKind::SingleLineStr.check(&"--keep 5".into()).is_ok());
        assert!(ValueKind::SingleLineStr.check(&"--keep 5\n".into()).is_ok());
        assert!(ValueKind::SingleLineStr.check(&"--keep\n5".into()).is_err());
        assert!(ValueKind::SingleLineStr.check(&"a\rb".into()).is_err());
    }

    #[test]
    fn package_accepts_string_or_table() {
        assert!(ValueKind::Package.check(&"/nix/store/x-nh".into()).is_ok());
        let t = table("path = \"/nix/store/x-nh\"\nmainProgram = \"nh\"\n");
        assert!(ValueKind::Package.check(&toml::Value::Table(t)).is_ok());
    }

    #[test]
    fn package_table_requires_path() {
        let t = table("mainProgram = \"nh\"\n");
        let err = ValueKind::Package.check(&toml::Value::Table(t)).unwrap_err();
        assert!(err.contains("requires `path`"));
    }

    #[test]
    fn package_table_rejects_unknown_key() {
        let t = table("path = \"/x\"\nversion = \"4\"\n");
        assert!(ValueKind::Package.check(&toml::Value::Table(t)).is_err());
    }

    #[test]
    fn attrs_reject_date_times() {
        let ok = table("Weekday = 0\nHour = 3\n");
        assert!(ValueKind::Attrs.check(&toml::Value::Table(ok)).is_ok());

        let mut t = table("[clean.interval]\nWeekday = 0\nAt = 03:00:00\n");
        let err = check_table(Profile::System, &mut t, true, "a.toml").unwrap_err();
        assert_eq!(
            err.to_string(),
            "The option `clean.interval` in a.toml is not of type `attribute set`: \
             `At` must not be a date-time"
        );

        let nested = table("Days = [1, 1979-05-27]\n");
        assert!(ValueKind::Attrs.check(&toml::Value::Table(nested)).is_err());
    }

    #[test]
    fn paths_accept_any_string() {
        assert!(ValueKind::NullOrPath.check(&"flake.nix".into()).is_ok());
        assert!(ValueKind::NullOrPath.check(&"".into()).is_ok());
        assert!(ValueKind::NullOrPath.check(&toml::Value::Integer(1)).is_err());
    }
}
