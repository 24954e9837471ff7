//! Configuration fragments: loading, schema checking and merging.
//!
//! A fragment file has two top-level tables:
//!
//! ```toml
//! [nh]            # options of the nh module, checked against the schema
//! enable = true
//! os.flake = "/etc/nix-darwin"
//!
//! [host]          # settings of other host modules read by cross-module rules
//! gc_automatic = false
//! use_daemon = true
//! ```
pub mod fragment;
pub mod host;
pub mod profiles;
pub mod schema;
pub mod settings;
pub mod toml_loader;
pub mod validation;

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, NhModuleError};
use fragment::{HostFragment, SettingsFragment};
use profiles::Profile;

/// Section holding module options.
pub const MODULE_SECTION: &str = "nh";

/// Section holding host settings.
pub const HOST_SECTION: &str = "host";

/// A raw, not yet checked configuration fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    /// Where the fragment came from (file path or a label).
    pub origin: String,
    /// Parsed TOML document.
    pub table: toml::Table,
}

impl Source {
    /// Parse a fragment from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidToml`] if `content` is not valid TOML.
    pub fn parse(origin: impl Into<String>, content: &str) -> Result<Self, ConfigError> {
        let origin = origin.into();
        let table =
            toml_loader::parse_table(content).map_err(|source| ConfigError::InvalidToml {
                path: PathBuf::from(&origin),
                source,
            })?;
        Ok(Self { origin, table })
    }

    /// Read a fragment from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self {
            origin: path.display().to_string(),
            table: toml_loader::load_table(path)?,
        })
    }
}

/// Read every fragment file in order.
///
/// # Errors
///
/// Returns the first read or parse error.
pub fn load_sources(paths: &[PathBuf]) -> Result<Vec<Source>, ConfigError> {
    paths.iter().map(|p| Source::load(p)).collect()
}

/// A schema-checked fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Where the fragment came from.
    pub origin: String,
    /// Module options it defines.
    pub settings: SettingsFragment,
    /// Host settings it defines.
    pub host: HostFragment,
    /// Undeclared options dropped in lenient mode.
    pub ignored: Vec<String>,
}

/// Check `source` against the schema of `profile` and deserialise it.
///
/// # Errors
///
/// In `strict` mode an undeclared option or section is an error; in either
/// mode a value of the wrong type is.
pub fn check_source(
    profile: Profile,
    source: &Source,
    strict: bool,
) -> Result<Fragment, NhModuleError> {
    let origin = source.origin.as_str();
    let mut table = source.table.clone();
    let mut nh = toml_loader::take_section(&mut table, MODULE_SECTION, origin)?;
    let host = toml_loader::take_section(&mut table, HOST_SECTION, origin)?;

    let mut ignored = Vec::new();
    for key in table.keys() {
        if strict {
            return Err(ConfigError::InvalidSection {
                section: key.clone(),
                origin: origin.to_string(),
                message: format!("unknown section, expected [{MODULE_SECTION}] or [{HOST_SECTION}]"),
            }
            .into());
        }
        ignored.push(key.clone());
    }

    let report = schema::check_table(profile, &mut nh, strict, origin)?;
    ignored.extend(
        report
            .ignored
            .into_iter()
            .map(|o| format!("{MODULE_SECTION}.{o}")),
    );

    let settings: SettingsFragment =
        toml::Value::Table(nh)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::InvalidSection {
                section: MODULE_SECTION.to_string(),
                origin: origin.to_string(),
                message: e.to_string(),
            })?;
    let host: HostFragment =
        toml::Value::Table(host)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::InvalidSection {
                section: HOST_SECTION.to_string(),
                origin: origin.to_string(),
                message: e.to_string(),
            })?;

    Ok(Fragment {
        origin: origin.to_string(),
        settings,
        host,
        ignored,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn source(content: &str) -> Source {
        Source::parse("test.toml", content).unwrap()
    }

    #[test]
    fn check_source_splits_sections() {
        let f = check_source(
            Profile::System,
            &source("[nh]\nenable = true\n[host]\nuse_daemon = true\n"),
            true,
        )
        .unwrap();
        assert_eq!(f.settings.enable, Some(true));
        assert_eq!(f.host.use_daemon, Some(true));
        assert!(f.ignored.is_empty());
    }

    #[test]
    fn check_source_empty_document() {
        let f = check_source(Profile::Home, &source(""), true).unwrap();
        assert_eq!(f.settings, SettingsFragment::default());
        assert_eq!(f.host, HostFragment::default());
    }

    #[test]
    fn strict_rejects_unknown_section() {
        let err = check_source(Profile::System, &source("[programs]\nx = 1\n"), true).unwrap_err();
        assert!(err.to_string().contains("Invalid section [programs]"));
    }

    #[test]
    fn lenient_reports_unknown_section_and_options() {
        let f = check_source(
            Profile::Home,
            &source("[programs]\nx = 1\n[nh]\nenable = true\n[nh.clean]\nenable = true\n"),
            false,
        )
        .unwrap();
        assert_eq!(f.ignored, vec!["programs".to_string(), "nh.clean".to_string()]);
        assert_eq!(f.settings.enable, Some(true));
        assert_eq!(f.settings.clean.enable, None);
    }

    #[test]
    fn unknown_host_setting_is_an_error() {
        let err = check_source(Profile::System, &source("[host]\ngc = true\n"), false).unwrap_err();
        assert!(err.to_string().contains("Invalid section [host]"));
    }

    #[test]
    fn type_errors_fail_even_when_lenient() {
        let err =
            check_source(Profile::System, &source("[nh.os]\nflake = 42\n"), false).unwrap_err();
        assert!(matches!(
            err,
            NhModuleError::Schema(crate::error::SchemaError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn load_sources_reads_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.toml");
        let b = dir.path().join("b.toml");
        std::fs::write(&a, "[nh]\nenable = true\n").unwrap();
        std::fs::write(&b, "[nh]\nenable = false\n").unwrap();
        let sources = load_sources(&[a.clone(), b]).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].origin, a.display().to_string());
    }

    #[test]
    fn parse_error_names_origin() {
        let err = Source::parse("inline", "[nh").unwrap_err();
        assert!(err.to_string().contains("inline"));
    }
}
