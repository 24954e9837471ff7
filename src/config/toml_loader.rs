//! TOML fragment file parsing.
use std::path::Path;

use crate::error::ConfigError;

/// Read a fragment file into a raw TOML table.
///
/// An empty file yields an empty table.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::InvalidToml`] if it is not valid TOML.
pub fn load_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_table(&content).map_err(|source| ConfigError::InvalidToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse TOML source into a raw table.
///
/// # Errors
///
/// Returns the parser error if `content` is not valid TOML.
pub fn parse_table(content: &str) -> Result<toml::Table, toml::de::Error> {
    toml::from_str(content)
}

/// Remove a top-level section from `table`, returning it as a table.
///
/// A missing section yields an empty table.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSection`] if the key holds a non-table value.
pub fn take_section(
    table: &mut toml::Table,
    section: &str,
    origin: &str,
) -> Result<toml::Table, ConfigError> {
    match table.remove(section) {
        None => Ok(toml::Table::new()),
        Some(toml::Value::Table(inner)) => Ok(inner),
        Some(other) => Err(ConfigError::InvalidSection {
            section: section.to_string(),
            origin: origin.to_string(),
            message: format!("expected a table, got {}", other.type_str()),
        }),
    }
}
