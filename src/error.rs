//! Domain-specific error types for the nh integration module.
//!
//! Internal modules return typed errors (e.g., [`SchemaError`], [`EvalError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! NhModuleError
//! ├── Config(ConfigError)     — reading and parsing TOML fragments
//! ├── Schema(SchemaError)     — undeclared options, type mismatches
//! └── Eval(EvalError)         — failed assertions
//! ```
//!
//! [`PlatformError`] stands alone: it is raised while clap parses
//! `--platform`, before any evaluation starts.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for a configuration evaluation.
#[derive(Error, Debug)]
pub enum NhModuleError {
    /// A configuration fragment could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A fragment does not match the option schema.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The resolved settings failed validation.
    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),
}

/// Errors that arise while loading configuration fragments.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading a fragment.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The fragment is not valid TOML.
    #[error("Invalid TOML in {path}: {source}")]
    InvalidToml {
        /// Path to the offending file.
        path: PathBuf,
        /// Underlying parse error.
        source: toml::de::Error,
    },

    /// A top-level table has the wrong shape.
    #[error("Invalid section [{section}] in {origin}: {message}")]
    InvalidSection {
        /// Section name (`nh` or `host`).
        section: String,
        /// Where the fragment came from.
        origin: String,
        /// Human-readable description of the problem.
        message: String,
    },
}

/// Errors that arise when a fragment does not match the option schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The option is not declared for the active profile.
    #[error("The option `{option}` does not exist in the {profile} profile (defined in {origin})")]
    UnknownOption {
        /// Dotted option path.
        option: String,
        /// Active profile name.
        profile: String,
        /// Where the definition came from.
        origin: String,
    },

    /// The value does not have the declared type.
    #[error("The option `{option}` in {origin} is not of type `{expected}`: {message}")]
    TypeMismatch {
        /// Dotted option path.
        option: String,
        /// Human-readable type name from the declaration.
        expected: String,
        /// Where the definition came from.
        origin: String,
        /// What was wrong with the value.
        message: String,
    },
}

/// Errors that abort an evaluation after settings have been resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// One or more fatal assertions failed; nothing was rendered.
    #[error("Failed assertions:\n{}", format_assertions(.0))]
    AssertionsFailed(Vec<String>),
}

/// Errors that arise from platform identifiers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The identifier is not of the form `<arch>-<os>`.
    #[error("Invalid system identifier '{0}': expected <arch>-<os>, e.g. x86_64-linux")]
    InvalidSystem(String),
}

fn format_assertions(messages: &[String]) -> String {
    messages
        .iter()
        .map(|m| format!("- {m}"))
        .collect::<Vec<_>>()
        .join("\n")
}
