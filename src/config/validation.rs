//! Cross-option assertions and advisory warnings.
//!
//! Assertions are fatal: a report with any assertion aborts the evaluation
//! before anything is rendered. Warnings are surfaced but never block.
use serde::Serialize;

use super::host::HostSettings;
use super::settings::{Settings, SystemSettings};
use crate::error::EvalError;

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Option the finding is about.
    pub option: String,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Create a finding.
    #[must_use]
    pub fn new(option: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            option: option.into(),
            message: message.into(),
        }
    }
}

/// Findings of every validator, split by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Fatal findings.
    pub assertions: Vec<Diagnostic>,
    /// Advisory findings.
    pub warnings: Vec<Diagnostic>,
}

impl ValidationReport {
    /// Record a fatal finding.
    pub fn assert(&mut self, option: impl Into<String>, message: impl Into<String>) {
        self.assertions.push(Diagnostic::new(option, message));
    }

    /// Record an advisory finding.
    pub fn warn(&mut self, option: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(Diagnostic::new(option, message));
    }

    /// Whether no assertion failed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.assertions.is_empty()
    }

    /// Fail closed on any assertion, otherwise hand back the warnings.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::AssertionsFailed`] with every assertion message.
    pub fn into_result(self) -> Result<Vec<Diagnostic>, EvalError> {
        if self.passed() {
            Ok(self.warnings)
        } else {
            Err(EvalError::AssertionsFailed(
                self.assertions.into_iter().map(|d| d.message).collect(),
            ))
        }
    }
}

/// Trait for settings validators.
pub trait ConfigValidator {
    /// Check the settings and record findings in `report`.
    fn validate(&self, host: &HostSettings, report: &mut ValidationReport);

    /// Return a human-readable name for this validator.
    fn name(&self) -> &'static str;
}

/// Rejects flake paths that point at a single `.nix` file.
#[derive(Debug)]
pub struct FlakePathValidator<'a> {
    settings: &'a Settings,
}

impl<'a> FlakePathValidator<'a> {
    /// Validate the flake paths of `settings`.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }
}

impl ConfigValidator for FlakePathValidator<'_> {
    fn validate(&self, _host: &HostSettings, report: &mut ValidationReport) {
        for (option, path) in self.settings.flake_paths() {
            if path.is_some_and(|p| p.is_nix_file()) {
                report.assert(
                    option,
                    format!("{option} must be a directory, not a nix file"),
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "flake-paths"
    }
}

/// Checks the periodic cleanup block of the system profile.
#[derive(Debug)]
pub struct CleanValidator<'a> {
    settings: &'a SystemSettings,
}

impl<'a> CleanValidator<'a> {
    /// Validate the cleanup settings of `settings`.
    #[must_use]
    pub const fn new(settings: &'a SystemSettings) -> Self {
        Self { settings }
    }
}

impl ConfigValidator for CleanValidator<'_> {
    fn validate(&self, host: &HostSettings, report: &mut ValidationReport) {
        if !self.settings.clean.enable {
            return;
        }

        if !self.settings.enable {
            report.assert("clean.enable", "clean.enable requires enable");
        }

        if host.gc_automatic {
            report.warn(
                "clean.enable",
                "clean.enable and the host's automatic garbage collection are both enabled. \
                 Please disable one of them to avoid running the cleanup twice",
            );
        }
    }

    fn name(&self) -> &'static str {
        "clean"
    }
}

/// Run every validator that applies to the profile of `settings`.
#[must_use]
pub fn validate_all(settings: &Settings, host: &HostSettings) -> ValidationReport {
    let mut validators: Vec<Box<dyn ConfigValidator + '_>> =
        vec![Box::new(FlakePathValidator::new(settings))];
    if let Settings::System(system) = settings {
        validators.push(Box::new(CleanValidator::new(system)));
    }

    let mut report = ValidationReport::default();
    for validator in &validators {
        tracing::debug!("running validator {}", validator.name());
        validator.validate(host, &mut report);
    }
    report
}
