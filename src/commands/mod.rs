//! Top-level subcommand orchestration.
pub mod env;
pub mod eval;
pub mod options;

use std::io::Write as _;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config;
use crate::evaluate::{self, EvalInput, Evaluation};
use crate::logging::Logger;
use crate::platform::Platform;

/// Resolve the platform, load every fragment and build the evaluation input.
///
/// # Errors
///
/// Returns an error if a fragment cannot be read or parsed.
pub fn build_input(global: &GlobalOpts, log: &Logger) -> Result<EvalInput> {
    let platform = global.platform.clone().unwrap_or_else(Platform::detect);

    log.stage("Loading configuration");
    log.info(&format!("profile: {}", global.profile));
    log.info(&format!("platform: {platform}"));
    let sources = config::load_sources(&global.configs).context("loading configuration fragments")?;
    for source in &sources {
        log.debug(&format!("fragment: {}", source.origin));
    }
    if sources.is_empty() {
        log.warn("no configuration fragments given, evaluating defaults");
    }

    Ok(EvalInput {
        profile: global.profile,
        platform,
        strict: global.strict,
        sources,
    })
}

/// Build the input, evaluate it and report warnings and ignored options.
///
/// # Errors
///
/// Returns an error if loading fails, the schema check fails, or any
/// assertion fails.
pub fn run_evaluation(global: &GlobalOpts, log: &Logger) -> Result<Evaluation> {
    let input = build_input(global, log)?;

    log.stage("Evaluating");
    let evaluation = evaluate::evaluate(&input)?;

    if !evaluation.settings.enabled() {
        log.info("nh is disabled; nothing will be installed or exported");
    }
    for option in &evaluation.ignored {
        log.warn(&format!("ignoring undeclared option {option}"));
    }
    for warning in &evaluation.warnings {
        log.warn(&format!("{}: {}", warning.option, warning.message));
    }
    log.info(&format!(
        "{} package(s), {} environment variable(s), {} service(s)",
        evaluation.rendered.packages.len(),
        evaluation.rendered.environment.len(),
        usize::from(evaluation.rendered.service.is_some()),
    ));

    Ok(evaluation)
}

/// Write `text` to stdout.
///
/// # Errors
///
/// Returns an error if stdout is closed.
pub fn emit(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes()).context("writing to stdout")?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n").context("writing to stdout")?;
    }
    stdout.flush().context("flushing stdout")
}
