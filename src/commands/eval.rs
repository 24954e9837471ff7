//! `eval`: print every rendered artifact as JSON.
use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::logging::Logger;

/// Run the eval command.
///
/// # Errors
///
/// Returns an error if evaluation fails or the output cannot be written.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let evaluation = super::run_evaluation(global, log)?;
    let json = serde_json::to_string_pretty(&evaluation).context("serialising evaluation")?;
    super::emit(&json)
}
