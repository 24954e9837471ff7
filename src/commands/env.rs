//! `env`: print shell exports for the rendered environment.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::logging::Logger;
use crate::render::environment;

/// Run the env command.
///
/// Prints nothing (but still succeeds) when no variable is set.
///
/// # Errors
///
/// Returns an error if evaluation fails or the output cannot be written.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let evaluation = super::run_evaluation(global, log)?;
    let exports = environment::shell_exports(&evaluation.rendered.environment);
    if exports.is_empty() {
        log.debug("no environment variables to export");
        return Ok(());
    }
    super::emit(&exports)
}
