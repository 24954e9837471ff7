//! `nh-module` command-line entry point.
use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory as _, Parser as _};

use nh_module::{cli, commands, logging};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose);
    let log = logging::Logger::new();

    match run(&args, &log) {
        Ok(()) => {
            let warnings = log.warning_count();
            if warnings > 0 {
                log.info(&format!("completed with {warnings} warning(s)"));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(args: &cli::Cli, log: &logging::Logger) -> Result<()> {
    match &args.command {
        cli::Command::Eval => commands::eval::run(&args.global, log),
        cli::Command::Env => commands::env::run(&args.global, log),
        cli::Command::Options(opts) => commands::options::run(&args.global, opts),
        cli::Command::Completions(opts) => {
            let mut cmd = cli::Cli::command();
            clap_complete::generate(opts.shell, &mut cmd, "nh-module", &mut std::io::stdout());
            Ok(())
        }
        cli::Command::Version => {
            let version = option_env!("NH_MODULE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
            commands::emit(&format!("nh-module {version}"))
        }
    }
}
