//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::profiles::Profile;
use crate::platform::Platform;

/// Top-level CLI entry point for the nh integration module.
#[derive(Parser, Debug)]
#[command(
    name = "nh-module",
    about = "Validate and render nh integration-module settings",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Target profile: system (alias darwin, os) or home (alias home-manager)
    #[arg(short, long, global = true, default_value_t = Profile::System)]
    pub profile: Profile,

    /// Nix system identifier used for package defaults (e.g. aarch64-darwin); detected when omitted
    #[arg(long, global = true, value_name = "SYSTEM")]
    pub platform: Option<Platform>,

    /// Configuration fragment; repeat to merge several, later files win
    #[arg(short, long = "config", global = true, value_name = "FILE")]
    pub configs: Vec<PathBuf>,

    /// Ignore undeclared options instead of failing (strict is the default)
    #[arg(long = "no-strict", global = true, action = clap::ArgAction::SetFalse)]
    pub strict: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate the configuration and print every rendered artifact as JSON
    Eval,
    /// Evaluate the configuration and print shell exports for its environment
    Env,
    /// Print the option schema of the selected profile
    Options(OptionsOpts),
    /// Generate shell completion files into stdout
    Completions(CompletionOpts),
    /// Print version information
    Version,
}

/// Options for the `options` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct OptionsOpts {
    /// Print machine-readable JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Options for the `completions` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionOpts {
    /// Name of the shell
    #[arg(long, short)]
    pub shell: clap_complete::Shell,
}
