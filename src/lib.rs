//! Typed integration modules for the `nh` Nix helper.
//!
//! Partial TOML configuration fragments are turned into the artifacts a host
//! configuration system consumes: packages to install, environment variables
//! to export, and an optional periodic cleanup job.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]** — option schema, fragment loading and merging, resolved
//!   settings, and validation
//! - **[`render`]** — pure mapping from settings to artifacts
//! - **[`evaluate`]** — the whole pipeline for one evaluation
//! - **[`commands`]** — top-level subcommand orchestration (`eval`, `env`, `options`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod logging;
pub mod platform;
pub mod render;
