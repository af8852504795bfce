//! Command-line front end for the opparen parenthesizer.

pub mod cli;
pub mod config;

pub use cli::{normalize_cli_args, run, Cli, Command};
pub use config::{Config, ConfigError, Limits};
