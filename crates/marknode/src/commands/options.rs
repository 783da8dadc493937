//! `marknode options` command implementation.

use std::path::PathBuf;

use clap::Args;
use marknode_config::{Config, Format};
use serde_json::json;

use super::load_config;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the options command.
#[derive(Args)]
pub(crate) struct OptionsArgs {
    /// Path to configuration file (default: auto-discover marknode.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input format (overrides config).
    #[arg(short, long)]
    format: Option<Format>,

    /// Set a rendering option, e.g. `--set breaks=true` (repeatable).
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,
}

impl OptionsArgs {
    /// Execute the options command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = load_config(self.config.as_deref(), self.format, &self.set)?;
        Output::new().result(&effective_options(&config)?)?;
        Ok(())
    }
}

/// Effective format and merged options as pretty JSON.
fn effective_options(config: &Config) -> Result<String, CliError> {
    let value = json!({
        "format": config.format,
        "options": config.render_options(),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}
