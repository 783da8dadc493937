//! CLI command implementations.

pub(crate) mod options;
pub(crate) mod render;

pub(crate) use options::OptionsArgs;
pub(crate) use render::RenderArgs;

use std::path::Path;

use marknode_config::{CliSettings, Config, Format, OptionOverrides};

use crate::error::CliError;

/// Load configuration with `--format` and `--set` layered on top.
pub(crate) fn load_config(
    config_path: Option<&Path>,
    format: Option<Format>,
    assignments: &[String],
) -> Result<Config, CliError> {
    let settings = cli_settings(format, assignments)?;
    let config = Config::load(config_path, Some(&settings))?;
    tracing::debug!(
        config_path = ?config.config_path,
        format = config.format.name(),
        "Loaded configuration"
    );
    Ok(config)
}

/// Build CLI settings from `--format` and `--set key=value` arguments.
pub(crate) fn cli_settings(
    format: Option<Format>,
    assignments: &[String],
) -> Result<CliSettings, CliError> {
    let mut options = OptionOverrides::default();
    for assignment in assignments {
        options.set_assignment(assignment)?;
    }
    Ok(CliSettings { format, options })
}
