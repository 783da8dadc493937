//! `marknode render` command implementation.

use std::io;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use marknode_config::{Config, Format};
use marknode_renderer::{Renderer, escape_html, render_html};

use super::load_config;
use crate::error::CliError;
use crate::output::Output;
use crate::tree::format_tree;

/// Output representation of a rendered text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Emit {
    /// Indented node tree.
    #[default]
    Tree,
    /// Node tree as JSON.
    Json,
    /// HTML markup.
    Html,
}

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Input file (default: read stdin).
    file: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover marknode.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input format: `plain`, anything else means markdown (overrides config).
    #[arg(short, long)]
    format: Option<Format>,

    /// Set a rendering option, e.g. `--set sanitize=true` (repeatable).
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Output representation.
    #[arg(short, long, value_enum, default_value_t)]
    emit: Emit,

    /// Enable verbose output (show rendering diagnostics).
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, input reading or rendering fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = load_config(self.config.as_deref(), self.format, &self.set)?;
        let text = read_input(self.file.as_deref())?;

        if text.is_empty() {
            output.warning("Input is empty, nothing to render");
            return Ok(());
        }

        let rendered = render_text(&text, &config, self.emit)?;
        output.result(rendered.trim_end())?;
        Ok(())
    }
}

/// Render `text` as `emit` with the loaded configuration.
fn render_text(text: &str, config: &Config, emit: Emit) -> Result<String, CliError> {
    let options = config.render_options();

    if emit == Emit::Html {
        return Ok(match config.format {
            Format::Markdown => render_html(text, &options)?,
            Format::Plain => plain_html(text),
        });
    }

    let renderer = Renderer::new()
        .with_format(config.format)
        .with_render_options(options);
    let tree = renderer.render(text)?;

    Ok(match (emit, tree) {
        (Emit::Json, tree) => serde_json::to_string_pretty(&tree)?,
        (_, Some(tree)) => format_tree(&tree),
        (_, None) => String::new(),
    })
}

/// One escaped line plus `<br>` per line, matching the plain node tree.
fn plain_html(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    text.replace("\r\n", "\n")
        .split('\n')
        .map(|line| format!("{}<br>", escape_html(line)))
        .collect()
}

/// Read the input file, or stdin when no file is given.
fn read_input(file: Option<&Path>) -> Result<String, CliError> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => io::read_to_string(io::stdin())?,
    };
    Ok(text)
}
