//! marknode CLI - Markdown to node tree renderer.
//!
//! Provides commands for:
//! - `render`: Render a text file (or stdin) and print the tree, JSON or HTML
//! - `options`: Print the effective rendering options

mod commands;
mod error;
mod output;
mod tree;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{OptionsArgs, RenderArgs};
use output::Output;

/// marknode - Markdown to node tree renderer.
#[derive(Parser)]
#[command(name = "marknode", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a text into a node tree.
    Render(RenderArgs),
    /// Print the effective rendering options as JSON.
    Options(OptionsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Render(args) if args.verbose);

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Options(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
