//! VBA module synchronization CLI
//!
//! Exports the code modules of package documents to a folder and imports
//! them back.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: logging disabled: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");

    execute_command(cli.command)
}

fn execute_command(cmd: Commands) -> Result<()> {
    let cwd = std::env::current_dir()?;
    match cmd {
        Commands::Import {
            files,
            input_directory,
            include_stencils,
            clear_before_import,
            json,
        } => commands::run_import(
            &cwd,
            &files,
            input_directory.as_deref(),
            include_stencils,
            clear_before_import,
            json,
        ),
        Commands::Export {
            file,
            output_directory,
            include_stencils,
            json,
        } => commands::run_export(
            &cwd,
            &file,
            output_directory.as_deref(),
            include_stencils,
            json,
        ),
    }
}
