//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};

/// Export and import the VBA modules of package documents
#[derive(Parser, Debug)]
#[command(name = "vba")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Import VBA code from a folder into one or more documents
    ///
    /// Every document is opened read-write and saved after the import.
    ///
    /// Examples:
    ///   vba import Drawing1.vsd.toml               # From the current directory
    ///   vba import -i src -c a.vsd.toml b.vsd.toml  # Replace all code from src/
    Import {
        /// Documents to process; the code is added to each of them
        #[arg(required = true)]
        files: Vec<String>,

        /// Directory holding the modules to import (current directory by default)
        #[arg(short = 'i', long)]
        input_directory: Option<String>,

        /// Also import code into docked stencils
        #[arg(short = 's', long)]
        include_stencils: bool,

        /// Remove all existing code before importing
        #[arg(short = 'c', long = "clear")]
        clear_before_import: bool,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the VBA code of a document to a folder
    ///
    /// Examples:
    ///   vba export Drawing1.vsd.toml               # To the current directory
    ///   vba export Drawing1.vsd.toml -o out/vba    # To another directory
    Export {
        /// Document to export from
        file: String,

        /// Directory to write the modules to, created if missing (current directory by default)
        #[arg(short = 'o', long)]
        output_directory: Option<String>,

        /// Include docked stencils in the export
        #[arg(short = 's', long)]
        include_stencils: bool,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_import_with_all_flags() {
        let cli = Cli::parse_from(["vba", "import", "-i", "src", "-s", "-c", "a.toml", "b.toml"]);
        assert_eq!(
            cli.command,
            Commands::Import {
                files: vec!["a.toml".into(), "b.toml".into()],
                input_directory: Some("src".into()),
                include_stencils: true,
                clear_before_import: true,
                json: false,
            }
        );
    }

    #[test]
    fn parse_export_defaults() {
        let cli = Cli::parse_from(["vba", "export", "Drawing1.vsd.toml"]);
        assert!(!cli.verbose);
        assert_eq!(
            cli.command,
            Commands::Export {
                file: "Drawing1.vsd.toml".into(),
                output_directory: None,
                include_stencils: false,
                json: false,
            }
        );
    }

    #[test]
    fn parse_verbose_after_subcommand() {
        let cli = Cli::parse_from(["vba", "export", "d.toml", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn import_requires_a_file() {
        assert!(Cli::try_parse_from(["vba", "import"]).is_err());
    }

    #[test]
    fn export_takes_one_file() {
        assert!(Cli::try_parse_from(["vba", "export", "a.toml", "b.toml"]).is_err());
    }
}
