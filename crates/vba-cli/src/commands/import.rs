//! Import command implementation

use std::path::Path;

use colored::Colorize;
use tracing::debug;
use vba_core::{CommandOutcome, DocumentHandle, Importer, SyncReport, SyncSettings};
use vba_package::{OpenMode, PackageHost};

use super::{print_report, resolve_path};
use crate::error::Result;

/// Run the import command
///
/// Each document is opened read-write, receives the modules of the input
/// directory and is saved together with any stencil the import reopened.
/// Processing stops at the first failing document; documents already
/// imported stay saved.
pub fn run_import(
    cwd: &Path,
    files: &[String],
    input_directory: Option<&str>,
    include_stencils: bool,
    clear_before_import: bool,
    json: bool,
) -> Result<()> {
    let source = resolve_path(cwd, input_directory);
    let settings = SyncSettings {
        include_stencils,
        clear_before_import,
        ..SyncSettings::default()
    };
    debug!(source = %source, include_stencils, clear_before_import, "import requested");

    let host = PackageHost::new();
    let importer = Importer::new();
    let mut combined = SyncReport::new();

    for file in files {
        let document = host.open(&resolve_path(cwd, Some(file)), OpenMode::READ_WRITE)?;
        let name = document.display_name();
        if !json {
            println!(
                "{} Importing {} into {}",
                "=>".blue().bold(),
                source,
                name.cyan()
            );
        }

        let report = match importer.run(document, &source, &settings) {
            Ok(report) => report,
            Err(e) => {
                host.close_all();
                return Err(e.into());
            }
        };
        for saved in host.save_all()? {
            debug!(document = %saved, "saved");
        }

        if json {
            combined.documents.extend(report.documents);
            continue;
        }
        print_report(&report);
        let outcome = CommandOutcome::Imported {
            document: name,
            folder: source.to_string(),
            report,
        };
        println!("{} {}", "OK".green().bold(), outcome);
    }

    host.close_all();
    if json {
        println!("{}", serde_json::to_string_pretty(&combined)?);
    }
    Ok(())
}
