//! Export command implementation

use std::path::Path;

use colored::Colorize;
use tracing::debug;
use vba_core::{CommandOutcome, DocumentHandle, Exporter, SyncSettings};
use vba_package::{OpenMode, PackageHost};

use super::{print_report, resolve_path};
use crate::error::Result;

/// Run the export command
///
/// Opens `file` read-only and writes its modules to the output directory.
/// The document is never saved.
pub fn run_export(
    cwd: &Path,
    file: &str,
    output_directory: Option<&str>,
    include_stencils: bool,
    json: bool,
) -> Result<()> {
    let target = resolve_path(cwd, output_directory);
    let settings = SyncSettings {
        include_stencils,
        ..SyncSettings::default()
    };

    let host = PackageHost::new();
    let document = host.open(&resolve_path(cwd, Some(file)), OpenMode::READ_ONLY)?;
    let name = document.display_name();
    debug!(document = %name, target = %target, include_stencils, "export requested");

    if !json {
        println!(
            "{} Exporting {} to {}",
            "=>".blue().bold(),
            name.cyan(),
            target
        );
    }

    let report = Exporter::new().run(document, &target, &settings);
    host.close_all();
    let report = report?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    let outcome = CommandOutcome::Exported {
        document: name,
        folder: target.to_string(),
        report,
    };
    println!("{} {}", "OK".green().bold(), outcome);
    Ok(())
}
