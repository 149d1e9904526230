//! Command implementations for vba-cli

pub mod export;
pub mod import;

pub use export::run_export;
pub use import::run_import;

use std::path::Path;

use colored::Colorize;
use vba_core::SyncReport;
use vba_fs::NormalizedPath;

/// Resolve a user-supplied path against the working directory.
///
/// No path means the working directory itself; relative paths are joined
/// to it and absolute paths are used as given.
pub fn resolve_path(cwd: &Path, path: Option<&str>) -> NormalizedPath {
    match path {
        None => NormalizedPath::new(cwd),
        Some(path) if path.trim().is_empty() => NormalizedPath::new(cwd),
        Some(path) if Path::new(path).is_absolute() => NormalizedPath::new(path),
        Some(path) => NormalizedPath::new(cwd.join(path)),
    }
}

/// Print one line per document of `report`.
fn print_report(report: &SyncReport) {
    for document in &report.documents {
        if document.skipped {
            println!(
                "   {} {} {}",
                "-".dimmed(),
                document.document.cyan(),
                "(no code project)".dimmed()
            );
            continue;
        }

        let mut parts = Vec::new();
        if !document.written.is_empty() {
            parts.push(format!("{} written", document.written.len()));
        }
        if !document.removed.is_empty() {
            parts.push(format!("{} removed", document.removed.len()));
        }
        if !document.imported.is_empty() {
            parts.push(format!("{} imported", document.imported.len()));
        }
        if document.this_document_replaced {
            parts.push("ThisDocument replaced".to_string());
        }
        if !document.ignored.is_empty() {
            parts.push(format!("{} ignored", document.ignored.len()));
        }
        if parts.is_empty() {
            parts.push("nothing to do".to_string());
        }

        println!(
            "   {} {} [{}]: {}",
            "+".green(),
            document.document.cyan(),
            document.folder.dimmed(),
            parts.join(", ")
        );
    }
}
