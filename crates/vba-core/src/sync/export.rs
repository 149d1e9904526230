//! Document -> files

use tracing::{debug, info};
use vba_fs::{NormalizedPath, io};

use crate::Result;
use crate::handle::{
    CodeComponentHandle, CodeProjectHandle, DocumentHandle, LineRange, THIS_DOCUMENT,
    THIS_DOCUMENT_FILE,
};
use crate::settings::SyncSettings;
use crate::walker::TreeWalker;

use super::report::{DocumentReport, SyncReport};

/// Writes the modules of a document (and its docked stencils) to a folder.
///
/// Export only reads from the host. Existing files in the target folder are
/// overwritten when a module of the same name is written, and otherwise left
/// alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct Exporter;

impl Exporter {
    pub fn new() -> Self {
        Self
    }

    /// Export `root` into `target`.
    ///
    /// Stencils docked to a drawing or template go to
    /// `target/<stencil display name>/` when `include_stencils` is set.
    /// Documents of a non-syncable kind produce an empty report.
    pub fn run<D: DocumentHandle>(
        &self,
        root: D,
        target: &NormalizedPath,
        settings: &SyncSettings,
    ) -> Result<SyncReport> {
        let mut report = SyncReport::new();

        if !root.kind().is_syncable() {
            debug!(document = %root.display_name(), kind = %root.kind(), "document kind has no code to export");
            return Ok(report);
        }

        for entry in TreeWalker::walk(root, settings.include_stencils) {
            let entry = entry?;
            let dir = target.join(&entry.subpath);
            report.documents.push(self.export_document(&entry.document, &dir)?);
        }

        Ok(report)
    }

    /// Export a single document's modules into `dir`, without recursion.
    pub fn export_document<D: DocumentHandle>(
        &self,
        document: &D,
        dir: &NormalizedPath,
    ) -> Result<DocumentReport> {
        let name = document.display_name();
        let mut report = DocumentReport::new(&name, dir.as_str());

        let Some(project) = document.code_project()? else {
            debug!(document = %name, "no code project, skipping");
            return Ok(report.skipped());
        };

        info!(document = %name, folder = %dir, "exporting modules");
        io::ensure_dir(dir)?;

        if let Some(file) = export_this_document(&project, dir)? {
            report.written.push(file);
        }

        for component in project.components()? {
            let component_name = component.name();
            if component_name == THIS_DOCUMENT {
                continue;
            }
            let Some(extension) = component.kind().extension() else {
                debug!(component = %component_name, kind = %component.kind(), "unclassified component, skipping");
                continue;
            };

            let file_name = format!("{component_name}{extension}");
            let path = dir.join(&file_name);
            debug!(component = %component_name, path = %path, "exporting component");
            component.export_to_file(path.as_ref())?;
            report.written.push(file_name);
        }

        Ok(report)
    }
}

/// Write the `ThisDocument` text verbatim, unless it is absent or empty.
fn export_this_document<P: CodeProjectHandle>(
    project: &P,
    dir: &NormalizedPath,
) -> Result<Option<String>> {
    let Some(component) = project.component(THIS_DOCUMENT)? else {
        return Ok(None);
    };

    let line_count = component.line_count()?;
    if line_count == 0 {
        return Ok(None);
    }

    let text = component.lines(LineRange::all(line_count))?;
    io::write_text(&dir.join(THIS_DOCUMENT_FILE), &text)?;
    Ok(Some(THIS_DOCUMENT_FILE.to_string()))
}
