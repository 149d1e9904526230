//! Files -> document

use std::collections::HashSet;

use tracing::{debug, info, warn};
use vba_fs::{NormalizedPath, io};

use crate::Result;
use crate::classify::ComponentKind;
use crate::handle::{
    CodeComponentHandle, CodeProjectHandle, DocumentHandle, LineRange, THIS_DOCUMENT,
    THIS_DOCUMENT_FILE,
};
use crate::settings::SyncSettings;
use crate::walker::TreeWalker;

use super::report::{DocumentReport, SyncReport};
use super::same_name;

/// Reconciles the modules of a document (and its docked stencils) with a
/// folder of module files.
///
/// Per document:
/// 1. Read-only documents are reopened read-write.
/// 2. Classifiable components are removed when `clear_before_import` is set
///    or when a file in the folder has the same stem (any extension).
/// 3. `ThisDocument.bas` replaces the `ThisDocument` text; `.bas`, `.cls` and
///    `.frm` files are imported; anything else is ignored.
///
/// There is no rollback: changes made before a failure stay in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct Importer;

impl Importer {
    pub fn new() -> Self {
        Self
    }

    /// Import `source` into `root`.
    ///
    /// Stencils docked to a drawing or template are fed from
    /// `source/<stencil display name>/` when `include_stencils` is set.
    /// Documents of a non-syncable kind produce an empty report.
    pub fn run<D: DocumentHandle>(
        &self,
        root: D,
        source: &NormalizedPath,
        settings: &SyncSettings,
    ) -> Result<SyncReport> {
        let mut report = SyncReport::new();

        if !root.kind().is_syncable() {
            debug!(document = %root.display_name(), kind = %root.kind(), "document kind has no code to import");
            return Ok(report);
        }

        for entry in TreeWalker::walk(root, settings.include_stencils) {
            let entry = entry?;
            let dir = source.join(&entry.subpath);
            report
                .documents
                .push(self.import_document(entry.document, &dir, settings)?);
        }

        Ok(report)
    }

    /// Reconcile a single document with the files directly inside `dir`.
    pub fn import_document<D: DocumentHandle>(
        &self,
        document: D,
        dir: &NormalizedPath,
        settings: &SyncSettings,
    ) -> Result<DocumentReport> {
        let name = document.display_name();
        let mut report = DocumentReport::new(&name, dir.as_str());

        if document.code_project()?.is_none() {
            debug!(document = %name, "no code project, skipping");
            return Ok(report.skipped());
        }

        let document = if document.is_read_only() {
            info!(document = %name, "reopening read-only document for writing");
            report.reopened = true;
            document.reopen_read_write()?
        } else {
            document
        };

        let Some(project) = document.code_project()? else {
            debug!(document = %name, "no code project after reopen, skipping");
            return Ok(report.skipped());
        };

        info!(document = %name, folder = %dir, "importing modules");
        let files = io::list_files(dir)?;

        remove_components(&project, &files, settings, &mut report)?;
        import_files(&project, &files, &mut report)?;

        Ok(report)
    }
}

fn remove_components<P: CodeProjectHandle>(
    project: &P,
    files: &[NormalizedPath],
    settings: &SyncSettings,
    report: &mut DocumentReport,
) -> Result<()> {
    for component in project.components()? {
        let component_name = component.name();
        if component_name == THIS_DOCUMENT || !component.kind().is_syncable() {
            continue;
        }

        // Any extension shadows the component, not only recognized ones
        let shadowed = files
            .iter()
            .filter_map(NormalizedPath::file_stem)
            .any(|stem| same_name(stem, &component_name));

        if settings.clear_before_import || shadowed {
            debug!(component = %component_name, shadowed, "removing component");
            project.remove(&component)?;
            report.removed.push(component_name);
        }
    }
    Ok(())
}

fn import_files<P: CodeProjectHandle>(
    project: &P,
    files: &[NormalizedPath],
    report: &mut DocumentReport,
) -> Result<()> {
    let mut imported_names = HashSet::new();

    for file in files {
        let file_name = file.file_name().unwrap_or_default().to_string();

        if file_name == THIS_DOCUMENT_FILE {
            report.this_document_replaced = replace_this_document(project, file)?;
            continue;
        }

        let kind = file.extension().and_then(ComponentKind::from_extension);
        if kind.is_none() {
            debug!(file = %file_name, "unrecognized extension, ignoring");
            report.ignored.push(file_name);
            continue;
        }

        let stem = file.file_stem().unwrap_or_default().to_ascii_lowercase();
        if !imported_names.insert(stem) {
            warn!(file = %file_name, "a module with the same name was already imported, skipping");
            report.ignored.push(file_name);
            continue;
        }

        debug!(file = %file_name, "importing module");
        project.import_from_file(file.as_ref())?;
        report.imported.push(file_name);
    }
    Ok(())
}

/// Replace the whole `ThisDocument` text with the file contents.
///
/// Returns `false` when the project has no `ThisDocument` component.
fn replace_this_document<P: CodeProjectHandle>(project: &P, file: &NormalizedPath) -> Result<bool> {
    let Some(component) = project.component(THIS_DOCUMENT)? else {
        warn!(file = %file, "project has no ThisDocument component");
        return Ok(false);
    };

    let text = io::read_text_lossy(file)?;
    let line_count = component.line_count()?;
    if line_count > 0 {
        component.delete_lines(LineRange::all(line_count))?;
    }
    component.append_text(&text)?;

    debug!(lines = line_count, "replaced ThisDocument text");
    Ok(true)
}
