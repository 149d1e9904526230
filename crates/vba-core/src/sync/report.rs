//! Reports returned by export and import runs

use serde::{Deserialize, Serialize};

/// What happened to one document during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Display name of the document
    pub document: String,
    /// Folder the document was synchronized with
    pub folder: String,
    /// The document had no accessible code project
    pub skipped: bool,
    /// The document was reopened read-write before mutation
    pub reopened: bool,
    /// Files written by an export
    pub written: Vec<String>,
    /// Components removed by an import
    pub removed: Vec<String>,
    /// Files imported as new components
    pub imported: Vec<String>,
    /// `ThisDocument` text was replaced from its file
    pub this_document_replaced: bool,
    /// Files left alone by an import
    pub ignored: Vec<String>,
}

impl DocumentReport {
    pub fn new(document: impl Into<String>, folder: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            folder: folder.into(),
            ..Self::default()
        }
    }

    /// Mark the document as skipped for lack of a code project.
    pub fn skipped(mut self) -> Self {
        self.skipped = true;
        self
    }
}

/// Report from an export or import run, one entry per visited document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub documents: Vec<DocumentReport>,
}

impl SyncReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report for the document with this display name, if it was visited.
    pub fn document(&self, name: &str) -> Option<&DocumentReport> {
        self.documents.iter().find(|d| d.document == name)
    }

    pub fn files_written(&self) -> usize {
        self.documents.iter().map(|d| d.written.len()).sum()
    }

    pub fn components_removed(&self) -> usize {
        self.documents.iter().map(|d| d.removed.len()).sum()
    }

    pub fn files_imported(&self) -> usize {
        self.documents
            .iter()
            .map(|d| d.imported.len() + usize::from(d.this_document_replaced))
            .sum()
    }
}
