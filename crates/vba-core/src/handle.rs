//! Capability traits implemented by host bindings
//!
//! Handles behave like automation references: cloning a handle gives another
//! reference to the same live object, and mutating calls take `&self`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::ComponentKind;
use crate::error::HostResult;

/// Name of the document-level singleton component.
pub const THIS_DOCUMENT: &str = "ThisDocument";

/// Fixed file name the `ThisDocument` text is mirrored to.
pub const THIS_DOCUMENT_FILE: &str = "ThisDocument.bas";

/// The kind of a host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Drawing,
    Template,
    Stencil,
    Other,
}

impl DocumentKind {
    /// Documents of this kind carry code that can be synchronized.
    pub fn is_syncable(self) -> bool {
        !matches!(self, Self::Other)
    }

    /// Documents of this kind may have stencils docked to them.
    pub fn hosts_stencils(self) -> bool {
        matches!(self, Self::Drawing | Self::Template)
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Drawing => "drawing",
            Self::Template => "template",
            Self::Stencil => "stencil",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// A 1-based range of code lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    /// First line, starting at 1
    pub start: usize,
    /// Number of lines
    pub count: usize,
}

impl LineRange {
    pub fn new(start: usize, count: usize) -> Self {
        Self { start, count }
    }

    /// Every line of a module with `line_count` lines.
    pub fn all(line_count: usize) -> Self {
        Self::new(1, line_count)
    }

    /// One past the last line.
    pub fn end(&self) -> usize {
        self.start + self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether the range lies within a module of `line_count` lines.
    pub fn fits(&self, line_count: usize) -> bool {
        self.start >= 1 && self.end() <= line_count + 1
    }
}

/// One named unit of code inside a project.
pub trait CodeComponentHandle {
    fn name(&self) -> String;

    fn kind(&self) -> ComponentKind;

    /// Write the component to `path` in the host's native file format.
    fn export_to_file(&self, path: &Path) -> HostResult<()>;

    fn line_count(&self) -> HostResult<usize>;

    /// Text of `range`, lines joined with CRLF and no trailing newline.
    fn lines(&self, range: LineRange) -> HostResult<String>;

    fn delete_lines(&self, range: LineRange) -> HostResult<()>;

    /// Append `text` after the last line.
    fn append_text(&self, text: &str) -> HostResult<()>;
}

/// The collection of components owned by one document.
pub trait CodeProjectHandle {
    type Component: CodeComponentHandle;

    /// Components in the host's enumeration order.
    fn components(&self) -> HostResult<Vec<Self::Component>>;

    /// Look up a component by exact name.
    fn component(&self, name: &str) -> HostResult<Option<Self::Component>> {
        Ok(self.components()?.into_iter().find(|c| c.name() == name))
    }

    fn remove(&self, component: &Self::Component) -> HostResult<()>;

    /// Add a new component from a module file in the host's native format.
    fn import_from_file(&self, path: &Path) -> HostResult<Self::Component>;
}

/// An open host document.
pub trait DocumentHandle: Sized {
    type Project: CodeProjectHandle;

    fn kind(&self) -> DocumentKind;

    fn display_name(&self) -> String;

    fn is_read_only(&self) -> bool;

    /// The document's code project, or `None` when there is none or it is
    /// not accessible (e.g. macro access disabled).
    fn code_project(&self) -> HostResult<Option<Self::Project>>;

    /// Stencils docked to this document, in the host's enumeration order.
    fn docked_sub_documents(&self) -> HostResult<Vec<Self>>;

    fn close(self) -> HostResult<()>;

    /// Close this document and open it again by name, read-write and docked.
    ///
    /// The consumed handle is invalid afterwards; every further call must go
    /// through the returned one.
    fn reopen_read_write(self) -> HostResult<Self>;

    /// Read a named metadata entry stored inside the document.
    fn metadata(&self, key: &str) -> HostResult<Option<String>>;

    fn set_metadata(&self, key: &str, value: &str) -> HostResult<()>;
}
