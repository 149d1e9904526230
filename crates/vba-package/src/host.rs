//! Package documents as automation handles

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use tracing::{debug, info, warn};
use vba_core::{
    CodeComponentHandle, CodeProjectHandle, ComponentKind, DocumentHandle, DocumentKind, HostError,
    HostResult, LineRange,
};
use vba_fs::{ConfigStore, NormalizedPath, io};

use crate::codec;
use crate::model::{ComponentFile, DocumentFile, ProjectFile};

/// How a document is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenMode {
    pub read_only: bool,
    /// Opened as a stencil docked to another document
    pub docked: bool,
}

impl OpenMode {
    pub const READ_WRITE: Self = Self {
        read_only: false,
        docked: false,
    };
    pub const READ_ONLY: Self = Self {
        read_only: true,
        docked: false,
    };
    pub const DOCKED_READ_ONLY: Self = Self {
        read_only: true,
        docked: true,
    };
    pub const DOCKED_READ_WRITE: Self = Self {
        read_only: false,
        docked: true,
    };
}

#[derive(Debug)]
struct DocumentState {
    path: NormalizedPath,
    file: DocumentFile,
    mode: OpenMode,
    dirty: bool,
    closed: bool,
}

impl DocumentState {
    fn display_name(&self) -> String {
        match &self.file.name {
            Some(name) => name.clone(),
            None => self
                .path
                .file_stem()
                .unwrap_or(self.path.as_str())
                .to_string(),
        }
    }

    fn project_mut(&mut self) -> HostResult<&mut ProjectFile> {
        let name = self.display_name();
        self.file
            .project
            .as_mut()
            .ok_or_else(|| HostError::Other(format!("Document {name} has no code project")))
    }

    fn component_mut(&mut self, name: &str) -> HostResult<&mut ComponentFile> {
        let document = self.display_name();
        self.project_mut()?
            .components
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| HostError::ComponentNotFound {
                document,
                name: name.to_string(),
            })
    }
}

type SharedDocument = Rc<RefCell<DocumentState>>;

#[derive(Debug, Default)]
struct HostState {
    store: ConfigStore,
    documents: Vec<SharedDocument>,
}

/// The set of documents open at one time.
///
/// Cloning a host gives another reference to the same set.
#[derive(Debug, Clone, Default)]
pub struct PackageHost {
    state: Rc<RefCell<HostState>>,
}

impl PackageHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the document stored at `path`.
    ///
    /// A document that is already open is returned as is, whatever `mode`
    /// asks for. Opening a drawing or template also opens the stencils
    /// docked to it, read-only; a stencil that fails to open is skipped
    /// with a warning and reported by
    /// [`DocumentHandle::docked_sub_documents`] instead.
    pub fn open(&self, path: &NormalizedPath, mode: OpenMode) -> HostResult<PackageDocument> {
        if let Some(state) = self.find(|doc| doc.path == *path) {
            debug!(path = %path, "document already open");
            return Ok(self.handle(state));
        }

        if !path.is_file() {
            return Err(HostError::DocumentNotFound {
                name: path.to_string(),
            });
        }

        let store = self.state.borrow().store;
        let file: DocumentFile = store.load(path)?;
        let docked = if file.kind.hosts_stencils() {
            file.docked
                .iter()
                .map(|relative| resolve_docked(path, relative))
                .collect()
        } else {
            Vec::new()
        };

        let state = Rc::new(RefCell::new(DocumentState {
            path: path.clone(),
            file,
            mode,
            dirty: false,
            closed: false,
        }));
        self.state.borrow_mut().documents.push(Rc::clone(&state));
        info!(
            document = %state.borrow().display_name(),
            read_only = mode.read_only,
            docked = mode.docked,
            "opened document"
        );

        // A stencil that cannot be opened only matters once it is walked
        for stencil in docked {
            if let Err(e) = self.open(&stencil, OpenMode::DOCKED_READ_ONLY) {
                warn!(stencil = %stencil, error = %e, "docked stencil not opened");
            }
        }

        Ok(self.handle(state))
    }

    /// Write `file` to `path` and open it read-write.
    pub fn create(&self, path: &NormalizedPath, file: &DocumentFile) -> HostResult<PackageDocument> {
        if self.find(|doc| doc.path == *path).is_some() {
            return Err(HostError::Other(format!("Document {path} is already open")));
        }
        let store = self.state.borrow().store;
        store.save(path, file)?;
        self.open(path, OpenMode::READ_WRITE)
    }

    /// An open document by display name.
    pub fn document(&self, name: &str) -> Option<PackageDocument> {
        self.find(|doc| doc.display_name() == name)
            .map(|state| self.handle(state))
    }

    /// Every open document, in opening order.
    pub fn documents(&self) -> Vec<PackageDocument> {
        let states: Vec<SharedDocument> = self.state.borrow().documents.clone();
        states.into_iter().map(|state| self.handle(state)).collect()
    }

    /// Save every writable document with unsaved changes.
    ///
    /// Returns the display names of the saved documents.
    pub fn save_all(&self) -> HostResult<Vec<String>> {
        let mut saved = Vec::new();
        for document in self.documents() {
            if document.is_read_only() || !document.is_dirty() {
                continue;
            }
            document.save()?;
            saved.push(document.display_name());
        }
        Ok(saved)
    }

    /// Close every open document without saving.
    pub fn close_all(&self) {
        let states = std::mem::take(&mut self.state.borrow_mut().documents);
        for state in states {
            let mut state = state.borrow_mut();
            if state.dirty && !state.mode.read_only {
                warn!(document = %state.display_name(), "closing with unsaved changes");
            }
            state.closed = true;
        }
    }

    fn find(&self, predicate: impl Fn(&DocumentState) -> bool) -> Option<SharedDocument> {
        self.state
            .borrow()
            .documents
            .iter()
            .find(|doc| predicate(&doc.borrow()))
            .cloned()
    }

    fn handle(&self, state: SharedDocument) -> PackageDocument {
        PackageDocument {
            host: self.clone(),
            state,
        }
    }

    fn detach(&self, state: &SharedDocument) {
        state.borrow_mut().closed = true;
        self.state
            .borrow_mut()
            .documents
            .retain(|doc| !Rc::ptr_eq(doc, state));
    }
}

fn resolve_docked(document: &NormalizedPath, relative: &str) -> NormalizedPath {
    if Path::new(relative).is_absolute() {
        return NormalizedPath::new(relative);
    }
    match document.parent() {
        Some(parent) => parent.join(relative),
        None => NormalizedPath::new(relative),
    }
}

/// Handle to an open package document.
///
/// Handles stay attached to the document they were created for: once it
/// is closed (or reopened) every call fails with
/// [`HostError::DocumentClosed`].
#[derive(Debug, Clone)]
pub struct PackageDocument {
    host: PackageHost,
    state: SharedDocument,
}

impl PackageDocument {
    pub fn path(&self) -> NormalizedPath {
        self.state.borrow().path.clone()
    }

    pub fn is_docked(&self) -> bool {
        self.state.borrow().mode.docked
    }

    /// Whether there are changes not yet written to disk.
    pub fn is_dirty(&self) -> bool {
        self.state.borrow().dirty
    }

    pub fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }

    /// Write the document back to its file.
    pub fn save(&self) -> HostResult<()> {
        let state = self.state.borrow();
        if state.closed {
            return Err(HostError::DocumentClosed {
                document: state.display_name(),
            });
        }
        if state.mode.read_only {
            return Err(HostError::ReadOnly {
                document: state.display_name(),
            });
        }
        let store = self.host.state.borrow().store;
        store.save(&state.path, &state.file)?;
        drop(state);

        self.state.borrow_mut().dirty = false;
        debug!(document = %self.display_name(), "saved document");
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&DocumentState) -> HostResult<T>) -> HostResult<T> {
        let state = self.state.borrow();
        if state.closed {
            return Err(HostError::DocumentClosed {
                document: state.display_name(),
            });
        }
        f(&state)
    }

    fn write<T>(
        &self,
        operation: &str,
        f: impl FnOnce(&mut DocumentState) -> HostResult<T>,
    ) -> HostResult<T> {
        let mut state = self.state.borrow_mut();
        if state.closed {
            return Err(HostError::DocumentClosed {
                document: state.display_name(),
            });
        }
        if state.mode.read_only {
            debug!(document = %state.display_name(), operation, "write rejected");
            return Err(HostError::ReadOnly {
                document: state.display_name(),
            });
        }
        let value = f(&mut state)?;
        state.dirty = true;
        Ok(value)
    }
}

impl DocumentHandle for PackageDocument {
    type Project = PackageProject;

    fn kind(&self) -> DocumentKind {
        self.state.borrow().file.kind
    }

    fn display_name(&self) -> String {
        self.state.borrow().display_name()
    }

    fn is_read_only(&self) -> bool {
        self.state.borrow().mode.read_only
    }

    fn code_project(&self) -> HostResult<Option<PackageProject>> {
        let has_project = self.read(|state| Ok(state.file.project.is_some()))?;
        Ok(has_project.then(|| PackageProject {
            document: self.clone(),
        }))
    }

    fn docked_sub_documents(&self) -> HostResult<Vec<Self>> {
        let (path, docked, kind) =
            self.read(|state| Ok((state.path.clone(), state.file.docked.clone(), state.file.kind)))?;
        if !kind.hosts_stencils() {
            return Ok(Vec::new());
        }
        docked
            .iter()
            .map(|relative| {
                self.host
                    .open(&resolve_docked(&path, relative), OpenMode::DOCKED_READ_ONLY)
            })
            .collect()
    }

    fn close(self) -> HostResult<()> {
        self.read(|_| Ok(()))?;
        debug!(document = %self.display_name(), "closing document");
        self.host.detach(&self.state);
        Ok(())
    }

    /// Unsaved changes are discarded; the document is read back from disk.
    fn reopen_read_write(self) -> HostResult<Self> {
        let path = self.read(|state| Ok(state.path.clone()))?;
        let docked = self.is_docked();
        info!(document = %self.display_name(), "reopening read-write");
        self.host.detach(&self.state);

        let mode = if docked {
            OpenMode::DOCKED_READ_WRITE
        } else {
            OpenMode::READ_WRITE
        };
        self.host.open(&path, mode)
    }

    fn metadata(&self, key: &str) -> HostResult<Option<String>> {
        self.read(|state| Ok(state.file.metadata.get(key).cloned()))
    }

    fn set_metadata(&self, key: &str, value: &str) -> HostResult<()> {
        self.write("set_metadata", |state| {
            state
                .file
                .metadata
                .insert(key.to_string(), value.to_string());
            Ok(())
        })
    }
}

/// Handle to the code project of a [`PackageDocument`].
#[derive(Debug, Clone)]
pub struct PackageProject {
    document: PackageDocument,
}

impl CodeProjectHandle for PackageProject {
    type Component = PackageComponent;

    fn components(&self) -> HostResult<Vec<PackageComponent>> {
        let components = self.document.read(|state| {
            Ok(state
                .file
                .project
                .iter()
                .flat_map(|project| &project.components)
                .map(|c| (c.name.clone(), c.kind))
                .collect::<Vec<_>>())
        })?;
        Ok(components
            .into_iter()
            .map(|(name, kind)| PackageComponent {
                document: self.document.clone(),
                name,
                kind,
            })
            .collect())
    }

    fn remove(&self, component: &PackageComponent) -> HostResult<()> {
        self.document.write("remove", |state| {
            let document = state.display_name();
            let components = &mut state.project_mut()?.components;
            let index = components
                .iter()
                .position(|c| c.name == component.name)
                .ok_or_else(|| HostError::ComponentNotFound {
                    document,
                    name: component.name.clone(),
                })?;
            components.remove(index);
            Ok(())
        })?;
        debug!(component = %component.name, "removed component");
        Ok(())
    }

    fn import_from_file(&self, path: &Path) -> HostResult<PackageComponent> {
        let kind = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ComponentKind::from_extension)
            .ok_or_else(|| HostError::UnsupportedFile {
                path: path.to_path_buf(),
            })?;
        let content = io::read_text_lossy(&NormalizedPath::new(path))?;
        let source = codec::decode(path, &content)?;
        let name = match source.name {
            Some(name) => name,
            None => path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .ok_or_else(|| HostError::UnsupportedFile {
                    path: path.to_path_buf(),
                })?,
        };

        self.document.write("import", |state| {
            let document = state.display_name();
            let components = &mut state.project_mut()?.components;
            if components.iter().any(|c| c.name.eq_ignore_ascii_case(&name)) {
                return Err(HostError::DuplicateComponent {
                    document,
                    name: name.clone(),
                });
            }
            components.push(ComponentFile {
                name: name.clone(),
                kind,
                code: source.lines.join("\n"),
            });
            Ok(())
        })?;
        debug!(component = %name, kind = %kind, "imported component");

        Ok(PackageComponent {
            document: self.document.clone(),
            name,
            kind,
        })
    }
}

/// Handle to one component of a [`PackageProject`].
#[derive(Debug, Clone)]
pub struct PackageComponent {
    document: PackageDocument,
    name: String,
    kind: ComponentKind,
}

impl PackageComponent {
    fn code_lines(&self) -> HostResult<Vec<String>> {
        let name = &self.name;
        self.document.read(|state| {
            state
                .file
                .project
                .iter()
                .flat_map(|project| &project.components)
                .find(|c| c.name == *name)
                .map(ComponentFile::lines)
                .ok_or_else(|| HostError::ComponentNotFound {
                    document: state.display_name(),
                    name: name.clone(),
                })
        })
    }

    fn check_range(&self, range: LineRange, line_count: usize) -> HostResult<()> {
        if range.fits(line_count) {
            Ok(())
        } else {
            Err(HostError::InvalidLineRange {
                name: self.name.clone(),
                start: range.start,
                end: range.end(),
                line_count,
            })
        }
    }
}

impl CodeComponentHandle for PackageComponent {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> ComponentKind {
        self.kind
    }

    fn export_to_file(&self, path: &Path) -> HostResult<()> {
        let lines = self.code_lines()?;
        let content = codec::encode(&self.name, self.kind, &lines);
        io::write_text(&NormalizedPath::new(path), &content)?;
        Ok(())
    }

    fn line_count(&self) -> HostResult<usize> {
        Ok(self.code_lines()?.len())
    }

    fn lines(&self, range: LineRange) -> HostResult<String> {
        let lines = self.code_lines()?;
        self.check_range(range, lines.len())?;
        Ok(lines[range.start - 1..range.end() - 1].join("\r\n"))
    }

    fn delete_lines(&self, range: LineRange) -> HostResult<()> {
        let line_count = self.code_lines()?.len();
        self.check_range(range, line_count)?;
        self.document.write("delete_lines", |state| {
            let component = state.component_mut(&self.name)?;
            let mut lines = component.lines();
            lines.drain(range.start - 1..range.end() - 1);
            component.code = lines.join("\n");
            Ok(())
        })
    }

    fn append_text(&self, text: &str) -> HostResult<()> {
        self.document.write("append_text", |state| {
            let component = state.component_mut(&self.name)?;
            let mut lines = component.lines();
            lines.extend(text.lines().map(str::to_string));
            component.code = lines.join("\n");
            Ok(())
        })
    }
}
