//! In-memory [`FakeHost`] implementing the document handle traits.
//!
//! Realism level: **FAKE**, no real automation host. Every call that
//! reaches a document is recorded as a [`HostEvent`], and mutating calls
//! made through a read-only handle are rejected with
//! [`HostError::ReadOnly`] and recorded as [`HostEvent::RejectedWrite`].
//!
//! Module files use a minimal native format: an optional
//! `Attribute VB_Name = "<name>"` first line followed by the code.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::rc::Rc;

use vba_core::{
    CodeComponentHandle, CodeProjectHandle, ComponentKind, DocumentHandle, DocumentKind,
    HostError, HostResult, LineRange, THIS_DOCUMENT,
};

/// A host call observed by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Close { document: String },
    Reopen { document: String },
    Remove { document: String, component: String },
    Import { document: String, file: String },
    Export { document: String, file: String },
    DeleteLines { document: String, component: String },
    AppendText { document: String, component: String },
    SetMetadata { document: String, key: String },
    RejectedWrite { document: String, operation: String },
}

#[derive(Debug, Clone)]
struct ComponentState {
    name: String,
    kind: ComponentKind,
    lines: Vec<String>,
}

#[derive(Debug)]
struct DocumentState {
    name: String,
    kind: DocumentKind,
    read_only: bool,
    open: bool,
    generation: u64,
    project: Option<Vec<ComponentState>>,
    docked: Vec<String>,
    metadata: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct HostState {
    documents: Vec<DocumentState>,
    events: Vec<HostEvent>,
}

impl HostState {
    fn document_mut(&mut self, name: &str) -> Option<&mut DocumentState> {
        self.documents.iter_mut().find(|d| d.name == name)
    }

    fn document(&self, name: &str) -> Option<&DocumentState> {
        self.documents.iter().find(|d| d.name == name)
    }
}

type Shared = Rc<RefCell<HostState>>;

/// An in-memory automation host.
#[derive(Debug, Clone, Default)]
pub struct FakeHost {
    state: Shared,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start describing a document that will be opened in this host.
    pub fn document(&self, name: &str, kind: DocumentKind) -> DocumentBuilder<'_> {
        DocumentBuilder {
            host: self,
            state: DocumentState {
                name: name.to_string(),
                kind,
                read_only: false,
                open: true,
                generation: 0,
                project: Some(vec![ComponentState {
                    name: THIS_DOCUMENT.to_string(),
                    kind: ComponentKind::Other,
                    lines: Vec::new(),
                }]),
                docked: Vec::new(),
                metadata: BTreeMap::new(),
            },
        }
    }

    /// Current handle to an open document.
    pub fn handle(&self, name: &str) -> FakeDocument {
        let generation = self
            .state
            .borrow()
            .document(name)
            .unwrap_or_else(|| panic!("FakeHost::handle: unknown document {name}"))
            .generation;
        FakeDocument {
            host: self.state.clone(),
            name: name.to_string(),
            generation,
        }
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.state.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }

    pub fn is_read_only(&self, document: &str) -> bool {
        self.state
            .borrow()
            .document(document)
            .map(|d| d.read_only)
            .unwrap_or(false)
    }

    /// Names of every component of `document`, `ThisDocument` included.
    pub fn component_names(&self, document: &str) -> BTreeSet<String> {
        self.components(document).into_keys().collect()
    }

    /// Name -> kind of every component of `document`.
    pub fn components(&self, document: &str) -> BTreeMap<String, ComponentKind> {
        let state = self.state.borrow();
        state
            .document(document)
            .and_then(|d| d.project.as_ref())
            .map(|p| p.iter().map(|c| (c.name.clone(), c.kind)).collect())
            .unwrap_or_default()
    }

    /// Code of a component, lines joined with CRLF.
    pub fn code(&self, document: &str, component: &str) -> Option<String> {
        let state = self.state.borrow();
        state
            .document(document)
            .and_then(|d| d.project.as_ref())
            .and_then(|p| p.iter().find(|c| c.name == component))
            .map(|c| c.lines.join("\r\n"))
    }

    pub fn metadata(&self, document: &str, key: &str) -> Option<String> {
        let state = self.state.borrow();
        state
            .document(document)
            .and_then(|d| d.metadata.get(key).cloned())
    }
}

/// Builder returned by [`FakeHost::document`].
pub struct DocumentBuilder<'a> {
    host: &'a FakeHost,
    state: DocumentState,
}

impl DocumentBuilder<'_> {
    pub fn module(mut self, name: &str, kind: ComponentKind, code: &str) -> Self {
        let project = self.state.project.get_or_insert_with(Vec::new);
        project.push(ComponentState {
            name: name.to_string(),
            kind,
            lines: split_lines(code),
        });
        self
    }

    pub fn this_document(mut self, code: &str) -> Self {
        if let Some(project) = self.state.project.as_mut()
            && let Some(component) = project.iter_mut().find(|c| c.name == THIS_DOCUMENT)
        {
            component.lines = split_lines(code);
        }
        self
    }

    pub fn docked(mut self, stencil: &str) -> Self {
        self.state.docked.push(stencil.to_string());
        self
    }

    pub fn read_only(mut self) -> Self {
        self.state.read_only = true;
        self
    }

    /// The document has no accessible code project.
    pub fn without_project(mut self) -> Self {
        self.state.project = None;
        self
    }

    pub fn metadata(mut self, key: &str, value: &str) -> Self {
        self.state.metadata.insert(key.to_string(), value.to_string());
        self
    }

    /// Register the document as open and return a handle to it.
    pub fn open(self) -> FakeDocument {
        let name = self.state.name.clone();
        self.host.state.borrow_mut().documents.push(self.state);
        self.host.handle(&name)
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Run `f` against the live state of `name`, failing for stale handles.
fn with_document<R>(
    host: &Shared,
    name: &str,
    generation: u64,
    f: impl FnOnce(&mut DocumentState, &mut Vec<HostEvent>) -> HostResult<R>,
) -> HostResult<R> {
    let mut state = host.borrow_mut();
    let HostState { documents, events } = &mut *state;
    let document = documents
        .iter_mut()
        .find(|d| d.name == name)
        .filter(|d| d.open && d.generation == generation)
        .ok_or_else(|| HostError::DocumentClosed {
            document: name.to_string(),
        })?;
    f(document, events)
}

/// Handle to a document in a [`FakeHost`].
#[derive(Debug, Clone)]
pub struct FakeDocument {
    host: Shared,
    name: String,
    generation: u64,
}

impl DocumentHandle for FakeDocument {
    type Project = FakeProject;

    fn kind(&self) -> DocumentKind {
        self.host
            .borrow()
            .document(&self.name)
            .map(|d| d.kind)
            .unwrap_or(DocumentKind::Other)
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn is_read_only(&self) -> bool {
        self.host
            .borrow()
            .document(&self.name)
            .map(|d| d.read_only)
            .unwrap_or(false)
    }

    fn code_project(&self) -> HostResult<Option<FakeProject>> {
        with_document(&self.host, &self.name, self.generation, |document, _| {
            Ok(document.project.as_ref().map(|_| FakeProject {
                document: self.clone(),
            }))
        })
    }

    fn docked_sub_documents(&self) -> HostResult<Vec<FakeDocument>> {
        let docked = with_document(&self.host, &self.name, self.generation, |document, _| {
            Ok(document.docked.clone())
        })?;

        let state = self.host.borrow();
        docked
            .into_iter()
            .map(|name| {
                let document = state
                    .document(&name)
                    .ok_or_else(|| HostError::DocumentNotFound { name: name.clone() })?;
                Ok(FakeDocument {
                    host: self.host.clone(),
                    name,
                    generation: document.generation,
                })
            })
            .collect()
    }

    fn close(self) -> HostResult<()> {
        with_document(&self.host, &self.name, self.generation, |document, events| {
            document.open = false;
            events.push(HostEvent::Close {
                document: document.name.clone(),
            });
            Ok(())
        })
    }

    fn reopen_read_write(self) -> HostResult<FakeDocument> {
        let host = self.host.clone();
        let name = self.name.clone();
        self.close()?;

        let mut state = host.borrow_mut();
        let generation = {
            let document = state
                .document_mut(&name)
                .ok_or_else(|| HostError::DocumentNotFound { name: name.clone() })?;
            document.open = true;
            document.read_only = false;
            document.generation += 1;
            document.generation
        };
        state.events.push(HostEvent::Reopen {
            document: name.clone(),
        });
        drop(state);

        Ok(FakeDocument {
            host,
            name,
            generation,
        })
    }

    fn metadata(&self, key: &str) -> HostResult<Option<String>> {
        with_document(&self.host, &self.name, self.generation, |document, _| {
            Ok(document.metadata.get(key).cloned())
        })
    }

    fn set_metadata(&self, key: &str, value: &str) -> HostResult<()> {
        with_document(&self.host, &self.name, self.generation, |document, events| {
            FakeProject::write_guard(&document.name, events, document.read_only, "set_metadata")?;
            document.metadata.insert(key.to_string(), value.to_string());
            events.push(HostEvent::SetMetadata {
                document: document.name.clone(),
                key: key.to_string(),
            });
            Ok(())
        })
    }
}

/// Handle to the code project of a [`FakeDocument`].
#[derive(Debug, Clone)]
pub struct FakeProject {
    document: FakeDocument,
}

impl FakeProject {
    fn with_components<R>(
        &self,
        f: impl FnOnce(&str, &mut Vec<ComponentState>, &mut Vec<HostEvent>, bool) -> HostResult<R>,
    ) -> HostResult<R> {
        let doc = &self.document;
        with_document(&doc.host, &doc.name, doc.generation, |document, events| {
            let read_only = document.read_only;
            let name = document.name.clone();
            let project = document.project.as_mut().ok_or_else(|| {
                HostError::Other(format!("{name} has no code project"))
            })?;
            f(&name, project, events, read_only)
        })
    }

    fn write_guard(
        document: &str,
        events: &mut Vec<HostEvent>,
        read_only: bool,
        operation: &str,
    ) -> HostResult<()> {
        if read_only {
            events.push(HostEvent::RejectedWrite {
                document: document.to_string(),
                operation: operation.to_string(),
            });
            return Err(HostError::ReadOnly {
                document: document.to_string(),
            });
        }
        Ok(())
    }

    fn component_handle(&self, name: &str, kind: ComponentKind) -> FakeComponent {
        FakeComponent {
            document: self.document.clone(),
            name: name.to_string(),
            kind,
        }
    }
}

impl CodeProjectHandle for FakeProject {
    type Component = FakeComponent;

    fn components(&self) -> HostResult<Vec<FakeComponent>> {
        self.with_components(|_, components, _, _| {
            Ok(components
                .iter()
                .map(|c| self.component_handle(&c.name, c.kind))
                .collect())
        })
    }

    fn remove(&self, component: &FakeComponent) -> HostResult<()> {
        self.with_components(|document, components, events, read_only| {
            Self::write_guard(document, events, read_only, "remove")?;
            let index = components
                .iter()
                .position(|c| c.name == component.name)
                .ok_or_else(|| HostError::ComponentNotFound {
                    document: document.to_string(),
                    name: component.name.clone(),
                })?;
            components.remove(index);
            events.push(HostEvent::Remove {
                document: document.to_string(),
                component: component.name.clone(),
            });
            Ok(())
        })
    }

    fn import_from_file(&self, path: &Path) -> HostResult<FakeComponent> {
        let file = path.to_string_lossy().to_string();
        let kind = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ComponentKind::from_extension)
            .ok_or_else(|| HostError::UnsupportedFile {
                path: path.to_path_buf(),
            })?;
        let content = vba_fs::io::read_text_lossy(&vba_fs::NormalizedPath::new(path))?;

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let header_name = content
            .lines()
            .next()
            .filter(|line| line.starts_with("Attribute VB_Name"))
            .and_then(|line| line.split('"').nth(1))
            .map(str::to_string);
        let (name, code) = match header_name {
            Some(name) => {
                let code = content
                    .split_once('\n')
                    .map(|(_, rest)| rest.to_string())
                    .unwrap_or_default();
                (name, code)
            }
            None => (stem, content),
        };

        self.with_components(|document, components, events, read_only| {
            Self::write_guard(document, events, read_only, "import")?;
            if components.iter().any(|c| c.name.eq_ignore_ascii_case(&name)) {
                return Err(HostError::DuplicateComponent {
                    document: document.to_string(),
                    name: name.clone(),
                });
            }
            components.push(ComponentState {
                name: name.clone(),
                kind,
                lines: split_lines(&code),
            });
            events.push(HostEvent::Import {
                document: document.to_string(),
                file: file.clone(),
            });
            Ok(())
        })?;

        Ok(self.component_handle(&name, kind))
    }
}

/// Handle to a component of a [`FakeProject`].
#[derive(Debug, Clone)]
pub struct FakeComponent {
    document: FakeDocument,
    name: String,
    kind: ComponentKind,
}

impl FakeComponent {
    fn with_state<R>(
        &self,
        f: impl FnOnce(&str, &mut ComponentState, &mut Vec<HostEvent>, bool) -> HostResult<R>,
    ) -> HostResult<R> {
        let project = FakeProject {
            document: self.document.clone(),
        };
        project.with_components(|document, components, events, read_only| {
            let component = components
                .iter_mut()
                .find(|c| c.name == self.name)
                .ok_or_else(|| HostError::ComponentNotFound {
                    document: document.to_string(),
                    name: self.name.clone(),
                })?;
            f(document, component, events, read_only)
        })
    }
}

impl CodeComponentHandle for FakeComponent {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> ComponentKind {
        self.kind
    }

    fn export_to_file(&self, path: &Path) -> HostResult<()> {
        let (content, document) = self.with_state(|document, component, _, _| {
            let mut content = format!("Attribute VB_Name = \"{}\"\r\n", component.name);
            content.push_str(&component.lines.join("\r\n"));
            Ok((content, document.to_string()))
        })?;
        fs::write(path, content).map_err(|e| HostError::Fs(vba_fs::Error::io(path, e)))?;
        self.document.host.borrow_mut().events.push(HostEvent::Export {
            document,
            file: path.to_string_lossy().to_string(),
        });
        Ok(())
    }

    fn line_count(&self) -> HostResult<usize> {
        self.with_state(|_, component, _, _| Ok(component.lines.len()))
    }

    fn lines(&self, range: LineRange) -> HostResult<String> {
        self.with_state(|_, component, _, _| {
            if !range.fits(component.lines.len()) {
                return Err(HostError::InvalidLineRange {
                    name: component.name.clone(),
                    start: range.start,
                    end: range.end(),
                    line_count: component.lines.len(),
                });
            }
            Ok(component.lines[range.start - 1..range.end() - 1].join("\r\n"))
        })
    }

    fn delete_lines(&self, range: LineRange) -> HostResult<()> {
        self.with_state(|document, component, events, read_only| {
            FakeProject::write_guard(document, events, read_only, "delete_lines")?;
            if !range.fits(component.lines.len()) {
                return Err(HostError::InvalidLineRange {
                    name: component.name.clone(),
                    start: range.start,
                    end: range.end(),
                    line_count: component.lines.len(),
                });
            }
            component.lines.drain(range.start - 1..range.end() - 1);
            events.push(HostEvent::DeleteLines {
                document: document.to_string(),
                component: component.name.clone(),
            });
            Ok(())
        })
    }

    fn append_text(&self, text: &str) -> HostResult<()> {
        self.with_state(|document, component, events, read_only| {
            FakeProject::write_guard(document, events, read_only, "append_text")?;
            component.lines.extend(split_lines(text));
            events.push(HostEvent::AppendText {
                document: document.to_string(),
                component: component.name.clone(),
            });
            Ok(())
        })
    }
}
