//! On-disk shape of a package document

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vba_core::{ComponentKind, DocumentKind, THIS_DOCUMENT};

/// A document as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFile {
    /// Display name; defaults to the file name without its format extension
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub kind: DocumentKind,
    /// Paths of docked stencil documents, relative to this file
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub docked: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    /// Absent when the document has no code project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectFile>,
}

impl DocumentFile {
    /// A document of `kind` with a project holding an empty `ThisDocument`.
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            name: None,
            kind,
            docked: Vec::new(),
            metadata: BTreeMap::new(),
            project: Some(ProjectFile {
                components: vec![ComponentFile {
                    name: THIS_DOCUMENT.to_string(),
                    kind: ComponentKind::Other,
                    code: String::new(),
                }],
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    #[serde(default)]
    pub components: Vec<ComponentFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentFile {
    pub name: String,
    pub kind: ComponentKind,
    /// Module text, lines separated by `\n`
    #[serde(default)]
    pub code: String,
}

impl ComponentFile {
    pub fn lines(&self) -> Vec<String> {
        self.code.lines().map(str::to_string).collect()
    }
}
