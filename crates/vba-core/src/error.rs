//! Error types for vba-core

use std::path::PathBuf;

/// Result type for vba-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Result type returned by host bindings
pub type HostResult<T> = std::result::Result<T, HostError>;

/// Errors raised by the document automation host.
///
/// Host bindings report every failed add/remove/import/export call through
/// this type; the engine propagates them unchanged.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// A mutating call was made through a read-only document handle
    #[error("Document {document} is open read-only")]
    ReadOnly { document: String },

    /// The handle was invalidated by a close or reopen
    #[error("Document {document} has been closed")]
    DocumentClosed { document: String },

    /// No document with this name is known to the host
    #[error("Document not found: {name}")]
    DocumentNotFound { name: String },

    /// A component with the same name already exists in the project
    #[error("Component {name} already exists in {document}")]
    DuplicateComponent { document: String, name: String },

    /// The component no longer exists in the project
    #[error("Component {name} not found in {document}")]
    ComponentNotFound { document: String, name: String },

    /// A line range does not fit the component's code
    #[error("Lines {start}..{end} are out of range for {name} ({line_count} lines)")]
    InvalidLineRange {
        name: String,
        start: usize,
        end: usize,
        line_count: usize,
    },

    /// A module source file could not be understood
    #[error("Malformed module file {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    /// The file extension does not map to a component kind
    #[error("Unsupported module file {path}")]
    UnsupportedFile { path: PathBuf },

    /// Filesystem failure inside the host
    #[error(transparent)]
    Fs(#[from] vba_fs::Error),

    /// Any other automation failure
    #[error("{0}")]
    Other(String),
}

/// Errors that can occur while synchronizing
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Host automation failure
    #[error(transparent)]
    Host(#[from] HostError),

    /// Filesystem failure (missing folder, permission denied)
    #[error(transparent)]
    Fs(#[from] vba_fs::Error),

    /// Settings stored in a document could not be decoded
    #[error("Invalid settings stored in {document}: {source}")]
    Settings {
        document: String,
        #[source]
        source: serde_json::Error,
    },
}
