//! Synchronization engine between document code projects and module folders
//!
//! A host document (and, one level deep, the stencils docked to it) owns a
//! code project made of named, typed modules. This crate mirrors those
//! modules to a directory tree and reconciles them back:
//!
//! - **Classification**: module kind <-> file extension (`.bas`, `.cls`, `.frm`)
//! - **Tree walking**: the root document plus its docked stencils
//! - **Export**: document -> files
//! - **Import**: files -> document, with name-based removal and the
//!   `ThisDocument` singleton replaced line-wise
//! - **Commands**: explicit dispatch of the interactive host's buttons
//!
//! # Architecture
//!
//! ```text
//!          vba-cli / interactive host
//!                     |
//!        CommandDispatcher / Exporter / Importer
//!                     |
//!                 TreeWalker
//!                     |
//!   DocumentHandle / CodeProjectHandle / CodeComponentHandle
//!                     |
//!        host binding (vba-package, fakes)
//! ```
//!
//! The engine is written purely against the handle traits in [`handle`];
//! it never reads process-wide state.

pub mod classify;
pub mod command;
pub mod error;
pub mod handle;
pub mod settings;
pub mod sync;
pub mod walker;

pub use classify::ComponentKind;
pub use command::{Command, CommandDispatcher, CommandOutcome, FolderPicker};
pub use error::{Error, HostError, HostResult, Result};
pub use handle::{
    CodeComponentHandle, CodeProjectHandle, DocumentHandle, DocumentKind, LineRange,
    THIS_DOCUMENT, THIS_DOCUMENT_FILE,
};
pub use settings::{MetadataSettingsStore, SETTINGS_KEY, SettingsStore, SyncSettings};
pub use sync::{DocumentReport, Exporter, Importer, SyncReport};
pub use walker::{TreeWalker, Walk, WalkEntry};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_error_displays_document_name() {
        let error = Error::from(HostError::ReadOnly {
            document: "Basic Shapes.vss".into(),
        });

        let display = error.to_string();
        assert!(
            display.contains("Basic Shapes.vss"),
            "Error display should contain the document name, got: {}",
            display
        );
    }
}
