//! Synchronization settings and their per-document storage

use serde::{Deserialize, Serialize};
use tracing::debug;
use vba_fs::NormalizedPath;

use crate::error::{Error, Result};
use crate::handle::DocumentHandle;

/// Metadata key the settings are stored under inside a document.
pub const SETTINGS_KEY: &str = "VisioImportExportVBA";

/// Options threaded through every export and import.
///
/// Owned by the caller; the engine only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncSettings {
    /// Also synchronize stencils docked to a drawing or template
    pub include_stencils: bool,
    /// Remove every classifiable component before importing
    pub clear_before_import: bool,
    /// Folder last used for export/import; empty when never chosen
    pub target_folder: String,
}

impl SyncSettings {
    /// The target folder, or `None` when it has not been chosen yet.
    pub fn target_folder(&self) -> Option<NormalizedPath> {
        if self.target_folder.trim().is_empty() {
            None
        } else {
            Some(NormalizedPath::new(&self.target_folder))
        }
    }
}

/// Loads and stores [`SyncSettings`] keyed off a document.
pub trait SettingsStore {
    /// Stored settings, or defaults when the document has none.
    fn load_or_create<D: DocumentHandle>(&self, document: &D) -> Result<SyncSettings>;

    fn store<D: DocumentHandle>(&self, document: &D, settings: &SyncSettings) -> Result<()>;
}

/// Stores settings as JSON in a document metadata entry.
#[derive(Debug, Clone)]
pub struct MetadataSettingsStore {
    key: String,
}

impl Default for MetadataSettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataSettingsStore {
    pub fn new() -> Self {
        Self::with_key(SETTINGS_KEY)
    }

    pub fn with_key(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl SettingsStore for MetadataSettingsStore {
    fn load_or_create<D: DocumentHandle>(&self, document: &D) -> Result<SyncSettings> {
        let Some(raw) = document.metadata(&self.key)? else {
            return Ok(SyncSettings::default());
        };
        if raw.trim().is_empty() {
            return Ok(SyncSettings::default());
        }

        serde_json::from_str(&raw).map_err(|source| Error::Settings {
            document: document.display_name(),
            source,
        })
    }

    fn store<D: DocumentHandle>(&self, document: &D, settings: &SyncSettings) -> Result<()> {
        let raw = serde_json::to_string(settings).map_err(|source| Error::Settings {
            document: document.display_name(),
            source,
        })?;
        debug!(document = %document.display_name(), key = %self.key, "storing settings");
        document.set_metadata(&self.key, &raw)?;
        Ok(())
    }
}
