//! Command dispatch for an interactive host
//!
//! Toolbar buttons are modeled as [`Command`] values handed to a
//! [`CommandDispatcher`] together with the active document, instead of
//! event callbacks reading global application state.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};
use vba_fs::NormalizedPath;

use crate::error::Result;
use crate::handle::DocumentHandle;
use crate::settings::{SettingsStore, SyncSettings};
use crate::sync::{Exporter, Importer, SyncReport};

/// A user-triggered action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Export to the stored folder, asking for one if none is stored
    ExportVba,
    /// Ask for a folder, store it, then export
    ExportVbaFolder,
    /// Import from the stored folder, asking for one if none is stored
    ImportVba,
    /// Ask for a folder, store it, then import
    ImportVbaFolder,
    ToggleClearBeforeImport,
    ToggleIncludeStencils,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Self::ExportVba,
        Self::ExportVbaFolder,
        Self::ImportVba,
        Self::ImportVbaFolder,
        Self::ToggleClearBeforeImport,
        Self::ToggleIncludeStencils,
    ];

    /// Identifier used by the host's UI definition.
    pub fn id(self) -> &'static str {
        match self {
            Self::ExportVba => "ExportVBA",
            Self::ExportVbaFolder => "ExportVBAFolder",
            Self::ImportVba => "ImportVBA",
            Self::ImportVbaFolder => "ImportVBAFolder",
            Self::ToggleClearBeforeImport => "ClearBeforeImport",
            Self::ToggleIncludeStencils => "IncludeStencils",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.id() == s)
            .ok_or_else(|| format!("Unknown command: {s}"))
    }
}

/// Asks the user for a folder.
pub trait FolderPicker {
    /// Returns the chosen folder, or `None` when the user cancels.
    fn pick_folder(&mut self, initial: &str) -> Option<String>;
}

/// Result of a dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// There was no active document; nothing was done
    NoActiveDocument,
    /// The user cancelled the folder picker
    Cancelled,
    Exported {
        document: String,
        folder: String,
        report: SyncReport,
    },
    Imported {
        document: String,
        folder: String,
        report: SyncReport,
    },
    SettingsChanged(SyncSettings),
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoActiveDocument => write!(f, "No active document"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::Exported {
                document, folder, ..
            } => write!(
                f,
                "The VBA code was successfully exported from the document {document} to the folder {folder}"
            ),
            Self::Imported {
                document, folder, ..
            } => write!(
                f,
                "The VBA code was successfully imported from the folder {folder} to the document {document}"
            ),
            Self::SettingsChanged(_) => write!(f, "Settings updated"),
        }
    }
}

/// Runs [`Command`]s against the active document.
pub struct CommandDispatcher<S, P> {
    store: S,
    picker: P,
    exporter: Exporter,
    importer: Importer,
}

impl<S: SettingsStore, P: FolderPicker> CommandDispatcher<S, P> {
    pub fn new(store: S, picker: P) -> Self {
        Self {
            store,
            picker,
            exporter: Exporter::new(),
            importer: Importer::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run `command` against `active`.
    ///
    /// Without an active document this is a silent no-op. Errors from the
    /// engine are returned for the host to report.
    pub fn dispatch<D: DocumentHandle + Clone>(
        &mut self,
        active: Option<&D>,
        command: Command,
    ) -> Result<CommandOutcome> {
        let Some(document) = active else {
            debug!(%command, "no active document");
            return Ok(CommandOutcome::NoActiveDocument);
        };

        let mut settings = self.store.load_or_create(document)?;
        debug!(%command, document = %document.display_name(), "dispatching command");

        match (command, settings.target_folder()) {
            (Command::ExportVba, Some(folder)) => self.run_export(document, &folder, &settings),
            (Command::ImportVba, Some(folder)) => self.run_import(document, &folder, &settings),
            (
                Command::ExportVba
                | Command::ExportVbaFolder
                | Command::ImportVba
                | Command::ImportVbaFolder,
                _,
            ) => {
                let Some(picked) = self.pick_folder(&settings) else {
                    return Ok(CommandOutcome::Cancelled);
                };
                settings.target_folder = picked;
                self.store.store(document, &settings)?;

                let folder = NormalizedPath::new(&settings.target_folder);
                if matches!(command, Command::ExportVba | Command::ExportVbaFolder) {
                    self.run_export(document, &folder, &settings)
                } else {
                    self.run_import(document, &folder, &settings)
                }
            }
            (Command::ToggleClearBeforeImport, _) => {
                settings.clear_before_import = !settings.clear_before_import;
                self.store.store(document, &settings)?;
                Ok(CommandOutcome::SettingsChanged(settings))
            }
            (Command::ToggleIncludeStencils, _) => {
                settings.include_stencils = !settings.include_stencils;
                self.store.store(document, &settings)?;
                Ok(CommandOutcome::SettingsChanged(settings))
            }
        }
    }

    /// Whether the button for `command` should be enabled.
    pub fn is_enabled<D: DocumentHandle>(&self, active: Option<&D>, command: Command) -> bool {
        match (active, command) {
            (None, _) => false,
            (Some(document), Command::ToggleIncludeStencils) => document.kind().hosts_stencils(),
            (Some(_), _) => true,
        }
    }

    /// Whether the toggle button for `command` should be shown pressed.
    pub fn is_checked<D: DocumentHandle>(&self, active: Option<&D>, command: Command) -> Result<bool> {
        let Some(document) = active else {
            return Ok(false);
        };
        let settings = self.store.load_or_create(document)?;
        Ok(match command {
            Command::ToggleClearBeforeImport => settings.clear_before_import,
            Command::ToggleIncludeStencils => settings.include_stencils,
            _ => false,
        })
    }

    fn run_export<D: DocumentHandle + Clone>(
        &self,
        document: &D,
        folder: &NormalizedPath,
        settings: &SyncSettings,
    ) -> Result<CommandOutcome> {
        let name = document.display_name();
        let report = self.exporter.run(document.clone(), folder, settings)?;
        info!(document = %name, folder = %folder, "export finished");
        Ok(CommandOutcome::Exported {
            document: name,
            folder: settings.target_folder.clone(),
            report,
        })
    }

    fn run_import<D: DocumentHandle + Clone>(
        &self,
        document: &D,
        folder: &NormalizedPath,
        settings: &SyncSettings,
    ) -> Result<CommandOutcome> {
        let name = document.display_name();
        let report = self.importer.run(document.clone(), folder, settings)?;
        info!(document = %name, folder = %folder, "import finished");
        Ok(CommandOutcome::Imported {
            document: name,
            folder: settings.target_folder.clone(),
            report,
        })
    }

    fn pick_folder(&mut self, settings: &SyncSettings) -> Option<String> {
        self.picker
            .pick_folder(&settings.target_folder)
            .filter(|folder| !folder.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_ids_round_trip() {
        for command in Command::ALL {
            assert_eq!(command.id().parse::<Command>().unwrap(), command);
        }
        assert!("ddExportVBA".parse::<Command>().is_err());
    }

    #[test]
    fn outcome_messages_name_document_and_folder() {
        let outcome = CommandOutcome::Exported {
            document: "Drawing1.vsd".into(),
            folder: "C:/vba".into(),
            report: SyncReport::new(),
        };
        let message = outcome.to_string();
        assert!(message.contains("Drawing1.vsd"));
        assert!(message.contains("C:/vba"));
    }
}
