//! Error types for vba-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from the synchronization engine
    #[error(transparent)]
    Core(#[from] vba_core::Error),

    /// Error from the document host
    #[error(transparent)]
    Host(#[from] vba_core::HostError),

    /// Error from vba-fs
    #[error(transparent)]
    Fs(#[from] vba_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Report could not be rendered as JSON
    #[error("Failed to render report: {0}")]
    Json(#[from] serde_json::Error),
}
