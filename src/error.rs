use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by browsing, lifecycle and export operations.
///
/// Every variant is local to the operation that raised it: navigation state
/// and existing files are left as they were.
#[derive(Debug, Error)]
pub enum NotepadError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Path is outside the notes root: {}", .0.display())]
    OutsideRoot(PathBuf),

    #[error("Directory unavailable: {}", .0.display())]
    DirectoryUnavailable(PathBuf),

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("An item already exists at {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Storage error at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to convert note to PDF: {0}")]
    ConversionFailed(String),

    #[error("{0} is not available on this device")]
    ServiceUnavailable(String),
}

impl NotepadError {
    /// Wraps an I/O failure together with the path it happened on.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Whether the failure should be shown as a passing notice rather than
    /// an error dialog.
    pub fn is_notice(&self) -> bool {
        matches!(self, Self::ServiceUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, NotepadError>;
