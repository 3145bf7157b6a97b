use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{NotepadError, Result};

/// FileSystem describes where the application keeps its data.
///
/// The structure is:
/// - `{data_dir}/notes/` - The notes root: notes, images and folders
/// - `{data_dir}/config.json` - User configuration
///
/// The notes root can be relocated through [`FileSystem::with_notes_root`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystem {
    /// Base data directory for the application
    pub base_dir: PathBuf,
    /// Directory every browsed path must stay within
    pub notes_dir: PathBuf,
    /// Path to the configuration file (config.json)
    pub config_file: PathBuf,
}

impl FileSystem {
    /// Creates a new FileSystem instance using the platform-appropriate data directory.
    ///
    /// On Linux: ~/.local/share/notepad/
    /// On macOS: ~/Library/Application Support/notepad/
    /// On Windows: C:\Users\{user}\AppData\Roaming\notepad\
    ///
    /// # Returns
    /// * `Ok(FileSystem)` - A new FileSystem instance
    /// * `Err(NotepadError::InvalidPath)` - If the data directory cannot be determined
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .ok_or_else(|| NotepadError::InvalidPath("Could not determine data directory".to_string()))?
            .join("notepad");

        Ok(Self::new_with_base(&base_dir))
    }

    /// Creates a new FileSystem instance with a custom base directory.
    /// Useful for testing.
    pub fn new_with_base(base_dir: &Path) -> Self {
        let base_dir = base_dir.to_path_buf();
        Self {
            notes_dir: base_dir.join("notes"),
            config_file: base_dir.join("config.json"),
            base_dir,
        }
    }

    /// Points the notes root somewhere else, e.g. from `Config::notes_root`.
    pub fn with_notes_root(mut self, notes_dir: impl Into<PathBuf>) -> Self {
        self.notes_dir = notes_dir.into();
        self
    }

    /// Ensures the base and notes directories exist, creating them if necessary.
    ///
    /// This runs once before the browser is used; afterwards the notes root
    /// is assumed to exist.
    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir).map_err(|e| NotepadError::storage(&self.base_dir, e))?;
        fs::create_dir_all(&self.notes_dir).map_err(|e| NotepadError::storage(&self.notes_dir, e))?;
        Ok(())
    }
}
