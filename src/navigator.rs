use std::path::{Path, PathBuf};

use crate::error::{NotepadError, Result};
use crate::path_util;

/// Tracks which directory the browser is showing.
///
/// The current directory is always inside `root`. A new navigator always
/// starts at the root; nothing here is persisted between sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    root: PathBuf,
    current_directory: PathBuf,
}

impl Navigator {
    /// Creates a navigator positioned at `root`.
    ///
    /// The root must already exist; see
    /// [`FileSystem::ensure_directories`](crate::filesystem::FileSystem::ensure_directories).
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = path_util::normalize(root.as_ref());
        Self {
            current_directory: root.clone(),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn current_directory(&self) -> &Path {
        &self.current_directory
    }

    pub fn is_at_root(&self) -> bool {
        self.current_directory == self.root
    }

    /// Enters `folder`.
    ///
    /// # Arguments
    /// * `folder` - Absolute path of the folder to show
    ///
    /// # Returns
    /// * `Ok(())` - The folder is now current
    /// * `Err(NotepadError::OutsideRoot)` - The folder is not under the root;
    ///   the current directory is unchanged
    pub fn enter(&mut self, folder: &Path) -> Result<()> {
        let folder = self.contained(folder)?;
        log::debug!("Entering {}", folder.display());
        self.current_directory = folder;
        Ok(())
    }

    /// Moves to the parent directory. At the root this does nothing.
    pub fn up(&mut self) {
        if self.is_at_root() {
            return;
        }
        self.current_directory = path_util::parent_within(&self.root, &self.current_directory);
        log::debug!("Up to {}", self.current_directory.display());
    }

    /// Jumps straight to `path`, e.g. when reopening a bookmarked folder.
    /// Same containment rule as [`Navigator::enter`].
    pub fn jump_to(&mut self, path: &Path) -> Result<()> {
        let path = self.contained(path)?;
        log::debug!("Jumping to {}", path.display());
        self.current_directory = path;
        Ok(())
    }

    /// Returns to the root.
    pub fn reset(&mut self) {
        self.current_directory = self.root.clone();
    }

    /// If the current directory is `deleted` or lies inside it, moves to the
    /// parent of `deleted`.
    pub fn retreat_from(&mut self, deleted: &Path) {
        let deleted = path_util::normalize(deleted);
        if self.current_directory.starts_with(&deleted) {
            self.current_directory = path_util::parent_within(&self.root, &deleted);
            log::debug!(
                "Current directory was removed, now at {}",
                self.current_directory.display()
            );
        }
    }

    /// The current directory relative to the root; empty at the root.
    pub fn relative_path(&self) -> PathBuf {
        self.current_directory
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    /// Every directory from the root down to the current one, inclusive.
    pub fn breadcrumbs(&self) -> Vec<PathBuf> {
        let mut crumbs = vec![self.root.clone()];
        let mut path = self.root.clone();
        for component in self.relative_path().components() {
            path.push(component);
            crumbs.push(path.clone());
        }
        crumbs
    }

    fn contained(&self, path: &Path) -> Result<PathBuf> {
        if !path_util::is_within(&self.root, path) {
            log::warn!("Rejected navigation outside root: {}", path.display());
            return Err(NotepadError::OutsideRoot(path.to_path_buf()));
        }
        Ok(path_util::normalize(path))
    }
}
