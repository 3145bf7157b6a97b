use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;

use crate::error::{NotepadError, Result};
use crate::models::{DirectoryListing, Entry, EntryKind};
use crate::path_util;
use crate::storage::Storage;

/// Lists one directory at a time and classifies what it finds.
#[derive(Clone)]
pub struct DirectoryIndex {
    storage: Arc<dyn Storage>,
}

impl DirectoryIndex {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Lists the direct children of `directory`.
    ///
    /// Folders and supported files are returned in separate, sorted
    /// sequences. Files of unsupported kinds are skipped.
    ///
    /// # Arguments
    /// * `directory` - The directory to list
    ///
    /// # Returns
    /// * `Ok(DirectoryListing)` - The classified children
    /// * `Err(NotepadError::DirectoryUnavailable)` - If the directory is
    ///   missing, is a file, or cannot be read
    pub fn list(&self, directory: &Path) -> Result<DirectoryListing> {
        let stat = self.storage.stat(directory).map_err(|e| {
            log::warn!("Failed to stat {}: {}", directory.display(), e);
            NotepadError::DirectoryUnavailable(directory.to_path_buf())
        })?;
        if !stat.exists || !stat.is_directory {
            return Err(NotepadError::DirectoryUnavailable(directory.to_path_buf()));
        }

        let children = self.storage.read_dir(directory).map_err(|e| {
            log::warn!("Failed to read {}: {}", directory.display(), e);
            NotepadError::DirectoryUnavailable(directory.to_path_buf())
        })?;

        let mut listing = DirectoryListing {
            directory: directory.to_path_buf(),
            ..Default::default()
        };

        for child in children {
            let entry = Entry::new(path_util::join(directory, &child.name), child.is_directory)?;
            match entry.kind {
                EntryKind::Folder => listing.folders.push(entry),
                EntryKind::Unsupported => {}
                _ => listing.files.push(entry),
            }
        }

        listing.folders.sort_by(compare_entries);
        listing.files.sort_by(compare_entries);

        log::debug!(
            "Listed {}: {} folders, {} files",
            directory.display(),
            listing.folders.len(),
            listing.files.len()
        );

        Ok(listing)
    }
}

/// Case-folded name first so "apple" and "Banana" sort the way people expect,
/// then the exact name and the full path so the order is total.
fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.path.cmp(&b.path))
}
