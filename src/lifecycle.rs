use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{NotepadError, Result};
use crate::models::{Entry, EntryKind, PickedFile};
use crate::navigator::Navigator;
use crate::path_util;
use crate::storage::Storage;

const NOTE_SUFFIX: &str = ".txt";

/// What to do when a new note's name is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreatePolicy {
    /// Fail with `AlreadyExists`
    #[default]
    Reject,
    /// Replace the existing note with an empty one
    Overwrite,
}

/// Creates, deletes and imports items under the notes root.
///
/// Operations default to the navigator's current directory. Callers are
/// expected to re-list the directory after any of these returns.
#[derive(Clone)]
pub struct ItemLifecycle {
    storage: Arc<dyn Storage>,
}

impl ItemLifecycle {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Creates an empty note named `name` + `.txt` in the current directory.
    ///
    /// # Arguments
    /// * `nav` - Supplies the current directory and the root
    /// * `name` - The note name typed by the user, with or without `.txt`
    ///
    /// # Returns
    /// * `Ok(Entry)` - The new note
    /// * `Err(NotepadError)` - `EmptyName`, `InvalidPath`, `AlreadyExists`
    ///   or a storage failure
    pub fn create_file(&self, nav: &Navigator, name: &str) -> Result<Entry> {
        self.create_file_with(nav, name, CreatePolicy::Reject)
    }

    /// Like [`ItemLifecycle::create_file`], with an explicit collision policy.
    pub fn create_file_with(
        &self,
        nav: &Navigator,
        name: &str,
        policy: CreatePolicy,
    ) -> Result<Entry> {
        let name = path_util::validate_name(name)?;
        let file_name = if name.to_lowercase().ends_with(NOTE_SUFFIX) {
            name
        } else {
            format!("{}{}", name, NOTE_SUFFIX)
        };
        let path = path_util::join(nav.current_directory(), &file_name);

        let stat = self.storage.stat(&path)?;
        if stat.exists
            && (stat.is_directory || stat.is_symlink || policy == CreatePolicy::Reject)
        {
            return Err(NotepadError::AlreadyExists(path));
        }

        self.storage.write_text(&path, "")?;
        log::info!("Created note {}", path.display());

        Entry::new(path, false)
    }

    /// Creates a folder named `name` in the current directory.
    ///
    /// Only the folder itself is created. If a folder of that name is
    /// already there it is returned unchanged.
    pub fn create_folder(&self, nav: &Navigator, name: &str) -> Result<Entry> {
        let name = path_util::validate_name(name)?;
        let path = path_util::join(nav.current_directory(), &name);

        let stat = self.storage.stat(&path)?;
        if stat.exists {
            if stat.is_directory {
                return Entry::new(path, true);
            }
            return Err(NotepadError::AlreadyExists(path));
        }

        self.storage.mkdir(&path)?;
        log::info!("Created folder {}", path.display());

        Entry::new(path, true)
    }

    /// Deletes a file, or a folder with everything under it.
    ///
    /// Deleting something that is already gone succeeds. The root itself
    /// cannot be deleted.
    ///
    /// # Arguments
    /// * `nav` - Supplies the root
    /// * `path` - The item to delete
    ///
    /// # Returns
    /// * `Ok(())` - The item no longer exists
    /// * `Err(NotepadError)` - `OutsideRoot`, `InvalidPath` for the root, or a
    ///   storage failure
    pub fn delete_item(&self, nav: &Navigator, path: &Path) -> Result<()> {
        if !path_util::is_within(nav.root(), path) {
            log::warn!("Rejected delete outside root: {}", path.display());
            return Err(NotepadError::OutsideRoot(path.to_path_buf()));
        }

        let path = path_util::normalize(path);
        if path == nav.root() {
            return Err(NotepadError::InvalidPath(
                "The notes root cannot be deleted".to_string(),
            ));
        }

        let stat = self.storage.stat(&path)?;
        if !stat.exists {
            log::debug!("Nothing to delete at {}", path.display());
            return Ok(());
        }

        // A linked folder is removed as a link, never emptied
        self.storage.delete(&path, stat.is_directory && !stat.is_symlink)?;
        log::info!("Deleted {}", path.display());
        Ok(())
    }

    /// Copies a picked image into `destination` (the current directory when
    /// `None`) under its display name.
    ///
    /// # Returns
    /// * `Ok(Entry)` - The imported image
    /// * `Err(NotepadError)` - `UnsupportedType` for non-images,
    ///   `OutsideRoot`, `AlreadyExists` (the existing file is left alone), or
    ///   a storage failure
    pub fn import_file(
        &self,
        nav: &Navigator,
        picked: &PickedFile,
        destination: Option<&Path>,
    ) -> Result<Entry> {
        let name = if picked.display_name.trim().is_empty() {
            path_util::basename(&picked.source_path)?
        } else {
            picked.display_name.trim().to_string()
        };
        let name = path_util::validate_name(&name)?;

        if EntryKind::for_file_name(&name) != EntryKind::Image {
            return Err(NotepadError::UnsupportedType(name));
        }

        let destination = destination.unwrap_or_else(|| nav.current_directory());
        if !path_util::is_within(nav.root(), destination) {
            return Err(NotepadError::OutsideRoot(destination.to_path_buf()));
        }

        let target = path_util::join(&path_util::normalize(destination), &name);
        if self.storage.stat(&target)?.exists {
            return Err(NotepadError::AlreadyExists(target));
        }

        self.storage.copy(&picked.source_path, &target)?;
        log::info!(
            "Imported {} as {}",
            picked.source_path.display(),
            target.display()
        );

        Entry::new(target, false)
    }

    /// Reads the raw text of a note.
    pub fn read_note(&self, nav: &Navigator, path: &Path) -> Result<String> {
        let path = self.note_path(nav, path)?;
        self.storage.read_text(&path)
    }

    /// Replaces the text of a note. Notes carry no header or metadata.
    pub fn save_note(&self, nav: &Navigator, path: &Path, content: &str) -> Result<()> {
        let path = self.note_path(nav, path)?;
        self.storage.write_text(&path, content)?;
        log::debug!("Saved {} ({} bytes)", path.display(), content.len());
        Ok(())
    }

    fn note_path(&self, nav: &Navigator, path: &Path) -> Result<PathBuf> {
        if !path_util::is_within(nav.root(), path) {
            return Err(NotepadError::OutsideRoot(path.to_path_buf()));
        }
        let name = path_util::basename(path)?;
        if EntryKind::for_file_name(&name) != EntryKind::TextNote {
            return Err(NotepadError::UnsupportedType(name));
        }
        Ok(path_util::normalize(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FsStorage;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn setup() -> (TempDir, Navigator, ItemLifecycle) {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path().join("notes");
        fs::create_dir(&root).unwrap();
        let nav = Navigator::new(&root);
        let lifecycle = ItemLifecycle::new(Arc::new(FsStorage::new()));
        (temp_dir, nav, lifecycle)
    }

    fn picked(path: &Path, name: &str) -> PickedFile {
        PickedFile {
            source_path: path.to_path_buf(),
            display_name: name.to_string(),
        }
    }

    #[test]
    fn test_create_file_appends_suffix() {
        let (_temp, nav, lifecycle) = setup();
        let entry = lifecycle.create_file(&nav, "draft").unwrap();

        assert_eq!(entry.name, "draft.txt");
        assert_eq!(entry.kind, EntryKind::TextNote);
        assert_eq!(fs::read_to_string(&entry.path).unwrap(), "");
    }

    #[test]
    fn test_create_file_keeps_existing_suffix() {
        let (_temp, nav, lifecycle) = setup();
        let entry = lifecycle.create_file(&nav, "Todo.TXT").unwrap();
        assert_eq!(entry.name, "Todo.TXT");
    }

    #[test]
    fn test_create_file_rejects_blank_names() {
        let (_temp, nav, lifecycle) = setup();
        assert!(matches!(lifecycle.create_file(&nav, ""), Err(NotepadError::EmptyName)));
        assert!(matches!(lifecycle.create_file(&nav, "   "), Err(NotepadError::EmptyName)));
    }

    #[test]
    fn test_create_file_rejects_traversal() {
        let (_temp, nav, lifecycle) = setup();
        let result = lifecycle.create_file(&nav, "../escape");
        assert!(matches!(result, Err(NotepadError::InvalidPath(_))));
    }

    #[test]
    fn test_create_file_collision() {
        let (_temp, nav, lifecycle) = setup();
        let entry = lifecycle.create_file(&nav, "draft").unwrap();
        fs::write(&entry.path, "keep me").unwrap();

        let result = lifecycle.create_file(&nav, "draft");
        assert!(matches!(result, Err(NotepadError::AlreadyExists(_))));
        assert_eq!(fs::read_to_string(&entry.path).unwrap(), "keep me");
    }

    #[test]
    fn test_create_file_overwrite_policy() {
        let (_temp, nav, lifecycle) = setup();
        let entry = lifecycle.create_file(&nav, "draft").unwrap();
        fs::write(&entry.path, "old").unwrap();

        lifecycle
            .create_file_with(&nav, "draft", CreatePolicy::Overwrite)
            .unwrap();
        assert_eq!(fs::read_to_string(&entry.path).unwrap(), "");
    }

    #[test]
    fn test_create_file_never_overwrites_folder() {
        let (_temp, nav, lifecycle) = setup();
        fs::create_dir(nav.root().join("odd.txt")).unwrap();

        let result = lifecycle.create_file_with(&nav, "odd", CreatePolicy::Overwrite);
        assert!(matches!(result, Err(NotepadError::AlreadyExists(_))));
    }

    #[test]
    fn test_create_folder() {
        let (_temp, nav, lifecycle) = setup();
        let entry = lifecycle.create_folder(&nav, " Trip ").unwrap();

        assert_eq!(entry.name, "Trip");
        assert!(entry.is_folder());
        assert!(nav.root().join("Trip").is_dir());

        // Existing folder is fine
        let again = lifecycle.create_folder(&nav, "Trip").unwrap();
        assert_eq!(again, entry);
    }

    #[test]
    fn test_create_folder_occupied_by_file() {
        let (_temp, nav, lifecycle) = setup();
        fs::write(nav.root().join("Trip"), "").unwrap();

        let result = lifecycle.create_folder(&nav, "Trip");
        assert!(matches!(result, Err(NotepadError::AlreadyExists(_))));
    }

    #[test]
    fn test_create_in_current_directory() {
        let (_temp, mut nav, lifecycle) = setup();
        let folder = lifecycle.create_folder(&nav, "Trip").unwrap();
        nav.enter(&folder.path).unwrap();

        let note = lifecycle.create_file(&nav, "day1").unwrap();
        assert_eq!(note.path, folder.path.join("day1.txt"));
    }

    #[test]
    fn test_delete_twice_succeeds() {
        let (_temp, nav, lifecycle) = setup();
        let note = lifecycle.create_file(&nav, "draft").unwrap();

        lifecycle.delete_item(&nav, &note.path).unwrap();
        assert!(!note.path.exists());
        lifecycle.delete_item(&nav, &note.path).unwrap();
    }

    #[test]
    fn test_delete_folder_recursively() {
        let (_temp, nav, lifecycle) = setup();
        let folder = nav.root().join("Trip");
        fs::create_dir_all(folder.join("Photos")).unwrap();
        fs::write(folder.join("day1.txt"), "x").unwrap();
        fs::write(folder.join("Photos").join("beach.png"), "x").unwrap();

        lifecycle.delete_item(&nav, &folder).unwrap();
        assert!(!folder.exists());
    }

    #[test]
    fn test_delete_outside_root() {
        let (temp, nav, lifecycle) = setup();
        let outside = temp.path().join("outside.txt");
        fs::write(&outside, "x").unwrap();

        let result = lifecycle.delete_item(&nav, &outside);
        assert!(matches!(result, Err(NotepadError::OutsideRoot(_))));
        assert!(outside.exists());

        let sneaky = nav.root().join("..").join("outside.txt");
        let result = lifecycle.delete_item(&nav, &sneaky);
        assert!(matches!(result, Err(NotepadError::OutsideRoot(_))));
        assert!(outside.exists());
    }

    #[test]
    fn test_delete_root_rejected() {
        let (_temp, nav, lifecycle) = setup();
        let result = lifecycle.delete_item(&nav, nav.root());
        assert!(matches!(result, Err(NotepadError::InvalidPath(_))));
        assert!(nav.root().is_dir());
    }

    #[test]
    fn test_import_image() {
        let (temp, nav, lifecycle) = setup();
        let source = temp.path().join("picker-cache-123");
        fs::write(&source, "png bytes").unwrap();

        let entry = lifecycle
            .import_file(&nav, &picked(&source, "photo.png"), None)
            .unwrap();

        assert_eq!(entry.name, "photo.png");
        assert_eq!(entry.kind, EntryKind::Image);
        assert_eq!(fs::read_to_string(&entry.path).unwrap(), "png bytes");
        assert!(source.exists());
    }

    #[test]
    fn test_import_falls_back_to_source_name() {
        let (temp, nav, lifecycle) = setup();
        let source = temp.path().join("IMG_0001.JPG");
        fs::write(&source, "jpg").unwrap();

        let entry = lifecycle.import_file(&nav, &picked(&source, ""), None).unwrap();
        assert_eq!(entry.name, "IMG_0001.JPG");
    }

    #[test]
    fn test_import_collision_keeps_original() {
        let (temp, nav, lifecycle) = setup();
        fs::write(nav.root().join("photo.png"), "original").unwrap();
        let source = temp.path().join("photo.png");
        fs::write(&source, "new").unwrap();

        let result = lifecycle.import_file(&nav, &picked(&source, "photo.png"), None);
        assert!(matches!(result, Err(NotepadError::AlreadyExists(_))));
        assert_eq!(fs::read_to_string(nav.root().join("photo.png")).unwrap(), "original");
    }

    #[test]
    fn test_import_rejects_non_images() {
        let (temp, nav, lifecycle) = setup();
        let source = temp.path().join("report.pdf");
        fs::write(&source, "pdf").unwrap();

        let result = lifecycle.import_file(&nav, &picked(&source, "report.pdf"), None);
        assert!(matches!(result, Err(NotepadError::UnsupportedType(_))));
    }

    #[test]
    fn test_import_into_explicit_destination() {
        let (temp, nav, lifecycle) = setup();
        let folder = lifecycle.create_folder(&nav, "Photos").unwrap();
        let source = temp.path().join("beach.heic");
        fs::write(&source, "heic").unwrap();

        let entry = lifecycle
            .import_file(&nav, &picked(&source, "beach.heic"), Some(&folder.path))
            .unwrap();
        assert_eq!(entry.path, folder.path.join("beach.heic"));

        let result = lifecycle.import_file(&nav, &picked(&source, "x.png"), Some(temp.path()));
        assert!(matches!(result, Err(NotepadError::OutsideRoot(_))));
    }

    #[test]
    fn test_read_and_save_note() {
        let (_temp, nav, lifecycle) = setup();
        let note = lifecycle.create_file(&nav, "draft").unwrap();

        lifecycle.save_note(&nav, &note.path, "first line\nsecond").unwrap();
        assert_eq!(lifecycle.read_note(&nav, &note.path).unwrap(), "first line\nsecond");

        let result = lifecycle.read_note(&nav, &nav.root().join("photo.png"));
        assert!(matches!(result, Err(NotepadError::UnsupportedType(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_delete_dangling_symlink() {
        let (temp, nav, lifecycle) = setup();
        let link = nav.root().join("stale.txt");
        std::os::unix::fs::symlink(temp.path().join("gone.txt"), &link).unwrap();

        lifecycle.delete_item(&nav, &link).unwrap();
        assert!(fs::symlink_metadata(&link).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_delete_linked_folder_keeps_target() {
        let (temp, nav, lifecycle) = setup();
        let outside = temp.path().join("outside");
        fs::create_dir(&outside).unwrap();
        fs::write(outside.join("keep.txt"), "x").unwrap();
        let link = nav.root().join("Linked");
        std::os::unix::fs::symlink(&outside, &link).unwrap();

        lifecycle.delete_item(&nav, &link).unwrap();
        assert!(fs::symlink_metadata(&link).is_err());
        assert!(outside.join("keep.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_create_file_does_not_write_through_symlink() {
        let (temp, nav, lifecycle) = setup();
        let escaped = temp.path().join("escaped.txt");
        std::os::unix::fs::symlink(&escaped, nav.root().join("draft.txt")).unwrap();

        let result = lifecycle.create_file(&nav, "draft");
        assert!(matches!(result, Err(NotepadError::AlreadyExists(_))));
        let result = lifecycle.create_file_with(&nav, "draft", CreatePolicy::Overwrite);
        assert!(matches!(result, Err(NotepadError::AlreadyExists(_))));
        assert!(!escaped.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_save_note_refuses_symlink() {
        let (temp, nav, lifecycle) = setup();
        let escaped = temp.path().join("escaped.txt");
        fs::write(&escaped, "original").unwrap();
        let link = nav.root().join("linked.txt");
        std::os::unix::fs::symlink(&escaped, &link).unwrap();

        assert!(lifecycle.save_note(&nav, &link, "changed").is_err());
        assert_eq!(fs::read_to_string(&escaped).unwrap(), "original");
    }
}
