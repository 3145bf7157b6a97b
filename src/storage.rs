use std::fs;
use std::io;
use std::path::Path;

use crate::error::{NotepadError, Result};

/// One direct child returned by [`Storage::read_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirChild {
    pub name: String,
    pub is_directory: bool,
}

/// Result of [`Storage::stat`]. A missing path is not an error.
///
/// A symbolic link exists even when its target does not; `is_directory`
/// describes the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stat {
    pub exists: bool,
    pub is_directory: bool,
    pub is_symlink: bool,
}

/// The device storage the browser works against.
///
/// All calls block until the underlying operation completes. Failures carry
/// the path that was being touched.
pub trait Storage: Send + Sync {
    fn read_dir(&self, path: &Path) -> Result<Vec<DirChild>>;
    fn stat(&self, path: &Path) -> Result<Stat>;
    fn write_text(&self, path: &Path, content: &str) -> Result<()>;
    fn read_text(&self, path: &Path) -> Result<String>;
    fn copy(&self, from: &Path, to: &Path) -> Result<()>;
    fn mkdir(&self, path: &Path) -> Result<()>;
    fn delete(&self, path: &Path, recursive: bool) -> Result<()>;
}

/// [`Storage`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl FsStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for FsStorage {
    fn read_dir(&self, path: &Path) -> Result<Vec<DirChild>> {
        let entries = fs::read_dir(path).map_err(|e| NotepadError::storage(path, e))?;

        let mut children = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| NotepadError::storage(path, e))?;
            // Follows symlinks so a linked folder browses like a folder
            let is_directory = entry.path().is_dir();
            children.push(DirChild {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_directory,
            });
        }

        Ok(children)
    }

    fn stat(&self, path: &Path) -> Result<Stat> {
        let metadata = match fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Stat::default()),
            Err(e) => return Err(NotepadError::storage(path, e)),
        };

        if metadata.file_type().is_symlink() {
            // Dangling links still exist; they just aren't folders
            let is_directory = fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false);
            return Ok(Stat {
                exists: true,
                is_directory,
                is_symlink: true,
            });
        }

        Ok(Stat {
            exists: true,
            is_directory: metadata.is_dir(),
            is_symlink: false,
        })
    }

    fn write_text(&self, path: &Path, content: &str) -> Result<()> {
        refuse_symlink(path)?;
        fs::write(path, content).map_err(|e| NotepadError::storage(path, e))
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| NotepadError::storage(path, e))
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        let mut source = fs::File::open(from).map_err(|e| NotepadError::storage(from, e))?;
        refuse_symlink(to)?;
        let mut target = fs::File::create(to).map_err(|e| NotepadError::storage(to, e))?;
        io::copy(&mut source, &mut target)
            .map(|_| ())
            .map_err(|e| NotepadError::storage(to, e))
    }

    fn mkdir(&self, path: &Path) -> Result<()> {
        fs::create_dir(path).map_err(|e| NotepadError::storage(path, e))
    }

    fn delete(&self, path: &Path, recursive: bool) -> Result<()> {
        let metadata = match fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(NotepadError::storage(path, e)),
        };

        let result = if metadata.is_dir() {
            if recursive {
                fs::remove_dir_all(path)
            } else {
                fs::remove_dir(path)
            }
        } else {
            fs::remove_file(path)
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(NotepadError::storage(path, e)),
        }
    }
}

/// Writes never follow a link, so a link inside the root cannot redirect
/// them elsewhere.
fn refuse_symlink(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_symlink() => Err(NotepadError::storage(
            path,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "refusing to write through a symbolic link",
            ),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_stat_missing_path() {
        let temp_dir = tempdir().unwrap();
        let stat = FsStorage.stat(&temp_dir.path().join("missing")).unwrap();
        assert!(!stat.exists);
        assert!(!stat.is_directory);
    }

    #[test]
    fn test_write_then_read_text() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("note.txt");

        FsStorage.write_text(&path, "hello\nworld").unwrap();
        assert_eq!(FsStorage.read_text(&path).unwrap(), "hello\nworld");

        let stat = FsStorage.stat(&path).unwrap();
        assert!(stat.exists);
        assert!(!stat.is_directory);
    }

    #[test]
    fn test_read_dir_reports_directories() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("Trip")).unwrap();
        fs::write(temp_dir.path().join("a.txt"), "").unwrap();

        let mut children = FsStorage.read_dir(temp_dir.path()).unwrap();
        children.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(
            children,
            vec![
                DirChild { name: "Trip".into(), is_directory: true },
                DirChild { name: "a.txt".into(), is_directory: false },
            ]
        );
    }

    #[test]
    fn test_read_dir_missing_is_storage_error() {
        let temp_dir = tempdir().unwrap();
        let result = FsStorage.read_dir(&temp_dir.path().join("missing"));
        assert!(matches!(result, Err(NotepadError::Storage { .. })));
    }

    #[test]
    fn test_mkdir_does_not_create_intermediates() {
        let temp_dir = tempdir().unwrap();
        let result = FsStorage.mkdir(&temp_dir.path().join("a").join("b"));
        assert!(result.is_err());
    }

    #[test]
    fn test_delete_recursive_and_missing() {
        let temp_dir = tempdir().unwrap();
        let folder = temp_dir.path().join("Trip");
        fs::create_dir_all(folder.join("inner")).unwrap();
        fs::write(folder.join("inner").join("day1.txt"), "x").unwrap();

        FsStorage.delete(&folder, true).unwrap();
        assert!(!folder.exists());

        // Already gone
        FsStorage.delete(&folder, true).unwrap();
    }

    #[test]
    fn test_delete_non_recursive_refuses_full_folder() {
        let temp_dir = tempdir().unwrap();
        let folder = temp_dir.path().join("Trip");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("day1.txt"), "x").unwrap();

        assert!(FsStorage.delete(&folder, false).is_err());
        assert!(folder.exists());
    }

    #[test]
    fn test_copy_reports_destination_on_write_failure() {
        let temp_dir = tempdir().unwrap();
        let source = temp_dir.path().join("beach.png");
        fs::write(&source, "png").unwrap();
        let target = temp_dir.path().join("missing").join("beach.png");

        match FsStorage.copy(&source, &target) {
            Err(NotepadError::Storage { path, .. }) => assert_eq!(path, target),
            other => panic!("expected storage error, got {:?}", other),
        }
    }

    #[test]
    fn test_copy_reports_source_when_missing() {
        let temp_dir = tempdir().unwrap();
        let source = temp_dir.path().join("gone.png");
        let target = temp_dir.path().join("beach.png");

        match FsStorage.copy(&source, &target) {
            Err(NotepadError::Storage { path, .. }) => assert_eq!(path, source),
            other => panic!("expected storage error, got {:?}", other),
        }
        assert!(!target.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_stat_sees_dangling_symlink() {
        let temp_dir = tempdir().unwrap();
        let link = temp_dir.path().join("stale.txt");
        std::os::unix::fs::symlink(temp_dir.path().join("gone.txt"), &link).unwrap();

        let stat = FsStorage.stat(&link).unwrap();
        assert!(stat.exists);
        assert!(stat.is_symlink);
        assert!(!stat.is_directory);
    }

    #[cfg(unix)]
    #[test]
    fn test_stat_follows_linked_folder() {
        let temp_dir = tempdir().unwrap();
        let target = temp_dir.path().join("Trip");
        fs::create_dir(&target).unwrap();
        let link = temp_dir.path().join("Linked");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let stat = FsStorage.stat(&link).unwrap();
        assert!(stat.is_symlink);
        assert!(stat.is_directory);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_text_refuses_symlink() {
        let temp_dir = tempdir().unwrap();
        let outside = temp_dir.path().join("escaped.txt");
        let link = temp_dir.path().join("draft.txt");
        std::os::unix::fs::symlink(&outside, &link).unwrap();

        assert!(FsStorage.write_text(&link, "x").is_err());
        assert!(!outside.exists());
    }
}
