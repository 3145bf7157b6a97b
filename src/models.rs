use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::path_util;

/// Extensions opened in the note editor
pub const NOTE_EXTENSIONS: &[&str] = &["txt"];
/// Extensions opened in the image viewer and accepted by import
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "heic"];

/// What kind of item an entry is, as far as the browser cares.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum EntryKind {
    Folder,
    TextNote,
    Image,
    Unsupported,
}

impl EntryKind {
    /// Classifies a file (not a directory) by its final extension,
    /// case-insensitively.
    pub fn for_file_name(name: &str) -> Self {
        let ext = path_util::extension(name);
        if NOTE_EXTENSIONS.contains(&ext.as_str()) {
            EntryKind::TextNote
        } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            EntryKind::Image
        } else {
            EntryKind::Unsupported
        }
    }

    pub fn is_supported(self) -> bool {
        self != EntryKind::Unsupported
    }
}

/// One classified filesystem object surfaced by a listing.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub name: String,
    pub kind: EntryKind,
}

impl Entry {
    /// Builds an entry for `path`, deriving its name from the basename.
    pub fn new(path: impl Into<PathBuf>, is_directory: bool) -> Result<Self> {
        let path = path.into();
        let name = path_util::basename(&path)?;
        let kind = if is_directory {
            EntryKind::Folder
        } else {
            EntryKind::for_file_name(&name)
        };

        Ok(Self { path, name, kind })
    }

    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }
}

/// Direct children of one directory, split into folders and files.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    pub directory: PathBuf,
    pub folders: Vec<Entry>,
    pub files: Vec<Entry>,
}

impl DirectoryListing {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }

    /// Looks up a direct child by name, folders first.
    pub fn find(&self, name: &str) -> Option<&Entry> {
        self.folders
            .iter()
            .chain(self.files.iter())
            .find(|entry| entry.name == name)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.folders.iter().chain(self.files.iter())
    }
}

/// Where the routing layer should take the user after an "open" action.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "target", rename_all = "camelCase")]
pub enum RouteTarget {
    NoteEditor { path: PathBuf },
    ImageViewer { path: PathBuf },
    Folder { path: PathBuf },
}

impl RouteTarget {
    pub fn path(&self) -> &Path {
        match self {
            RouteTarget::NoteEditor { path }
            | RouteTarget::ImageViewer { path }
            | RouteTarget::Folder { path } => path,
        }
    }
}

/// A file chosen through the platform document picker.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PickedFile {
    pub source_path: PathBuf,
    pub display_name: String,
}

/// Generic result returned by every command
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<Entry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing: Option<DirectoryListing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_directory: Option<PathBuf>,
}

impl ApiResult {
    /// Create a successful result
    pub fn success() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    /// Create an error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Create a non-fatal notice, e.g. when sharing is not available
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            success: false,
            notice: Some(message.into()),
            ..Default::default()
        }
    }

    /// Create a success result carrying a refreshed listing
    pub fn with_listing(listing: DirectoryListing) -> Self {
        Self {
            success: true,
            current_directory: Some(listing.directory.clone()),
            listing: Some(listing),
            ..Default::default()
        }
    }

    /// Create a success result with note content
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            success: true,
            content: Some(content.into()),
            ..Default::default()
        }
    }
}

/// Application configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Overrides the default `{data_dir}/notes` root when set
    pub notes_root: Option<PathBuf>,
    /// Saved folders, relative to the notes root
    pub bookmarks: Vec<String>,
    /// Whether the UI should ask before deleting
    pub confirm_delete: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notes_root: None,
            bookmarks: vec![],
            confirm_delete: true,
        }
    }
}
