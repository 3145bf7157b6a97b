use std::path::Path;
use std::sync::Arc;

use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::filesystem::FileSystem;
use crate::index::DirectoryIndex;
use crate::lifecycle::{CreatePolicy, ItemLifecycle};
use crate::models::{DirectoryListing, Entry, PickedFile, RouteTarget};
use crate::navigator::Navigator;
use crate::path_util;
use crate::services::{DocumentConverter, Exporter, FilePicker, ShareOutcome, ShareService};
use crate::storage::Storage;

/// Platform collaborators handed to a session.
#[derive(Clone)]
pub struct Services {
    pub picker: Arc<dyn FilePicker>,
    pub share: Arc<dyn ShareService>,
    pub converter: Arc<dyn DocumentConverter>,
}

/// One run of the browser: where the user is and what they are looking at.
///
/// Every operation that changes the tree or the current directory re-lists
/// before returning, so [`Session::listing`] always reflects the latest
/// state. Failed operations leave the current directory and listing as they
/// were.
pub struct Session {
    filesystem: FileSystem,
    navigator: Navigator,
    index: DirectoryIndex,
    lifecycle: ItemLifecycle,
    dispatcher: Dispatcher,
    exporter: Exporter,
    picker: Arc<dyn FilePicker>,
    listing: DirectoryListing,
}

impl Session {
    /// Creates the notes root if needed and starts at it.
    ///
    /// # Arguments
    /// * `filesystem` - Data layout; its notes directory becomes the root
    /// * `storage` - Storage used for all browsing and lifecycle operations
    /// * `services` - Picker, share sheet and PDF converter
    pub fn open(
        filesystem: FileSystem,
        storage: Arc<dyn Storage>,
        services: Services,
    ) -> Result<Self> {
        filesystem.ensure_directories()?;

        let navigator = Navigator::new(&filesystem.notes_dir);
        let index = DirectoryIndex::new(Arc::clone(&storage));
        let lifecycle = ItemLifecycle::new(storage);
        let exporter = Exporter::new(lifecycle.clone(), services.share, services.converter);
        let listing = index.list(navigator.current_directory())?;

        log::info!("Opened notes at {}", navigator.root().display());

        Ok(Self {
            filesystem,
            navigator,
            index,
            lifecycle,
            dispatcher: Dispatcher::new(),
            exporter,
            picker: services.picker,
            listing,
        })
    }

    pub fn filesystem(&self) -> &FileSystem {
        &self.filesystem
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// The listing of the current directory as of the last refresh.
    pub fn listing(&self) -> &DirectoryListing {
        &self.listing
    }

    /// Re-lists the current directory.
    pub fn refresh(&mut self) -> Result<&DirectoryListing> {
        self.listing = self.index.list(self.navigator.current_directory())?;
        Ok(&self.listing)
    }

    /// Enters `folder` and lists it.
    pub fn enter(&mut self, folder: &Path) -> Result<&DirectoryListing> {
        self.navigate(|nav| nav.enter(folder))
    }

    /// Goes to the parent directory; at the root this just re-lists.
    pub fn up(&mut self) -> Result<&DirectoryListing> {
        self.navigate(|nav| {
            nav.up();
            Ok(())
        })
    }

    /// Jumps to an absolute path under the root.
    pub fn jump_to(&mut self, path: &Path) -> Result<&DirectoryListing> {
        self.navigate(|nav| nav.jump_to(path))
    }

    /// Jumps to a bookmark stored relative to the root.
    pub fn jump_to_bookmark(&mut self, bookmark: &str) -> Result<&DirectoryListing> {
        let path = path_util::join(self.navigator.root(), bookmark);
        self.jump_to(&path)
    }

    /// Creates an empty note in the current directory.
    pub fn create_file(&mut self, name: &str) -> Result<Entry> {
        self.create_file_with(name, CreatePolicy::Reject)
    }

    pub fn create_file_with(&mut self, name: &str, policy: CreatePolicy) -> Result<Entry> {
        let entry = self.lifecycle.create_file_with(&self.navigator, name, policy)?;
        self.refresh()?;
        Ok(entry)
    }

    /// Creates a folder in the current directory.
    pub fn create_folder(&mut self, name: &str) -> Result<Entry> {
        let entry = self.lifecycle.create_folder(&self.navigator, name)?;
        self.refresh()?;
        Ok(entry)
    }

    /// Deletes a file or folder. The caller is responsible for having asked
    /// the user first.
    ///
    /// If the current directory was inside the deleted folder the browser
    /// moves to that folder's parent.
    pub fn delete_item(&mut self, path: &Path) -> Result<()> {
        self.lifecycle.delete_item(&self.navigator, path)?;
        self.navigator.retreat_from(path);
        self.refresh()?;
        Ok(())
    }

    /// Copies an already picked image into `destination`, or the current
    /// directory.
    pub fn import_file(&mut self, picked: &PickedFile, destination: Option<&Path>) -> Result<Entry> {
        let entry = self.lifecycle.import_file(&self.navigator, picked, destination)?;
        self.refresh()?;
        Ok(entry)
    }

    /// Asks the picker for an image and imports it into the current
    /// directory. Returns `Ok(None)` when the user cancels.
    pub fn import_from_picker(&mut self) -> Result<Option<Entry>> {
        let Some(picked) = self.picker.pick()? else {
            log::debug!("Image import cancelled");
            return Ok(None);
        };
        self.import_file(&picked, None).map(Some)
    }

    /// Opens an entry.
    ///
    /// Folders are entered (and listed) here; notes and images are handed
    /// back as a route for the routing layer to present.
    pub fn open_entry(&mut self, entry: &Entry) -> Result<Option<RouteTarget>> {
        let route = self.dispatcher.route(entry);
        if let Some(RouteTarget::Folder { path }) = &route {
            self.enter(path)?;
        }
        Ok(route)
    }

    pub fn read_note(&self, path: &Path) -> Result<String> {
        self.lifecycle.read_note(&self.navigator, path)
    }

    pub fn save_note(&self, path: &Path, content: &str) -> Result<()> {
        self.lifecycle.save_note(&self.navigator, path, content)
    }

    /// Shares a note as PDF or an image as-is.
    pub fn share(&self, entry: &Entry) -> Result<ShareOutcome> {
        self.exporter.share(&self.navigator, entry)
    }

    /// Applies a navigation step and lists the result, rolling back if
    /// either part fails.
    fn navigate<F>(&mut self, step: F) -> Result<&DirectoryListing>
    where
        F: FnOnce(&mut Navigator) -> Result<()>,
    {
        let mut navigator = self.navigator.clone();
        step(&mut navigator)?;
        let listing = self.index.list(navigator.current_directory())?;

        self.navigator = navigator;
        self.listing = listing;
        Ok(&self.listing)
    }
}
