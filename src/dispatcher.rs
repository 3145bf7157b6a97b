use crate::models::{Entry, EntryKind, RouteTarget};

/// Decides which screen opens an entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher;

impl Dispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Re-derives the kind of `entry` from its name. Folders stay folders.
    pub fn classify(&self, entry: &Entry) -> EntryKind {
        if entry.is_folder() {
            EntryKind::Folder
        } else {
            EntryKind::for_file_name(&entry.name)
        }
    }

    /// Maps an entry to the screen that should receive it.
    ///
    /// Listings never contain unsupported files, so `None` only shows up
    /// for entries built by hand; callers treat it as "do nothing".
    pub fn route(&self, entry: &Entry) -> Option<RouteTarget> {
        let path = entry.path.clone();
        match self.classify(entry) {
            EntryKind::TextNote => Some(RouteTarget::NoteEditor { path }),
            EntryKind::Image => Some(RouteTarget::ImageViewer { path }),
            EntryKind::Folder => Some(RouteTarget::Folder { path }),
            EntryKind::Unsupported => {
                log::warn!("No screen for {}", entry.path.display());
                None
            }
        }
    }
}
