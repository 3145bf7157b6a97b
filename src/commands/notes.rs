use std::path::Path;

use crate::commands::failure;
use crate::lifecycle::CreatePolicy;
use crate::models::{ApiResult, Entry};
use crate::session::Session;

/// Creates an empty note in the current directory.
///
/// # Arguments
/// * `name` - Note name; `.txt` is added when missing
/// * `overwrite` - Replace an existing note of the same name instead of
///   failing
pub fn create_note(session: &mut Session, name: &str, overwrite: bool) -> ApiResult {
    let policy = if overwrite {
        CreatePolicy::Overwrite
    } else {
        CreatePolicy::Reject
    };

    match session.create_file_with(name, policy) {
        Ok(entry) => {
            let route = session.open_entry(&entry).ok().flatten();
            ApiResult {
                entry: Some(entry),
                route,
                ..ApiResult::with_listing(session.listing().clone())
            }
        }
        Err(e) => failure(e),
    }
}

/// Opens an entry from the listing.
///
/// Notes and images come back with a route for the editor or viewer.
/// Folders are entered and come back with their listing.
pub fn open_item(session: &mut Session, entry: &Entry) -> ApiResult {
    match session.open_entry(entry) {
        Ok(Some(route)) => ApiResult {
            route: Some(route),
            ..ApiResult::with_listing(session.listing().clone())
        },
        Ok(None) => ApiResult::notice(format!("{} cannot be opened", entry.name)),
        Err(e) => failure(e),
    }
}

/// Reads the text of a note for the editor.
pub fn read_note(session: &Session, path: &Path) -> ApiResult {
    match session.read_note(path) {
        Ok(content) => ApiResult::with_content(content),
        Err(e) => failure(e),
    }
}

/// Saves the editor's text back to the note.
pub fn save_note(session: &Session, path: &Path, content: &str) -> ApiResult {
    match session.save_note(path, content) {
        Ok(()) => ApiResult::success(),
        Err(e) => failure(e),
    }
}
