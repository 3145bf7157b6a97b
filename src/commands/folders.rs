use std::path::Path;

use crate::commands::failure;
use crate::config::ConfigManager;
use crate::models::ApiResult;
use crate::session::Session;

/// Lists the current directory again.
///
/// Use after the screen regains focus or whenever the caller suspects the
/// tree changed outside the browser.
pub fn list_directory(session: &mut Session) -> ApiResult {
    match session.refresh() {
        Ok(listing) => ApiResult::with_listing(listing.clone()),
        Err(e) => failure(e),
    }
}

/// Opens a folder and returns its listing.
///
/// # Arguments
/// * `folder` - Absolute path of a folder under the notes root
pub fn enter_folder(session: &mut Session, folder: &Path) -> ApiResult {
    match session.enter(folder) {
        Ok(listing) => ApiResult::with_listing(listing.clone()),
        Err(e) => failure(e),
    }
}

/// Goes one level up. At the root this returns the root listing again.
pub fn go_up(session: &mut Session) -> ApiResult {
    match session.up() {
        Ok(listing) => ApiResult::with_listing(listing.clone()),
        Err(e) => failure(e),
    }
}

/// Reopens a bookmarked folder.
///
/// # Arguments
/// * `bookmark` - Folder path relative to the notes root
pub fn jump_to_bookmark(session: &mut Session, bookmark: &str) -> ApiResult {
    match session.jump_to_bookmark(bookmark) {
        Ok(listing) => ApiResult::with_listing(listing.clone()),
        Err(e) => failure(e),
    }
}

/// Creates a folder in the current directory.
pub fn create_folder(session: &mut Session, name: &str) -> ApiResult {
    match session.create_folder(name) {
        Ok(entry) => ApiResult {
            entry: Some(entry),
            ..ApiResult::with_listing(session.listing().clone())
        },
        Err(e) => failure(e),
    }
}

/// Deletes a note, image or folder (with its contents).
///
/// # Arguments
/// * `config` - Decides whether a confirmation is required at all
/// * `path` - The item to delete
/// * `confirmed` - Whether the user accepted the confirmation dialog; when
///   `confirm_delete` is on, nothing is deleted otherwise
pub fn delete_item(
    session: &mut Session,
    config: &ConfigManager,
    path: &Path,
    confirmed: bool,
) -> ApiResult {
    if config.confirm_delete() && !confirmed {
        return ApiResult::notice(format!("Deleting {} needs confirmation", path.display()));
    }

    match session.delete_item(path) {
        Ok(()) => ApiResult::with_listing(session.listing().clone()),
        Err(e) => failure(e),
    }
}
