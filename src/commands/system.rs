use std::path::Path;

use crate::commands::failure;
use crate::models::{ApiResult, Entry, PickedFile};
use crate::services::ShareOutcome;
use crate::session::Session;

/// Asks the document picker for an image and copies it into the current
/// directory.
///
/// Cancelling the picker is not an error: the result is a plain success
/// without an entry.
pub fn import_image(session: &mut Session) -> ApiResult {
    match session.import_from_picker() {
        Ok(Some(entry)) => ApiResult {
            entry: Some(entry),
            ..ApiResult::with_listing(session.listing().clone())
        },
        Ok(None) => ApiResult::success(),
        Err(e) => failure(e),
    }
}

/// Copies a file the picker already returned into `destination`, or the
/// current directory.
pub fn import_picked_file(
    session: &mut Session,
    picked: &PickedFile,
    destination: Option<&Path>,
) -> ApiResult {
    match session.import_file(picked, destination) {
        Ok(entry) => ApiResult {
            entry: Some(entry),
            ..ApiResult::with_listing(session.listing().clone())
        },
        Err(e) => failure(e),
    }
}

/// Shares a note (as PDF) or an image.
///
/// A missing share sheet comes back as a notice. So does a tap while a
/// previous share is still open; nothing is shared for it.
pub fn share_item(session: &Session, entry: &Entry) -> ApiResult {
    share_result(session.share(entry))
}

fn share_result(outcome: crate::error::Result<ShareOutcome>) -> ApiResult {
    match outcome {
        Ok(ShareOutcome::Shared { .. }) => ApiResult::success(),
        Ok(ShareOutcome::AlreadyInProgress) => {
            ApiResult::notice("A share is already in progress")
        }
        Err(e) => failure(e),
    }
}
