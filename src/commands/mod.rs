//! The command surface the UI layer calls into.
//!
//! Every command returns an [`ApiResult`]: failures are flattened into an
//! error message, and unavailable platform services into a notice.

pub mod folders;
pub mod notes;
pub mod system;

pub use folders::*;
pub use notes::*;
pub use system::*;

use crate::error::NotepadError;
use crate::models::ApiResult;

pub(crate) fn failure(error: NotepadError) -> ApiResult {
    if error.is_notice() {
        log::info!("{}", error);
        ApiResult::notice(error.to_string())
    } else {
        log::warn!("Command failed: {}", error);
        ApiResult::error(error.to_string())
    }
}
