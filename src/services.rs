use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{NotepadError, Result};
use crate::lifecycle::ItemLifecycle;
use crate::models::{Entry, EntryKind, PickedFile};
use crate::navigator::Navigator;
use crate::path_util;

/// MIME type used when sharing a converted note
pub const PDF_MIME: &str = "application/pdf";

/// The platform document picker.
pub trait FilePicker: Send + Sync {
    /// Asks the user for an image. `Ok(None)` means the user cancelled.
    fn pick(&self) -> Result<Option<PickedFile>>;
}

/// The platform share sheet.
pub trait ShareService: Send + Sync {
    fn is_available(&self) -> bool;
    fn share(&self, path: &Path, mime_type: &str) -> Result<()>;
}

/// Turns note text into a printable document.
pub trait DocumentConverter: Send + Sync {
    /// Returns the path of the generated PDF.
    fn text_to_pdf(&self, text: &str) -> std::result::Result<PathBuf, String>;
}

/// How a share request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The share sheet was shown for this artifact
    Shared { path: PathBuf, mime_type: String },
    /// Another share was still running; nothing was invoked
    AlreadyInProgress,
}

/// Allows at most one share at a time.
///
/// Rapid repeated taps on "share" would otherwise open the share sheet
/// several times for the same note.
#[derive(Debug, Default)]
pub struct ShareGuard {
    in_flight: AtomicBool,
}

impl ShareGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the guard, or returns `None` when a share is already running.
    /// The guard is released when the returned ticket is dropped.
    pub fn try_begin(&self) -> Option<ShareTicket<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| ShareTicket { guard: self })
    }

    pub fn is_sharing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Held for the duration of one share.
#[derive(Debug)]
pub struct ShareTicket<'a> {
    guard: &'a ShareGuard,
}

impl Drop for ShareTicket<'_> {
    fn drop(&mut self) {
        self.guard.in_flight.store(false, Ordering::SeqCst);
    }
}

/// Shares notes (as PDF) and images through the platform services.
pub struct Exporter {
    lifecycle: ItemLifecycle,
    share: Arc<dyn ShareService>,
    converter: Arc<dyn DocumentConverter>,
    guard: ShareGuard,
}

impl Exporter {
    pub fn new(
        lifecycle: ItemLifecycle,
        share: Arc<dyn ShareService>,
        converter: Arc<dyn DocumentConverter>,
    ) -> Self {
        Self {
            lifecycle,
            share,
            converter,
            guard: ShareGuard::new(),
        }
    }

    pub fn is_sharing(&self) -> bool {
        self.guard.is_sharing()
    }

    /// Shares `entry`.
    ///
    /// Notes are converted to PDF first; images are shared as they are.
    ///
    /// # Returns
    /// * `Ok(ShareOutcome)` - Shared, or skipped because a share is running
    /// * `Err(NotepadError)` - `ServiceUnavailable` when the device has no
    ///   share sheet, `OutsideRoot`, `ConversionFailed`, `UnsupportedType` for
    ///   folders, or a storage failure while reading the note
    pub fn share(&self, nav: &Navigator, entry: &Entry) -> Result<ShareOutcome> {
        let Some(_ticket) = self.guard.try_begin() else {
            log::debug!("Share already in progress, ignoring {}", entry.path.display());
            return Ok(ShareOutcome::AlreadyInProgress);
        };

        if !self.share.is_available() {
            return Err(NotepadError::ServiceUnavailable("Sharing".to_string()));
        }

        if !path_util::is_within(nav.root(), &entry.path) {
            log::warn!("Rejected share outside root: {}", entry.path.display());
            return Err(NotepadError::OutsideRoot(entry.path.clone()));
        }

        let (path, mime_type) = match entry.kind {
            EntryKind::TextNote => {
                let text = self.lifecycle.read_note(nav, &entry.path)?;
                let pdf = self
                    .converter
                    .text_to_pdf(&text)
                    .map_err(NotepadError::ConversionFailed)?;
                (pdf, PDF_MIME.to_string())
            }
            EntryKind::Image => {
                let mime = mime_guess::from_path(&entry.path)
                    .first_or_octet_stream()
                    .to_string();
                (entry.path.clone(), mime)
            }
            EntryKind::Folder | EntryKind::Unsupported => {
                return Err(NotepadError::UnsupportedType(entry.name.clone()));
            }
        };

        self.share.share(&path, &mime_type)?;
        log::info!("Shared {} as {}", path.display(), mime_type);

        Ok(ShareOutcome::Shared { path, mime_type })
    }
}
