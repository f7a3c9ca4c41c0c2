//! OS clipboard access.

use crate::record::DetectedCode;

/// Errors that can occur when writing to the clipboard.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    /// No clipboard is available (e.g. headless session)
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    /// The write itself failed
    #[error("Failed to write to clipboard: {0}")]
    WriteFailed(String),
}

/// Abstraction over copying text to the clipboard.
///
/// A trait seam so user-action tests can run without a windowing system.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard backed by arboard.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        let inner =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner
            .set_text(text)
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
    }
}

/// Auto-copy a published batch: every record is copied in publication order,
/// so the clipboard ends up holding the batch's newest payload.
pub fn copy_payloads(
    records: &[DetectedCode],
    clipboard: &mut dyn Clipboard,
) -> Result<(), ClipboardError> {
    for record in records {
        clipboard.set_text(&record.content)?;
    }
    Ok(())
}
