//! System clipboard access through `arboard`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard backend error: {0}")]
    Backend(#[from] arboard::Error),
}

/// Destination for text copied out of an application.
pub trait ClipboardSink: std::fmt::Debug {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The real system clipboard. A fresh handle is opened per write so a missing
/// display server only fails the copy, not startup.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        set(text)
    }
}

/// Set the system clipboard to `text`.
pub fn set(text: &str) -> Result<(), ClipboardError> {
    let mut cb = arboard::Clipboard::new()?;
    cb.set_text(text.to_owned()).map_err(ClipboardError::from)
}
