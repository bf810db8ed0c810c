use crate::clipboard::Clipboard;
use crate::format::TimestampFormatter;
use std::sync::{Arc, Mutex};

/// A [`Clipboard`] that keeps every copied text in memory.
///
/// Clones share the same storage, so a test can hand one clone to the
/// session and inspect the copies through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    copies: Arc<Mutex<Vec<String>>>,
}

impl MemoryClipboard {
    /// Returns all texts copied so far, oldest first.
    pub fn copies(&self) -> Vec<String> {
        self.copies
            .lock()
            .unwrap_or_else(|copies| copies.into_inner())
            .clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&mut self, text: &str) {
        self.copies
            .lock()
            .unwrap_or_else(|copies| copies.into_inner())
            .push(text.to_string());
    }
}

/// A [`TimestampFormatter`] that prints the raw epoch milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct EpochFormatter;

impl TimestampFormatter for EpochFormatter {
    fn format(&self, epoch_millis: i64) -> String {
        format!("t={epoch_millis}")
    }
}
