//! Clipboard integration
//!
//! `ClipboardWriter` is the primary write path. `LegacyCopy` is the copy
//! command a document runs against its current selection, used as the
//! fallback when the primary path is unavailable.

use crate::{LinkTextError, Result};
use arboard::Clipboard;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::debug;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Primary clipboard write API
pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Legacy "copy the current selection" command
pub trait LegacyCopy {
    fn exec_copy(&mut self, selection: &str) -> Result<()>;
}

/// System clipboard
///
/// The handle is opened lazily so a headless session only fails when a
/// write is attempted.
#[derive(Default)]
pub struct SystemClipboard {
    clipboard: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        debug!("Copying {} chars to clipboard", text.len());

        if self.clipboard.is_none() {
            let clipboard = Clipboard::new()
                .map_err(|e| LinkTextError::Clipboard(format!("Failed to open clipboard: {}", e)))?;
            self.clipboard = Some(clipboard);
        }

        let clipboard = self
            .clipboard
            .as_mut()
            .ok_or_else(|| LinkTextError::Clipboard("clipboard unavailable".into()))?;
        clipboard
            .set_text(text)
            .map_err(|e| LinkTextError::Clipboard(format!("Failed to copy to clipboard: {}", e)))
    }
}

/// Copy through the terminal with an OSC 52 escape sequence
pub struct Osc52Copy<W: Write> {
    out: W,
}

impl<W: Write> Osc52Copy<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> LegacyCopy for Osc52Copy<W> {
    fn exec_copy(&mut self, selection: &str) -> Result<()> {
        if selection.is_empty() {
            return Err(LinkTextError::Clipboard("nothing selected".into()));
        }
        let payload = STANDARD.encode(selection);
        write!(self.out, "\x1b]52;c;{}\x07", payload)?;
        self.out.flush()?;
        Ok(())
    }
}

/// In-memory clipboard for headless hosts and tests
///
/// Clones share contents. A failing clipboard rejects every write.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose writes are always rejected
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Most recent successful write
    pub fn last(&self) -> Option<String> {
        self.contents.lock().ok()?.last().cloned()
    }

    /// Every successful write, oldest first
    pub fn history(&self) -> Vec<String> {
        self.contents.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn store(&self, text: &str) -> Result<()> {
        if self.fail {
            return Err(LinkTextError::Clipboard("permission denied".into()));
        }
        self.contents
            .lock()
            .map_err(|_| LinkTextError::Clipboard("clipboard lock poisoned".into()))?
            .push(text.to_string());
        Ok(())
    }
}

impl ClipboardWriter for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.store(text)
    }
}

impl LegacyCopy for MemoryClipboard {
    fn exec_copy(&mut self, selection: &str) -> Result<()> {
        self.store(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osc52_sequence() {
        let mut copy = Osc52Copy::new(Vec::new());
        copy.exec_copy("hi").unwrap();
        assert_eq!(copy.into_inner(), b"\x1b]52;c;aGk=\x07".to_vec());
    }

    #[test]
    fn test_osc52_refuses_empty_selection() {
        let mut copy = Osc52Copy::new(Vec::new());
        assert!(copy.exec_copy("").is_err());
    }

    #[test]
    fn test_memory_clipboard_shares_contents() {
        let clipboard = MemoryClipboard::new();
        let mut writer = clipboard.clone();
        writer.write_text("one").unwrap();
        writer.write_text("two").unwrap();
        assert_eq!(clipboard.last().as_deref(), Some("two"));
        assert_eq!(clipboard.history(), vec!["one", "two"]);

        let mut failing = MemoryClipboard::failing();
        assert!(failing.write_text("x").is_err());
        assert!(failing.history().is_empty());
    }
}
