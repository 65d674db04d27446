//! Clipboard write with the legacy select-and-copy fallback

use crate::clipboard::{ClipboardWriter, LegacyCopy};
use crate::dom::{Document, NodeRef};
use crate::Result;
use log::{debug, warn};

/// How a copy ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Written by the primary clipboard API
    Primary,
    /// Primary failed, the select-and-copy fallback succeeded
    Fallback,
    /// Both paths failed
    Failed,
}

impl CopyOutcome {
    pub fn succeeded(&self) -> bool {
        *self != CopyOutcome::Failed
    }
}

/// Hidden editable element holding the text to copy
///
/// Inserted into the body on creation and removed, together with the
/// selection, when dropped.
struct HiddenTextArea<'a> {
    doc: &'a mut Document,
    node: NodeRef,
}

impl<'a> HiddenTextArea<'a> {
    fn insert(doc: &'a mut Document, text: &str) -> Result<Self> {
        let node = doc.create_element("textarea");
        node.set_attr("readonly", "");
        node.set_attr("style", "position: fixed; top: -1000px; opacity: 0");
        doc.append_child(&node, &doc.create_text(text))?;
        doc.append_child(doc.body(), &node)?;
        Ok(Self { doc, node })
    }

    fn select_and_copy(&mut self, legacy: &mut dyn LegacyCopy) -> Result<()> {
        self.doc.select_contents(&self.node);
        let selected = self.doc.selection_text().unwrap_or_default();
        legacy.exec_copy(&selected)
    }
}

impl Drop for HiddenTextArea<'_> {
    fn drop(&mut self) {
        self.doc.clear_selection();
        self.doc.remove(&self.node);
    }
}

/// Copy `text`, falling back to select-and-copy if the primary write fails
pub fn copy_text(
    doc: &mut Document,
    primary: &mut dyn ClipboardWriter,
    legacy: &mut dyn LegacyCopy,
    text: &str,
) -> CopyOutcome {
    match primary.write_text(text) {
        Ok(()) => return CopyOutcome::Primary,
        Err(e) => debug!("Primary clipboard write failed, trying fallback: {}", e),
    }

    let fallback = HiddenTextArea::insert(doc, text).and_then(|mut area| area.select_and_copy(legacy));
    match fallback {
        Ok(()) => CopyOutcome::Fallback,
        Err(e) => {
            warn!("Fallback copy failed: {}", e);
            CopyOutcome::Failed
        }
    }
}
