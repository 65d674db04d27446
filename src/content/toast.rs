//! Transient on-page notifications
//!
//! A toast is a fixed-position `<div>` appended to the body and removed once
//! its display time has passed. Nothing waits on a toast; the host calls
//! [`ToastLayer::expire`] from its event loop.

use crate::dom::{Document, NodeRef};
use log::{info, warn};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

/// Shown after a successful copy
pub const COPIED: &str = "Link Anchor Text COPIED";
/// Shown when both clipboard paths fail
pub const FAILED_TO_COPY: &str = "Failed to copy!";
/// Shown when copy mode is armed
pub const MODE_ON: &str = "Copy Link Anchor Text ON";
/// Shown when copy mode is disarmed
pub const MODE_OFF: &str = "Copy Link Anchor Text OFF";
/// Shown when an armed click lands outside any link
pub const NOT_A_LINK: &str = "Not a Link!";
/// Shown when a copy-by-URL request matches nothing on the page
pub const LINK_NOT_FOUND: &str = "Could not find link!";

/// Display time used when none is configured
pub const DEFAULT_DURATION: Duration = Duration::from_millis(1500);

const TOAST_STYLE: &str = "position: fixed; bottom: 20px; left: 50%; \
transform: translateX(-50%); background: #333; color: #fff; padding: 6px 12px; \
border-radius: 4px; z-index: 999999; font-size: 14px";

struct Toast {
    node: NodeRef,
    expires: Instant,
}

/// Toasts currently attached to a page
pub struct ToastLayer {
    duration: Duration,
    visible: Vec<Toast>,
    /// Every text shown since the last `take_shown`; grows until drained
    shown: Vec<String>,
}

impl ToastLayer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            visible: Vec::new(),
            shown: Vec::new(),
        }
    }

    /// Show `text` now
    pub fn show(&mut self, doc: &Document, text: &str) {
        self.show_at(doc, text, Instant::now());
    }

    /// Show `text` as if at `now`
    ///
    /// Rapid successive toasts stack; each expires on its own schedule.
    pub fn show_at(&mut self, doc: &Document, text: &str, now: Instant) {
        info!("Notification: {}", text);
        self.shown.push(text.to_string());

        let node = doc.create_element("div");
        node.set_attr("style", TOAST_STYLE);
        node.set_attr("role", "status");
        let attached = doc
            .append_child(&node, &doc.create_text(text))
            .and_then(|_| doc.append_child(doc.body(), &node));
        if let Err(e) = attached {
            warn!("Could not attach notification: {}", e);
            return;
        }

        self.visible.push(Toast {
            node,
            expires: now + self.duration,
        });
    }

    /// Remove toasts whose display time is over. Returns how many were removed.
    pub fn expire(&mut self, doc: &Document, now: Instant) -> usize {
        let before = self.visible.len();
        self.visible.retain(|toast| {
            if toast.expires <= now {
                doc.remove(&toast.node);
                false
            } else {
                true
            }
        });
        before - self.visible.len()
    }

    /// Texts of toasts still on screen, oldest first
    pub fn visible_texts(&self) -> Vec<String> {
        self.visible.iter().map(|t| t.node.text_content()).collect()
    }

    /// Drain the log of shown texts
    ///
    /// The log is unbounded; a long-running host must call this regularly.
    pub fn take_shown(&mut self) -> Vec<String> {
        std::mem::take(&mut self.shown)
    }

    /// Time until the next toast expires
    pub fn time_until_next_expiry(&self, now: Instant) -> Option<Duration> {
        self.visible
            .iter()
            .map(|t| t.expires.saturating_duration_since(now))
            .min()
    }
}

/// Render a toast as a boxed line centred in `cols` terminal columns
pub fn render_toast(text: &str, cols: usize) -> String {
    let width = UnicodeWidthStr::width(text);
    let boxed = width + 4;
    let indent = cols.saturating_sub(boxed) / 2;
    let pad = " ".repeat(indent);
    let rule = "─".repeat(width + 2);
    format!(
        "{pad}┌{rule}┐\n{pad}│ {text} │\n{pad}└{rule}┘",
        pad = pad,
        rule = rule,
        text = text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_attaches_and_expires() {
        let doc = Document::parse_base("https://ex.com/").unwrap();
        let mut layer = ToastLayer::new(DEFAULT_DURATION);
        let now = Instant::now();

        layer.show_at(&doc, COPIED, now);
        layer.show_at(&doc, MODE_OFF, now + Duration::from_millis(500));
        assert_eq!(layer.visible_texts(), vec![COPIED, MODE_OFF]);
        assert!(doc.body().text_content().contains(COPIED));

        assert_eq!(layer.expire(&doc, now + Duration::from_millis(1499)), 0);
        assert_eq!(layer.expire(&doc, now + Duration::from_millis(1500)), 1);
        assert_eq!(layer.visible_texts(), vec![MODE_OFF]);
        assert!(!doc.body().text_content().contains(COPIED));

        assert_eq!(
            layer.time_until_next_expiry(now + Duration::from_millis(1500)),
            Some(Duration::from_millis(500))
        );
        assert_eq!(layer.take_shown(), vec![COPIED, MODE_OFF]);
        assert!(layer.take_shown().is_empty());
    }

    #[test]
    fn test_render_toast_centres_wide_text() {
        let rendered = render_toast("コピー", 20);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        // width 6 + 4 border columns, centred in 20 -> indent 5
        assert!(lines[1].starts_with("     │ コピー │"));
    }
}
