//! Page extractor
//!
//! One instance per loaded page. Owns the page's copy mode state machine:
//!
//! - `Idle`: no click interception.
//! - `Armed`: a capturing click listener is installed and the next link
//!   click (or every link click, in persistent mode) is copied instead of
//!   followed.
//!
//! `triggerCopyModeOnce` toggles between the two. A copied link click
//! disarms unless persistent mode was on when the page was armed. A click
//! outside any link only shows a notification and never disarms.
//!
//! The extractor also remembers the element under the last right click so a
//! context-menu request, which carries only a URL, copies the exact link the
//! user pointed at even when several links share that URL.

pub mod copy;
pub mod toast;

use crate::clipboard::{ClipboardWriter, LegacyCopy};
use crate::dom::events::{DomEvent, EventKind, ExtensionHook, Listener, ListenerId, Phase};
use crate::dom::{Document, NodeRef, WeakNode};
use crate::links::{closest_anchor, extract_anchor_text, find_anchor_by_url, normalize_url, normalized_href};
use crate::protocol::{Message, PageReport};
use crate::state::config::ModeOwnership;
use crate::state::SettingsStore;
use copy::{copy_text, CopyOutcome};
use crossbeam_channel::Sender;
use log::{debug, info};
use std::sync::Arc;
use std::time::{Duration, Instant};
use toast::ToastLayer;

/// Copy mode state of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmState {
    Idle,
    Armed,
}

/// The element under the most recent right click
///
/// Held weakly: the page may detach or rewrite it before the context-menu
/// message arrives, so it is re-validated before use.
#[derive(Debug, Clone)]
pub struct PendingTarget {
    node: WeakNode,
    /// Normalized href of its link when it was right-clicked
    last_known_url: Option<String>,
}

impl PendingTarget {
    pub fn last_known_url(&self) -> Option<&str> {
        self.last_known_url.as_deref()
    }
}

/// Content-side half of the extension for a single page
pub struct PageExtractor {
    document: Document,
    settings: Arc<dyn SettingsStore>,
    clipboard: Box<dyn ClipboardWriter>,
    legacy: Box<dyn LegacyCopy>,
    toasts: ToastLayer,

    /// Persistence flag read when the page was last armed
    persistent: bool,

    /// Installed copy mode listener; `Some` exactly when armed
    click_listener: Option<ListenerId>,

    pending: Option<PendingTarget>,

    ownership: ModeOwnership,
    reports: Option<Sender<PageReport>>,
}

impl PageExtractor {
    /// Take over `document` and install the right-click tracker
    pub fn new(
        mut document: Document,
        settings: Arc<dyn SettingsStore>,
        clipboard: Box<dyn ClipboardWriter>,
        legacy: Box<dyn LegacyCopy>,
    ) -> Self {
        document.listeners.add(
            EventKind::ContextMenu,
            Phase::Capture,
            Listener::Extension(ExtensionHook::RightClickTracker),
        );
        let persistent = settings.persistent_mode();
        debug!("Page extractor ready for {} (persistent={})", document.base_url(), persistent);

        Self {
            document,
            settings,
            clipboard,
            legacy,
            toasts: ToastLayer::new(toast::DEFAULT_DURATION),
            persistent,
            click_listener: None,
            pending: None,
            ownership: ModeOwnership::Page,
            reports: None,
        }
    }

    /// Set how long notifications stay visible
    pub fn with_notification_duration(mut self, duration: Duration) -> Self {
        self.toasts = ToastLayer::new(duration);
        self
    }

    /// Follow a controller-owned mode flag
    ///
    /// Asks the controller for the current flag and reports one-shot
    /// disarming back to it.
    pub fn with_controller_mode(mut self, reports: Sender<PageReport>) -> Self {
        if reports.send(PageReport::GetCopyMode).is_err() {
            debug!("Controller is gone; mode query dropped");
        }
        self.ownership = ModeOwnership::Global;
        self.reports = Some(reports);
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access for the page's own scripts
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn state(&self) -> ArmState {
        match self.click_listener {
            Some(_) => ArmState::Armed,
            None => ArmState::Idle,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.state() == ArmState::Armed
    }

    pub fn pending_target(&self) -> Option<&PendingTarget> {
        self.pending.as_ref()
    }

    /// Handle an instruction from the controller
    pub fn handle_message(&mut self, message: Message) {
        debug!("Page received {:?}", message);
        match message {
            Message::CopyLinkTextByUrl { link_url } => self.on_copy_link_text_by_url(&link_url),
            Message::TriggerCopyModeOnce => self.on_trigger_copy_mode_once(),
            Message::ToggleCopyMode { state } => self.set_copy_mode(state),
        }
    }

    /// Resolve the anchor for `link_url` and copy its text
    pub fn on_copy_link_text_by_url(&mut self, link_url: &str) {
        let anchor = if link_url.trim().is_empty() {
            None
        } else {
            self.resolve_target(link_url)
        };

        match anchor {
            Some(anchor) => {
                let text = extract_anchor_text(&self.document, &anchor);
                self.copy_to_clipboard(&text);
            }
            None => {
                info!("No link on the page matches {:?}", link_url);
                self.notify(toast::LINK_NOT_FOUND);
            }
        }
    }

    /// Arm if idle, disarm if armed
    pub fn on_trigger_copy_mode_once(&mut self) {
        match self.state() {
            ArmState::Idle => self.arm(),
            ArmState::Armed => self.disarm(),
        }
    }

    /// Apply an absolute mode from a controller-owned flag
    pub fn set_copy_mode(&mut self, on: bool) {
        match (self.state(), on) {
            (ArmState::Idle, true) => self.arm(),
            (ArmState::Armed, false) => self.disarm(),
            _ => debug!("Copy mode already {}", if on { "on" } else { "off" }),
        }
    }

    fn arm(&mut self) {
        self.persistent = self.settings.persistent_mode();
        if self.click_listener.is_none() {
            let id = self.document.listeners.add(
                EventKind::Click,
                Phase::Capture,
                Listener::Extension(ExtensionHook::CopyModeClick),
            );
            self.click_listener = Some(id);
        }
        info!("Copy mode armed (persistent={})", self.persistent);
        self.notify(toast::MODE_ON);
    }

    fn disarm(&mut self) {
        if let Some(id) = self.click_listener.take() {
            self.document.listeners.remove(id);
        }
        info!("Copy mode disarmed");
        self.notify(toast::MODE_OFF);
    }

    /// Deliver a click on `target` and run the default action if nobody prevented it
    pub fn click(&mut self, target: &NodeRef) -> DomEvent {
        let event = self.dispatch(EventKind::Click, target);
        if !event.default_prevented() {
            let destination = closest_anchor(target).and_then(|a| self.document.resolve_href(&a));
            if let Some(url) = destination {
                self.document.record_navigation(url);
            }
        }
        event
    }

    /// Deliver a right click on `target`
    pub fn context_menu(&mut self, target: &NodeRef) -> DomEvent {
        self.dispatch(EventKind::ContextMenu, target)
    }

    fn dispatch(&mut self, kind: EventKind, target: &NodeRef) -> DomEvent {
        let mut event = DomEvent::new(kind, NodeRef::clone(target));
        for id in self.document.listeners.dispatch_order(kind) {
            if event.propagation_stopped() {
                break;
            }
            match self.document.listeners.hook(id) {
                Some(ExtensionHook::CopyModeClick) => self.on_armed_click(&mut event),
                Some(ExtensionHook::RightClickTracker) => self.remember_right_click(&event),
                None => {
                    self.document.listeners.call_script(id, &mut event);
                }
            }
        }
        event
    }

    fn on_armed_click(&mut self, event: &mut DomEvent) {
        let Some(anchor) = closest_anchor(event.target()) else {
            self.notify(toast::NOT_A_LINK);
            return;
        };

        event.prevent_default();
        let text = extract_anchor_text(&self.document, &anchor);
        self.copy_to_clipboard(&text);

        if !self.persistent {
            self.disarm();
            self.report(PageReport::CopyModeChanged { state: false });
        }
    }

    fn remember_right_click(&mut self, event: &DomEvent) {
        let last_known_url =
            closest_anchor(event.target()).and_then(|a| normalized_href(&self.document, &a));
        debug!("Right click target recorded ({:?})", last_known_url);
        self.pending = Some(PendingTarget {
            node: WeakNode::new(event.target()),
            last_known_url,
        });
    }

    /// The anchor a copy-by-URL request refers to
    ///
    /// Prefers the right-clicked element when it still resolves to the same
    /// link, then falls back to the first matching anchor in page order.
    fn resolve_target(&self, link_url: &str) -> Option<NodeRef> {
        let wanted = normalize_url(link_url, self.document.base_url());

        if let Some(pending) = &self.pending {
            let anchor = pending
                .node
                .upgrade()
                .filter(|node| self.document.is_connected(node))
                .and_then(|node| closest_anchor(&node));
            let current = anchor
                .as_ref()
                .and_then(|a| normalized_href(&self.document, a));
            match (anchor, current) {
                (Some(anchor), Some(url)) if url == wanted => return Some(anchor),
                _ => debug!(
                    "Right click target does not match (was {:?}), scanning page",
                    pending.last_known_url
                ),
            }
        }

        find_anchor_by_url(&self.document, link_url)
    }

    fn copy_to_clipboard(&mut self, text: &str) {
        let outcome = copy_text(
            &mut self.document,
            &mut *self.clipboard,
            &mut *self.legacy,
            text,
        );
        debug!("Copy of {} chars: {:?}", text.len(), outcome);
        match outcome {
            CopyOutcome::Primary | CopyOutcome::Fallback => self.notify(toast::COPIED),
            CopyOutcome::Failed => self.notify(toast::FAILED_TO_COPY),
        }
    }

    fn report(&self, report: PageReport) {
        if self.ownership != ModeOwnership::Global {
            return;
        }
        if let Some(tx) = &self.reports {
            if tx.send(report).is_err() {
                debug!("Controller is gone; report dropped");
            }
        }
    }

    fn notify(&mut self, text: &str) {
        self.toasts.show(&self.document, text);
    }

    /// Remove notifications whose display time is over
    pub fn expire_notifications(&mut self, now: Instant) -> usize {
        self.toasts.expire(&self.document, now)
    }

    /// Time until the next notification should be removed
    pub fn time_until_next_expiry(&self, now: Instant) -> Option<Duration> {
        self.toasts.time_until_next_expiry(now)
    }

    /// Notifications shown since the last call, oldest first
    pub fn take_notifications(&mut self) -> Vec<String> {
        self.toasts.take_shown()
    }

    /// Notifications currently on screen
    pub fn visible_notifications(&self) -> Vec<String> {
        self.toasts.visible_texts()
    }
}
