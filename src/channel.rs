//! One-way delivery of controller messages to pages
//!
//! Sending never blocks and never fails loudly: a message either reaches the
//! page's inbox or is dropped, and the sender only learns which.

use crate::protocol::{Message, TabId};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::debug;
use std::collections::HashMap;
use std::sync::Mutex;

/// Outcome of a send attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the page's inbox
    Delivered,
    /// No page is listening in that tab
    Dropped,
}

/// Fire-and-forget channel from the controller to pages
pub trait PageChannel: Send + Sync {
    fn send(&self, tab: TabId, message: Message) -> Delivery;
}

/// Routes messages to per-tab inboxes
///
/// A tab without a content script (a privileged page, or one that has not
/// finished loading) has no inbox, and messages to it are dropped.
#[derive(Default)]
pub struct TabRouter {
    inboxes: Mutex<HashMap<TabId, Sender<Message>>>,
}

impl TabRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an inbox for a page loaded in `tab`, replacing any previous one
    pub fn attach(&self, tab: TabId) -> Receiver<Message> {
        let (tx, rx) = unbounded();
        if let Ok(mut inboxes) = self.inboxes.lock() {
            inboxes.insert(tab, tx);
        }
        rx
    }

    /// Forget the page in `tab`
    pub fn detach(&self, tab: TabId) {
        if let Ok(mut inboxes) = self.inboxes.lock() {
            inboxes.remove(&tab);
        }
    }
}

impl PageChannel for TabRouter {
    fn send(&self, tab: TabId, message: Message) -> Delivery {
        let Ok(inboxes) = self.inboxes.lock() else {
            return Delivery::Dropped;
        };
        match inboxes.get(&tab) {
            Some(tx) if tx.send(message).is_ok() => Delivery::Delivered,
            _ => {
                debug!("No receiving page in {}", tab);
                Delivery::Dropped
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_to_attached_tab() {
        let router = TabRouter::new();
        let rx = router.attach(TabId(1));
        assert_eq!(router.send(TabId(1), Message::TriggerCopyModeOnce), Delivery::Delivered);
        assert_eq!(rx.try_recv().unwrap(), Message::TriggerCopyModeOnce);
    }

    #[test]
    fn test_missing_or_closed_page_drops() {
        let router = TabRouter::new();
        assert_eq!(router.send(TabId(7), Message::TriggerCopyModeOnce), Delivery::Dropped);

        let rx = router.attach(TabId(2));
        drop(rx);
        assert_eq!(router.send(TabId(2), Message::TriggerCopyModeOnce), Delivery::Dropped);

        let _rx = router.attach(TabId(3));
        router.detach(TabId(3));
        assert_eq!(router.send(TabId(3), Message::TriggerCopyModeOnce), Delivery::Dropped);
    }
}
