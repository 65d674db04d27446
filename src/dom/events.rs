//! Page event listeners
//!
//! Listeners are registered per event kind and phase. Dispatch order is all
//! capture listeners in registration order, then all bubble listeners, so a
//! capturing listener sees an event before any bubbling page handler can stop
//! it. Extension listeners are named hooks resolved by the owner of the
//! document; page scripts are plain closures.

use super::NodeRef;
use std::fmt;

/// Kind of user event delivered to the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Primary-button click
    Click,
    /// Right click that opens the context menu
    ContextMenu,
}

/// Phase a listener is registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Capture,
    Bubble,
}

/// Handle returned by [`Listeners::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listeners installed by the extension's content component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionHook {
    /// Copy mode click interception
    CopyModeClick,
    /// Remembers the element under the last right click
    RightClickTracker,
}

/// A listener installed by the page itself
pub type ScriptListener = Box<dyn FnMut(&mut DomEvent)>;

pub enum Listener {
    Extension(ExtensionHook),
    Script(ScriptListener),
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listener::Extension(hook) => write!(f, "Extension({:?})", hook),
            Listener::Script(_) => write!(f, "Script"),
        }
    }
}

/// An event in flight
#[derive(Debug)]
pub struct DomEvent {
    kind: EventKind,
    target: NodeRef,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl DomEvent {
    pub fn new(kind: EventKind, target: NodeRef) -> Self {
        Self {
            kind,
            target,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn target(&self) -> &NodeRef {
        &self.target
    }

    /// Cancel the event's default action (link navigation for clicks)
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Skip every listener after the current one
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

#[derive(Debug)]
struct Entry {
    id: ListenerId,
    kind: EventKind,
    phase: Phase,
    listener: Listener,
}

/// Registry of page listeners
#[derive(Debug, Default)]
pub struct Listeners {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener and return its handle
    pub fn add(&mut self, kind: EventKind, phase: Phase, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            kind,
            phase,
            listener,
        });
        id
    }

    /// Remove a listener. Returns false if it was not installed.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Number of listeners for an event kind
    pub fn count(&self, kind: EventKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// Number of listeners bound to an extension hook
    pub fn hook_count(&self, hook: ExtensionHook) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.listener, Listener::Extension(h) if h == hook))
            .count()
    }

    /// Listener ids for `kind` in dispatch order
    pub fn dispatch_order(&self, kind: EventKind) -> Vec<ListenerId> {
        let mut order = Vec::new();
        for phase in [Phase::Capture, Phase::Bubble] {
            order.extend(
                self.entries
                    .iter()
                    .filter(|e| e.kind == kind && e.phase == phase)
                    .map(|e| e.id),
            );
        }
        order
    }

    /// Extension hook behind `id`, if it is an extension listener
    pub fn hook(&self, id: ListenerId) -> Option<ExtensionHook> {
        self.entries.iter().find(|e| e.id == id).and_then(|e| match e.listener {
            Listener::Extension(hook) => Some(hook),
            Listener::Script(_) => None,
        })
    }

    /// Run the page script behind `id`. Returns false if there is none.
    pub fn call_script(&mut self, id: ListenerId, event: &mut DomEvent) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(Entry {
                listener: Listener::Script(script),
                ..
            }) => {
                script(event);
                true
            }
            _ => false,
        }
    }
}
