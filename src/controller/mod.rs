//! Mode controller
//!
//! The privileged half of the extension. It registers the link context menu
//! entry, turns toolbar clicks and keyboard commands into messages for the
//! active page, and forwards context-menu clicks with the link URL. All
//! sends are best effort; the page is the only component that gives the user
//! feedback, so a failed send is logged and forgotten.

pub mod menu;

use crate::channel::{Delivery, PageChannel};
use crate::input::{lookup, Command};
use crate::platform::PlatformInfo;
use crate::protocol::{Message, PageReport, TabId};
use crate::state::config::ModeOwnership;
use crate::Result;
use log::{debug, info, warn};
use menu::{MenuEntry, COPY_LINK_TEXT_ENTRY};
use std::collections::HashMap;
use std::sync::Arc;

/// Why the extension's install event fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallReason {
    Install,
    Update,
    BrowserUpdate,
    SharedModuleUpdate,
}

impl InstallReason {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "install" => Some(InstallReason::Install),
            "update" => Some(InstallReason::Update),
            "browser_update" => Some(InstallReason::BrowserUpdate),
            "shared_module_update" => Some(InstallReason::SharedModuleUpdate),
            _ => None,
        }
    }
}

/// Host APIs available to the controller
pub trait BrowserHost {
    /// Platform-info probe
    fn platform_info(&self) -> PlatformInfo;

    /// Open the extension's options page
    fn open_options_page(&mut self) -> Result<()>;

    /// Register a context menu entry
    fn create_context_menu(&mut self, entry: &MenuEntry) -> Result<()>;

    /// Tabs that are active in the current window
    fn active_tabs(&self) -> Vec<TabId>;
}

/// Background controller
pub struct ModeController {
    host: Box<dyn BrowserHost>,
    channel: Arc<dyn PageChannel>,
    ownership: ModeOwnership,

    /// Copy mode flag; only meaningful with controller-owned mode
    copy_mode: bool,

    menu_registered: bool,
    keymap: HashMap<String, Command>,
}

impl ModeController {
    pub fn new(host: Box<dyn BrowserHost>, channel: Arc<dyn PageChannel>, ownership: ModeOwnership) -> Self {
        Self {
            host,
            channel,
            ownership,
            copy_mode: false,
            menu_registered: false,
            keymap: HashMap::new(),
        }
    }

    /// Bind keyboard shortcuts to commands
    pub fn with_keymap(mut self, keymap: HashMap<String, Command>) -> Self {
        self.keymap = keymap;
        self
    }

    pub fn ownership(&self) -> ModeOwnership {
        self.ownership
    }

    /// Controller-owned copy mode flag
    pub fn copy_mode(&self) -> bool {
        self.copy_mode
    }

    pub fn menu_registered(&self) -> bool {
        self.menu_registered
    }

    /// Install/update hook: show the options page as onboarding
    pub fn initialize(&mut self, reason: InstallReason) {
        if matches!(reason, InstallReason::Install | InstallReason::Update) {
            info!("Opening options page after {:?}", reason);
            if let Err(e) = self.host.open_options_page() {
                warn!("Could not open options page: {}", e);
            }
        }
    }

    /// Register the link context menu entry if the platform has one
    ///
    /// Returns whether the entry is registered. Platforms without link
    /// context menus simply have no context path.
    pub fn register_context_action(&mut self) -> bool {
        let platform = self.host.platform_info();
        if !platform.supports_link_context_menu() {
            info!("No link context menu on {:?}", platform.os);
            return false;
        }
        match self.host.create_context_menu(&COPY_LINK_TEXT_ENTRY) {
            Ok(()) => {
                debug!("Registered context menu entry {:?}", COPY_LINK_TEXT_ENTRY.id);
                self.menu_registered = true;
            }
            Err(e) => warn!("Context menu registration failed: {}", e),
        }
        self.menu_registered
    }

    /// The user picked a context menu entry on a link
    pub fn on_context_action_invoked(&self, menu_item_id: &str, link_url: Option<&str>, tab: Option<TabId>) {
        if !self.menu_registered {
            debug!("Context action without a registered menu entry, ignoring");
            return;
        }
        if menu_item_id != COPY_LINK_TEXT_ENTRY.id {
            return;
        }
        let (Some(link_url), Some(tab)) = (link_url.filter(|u| !u.is_empty()), tab) else {
            debug!("Context action without link URL or tab, ignoring");
            return;
        };
        self.send(
            tab,
            Message::CopyLinkTextByUrl {
                link_url: link_url.to_string(),
            },
        );
    }

    /// Toolbar icon clicked
    pub fn on_user_toggle_action(&mut self) {
        let message = match self.ownership {
            ModeOwnership::Page => Message::TriggerCopyModeOnce,
            ModeOwnership::Global => {
                self.copy_mode = !self.copy_mode;
                Message::ToggleCopyMode { state: self.copy_mode }
            }
        };
        self.broadcast(message);
    }

    /// A bound keyboard command fired
    pub fn on_command_invoked(&mut self, command_id: &str) {
        match Command::from_id(command_id) {
            Some(Command::TriggerCopyMode) => self.on_user_toggle_action(),
            None => debug!("Unknown command {:?}", command_id),
        }
    }

    /// Resolve a pressed shortcut and run its command. Returns false if unbound.
    pub fn on_shortcut(&mut self, pressed: &str) -> bool {
        match lookup(&self.keymap, pressed) {
            Some(command) => {
                self.on_command_invoked(command.id());
                true
            }
            None => false,
        }
    }

    /// Browser startup: arm copy mode where there is no context menu
    pub fn on_startup(&mut self) {
        if self.host.platform_info().supports_link_context_menu() {
            return;
        }
        info!("Activating copy mode on startup");
        let message = match self.ownership {
            ModeOwnership::Page => Message::TriggerCopyModeOnce,
            ModeOwnership::Global => {
                self.copy_mode = true;
                Message::ToggleCopyMode { state: true }
            }
        };
        self.broadcast(message);
    }

    /// Handle traffic from the page in `tab`
    pub fn handle_report(&mut self, tab: TabId, report: PageReport) {
        match report {
            PageReport::GetCopyMode => {
                self.send(tab, Message::ToggleCopyMode { state: self.copy_mode });
            }
            PageReport::CopyModeChanged { state } => {
                if self.ownership == ModeOwnership::Global {
                    debug!("{} reports copy mode {}", tab, state);
                    self.copy_mode = state;
                }
            }
        }
    }

    fn broadcast(&self, message: Message) {
        let tabs = self.host.active_tabs();
        if tabs.is_empty() {
            debug!("No active tab for {:?}", message);
        }
        for tab in tabs {
            self.send(tab, message.clone());
        }
    }

    fn send(&self, tab: TabId, message: Message) {
        if self.channel.send(tab, message) == Delivery::Dropped {
            debug!("Message to {} was not delivered", tab);
        }
    }
}
