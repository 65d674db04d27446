//! Mode controller tests
//!
//! Uses a recording host and a real tab router so delivered messages can be
//! read back from the page inbox.

use linktext::channel::TabRouter;
use linktext::controller::menu::{MenuContext, MenuEntry, COPY_LINK_TEXT_ENTRY};
use linktext::controller::{BrowserHost, InstallReason, ModeController};
use linktext::input::create_keymap;
use linktext::platform::{Os, PlatformInfo};
use linktext::protocol::{Message, PageReport, TabId};
use linktext::state::config::ModeOwnership;
use linktext::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Calls {
    options_opened: usize,
    menus: Vec<MenuEntry>,
}

struct RecordingHost {
    os: Os,
    tabs: Vec<TabId>,
    calls: Arc<Mutex<Calls>>,
}

impl BrowserHost for RecordingHost {
    fn platform_info(&self) -> PlatformInfo {
        PlatformInfo { os: self.os }
    }

    fn open_options_page(&mut self) -> Result<()> {
        self.calls.lock().unwrap().options_opened += 1;
        Ok(())
    }

    fn create_context_menu(&mut self, entry: &MenuEntry) -> Result<()> {
        self.calls.lock().unwrap().menus.push(entry.clone());
        Ok(())
    }

    fn active_tabs(&self) -> Vec<TabId> {
        self.tabs.clone()
    }
}

fn controller(os: Os, ownership: ModeOwnership) -> (ModeController, Arc<TabRouter>, Arc<Mutex<Calls>>) {
    let calls = Arc::new(Mutex::new(Calls::default()));
    let router = Arc::new(TabRouter::new());
    let host = RecordingHost {
        os,
        tabs: vec![TabId(1)],
        calls: calls.clone(),
    };
    let controller = ModeController::new(Box::new(host), router.clone(), ownership);
    (controller, router, calls)
}

#[test]
fn test_onboarding_on_install_and_update_only() {
    let (mut controller, _router, calls) = controller(Os::Linux, ModeOwnership::Page);
    controller.initialize(InstallReason::Install);
    controller.initialize(InstallReason::Update);
    controller.initialize(InstallReason::BrowserUpdate);
    assert_eq!(calls.lock().unwrap().options_opened, 2);
    assert_eq!(InstallReason::from_name("update"), Some(InstallReason::Update));
}

#[test]
fn test_context_menu_registered_on_desktop() {
    let (mut controller, _router, calls) = controller(Os::Windows, ModeOwnership::Page);
    assert!(controller.register_context_action());
    let menus = &calls.lock().unwrap().menus;
    assert_eq!(menus.len(), 1);
    assert_eq!(menus[0].id, "copy-link-text");
    assert_eq!(menus[0].contexts, &[MenuContext::Link]);
}

#[test]
fn test_no_context_menu_on_android() {
    let (mut controller, router, calls) = controller(Os::Android, ModeOwnership::Page);
    let inbox = router.attach(TabId(1));
    assert!(!controller.register_context_action());
    assert!(!controller.menu_registered());
    assert!(calls.lock().unwrap().menus.is_empty());

    // No menu entry means no way to copy by URL
    controller.on_context_action_invoked(COPY_LINK_TEXT_ENTRY.id, Some("https://ex.com/x"), Some(TabId(1)));
    assert!(inbox.try_recv().is_err());
}

#[test]
fn test_context_action_sends_link_url() {
    let (mut controller, router, _calls) = controller(Os::Linux, ModeOwnership::Page);
    let inbox = router.attach(TabId(1));
    assert!(controller.register_context_action());

    controller.on_context_action_invoked(COPY_LINK_TEXT_ENTRY.id, Some("https://ex.com/x"), Some(TabId(1)));
    assert_eq!(
        inbox.try_recv().unwrap(),
        Message::CopyLinkTextByUrl {
            link_url: "https://ex.com/x".into()
        }
    );

    // Other entries, missing URLs and missing tabs are ignored
    controller.on_context_action_invoked("something-else", Some("https://ex.com/x"), Some(TabId(1)));
    controller.on_context_action_invoked(COPY_LINK_TEXT_ENTRY.id, None, Some(TabId(1)));
    controller.on_context_action_invoked(COPY_LINK_TEXT_ENTRY.id, Some("https://ex.com/x"), None);
    assert!(inbox.try_recv().is_err());
}

#[test]
fn test_undeliverable_messages_are_swallowed() {
    let (mut controller, _router, _calls) = controller(Os::Linux, ModeOwnership::Page);
    controller.register_context_action();
    // No page attached to tab 1
    controller.on_context_action_invoked(COPY_LINK_TEXT_ENTRY.id, Some("https://ex.com/x"), Some(TabId(1)));
    controller.on_user_toggle_action();
}

#[test]
fn test_toggle_and_command_trigger_page_mode() {
    let (controller, router, _calls) = controller(Os::Linux, ModeOwnership::Page);
    let mut bindings = HashMap::new();
    bindings.insert("trigger-copy-mode".to_string(), "Ctrl+Shift+L".to_string());
    let mut controller = controller.with_keymap(create_keymap(&bindings));
    let inbox = router.attach(TabId(1));

    controller.on_user_toggle_action();
    controller.on_command_invoked("trigger-copy-mode");
    controller.on_command_invoked("unknown-command");
    assert!(controller.on_shortcut("shift+ctrl+l"));
    assert!(!controller.on_shortcut("Alt+Q"));

    let received: Vec<Message> = inbox.try_iter().collect();
    assert_eq!(received, vec![Message::TriggerCopyModeOnce; 3]);
    assert!(!controller.copy_mode());
}

#[test]
fn test_global_mode_flag() {
    let (mut controller, router, _calls) = controller(Os::Linux, ModeOwnership::Global);
    let inbox = router.attach(TabId(1));

    controller.on_user_toggle_action();
    assert!(controller.copy_mode());
    assert_eq!(inbox.try_recv().unwrap(), Message::ToggleCopyMode { state: true });

    controller.handle_report(TabId(1), PageReport::GetCopyMode);
    assert_eq!(inbox.try_recv().unwrap(), Message::ToggleCopyMode { state: true });

    controller.handle_report(TabId(1), PageReport::CopyModeChanged { state: false });
    assert!(!controller.copy_mode());

    controller.on_user_toggle_action();
    assert_eq!(inbox.try_recv().unwrap(), Message::ToggleCopyMode { state: true });
}

#[test]
fn test_startup_arms_only_without_context_menu() {
    let (mut desktop, router, _calls) = controller(Os::Linux, ModeOwnership::Global);
    let inbox = router.attach(TabId(1));
    desktop.on_startup();
    assert!(inbox.try_recv().is_err());
    assert!(!desktop.copy_mode());

    let (mut mobile, router, _calls) = controller(Os::Android, ModeOwnership::Global);
    let inbox = router.attach(TabId(1));
    mobile.on_startup();
    assert!(mobile.copy_mode());
    assert_eq!(inbox.try_recv().unwrap(), Message::ToggleCopyMode { state: true });
}
