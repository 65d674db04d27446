//! Keyboard command tests
//!
//! Tests shortcut parsing and the shortcut -> command map

use linktext::input::{create_keymap, lookup, parse_shortcut, Command, TRIGGER_COPY_MODE};
use std::collections::HashMap;

#[test]
fn test_parse_shortcut_normalizes() {
    assert_eq!(parse_shortcut("Alt+Shift+C").unwrap(), "Alt+Shift+C");
    assert_eq!(parse_shortcut("shift + alt + c").unwrap(), "Alt+Shift+C");
    assert_eq!(parse_shortcut("ctrl+F5").unwrap(), "Ctrl+F5");
    assert_eq!(parse_shortcut("Alt+space").unwrap(), "Alt+Space");
}

#[test]
fn test_parse_shortcut_rejects_bad_input() {
    assert!(parse_shortcut("C").is_err());
    assert!(parse_shortcut("Alt+").is_err());
    assert!(parse_shortcut("Hyper+C").is_err());
    assert!(parse_shortcut("").is_err());
}

#[test]
fn test_keymap_from_bindings() {
    let mut bindings = HashMap::new();
    bindings.insert(TRIGGER_COPY_MODE.to_string(), "Ctrl+Alt+K".to_string());
    bindings.insert("no-such-command".to_string(), "Ctrl+J".to_string());

    let keymap = create_keymap(&bindings);
    assert_eq!(keymap.len(), 1);
    assert_eq!(lookup(&keymap, "alt+ctrl+k"), Some(Command::TriggerCopyMode));
    assert_eq!(lookup(&keymap, "Ctrl+J"), None);
}

#[test]
fn test_keymap_falls_back_to_default_binding() {
    let mut bindings = HashMap::new();
    bindings.insert(TRIGGER_COPY_MODE.to_string(), "not a shortcut".to_string());

    let keymap = create_keymap(&bindings);
    assert_eq!(lookup(&keymap, "Alt+Shift+C"), Some(Command::TriggerCopyMode));
    assert_eq!(Command::TriggerCopyMode.id(), TRIGGER_COPY_MODE);
}
