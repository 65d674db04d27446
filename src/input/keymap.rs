//! Keyboard command bindings
//!
//! Shortcuts are written like `Alt+Shift+C`: any number of modifiers and
//! one key, joined by `+`. Parsing normalizes modifier order and case so
//! `shift+alt+c` and `Alt+Shift+C` name the same binding.

use crate::{LinkTextError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Command id for arming/disarming copy mode
pub const TRIGGER_COPY_MODE: &str = "trigger-copy-mode";

static SHORTCUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*((?:(?:ctrl|alt|shift|meta|command|macctrl)\s*\+\s*)*)([a-z0-9]|f(?:[1-9]|1[0-2])|space|comma|period|home|end|pageup|pagedown|insert|delete|up|down|left|right)\s*$")
        .expect("shortcut pattern is valid")
});

const MODIFIER_ORDER: [&str; 6] = ["Ctrl", "Alt", "Shift", "Meta", "Command", "MacCtrl"];

/// Extension commands that can be bound to a shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    TriggerCopyMode,
}

impl Command {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            TRIGGER_COPY_MODE => Some(Command::TriggerCopyMode),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Command::TriggerCopyMode => TRIGGER_COPY_MODE,
        }
    }
}

/// Normalize a shortcut string, e.g. `shift + alt + c` -> `Alt+Shift+C`
pub fn parse_shortcut(shortcut: &str) -> Result<String> {
    let caps = SHORTCUT
        .captures(shortcut)
        .ok_or_else(|| LinkTextError::Config(format!("Invalid shortcut: {:?}", shortcut)))?;

    let mut modifiers: Vec<&str> = Vec::new();
    for part in caps[1].split('+').map(str::trim).filter(|p| !p.is_empty()) {
        let Some(canonical) = MODIFIER_ORDER.iter().find(|m| m.eq_ignore_ascii_case(part)) else {
            continue;
        };
        if !modifiers.contains(canonical) {
            modifiers.push(*canonical);
        }
    }
    if modifiers.is_empty() {
        return Err(LinkTextError::Config(format!(
            "Shortcut needs a modifier: {:?}",
            shortcut
        )));
    }
    modifiers.sort_by_key(|m| MODIFIER_ORDER.iter().position(|o| o == m));

    let key = &caps[2];
    let key = if key.len() == 1 {
        key.to_ascii_uppercase()
    } else {
        let mut chars = key.chars();
        chars
            .next()
            .map(|first| first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase())
            .unwrap_or_default()
    };

    Ok(format!("{}+{}", modifiers.join("+"), key))
}

/// Build the shortcut -> command map from configured bindings
///
/// Unknown command ids and malformed shortcuts are skipped.
pub fn create_keymap(bindings: &HashMap<String, String>) -> HashMap<String, Command> {
    let mut map = HashMap::new();
    for (id, shortcut) in bindings {
        let Some(command) = Command::from_id(id) else {
            log::warn!("Ignoring binding for unknown command {:?}", id);
            continue;
        };
        match parse_shortcut(shortcut) {
            Ok(shortcut) => {
                map.insert(shortcut, command);
            }
            Err(e) => log::warn!("Ignoring binding for {}: {}", id, e),
        }
    }
    if !map.values().any(|c| *c == Command::TriggerCopyMode) {
        map.insert("Alt+Shift+C".to_string(), Command::TriggerCopyMode);
    }
    map
}

/// Look up the command bound to a pressed shortcut
pub fn lookup(keymap: &HashMap<String, Command>, pressed: &str) -> Option<Command> {
    parse_shortcut(pressed).ok().and_then(|s| keymap.get(&s).copied())
}
