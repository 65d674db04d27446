//! Keyboard commands
//!
//! The controller exposes copy mode through a bound keyboard command as well
//! as the toolbar action; this module maps shortcut strings to commands.

pub mod keymap;

pub use keymap::{create_keymap, lookup, parse_shortcut, Command, TRIGGER_COPY_MODE};
