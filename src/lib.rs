//! linktext - copy a link's anchor text instead of its URL
//!
//! A background controller and one extractor per page, talking over a
//! one-way message channel. The controller relays toolbar, keyboard and
//! context-menu actions; the page resolves which link the user meant,
//! extracts its human-readable text and writes it to the clipboard with an
//! on-page notification.

pub mod channel;
pub mod clipboard;
pub mod content;
pub mod controller;
pub mod dom;
pub mod error;
pub mod input;
pub mod links;
pub mod platform;
pub mod protocol;
pub mod state;

pub use error::{LinkTextError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "linktext";
