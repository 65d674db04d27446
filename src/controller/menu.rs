//! Context menu entry

/// Where a context menu entry is offered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuContext {
    Link,
}

/// A context menu entry to register with the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub contexts: &'static [MenuContext],
}

/// The single entry the extension registers, shown on links only
pub const COPY_LINK_TEXT_ENTRY: MenuEntry = MenuEntry {
    id: "copy-link-text",
    title: "Copy Link Anchor Text",
    contexts: &[MenuContext::Link],
};
