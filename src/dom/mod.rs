//! In-memory page document
//!
//! A small DOM: element and text nodes in a tree, a base URL for resolving
//! relative hrefs, a single selection, event listeners and a record of
//! navigations the page would have performed. Nodes are reference counted;
//! parents are held weakly so detaching a subtree releases it.

pub mod events;
pub mod loader;

use crate::{LinkTextError, Result};
use events::Listeners;
use log::debug;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use url::Url;

/// Strong reference to a node
pub type NodeRef = Rc<Node>;

/// What a node is
#[derive(Debug)]
pub enum NodeKind {
    /// Tree root, parent of `<body>`
    Document,
    /// Element with a lowercase tag name and ordered attributes
    Element {
        tag: String,
        attrs: RefCell<Vec<(String, String)>>,
    },
    /// Character data
    Text(RefCell<String>),
}

/// A node in the document tree
#[derive(Debug)]
pub struct Node {
    kind: NodeKind,
    parent: RefCell<Weak<Node>>,
    children: RefCell<Vec<NodeRef>>,
}

impl Node {
    fn new(kind: NodeKind) -> NodeRef {
        Rc::new(Self {
            kind,
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
        })
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Tag name for elements, `None` for text and document nodes
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag, .. } => Some(tag.as_str()),
            _ => None,
        }
    }

    /// True if this is an element with the given tag (case-insensitive)
    pub fn is_element(&self, tag: &str) -> bool {
        self.tag().is_some_and(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        match &self.kind {
            NodeKind::Element { attrs, .. } => attrs
                .borrow()
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.clone()),
            _ => None,
        }
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Set an attribute, replacing any existing value. No-op on non-elements.
    pub fn set_attr(&self, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &self.kind {
            let mut attrs = attrs.borrow_mut();
            let name = name.to_ascii_lowercase();
            match attrs.iter_mut().find(|(k, _)| *k == name) {
                Some(entry) => entry.1 = value.to_string(),
                None => attrs.push((name, value.to_string())),
            }
        }
    }

    /// Concatenated character data of this node and all descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text(text) => out.push_str(&text.borrow()),
            _ => {
                for child in self.children.borrow().iter() {
                    child.collect_text(out);
                }
            }
        }
    }

    pub fn parent(&self) -> Option<NodeRef> {
        self.parent.borrow().upgrade()
    }

    pub fn children(&self) -> Vec<NodeRef> {
        self.children.borrow().clone()
    }
}

/// Non-owning handle to a node
///
/// Upgrading fails once every strong reference is gone. A successful upgrade
/// says nothing about whether the node is still attached; check with
/// [`Document::is_connected`].
#[derive(Debug, Clone)]
pub struct WeakNode(Weak<Node>);

impl WeakNode {
    pub fn new(node: &NodeRef) -> Self {
        Self(Rc::downgrade(node))
    }

    pub fn upgrade(&self) -> Option<NodeRef> {
        self.0.upgrade()
    }
}

/// All descendants of `node` in document (pre-)order, excluding `node`
pub fn descendants(node: &NodeRef) -> Vec<NodeRef> {
    let mut out = Vec::new();
    let mut stack: Vec<NodeRef> = node.children().into_iter().rev().collect();
    while let Some(next) = stack.pop() {
        stack.extend(next.children().into_iter().rev());
        out.push(next);
    }
    out
}

/// Nearest inclusive ancestor that is an element with the given tag
pub fn closest(node: &NodeRef, tag: &str) -> Option<NodeRef> {
    let mut current = Some(Rc::clone(node));
    while let Some(candidate) = current {
        if candidate.is_element(tag) {
            return Some(candidate);
        }
        current = candidate.parent();
    }
    None
}

/// A loaded page
pub struct Document {
    root: NodeRef,
    body: NodeRef,
    base_url: Url,
    selection: Option<WeakNode>,
    navigations: Vec<Url>,
    /// Event listeners registered on the page
    pub listeners: Listeners,
}

impl Document {
    /// Create an empty document whose relative URLs resolve against `base_url`
    pub fn new(base_url: Url) -> Self {
        let root = Node::new(NodeKind::Document);
        let body = Self::element("body");
        *body.parent.borrow_mut() = Rc::downgrade(&root);
        root.children.borrow_mut().push(Rc::clone(&body));

        Self {
            root,
            body,
            base_url,
            selection: None,
            navigations: Vec::new(),
            listeners: Listeners::new(),
        }
    }

    /// Parse `base_url` and create an empty document
    pub fn parse_base(base_url: &str) -> Result<Self> {
        Ok(Self::new(Url::parse(base_url)?))
    }

    fn element(tag: &str) -> NodeRef {
        Node::new(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: RefCell::new(Vec::new()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    pub fn body(&self) -> &NodeRef {
        &self.body
    }

    /// Create a detached element
    pub fn create_element(&self, tag: &str) -> NodeRef {
        Self::element(tag)
    }

    /// Create a detached text node
    pub fn create_text(&self, text: &str) -> NodeRef {
        Node::new(NodeKind::Text(RefCell::new(text.to_string())))
    }

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere
    pub fn append_child(&self, parent: &NodeRef, child: &NodeRef) -> Result<()> {
        if matches!(parent.kind, NodeKind::Text(_)) {
            return Err(LinkTextError::Dom("text nodes cannot have children".into()));
        }
        if is_inclusive_ancestor(child, parent) {
            return Err(LinkTextError::Dom("cannot append a node to its own subtree".into()));
        }
        self.remove(child);
        *child.parent.borrow_mut() = Rc::downgrade(parent);
        parent.children.borrow_mut().push(Rc::clone(child));
        Ok(())
    }

    /// Detach `node` from its parent. Returns false if it had none.
    pub fn remove(&self, node: &NodeRef) -> bool {
        let Some(parent) = node.parent() else {
            return false;
        };
        parent.children.borrow_mut().retain(|c| !Rc::ptr_eq(c, node));
        *node.parent.borrow_mut() = Weak::new();
        true
    }

    /// True if `node` is reachable from this document's root
    pub fn is_connected(&self, node: &NodeRef) -> bool {
        let mut current = Some(Rc::clone(node));
        while let Some(candidate) = current {
            if Rc::ptr_eq(&candidate, &self.root) {
                return true;
            }
            current = candidate.parent();
        }
        false
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeRef> {
        descendants(&self.root)
            .into_iter()
            .find(|n| n.attr("id").as_deref() == Some(id))
    }

    /// Every `<a href>` in document order
    pub fn anchors(&self) -> Vec<NodeRef> {
        descendants(&self.root)
            .into_iter()
            .filter(|n| n.is_element("a") && n.has_attr("href"))
            .collect()
    }

    /// An element's `href` resolved against the base URL
    ///
    /// `None` when the attribute is absent or cannot be resolved.
    pub fn resolve_href(&self, element: &Node) -> Option<Url> {
        let href = element.attr("href")?;
        match self.base_url.join(href.trim()) {
            Ok(url) => Some(url),
            Err(e) => {
                debug!("Unresolvable href {:?}: {}", href, e);
                None
            }
        }
    }

    /// Select the whole contents of `node`
    pub fn select_contents(&mut self, node: &NodeRef) {
        self.selection = Some(WeakNode::new(node));
    }

    /// Text of the current selection, if the selected node is still attached
    pub fn selection_text(&self) -> Option<String> {
        let node = self.selection.as_ref()?.upgrade()?;
        self.is_connected(&node).then(|| node.text_content())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Record that the page followed a link
    pub fn record_navigation(&mut self, url: Url) {
        debug!("Page navigates to {}", url);
        self.navigations.push(url);
    }

    /// Navigations performed so far, oldest first
    ///
    /// Kept for the lifetime of the document, which is one page load.
    pub fn navigations(&self) -> &[Url] {
        &self.navigations
    }
}

/// True if `ancestor` is `node` or one of its ancestors
fn is_inclusive_ancestor(ancestor: &NodeRef, node: &NodeRef) -> bool {
    let mut current = Some(Rc::clone(node));
    while let Some(candidate) = current {
        if Rc::ptr_eq(&candidate, ancestor) {
            return true;
        }
        current = candidate.parent();
    }
    false
}
