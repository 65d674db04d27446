//! Page descriptions
//!
//! Builds a [`Document`] from JSON such as:
//!
//! ```json
//! {
//!   "url": "https://ex.com/",
//!   "body": [
//!     { "tag": "a", "attrs": { "href": "/x", "id": "first" }, "children": ["First"] }
//!   ]
//! }
//! ```

use super::{Document, NodeRef};
use crate::Result;
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// A page: its URL and the children of `<body>`
#[derive(Debug, Clone, Deserialize)]
pub struct PageSpec {
    pub url: String,
    #[serde(default)]
    pub body: Vec<NodeSpec>,
}

/// A node in a page description
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    /// Bare string child
    Bare(String),
    Text {
        text: String,
    },
    Element {
        tag: String,
        #[serde(default)]
        attrs: BTreeMap<String, String>,
        #[serde(default)]
        children: Vec<NodeSpec>,
    },
}

impl PageSpec {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the document this description describes
    pub fn build(&self) -> Result<Document> {
        let doc = Document::parse_base(&self.url)?;
        for spec in &self.body {
            let node = build_node(&doc, spec)?;
            doc.append_child(doc.body(), &node)?;
        }
        Ok(doc)
    }
}

fn build_node(doc: &Document, spec: &NodeSpec) -> Result<NodeRef> {
    match spec {
        NodeSpec::Bare(text) | NodeSpec::Text { text } => Ok(doc.create_text(text)),
        NodeSpec::Element {
            tag,
            attrs,
            children,
        } => {
            let element = doc.create_element(tag);
            for (name, value) in attrs {
                element.set_attr(name, value);
            }
            for child in children {
                let child = build_node(doc, child)?;
                doc.append_child(&element, &child)?;
            }
            Ok(element)
        }
    }
}

/// Load a page description from a JSON file
pub fn load_page(path: &Path) -> Result<Document> {
    debug!("Loading page from {:?}", path);
    let json = std::fs::read_to_string(path)?;
    PageSpec::from_json(&json)?.build()
}
