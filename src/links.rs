//! Link resolution and anchor text extraction
//!
//! Two URLs name the same link iff their normalized forms are equal, so
//! every comparison here normalizes both sides.

use crate::dom::{closest, Document, Node, NodeRef};
use log::debug;
use url::Url;

/// Placeholder returned when an anchor has no text and no usable href
pub const NO_TEXT: &str = "(No Text)";

/// Canonicalize a URL for equality comparison
///
/// Resolves `url` against `base`, drops the fragment, and drops trailing
/// path separators unless the path is the root. Input that does not parse
/// only loses its fragment.
pub fn normalize_url(url: &str, base: &Url) -> String {
    let url = url.trim();
    match base.join(url) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            if !parsed.cannot_be_a_base() {
                let path = parsed.path();
                let trimmed = path.trim_end_matches('/');
                if trimmed.len() != path.len() {
                    let trimmed = if trimmed.is_empty() { "/" } else { trimmed }.to_string();
                    parsed.set_path(&trimmed);
                }
            }
            parsed.into()
        }
        Err(e) => {
            debug!("Normalizing unparseable URL {:?} as text: {}", url, e);
            let without_fragment = url.split('#').next().unwrap_or_default();
            if base.join(without_fragment).is_ok() {
                return normalize_url(without_fragment, base);
            }
            without_fragment.to_string()
        }
    }
}

/// Best human-readable label for an anchor element
///
/// Priority: trimmed text content, then `aria-label`, then `title`, then the
/// `alt` of the first descendant image carrying one, then the resolved href.
/// Never empty.
pub fn extract_anchor_text(doc: &Document, anchor: &NodeRef) -> String {
    let text = anchor.text_content();
    let text = text.trim();
    if !text.is_empty() {
        return text.to_string();
    }

    for attr in ["aria-label", "title"] {
        if let Some(label) = non_empty_attr(anchor, attr) {
            return label;
        }
    }

    let image_alt = crate::dom::descendants(anchor)
        .into_iter()
        .find(|n| n.is_element("img") && n.has_attr("alt"))
        .and_then(|img| img.attr("alt"))
        .map(|alt| alt.trim().to_string())
        .filter(|alt| !alt.is_empty());
    if let Some(alt) = image_alt {
        return alt;
    }

    match doc.resolve_href(anchor) {
        Some(url) => url.into(),
        None => NO_TEXT.to_string(),
    }
}

fn non_empty_attr(node: &Node, name: &str) -> Option<String> {
    node.attr(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The link element containing `node`, if any
///
/// Any `<a>` counts, with or without an href.
pub fn closest_anchor(node: &NodeRef) -> Option<NodeRef> {
    closest(node, "a")
}

/// Normalized href of an anchor, `None` when it has no href
pub fn normalized_href(doc: &Document, anchor: &Node) -> Option<String> {
    let href = anchor.attr("href")?;
    Some(normalize_url(&href, doc.base_url()))
}

/// First `<a href>` in document order whose normalized href equals `link_url`'s
pub fn find_anchor_by_url(doc: &Document, link_url: &str) -> Option<NodeRef> {
    let wanted = normalize_url(link_url, doc.base_url());
    doc.anchors()
        .into_iter()
        .find(|a| normalized_href(doc, a).as_deref() == Some(wanted.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://ex.com/dir/").unwrap()
    }

    #[test]
    fn test_normalize_strips_trailing_slash_and_fragment() {
        let base = base();
        assert_eq!(normalize_url("https://ex.com/a/", &base), "https://ex.com/a");
        assert_eq!(
            normalize_url("https://ex.com/a/", &base),
            normalize_url("https://ex.com/a", &base)
        );
        assert_eq!(normalize_url("https://ex.com/#frag", &base), "https://ex.com/");
        assert_eq!(normalize_url("https://ex.com/", &base), "https://ex.com/");
        assert_eq!(normalize_url("https://ex.com", &base), "https://ex.com/");
    }

    #[test]
    fn test_normalize_resolves_relative() {
        let base = base();
        assert_eq!(normalize_url("x/", &base), "https://ex.com/dir/x");
        assert_eq!(normalize_url("/top#a", &base), "https://ex.com/top");
        assert_eq!(normalize_url("#only", &base), "https://ex.com/dir");
    }

    #[test]
    fn test_normalize_keeps_query() {
        let base = base();
        assert_eq!(
            normalize_url("https://ex.com/a/?q=1#x", &base),
            "https://ex.com/a?q=1"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let base = base();
        for input in [
            "https://ex.com/a//",
            "https://ex.com/",
            "../up/",
            "mailto:someone@ex.com",
            "https://ex.com/a/?q=1#x",
            "HTTPS://EX.COM/Path/",
            "https:///",
            "https:///#frag",
        ] {
            let once = normalize_url(input, &base);
            assert_eq!(normalize_url(&once, &base), once, "input {:?}", input);
        }
    }

    #[test]
    fn test_unparseable_url_keeps_slashes() {
        let base = base();
        assert_eq!(normalize_url("https:///", &base), "https:///");
        assert_eq!(normalize_url("https:///#frag", &base), "https:///");
    }

    #[test]
    fn test_find_anchor_by_url_first_match() {
        let doc = Document::parse_base("https://ex.com/").unwrap();
        for (href, text) in [("/y", "Other"), ("/x/", "First"), ("https://ex.com/x#top", "Second")] {
            let a = doc.create_element("a");
            a.set_attr("href", href);
            doc.append_child(&a, &doc.create_text(text)).unwrap();
            doc.append_child(doc.body(), &a).unwrap();
        }

        let found = find_anchor_by_url(&doc, "https://ex.com/x").unwrap();
        assert_eq!(found.text_content(), "First");
        assert!(find_anchor_by_url(&doc, "https://ex.com/z").is_none());
    }
}
