//! Anchor text extraction tests
//!
//! Checks the priority order: visible text, aria-label, title, image alt,
//! then the link's own URL.

use linktext::dom::loader::PageSpec;
use linktext::dom::Document;
use linktext::links::{extract_anchor_text, NO_TEXT};

fn page(body: &str) -> Document {
    let json = format!(r#"{{"url": "https://ex.com/dir/", "body": [{}]}}"#, body);
    PageSpec::from_json(&json)
        .expect("valid page json")
        .build()
        .expect("page builds")
}

fn text_of(doc: &Document, id: &str) -> String {
    let anchor = doc.get_element_by_id(id).expect("anchor exists");
    extract_anchor_text(doc, &anchor)
}

#[test]
fn test_visible_text_wins() {
    let doc = page(
        r#"{"tag": "a", "attrs": {"id": "a", "href": "/x", "aria-label": "Label", "title": "Title"},
            "children": ["  Hello ", {"tag": "b", "children": ["world"]}, " ",
                         {"tag": "img", "attrs": {"alt": "Alt"}}]}"#,
    );
    assert_eq!(text_of(&doc, "a"), "Hello world");
}

#[test]
fn test_aria_label_before_title() {
    let doc = page(
        r#"{"tag": "a", "attrs": {"id": "a", "href": "/x", "aria-label": "  Label  ", "title": "Title"},
            "children": ["   "]}"#,
    );
    assert_eq!(text_of(&doc, "a"), "Label");
}

#[test]
fn test_blank_aria_label_falls_through_to_title() {
    let doc = page(
        r#"{"tag": "a", "attrs": {"id": "a", "href": "/x", "aria-label": "   ", "title": " Title "}}"#,
    );
    assert_eq!(text_of(&doc, "a"), "Title");
}

#[test]
fn test_image_alt() {
    let doc = page(
        r#"{"tag": "a", "attrs": {"id": "a", "href": "/x"},
            "children": [{"tag": "span", "children": [
                {"tag": "img", "attrs": {"src": "spacer.gif"}},
                {"tag": "img", "attrs": {"alt": "  Company logo "}},
                {"tag": "img", "attrs": {"alt": "second"}}
            ]}]}"#,
    );
    assert_eq!(text_of(&doc, "a"), "Company logo");
}

#[test]
fn test_url_fallback_is_resolved() {
    let doc = page(r#"{"tag": "a", "attrs": {"id": "a", "href": "page/#top"}}"#);
    assert_eq!(text_of(&doc, "a"), "https://ex.com/dir/page/#top");
}

#[test]
fn test_empty_alt_falls_back_to_url() {
    let doc = page(
        r#"{"tag": "a", "attrs": {"id": "a", "href": "/x"},
            "children": [{"tag": "img", "attrs": {"alt": " "}}]}"#,
    );
    assert_eq!(text_of(&doc, "a"), "https://ex.com/x");
}

#[test]
fn test_no_href_placeholder() {
    let doc = page(r#"{"tag": "a", "attrs": {"id": "a", "name": "anchor"}}"#);
    assert_eq!(text_of(&doc, "a"), NO_TEXT);
}
