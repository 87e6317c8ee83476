//! HTML parsing (HTML → markup tree)
//!
//! Pipeline: HTML string → html5ever → RcDom → `<body>` children as [`Node`]s.
//!
//! The DOM is simplified on the way: non-content elements (`<head>`, scripts, styles) are
//! skipped, comments are dropped, whitespace is collapsed outside `<pre>`, and a `<p>` holding
//! nothing but an image is replaced by that image.

use crate::markup::{Element, Node};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::collections::BTreeMap;

const SKIPPED: &[&str] = &["head", "script", "style", "template", "noscript", "meta", "link"];

/// Parse an HTML document or fragment into the content of its body.
pub fn parse_html(source: &str) -> Vec<Node> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(source);
    match find_element(&dom.document, "body") {
        Some(body) => convert_children(&body, false),
        None => Vec::new(),
    }
}

fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    for child in handle.children.borrow().iter() {
        if let NodeData::Element { ref name, .. } = child.data {
            if name.local.as_ref() == tag {
                return Some(child.clone());
            }
        }
        if let Some(found) = find_element(child, tag) {
            return Some(found);
        }
    }
    None
}

fn convert_children(handle: &Handle, preformatted: bool) -> Vec<Node> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(|child| convert(child, preformatted))
        .collect()
}

fn convert(handle: &Handle, preformatted: bool) -> Option<Node> {
    match handle.data {
        NodeData::Text { ref contents } => {
            let text = contents.borrow().to_string();
            if preformatted {
                Some(Node::Text(text))
            } else {
                Some(Node::Text(collapse_whitespace(&text)))
            }
        }
        NodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            let tag = name.local.to_string();
            if SKIPPED.contains(&tag.as_str()) {
                return None;
            }
            let attrs: BTreeMap<String, String> = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();
            let children = convert_children(handle, preformatted || tag == "pre");
            let element = Element {
                tag,
                attrs,
                children,
            };
            Some(hoist_images(element))
        }
        _ => None,
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// `<p><img></p>` → `<img>`, so images are not taken for paragraphs.
fn hoist_images(element: Element) -> Node {
    if !element.is("p") {
        return element.into();
    }
    let image = {
        let mut content = element.content();
        match (content.next(), content.next()) {
            (Some(Node::Element(img)), None) if img.is("img") => Some(img.clone()),
            _ => None,
        }
    };
    match image {
        Some(img) => img.into(),
        None => element.into(),
    }
}
