//! HTML format implementation
//!
//! Strategy: html5ever in both directions, with the markup tree in between.
//!
//! # Data Model
//!
//! | Block | HTML Element | Notes |
//! |-------|--------------|-------|
//! | page, note | children only | the page title becomes `<title>` of full documents |
//! | paragraph | `<p>`, `<h1>`-`<h6>`, `<blockquote>` | by `type` prop |
//! | list | `<ul>`/`<ol>` with `<li>` | todo lists use `<ul class="todo-list">` and a checkbox |
//! | code | `<pre><code class="language-X">` | |
//! | divider | `<hr>` | |
//! | image | `<figure><img><figcaption>` | bare `<img>` accepted on import |
//! | embed-github | `<div class="embed-github">` with a link | export only |
//!
//! Inline marks are handled by the matchers in `crate::matchers::html`.
//!
//! # Whitespace
//!
//! Whitespace is collapsed on import outside `<pre>`, and `<br>` stands for a newline inside a
//! run in both directions.

pub mod parser;
pub mod serializer;

use crate::diagnostics::Diagnostics;
use crate::error::ConvertError;
use crate::format::{FormatCodec, TargetFormat};
use crate::markup::{Element, Node};
use crate::options::ConvertOptions;

pub use parser::parse_html;
pub use serializer::{merge_adjacent_lists, print_html, wrap_in_document};

const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "del", "dfn", "em", "font",
    "i", "ins", "kbd", "label", "mark", "q", "s", "samp", "small", "span", "strike", "strong",
    "sub", "sup", "time", "u", "var", "wbr",
];

const CONTAINER_TAGS: &[&str] = &[
    "html", "body", "div", "article", "section", "main", "header", "footer", "nav", "aside",
    "center", "details", "summary", "tbody", "thead", "table", "tr", "td", "th", "dl", "dd", "dt",
];

const TRANSPARENT_TAGS: &[&str] = &[
    "span", "font", "label", "small", "abbr", "cite", "bdi", "bdo", "data", "time", "wbr", "q",
    "dfn", "var", "samp", "sub", "sup",
];

const PRESENTATIONAL_ATTRS: &[&str] = &["class", "style", "id", "dir", "lang", "title"];

pub(crate) fn is_inline_tag(element: &Element) -> bool {
    INLINE_TAGS.contains(&element.tag.as_str())
}

pub(crate) fn is_container_tag(element: &Element) -> bool {
    CONTAINER_TAGS.contains(&element.tag.as_str())
}

/// A wrapper tag with only presentational attributes adds nothing to a run.
pub(crate) fn is_transparent_tag(element: &Element) -> bool {
    TRANSPARENT_TAGS.contains(&element.tag.as_str())
        && element
            .attrs
            .keys()
            .all(|key| PRESENTATIONAL_ATTRS.contains(&key.as_str()))
}

pub(crate) fn unsupported_placeholder(flavour: &str) -> Node {
    Element::new("div")
        .attr("class", "unsupported-block")
        .attr("data-flavour", flavour)
        .into()
}

/// Semantic HTML
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlCodec;

impl FormatCodec for HtmlCodec {
    fn format(&self) -> TargetFormat {
        TargetFormat::Html
    }

    fn parse(&self, source: &str, _diagnostics: &mut Diagnostics) -> Vec<Node> {
        parse_html(source)
    }

    fn print(&self, nodes: &[Node], options: &ConvertOptions) -> Result<String, ConvertError> {
        let nodes = merge_adjacent_lists(nodes.to_vec());
        let body = print_html(&nodes).map_err(|message| ConvertError::Serialization {
            format: TargetFormat::Html,
            message,
        })?;
        if !options.html.full_document {
            return Ok(body);
        }
        wrap_in_document(&body, &options.html.title).map_err(|message| {
            ConvertError::Serialization {
                format: TargetFormat::Html,
                message,
            }
        })
    }

    fn is_inline(&self, element: &Element) -> bool {
        is_inline_tag(element)
    }

    fn is_container(&self, element: &Element) -> bool {
        is_container_tag(element)
    }

    fn is_transparent(&self, element: &Element) -> bool {
        is_transparent_tag(element)
    }

    fn paragraph_tag(&self) -> &str {
        "p"
    }

    fn line_break_tag(&self) -> Option<&str> {
        Some("br")
    }

    fn placeholder(&self, flavour: &str, _options: &ConvertOptions) -> Node {
        unsupported_placeholder(flavour)
    }
}
