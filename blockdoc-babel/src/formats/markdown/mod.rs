//! Markdown format implementation
//!
//! Strategy: comrak in both directions, with an mdast-style markup tree in between.
//!
//! # Data Model
//!
//! | Block | Markdown | Notes |
//! |-------|----------|-------|
//! | page, note | children only | |
//! | paragraph | paragraph, `#` headings, `>` quotes | by `type` prop |
//! | list | `-` / `1.` / `- [ ]` items | consecutive items of one kind form one list |
//! | code | fenced code block | language in the info string |
//! | divider | thematic break | |
//! | image | `![caption](url)` | |
//! | embed-github | paragraph with a link | export only |
//!
//! Markdown cannot express underline; it is dropped on export. Soft line breaks read as
//! spaces, hard breaks as newlines inside a run.

pub mod parser;
pub mod serializer;

use crate::diagnostics::Diagnostics;
use crate::error::ConvertError;
use crate::format::{FormatCodec, TargetFormat};
use crate::markup::{Element, Node};
use crate::options::ConvertOptions;

pub use parser::parse_markdown;
pub use serializer::serialize_to_markdown;

const INLINE_TAGS: &[&str] = &[
    "strong",
    "emphasis",
    "delete",
    "inlineCode",
    "link",
    "linkReference",
    "image",
    "break",
    "htmlInline",
];

const CONTAINER_TAGS: &[&str] = &["root", "table", "tableRow", "tableCell"];

pub(crate) fn is_inline_tag(element: &Element) -> bool {
    INLINE_TAGS.contains(&element.tag.as_str())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownCodec;

impl FormatCodec for MarkdownCodec {
    fn format(&self) -> TargetFormat {
        TargetFormat::Markdown
    }

    fn parse(&self, source: &str, _diagnostics: &mut Diagnostics) -> Vec<Node> {
        parse_markdown(source)
    }

    fn print(&self, nodes: &[Node], options: &ConvertOptions) -> Result<String, ConvertError> {
        serialize_to_markdown(nodes, &options.markdown).map_err(|message| {
            ConvertError::Serialization {
                format: TargetFormat::Markdown,
                message,
            }
        })
    }

    /// Images count as blocks here: a paragraph holding only an image is already an `image`
    /// node, and an image inside text has no run representation.
    fn is_inline(&self, element: &Element) -> bool {
        is_inline_tag(element) && !element.is("image")
    }

    fn is_container(&self, element: &Element) -> bool {
        CONTAINER_TAGS.contains(&element.tag.as_str())
    }

    fn paragraph_tag(&self) -> &str {
        "paragraph"
    }

    fn line_break_tag(&self) -> Option<&str> {
        Some("break")
    }

    fn placeholder(&self, flavour: &str, _options: &ConvertOptions) -> Node {
        Element::new("html")
            .attr("value", format!("<!-- unsupported block: {} -->", flavour))
            .into()
    }
}
