//! Notion HTML format implementation
//!
//! Notion's exported and clipboard HTML is ordinary HTML with its own conventions: the page is
//! an `<article class="page">` with a `page-body` div, every list item is its own `<ul>`/`<ol>`
//! with a class naming the list kind, to-dos carry a `div.checkbox`, and embeds are figures
//! with a `div.source` link. Parsing and printing reuse the HTML pipeline; the conventions live
//! in the block adapters and `crate::matchers::notion_html`.

use super::html::{
    is_container_tag, is_inline_tag, is_transparent_tag, parse_html, print_html,
    unsupported_placeholder, wrap_in_document,
};
use crate::diagnostics::Diagnostics;
use crate::error::ConvertError;
use crate::format::{FormatCodec, TargetFormat};
use crate::markup::{Element, Node};
use crate::options::ConvertOptions;

#[derive(Debug, Default, Clone, Copy)]
pub struct NotionHtmlCodec;

impl FormatCodec for NotionHtmlCodec {
    fn format(&self) -> TargetFormat {
        TargetFormat::NotionHtml
    }

    fn parse(&self, source: &str, _diagnostics: &mut Diagnostics) -> Vec<Node> {
        parse_html(source)
    }

    fn print(&self, nodes: &[Node], options: &ConvertOptions) -> Result<String, ConvertError> {
        let serialization = |message| ConvertError::Serialization {
            format: TargetFormat::NotionHtml,
            message,
        };
        let body = print_html(nodes).map_err(serialization)?;
        if options.html.full_document {
            wrap_in_document(&body, &options.html.title).map_err(serialization)
        } else {
            Ok(body)
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_wrappers_are_containers() {
        let nodes = NotionHtmlCodec.parse(
            r#"<article class="page"><div class="page-body"><p>x</p></div></article>"#,
            &mut Diagnostics::new(),
        );
        let article = nodes[0].as_element().unwrap();
        assert!(NotionHtmlCodec.is_container(article));
        assert!(NotionHtmlCodec.is_container(article.elements().next().unwrap()));
    }

    #[test]
    fn test_lists_are_not_merged() {
        let item = |text: &str| Node::from(Element::new("li").text(text));
        let nodes = vec![
            Element::new("ul").attr("class", "bulleted-list").child(item("a")).into(),
            Element::new("ul").attr("class", "bulleted-list").child(item("b")).into(),
        ];
        let html = NotionHtmlCodec.print(&nodes, &ConvertOptions::default()).unwrap();
        assert_eq!(html.matches("<ul").count(), 2);
    }
}
