//! Plain text format implementation
//!
//! Every block prints as one or more `line` elements; the codec writes one line per element,
//! indented by its `indent` attribute. Import reads every non-empty line as a paragraph.

use crate::diagnostics::Diagnostics;
use crate::error::ConvertError;
use crate::format::{FormatCodec, TargetFormat};
use crate::markup::{Element, Node};
use crate::options::ConvertOptions;

pub const LINE: &str = "line";
const INDENT: &str = "indent";

/// A `line` element holding `children`.
pub fn line(children: Vec<Node>) -> Node {
    Element::new(LINE).children(children).into()
}

/// Indent every line in `nodes` by one more level.
pub fn indent(nodes: Vec<Node>) -> Vec<Node> {
    nodes
        .into_iter()
        .map(|node| match node {
            Node::Element(mut element) if element.is(LINE) => {
                let depth = indent_of(&element) + 1;
                element.attrs.insert(INDENT.to_string(), depth.to_string());
                Node::Element(element)
            }
            other => other,
        })
        .collect()
}

fn indent_of(element: &Element) -> usize {
    element
        .get_attr(INDENT)
        .and_then(|depth| depth.parse().ok())
        .unwrap_or(0)
}

pub(crate) fn parse_lines(source: &str, mut convert: impl FnMut(&str) -> Vec<Node>) -> Vec<Node> {
    source
        .lines()
        .map(str::trim_end)
        .filter(|text| !text.trim().is_empty())
        .map(|text| line(convert(text)))
        .collect()
}

pub(crate) fn print_lines(nodes: &[Node]) -> String {
    let mut lines = Vec::new();
    for node in nodes {
        match node {
            Node::Element(element) if element.is(LINE) => {
                let prefix = "  ".repeat(indent_of(element));
                for (index, text) in element.text_content().split('\n').enumerate() {
                    if index == 0 {
                        lines.push(format!("{}{}", prefix, text));
                    } else {
                        lines.push(format!("{}  {}", prefix, text));
                    }
                }
            }
            other => lines.push(other.text_content()),
        }
    }
    lines.join("\n")
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextCodec;

impl FormatCodec for PlainTextCodec {
    fn format(&self) -> TargetFormat {
        TargetFormat::PlainText
    }

    fn parse(&self, source: &str, _diagnostics: &mut Diagnostics) -> Vec<Node> {
        parse_lines(source, |text| vec![Node::text(text)])
    }

    fn print(&self, nodes: &[Node], _options: &ConvertOptions) -> Result<String, ConvertError> {
        Ok(print_lines(nodes))
    }

    fn is_inline(&self, element: &Element) -> bool {
        !element.is(LINE)
    }

    fn is_transparent(&self, _element: &Element) -> bool {
        true
    }

    fn paragraph_tag(&self) -> &str {
        LINE
    }

    fn placeholder(&self, flavour: &str, options: &ConvertOptions) -> Node {
        line(vec![Node::text(options.plain_text.placeholder_for(flavour))])
    }
}
