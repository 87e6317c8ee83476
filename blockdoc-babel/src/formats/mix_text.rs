//! Mixed text format implementation
//!
//! Plain text lines in which links survive: `[text](url)` on export, and both that form and
//! bare `http(s)` URLs on import.
//!
//! Labels escape `\`, `[` and `]` with a backslash. Parentheses in a URL are written as
//! `%28` and `%29` so the destination ends at the first `)`.

use super::plain_text::{parse_lines, print_lines, LINE};
use crate::diagnostics::Diagnostics;
use crate::error::ConvertError;
use crate::format::{FormatCodec, TargetFormat};
use crate::markup::{Element, Node};
use crate::options::ConvertOptions;
use once_cell::sync::Lazy;
use regex::Regex;

static LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[((?:\\[^\n]|[^\]\\\n])+)\]\((https?://[^\s)]+)\)|(https?://[^\s<>()\[\]]+)")
        .expect("link pattern is valid")
});

static BARE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s<>()\[\]]+$").expect("bare url pattern is valid"));

fn escape_label(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        if matches!(c, '\\' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn unescape_label(label: &str) -> String {
    let mut unescaped = String::with_capacity(label.len());
    let mut chars = label.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => unescaped.extend(chars.next()),
            c => unescaped.push(c),
        }
    }
    unescaped
}

fn encode_url(url: &str) -> String {
    url.replace('(', "%28").replace(')', "%29")
}

fn decode_url(url: &str) -> String {
    url.replace("%28", "(").replace("%29", ")")
}

/// Split a line into text and `link` elements.
pub fn parse_links(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut last = 0;
    for captures in LINK.captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        if whole.start() > last {
            nodes.push(Node::text(&text[last..whole.start()]));
        }
        let (label, url) = match (captures.get(1), captures.get(2), captures.get(3)) {
            (Some(label), Some(url), _) => {
                (unescape_label(label.as_str()), decode_url(url.as_str()))
            }
            (_, _, Some(url)) => (url.as_str().to_string(), url.as_str().to_string()),
            _ => continue,
        };
        nodes.push(Element::new("link").attr("url", url).text(label).into());
        last = whole.end();
    }
    if last < text.len() {
        nodes.push(Node::text(&text[last..]));
    }
    nodes
}

fn print_link(node: &Node) -> Node {
    match node {
        Node::Element(element) if element.is("link") => {
            let text = element.text_content();
            let url = element.get_attr("url").unwrap_or_default();
            if text == url && BARE_URL.is_match(url) {
                Node::text(url)
            } else {
                Node::text(format!("[{}]({})", escape_label(&text), encode_url(url)))
            }
        }
        Node::Element(element) => {
            let mut copy = Element::new(element.tag.as_str());
            copy.attrs = element.attrs.clone();
            copy.children = element.children.iter().map(print_link).collect();
            copy.into()
        }
        text => text.clone(),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MixTextCodec;

impl FormatCodec for MixTextCodec {
    fn format(&self) -> TargetFormat {
        TargetFormat::MixText
    }

    fn parse(&self, source: &str, _diagnostics: &mut Diagnostics) -> Vec<Node> {
        parse_lines(source, parse_links)
    }

    fn print(&self, nodes: &[Node], _options: &ConvertOptions) -> Result<String, ConvertError> {
        let nodes: Vec<Node> = nodes.iter().map(print_link).collect();
        Ok(print_lines(&nodes))
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
        super::plain_text::line(vec![Node::text(options.plain_text.placeholder_for(flavour))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_style_link() {
        let nodes = parse_links("see [docs](https://example.com/docs) now");
        assert_eq!(nodes.len(), 3);
        let link = nodes[1].as_element().unwrap();
        assert_eq!(link.get_attr("url"), Some("https://example.com/docs"));
        assert_eq!(link.text_content(), "docs");
        assert_eq!(nodes[2].text_content(), " now");
    }

    #[test]
    fn test_bare_url() {
        let nodes = parse_links("https://example.com");
        let link = nodes[0].as_element().unwrap();
        assert_eq!(link.text_content(), "https://example.com");
    }

    #[test]
    fn test_print_links() {
        let nodes = vec![super::super::plain_text::line(vec![
            Node::text("a "),
            Element::new("link")
                .attr("url", "https://x.example")
                .text("x")
                .into(),
        ])];
        let text = MixTextCodec.print(&nodes, &ConvertOptions::default()).unwrap();
        assert_eq!(text, "a [x](https://x.example)");
    }

    fn link_line(label: &str, url: &str) -> Vec<Node> {
        vec![super::super::plain_text::line(vec![Element::new("link")
            .attr("url", url)
            .text(label)
            .into()])]
    }

    fn reparse(nodes: &[Node]) -> (String, Vec<Node>) {
        let text = MixTextCodec.print(nodes, &ConvertOptions::default()).unwrap();
        let back = parse_links(&text);
        (text, back)
    }

    #[test]
    fn test_url_parentheses_are_encoded() {
        let (text, back) = reparse(&link_line("docs", "https://e.com/x_(y)"));
        assert_eq!(text, "[docs](https://e.com/x_%28y%29)");
        assert_eq!(back.len(), 1);
        let link = back[0].as_element().unwrap();
        assert_eq!(link.get_attr("url"), Some("https://e.com/x_(y)"));
        assert_eq!(link.text_content(), "docs");
    }

    #[test]
    fn test_label_brackets_are_escaped() {
        let (text, back) = reparse(&link_line("a]b [c] d\\e", "https://e.com"));
        assert_eq!(text, r"[a\]b \[c\] d\\e](https://e.com)");
        assert_eq!(back.len(), 1);
        let link = back[0].as_element().unwrap();
        assert_eq!(link.text_content(), "a]b [c] d\\e");
        assert_eq!(link.get_attr("url"), Some("https://e.com"));
    }

    #[test]
    fn test_bare_url_with_parentheses_keeps_brackets() {
        let (text, back) = reparse(&link_line("https://e.com/(y)", "https://e.com/(y)"));
        assert_eq!(text, "[https://e.com/(y)](https://e.com/%28y%29)");
        let link = back[0].as_element().unwrap();
        assert_eq!(link.text_content(), "https://e.com/(y)");
        assert_eq!(link.get_attr("url"), Some("https://e.com/(y)"));
    }
}
