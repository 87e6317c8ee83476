//! Markdown parsing (Markdown → markup tree)
//!
//! Pipeline: Markdown string → Comrak AST → mdast-style [`Node`]s.
//!
//! Block tags: `paragraph`, `heading` (`depth`), `blockquote`, `list` (`ordered`, `start`),
//! `listItem` (`checked` for task items), `code` (`lang`), `thematicBreak`, `html`, `image`
//! and `table`/`tableRow`/`tableCell`.
//! Inline tags: `strong`, `emphasis`, `delete`, `inlineCode`, `link` (`url`, `title`),
//! `image`, `break` and `htmlInline`.
//!
//! A paragraph holding nothing but an image becomes an `image` block. Inline `<strong>`/`<b>`,
//! `<em>`/`<i>` and `<del>`/`<s>` tag pairs fold into the matching mark elements.

use crate::markup::{Element, Node};
use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};

/// Parse Markdown into block-level nodes.
pub fn parse_markdown(source: &str) -> Vec<Node> {
    let arena = Arena::new();
    let options = default_comrak_options();
    let root = parse_document(&arena, source, &options);
    convert_children(root)
}

pub(crate) fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options
}

fn convert_children<'a>(node: &'a AstNode<'a>) -> Vec<Node> {
    fold_inline_tags(node.children().filter_map(convert).collect())
}

/// Mark element for an inline HTML tag, and whether the tag opens.
fn inline_tag(html: &str) -> Option<(&'static str, bool)> {
    let tag = html.trim().to_ascii_lowercase();
    let (name, opens) = match tag.strip_prefix("</") {
        Some(rest) => (rest.strip_suffix('>')?.to_string(), false),
        None => (tag.strip_prefix('<')?.strip_suffix('>')?.to_string(), true),
    };
    let mark = match name.as_str() {
        "strong" | "b" => "strong",
        "em" | "i" => "emphasis",
        "del" | "s" => "delete",
        _ => return None,
    };
    Some((mark, opens))
}

fn push_folded(open: &mut [(Element, Node)], out: &mut Vec<Node>, node: Node) {
    match open.last_mut() {
        Some((element, _)) => element.children.push(node),
        None => out.push(node),
    }
}

/// Replace balanced `htmlInline` tag pairs by elements; unbalanced tags stay raw.
fn fold_inline_tags(nodes: Vec<Node>) -> Vec<Node> {
    let mut open: Vec<(Element, Node)> = Vec::new();
    let mut out = Vec::new();
    for node in nodes {
        let tag = match &node {
            Node::Element(element) if element.is("htmlInline") => {
                element.get_attr("value").and_then(inline_tag)
            }
            _ => None,
        };
        match tag {
            Some((mark, true)) => {
                open.push((Element::new(mark), node));
                continue;
            }
            Some((mark, false)) if open.last().is_some_and(|(element, _)| element.is(mark)) => {
                if let Some((element, _)) = open.pop() {
                    push_folded(&mut open, &mut out, element.into());
                }
                continue;
            }
            _ => push_folded(&mut open, &mut out, node),
        }
    }
    while let Some((element, raw)) = open.pop() {
        push_folded(&mut open, &mut out, raw);
        for child in element.children {
            push_folded(&mut open, &mut out, child);
        }
    }
    out
}

fn convert<'a>(node: &'a AstNode<'a>) -> Option<Node> {
    let value = node.data.borrow().value.clone();
    let element = match value {
        NodeValue::Text(text) => return Some(Node::Text(text)),
        NodeValue::SoftBreak => return Some(Node::text(" ")),
        NodeValue::LineBreak => Element::new("break"),
        NodeValue::Paragraph => {
            let paragraph = Element::new("paragraph").children(convert_children(node));
            return Some(hoist_image(paragraph));
        }
        NodeValue::Heading(heading) => {
            Element::new("heading").attr("depth", heading.level.to_string())
        }
        NodeValue::BlockQuote => Element::new("blockquote"),
        NodeValue::List(list) => {
            let ordered = matches!(list.list_type, ListType::Ordered);
            let mut element = Element::new("list").attr("ordered", ordered.to_string());
            if ordered {
                element = element.attr("start", list.start.to_string());
            }
            element
        }
        NodeValue::Item(_) => Element::new("listItem"),
        NodeValue::TaskItem(symbol) => {
            Element::new("listItem").attr("checked", symbol.is_some().to_string())
        }
        NodeValue::CodeBlock(code) => {
            let mut element = Element::new("code").text(code.literal.trim_end_matches('\n'));
            let lang = code.info.split_whitespace().next().unwrap_or_default();
            if !lang.is_empty() {
                element = element.attr("lang", lang);
            }
            return Some(element.into());
        }
        NodeValue::HtmlBlock(html) => {
            return Some(Element::new("html").attr("value", html.literal.trim_end()).into())
        }
        NodeValue::HtmlInline(html) => {
            return Some(Element::new("htmlInline").attr("value", html).into())
        }
        NodeValue::ThematicBreak => return Some(Element::new("thematicBreak").into()),
        NodeValue::Strong => Element::new("strong"),
        NodeValue::Emph => Element::new("emphasis"),
        NodeValue::Strikethrough => Element::new("delete"),
        NodeValue::Code(code) => {
            return Some(Element::new("inlineCode").text(code.literal).into())
        }
        NodeValue::Link(link) => {
            let mut element = Element::new("link").attr("url", link.url);
            if !link.title.is_empty() {
                element = element.attr("title", link.title);
            }
            element
        }
        NodeValue::Image(link) => {
            let alt: String = node
                .children()
                .filter_map(convert)
                .map(|child| child.text_content())
                .collect();
            let mut element = Element::new("image").attr("url", link.url).attr("alt", alt);
            if !link.title.is_empty() {
                element = element.attr("title", link.title);
            }
            return Some(element.into());
        }
        NodeValue::Table(_) => Element::new("table"),
        NodeValue::TableRow(_) => Element::new("tableRow"),
        NodeValue::TableCell => Element::new("tableCell"),
        NodeValue::Document => Element::new("root"),
        _ => return None,
    };
    Some(element.children(convert_children(node)).into())
}

fn hoist_image(paragraph: Element) -> Node {
    let image = {
        let mut content = paragraph.content();
        match (content.next(), content.next()) {
            (Some(Node::Element(image)), None) if image.is("image") => Some(image.clone()),
            _ => None,
        }
    };
    match image {
        Some(image) => image.into(),
        None => paragraph.into(),
    }
}
