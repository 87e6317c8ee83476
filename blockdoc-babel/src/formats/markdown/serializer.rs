//! Markdown serialization (markup tree → Markdown)
//!
//! Pipeline: mdast-style [`Node`]s → Comrak AST → Markdown string (comrak's CommonMark
//! formatter, so escaping and list layout follow comrak).
//!
//! Before building the AST, consecutive `list` nodes of the same kind are merged into one list
//! and whitespace at the edges of `strong`/`emphasis`/`delete` is moved outside the
//! delimiters. A `strong`/`emphasis`/`delete` whose delimiters would not flank (touching a
//! word character or another mark's delimiters) is written as inline `<strong>`, `<em>` or
//! `<del>` tags instead, which the parser folds back. Reference-style links are written as `[text][label]` with their `definition`
//! nodes collected at the end of the document.

use super::parser::default_comrak_options;
use crate::markup::{Element, Node};
use crate::options::MarkdownOptions;
use comrak::nodes::{
    Ast, AstNode, ListDelimType, ListType, NodeCode, NodeCodeBlock, NodeHeading, NodeHtmlBlock,
    NodeLink, NodeList, NodeValue,
};
use comrak::{format_commonmark, Arena, ListStyleType};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;

const REFERENCE_SCHEME: &str = "blockdoc-reference:";

static REFERENCE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\]\(blockdoc-reference:([0-9]+)\)").expect("reference link pattern is valid")
});

/// Serialize block-level nodes to Markdown
pub fn serialize_to_markdown(nodes: &[Node], options: &MarkdownOptions) -> Result<String, String> {
    let (definitions, blocks): (Vec<Node>, Vec<Node>) = nodes
        .iter()
        .cloned()
        .partition(|node| node.as_element().is_some_and(|e| e.is("definition")));
    let blocks = merge_adjacent_lists(blocks);

    let arena = Arena::new();
    let root = alloc(&arena, NodeValue::Document);
    for node in &blocks {
        append_block(&arena, root, node);
    }

    let mut comrak_options = default_comrak_options();
    comrak_options.render.unsafe_ = true;
    comrak_options.render.list_style = match options.bullet() {
        '*' => ListStyleType::Star,
        '+' => ListStyleType::Plus,
        _ => ListStyleType::Dash,
    };

    let mut output = Vec::new();
    format_commonmark(root, &comrak_options, &mut output)
        .map_err(|e| format!("Comrak serialization failed: {}", e))?;
    let markdown =
        String::from_utf8(output).map_err(|e| format!("UTF-8 conversion failed: {}", e))?;

    // Lists of different kinds are separate lists anyway
    let cleaned = markdown.replace("<!-- end list -->\n\n", "");
    let mut cleaned = REFERENCE_LINK.replace_all(&cleaned, "][$1]").into_owned();

    if !definitions.is_empty() {
        let trimmed_len = cleaned.trim_end().len();
        cleaned.truncate(trimmed_len);
        if !cleaned.is_empty() {
            cleaned.push_str("\n\n");
        }
        for definition in definitions.iter().filter_map(Node::as_element) {
            cleaned.push_str(&format!(
                "[{}]: {}\n",
                definition.get_attr("label").unwrap_or_default(),
                definition.get_attr("url").unwrap_or_default()
            ));
        }
    }
    Ok(cleaned)
}

/// Merge consecutive `list` siblings with the same `ordered` flag, recursively.
fn merge_adjacent_lists(nodes: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        let node = match node {
            Node::Element(mut element) => {
                element.children = merge_adjacent_lists(element.children);
                Node::Element(element)
            }
            text => text,
        };
        if let (Some(Node::Element(previous)), Node::Element(current)) = (out.last_mut(), &node) {
            if previous.is("list")
                && current.is("list")
                && previous.get_attr("ordered") == current.get_attr("ordered")
            {
                previous.children.extend(current.children.iter().cloned());
                continue;
            }
        }
        out.push(node);
    }
    out
}

fn alloc<'a>(arena: &'a Arena<AstNode<'a>>, value: NodeValue) -> &'a AstNode<'a> {
    arena.alloc(AstNode::new(RefCell::new(Ast::new(value, (0, 0).into()))))
}

fn append_block<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, node: &Node) {
    let element = match node {
        Node::Text(text) if text.trim().is_empty() => return,
        Node::Text(_) => {
            let paragraph = alloc(arena, NodeValue::Paragraph);
            parent.append(paragraph);
            append_inline(arena, paragraph, node, Neighbour::Edge, Neighbour::Edge);
            return;
        }
        Node::Element(element) => element,
    };

    match element.tag.as_str() {
        "paragraph" => {
            if element.children.is_empty() {
                return;
            }
            let paragraph = alloc(arena, NodeValue::Paragraph);
            parent.append(paragraph);
            append_inlines(arena, paragraph, &element.children);
        }
        "heading" => {
            let level = element
                .get_attr("depth")
                .and_then(|depth| depth.parse::<u8>().ok())
                .unwrap_or(1)
                .clamp(1, 6);
            let heading = alloc(
                arena,
                NodeValue::Heading(NodeHeading {
                    level,
                    setext: false,
                }),
            );
            parent.append(heading);
            append_inlines(arena, heading, &element.children);
        }
        "blockquote" => {
            let quote = alloc(arena, NodeValue::BlockQuote);
            parent.append(quote);
            append_mixed(arena, quote, &element.children);
        }
        "list" => append_list(arena, parent, element),
        "code" => {
            let mut literal = element.text_content();
            literal.push('\n');
            let code = alloc(
                arena,
                NodeValue::CodeBlock(NodeCodeBlock {
                    fenced: true,
                    fence_char: b'`',
                    fence_length: fence_length(&literal),
                    fence_offset: 0,
                    info: element.get_attr("lang").unwrap_or_default().to_string(),
                    literal,
                }),
            );
            parent.append(code);
        }
        "thematicBreak" => parent.append(alloc(arena, NodeValue::ThematicBreak)),
        "image" => {
            let paragraph = alloc(arena, NodeValue::Paragraph);
            parent.append(paragraph);
            append_inline(arena, paragraph, node, Neighbour::Edge, Neighbour::Edge);
        }
        "html" => {
            let mut literal = element.get_attr("value").unwrap_or_default().to_string();
            literal.push('\n');
            parent.append(alloc(
                arena,
                NodeValue::HtmlBlock(NodeHtmlBlock {
                    block_type: 0,
                    literal,
                }),
            ));
        }
        _ => append_mixed(arena, parent, &element.children),
    }
}

/// Block content that may start with loose inline nodes (quotes, list items).
fn append_mixed<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, nodes: &[Node]) {
    let mut loose: Vec<Node> = Vec::new();
    for node in nodes {
        if is_inline(node) {
            loose.push(node.clone());
            continue;
        }
        flush_loose(arena, parent, &mut loose);
        append_block(arena, parent, node);
    }
    flush_loose(arena, parent, &mut loose);
}

fn flush_loose<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, loose: &mut Vec<Node>) {
    let nodes = std::mem::take(loose);
    if nodes.iter().all(Node::is_blank) {
        return;
    }
    let paragraph = alloc(arena, NodeValue::Paragraph);
    parent.append(paragraph);
    append_inlines(arena, paragraph, &nodes);
}

fn append_list<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, element: &Element) {
    let ordered = element.get_attr("ordered") == Some("true");
    let start = element
        .get_attr("start")
        .and_then(|start| start.parse::<usize>().ok())
        .unwrap_or(1);
    let attributes = NodeList {
        list_type: if ordered {
            ListType::Ordered
        } else {
            ListType::Bullet
        },
        marker_offset: 0,
        padding: 0,
        start,
        delimiter: ListDelimType::Period,
        bullet_char: b'-',
        tight: true,
    };
    let list = alloc(arena, NodeValue::List(attributes.clone()));
    parent.append(list);

    for item in element.elements().filter(|child| child.is("listItem")) {
        let value = match item.get_attr("checked") {
            Some("true") => NodeValue::TaskItem(Some('x')),
            Some(_) => NodeValue::TaskItem(None),
            None => NodeValue::Item(attributes.clone()),
        };
        let item_node = alloc(arena, value);
        list.append(item_node);
        append_mixed(arena, item_node, &item.children);
    }
}

fn is_inline(node: &Node) -> bool {
    match node {
        Node::Text(_) => true,
        Node::Element(element) => super::is_inline_tag(element),
    }
}

/// What sits right outside an inline node once printed.
#[derive(Debug, Clone, Copy)]
enum Neighbour {
    /// Block boundary, or the delimiter, bracket or tag of the enclosing element.
    Edge,
    /// A character of a sibling text node.
    Char(char),
    /// A sibling element, which prints its own delimiters.
    Markup,
}

impl Neighbour {
    fn before(node: &Node) -> Self {
        match node {
            Node::Text(text) => text.chars().last().map_or(Neighbour::Markup, Neighbour::Char),
            Node::Element(_) => Neighbour::Markup,
        }
    }

    fn after(node: &Node) -> Self {
        match node {
            Node::Text(text) => text.chars().next().map_or(Neighbour::Markup, Neighbour::Char),
            Node::Element(_) => Neighbour::Markup,
        }
    }

    /// Whether a `*`/`~` delimiter run may sit between this neighbour and `inner_edge`, the
    /// printed character on the mark's side, and still only open (or only close).
    ///
    /// Word characters and other marks are rejected outright: `**(x)**y` and `**a***b*` do
    /// not read back as written.
    fn admits_delimiter(self, inner_edge: char) -> bool {
        match self {
            Neighbour::Edge => true,
            Neighbour::Char(c) => {
                c.is_whitespace() || (!c.is_alphanumeric() && inner_edge.is_alphanumeric())
            }
            Neighbour::Markup => false,
        }
    }
}

fn append_inlines<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, nodes: &[Node]) {
    append_inlines_between(arena, parent, nodes, Neighbour::Edge, Neighbour::Edge);
}

fn append_inlines_between<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    nodes: &[Node],
    before: Neighbour,
    after: Neighbour,
) {
    for (index, node) in nodes.iter().enumerate() {
        let previous = match index.checked_sub(1) {
            Some(previous) => Neighbour::before(&nodes[previous]),
            None => before,
        };
        let next = nodes.get(index + 1).map_or(after, Neighbour::after);
        append_inline(arena, parent, node, previous, next);
    }
}

fn append_inline<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    node: &Node,
    previous: Neighbour,
    next: Neighbour,
) {
    let element = match node {
        Node::Text(text) => {
            for (index, line) in text.split('\n').enumerate() {
                if index > 0 {
                    parent.append(alloc(arena, NodeValue::LineBreak));
                }
                if !line.is_empty() {
                    parent.append(alloc(arena, NodeValue::Text(line.to_string())));
                }
            }
            return;
        }
        Node::Element(element) => element,
    };

    let (value, html_tag) = match element.tag.as_str() {
        "strong" => (NodeValue::Strong, Some("strong")),
        "emphasis" => (NodeValue::Emph, Some("em")),
        "delete" => (NodeValue::Strikethrough, Some("del")),
        "inlineCode" => {
            parent.append(alloc(
                arena,
                NodeValue::Code(NodeCode {
                    num_backticks: 1,
                    literal: element.text_content(),
                }),
            ));
            return;
        }
        "link" => (
            NodeValue::Link(NodeLink {
                url: element.get_attr("url").unwrap_or_default().to_string(),
                title: element.get_attr("title").unwrap_or_default().to_string(),
            }),
            None,
        ),
        "linkReference" => (
            NodeValue::Link(NodeLink {
                url: format!(
                    "{}{}",
                    REFERENCE_SCHEME,
                    element.get_attr("label").unwrap_or_default()
                ),
                title: String::new(),
            }),
            None,
        ),
        "image" => {
            let image = alloc(
                arena,
                NodeValue::Image(NodeLink {
                    url: element.get_attr("url").unwrap_or_default().to_string(),
                    title: element.get_attr("title").unwrap_or_default().to_string(),
                }),
            );
            parent.append(image);
            let alt = element.get_attr("alt").unwrap_or_default();
            if !alt.is_empty() {
                image.append(alloc(arena, NodeValue::Text(alt.to_string())));
            }
            return;
        }
        "break" => {
            parent.append(alloc(arena, NodeValue::LineBreak));
            return;
        }
        "htmlInline" => {
            let html = element.get_attr("value").unwrap_or_default().to_string();
            parent.append(alloc(arena, NodeValue::HtmlInline(html)));
            return;
        }
        _ => {
            append_inlines_between(arena, parent, &element.children, previous, next);
            return;
        }
    };

    let (leading, inner, trailing) = split_padding(element);
    if !leading.is_empty() {
        parent.append(alloc(arena, NodeValue::Text(leading.clone())));
    }
    if !inner.children.is_empty() {
        let before = leading.chars().last().map_or(previous, Neighbour::Char);
        let after = trailing.chars().next().map_or(next, Neighbour::Char);
        match html_tag {
            Some(tag) if !delimiters_flank(&inner, before, after) => {
                parent.append(alloc(arena, NodeValue::HtmlInline(format!("<{}>", tag))));
                append_inlines(arena, parent, &inner.children);
                parent.append(alloc(arena, NodeValue::HtmlInline(format!("</{}>", tag))));
            }
            _ => {
                let wrapper = alloc(arena, value);
                parent.append(wrapper);
                append_inlines(arena, wrapper, &inner.children);
            }
        }
    }
    if !trailing.is_empty() {
        parent.append(alloc(arena, NodeValue::Text(trailing)));
    }
}

/// Whether `*`, `**` or `~` around `inner` open and close where they are printed.
fn delimiters_flank(inner: &Element, before: Neighbour, after: Neighbour) -> bool {
    let first = inner.children.first().and_then(|node| printed_edge(node, false));
    let last = inner.children.last().and_then(|node| printed_edge(node, true));
    match (first, last) {
        (Some(first), Some(last)) => {
            !first.is_whitespace()
                && !last.is_whitespace()
                && before.admits_delimiter(first)
                && after.admits_delimiter(last)
        }
        _ => false,
    }
}

/// First (or last) character an inline node prints. Markup prints punctuation.
fn printed_edge(node: &Node, at_end: bool) -> Option<char> {
    let element = match node {
        Node::Text(text) if at_end => return text.chars().last(),
        Node::Text(text) => return text.chars().next(),
        Node::Element(element) => element,
    };
    let edge_child = if at_end {
        element.children.last()
    } else {
        element.children.first()
    };
    match element.tag.as_str() {
        "break" if at_end => Some('\n'),
        "strong" | "emphasis" | "delete" => {
            match edge_child.and_then(|child| printed_edge(child, at_end)) {
                Some(c) if c.is_whitespace() => Some(c),
                _ => Some('*'),
            }
        }
        _ if super::is_inline_tag(element) => Some('*'),
        _ => edge_child.and_then(|child| printed_edge(child, at_end)),
    }
}

/// Move whitespace at the edges of an emphasis-like element outside of it.
fn split_padding(element: &Element) -> (String, Element, String) {
    let mut inner = element.clone();
    let mut leading = String::new();
    let mut trailing = String::new();

    if let Some(Node::Text(first)) = inner.children.first_mut() {
        let trimmed = first.trim_start();
        leading = first[..first.len() - trimmed.len()].to_string();
        *first = trimmed.to_string();
    }
    if let Some(Node::Text(last)) = inner.children.last_mut() {
        let trimmed_len = last.trim_end().len();
        trailing = last[trimmed_len..].to_string();
        last.truncate(trimmed_len);
    }
    inner
        .children
        .retain(|child| !matches!(child, Node::Text(text) if text.is_empty()));
    (leading, inner, trailing)
}

fn fence_length(literal: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in literal.chars() {
        if c == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    (longest + 1).max(3)
}
