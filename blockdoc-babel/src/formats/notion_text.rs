//! Notion text format implementation
//!
//! Notion puts a JSON block dialect on the clipboard next to its HTML:
//!
//! ```text
//! {"blockType": "text", "editing": [["Hi ", []], ["bold", [["b"]]]]}
//! ```
//!
//! A payload is one such object or an array of them. `editing` holds `[text, marks]` segments
//! where each mark is `[code]` or `[code, value]`. Optional `language` and `checked` fields
//! carry code languages and to-do state.
//!
//! In the markup tree each object becomes a `block` element whose attributes mirror the
//! object's fields and whose children are the segments, with marks turned into nested
//! elements named after their codes (the value in a `value` attribute).

use crate::diagnostics::{Diagnostics, Warning};
use crate::error::ConvertError;
use crate::format::{FormatCodec, TargetFormat};
use crate::markup::{Element, Node};
use crate::options::ConvertOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const BLOCK: &str = "block";
pub const BLOCK_TYPE: &str = "blockType";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotionBlock {
    #[serde(default = "default_block_type")]
    block_type: String,
    #[serde(default)]
    editing: Vec<Segment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    checked: Option<bool>,
}

fn default_block_type() -> String {
    "text".to_string()
}

/// `[text, [[code, value?], ..]]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Segment(String, Vec<Vec<Value>>);

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Many(Vec<NotionBlock>),
    One(NotionBlock),
}

/// A `block` element of the given type.
pub fn block(block_type: &str, children: Vec<Node>) -> Element {
    Element::new(BLOCK)
        .attr(BLOCK_TYPE, block_type)
        .children(children)
}

fn to_element(block: NotionBlock) -> Node {
    let mut element = Element::new(BLOCK).attr(BLOCK_TYPE, block.block_type);
    if let Some(language) = block.language {
        element = element.attr("language", language);
    }
    if let Some(checked) = block.checked {
        element = element.attr("checked", checked.to_string());
    }
    for Segment(text, marks) in block.editing {
        let mut node = Node::Text(text);
        for mark in marks.iter().rev() {
            let Some(code) = mark.first().and_then(Value::as_str) else {
                continue;
            };
            let mut wrapper = Element::new(code);
            if let Some(value) = mark.get(1).and_then(Value::as_str) {
                wrapper = wrapper.attr("value", value);
            }
            node = wrapper.child(node).into();
        }
        element.children.push(node);
    }
    element.into()
}

fn from_element(element: &Element) -> NotionBlock {
    let mut editing = Vec::new();
    collect_segments(&element.children, &mut Vec::new(), &mut editing);
    NotionBlock {
        block_type: element
            .get_attr(BLOCK_TYPE)
            .unwrap_or("text")
            .to_string(),
        editing,
        language: element.get_attr("language").map(str::to_string),
        checked: element.get_attr("checked").map(|checked| checked == "true"),
    }
}

fn collect_segments(nodes: &[Node], marks: &mut Vec<Vec<Value>>, out: &mut Vec<Segment>) {
    for node in nodes {
        match node {
            Node::Text(text) if text.is_empty() => {}
            Node::Text(text) => out.push(Segment(text.clone(), marks.clone())),
            Node::Element(element) => {
                let mut mark = vec![Value::from(element.tag.as_str())];
                if let Some(value) = element.get_attr("value") {
                    mark.push(Value::from(value));
                }
                marks.push(mark);
                collect_segments(&element.children, marks, out);
                marks.pop();
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NotionTextCodec;

impl FormatCodec for NotionTextCodec {
    fn format(&self) -> TargetFormat {
        TargetFormat::NotionText
    }

    fn parse(&self, source: &str, diagnostics: &mut Diagnostics) -> Vec<Node> {
        if source.trim().is_empty() {
            return Vec::new();
        }
        match serde_json::from_str::<Payload>(source) {
            Ok(Payload::One(block)) => vec![to_element(block)],
            Ok(Payload::Many(blocks)) => blocks.into_iter().map(to_element).collect(),
            Err(_) => {
                diagnostics.push(Warning::unparseable_fragment(
                    TargetFormat::NotionText,
                    "payload",
                ));
                vec![block("text", vec![Node::text(source.trim())]).into()]
            }
        }
    }

    fn print(&self, nodes: &[Node], _options: &ConvertOptions) -> Result<String, ConvertError> {
        let blocks: Vec<NotionBlock> = nodes
            .iter()
            .filter_map(Node::as_element)
            .filter(|element| element.is(BLOCK))
            .map(from_element)
            .collect();
        let printed = match blocks.as_slice() {
            [single] => serde_json::to_string(single),
            _ => serde_json::to_string(&blocks),
        };
        printed.map_err(|e| ConvertError::Serialization {
            format: TargetFormat::NotionText,
            message: e.to_string(),
        })
    }

    fn is_inline(&self, element: &Element) -> bool {
        !element.is(BLOCK)
    }

    fn paragraph_tag(&self) -> &str {
        BLOCK
    }

    fn placeholder(&self, flavour: &str, options: &ConvertOptions) -> Node {
        block(
            "text",
            vec![Node::text(options.plain_text.placeholder_for(flavour))],
        )
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> (Vec<Node>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let nodes = NotionTextCodec.parse(source, &mut diagnostics);
        (nodes, diagnostics)
    }

    #[test]
    fn test_marks_become_nested_elements() {
        let (nodes, diagnostics) = parse(
            r#"{"blockType":"text","editing":[["Hi ",[]],["site",[["b"],["a","https://x.example"]]]]}"#,
        );
        assert!(diagnostics.is_empty());
        let block = nodes[0].as_element().unwrap();
        assert_eq!(block.get_attr(BLOCK_TYPE), Some("text"));
        let bold = block.children[1].as_element().unwrap();
        assert!(bold.is("b"));
        let link = bold.children[0].as_element().unwrap();
        assert_eq!(link.get_attr("value"), Some("https://x.example"));
    }

    #[test]
    fn test_array_payload() {
        let (nodes, _) = parse(
            r#"[{"blockType":"header","editing":[["Title",[]]]},{"blockType":"code","language":"rust","editing":[["fn x()",[]]]}]"#,
        );
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].as_element().unwrap().get_attr("language"), Some("rust"));
    }

    #[test]
    fn test_invalid_json_degrades_to_text() {
        let (nodes, diagnostics) = parse("not { json");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(nodes[0].text_content(), "not { json");
    }

    #[test]
    fn test_print_single_block() {
        let nodes = vec![block(
            "text",
            vec![
                Node::text("Hi "),
                Element::new("b").text("bold").into(),
            ],
        )
        .into()];
        let json = NotionTextCodec
            .print(&nodes, &ConvertOptions::default())
            .unwrap();
        assert_eq!(
            json,
            r#"{"blockType":"text","editing":[["Hi ",[]],["bold",[["b"]]]]}"#
        );
    }
}
