//! HTML serialization (markup tree → HTML)
//!
//! Pipeline: [`Node`]s → RcDom handles → html5ever serializer.
//!
//! Top-level nodes are printed one per line. Text containing newlines is printed with `<br>`
//! outside `<pre>`.

use crate::markup::{Element, Node};
use html5ever::{
    ns, serialize, serialize::SerializeOpts, serialize::TraversalScope, Attribute, LocalName,
    QualName,
};
use markup5ever_rcdom::{Handle, Node as DomNode, NodeData, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Print nodes as an HTML fragment.
pub fn print_html(nodes: &[Node]) -> Result<String, String> {
    let mut lines = Vec::with_capacity(nodes.len());
    for node in nodes {
        let mut output = Vec::new();
        for handle in build(node, false) {
            serialize_handle(&mut output, &handle)?;
        }
        lines.push(String::from_utf8(output).map_err(|e| format!("UTF-8 conversion failed: {}", e))?);
    }
    Ok(lines.join("\n"))
}

/// Wrap a printed fragment in a complete document.
pub fn wrap_in_document(body: &str, title: &str) -> Result<String, String> {
    let title = print_html(&[Element::new("title").text(title).into()])?;
    Ok(format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n{}\n</head>\n<body>\n{}\n</body>\n</html>\n",
        title, body
    ))
}

/// Merge adjacent `<ul>`/`<ol>` siblings of the same class, recursively.
///
/// List adapters emit one list element per list block; consecutive items of one kind read as
/// one list.
pub fn merge_adjacent_lists(nodes: Vec<Node>) -> Vec<Node> {
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
            if is_list(previous)
                && previous.tag == current.tag
                && previous.get_attr("class") == current.get_attr("class")
            {
                previous.children.extend(current.children.iter().cloned());
                continue;
            }
        }
        out.push(node);
    }
    out
}

fn is_list(element: &Element) -> bool {
    element.is("ul") || element.is("ol")
}

fn build(node: &Node, preformatted: bool) -> Vec<Handle> {
    match node {
        Node::Text(text) if preformatted || !text.contains('\n') => vec![create_text(text)],
        Node::Text(text) => {
            let mut handles = Vec::new();
            for (index, line) in text.split('\n').enumerate() {
                if index > 0 {
                    handles.push(create_element("br", &[]));
                }
                if !line.is_empty() {
                    handles.push(create_text(line));
                }
            }
            handles
        }
        Node::Element(element) => {
            let attrs: Vec<(&str, &str)> = element
                .attrs
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str()))
                .collect();
            let handle = create_element(&element.tag, &attrs);
            let preformatted = preformatted || element.is("pre");
            for child in &element.children {
                handle
                    .children
                    .borrow_mut()
                    .extend(build(child, preformatted));
            }
            vec![handle]
        }
    }
}

fn serialize_handle(output: &mut Vec<u8>, handle: &Handle) -> Result<(), String> {
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    let serializable = SerializableHandle::from(handle.clone());
    serialize(output, &serializable, opts).map_err(|e| format!("HTML serialization failed: {}", e))
}

/// Create an HTML element with attributes
fn create_element(tag: &str, attrs: &[(&str, &str)]) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(*name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(DomNode {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a text node
fn create_text(text: &str) -> Handle {
    Rc::new(DomNode {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}
