//! Built-in block modules
//!
//!     One module per block flavour, plus the shared `adapters` module that brings the codecs
//!     and run matchers. Each block module contributes the same kind of list: its flavour
//!     declaration, view, commands and keymap (carried through as opaque data) and one adapter
//!     per format it supports.
//!
//!     Adapters are written per flavour with a `format` field rather than one type per
//!     (flavour, format) pair, so a flavour's conversions can be read side by side.

pub mod code;
pub mod divider;
pub mod embed_github;
pub mod image;
pub mod list;
pub mod note;
pub mod page;
pub mod paragraph;

use crate::adapter::BlockAdapter;
use crate::context::DeserializeContext;
use crate::error::ConvertError;
use crate::extension::Extension;
use crate::format::TargetFormat;
use crate::formats;
use crate::markup::{Element, Node};
use blockdoc_model::{Block, Text};

/// The built-in modules, in registration order.
pub fn standard_modules() -> Vec<(&'static str, Vec<Extension>)> {
    vec![
        ("adapters", formats::adapter_extensions()),
        ("page", page::extensions()),
        ("note", note::extensions()),
        ("paragraph", paragraph::extensions()),
        ("list", list::extensions()),
        ("code", code::extensions()),
        ("divider", divider::extensions()),
        ("image", image::extensions()),
        ("embed-github", embed_github::extensions()),
    ]
}

/// Opaque declarations shared by every block module.
pub(crate) fn declarations(flavour: &str, commands: &[&str], keymap: &[&str]) -> Extension {
    let mut extensions = vec![Extension::flavour(flavour), Extension::block_view(flavour)];
    if !commands.is_empty() {
        extensions.push(Extension::commands(flavour, commands));
    }
    if !keymap.is_empty() {
        extensions.push(Extension::keymap(flavour, keymap));
    }
    Extension::List(extensions)
}

/// One adapter per listed format, built by `adapter`.
pub(crate) fn per_format<A: BlockAdapter + 'static>(
    formats: &[TargetFormat],
    adapter: impl Fn(TargetFormat) -> A,
) -> Extension {
    Extension::list(formats.iter().map(|format| Extension::adapter(adapter(*format))))
}

/// Leading inline content of an element as trimmed text, and its block-level rest as blocks.
pub(crate) fn text_and_children(
    nodes: &[Node],
    ctx: &mut DeserializeContext<'_>,
) -> Result<(Text, Vec<Block>), ConvertError> {
    let (inline, rest) = ctx.split_content(nodes);
    let text = ctx.text_from(&inline).trimmed();
    let children = ctx.deserialize_nodes(&rest)?;
    Ok((text, children))
}

/// Children of `element` without the nodes `skip` rejects.
pub(crate) fn children_without(element: &Element, skip: impl Fn(&Element) -> bool) -> Vec<Node> {
    element
        .children
        .iter()
        .filter(|node| !node.as_element().is_some_and(&skip))
        .cloned()
        .collect()
}

/// `language-rust` → `rust`
pub(crate) fn language_class(element: &Element) -> Option<&str> {
    element
        .get_attr("class")?
        .split_whitespace()
        .find_map(|class| class.strip_prefix("language-"))
}
