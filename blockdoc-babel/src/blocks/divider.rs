//! Divider block

use super::{declarations, per_format};
use crate::adapter::BlockAdapter;
use crate::context::{DeserializeContext, SerializeContext};
use crate::error::ConvertError;
use crate::extension::Extension;
use crate::format::TargetFormat;
use crate::formats::notion_text::{self, BLOCK, BLOCK_TYPE};
use crate::formats::plain_text::line;
use crate::markup::{Element, Node};
use blockdoc_model::Block;

pub const FLAVOUR: &str = "divider";

const FORMATS: &[TargetFormat] = &[
    TargetFormat::Html,
    TargetFormat::Markdown,
    TargetFormat::PlainText,
    TargetFormat::NotionHtml,
    TargetFormat::NotionText,
];

pub fn extensions() -> Vec<Extension> {
    vec![
        declarations(FLAVOUR, &[], &[]),
        per_format(FORMATS, DividerAdapter::new),
    ]
}

pub struct DividerAdapter {
    format: TargetFormat,
}

impl DividerAdapter {
    pub fn new(format: TargetFormat) -> Self {
        Self { format }
    }
}

impl BlockAdapter for DividerAdapter {
    fn flavour(&self) -> &str {
        FLAVOUR
    }

    fn format(&self) -> TargetFormat {
        self.format
    }

    fn supports_import(&self) -> bool {
        self.format != TargetFormat::PlainText
    }

    fn matches(&self, element: &Element) -> bool {
        match self.format {
            TargetFormat::Markdown => element.is("thematicBreak"),
            TargetFormat::NotionText => {
                element.is(BLOCK) && element.get_attr(BLOCK_TYPE) == Some("divider")
            }
            _ => element.is("hr"),
        }
    }

    fn serialize(
        &self,
        block: &Block,
        ctx: &mut SerializeContext<'_>,
    ) -> Result<Vec<Node>, ConvertError> {
        let own: Node = match self.format {
            TargetFormat::Markdown => Element::new("thematicBreak").into(),
            TargetFormat::NotionText => notion_text::block("divider", Vec::new()).into(),
            TargetFormat::PlainText | TargetFormat::MixText => line(vec![Node::text("---")]),
            TargetFormat::Html | TargetFormat::NotionHtml => Element::new("hr").into(),
        };
        let mut nodes = vec![own];
        nodes.extend(ctx.serialize_children(block)?);
        Ok(nodes)
    }

    fn deserialize(
        &self,
        _element: &Element,
        _ctx: &mut DeserializeContext<'_>,
    ) -> Result<Vec<Block>, ConvertError> {
        Ok(vec![Block::new(FLAVOUR)])
    }
}
