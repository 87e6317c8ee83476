//! Paragraph block: body text, headings and quotes, told apart by the `type` prop.

use super::{declarations, per_format, text_and_children};
use crate::adapter::BlockAdapter;
use crate::context::{DeserializeContext, SerializeContext};
use crate::error::ConvertError;
use crate::extension::Extension;
use crate::format::TargetFormat;
use crate::formats::notion_text::{self, BLOCK, BLOCK_TYPE};
use crate::formats::plain_text::{indent, line, LINE};
use crate::markup::{Element, Node};
use blockdoc_model::Block;

pub const FLAVOUR: &str = "paragraph";

const COMMANDS: &[&str] = &[
    "append-paragraph",
    "split-paragraph",
    "add-paragraph",
    "indent-paragraph",
    "dedent-paragraph",
];

const KEYMAP: &[&str] = &[
    "Mod-Alt-0",
    "Mod-Alt-1",
    "Mod-Alt-2",
    "Mod-Alt-3",
    "Mod-Alt-4",
    "Mod-Alt-5",
    "Mod-Alt-6",
    "Mod-Shift-9",
    "Enter",
    "Tab",
    "Shift-Tab",
];

pub fn extensions() -> Vec<Extension> {
    vec![
        declarations(FLAVOUR, COMMANDS, KEYMAP),
        Extension::service("paragraph-service"),
        per_format(&TargetFormat::ALL, ParagraphAdapter::new),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphType {
    Text,
    Heading(u8),
    Quote,
}

impl ParagraphType {
    pub fn of(block: &Block) -> Self {
        Self::parse(block.prop_str("type").unwrap_or("text"))
    }

    pub fn parse(name: &str) -> Self {
        match name {
            "quote" => ParagraphType::Quote,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                ParagraphType::Heading(name[1..].parse().unwrap_or(1))
            }
            _ => ParagraphType::Text,
        }
    }

    pub fn name(self) -> String {
        match self {
            ParagraphType::Text => "text".to_string(),
            ParagraphType::Heading(level) => format!("h{}", level),
            ParagraphType::Quote => "quote".to_string(),
        }
    }

    fn notion_block_type(self) -> &'static str {
        match self {
            ParagraphType::Text => "text",
            ParagraphType::Heading(1) => "header",
            ParagraphType::Heading(2) => "sub_header",
            ParagraphType::Heading(_) => "sub_sub_header",
            ParagraphType::Quote => "quote",
        }
    }

    fn from_notion_block_type(block_type: &str) -> Option<Self> {
        match block_type {
            "text" => Some(ParagraphType::Text),
            "header" => Some(ParagraphType::Heading(1)),
            "sub_header" => Some(ParagraphType::Heading(2)),
            "sub_sub_header" => Some(ParagraphType::Heading(3)),
            "quote" => Some(ParagraphType::Quote),
            _ => None,
        }
    }

    fn from_html_tag(tag: &str) -> Option<Self> {
        match tag {
            "p" => Some(ParagraphType::Text),
            "blockquote" => Some(ParagraphType::Quote),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Some(Self::parse(tag)),
            _ => None,
        }
    }

    fn html_tag(self, max_heading: u8) -> String {
        match self {
            ParagraphType::Text => "p".to_string(),
            ParagraphType::Heading(level) => format!("h{}", level.clamp(1, max_heading)),
            ParagraphType::Quote => "blockquote".to_string(),
        }
    }
}

fn paragraph(kind: ParagraphType) -> Block {
    Block::new(FLAVOUR).with_prop("type", kind.name())
}

pub struct ParagraphAdapter {
    format: TargetFormat,
}

impl ParagraphAdapter {
    pub fn new(format: TargetFormat) -> Self {
        Self { format }
    }
}

impl BlockAdapter for ParagraphAdapter {
    fn flavour(&self) -> &str {
        FLAVOUR
    }

    fn format(&self) -> TargetFormat {
        self.format
    }

    fn matches(&self, element: &Element) -> bool {
        match self.format {
            TargetFormat::Html | TargetFormat::NotionHtml => {
                ParagraphType::from_html_tag(&element.tag).is_some()
            }
            TargetFormat::Markdown => {
                element.is("paragraph") || element.is("heading") || element.is("blockquote")
            }
            TargetFormat::NotionText => {
                element.is(BLOCK)
                    && element
                        .get_attr(BLOCK_TYPE)
                        .and_then(ParagraphType::from_notion_block_type)
                        .is_some()
            }
            TargetFormat::PlainText | TargetFormat::MixText => element.is(LINE),
        }
    }

    fn serialize(
        &self,
        block: &Block,
        ctx: &mut SerializeContext<'_>,
    ) -> Result<Vec<Node>, ConvertError> {
        let kind = ParagraphType::of(block);
        let inline = ctx.block_text(block);
        let own: Node = match self.format {
            TargetFormat::Html => Element::new(kind.html_tag(6)).children(inline).into(),
            TargetFormat::NotionHtml => Element::new(kind.html_tag(3)).children(inline).into(),
            TargetFormat::Markdown => match kind {
                ParagraphType::Text => Element::new("paragraph").children(inline).into(),
                ParagraphType::Heading(level) => Element::new("heading")
                    .attr("depth", level.to_string())
                    .children(inline)
                    .into(),
                ParagraphType::Quote => Element::new("blockquote")
                    .child(Element::new("paragraph").children(inline))
                    .into(),
            },
            TargetFormat::NotionText => notion_text::block(kind.notion_block_type(), inline).into(),
            TargetFormat::PlainText | TargetFormat::MixText => {
                let mut nodes = vec![line(inline)];
                nodes.extend(indent(ctx.serialize_children(block)?));
                return Ok(nodes);
            }
        };
        let mut nodes = vec![own];
        nodes.extend(ctx.serialize_children(block)?);
        Ok(nodes)
    }

    fn deserialize(
        &self,
        element: &Element,
        ctx: &mut DeserializeContext<'_>,
    ) -> Result<Vec<Block>, ConvertError> {
        let kind = match self.format {
            TargetFormat::Html | TargetFormat::NotionHtml => {
                ParagraphType::from_html_tag(&element.tag).unwrap_or(ParagraphType::Text)
            }
            TargetFormat::Markdown => match element.tag.as_str() {
                "heading" => ParagraphType::Heading(
                    element
                        .get_attr("depth")
                        .and_then(|depth| depth.parse().ok())
                        .unwrap_or(1),
                ),
                "blockquote" => ParagraphType::Quote,
                _ => ParagraphType::Text,
            },
            TargetFormat::NotionText => element
                .get_attr(BLOCK_TYPE)
                .and_then(ParagraphType::from_notion_block_type)
                .unwrap_or(ParagraphType::Text),
            TargetFormat::PlainText | TargetFormat::MixText => ParagraphType::Text,
        };

        let (text, rest) = text_and_children(&element.children, ctx)?;
        let mut blocks = vec![paragraph(kind).with_text(text)];
        blocks.extend(rest);
        Ok(blocks)
    }
}
