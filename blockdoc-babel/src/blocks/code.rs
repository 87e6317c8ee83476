//! Code block: unstyled text with an optional `language` prop.

use super::{declarations, language_class, per_format};
use crate::adapter::BlockAdapter;
use crate::context::{DeserializeContext, SerializeContext};
use crate::error::ConvertError;
use crate::extension::Extension;
use crate::format::TargetFormat;
use crate::formats::notion_text::{self, BLOCK, BLOCK_TYPE};
use crate::formats::plain_text::line;
use crate::markup::{Element, Node};
use blockdoc_model::Block;

pub const FLAVOUR: &str = "code";

pub fn extensions() -> Vec<Extension> {
    vec![
        declarations(FLAVOUR, &["set-language", "toggle-wrap"], &["Tab", "Shift-Tab", "Mod-Enter"]),
        per_format(&TargetFormat::ALL, CodeAdapter::new),
    ]
}

fn code_block(text: &str, language: Option<&str>) -> Block {
    let block = Block::new(FLAVOUR).with_text(text);
    match language.filter(|language| !language.is_empty()) {
        Some(language) => block.with_prop("language", language),
        None => block,
    }
}

pub struct CodeAdapter {
    format: TargetFormat,
}

impl CodeAdapter {
    pub fn new(format: TargetFormat) -> Self {
        Self { format }
    }
}

impl BlockAdapter for CodeAdapter {
    fn flavour(&self) -> &str {
        FLAVOUR
    }

    fn format(&self) -> TargetFormat {
        self.format
    }

    fn supports_import(&self) -> bool {
        !matches!(self.format, TargetFormat::PlainText | TargetFormat::MixText)
    }

    fn matches(&self, element: &Element) -> bool {
        match self.format {
            TargetFormat::Html | TargetFormat::NotionHtml => element.is("pre"),
            TargetFormat::Markdown => element.is("code"),
            TargetFormat::NotionText => {
                element.is(BLOCK) && element.get_attr(BLOCK_TYPE) == Some("code")
            }
            TargetFormat::PlainText | TargetFormat::MixText => false,
        }
    }

    fn serialize(
        &self,
        block: &Block,
        ctx: &mut SerializeContext<'_>,
    ) -> Result<Vec<Node>, ConvertError> {
        let source = block.plain_text();
        let language = block.prop_str("language").filter(|language| !language.is_empty());

        let own: Vec<Node> = match self.format {
            TargetFormat::Html | TargetFormat::NotionHtml => {
                let mut code = Element::new("code");
                if let Some(language) = language {
                    code = code.attr("class", format!("language-{}", language));
                }
                let mut pre = Element::new("pre");
                if self.format == TargetFormat::NotionHtml {
                    pre = pre.attr("class", "code");
                }
                vec![pre.child(code.text(source)).into()]
            }
            TargetFormat::Markdown => {
                let mut code = Element::new("code").text(source);
                if let Some(language) = language {
                    code = code.attr("lang", language);
                }
                vec![code.into()]
            }
            TargetFormat::NotionText => {
                let mut own = notion_text::block("code", vec![Node::text(source)]);
                if let Some(language) = language {
                    own = own.attr("language", language);
                }
                vec![own.into()]
            }
            TargetFormat::PlainText | TargetFormat::MixText => source
                .split('\n')
                .map(|text| line(vec![Node::text(text)]))
                .collect(),
        };
        let mut nodes = own;
        nodes.extend(ctx.serialize_children(block)?);
        Ok(nodes)
    }

    fn deserialize(
        &self,
        element: &Element,
        _ctx: &mut DeserializeContext<'_>,
    ) -> Result<Vec<Block>, ConvertError> {
        let text = element.text_content();
        let text = text.strip_suffix('\n').unwrap_or(&text);
        let language = match self.format {
            TargetFormat::Html | TargetFormat::NotionHtml => element
                .find_tag("code")
                .and_then(language_class)
                .or_else(|| language_class(element)),
            TargetFormat::Markdown => element.get_attr("lang"),
            TargetFormat::NotionText => element.get_attr("language"),
            TargetFormat::PlainText | TargetFormat::MixText => None,
        };
        Ok(vec![code_block(text, language)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_language_is_dropped() {
        assert!(code_block("x", Some("")).prop("language").is_none());
        assert_eq!(code_block("x", Some("rust")).prop_str("language"), Some("rust"));
    }
}
