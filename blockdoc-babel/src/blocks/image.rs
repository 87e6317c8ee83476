//! Image block: `url` and `caption` props, no text.

use super::{declarations, per_format};
use crate::adapter::BlockAdapter;
use crate::context::{DeserializeContext, SerializeContext};
use crate::error::ConvertError;
use crate::extension::Extension;
use crate::format::TargetFormat;
use crate::formats::plain_text::line;
use crate::markup::{Element, Node};
use blockdoc_model::Block;

pub const FLAVOUR: &str = "image";

const FORMATS: &[TargetFormat] = &[
    TargetFormat::Html,
    TargetFormat::Markdown,
    TargetFormat::PlainText,
    TargetFormat::NotionHtml,
];

pub fn extensions() -> Vec<Extension> {
    vec![
        declarations(
            FLAVOUR,
            &["insert-images", "download-image", "set-caption"],
            &["Backspace", "Delete", "Enter"],
        ),
        Extension::service("image-service"),
        per_format(FORMATS, ImageAdapter::new),
    ]
}

fn image(url: &str, caption: &str) -> Block {
    let block = Block::new(FLAVOUR).with_prop("url", url);
    if caption.is_empty() {
        block
    } else {
        block.with_prop("caption", caption)
    }
}

fn figure(img: Element, caption: &str) -> Element {
    let mut figure = Element::new("figure").child(img);
    if !caption.is_empty() {
        figure = figure.child(Element::new("figcaption").text(caption));
    }
    figure
}

pub struct ImageAdapter {
    format: TargetFormat,
}

impl ImageAdapter {
    pub fn new(format: TargetFormat) -> Self {
        Self { format }
    }
}

impl BlockAdapter for ImageAdapter {
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
            TargetFormat::Markdown => element.is("image"),
            _ => element.is("img") || (element.is("figure") && element.find_tag("img").is_some()),
        }
    }

    fn serialize(
        &self,
        block: &Block,
        ctx: &mut SerializeContext<'_>,
    ) -> Result<Vec<Node>, ConvertError> {
        let url = block.prop_str("url").unwrap_or_default();
        let caption = block.prop_str("caption").unwrap_or_default();

        let mut nodes: Vec<Node> = match self.format {
            TargetFormat::Markdown => vec![Element::new("image")
                .attr("url", url)
                .attr("alt", caption)
                .into()],
            TargetFormat::NotionHtml => {
                let img = Element::new("a")
                    .attr("href", url)
                    .child(Element::new("img").attr("src", url));
                vec![figure(img, caption).attr("class", "image").into()]
            }
            TargetFormat::PlainText | TargetFormat::MixText => {
                if caption.is_empty() {
                    Vec::new()
                } else {
                    vec![line(vec![Node::text(caption)])]
                }
            }
            _ => {
                let img = Element::new("img").attr("src", url).attr("alt", caption);
                vec![figure(img, caption).into()]
            }
        };
        nodes.extend(ctx.serialize_children(block)?);
        Ok(nodes)
    }

    fn deserialize(
        &self,
        element: &Element,
        _ctx: &mut DeserializeContext<'_>,
    ) -> Result<Vec<Block>, ConvertError> {
        if self.format == TargetFormat::Markdown {
            let url = element.get_attr("url").unwrap_or_default();
            let alt = element.get_attr("alt").unwrap_or_default();
            return Ok(vec![image(url, alt)]);
        }

        let img = if element.is("img") {
            Some(element)
        } else {
            element.find_tag("img")
        };
        let url = img.and_then(|img| img.get_attr("src")).unwrap_or_default();
        let caption = match element.find_tag("figcaption") {
            Some(figcaption) => figcaption.text_content().trim().to_string(),
            None => img
                .and_then(|img| img.get_attr("alt"))
                .unwrap_or_default()
                .to_string(),
        };
        Ok(vec![image(url, &caption)])
    }
}
