//! Markdown inline marks
//!
//! Tags follow the mdast vocabulary the Markdown codec produces: `inlineCode`, `strong`,
//! `emphasis`, `delete` and `link`. Markdown has no underline, so underlined runs lose that
//! mark on export.

use super::{InlineContext, Matcher, RunMatcher, TagMatcher, ValueMatcher};
use crate::format::TargetFormat;
use crate::markup::{Element, Node};
use crate::options::LinkStyle;
use blockdoc_model::{keys, Attributes};
use std::sync::Arc;

pub fn matchers() -> Vec<Matcher> {
    let format = TargetFormat::Markdown;
    let mut matchers: Vec<Matcher> = [
        TagMatcher::new(format, keys::CODE, "inlineCode").both(),
        TagMatcher::new(format, keys::BOLD, "strong").both(),
        TagMatcher::new(format, keys::ITALIC, "emphasis").both(),
        TagMatcher::new(format, keys::STRIKE, "delete").both(),
    ]
    .into_iter()
    .flatten()
    .collect();

    matchers.push(Matcher::ToMarkup(Arc::new(MarkdownLinkMatcher)));
    matchers.push(Matcher::FromMarkup(Arc::new(ValueMatcher::link(
        format, "link", "url",
    ))));
    matchers
}

/// Writes `[text](url)`, or `[text][n]` with a collected definition when reference links are
/// configured.
pub struct MarkdownLinkMatcher;

impl RunMatcher for MarkdownLinkMatcher {
    fn name(&self) -> &str {
        "markdown.link"
    }

    fn format(&self) -> TargetFormat {
        TargetFormat::Markdown
    }

    fn matches(&self, attributes: &Attributes) -> bool {
        attributes.text(keys::LINK).is_some()
    }

    fn wrap(
        &self,
        inner: Vec<Node>,
        attributes: &Attributes,
        ctx: &mut InlineContext<'_>,
    ) -> Vec<Node> {
        let url = attributes.text(keys::LINK).unwrap_or_default();
        let element = match ctx.options.markdown.link_style {
            LinkStyle::Inline => Element::new("link").attr("url", url),
            LinkStyle::Reference => {
                let label = ctx.references.label_for(url);
                Element::new("linkReference").attr("label", label)
            }
        };
        vec![element.children(inner).into()]
    }
}
