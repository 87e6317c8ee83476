//! Plain text keeps a single mark: links, written after their text as `text: url`.
//! Nothing is recognized on import.

use super::{InlineContext, Matcher, RunMatcher};
use crate::format::TargetFormat;
use crate::markup::Node;
use blockdoc_model::{keys, Attributes};
use std::sync::Arc;

pub fn matchers() -> Vec<Matcher> {
    vec![Matcher::ToMarkup(Arc::new(PlainLinkMatcher))]
}

pub struct PlainLinkMatcher;

impl RunMatcher for PlainLinkMatcher {
    fn name(&self) -> &str {
        "plain-text.link"
    }

    fn format(&self) -> TargetFormat {
        TargetFormat::PlainText
    }

    fn matches(&self, attributes: &Attributes) -> bool {
        attributes.text(keys::LINK).is_some()
    }

    fn wrap(
        &self,
        mut inner: Vec<Node>,
        attributes: &Attributes,
        _ctx: &mut InlineContext<'_>,
    ) -> Vec<Node> {
        if let Some(url) = attributes.text(keys::LINK) {
            let text: String = inner.iter().map(Node::text_content).collect();
            if text != url {
                inner.push(Node::text(format!(": {}", url)));
            }
        }
        inner
    }
}
