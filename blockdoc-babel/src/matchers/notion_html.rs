//! Notion HTML inline marks
//!
//! Notion exports underline as a bordered `<span>` and highlight colours as
//! `<mark class="highlight-{colour}">`. Everything else matches plain HTML.

use super::{InlineContext, MarkupMatcher, Matcher, RunMatcher, TagMatcher, ValueMatcher};
use crate::format::TargetFormat;
use crate::markup::{Element, Node};
use blockdoc_model::{keys, Attributes};
use std::sync::Arc;

const UNDERLINE_STYLE: &str = "border-bottom:0.05em solid";
const HIGHLIGHT_PREFIX: &str = "highlight-";

pub fn matchers() -> Vec<Matcher> {
    let format = TargetFormat::NotionHtml;
    let color = Arc::new(ColorMatcher);
    [
        TagMatcher::new(format, keys::CODE, "code").both(),
        TagMatcher::new(format, keys::BOLD, "strong")
            .aliases(&["b"])
            .both(),
        TagMatcher::new(format, keys::ITALIC, "em")
            .aliases(&["i"])
            .both(),
        TagMatcher::new(format, keys::UNDERLINE, "span")
            .with_attr("style", UNDERLINE_STYLE)
            .matching(is_underline)
            .both(),
        TagMatcher::new(format, keys::STRIKE, "del")
            .aliases(&["s"])
            .both(),
        vec![
            Matcher::ToMarkup(color.clone()),
            Matcher::FromMarkup(color),
        ],
        ValueMatcher::link(format, "a", "href").both(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn is_underline(element: &Element) -> bool {
    let bordered = element.is("span")
        && element
            .get_attr("style")
            .is_some_and(|style| style.contains("border-bottom"));
    bordered || element.is("u")
}

/// Highlight colour carried in a `highlight-*` class.
pub struct ColorMatcher;

impl RunMatcher for ColorMatcher {
    fn name(&self) -> &str {
        "notion-html.color"
    }

    fn format(&self) -> TargetFormat {
        TargetFormat::NotionHtml
    }

    fn matches(&self, attributes: &Attributes) -> bool {
        attributes.text(keys::COLOR).is_some()
    }

    fn wrap(
        &self,
        inner: Vec<Node>,
        attributes: &Attributes,
        _ctx: &mut InlineContext<'_>,
    ) -> Vec<Node> {
        let color = attributes.text(keys::COLOR).unwrap_or("default");
        vec![Element::new("mark")
            .attr("class", format!("{}{}", HIGHLIGHT_PREFIX, color))
            .children(inner)
            .into()]
    }
}

impl MarkupMatcher for ColorMatcher {
    fn name(&self) -> &str {
        "notion-html.color"
    }

    fn format(&self) -> TargetFormat {
        TargetFormat::NotionHtml
    }

    fn matches(&self, element: &Element) -> bool {
        element.is("mark") && highlight_class(element).is_some()
    }

    fn apply(&self, element: &Element, attributes: &mut Attributes) {
        if let Some(color) = highlight_class(element) {
            attributes.insert(keys::COLOR, color);
        }
    }
}

fn highlight_class(element: &Element) -> Option<&str> {
    element
        .get_attr("class")?
        .split_whitespace()
        .find_map(|class| class.strip_prefix(HIGHLIGHT_PREFIX))
        .filter(|color| !color.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underline_span() {
        let span = Element::new("span").attr("style", "border-bottom:0.05em solid");
        assert!(is_underline(&span));
        assert!(!is_underline(&Element::new("span")));
    }

    #[test]
    fn test_highlight_colour() {
        let mark = Element::new("mark").attr("class", "highlight-red_background");
        assert!(MarkupMatcher::matches(&ColorMatcher, &mark));

        let mut attrs = Attributes::new();
        ColorMatcher.apply(&mark, &mut attrs);
        assert_eq!(attrs.text(keys::COLOR), Some("red_background"));

        assert!(!MarkupMatcher::matches(
            &ColorMatcher,
            &Element::new("mark").attr("class", "highlight-")
        ));
    }
}
