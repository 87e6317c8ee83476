//! GitHub embed block: a card for an issue or pull request.
//!
//! Props: `owner`, `repo`, `githubType` (`issue` or `pr`), `githubId`, `url` and an optional
//! `title`. Exported to HTML, Markdown and plain text as a link; read back only from Notion
//! HTML, where embeds are figures around a `div.source` link.

use super::{declarations, per_format};
use crate::adapter::BlockAdapter;
use crate::context::{DeserializeContext, SerializeContext};
use crate::error::ConvertError;
use crate::extension::Extension;
use crate::format::TargetFormat;
use crate::formats::plain_text::line;
use crate::markup::{Element, Node};
use blockdoc_model::Block;
use once_cell::sync::Lazy;
use regex::Regex;

pub const FLAVOUR: &str = "embed-github";

static GITHUB_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(?:www\.)?github\.com/([^/\s]+)/([^/\s]+)/(issues|pull)/(\d+)")
        .expect("github url pattern is valid")
});

const FORMATS: &[TargetFormat] = &[
    TargetFormat::Html,
    TargetFormat::Markdown,
    TargetFormat::PlainText,
    TargetFormat::NotionHtml,
];

pub fn extensions() -> Vec<Extension> {
    vec![
        declarations(FLAVOUR, &["open-in-github", "refresh-card"], &[]),
        Extension::service("embed-github-service"),
        per_format(FORMATS, EmbedGithubAdapter::new),
    ]
}

/// The embed block for a GitHub issue or pull request URL, `None` for any other URL.
pub fn from_url(url: &str) -> Option<Block> {
    let captures = GITHUB_URL.captures(url)?;
    let github_type = match &captures[3] {
        "pull" => "pr",
        _ => "issue",
    };
    Some(
        Block::new(FLAVOUR)
            .with_prop("owner", &captures[1])
            .with_prop("repo", &captures[2])
            .with_prop("githubType", github_type)
            .with_prop("githubId", &captures[4])
            .with_prop("url", url),
    )
}

fn source_link(element: &Element) -> Option<&Element> {
    element
        .find(&|e| e.is("div") && e.has_class("source"))?
        .find_tag("a")
}

pub struct EmbedGithubAdapter {
    format: TargetFormat,
}

impl EmbedGithubAdapter {
    pub fn new(format: TargetFormat) -> Self {
        Self { format }
    }
}

impl BlockAdapter for EmbedGithubAdapter {
    fn flavour(&self) -> &str {
        FLAVOUR
    }

    fn format(&self) -> TargetFormat {
        self.format
    }

    fn supports_export(&self) -> bool {
        self.format != TargetFormat::NotionHtml
    }

    fn supports_import(&self) -> bool {
        self.format == TargetFormat::NotionHtml
    }

    fn matches(&self, element: &Element) -> bool {
        element.is("figure")
            && source_link(element)
                .and_then(|link| link.get_attr("href"))
                .is_some_and(|href| GITHUB_URL.is_match(href))
    }

    fn serialize(
        &self,
        block: &Block,
        ctx: &mut SerializeContext<'_>,
    ) -> Result<Vec<Node>, ConvertError> {
        let url = block.prop_str("url").unwrap_or_default();
        let title = block
            .prop_str("title")
            .filter(|title| !title.is_empty())
            .unwrap_or(url);

        let mut nodes: Vec<Node> = match self.format {
            TargetFormat::Markdown => vec![Element::new("paragraph")
                .child(Element::new("link").attr("url", url).text(title))
                .into()],
            TargetFormat::PlainText | TargetFormat::MixText => {
                let text = if title == url {
                    url.to_string()
                } else {
                    format!("{}: {}", title, url)
                };
                vec![line(vec![Node::text(text)])]
            }
            _ => vec![Element::new("div")
                .attr("class", "embed-github")
                .child(Element::new("a").attr("href", url).text(title))
                .into()],
        };
        nodes.extend(ctx.serialize_children(block)?);
        Ok(nodes)
    }

    fn deserialize(
        &self,
        element: &Element,
        _ctx: &mut DeserializeContext<'_>,
    ) -> Result<Vec<Block>, ConvertError> {
        let Some(link) = source_link(element) else {
            return Ok(Vec::new());
        };
        let url = link.get_attr("href").unwrap_or_default();
        let title = link.text_content().trim().to_string();
        Ok(from_url(url)
            .map(|block| {
                if title.is_empty() || title == url {
                    block
                } else {
                    block.with_prop("title", title)
                }
            })
            .into_iter()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://github.com/toeverything/blocksuite/issues/12", "issue", "12")]
    #[case("https://github.com/rust-lang/rust/pull/9000", "pr", "9000")]
    fn test_from_url(#[case] url: &str, #[case] kind: &str, #[case] id: &str) {
        let block = from_url(url).unwrap();
        assert_eq!(block.prop_str("githubType"), Some(kind));
        assert_eq!(block.prop_str("githubId"), Some(id));
        assert_eq!(block.prop_str("url"), Some(url));
    }

    #[test]
    fn test_other_urls_are_not_embeds() {
        assert!(from_url("https://github.com/rust-lang/rust").is_none());
        assert!(from_url("https://gitlab.com/a/b/issues/1").is_none());
    }

    #[test]
    fn test_matches_notion_figure() {
        let figure = Element::new("figure").child(
            Element::new("div").attr("class", "source").child(
                Element::new("a")
                    .attr("href", "https://github.com/a/b/issues/1")
                    .text("Bug"),
            ),
        );
        let adapter = EmbedGithubAdapter::new(TargetFormat::NotionHtml);
        assert!(adapter.matches(&figure));
        assert!(!adapter.supports_export());
    }
}
