//! Per-call conversion options
//!
//! Every field has a default, so partial TOML tables (see `blockdoc-config`) deserialize
//! cleanly.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Flavour of the root block created on import when the caller gives none.
    pub default_root: String,
    pub html: HtmlOptions,
    pub markdown: MarkdownOptions,
    pub plain_text: PlainTextOptions,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            default_root: "note".to_string(),
            html: HtmlOptions::default(),
            markdown: MarkdownOptions::default(),
            plain_text: PlainTextOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlOptions {
    /// Wrap the output in `<!DOCTYPE html><html><head>..</head><body>`.
    pub full_document: bool,
    /// Title used for full documents when the root block has no text.
    pub title: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            full_document: false,
            title: "Untitled".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    /// `[text](url)`
    #[default]
    Inline,
    /// `[text][n]` with `[n]: url` definitions at the end of the document.
    Reference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    /// Bullet marker for unordered list items: `-`, `*` or `+`.
    pub bullet: char,
    pub link_style: LinkStyle,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            bullet: '-',
            link_style: LinkStyle::Inline,
        }
    }
}

impl MarkdownOptions {
    pub(crate) fn bullet(&self) -> char {
        match self.bullet {
            '*' | '+' => self.bullet,
            _ => '-',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlainTextOptions {
    /// Line printed for blocks without a plain text adapter. `{flavour}` is substituted.
    pub placeholder: String,
}

impl Default for PlainTextOptions {
    fn default() -> Self {
        Self {
            placeholder: "[unsupported block: {flavour}]".to_string(),
        }
    }
}

impl PlainTextOptions {
    pub fn placeholder_for(&self, flavour: &str) -> String {
        self.placeholder.replace("{flavour}", flavour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: ConvertOptions =
            serde_json::from_str(r#"{"markdown":{"link_style":"reference"}}"#).unwrap();
        assert_eq!(options.markdown.link_style, LinkStyle::Reference);
        assert_eq!(options.markdown.bullet, '-');
        assert_eq!(options.default_root, "note");
        assert!(!options.html.full_document);
    }

    #[test]
    fn test_invalid_bullet_falls_back() {
        let options = MarkdownOptions {
            bullet: '#',
            ..MarkdownOptions::default()
        };
        assert_eq!(options.bullet(), '-');
    }

    #[test]
    fn test_placeholder_substitution() {
        let options = PlainTextOptions::default();
        assert_eq!(options.placeholder_for("kanban"), "[unsupported block: kanban]");
    }
}
