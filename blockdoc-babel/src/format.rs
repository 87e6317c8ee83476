//! Target formats and the codec trait
//!
//! This module defines the closed set of formats a document can be converted to or from, and
//! the [`FormatCodec`] trait each format implements to move between its payload string and
//! the uniform [`Node`] tree adapters work on.

use crate::diagnostics::Diagnostics;
use crate::error::ConvertError;
use crate::markup::{Element, Node};
use crate::options::ConvertOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// External representations a document can be exported to or imported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetFormat {
    Html,
    Markdown,
    PlainText,
    NotionHtml,
    NotionText,
    MixText,
}

impl TargetFormat {
    pub const ALL: [TargetFormat; 6] = [
        TargetFormat::Html,
        TargetFormat::Markdown,
        TargetFormat::PlainText,
        TargetFormat::NotionHtml,
        TargetFormat::NotionText,
        TargetFormat::MixText,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TargetFormat::Html => "html",
            TargetFormat::Markdown => "markdown",
            TargetFormat::PlainText => "plain-text",
            TargetFormat::NotionHtml => "notion-html",
            TargetFormat::NotionText => "notion-text",
            TargetFormat::MixText => "mix-text",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TargetFormat::Html => "Semantic HTML",
            TargetFormat::Markdown => "CommonMark with GFM strikethrough and task lists",
            TargetFormat::PlainText => "Plain text, one line per block",
            TargetFormat::NotionHtml => "HTML as exported and copied by Notion",
            TargetFormat::NotionText => "Notion clipboard text (JSON block dialect)",
            TargetFormat::MixText => "Plain text with links kept as minimal markup",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" | "htm" => Ok(TargetFormat::Html),
            "markdown" | "md" => Ok(TargetFormat::Markdown),
            "plain-text" | "plaintext" | "text" | "txt" => Ok(TargetFormat::PlainText),
            "notion-html" => Ok(TargetFormat::NotionHtml),
            "notion-text" => Ok(TargetFormat::NotionText),
            "mix-text" | "mixtext" => Ok(TargetFormat::MixText),
            other => Err(ConvertError::UnknownFormat(
                other.to_string(),
                TargetFormat::ALL
                    .iter()
                    .map(TargetFormat::name)
                    .collect::<Vec<_>>()
                    .join(", "),
            )),
        }
    }
}

/// Payload codec for one format
///
/// Parsing is best effort and never fails: whatever cannot be understood is dropped or
/// degraded with a warning pushed to `diagnostics`. Printing can fail only on I/O level
/// problems of the underlying serializer.
pub trait FormatCodec: Send + Sync {
    fn format(&self) -> TargetFormat;

    fn description(&self) -> &str {
        self.format().description()
    }

    /// Parse a payload into block-level nodes.
    fn parse(&self, source: &str, diagnostics: &mut Diagnostics) -> Vec<Node>;

    /// Print block-level nodes produced by the adapters.
    fn print(&self, nodes: &[Node], options: &ConvertOptions) -> Result<String, ConvertError>;

    /// Whether an element is inline content rather than a block.
    fn is_inline(&self, element: &Element) -> bool;

    /// Block wrappers without meaning of their own (`<div>`, `<article>`); walked silently.
    fn is_container(&self, _element: &Element) -> bool {
        false
    }

    /// Inline wrappers without meaning of their own; no warning when no matcher takes them.
    fn is_transparent(&self, _element: &Element) -> bool {
        false
    }

    /// Tag used to wrap loose inline content found at block level.
    fn paragraph_tag(&self) -> &str;

    /// Inline element standing for a hard line break.
    fn line_break_tag(&self) -> Option<&str> {
        None
    }

    /// Stand-in emitted for a block no adapter can export.
    fn placeholder(&self, flavour: &str, options: &ConvertOptions) -> Node;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for format in TargetFormat::ALL {
            assert_eq!(format.name().parse::<TargetFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!("md".parse::<TargetFormat>().unwrap(), TargetFormat::Markdown);
        assert_eq!("TXT".parse::<TargetFormat>().unwrap(), TargetFormat::PlainText);
    }

    #[test]
    fn test_unknown_format() {
        match "docx".parse::<TargetFormat>() {
            Err(ConvertError::UnknownFormat(name, expected)) => {
                assert_eq!(name, "docx");
                assert!(expected.contains("notion-html"));
            }
            other => panic!("expected UnknownFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&TargetFormat::NotionText).unwrap();
        assert_eq!(json, "\"notion-text\"");
    }
}
