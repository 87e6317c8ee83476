//! Format codecs
//!
//!     Each target format has a codec that parses its payload into the markup tree and prints
//!     the tree back. Codecs know the syntax of a format but nothing about blocks: which
//!     elements are inline, which are wrappers to look through, and what to emit for a block
//!     nobody can convert.
//!
//!     The shared "adapters" module registers all six codecs together with the run matchers of
//!     every format, see [`adapter_extensions`].

pub mod html;
pub mod markdown;
pub mod mix_text;
pub mod notion_html;
pub mod notion_text;
pub mod plain_text;

use crate::extension::Extension;
use crate::matchers;

pub use html::HtmlCodec;
pub use markdown::MarkdownCodec;
pub use mix_text::MixTextCodec;
pub use notion_html::NotionHtmlCodec;
pub use notion_text::NotionTextCodec;
pub use plain_text::PlainTextCodec;

/// Codecs and run matchers of every format.
pub fn adapter_extensions() -> Vec<Extension> {
    vec![
        Extension::list([
            Extension::codec(HtmlCodec),
            Extension::codec(MarkdownCodec),
            Extension::codec(PlainTextCodec),
            Extension::codec(NotionHtmlCodec),
            Extension::codec(NotionTextCodec),
            Extension::codec(MixTextCodec),
        ]),
        Extension::matchers(matchers::html::matchers()),
        Extension::matchers(matchers::markdown::matchers()),
        Extension::matchers(matchers::plain_text::matchers()),
        Extension::matchers(matchers::notion_html::matchers()),
        Extension::matchers(matchers::notion_text::matchers()),
        Extension::matchers(matchers::mix_text::matchers()),
        Extension::service("adapters"),
    ]
}
