//! Format adapters and extension composition for blockdoc documents
//!
//!     This crate converts block trees (see `blockdoc-model`) to and from the external formats a
//!     block editor exchanges through files and the clipboard: HTML, Markdown, plain text,
//!     Notion's HTML and JSON clipboard dialects, and mixed text.
//!
//! Architecture
//!
//!     - Codecs: one per format, parse and print between a payload string and a uniform markup
//!       tree ([`markup::Node`]).
//!     - Run matchers: ordered rules mapping formatted runs to inline markup and back.
//!     - Block adapters: per (flavour, format) converters, grouped into adapter factories.
//!     - Registry: every module registers a list of extensions at startup; the sealed
//!       [`Registry`] is the only thing conversions read from.
//!     - Converter: the export/import entry points, with a per-call context and a
//!       caller-owned [`Diagnostics`] sink for warnings.
//!
//!     Like the rest of the workspace this is a pure lib: no printing, no environment, no files.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # TargetFormat and the FormatCodec trait
//!     ├── markup.rs               # Uniform markup tree
//!     ├── diagnostics.rs          # Warnings
//!     ├── options.rs              # ConvertOptions
//!     ├── matchers                # Run matchers, one list per format
//!     ├── adapter.rs              # BlockAdapter, AdapterFactory
//!     ├── context.rs              # Serialize/deserialize contexts and dispatch
//!     ├── extension.rs            # Extension, Capability, flatten
//!     ├── registry.rs             # RegistryBuilder, Registry
//!     ├── convert.rs              # Converter
//!     ├── formats
//!     │   ├── <format>
//!     │   │   ├── parser.rs       # Payload -> markup tree
//!     │   │   ├── serializer.rs   # Markup tree -> payload
//!     │   │   └── mod.rs          # Codec
//!     │   └── <format>.rs         # Codecs small enough for one file
//!     └── blocks                  # One module per block flavour
//!
//! Testing
//!     tests
//!     ├── markdown.rs, html.rs, notion.rs, plain_text.rs   # per format
//!     ├── composition.rs                                  # registration semantics
//!     └── roundtrip.rs                                    # proptest round trips
//!
//! Lossiness
//!
//!     Formats are less expressive than the block model: Markdown has no underline, plain text
//!     keeps only links, Notion's JSON has no images. Export drops what a format cannot express
//!     and import never invents it, so `import(export(doc))` preserves flavours and text for
//!     representable blocks but is not the identity in general.

pub mod adapter;
pub mod blocks;
pub mod context;
pub mod convert;
pub mod diagnostics;
pub mod error;
pub mod extension;
pub mod format;
pub mod formats;
pub mod markup;
pub mod matchers;
pub mod options;
pub mod registry;

pub use adapter::{AdapterFactory, BlockAdapter};
pub use context::{DeserializeContext, SerializeContext};
pub use convert::Converter;
pub use diagnostics::{Diagnostics, Warning, WarningKind};
pub use error::{ConvertError, RegistrationError};
pub use extension::{flatten, Capability, Extension, OpaqueCapability, OpaqueKind};
pub use format::{FormatCodec, TargetFormat};
pub use markup::{Element, Node};
pub use matchers::{Direction, MarkupMatcher, Matcher, RunMatcher};
pub use options::{ConvertOptions, HtmlOptions, LinkStyle, MarkdownOptions, PlainTextOptions};
pub use registry::{Registry, RegistryBuilder};
