//! Extensions
//!
//!     An [`Extension`] is what a module contributes at startup: either a single
//!     [`Capability`] or a nested list of extensions. Lists exist so that modules can group and
//!     reuse their contributions; registration flattens them, keeping declaration order at any
//!     depth.
//!
//!     Conversion only interprets codecs, adapter factories and matchers. Everything else a block
//!     module declares (its flavour schema, view, commands, keymap, services) is carried through
//!     as an [`OpaqueCapability`] so that hosts can look it up in the same registry.

use crate::adapter::{AdapterFactory, BlockAdapter};
use crate::format::FormatCodec;
use crate::matchers::{MarkupMatcher, Matcher, RunMatcher};
use std::fmt;
use std::sync::Arc;

/// Kinds of registration data the converter passes through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OpaqueKind {
    Flavour,
    BlockView,
    Command,
    Keymap,
    Service,
}

impl fmt::Display for OpaqueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpaqueKind::Flavour => "flavour",
            OpaqueKind::BlockView => "block-view",
            OpaqueKind::Command => "command",
            OpaqueKind::Keymap => "keymap",
            OpaqueKind::Service => "service",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueCapability {
    pub kind: OpaqueKind,
    /// Discriminator within the kind: a flavour, a command name, a service id.
    pub name: String,
    /// Free-form entries (command names, key bindings).
    pub entries: Vec<String>,
}

/// One registrable unit.
#[derive(Clone)]
pub enum Capability {
    Codec(Arc<dyn FormatCodec>),
    AdapterFactory(AdapterFactory),
    Matcher(Matcher),
    Opaque(OpaqueCapability),
}

impl Capability {
    /// Short label for listings and logs.
    pub fn describe(&self) -> String {
        match self {
            Capability::Codec(codec) => format!("codec {}", codec.format()),
            Capability::AdapterFactory(factory) => format!(
                "adapters {} [{}]",
                factory.format(),
                factory.flavours().join(", ")
            ),
            Capability::Matcher(matcher) => {
                format!("matcher {} {}", matcher.direction(), matcher.name())
            }
            Capability::Opaque(opaque) => {
                if opaque.entries.is_empty() {
                    format!("{} {}", opaque.kind, opaque.name)
                } else {
                    format!("{} {} [{}]", opaque.kind, opaque.name, opaque.entries.join(", "))
                }
            }
        }
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::AdapterFactory(factory) => factory.fmt(f),
            Capability::Matcher(matcher) => matcher.fmt(f),
            Capability::Opaque(opaque) => opaque.fmt(f),
            Capability::Codec(codec) => write!(f, "Codec({})", codec.format()),
        }
    }
}

/// A capability or an arbitrarily nested list of extensions.
#[derive(Debug, Clone)]
pub enum Extension {
    Capability(Capability),
    List(Vec<Extension>),
}

impl Extension {
    pub fn codec(codec: impl FormatCodec + 'static) -> Self {
        Extension::Capability(Capability::Codec(Arc::new(codec)))
    }

    pub fn factory(factory: AdapterFactory) -> Self {
        Extension::Capability(Capability::AdapterFactory(factory))
    }

    /// A factory holding one adapter.
    pub fn adapter(adapter: impl BlockAdapter + 'static) -> Self {
        Self::factory(AdapterFactory::single(Arc::new(adapter)))
    }

    pub fn matcher(matcher: Matcher) -> Self {
        Extension::Capability(Capability::Matcher(matcher))
    }

    pub fn to_markup(matcher: impl RunMatcher + 'static) -> Self {
        Self::matcher(Matcher::ToMarkup(Arc::new(matcher)))
    }

    pub fn from_markup(matcher: impl MarkupMatcher + 'static) -> Self {
        Self::matcher(Matcher::FromMarkup(Arc::new(matcher)))
    }

    /// A list of matchers, in registration order.
    pub fn matchers(matchers: Vec<Matcher>) -> Self {
        Extension::List(matchers.into_iter().map(Self::matcher).collect())
    }

    pub fn opaque(kind: OpaqueKind, name: impl Into<String>, entries: &[&str]) -> Self {
        Extension::Capability(Capability::Opaque(OpaqueCapability {
            kind,
            name: name.into(),
            entries: entries.iter().map(|entry| entry.to_string()).collect(),
        }))
    }

    pub fn flavour(flavour: &str) -> Self {
        Self::opaque(OpaqueKind::Flavour, flavour, &[])
    }

    pub fn block_view(flavour: &str) -> Self {
        Self::opaque(OpaqueKind::BlockView, flavour, &[])
    }

    pub fn commands(flavour: &str, commands: &[&str]) -> Self {
        Self::opaque(OpaqueKind::Command, flavour, commands)
    }

    pub fn keymap(flavour: &str, bindings: &[&str]) -> Self {
        Self::opaque(OpaqueKind::Keymap, flavour, bindings)
    }

    pub fn service(name: &str) -> Self {
        Self::opaque(OpaqueKind::Service, name, &[])
    }

    pub fn list(extensions: impl IntoIterator<Item = Extension>) -> Self {
        Extension::List(extensions.into_iter().collect())
    }
}

impl From<Capability> for Extension {
    fn from(capability: Capability) -> Self {
        Extension::Capability(capability)
    }
}

impl From<Vec<Extension>> for Extension {
    fn from(extensions: Vec<Extension>) -> Self {
        Extension::List(extensions)
    }
}

/// Depth-first, order-preserving flattening of nested extension lists.
pub fn flatten(extensions: Vec<Extension>) -> Vec<Capability> {
    let mut out = Vec::new();
    flatten_into(extensions, &mut out);
    out
}

fn flatten_into(extensions: Vec<Extension>, out: &mut Vec<Capability>) {
    for extension in extensions {
        match extension {
            Extension::Capability(capability) => out.push(capability),
            Extension::List(nested) => flatten_into(nested, out),
        }
    }
}
