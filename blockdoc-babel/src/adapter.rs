//! Block adapters and adapter factories
//!
//!     A [`BlockAdapter`] converts one block flavour to and from one format. Adapters delegate
//!     inline content to the run matchers (through [`SerializeContext::inline`] and
//!     [`DeserializeContext::text_from`]) and recurse into children through the context, so
//!     they never need to know which other flavours exist.
//!
//!     An [`AdapterFactory`] is the per-format set of adapters keyed by flavour. Factories are
//!     registered as extensions; the registry merges every factory of a format into one, with
//!     the adapter registered last winning for a flavour.

use crate::context::{DeserializeContext, SerializeContext};
use crate::error::ConvertError;
use crate::format::TargetFormat;
use crate::markup::{Element, Node};
use blockdoc_model::Block;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Converter for one (flavour, format) pair.
pub trait BlockAdapter: Send + Sync {
    fn flavour(&self) -> &str;

    fn format(&self) -> TargetFormat;

    fn supports_export(&self) -> bool {
        true
    }

    fn supports_import(&self) -> bool {
        true
    }

    /// Whether this adapter takes a block-level element on import.
    fn matches(&self, _element: &Element) -> bool {
        false
    }

    fn serialize(
        &self,
        _block: &Block,
        _ctx: &mut SerializeContext<'_>,
    ) -> Result<Vec<Node>, ConvertError> {
        Err(ConvertError::NotSupported {
            flavour: self.flavour().to_string(),
            format: self.format(),
            operation: "export",
        })
    }

    fn deserialize(
        &self,
        _element: &Element,
        _ctx: &mut DeserializeContext<'_>,
    ) -> Result<Vec<Block>, ConvertError> {
        Err(ConvertError::NotSupported {
            flavour: self.flavour().to_string(),
            format: self.format(),
            operation: "import",
        })
    }
}

/// Ordered set of adapters for one format, at most one per flavour.
#[derive(Clone)]
pub struct AdapterFactory {
    format: TargetFormat,
    adapters: Vec<Arc<dyn BlockAdapter>>,
    index: HashMap<String, usize>,
}

impl AdapterFactory {
    pub fn new(format: TargetFormat) -> Self {
        Self {
            format,
            adapters: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Factory holding a single adapter, the usual shape of a block module's contribution.
    pub fn single(adapter: Arc<dyn BlockAdapter>) -> Self {
        let mut factory = Self::new(adapter.format());
        factory.insert(adapter);
        factory
    }

    pub fn with(mut self, adapter: Arc<dyn BlockAdapter>) -> Self {
        self.insert(adapter);
        self
    }

    /// Add an adapter. An adapter for an already present flavour replaces it in place.
    pub fn insert(&mut self, adapter: Arc<dyn BlockAdapter>) {
        match self.index.get(adapter.flavour()) {
            Some(&position) => self.adapters[position] = adapter,
            None => {
                self.index
                    .insert(adapter.flavour().to_string(), self.adapters.len());
                self.adapters.push(adapter);
            }
        }
    }

    /// Insert every adapter of `other`, later ones winning.
    pub fn merge(&mut self, other: &AdapterFactory) {
        for adapter in &other.adapters {
            self.insert(adapter.clone());
        }
    }

    pub fn format(&self) -> TargetFormat {
        self.format
    }

    pub fn get(&self, flavour: &str) -> Option<&Arc<dyn BlockAdapter>> {
        self.index
            .get(flavour)
            .and_then(|&position| self.adapters.get(position))
    }

    pub fn has(&self, flavour: &str) -> bool {
        self.index.contains_key(flavour)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn BlockAdapter>> {
        self.adapters.iter()
    }

    pub fn flavours(&self) -> Vec<&str> {
        self.adapters.iter().map(|adapter| adapter.flavour()).collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl fmt::Debug for AdapterFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterFactory")
            .field("format", &self.format)
            .field("flavours", &self.flavours())
            .finish()
    }
}
