//! Conversion entry points
//!
//! A [`Converter`] borrows a sealed [`Registry`] and the options for a batch of conversions.
//! It holds no per-call state, so one converter can serve any number of exports and imports,
//! from any number of threads.

use crate::context::{DeserializeContext, SerializeContext};
use crate::diagnostics::Diagnostics;
use crate::error::ConvertError;
use crate::format::TargetFormat;
use crate::markup::Node;
use crate::options::ConvertOptions;
use crate::registry::Registry;
use blockdoc_model::Block;
use std::borrow::Cow;
use tracing::debug;

#[derive(Clone, Copy)]
pub struct Converter<'a> {
    registry: &'a Registry,
    options: &'a ConvertOptions,
}

impl<'a> Converter<'a> {
    pub fn new(registry: &'a Registry, options: &'a ConvertOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn options(&self) -> &'a ConvertOptions {
        self.options
    }

    /// Export a block tree to the structured payload of `format`.
    pub fn export_nodes(
        &self,
        root: &Block,
        format: TargetFormat,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<Node>, ConvertError> {
        root.validate()?;
        debug!(format = %format, blocks = root.count(), "export");
        let mut ctx = SerializeContext::new(self.registry, format, self.options, diagnostics)?;
        let mut nodes = ctx.serialize_block(root)?;
        nodes.extend(ctx.finish());
        Ok(nodes)
    }

    /// Export a block tree to the payload string of `format`.
    pub fn export(
        &self,
        root: &Block,
        format: TargetFormat,
        diagnostics: &mut Diagnostics,
    ) -> Result<String, ConvertError> {
        let nodes = self.export_nodes(root, format, diagnostics)?;
        let codec = self
            .registry
            .codec(format)
            .ok_or(ConvertError::MissingCodec(format))?;
        codec.print(&nodes, &self.print_options(root))
    }

    /// Full HTML documents are titled after the root block when it has text.
    fn print_options(&self, root: &Block) -> Cow<'a, ConvertOptions> {
        let title = root.plain_text();
        if !self.options.html.full_document || title.trim().is_empty() {
            return Cow::Borrowed(self.options);
        }
        let mut options = self.options.clone();
        options.html.title = title.trim().to_string();
        Cow::Owned(options)
    }

    /// Import a payload as the children of a new `root_flavour` block.
    ///
    /// `None` uses the configured default root flavour.
    pub fn import(
        &self,
        source: &str,
        format: TargetFormat,
        root_flavour: Option<&str>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Block, ConvertError> {
        let codec = self
            .registry
            .codec(format)
            .ok_or(ConvertError::MissingCodec(format))?;
        let nodes = codec.parse(source, diagnostics);
        debug!(format = %format, nodes = nodes.len(), "import");

        let mut ctx = DeserializeContext::new(self.registry, format, self.options, diagnostics)?;
        let children = ctx.deserialize_nodes(&nodes)?;
        let flavour = root_flavour.unwrap_or(&self.options.default_root);
        let root = Block::new(flavour).with_children(children);
        root.validate()?;
        Ok(root)
    }
}
