//! Per-call conversion state
//!
//!     Adapters receive a context instead of reaching for anything global. The context knows the
//!     format, the sealed registry (and through it the adapter factory, codec and matcher lists
//!     of the format), the options and the caller's diagnostics sink. It also owns the state
//!     that only lives for one conversion: the path of the block being exported, list
//!     numbering and the Markdown link-reference table.
//!
//!     Dispatch lives here as well. [`SerializeContext::serialize_block`] picks the adapter for
//!     a flavour and falls back to the codec placeholder. [`DeserializeContext::deserialize_nodes`]
//!     offers block-level elements to the adapters in factory order.

use crate::adapter::{AdapterFactory, BlockAdapter};
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::ConvertError;
use crate::format::{FormatCodec, TargetFormat};
use crate::markup::{Element, Node};
use crate::matchers::{Direction, InlineContext, Matcher};
use crate::options::ConvertOptions;
use crate::registry::Registry;
use blockdoc_model::{Attributes, Block, BlockPath, Run, Text};
use std::sync::Arc;
use tracing::debug;

/// Link definitions collected while exporting reference-style Markdown links.
#[derive(Debug, Default, Clone)]
pub struct LinkReferences {
    entries: Vec<(String, String)>,
}

impl LinkReferences {
    /// Label for `url`, allocating the next number on first use.
    pub fn label_for(&mut self, url: &str) -> String {
        if let Some((label, _)) = self.entries.iter().find(|(_, known)| known == url) {
            return label.clone();
        }
        let label = (self.entries.len() + 1).to_string();
        self.entries.push((label.clone(), url.to_string()));
        label
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `definition` nodes, in first-use order.
    pub fn definitions(&self) -> Vec<Node> {
        self.entries
            .iter()
            .map(|(label, url)| {
                Element::new("definition")
                    .attr("label", label.as_str())
                    .attr("url", url.as_str())
                    .into()
            })
            .collect()
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Level {
    counter: u64,
    touched: bool,
}

/// Ordinals of numbered list items, per nesting level.
///
/// Consecutive siblings that ask for an ordinal count up; any sibling that does not ask resets
/// the count for the next one.
#[derive(Debug, Clone)]
pub struct ListNumbering {
    levels: Vec<Level>,
}

impl Default for ListNumbering {
    fn default() -> Self {
        Self {
            levels: vec![Level::default()],
        }
    }
}

impl ListNumbering {
    fn enter(&mut self) {
        self.levels.push(Level::default());
    }

    fn leave(&mut self) {
        if self.levels.len() > 1 {
            self.levels.pop();
        }
    }

    fn before_sibling(&mut self) {
        if let Some(level) = self.levels.last_mut() {
            level.touched = false;
        }
    }

    fn after_sibling(&mut self) {
        if let Some(level) = self.levels.last_mut() {
            if !level.touched {
                level.counter = 0;
            }
        }
    }

    fn next(&mut self) -> u64 {
        match self.levels.last_mut() {
            Some(level) => {
                level.counter += 1;
                level.touched = true;
                level.counter
            }
            None => 1,
        }
    }
}

fn lookup<'a>(
    registry: &'a Registry,
    format: TargetFormat,
) -> Result<&'a dyn FormatCodec, ConvertError> {
    registry
        .codec(format)
        .map(|codec| codec.as_ref())
        .ok_or(ConvertError::MissingCodec(format))
}

/// Export state handed to [`BlockAdapter::serialize`].
pub struct SerializeContext<'a> {
    format: TargetFormat,
    registry: &'a Registry,
    factory: Option<&'a AdapterFactory>,
    codec: &'a dyn FormatCodec,
    matchers: &'a [Matcher],
    options: &'a ConvertOptions,
    diagnostics: &'a mut Diagnostics,
    path: BlockPath,
    numbering: ListNumbering,
    references: LinkReferences,
}

impl<'a> SerializeContext<'a> {
    pub fn new(
        registry: &'a Registry,
        format: TargetFormat,
        options: &'a ConvertOptions,
        diagnostics: &'a mut Diagnostics,
    ) -> Result<Self, ConvertError> {
        Ok(Self {
            format,
            registry,
            factory: registry.adapters_for(format),
            codec: lookup(registry, format)?,
            matchers: registry.matchers_for(format, Direction::ToMarkup),
            options,
            diagnostics,
            path: BlockPath::root(),
            numbering: ListNumbering::default(),
            references: LinkReferences::default(),
        })
    }

    pub fn format(&self) -> TargetFormat {
        self.format
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn options(&self) -> &'a ConvertOptions {
        self.options
    }

    pub fn codec(&self) -> &'a dyn FormatCodec {
        self.codec
    }

    /// Path of the block currently being exported.
    pub fn path(&self) -> &BlockPath {
        &self.path
    }

    /// Convert formatted runs with the format's export matchers.
    pub fn inline(&mut self, text: &Text) -> Vec<Node> {
        let matchers = self.matchers;
        let mut ctx = InlineContext {
            format: self.format,
            options: self.options,
            references: &mut self.references,
        };
        let mut out = Vec::new();
        for run in text {
            let mut nodes = vec![Node::text(run.text.as_str())];
            for matcher in matchers.iter().filter_map(Matcher::as_run_matcher) {
                if matcher.matches(&run.attributes) {
                    nodes = matcher.wrap(nodes, &run.attributes, &mut ctx);
                }
            }
            out.extend(nodes);
        }
        out
    }

    /// Inline nodes of a block's own text; empty when the block carries none.
    pub fn block_text(&mut self, block: &Block) -> Vec<Node> {
        match block.text() {
            Some(text) => self.inline(text),
            None => Vec::new(),
        }
    }

    /// Export one block through its adapter, or a placeholder when there is none.
    ///
    /// A block without an adapter still has its children exported after the placeholder.
    pub fn serialize_block(&mut self, block: &Block) -> Result<Vec<Node>, ConvertError> {
        let adapter: Option<Arc<dyn BlockAdapter>> = self
            .factory
            .and_then(|factory| factory.get(block.flavour()))
            .filter(|adapter| adapter.supports_export())
            .cloned();

        match adapter {
            Some(adapter) => {
                debug!(flavour = block.flavour(), format = %self.format, path = %self.path, "export block");
                adapter.serialize(block, self)
            }
            None => {
                self.warn(Warning::unsupported_block(self.format, block.flavour()));
                let mut nodes = vec![self.codec.placeholder(block.flavour(), self.options)];
                nodes.extend(self.serialize_children(block)?);
                Ok(nodes)
            }
        }
    }

    /// Export the children of `block` in order.
    pub fn serialize_children(&mut self, block: &Block) -> Result<Vec<Node>, ConvertError> {
        let parent = self.path.clone();
        self.numbering.enter();
        let mut out = Vec::new();
        for (index, child) in block.children().iter().enumerate() {
            self.path = parent.child(index);
            self.numbering.before_sibling();
            let result = self.serialize_block(child);
            self.numbering.after_sibling();
            out.extend(result?);
        }
        self.numbering.leave();
        self.path = parent;
        Ok(out)
    }

    /// Ordinal of the current numbered list item among its consecutive numbered siblings.
    pub fn next_ordinal(&mut self) -> u64 {
        self.numbering.next()
    }

    /// Record a warning at the current path.
    pub fn warn(&mut self, warning: Warning) {
        self.diagnostics.push(warning.at(self.path.clone()));
    }

    /// Trailing nodes the export needs after the block tree (link definitions).
    pub fn finish(self) -> Vec<Node> {
        self.references.definitions()
    }
}

/// Import state handed to [`BlockAdapter::deserialize`].
pub struct DeserializeContext<'a> {
    format: TargetFormat,
    registry: &'a Registry,
    factory: Option<&'a AdapterFactory>,
    codec: &'a dyn FormatCodec,
    matchers: &'a [Matcher],
    options: &'a ConvertOptions,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> DeserializeContext<'a> {
    pub fn new(
        registry: &'a Registry,
        format: TargetFormat,
        options: &'a ConvertOptions,
        diagnostics: &'a mut Diagnostics,
    ) -> Result<Self, ConvertError> {
        Ok(Self {
            format,
            registry,
            factory: registry.adapters_for(format),
            codec: lookup(registry, format)?,
            matchers: registry.matchers_for(format, Direction::FromMarkup),
            options,
            diagnostics,
        })
    }

    pub fn format(&self) -> TargetFormat {
        self.format
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn options(&self) -> &'a ConvertOptions {
        self.options
    }

    pub fn codec(&self) -> &'a dyn FormatCodec {
        self.codec
    }

    pub fn is_inline(&self, node: &Node) -> bool {
        match node {
            Node::Text(_) => true,
            Node::Element(element) => self.codec.is_inline(element),
        }
    }

    /// Import a sequence of block-level nodes.
    ///
    /// Runs of loose inline content are wrapped in the codec's paragraph element first;
    /// whitespace-only runs are dropped.
    pub fn deserialize_nodes(&mut self, nodes: &[Node]) -> Result<Vec<Block>, ConvertError> {
        let mut blocks = Vec::new();
        let mut loose: Vec<Node> = Vec::new();
        for node in nodes {
            if self.is_inline(node) {
                loose.push(node.clone());
                continue;
            }
            blocks.extend(self.flush_loose(&mut loose)?);
            if let Node::Element(element) = node {
                blocks.extend(self.deserialize_element(element)?);
            }
        }
        blocks.extend(self.flush_loose(&mut loose)?);
        Ok(blocks)
    }

    fn flush_loose(&mut self, loose: &mut Vec<Node>) -> Result<Vec<Block>, ConvertError> {
        let nodes = std::mem::take(loose);
        if nodes.iter().all(Node::is_blank) {
            return Ok(Vec::new());
        }
        let paragraph = Element::new(self.codec.paragraph_tag()).children(nodes);
        self.deserialize_element(&paragraph)
    }

    /// Import one block-level element through the first adapter that takes it.
    pub fn deserialize_element(&mut self, element: &Element) -> Result<Vec<Block>, ConvertError> {
        let adapter: Option<Arc<dyn BlockAdapter>> = self.factory.and_then(|factory| {
            factory
                .iter()
                .find(|adapter| adapter.supports_import() && adapter.matches(element))
                .cloned()
        });

        match adapter {
            Some(adapter) => {
                debug!(tag = %element.tag, flavour = adapter.flavour(), format = %self.format, "import element");
                adapter.deserialize(element, self)
            }
            None if self.codec.is_container(element) => self.deserialize_nodes(&element.children),
            None => {
                self.warn(Warning::unsupported_block(self.format, element.tag.as_str()));
                self.deserialize_nodes(&element.children)
            }
        }
    }

    /// Split content into its leading inline part and the block-level rest.
    ///
    /// When there is no inline content and the first block is a paragraph (loose list items,
    /// quotes), that paragraph's children become the inline part.
    pub fn split_content(&self, nodes: &[Node]) -> (Vec<Node>, Vec<Node>) {
        let mut inline = Vec::new();
        let mut blocks = Vec::new();
        for node in nodes {
            if blocks.is_empty() && self.is_inline(node) {
                inline.push(node.clone());
            } else if !node.is_blank() {
                blocks.push(node.clone());
            }
        }
        if inline.iter().all(Node::is_blank) {
            let paragraph = self.codec.paragraph_tag();
            if let Some(Node::Element(first)) = blocks.first() {
                if first.is(paragraph) {
                    inline = first.children.clone();
                    blocks.remove(0);
                }
            }
        }
        (inline, blocks)
    }

    /// Collect inline nodes into formatted runs with the format's import matchers.
    pub fn text_from(&mut self, nodes: &[Node]) -> Text {
        let mut text = Text::new();
        self.collect(nodes, &Attributes::new(), &mut text);
        text
    }

    fn collect(&mut self, nodes: &[Node], attributes: &Attributes, text: &mut Text) {
        for node in nodes {
            let element = match node {
                Node::Text(value) => {
                    text.push(Run::new(value.as_str(), attributes.clone()));
                    continue;
                }
                Node::Element(element) => element,
            };

            if self
                .codec
                .line_break_tag()
                .is_some_and(|tag| element.is(tag))
            {
                text.push(Run::new("\n", attributes.clone()));
                continue;
            }

            let matchers = self.matchers;
            let matcher = matchers
                .iter()
                .filter_map(Matcher::as_markup_matcher)
                .find(|matcher| matcher.matches(element));

            match matcher {
                Some(matcher) => {
                    let mut inner = attributes.clone();
                    matcher.apply(element, &mut inner);
                    self.collect(&element.children, &inner, text);
                }
                None => {
                    if !self.codec.is_transparent(element) {
                        self.warn(Warning::unparseable_fragment(
                            self.format,
                            element.tag.as_str(),
                        ));
                    }
                    self.collect(&element.children, attributes, text);
                }
            }
        }
    }

    pub fn warn(&mut self, warning: Warning) {
        self.diagnostics.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering_counts_consecutive_siblings() {
        let mut numbering = ListNumbering::default();
        numbering.enter();
        let mut seen = Vec::new();
        for asks in [true, true, false, true] {
            numbering.before_sibling();
            if asks {
                seen.push(numbering.next());
            }
            numbering.after_sibling();
        }
        numbering.leave();
        assert_eq!(seen, vec![1, 2, 1]);
    }

    #[test]
    fn test_numbering_levels_are_independent() {
        let mut numbering = ListNumbering::default();
        numbering.enter();
        numbering.before_sibling();
        assert_eq!(numbering.next(), 1);
        numbering.enter();
        numbering.before_sibling();
        assert_eq!(numbering.next(), 1);
        numbering.after_sibling();
        numbering.leave();
        numbering.after_sibling();
        numbering.before_sibling();
        assert_eq!(numbering.next(), 2);
    }

    #[test]
    fn test_link_definitions() {
        let mut references = LinkReferences::default();
        references.label_for("https://a.example");
        references.label_for("https://b.example");
        let definitions = references.definitions();
        let second = definitions[1].as_element().unwrap();
        assert_eq!(second.get_attr("label"), Some("2"));
        assert_eq!(second.get_attr("url"), Some("https://b.example"));
    }
}
