//! Block tree
//!
//!     A document is a tree of [`Block`]s. Every block has a flavour (its type tag), an ordered
//!     list of exclusively owned children, flavour-specific props and, for text-bearing blocks,
//!     a [`Text`] of formatted runs.
//!
//!     The flavour is fixed at construction: there is no setter, so a block never changes type.
//!     Ownership rules out cycles and shared parents, which leaves only one structural failure
//!     the tree can carry: a block whose flavour is empty (or absent from a JSON payload). That
//!     is reported as [`ModelError::MalformedTree`] by [`Block::validate`] and [`Block::from_json`].
//!
//!     Blocks are addressed with a [`BlockPath`], the child indices walked from the root. Paths
//!     give parent navigation without back pointers.

use crate::error::ModelError;
use crate::text::Text;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Child indices from the root to a block. The empty path is the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPath(Vec<usize>);

impl BlockPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of the `index`-th child of this path.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for BlockPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for BlockPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for index in &self.0 {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    flavour: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    props: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<Text>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Block>,
}

impl Block {
    pub fn new(flavour: impl Into<String>) -> Self {
        Self {
            flavour: flavour.into(),
            props: BTreeMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Parse a block tree from JSON, reporting missing or mistyped fields as a malformed tree.
    pub fn from_json(source: &str) -> Result<Self, ModelError> {
        let block: Block = serde_json::from_str(source).map_err(|e| {
            if e.is_data() {
                ModelError::malformed(BlockPath::root(), e.to_string())
            } else {
                ModelError::Json(e)
            }
        })?;
        block.validate()?;
        Ok(block)
    }

    pub fn to_json_pretty(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_text(mut self, text: impl Into<Text>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_prop(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.props.insert(key.to_string(), value.into());
        self
    }

    pub fn with_child(mut self, child: Block) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Block>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn flavour(&self) -> &str {
        &self.flavour
    }

    pub fn props(&self) -> &BTreeMap<String, Value> {
        &self.props
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    pub fn prop_bool(&self, key: &str) -> bool {
        self.props.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn prop_u64(&self, key: &str) -> Option<u64> {
        self.props.get(key).and_then(Value::as_u64)
    }

    pub fn set_prop(&mut self, key: &str, value: impl Into<Value>) {
        self.props.insert(key.to_string(), value.into());
    }

    pub fn text(&self) -> Option<&Text> {
        self.text.as_ref()
    }

    pub fn set_text(&mut self, text: impl Into<Text>) {
        self.text = Some(text.into());
    }

    /// Plain text of this block's own runs (children excluded).
    pub fn plain_text(&self) -> String {
        self.text.as_ref().map(Text::plain_text).unwrap_or_default()
    }

    pub fn children(&self) -> &[Block] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&Block> {
        self.children.get(index)
    }

    pub fn push_child(&mut self, child: Block) {
        self.children.push(child);
    }

    /// Block at `path`, relative to this block.
    pub fn get(&self, path: &BlockPath) -> Option<&Block> {
        path.indices()
            .iter()
            .try_fold(self, |block, &index| block.children.get(index))
    }

    pub fn get_mut(&mut self, path: &BlockPath) -> Option<&mut Block> {
        let mut block = self;
        for &index in path.indices() {
            block = block.children.get_mut(index)?;
        }
        Some(block)
    }

    /// Parent of the block at `path`; `None` for the root or a dangling path.
    pub fn parent_of(&self, path: &BlockPath) -> Option<&Block> {
        path.parent().and_then(|parent| self.get(&parent))
    }

    /// Depth-first, pre-order traversal starting with this block.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(BlockPath::root(), self)],
        }
    }

    /// Check the structural invariants of the whole subtree.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (path, block) in self.walk() {
            if block.flavour.trim().is_empty() {
                return Err(ModelError::malformed(path, "block has no flavour"));
            }
        }
        Ok(())
    }

    /// Traversal that first validates the tree.
    pub fn try_walk(&self) -> Result<Walk<'_>, ModelError> {
        self.validate()?;
        Ok(self.walk())
    }

    /// Number of blocks in the subtree, this block included.
    pub fn count(&self) -> usize {
        self.walk().count()
    }
}

/// Pre-order iterator over a block subtree, yielding each block with its path.
pub struct Walk<'a> {
    stack: Vec<(BlockPath, &'a Block)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (BlockPath, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, block) = self.stack.pop()?;
        for (index, child) in block.children.iter().enumerate().rev() {
            self.stack.push((path.child(index), child));
        }
        Some((path, block))
    }
}
