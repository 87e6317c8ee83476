//! Run matchers
//!
//!     A run matcher converts one formatted span between the document model and a fragment of a
//!     target markup. Matchers come in two directions:
//!
//!     - [`RunMatcher`] (to markup): inspects a run's [`Attributes`] and, when it applies, wraps
//!       the fragment built so far.
//!     - [`MarkupMatcher`] (from markup): inspects an inline [`Element`] and, when it applies,
//!       adds attributes to the run being accumulated.
//!
//!     Matchers are registered as ordered lists per (format, direction). On export every matcher
//!     whose predicate holds wraps the current fragment, in registration order, so the first
//!     registered matcher nests innermost and the last outermost. On import the first matching
//!     matcher wins for a given element; its children are then collected with the extended
//!     attributes.
//!
//!     Matchers never fail. Attributes a format cannot express are dropped on export, and nothing
//!     a matcher does not recognize is invented on import.
//!
//!     Most marks map to a single tag, which [`TagMatcher`] covers in both directions. Valued
//!     marks (links, colours) use [`ValueMatcher`], which keeps the value in an attribute. The
//!     per-format lists live in the submodules and are exported as extensions by the `adapters`
//!     module.

pub mod html;
pub mod markdown;
pub mod mix_text;
pub mod notion_html;
pub mod notion_text;
pub mod plain_text;

use crate::context::LinkReferences;
use crate::format::TargetFormat;
use crate::markup::{Element, Node};
use crate::options::ConvertOptions;
use blockdoc_model::{keys, Attributes};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Document model to target markup.
    ToMarkup,
    /// Target markup to document model.
    FromMarkup,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::ToMarkup => f.write_str("to-markup"),
            Direction::FromMarkup => f.write_str("from-markup"),
        }
    }
}

/// State an export matcher may need beyond the run itself.
pub struct InlineContext<'a> {
    pub format: TargetFormat,
    pub options: &'a ConvertOptions,
    pub references: &'a mut LinkReferences,
}

/// Export direction: wraps a fragment according to the run's attributes.
pub trait RunMatcher: Send + Sync {
    /// Unique within its (format, direction) list. Re-registering a name replaces the matcher.
    fn name(&self) -> &str;

    fn format(&self) -> TargetFormat;

    fn matches(&self, attributes: &Attributes) -> bool;

    /// Wrap `inner`, the fragment produced by the matchers registered before this one.
    fn wrap(
        &self,
        inner: Vec<Node>,
        attributes: &Attributes,
        ctx: &mut InlineContext<'_>,
    ) -> Vec<Node>;
}

/// Import direction: recognizes an inline element and contributes attributes.
pub trait MarkupMatcher: Send + Sync {
    fn name(&self) -> &str;

    fn format(&self) -> TargetFormat;

    fn matches(&self, element: &Element) -> bool;

    fn apply(&self, element: &Element, attributes: &mut Attributes);
}

/// A registered matcher of either direction.
#[derive(Clone)]
pub enum Matcher {
    ToMarkup(Arc<dyn RunMatcher>),
    FromMarkup(Arc<dyn MarkupMatcher>),
}

impl Matcher {
    pub fn name(&self) -> &str {
        match self {
            Matcher::ToMarkup(matcher) => matcher.name(),
            Matcher::FromMarkup(matcher) => matcher.name(),
        }
    }

    pub fn format(&self) -> TargetFormat {
        match self {
            Matcher::ToMarkup(matcher) => matcher.format(),
            Matcher::FromMarkup(matcher) => matcher.format(),
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Matcher::ToMarkup(_) => Direction::ToMarkup,
            Matcher::FromMarkup(_) => Direction::FromMarkup,
        }
    }

    pub fn as_run_matcher(&self) -> Option<&dyn RunMatcher> {
        match self {
            Matcher::ToMarkup(matcher) => Some(matcher.as_ref()),
            Matcher::FromMarkup(_) => None,
        }
    }

    pub fn as_markup_matcher(&self) -> Option<&dyn MarkupMatcher> {
        match self {
            Matcher::FromMarkup(matcher) => Some(matcher.as_ref()),
            Matcher::ToMarkup(_) => None,
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Matcher({} {} {})", self.format(), self.direction(), self.name())
    }
}

/// Boolean mark rendered as a single tag.
pub struct TagMatcher {
    name: String,
    format: TargetFormat,
    key: &'static str,
    tag: &'static str,
    aliases: &'static [&'static str],
    attrs: Vec<(&'static str, &'static str)>,
    predicate: Option<fn(&Element) -> bool>,
}

impl TagMatcher {
    pub fn new(format: TargetFormat, key: &'static str, tag: &'static str) -> Self {
        Self {
            name: format!("{}.{}", format, key),
            format,
            key,
            tag,
            aliases: &[],
            attrs: Vec::new(),
            predicate: None,
        }
    }

    /// Other tags accepted on import (`<b>` for bold, ...).
    pub fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// Attribute written on export.
    pub fn with_attr(mut self, key: &'static str, value: &'static str) -> Self {
        self.attrs.push((key, value));
        self
    }

    /// Replace tag matching on import with a custom test.
    pub fn matching(mut self, predicate: fn(&Element) -> bool) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Register this matcher in both directions.
    pub fn both(self) -> Vec<Matcher> {
        let matcher = Arc::new(self);
        vec![
            Matcher::ToMarkup(matcher.clone()),
            Matcher::FromMarkup(matcher),
        ]
    }
}

impl RunMatcher for TagMatcher {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self) -> TargetFormat {
        self.format
    }

    fn matches(&self, attributes: &Attributes) -> bool {
        attributes.flag(self.key)
    }

    fn wrap(
        &self,
        inner: Vec<Node>,
        _attributes: &Attributes,
        _ctx: &mut InlineContext<'_>,
    ) -> Vec<Node> {
        let mut element = Element::new(self.tag).children(inner);
        for (key, value) in &self.attrs {
            element = element.attr(key, *value);
        }
        vec![element.into()]
    }
}

impl MarkupMatcher for TagMatcher {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self) -> TargetFormat {
        self.format
    }

    fn matches(&self, element: &Element) -> bool {
        match self.predicate {
            Some(predicate) => predicate(element),
            None => element.is(self.tag) || self.aliases.iter().any(|alias| element.is(alias)),
        }
    }

    fn apply(&self, _element: &Element, attributes: &mut Attributes) {
        attributes.insert(self.key, true);
    }
}

/// A valued mark (`link`, Notion text colour) carried in an attribute of its element.
pub struct ValueMatcher {
    name: String,
    format: TargetFormat,
    key: &'static str,
    tag: &'static str,
    attr: &'static str,
}

impl ValueMatcher {
    pub fn new(
        format: TargetFormat,
        key: &'static str,
        tag: &'static str,
        attr: &'static str,
    ) -> Self {
        Self {
            name: format!("{}.{}", format, key),
            format,
            key,
            tag,
            attr,
        }
    }

    /// The `link` mark on `tag`, with the URL in `href`.
    pub fn link(format: TargetFormat, tag: &'static str, href: &'static str) -> Self {
        Self::new(format, keys::LINK, tag, href)
    }

    pub fn both(self) -> Vec<Matcher> {
        let matcher = Arc::new(self);
        vec![
            Matcher::ToMarkup(matcher.clone()),
            Matcher::FromMarkup(matcher),
        ]
    }
}

impl RunMatcher for ValueMatcher {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self) -> TargetFormat {
        self.format
    }

    fn matches(&self, attributes: &Attributes) -> bool {
        attributes.text(self.key).is_some()
    }

    fn wrap(
        &self,
        inner: Vec<Node>,
        attributes: &Attributes,
        _ctx: &mut InlineContext<'_>,
    ) -> Vec<Node> {
        let value = attributes.text(self.key).unwrap_or_default();
        vec![Element::new(self.tag)
            .attr(self.attr, value)
            .children(inner)
            .into()]
    }
}

impl MarkupMatcher for ValueMatcher {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self) -> TargetFormat {
        self.format
    }

    fn matches(&self, element: &Element) -> bool {
        element.is(self.tag) && element.get_attr(self.attr).is_some_and(|value| !value.is_empty())
    }

    fn apply(&self, element: &Element, attributes: &mut Attributes) {
        if let Some(value) = element.get_attr(self.attr) {
            attributes.insert(self.key, value);
        }
    }
}
