//! Inline text runs
//!
//!     A [`Text`] is the ordered run sequence of a text-bearing block. Each [`Run`] carries an
//!     independent set of [`Attributes`]; nothing in this module decides nesting or priority
//!     between marks, that is the job of the per-format matchers.
//!
//!     Runs are kept normalized: empty runs are dropped, falsy attributes are removed, and
//!     adjacent runs with equal attributes are merged. This means two texts that read the same
//!     and carry the same marks compare equal regardless of how they were split by a parser.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Well-known attribute keys.
pub mod keys {
    pub const BOLD: &str = "bold";
    pub const ITALIC: &str = "italic";
    pub const UNDERLINE: &str = "underline";
    pub const STRIKE: &str = "strike";
    pub const CODE: &str = "code";
    pub const LINK: &str = "link";
    pub const COLOR: &str = "color";
}

/// Value of a single mark.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Text(String),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(value) => Some(value),
            AttrValue::Bool(_) => None,
        }
    }

    /// `true` for `Bool(true)` and non-empty text values.
    pub fn is_truthy(&self) -> bool {
        match self {
            AttrValue::Bool(flag) => *flag,
            AttrValue::Text(value) => !value.is_empty(),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

/// Unordered set of named marks on a run. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, AttrValue>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Attributes::insert`].
    pub fn with(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a mark. Falsy values remove the key instead of storing it.
    pub fn insert(&mut self, key: &str, value: impl Into<AttrValue>) {
        let value = value.into();
        if value.is_truthy() {
            self.0.insert(key.to_string(), value);
        } else {
            self.0.remove(key);
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.get(key)
    }

    /// Whether the mark is present and truthy.
    pub fn flag(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(AttrValue::is_truthy)
    }

    /// Text value of a valued mark such as `link`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(AttrValue::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Keep only the marks accepted by `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|key, _| keep(key));
    }

    fn normalize(&mut self) {
        self.0.retain(|_, value| value.is_truthy());
    }
}

/// A contiguous span of text with formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

impl Run {
    pub fn new(text: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            text: text.into(),
            attributes,
        }
    }

    /// A run without marks.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Attributes::new())
    }

    /// Builder form for adding a mark.
    pub fn with(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key, value);
        self
    }
}

/// Ordered, normalized run sequence of a text-bearing block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Run>", into = "Vec<Run>")]
pub struct Text {
    runs: Vec<Run>,
}

impl Text {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a run, merging it into the previous one when the marks are equal.
    pub fn push(&mut self, mut run: Run) {
        if run.text.is_empty() {
            return;
        }
        run.attributes.normalize();
        if let Some(last) = self.runs.last_mut() {
            if last.attributes == run.attributes {
                last.text.push_str(&run.text);
                return;
            }
        }
        self.runs.push(run);
    }

    /// Append every run of `other`.
    pub fn extend(&mut self, other: Text) {
        for run in other.runs {
            self.push(run);
        }
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Run> {
        self.runs.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Concatenation of all run texts.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Copy of this text with every mark removed.
    pub fn unstyled(&self) -> Text {
        Text::from(self.plain_text())
    }

    /// Split at every newline into one text per line, keeping marks.
    pub fn lines(&self) -> Vec<Text> {
        let mut lines = vec![Text::new()];
        for run in &self.runs {
            let mut pieces = run.text.split('\n');
            if let Some(first) = pieces.next() {
                if let Some(current) = lines.last_mut() {
                    current.push(Run::new(first, run.attributes.clone()));
                }
            }
            for piece in pieces {
                let mut line = Text::new();
                line.push(Run::new(piece, run.attributes.clone()));
                lines.push(line);
            }
        }
        lines
    }

    /// Remove leading and trailing whitespace across run boundaries.
    pub fn trimmed(&self) -> Text {
        let mut runs = self.runs.clone();
        while let Some(first) = runs.first_mut() {
            let trimmed = first.text.trim_start().to_string();
            if trimmed.is_empty() {
                runs.remove(0);
            } else {
                first.text = trimmed;
                break;
            }
        }
        while let Some(last) = runs.last_mut() {
            let trimmed = last.text.trim_end().to_string();
            if trimmed.is_empty() {
                runs.pop();
            } else {
                last.text = trimmed;
                break;
            }
        }
        runs.into_iter().collect()
    }
}

impl From<Vec<Run>> for Text {
    fn from(runs: Vec<Run>) -> Self {
        runs.into_iter().collect()
    }
}

impl From<Text> for Vec<Run> {
    fn from(text: Text) -> Self {
        text.runs
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        let mut text = Text::new();
        text.push(Run::plain(value));
        text
    }
}

impl From<String> for Text {
    fn from(value: String) -> Self {
        Text::from(value.as_str())
    }
}

impl FromIterator<Run> for Text {
    fn from_iter<I: IntoIterator<Item = Run>>(iter: I) -> Self {
        let mut text = Text::new();
        for run in iter {
            text.push(run);
        }
        text
    }
}

impl<'a> IntoIterator for &'a Text {
    type Item = &'a Run;
    type IntoIter = std::slice::Iter<'a, Run>;

    fn into_iter(self) -> Self::IntoIter {
        self.runs.iter()
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in &self.runs {
            f.write_str(&run.text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_push_merges_equal_marks() {
        let mut text = Text::new();
        text.push(Run::plain("Hi "));
        text.push(Run::plain("there"));
        text.push(Run::plain("!").with(keys::BOLD, true));

        assert_eq!(text.runs().len(), 2);
        assert_eq!(text.runs()[0].text, "Hi there");
        assert_eq!(text.plain_text(), "Hi there!");
    }

    #[test]
    fn test_push_drops_empty_runs() {
        let mut text = Text::new();
        text.push(Run::plain("").with(keys::BOLD, true));
        assert!(text.is_empty());
    }

    #[test]
    fn test_falsy_marks_are_removed() {
        let attrs = Attributes::new()
            .with(keys::BOLD, false)
            .with(keys::LINK, "");
        assert!(attrs.is_empty());

        let text: Text = vec![
            Run::plain("a"),
            Run::new("b", serde_json::from_str(r#"{"bold":false}"#).unwrap()),
        ]
        .into();
        assert_eq!(text.runs(), &[Run::plain("ab")]);
    }

    #[rstest]
    #[case::false_flag(AttrValue::Bool(false), false)]
    #[case::empty_text(AttrValue::Text(String::new()), false)]
    #[case::true_flag(AttrValue::Bool(true), true)]
    #[case::url(AttrValue::Text("https://example.com".into()), true)]
    fn test_mark_is_kept_only_when_truthy(#[case] value: AttrValue, #[case] kept: bool) {
        let mut text = Text::new();
        text.push(Run::plain("x").with(keys::LINK, value));
        assert_eq!(text.runs()[0].attributes.is_empty(), !kept);
    }

    #[test]
    fn test_lines_keep_marks() {
        let text: Text = vec![
            Run::plain("one\ntw"),
            Run::plain("o\nthree").with(keys::ITALIC, true),
        ]
        .into();

        let lines = text.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].plain_text(), "one");
        assert_eq!(lines[1].runs().len(), 2);
        assert_eq!(lines[2].runs()[0].attributes, Attributes::new().with(keys::ITALIC, true));
    }

    #[test]
    fn test_trimmed_crosses_runs() {
        let text: Text = vec![
            Run::plain("  "),
            Run::plain(" bold ").with(keys::BOLD, true),
            Run::plain(" "),
        ]
        .into();

        let trimmed = text.trimmed();
        assert_eq!(trimmed.runs(), &[Run::plain("bold").with(keys::BOLD, true)]);
    }

    #[test]
    fn test_serde_shape() {
        let text: Text = vec![Run::plain("Hi "), Run::plain("bold").with(keys::BOLD, true)].into();
        let json = serde_json::to_string(&text).unwrap();
        assert_eq!(json, r#"[{"text":"Hi "},{"text":"bold","attributes":{"bold":true}}]"#);

        let back: Text = serde_json::from_str(&json).unwrap();
        assert_eq!(back, text);
    }
}
