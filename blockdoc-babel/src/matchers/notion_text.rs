//! Notion text mark codes
//!
//! The Notion text codec turns each `[text, [[code, value?], ..]]` segment into nested
//! elements named after the mark codes, with the optional value in a `value` attribute.

use super::{Matcher, TagMatcher, ValueMatcher};
use crate::format::TargetFormat;
use blockdoc_model::keys;

pub fn matchers() -> Vec<Matcher> {
    let format = TargetFormat::NotionText;
    [
        TagMatcher::new(format, keys::CODE, "c").both(),
        TagMatcher::new(format, keys::BOLD, "b").both(),
        TagMatcher::new(format, keys::ITALIC, "i").both(),
        TagMatcher::new(format, keys::UNDERLINE, "_").both(),
        TagMatcher::new(format, keys::STRIKE, "s").both(),
        ValueMatcher::new(format, keys::COLOR, "h", "value").both(),
        ValueMatcher::link(format, "a", "value").both(),
    ]
    .into_iter()
    .flatten()
    .collect()
}
