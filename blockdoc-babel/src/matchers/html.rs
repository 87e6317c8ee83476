//! HTML inline marks: `<code>`, `<strong>`, `<em>`, `<u>`, `<del>`, `<a href>`

use super::{Matcher, TagMatcher, ValueMatcher};
use crate::format::TargetFormat;
use blockdoc_model::keys;

pub fn matchers() -> Vec<Matcher> {
    let format = TargetFormat::Html;
    [
        TagMatcher::new(format, keys::CODE, "code").both(),
        TagMatcher::new(format, keys::BOLD, "strong")
            .aliases(&["b"])
            .both(),
        TagMatcher::new(format, keys::ITALIC, "em")
            .aliases(&["i"])
            .both(),
        TagMatcher::new(format, keys::UNDERLINE, "u")
            .aliases(&["ins"])
            .both(),
        TagMatcher::new(format, keys::STRIKE, "del")
            .aliases(&["s", "strike"])
            .both(),
        ValueMatcher::link(format, "a", "href").both(),
    ]
    .into_iter()
    .flatten()
    .collect()
}
