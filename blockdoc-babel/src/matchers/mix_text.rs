//! Mixed text keeps links as `[text](url)`; the codec turns both that form and bare URLs into
//! `link` elements on import.

use super::{Matcher, ValueMatcher};
use crate::format::TargetFormat;

pub fn matchers() -> Vec<Matcher> {
    ValueMatcher::link(TargetFormat::MixText, "link", "url").both()
}
