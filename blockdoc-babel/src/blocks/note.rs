//! Note block: a surface of content blocks inside a page.

use super::page::ContainerAdapter;
use super::{declarations, per_format};
use crate::extension::Extension;
use crate::format::TargetFormat;

pub const FLAVOUR: &str = "note";

pub fn extensions() -> Vec<Extension> {
    vec![
        declarations(FLAVOUR, &["select-all"], &["Mod-a"]),
        per_format(&TargetFormat::ALL, |format| ContainerAdapter::new(FLAVOUR, format)),
    ]
}
