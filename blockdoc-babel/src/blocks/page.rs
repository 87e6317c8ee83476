//! Page block: the document root.
//!
//! Pages and notes have no markup of their own in any format. Export writes their children;
//! import never selects them, the converter creates the root and codecs look through
//! document wrappers.

use super::{declarations, per_format};
use crate::adapter::BlockAdapter;
use crate::context::SerializeContext;
use crate::error::ConvertError;
use crate::extension::Extension;
use crate::format::TargetFormat;
use crate::markup::Node;
use blockdoc_model::Block;

pub const FLAVOUR: &str = "page";

pub fn extensions() -> Vec<Extension> {
    vec![
        declarations(FLAVOUR, &[], &[]),
        Extension::service("page-service"),
        per_format(&TargetFormat::ALL, |format| ContainerAdapter::new(FLAVOUR, format)),
    ]
}

/// Exports a block as its children only.
pub struct ContainerAdapter {
    flavour: &'static str,
    format: TargetFormat,
}

impl ContainerAdapter {
    pub fn new(flavour: &'static str, format: TargetFormat) -> Self {
        Self { flavour, format }
    }
}

impl BlockAdapter for ContainerAdapter {
    fn flavour(&self) -> &str {
        self.flavour
    }

    fn format(&self) -> TargetFormat {
        self.format
    }

    fn supports_import(&self) -> bool {
        false
    }

    fn serialize(
        &self,
        block: &Block,
        ctx: &mut SerializeContext<'_>,
    ) -> Result<Vec<Node>, ConvertError> {
        ctx.serialize_children(block)
    }
}
