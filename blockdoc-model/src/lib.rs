//! Document model for blockdoc
//!
//!     The model is the shared vocabulary of every format adapter: a tree of [`Block`]s, each
//!     tagged with a flavour, and the formatted [`Run`]s of text-bearing blocks.
//!
//!     This crate only reads and validates trees. It has no notion of formats or formatting
//!     rules; conversion lives in `blockdoc-babel`.
//!
//!     .
//!     ├── block.rs     # Block, BlockPath, pre-order traversal
//!     ├── text.rs      # Run, Attributes, Text
//!     └── error.rs     # ModelError

pub mod block;
pub mod error;
pub mod text;

pub use block::{Block, BlockPath, Walk};
pub use error::ModelError;
pub use text::{keys, AttrValue, Attributes, Run, Text};
