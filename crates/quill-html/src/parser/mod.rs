//! HTML parser module for tree construction.

/// Fragment-preserving tree builder.
pub mod core;

pub use self::core::{HTMLParser, ParseIssue, VOID_ELEMENTS, dump_tree};
