//! HTML tokenizer, tree builder and serializer for the quill CSS inliner.
//!
//! # Scope
//!
//! This crate implements a source-preserving HTML pipeline:
//! - **HTML Tokenizer** (a subset of [WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, raw text, tag, attribute, comment and declaration states
//!   - Tag and attribute names are lowercased; everything else is kept verbatim
//!
//! - **Tree Builder**
//!   - Stack of open elements with void elements and implied end tags
//!   - No synthesized `html`/`head`/`body` and no reparenting
//!
//! - **Serializer** ([WHATWG § 13.3](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments))
//!
//! # Not Implemented
//!
//! - Character reference decoding (references pass through untouched)
//! - Insertion modes, foster parenting and the adoption agency algorithm

/// HTML parser and tree construction.
pub mod parser;
/// Markup serialization.
pub mod serializer;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

use quill_dom::DomTree;

pub use parser::{HTMLParser, ParseIssue, VOID_ELEMENTS, dump_tree};
pub use serializer::{serialize, serialize_children, serialize_subtree};
pub use tokenizer::{Attribute, HTMLTokenizer, Token};

/// Tokenize and parse `html` into a [`DomTree`].
#[must_use]
pub fn parse(html: &str) -> DomTree {
    parse_with_issues(html).0
}

/// Tokenize and parse `html`, also returning the recoverable problems found.
#[must_use]
pub fn parse_with_issues(html: &str) -> (DomTree, Vec<ParseIssue>) {
    let mut tokenizer = HTMLTokenizer::new(html.to_string());
    tokenizer.run();
    HTMLParser::new(tokenizer.into_tokens()).run_with_issues()
}
