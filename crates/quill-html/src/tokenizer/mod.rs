//! HTML tokenizer module.
//!
//! Implements a source-preserving subset of
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization).

/// HTML tokenizer state machine implementation.
pub mod core;
/// Helper methods for tokenizer state transitions.
pub mod helpers;
/// Token types produced by the tokenizer.
pub mod token;

pub use self::core::{HTMLTokenizer, RAW_TEXT_ELEMENTS, TokenizerState};
pub use token::{Attribute, Token};
