//! CSS tokenizer, parser and selector matching for the quill CSS inliner.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - All token types: ident, function, at-keyword, hash, string, url, number, dimension, etc.
//!   - Comment handling and escape sequences
//!   - Source spans on every token
//!
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Style rules, at-rules, nested rules of conditional group rules
//!   - Declaration lists (rule blocks and `style` attributes), values kept as written
//!
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, universal, class, ID and attribute selectors
//!   - Structural, negation, link, input and user-action pseudo-classes
//!   - Pseudo-elements
//!   - Complex selectors with combinators (descendant, child, sibling)
//!   - Specificity calculation
//!
//! # Not Implemented
//!
//! - `:is()`, `:where()`, `:has()` and the `of S` form of `:nth-child()`
//! - Namespace prefixes
//! - Media query evaluation

/// Errors for stylesheets, declarations and selectors.
pub mod error;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// CSS selector parsing and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;

// Re-exports for convenience
pub use error::CssError;
pub use parser::{
    AtRule, CSSParser, Declaration, Rule, Selector, StyleRule, Stylesheet, parse_declaration_list,
    parse_stylesheet,
};
pub use selector::{ParsedSelector, Specificity, parse_selector, select};
pub use tokenizer::{CSSToken, CSSTokenizer};

use quill_dom::{DomTree, NodeId};

/// [HTML Standard § 4.2.6 The style element](https://html.spec.whatwg.org/multipage/semantics.html#the-style-element)
///
/// Extract CSS text from all `<style>` elements in the DOM tree, in tree order.
#[must_use]
pub fn extract_style_content(tree: &DomTree) -> String {
    let mut css = String::new();
    for id in style_elements(tree) {
        for &child_id in tree.children(id) {
            if let Some(text) = tree.as_text(child_id) {
                css.push_str(text);
                css.push('\n');
            }
        }
    }
    css
}

/// Every `<style>` element in the tree, in tree order.
#[must_use]
pub fn style_elements(tree: &DomTree) -> Vec<NodeId> {
    tree.descendants(tree.root())
        .filter(|&id| {
            tree.as_element(id)
                .is_some_and(|data| data.tag_name.eq_ignore_ascii_case("style"))
        })
        .collect()
}
