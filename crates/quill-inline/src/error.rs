//! Failures that abort an inlining pass.

use quill_css::CssError;
use thiserror::Error;

/// Either failure is fatal for the whole call: a partially inlined document
/// is never returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InlineError {
    /// A `style` attribute or rule block that does not split into
    /// `property: value` pairs.
    #[error("malformed declaration `{text}`: {reason}")]
    MalformedDeclaration {
        /// The offending source text.
        text: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A selector that cannot be classified or matched.
    #[error("unresolvable selector `{selector}`: {reason}")]
    UnresolvableSelector {
        /// The selector text as written.
        selector: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl From<CssError> for InlineError {
    fn from(error: CssError) -> Self {
        match error {
            CssError::MalformedDeclaration { text, reason } => {
                Self::MalformedDeclaration { text, reason }
            }
            CssError::InvalidSelector { selector, reason } => {
                Self::UnresolvableSelector { selector, reason }
            }
        }
    }
}
