//! Errors produced while parsing stylesheets, declaration lists and selectors.

use thiserror::Error;

/// A stylesheet, declaration block or selector that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CssError {
    /// A declaration that is not of the form `name: value`.
    #[error("malformed declaration `{text}`: {reason}")]
    MalformedDeclaration {
        /// The offending source text.
        text: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A selector the selector parser rejects.
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector {
        /// The selector text as written.
        selector: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl CssError {
    pub(crate) fn declaration(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDeclaration {
            text: text.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }
}
