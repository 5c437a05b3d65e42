//! Decides which selectors may contribute to a static `style` attribute.

use std::collections::BTreeSet;
use std::fmt;

use quill_css::{ParsedSelector, parse_selector};

use crate::error::InlineError;
use crate::options::InlineOptions;

/// Why a selector was kept out of the cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ineligibility {
    /// The selector targets a pseudo-element, which has no element to carry
    /// a `style` attribute.
    PseudoElement(String),
    /// The selector depends on interaction or history state.
    IgnoredPseudoClass(String),
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PseudoElement(name) => write!(f, "pseudo-element `::{name}`"),
            Self::IgnoredPseudoClass(name) => write!(f, "ignored pseudo-class `:{name}`"),
        }
    }
}

/// Selector eligibility filter.
///
/// A selector is rejected when any compound of its chain carries a
/// pseudo-element, or a pseudo-class from the ignore set. The ignore set is
/// passed in rather than fixed so callers can extend it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityFilter {
    ignored_pseudo_classes: BTreeSet<String>,
}

impl EligibilityFilter {
    /// Filter rejecting the given pseudo-class names (lowercase, no colon).
    #[must_use]
    pub const fn new(ignored_pseudo_classes: BTreeSet<String>) -> Self {
        Self {
            ignored_pseudo_classes,
        }
    }

    /// Filter using the ignore set of `options`.
    #[must_use]
    pub fn from_options(options: &InlineOptions) -> Self {
        Self::new(options.ignored_pseudo_classes.clone())
    }

    /// The pseudo-class names this filter rejects.
    #[must_use]
    pub const fn ignored_pseudo_classes(&self) -> &BTreeSet<String> {
        &self.ignored_pseudo_classes
    }

    /// The first reason `selector` may not contribute, if any.
    #[must_use]
    pub fn check(&self, selector: &ParsedSelector) -> Option<Ineligibility> {
        if let Some(name) = selector.pseudo_elements().next() {
            return Some(Ineligibility::PseudoElement(name.to_string()));
        }
        selector
            .pseudo_class_names()
            .find(|name| self.ignored_pseudo_classes.contains(*name))
            .map(|name| Ineligibility::IgnoredPseudoClass(name.to_string()))
    }

    /// Whether `selector` may contribute to inline styles.
    #[must_use]
    pub fn is_eligible(&self, selector: &ParsedSelector) -> bool {
        self.check(selector).is_none()
    }

    /// Whether the selector written as `text` may contribute.
    ///
    /// # Errors
    ///
    /// Returns [`InlineError::UnresolvableSelector`] if the text is not a
    /// selector.
    pub fn is_eligible_text(&self, text: &str) -> Result<bool, InlineError> {
        Ok(self.is_eligible(&parse_selector(text)?))
    }
}

impl Default for EligibilityFilter {
    fn default() -> Self {
        Self::from_options(&InlineOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eligible(text: &str) -> bool {
        EligibilityFilter::default().is_eligible_text(text).unwrap()
    }

    #[test]
    fn test_plain_selectors_pass() {
        assert!(eligible("p"));
        assert!(eligible("div > .a + #b ~ [href]"));
        assert!(eligible("li:first-child"));
        assert!(eligible("input:checked"));
    }

    #[test]
    fn test_pseudo_elements_rejected() {
        assert!(!eligible("p::before"));
        assert!(!eligible("p:after"));
        assert!(!eligible("p::first-line span"));
    }

    #[test]
    fn test_dynamic_pseudo_classes_rejected() {
        assert!(!eligible("a:hover"));
        assert!(!eligible("a:link"));
        assert!(!eligible("a:visited"));
        assert!(!eligible("button:active"));
        assert!(!eligible("input:focus"));
        assert!(!eligible("div:hover > p"));
    }

    #[test]
    fn test_ignore_set_is_configurable() {
        let options = InlineOptions::default().ignore_pseudo_class(":first-child");
        let filter = EligibilityFilter::from_options(&options);
        assert!(filter.ignored_pseudo_classes().contains("first-child"));
        assert!(filter.ignored_pseudo_classes().contains("hover"));
        assert!(!filter.is_eligible_text("li:first-child").unwrap());

        let empty = EligibilityFilter::new(BTreeSet::new());
        assert!(empty.is_eligible_text("a:hover").unwrap());
        assert!(!empty.is_eligible_text("a::before").unwrap());
    }

    #[test]
    fn test_check_reports_reason() {
        let filter = EligibilityFilter::default();
        let selector = parse_selector("a:hover").unwrap();
        let reason = filter.check(&selector).unwrap();
        assert_eq!(reason, Ineligibility::IgnoredPseudoClass("hover".to_string()));
        assert_eq!(reason.to_string(), "ignored pseudo-class `:hover`");
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        assert!(EligibilityFilter::default().is_eligible_text("a:bogus").is_err());
    }
}
