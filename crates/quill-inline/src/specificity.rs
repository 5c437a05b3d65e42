//! Cascade specificity: selector specificity widened with an inline flag.

use quill_css::{ParsedSelector, parse_selector};

use crate::error::InlineError;

/// [CSS Cascading 4 § 6.4.3 Specificity](https://www.w3.org/TR/css-cascade-4/#cascade-specificity)
///
/// "The Selectors module describes how to compute the specificity of a
/// selector. Each declaration has the same specificity as the style rule it
/// appears within. For the purpose of this step, declarations that do not
/// belong to a style rule (such as the contents of a style attribute) are
/// considered to have a specificity higher than any selector."
///
/// Fields are declared most significant first, so the derived `Ord`
/// compares lexicographically in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity {
    /// 1 for a `style` attribute, 0 for anything selector-derived.
    pub inline: u32,
    /// ID selectors.
    pub id: u32,
    /// Class, attribute and pseudo-class selectors.
    pub class_like: u32,
    /// Type selectors and pseudo-elements.
    pub type_like: u32,
}

impl Specificity {
    /// The specificity of a `style` attribute.
    pub const INLINE: Self = Self::new(1, 0, 0, 0);

    /// Create a specificity from its four components.
    #[must_use]
    pub const fn new(inline: u32, id: u32, class_like: u32, type_like: u32) -> Self {
        Self {
            inline,
            id,
            class_like,
            type_like,
        }
    }

    /// Specificity of an already parsed selector. Never inline.
    #[must_use]
    pub const fn from_selector(selector: &ParsedSelector) -> Self {
        let quill_css::Specificity(id, class_like, type_like) = selector.specificity;
        Self::new(0, id, class_like, type_like)
    }

    /// Specificity of a single selector given as text.
    ///
    /// # Errors
    ///
    /// Returns [`InlineError::UnresolvableSelector`] if the text is not a
    /// selector.
    pub fn calculate(selector: &str) -> Result<Self, InlineError> {
        Ok(Self::from_selector(&parse_selector(selector)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_outranks_selectors() {
        let heavy = Specificity::calculate("#a #b #c .d .e div span").unwrap();
        assert!(Specificity::INLINE > heavy);
        assert_eq!(heavy.inline, 0);
    }

    #[test]
    fn test_calculate() {
        assert_eq!(Specificity::calculate("p").unwrap(), Specificity::new(0, 0, 0, 1));
        assert_eq!(
            Specificity::calculate("ul li.item").unwrap(),
            Specificity::new(0, 0, 1, 2)
        );
        assert_eq!(
            Specificity::calculate("#nav a[href]:first-child").unwrap(),
            Specificity::new(0, 1, 2, 1)
        );
        assert_eq!(
            Specificity::calculate("p::first-line").unwrap(),
            Specificity::new(0, 0, 0, 2)
        );
        assert_eq!(Specificity::calculate("*").unwrap(), Specificity::default());
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        assert!(Specificity::new(0, 1, 0, 0) > Specificity::new(0, 0, 12, 40));
        assert!(Specificity::new(0, 0, 1, 0) > Specificity::new(0, 0, 0, 99));
    }

    #[test]
    fn test_calculate_rejects_invalid() {
        assert!(matches!(
            Specificity::calculate(""),
            Err(InlineError::UnresolvableSelector { .. })
        ));
        assert!(Specificity::calculate("p >").is_err());
    }
}
