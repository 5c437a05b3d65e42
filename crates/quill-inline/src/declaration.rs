//! The declaration store: property/value pairs with their importance
//! extracted once at creation.

use quill_css::parse_declaration_list;

use crate::error::InlineError;

/// A single `property: value` pair.
///
/// [CSS Cascading 4 § 6.4.2 Important declarations](https://www.w3.org/TR/css-cascade-4/#importance)
///
/// "A declaration is important if it has a !important annotation ... When a
/// declaration is important, the origin's precedence is reversed."
///
/// The `!important` marker is stripped from `value` when the declaration is
/// built and recorded in `important`; the value never carries it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name, lowercased.
    pub property: String,
    /// Value as written, without any `!important` marker.
    pub value: String,
    /// Whether the source value ended in `!important`.
    pub important: bool,
}

impl Declaration {
    /// Build a declaration from a raw value, splitting off a trailing
    /// `!important`.
    #[must_use]
    pub fn new(property: impl Into<String>, raw_value: &str) -> Self {
        let (value, important) = split_important(raw_value);
        Self {
            property: property.into(),
            value: value.to_string(),
            important,
        }
    }
}

impl From<&quill_css::Declaration> for Declaration {
    fn from(declaration: &quill_css::Declaration) -> Self {
        Self::new(declaration.name.clone(), &declaration.value)
    }
}

/// Parse the text of a `style` attribute into declarations.
///
/// # Errors
///
/// Returns [`InlineError::MalformedDeclaration`] when the text is not a list
/// of `property: value` pairs.
pub fn parse_inline_style(text: &str) -> Result<Vec<Declaration>, InlineError> {
    Ok(parse_declaration_list(text)?
        .iter()
        .map(Declaration::from)
        .collect())
}

/// Split `red ! important` into (`red`, true). Matches a `!`, optional
/// whitespace and `important` (any case) at the very end of the value,
/// along with the whitespace before the `!`.
fn split_important(raw: &str) -> (&str, bool) {
    let trimmed = raw.trim_end();
    let keyword_start = trimmed.len().saturating_sub("important".len());
    let Some(keyword) = trimmed.get(keyword_start..) else {
        return (raw, false);
    };
    if !keyword.eq_ignore_ascii_case("important") {
        return (raw, false);
    }
    match trimmed[..keyword_start].trim_end().strip_suffix('!') {
        Some(value) => (value.trim_end(), true),
        None => (raw, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_important() {
        assert_eq!(split_important("red"), ("red", false));
        assert_eq!(split_important("red !important"), ("red", true));
        assert_eq!(split_important("red!important"), ("red", true));
        assert_eq!(split_important("red ! important  "), ("red", true));
        assert_eq!(split_important("red !IMPORTANT"), ("red", true));
        assert_eq!(split_important("important"), ("important", false));
        assert_eq!(split_important("a-important"), ("a-important", false));
        assert_eq!(split_important("!important"), ("", true));
    }

    #[test]
    fn test_declaration_strips_marker_once() {
        let declaration = Declaration::new("color", "blue !important");
        assert_eq!(declaration.value, "blue");
        assert!(declaration.important);

        let again = Declaration::new("color", &declaration.value);
        assert!(!again.important);
    }

    #[test]
    fn test_parse_inline_style() {
        let declarations = parse_inline_style("Color: red; margin:0 !important").unwrap();
        assert_eq!(
            declarations,
            vec![
                Declaration::new("color", "red"),
                Declaration {
                    property: "margin".to_string(),
                    value: "0".to_string(),
                    important: true,
                },
            ]
        );
    }

    #[test]
    fn test_parse_inline_style_rejects_garbage() {
        assert!(matches!(
            parse_inline_style("color red"),
            Err(InlineError::MalformedDeclaration { .. })
        ));
    }
}
