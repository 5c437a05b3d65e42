//! [§ 18 Grammar](https://www.w3.org/TR/selectors-4/#grammar)
//!
//! Character-level parser turning selector text into a [`ParsedSelector`].

use quill_common::warning::warn_once;

use super::{
    AttributeOperator, AttributeSelector, Combinator, ComplexSelector, CompoundSelector, Nth,
    ParsedSelector, PseudoClass, PseudoClassName, SimpleSelector,
};
use crate::error::CssError;
use crate::tokenizer::css_tokenizer::{is_ident_code_point, is_ident_start_code_point};

/// [§ 11.1](https://www.w3.org/TR/selectors-4/#pseudo-element-syntax)
///
/// "For compatibility with existing style sheets, user agents must also accept
/// the previous one-colon notation for pseudo-elements introduced in CSS levels
/// 1 and 2 (namely, :first-line, :first-letter, :before, and :after)."
const LEGACY_PSEUDO_ELEMENTS: &[&str] = &["before", "after", "first-line", "first-letter"];

/// Parse a raw selector string into a `ParsedSelector`.
///
/// [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)
///
/// Supports type, universal, class, id and attribute selectors, the
/// pseudo-classes listed in [`PseudoClassName`], pseudo-elements, and the
/// four combinators. Selector lists must be split beforehand.
///
/// # Errors
///
/// Returns [`CssError::InvalidSelector`] for empty input, unknown
/// pseudo-classes, malformed arguments and any other syntax error.
pub fn parse_selector(raw: &str) -> Result<ParsedSelector, CssError> {
    let mut parser = SelectorParser::new(raw);
    let complex = parser.parse_complex()?;
    let _ = parser.skip_whitespace();
    if let Some(c) = parser.peek() {
        return Err(parser.error(format!("unexpected `{c}`")));
    }

    // [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    let specificity = complex.calculate_specificity();
    Ok(ParsedSelector {
        complex,
        specificity,
    })
}

struct SelectorParser<'a> {
    raw: &'a str,
    chars: Vec<char>,
    position: usize,
}

impl<'a> SelectorParser<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            raw,
            chars: raw.chars().collect(),
            position: 0,
        }
    }

    /// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    ///
    /// Stops before a `,` or `)` so `:not()` can reuse it for its argument list.
    fn parse_complex(&mut self) -> Result<ComplexSelector, CssError> {
        let _ = self.skip_whitespace();
        let mut subject = self.parse_compound()?;
        let mut chain = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',' | ')') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                // "A descendant combinator is whitespace that separates two compound selectors."
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(c) => return Err(self.error(format!("unexpected `{c}`"))),
            };
            if combinator != Combinator::Descendant {
                self.position += 1;
                let _ = self.skip_whitespace();
            }
            let next = self.parse_compound()?;
            chain.push((combinator, core::mem::replace(&mut subject, next)));
        }

        // Matching walks from the subject outward, so store right-to-left.
        chain.reverse();
        Ok(ComplexSelector {
            subject,
            combinators: chain,
        })
    }

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    fn parse_compound(&mut self) -> Result<CompoundSelector, CssError> {
        let mut simple_selectors = Vec::new();

        // "If it contains a type selector or universal selector, that selector
        // must come first in the sequence."
        if self.peek() == Some('*') {
            self.position += 1;
            simple_selectors.push(SimpleSelector::Universal);
        } else if self.starts_ident() {
            let name = self.consume_ident();
            simple_selectors.push(SimpleSelector::Type(name.to_ascii_lowercase()));
        }

        loop {
            let simple = match self.peek() {
                Some('.') => {
                    self.position += 1;
                    SimpleSelector::Class(self.expect_ident("a class name")?)
                }
                Some('#') => {
                    self.position += 1;
                    SimpleSelector::Id(self.expect_ident("an id")?)
                }
                Some('[') => SimpleSelector::Attribute(self.parse_attribute()?),
                Some(':') => self.parse_pseudo()?,
                _ => break,
            };
            simple_selectors.push(simple);
        }

        if simple_selectors.is_empty() {
            return Err(match self.peek() {
                Some(c) => self.error(format!("expected a selector before `{c}`")),
                None => self.error("expected a selector"),
            });
        }
        Ok(CompoundSelector { simple_selectors })
    }

    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    fn parse_attribute(&mut self) -> Result<AttributeSelector, CssError> {
        self.position += 1; // [
        let _ = self.skip_whitespace();
        let name = self.expect_ident("an attribute name")?.to_ascii_lowercase();
        let _ = self.skip_whitespace();

        let operator = match self.peek() {
            Some(']') => {
                self.position += 1;
                return Ok(AttributeSelector {
                    name,
                    operator: AttributeOperator::Exists,
                    value: String::new(),
                    case_insensitive: false,
                });
            }
            Some('=') => AttributeOperator::Equals,
            Some('~') => AttributeOperator::Includes,
            Some('|') => AttributeOperator::DashMatch,
            Some('^') => AttributeOperator::PrefixMatch,
            Some('$') => AttributeOperator::SuffixMatch,
            Some('*') => AttributeOperator::SubstringMatch,
            _ => return Err(self.error("expected `]` or an attribute operator")),
        };
        self.position += 1;
        if operator != AttributeOperator::Equals {
            if self.peek() != Some('=') {
                return Err(self.error("expected `=` in attribute operator"));
            }
            self.position += 1;
        }
        let _ = self.skip_whitespace();

        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => self.consume_string(quote)?,
            _ => {
                let value = self.consume_unquoted_value();
                if value.is_empty() {
                    return Err(self.error("expected an attribute value"));
                }
                value
            }
        };
        let _ = self.skip_whitespace();

        // [§ 6.3 Case-sensitivity](https://www.w3.org/TR/selectors-4/#attribute-case)
        let case_insensitive = match self.peek() {
            Some('i' | 'I') => {
                self.position += 1;
                true
            }
            Some('s' | 'S') => {
                self.position += 1;
                false
            }
            _ => false,
        };
        let _ = self.skip_whitespace();

        if self.peek() != Some(']') {
            return Err(self.error("expected `]`"));
        }
        self.position += 1;

        Ok(AttributeSelector {
            name,
            operator,
            value,
            case_insensitive,
        })
    }

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    /// [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    fn parse_pseudo(&mut self) -> Result<SimpleSelector, CssError> {
        self.position += 1; // :

        // Check for pseudo-element (::) vs pseudo-class (:)
        let is_pseudo_element = self.peek() == Some(':');
        if is_pseudo_element {
            self.position += 1;
        }
        let name = self.expect_ident("a pseudo-class name")?.to_ascii_lowercase();

        if is_pseudo_element || LEGACY_PSEUDO_ELEMENTS.contains(&name.as_str()) {
            // ::part(), ::slotted() and friends
            if self.peek() == Some('(') {
                let _ = self.consume_argument()?;
            }
            return Ok(SimpleSelector::PseudoElement(name));
        }

        if name.starts_with('-') {
            if self.peek() == Some('(') {
                let _ = self.consume_argument()?;
            }
            warn_once(
                "CSS Selectors",
                &format!("`:{name}` is vendor-specific and never matches"),
            );
            return Ok(SimpleSelector::PseudoClass(PseudoClass::Vendor(name)));
        }

        let kind: PseudoClassName = name
            .parse()
            .map_err(|_| self.error(format!("unknown pseudo-class `:{name}`")))?;

        let has_argument = self.peek() == Some('(');
        if kind.is_functional() && !has_argument {
            return Err(self.error(format!("`:{name}` requires an argument")));
        }
        if !kind.is_functional() && has_argument {
            return Err(self.error(format!("`:{name}` does not take an argument")));
        }

        let pseudo = match kind {
            PseudoClassName::Root => PseudoClass::Root,
            PseudoClassName::FirstChild => PseudoClass::FirstChild,
            PseudoClassName::LastChild => PseudoClass::LastChild,
            PseudoClassName::OnlyChild => PseudoClass::OnlyChild,
            PseudoClassName::FirstOfType => PseudoClass::FirstOfType,
            PseudoClassName::LastOfType => PseudoClass::LastOfType,
            PseudoClassName::OnlyOfType => PseudoClass::OnlyOfType,
            PseudoClassName::Empty => PseudoClass::Empty,
            PseudoClassName::NthChild => PseudoClass::NthChild(self.parse_nth_argument()?),
            PseudoClassName::NthLastChild => PseudoClass::NthLastChild(self.parse_nth_argument()?),
            PseudoClassName::NthOfType => PseudoClass::NthOfType(self.parse_nth_argument()?),
            PseudoClassName::NthLastOfType => {
                PseudoClass::NthLastOfType(self.parse_nth_argument()?)
            }
            PseudoClassName::Not => PseudoClass::Not(self.parse_not_argument()?),
            PseudoClassName::Link => PseudoClass::Link,
            PseudoClassName::Visited => PseudoClass::Visited,
            PseudoClassName::Hover => PseudoClass::Hover,
            PseudoClassName::Active => PseudoClass::Active,
            PseudoClassName::Focus => PseudoClass::Focus,
            PseudoClassName::FocusWithin => PseudoClass::FocusWithin,
            PseudoClassName::FocusVisible => PseudoClass::FocusVisible,
            PseudoClassName::Target => PseudoClass::Target,
            PseudoClassName::Checked => PseudoClass::Checked,
            PseudoClassName::Disabled => PseudoClass::Disabled,
            PseudoClassName::Enabled => PseudoClass::Enabled,
        };
        Ok(SimpleSelector::PseudoClass(pseudo))
    }

    fn parse_nth_argument(&mut self) -> Result<Nth, CssError> {
        let argument = self.consume_argument()?;
        parse_nth(&argument)
            .ok_or_else(|| self.error(format!("invalid An+B expression `{}`", argument.trim())))
    }

    /// [§ 4.3](https://www.w3.org/TR/selectors-4/#negation) `:not(<complex-selector-list>)`
    fn parse_not_argument(&mut self) -> Result<Vec<ComplexSelector>, CssError> {
        self.position += 1; // (
        let mut list = Vec::new();
        loop {
            list.push(self.parse_complex()?);
            let _ = self.skip_whitespace();
            match self.peek() {
                Some(',') => self.position += 1,
                Some(')') => {
                    self.position += 1;
                    return Ok(list);
                }
                _ => return Err(self.error("unclosed `:not(`")),
            }
        }
    }

    /// Consume a parenthesized argument, returning the text between the
    /// outer parentheses.
    fn consume_argument(&mut self) -> Result<String, CssError> {
        self.position += 1; // (
        let mut argument = String::new();
        let mut depth = 1u32;
        while let Some(c) = self.peek() {
            self.position += 1;
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(argument);
                    }
                }
                _ => {}
            }
            argument.push(c);
        }
        Err(self.error("unclosed `(`"))
    }

    /// [§ 4.3.4 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string(&mut self, quote: char) -> Result<String, CssError> {
        self.position += 1; // opening quote
        let mut value = String::new();
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => {
                    self.position += 1;
                    return Ok(value);
                }
                Some('\\') => {
                    self.position += 1;
                    if self.peek() == Some('\n') {
                        self.position += 1;
                    } else {
                        value.push(self.consume_escape());
                    }
                }
                Some(c) => {
                    self.position += 1;
                    value.push(c);
                }
            }
        }
    }

    /// Unquoted attribute values are taken up to whitespace or `]`, which
    /// also admits bare numbers such as `[width=600]`.
    fn consume_unquoted_value(&mut self) -> String {
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if c == ']' || c.is_whitespace() {
                break;
            }
            self.position += 1;
            if c == '\\' {
                value.push(self.consume_escape());
            } else {
                value.push(c);
            }
        }
        value
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, CssError> {
        if !self.starts_ident() {
            return Err(self.error(format!("expected {what}")));
        }
        Ok(self.consume_ident())
    }

    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    fn starts_ident(&self) -> bool {
        let valid_escape = |first: Option<char>, second: Option<char>| {
            first == Some('\\') && second.is_some_and(|c| c != '\n')
        };
        match self.peek() {
            Some('-') => {
                let second = self.peek_at(1);
                second.is_some_and(|c| is_ident_start_code_point(c) || c == '-')
                    || valid_escape(second, self.peek_at(2))
            }
            Some('\\') => valid_escape(Some('\\'), self.peek_at(1)),
            Some(c) => is_ident_start_code_point(c),
            None => false,
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident(&mut self) -> String {
        let mut result = String::new();
        while let Some(c) = self.peek() {
            if is_ident_code_point(c) {
                self.position += 1;
                result.push(c);
            } else if c == '\\' && self.peek_at(1).is_some_and(|next| next != '\n') {
                self.position += 1;
                result.push(self.consume_escape());
            } else {
                break;
            }
        }
        result
    }

    /// [§ 4.3.13 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// The backslash has already been consumed.
    fn consume_escape(&mut self) -> char {
        let Some(c) = self.peek() else {
            return '\u{FFFD}';
        };
        self.position += 1;
        if !c.is_ascii_hexdigit() {
            return c;
        }
        let mut hex = c.to_string();
        while hex.len() < 6 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            hex.push(self.chars[self.position]);
            self.position += 1;
        }
        if self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .filter(|&code_point| code_point != 0)
            .and_then(char::from_u32)
            .unwrap_or('\u{FFFD}')
    }

    /// Returns whether anything was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.position;
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
        self.position != start
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    fn error(&self, reason: impl Into<String>) -> CssError {
        CssError::selector(self.raw.trim(), reason)
    }
}

/// [§ 14.1 An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
///
/// Accepts `odd`, `even`, a bare integer, or `An+B` with optional parts
/// (`n`, `-n+3`, `2n`, `3n-1`).
fn parse_nth(argument: &str) -> Option<Nth> {
    let compact: String = argument
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    match compact.as_str() {
        "odd" => return Some(Nth { a: 2, b: 1 }),
        "even" => return Some(Nth { a: 2, b: 0 }),
        _ => {}
    }

    let Some((step, offset)) = compact.split_once('n') else {
        return Some(Nth {
            a: 0,
            b: compact.parse().ok()?,
        });
    };
    let a = match step {
        "" | "+" => 1,
        "-" => -1,
        step => step.parse().ok()?,
    };
    let b = if offset.is_empty() {
        0
    } else if offset.starts_with(['+', '-']) {
        offset.parse().ok()?
    } else {
        return None;
    };
    Some(Nth { a, b })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nth_forms() {
        assert_eq!(parse_nth("odd"), Some(Nth { a: 2, b: 1 }));
        assert_eq!(parse_nth(" EVEN "), Some(Nth { a: 2, b: 0 }));
        assert_eq!(parse_nth("3"), Some(Nth { a: 0, b: 3 }));
        assert_eq!(parse_nth("n"), Some(Nth { a: 1, b: 0 }));
        assert_eq!(parse_nth("-n + 3"), Some(Nth { a: -1, b: 3 }));
        assert_eq!(parse_nth("2n-1"), Some(Nth { a: 2, b: -1 }));
        assert_eq!(parse_nth("2n1"), None);
        assert_eq!(parse_nth("x"), None);
        assert_eq!(parse_nth(""), None);
    }

    #[test]
    fn test_escaped_class_name() {
        let parsed = parse_selector(r".a\:b").unwrap();
        assert_eq!(
            parsed.complex.subject.simple_selectors,
            vec![SimpleSelector::Class("a:b".to_string())]
        );
    }
}
