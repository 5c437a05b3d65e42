//! CSS Parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! "The input to the parsing stage is a stream of tokens from the tokenization stage."
//!
//! Declaration values and selectors are kept as source text rather than
//! component values: the inliner copies values through unchanged and hands
//! selectors to [`crate::selector::parse_selector`].

use core::ops::Range;

use quill_common::warning::warn_once;

use crate::error::CssError;
use crate::tokenizer::{CSSToken, CSSTokenizer, SpannedToken};

/// At-rules whose block holds a list of rules rather than declarations.
///
/// [CSS Conditional Rules 3 § 2](https://www.w3.org/TR/css-conditional-3/#processing)
const CONDITIONAL_GROUP_RULES: &[&str] = &["media", "supports", "document"];

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
///
/// A CSS declaration (e.g., `color: red`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// The property name, ASCII-lowercased.
    pub name: String,
    /// The value as written, trimmed and without comments. A trailing
    /// `!important` is left in place.
    pub value: String,
}

/// A CSS selector (simplified representation)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Raw selector text, whitespace collapsed to single spaces.
    pub text: String,
}

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
///
/// A CSS style rule (selector + declarations).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// The list of selectors for this rule.
    pub selectors: Vec<Selector>,
    /// The declarations in this rule block.
    pub declarations: Vec<Declaration>,
}

/// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
///
/// A CSS at-rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    /// The at-keyword name (without the `@`), ASCII-lowercased.
    pub name: String,
    /// The prelude as written, trimmed.
    pub prelude: String,
    /// Nested rules for conditional group rules (`@media`, `@supports`,
    /// `@document`). `None` for statements and for every other block.
    pub rules: Option<Vec<Rule>>,
}

/// [§ 5.3.3 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
///
/// A CSS rule (either a style rule or an at-rule).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// A style rule (qualified rule).
    Style(StyleRule),
    /// An at-rule.
    At(AtRule),
}

/// [§ 5.3.2 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
///
/// A parsed CSS stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// The list of rules in the stylesheet.
    pub rules: Vec<Rule>,
}

/// CSS parser
pub struct CSSParser {
    source: Vec<char>,
    tokens: Vec<SpannedToken>,
    position: usize,
}

impl CSSParser {
    /// Tokenize `input` and create a parser over the result.
    #[must_use]
    pub fn new(input: &str) -> Self {
        let mut tokenizer = CSSTokenizer::new(input);
        tokenizer.run();
        let (source, tokens) = tokenizer.into_parts();
        Self {
            source,
            tokens,
            position: 0,
        }
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    ///
    /// "To parse a stylesheet from input..."
    ///
    /// # Errors
    ///
    /// Returns [`CssError::MalformedDeclaration`] for a declaration that is not
    /// `name: value`, and [`CssError::InvalidSelector`] for an empty entry in a
    /// selector list.
    pub fn parse_stylesheet(&mut self) -> Result<Stylesheet, CssError> {
        // "Consume a list of rules from input, with the top-level flag set."
        let rules = self.consume_list_of_rules(true)?;
        Ok(Stylesheet { rules })
    }

    /// [§ 5.3.6 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
    ///
    /// Parse declarations from a style attribute or similar.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::MalformedDeclaration`] for anything that is not a
    /// `name: value` pair, including a stray `}`.
    pub fn parse_declaration_list(&mut self) -> Result<Vec<Declaration>, CssError> {
        self.consume_list_of_declarations(false)
    }

    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    ///
    /// Nested lists stop at the `}` closing their block and leave it for the caller.
    fn consume_list_of_rules(&mut self, top_level: bool) -> Result<Vec<Rule>, CssError> {
        // "Create an initially empty list of rules."
        let mut rules = Vec::new();

        loop {
            match self.peek() {
                // "<whitespace-token>"
                // "Do nothing."
                Some(CSSToken::Whitespace) => self.advance(),

                // "<EOF-token>"
                // "Return the list of rules."
                None | Some(CSSToken::EOF) => return Ok(rules),

                Some(CSSToken::RightBrace) => {
                    if !top_level {
                        return Ok(rules);
                    }
                    warn_once("CSS Parser", "ignoring unmatched `}` in stylesheet");
                    self.advance();
                }

                // "<CDO-token>" or "<CDC-token>"
                // "If the top-level flag is set, do nothing."
                Some(CSSToken::CDO | CSSToken::CDC) if top_level => self.advance(),

                // "<at-keyword-token>"
                // "Reconsume the current input token. Consume an at-rule, and append
                // the returned value to the list of rules."
                Some(CSSToken::AtKeyword(_)) => {
                    if let Some(at_rule) = self.consume_at_rule()? {
                        rules.push(Rule::At(at_rule));
                    }
                }

                // "anything else"
                // "Reconsume the current input token. Consume a qualified rule. If
                // anything is returned, append it to the list of rules."
                Some(_) => {
                    if let Some(rule) = self.consume_qualified_rule()? {
                        rules.push(Rule::Style(rule));
                    }
                }
            }
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    fn consume_at_rule(&mut self) -> Result<Option<AtRule>, CssError> {
        // "Consume the next input token."
        let name = match self.consume() {
            Some(CSSToken::AtKeyword(name)) => name.to_ascii_lowercase(),
            _ => return Ok(None),
        };

        // "Create a new at-rule with its name set to the value of the current input
        // token, its prelude initially set to an empty list, and its value initially
        // set to nothing."
        let prelude_start = self.position;

        loop {
            match self.peek() {
                // "<semicolon-token>"
                // "Return the at-rule."
                Some(CSSToken::Semicolon) => {
                    let prelude = self.text_of(prelude_start..self.position);
                    self.advance();
                    return Ok(Some(AtRule {
                        name,
                        prelude: prelude.trim().to_string(),
                        rules: None,
                    }));
                }

                // "<EOF-token>"
                // "This is a parse error. Return the at-rule."
                None | Some(CSSToken::EOF) => {
                    let prelude = self.text_of(prelude_start..self.position);
                    return Ok(Some(AtRule {
                        name,
                        prelude: prelude.trim().to_string(),
                        rules: None,
                    }));
                }

                // "<{-token>"
                // "Consume a simple block and assign it to the at-rule's block.
                // Return the at-rule."
                Some(CSSToken::LeftBrace) => {
                    let prelude = self.text_of(prelude_start..self.position);
                    let rules = if CONDITIONAL_GROUP_RULES.contains(&name.as_str()) {
                        self.advance();
                        let rules = self.consume_list_of_rules(false)?;
                        if self.peek() == Some(&CSSToken::RightBrace) {
                            self.advance();
                        }
                        Some(rules)
                    } else {
                        self.consume_simple_block();
                        None
                    };
                    return Ok(Some(AtRule {
                        name,
                        prelude: prelude.trim().to_string(),
                        rules,
                    }));
                }

                // "anything else"
                // "Reconsume the current input token. Consume a component value.
                // Append the returned value to the at-rule's prelude."
                Some(_) => self.consume_component_value(),
            }
        }
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    fn consume_qualified_rule(&mut self) -> Result<Option<StyleRule>, CssError> {
        let prelude_start = self.position;

        loop {
            match self.peek() {
                // "<EOF-token>"
                // "This is a parse error. Return nothing."
                None | Some(CSSToken::EOF) => {
                    let prelude = self.text_of(prelude_start..self.position);
                    warn_once(
                        "CSS Parser",
                        &format!("dropping `{}`: no declaration block", prelude.trim()),
                    );
                    return Ok(None);
                }

                // "<{-token>"
                // "Consume a simple block and assign it to the qualified rule's block.
                // Return the qualified rule."
                Some(CSSToken::LeftBrace) => {
                    // [§ 5.1 Selector Lists](https://www.w3.org/TR/selectors-4/#selector-list)
                    // "A selector list is a comma-separated list of selectors"
                    let selectors = self.split_selector_list(prelude_start..self.position)?;

                    self.advance(); // {
                    let declarations = self.consume_list_of_declarations(true)?;
                    if self.peek() == Some(&CSSToken::RightBrace) {
                        self.advance();
                    }

                    return Ok(Some(StyleRule {
                        selectors,
                        declarations,
                    }));
                }

                // "anything else"
                // "Reconsume the current input token. Consume a component value.
                // Append the returned value to the qualified rule's prelude."
                Some(_) => self.consume_component_value(),
            }
        }
    }

    /// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
    ///
    /// Inside a rule block (`in_block`) a `}` ends the list; in a bare
    /// declaration list it is an error.
    fn consume_list_of_declarations(&mut self, in_block: bool) -> Result<Vec<Declaration>, CssError> {
        let mut declarations = Vec::new();

        loop {
            match self.peek() {
                // "<whitespace-token>" or "<semicolon-token>"
                // "Do nothing."
                Some(CSSToken::Whitespace | CSSToken::Semicolon) => self.advance(),

                // "<EOF-token>"
                // "Return the list of declarations."
                None | Some(CSSToken::EOF) => return Ok(declarations),

                Some(CSSToken::RightBrace) => {
                    if in_block {
                        return Ok(declarations);
                    }
                    return Err(CssError::declaration("}", "unexpected `}`"));
                }

                // "<at-keyword-token>"
                // "Reconsume the current input token. Consume an at-rule."
                Some(CSSToken::AtKeyword(name)) => {
                    warn_once(
                        "CSS Parser",
                        &format!("ignoring @{name} inside a declaration block"),
                    );
                    let _ = self.consume_at_rule()?;
                }

                // "<ident-token>"
                // "Consume a declaration. If anything was returned, append it to
                // the list of declarations."
                // A leading `*` (the old IE star hack) is kept as part of the name.
                Some(CSSToken::Ident(_) | CSSToken::Delim('*')) => {
                    declarations.push(self.consume_declaration()?);
                }

                // "anything else"
                // "This is a parse error."
                Some(_) => {
                    let start = self.position;
                    self.skip_to_declaration_end();
                    let text = self.text_of(start..self.position);
                    return Err(CssError::declaration(
                        text.trim(),
                        "expected a property name",
                    ));
                }
            }
        }
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    fn consume_declaration(&mut self) -> Result<Declaration, CssError> {
        let start = self.position;

        let star = self.peek() == Some(&CSSToken::Delim('*'));
        if star {
            self.advance();
        }

        // "Consume the next input token."
        let ident = match self.consume() {
            Some(CSSToken::Ident(name)) => Some(name.to_ascii_lowercase()),
            _ => None,
        };
        let Some(ident) = ident else {
            self.skip_to_declaration_end();
            let text = self.text_of(start..self.position);
            return Err(CssError::declaration(text.trim(), "expected a property name"));
        };
        let name = if star { format!("*{ident}") } else { ident };

        // "While the next input token is a <whitespace-token>, consume the next input token."
        self.skip_whitespace();

        // "If the next input token is anything other than a <colon-token>, this is a parse error.
        // Return nothing."
        if self.peek() != Some(&CSSToken::Colon) {
            self.skip_to_declaration_end();
            let text = self.text_of(start..self.position);
            return Err(CssError::declaration(
                text.trim(),
                "expected `:` after the property name",
            ));
        }
        self.advance(); // :

        // "As long as the next input token is anything other than an <EOF-token>, consume a
        // component value and append it to the declaration's value."
        let value_start = self.position;
        self.skip_to_declaration_end();
        let value = self.text_of(value_start..self.position);
        let value = value.trim();

        if value.is_empty() {
            let text = self.text_of(start..self.position);
            return Err(CssError::declaration(text.trim(), "missing value"));
        }

        Ok(Declaration {
            name,
            value: value.to_string(),
        })
    }

    /// Consume component values up to (not including) the next top-level
    /// `;` or `}`, or the end of input.
    fn skip_to_declaration_end(&mut self) {
        while !matches!(
            self.peek(),
            None | Some(CSSToken::EOF | CSSToken::Semicolon | CSSToken::RightBrace)
        ) {
            self.consume_component_value();
        }
    }

    /// [§ 5.4.7 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    fn consume_simple_block(&mut self) {
        let ending_token = match self.consume() {
            Some(CSSToken::LeftBrace) => CSSToken::RightBrace,
            Some(CSSToken::LeftBracket) => CSSToken::RightBracket,
            Some(CSSToken::LeftParen) => CSSToken::RightParen,
            _ => return,
        };

        loop {
            match self.peek() {
                Some(token) if *token == ending_token => {
                    self.advance();
                    return;
                }
                None | Some(CSSToken::EOF) => return,
                Some(_) => self.consume_component_value(),
            }
        }
    }

    /// [§ 5.4.8 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
    ///
    /// Only the extent matters here, so nothing is returned.
    fn consume_component_value(&mut self) {
        match self.peek() {
            // "<{-token>", "<[-token>", "<(-token>"
            Some(CSSToken::LeftBrace | CSSToken::LeftBracket | CSSToken::LeftParen) => {
                self.consume_simple_block();
            }

            // "<function-token>"
            // [§ 5.4.9 Consume a function](https://www.w3.org/TR/css-syntax-3/#consume-function)
            Some(CSSToken::Function(_)) => {
                self.advance();
                loop {
                    match self.peek() {
                        Some(CSSToken::RightParen) => {
                            self.advance();
                            break;
                        }
                        None | Some(CSSToken::EOF) => break,
                        Some(_) => self.consume_component_value(),
                    }
                }
            }

            None | Some(CSSToken::EOF) => {}

            // "anything else"
            Some(_) => self.advance(),
        }
    }

    /// [§ 5.1 Selector Lists](https://www.w3.org/TR/selectors-4/#selector-list)
    ///
    /// Split the prelude tokens in `range` on top-level commas.
    /// "A selector list is a comma-separated list of selectors."
    fn split_selector_list(&self, range: Range<usize>) -> Result<Vec<Selector>, CssError> {
        let mut selectors = Vec::new();
        let mut current = String::new();
        let mut depth = 0usize;

        for spanned in &self.tokens[range.clone()] {
            match &spanned.token {
                CSSToken::Comma if depth == 0 => {
                    selectors.push(self.finish_selector(&current, range.clone())?);
                    current.clear();
                    continue;
                }
                CSSToken::Function(_) | CSSToken::LeftParen | CSSToken::LeftBracket => {
                    depth += 1;
                }
                CSSToken::RightParen | CSSToken::RightBracket => {
                    depth = depth.saturating_sub(1);
                }
                _ => {}
            }
            if spanned.token.is_whitespace() {
                if !current.ends_with(' ') {
                    current.push(' ');
                }
            } else {
                current.extend(&self.source[spanned.span.start..spanned.span.end]);
            }
        }

        // Don't forget the last selector (after the last comma, or the only one)
        selectors.push(self.finish_selector(&current, range)?);
        Ok(selectors)
    }

    fn finish_selector(&self, text: &str, prelude: Range<usize>) -> Result<Selector, CssError> {
        let text = text.trim();
        if text.is_empty() {
            let prelude = self.text_of(prelude);
            return Err(CssError::selector(prelude.trim(), "empty selector"));
        }
        Ok(Selector {
            text: text.to_string(),
        })
    }

    /// Source text of the tokens in `range`, comments excluded.
    fn text_of(&self, range: Range<usize>) -> String {
        self.tokens
            .get(range)
            .unwrap_or_default()
            .iter()
            .flat_map(|spanned| &self.source[spanned.span.start..spanned.span.end])
            .collect()
    }

    fn skip_whitespace(&mut self) {
        while self.peek() == Some(&CSSToken::Whitespace) {
            self.advance();
        }
    }

    fn consume(&mut self) -> Option<&CSSToken> {
        let token = &self.tokens.get(self.position)?.token;
        self.position += 1;
        Some(token)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn peek(&self) -> Option<&CSSToken> {
        self.tokens.get(self.position).map(|spanned| &spanned.token)
    }
}

/// Parse a complete stylesheet.
///
/// # Errors
///
/// See [`CSSParser::parse_stylesheet`].
pub fn parse_stylesheet(css: &str) -> Result<Stylesheet, CssError> {
    CSSParser::new(css).parse_stylesheet()
}

/// Parse the contents of a `style` attribute.
///
/// # Errors
///
/// See [`CSSParser::parse_declaration_list`].
pub fn parse_declaration_list(text: &str) -> Result<Vec<Declaration>, CssError> {
    CSSParser::new(text).parse_declaration_list()
}
