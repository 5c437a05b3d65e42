//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! State transitions, lookahead, token emission and attribute building.

use quill_common::warning::warn_once;

use super::core::{HTMLTokenizer, RAW_TEXT_ELEMENTS, TokenizerState, is_html_whitespace};
use super::token::{Attribute, Token};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Switch to the X state"
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// The same character will be processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Consume the next input character"
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input[self.current_pos..].chars().next()?;
        self.current_pos += c.len_utf8();
        Some(c)
    }

    /// Peek at a codepoint at the given offset from the current position
    /// without consuming it.
    #[must_use]
    pub fn peek_codepoint(&self, offset: usize) -> Option<char> {
        self.input[self.current_pos..].chars().nth(offset)
    }

    /// "If the next few characters are..."
    #[must_use]
    pub fn next_few_characters_are(&self, target: &str) -> bool {
        self.input[self.current_pos..].starts_with(target)
    }

    /// Consume `target`, which the caller has already matched with lookahead.
    pub(super) fn consume_string(&mut self, target: &str) {
        self.current_pos = (self.current_pos + target.len()).min(self.input.len());
    }

    /// [§ 13.2.5.11](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    ///
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer"
    ///
    /// Called with `<` as the current input character.
    pub(super) fn at_appropriate_end_tag(&self) -> bool {
        let Some(name) = &self.raw_text_end_tag else {
            return false;
        };
        if self.peek_codepoint(0) != Some('/') {
            return false;
        }
        let after_slash = &self.input[self.current_pos + 1..];
        if !after_slash
            .get(..name.len())
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name))
        {
            return false;
        }
        match after_slash[name.len()..].chars().next() {
            None | Some('/' | '>') => true,
            Some(c) => is_html_whitespace(c),
        }
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// Emit buffered character data as a single text token.
    pub(super) fn flush_text(&mut self) {
        if !self.text_buffer.is_empty() {
            let data = std::mem::take(&mut self.text_buffer);
            self.token_stream.push(Token::Text { data });
        }
    }

    /// "Emit the current token"
    pub(super) fn emit_current_token(&mut self) {
        self.flush_text();
        if let Some(token) = self.current_token.take() {
            self.token_stream.push(token);
        }
    }

    /// Emit the current tag token and return to the data state, or enter the
    /// RAWTEXT state when a raw text element was opened.
    pub(super) fn emit_current_tag(&mut self) {
        let next_state = match &self.current_token {
            Some(Token::StartTag {
                name, self_closing, ..
            }) if !self_closing && RAW_TEXT_ELEMENTS.contains(&name.as_str()) => {
                self.raw_text_end_tag = Some(name.clone());
                TokenizerState::RawText
            }
            _ => TokenizerState::Data,
        };
        self.emit_current_token();
        self.switch_to(next_state);
    }

    /// "Emit an end-of-file token."
    ///
    /// A tag that was still open when input ran out is dropped.
    pub(super) fn emit_eof_token(&mut self) {
        self.flush_text();
        self.current_token = None;
        self.token_stream.push(Token::EndOfFile);
        self.at_eof = true;
    }

    pub(super) fn log_parse_error(&self, code: &str) {
        warn_once(
            "HTML Tokenizer",
            &format!("{code} parse error in {} state", self.state),
        );
    }
}

// =============================================================================
// Tag and Attribute Helpers
// =============================================================================

impl HTMLTokenizer {
    pub(super) fn append_to_tag_name(&mut self, c: char) {
        match &mut self.current_token {
            Some(Token::StartTag { name, .. } | Token::EndTag { name }) => name.push(c),
            _ => {}
        }
    }

    /// "Start a new attribute in the current tag token."
    ///
    /// End tags get no attribute list; anything written on them is discarded.
    pub(super) fn start_new_attribute(&mut self) {
        if let Some(Token::StartTag { attributes, .. }) = &mut self.current_token {
            attributes.push(Attribute::new(String::new(), String::new()));
        }
    }

    fn current_attribute(&mut self) -> Option<&mut Attribute> {
        match &mut self.current_token {
            Some(Token::StartTag { attributes, .. }) => attributes.last_mut(),
            _ => None,
        }
    }

    pub(super) fn append_to_attribute_name(&mut self, c: char) {
        if let Some(attribute) = self.current_attribute() {
            attribute.name.push(c);
        }
    }

    pub(super) fn append_to_attribute_value(&mut self, c: char) {
        if let Some(attribute) = self.current_attribute() {
            attribute.value.push(c);
        }
    }
}
