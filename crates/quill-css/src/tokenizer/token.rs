//! Tokens produced by [`CSSTokenizer`](super::CSSTokenizer), following the
//! token types of [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
//! Every token carries the [`Span`] it was read from.

/// Whether a `<hash-token>` could also serve as an ID selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashType {
    /// The value after `#` is a valid identifier (`#main`).
    Id,
    /// Anything else (`#123`, `#-1a`).
    Unrestricted,
}

/// One token of a stylesheet or `style` attribute.
///
/// Numeric tokens only keep their value: declaration text is copied through
/// from the source spans, never rebuilt from tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum CSSToken {
    /// `color`, `--brand`
    Ident(String),
    /// `url(`, `rgb(`; the name without the parenthesis
    Function(String),
    /// `@media`; the name without the `@`
    AtKeyword(String),
    /// `#fff`, `#header`
    Hash {
        /// Text after the `#`.
        value: String,
        /// Whether the text is an identifier.
        hash_type: HashType,
    },
    /// Quoted string, quotes removed and escapes resolved.
    String(String),
    /// String cut short by a newline.
    BadString,
    /// Unquoted `url(...)` contents.
    Url(String),
    /// Malformed unquoted `url(...)`.
    BadUrl,
    /// Any other single code point.
    Delim(char),
    /// `12`, `-1.5`
    Number(f64),
    /// `50%`
    Percentage(f64),
    /// `12px`, `1.5em`
    Dimension {
        /// The number.
        value: f64,
        /// The unit as written.
        unit: String,
    },
    /// A run of whitespace.
    Whitespace,
    /// `<!--`
    CDO,
    /// `-->`
    CDC,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// End of input. Always the last token.
    EOF,
}

impl CSSToken {
    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EOF)
    }

    /// Returns true if this is a whitespace token.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace)
    }
}

/// Half-open range of code point offsets into the tokenizer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Offset of the first code point of the token.
    pub start: usize,
    /// Offset one past the last code point of the token.
    pub end: usize,
}

impl Span {
    /// Create a span covering `start..end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of code points covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers nothing (only the EOF token).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A token together with where it came from.
///
/// Comments are consumed between tokens and never fall inside a span, so
/// joining the source text of consecutive spans gives the comment-free text.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    /// The token itself.
    pub token: CSSToken,
    /// Its source location.
    pub span: Span,
}
