//! Integration tests for the CSS tokenizer.

use quill_css::tokenizer::{CSSToken, CSSTokenizer, HashType, Span, SpannedToken};

/// Helper to tokenize a string and return the tokens
fn tokenize(input: &str) -> Vec<CSSToken> {
    spanned(input).into_iter().map(|t| t.token).collect()
}

fn spanned(input: &str) -> Vec<SpannedToken> {
    let mut tokenizer = CSSTokenizer::new(input);
    tokenizer.run();
    tokenizer.into_tokens()
}

#[test]
fn test_whitespace() {
    let tokens = tokenize("   \t\n  ");
    assert_eq!(tokens, vec![CSSToken::Whitespace, CSSToken::EOF]);
}

#[test]
fn test_ident_and_function() {
    assert_eq!(
        tokenize("background-color rgb("),
        vec![
            CSSToken::Ident("background-color".to_string()),
            CSSToken::Whitespace,
            CSSToken::Function("rgb".to_string()),
            CSSToken::EOF,
        ]
    );
}

#[test]
fn test_hash_types() {
    let tokens = tokenize("#main #123");
    assert_eq!(
        tokens[0],
        CSSToken::Hash {
            value: "main".to_string(),
            hash_type: HashType::Id,
        }
    );
    assert_eq!(
        tokens[2],
        CSSToken::Hash {
            value: "123".to_string(),
            hash_type: HashType::Unrestricted,
        }
    );
}

#[test]
fn test_numeric_tokens() {
    assert_eq!(
        tokenize("12px 50% -1.5 +3e2"),
        vec![
            CSSToken::Dimension {
                value: 12.0,
                unit: "px".to_string(),
            },
            CSSToken::Whitespace,
            CSSToken::Percentage(50.0),
            CSSToken::Whitespace,
            CSSToken::Number(-1.5),
            CSSToken::Whitespace,
            CSSToken::Number(300.0),
            CSSToken::EOF,
        ]
    );
}

#[test]
fn test_strings() {
    assert_eq!(
        tokenize(r#""Helvetica Neue" 'a\'b'"#),
        vec![
            CSSToken::String("Helvetica Neue".to_string()),
            CSSToken::Whitespace,
            CSSToken::String("a'b".to_string()),
            CSSToken::EOF,
        ]
    );
}

#[test]
fn test_newline_in_string_is_bad_string() {
    let tokens = tokenize("\"abc\ndef\"");
    assert_eq!(tokens[0], CSSToken::BadString);
}

#[test]
fn test_url_tokens() {
    assert_eq!(tokenize("url( img.png )")[0], CSSToken::Url("img.png".to_string()));
    // A quoted url is a function followed by a string.
    assert_eq!(
        tokenize("url(\"img.png\")"),
        vec![
            CSSToken::Function("url".to_string()),
            CSSToken::String("img.png".to_string()),
            CSSToken::RightParen,
            CSSToken::EOF,
        ]
    );
}

#[test]
fn test_comments_are_dropped() {
    assert_eq!(
        tokenize("/* a */color/**/:red"),
        vec![
            CSSToken::Ident("color".to_string()),
            CSSToken::Colon,
            CSSToken::Ident("red".to_string()),
            CSSToken::EOF,
        ]
    );
}

#[test]
fn test_escaped_ident() {
    assert_eq!(tokenize(r"\31 0")[0], CSSToken::Ident("10".to_string()));
    assert_eq!(tokenize(r"a\:b")[0], CSSToken::Ident("a:b".to_string()));
}

#[test]
fn test_cdo_cdc_and_delims() {
    assert_eq!(
        tokenize("<!-- > -->"),
        vec![
            CSSToken::CDO,
            CSSToken::Whitespace,
            CSSToken::Delim('>'),
            CSSToken::Whitespace,
            CSSToken::CDC,
            CSSToken::EOF,
        ]
    );
}

#[test]
fn test_spans_cover_source_text() {
    let tokens = spanned("color: red");
    let spans: Vec<Span> = tokens.iter().map(|t| t.span).collect();
    assert_eq!(
        spans,
        vec![
            Span::new(0, 5),
            Span::new(5, 6),
            Span::new(6, 7),
            Span::new(7, 10),
            Span::new(10, 10),
        ]
    );
    assert!(tokens[4].span.is_empty());
}

#[test]
fn test_spans_skip_comments() {
    let tokens = spanned("a /* c */ b");
    let spans: Vec<Span> = tokens.iter().map(|t| t.span).collect();
    assert_eq!(
        spans,
        vec![
            Span::new(0, 1),
            Span::new(1, 2),
            Span::new(9, 10),
            Span::new(10, 11),
            Span::new(11, 11),
        ]
    );
}
