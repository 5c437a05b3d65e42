//! Integration tests for the CSS parser.

use quill_css::{
    AtRule, CssError, Declaration, Rule, StyleRule, parse_declaration_list, parse_stylesheet,
};

fn decl(name: &str, value: &str) -> Declaration {
    Declaration {
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn style_rule(rule: &Rule) -> &StyleRule {
    match rule {
        Rule::Style(style) => style,
        Rule::At(at) => panic!("expected a style rule, got @{}", at.name),
    }
}

fn at_rule(rule: &Rule) -> &AtRule {
    match rule {
        Rule::At(at) => at,
        Rule::Style(_) => panic!("expected an at-rule"),
    }
}

fn selector_texts(rule: &StyleRule) -> Vec<&str> {
    rule.selectors.iter().map(|s| s.text.as_str()).collect()
}

#[test]
fn test_simple_rule() {
    let sheet = parse_stylesheet("p { color: red; }").unwrap();
    assert_eq!(sheet.rules.len(), 1);
    let rule = style_rule(&sheet.rules[0]);
    assert_eq!(selector_texts(rule), ["p"]);
    assert_eq!(rule.declarations, vec![decl("color", "red")]);
}

#[test]
fn test_selector_list_collapses_whitespace() {
    let sheet = parse_stylesheet("h1,\n  h2 >   p { margin: 0 }").unwrap();
    assert_eq!(selector_texts(style_rule(&sheet.rules[0])), ["h1", "h2 > p"]);
}

#[test]
fn test_values_are_kept_as_written() {
    let sheet = parse_stylesheet(
        r#"a {
            color: red !important;
            font-family: "Helvetica Neue", Arial;
            background: url(img.png) no-repeat;
            margin: /* top */ 0 auto
        }"#,
    )
    .unwrap();
    assert_eq!(
        style_rule(&sheet.rules[0]).declarations,
        vec![
            decl("color", "red !important"),
            decl("font-family", "\"Helvetica Neue\", Arial"),
            decl("background", "url(img.png) no-repeat"),
            decl("margin", "0 auto"),
        ]
    );
}

#[test]
fn test_property_names_are_lowercased() {
    let sheet = parse_stylesheet("A { COLOR: Red }").unwrap();
    let rule = style_rule(&sheet.rules[0]);
    assert_eq!(selector_texts(rule), ["A"]);
    assert_eq!(rule.declarations, vec![decl("color", "Red")]);
}

#[test]
fn test_media_rule_keeps_nested_rules() {
    let sheet =
        parse_stylesheet("@media screen and (max-width: 600px) { .a { color: red } } p { color: blue }")
            .unwrap();
    assert_eq!(sheet.rules.len(), 2);

    let media = at_rule(&sheet.rules[0]);
    assert_eq!(media.name, "media");
    assert_eq!(media.prelude, "screen and (max-width: 600px)");
    let nested = media.rules.as_ref().unwrap();
    assert_eq!(nested.len(), 1);
    assert_eq!(selector_texts(style_rule(&nested[0])), [".a"]);

    assert_eq!(selector_texts(style_rule(&sheet.rules[1])), ["p"]);
}

#[test]
fn test_other_at_rules_are_kept_without_contents() {
    let sheet = parse_stylesheet(
        "@import url(\"x.css\");\n@font-face { font-family: x; src: url(x.woff) }\np { color: red }",
    )
    .unwrap();
    assert_eq!(sheet.rules.len(), 3);

    let import = at_rule(&sheet.rules[0]);
    assert_eq!(import.name, "import");
    assert_eq!(import.prelude, "url(\"x.css\")");
    assert!(import.rules.is_none());

    let font_face = at_rule(&sheet.rules[1]);
    assert_eq!(font_face.name, "font-face");
    assert!(font_face.rules.is_none());

    assert_eq!(
        style_rule(&sheet.rules[2]).declarations,
        vec![decl("color", "red")]
    );
}

#[test]
fn test_html_comment_markers_are_ignored() {
    let sheet = parse_stylesheet("<!-- p { color: red } -->").unwrap();
    assert_eq!(sheet.rules.len(), 1);
}

#[test]
fn test_unterminated_block_keeps_declarations() {
    let sheet = parse_stylesheet("p { color: red").unwrap();
    assert_eq!(
        style_rule(&sheet.rules[0]).declarations,
        vec![decl("color", "red")]
    );
}

#[test]
fn test_prelude_without_block_is_dropped() {
    let sheet = parse_stylesheet("p { color: red } div").unwrap();
    assert_eq!(sheet.rules.len(), 1);
}

#[test]
fn test_empty_stylesheet() {
    assert!(parse_stylesheet("  /* nothing */ ").unwrap().rules.is_empty());
}

#[test]
fn test_empty_selector_in_list_is_an_error() {
    let err = parse_stylesheet("a,,b { color: red }").unwrap_err();
    assert!(matches!(err, CssError::InvalidSelector { ref selector, .. } if selector == "a,,b"));
}

#[test]
fn test_declaration_list() {
    assert_eq!(
        parse_declaration_list("color: blue; font-size:12px;").unwrap(),
        vec![decl("color", "blue"), decl("font-size", "12px")]
    );
    assert!(parse_declaration_list("").unwrap().is_empty());
    assert!(parse_declaration_list(" ; ; ").unwrap().is_empty());
}

#[test]
fn test_missing_colon_is_malformed() {
    let err = parse_declaration_list("color blue").unwrap_err();
    assert!(
        matches!(err, CssError::MalformedDeclaration { ref text, .. } if text == "color blue")
    );
}

#[test]
fn test_missing_value_is_malformed() {
    assert!(matches!(
        parse_declaration_list("color:"),
        Err(CssError::MalformedDeclaration { .. })
    ));
    assert!(matches!(
        parse_stylesheet("p { color: ; }"),
        Err(CssError::MalformedDeclaration { .. })
    ));
}

#[test]
fn test_stray_tokens_are_malformed() {
    assert!(matches!(
        parse_declaration_list("color: red; }"),
        Err(CssError::MalformedDeclaration { .. })
    ));
    assert!(matches!(
        parse_declaration_list("123: red"),
        Err(CssError::MalformedDeclaration { .. })
    ));
}

#[test]
fn test_error_messages() {
    let err = parse_declaration_list("color blue").unwrap_err();
    assert_eq!(
        err.to_string(),
        "malformed declaration `color blue`: expected `:` after the property name"
    );
}
