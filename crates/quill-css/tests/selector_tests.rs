//! Integration tests for CSS selector parsing and matching.

use quill_css::selector::{
    AttributeOperator, Combinator, PseudoClass, SimpleSelector, Specificity, parse_selector,
    select,
};
use quill_css::CssError;
use quill_dom::{DomTree, NodeId};

fn parse(html: &str) -> DomTree {
    quill_html::parse(html)
}

fn by_id(tree: &DomTree, id: &str) -> NodeId {
    tree.descendants(NodeId::ROOT)
        .find(|&node| tree.as_element(node).and_then(|e| e.id()) == Some(id))
        .unwrap_or_else(|| panic!("no element with id {id}"))
}

/// Ids of the elements `selector` matches, in tree order.
fn matched_ids(html: &str, selector: &str) -> Vec<String> {
    let tree = parse(html);
    let parsed = parse_selector(selector).unwrap();
    select(&parsed, &tree)
        .into_iter()
        .filter_map(|node| tree.as_element(node).and_then(|e| e.id()).map(str::to_string))
        .collect()
}

#[test]
fn test_parse_type_selector() {
    let selector = parse_selector("body").unwrap();
    assert_eq!(selector.specificity, Specificity(0, 0, 1));
    assert!(selector.is_simple());
    assert!(matches!(
        &selector.complex.subject.simple_selectors[0],
        SimpleSelector::Type(name) if name == "body"
    ));
}

#[test]
fn test_type_selector_is_lowercased() {
    let selector = parse_selector("DIV").unwrap();
    assert_eq!(
        selector.complex.subject.simple_selectors,
        vec![SimpleSelector::Type("div".to_string())]
    );
}

#[test]
fn test_parse_compound_selector() {
    let selector = parse_selector("a.nav#home[href]").unwrap();
    assert_eq!(selector.specificity, Specificity(1, 2, 1));
    assert_eq!(selector.complex.subject.simple_selectors.len(), 4);
}

#[test]
fn test_parse_combinators() {
    let selector = parse_selector("div > ul li + a ~ span").unwrap();
    let combinators: Vec<Combinator> = selector
        .complex
        .combinators
        .iter()
        .map(|(combinator, _)| *combinator)
        .collect();
    // Stored right-to-left, starting next to the subject.
    assert_eq!(
        combinators,
        [
            Combinator::SubsequentSibling,
            Combinator::NextSibling,
            Combinator::Descendant,
            Combinator::Child,
        ]
    );
    assert_eq!(selector.specificity, Specificity(0, 0, 5));
}

#[test]
fn test_specificity() {
    let cases = [
        ("*", Specificity(0, 0, 0)),
        ("li", Specificity(0, 0, 1)),
        ("ul li", Specificity(0, 0, 2)),
        (".a", Specificity(0, 1, 0)),
        ("[type=text]", Specificity(0, 1, 0)),
        ("li:first-child", Specificity(0, 1, 1)),
        ("p::before", Specificity(0, 0, 2)),
        ("#x", Specificity(1, 0, 0)),
        ("#x .y p", Specificity(1, 1, 1)),
        // :not() counts as its most specific argument
        ("p:not(.a, #b)", Specificity(1, 0, 1)),
        ("p:not(span)", Specificity(0, 0, 2)),
    ];
    for (selector, expected) in cases {
        assert_eq!(
            parse_selector(selector).unwrap().specificity,
            expected,
            "{selector}"
        );
    }
}

#[test]
fn test_pseudo_elements() {
    for selector in ["p::before", "p::AFTER", "p:before", "p:first-line", "p::-webkit-scrollbar"] {
        let parsed = parse_selector(selector).unwrap();
        assert_eq!(parsed.pseudo_elements().count(), 1, "{selector}");
        assert_eq!(parsed.pseudo_class_names().count(), 0, "{selector}");
    }
}

#[test]
fn test_pseudo_class_names_are_top_level_only() {
    let parsed = parse_selector("a:HOVER .b:not(:focus) > c:first-child").unwrap();
    let mut names: Vec<&str> = parsed.pseudo_class_names().collect();
    names.sort_unstable();
    assert_eq!(names, ["first-child", "hover", "not"]);
}

#[test]
fn test_parse_attribute_selectors() {
    let parsed = parse_selector("[lang|='en' i]").unwrap();
    let SimpleSelector::Attribute(attribute) = &parsed.complex.subject.simple_selectors[0] else {
        panic!("expected an attribute selector");
    };
    assert_eq!(attribute.name, "lang");
    assert_eq!(attribute.operator, AttributeOperator::DashMatch);
    assert_eq!(attribute.value, "en");
    assert!(attribute.case_insensitive);

    let parsed = parse_selector("td[width=600]").unwrap();
    assert!(matches!(
        &parsed.complex.subject.simple_selectors[1],
        SimpleSelector::Attribute(a) if a.value == "600" && a.operator == AttributeOperator::Equals
    ));
}

#[test]
fn test_parse_nth_child() {
    let parsed = parse_selector("tr:nth-child(2n+1)").unwrap();
    assert!(matches!(
        &parsed.complex.subject.simple_selectors[1],
        SimpleSelector::PseudoClass(PseudoClass::NthChild(nth)) if nth.a == 2 && nth.b == 1
    ));
}

#[test]
fn test_vendor_pseudo_class_parses() {
    let parsed = parse_selector("a:-moz-focusring").unwrap();
    assert!(matches!(
        &parsed.complex.subject.simple_selectors[1],
        SimpleSelector::PseudoClass(PseudoClass::Vendor(name)) if name == "-moz-focusring"
    ));
}

#[test]
fn test_invalid_selectors() {
    for selector in [
        "",
        "   ",
        "> p",
        "p >",
        "p:bogus",
        "p:nth-child",
        "p:nth-child(x)",
        "p:first-child(2)",
        "p:not(",
        "[",
        "[a=",
        "[a=\"x]",
        "a!",
        ".",
        "#",
        "a, b",
        "ns|a",
    ] {
        assert!(
            matches!(
                parse_selector(selector),
                Err(CssError::InvalidSelector { .. })
            ),
            "{selector:?} should be rejected"
        );
    }
}

#[test]
fn test_match_type_class_and_id() {
    let html = r#"<div id="a" class="x y"></div><p id="b" class="x"></p><span id="c"></span>"#;
    assert_eq!(matched_ids(html, "div"), ["a"]);
    assert_eq!(matched_ids(html, ".x"), ["a", "b"]);
    assert_eq!(matched_ids(html, ".x.y"), ["a"]);
    assert_eq!(matched_ids(html, "#c"), ["c"]);
    assert_eq!(matched_ids(html, "*"), ["a", "b", "c"]);
    assert!(matched_ids(html, ".X").is_empty());
}

#[test]
fn test_select_returns_tree_order() {
    let html = r#"<div id="outer"><p id="p1"><span id="s1"></span></p></div><p id="p2"></p>"#;
    assert_eq!(matched_ids(html, "p"), ["p1", "p2"]);
    assert_eq!(matched_ids(html, "div *"), ["p1", "s1"]);
}

#[test]
fn test_match_combinators() {
    let html = r#"<ul id="list"><li id="one"></li><li id="two"></li><li id="three"></li></ul>"#;
    assert_eq!(matched_ids(html, "ul > li"), ["one", "two", "three"]);
    assert_eq!(matched_ids(html, "li + li"), ["two", "three"]);
    assert_eq!(matched_ids(html, "#one ~ li"), ["two", "three"]);
    assert_eq!(matched_ids(html, "#two + li"), ["three"]);
    assert!(matched_ids(html, "li > ul").is_empty());
}

#[test]
fn test_descendant_combinator_backtracks() {
    // The nearest `.b` ancestor has the wrong parent; the outer one matches.
    let html = r#"<div class="a"><div class="b"><div class="b"><span id="t" class="c"></span></div></div></div>"#;
    assert_eq!(matched_ids(html, ".a > .b .c"), ["t"]);
}

#[test]
fn test_next_sibling_skips_text() {
    let html = "<div><h1 id=\"h\"></h1>\n  <!-- c -->\n  <p id=\"p\"></p></div>";
    assert_eq!(matched_ids(html, "h1 + p"), ["p"]);
}

#[test]
fn test_match_attribute_operators() {
    let html = r#"<a id="a" href="https://example.com/x.png" lang="en-US" class="btn primary" data-x="Dark"></a>"#;
    for selector in [
        "[href]",
        "[lang=en-US]",
        "[class~=primary]",
        "[lang|=en]",
        "[href^=https]",
        "[href$='.png']",
        "[href*=example]",
        "[data-x=dark i]",
    ] {
        assert_eq!(matched_ids(html, selector), ["a"], "{selector}");
    }
    for selector in ["[title]", "[lang=en]", "[class~=btn-primary]", "[href^='']", "[data-x=dark]"] {
        assert!(matched_ids(html, selector).is_empty(), "{selector}");
    }
}

#[test]
fn test_match_structural_pseudo_classes() {
    let html = r#"<ul><li id="1"></li><li id="2"></li><li id="3"></li><li id="4"></li></ul>"#;
    assert_eq!(matched_ids(html, "li:first-child"), ["1"]);
    assert_eq!(matched_ids(html, "li:last-child"), ["4"]);
    assert_eq!(matched_ids(html, "li:nth-child(odd)"), ["1", "3"]);
    assert_eq!(matched_ids(html, "li:nth-child(2n)"), ["2", "4"]);
    assert_eq!(matched_ids(html, "li:nth-last-child(1)"), ["4"]);
    assert_eq!(matched_ids(html, "li:nth-child(-n+2)"), ["1", "2"]);
    assert!(matched_ids(html, "li:only-child").is_empty());
}

#[test]
fn test_match_type_pseudo_classes() {
    let html = r#"<div><h2 id="h"></h2><p id="p1"></p><p id="p2"></p><span id="s"></span></div>"#;
    assert_eq!(matched_ids(html, "p:first-of-type"), ["p1"]);
    assert_eq!(matched_ids(html, "p:last-of-type"), ["p2"]);
    assert_eq!(matched_ids(html, "p:nth-of-type(2)"), ["p2"]);
    assert_eq!(matched_ids(html, "p:nth-last-of-type(2)"), ["p1"]);
    assert_eq!(matched_ids(html, ":only-of-type"), ["h", "s"]);
}

#[test]
fn test_match_root_and_empty() {
    let html = r#"<html id="root"><body id="body"><div id="e"> </div><div id="f">x</div></body></html>"#;
    assert_eq!(matched_ids(html, ":root"), ["root"]);
    assert_eq!(matched_ids(html, "div:empty"), ["e"]);
}

#[test]
fn test_match_not() {
    let html = r#"<p id="a" class="x"></p><p id="b"></p><p id="c" class="y"></p>"#;
    assert_eq!(matched_ids(html, "p:not(.x)"), ["b", "c"]);
    assert_eq!(matched_ids(html, "p:not(.x, .y)"), ["b"]);
}

#[test]
fn test_dynamic_pseudo_classes_never_match() {
    let html = r#"<a id="a" href="/"></a><a id="b"></a>"#;
    assert_eq!(matched_ids(html, "a:link"), ["a"]);
    for selector in ["a:hover", "a:visited", "a:active", "a:focus", "a:target", "a:-moz-any-link"] {
        assert!(matched_ids(html, selector).is_empty(), "{selector}");
    }
}

#[test]
fn test_pseudo_elements_never_match() {
    assert!(matched_ids(r#"<p id="a"></p>"#, "p::first-line").is_empty());
}

#[test]
fn test_match_form_pseudo_classes() {
    let html = r#"<input id="a" type="checkbox" checked><input id="b" disabled><select><option id="c" selected></option></select><div id="d" disabled></div>"#;
    assert_eq!(matched_ids(html, ":checked"), ["a", "c"]);
    assert_eq!(matched_ids(html, ":disabled"), ["b"]);
    assert_eq!(matched_ids(html, "input:enabled"), ["a"]);
}

#[test]
fn test_matches_in_tree() {
    let tree = parse(r#"<table><tr><td id="cell"></td></tr></table>"#);
    let cell = by_id(&tree, "cell");
    assert!(parse_selector("table td").unwrap().matches_in_tree(&tree, cell));
    assert!(!parse_selector("table > td").unwrap().matches_in_tree(&tree, cell));
    assert!(!parse_selector("td").unwrap().matches_in_tree(&tree, NodeId::ROOT));
}
