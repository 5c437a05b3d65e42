//! Integration tests for the HTML tree builder and serializer.

use quill_dom::{DomTree, NodeId, NodeType};
use quill_html::{dump_tree, parse, parse_with_issues, serialize, serialize_subtree};

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if let Some(data) = tree.as_element(from)
        && data.tag_name == tag
    {
        return Some(from);
    }
    for &child_id in tree.children(from) {
        if let Some(found) = find_element(tree, child_id, tag) {
            return Some(found);
        }
    }
    None
}

/// Helper to list the tag names of an element's element children
fn child_tags(tree: &DomTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .iter()
        .filter_map(|&child| tree.as_element(child))
        .map(|data| data.tag_name.clone())
        .collect()
}

fn round_trip(html: &str) -> String {
    serialize(&parse(html))
}

// ========== round trips ==========

#[test]
fn test_empty_span_round_trips() {
    assert_eq!(round_trip("<span></span>"), "<span></span>");
}

#[test]
fn test_full_document_round_trips_byte_for_byte() {
    let html = "<!DOCTYPE html>\n<html><head><title>T &amp; U</title></head>\
                <body><!-- note --><p class=\"x\">Hi&nbsp;there</p>\n</body></html>";
    assert_eq!(round_trip(html), html);
}

#[test]
fn test_script_and_style_round_trip() {
    let html = "<style>a > b { color: red }</style><script>if (a < b) {}</script>";
    assert_eq!(round_trip(html), html);
}

#[test]
fn test_unclosed_elements_are_closed_on_output() {
    assert_eq!(round_trip("<div><span>x"), "<div><span>x</span></div>");
}

#[test]
fn test_names_are_lowercased() {
    assert_eq!(round_trip("<DIV ID=\"a\">x</DIV>"), "<div id=\"a\">x</div>");
}

#[test]
fn test_attribute_quotes_are_normalized() {
    assert_eq!(
        round_trip("<a title='say \"hi\"' href=x>y</a>"),
        "<a title=\"say &quot;hi&quot;\" href=\"x\">y</a>"
    );
}

#[test]
fn test_boolean_attribute_gets_empty_value() {
    assert_eq!(round_trip("<input disabled>"), "<input disabled=\"\">");
}

// ========== structure ==========

#[test]
fn test_nothing_is_synthesized() {
    let tree = parse("<p>x</p>");
    assert_eq!(child_tags(&tree, NodeId::ROOT), vec!["p"]);
    assert!(find_element(&tree, NodeId::ROOT, "body").is_none());
}

#[test]
fn test_void_elements_take_no_children() {
    let tree = parse("<div><img src=\"a.png\"><span>x</span></div>");
    let div = find_element(&tree, NodeId::ROOT, "div").expect("div");
    assert_eq!(child_tags(&tree, div), vec!["img", "span"]);
    assert_eq!(
        serialize(&tree),
        "<div><img src=\"a.png\"><span>x</span></div>"
    );
}

#[test]
fn test_self_closing_closes_any_element() {
    let tree = parse("<div/><span></span><br/>");
    assert_eq!(child_tags(&tree, NodeId::ROOT), vec!["div", "span", "br"]);
    assert_eq!(serialize(&tree), "<div></div><span></span><br>");
}

#[test]
fn test_paragraph_closed_by_block_start_tag() {
    let tree = parse("<p>one<p>two<div>three</div>");
    assert_eq!(child_tags(&tree, NodeId::ROOT), vec!["p", "p", "div"]);
    assert_eq!(serialize(&tree), "<p>one</p><p>two</p><div>three</div>");
}

#[test]
fn test_list_items_close_each_other() {
    let tree = parse("<ul><li>a<li>b<ul><li>c</ul></ul>");
    let ul = find_element(&tree, NodeId::ROOT, "ul").expect("ul");
    assert_eq!(child_tags(&tree, ul), vec!["li", "li"]);
}

#[test]
fn test_table_rows_and_cells() {
    let tree = parse("<table><tr><td>1<td>2<tr><td>3</table>");
    let table = find_element(&tree, NodeId::ROOT, "table").expect("table");
    assert_eq!(child_tags(&tree, table), vec!["tr", "tr"]);
    let first_row = tree.children(table)[0];
    assert_eq!(child_tags(&tree, first_row), vec!["td", "td"]);
}

#[test]
fn test_adjacent_text_is_merged() {
    let tree = parse("<div>a</span>b</div>");
    let div = find_element(&tree, NodeId::ROOT, "div").expect("div");
    assert_eq!(tree.children(div).len(), 1);
    assert_eq!(tree.as_text(tree.children(div)[0]), Some("ab"));
}

#[test]
fn test_unmatched_end_tag_is_reported() {
    let (tree, issues) = parse_with_issues("<div></span>text</div>");
    assert_eq!(issues.len(), 1);
    assert!(issues[0].message.contains("</span>"));
    let div = find_element(&tree, NodeId::ROOT, "div").expect("div");
    assert_eq!(serialize_subtree(&tree, div), "<div>text</div>");
}

#[test]
fn test_doctype_and_comment_nodes() {
    let tree = parse("<!doctype html><!--x-->");
    let kinds: Vec<&NodeType> = tree
        .children(NodeId::ROOT)
        .iter()
        .filter_map(|&id| tree.get(id))
        .map(|node| &node.node_type)
        .collect();
    assert_eq!(
        kinds,
        vec![
            &NodeType::Doctype("!doctype html".to_string()),
            &NodeType::Comment("x".to_string())
        ]
    );
}

#[test]
fn test_dump_tree_outline() {
    let tree = parse("<p class=\"a\">hi there</p>");
    let dump = dump_tree(&tree, NodeId::ROOT);
    assert_eq!(dump, "Document\n  <p class=\"a\">\n    \"hi\u{00B7}there\"\n");
}
