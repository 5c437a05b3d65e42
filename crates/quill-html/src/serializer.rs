//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
//!
//! Turns a [`DomTree`] back into markup. Text and attribute values were never
//! decoded, so they are written back as they came in; the only escaping done
//! is for `"` inside attribute values, which are always double-quoted.

use quill_dom::{DomTree, ElementData, NodeId, NodeType};

use crate::parser::VOID_ELEMENTS;

/// Serialize the whole document.
#[must_use]
pub fn serialize(tree: &DomTree) -> String {
    serialize_children(tree, NodeId::ROOT)
}

/// Serialize the children of `id`, the equivalent of `innerHTML`.
#[must_use]
pub fn serialize_children(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    for &child in tree.children(id) {
        serialize_node(tree, child, &mut out);
    }
    out
}

/// Serialize `id` and its subtree, the equivalent of `outerHTML`.
#[must_use]
pub fn serialize_subtree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    serialize_node(tree, id, &mut out);
    out
}

fn serialize_node(tree: &DomTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Document => {
            for &child in tree.children(id) {
                serialize_node(tree, child, out);
            }
        }
        NodeType::Doctype(raw) => {
            out.push('<');
            out.push_str(raw);
            out.push('>');
        }
        NodeType::Comment(data) => {
            out.push_str("<!--");
            out.push_str(data);
            out.push_str("-->");
        }
        NodeType::Text(data) => out.push_str(data),
        NodeType::Element(data) => {
            write_start_tag(data, out);
            if VOID_ELEMENTS.contains(&data.tag_name.as_str()) {
                return;
            }
            for &child in tree.children(id) {
                serialize_node(tree, child, out);
            }
            out.push_str("</");
            out.push_str(&data.tag_name);
            out.push('>');
        }
    }
}

fn write_start_tag(data: &ElementData, out: &mut String) {
    out.push('<');
    out.push_str(&data.tag_name);
    for (name, value) in data.attrs.iter() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attribute_value(value));
        out.push('"');
    }
    out.push('>');
}

/// [§ 13.3](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
///
/// "Replace any occurrences of the `"` character by the string `&quot;`."
#[must_use]
pub fn escape_attribute_value(value: &str) -> String {
    value.replace('"', "&quot;")
}
