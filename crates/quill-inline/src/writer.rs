//! Writes a resolved style back onto its element.

use quill_dom::{DomTree, NodeId};

use crate::resolver::ResolvedStyle;

/// Compressed `property:value;` text for a `style` attribute, or `None`
/// when nothing is left to write.
#[must_use]
pub fn style_attribute_value(resolved: &ResolvedStyle) -> Option<String> {
    if resolved.is_empty() {
        return None;
    }
    let mut text = String::new();
    for declaration in resolved {
        text.push_str(&declaration.property);
        text.push(':');
        text.push_str(&escape_value(&declaration.value));
        text.push(';');
    }
    Some(text)
}

/// Replace double quotes with single quotes so the value can sit inside a
/// double-quoted attribute. Other markup characters are the serializer's
/// concern.
#[must_use]
pub fn escape_value(value: &str) -> String {
    value.replace('"', "'")
}

/// Replace the `style` attribute of `id` with `resolved`. Returns whether
/// the element was written; an empty style leaves it untouched.
pub fn write(tree: &mut DomTree, id: NodeId, resolved: &ResolvedStyle) -> bool {
    let Some(value) = style_attribute_value(resolved) else {
        return false;
    };
    let Some(element) = tree.as_element_mut(id) else {
        return false;
    };
    element.attrs.set("style", value);
    true
}
