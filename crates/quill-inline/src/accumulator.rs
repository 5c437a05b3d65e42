//! Per-element style contributions collected during one stylesheet walk.

use std::collections::BTreeMap;
use std::rc::Rc;

use quill_dom::{DomTree, ElementData, NodeId};

use crate::declaration::{Declaration, parse_inline_style};
use crate::error::InlineError;
use crate::specificity::Specificity;

/// Origin order of an element's own `style` attribute.
pub const INLINE_ORIGIN: usize = 0;

/// The declarations one source (a rule's selector or a `style` attribute)
/// adds to one element.
///
/// A rule's declaration block is shared by every element its selector
/// matches, hence the `Rc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleContribution {
    /// Declarations in source order.
    pub declarations: Rc<[Declaration]>,
    /// Specificity of the source.
    pub specificity: Specificity,
    /// Position of the source in the walk; 0 for inline style, then 1, 2, ...
    pub origin_order: usize,
}

impl StyleContribution {
    /// Create a contribution.
    #[must_use]
    pub const fn new(
        declarations: Rc<[Declaration]>,
        specificity: Specificity,
        origin_order: usize,
    ) -> Self {
        Self {
            declarations,
            specificity,
            origin_order,
        }
    }
}

/// Contribution lists keyed by element.
///
/// Lives only for one inlining pass: it is filled while the stylesheet is
/// walked and consumed by [`StyleAccumulator::into_elements`]. Contributions
/// are only ever appended, so each list is in discovery order.
#[derive(Debug)]
pub struct StyleAccumulator {
    elements: BTreeMap<NodeId, Vec<StyleContribution>>,
    next_origin: usize,
}

impl StyleAccumulator {
    /// Empty accumulator. The first rule origin handed out is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: BTreeMap::new(),
            next_origin: INLINE_ORIGIN + 1,
        }
    }

    /// Seed one element with its own `style` attribute, if it has one.
    ///
    /// # Errors
    ///
    /// Returns [`InlineError::MalformedDeclaration`] if the attribute text is
    /// not a declaration list.
    pub fn seed(&mut self, tree: &DomTree, id: NodeId) -> Result<(), InlineError> {
        let Some(style) = tree.as_element(id).and_then(ElementData::style) else {
            return Ok(());
        };
        let declarations = parse_inline_style(style)?;
        self.append(
            id,
            StyleContribution::new(declarations.into(), Specificity::INLINE, INLINE_ORIGIN),
        );
        Ok(())
    }

    /// Hand out the origin order for the next selector in the walk.
    pub const fn next_origin_order(&mut self) -> usize {
        let origin = self.next_origin;
        self.next_origin += 1;
        origin
    }

    /// Push a contribution onto an element's list.
    pub fn append(&mut self, id: NodeId, contribution: StyleContribution) {
        self.elements.entry(id).or_default().push(contribution);
    }

    /// The contributions collected so far for `id`.
    #[must_use]
    pub fn contributions(&self, id: NodeId) -> &[StyleContribution] {
        self.elements.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of elements with at least one contribution.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether no element has a contribution.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Total number of contributions over all elements.
    #[must_use]
    pub fn contribution_count(&self) -> usize {
        self.elements.values().map(Vec::len).sum()
    }

    /// Consume the accumulator, yielding each element with its list in
    /// document order.
    pub fn into_elements(self) -> impl Iterator<Item = (NodeId, Vec<StyleContribution>)> {
        self.elements.into_iter()
    }
}

impl Default for StyleAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_element(tree: &DomTree) -> NodeId {
        tree.document_element().unwrap()
    }

    #[test]
    fn test_seed_uses_inline_specificity() {
        let tree = quill_html::parse(r#"<p style="color: blue; margin: 0">x</p>"#);
        let p = first_element(&tree);

        let mut accumulator = StyleAccumulator::new();
        accumulator.seed(&tree, p).unwrap();

        let contributions = accumulator.contributions(p);
        assert_eq!(contributions.len(), 1);
        assert_eq!(contributions[0].specificity, Specificity::INLINE);
        assert_eq!(contributions[0].origin_order, INLINE_ORIGIN);
        assert_eq!(contributions[0].declarations.len(), 2);
    }

    #[test]
    fn test_seed_without_style_adds_nothing() {
        let tree = quill_html::parse("<p>x</p>");
        let mut accumulator = StyleAccumulator::new();
        accumulator.seed(&tree, first_element(&tree)).unwrap();
        assert!(accumulator.is_empty());
    }

    #[test]
    fn test_seed_rejects_malformed_style() {
        let tree = quill_html::parse(r#"<p style="color blue">x</p>"#);
        let mut accumulator = StyleAccumulator::new();
        assert!(matches!(
            accumulator.seed(&tree, first_element(&tree)),
            Err(InlineError::MalformedDeclaration { .. })
        ));
    }

    #[test]
    fn test_origin_orders_increase_from_one() {
        let mut accumulator = StyleAccumulator::new();
        assert_eq!(accumulator.next_origin_order(), 1);
        assert_eq!(accumulator.next_origin_order(), 2);
        assert_eq!(accumulator.next_origin_order(), 3);
    }

    #[test]
    fn test_append_keeps_push_order() {
        let tree = quill_html::parse("<p>x</p>");
        let p = first_element(&tree);
        let declarations: Rc<[Declaration]> = vec![Declaration::new("color", "red")].into();

        let mut accumulator = StyleAccumulator::new();
        for _ in 0..3 {
            let origin = accumulator.next_origin_order();
            accumulator.append(
                p,
                StyleContribution::new(Rc::clone(&declarations), Specificity::default(), origin),
            );
        }

        let origins: Vec<usize> = accumulator
            .contributions(p)
            .iter()
            .map(|contribution| contribution.origin_order)
            .collect();
        assert_eq!(origins, vec![1, 2, 3]);
        assert_eq!(accumulator.contribution_count(), 3);
        assert_eq!(accumulator.into_elements().count(), 1);
    }
}
