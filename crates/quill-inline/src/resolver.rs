//! The cascade resolver.
//!
//! [CSS Cascading 4 § 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
//!
//! "The cascade takes an unordered list of declared values for a given
//! property on a given element, sorts them by their declaration's
//! precedence as determined below, and outputs a single cascaded value."
//!
//! Resolution is a pure function over one element's contributions: every
//! declaration becomes an entry tagged with a [`CascadeRank`], the entries
//! are stably sorted by rank, and the last entry for each property wins.

use std::collections::HashMap;

use crate::accumulator::StyleContribution;
use crate::declaration::Declaration;
use crate::specificity::Specificity;

/// Sort key of a declaration in the cascade, most significant field first:
/// importance, then specificity (inline flag, ids, classes, types), then
/// origin order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CascadeRank {
    /// [§ 6.4.2](https://www.w3.org/TR/css-cascade-4/#importance)
    pub important: bool,
    /// [§ 6.4.3](https://www.w3.org/TR/css-cascade-4/#cascade-specificity)
    pub specificity: Specificity,
    /// [§ 6.4.4 Order of Appearance](https://www.w3.org/TR/css-cascade-4/#cascade-order)
    /// "The last declaration in document order wins."
    pub origin_order: usize,
}

/// A winning declaration. Importance and rank are resolution-time only and
/// are not carried into the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDeclaration {
    /// Property name.
    pub property: String,
    /// Winning value.
    pub value: String,
}

/// One declaration per property, in the order the properties were first
/// seen among the sorted entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedStyle {
    declarations: Vec<ResolvedDeclaration>,
}

impl ResolvedStyle {
    /// Iterate the winning declarations in output order.
    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedDeclaration> {
        self.declarations.iter()
    }

    /// Number of distinct properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether nothing survived the cascade.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// The winning value of `property`.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|declaration| declaration.property == property)
            .map(|declaration| declaration.value.as_str())
    }
}

impl<'a> IntoIterator for &'a ResolvedStyle {
    type Item = &'a ResolvedDeclaration;
    type IntoIter = std::slice::Iter<'a, ResolvedDeclaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

struct Entry<'a> {
    declaration: &'a Declaration,
    rank: CascadeRank,
}

/// Resolve one element's contributions into its cascaded style.
///
/// An empty input gives an empty style. Origin orders are unique per
/// contribution, so equal ranks only occur inside one declaration block;
/// the sort is stable and keeps those in source order.
#[must_use]
pub fn resolve(contributions: &[StyleContribution]) -> ResolvedStyle {
    let mut entries: Vec<Entry<'_>> = contributions
        .iter()
        .flat_map(|contribution| {
            contribution.declarations.iter().map(|declaration| Entry {
                declaration,
                rank: CascadeRank {
                    important: declaration.important,
                    specificity: contribution.specificity,
                    origin_order: contribution.origin_order,
                },
            })
        })
        .collect();

    entries.sort_by_key(|entry| entry.rank);

    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut declarations: Vec<ResolvedDeclaration> = Vec::new();
    for Entry { declaration, .. } in entries {
        match slots.get(declaration.property.as_str()) {
            Some(&slot) => declaration.value.clone_into(&mut declarations[slot].value),
            None => {
                let _ = slots.insert(&declaration.property, declarations.len());
                declarations.push(ResolvedDeclaration {
                    property: declaration.property.clone(),
                    value: declaration.value.clone(),
                });
            }
        }
    }

    ResolvedStyle { declarations }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    fn contribution(
        declarations: &[(&str, &str)],
        specificity: Specificity,
        origin_order: usize,
    ) -> StyleContribution {
        let declarations: Rc<[Declaration]> = declarations
            .iter()
            .map(|(property, value)| Declaration::new(*property, value))
            .collect();
        StyleContribution::new(declarations, specificity, origin_order)
    }

    fn pairs(style: &ResolvedStyle) -> Vec<(&str, &str)> {
        style
            .iter()
            .map(|d| (d.property.as_str(), d.value.as_str()))
            .collect()
    }

    const CLASS: Specificity = Specificity::new(0, 0, 1, 0);
    const ID: Specificity = Specificity::new(0, 1, 0, 0);
    const TYPE: Specificity = Specificity::new(0, 0, 0, 1);

    #[test]
    fn test_empty_contributions() {
        assert!(resolve(&[]).is_empty());
    }

    #[test]
    fn test_inline_beats_class() {
        let style = resolve(&[
            contribution(&[("color", "blue")], Specificity::INLINE, 0),
            contribution(&[("color", "red")], CLASS, 1),
        ]);
        assert_eq!(pairs(&style), vec![("color", "blue")]);
    }

    #[test]
    fn test_important_beats_inline() {
        let style = resolve(&[
            contribution(&[("color", "blue")], Specificity::INLINE, 0),
            contribution(&[("color", "red !important")], TYPE, 1),
        ]);
        assert_eq!(style.get("color"), Some("red"));
    }

    #[test]
    fn test_important_inline_beats_important_rule() {
        let style = resolve(&[
            contribution(&[("color", "blue !important")], Specificity::INLINE, 0),
            contribution(&[("color", "red !important")], ID, 1),
        ]);
        assert_eq!(style.get("color"), Some("blue"));
    }

    #[test]
    fn test_later_origin_wins_on_equal_specificity() {
        let style = resolve(&[
            contribution(&[("color", "red")], CLASS, 1),
            contribution(&[("color", "green")], CLASS, 2),
        ]);
        assert_eq!(style.get("color"), Some("green"));
    }

    #[test]
    fn test_specificity_beats_origin() {
        let style = resolve(&[
            contribution(&[("color", "blue")], ID, 1),
            contribution(&[("color", "red")], CLASS, 2),
        ]);
        assert_eq!(style.get("color"), Some("blue"));
    }

    #[test]
    fn test_duplicate_property_in_one_block() {
        let style = resolve(&[contribution(
            &[("color", "red"), ("color", "blue")],
            TYPE,
            1,
        )]);
        assert_eq!(pairs(&style), vec![("color", "blue")]);
    }

    #[test]
    fn test_output_order_is_first_seen_in_rank_order() {
        // The lower-ranked rule is visited first, so its properties take the
        // first slots even when the inline value wins.
        let style = resolve(&[
            contribution(&[("margin", "0"), ("color", "blue")], Specificity::INLINE, 0),
            contribution(&[("color", "red"), ("padding", "4px")], CLASS, 1),
        ]);
        assert_eq!(
            pairs(&style),
            vec![("color", "blue"), ("padding", "4px"), ("margin", "0")]
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let contributions = [
            contribution(&[("a", "1"), ("b", "2")], TYPE, 2),
            contribution(&[("b", "3 !important"), ("c", "4")], CLASS, 1),
        ];
        assert_eq!(resolve(&contributions), resolve(&contributions));
    }
}
