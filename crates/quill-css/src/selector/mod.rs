//! CSS Selector parsing and matching
//!
//! This module implements selector parsing and matching per
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/), restricted to what
//! can be decided against a static document.

mod parser;

use quill_dom::{DomTree, ElementData, NodeId, NodeType};
use strum_macros::{EnumString, IntoStaticStr};

pub use parser::parse_selector;

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// "A type selector is the name of a document language element type,
    /// and represents an instance of that element type in the document tree."
    ///
    /// Examples: `div`, `p`, `span`, `body`, `h1`
    Type(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    /// "The universal selector is a single asterisk (*) and represents the
    /// qualified name of any element type."
    Universal,

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    /// "The class selector is given as a full stop (. U+002E) immediately
    /// followed by an identifier."
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    /// "An ID selector is a hash (#, U+0023) immediately followed by the
    /// ID value, which is an identifier."
    Id(String),

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Examples: `[href]`, `[type=text]`, `[class~=active]`, `[lang|=en]`,
    /// `[href^=https]`, `[src$=".png"]`, `[data-theme*=dark i]`
    Attribute(AttributeSelector),

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    PseudoClass(PseudoClass),

    /// [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    ///
    /// Stored by lowercased name. Pseudo-elements have no backing element, so
    /// a compound containing one never matches.
    ///
    /// Examples: `::before`, `::after`, `::placeholder`, legacy `:first-line`
    PseudoElement(String),
}

/// Pseudo-class names understood by the selector parser.
///
/// Parsed ASCII case-insensitively from their CSS spelling (`first-child`,
/// `nth-last-of-type`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum PseudoClassName {
    Root,
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    Empty,
    NthChild,
    NthLastChild,
    NthOfType,
    NthLastOfType,
    Not,
    Link,
    Visited,
    Hover,
    Active,
    Focus,
    FocusWithin,
    FocusVisible,
    Target,
    Checked,
    Disabled,
    Enabled,
}

impl PseudoClassName {
    /// Whether the pseudo-class takes an argument in parentheses.
    #[must_use]
    pub const fn is_functional(self) -> bool {
        matches!(
            self,
            Self::NthChild | Self::NthLastChild | Self::NthOfType | Self::NthLastOfType | Self::Not
        )
    }
}

/// [§ 14.1 An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
///
/// "represents an index in a list ... the An+B notation defines an integer step
/// (A) and offset (B), and represents the An+Bth elements in a list, for every
/// positive integer or zero value of n"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nth {
    /// Step.
    pub a: i32,
    /// Offset.
    pub b: i32,
}

impl Nth {
    /// Whether the 1-based `position` is selected.
    #[must_use]
    pub fn matches(self, position: usize) -> bool {
        let Ok(position) = i64::try_from(position) else {
            return false;
        };
        let (a, b) = (i64::from(self.a), i64::from(self.b));
        if a == 0 {
            return position == b;
        }
        let offset = position - b;
        offset % a == 0 && offset / a >= 0
    }
}

/// Pseudo-classes per [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    /// [§ 4.4 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    /// "The :root pseudo-class represents an element that is the root of the document."
    Root,
    /// [§ 4.12 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
    FirstChild,
    /// [§ 4.12 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
    LastChild,
    /// [§ 4.12 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
    OnlyChild,
    /// [§ 4.11 :first-of-type](https://www.w3.org/TR/selectors-4/#the-first-of-type-pseudo)
    FirstOfType,
    /// [§ 4.11 :last-of-type](https://www.w3.org/TR/selectors-4/#the-last-of-type-pseudo)
    LastOfType,
    /// [§ 4.11 :only-of-type](https://www.w3.org/TR/selectors-4/#the-only-of-type-pseudo)
    OnlyOfType,
    /// [§ 4.5 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    Empty,
    /// [§ 4.13 :nth-child()](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
    NthChild(Nth),
    /// [§ 4.13 :nth-last-child()](https://www.w3.org/TR/selectors-4/#the-nth-last-child-pseudo)
    NthLastChild(Nth),
    /// [§ 4.11 :nth-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-of-type-pseudo)
    NthOfType(Nth),
    /// [§ 4.11 :nth-last-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-last-of-type-pseudo)
    NthLastOfType(Nth),
    /// [§ 4.3 :not()](https://www.w3.org/TR/selectors-4/#negation)
    /// "The negation pseudo-class, :not(), is a functional pseudo-class taking a
    /// selector list as an argument. It represents an element that is not
    /// represented by its argument."
    Not(Vec<ComplexSelector>),
    /// [§ 4.6 :link](https://www.w3.org/TR/selectors-4/#the-link-pseudo)
    /// In a static document, all links are treated as unvisited.
    Link,
    /// [§ 4.6 :visited](https://www.w3.org/TR/selectors-4/#the-visited-pseudo)
    Visited,
    /// [§ 4.9 :hover](https://www.w3.org/TR/selectors-4/#the-hover-pseudo)
    Hover,
    /// [§ 4.9 :active](https://www.w3.org/TR/selectors-4/#the-active-pseudo)
    Active,
    /// [§ 4.9 :focus](https://www.w3.org/TR/selectors-4/#the-focus-pseudo)
    Focus,
    /// [§ 4.9 :focus-within](https://www.w3.org/TR/selectors-4/#the-focus-within-pseudo)
    FocusWithin,
    /// [§ 4.9 :focus-visible](https://www.w3.org/TR/selectors-4/#the-focus-visible-pseudo)
    FocusVisible,
    /// [§ 4.7 :target](https://www.w3.org/TR/selectors-4/#the-target-pseudo)
    Target,
    /// [§ 4.15 :checked](https://www.w3.org/TR/selectors-4/#checked)
    Checked,
    /// [§ 4.15 :disabled](https://www.w3.org/TR/selectors-4/#disabled-pseudo)
    Disabled,
    /// [§ 4.15 :enabled](https://www.w3.org/TR/selectors-4/#enabled-pseudo)
    Enabled,
    /// A vendor-prefixed pseudo-class such as `:-moz-focusring`. Never matches.
    Vendor(String),
}

impl PseudoClass {
    /// The pseudo-class name as written in CSS, lowercased and without the colon.
    #[must_use]
    pub fn name(&self) -> &str {
        let name = match self {
            Self::Vendor(name) => return name,
            Self::Root => PseudoClassName::Root,
            Self::FirstChild => PseudoClassName::FirstChild,
            Self::LastChild => PseudoClassName::LastChild,
            Self::OnlyChild => PseudoClassName::OnlyChild,
            Self::FirstOfType => PseudoClassName::FirstOfType,
            Self::LastOfType => PseudoClassName::LastOfType,
            Self::OnlyOfType => PseudoClassName::OnlyOfType,
            Self::Empty => PseudoClassName::Empty,
            Self::NthChild(_) => PseudoClassName::NthChild,
            Self::NthLastChild(_) => PseudoClassName::NthLastChild,
            Self::NthOfType(_) => PseudoClassName::NthOfType,
            Self::NthLastOfType(_) => PseudoClassName::NthLastOfType,
            Self::Not(_) => PseudoClassName::Not,
            Self::Link => PseudoClassName::Link,
            Self::Visited => PseudoClassName::Visited,
            Self::Hover => PseudoClassName::Hover,
            Self::Active => PseudoClassName::Active,
            Self::Focus => PseudoClassName::Focus,
            Self::FocusWithin => PseudoClassName::FocusWithin,
            Self::FocusVisible => PseudoClassName::FocusVisible,
            Self::Target => PseudoClassName::Target,
            Self::Checked => PseudoClassName::Checked,
            Self::Disabled => PseudoClassName::Disabled,
            Self::Enabled => PseudoClassName::Enabled,
        };
        name.into()
    }
}

/// The operator of an attribute selector, per
/// [§ 6.1](https://www.w3.org/TR/selectors-4/#attribute-representation) and
/// [§ 6.2](https://www.w3.org/TR/selectors-4/#attribute-substrings).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    /// `[attr]` "Represents an element with the att attribute"
    Exists,
    /// `[attr=val]` "whose value is exactly 'val'"
    Equals,
    /// `[attr~=val]` "a whitespace-separated list of words, one of which is exactly 'val'"
    Includes,
    /// `[attr|=val]` "either being exactly 'val' or beginning with 'val' immediately followed by '-'"
    DashMatch,
    /// `[attr^=val]` "begins with the prefix 'val'"
    PrefixMatch,
    /// `[attr$=val]` "ends with the suffix 'val'"
    SuffixMatch,
    /// `[attr*=val]` "contains at least one instance of the substring 'val'"
    SubstringMatch,
}

/// Attribute selectors per [§ 6.4](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    /// Attribute name, lowercased.
    pub name: String,
    /// How the value is compared.
    pub operator: AttributeOperator,
    /// Value to compare against (empty for [`AttributeOperator::Exists`]).
    pub value: String,
    /// [§ 6.3](https://www.w3.org/TR/selectors-4/#attribute-case) the `i` flag.
    pub case_insensitive: bool,
}

impl AttributeSelector {
    fn matches(&self, element: &ElementData) -> bool {
        let Some(actual) = element.attrs.get(&self.name) else {
            return false;
        };
        if self.operator == AttributeOperator::Exists {
            return true;
        }

        let (actual, expected) = if self.case_insensitive {
            (actual.to_ascii_lowercase(), self.value.to_ascii_lowercase())
        } else {
            (actual.to_string(), self.value.clone())
        };

        match self.operator {
            AttributeOperator::Exists => true,
            AttributeOperator::Equals => actual == expected,
            // "If 'val' contains whitespace, it will never represent anything
            // (since the words are separated by spaces). Also if 'val' is the
            // empty string, it will never represent anything."
            AttributeOperator::Includes => {
                !expected.is_empty()
                    && !expected.contains(char::is_whitespace)
                    && actual.split_ascii_whitespace().any(|word| word == expected)
            }
            AttributeOperator::DashMatch => {
                actual == expected
                    || actual
                        .strip_prefix(expected.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            // "If 'val' is the empty string then the selector does not represent anything."
            AttributeOperator::PrefixMatch => {
                !expected.is_empty() && actual.starts_with(expected.as_str())
            }
            AttributeOperator::SuffixMatch => {
                !expected.is_empty() && actual.ends_with(expected.as_str())
            }
            AttributeOperator::SubstringMatch => {
                !expected.is_empty() && actual.contains(expected.as_str())
            }
        }
    }
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    /// The list of simple selectors that make up this compound selector.
    pub simple_selectors: Vec<SimpleSelector>,
}

impl CompoundSelector {
    /// Pseudo-element names in this compound.
    pub fn pseudo_elements(&self) -> impl Iterator<Item = &str> {
        self.simple_selectors.iter().filter_map(|simple| match simple {
            SimpleSelector::PseudoElement(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Pseudo-classes written directly in this compound (not inside `:not()`).
    pub fn pseudo_classes(&self) -> impl Iterator<Item = &PseudoClass> {
        self.simple_selectors.iter().filter_map(|simple| match simple {
            SimpleSelector::PseudoClass(pseudo) => Some(pseudo),
            _ => None,
        })
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    Descendant,

    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A selector of the form 'A > B' represents an element B that is
    /// a direct child of element A."
    Child,

    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// "A selector of the form 'A + B' represents an element B that
    /// immediately follows element A, where A and B share the same parent."
    NextSibling,

    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// "A selector of the form 'A ~ B' represents an element B that
    /// follows element A (not necessarily immediately), where A and B share the
    /// same parent."
    SubsequentSibling,
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// "A complex selector is a chain of one or more compound selectors separated
/// by combinators."
///
/// Example: `div.container > ul.nav li a.active`
/// This would be parsed as:
/// ```text
/// [div.container] --(Child)--> [ul.nav] --(Descendant)--> [li] --(Descendant)--> [a.active]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// The rightmost compound selector (the subject of the selector).
    pub subject: CompoundSelector,

    /// Chain of (combinator, `compound_selector`) pairs going left from the subject.
    ///
    /// For `A > B C`, this would be:
    /// - subject: C
    /// - combinators: [(Descendant, B), (Child, A)]
    pub combinators: Vec<(Combinator, CompoundSelector)>,
}

impl ComplexSelector {
    /// Every compound in the chain, subject first.
    pub fn compounds(&self) -> impl Iterator<Item = &CompoundSelector> {
        core::iter::once(&self.subject).chain(self.combinators.iter().map(|(_, c)| c))
    }

    /// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// Sum of the specificity of every compound in the chain.
    #[must_use]
    pub fn calculate_specificity(&self) -> Specificity {
        self.compounds()
            .map(calculate_compound_specificity)
            .fold(Specificity::default(), Specificity::combine)
    }

    /// Match against `node_id`, trying every candidate for each combinator so
    /// that an early partial match cannot hide a later full one.
    #[must_use]
    pub fn matches_in_tree(&self, tree: &DomTree, node_id: NodeId) -> bool {
        compound_matches_in_tree(&self.subject, tree, node_id)
            && matches_combinators(&self.combinators, tree, node_id)
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// `chain` is in right-to-left order; `current_id` already matched the
/// compound to the right of `chain[0]`.
fn matches_combinators(
    chain: &[(Combinator, CompoundSelector)],
    tree: &DomTree,
    current_id: NodeId,
) -> bool {
    let Some(((combinator, compound), rest)) = chain.split_first() else {
        return true;
    };
    let candidate = |id: NodeId| {
        compound_matches_in_tree(compound, tree, id) && matches_combinators(rest, tree, id)
    };

    match combinator {
        Combinator::Descendant => tree.ancestors(current_id).any(candidate),
        Combinator::Child => tree.parent(current_id).is_some_and(candidate),
        Combinator::NextSibling => {
            find_previous_element_sibling(tree, current_id).is_some_and(candidate)
        }
        Combinator::SubsequentSibling => tree
            .preceding_siblings(current_id)
            .filter(|&id| tree.as_element(id).is_some())
            .any(candidate),
    }
}

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
/// "A selector's specificity is calculated for a given element as follows:
///  - count the number of ID selectors in the selector (= A)
///  - count the number of class selectors, attributes selectors, and pseudo-classes in the selector (= B)
///  - count the number of type selectors and pseudo-elements in the selector (= C)
///
/// Specificities are compared by comparing the three components in order."
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Create a new specificity with (A, B, C) components.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }

    #[must_use]
    const fn combine(self, other: Self) -> Self {
        Self(self.0 + other.0, self.1 + other.1, self.2 + other.2)
    }
}

/// Calculate specificity for a single compound selector.
fn calculate_compound_specificity(compound: &CompoundSelector) -> Specificity {
    let mut spec = Specificity::default();

    for simple in &compound.simple_selectors {
        match simple {
            // "count the number of ID selectors in the selector (= A)"
            SimpleSelector::Id(_) => spec.0 += 1,

            // "The specificity of an :is(), :not(), or :has() pseudo-class is
            // replaced by the specificity of the most specific complex selector
            // in its selector list argument."
            SimpleSelector::PseudoClass(PseudoClass::Not(list)) => {
                let most_specific = list
                    .iter()
                    .map(ComplexSelector::calculate_specificity)
                    .max()
                    .unwrap_or_default();
                spec = spec.combine(most_specific);
            }

            // "count the number of class selectors, attributes selectors,
            // and pseudo-classes in the selector (= B)"
            SimpleSelector::Class(_)
            | SimpleSelector::PseudoClass(_)
            | SimpleSelector::Attribute(_) => spec.1 += 1,

            // "count the number of type selectors and pseudo-elements
            // in the selector (= C)"
            SimpleSelector::Type(_) | SimpleSelector::PseudoElement(_) => spec.2 += 1,

            // "ignore the universal selector"
            SimpleSelector::Universal => {}
        }
    }

    spec
}

/// A parsed CSS selector ready for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSelector {
    /// The complex selector (compound selectors with combinators).
    pub complex: ComplexSelector,
    /// The specificity of this selector.
    pub specificity: Specificity,
}

impl ParsedSelector {
    /// Check if this is a simple selector (no combinators).
    #[must_use]
    pub const fn is_simple(&self) -> bool {
        self.complex.combinators.is_empty()
    }

    /// Pseudo-element names appearing in any compound of the chain.
    pub fn pseudo_elements(&self) -> impl Iterator<Item = &str> {
        self.complex
            .compounds()
            .flat_map(CompoundSelector::pseudo_elements)
    }

    /// Names of the pseudo-classes written directly in any compound of the
    /// chain. Pseudo-classes nested in a `:not()` argument are not included.
    pub fn pseudo_class_names(&self) -> impl Iterator<Item = &str> {
        self.complex
            .compounds()
            .flat_map(CompoundSelector::pseudo_classes)
            .map(PseudoClass::name)
    }

    /// [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    /// "A selector is said to match an element when..."
    ///
    /// Match a selector against an element with full DOM tree context.
    #[must_use]
    pub fn matches_in_tree(&self, tree: &DomTree, node_id: NodeId) -> bool {
        self.complex.matches_in_tree(tree, node_id)
    }
}

/// Every element below the document root matched by `selector`, in tree order.
#[must_use]
pub fn select(selector: &ParsedSelector, tree: &DomTree) -> Vec<NodeId> {
    tree.descendants(NodeId::ROOT)
        .filter(|&id| selector.matches_in_tree(tree, id))
        .collect()
}

/// Check if a compound selector matches an element, with tree context
/// for structural pseudo-class matching.
fn compound_matches_in_tree(compound: &CompoundSelector, tree: &DomTree, node_id: NodeId) -> bool {
    let Some(element) = tree.as_element(node_id) else {
        return false;
    };
    compound.simple_selectors.iter().all(|simple| match simple {
        SimpleSelector::PseudoClass(pc) => pseudo_class_matches(pc, tree, node_id, element),
        _ => simple.matches(element),
    })
}

impl SimpleSelector {
    /// Check if this simple selector matches the given element on its own.
    /// Pseudo-classes need tree context and report `false` here.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            // [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
            Self::Type(name) => element.tag_name.eq_ignore_ascii_case(name),
            // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
            Self::Class(class_name) => element.classes().contains(class_name.as_str()),
            // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Universal => true,
            Self::Attribute(attribute) => attribute.matches(element),
            Self::PseudoClass(_) | Self::PseudoElement(_) => false,
        }
    }
}

/// Elements that can be disabled.
///
/// [§ 4.16.2 Enabling and disabling form controls](https://html.spec.whatwg.org/multipage/semantics-other.html#concept-element-disabled)
const FORM_ELEMENTS: &[&str] = &[
    "button", "input", "select", "textarea", "optgroup", "option", "fieldset",
];

/// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
///
/// Match a pseudo-class against an element with full DOM tree context.
fn pseudo_class_matches(
    pc: &PseudoClass,
    tree: &DomTree,
    node_id: NodeId,
    element: &ElementData,
) -> bool {
    let same_type = |id: NodeId| {
        tree.as_element(id)
            .is_some_and(|e| e.tag_name.eq_ignore_ascii_case(&element.tag_name))
    };
    let is_element = |id: NodeId| tree.as_element(id).is_some();

    match pc {
        // "In HTML, this is the <html> element."
        PseudoClass::Root => tree.document_element() == Some(node_id),

        PseudoClass::FirstChild => tree.preceding_siblings(node_id).all(|id| !is_element(id)),
        PseudoClass::LastChild => tree.following_siblings(node_id).all(|id| !is_element(id)),
        PseudoClass::OnlyChild => {
            tree.preceding_siblings(node_id).all(|id| !is_element(id))
                && tree.following_siblings(node_id).all(|id| !is_element(id))
        }
        PseudoClass::FirstOfType => tree.preceding_siblings(node_id).all(|id| !same_type(id)),
        PseudoClass::LastOfType => tree.following_siblings(node_id).all(|id| !same_type(id)),
        PseudoClass::OnlyOfType => {
            tree.preceding_siblings(node_id).all(|id| !same_type(id))
                && tree.following_siblings(node_id).all(|id| !same_type(id))
        }

        PseudoClass::NthChild(nth) => {
            nth.matches(tree.preceding_siblings(node_id).filter(|&id| is_element(id)).count() + 1)
        }
        PseudoClass::NthLastChild(nth) => {
            nth.matches(tree.following_siblings(node_id).filter(|&id| is_element(id)).count() + 1)
        }
        PseudoClass::NthOfType(nth) => {
            nth.matches(tree.preceding_siblings(node_id).filter(|&id| same_type(id)).count() + 1)
        }
        PseudoClass::NthLastOfType(nth) => {
            nth.matches(tree.following_siblings(node_id).filter(|&id| same_type(id)).count() + 1)
        }

        // [§ 4.5 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
        // "The :empty pseudo-class represents an element that has no children
        // except, optionally, document white space characters."
        PseudoClass::Empty => {
            tree.children(node_id)
                .iter()
                .all(|&c| match tree.get(c).map(|n| &n.node_type) {
                    Some(NodeType::Text(t)) => t.trim().is_empty(),
                    Some(NodeType::Comment(_)) => true,
                    _ => false,
                })
        }

        PseudoClass::Not(list) => !list
            .iter()
            .any(|complex| complex.matches_in_tree(tree, node_id)),

        // In static rendering, all links are unvisited, so :link matches any
        // <a> or <area> element with an href attribute.
        PseudoClass::Link => {
            matches!(element.tag_name.as_str(), "a" | "area") && element.attrs.contains("href")
        }

        PseudoClass::Checked => match element.tag_name.as_str() {
            "input" => {
                element.attrs.contains("checked")
                    && element.attrs.get("type").is_some_and(|t| {
                        t.eq_ignore_ascii_case("checkbox") || t.eq_ignore_ascii_case("radio")
                    })
            }
            "option" => element.attrs.contains("selected"),
            _ => false,
        },

        PseudoClass::Disabled => {
            FORM_ELEMENTS.contains(&element.tag_name.as_str()) && element.attrs.contains("disabled")
        }
        PseudoClass::Enabled => {
            FORM_ELEMENTS.contains(&element.tag_name.as_str())
                && !element.attrs.contains("disabled")
        }

        // User interaction and navigation state do not exist in a static document.
        PseudoClass::Visited
        | PseudoClass::Hover
        | PseudoClass::Active
        | PseudoClass::Focus
        | PseudoClass::FocusWithin
        | PseudoClass::FocusVisible
        | PseudoClass::Target
        | PseudoClass::Vendor(_) => false,
    }
}

/// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
///
/// Find the immediately preceding element sibling (skipping text/comment nodes).
fn find_previous_element_sibling(tree: &DomTree, node_id: NodeId) -> Option<NodeId> {
    tree.preceding_siblings(node_id)
        .find(|&sibling_id| tree.as_element(sibling_id).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nth_formula() {
        let odd = Nth { a: 2, b: 1 };
        assert!(odd.matches(1));
        assert!(!odd.matches(2));
        assert!(odd.matches(3));

        let first_three = Nth { a: -1, b: 3 };
        assert!(first_three.matches(1));
        assert!(first_three.matches(3));
        assert!(!first_three.matches(4));

        let third = Nth { a: 0, b: 3 };
        assert!(third.matches(3));
        assert!(!third.matches(6));
    }

    #[test]
    fn test_pseudo_class_name_lookup() {
        assert_eq!(
            "NTH-last-of-TYPE".parse::<PseudoClassName>(),
            Ok(PseudoClassName::NthLastOfType)
        );
        assert!("bogus".parse::<PseudoClassName>().is_err());
        assert_eq!(PseudoClass::FocusWithin.name(), "focus-within");
    }
}
