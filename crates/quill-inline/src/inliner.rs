//! The inlining pass: seed, walk the stylesheet, resolve, write.

use std::rc::Rc;

use quill_common::warning::warn_once;
use quill_css::{AtRule, Rule, StyleRule, Stylesheet, parse_selector, parse_stylesheet, select};
use quill_dom::{DomTree, NodeId};

use crate::accumulator::{StyleAccumulator, StyleContribution};
use crate::declaration::Declaration;
use crate::error::InlineError;
use crate::filter::EligibilityFilter;
use crate::options::InlineOptions;
use crate::resolver::resolve;
use crate::specificity::Specificity;
use crate::writer::write;

/// Raw text elements. Their content is not rendered markup, so they neither
/// receive nor keep inlined styles.
const UNSTYLED_ELEMENTS: &[&str] = &["script", "style"];

/// Summary of one inlining pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineReport {
    /// Elements whose `style` attribute was written.
    pub styled_elements: usize,
    /// Selectors left out by the eligibility filter.
    pub skipped_selectors: usize,
    /// Contributions collected over all elements, inline styles included.
    pub contributions: usize,
}

/// Runs inlining passes with a fixed set of options.
#[derive(Debug, Clone)]
pub struct Inliner {
    options: InlineOptions,
    filter: EligibilityFilter,
}

impl Inliner {
    /// Create an inliner.
    #[must_use]
    pub fn new(options: InlineOptions) -> Self {
        let filter = EligibilityFilter::from_options(&options);
        Self { options, filter }
    }

    /// The options this inliner was built with.
    #[must_use]
    pub const fn options(&self) -> &InlineOptions {
        &self.options
    }

    /// Inline `stylesheet` into `tree`.
    ///
    /// 1. Every element's own `style` attribute is seeded as a contribution
    ///    with inline specificity.
    /// 2. The stylesheet is walked once, rule by rule and selector by
    ///    selector. Each eligible selector gets the next origin order and a
    ///    contribution on every element it matches.
    /// 3. Each element with contributions is resolved and written.
    ///
    /// # Errors
    ///
    /// Fails without touching the tree if a `style` attribute is malformed
    /// or a selector cannot be parsed.
    pub fn inline_document(
        &self,
        tree: &mut DomTree,
        stylesheet: &Stylesheet,
    ) -> Result<InlineReport, InlineError> {
        let mut pass = Pass {
            filter: &self.filter,
            flatten_conditional_rules: self.options.flatten_conditional_rules,
            accumulator: StyleAccumulator::new(),
            skipped_selectors: 0,
        };

        for id in tree.descendants(tree.root()) {
            if is_styleable(tree, id) {
                pass.accumulator.seed(tree, id)?;
            }
        }
        pass.walk_rules(tree, &stylesheet.rules)?;

        let mut report = InlineReport {
            styled_elements: 0,
            skipped_selectors: pass.skipped_selectors,
            contributions: pass.accumulator.contribution_count(),
        };
        for (id, contributions) in pass.accumulator.into_elements() {
            if write(tree, id, &resolve(&contributions)) {
                report.styled_elements += 1;
            }
        }
        Ok(report)
    }

    /// Parse `html` and `css`, inline, and serialize the result.
    ///
    /// With `include_style_elements`, the CSS of the document's `<style>`
    /// elements is inlined first, followed by `css`.
    ///
    /// # Errors
    ///
    /// See [`Inliner::inline_document`]; a stylesheet with a malformed
    /// declaration also fails.
    pub fn inline_html(&self, html: &str, css: &str) -> Result<String, InlineError> {
        let mut tree = quill_html::parse(html);

        let mut css_text = String::new();
        if self.options.include_style_elements {
            css_text = quill_css::extract_style_content(&tree);
            if self.options.remove_style_elements {
                remove_style_elements(&mut tree);
            }
        }
        css_text.push_str(css);

        let stylesheet = parse_stylesheet(&css_text)?;
        let _ = self.inline_document(&mut tree, &stylesheet)?;
        Ok(quill_html::serialize(&tree))
    }
}

impl Default for Inliner {
    fn default() -> Self {
        Self::new(InlineOptions::default())
    }
}

/// State of one pass over the stylesheet.
struct Pass<'a> {
    filter: &'a EligibilityFilter,
    flatten_conditional_rules: bool,
    accumulator: StyleAccumulator,
    skipped_selectors: usize,
}

impl Pass<'_> {
    fn walk_rules(&mut self, tree: &DomTree, rules: &[Rule]) -> Result<(), InlineError> {
        for rule in rules {
            match rule {
                Rule::Style(style_rule) => self.apply_style_rule(tree, style_rule)?,
                Rule::At(at_rule) => self.walk_at_rule(tree, at_rule)?,
            }
        }
        Ok(())
    }

    fn walk_at_rule(&mut self, tree: &DomTree, at_rule: &AtRule) -> Result<(), InlineError> {
        match &at_rule.rules {
            Some(nested) if self.flatten_conditional_rules => self.walk_rules(tree, nested),
            Some(_) => {
                warn_once(
                    "Inliner",
                    &format!(
                        "skipping @{} block (conditions are not evaluated)",
                        at_rule.name
                    ),
                );
                Ok(())
            }
            None => {
                warn_once("Inliner", &format!("skipping @{} rule", at_rule.name));
                Ok(())
            }
        }
    }

    /// Selectors of the rule are all parsed before any is matched, so an
    /// invalid one fails the rule as a whole.
    fn apply_style_rule(&mut self, tree: &DomTree, rule: &StyleRule) -> Result<(), InlineError> {
        let selectors = rule
            .selectors
            .iter()
            .map(|selector| parse_selector(&selector.text))
            .collect::<Result<Vec<_>, _>>()?;
        let declarations: Rc<[Declaration]> =
            rule.declarations.iter().map(Declaration::from).collect();

        for selector in &selectors {
            if !self.filter.is_eligible(selector) {
                self.skipped_selectors += 1;
                continue;
            }
            let origin_order = self.accumulator.next_origin_order();
            let specificity = Specificity::from_selector(selector);
            for id in select(selector, tree) {
                if !is_styleable(tree, id) {
                    continue;
                }
                self.accumulator.append(
                    id,
                    StyleContribution::new(Rc::clone(&declarations), specificity, origin_order),
                );
            }
        }
        Ok(())
    }
}

fn is_styleable(tree: &DomTree, id: NodeId) -> bool {
    tree.as_element(id)
        .is_some_and(|element| !UNSTYLED_ELEMENTS.contains(&element.tag_name.as_str()))
}

fn remove_style_elements(tree: &mut DomTree) {
    for id in quill_css::style_elements(tree) {
        if let Some(parent) = tree.parent(id) {
            tree.remove_child(parent, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(html: &str, css: &str) -> (String, InlineReport) {
        let mut tree = quill_html::parse(html);
        let stylesheet = parse_stylesheet(css).unwrap();
        let report = Inliner::default()
            .inline_document(&mut tree, &stylesheet)
            .unwrap();
        (quill_html::serialize(&tree), report)
    }

    #[test]
    fn test_report_counts() {
        let (html, report) = run(
            r#"<p class="a">x</p><p style="margin:0">y</p>"#,
            "p { color: red } a:hover, p::before { color: blue }",
        );
        assert_eq!(
            html,
            r#"<p class="a" style="color:red;">x</p><p style="color:red;margin:0;">y</p>"#
        );
        assert_eq!(
            report,
            InlineReport {
                styled_elements: 2,
                skipped_selectors: 2,
                contributions: 3,
            }
        );
    }

    #[test]
    fn test_raw_text_elements_are_left_alone() {
        let (html, report) = run(
            "<style>p{}</style><script>var a;</script><p>x</p>",
            "* { margin: 0 }",
        );
        assert_eq!(
            html,
            r#"<style>p{}</style><script>var a;</script><p style="margin:0;">x</p>"#
        );
        assert_eq!(report.styled_elements, 1);
    }

    #[test]
    fn test_invalid_selector_leaves_tree_untouched() {
        let mut tree = quill_html::parse(r#"<p style="color: blue">x</p>"#);
        let stylesheet = parse_stylesheet("p { color: red } p:unknown { color: green }").unwrap();
        let result = Inliner::default().inline_document(&mut tree, &stylesheet);

        assert!(matches!(
            result,
            Err(InlineError::UnresolvableSelector { .. })
        ));
        assert_eq!(quill_html::serialize(&tree), r#"<p style="color: blue">x</p>"#);
    }

    #[test]
    fn test_conditional_rules_skipped_unless_flattened() {
        let css = "p { color: red } @media screen { p { color: blue } }";

        let (html, _) = run("<p>x</p>", css);
        assert_eq!(html, r#"<p style="color:red;">x</p>"#);

        let flattening = Inliner::new(InlineOptions {
            flatten_conditional_rules: true,
            ..InlineOptions::default()
        });
        assert_eq!(
            flattening.inline_html("<p>x</p>", css).unwrap(),
            r#"<p style="color:blue;">x</p>"#
        );
    }

    #[test]
    fn test_rule_order_is_origin_order() {
        let (html, _) = run(
            r#"<p class="a b">x</p>"#,
            ".b { color: red } .a { color: blue }",
        );
        assert_eq!(html, r#"<p class="a b" style="color:blue;">x</p>"#);
    }
}
