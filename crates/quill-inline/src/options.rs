//! Inliner configuration.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Pseudo-classes describing interaction or history state. Rules using them
/// cannot be baked into a static `style` attribute.
pub const DEFAULT_IGNORED_PSEUDO_CLASSES: [&str; 5] = ["hover", "active", "focus", "visited", "link"];

/// Options for an inlining pass.
///
/// Every field has a default, so a JSON configuration only needs to name
/// the fields it changes:
///
/// ```json
/// { "include_style_elements": true, "remove_style_elements": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InlineOptions {
    /// Selectors using any of these pseudo-classes (lowercase, no colon)
    /// never contribute styles.
    pub ignored_pseudo_classes: BTreeSet<String>,

    /// Also inline the CSS found in the document's `<style>` elements. It is
    /// processed before the stylesheet passed in by the caller.
    pub include_style_elements: bool,

    /// Remove the `<style>` elements whose CSS was inlined. Only takes effect
    /// together with `include_style_elements`.
    pub remove_style_elements: bool,

    /// Walk style rules nested in `@media`, `@supports` and `@document` as if
    /// they were top-level. Otherwise such blocks are skipped with a warning.
    pub flatten_conditional_rules: bool,
}

impl Default for InlineOptions {
    fn default() -> Self {
        Self {
            ignored_pseudo_classes: DEFAULT_IGNORED_PSEUDO_CLASSES
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            include_style_elements: false,
            remove_style_elements: false,
            flatten_conditional_rules: false,
        }
    }
}

impl InlineOptions {
    /// Add a pseudo-class to the ignore set. A leading colon is dropped and
    /// the name is lowercased.
    #[must_use]
    pub fn ignore_pseudo_class(mut self, name: &str) -> Self {
        let name = name.trim_start_matches(':').to_ascii_lowercase();
        let _ = self.ignored_pseudo_classes.insert(name);
        self
    }
}
