//! Cascade resolution and `style` attribute inlining.
//!
//! Given an HTML document and a stylesheet, this crate computes for every
//! element the declarations the CSS cascade would apply to it and writes
//! them into the element's `style` attribute, so the document renders the
//! same once the stylesheet is gone (the usual requirement for HTML email).
//!
//! # Pipeline
//!
//! - **Declaration store** ([`declaration`]): property/value pairs with
//!   `!important` split off
//! - **Specificity** ([`specificity`]): selector specificity plus an inline flag
//! - **Eligibility filter** ([`filter`]): keeps pseudo-elements and
//!   state-dependent pseudo-classes out of the cascade
//! - **Accumulator** ([`accumulator`]): per-element contributions in
//!   discovery order
//! - **Resolver** ([`resolver`]): sort by cascade rank, last one wins
//! - **Writer** ([`writer`]): compressed `property:value;` attribute text
//!
//! # Example
//!
//! ```
//! let html = quill_inline::inline(r#"<p class="note">Hi</p>"#, ".note { color: red }")?;
//! assert_eq!(html, r#"<p class="note" style="color:red;">Hi</p>"#);
//! # Ok::<(), quill_inline::InlineError>(())
//! ```
//!
//! # Not Implemented
//!
//! - Media query evaluation (conditional blocks are skipped or flattened)
//! - Cascade layers, custom properties and shorthand expansion

pub mod accumulator;
pub mod declaration;
pub mod error;
pub mod filter;
pub mod inliner;
pub mod options;
pub mod resolver;
pub mod specificity;
pub mod writer;

pub use accumulator::{StyleAccumulator, StyleContribution};
pub use declaration::{Declaration, parse_inline_style};
pub use error::InlineError;
pub use filter::{EligibilityFilter, Ineligibility};
pub use inliner::{InlineReport, Inliner};
pub use options::{DEFAULT_IGNORED_PSEUDO_CLASSES, InlineOptions};
pub use resolver::{CascadeRank, ResolvedDeclaration, ResolvedStyle, resolve};
pub use specificity::Specificity;

/// Inline `css` into `html` with the default options.
///
/// # Errors
///
/// Returns the first malformed declaration or unresolvable selector; no
/// partial output is produced.
pub fn inline(html: &str, css: &str) -> Result<String, InlineError> {
    inline_with_options(html, css, &InlineOptions::default())
}

/// Inline `css` into `html` with the given options.
///
/// # Errors
///
/// See [`inline`].
pub fn inline_with_options(
    html: &str,
    css: &str,
    options: &InlineOptions,
) -> Result<String, InlineError> {
    Inliner::new(options.clone()).inline_html(html, css)
}
