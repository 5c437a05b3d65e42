//! Common utilities for the quill CSS inliner.
//!
//! This crate provides shared infrastructure used by every quill component:
//! - **Warning System** - deduplicated, colored diagnostics on stderr

pub mod warning;
