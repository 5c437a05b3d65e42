//! Inliner warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the HTML, CSS, and inlining components to report input they
//! accept but cannot fully honor (skipped at-rules, stray end tags, etc.).

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about input that was accepted but not fully honored (prints once per
/// unique message).
///
/// # Example
/// ```ignore
/// warn_once("CSS", "skipping @font-face rule");
/// ```
pub fn warn_once(component: &str, message: &str) {
    if record(component, message) {
        eprintln!("{}", format!("[quill {component}] ⚠ {message}").yellow());
    }
}

/// Record a warning in the dedup set, returning `true` the first time a given
/// `(component, message)` pair is seen.
fn record(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key)
}

/// Clear all recorded warnings (call before processing an unrelated document).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deduplicates_per_component_and_message() {
        assert!(record("test-dedup", "first"));
        assert!(!record("test-dedup", "first"));
        assert!(record("test-dedup-other", "first"));
    }
}
