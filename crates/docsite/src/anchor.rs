//! URL-safe anchors for in-page navigation
//!
//! Every section of the generated page gets a fragment identifier. Titles are
//! normalized with [`slug`] and [`AnchorRegistry`] guarantees that no two
//! sections of one corpus parse share an anchor.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    /// Function-call argument lists, `foo(a, b)` -> `foo`
    static ref CALL_PARENS: Regex = Regex::new(r"\([^)]*\)").unwrap();
}

/// Generate a URL-safe slug from a title.
///
/// Strips function-call parentheses, lowercases, replaces every run of
/// non-alphanumeric characters with a single hyphen and trims hyphens from
/// both ends. Applying `slug` to its own output returns it unchanged.
///
/// # Examples
///
/// ```
/// use docsite::anchor::slug;
///
/// assert_eq!(slug("Hello World"), "hello-world");
/// assert_eq!(slug("app.use(fn)"), "app-use");
/// assert_eq!(slug("**Bold** Header"), "bold-header");
/// ```
pub fn slug(s: &str) -> String {
    let stripped = CALL_PARENS.replace_all(s, " ");

    stripped
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Append-only table of anchors minted during one corpus parse.
///
/// Each parse run owns its own registry so runs never leak anchors into each
/// other.
#[derive(Debug, Default, Clone)]
pub struct AnchorRegistry {
    used: HashSet<String>,
}

impl AnchorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a unique anchor for `title`.
    ///
    /// Returns `None` when the title normalizes to nothing. On collision the
    /// trailing digit is incremented when the anchor ends in one, otherwise
    /// `-1` is appended, and the check repeats until a free anchor is found:
    /// `foo`, `foo-1`, `foo-2`, ...
    pub fn unique_anchor(&mut self, title: &str) -> Option<String> {
        let mut candidate = slug(title);
        if candidate.is_empty() {
            return None;
        }

        while self.used.contains(&candidate) {
            candidate = next_candidate(&candidate);
        }

        self.used.insert(candidate.clone());
        Some(candidate)
    }

    /// Check whether an anchor has already been handed out
    pub fn contains(&self, anchor: &str) -> bool {
        self.used.contains(anchor)
    }

    /// Number of anchors minted so far
    pub fn len(&self) -> usize {
        self.used.len()
    }

    /// Whether no anchor has been minted yet
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

/// Derive the next collision candidate from a used anchor
fn next_candidate(anchor: &str) -> String {
    let mut chars: Vec<char> = anchor.chars().collect();
    match chars.last().and_then(|c| c.to_digit(10)) {
        Some(digit) => {
            chars.pop();
            let mut next: String = chars.into_iter().collect();
            next.push_str(&(digit + 1).to_string());
            next
        }
        None => format!("{}-1", anchor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_basic() {
        assert_eq!(slug("Hello World"), "hello-world");
        assert_eq!(slug("hello"), "hello");
        assert_eq!(slug("UPPERCASE"), "uppercase");
    }

    #[test]
    fn test_slug_special_chars() {
        assert_eq!(slug("runtime:fs"), "runtime-fs");
        assert_eq!(slug("my_function"), "my-function");
        assert_eq!(slug("Foo.prototype.bar"), "foo-prototype-bar");
        assert_eq!(slug("[link](url)"), "link");
    }

    #[test]
    fn test_slug_strips_call_parens() {
        assert_eq!(slug("add(a, b)"), "add");
        assert_eq!(slug("app.middleware()"), "app-middleware");
    }

    #[test]
    fn test_slug_edge_cases() {
        assert_eq!(slug(""), "");
        assert_eq!(slug("   "), "");
        assert_eq!(slug("---"), "");
        assert_eq!(slug("a--b"), "a-b");
        assert_eq!(slug("-hello-"), "hello");
    }

    #[test]
    fn test_slug_is_idempotent() {
        for title in ["Foo Bar", "Class: Greeter", "v1.2.3", "app.use(fn)", "foo-bar-1"] {
            let once = slug(title);
            assert_eq!(slug(&once), once);
        }
    }

    #[test]
    fn test_unique_anchor_sequence() {
        let mut registry = AnchorRegistry::new();
        let anchors: Vec<_> = ["foo", "foo", "foo", "foo bar", "foo bar"]
            .iter()
            .map(|t| registry.unique_anchor(t).unwrap())
            .collect();

        assert_eq!(anchors, vec!["foo", "foo-1", "foo-2", "foo-bar", "foo-bar-1"]);
    }

    #[test]
    fn test_unique_anchor_empty_title() {
        let mut registry = AnchorRegistry::new();
        assert_eq!(registry.unique_anchor(""), None);
        assert_eq!(registry.unique_anchor("()"), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unique_anchor_increments_trailing_digit() {
        let mut registry = AnchorRegistry::new();
        assert_eq!(registry.unique_anchor("v2").as_deref(), Some("v2"));
        assert_eq!(registry.unique_anchor("v2").as_deref(), Some("v3"));

        for _ in 0..10 {
            registry.unique_anchor("bar");
        }
        assert!(registry.contains("bar-9"));
        assert_eq!(registry.unique_anchor("bar").as_deref(), Some("bar-10"));
    }

    #[test]
    fn test_registries_are_independent() {
        let mut first = AnchorRegistry::new();
        let mut second = AnchorRegistry::new();
        assert_eq!(first.unique_anchor("intro").as_deref(), Some("intro"));
        assert_eq!(second.unique_anchor("intro").as_deref(), Some("intro"));
    }
}
