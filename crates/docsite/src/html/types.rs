//! HTML generation types
//!
//! Template contexts handed to the page template.

use crate::section::Section;
use serde::Serialize;

/// Template context for page rendering
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    /// Page title
    pub title: Option<String>,
    /// Version of the documented project
    pub version: Option<String>,
    /// Navigation entries in document order
    pub sections: Vec<NavEntry>,
    /// Concatenated HTML of every document
    pub content: String,
}

/// One navigation link
#[derive(Debug, Clone, Serialize)]
pub struct NavEntry {
    pub title: String,
    pub href: String,
    pub depth: u8,
    /// CSS classes naming the producer of the section
    pub kind: String,
}

impl From<&Section> for NavEntry {
    fn from(section: &Section) -> Self {
        Self {
            title: section.title.clone(),
            href: section.href(),
            depth: section.depth,
            kind: section.origin.css_class(),
        }
    }
}
