//! Table-of-contents entries
//!
//! Every producer (Markdown headings, JSDoc annotations, TypeScript
//! constructs) emits [`Section`]s. The producer-specific part lives in
//! [`SectionOrigin`]; flattening only looks at `title`, `anchor` and `depth`,
//! navigation also styles entries by origin.

use serde::Serialize;

/// One entry of the generated table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Title shown in navigation
    pub title: String,

    /// Fragment identifier, absent when the title normalized to nothing
    pub anchor: Option<String>,

    /// Heading level, 1-indexed
    pub depth: u8,

    /// Which extractor produced the section
    #[serde(skip)]
    pub origin: SectionOrigin,
}

/// Producer of a [`Section`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionOrigin {
    /// A Markdown heading
    Heading,
    /// A JSDoc annotation of the given kind
    Comment(crate::annotation::AnnotationKind),
    /// A TypeScript construct or member, carrying its kind string
    Construct(String),
}

impl SectionOrigin {
    /// CSS classes of a navigation entry, e.g. `comment comment-method`
    pub fn css_class(&self) -> String {
        match self {
            SectionOrigin::Heading => "heading".to_string(),
            SectionOrigin::Comment(kind) => format!("comment comment-{}", kind),
            SectionOrigin::Construct(kind) => format!(
                "construct construct-{}",
                kind.to_lowercase().replace(' ', "-")
            ),
        }
    }
}

impl Section {
    /// Create a Markdown heading section
    pub fn heading(title: impl Into<String>, anchor: Option<String>, depth: u8) -> Self {
        Self::new(title, anchor, depth, SectionOrigin::Heading)
    }

    /// Create a section with an explicit origin
    pub fn new(
        title: impl Into<String>,
        anchor: Option<String>,
        depth: u8,
        origin: SectionOrigin,
    ) -> Self {
        Self {
            title: title.into(),
            anchor,
            depth,
            origin,
        }
    }

    /// Link target for navigation, `#anchor` or empty
    pub fn href(&self) -> String {
        self.anchor
            .as_deref()
            .map(|a| format!("#{}", a))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationKind;

    #[test]
    fn test_origin_css_class() {
        assert_eq!(SectionOrigin::Heading.css_class(), "heading");
        assert_eq!(
            SectionOrigin::Comment(AnnotationKind::Method).css_class(),
            "comment comment-method"
        );
        assert_eq!(
            SectionOrigin::Construct("Type alias".into()).css_class(),
            "construct construct-type-alias"
        );
    }

    #[test]
    fn test_href() {
        assert_eq!(Section::heading("Intro", Some("intro".into()), 1).href(), "#intro");
        assert_eq!(Section::heading("Blank", None, 1).href(), "");
    }
}
