//! Markdown rendering and heading extraction
//!
//! [`MarkdownRenderer`] is the one place Markdown becomes HTML: comment
//! descriptions, TypeScript comment text and whole Markdown files all go
//! through it. [`MarkdownRenderer::extract_sections`] additionally emits one
//! [`Section`] per heading, including headings nested in block quotes and
//! list items, and splices an anchor marker in front of each heading before
//! rendering.

use crate::anchor::AnchorRegistry;
use crate::section::Section;
use comrak::nodes::{Ast, AstNode, LineColumn, NodeHtmlBlock, NodeValue};
use comrak::{format_html, markdown_to_html, parse_document, Arena, Options};
use lazy_static::lazy_static;
use regex::Regex;
use std::cell::RefCell;

lazy_static! {
    static ref GREEDY_PARENS: Regex = Regex::new(r"\(.+\)").unwrap();
    static ref BRACKETED: Regex = Regex::new(r"\[.+?\]").unwrap();
    static ref ATX_CLOSING: Regex = Regex::new(r"\s+#+\s*$").unwrap();
}

/// Markdown renderer backed by comrak
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    /// GitHub flavored extensions (tables, strikethrough, autolinks, task lists)
    pub gfm: bool,
    /// Pass raw HTML through untouched
    pub allow_html: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self {
            gfm: true,
            allow_html: true,
        }
    }
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a Markdown fragment to HTML
    pub fn render(&self, source: &str) -> String {
        markdown_to_html(source, &self.options())
    }

    /// Render a whole Markdown file, collecting one section per heading.
    ///
    /// Anchors are minted from the raw heading text with bold markers
    /// removed. Returns the sections in source order together with the HTML
    /// of the file, where every heading is preceded by `<a name="anchor"></a>`.
    pub fn extract_sections(
        &self,
        source: &str,
        registry: &mut AnchorRegistry,
    ) -> (Vec<Section>, String) {
        let arena = Arena::new();
        let options = self.options();
        let root = parse_document(&arena, source, &options);
        let lines: Vec<&str> = source.lines().collect();

        let headings: Vec<_> = root
            .descendants()
            .filter(|node| matches!(node.data.borrow().value, NodeValue::Heading(_)))
            .collect();

        let mut sections = Vec::with_capacity(headings.len());
        for node in headings {
            let (level, start, end) = {
                let data = node.data.borrow();
                let level = match &data.value {
                    NodeValue::Heading(heading) => heading.level,
                    _ => continue,
                };
                (level, data.sourcepos.start, data.sourcepos.end.line)
            };

            let raw = raw_heading_text(&lines, start.line, start.column, end).replace("**", "");
            let anchor = registry.unique_anchor(&raw);
            sections.push(Section::heading(heading_title(node), anchor.clone(), level));

            if let Some(anchor) = anchor {
                let marker = arena.alloc(AstNode::new(RefCell::new(Ast::new(
                    NodeValue::HtmlBlock(NodeHtmlBlock {
                        block_type: 6,
                        literal: format!("<a name=\"{}\"></a>\n", anchor),
                    }),
                    LineColumn {
                        line: start.line,
                        column: 1,
                    },
                ))));
                node.insert_before(marker);
            }
        }

        let mut html = Vec::new();
        if let Err(e) = format_html(root, &options, &mut html) {
            tracing::warn!(error = %e, "failed to format markdown");
        }

        (sections, String::from_utf8_lossy(&html).into_owned())
    }

    fn options(&self) -> Options<'static> {
        let mut options = Options::default();
        if self.gfm {
            options.extension.table = true;
            options.extension.strikethrough = true;
            options.extension.autolink = true;
            options.extension.tasklist = true;
        }
        options.render.unsafe_ = self.allow_html;
        options.extension.header_ids = None;
        options
    }
}

/// Plain-text title of a heading with call arguments and bracketed text removed
///
/// Inline markup is flattened first so `**Bold** Header` reads `Bold Header`.
pub fn heading_title<'a>(node: &'a AstNode<'a>) -> String {
    strip_title_noise(&extract_inline_text(node))
}

/// Remove argument lists and bracketed annotations from a title
pub fn strip_title_noise(text: &str) -> String {
    let text = GREEDY_PARENS.replace_all(text, "");
    let text = text.replacen("()", "", 1);
    let text = BRACKETED.replace_all(&text, "");
    text.trim().to_string()
}

/// Source text of a heading without its Markdown markers.
///
/// `column` is where the heading starts, past any block quote or list item
/// prefix on its lines.
fn raw_heading_text(lines: &[&str], start: usize, column: usize, end: usize) -> String {
    let from_column = |line: &str| -> String {
        line.get(column.saturating_sub(1)..)
            .unwrap_or(line)
            .to_string()
    };
    let first = lines
        .get(start.saturating_sub(1))
        .map(|l| from_column(*l))
        .unwrap_or_default();
    let trimmed = first.trim_start();

    if trimmed.starts_with('#') {
        let text = trimmed.trim_start_matches('#');
        return ATX_CLOSING.replace(text, "").trim().to_string();
    }

    // Setext: every line except the underline
    lines
        .iter()
        .skip(start.saturating_sub(1))
        .take(end.saturating_sub(start))
        .map(|l| from_column(*l).trim().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_inline_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Text(t) => text.push_str(t),
            NodeValue::Code(code) => text.push_str(&code.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
            NodeValue::Link(..)
            | NodeValue::Emph
            | NodeValue::Strong
            | NodeValue::Strikethrough => text.push_str(&extract_inline_text(child)),
            NodeValue::HtmlInline(_) | NodeValue::Image(..) => {}
            _ => {}
        }
    }
    text
}
