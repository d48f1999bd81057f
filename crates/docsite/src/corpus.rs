//! Corpus assembly
//!
//! A [`Corpus`] is every configured file parsed into a [`Doc`], put in the
//! configured order, with all sections flattened into one table of contents.
//! One [`ParseContext`] spans the whole parse, so anchors are unique across
//! files.

use crate::config::{normalize_path, DocsConfig};
use crate::diagnostics::{Diagnostic, DocsResult};
use crate::discover::discover;
use crate::doc::{Doc, ParseContext, SourceFile};
use crate::html::types::{NavEntry, PageContext};
use crate::html::{inject_version, HtmlRenderer};
use crate::reflection::ReflectionProvider;
use crate::section::Section;
use tracing::{info, warn};

/// One resolved content item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusEntry {
    /// File whose path is already resolved against the configured root
    File(SourceFile),
    /// Heading inserted from configuration
    Placeholder { title: String, depth: u8 },
}

/// Every document of one build
#[derive(Debug)]
pub struct Corpus {
    pub title: Option<String>,
    pub version: Option<String>,
    /// Documents in final order
    pub content: Vec<Doc>,
    /// Sections of every document, flattened in document order
    pub sections: Vec<Section>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Corpus {
    /// Discover the configured content and parse it.
    ///
    /// Fails with [`DocsError::NoMatchingFiles`](crate::DocsError::NoMatchingFiles)
    /// when no pattern matched a file.
    pub fn build(
        config: &DocsConfig,
        renderer: &HtmlRenderer,
        reflection: Option<&dyn ReflectionProvider>,
    ) -> DocsResult<Self> {
        let entries = discover(config)?;
        Self::parse(config, entries, renderer, reflection)
    }

    /// Parse resolved content.
    ///
    /// A file that fails to parse is logged, recorded as a warning and
    /// contributes an empty document. With an `order` list, documents are
    /// stably sorted by their position in it; unlisted documents rank first.
    /// Order entries are resolved against the root, document paths are
    /// compared as given.
    pub fn parse(
        config: &DocsConfig,
        entries: Vec<CorpusEntry>,
        renderer: &HtmlRenderer,
        reflection: Option<&dyn ReflectionProvider>,
    ) -> DocsResult<Self> {
        let mut cx = ParseContext::new(config.code_section_depth);
        let mut content = Vec::with_capacity(entries.len());

        for entry in entries {
            match entry {
                CorpusEntry::Placeholder { title, depth } => {
                    content.push(Doc::placeholder(&title, depth, &mut cx));
                }
                CorpusEntry::File(source) => {
                    if !config.has_extension(&source.path) {
                        continue;
                    }
                    match Doc::parse(&source, &mut cx, renderer, reflection) {
                        Ok(doc) => content.push(doc),
                        Err(e) => {
                            warn!(file = %source.path.display(), error = %e, "skipping file");
                            cx.diagnostics.add(
                                Diagnostic::warning(format!("Skipped file: {}", e))
                                    .in_file(&source.path),
                            );
                            content.push(Doc::empty(&source.path, source.kind));
                        }
                    }
                }
            }
        }

        if let Some(order) = config.resolved_order() {
            content.sort_by_key(|doc| {
                let path = normalize_path(&doc.file);
                order.iter().position(|p| *p == path)
            });
        }

        let sections: Vec<Section> = content
            .iter()
            .flat_map(|doc| doc.sections.iter().cloned())
            .collect();

        info!(
            docs = content.len(),
            sections = sections.len(),
            anchors = cx.registry.len(),
            "parsed documentation corpus"
        );

        Ok(Self {
            title: config.title.clone(),
            version: config.effective_version().map(String::from),
            content,
            sections,
            diagnostics: cx.diagnostics.into_diagnostics(),
        })
    }

    /// Concatenated HTML of every document
    pub fn html(&self) -> String {
        self.content.iter().map(|doc| doc.html.as_str()).collect()
    }

    /// Render the full page, with the version appended to the first heading
    pub fn render_page(&self, renderer: &HtmlRenderer) -> DocsResult<String> {
        let page = PageContext {
            title: self.title.clone(),
            version: self.version.clone(),
            sections: self.sections.iter().map(NavEntry::from).collect(),
            content: self.html(),
        };
        let html = renderer.render_page(&page)?;
        Ok(match &self.version {
            Some(version) => inject_version(&html, version),
            None => html,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ContentEntry, PackageInfo};
    use crate::diagnostics::DiagnosticSeverity;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn md(path: &str, contents: &str) -> CorpusEntry {
        CorpusEntry::File(SourceFile::new(path, contents))
    }

    fn parse(config: &DocsConfig, entries: Vec<CorpusEntry>) -> DocsResult<Corpus> {
        Corpus::parse(config, entries, &HtmlRenderer::new().unwrap(), None)
    }

    fn titles(corpus: &Corpus) -> Vec<&str> {
        corpus.sections.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_sections_flattened_in_doc_order() {
        let corpus = parse(
            &DocsConfig::default(),
            vec![md("a.md", "# A\n\n## A.1\n"), md("b.md", "# B\n")],
        )
        .unwrap();
        assert_eq!(titles(&corpus), vec!["A", "A.1", "B"]);
        assert_eq!(corpus.content.len(), 2);
    }

    #[test]
    fn test_anchors_unique_across_files() {
        let corpus = parse(
            &DocsConfig::default(),
            vec![md("a.md", "# Intro\n"), md("b.md", "# Intro\n")],
        )
        .unwrap();
        let anchors: Vec<_> = corpus.sections.iter().map(|s| s.anchor.clone().unwrap()).collect();
        assert_eq!(anchors, vec!["intro", "intro-1"]);
    }

    #[test]
    fn test_explicit_order() {
        let config = DocsConfig {
            order: Some(vec![PathBuf::from("c.md"), PathBuf::from("a.md")]),
            ..Default::default()
        };
        let corpus = parse(
            &config,
            vec![md("a.md", "# A\n"), md("b.md", "# B\n"), md("c.md", "# C\n")],
        )
        .unwrap();
        assert_eq!(titles(&corpus), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_placeholders_become_headings() {
        let corpus = parse(
            &DocsConfig::default(),
            vec![
                md("intro.md", "# Intro\n"),
                CorpusEntry::Placeholder { title: "API".into(), depth: 2 },
                md("lib/app.js", "/**\n * Start the app.\n */\n\nfunction start() {}\n"),
            ],
        )
        .unwrap();
        assert_eq!(titles(&corpus), vec!["Intro", "API", "start"]);
        assert_eq!(corpus.sections[1].depth, 2);
        assert_eq!(corpus.sections[2].depth, 4);
    }

    #[test]
    fn test_explicit_order_with_relative_root() {
        let config = DocsConfig {
            root: PathBuf::from("site"),
            order: Some(vec![PathBuf::from("b.md"), PathBuf::from("a.md")]),
            ..Default::default()
        };
        let corpus = parse(
            &config,
            vec![md("site/a.md", "# A\n"), md("site/b.md", "# B\n")],
        )
        .unwrap();
        assert_eq!(titles(&corpus), vec!["B", "A"]);
    }

    #[test]
    fn test_only_placeholders_parse() {
        let corpus = parse(
            &DocsConfig::default(),
            vec![CorpusEntry::Placeholder { title: "Empty".into(), depth: 1 }],
        )
        .unwrap();
        assert_eq!(titles(&corpus), vec!["Empty"]);
    }

    #[test]
    fn test_build_without_matches_is_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = DocsConfig {
            root: dir.path().to_path_buf(),
            ..Default::default()
        };
        let err = Corpus::build(&config, &HtmlRenderer::new().unwrap(), None).unwrap_err();
        assert!(matches!(err, crate::DocsError::NoMatchingFiles));
    }

    #[test]
    fn test_build_with_only_ineligible_matches() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "plain").unwrap();
        let config = DocsConfig {
            root: dir.path().to_path_buf(),
            content: vec![ContentEntry::Pattern("*.txt".into())],
            ..Default::default()
        };
        let corpus = Corpus::build(&config, &HtmlRenderer::new().unwrap(), None).unwrap();
        assert!(corpus.content.is_empty());
        assert!(corpus.sections.is_empty());
    }

    #[test]
    fn test_failed_file_yields_empty_doc() {
        let config = DocsConfig {
            extensions: vec![".md".into(), ".ts".into()],
            ..Default::default()
        };
        let corpus = parse(
            &config,
            vec![md("src/greeter.ts", "export class Greeter {}"), md("a.md", "# A\n")],
        )
        .unwrap();

        assert_eq!(corpus.content.len(), 2);
        assert!(corpus.content[0].sections.is_empty());
        assert_eq!(titles(&corpus), vec!["A"]);
        assert_eq!(corpus.diagnostics.len(), 1);
        assert_eq!(corpus.diagnostics[0].severity, DiagnosticSeverity::Warning);
    }

    #[test]
    fn test_ineligible_files_are_dropped() {
        let corpus = parse(
            &DocsConfig::default(),
            vec![md("notes.txt", "# Not docs\n"), md("a.md", "# A\n")],
        )
        .unwrap();
        assert_eq!(titles(&corpus), vec!["A"]);
    }

    #[test]
    fn test_render_page_with_package_version() {
        let config = DocsConfig {
            title: Some("Project".into()),
            package: Some(PackageInfo {
                name: Some("project".into()),
                version: Some("0.3.1".into()),
                description: None,
            }),
            content: vec![ContentEntry::Pattern("*.md".into())],
            ..Default::default()
        };
        let renderer = HtmlRenderer::new().unwrap();
        let corpus = Corpus::parse(&config, vec![md("a.md", "# Start\n")], &renderer, None).unwrap();
        let html = corpus.render_page(&renderer).unwrap();

        assert!(html.contains("<h1>Project <small>v0.3.1</small></h1>"));
        assert!(html.contains("<a href=\"#start\">Start</a>"));
        assert!(html.contains("<a name=\"start\"></a>"));
    }

    #[test]
    fn test_build_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("README.md"), "# Readme\n").unwrap();
        std::fs::create_dir(dir.path().join("lib")).unwrap();
        std::fs::write(
            dir.path().join("lib/app.js"),
            "/**\n * Create an app.\n *\n * @param {String} name\n */\n\nfunction createApp(name) {}\n",
        )
        .unwrap();

        let config = DocsConfig {
            root: dir.path().to_path_buf(),
            content: vec![
                ContentEntry::Pattern("lib/*.js".into()),
                ContentEntry::Pattern("README.md".into()),
            ],
            order: Some(vec![PathBuf::from("README.md")]),
            ..Default::default()
        };
        let corpus = Corpus::build(&config, &HtmlRenderer::new().unwrap(), None).unwrap();
        assert_eq!(titles(&corpus), vec!["createApp", "Readme"]);
    }
}
