//! Per-file documents
//!
//! A [`Doc`] is one source file turned into sections and an HTML fragment.
//! The file kind picks the extractor: Markdown headings, JSDoc annotations or
//! TypeScript constructs. Every extractor mints anchors from the
//! [`ParseContext`] shared by the whole corpus parse.

use crate::anchor::AnchorRegistry;
use crate::annotation::{Annotation, AnnotationKind};
use crate::diagnostics::{DiagnosticsCollector, DocsError, DocsResult};
use crate::html::HtmlRenderer;
use crate::js_doc::{scan_comments, RawComment};
use crate::markdown::MarkdownRenderer;
use crate::reflection::ReflectionProvider;
use crate::section::Section;
use crate::typescript::extract_constructs;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name used for configuration placeholders
pub const FAUX_FILE: &str = "faux-section.md";

/// Default heading level of code sections
pub const DEFAULT_CODE_SECTION_DEPTH: u8 = 4;

/// How a file is documented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Markdown,
    /// JavaScript with JSDoc comments
    JsComment,
    TypeScript,
}

impl FileKind {
    /// Kind implied by a path's extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("js") => FileKind::JsComment,
            Some("ts") => FileKind::TypeScript,
            _ => FileKind::Markdown,
        }
    }
}

/// A file read into memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub contents: String,
    pub kind: FileKind,
}

impl SourceFile {
    /// Create a source file, deriving its kind from the extension
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        let path = path.into();
        let kind = FileKind::from_path(&path);
        Self {
            path,
            contents: contents.into(),
            kind,
        }
    }
}

/// State shared by every document of one corpus parse
#[derive(Debug)]
pub struct ParseContext {
    pub registry: AnchorRegistry,
    pub markdown: MarkdownRenderer,
    pub diagnostics: DiagnosticsCollector,
    /// `@class` descriptions already rendered by an earlier document
    pub rendered_classes: HashSet<String>,
    pub code_section_depth: u8,
}

impl Default for ParseContext {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_SECTION_DEPTH)
    }
}

impl ParseContext {
    /// Create a fresh context with its own anchor registry
    pub fn new(code_section_depth: u8) -> Self {
        Self {
            registry: AnchorRegistry::new(),
            markdown: MarkdownRenderer::new(),
            diagnostics: DiagnosticsCollector::new(),
            rendered_classes: HashSet::new(),
            code_section_depth,
        }
    }
}

/// One parsed source file
#[derive(Debug, Clone)]
pub struct Doc {
    pub file: PathBuf,
    pub file_name: String,
    pub kind: FileKind,
    /// Sections in document order
    pub sections: Vec<Section>,
    /// Concatenated rendered fragments
    pub html: String,
}

impl Doc {
    /// A document with no sections and no HTML
    pub fn empty(file: impl Into<PathBuf>, kind: FileKind) -> Self {
        let file = file.into();
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            file,
            file_name,
            kind,
            sections: Vec::new(),
            html: String::new(),
        }
    }

    /// Parse a source file with the extractor matching its kind.
    ///
    /// Any failure comes back as [`DocsError::Parse`] naming the file.
    pub fn parse(
        source: &SourceFile,
        cx: &mut ParseContext,
        renderer: &HtmlRenderer,
        reflection: Option<&dyn ReflectionProvider>,
    ) -> DocsResult<Self> {
        let result = match source.kind {
            FileKind::Markdown => Ok(Self::from_markdown(&source.path, &source.contents, cx)),
            FileKind::JsComment => {
                let comments = scan_comments(&source.contents);
                Self::from_comments(&source.path, &comments, cx, renderer)
            }
            FileKind::TypeScript => match reflection {
                Some(provider) => Self::from_typescript(&source.path, provider, cx, renderer),
                None => Err(DocsError::Reflection(
                    "no TypeScript reflection configured".to_string(),
                )),
            },
        };
        result.map_err(|e| match e {
            DocsError::Parse { .. } => e,
            other => DocsError::parse(&source.path, other.to_string()),
        })
    }

    /// Build a document from Markdown
    pub fn from_markdown(file: &Path, contents: &str, cx: &mut ParseContext) -> Self {
        let mut doc = Self::empty(file, FileKind::Markdown);
        let (sections, html) = cx.markdown.extract_sections(contents, &mut cx.registry);
        doc.sections = sections;
        doc.html = html;
        doc
    }

    /// Build the document of a configuration placeholder: one heading of the
    /// requested depth, clamped to `1..=6`
    pub fn placeholder(title: &str, depth: u8, cx: &mut ParseContext) -> Self {
        let depth = depth.clamp(1, 6);
        let markdown = format!("{} {}", "#".repeat(usize::from(depth)), title);
        Self::from_markdown(Path::new(FAUX_FILE), &markdown, cx)
    }

    /// Build a document from raw JSDoc comments.
    ///
    /// Classes come first, ordered by title, each followed by its methods
    /// (ordered by trailing name segment) and properties. File-level
    /// annotations follow in source order. A class already rendered by an
    /// earlier document is skipped, its members are not.
    pub fn from_comments(
        file: &Path,
        comments: &[RawComment],
        cx: &mut ParseContext,
        renderer: &HtmlRenderer,
    ) -> DocsResult<Self> {
        let mut doc = Self::empty(file, FileKind::JsComment);

        let mut classes: Vec<ClassBucket> = Vec::new();
        let mut file_level: Vec<Annotation> = Vec::new();

        for comment in comments {
            let annotation = Annotation::new(comment, &doc.file_name, cx);
            if annotation.ignore {
                continue;
            }

            match annotation.kind {
                AnnotationKind::Class => classes.push(ClassBucket::new(annotation)),
                kind if kind.is_callable() => match classes.last_mut() {
                    Some(class) => class.methods.push(annotation),
                    None => file_level.push(annotation),
                },
                AnnotationKind::Property => match classes.last_mut() {
                    Some(class) => class.properties.push(annotation),
                    None => file_level.push(annotation),
                },
                _ => file_level.push(annotation),
            }
        }

        classes.sort_by(|a, b| a.class.section_title.cmp(&b.class.section_title));

        for mut bucket in classes {
            let seen = bucket
                .class
                .class_desc
                .as_ref()
                .is_some_and(|desc| cx.rendered_classes.contains(desc));

            if seen {
                debug!(file = %doc.file_name, class = %bucket.class.section_title, "class already rendered");
            } else {
                doc.push_annotation(&bucket.class, renderer)?;
                if let Some(desc) = &bucket.class.class_desc {
                    cx.rendered_classes.insert(desc.clone());
                }
            }

            bucket.methods.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
            for member in bucket.methods.iter().chain(&bucket.properties) {
                doc.push_annotation(member, renderer)?;
            }
        }

        for annotation in &file_level {
            doc.push_annotation(annotation, renderer)?;
        }

        Ok(doc)
    }

    /// Build a document from a TypeScript reflection
    pub fn from_typescript(
        file: &Path,
        provider: &dyn ReflectionProvider,
        cx: &mut ParseContext,
        renderer: &HtmlRenderer,
    ) -> DocsResult<Self> {
        let mut doc = Self::empty(file, FileKind::TypeScript);
        let reflection = provider.reflect(&[file.to_path_buf()])?;
        let extraction = extract_constructs(&reflection, file, cx);

        doc.sections = extraction.sections;
        for construct in &extraction.constructs {
            doc.html.push_str(&renderer.render_construct(construct)?);
        }
        Ok(doc)
    }

    fn push_annotation(&mut self, annotation: &Annotation, renderer: &HtmlRenderer) -> DocsResult<()> {
        self.html.push_str(&renderer.render_annotation(annotation)?);
        self.sections.extend(annotation.section());
        Ok(())
    }
}

struct ClassBucket {
    class: Annotation,
    methods: Vec<Annotation>,
    properties: Vec<Annotation>,
}

impl ClassBucket {
    fn new(class: Annotation) -> Self {
        Self {
            class,
            methods: Vec::new(),
            properties: Vec::new(),
        }
    }
}
