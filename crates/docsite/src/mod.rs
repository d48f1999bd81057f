//! docsite: documentation site generator
//!
//! This crate turns a configured set of source files into one navigable
//! HTML page:
//! - Markdown files contribute their top-level headings
//! - JavaScript files contribute their JSDoc comments, normalized into
//!   annotations with signatures, parameter tables and return values
//! - TypeScript files contribute their exported constructs, read from a
//!   compiler reflection
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  Markdown    │   │ JSDoc (.js)  │   │ TS reflection│
//! │  headings    │   │ annotations  │   │  constructs  │
//! └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!        └──────────────────┼──────────────────┘
//!                           ▼
//!                    ┌──────────────┐
//!                    │  Doc (file)  │  anchors from one AnchorRegistry
//!                    └──────┬───────┘
//!                           ▼
//!                    ┌──────────────┐
//!                    │    Corpus    │  ordered, sections flattened
//!                    └──────┬───────┘
//!                           ▼
//!                        HTML page
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use docsite::{Corpus, DocsConfig, HtmlRenderer};
//!
//! let config = DocsConfig::load("docs.json", "package.json")?;
//! let renderer = HtmlRenderer::new()?;
//! let corpus = Corpus::build(&config, &renderer, None)?;
//! std::fs::write("index.html", corpus.render_page(&renderer)?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core types
pub mod anchor;
pub mod diagnostics;
pub mod section;

// Extraction
pub mod annotation;
pub mod js_doc;
pub mod markdown;
pub mod reflection;
pub mod typescript;

// Assembly
pub mod config;
pub mod corpus;
pub mod discover;
pub mod doc;

// Output
pub mod html;
pub mod printer;

pub mod test;

// Re-exports for convenience
pub use anchor::{slug, AnchorRegistry};
pub use annotation::{Annotation, AnnotationKind, ParamDescriptor, PromiseDescriptor};
pub use config::{ContentEntry, DocsConfig, PackageInfo};
pub use corpus::{Corpus, CorpusEntry};
pub use diagnostics::{Diagnostic, DiagnosticSeverity, DiagnosticsCollector, DocsError, DocsResult};
pub use discover::discover;
pub use doc::{Doc, FileKind, ParseContext, SourceFile};
pub use html::types::{NavEntry, PageContext};
pub use html::{inject_version, HtmlRenderer};
pub use js_doc::{scan_comments, CommentContext, RawComment, RawTag};
pub use markdown::MarkdownRenderer;
pub use printer::SectionPrinter;
pub use reflection::{JsonReflection, Reflection, ReflectionNode, ReflectionProvider};
pub use section::{Section, SectionOrigin};
pub use typescript::{extract_constructs, ConstructKind, TsConstruct, TsExtraction};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
