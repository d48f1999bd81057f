//! Error types and diagnostics
//!
//! Fatal problems surface as [`DocsError`]. Everything that only degrades the
//! output (an unsupported tag, a comment without description, a file that
//! failed to parse, TypeScript compiler errors) is recorded as a
//! [`Diagnostic`] and the run continues.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for docsite operations
pub type DocsResult<T> = Result<T, DocsError>;

/// Main error type for docsite
#[derive(Debug, Error)]
pub enum DocsError {
    /// Reading a source or configuration file failed
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// None of the configured content patterns matched a file
    #[error("no matching files were found")]
    NoMatchingFiles,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A content pattern could not be compiled
    #[error("Invalid content pattern: {0}")]
    InvalidPattern(String),

    /// Template registration or rendering error
    #[error("Template error: {0}")]
    Template(String),

    /// The TypeScript reflection collaborator failed outright
    #[error("Reflection error: {0}")]
    Reflection(String),

    /// A single file could not be turned into documentation
    #[error("Parse error in {}: {message}", file.display())]
    Parse { file: PathBuf, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DocsError {
    /// Create an I/O error bound to a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DocsError::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error
    pub fn parse(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        DocsError::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        DocsError::Config(message.into())
    }

    /// Create a template error
    pub fn template(message: impl Into<String>) -> Self {
        DocsError::Template(message.into())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Error - the affected item is missing from the output
    Error,
    /// Warning - output is produced but degraded
    Warning,
    /// Info - informational message
    Info,
}

impl DiagnosticSeverity {
    /// Get display string
    pub fn display(&self) -> &'static str {
        match self {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Info => "info",
        }
    }
}

/// A diagnostic message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level
    pub severity: DiagnosticSeverity,
    /// Message
    pub message: String,
    /// Source file
    pub file: Option<PathBuf>,
    /// Diagnostic code (for categorization)
    pub code: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            file: None,
            code: None,
        }
    }

    /// Create an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Error, message)
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Warning, message)
    }

    /// Create an info diagnostic
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Info, message)
    }

    /// Set the source file
    pub fn in_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set the diagnostic code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Format the diagnostic for display
    pub fn format(&self) -> String {
        let mut result = String::new();

        if let Some(ref file) = self.file {
            result.push_str(&file.display().to_string());
            result.push_str(": ");
        }

        result.push_str(self.severity.display());

        if let Some(ref code) = self.code {
            result.push('[');
            result.push_str(code);
            result.push(']');
        }

        result.push_str(": ");
        result.push_str(&self.message);

        result
    }
}

/// Collector for diagnostics during a corpus parse
#[derive(Debug, Default)]
pub struct DiagnosticsCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticsCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Add a batch of diagnostics
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Add a warning
    pub fn warning(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::warning(message));
    }

    /// Add an info message
    pub fn info(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::info(message));
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    /// Get all diagnostics
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the collector
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Get error count
    pub fn error_count(&self) -> usize {
        self.count(DiagnosticSeverity::Error)
    }

    /// Get warning count
    pub fn warning_count(&self) -> usize {
        self.count(DiagnosticSeverity::Warning)
    }

    fn count(&self, severity: DiagnosticSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_matching_files_message() {
        assert_eq!(
            DocsError::NoMatchingFiles.to_string(),
            "no matching files were found"
        );
    }

    #[test]
    fn test_parse_error() {
        let err = DocsError::parse("lib/app.js", "template failed");
        assert!(err.to_string().contains("lib/app.js"));
        assert!(err.to_string().contains("template failed"));
    }

    #[test]
    fn test_diagnostic_format() {
        let diag = Diagnostic::error("Cannot find name 'Foo'")
            .in_file("src/greeter.ts")
            .with_code("ts-compile");

        assert_eq!(diag.severity, DiagnosticSeverity::Error);
        assert_eq!(
            diag.format(),
            "src/greeter.ts: error[ts-compile]: Cannot find name 'Foo'"
        );
    }

    #[test]
    fn test_diagnostics_collector() {
        let mut collector = DiagnosticsCollector::new();
        collector.add(Diagnostic::error("error 1"));
        collector.warning("warning 1");
        collector.info("info 1");

        assert!(collector.has_errors());
        assert_eq!(collector.error_count(), 1);
        assert_eq!(collector.warning_count(), 1);
        assert_eq!(collector.diagnostics().len(), 3);
    }
}
