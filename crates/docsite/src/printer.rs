//! Terminal output for a parsed corpus
//!
//! Prints the table of contents and the diagnostics gathered while parsing.
//!
//! # Example
//!
//! ```no_run
//! use docsite::printer::SectionPrinter;
//! use docsite::section::Section;
//!
//! let sections = vec![Section::heading("Intro", Some("intro".into()), 1)];
//! let printer = SectionPrinter::new(&sections, &[], true);
//! println!("{}", printer);
//! ```

use crate::diagnostics::{Diagnostic, DiagnosticSeverity};
use crate::section::Section;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Table of contents and diagnostics printer
pub struct SectionPrinter<'a> {
    sections: &'a [Section],
    diagnostics: &'a [Diagnostic],
    use_color: bool,
    show_toc: bool,
}

impl<'a> SectionPrinter<'a> {
    /// Create a new printer; the table of contents is shown by default
    pub fn new(sections: &'a [Section], diagnostics: &'a [Diagnostic], use_color: bool) -> Self {
        Self {
            sections,
            diagnostics,
            use_color,
            show_toc: true,
        }
    }

    /// Only print diagnostics and the summary
    pub fn diagnostics_only(mut self) -> Self {
        self.show_toc = false;
        self
    }

    /// Print to stderr, colored when the terminal supports it
    pub fn print_to_stderr(&self) {
        let choice = if self.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stderr = StandardStream::stderr(choice);
        if let Err(e) = self.write_colored(&mut stderr) {
            eprintln!("Error printing sections: {}", e);
        }
    }

    fn write_colored<W: WriteColor>(&self, w: &mut W) -> io::Result<()> {
        if self.show_toc {
            for section in self.sections {
                write!(w, "{}", Indent(section.depth.saturating_sub(1).into()))?;
                self.write_bold(w, &section.title)?;
                if let Some(anchor) = &section.anchor {
                    write!(w, " ")?;
                    self.write_gray(w, &format!("#{}", anchor))?;
                }
                writeln!(w)?;
            }
            if !self.sections.is_empty() {
                writeln!(w)?;
            }
        }

        for diagnostic in self.diagnostics {
            if let Some(file) = &diagnostic.file {
                self.write_gray(w, &format!("{}: ", file.display()))?;
            }
            self.write_severity(w, diagnostic.severity)?;
            if let Some(code) = &diagnostic.code {
                write!(w, "[{}]", code)?;
            }
            writeln!(w, ": {}", diagnostic.message)?;
        }

        writeln!(w, "{}", self.summary())
    }

    /// One line summary: section count and diagnostic counts by severity
    pub fn summary(&self) -> String {
        let count = |severity| {
            self.diagnostics
                .iter()
                .filter(|d| d.severity == severity)
                .count()
        };
        format!(
            "{} sections, {} errors, {} warnings",
            self.sections.len(),
            count(DiagnosticSeverity::Error),
            count(DiagnosticSeverity::Warning)
        )
    }

    fn write_severity<W: WriteColor>(&self, w: &mut W, severity: DiagnosticSeverity) -> io::Result<()> {
        let color = match severity {
            DiagnosticSeverity::Error => Color::Red,
            DiagnosticSeverity::Warning => Color::Yellow,
            DiagnosticSeverity::Info => Color::Cyan,
        };
        w.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(w, "{}", severity.display())?;
        w.reset()
    }

    fn write_bold<W: WriteColor>(&self, w: &mut W, s: &str) -> io::Result<()> {
        w.set_color(ColorSpec::new().set_bold(true))?;
        write!(w, "{}", s)?;
        w.reset()
    }

    fn write_gray<W: WriteColor>(&self, w: &mut W, s: &str) -> io::Result<()> {
        w.set_color(ColorSpec::new().set_fg(Some(Color::White)).set_dimmed(true))?;
        write!(w, "{}", s)?;
        w.reset()
    }

    fn styled_bold(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[1m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn styled_gray(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[90m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }
}

impl Display for SectionPrinter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.show_toc {
            for section in self.sections {
                write!(
                    f,
                    "{}{}",
                    Indent(section.depth.saturating_sub(1).into()),
                    self.styled_bold(&section.title)
                )?;
                if let Some(anchor) = &section.anchor {
                    write!(f, " {}", self.styled_gray(&format!("#{}", anchor)))?;
                }
                writeln!(f)?;
            }
        }
        for diagnostic in self.diagnostics {
            writeln!(f, "{}", diagnostic.format())?;
        }
        write!(f, "{}", self.summary())
    }
}

/// Indentation helper
struct Indent(usize);

impl Display for Indent {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for _ in 0..self.0 {
            write!(f, "  ")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::NoColor;

    fn sections() -> Vec<Section> {
        vec![
            Section::heading("Intro", Some("intro".into()), 1),
            Section::heading("Install", Some("install".into()), 2),
            Section::heading("Untitled", None, 2),
        ]
    }

    #[test]
    fn test_display_plain() {
        let sections = sections();
        let diagnostics = vec![Diagnostic::warning("Skipped file").in_file("a.ts")];
        let output = SectionPrinter::new(&sections, &diagnostics, false).to_string();

        assert!(output.contains("Intro #intro\n"));
        assert!(output.contains("  Install #install\n"));
        assert!(output.contains("  Untitled\n"));
        assert!(output.contains("a.ts: warning: Skipped file"));
        assert!(output.ends_with("3 sections, 0 errors, 1 warnings"));
    }

    #[test]
    fn test_diagnostics_only() {
        let sections = sections();
        let output = SectionPrinter::new(&sections, &[], false)
            .diagnostics_only()
            .to_string();
        assert_eq!(output, "3 sections, 0 errors, 0 warnings");
    }

    #[test]
    fn test_write_colored_without_color() {
        let sections = sections();
        let diagnostics = vec![Diagnostic::error("TS2304").with_code("ts-compile")];
        let printer = SectionPrinter::new(&sections, &diagnostics, false);

        let mut out = NoColor::new(Vec::new());
        printer.write_colored(&mut out).unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.contains("  Install #install"));
        assert!(text.contains("error[ts-compile]: TS2304"));
        assert!(text.contains("1 errors"));
    }

    #[test]
    fn test_indent() {
        assert_eq!(Indent(2).to_string(), "    ");
    }
}
