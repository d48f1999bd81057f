//! The documentation build command
//!
//! Loads `docs.json` and `package.json`, parses the configured content and
//! writes a single HTML page.

use anyhow::{bail, Context, Result};
use docsite::config::{DEFAULT_CONFIG_FILE, DEFAULT_PACKAGE_FILE};
use docsite::{Corpus, DocsConfig, HtmlRenderer, JsonReflection, ReflectionProvider, SectionPrinter};
use std::path::{Path, PathBuf};
use tracing::info;

const USAGE: &str = "\
Usage:
  docsite [options]

Options:
  --config, -c <file>     Configuration file (default: docs.json)
  --package, -p <file>    Package file (default: package.json)
  --out, -o <file>        Output HTML file (default: index.html)
  --toc                   Print the table of contents
  --no-color              Disable colored output
  --version, -v           Print the version
  --help, -h              Print this help";

/// Run the command with the given arguments
pub fn run(args: &[String]) -> Result<()> {
    let cmd = match DocsCommand::parse(args)? {
        Parsed::Run(cmd) => cmd,
        Parsed::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        Parsed::Version => {
            println!("{} {}", docsite::NAME, docsite::VERSION);
            return Ok(());
        }
    };

    build(&cmd)
}

/// Build command configuration
#[derive(Debug, PartialEq)]
struct DocsCommand {
    config: PathBuf,
    package: PathBuf,
    output: PathBuf,
    print_toc: bool,
    use_color: bool,
}

#[derive(Debug, PartialEq)]
enum Parsed {
    Run(DocsCommand),
    Help,
    Version,
}

impl DocsCommand {
    fn parse(args: &[String]) -> Result<Parsed> {
        let mut cmd = DocsCommand {
            config: PathBuf::from(DEFAULT_CONFIG_FILE),
            package: PathBuf::from(DEFAULT_PACKAGE_FILE),
            output: PathBuf::from("index.html"),
            print_toc: false,
            use_color: true,
        };

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    cmd.config = PathBuf::from(value(args, i, "--config")?);
                    i += 2;
                }
                "--package" | "-p" => {
                    cmd.package = PathBuf::from(value(args, i, "--package")?);
                    i += 2;
                }
                "--out" | "-o" => {
                    cmd.output = PathBuf::from(value(args, i, "--out")?);
                    i += 2;
                }
                "--toc" => {
                    cmd.print_toc = true;
                    i += 1;
                }
                "--no-color" => {
                    cmd.use_color = false;
                    i += 1;
                }
                "--help" | "-h" => return Ok(Parsed::Help),
                "--version" | "-v" => return Ok(Parsed::Version),
                other => bail!("Unknown flag: {}\n\n{}", other, USAGE),
            }
        }

        Ok(Parsed::Run(cmd))
    }
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    match args.get(i + 1) {
        Some(v) if !v.starts_with('-') => Ok(v.as_str()),
        _ => bail!("{} requires a value", flag),
    }
}

fn build(cmd: &DocsCommand) -> Result<()> {
    let config = DocsConfig::load(&cmd.config, &cmd.package)?;

    let mut renderer = HtmlRenderer::new()?;
    if let Some(template) = &config.template {
        let source = std::fs::read_to_string(template)
            .with_context(|| format!("Failed to read template {}", template.display()))?;
        renderer = renderer.with_template("page", &source)?;
    }

    let reflection = load_reflection(config.ts_reflection.as_deref())?;
    let provider = reflection.as_ref().map(|r| r as &dyn ReflectionProvider);

    let corpus = Corpus::build(&config, &renderer, provider)?;
    let html = corpus.render_page(&renderer)?;

    if let Some(parent) = cmd.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&cmd.output, html)
        .with_context(|| format!("Failed to write {}", cmd.output.display()))?;

    let printer = SectionPrinter::new(&corpus.sections, &corpus.diagnostics, cmd.use_color);
    if cmd.print_toc {
        printer.print_to_stderr();
    } else {
        printer.diagnostics_only().print_to_stderr();
    }

    info!(
        output = %cmd.output.display(),
        docs = corpus.content.len(),
        "documentation written"
    );
    Ok(())
}

fn load_reflection(path: Option<&Path>) -> Result<Option<JsonReflection>> {
    path.map(|p| {
        JsonReflection::from_file(p)
            .with_context(|| format!("Failed to load TypeScript reflection {}", p.display()))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_defaults() {
        let Parsed::Run(cmd) = DocsCommand::parse(&[]).unwrap() else {
            panic!("expected a run command");
        };
        assert_eq!(cmd.config, PathBuf::from("docs.json"));
        assert_eq!(cmd.package, PathBuf::from("package.json"));
        assert_eq!(cmd.output, PathBuf::from("index.html"));
        assert!(!cmd.print_toc);
    }

    #[test]
    fn test_parse_flags() {
        let parsed = DocsCommand::parse(&args(&["-c", "site.toml", "--out", "dist/api.html", "--toc", "--no-color"]))
            .unwrap();
        assert_eq!(
            parsed,
            Parsed::Run(DocsCommand {
                config: PathBuf::from("site.toml"),
                package: PathBuf::from("package.json"),
                output: PathBuf::from("dist/api.html"),
                print_toc: true,
                use_color: false,
            })
        );
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(DocsCommand::parse(&args(&["--help"])).unwrap(), Parsed::Help);
        assert_eq!(DocsCommand::parse(&args(&["-v"])).unwrap(), Parsed::Version);
    }

    #[test]
    fn test_parse_errors() {
        assert!(DocsCommand::parse(&args(&["--out"])).is_err());
        assert!(DocsCommand::parse(&args(&["--out", "--toc"])).is_err());
        assert!(DocsCommand::parse(&args(&["--preview"])).is_err());
    }

    #[test]
    fn test_build_writes_page() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("README.md"), "# Hello\n\nWorld\n").unwrap();
        std::fs::write(
            dir.path().join("docs.json"),
            format!(
                r#"{{"title": "Site", "version": "1.0.0", "root": {:?}, "content": "*.md"}}"#,
                dir.path().display().to_string()
            ),
        )
        .unwrap();

        let cmd = DocsCommand {
            config: dir.path().join("docs.json"),
            package: dir.path().join("package.json"),
            output: dir.path().join("out/index.html"),
            print_toc: false,
            use_color: false,
        };
        build(&cmd).unwrap();

        let html = std::fs::read_to_string(dir.path().join("out/index.html")).unwrap();
        assert!(html.contains("<h1>Site <small>v1.0.0</small></h1>"));
        assert!(html.contains("<a href=\"#hello\">Hello</a>"));
    }

    #[test]
    fn test_build_without_matches_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("docs.json"),
            format!(r#"{{"root": {:?}}}"#, dir.path().display().to_string()),
        )
        .unwrap();

        let cmd = DocsCommand {
            config: dir.path().join("docs.json"),
            package: dir.path().join("package.json"),
            output: dir.path().join("index.html"),
            print_toc: false,
            use_color: false,
        };
        let err = build(&cmd).unwrap_err();
        assert_eq!(err.to_string(), "no matching files were found");
    }
}
