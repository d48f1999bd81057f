//! Content discovery
//!
//! Expands the configured `content` patterns into the files to document,
//! read into memory and in configuration order.

use crate::config::{ContentEntry, DocsConfig};
use crate::corpus::CorpusEntry;
use crate::diagnostics::{DocsError, DocsResult};
use crate::doc::SourceFile;
use globset::{GlobBuilder, GlobMatcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

enum Matched {
    File(PathBuf),
    Placeholder { title: String, depth: u8 },
}

/// Resolve the configured content into corpus entries.
///
/// Patterns are matched against every file below the root, relative to it.
/// `*` does not cross directory separators, `**` does. A pattern naming a
/// directory includes every file below it. Files matched by several patterns
/// are kept once, at their first position. Files without an eligible
/// extension are skipped; they still count as matches, so
/// [`DocsError::NoMatchingFiles`] is only raised when no pattern matched
/// anything. Returned file paths are resolved against the root.
pub fn discover(config: &DocsConfig) -> DocsResult<Vec<CorpusEntry>> {
    let root = config.root.as_path();
    let files = list_files(root);

    let mut matched = Vec::new();
    let mut seen = HashSet::new();

    for entry in &config.content {
        match entry {
            ContentEntry::Placeholder { title, depth } => matched.push(Matched::Placeholder {
                title: title.clone(),
                depth: *depth,
            }),
            ContentEntry::Pattern(pattern) => {
                let hits = match_pattern(root, &files, pattern)?;
                debug!(pattern = %pattern, matches = hits.len(), "expanded content pattern");
                for hit in hits {
                    if seen.insert(hit.clone()) {
                        matched.push(Matched::File(hit));
                    }
                }
            }
        }
    }

    if seen.is_empty() {
        return Err(DocsError::NoMatchingFiles);
    }

    let mut entries = Vec::with_capacity(matched.len());
    for item in matched {
        match item {
            Matched::Placeholder { title, depth } => {
                entries.push(CorpusEntry::Placeholder { title, depth })
            }
            Matched::File(relative) => {
                if !config.has_extension(&relative) {
                    debug!(file = %relative.display(), "skipping file without an eligible extension");
                    continue;
                }
                let path = config.resolve(&relative);
                let contents = std::fs::read_to_string(&path).map_err(|e| DocsError::io(&path, e))?;
                entries.push(CorpusEntry::File(SourceFile::new(path, contents)));
            }
        }
    }

    Ok(entries)
}

/// Every file below `root`, relative to it, in file name order
fn list_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "could not read directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect()
}

fn match_pattern(root: &Path, files: &[PathBuf], pattern: &str) -> DocsResult<Vec<PathBuf>> {
    let pattern = pattern.trim_start_matches("./");
    let directory = root.join(pattern);

    if !pattern.is_empty() && directory.is_dir() {
        let prefix = PathBuf::from(pattern.trim_end_matches('/'));
        return Ok(files
            .iter()
            .filter(|f| f.starts_with(&prefix))
            .cloned()
            .collect());
    }

    let matcher = compile(pattern)?;
    Ok(files
        .iter()
        .filter(|f| matcher.is_match(f))
        .cloned()
        .collect())
}

fn compile(pattern: &str) -> DocsResult<GlobMatcher> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| DocsError::InvalidPattern(format!("{}: {}", pattern, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        let files = [
            ("README.md", "# Readme"),
            ("CHANGES.md", "# Changes"),
            ("notes.txt", "plain"),
            ("lib/app.js", "/** App */\nfunction app() {}"),
            ("lib/router.js", "/** Router */\nfunction router() {}"),
            ("lib/nested/util.js", "/** Util */\nfunction util() {}"),
            ("docs/guide.md", "# Guide"),
        ];
        for (name, content) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    fn config(dir: &TempDir, content: Vec<ContentEntry>) -> DocsConfig {
        DocsConfig {
            root: dir.path().to_path_buf(),
            content,
            ..Default::default()
        }
    }

    fn pattern(p: &str) -> ContentEntry {
        ContentEntry::Pattern(p.to_string())
    }

    fn names(dir: &TempDir, entries: &[CorpusEntry]) -> Vec<String> {
        entries
            .iter()
            .map(|entry| match entry {
                CorpusEntry::File(file) => file
                    .path
                    .strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/"),
                CorpusEntry::Placeholder { title, .. } => format!("[{}]", title),
            })
            .collect()
    }

    #[test]
    fn test_star_does_not_cross_directories() {
        let dir = site();
        let entries = discover(&config(&dir, vec![pattern("*.md")])).unwrap();
        assert_eq!(names(&dir, &entries), vec!["CHANGES.md", "README.md"]);
    }

    #[test]
    fn test_double_star_and_dedup() {
        let dir = site();
        let entries = discover(&config(
            &dir,
            vec![pattern("lib/router.js"), pattern("lib/**/*.js")],
        ))
        .unwrap();
        assert_eq!(
            names(&dir, &entries),
            vec!["lib/router.js", "lib/app.js", "lib/nested/util.js"]
        );
    }

    #[test]
    fn test_directory_pattern_and_placeholders() {
        let dir = site();
        let entries = discover(&config(
            &dir,
            vec![
                pattern("README.md"),
                ContentEntry::Placeholder { title: "API".into(), depth: 2 },
                pattern("lib"),
            ],
        ))
        .unwrap();
        assert_eq!(
            names(&dir, &entries),
            vec!["README.md", "[API]", "lib/app.js", "lib/nested/util.js", "lib/router.js"]
        );
    }

    #[test]
    fn test_ineligible_extensions_are_skipped() {
        let dir = site();
        let entries = discover(&config(&dir, vec![pattern("*")])).unwrap();
        assert_eq!(names(&dir, &entries), vec!["CHANGES.md", "README.md"]);
    }

    #[test]
    fn test_only_ineligible_matches_are_not_an_error() {
        let dir = site();
        let entries = discover(&config(&dir, vec![pattern("*.txt")])).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_file_kinds_and_contents() {
        let dir = site();
        let entries = discover(&config(&dir, vec![pattern("lib/app.js")])).unwrap();
        match &entries[0] {
            CorpusEntry::File(file) => {
                assert_eq!(file.kind, crate::doc::FileKind::JsComment);
                assert!(file.contents.contains("function app()"));
            }
            other => panic!("unexpected entry {:?}", other),
        }
    }

    #[test]
    fn test_no_matching_files() {
        let dir = site();
        let err = discover(&config(
            &dir,
            vec![
                pattern("missing/*.md"),
                ContentEntry::Placeholder { title: "Only".into(), depth: 1 },
            ],
        ))
        .unwrap_err();
        assert!(matches!(err, DocsError::NoMatchingFiles));
        assert_eq!(err.to_string(), "no matching files were found");
    }

    #[test]
    fn test_invalid_pattern() {
        let dir = site();
        let err = discover(&config(&dir, vec![pattern("lib/[.js")])).unwrap_err();
        assert!(matches!(err, DocsError::InvalidPattern(_)));
    }
}
