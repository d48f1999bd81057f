//! Documentation configuration
//!
//! `docs.json` (or a `.toml` equivalent) lists the content to document and a
//! few rendering options. The project's package file supplies the name and
//! version shown in the page heading.

use crate::diagnostics::{DocsError, DocsResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "docs.json";
/// Default package file name
pub const DEFAULT_PACKAGE_FILE: &str = "package.json";

/// One entry of the `content` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentEntry {
    /// Glob pattern relative to the root, or a directory
    Pattern(String),
    /// Section heading inserted between files
    Placeholder {
        title: String,
        #[serde(default = "default_placeholder_depth")]
        depth: u8,
    },
}

fn default_placeholder_depth() -> u8 {
    1
}

/// Project metadata from the package file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageInfo {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// Configuration of one documentation build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocsConfig {
    /// Page title
    pub title: Option<String>,
    /// Documented version, falls back to the package version
    pub version: Option<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub content: Vec<ContentEntry>,
    /// Base directory for patterns and `order`
    pub root: PathBuf,
    /// Explicit file order
    pub order: Option<Vec<PathBuf>>,
    /// Eligible file suffixes, with the leading dot
    pub extensions: Vec<String>,
    /// Heading level of code sections
    pub code_section_depth: u8,
    /// Typedoc JSON reflection used for `.ts` files
    pub ts_reflection: Option<PathBuf>,
    /// Custom page template
    pub template: Option<PathBuf>,
    pub package: Option<PackageInfo>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            title: None,
            version: None,
            content: vec![ContentEntry::Pattern("*.md".to_string())],
            root: PathBuf::from("."),
            order: None,
            extensions: vec![".markdown".into(), ".md".into(), ".js".into()],
            code_section_depth: 4,
            ts_reflection: None,
            template: None,
            package: None,
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<ContentEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<ContentEntry>),
        One(ContentEntry),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(entry) => vec![entry],
        OneOrMany::Many(entries) => entries,
    })
}

impl DocsConfig {
    /// Load the configuration and package files.
    ///
    /// Missing or blank files yield defaults. An explicit `package` object in
    /// the configuration wins over the package file.
    pub fn load(config_path: impl AsRef<Path>, package_path: impl AsRef<Path>) -> DocsResult<Self> {
        let config_path = config_path.as_ref();
        let mut config: DocsConfig = read_document(config_path)
            .map_err(|e| prefix_config_error("Could not load config data", e))?
            .unwrap_or_default();

        if config.package.is_none() {
            config.package = read_document(package_path.as_ref())
                .map_err(|e| prefix_config_error("Could not load package data", e))?;
        }

        debug!(
            config = %config_path.display(),
            patterns = config.content.len(),
            "loaded docs configuration"
        );
        Ok(config)
    }

    /// Parse configuration text as TOML or JSON
    pub fn from_str_as(content: &str, is_toml: bool) -> DocsResult<Self> {
        parse_document(content, is_toml)
    }

    /// Explicit version, or the package version
    pub fn effective_version(&self) -> Option<&str> {
        self.version.as_deref().or_else(|| {
            self.package
                .as_ref()
                .and_then(|p| p.version.as_deref())
        })
    }

    /// Whether a path carries one of the eligible extensions
    pub fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.trim_start_matches('.') == ext))
    }

    /// Resolve a path against the root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        normalize_path(&self.root.join(path))
    }

    /// The `order` list resolved against the root
    pub fn resolved_order(&self) -> Option<Vec<PathBuf>> {
        self.order
            .as_ref()
            .map(|order| order.iter().map(|p| self.resolve(p)).collect())
    }
}

/// Lexically normalize a path: drop `.` and fold `..` where possible
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn prefix_config_error(prefix: &str, err: DocsError) -> DocsError {
    match err {
        DocsError::Config(message) => DocsError::config(format!("{}: {}", prefix, message)),
        other => other,
    }
}

/// Read and parse a JSON or TOML document; `None` when missing or blank
fn read_document<T>(path: &Path) -> DocsResult<Option<T>>
where
    T: for<'de> Deserialize<'de>,
{
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "file not found, using defaults");
            return Ok(None);
        }
        Err(e) => return Err(DocsError::io(path, e)),
    };

    if content.trim().is_empty() {
        return Ok(None);
    }

    let is_toml = path.extension().and_then(|e| e.to_str()) == Some("toml");
    parse_document(&content, is_toml)
        .map(Some)
        .map_err(|e| match e {
            DocsError::Config(message) => {
                DocsError::config(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
}

fn parse_document<T>(content: &str, is_toml: bool) -> DocsResult<T>
where
    T: for<'de> Deserialize<'de>,
{
    if is_toml {
        toml::from_str(content).map_err(|e| DocsError::config(e.to_string()))
    } else {
        serde_json::from_str(content).map_err(|e| DocsError::config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = DocsConfig::default();
        assert_eq!(config.content, vec![ContentEntry::Pattern("*.md".into())]);
        assert_eq!(config.extensions, vec![".markdown", ".md", ".js"]);
        assert_eq!(config.code_section_depth, 4);
        assert!(config.order.is_none());
    }

    #[test]
    fn test_missing_files_yield_defaults() {
        let dir = TempDir::new().unwrap();
        let config = DocsConfig::load(dir.path().join("docs.json"), dir.path().join("package.json")).unwrap();
        assert_eq!(config, DocsConfig::default());
    }

    #[test]
    fn test_blank_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config_path = write(&dir, "docs.json", "  \n\t\n");
        let config = DocsConfig::load(config_path, dir.path().join("package.json")).unwrap();
        assert_eq!(config.content.len(), 1);
    }

    #[test]
    fn test_load_json_with_package() {
        let dir = TempDir::new().unwrap();
        let config_path = write(
            &dir,
            "docs.json",
            r#"{
                "title": "My Project",
                "content": ["README.md", {"title": "API", "depth": 2}, "lib/*.js"],
                "codeSectionDepth": 3,
                "order": ["lib/app.js"]
            }"#,
        );
        let package_path = write(&dir, "package.json", r#"{"name": "my-project", "version": "1.4.0"}"#);

        let config = DocsConfig::load(config_path, package_path).unwrap();
        assert_eq!(config.title.as_deref(), Some("My Project"));
        assert_eq!(
            config.content,
            vec![
                ContentEntry::Pattern("README.md".into()),
                ContentEntry::Placeholder { title: "API".into(), depth: 2 },
                ContentEntry::Pattern("lib/*.js".into()),
            ]
        );
        assert_eq!(config.code_section_depth, 3);
        assert_eq!(config.effective_version(), Some("1.4.0"));
        assert_eq!(config.package.unwrap().name.as_deref(), Some("my-project"));
    }

    #[test]
    fn test_single_content_string_is_wrapped() {
        let config = DocsConfig::from_str_as(r#"{"content": "docs/*.md"}"#, false).unwrap();
        assert_eq!(config.content, vec![ContentEntry::Pattern("docs/*.md".into())]);
    }

    #[test]
    fn test_load_toml() {
        let dir = TempDir::new().unwrap();
        let config_path = write(
            &dir,
            "docs.toml",
            r#"
title = "Toml Docs"
version = "2.0.0"
content = ["*.md", { title = "Reference" }]
extensions = [".md", ".ts"]
tsReflection = "reflection.json"
"#,
        );
        let config = DocsConfig::load(config_path, dir.path().join("package.json")).unwrap();
        assert_eq!(config.effective_version(), Some("2.0.0"));
        assert_eq!(
            config.content[1],
            ContentEntry::Placeholder { title: "Reference".into(), depth: 1 }
        );
        assert!(config.has_extension(Path::new("src/a.ts")));
        assert!(!config.has_extension(Path::new("src/a.js")));
        assert_eq!(config.ts_reflection, Some(PathBuf::from("reflection.json")));
    }

    #[test]
    fn test_malformed_config_is_error() {
        let dir = TempDir::new().unwrap();
        let config_path = write(&dir, "docs.json", "{\"content\": [");
        let err = DocsConfig::load(config_path, dir.path().join("package.json")).unwrap_err();
        assert!(matches!(err, DocsError::Config(ref m) if m.starts_with("Could not load config data")));
    }

    #[test]
    fn test_malformed_package_is_error() {
        let dir = TempDir::new().unwrap();
        let package_path = write(&dir, "package.json", "not json");
        let err = DocsConfig::load(dir.path().join("docs.json"), package_path).unwrap_err();
        assert!(matches!(err, DocsError::Config(ref m) if m.starts_with("Could not load package data")));
    }

    #[test]
    fn test_resolved_order() {
        let config = DocsConfig {
            root: PathBuf::from("site/./docs"),
            order: Some(vec![PathBuf::from("./b.md"), PathBuf::from("../a.md")]),
            ..Default::default()
        };
        assert_eq!(
            config.resolved_order().unwrap(),
            vec![PathBuf::from("site/docs/b.md"), PathBuf::from("site/a.md")]
        );
    }
}
