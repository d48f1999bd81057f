//! TypeScript reflection model
//!
//! The construct extractor does not run the TypeScript compiler itself. It
//! consumes a serialized reflection tree in the typedoc JSON shape, handed
//! over by a [`ReflectionProvider`]. The call is blocking: section ordering
//! needs the full tree before the next file is processed.

use crate::diagnostics::{DocsError, DocsResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Reflection kind of the global container
pub const KIND_GLOBAL: u32 = 0;
/// Reflection kind of an external module container
pub const KIND_EXTERNAL_MODULE: u32 = 1;

/// One node of a reflection tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionNode {
    #[serde(default)]
    pub id: u64,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub kind: u32,

    #[serde(default)]
    pub kind_string: Option<String>,

    #[serde(default)]
    pub flags: ReflectionFlags,

    #[serde(default)]
    pub comment: Option<ReflectionComment>,

    #[serde(default)]
    pub children: Vec<ReflectionNode>,

    #[serde(default)]
    pub signatures: Vec<ReflectionNode>,

    #[serde(default)]
    pub parameters: Vec<ReflectionNode>,

    #[serde(default)]
    pub sources: Vec<SourceReference>,

    #[serde(default, rename = "type")]
    pub type_ref: Option<TypeRef>,

    /// Present on members inherited from a base type
    #[serde(default)]
    pub inherited_from: Option<serde_json::Value>,

    #[serde(default)]
    pub default_value: Option<String>,
}

impl ReflectionNode {
    /// Kind string, empty when absent
    pub fn kind_str(&self) -> &str {
        self.kind_string.as_deref().unwrap_or_default()
    }

    /// Whether the node only groups other nodes (global or external module)
    pub fn is_container(&self) -> bool {
        self.kind == KIND_GLOBAL || self.kind == KIND_EXTERNAL_MODULE
    }

    /// File name of the first source location
    pub fn source_file_name(&self) -> Option<&str> {
        self.sources
            .first()
            .map(|s| s.file_name.rsplit('/').next().unwrap_or(&s.file_name))
    }
}

/// Boolean flags of a reflection, in declaration order (`isExported`, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReflectionFlags(pub IndexMap<String, bool>);

impl ReflectionFlags {
    /// Check a flag such as `isExported`
    pub fn is(&self, flag: &str) -> bool {
        self.0.get(flag).copied().unwrap_or(false)
    }

    pub fn is_exported(&self) -> bool {
        self.is("isExported")
    }

    pub fn is_private(&self) -> bool {
        self.is("isPrivate")
    }

    pub fn is_protected(&self) -> bool {
        self.is("isProtected")
    }

    /// Set flags as a space separated list without the `is` prefix
    pub fn display(&self) -> String {
        self.0
            .iter()
            .filter(|(_, set)| **set)
            .map(|(name, _)| match name.strip_prefix("is") {
                Some(rest) if !rest.is_empty() => {
                    let mut chars = rest.chars();
                    chars
                        .next()
                        .map(|c| c.to_lowercase().chain(chars).collect())
                        .unwrap_or_default()
                }
                _ => name.clone(),
            })
            .collect::<Vec<String>>()
            .join(" ")
    }
}

/// Doc comment of a reflection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionComment {
    #[serde(default)]
    pub short_text: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub returns: Option<String>,
}

/// Source location of a reflection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReference {
    pub file_name: String,
    #[serde(default)]
    pub line: u32,
}

/// A type expression
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    /// `intrinsic`, `reference`, `reflection`, `union`, `array`, ...
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub name: Option<String>,

    /// Literal value for literal types
    #[serde(default)]
    pub value: Option<serde_json::Value>,

    #[serde(default)]
    pub types: Vec<TypeRef>,

    #[serde(default)]
    pub element_type: Option<Box<TypeRef>>,

    #[serde(default)]
    pub type_arguments: Vec<TypeRef>,

    /// Anonymous declaration for `reflection` types
    #[serde(default)]
    pub declaration: Option<Box<ReflectionNode>>,
}

/// Result of one reflection run
#[derive(Debug, Clone, Default)]
pub struct Reflection {
    pub project: ReflectionNode,
    /// Compiler errors; when non-empty the project must not be rendered
    pub errors: Vec<String>,
}

/// Seam to the external TypeScript compiler
pub trait ReflectionProvider {
    /// Reflect the given source files. Blocks until the compiler is done.
    fn reflect(&self, files: &[PathBuf]) -> DocsResult<Reflection>;
}

/// Reflection loaded from typedoc JSON.
///
/// Accepts either a bare project object or `{"project": ..., "errors": [...]}`.
#[derive(Debug, Clone)]
pub struct JsonReflection {
    reflection: Reflection,
}

#[derive(Deserialize)]
struct WrappedReflection {
    project: ReflectionNode,
    #[serde(default)]
    errors: Vec<String>,
}

impl JsonReflection {
    /// Load a reflection from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> DocsResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| DocsError::io(path, e))?;
        Self::from_str(&content)
    }

    /// Parse a reflection from JSON text
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> DocsResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Build a reflection from an already parsed JSON value
    pub fn from_value(value: serde_json::Value) -> DocsResult<Self> {
        let reflection = if value.get("project").is_some() {
            let wrapped: WrappedReflection = serde_json::from_value(value)?;
            Reflection {
                project: wrapped.project,
                errors: wrapped.errors,
            }
        } else {
            Reflection {
                project: serde_json::from_value(value)?,
                errors: Vec::new(),
            }
        };
        Ok(Self { reflection })
    }

    /// Wrap an in-memory project
    pub fn from_project(project: ReflectionNode, errors: Vec<String>) -> Self {
        Self {
            reflection: Reflection { project, errors },
        }
    }
}

impl ReflectionProvider for JsonReflection {
    fn reflect(&self, _files: &[PathBuf]) -> DocsResult<Reflection> {
        Ok(self.reflection.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT: &str = r#"{
        "id": 0, "name": "greeter", "kind": 0, "flags": {},
        "children": [{
            "id": 1, "name": "\"Greeter\"", "kind": 1, "kindString": "External module",
            "flags": {"isExported": true},
            "children": [{
                "id": 2, "name": "Greeter", "kind": 128, "kindString": "Class",
                "flags": {"isExported": true},
                "comment": {"shortText": "Class representing a greeter."},
                "sources": [{"fileName": "test/fixtures/ts/Greeter.ts", "line": 2}]
            }]
        }]
    }"#;

    #[test]
    fn test_parse_bare_project() {
        let reflection = JsonReflection::from_str(PROJECT)
            .unwrap()
            .reflect(&[])
            .unwrap();
        assert!(reflection.errors.is_empty());

        let module = &reflection.project.children[0];
        assert!(module.is_container());
        let class = &module.children[0];
        assert_eq!(class.kind_str(), "Class");
        assert!(class.flags.is_exported());
        assert_eq!(class.source_file_name(), Some("Greeter.ts"));
        assert_eq!(
            class.comment.as_ref().unwrap().short_text.as_deref(),
            Some("Class representing a greeter.")
        );
    }

    #[test]
    fn test_parse_wrapped_project_with_errors() {
        let json = format!(r#"{{"project": {}, "errors": ["TS2304: Cannot find name 'x'."]}}"#, PROJECT);
        let reflection = JsonReflection::from_str(&json).unwrap().reflect(&[]).unwrap();
        assert_eq!(reflection.errors.len(), 1);
        assert_eq!(reflection.project.name, "greeter");
    }

    #[test]
    fn test_flags_display() {
        let flags: ReflectionFlags =
            serde_json::from_str(r#"{"isPrivate": true, "isStatic": true, "isExported": false, "isOptional": true}"#)
                .unwrap();
        assert_eq!(flags.display(), "private static optional");
        assert!(flags.is_private());
        assert!(!flags.is_protected());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            JsonReflection::from_str("{not json"),
            Err(DocsError::Serialization(_))
        ));
    }
}
