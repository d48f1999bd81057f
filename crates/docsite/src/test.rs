//! Test utilities and mock objects for docsite.
//!
//! Builders for raw comments and reflection trees, so tests can describe
//! their inputs without going through the comment scanner or a compiler.
//!
//! # Example
//!
//! ```
//! use docsite::test::{mock_comment, mock_context, mock_tag};
//!
//! let comment = mock_comment("Add two numbers.")
//!     .with_tag(mock_tag("param", "{Number} a").typed(&["Number"], "a", ""))
//!     .with_context(mock_context("function", "add()"));
//! assert_eq!(comment.tags.len(), 1);
//! ```

use crate::js_doc::{CommentContext, RawComment, RawTag};
use crate::reflection::{Reflection, ReflectionFlags, ReflectionNode, SourceReference};
use indexmap::IndexMap;

/// Create a raw comment with a description and no tags.
pub fn mock_comment(description: &str) -> RawComment {
    RawComment::new(description)
}

/// Create a raw tag with only its type and raw string set.
pub fn mock_tag(tag_type: &str, string: &str) -> RawTag {
    RawTag::new(tag_type, string)
}

/// Create a code context such as `("method", "App.prototype.use()")`.
pub fn mock_context(kind: &str, string: &str) -> CommentContext {
    CommentContext::new(kind, string)
}

/// Create an exported reflection node declared in `file_name`.
pub fn mock_reflection_node(
    id: u64,
    name: &str,
    kind: u32,
    kind_string: &str,
    file_name: &str,
) -> ReflectionNode {
    let mut flags = IndexMap::new();
    flags.insert("isExported".to_string(), true);

    ReflectionNode {
        id,
        name: name.to_string(),
        kind,
        kind_string: Some(kind_string.to_string()),
        flags: ReflectionFlags(flags),
        sources: vec![SourceReference {
            file_name: file_name.to_string(),
            line: 1,
        }],
        ..Default::default()
    }
}

/// Wrap nodes in a global project without compiler errors.
pub fn mock_reflection(children: Vec<ReflectionNode>) -> Reflection {
    Reflection {
        project: ReflectionNode {
            id: 0,
            name: "project".to_string(),
            kind: 0,
            children,
            ..Default::default()
        },
        errors: Vec::new(),
    }
}
