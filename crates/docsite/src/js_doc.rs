//! Raw JSDoc comments
//!
//! This module provides the comment records consumed by the annotation
//! normalizer. The shape follows the dox comment extractor
//! (`{tags, description: {full}, ctx: {type, string}, ignore}`) so records can
//! be deserialized from its JSON output, and [`scan_comments`] produces the
//! same records directly from JavaScript source.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Block comments: `/** doc */`, `/*! ignored */`, `/* plain */`
    static ref BLOCK_COMMENT: Regex = Regex::new(r"(?s)/\*([*!]?)(.*?)\*/").unwrap();

    /// Code context patterns, tried in order on the first code line after a comment
    static ref CTX_FUNCTION: Regex =
        Regex::new(r"^\s*(?:export\s+)?(?:async\s+)?function\s*\*?\s*([\w$]+)\s*\(").unwrap();
    static ref CTX_VAR_FUNCTION: Regex =
        Regex::new(r"^\s*(?:var|let|const)\s+([\w$]+)\s*=\s*(?:async\s+)?function").unwrap();
    static ref CTX_PROTOTYPE_METHOD: Regex =
        Regex::new(r"^\s*([\w$]+)\.prototype\.([\w$]+)\s*=\s*(?:async\s+)?function").unwrap();
    static ref CTX_PROTOTYPE_PROPERTY: Regex =
        Regex::new(r"^\s*([\w$]+)\.prototype\.([\w$]+)\s*=\s*[^\n;]+").unwrap();
    static ref CTX_METHOD: Regex =
        Regex::new(r"^\s*([\w$.]+)\.([\w$]+)\s*=\s*(?:async\s+)?function").unwrap();
    static ref CTX_PROPERTY: Regex =
        Regex::new(r"^\s*([\w$.]+)\.([\w$]+)\s*=\s*[^\n;]+").unwrap();
    static ref CTX_DECLARATION: Regex =
        Regex::new(r"^\s*(?:export\s+)?(?:var|let|const)\s+([\w$]+)\s*=\s*[^\n;]+").unwrap();
    static ref CTX_CLASS: Regex =
        Regex::new(r"^\s*(?:export\s+)?(?:default\s+)?class\s+([\w$]+)").unwrap();
    static ref CTX_CLASS_METHOD: Regex =
        Regex::new(r"^\s*(?:static\s+)?(?:async\s+)?([\w$]+)\s*\([^)]*\)\s*\{").unwrap();
}

/// One raw comment as handed over by the comment extractor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawComment {
    /// Tags in source order
    #[serde(default)]
    pub tags: Vec<RawTag>,

    /// Free-text description
    #[serde(default)]
    pub description: CommentDescription,

    /// Code context following the comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctx: Option<CommentContext>,

    /// Flagged ignorable by the extractor (e.g. `/*! ... */`)
    #[serde(default)]
    pub ignore: bool,
}

impl RawComment {
    /// Create a comment with only a description
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: CommentDescription {
                full: description.into(),
            },
            ..Default::default()
        }
    }

    /// Append a tag
    pub fn with_tag(mut self, tag: RawTag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Set the code context
    pub fn with_context(mut self, ctx: CommentContext) -> Self {
        self.ctx = Some(ctx);
        self
    }

    /// Full description text, empty when absent
    pub fn full_description(&self) -> &str {
        &self.description.full
    }

    /// Source identifier of the documented code (e.g. `Foo.prototype.bar()`)
    pub fn context_string(&self) -> Option<&str> {
        self.ctx
            .as_ref()
            .map(|c| c.string.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Inferred code type (e.g. `method`, `property`, `function`)
    pub fn context_type(&self) -> Option<&str> {
        self.ctx
            .as_ref()
            .map(|c| c.kind.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// Description block of a comment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentDescription {
    /// Whole description text (lightweight markup)
    #[serde(default)]
    pub full: String,
}

/// Code context inferred from the line after a comment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentContext {
    /// Inferred type: `function`, `method`, `property`, `declaration`, `class`
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Identifier as written, e.g. `Foo.prototype.bar()`
    #[serde(default)]
    pub string: String,

    /// Bare name, e.g. `bar`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CommentContext {
    /// Create a context record
    pub fn new(kind: impl Into<String>, string: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            string: string.into(),
            name: None,
        }
    }

    /// Set the bare name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// One `@tag` of a raw comment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTag {
    /// Tag name without `@`
    #[serde(rename = "type")]
    pub tag_type: String,

    /// Everything after the tag name
    #[serde(default)]
    pub string: String,

    /// Parameter name, when the extractor parsed one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Type list from `{A|B}`, when the extractor parsed one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,

    /// Description, when the extractor parsed one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RawTag {
    /// Create a tag with only its raw string
    pub fn new(tag_type: impl Into<String>, string: impl Into<String>) -> Self {
        Self {
            tag_type: tag_type.into(),
            string: string.into(),
            name: None,
            types: None,
            description: None,
        }
    }

    /// Attach pre-parsed types, name and description; empty parts stay unset
    pub fn typed(mut self, types: &[&str], name: &str, description: &str) -> Self {
        self.types = Some(types.iter().map(|t| t.to_string()).collect());
        self.name = Some(name.to_string()).filter(|n| !n.is_empty());
        self.description = Some(description.to_string());
        self
    }
}

/// Extract every block comment of a JavaScript source as a [`RawComment`].
///
/// `param`/`property` tags get their `{types} name description` parts,
/// `returns` tags their `{types} description` parts; all other tags keep only
/// their raw string, to be interpreted by the normalizer.
pub fn scan_comments(source: &str) -> Vec<RawComment> {
    BLOCK_COMMENT
        .captures_iter(source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let marker = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let body = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

            let cleaned = clean_comment_body(body);
            let (description, tags) = split_description_and_tags(&cleaned);
            let ctx = parse_code_context(next_code_line(&source[whole.end()..]));

            Some(RawComment {
                tags,
                description: CommentDescription { full: description },
                ctx,
                ignore: marker == "!",
            })
        })
        .collect()
}

/// Remove `*` gutters and surrounding blank lines from a comment body
fn clean_comment_body(body: &str) -> String {
    let lines: Vec<&str> = body
        .lines()
        .map(|line| {
            let trimmed = line.trim();
            if let Some(rest) = trimmed.strip_prefix("* ") {
                rest
            } else if let Some(rest) = trimmed.strip_prefix('*') {
                rest
            } else {
                trimmed
            }
        })
        .collect();

    lines.join("\n").trim().to_string()
}

/// Split cleaned comment text into its description and tag list
fn split_description_and_tags(text: &str) -> (String, Vec<RawTag>) {
    let mut description = Vec::new();
    let mut raw_tags: Vec<(String, String)> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(after_at) = trimmed.strip_prefix('@') {
            let (name, rest) = match after_at.find(char::is_whitespace) {
                Some(pos) => (&after_at[..pos], after_at[pos..].trim()),
                None => (after_at, ""),
            };
            raw_tags.push((name.to_string(), rest.to_string()));
        } else if let Some((_, content)) = raw_tags.last_mut() {
            if !trimmed.is_empty() {
                if !content.is_empty() {
                    content.push('\n');
                }
                content.push_str(trimmed);
            }
        } else {
            description.push(line);
        }
    }

    let tags = raw_tags
        .into_iter()
        .map(|(name, content)| parse_tag(&name, &content))
        .collect();

    (description.join("\n").trim().to_string(), tags)
}

/// Interpret one tag by its name
fn parse_tag(name: &str, content: &str) -> RawTag {
    let mut tag = RawTag::new(name, content);

    match name {
        "param" | "property" | "prop" => {
            let (types, rest) = split_types(content);
            let (param_name, desc) = split_first_word(rest);
            tag.types = types;
            tag.name = param_name;
            tag.description = Some(desc.to_string());
        }
        "return" | "returns" => {
            let (types, rest) = split_types(content);
            tag.types = types;
            tag.description = Some(rest.to_string());
        }
        _ => {}
    }

    tag
}

/// Split a leading `{A|B}` type expression from the rest of a tag string.
pub fn split_types(content: &str) -> (Option<Vec<String>>, &str) {
    let content = content.trim_start();
    if !content.starts_with('{') {
        return (None, content);
    }

    let mut depth = 0usize;
    for (i, c) in content.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let types = parse_types(&content[1..i]);
                    return (Some(types), content[i + 1..].trim_start());
                }
            }
            _ => {}
        }
    }

    (None, content)
}

/// Split a type expression on `|`, `,` and `/` separators
pub fn parse_types(expr: &str) -> Vec<String> {
    expr.split(['|', ',', '/'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Split "name rest of text" on the first whitespace
fn split_first_word(s: &str) -> (Option<String>, &str) {
    let s = s.trim();
    if s.is_empty() {
        return (None, "");
    }
    match s.find(char::is_whitespace) {
        Some(pos) => (Some(s[..pos].to_string()), s[pos..].trim_start()),
        None => (Some(s.to_string()), ""),
    }
}

/// First non-blank line after a comment, unless another comment starts first
fn next_code_line(rest: &str) -> Option<&str> {
    let line = rest.lines().map(str::trim).find(|l| !l.is_empty())?;
    if line.starts_with("/*") || line.starts_with("//") {
        None
    } else {
        Some(line)
    }
}

/// Infer the code context of a documented line
fn parse_code_context(line: Option<&str>) -> Option<CommentContext> {
    let line = line?;

    if let Some(caps) = CTX_FUNCTION.captures(line) {
        let name = &caps[1];
        return Some(CommentContext::new("function", format!("{}()", name)).with_name(name));
    }
    if let Some(caps) = CTX_VAR_FUNCTION.captures(line) {
        let name = &caps[1];
        return Some(CommentContext::new("function", format!("{}()", name)).with_name(name));
    }
    if let Some(caps) = CTX_PROTOTYPE_METHOD.captures(line) {
        let (cons, name) = (&caps[1], &caps[2]);
        return Some(
            CommentContext::new("method", format!("{}.prototype.{}()", cons, name))
                .with_name(name),
        );
    }
    if let Some(caps) = CTX_PROTOTYPE_PROPERTY.captures(line) {
        let (cons, name) = (&caps[1], &caps[2]);
        return Some(
            CommentContext::new("property", format!("{}.prototype.{}", cons, name))
                .with_name(name),
        );
    }
    if let Some(caps) = CTX_METHOD.captures(line) {
        let (receiver, name) = (&caps[1], &caps[2]);
        return Some(
            CommentContext::new("method", format!("{}.{}()", receiver, name)).with_name(name),
        );
    }
    if let Some(caps) = CTX_PROPERTY.captures(line) {
        let (receiver, name) = (&caps[1], &caps[2]);
        return Some(
            CommentContext::new("property", format!("{}.{}", receiver, name)).with_name(name),
        );
    }
    if let Some(caps) = CTX_DECLARATION.captures(line) {
        let name = &caps[1];
        return Some(CommentContext::new("declaration", name).with_name(name));
    }
    if let Some(caps) = CTX_CLASS.captures(line) {
        let name = &caps[1];
        return Some(CommentContext::new("class", name).with_name(name));
    }
    if let Some(caps) = CTX_CLASS_METHOD.captures(line) {
        let name = &caps[1];
        if !matches!(name, "if" | "for" | "while" | "switch" | "catch" | "function") {
            return Some(CommentContext::new("method", format!("{}()", name)).with_name(name));
        }
    }

    None
}
