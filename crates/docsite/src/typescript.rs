//! TypeScript construct extraction
//!
//! Walks a reflection tree, keeps the exported constructs declared in the
//! documented file and turns each into a [`TsConstruct`]: a render-ready view
//! with Markdown already applied to its comments, plus one [`Section`] for the
//! construct and one per eligible member.

use crate::diagnostics::Diagnostic;
use crate::doc::ParseContext;
use crate::markdown::MarkdownRenderer;
use crate::reflection::{Reflection, ReflectionComment, ReflectionNode, TypeRef};
use crate::section::{Section, SectionOrigin};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

/// Depth of top-level construct sections
const CONSTRUCT_DEPTH: u8 = 3;
/// Depth of member sections
const MEMBER_DEPTH: u8 = 4;

/// Kinds of exported constructs that get documented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstructKind {
    Class,
    Interface,
    Function,
    TypeAlias,
    Object,
    Namespace,
    Variable,
    Enum,
}

impl ConstructKind {
    /// Map a reflection kind string to a construct kind
    pub fn from_kind_string(kind: &str) -> Option<Self> {
        match kind {
            "Class" => Some(ConstructKind::Class),
            "Interface" => Some(ConstructKind::Interface),
            "Function" => Some(ConstructKind::Function),
            "Type alias" => Some(ConstructKind::TypeAlias),
            "Object literal" => Some(ConstructKind::Object),
            "Module" | "Namespace" => Some(ConstructKind::Namespace),
            "Variable" => Some(ConstructKind::Variable),
            "Enumeration" => Some(ConstructKind::Enum),
            _ => None,
        }
    }

    /// Name of the template rendering this kind
    pub fn template_name(&self) -> &'static str {
        match self {
            ConstructKind::Class => "ts_class",
            ConstructKind::Interface => "ts_interface",
            ConstructKind::Function => "ts_function",
            ConstructKind::TypeAlias => "ts_typealias",
            ConstructKind::Object => "ts_object",
            ConstructKind::Namespace => "ts_namespace",
            ConstructKind::Variable => "ts_variable",
            ConstructKind::Enum => "ts_enum",
        }
    }

    /// Kinds whose children are documented as members
    pub fn has_members(&self) -> bool {
        matches!(
            self,
            ConstructKind::Class
                | ConstructKind::Interface
                | ConstructKind::Object
                | ConstructKind::Namespace
                | ConstructKind::Enum
        )
    }

    /// Kinds anchored by name; the rest use the reflection id
    fn anchored_by_name(&self) -> bool {
        !matches!(self, ConstructKind::Function)
    }
}

/// Comment text rendered to HTML
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommentHtml {
    pub short_text: String,
    pub text: String,
    pub returns: String,
}

impl CommentHtml {
    fn render(comment: Option<&ReflectionComment>, markdown: &MarkdownRenderer) -> Self {
        let Some(comment) = comment else {
            return Self::default();
        };
        let render = |s: &Option<String>| {
            s.as_deref()
                .filter(|t| !t.is_empty())
                .map(|t| markdown.render(t))
                .unwrap_or_default()
        };
        Self {
            short_text: render(&comment.short_text),
            text: render(&comment.text),
            returns: render(&comment.returns),
        }
    }
}

/// A parameter of a call signature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TsParameter {
    pub name: String,
    pub type_string: String,
    pub flags: String,
    pub default_value: Option<String>,
    pub comment: CommentHtml,
}

/// A call signature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TsSignature {
    pub name: String,
    /// `a: string, b: number`
    pub params: String,
    pub returns: String,
    pub parameters: Vec<TsParameter>,
    pub comment: CommentHtml,
}

/// A documented member of a construct
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TsMember {
    pub kind_string: String,
    pub name: String,
    pub title: String,
    pub anchor: Option<String>,
    pub flags: String,
    pub type_string: Option<String>,
    pub default_value: Option<String>,
    pub signatures: Vec<TsSignature>,
    pub comment: CommentHtml,
}

/// An exported construct ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TsConstruct {
    pub kind: ConstructKind,
    pub name: String,
    pub title: String,
    pub anchor: Option<String>,
    pub flags: String,
    pub type_string: Option<String>,
    pub default_value: Option<String>,
    pub signatures: Vec<TsSignature>,
    pub comment: CommentHtml,
    pub members: Vec<TsMember>,
}

/// Output of extracting one file
#[derive(Debug, Default)]
pub struct TsExtraction {
    pub sections: Vec<Section>,
    pub constructs: Vec<TsConstruct>,
}

/// Extract the exported constructs of `file` from a reflection.
///
/// When the reflection carries compiler errors nothing is extracted; the
/// errors are recorded as `ts-compile` diagnostics instead.
pub fn extract_constructs(
    reflection: &Reflection,
    file: &Path,
    cx: &mut ParseContext,
) -> TsExtraction {
    let mut extraction = TsExtraction::default();

    if !reflection.errors.is_empty() {
        warn!(
            file = %file.display(),
            errors = reflection.errors.len(),
            "TypeScript compilation failed"
        );
        cx.diagnostics.extend(reflection.errors.iter().map(|e| {
            Diagnostic::error(e.clone())
                .in_file(file)
                .with_code("ts-compile")
        }));
        return extraction;
    }

    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut exported = Vec::new();
    find_exported(&reflection.project, &file_name, &mut exported);

    for (kind, node) in exported {
        let anchor = if kind.anchored_by_name() {
            cx.registry.unique_anchor(&node.name)
        } else {
            cx.registry.unique_anchor(&node.id.to_string())
        };
        let title = node_title(node, &node.name);
        extraction.sections.push(Section::new(
            title.clone(),
            anchor.clone(),
            CONSTRUCT_DEPTH,
            SectionOrigin::Construct(node.kind_str().to_string()),
        ));

        let mut members = Vec::new();
        if kind.has_members() {
            for child in &node.children {
                if child.inherited_from.is_some()
                    || child.flags.is_private()
                    || child.flags.is_protected()
                {
                    continue;
                }

                let name = if kind == ConstructKind::Namespace {
                    format!("{}.{}", node.name, child.name)
                } else {
                    child.name.clone()
                };
                let title = node_title(child, &name);

                let sectioned = child.kind_str() != "Property" || kind == ConstructKind::Namespace;
                let anchor = if !sectioned {
                    None
                } else if ConstructKind::from_kind_string(child.kind_str())
                    .is_some_and(|k| k.anchored_by_name())
                {
                    cx.registry.unique_anchor(&name)
                } else {
                    cx.registry.unique_anchor(&child.id.to_string())
                };

                if sectioned {
                    extraction.sections.push(Section::new(
                        title.clone(),
                        anchor.clone(),
                        MEMBER_DEPTH,
                        SectionOrigin::Construct(child.kind_str().to_string()),
                    ));
                }

                members.push(TsMember {
                    kind_string: child.kind_str().to_string(),
                    name,
                    title,
                    anchor,
                    flags: child.flags.display(),
                    type_string: child.type_ref.as_ref().map(type_string),
                    default_value: child.default_value.clone(),
                    signatures: signatures(child, &cx.markdown),
                    comment: CommentHtml::render(child.comment.as_ref(), &cx.markdown),
                });
            }
        }

        debug!(name = %node.name, kind = ?kind, members = members.len(), "extracted construct");
        extraction.constructs.push(TsConstruct {
            kind,
            name: node.name.clone(),
            title,
            anchor,
            flags: node.flags.display(),
            type_string: node.type_ref.as_ref().map(type_string),
            default_value: node.default_value.clone(),
            signatures: signatures(node, &cx.markdown),
            comment: CommentHtml::render(node.comment.as_ref(), &cx.markdown),
            members,
        });
    }

    extraction
}

/// Collect exported constructs declared in `file_name`, descending only into
/// global and external-module containers
fn find_exported<'a>(
    node: &'a ReflectionNode,
    file_name: &str,
    out: &mut Vec<(ConstructKind, &'a ReflectionNode)>,
) {
    if node.is_container() {
        for child in &node.children {
            find_exported(child, file_name, out);
        }
        return;
    }

    let Some(kind) = ConstructKind::from_kind_string(node.kind_str()) else {
        return;
    };
    if node.flags.is_exported() && node.source_file_name() == Some(file_name) {
        out.push((kind, node));
    }
}

fn signatures(node: &ReflectionNode, markdown: &MarkdownRenderer) -> Vec<TsSignature> {
    node.signatures
        .iter()
        .map(|sig| TsSignature {
            name: sig.name.clone(),
            params: comma_separated_params(&sig.parameters),
            returns: sig.type_ref.as_ref().map(type_string).unwrap_or_default(),
            parameters: sig
                .parameters
                .iter()
                .map(|p| TsParameter {
                    name: p.name.clone(),
                    type_string: p.type_ref.as_ref().map(type_string).unwrap_or_default(),
                    flags: p.flags.display(),
                    default_value: p.default_value.clone(),
                    comment: CommentHtml::render(p.comment.as_ref(), markdown),
                })
                .collect(),
            comment: CommentHtml::render(sig.comment.as_ref(), markdown),
        })
        .collect()
}

/// Render a type expression as HTML.
///
/// References link to `#Name`, anonymous reflections print `anonymous`,
/// unions join with ` | ` and arrays append `[]`.
pub fn type_string(t: &TypeRef) -> String {
    let base = match t.kind.as_str() {
        "array" => {
            let element = t.element_type.as_deref().map(type_string).unwrap_or_default();
            if element.contains('|') {
                format!("({})[]", element)
            } else {
                format!("{}[]", element)
            }
        }
        "union" => t.types.iter().map(type_string).collect::<Vec<_>>().join(" | "),
        "reference" => {
            let name = t.name.as_deref().unwrap_or_default();
            format!(
                "<a href=\"#{}\">{}</a>",
                html_escape::encode_double_quoted_attribute(name),
                html_escape::encode_text(name)
            )
        }
        "reflection" => "anonymous".to_string(),
        _ => {
            let text = t
                .name
                .clone()
                .or_else(|| t.value.as_ref().map(|v| v.to_string()))
                .unwrap_or_default();
            html_escape::encode_text(&text).into_owned()
        }
    };

    format!("{}{}", base, type_arguments(t))
}

fn type_arguments(t: &TypeRef) -> String {
    if t.type_arguments.is_empty() {
        return String::new();
    }
    let args = t
        .type_arguments
        .iter()
        .map(type_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("&lt;{}&gt;", args)
}

/// Parameters as `name: type`, function-typed ones as `name: (args) => ret`
pub fn comma_separated_params(params: &[ReflectionNode]) -> String {
    params
        .iter()
        .map(|param| match &param.type_ref {
            Some(t) if t.kind == "reflection" => function_signature(param),
            Some(t) => format!("{}: {}", param.name, type_string(t)),
            None => param.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn function_signature(param: &ReflectionNode) -> String {
    let signature = param
        .type_ref
        .as_ref()
        .and_then(|t| t.declaration.as_deref())
        .and_then(|d| d.signatures.first());

    match signature {
        Some(sig) => format!(
            "{}: ({}) => {}",
            param.name,
            comma_separated_params(&sig.parameters),
            sig.type_ref.as_ref().map(type_string).unwrap_or_default()
        ),
        None => param.name.clone(),
    }
}

/// Navigation title of a node, using `name` as its display name
pub fn node_title(node: &ReflectionNode, name: &str) -> String {
    let kind = match node.kind_str() {
        "Module" | "Namespace" => "Namespace",
        "Enumeration" => "Enum",
        "Enumeration member" => "",
        "Type alias" => "Type",
        "Object literal" => "Object",
        "Variable" => variable_kind(node),
        other => other,
    };

    match kind {
        "Method" | "Constructor" | "Function" => format!("{}()", name),
        "Accessor" | "Property" | "" => name.to_string(),
        kind => format!("{}: {}", kind, name),
    }
}

/// `Const`, `Let` or `Variable`
pub fn variable_kind(node: &ReflectionNode) -> &'static str {
    if node.flags.is("isLet") {
        "Let"
    } else if node.flags.is("isConst") {
        "Const"
    } else {
        "Variable"
    }
}
