//! JSDoc comment normalization
//!
//! [`Annotation::new`] turns one [`RawComment`] into the canonical model used
//! by the page templates: a kind, a resolved name and header, parameter and
//! return descriptors, and an anchor minted from the run's registry.
//!
//! Tags are processed strictly in source order. `@callback` and `@options`
//! open a scope on an explicit stack, `@param`/`@property` attach to the
//! innermost matching scope, and `@end` closes the innermost one.

use crate::anchor::slug;
use crate::diagnostics::Diagnostic;
use crate::doc::ParseContext;
use crate::js_doc::{parse_types, RawComment, RawTag};
use crate::section::{Section, SectionOrigin};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::{debug, info, warn};

lazy_static! {
    static ref LINK_URL: Regex = Regex::new(r"\{@link (http[^ }]+)\}").unwrap();
    static ref LINK_URL_CAPTION: Regex = Regex::new(r"\{@link (http[^ }]+) ([^}]+)\}").unwrap();
    static ref LINK_SYMBOL: Regex = Regex::new(r"\{@link ([^ }]+)\}").unwrap();
    static ref LINK_SYMBOL_CAPTION: Regex = Regex::new(r"\{@link ([^ }]+) ([^}]+)\}").unwrap();
    static ref SPLIT_FUNCTION_TYPE: Regex = Regex::new(r"^[fF]unction\([^)]+$").unwrap();
    static ref TRAILING_CALL: Regex = Regex::new(r"\(\)\s*$").unwrap();
    static ref ARGS: Regex = Regex::new(r"\(.+\)").unwrap();
    static ref SIGNATURE_TAIL: Regex = Regex::new(r"\(.*$").unwrap();
}

/// Attribute tags stored verbatim on an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrKey {
    Alias,
    Author,
    Class,
    ClassDesc,
    Constant,
    Constructor,
    Deprecated,
    Description,
    Example,
    Header,
    Ignore,
    Instance,
    MemberOf,
    Method,
    Module,
    Name,
    Overview,
    Private,
    Public,
    Static,
    Summary,
}

/// Value of an attribute tag: its text, or a bare flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Flag,
    Text(String),
}

impl AttrValue {
    fn from_tag(tag: &RawTag) -> Self {
        if tag.string.is_empty() {
            AttrValue::Flag
        } else {
            AttrValue::Text(tag.string.clone())
        }
    }

    /// Text of the attribute, `None` for a bare flag
    pub fn text(&self) -> Option<&str> {
        match self {
            AttrValue::Flag => None,
            AttrValue::Text(s) => Some(s),
        }
    }
}

impl Serialize for AttrValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AttrValue::Flag => serializer.serialize_bool(true),
            AttrValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Canonical tag kinds after alias mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    Param,
    Callback,
    Options,
    Property,
    Returns,
    Promise,
    End,
    Attr(AttrKey),
    Unsupported(String),
}

impl TagKind {
    /// Classify a raw tag name.
    ///
    /// `function`, `file`, `prop` and `desc` are aliases of `method`,
    /// `overview`, `property` and `description`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "param" => TagKind::Param,
            "callback" => TagKind::Callback,
            "options" => TagKind::Options,
            "property" | "prop" => TagKind::Property,
            "return" | "returns" => TagKind::Returns,
            "promise" => TagKind::Promise,
            "end" => TagKind::End,
            "alias" => TagKind::Attr(AttrKey::Alias),
            "author" => TagKind::Attr(AttrKey::Author),
            "class" => TagKind::Attr(AttrKey::Class),
            "classdesc" => TagKind::Attr(AttrKey::ClassDesc),
            "constant" => TagKind::Attr(AttrKey::Constant),
            "constructor" => TagKind::Attr(AttrKey::Constructor),
            "deprecated" => TagKind::Attr(AttrKey::Deprecated),
            "description" | "desc" => TagKind::Attr(AttrKey::Description),
            "example" => TagKind::Attr(AttrKey::Example),
            "header" => TagKind::Attr(AttrKey::Header),
            "ignore" => TagKind::Attr(AttrKey::Ignore),
            "instance" => TagKind::Attr(AttrKey::Instance),
            "memberof" => TagKind::Attr(AttrKey::MemberOf),
            "method" | "function" => TagKind::Attr(AttrKey::Method),
            "module" => TagKind::Attr(AttrKey::Module),
            "name" => TagKind::Attr(AttrKey::Name),
            "overview" | "file" => TagKind::Attr(AttrKey::Overview),
            "private" => TagKind::Attr(AttrKey::Private),
            "public" => TagKind::Attr(AttrKey::Public),
            "static" => TagKind::Attr(AttrKey::Static),
            "summary" => TagKind::Attr(AttrKey::Summary),
            other => TagKind::Unsupported(other.to_string()),
        }
    }
}

/// Kind of a normalized annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Class,
    Instance,
    Static,
    Method,
    Function,
    Property,
    Module,
    Overview,
    Declaration,
    Default,
}

impl AnnotationKind {
    fn from_context(kind: &str) -> Self {
        match kind {
            "class" => AnnotationKind::Class,
            "method" => AnnotationKind::Method,
            "function" => AnnotationKind::Function,
            "property" => AnnotationKind::Property,
            _ => AnnotationKind::Declaration,
        }
    }

    /// Whether the kind is rendered one heading level above members
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            AnnotationKind::Class | AnnotationKind::Overview | AnnotationKind::Module
        )
    }

    /// Whether the kind documents something callable
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            AnnotationKind::Instance
                | AnnotationKind::Static
                | AnnotationKind::Method
                | AnnotationKind::Function
        )
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnnotationKind::Class => "class",
            AnnotationKind::Instance => "instance",
            AnnotationKind::Static => "static",
            AnnotationKind::Method => "method",
            AnnotationKind::Function => "function",
            AnnotationKind::Property => "property",
            AnnotationKind::Module => "module",
            AnnotationKind::Overview => "overview",
            AnnotationKind::Declaration => "declaration",
            AnnotationKind::Default => "default",
        };
        f.write_str(s)
    }
}

/// Role of a parameter descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamRole {
    Plain,
    /// Opened by `@callback`; children are the callback's arguments
    Callback,
    /// Opened by `@options`; children are named option properties
    Options,
}

/// A parameter, property, return value or promise resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamDescriptor {
    pub name: Option<String>,
    /// Type names in declaration order, without duplicates
    pub types: Vec<String>,
    /// Rendered HTML
    pub description: String,
    pub role: ParamRole,
    pub children: Vec<ParamDescriptor>,
}

impl ParamDescriptor {
    fn new(name: Option<String>, types: Vec<String>, description: String) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(types.len());
        for t in types {
            let t = if t == "*" { "Any".to_string() } else { t };
            if !unique.contains(&t) {
                unique.push(t);
            }
        }

        Self {
            name,
            types: unique,
            description,
            role: ParamRole::Plain,
            children: Vec::new(),
        }
    }

    /// Type list joined for display
    pub fn type_list(&self) -> String {
        self.types.join(" | ")
    }
}

/// Resolution of an asynchronous result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromiseDescriptor {
    pub name: String,
    /// Types of the first documented argument, when there is one
    pub types: Vec<String>,
    pub resolve: ParamDescriptor,
    /// Set when the resolution could not be inferred
    pub warning: Option<String>,
}

/// Normalized documentation unit for one code comment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub kind: AnnotationKind,
    pub attrs: IndexMap<AttrKey, AttrValue>,
    pub name: Option<String>,
    pub header: Option<String>,
    pub section_title: String,
    pub args: Vec<ParamDescriptor>,
    pub properties: Vec<ParamDescriptor>,
    pub returns: Option<ParamDescriptor>,
    pub promise: Option<PromiseDescriptor>,
    pub ignore: bool,
    pub anchor: Option<String>,
    pub depth: u8,
    /// Rendered description
    pub html: String,
    /// `@class` text, used to detect classes rendered by an earlier file
    pub class_desc: Option<String>,
    pub module_example: Option<String>,
    pub is_constructor: bool,
}

/// Parts of a `{type} name description` tag
struct TagParts {
    types: Option<Vec<String>>,
    name: Option<String>,
    description: String,
}

/// Split a tag string on whitespace into types, name and description
fn parse_tag_for_type(tag: &RawTag) -> TagParts {
    let mut parts = tag.string.split_whitespace();
    let types = parts
        .next()
        .map(|t| parse_types(&t.replace(['{', '}'], "")));
    let name = parts.next().map(String::from);
    let description = parts.collect::<Vec<_>>().join(" ");

    TagParts {
        types,
        name,
        description,
    }
}

/// Parts of a tag, preferring what the extractor already parsed
fn tag_parts(tag: &RawTag) -> TagParts {
    if tag.types.is_none() {
        return parse_tag_for_type(tag);
    }
    TagParts {
        types: tag.types.clone(),
        name: tag.name.clone(),
        description: tag.description.clone().unwrap_or_default(),
    }
}

/// In-progress state while tags are processed
#[derive(Default)]
struct TagState {
    attrs: IndexMap<AttrKey, AttrValue>,
    args: Vec<ParamDescriptor>,
    properties: Vec<ParamDescriptor>,
    returns: Option<ParamDescriptor>,
    promise: Option<PromiseDescriptor>,
    scopes: Vec<ParamDescriptor>,
    last_callback: Option<usize>,
}

impl TagState {
    fn attr_text(&self, key: AttrKey) -> Option<&str> {
        self.attrs.get(&key).and_then(AttrValue::text)
    }

    fn has(&self, key: AttrKey) -> bool {
        self.attrs.contains_key(&key)
    }

    /// Attach a parameter to the innermost open callback, else the annotation
    fn push_param(&mut self, param: ParamDescriptor) {
        match self
            .scopes
            .iter_mut()
            .rev()
            .find(|s| s.role == ParamRole::Callback)
        {
            Some(callback) => callback.children.push(param),
            None => self.args.push(param),
        }
    }

    /// Attach a property to the innermost open options object, else the annotation
    fn push_property(&mut self, property: ParamDescriptor) {
        match self
            .scopes
            .iter_mut()
            .rev()
            .find(|s| s.role == ParamRole::Options)
        {
            Some(options) => options.children.push(property),
            None => self.properties.push(property),
        }
    }

    fn close_scope(&mut self) {
        if let Some(scope) = self.scopes.pop() {
            if scope.role == ParamRole::Callback {
                self.last_callback = Some(scope.children.len());
            }
            self.push_param(scope);
        }
    }

    /// Argument count of the open callback, or of the last closed one
    fn callback_arity(&self) -> Option<usize> {
        self.scopes
            .iter()
            .rev()
            .find(|s| s.role == ParamRole::Callback)
            .map(|s| s.children.len())
            .or(self.last_callback)
    }

    /// Close scopes left open at the end of the tag stream
    fn finish(&mut self) {
        while !self.scopes.is_empty() {
            self.close_scope();
        }
    }
}

impl Annotation {
    /// Normalize one raw comment of `file_name`.
    pub fn new(comment: &RawComment, file_name: &str, cx: &mut ParseContext) -> Self {
        let mut state = TagState::default();
        let context_string = comment.context_string().unwrap_or_default().to_string();

        for tag in &comment.tags {
            if tag.tag_type.is_empty() {
                continue;
            }
            apply_tag(&mut state, tag, &context_string, file_name, cx);
        }
        state.finish();

        let mut annotation = Annotation {
            kind: AnnotationKind::Default,
            attrs: IndexMap::new(),
            name: None,
            header: None,
            section_title: String::new(),
            args: Vec::new(),
            properties: Vec::new(),
            returns: None,
            promise: None,
            ignore: false,
            anchor: None,
            depth: cx.code_section_depth,
            html: String::new(),
            class_desc: None,
            module_example: None,
            is_constructor: false,
        };

        let ignorable = comment.ignore || comment.full_description().contains("@ignore");
        if state.has(AttrKey::Ignore) || state.has(AttrKey::Private) || ignorable {
            annotation.ignore = true;
            annotation.attrs = state.attrs;
            return annotation;
        }

        annotation.is_constructor = state.has(AttrKey::Class) || state.has(AttrKey::Constructor);
        annotation.kind = determine_kind(&state, comment);

        rejoin_function_types(&mut state.args);

        let mut description = state
            .attr_text(AttrKey::Description)
            .map(String::from)
            .or_else(|| Some(comment.full_description().to_string()))
            .filter(|d| !d.is_empty());

        let mut name = comment.context_string().map(String::from);
        if name.is_none()
            && matches!(annotation.kind, AnnotationKind::Instance | AnnotationKind::Static)
        {
            let member_of = state.attr_text(AttrKey::MemberOf).map(String::from);
            let method = state.attr_text(AttrKey::Method).map(String::from);
            let (Some(member_of), Some(method)) = (member_of, method) else {
                debug!(file = %file_name, "member without @memberof or method name, skipping");
                annotation.ignore = true;
                annotation.attrs = state.attrs;
                return annotation;
            };
            let separator = if annotation.kind == AnnotationKind::Instance {
                ".prototype."
            } else {
                "."
            };
            name = Some(format!("{}{}{}()", member_of, separator, method));
        }
        if let Some(explicit) = state
            .attr_text(AttrKey::Name)
            .or_else(|| state.attr_text(AttrKey::Alias))
        {
            name = Some(explicit.to_string());
        }

        let mut header: Option<String> = None;
        let mut anchor_seed: Option<String> = None;

        if let Some(class) = state.attr_text(AttrKey::Class) {
            header = Some(class.to_string());
            anchor_seed = Some(class.to_string());
        } else if annotation.kind == AnnotationKind::Overview {
            header = Some(file_name.to_string());
            anchor_seed = Some(format!("file-{}", file_name));
            if description.is_none() {
                description = state.attr_text(AttrKey::Overview).map(String::from);
            }
        } else if let (AnnotationKind::Module, Some(module)) =
            (annotation.kind, state.attr_text(AttrKey::Module))
        {
            header = Some(format!("Module: {}", module));
            anchor_seed = Some(format!("module-{}", module));
            annotation.module_example = Some(module_example(module, annotation.is_constructor));
        } else if let (false, Some(n)) = (state.args.is_empty(), name.as_deref()) {
            let arg_names = state
                .args
                .iter()
                .map(|a| a.name.as_deref().unwrap_or_default())
                .filter(|n| !n.contains('.'))
                .collect::<Vec<_>>()
                .join(", ");
            let bare = TRAILING_CALL.replace(n, "").to_string();
            header = Some(format!("{}({})", bare, arg_names));
            anchor_seed = Some(bare);
        } else if let Some(n) = name.as_deref() {
            header = Some(n.to_string());
            anchor_seed = Some(n.to_string());
        }

        let mut section_title = None;
        if annotation.kind == AnnotationKind::Class {
            section_title = header.as_ref().map(|h| format!("Class: {}", h));
            annotation.class_desc = state.attr_text(AttrKey::Class).map(String::from);
        }
        if annotation.kind == AnnotationKind::Instance {
            header = header.map(|h| lowercase_first(&h.replacen(".prototype.", ".", 1)));
        }
        if let Some(explicit) = state.attr_text(AttrKey::Header) {
            header = Some(explicit.to_string());
            anchor_seed = Some(SIGNATURE_TAIL.replace(explicit, "").to_string());
        }

        let Some(mut header) = header else {
            debug!(file = %file_name, "could not resolve a header, skipping comment");
            annotation.ignore = true;
            annotation.attrs = state.attrs;
            return annotation;
        };

        annotation.html = match description {
            Some(desc) => cx.markdown.render(&rewrite_links(&desc)),
            None => {
                if let Some(n) = name.as_deref() {
                    info!(file = %file_name, name = %n, "no description found");
                    cx.diagnostics.add(
                        Diagnostic::info(format!("No description found for {}", n))
                            .in_file(file_name),
                    );
                }
                String::new()
            }
        };

        if annotation.kind == AnnotationKind::Class && !header.starts_with("var") {
            header = format!("Class: {}", header);
        }

        annotation.section_title =
            remove_args(section_title.as_deref().unwrap_or(header.as_str()));
        annotation.anchor = anchor_seed.and_then(|seed| cx.registry.unique_anchor(&seed));
        if annotation.kind.is_container() {
            annotation.depth = cx.code_section_depth.saturating_sub(1);
        }

        annotation.header = Some(header);
        annotation.name = name;
        annotation.attrs = state.attrs;
        annotation.args = state.args;
        annotation.properties = state.properties;
        annotation.returns = state.returns;
        annotation.promise = state.promise;
        annotation
    }

    /// Table-of-contents entry, absent for ignored annotations
    pub fn section(&self) -> Option<Section> {
        if self.ignore {
            return None;
        }
        Some(Section::new(
            self.section_title.clone(),
            self.anchor.clone(),
            self.depth,
            SectionOrigin::Comment(self.kind),
        ))
    }

    /// Trailing dotted segment of the section title, used to order class members
    pub fn sort_key(&self) -> &str {
        self.section_title
            .rsplit('.')
            .next()
            .unwrap_or(&self.section_title)
    }

    /// Attribute text, `None` when absent or a bare flag
    pub fn attr(&self, key: AttrKey) -> Option<&str> {
        self.attrs.get(&key).and_then(AttrValue::text)
    }
}

/// Dispatch one tag to its handler
fn apply_tag(
    state: &mut TagState,
    tag: &RawTag,
    context: &str,
    file_name: &str,
    cx: &mut ParseContext,
) {
    match TagKind::from_name(&tag.tag_type) {
        TagKind::Param => {
            let parts = tag_parts(tag);
            let desc = parts.description.strip_prefix('-').unwrap_or(&parts.description);
            let param = ParamDescriptor::new(
                parts.name,
                parts.types.unwrap_or_default(),
                render_tag_description(cx, desc),
            );
            state.push_param(param);
        }
        TagKind::Callback | TagKind::Options => {
            let parts = parse_tag_for_type(tag);
            let mut scope = ParamDescriptor::new(
                parts.name,
                parts.types.unwrap_or_default(),
                render_tag_description(cx, &parts.description),
            );
            scope.role = if tag.tag_type == "callback" {
                ParamRole::Callback
            } else {
                ParamRole::Options
            };
            state.scopes.push(scope);
        }
        TagKind::Property => {
            let parts = tag_parts(tag);
            let property = ParamDescriptor::new(
                parts.name,
                parts.types.unwrap_or_default(),
                render_tag_description(cx, &parts.description),
            );
            state.push_property(property);
        }
        TagKind::Returns => {
            let parts = result_parts(tag);
            state.returns = Some(ParamDescriptor::new(
                Some(parts.name.unwrap_or_else(|| "result".to_string())),
                parts.types.unwrap_or_default(),
                render_tag_description(cx, &parts.description),
            ));
        }
        TagKind::Promise => {
            let promise = resolve_promise(state, tag, context, file_name, cx);
            state.promise = Some(promise);
        }
        TagKind::End => state.close_scope(),
        TagKind::Attr(key) => {
            state.attrs.insert(key, AttrValue::from_tag(tag));
        }
        TagKind::Unsupported(name) => {
            debug!(tag = %name, file = %file_name, "tag not supported");
        }
    }
}

/// Parts of a `@returns`/`@promise` tag; a parsed name is folded back into
/// the description
fn result_parts(tag: &RawTag) -> TagParts {
    if tag.types.is_some() {
        return tag_parts(tag);
    }
    let mut parts = parse_tag_for_type(tag);
    if let Some(name) = parts.name.take() {
        parts.description = format!("{} {}", name, parts.description)
            .trim_end()
            .to_string();
    }
    parts
}

fn resolve_promise(
    state: &TagState,
    tag: &RawTag,
    context: &str,
    file_name: &str,
    cx: &mut ParseContext,
) -> PromiseDescriptor {
    let parts = result_parts(tag);
    let mut resolve = ParamDescriptor::new(Some("resolve".to_string()), Vec::new(), String::new());
    let mut warning = None;
    let mut described = false;

    match state.callback_arity() {
        Some(1) => {
            info!(context = %context, "resolve object not found");
            resolve.types = vec!["undefined".to_string()];
            resolve.description = "The resolve handler does not receive any arguments.".to_string();
            described = true;
        }
        Some(2) => {
            let value = state
                .scopes
                .iter()
                .rev()
                .find(|s| s.role == ParamRole::Callback)
                .or_else(|| last_closed_callback(&state.args))
                .and_then(|cb| cb.children.get(1));
            if let Some(value) = value {
                resolve.types = value.types.clone();
                resolve.description = value.description.clone();
                described = true;
            }
        }
        Some(_) => {
            let message = format!("Promise cannot be resolved in {}", context);
            warn!(file = %file_name, "{}", message);
            cx.diagnostics.add(
                Diagnostic::warning(message.clone())
                    .in_file(file_name)
                    .with_code("promise"),
            );
            warning = Some(message);
        }
        None => {}
    }

    if !parts.description.is_empty() {
        let explicit = ParamDescriptor::new(None, parts.types.clone().unwrap_or_default(), String::new());
        resolve.types = explicit.types;
        resolve.description = render_tag_description(cx, &parts.description);
        described = true;
    }

    if !described {
        info!(context = %context, "description for resolve object not found");
    }

    let name = parts.name.unwrap_or_else(|| "promise".to_string());
    PromiseDescriptor {
        name,
        types: state
            .args
            .first()
            .map(|a| a.types.clone())
            .unwrap_or_default(),
        resolve,
        warning,
    }
}

/// Most recently closed callback among the annotation's arguments
fn last_closed_callback(args: &[ParamDescriptor]) -> Option<&ParamDescriptor> {
    args.iter().rev().find(|a| a.role == ParamRole::Callback)
}

fn render_tag_description(cx: &ParseContext, description: &str) -> String {
    let description = description.trim();
    if description.is_empty() {
        String::new()
    } else {
        cx.markdown.render(description)
    }
}

/// Decision list for the annotation kind, first match wins
fn determine_kind(state: &TagState, comment: &RawComment) -> AnnotationKind {
    let mut kind = if state.has(AttrKey::Static) {
        AnnotationKind::Static
    } else if state.has(AttrKey::Module) {
        AnnotationKind::Module
    } else if state.has(AttrKey::Overview) {
        AnnotationKind::Overview
    } else if state.has(AttrKey::Instance) {
        AnnotationKind::Instance
    } else if state.has(AttrKey::Class) {
        AnnotationKind::Class
    } else if !state.args.is_empty() {
        AnnotationKind::Method
    } else if let Some(ctx) = comment.context_type() {
        AnnotationKind::from_context(ctx)
    } else {
        AnnotationKind::Default
    };

    let on_prototype = comment
        .context_string()
        .is_some_and(|s| s.contains(".prototype."));
    if kind == AnnotationKind::Default || (kind == AnnotationKind::Method && on_prototype) {
        kind = AnnotationKind::Instance;
    }

    kind
}

/// Re-join `function(A,B)` types that were split on their commas
fn rejoin_function_types(args: &mut [ParamDescriptor]) {
    for arg in args.iter_mut() {
        let split = arg
            .types
            .first()
            .is_some_and(|t| SPLIT_FUNCTION_TYPE.is_match(t));
        if split {
            arg.types = vec![arg.types.join(", ")];
        }
    }
}

/// Rewrite `{@link ...}` references to Markdown links
pub fn rewrite_links(description: &str) -> String {
    let desc = LINK_URL.replace_all(description, "[${1}](${1})");
    let desc = LINK_URL_CAPTION.replace_all(&desc, "[${2}](${1})");
    let desc = LINK_SYMBOL.replace_all(&desc, |caps: &Captures| {
        format!("[{}](#{})", &caps[1], slug(&caps[1]))
    });
    let desc = LINK_SYMBOL_CAPTION.replace_all(&desc, |caps: &Captures| {
        format!("[{}](#{})", &caps[2], slug(&caps[1]))
    });
    desc.into_owned()
}

/// `name = require('name')` usage line for a module
fn module_example(module: &str, constructor: bool) -> String {
    let binding = if constructor {
        pascal_case(module)
    } else {
        camel_case(module)
    };
    format!("{} = require('{}')", binding, module)
}

fn camel_case(s: &str) -> String {
    lowercase_first(&pascal_case(s))
}

fn pascal_case(s: &str) -> String {
    s.split(|c: char| c == '-' || c == '_' || c == '.' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Drop an argument list from a title
fn remove_args(s: &str) -> String {
    ARGS.replace(s, "").replacen("()", "", 1)
}
