//! HTML templating
//!
//! [`HtmlRenderer`] wraps a handlebars registry holding the built-in
//! templates: one for JSDoc annotations, one per TypeScript construct kind,
//! and the page shell. Template selection for constructs is a plain
//! kind-to-name lookup.

pub mod types;

use crate::annotation::Annotation;
use crate::diagnostics::{DocsError, DocsResult};
use crate::typescript::TsConstruct;
use handlebars::{handlebars_helper, Handlebars};
use serde::Serialize;
use types::PageContext;

const ANNOTATION: &str = include_str!("templates/annotation.hbs");
const PARAM_ROW: &str = include_str!("templates/param_row.hbs");
const PAGE: &str = include_str!("templates/page.hbs");
const TS_MEMBER: &str = include_str!("templates/ts_member.hbs");
const TS_SIGNATURE: &str = include_str!("templates/ts_signature.hbs");

const TS_TEMPLATES: [(&str, &str); 8] = [
    ("ts_class", include_str!("templates/ts_class.hbs")),
    ("ts_interface", include_str!("templates/ts_interface.hbs")),
    ("ts_function", include_str!("templates/ts_function.hbs")),
    ("ts_typealias", include_str!("templates/ts_typealias.hbs")),
    ("ts_object", include_str!("templates/ts_object.hbs")),
    ("ts_namespace", include_str!("templates/ts_namespace.hbs")),
    ("ts_variable", include_str!("templates/ts_variable.hbs")),
    ("ts_enum", include_str!("templates/ts_enum.hbs")),
];

handlebars_helper!(join_types: |types: Json| {
    types
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .unwrap_or_default()
});

/// Renders annotations, constructs and the final page
pub struct HtmlRenderer {
    registry: Handlebars<'static>,
}

impl HtmlRenderer {
    /// Create a renderer with the built-in templates
    pub fn new() -> DocsResult<Self> {
        let mut registry = Handlebars::new();
        registry.register_helper("join", Box::new(join_types));

        registry
            .register_partial("param_row", PARAM_ROW)
            .map_err(|e| DocsError::template(e.to_string()))?;
        registry
            .register_partial("ts_member", TS_MEMBER)
            .map_err(|e| DocsError::template(e.to_string()))?;
        registry
            .register_partial("ts_signature", TS_SIGNATURE)
            .map_err(|e| DocsError::template(e.to_string()))?;

        let templates = [("annotation", ANNOTATION), ("page", PAGE)]
            .into_iter()
            .chain(TS_TEMPLATES);
        for (name, source) in templates {
            registry
                .register_template_string(name, source)
                .map_err(|e| DocsError::template(format!("{}: {}", name, e)))?;
        }

        Ok(Self { registry })
    }

    /// Replace a built-in template, e.g. with a project-specific page shell
    pub fn with_template(mut self, name: &str, source: &str) -> DocsResult<Self> {
        self.registry
            .register_template_string(name, source)
            .map_err(|e| DocsError::template(format!("{}: {}", name, e)))?;
        Ok(self)
    }

    /// Render one JSDoc annotation
    pub fn render_annotation(&self, annotation: &Annotation) -> DocsResult<String> {
        self.render("annotation", annotation)
    }

    /// Render one TypeScript construct with the template of its kind
    pub fn render_construct(&self, construct: &TsConstruct) -> DocsResult<String> {
        self.render(construct.kind.template_name(), construct)
    }

    /// Render the page shell
    pub fn render_page(&self, page: &PageContext) -> DocsResult<String> {
        self.render("page", page)
    }

    fn render<T: Serialize>(&self, name: &str, data: &T) -> DocsResult<String> {
        self.registry
            .render(name, data)
            .map_err(|e| DocsError::template(format!("{}: {}", name, e)))
    }
}

/// Append ` <small>v{version}</small>` inside the first `</h1>`
pub fn inject_version(html: &str, version: &str) -> String {
    html.replacen("</h1>", &format!(" <small>v{}</small></h1>", version), 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::ParseContext;
    use crate::section::Section;
    use crate::test::{mock_comment, mock_context, mock_tag};
    use types::NavEntry;

    #[test]
    fn test_builtin_templates_register() {
        assert!(HtmlRenderer::new().is_ok());
    }

    #[test]
    fn test_render_annotation() {
        let mut cx = ParseContext::default();
        let comment = mock_comment("Adds *two* numbers.")
            .with_tag(mock_tag("param", "{Number|String} a").typed(&["Number", "String"], "a", "First"))
            .with_context(mock_context("function", "add()"));
        let annotation = Annotation::new(&comment, "math.js", &mut cx);

        let html = HtmlRenderer::new().unwrap().render_annotation(&annotation).unwrap();
        assert!(html.contains("id=\"add\""));
        assert!(html.contains("<h4 class=\"code-header\">add(a)</h4>"));
        assert!(html.contains("<em>two</em>"));
        assert!(html.contains("<code>Number | String</code>"));
    }

    #[test]
    fn test_render_page_escapes_titles() {
        let page = PageContext {
            title: Some("My <Docs>".to_string()),
            version: None,
            sections: vec![NavEntry::from(&Section::heading("A & B", Some("a-b".into()), 1))],
            content: "<p>raw</p>".to_string(),
        };
        let html = HtmlRenderer::new().unwrap().render_page(&page).unwrap();
        assert!(html.contains("<h1>My &lt;Docs&gt;</h1>"));
        assert!(html.contains("<li class=\"depth-1 heading\"><a href=\"#a-b\">A &amp; B</a></li>"));
        assert!(html.contains("<p>raw</p>"));
    }

    #[test]
    fn test_inject_version() {
        assert_eq!(
            inject_version("<h1>Docs</h1><h1>Other</h1>", "1.2.0"),
            "<h1>Docs <small>v1.2.0</small></h1><h1>Other</h1>"
        );
        assert_eq!(inject_version("<p>no heading</p>", "1.0.0"), "<p>no heading</p>");
    }

    #[test]
    fn test_custom_template() {
        let renderer = HtmlRenderer::new()
            .unwrap()
            .with_template("page", "<title>{{title}}</title>")
            .unwrap();
        let page = PageContext {
            title: Some("T".to_string()),
            version: None,
            sections: vec![],
            content: String::new(),
        };
        assert_eq!(renderer.render_page(&page).unwrap(), "<title>T</title>");
    }
}
