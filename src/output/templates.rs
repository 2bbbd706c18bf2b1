// Template engine for generating HTML output

use crate::document::{Document, Node};
use crate::error::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera, Value};
use tracing::debug;

/// Entry on the generated index page
#[derive(Debug, Clone, Serialize)]
pub struct PageSummary {
    pub name: String,
    pub title: String,
    /// Link relative to the output root
    pub href: String,
    /// Number of attribute tables on the page
    pub tables: usize,
}

impl PageSummary {
    pub fn from_document(document: &Document) -> Self {
        Self {
            name: document.name.clone(),
            title: document.display_title().to_string(),
            href: format!("{}.html", document.name),
            tables: document.tables().count(),
        }
    }
}

/// Template engine wrapping Tera with custom filters and templates.
///
/// Every node type is rendered by a template registered through
/// [`TemplateEngine::register_node`]. Node types without a registered
/// template are left out of the page.
pub struct TemplateEngine {
    tera: Tera,
    node_templates: HashMap<&'static str, String>,
}

impl TemplateEngine {
    /// Create a new template engine with the embedded page templates and the
    /// built-in node renderers
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("base.html", include_str!("../../templates/base.html.tera")),
            ("page.html", include_str!("../../templates/page.html.tera")),
            ("index.html", include_str!("../../templates/index.html.tera")),
        ])?;

        tera.register_filter("pluralize", pluralize);
        tera.register_filter("slugify", slugify_filter);
        tera.register_filter("paragraphs", paragraphs);

        let mut engine = Self {
            tera,
            node_templates: HashMap::new(),
        };

        engine.register_node(
            "heading",
            "nodes/heading.html",
            include_str!("../../templates/nodes/heading.html.tera"),
        )?;
        engine.register_node(
            "paragraph",
            "nodes/paragraph.html",
            include_str!("../../templates/nodes/paragraph.html.tera"),
        )?;
        engine.register_node(
            "class_doc",
            "nodes/class_doc.html",
            include_str!("../../templates/nodes/class_doc.html.tera"),
        )?;

        Ok(engine)
    }

    /// Register the template that renders nodes of `node_type`.
    ///
    /// Registering the same node type again replaces its template.
    pub fn register_node(&mut self, node_type: &'static str, template_name: &str, source: &str) -> Result<()> {
        self.tera.add_raw_template(template_name, source)?;
        self.node_templates.insert(node_type, template_name.to_string());
        Ok(())
    }

    pub fn has_renderer(&self, node_type: &str) -> bool {
        self.node_templates.contains_key(node_type)
    }

    /// Render one node, or `None` when no renderer is registered for its type
    pub fn render_node(&self, node: &Node) -> Result<Option<String>> {
        let Some(template) = self.node_templates.get(node.type_name()) else {
            debug!(node_type = node.type_name(), "no renderer registered, node skipped");
            return Ok(None);
        };

        let mut context = Context::new();
        context.insert("node", node);
        Ok(Some(self.tera.render(template, &context)?))
    }

    /// Render a documentation page
    pub fn render_page(&self, document: &Document, project_name: &str) -> Result<String> {
        let mut fragments = Vec::with_capacity(document.nodes.len());
        for node in &document.nodes {
            if let Some(html) = self.render_node(node)? {
                fragments.push(html);
            }
        }

        let mut context = Context::new();
        context.insert("project_name", project_name);
        context.insert("title", document.display_title());
        context.insert("root", &"../".repeat(document.depth()));
        context.insert("fragments", &fragments);

        Ok(self.tera.render("page.html", &context)?)
    }

    /// Render the index page listing every document
    pub fn render_index(&self, project_name: &str, pages: &[PageSummary]) -> Result<String> {
        let mut context = Context::new();
        context.insert("project_name", project_name);
        context.insert("root", "");
        context.insert("pages", pages);

        Ok(self.tera.render("index.html", &context)?)
    }
}

/// Pluralize a word based on count
fn pluralize(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let count = value.as_u64().unwrap_or(0);
    let singular = args
        .get("singular")
        .and_then(|v| v.as_str())
        .unwrap_or("item");
    let default_plural = format!("{}s", singular);
    let plural = args
        .get("plural")
        .and_then(|v| v.as_str())
        .unwrap_or(&default_plural);

    if count == 1 {
        Ok(Value::String(format!("{} {}", count, singular)))
    } else {
        Ok(Value::String(format!("{} {}", count, plural)))
    }
}

/// Split a docstring into paragraphs, joining wrapped lines
fn paragraphs(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = value.as_str().unwrap_or("");
    let paragraphs = split_paragraphs(text)
        .into_iter()
        .map(Value::String)
        .collect();
    Ok(Value::Array(paragraphs))
}

pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                result.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        result.push(current.join(" "));
    }

    result
}

/// Convert text to URL-friendly slug
fn slugify_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value.as_str().unwrap_or("");
    Ok(Value::String(slugify(s)))
}

/// Convert text to URL-friendly slug
pub fn slugify(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ClassDoc, MemberDoc};
    use crate::index::SymbolKind;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("api/widgets"), "api-widgets");
        assert_eq!(slugify("  spaced  out  "), "spaced-out");
        assert_eq!(slugify("CamelCase"), "camelcase");
    }

    #[test]
    fn test_split_paragraphs() {
        assert_eq!(
            split_paragraphs("First line\n    wrapped.\n\n\nSecond."),
            vec!["First line wrapped.", "Second."]
        );
        assert!(split_paragraphs("").is_empty());
    }

    #[test]
    fn test_pluralize() {
        let mut args = HashMap::new();
        args.insert("singular".to_string(), Value::String("table".to_string()));

        let one = pluralize(&Value::Number(1.into()), &args).unwrap();
        assert_eq!(one.as_str().unwrap(), "1 table");
        let many = pluralize(&Value::Number(3.into()), &args).unwrap();
        assert_eq!(many.as_str().unwrap(), "3 tables");
    }

    #[test]
    fn test_builtin_renderers_registered() {
        let engine = TemplateEngine::new().unwrap();
        assert!(engine.has_renderer("heading"));
        assert!(engine.has_renderer("paragraph"));
        assert!(engine.has_renderer("class_doc"));
        assert!(!engine.has_renderer("attribute_table"));
    }

    #[test]
    fn test_render_heading_escapes_text() {
        let engine = TemplateEngine::new().unwrap();
        let node = Node::Heading {
            level: 2,
            text: "Widgets & <Gadgets>".to_string(),
        };
        let html = engine.render_node(&node).unwrap().unwrap();
        assert!(html.contains("<h2 id=\"widgets-gadgets\">"));
        assert!(html.contains("Widgets &amp; &lt;Gadgets&gt;"));
    }

    #[test]
    fn test_render_class_doc_anchors() {
        let engine = TemplateEngine::new().unwrap();
        let node = Node::ClassDoc(ClassDoc {
            full_name: "shop.Widget".to_string(),
            name: "Widget".to_string(),
            kind: SymbolKind::Class,
            bases: vec!["Base".to_string()],
            docstring: Some("A widget.\n\nSecond paragraph.".to_string()),
            members: vec![MemberDoc {
                full_name: "shop.Widget.size".to_string(),
                name: "size".to_string(),
                kind: SymbolKind::Attribute,
                signature: None,
                type_hint: Some("int".to_string()),
                docstring: None,
                is_async: false,
                inherited_from: None,
            }],
        });
        let html = engine.render_node(&node).unwrap().unwrap();
        assert!(html.contains("id=\"shop.Widget\""));
        assert!(html.contains("id=\"shop.Widget.size\""));
        assert!(html.contains("size: int"));
        assert!(html.contains("<p>Second paragraph.</p>"));
    }

    #[test]
    fn test_unregistered_node_skipped() {
        let engine = TemplateEngine::new().unwrap();
        let node = Node::Placeholder(crate::document::Placeholder::new("api", "shop", "Widget"));
        assert!(engine.render_node(&node).unwrap().is_none());
    }

    #[test]
    fn test_render_page() {
        let engine = TemplateEngine::new().unwrap();
        let mut doc = Document::new("api/widgets");
        doc.title = Some("Widgets".to_string());
        doc.nodes.push(Node::Paragraph {
            text: "Hello.".to_string(),
        });

        let html = engine.render_page(&doc, "Shop").unwrap();
        assert!(html.contains("<title>Widgets - Shop</title>"));
        assert!(html.contains("<p>Hello.</p>"));
        assert!(html.contains("assets&#x2F;style.css") || html.contains("assets/style.css"));
        assert!(html.contains("..&#x2F;") || html.contains("../"));
    }

    #[test]
    fn test_render_index() {
        let engine = TemplateEngine::new().unwrap();
        let pages = vec![PageSummary {
            name: "api".to_string(),
            title: "API Reference".to_string(),
            href: "api.html".to_string(),
            tables: 2,
        }];
        let html = engine.render_index("Shop", &pages).unwrap();
        assert!(html.contains("API Reference"));
        assert!(html.contains("2 attribute tables"));
        assert!(html.contains("id=\"page-api\""));
    }
}
