// Document trees for documentation pages
//
// Pages are parsed into a flat list of nodes. Attribute table directives
// leave a `Placeholder` behind; the resolution pass in `crate::table` swaps
// each one for an `AttributeTable` node or drops it.

pub mod directive;
mod parser;

pub use directive::{parse_target, split_blocks, Block, Directive};
pub use parser::DocumentParser;

use crate::index::SymbolKind;
use crate::table::TableNode;
use serde::Serialize;

/// Marks where an attribute table for one class belongs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    /// Document the directive appeared in
    pub document: String,
    pub module: String,
    /// Class name as written in the directive
    pub class_name: String,
    /// `module.ClassName`
    pub full_name: String,
}

impl Placeholder {
    pub fn new(document: impl Into<String>, module: impl Into<String>, class_name: impl Into<String>) -> Self {
        let module = module.into();
        let class_name = class_name.into();
        Self {
            document: document.into(),
            full_name: format!("{}.{}", module, class_name),
            module,
            class_name,
        }
    }
}

/// One documented member inside a class block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberDoc {
    /// Anchor id, `module.Class.member`
    pub full_name: String,
    pub name: String,
    pub kind: SymbolKind,
    pub signature: Option<String>,
    pub type_hint: Option<String>,
    pub docstring: Option<String>,
    pub is_async: bool,
    /// Full name of the ancestor that defines it, when inherited
    pub inherited_from: Option<String>,
}

/// Output of an autoclass/autoexception directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDoc {
    /// Anchor id, `module.Class`
    pub full_name: String,
    pub name: String,
    pub kind: SymbolKind,
    pub bases: Vec<String>,
    pub docstring: Option<String>,
    pub members: Vec<MemberDoc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Heading { level: usize, text: String },
    Paragraph { text: String },
    ClassDoc(ClassDoc),
    Placeholder(Placeholder),
    AttributeTable(TableNode),
}

impl Node {
    /// Tag used to pick the node's template
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Heading { .. } => "heading",
            Node::Paragraph { .. } => "paragraph",
            Node::ClassDoc(_) => "class_doc",
            Node::Placeholder(_) => "placeholder",
            Node::AttributeTable(_) => "attribute_table",
        }
    }
}

/// A parsed documentation page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Path relative to the docs root without extension, `/`-separated
    pub name: String,
    /// Text of the first heading
    pub title: Option<String>,
    pub nodes: Vec<Node>,
}

impl Document {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            nodes: Vec::new(),
        }
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Placeholder(p) => Some(p),
            _ => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableNode> {
        self.nodes.iter().filter_map(|n| match n {
            Node::AttributeTable(t) => Some(t),
            _ => None,
        })
    }

    /// Title, falling back to the document name
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// Number of `../` hops from this page back to the output root
    pub fn depth(&self) -> usize {
        self.name.matches('/').count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_full_name() {
        let p = Placeholder::new("api", "shop.widget", "Widget");
        assert_eq!(p.full_name, "shop.widget.Widget");
        assert_eq!(p.class_name, "Widget");
    }

    #[test]
    fn test_node_serializes_with_type_tag() {
        let node = Node::Heading {
            level: 1,
            text: "Widgets".to_string(),
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "heading");
        assert_eq!(json["level"], 1);
        assert_eq!(node.type_name(), "heading");

        let node = Node::Placeholder(Placeholder::new("api", "shop", "Widget"));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "placeholder");
        assert_eq!(json["full_name"], "shop.Widget");
    }

    #[test]
    fn test_document_helpers() {
        let mut doc = Document::new("api/widgets");
        assert_eq!(doc.display_title(), "api/widgets");
        assert_eq!(doc.depth(), 1);

        doc.title = Some("Widgets".to_string());
        doc.nodes.push(Node::Placeholder(Placeholder::new("api/widgets", "shop", "Widget")));
        doc.nodes.push(Node::Paragraph {
            text: "text".to_string(),
        });
        assert_eq!(doc.display_title(), "Widgets");
        assert_eq!(doc.placeholders().count(), 1);
        assert_eq!(doc.tables().count(), 0);
    }
}
