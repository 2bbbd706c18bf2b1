// Python parser using tree-sitter

use crate::error::{Error, Result};
use crate::parser::ast::*;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};

/// Parser for Python source files
pub struct PythonParser {
    parser: Parser,
}

impl std::fmt::Debug for PythonParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PythonParser").finish_non_exhaustive()
    }
}

impl PythonParser {
    /// Create a new Python parser
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_python::language();
        parser
            .set_language(&language)
            .map_err(|e| Error::Parser(format!("Failed to set Python language: {}", e)))?;
        Ok(Self { parser })
    }

    /// Parse a Python file, naming the module by its location under `root`
    pub fn parse_file(&mut self, path: &Path, root: &Path) -> Result<ParsedFile> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))
        })?;

        let relative = path.strip_prefix(root).unwrap_or(path);
        self.parse_source(&source, relative.to_path_buf(), module_name_for(relative))
    }

    /// Parse Python source code.
    ///
    /// `path` decides whether the module is a package: an `__init__.py`
    /// resolves its relative imports against itself.
    pub fn parse_source(
        &mut self,
        source: &str,
        path: PathBuf,
        module_name: String,
    ) -> Result<ParsedFile> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| Error::parser("Failed to parse source"))?;

        let root = tree.root_node();
        if root.has_error() {
            let line = first_error_line(&root).unwrap_or(1);
            return Err(Error::parse(path, format!("syntax error near line {}", line)));
        }

        let bytes = source.as_bytes();
        let is_package = path.file_name().is_some_and(|n| n == "__init__.py");
        let mut file = ParsedFile::new(path, module_name);
        file.is_package = is_package;
        file.docstring = block_docstring(&root, bytes);

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "import_statement" => file.imports.extend(parse_import(&child, bytes)),
                "import_from_statement" => {
                    if let Some(import) = parse_import_from(&child, bytes) {
                        file.imports.push(import);
                    }
                }
                "class_definition" | "decorated_definition" => {
                    if let Some(Definition::Class(class)) = parse_definition(&child, bytes) {
                        file.classes.push(class);
                    }
                }
                _ => {}
            }
        }

        Ok(file)
    }
}

/// Derive the dotted module name for a path relative to the source root.
/// A package `__init__.py` is named after its directory.
pub fn module_name_for(relative: &Path) -> String {
    let mut parts: Vec<String> = relative
        .iter()
        .map(|s| s.to_string_lossy().to_string())
        .collect();

    if let Some(last) = parts.last_mut() {
        if let Some(stem) = last.strip_suffix(".py") {
            *last = stem.to_string();
        }
    }

    if parts.last().is_some_and(|p| p == "__init__") {
        parts.pop();
    }

    parts.join(".")
}

fn first_error_line(node: &Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .iter()
        .filter(|c| c.has_error())
        .find_map(|c| first_error_line(c))
}

enum Definition {
    Class(Class),
    Function(Function),
}

/// Parse a class or function, unwrapping decorators
fn parse_definition(node: &Node, source: &[u8]) -> Option<Definition> {
    let (decorators, inner) = if node.kind() == "decorated_definition" {
        (
            extract_decorators(node, source),
            node.child_by_field_name("definition")?,
        )
    } else {
        (Vec::new(), *node)
    };

    match inner.kind() {
        "class_definition" => parse_class(&inner, source, decorators).map(Definition::Class),
        "function_definition" => {
            let mut func = parse_function(&inner, source)?;
            func.decorators = decorators;
            func.line_start = node.start_position().row + 1;
            Some(Definition::Function(func))
        }
        _ => None,
    }
}

/// Text of a node, or an empty string on invalid UTF-8
fn text<'a>(node: &Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// Docstring of a module or block: the first statement, if it is a string
fn block_docstring(block: &Node, source: &[u8]) -> Option<String> {
    let mut cursor = block.walk();
    let first = block
        .named_children(&mut cursor)
        .find(|c| c.kind() != "comment")?;
    string_statement(&first, source)
}

/// If the statement is a bare string expression, return its cleaned content
fn string_statement(stmt: &Node, source: &[u8]) -> Option<String> {
    if stmt.kind() != "expression_statement" || stmt.named_child_count() != 1 {
        return None;
    }
    let expr = stmt.named_child(0)?;
    if expr.kind() != "string" {
        return None;
    }
    Some(clean_docstring(text(&expr, source)))
}

/// Strip prefix and quotes from a string literal and normalize indentation
fn clean_docstring(literal: &str) -> String {
    let unprefixed = literal.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    let body = ["\"\"\"", "'''", "\"", "'"]
        .iter()
        .find_map(|q| {
            unprefixed
                .strip_prefix(q)
                .and_then(|s| s.strip_suffix(q))
        })
        .unwrap_or(unprefixed);

    let mut lines = body.lines();
    let first = lines.next().unwrap_or("").trim().to_string();
    let rest: Vec<&str> = lines.collect();
    let indent = rest
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned = vec![first];
    cleaned.extend(rest.iter().map(|l| {
        l.get(indent..)
            .map(str::trim_end)
            .unwrap_or_else(|| l.trim())
            .to_string()
    }));

    cleaned.join("\n").trim().to_string()
}

/// Parse `import a.b` / `import a.b as c`, one entry per imported module
fn parse_import(node: &Node, source: &[u8]) -> Vec<Import> {
    let line = node.start_position().row + 1;
    let mut imports = Vec::new();

    let mut cursor = node.walk();
    for child in node.children_by_field_name("name", &mut cursor) {
        let name = match child.kind() {
            "dotted_name" => ImportedName::new(text(&child, source)),
            "aliased_import" => {
                let module = child
                    .child_by_field_name("name")
                    .map(|n| text(&n, source))
                    .unwrap_or("");
                let alias = child
                    .child_by_field_name("alias")
                    .map(|n| text(&n, source))
                    .unwrap_or("");
                ImportedName::with_alias(module, alias)
            }
            _ => continue,
        };
        imports.push(Import {
            module: name.name.clone(),
            names: vec![name],
            kind: ImportKind::Direct,
            line,
        });
    }

    imports
}

/// Parse `from x import y`, including relative forms
fn parse_import_from(node: &Node, source: &[u8]) -> Option<Import> {
    let line = node.start_position().row + 1;
    let module_node = node.child_by_field_name("module_name")?;

    let (module, level) = if module_node.kind() == "relative_import" {
        let mut level = 0;
        let mut module = String::new();
        let mut cursor = module_node.walk();
        for inner in module_node.children(&mut cursor) {
            match inner.kind() {
                "import_prefix" => {
                    level = text(&inner, source).chars().filter(|c| *c == '.').count()
                }
                "dotted_name" => module = text(&inner, source).to_string(),
                _ => {}
            }
        }
        (module, level)
    } else {
        (text(&module_node, source).to_string(), 0)
    };

    let mut names = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.id() == module_node.id() {
            continue;
        }
        match child.kind() {
            "dotted_name" => names.push(ImportedName::new(text(&child, source))),
            "aliased_import" => {
                let name = child.child_by_field_name("name").map(|n| text(&n, source));
                let alias = child.child_by_field_name("alias").map(|n| text(&n, source));
                if let (Some(name), Some(alias)) = (name, alias) {
                    names.push(ImportedName::with_alias(name, alias));
                }
            }
            "wildcard_import" => names.push(ImportedName::new("*")),
            _ => {}
        }
    }

    let kind = if level > 0 {
        ImportKind::Relative { level }
    } else {
        ImportKind::From
    };

    Some(Import {
        module,
        names,
        kind,
        line,
    })
}

/// Parse a class definition
fn parse_class(node: &Node, source: &[u8], decorators: Vec<String>) -> Option<Class> {
    let name = text(&node.child_by_field_name("name")?, source);
    let mut class = Class::new(name, node.start_position().row + 1);
    class.line_end = node.end_position().row + 1;
    class.decorators = decorators;

    if let Some(args) = node.child_by_field_name("superclasses") {
        class.bases = extract_bases(&args, source);
    }

    if let Some(body) = node.child_by_field_name("body") {
        class.docstring = block_docstring(&body, source);
        parse_class_body(&body, source, &mut class);
    }

    Some(class)
}

/// Extract positional base classes from an argument list
fn extract_bases(node: &Node, source: &[u8]) -> Vec<String> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| matches!(c.kind(), "identifier" | "attribute" | "subscript" | "call"))
        .map(|c| text(&c, source).to_string())
        .collect()
}

/// Collect methods and attributes from a class body
fn parse_class_body(body: &Node, source: &[u8], class: &mut Class) {
    let mut cursor = body.walk();
    let statements: Vec<Node> = body.named_children(&mut cursor).collect();

    for (i, stmt) in statements.iter().enumerate() {
        match stmt.kind() {
            "function_definition" | "decorated_definition" => {
                if let Some(Definition::Function(method)) = parse_definition(stmt, source) {
                    class.methods.push(method);
                }
            }
            "expression_statement" => {
                if let Some(mut attr) = parse_class_attribute(stmt, source) {
                    attr.docstring = statements
                        .get(i + 1)
                        .and_then(|next| string_statement(next, source));
                    class.attributes.push(attr);
                }
            }
            _ => {}
        }
    }
}

/// Parse `name = value`, `name: type` or `name: type = value` in a class body
fn parse_class_attribute(stmt: &Node, source: &[u8]) -> Option<Attribute> {
    let assignment = stmt.named_child(0)?;
    if assignment.kind() != "assignment" {
        return None;
    }

    let left = assignment.child_by_field_name("left")?;
    if left.kind() != "identifier" {
        return None;
    }

    let mut attr = Attribute::new(text(&left, source), assignment.start_position().row + 1);
    attr.type_hint = assignment
        .child_by_field_name("type")
        .map(|t| text(&t, source).to_string());
    Some(attr)
}

/// Parse a bare function definition node
fn parse_function(node: &Node, source: &[u8]) -> Option<Function> {
    let name = text(&node.child_by_field_name("name")?, source);
    let mut func = Function::new(name, node.start_position().row + 1);
    func.line_end = node.end_position().row + 1;
    func.is_async = has_async_keyword(node);

    if let Some(params) = node.child_by_field_name("parameters") {
        func.parameters = text(&params, source).to_string();
    }
    func.return_type = node
        .child_by_field_name("return_type")
        .map(|r| text(&r, source).to_string());
    if let Some(body) = node.child_by_field_name("body") {
        func.docstring = block_docstring(&body, source);
    }

    Some(func)
}

/// Check if a function_definition node has an async keyword
fn has_async_keyword(node: &Node) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == "async");
    found
}

/// Extract decorators from a decorated definition
fn extract_decorators(node: &Node, source: &[u8]) -> Vec<String> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|c| c.kind() == "decorator")
        .map(|c| {
            // Remove @ prefix and any arguments
            let dec = text(&c, source).trim_start_matches('@');
            let dec = dec.split('(').next().unwrap_or(dec);
            dec.trim().to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParsedFile {
        let mut parser = PythonParser::new().unwrap();
        parser
            .parse_source(source, PathBuf::from("test.py"), "test".to_string())
            .unwrap()
    }

    #[test]
    fn test_parser_new() {
        assert!(PythonParser::new().is_ok());
    }

    #[test]
    fn test_empty_file() {
        let file = parse("");
        assert!(file.is_empty());
    }

    #[test]
    fn test_syntax_error_reported() {
        let mut parser = PythonParser::new().unwrap();
        let result = parser.parse_source(
            "class Broken(:\n    pass\n",
            PathBuf::from("broken.py"),
            "broken".to_string(),
        );
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_module_docstring() {
        let file = parse("\"\"\"Module docstring.\"\"\"\n");
        assert_eq!(file.docstring, Some("Module docstring.".to_string()));
    }

    #[test]
    fn test_simple_import() {
        let file = parse("import os, asyncio as aio");
        assert_eq!(file.imports.len(), 2);
        assert_eq!(file.imports[0].module, "os");
        assert_eq!(file.imports[1].names[0].used_name(), "aio");
        assert_eq!(file.imports[1].kind, ImportKind::Direct);
    }

    #[test]
    fn test_from_import() {
        let file = parse("from shop.base import Base, Mixin as M");
        assert_eq!(file.imports.len(), 1);
        let import = &file.imports[0];
        assert_eq!(import.module, "shop.base");
        assert_eq!(import.kind, ImportKind::From);
        assert_eq!(import.names.len(), 2);
        assert_eq!(import.names[1].name, "Mixin");
        assert_eq!(import.names[1].used_name(), "M");
    }

    #[test]
    fn test_relative_import() {
        let file = parse("from ..utils import helper\nfrom . import widget");
        assert_eq!(file.imports.len(), 2);
        assert_eq!(file.imports[0].kind, ImportKind::Relative { level: 2 });
        assert_eq!(file.imports[0].module, "utils");
        assert_eq!(file.imports[1].kind, ImportKind::Relative { level: 1 });
        assert_eq!(file.imports[1].module, "");
        assert_eq!(file.imports[1].names[0].name, "widget");
    }

    #[test]
    fn test_async_method() {
        let file = parse("class Client:\n    async def fetch(self, url): pass\n");
        let fetch = &file.classes[0].methods[0];
        assert!(fetch.is_async);
        assert_eq!(fetch.parameters, "(self, url)");
    }

    #[test]
    fn test_module_level_functions_skipped() {
        let file = parse("def setup(bot): pass\n\n@cache\ndef helper(): pass\n\nMAX_SIZE = 100\n");
        assert!(file.is_empty());
    }

    #[test]
    fn test_package_detected_from_path() {
        let mut parser = PythonParser::new().unwrap();
        let init = parser
            .parse_source("", PathBuf::from("shop/__init__.py"), "shop".to_string())
            .unwrap();
        assert!(init.is_package);

        let module = parser
            .parse_source("", PathBuf::from("shop/widget.py"), "shop.widget".to_string())
            .unwrap();
        assert!(!module.is_package);
    }

    #[test]
    fn test_class_with_bases() {
        let file = parse("class Gadget(base.Widget, Mixin, metaclass=Meta): pass");
        assert_eq!(file.classes.len(), 1);
        assert_eq!(file.classes[0].bases, vec!["base.Widget", "Mixin"]);
    }

    #[test]
    fn test_class_members() {
        let source = r#"
class Widget:
    """A widget."""

    size: int = 0
    """How big it is."""

    def refresh(self):
        """Refreshes the widget."""

    async def reload(self):
        pass

    @classmethod
    def create(cls):
        pass

    @property
    def area(self):
        return self.size
"#;
        let file = parse(source);
        let class = &file.classes[0];
        assert_eq!(class.docstring, Some("A widget.".to_string()));
        assert_eq!(class.attributes.len(), 1);
        assert_eq!(class.attributes[0].name, "size");
        assert_eq!(class.attributes[0].type_hint, Some("int".to_string()));
        assert_eq!(class.attributes[0].docstring, Some("How big it is.".to_string()));

        let names: Vec<&str> = class.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["refresh", "reload", "create", "area"]);
        assert_eq!(class.methods[0].docstring, Some("Refreshes the widget.".to_string()));
        assert!(class.methods[1].is_async);
        assert!(class.methods[2].is_classmethod());
        assert!(class.methods[3].is_property());
    }

    #[test]
    fn test_decorator_arguments_stripped() {
        let file = parse("class Ping:\n    @commands.command(name='x')\n    async def ping(self, ctx): pass\n");
        let ping = &file.classes[0].methods[0];
        assert_eq!(ping.decorators, vec!["commands.command"]);
        assert!(ping.is_async);
    }

    #[test]
    fn test_multiline_docstring_dedented() {
        let source = "class Channel:\n    def send(self):\n        \"\"\"|coro|\n\n        Sends a message.\n        \"\"\"\n";
        let file = parse(source);
        assert_eq!(
            file.classes[0].methods[0].docstring,
            Some("|coro|\n\nSends a message.".to_string())
        );
    }

    #[test]
    fn test_module_name_for() {
        assert_eq!(module_name_for(Path::new("test.py")), "test");
        assert_eq!(module_name_for(Path::new("shop/ext/widget.py")), "shop.ext.widget");
        assert_eq!(module_name_for(Path::new("shop/__init__.py")), "shop");
    }
}
