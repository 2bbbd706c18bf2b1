// AST types for parsed Python code
//
// Only the parts of a module that documentation needs are kept: classes with
// their bases and members, and the import bindings used to resolve base
// class names.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A parsed Python file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedFile {
    /// File path relative to the source root
    pub path: PathBuf,
    /// Dotted module name derived from the path
    pub module_name: String,
    /// Whether this file is a package `__init__.py`
    pub is_package: bool,
    /// Module-level docstring
    pub docstring: Option<String>,
    /// All imports in the file
    pub imports: Vec<Import>,
    /// All classes defined at module level
    pub classes: Vec<Class>,
}

impl ParsedFile {
    /// Create a new parsed file with basic info
    pub fn new(path: PathBuf, module_name: String) -> Self {
        Self {
            path,
            module_name,
            is_package: false,
            docstring: None,
            imports: Vec::new(),
            classes: Vec::new(),
        }
    }

    /// Check if file defines any classes
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// An import statement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Import {
    /// The module being imported (without leading dots for relative imports)
    pub module: String,
    /// Names bound by the statement
    pub names: Vec<ImportedName>,
    pub kind: ImportKind,
    pub line: usize,
}

/// A single imported name with optional alias
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportedName {
    pub name: String,
    /// Alias from an `as` clause
    pub alias: Option<String>,
}

impl ImportedName {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            alias: None,
        }
    }

    pub fn with_alias(name: &str, alias: &str) -> Self {
        Self {
            name: name.to_string(),
            alias: Some(alias.to_string()),
        }
    }

    /// Get the name as bound in the importing module
    pub fn used_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Kind of import statement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ImportKind {
    /// `import x` or `import x as y`
    Direct,
    /// `from x import y`
    From,
    /// `from . import y` or `from ..x import y`
    Relative { level: usize },
}

impl ImportKind {
    pub fn is_relative(&self) -> bool {
        matches!(self, ImportKind::Relative { .. })
    }
}

/// A class definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Class {
    pub name: String,
    pub docstring: Option<String>,
    /// Base classes as written, keyword arguments excluded
    pub bases: Vec<String>,
    pub decorators: Vec<String>,
    /// Methods in definition order
    pub methods: Vec<Function>,
    /// Class-level attributes in definition order
    pub attributes: Vec<Attribute>,
    pub line_start: usize,
    pub line_end: usize,
}

impl Class {
    pub fn new(name: &str, line_start: usize) -> Self {
        Self {
            name: name.to_string(),
            docstring: None,
            bases: Vec::new(),
            decorators: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
            line_start,
            line_end: line_start,
        }
    }

    /// Check if this appears to be an exception class
    pub fn is_exception(&self) -> bool {
        self.bases
            .iter()
            .any(|b| b.ends_with("Exception") || b.ends_with("Error"))
    }
}

/// A class attribute
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attribute {
    pub name: String,
    /// Type annotation if present
    pub type_hint: Option<String>,
    /// String literal directly following the assignment
    pub docstring: Option<String>,
    pub line: usize,
}

impl Attribute {
    pub fn new(name: &str, line: usize) -> Self {
        Self {
            name: name.to_string(),
            type_hint: None,
            docstring: None,
            line,
        }
    }
}

/// A function or method definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Function {
    pub name: String,
    pub docstring: Option<String>,
    /// Parameter list as written, including parentheses
    pub parameters: String,
    pub return_type: Option<String>,
    /// Decorator names without `@` and call arguments
    pub decorators: Vec<String>,
    pub is_async: bool,
    pub line_start: usize,
    pub line_end: usize,
}

impl Function {
    pub fn new(name: &str, line_start: usize) -> Self {
        Self {
            name: name.to_string(),
            docstring: None,
            parameters: "()".to_string(),
            return_type: None,
            decorators: Vec::new(),
            is_async: false,
            line_start,
            line_end: line_start,
        }
    }

    /// Check if this is a private function (starts with _)
    pub fn is_private(&self) -> bool {
        self.name.starts_with('_') && !self.is_special()
    }

    /// Check if this is a special method (__x__)
    pub fn is_special(&self) -> bool {
        self.name.len() > 4 && self.name.starts_with("__") && self.name.ends_with("__")
    }

    /// Check if this is a property, or a setter/deleter attached to one
    pub fn is_property(&self) -> bool {
        self.decorators.iter().any(|d| {
            d == "property"
                || d.ends_with("cached_property")
                || d.ends_with(".getter")
                || d.ends_with(".setter")
                || d.ends_with(".deleter")
        })
    }

    /// Check if this is a classmethod
    pub fn is_classmethod(&self) -> bool {
        self.decorators.iter().any(|d| d == "classmethod")
    }

    /// Check if this is a staticmethod
    pub fn is_staticmethod(&self) -> bool {
        self.decorators.iter().any(|d| d == "staticmethod")
    }

    /// Get the function signature as a string
    pub fn signature(&self) -> String {
        let ret = self
            .return_type
            .as_ref()
            .map(|r| format!(" -> {}", r))
            .unwrap_or_default();
        let prefix = if self.is_async { "async " } else { "" };
        format!("{}def {}{}{}", prefix, self.name, self.parameters, ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_file_new() {
        let file = ParsedFile::new(PathBuf::from("shop/widget.py"), "shop.widget".to_string());
        assert_eq!(file.module_name, "shop.widget");
        assert!(!file.is_package);
        assert!(file.is_empty());
    }

    #[test]
    fn test_imported_name_used_name() {
        let name = ImportedName::new("Widget");
        assert_eq!(name.used_name(), "Widget");

        let aliased = ImportedName::with_alias("Widget", "W");
        assert_eq!(aliased.used_name(), "W");
    }

    #[test]
    fn test_import_kind_relative() {
        assert!(ImportKind::Relative { level: 1 }.is_relative());
        assert!(!ImportKind::From.is_relative());
    }

    #[test]
    fn test_class_is_exception() {
        let mut class = Class::new("ShopError", 1);
        assert!(!class.is_exception());

        class.bases.push("errors.ClientException".to_string());
        assert!(class.is_exception());
    }

    #[test]
    fn test_function_predicates() {
        let mut func = Function::new("create", 1);
        assert!(!func.is_classmethod());
        func.decorators.push("classmethod".to_string());
        assert!(func.is_classmethod());

        let mut prop = Function::new("size", 1);
        prop.decorators.push("size.setter".to_string());
        assert!(prop.is_property());

        assert!(Function::new("_helper", 1).is_private());
        assert!(!Function::new("__init__", 1).is_private());
        assert!(Function::new("__init__", 1).is_special());
    }

    #[test]
    fn test_function_signature() {
        let mut func = Function::new("reload", 1);
        func.is_async = true;
        func.parameters = "(self, *, force: bool = False)".to_string();
        func.return_type = Some("None".to_string());

        assert_eq!(
            func.signature(),
            "async def reload(self, *, force: bool = False) -> None"
        );
    }

    #[test]
    fn test_serialization() {
        let file = ParsedFile::new(PathBuf::from("test.py"), "test".to_string());
        let json = serde_json::to_string(&file).expect("serialize");
        let parsed: ParsedFile = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, file);
    }
}
