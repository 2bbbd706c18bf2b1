// Import bindings for Python modules
//
// Records which local names each module binds through import statements so
// that base class expressions and re-exported classes can be followed to the
// module that actually defines them.

use crate::parser::{ImportKind, ParsedFile};
use std::collections::HashMap;

/// What an imported name refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// A module object (`import a.b as c`, or the top package of `import a.b`)
    Module(String),
    /// A name pulled out of a module (`from m import name`)
    Member { module: String, name: String },
}

impl Binding {
    /// Dotted path of the bound object
    pub fn target(&self) -> String {
        match self {
            Binding::Module(module) => module.clone(),
            Binding::Member { module, name } if module.is_empty() => name.clone(),
            Binding::Member { module, name } => format!("{}.{}", module, name),
        }
    }
}

/// Names bound by one module's import statements
#[derive(Debug, Clone, Default)]
pub struct ImportBindings {
    bindings: HashMap<String, Binding>,
    wildcards: Vec<String>,
}

impl ImportBindings {
    /// Collect bindings from a parsed file. Later imports shadow earlier ones.
    pub fn from_file(file: &ParsedFile) -> Self {
        let mut result = Self::default();

        for import in &file.imports {
            let module = match &import.kind {
                ImportKind::Relative { level } => {
                    match resolve_relative(&file.module_name, file.is_package, *level, &import.module) {
                        Some(m) => m,
                        None => continue,
                    }
                }
                _ => import.module.clone(),
            };

            for name in &import.names {
                match import.kind {
                    ImportKind::Direct => {
                        let binding = match &name.alias {
                            Some(alias) => (alias.clone(), Binding::Module(name.name.clone())),
                            None => {
                                let top = name.name.split('.').next().unwrap_or(&name.name);
                                (top.to_string(), Binding::Module(top.to_string()))
                            }
                        };
                        result.bindings.insert(binding.0, binding.1);
                    }
                    _ if name.name == "*" => result.wildcards.push(module.clone()),
                    _ => {
                        result.bindings.insert(
                            name.used_name().to_string(),
                            Binding::Member {
                                module: module.clone(),
                                name: name.name.clone(),
                            },
                        );
                    }
                }
            }
        }

        result
    }

    /// Look up what a local name is bound to
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// Modules star-imported into this one
    pub fn wildcards(&self) -> &[String] {
        &self.wildcards
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty() && self.wildcards.is_empty()
    }
}

/// Resolve a relative import to an absolute module name.
///
/// `level` is the number of leading dots. For a plain module the first dot
/// refers to its parent package; for a package `__init__` it refers to the
/// package itself. Returns `None` when the import climbs above the top level.
pub fn resolve_relative(
    current_module: &str,
    is_package: bool,
    level: usize,
    module: &str,
) -> Option<String> {
    let mut parts: Vec<&str> = if current_module.is_empty() {
        Vec::new()
    } else {
        current_module.split('.').collect()
    };

    let drop = if is_package { level.saturating_sub(1) } else { level };
    if drop > parts.len() {
        return None;
    }
    parts.truncate(parts.len() - drop);

    if !module.is_empty() {
        parts.push(module);
    }

    Some(parts.join("."))
}
