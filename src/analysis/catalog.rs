// Source catalog: every module and class found in the parsed sources, with
// the structured metadata the attribute tables need.
//
// Ancestor order is computed once per class at build time so that member
// lookup is a plain first-match scan.

use crate::analysis::imports::{Binding, ImportBindings};
use crate::error::{Error, Result};
use crate::parser::{Class, Function, ParsedFile};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Re-exports are followed at most this many hops
const MAX_REEXPORT_DEPTH: usize = 8;

/// What a name in a class namespace is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    /// Plain `def` inside the class body
    Function,
    ClassMethod,
    StaticMethod,
    Property,
    /// Assignment or annotation
    Data,
}

impl MemberKind {
    pub fn is_callable(self) -> bool {
        matches!(
            self,
            MemberKind::Function | MemberKind::ClassMethod | MemberKind::StaticMethod
        )
    }
}

/// A name defined directly in a class namespace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberDef {
    pub name: String,
    pub kind: MemberKind,
    pub is_async: bool,
    pub docstring: Option<String>,
    /// `def` line for callables and properties
    pub signature: Option<String>,
    pub type_hint: Option<String>,
}

impl MemberDef {
    fn from_function(func: &Function) -> Self {
        let kind = if func.is_classmethod() {
            MemberKind::ClassMethod
        } else if func.is_staticmethod() {
            MemberKind::StaticMethod
        } else if func.is_property() {
            MemberKind::Property
        } else {
            MemberKind::Function
        };

        Self {
            name: func.name.clone(),
            kind,
            is_async: func.is_async,
            docstring: func.docstring.clone(),
            signature: Some(func.signature()),
            type_hint: func.return_type.clone(),
        }
    }

    /// Docstring or the empty string
    pub fn doc(&self) -> &str {
        self.docstring.as_deref().unwrap_or("")
    }

    pub fn is_private(&self) -> bool {
        self.name.starts_with('_')
    }
}

/// A class known to the catalog
#[derive(Debug, Clone, Serialize)]
pub struct ClassEntry {
    /// `module.Class`
    pub full_name: String,
    pub module: String,
    pub name: String,
    pub docstring: Option<String>,
    /// Base expressions as written in the source
    pub bases: Vec<String>,
    /// Ancestor order, most-derived first, starting with this class.
    /// Bases that are not catalogued appear by their written name.
    pub mro: Vec<String>,
    /// Own namespace in first-definition order
    pub members: Vec<MemberDef>,
    pub is_exception: bool,
}

impl ClassEntry {
    /// Find a member defined directly on this class
    pub fn member(&self, name: &str) -> Option<&MemberDef> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// All modules and classes extracted from the sources
#[derive(Debug, Clone, Default)]
pub struct SourceCatalog {
    /// Import bindings of every module, keyed by module name
    modules: HashMap<String, ImportBindings>,
    classes: HashMap<String, ClassEntry>,
}

impl SourceCatalog {
    /// Build the catalog from parsed files, computing every class's ancestor order
    pub fn build(files: &[ParsedFile]) -> Self {
        let mut catalog = Self::default();

        for file in files {
            catalog
                .modules
                .insert(file.module_name.clone(), ImportBindings::from_file(file));

            for class in &file.classes {
                let entry = class_entry(&file.module_name, class);
                catalog.classes.insert(entry.full_name.clone(), entry);
            }
        }

        let resolved_bases: HashMap<String, Vec<String>> = catalog
            .classes
            .values()
            .map(|c| {
                let bases = c
                    .bases
                    .iter()
                    .map(|b| catalog.resolve_base(&c.module, b))
                    .collect();
                (c.full_name.clone(), bases)
            })
            .collect();

        let mut memo = HashMap::new();
        let names: Vec<String> = catalog.classes.keys().cloned().collect();
        for name in names {
            let mro = match linearize(&name, &resolved_bases, &mut memo, &mut HashSet::new()) {
                Some(mro) => mro,
                None => {
                    warn!(class = %name, "inconsistent class hierarchy, using depth-first order");
                    depth_first_order(&name, &resolved_bases)
                }
            };
            let is_exception = mro.iter().skip(1).any(|a| {
                let simple = a.rsplit('.').next().unwrap_or(a);
                simple.ends_with("Exception") || simple.ends_with("Error")
            });
            if let Some(entry) = catalog.classes.get_mut(&name) {
                entry.mro = mro;
                entry.is_exception = entry.is_exception || is_exception;
            }
        }

        catalog
    }

    pub fn class(&self, full_name: &str) -> Option<&ClassEntry> {
        self.classes.get(full_name)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Resolve `name` as seen from `module`, following re-exports.
    ///
    /// This is how a class is found for `module:Name` or `module.Name`
    /// references: the module either defines it or imports it from
    /// somewhere that does.
    pub fn resolve_class(&self, module: &str, name: &str) -> Result<&ClassEntry> {
        let full = format!("{}.{}", module, name);
        if !self.modules.contains_key(module) && !self.classes.contains_key(&full) {
            return Err(Error::resolution(full, format!("module {} not found", module)));
        }
        self.find_class(module, name, 0)
            .ok_or_else(|| Error::resolution(full, format!("module {} has no class {}", module, name)))
    }

    /// Resolve a dotted path such as `shop.widget.Widget` to a class
    pub fn resolve_path(&self, path: &str) -> Result<&ClassEntry> {
        match path.rsplit_once('.') {
            Some((module, name)) => self.resolve_class(module, name),
            None => Err(Error::resolution(path, "name is not qualified by a module")),
        }
    }

    fn find_class(&self, module: &str, name: &str, depth: usize) -> Option<&ClassEntry> {
        if let Some(entry) = self.classes.get(&format!("{}.{}", module, name)) {
            return Some(entry);
        }
        if depth >= MAX_REEXPORT_DEPTH {
            return None;
        }

        let bindings = self.modules.get(module)?;
        match bindings.get(name) {
            Some(Binding::Member { module: from, name: original }) => {
                self.find_class(from, original, depth + 1)
            }
            Some(Binding::Module(_)) => None,
            None => bindings
                .wildcards()
                .iter()
                .find_map(|w| self.find_class(w, name, depth + 1)),
        }
    }

    /// Turn a base expression into the full name of a catalogued class, or
    /// keep it as written when it points outside the sources.
    fn resolve_base(&self, module: &str, base: &str) -> String {
        // Generic[T] and friends
        let base = base.split('[').next().unwrap_or(base).trim();
        let (head, rest) = match base.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (base, None),
        };

        let anchored = if self.classes.contains_key(&format!("{}.{}", module, head)) {
            Some(format!("{}.{}", module, head))
        } else {
            self.modules.get(module).and_then(|bindings| match bindings.get(head) {
                Some(binding) => Some(binding.target()),
                None => bindings
                    .wildcards()
                    .iter()
                    .find(|w| self.find_class(w, head, 0).is_some())
                    .map(|w| format!("{}.{}", w, head)),
            })
        };

        let path = match (anchored, rest) {
            (Some(a), Some(r)) => format!("{}.{}", a, r),
            (Some(a), None) => a,
            (None, _) => base.to_string(),
        };

        self.resolve_path(&path)
            .map(|c| c.full_name.clone())
            .unwrap_or(path)
    }

    /// First-match scan of the ancestor order for a member definition.
    ///
    /// Returns the defining class and the definition.
    pub fn lookup_member(&self, class: &ClassEntry, member: &str) -> Option<(&ClassEntry, &MemberDef)> {
        class
            .mro
            .iter()
            .filter_map(|ancestor| self.classes.get(ancestor))
            .find_map(|entry| entry.member(member).map(|def| (entry, def)))
    }

    /// Members visible on a class through its ancestors, most-derived
    /// definition first, each name once.
    pub fn visible_members<'a>(&'a self, class: &'a ClassEntry) -> Vec<(&'a ClassEntry, &'a MemberDef)> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();

        for entry in class.mro.iter().filter_map(|a| self.classes.get(a)) {
            for def in &entry.members {
                if seen.insert(def.name.as_str()) {
                    result.push((entry, def));
                }
            }
        }

        result
    }
}

fn class_entry(module: &str, class: &Class) -> ClassEntry {
    let mut defs: Vec<(usize, MemberDef)> = class
        .attributes
        .iter()
        .map(|a| {
            (
                a.line,
                MemberDef {
                    name: a.name.clone(),
                    kind: MemberKind::Data,
                    is_async: false,
                    docstring: a.docstring.clone(),
                    signature: None,
                    type_hint: a.type_hint.clone(),
                },
            )
        })
        .chain(class.methods.iter().map(|f| (f.line_start, MemberDef::from_function(f))))
        .collect();
    defs.sort_by_key(|(line, _)| *line);

    // A rebinding keeps the first position and takes the last value
    let mut members: Vec<MemberDef> = Vec::new();
    for (_, def) in defs {
        match members.iter_mut().find(|m| m.name == def.name) {
            Some(existing) if existing.kind == MemberKind::Property && def.kind == MemberKind::Property => {
                // setter/deleter: the getter keeps the docstring
                if existing.docstring.is_none() {
                    existing.docstring = def.docstring;
                }
            }
            Some(existing) => *existing = def,
            None => members.push(def),
        }
    }

    let full_name = format!("{}.{}", module, class.name);
    ClassEntry {
        mro: vec![full_name.clone()],
        full_name,
        module: module.to_string(),
        name: class.name.clone(),
        docstring: class.docstring.clone(),
        bases: class.bases.clone(),
        members,
        is_exception: class.is_exception(),
    }
}

/// C3 linearization. `None` means the hierarchy is cyclic or inconsistent.
fn linearize(
    class: &str,
    bases: &HashMap<String, Vec<String>>,
    memo: &mut HashMap<String, Vec<String>>,
    visiting: &mut HashSet<String>,
) -> Option<Vec<String>> {
    if let Some(done) = memo.get(class) {
        return Some(done.clone());
    }
    let direct = match bases.get(class) {
        Some(direct) => direct,
        // outside the sources: nothing more is known
        None => return Some(vec![class.to_string()]),
    };
    if !visiting.insert(class.to_string()) {
        return None;
    }

    let mut sequences = Vec::new();
    for base in direct {
        sequences.push(linearize(base, bases, memo, visiting)?);
    }
    sequences.push(direct.clone());
    visiting.remove(class);

    let mut result = vec![class.to_string()];
    result.extend(c3_merge(sequences)?);
    memo.insert(class.to_string(), result.clone());
    Some(result)
}

fn c3_merge(mut sequences: Vec<Vec<String>>) -> Option<Vec<String>> {
    let mut result = Vec::new();
    loop {
        sequences.retain(|s| !s.is_empty());
        if sequences.is_empty() {
            return Some(result);
        }

        let head = sequences
            .iter()
            .map(|s| &s[0])
            .find(|candidate| !sequences.iter().any(|s| s[1..].contains(*candidate)))?
            .clone();

        for seq in sequences.iter_mut() {
            if seq[0] == head {
                seq.remove(0);
            }
        }
        result.push(head);
    }
}

/// Left-to-right depth-first order without duplicates
fn depth_first_order(class: &str, bases: &HashMap<String, Vec<String>>) -> Vec<String> {
    let mut order = Vec::new();
    let mut stack = vec![class.to_string()];
    let mut seen = HashSet::new();

    while let Some(current) = stack.pop() {
        if !seen.insert(current.clone()) {
            continue;
        }
        if let Some(direct) = bases.get(&current) {
            stack.extend(direct.iter().rev().cloned());
        }
        order.push(current);
    }

    order
}
