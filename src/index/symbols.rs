// Documented symbols
//
// The symbol index is filled while documentation pages are parsed (every
// autoclass directive registers the class and its members) and is read-only
// once the resolution pass starts.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Kind tag of a documented symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Module,
    Class,
    Exception,
    Function,
    Method,
    Attribute,
    Data,
}

impl SymbolKind {
    /// Kinds that never contribute members to an attribute table
    pub const IGNORED: [SymbolKind; 4] = [
        SymbolKind::Data,
        SymbolKind::Exception,
        SymbolKind::Module,
        SymbolKind::Class,
    ];

    pub fn is_ignored(self) -> bool {
        Self::IGNORED.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Module => "module",
            SymbolKind::Class => "class",
            SymbolKind::Exception => "exception",
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
            SymbolKind::Attribute => "attribute",
            SymbolKind::Data => "data",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One documented symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    /// Dotted, fully-qualified name
    pub full_name: String,
    pub kind: SymbolKind,
    /// Name of the document that documents it
    pub document: String,
}

impl Symbol {
    pub fn new(full_name: impl Into<String>, kind: SymbolKind, document: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            kind,
            document: document.into(),
        }
    }

    /// Split the full name at its last separator into (parent, child).
    ///
    /// A name with no separator has an empty parent.
    pub fn split_parent(&self) -> (&str, &str) {
        self.full_name
            .rsplit_once('.')
            .unwrap_or(("", self.full_name.as_str()))
    }
}

/// Ordered collection of every documented symbol in a build
#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    symbols: Vec<Symbol>,
    positions: HashMap<String, usize>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a symbol. A full name registered twice keeps its first entry.
    pub fn register(&mut self, symbol: Symbol) -> bool {
        if self.positions.contains_key(&symbol.full_name) {
            return false;
        }
        self.positions.insert(symbol.full_name.clone(), self.symbols.len());
        self.symbols.push(symbol);
        true
    }

    pub fn get(&self, full_name: &str) -> Option<&Symbol> {
        self.positions.get(full_name).map(|&i| &self.symbols[i])
    }

    /// Symbols in registration order
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl FromIterator<Symbol> for SymbolIndex {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        let mut index = SymbolIndex::new();
        for symbol in iter {
            index.register(symbol);
        }
        index
    }
}
