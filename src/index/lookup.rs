// Lookup table: parent full name -> documented child member names

use crate::index::symbols::SymbolIndex;
use std::collections::HashMap;

/// Documented children of every parent symbol, rebuilt once per resolution pass
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    children: HashMap<String, Vec<String>>,
}

impl LookupTable {
    /// Index every symbol whose kind is not ignored under its parent name.
    ///
    /// Children keep the order in which their symbols were registered.
    pub fn build(index: &SymbolIndex) -> Self {
        let mut children: HashMap<String, Vec<String>> = HashMap::new();

        for symbol in index.iter().filter(|s| !s.kind.is_ignored()) {
            let (parent, child) = symbol.split_parent();
            children
                .entry(parent.to_string())
                .or_default()
                .push(child.to_string());
        }

        Self { children }
    }

    /// Documented children of `parent`, if it has any
    pub fn members(&self, parent: &str) -> Option<&[String]> {
        self.children.get(parent).map(Vec::as_slice)
    }

    pub fn contains(&self, parent: &str) -> bool {
        self.children.contains_key(parent)
    }

    /// Number of parents with at least one child
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
