// Symbol index and the lookup table derived from it

pub mod lookup;
pub mod symbols;

pub use lookup::LookupTable;
pub use symbols::{Symbol, SymbolIndex, SymbolKind};
