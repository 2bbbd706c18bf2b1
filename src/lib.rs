//! Cogwright - attribute-table API documentation for Python projects
//!
//! Parses Python sources into a catalog of classes, reads reStructuredText
//! style documentation pages, replaces every `.. attributetable::` directive
//! with a table of the class's attributes and methods, and writes the result
//! as a static HTML site. Also scaffolds bot projects and cog modules.

pub mod analysis;
pub mod build;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod output;
pub mod parser;
pub mod scaffold;
pub mod table;

// Re-export main types
pub use build::{BuildReport, Builder};
pub use config::Config;
pub use error::{Error, Result};
