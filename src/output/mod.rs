// Output generation module

pub mod attribute_table;
pub mod html;
pub mod templates;

pub use html::*;
pub use templates::*;
