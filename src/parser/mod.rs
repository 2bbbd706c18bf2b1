// Parser module for extracting AST from Python source files

pub mod ast;
mod python;

pub use ast::*;
pub use python::{module_name_for, PythonParser};
