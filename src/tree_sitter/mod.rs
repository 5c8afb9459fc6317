//! Tree-sitter integration for appindex
//!
//! Native parsing for the web-application source files the index cares
//! about. All syntax-tree work happens here and in `extract`; nothing
//! outside ever touches a raw tree.

mod parser;

pub use parser::{Language, TreeSitterError, TreeSitterParser};
