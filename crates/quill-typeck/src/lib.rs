//! Type checker for the Quill language: walks a parsed [`quill_parser::ast::Expr`]
//! tree, writing the inferred [`quill_common::Type`] back onto each node.

mod builtins;
mod checker;
mod error;
mod symtab;

pub use checker::typecheck;
pub use error::TypeError;
pub use symtab::SymbolTable;
