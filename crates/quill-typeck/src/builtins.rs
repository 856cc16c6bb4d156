//! Seeds a [`SymbolTable`] with the runtime builtins from `spec.md` §4.3.
//! The operator signatures themselves live in [`crate::checker::operator_signature`]
//! since they apply to syntax, not named bindings.

use quill_common::Type;

use crate::symtab::SymbolTable;

pub fn seed(table: &mut SymbolTable) {
    table.define("print_int", Type::fun(vec![Type::Int], Type::Unit));
    table.define("print_bool", Type::fun(vec![Type::Bool], Type::Unit));
    table.define("read_int", Type::fun(vec![], Type::Int));
}
