//! Scoped symbol table mapping names to types.
//!
//! A parent-pointer chain of scopes rather than the source's
//! copy-the-whole-mapping-on-block-entry approach: entering a block pushes
//! an empty scope, leaving it pops that scope, and lookups walk outward
//! from the innermost scope until a binding is found.

use rustc_hash::FxHashMap;

use quill_common::Type;

pub struct SymbolTable {
    scopes: Vec<FxHashMap<String, Type>>,
}

impl SymbolTable {
    /// A table seeded with nothing; callers populate the root scope with
    /// builtins before type-checking.
    pub fn new() -> Self {
        Self { scopes: vec![FxHashMap::default()] }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
        debug_assert!(!self.scopes.is_empty(), "popped the root scope");
    }

    pub fn define(&mut self, name: impl Into<String>, ty: Type) {
        self.scopes.last_mut().expect("at least one scope").insert(name.into(), ty);
    }

    pub fn lookup(&self, name: &str) -> Option<&Type> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
