//! Scoped name→[`IRVar`] table for the IR generator: a stack of maps rather
//! than the source's copy-the-whole-mapping-on-block-entry approach
//! (`spec.md` §9's suggested redesign).

use rustc_hash::FxHashMap;

use crate::var::IRVar;

pub struct Scopes {
    stack: Vec<FxHashMap<String, IRVar>>,
}

impl Scopes {
    pub fn new() -> Self {
        Self { stack: vec![FxHashMap::default()] }
    }

    pub fn push(&mut self) {
        self.stack.push(FxHashMap::default());
    }

    pub fn pop(&mut self) {
        self.stack.pop();
        debug_assert!(!self.stack.is_empty(), "popped the root scope");
    }

    pub fn bind(&mut self, name: impl Into<String>, var: IRVar) {
        self.stack.last_mut().expect("at least one scope").insert(name.into(), var);
    }

    pub fn resolve(&self, name: &str) -> Option<&IRVar> {
        self.stack.iter().rev().find_map(|scope| scope.get(name))
    }
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}
