//! IR-level names: variables and jump labels.

use std::fmt;

/// A name bound to a stack slot in the assembly generator. Two `IRVar`s are
/// the same variable iff their names are equal — there is no separate
/// numeric id, following the source's plain-string `IRVar`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IRVar(pub String);

impl IRVar {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The shared variable every `Unit`-typed expression yields. No
    /// instruction ever writes to it; it exists only so every node has a
    /// result `IRVar` to return.
    pub fn unit() -> Self {
        Self("unit".to_string())
    }
}

impl fmt::Display for IRVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A jump target, unique within one emitted instruction stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(pub String);

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mints fresh, never-repeated `IRVar`s and `Label`s from a monotonic
/// counter, following the source's `new_var`/`new_label` closures.
#[derive(Debug, Default)]
pub struct NameGen {
    next_var: u32,
    next_label: u32,
}

impl NameGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh_var(&mut self) -> IRVar {
        self.next_var += 1;
        IRVar::new(format!("x{}", self.next_var))
    }

    /// A fresh label built from `base`, unique within this generator's
    /// lifetime even if `base` repeats (e.g. many `if`s in one program).
    pub fn fresh_label(&mut self, base: &str) -> Label {
        self.next_label += 1;
        Label::new(format!("{base}{}", self.next_label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_vars_are_distinct() {
        let mut gen = NameGen::new();
        let a = gen.fresh_var();
        let b = gen.fresh_var();
        assert_ne!(a, b);
    }

    #[test]
    fn fresh_labels_with_same_base_are_distinct() {
        let mut gen = NameGen::new();
        let a = gen.fresh_label("if_end");
        let b = gen.fresh_label("if_end");
        assert_ne!(a, b);
    }

    #[test]
    fn unit_var_is_a_stable_name() {
        assert_eq!(IRVar::unit(), IRVar::unit());
    }
}
