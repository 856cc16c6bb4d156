//! Stack frame layout: every distinct [`IRVar`] gets a fixed 8-byte slot,
//! assigned in first-use order. No register allocation, per `spec.md` §4.5.

use rustc_hash::FxHashMap;

use quill_ir::{IRVar, Instruction};

pub struct Locals {
    slots: FxHashMap<IRVar, u32>,
}

impl Locals {
    /// Collect every distinct `IRVar` referenced anywhere in `instructions`,
    /// in first-use order, and assign each an `%rbp`-relative slot.
    pub fn from_instructions(instructions: &[Instruction]) -> Self {
        let mut order = Vec::new();
        let mut seen = std::collections::HashSet::new();
        let mut note = |v: &IRVar| {
            if seen.insert(v.clone()) {
                order.push(v.clone());
            }
        };
        for ins in instructions {
            match ins {
                Instruction::Label(_) | Instruction::Jump(_) => {}
                Instruction::LoadIntConst { dest, .. } | Instruction::LoadBoolConst { dest, .. } => {
                    note(dest)
                }
                Instruction::Copy { src, dest } => {
                    note(src);
                    note(dest);
                }
                Instruction::Call { fun, args, dest } => {
                    note(fun);
                    for a in args {
                        note(a);
                    }
                    note(dest);
                }
                Instruction::CondJump { cond, .. } => note(cond),
            }
        }

        let mut slots = FxHashMap::default();
        for (i, var) in order.into_iter().enumerate() {
            slots.insert(var, (i as u32 + 1) * 8);
        }
        Self { slots }
    }

    /// The `-N(%rbp)` operand text for a variable's slot.
    pub fn slot(&self, var: &IRVar) -> String {
        let offset = self.slots.get(var).unwrap_or_else(|| {
            panic!("variable '{var}' referenced but never collected into the frame")
        });
        format!("-{offset}(%rbp)")
    }

    /// Total frame size in bytes: `8 * distinct variable count`.
    pub fn frame_size(&self) -> u32 {
        self.slots.len() as u32 * 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_size_is_eight_times_distinct_var_count() {
        let ins = vec![
            Instruction::LoadIntConst { value: 1, dest: IRVar::new("x1") },
            Instruction::LoadIntConst { value: 2, dest: IRVar::new("x2") },
            Instruction::Copy { src: IRVar::new("x1"), dest: IRVar::new("x2") },
        ];
        let locals = Locals::from_instructions(&ins);
        assert_eq!(locals.frame_size(), 16);
    }

    #[test]
    fn slots_are_assigned_in_first_use_order() {
        let ins = vec![
            Instruction::LoadIntConst { value: 1, dest: IRVar::new("x2") },
            Instruction::LoadIntConst { value: 2, dest: IRVar::new("x1") },
        ];
        let locals = Locals::from_instructions(&ins);
        assert_eq!(locals.slot(&IRVar::new("x2")), "-8(%rbp)");
        assert_eq!(locals.slot(&IRVar::new("x1")), "-16(%rbp)");
    }

    #[test]
    #[should_panic]
    fn slot_of_uncollected_var_panics() {
        let locals = Locals::from_instructions(&[]);
        locals.slot(&IRVar::new("ghost"));
    }
}
