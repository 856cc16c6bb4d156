//! The linear three-address IR instruction set, per `spec.md` §4.4.

use std::fmt;

use crate::var::{IRVar, Label};

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Start of a basic block; does not itself move control.
    Label(Label),
    LoadIntConst { value: i64, dest: IRVar },
    LoadBoolConst { value: bool, dest: IRVar },
    Copy { src: IRVar, dest: IRVar },
    /// Calls either an intrinsic operator or an external function, per
    /// `spec.md` §4.5/§4.6's dispatch rule.
    Call { fun: IRVar, args: Vec<IRVar>, dest: IRVar },
    Jump(Label),
    CondJump { cond: IRVar, then_label: Label, else_label: Label },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Label(l) => write!(f, "Label({l})"),
            Instruction::LoadIntConst { value, dest } => write!(f, "LoadIntConst({value}, {dest})"),
            Instruction::LoadBoolConst { value, dest } => write!(f, "LoadBoolConst({value}, {dest})"),
            Instruction::Copy { src, dest } => write!(f, "Copy({src}, {dest})"),
            Instruction::Call { fun, args, dest } => {
                let args = args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ");
                write!(f, "Call({fun}, [{args}], {dest})")
            }
            Instruction::Jump(l) => write!(f, "Jump({l})"),
            Instruction::CondJump { cond, then_label, else_label } => {
                write!(f, "CondJump({cond}, {then_label}, {else_label})")
            }
        }
    }
}
