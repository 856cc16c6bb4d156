//! Linear three-address IR and IR generator for the Quill language.

mod error;
mod generator;
mod instr;
mod scope;
mod var;

pub use error::IRError;
pub use generator::generate_ir;
pub use instr::Instruction;
pub use var::{IRVar, Label, NameGen};
