//! x86-64 (AT&T syntax) assembly text emission from a flat IR instruction
//! stream, per `spec.md` §4.5. Every `IRVar` gets a fixed stack slot; there
//! is no register allocation.

use quill_ir::Instruction;

use crate::intrinsics;
use crate::layout::Locals;

/// Render a complete IR instruction stream as assembly text for a `main`
/// entry point, ready to hand to `as`/`cc`.
pub fn generate_assembly(instructions: &[Instruction]) -> String {
    let locals = Locals::from_instructions(instructions);
    let mut lines = Vec::new();

    lines.push(".extern print_int".to_string());
    lines.push(".extern print_bool".to_string());
    lines.push(".extern read_int".to_string());
    lines.push(".global main".to_string());
    lines.push(".type main, @function".to_string());
    lines.push(".section .text".to_string());
    lines.push("main:".to_string());
    lines.push("pushq %rbp".to_string());
    lines.push("movq %rsp, %rbp".to_string());
    lines.push(format!("subq ${}, %rsp", locals.frame_size()));

    for ins in instructions {
        lines.push(format!("# {ins}"));
        emit_instruction(ins, &locals, &mut lines);
    }

    lines.push("movl $0, %eax".to_string());
    lines.push("movq %rbp, %rsp".to_string());
    lines.push("popq %rbp".to_string());
    lines.push("ret".to_string());

    lines.push(".section .note.GNU-stack,\"\",@progbits".to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn emit_instruction(ins: &Instruction, locals: &Locals, lines: &mut Vec<String>) {
    match ins {
        Instruction::Label(label) => {
            lines.push(String::new());
            lines.push(format!(".L{label}:"));
        }
        Instruction::LoadIntConst { value, dest } => {
            if (i32::MIN as i64..=i32::MAX as i64).contains(value) {
                lines.push(format!("movq ${value}, {}", locals.slot(dest)));
            } else {
                lines.push(format!("movabsq ${value}, %rax"));
                lines.push(format!("movq %rax, {}", locals.slot(dest)));
            }
        }
        Instruction::LoadBoolConst { value, dest } => {
            lines.push(format!("movq ${}, {}", *value as i32, locals.slot(dest)));
        }
        Instruction::Copy { src, dest } => {
            lines.push(format!("movq {}, %rax", locals.slot(src)));
            lines.push(format!("movq %rax, {}", locals.slot(dest)));
        }
        Instruction::Jump(label) => {
            lines.push(format!("jmp .L{label}"));
        }
        Instruction::CondJump { cond, then_label, else_label } => {
            lines.push(format!("cmpq $0, {}", locals.slot(cond)));
            lines.push(format!("jne .L{then_label}"));
            lines.push(format!("jmp .L{else_label}"));
        }
        Instruction::Call { fun, args, dest } => {
            let arg_refs: Vec<String> = args.iter().map(|a| locals.slot(a)).collect();
            let mut emitted = false;
            intrinsics::expand(&fun.0, &arg_refs, &mut |line| {
                lines.push(line);
                emitted = true;
            });
            if emitted {
                lines.push(format!("movq %rax, {}", locals.slot(dest)));
            } else {
                if let Some(first) = arg_refs.first() {
                    lines.push(format!("movq {first}, %rdi"));
                }
                lines.push(format!("call {fun}"));
                lines.push(format!("movq %rax, {}", locals.slot(dest)));
            }
        }
    }
}
