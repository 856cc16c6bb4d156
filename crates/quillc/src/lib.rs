//! The Quill compiler: ties the tokenizer, parser, type checker, IR
//! generator, and assembly emitter into a single `compile` entry point.

mod error;

pub use error::CompileError;

/// Compile Quill source text into x86-64 AT&T-syntax assembly, per
/// `spec.md` §6's minimal interface.
pub fn compile(source: &str) -> Result<String, CompileError> {
    let tokens = quill_lexer::tokenize(source)?;
    let expr = quill_parser::parse(&tokens)?;
    quill_typeck::typecheck(&expr)?;
    let instructions = quill_ir::generate_ir(&expr)?;
    Ok(quill_codegen::generate_assembly(&instructions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_arithmetic_to_assembly_text() {
        let asm = compile("1 + 2 * 3").unwrap();
        assert!(asm.contains("main:"));
        assert!(asm.contains("call print_int"));
    }

    #[test]
    fn reports_the_first_error_and_stops() {
        let err = compile("1 + true").unwrap_err();
        assert!(matches!(err, CompileError::Type(_)));
    }

    #[test]
    fn lex_errors_surface_through_compile() {
        let err = compile("1 + `").unwrap_err();
        assert!(matches!(err, CompileError::Lex(_)));
    }

    #[test]
    fn parse_errors_surface_through_compile() {
        let err = compile("a + b c").unwrap_err();
        assert!(matches!(err, CompileError::Parse(_)));
    }
}
