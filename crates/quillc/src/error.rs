//! Crate-boundary-crossing error type unifying every pipeline stage's error,
//! per `spec.md` §7.

use std::fmt;

use quill_common::Span;
use quill_ir::IRError;
use quill_lexer::LexError;
use quill_parser::ParseError;
use quill_typeck::TypeError;

#[derive(Debug)]
pub enum CompileError {
    Lex(LexError),
    Parse(ParseError),
    Type(TypeError),
    Ir(IRError),
}

impl CompileError {
    pub fn span(&self) -> Span {
        match self {
            CompileError::Lex(e) => e.span,
            CompileError::Parse(e) => e.span,
            CompileError::Type(e) => e.span(),
            CompileError::Ir(IRError::UnsupportedAssignmentTarget { span }) => *span,
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Lex(e) => write!(f, "{e}"),
            CompileError::Parse(e) => write!(f, "{e}"),
            CompileError::Type(e) => write!(f, "{e}"),
            CompileError::Ir(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<LexError> for CompileError {
    fn from(e: LexError) -> Self {
        CompileError::Lex(e)
    }
}

impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        CompileError::Parse(e)
    }
}

impl From<TypeError> for CompileError {
    fn from(e: TypeError) -> Self {
        CompileError::Type(e)
    }
}

impl From<IRError> for CompileError {
    fn from(e: IRError) -> Self {
        CompileError::Ir(e)
    }
}
