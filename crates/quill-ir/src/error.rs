//! IR generator error type. Rare in practice: the AST is a closed sum and
//! every variant has a lowering rule, but a malformed assignment target
//! (left-hand side not an identifier) has nowhere else to surface.

use std::fmt;

use quill_common::Span;

#[derive(Debug, Clone)]
pub enum IRError {
    UnsupportedAssignmentTarget { span: Span },
}

impl fmt::Display for IRError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IRError::UnsupportedAssignmentTarget { .. } => {
                write!(f, "assignment target must be an identifier")
            }
        }
    }
}

impl std::error::Error for IRError {}
