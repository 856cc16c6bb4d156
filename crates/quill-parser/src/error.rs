//! Parse error types for the Quill parser.

use std::fmt;

use quill_common::Span;

/// A parse error with location information.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Human-readable description of what went wrong.
    pub message: String,
    /// Primary source location where the error was detected.
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self { message: message.into(), span }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_new() {
        let err = ParseError::new("expected expression", Span::new(5, 10));
        assert_eq!(err.message, "expected expression");
        assert_eq!(err.span, Span::new(5, 10));
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::new("unexpected token", Span::new(0, 1));
        assert_eq!(err.to_string(), "unexpected token");
    }
}
