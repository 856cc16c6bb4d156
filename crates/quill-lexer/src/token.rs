use quill_common::Span;
use serde::{Deserialize, Serialize};

/// The kind of a token. Keywords are not a separate kind — they are
/// `Identifier` tokens that the parser distinguishes by text, per the
/// language's small closed keyword set (`if`, `then`, `else`, `while`,
/// `do`, `var`, `true`, `false`, `and`, `or`, `not`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Identifier,
    IntLiteral,
    Operator,
    Punctuation,
    /// Never produced by the tokenizer; returned by `peek` past the end of
    /// the token stream.
    End,
}

/// A single token. Equality is location-blind whenever either side's span
/// is [`Span::ANY`] — this lets tests build expected tokens without caring
/// where in the source they land.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind, span: Span) -> Self {
        Self { text: text.into(), kind, span }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.kind == other.kind && self.span.loc_eq(other.span)
    }
}
