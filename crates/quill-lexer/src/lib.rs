//! Tokenizer for the Quill language.
//!
//! Recognition is disciplined: exactly one rule is tried, in a fixed order,
//! at each position, and the first match wins outright rather than letting
//! several rules fire against overlapping or already-advanced input. An
//! unrecognised byte is a located [`LexError`], never an infinite loop.

mod error;
mod token;

pub use error::{LexError, LexErrorKind};
pub use token::{Token, TokenKind};

use quill_common::Span;

const KEYWORDS: &[&str] =
    &["if", "then", "else", "while", "do", "var", "true", "false", "and", "or", "not"];

/// Returns whether `text` is one of the language's keywords. Keywords are
/// lexed as ordinary `Identifier` tokens; only the parser cares which
/// identifier text is a keyword.
pub fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

/// Tokenize `source` into an ordered list of tokens. No `end` sentinel is
/// appended — callers detect end-of-stream positionally.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let bytes = source.as_bytes();
    let mut pos = 0usize;
    let mut tokens = Vec::new();

    while pos < bytes.len() {
        let b = bytes[pos];

        if is_whitespace(b) {
            while pos < bytes.len() && is_whitespace(bytes[pos]) {
                pos += 1;
            }
            continue;
        }

        if b == b'#' {
            pos += 1;
            while pos < bytes.len() && bytes[pos].is_ascii_lowercase() {
                pos += 1;
            }
            continue;
        }

        if b == b'_' || b.is_ascii_alphabetic() {
            let start = pos;
            pos += 1;
            while pos < bytes.len() && (bytes[pos] == b'_' || bytes[pos].is_ascii_alphanumeric()) {
                pos += 1;
            }
            tokens.push(Token::new(
                &source[start..pos],
                TokenKind::Identifier,
                Span::new(start as u32, pos as u32),
            ));
            continue;
        }

        if b.is_ascii_digit() {
            let start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            tokens.push(Token::new(
                &source[start..pos],
                TokenKind::IntLiteral,
                Span::new(start as u32, pos as u32),
            ));
            continue;
        }

        if let Some(len) = match_operator(&bytes[pos..]) {
            tokens.push(Token::new(
                &source[pos..pos + len],
                TokenKind::Operator,
                Span::new(pos as u32, (pos + len) as u32),
            ));
            pos += len;
            continue;
        }

        if is_punctuation(b) {
            tokens.push(Token::new(
                &source[pos..pos + 1],
                TokenKind::Punctuation,
                Span::new(pos as u32, (pos + 1) as u32),
            ));
            pos += 1;
            continue;
        }

        return Err(LexError::new(
            LexErrorKind::UnexpectedByte(b),
            Span::new(pos as u32, (pos + 1) as u32),
        ));
    }

    Ok(tokens)
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

fn is_punctuation(b: u8) -> bool {
    matches!(b, b'{' | b'}' | b'(' | b')' | b':' | b';' | b',')
}

/// Tries the two-character operators first, then the single-character ones.
/// Returns the matched length, if any.
fn match_operator(rest: &[u8]) -> Option<usize> {
    const TWO_CHAR: &[&[u8]] = &[b"!=", b"==", b">=", b"<="];
    for op in TWO_CHAR {
        if rest.starts_with(op) {
            return Some(2);
        }
    }
    if let Some(&b) = rest.first() {
        if matches!(b, b'<' | b'>' | b'+' | b'-' | b'/' | b'*' | b'%' | b'=') {
            return Some(1);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<(String, TokenKind)> {
        tokenize(src).unwrap().into_iter().map(|t| (t.text, t.kind)).collect()
    }

    #[test]
    fn tokenizes_arithmetic_expression() {
        assert_eq!(
            kinds("1 + 2 * 3"),
            vec![
                ("1".into(), TokenKind::IntLiteral),
                ("+".into(), TokenKind::Operator),
                ("2".into(), TokenKind::IntLiteral),
                ("*".into(), TokenKind::Operator),
                ("3".into(), TokenKind::IntLiteral),
            ]
        );
    }

    #[test]
    fn keywords_tokenize_as_identifiers() {
        assert_eq!(
            kinds("if then else"),
            vec![
                ("if".into(), TokenKind::Identifier),
                ("then".into(), TokenKind::Identifier),
                ("else".into(), TokenKind::Identifier),
            ]
        );
    }

    #[test]
    fn two_char_operators_take_precedence_over_one_char() {
        assert_eq!(
            kinds("a != b <= c"),
            vec![
                ("a".into(), TokenKind::Identifier),
                ("!=".into(), TokenKind::Operator),
                ("b".into(), TokenKind::Identifier),
                ("<=".into(), TokenKind::Operator),
                ("c".into(), TokenKind::Identifier),
            ]
        );
    }

    #[test]
    fn punctuation_and_identifiers_mix() {
        assert_eq!(
            kinds("f(x, y)"),
            vec![
                ("f".into(), TokenKind::Identifier),
                ("(".into(), TokenKind::Punctuation),
                ("x".into(), TokenKind::Identifier),
                (",".into(), TokenKind::Punctuation),
                ("y".into(), TokenKind::Identifier),
                (")".into(), TokenKind::Punctuation),
            ]
        );
    }

    #[test]
    fn line_comment_only_consumes_lowercase_run() {
        // Per the grammar, a line comment is `#` followed by `[a-z]*` —
        // nothing more. The space after "comment" ends the match.
        assert_eq!(kinds("1 #comment\n+ 2"), vec![
            ("1".into(), TokenKind::IntLiteral),
            ("+".into(), TokenKind::Operator),
            ("2".into(), TokenKind::IntLiteral),
        ]);
    }

    #[test]
    fn whitespace_run_collapses_to_nothing() {
        assert_eq!(kinds("1   +\t\n2"), vec![
            ("1".into(), TokenKind::IntLiteral),
            ("+".into(), TokenKind::Operator),
            ("2".into(), TokenKind::IntLiteral),
        ]);
    }

    #[test]
    fn unrecognised_byte_is_a_located_error() {
        let err = tokenize("1 @ 2").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnexpectedByte(b'@'));
        assert_eq!(err.span, Span::new(2, 3));
    }

    #[test]
    fn tokenize_render_round_trip() {
        let src = "if a then b else c";
        let tokens = tokenize(src).unwrap();
        let rendered: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        let rejoined = rendered.join(" ");
        let retokenized = tokenize(&rejoined).unwrap();
        assert_eq!(tokens.len(), retokenized.len());
        for (a, b) in tokens.iter().zip(retokenized.iter()) {
            assert_eq!(a.text, b.text);
            assert_eq!(a.kind, b.kind);
        }
    }

    #[test]
    fn empty_source_tokenizes_to_empty_list() {
        assert_eq!(tokenize("").unwrap(), Vec::new());
    }
}
