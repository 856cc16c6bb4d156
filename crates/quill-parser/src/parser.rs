//! Recursive-descent parser: token stream → [`Expr`] tree.
//!
//! Lookahead is one token, plus one extra peek (`pos + 1`) used only to
//! recognize the optional `=>` in function-type syntax, which is two
//! separate tokens (`=` then `>`) rather than a single token kind.

use quill_common::{Span, Type};
use quill_lexer::{Token, TokenKind};

use crate::ast::{
    BinOp, Block, Expr, ExprKind, Identifier, IfStatement, LiteralValue, UnaryOp,
    VariableDeclaration, WhileStatement,
};
use crate::error::ParseError;

/// Parse a complete token stream into a single root expression. The root
/// expression may declare `var` at its own level; trailing tokens after it
/// are a parse error.
pub fn parse(tokens: &[Token]) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(tokens);
    let result = parser.parse_expression(true)?;
    let next = parser.peek();
    if next.kind != TokenKind::End {
        return Err(ParseError::new(
            format!("expected end of input but got token '{}'", next.text),
            next.span,
        ));
    }
    Ok(result)
}

/// A borrowed view of the token at the parser's current position, or a
/// synthetic end-of-stream token once `pos` runs past the input.
struct Peek<'a> {
    text: &'a str,
    kind: TokenKind,
    span: Span,
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Peek<'a> {
        self.peek_at(self.pos)
    }

    fn peek_at(&self, pos: usize) -> Peek<'a> {
        if pos < self.tokens.len() {
            let t = &self.tokens[pos];
            Peek { text: &t.text, kind: t.kind, span: t.span }
        } else {
            let span = self.tokens.last().map(|t| t.span).unwrap_or(Span::new(0, 0));
            Peek { text: "", kind: TokenKind::End, span }
        }
    }

    fn consume(&mut self) -> Peek<'a> {
        let t = self.peek();
        self.pos += 1;
        t
    }

    fn expect(&mut self, expected: &str) -> Result<Peek<'a>, ParseError> {
        let t = self.peek();
        if t.text != expected {
            return Err(ParseError::new(
                format!("expected '{expected}' but got '{}'", t.text),
                t.span,
            ));
        }
        self.pos += 1;
        Ok(t)
    }

    fn expect_one_of(&mut self, expected: &[&str]) -> Result<Peek<'a>, ParseError> {
        let t = self.peek();
        if !expected.contains(&t.text) {
            let list = expected.iter().map(|e| format!("'{e}'")).collect::<Vec<_>>().join(", ");
            return Err(ParseError::new(format!("expected one of: {list}"), t.span));
        }
        self.pos += 1;
        Ok(t)
    }

    fn parse_int_literal(&mut self) -> Result<Expr, ParseError> {
        let t = self.peek();
        if t.kind != TokenKind::IntLiteral {
            return Err(ParseError::new("expected an integer literal", t.span));
        }
        let t = self.consume();
        let value: i64 = t
            .text
            .parse()
            .map_err(|_| ParseError::new(format!("invalid integer literal '{}'", t.text), t.span))?;
        Ok(Expr::new(ExprKind::Literal(Some(LiteralValue::Int(value))), t.span))
    }

    fn parse_identifier(&mut self) -> Result<Identifier, ParseError> {
        let t = self.peek();
        if t.kind != TokenKind::Identifier {
            return Err(ParseError::new("expected an identifier", t.span));
        }
        let t = self.consume();
        Ok(Identifier::new(t.text, t.span))
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op_tok = self.expect_one_of(&["not", "-"])?;
        let op = UnaryOp::from_text(op_tok.text).expect("matched by expect_one_of");
        let right = if self.peek().text == "(" {
            self.parse_parenthesized()?
        } else {
            self.parse_factor(false)?
        };
        let span = right.span;
        Ok(Expr::new(ExprKind::UnaryOperator { op, right: Box::new(right) }, span))
    }

    /// Assignment `=` is the lowest-precedence, right-associative operator;
    /// everything else is parsed left-associatively by `parse_expression_left`.
    fn parse_expression(&mut self, allow_var: bool) -> Result<Expr, ParseError> {
        let left = self.parse_expression_left(allow_var)?;
        if self.peek().text == "=" {
            self.expect("=")?;
            let right = self.parse_expression(allow_var)?;
            let span = left.span;
            return Ok(Expr::new(
                ExprKind::BinaryOp { left: Box::new(left), op: BinOp::Assign, right: Box::new(right) },
                span,
            ));
        }
        Ok(left)
    }

    /// Precedence tiers from loosest to tightest binding. Each tier is
    /// parsed by recursively climbing to the next-tighter tier for both its
    /// initial operand and every right-hand operand, so mixed expressions
    /// like `1 + 2 * 3` bind `*` before `+` rather than flattening
    /// left-to-right across tiers.
    const TIERS: &'static [&'static [&'static str]] = &[
        &["or"],
        &["and"],
        &["==", "!="],
        &["<", "<=", ">", ">="],
        &["+", "-"],
        &["*", "/", "%"],
    ];

    fn parse_expression_left(&mut self, allow_var: bool) -> Result<Expr, ParseError> {
        self.parse_tier(0, allow_var)
    }

    fn parse_tier(&mut self, tier_idx: usize, allow_var: bool) -> Result<Expr, ParseError> {
        let Some(tier) = Self::TIERS.get(tier_idx) else {
            return self.parse_factor(allow_var);
        };
        let mut left = self.parse_tier(tier_idx + 1, allow_var)?;
        while tier.contains(&self.peek().text) {
            let op_tok = self.consume();
            let op = BinOp::from_text(op_tok.text).expect("matched by tier membership");
            let right = self.parse_tier(tier_idx + 1, false)?;
            let span = left.span;
            left = Expr::new(
                ExprKind::BinaryOp { left: Box::new(left), op, right: Box::new(right) },
                span,
            );
        }
        Ok(left)
    }

    /// Operators that can never start an atom. `-` is deliberately excluded
    /// since it also serves as the unary negation prefix, and `=` is handled
    /// by `parse_expression` rather than rejected here.
    const FORBIDDEN_IN_ATOM_POSITION: &'static [&'static str] =
        &["or", "and", "==", "!=", "<", "<=", ">", ">=", "+", "*", "/", "%"];

    fn parse_factor(&mut self, allow_var: bool) -> Result<Expr, ParseError> {
        let t = self.peek();
        if t.kind == TokenKind::Operator && Self::FORBIDDEN_IN_ATOM_POSITION.contains(&t.text) {
            return Err(ParseError::new(
                format!("unexpected operator '{}' in atom position", t.text),
                t.span,
            ));
        }
        if t.kind == TokenKind::End {
            return Ok(Expr::new(ExprKind::EmptyInput, t.span));
        }
        match t.text {
            "(" => self.parse_parenthesized(),
            "{" => self.parse_block(),
            "if" => self.parse_if_statement(),
            "while" => self.parse_while_statement(),
            "not" | "-" => self.parse_unary(),
            "var" => {
                if !allow_var {
                    return Err(ParseError::new(
                        "variable declarations are only allowed at top-level or directly inside blocks",
                        t.span,
                    ));
                }
                self.parse_var()
            }
            "true" => {
                let t = self.consume();
                Ok(Expr::new(ExprKind::Literal(Some(LiteralValue::Bool(true))), t.span))
            }
            "false" => {
                let t = self.consume();
                Ok(Expr::new(ExprKind::Literal(Some(LiteralValue::Bool(false))), t.span))
            }
            _ if t.kind == TokenKind::IntLiteral => self.parse_int_literal(),
            _ if t.kind == TokenKind::Identifier => {
                let identifier = self.parse_identifier()?;
                if self.peek().text == "(" {
                    self.expect("(")?;
                    let mut args = Vec::new();
                    while self.peek().text != ")" {
                        args.push(self.parse_expression(false)?);
                        if self.peek().text == "," {
                            self.expect(",")?;
                            if self.peek().text == ")" {
                                return Err(ParseError::new(
                                    "trailing comma not accepted in function call arguments",
                                    self.peek().span,
                                ));
                            }
                        } else {
                            break;
                        }
                    }
                    self.expect(")")?;
                    let span = identifier.span;
                    Ok(Expr::new(ExprKind::FunctionCall { function_name: identifier, arguments: args }, span))
                } else {
                    let span = identifier.span;
                    Ok(Expr::new(ExprKind::Identifier(identifier.name), span))
                }
            }
            _ => Err(ParseError::new(
                format!("expected '(', an integer literal or an identifier but got {:?} with '{}'", t.kind, t.text),
                t.span,
            )),
        }
    }

    fn parse_parenthesized(&mut self) -> Result<Expr, ParseError> {
        self.expect("(")?;
        let expr = self.parse_expression(false)?;
        self.expect(")")?;
        Ok(expr)
    }

    fn parse_block(&mut self) -> Result<Expr, ParseError> {
        let open = self.expect("{")?;
        let mut exprs = Vec::new();
        let mut has_semicolon = false;
        let mut prev_was_brace = false;
        let mut result_expression = Expr::new(ExprKind::Literal(None), open.span);

        while self.peek().text != "}" {
            if self.peek().text == ";" {
                self.expect(";")?;
                has_semicolon = true;
            } else {
                if !exprs.is_empty() && !has_semicolon && !prev_was_brace {
                    return Err(ParseError::new("expected ';' between expressions in block", self.peek().span));
                }
                let expr = self.parse_expression(true)?;
                prev_was_brace = self.tokens.get(self.pos - 1).map(|t| t.text.as_str()) == Some("}");
                result_expression = expr.clone();
                exprs.push(expr);
                has_semicolon = false;
            }
        }
        let close = self.expect("}")?;

        let result_expression = if has_semicolon {
            Expr::new(ExprKind::Literal(None), close.span)
        } else {
            result_expression
        };

        Ok(Expr::new(
            ExprKind::Block(Block { expressions: exprs, has_semicolon, result_expression: Box::new(result_expression) }),
            open.span,
        ))
    }

    fn parse_while_statement(&mut self) -> Result<Expr, ParseError> {
        let while_tok = self.expect("while")?;
        let the_while = Identifier::new(while_tok.text, while_tok.span);
        let condition_expr = self.parse_expression(false)?;
        let do_tok = self.expect("do")?;
        let the_do = Identifier::new(do_tok.text, do_tok.span);
        let body_expr = self.parse_expression(false)?;
        let span = while_tok.span;
        Ok(Expr::new(
            ExprKind::WhileStatement(WhileStatement {
                the_while,
                condition_expr: Box::new(condition_expr),
                the_do,
                body_expr: Box::new(body_expr),
            }),
            span,
        ))
    }

    fn parse_if_statement(&mut self) -> Result<Expr, ParseError> {
        let if_tok = self.expect("if")?;
        let the_if = Identifier::new(if_tok.text, if_tok.span);
        let first_expr = self.parse_expression(false)?;
        let then_tok = self.expect("then")?;
        let the_then = Identifier::new(then_tok.text, then_tok.span);
        let second_expr = self.parse_expression(false)?;

        let has_else = self.peek().text == "else";
        let (the_else, third_expr) = if has_else {
            let else_tok = self.expect("else")?;
            let else_ident = Identifier::new(else_tok.text, else_tok.span);
            let third = self.parse_expression(false)?;
            (Some(else_ident), Some(Box::new(third)))
        } else {
            (None, None)
        };

        let span = if_tok.span;
        Ok(Expr::new(
            ExprKind::IfStatement(IfStatement {
                the_if,
                first_expr: Box::new(first_expr),
                the_then,
                second_expr: Box::new(second_expr),
                the_else,
                third_expr,
            }),
            span,
        ))
    }

    fn parse_type(&mut self) -> Result<Type, ParseError> {
        let t = self.peek();
        if t.text == "(" {
            self.expect("(")?;
            let mut param_types = vec![self.parse_type()?];
            while self.peek().text == "," {
                self.expect(",")?;
                param_types.push(self.parse_type()?);
            }
            self.expect(")")?;

            if self.peek().text == "=" && self.peek_at(self.pos + 1).text == ">" {
                self.expect("=")?;
                self.expect(">")?;
            }

            let return_type = self.parse_type()?;
            Ok(Type::fun(param_types, return_type))
        } else if t.kind == TokenKind::Identifier {
            let t = self.consume();
            match t.text {
                "Int" => Ok(Type::Int),
                "Bool" => Ok(Type::Bool),
                "Unit" => Ok(Type::Unit),
                other => Err(ParseError::new(format!("unknown type '{other}'"), t.span)),
            }
        } else {
            Err(ParseError::new(format!("expected a type but got '{}'", t.text), t.span))
        }
    }

    fn parse_var(&mut self) -> Result<Expr, ParseError> {
        let var_tok = self.expect("var")?;
        let id = self.parse_identifier()?;
        let var_type = if self.peek().text == ":" {
            self.expect(":")?;
            Some(self.parse_type()?)
        } else {
            None
        };
        self.expect("=")?;
        let expression = self.parse_expression(false)?;
        Ok(Expr::new(
            ExprKind::VariableDeclaration(VariableDeclaration {
                id,
                expression: Box::new(expression),
                var_type,
            }),
            var_tok.span,
        ))
    }
}
