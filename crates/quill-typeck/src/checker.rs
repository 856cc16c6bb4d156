//! Single-pass type checker: walks an [`Expr`] tree, writes the inferred
//! type back onto each node via [`Expr::set_ty`], and returns the root's
//! type or the first [`TypeError`] encountered.

use quill_common::Type;
use quill_parser::ast::{BinOp, Expr, ExprKind, LiteralValue, UnaryOp};

use crate::builtins;
use crate::error::TypeError;
use crate::symtab::SymbolTable;

/// Type-check a complete expression tree, seeding the symbol table with the
/// runtime builtins from `spec.md` §4.3.
pub fn typecheck(root: &Expr) -> Result<Type, TypeError> {
    let mut table = SymbolTable::new();
    builtins::seed(&mut table);
    check(root, &mut table)
}

/// The signature of a binary operator: both operand types and the result
/// type, per `spec.md` §4.3's operator table. `None` for `==`/`!=`/`=`,
/// which are polymorphic and handled separately.
fn binop_signature(op: BinOp) -> Option<(Type, Type, Type)> {
    match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => {
            Some((Type::Int, Type::Int, Type::Int))
        }
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => Some((Type::Int, Type::Int, Type::Bool)),
        BinOp::And | BinOp::Or => Some((Type::Bool, Type::Bool, Type::Bool)),
        BinOp::Eq | BinOp::Ne | BinOp::Assign => None,
    }
}

fn check(expr: &Expr, table: &mut SymbolTable) -> Result<Type, TypeError> {
    let ty = check_kind(expr, table)?;
    expr.set_ty(ty.clone());
    Ok(ty)
}

fn check_kind(expr: &Expr, table: &mut SymbolTable) -> Result<Type, TypeError> {
    match &expr.kind {
        ExprKind::Literal(None) => Ok(Type::Unit),
        ExprKind::Literal(Some(LiteralValue::Int(_))) => Ok(Type::Int),
        ExprKind::Literal(Some(LiteralValue::Bool(_))) => Ok(Type::Bool),

        ExprKind::EmptyInput => Ok(Type::Unit),

        ExprKind::Identifier(name) => table
            .lookup(name)
            .cloned()
            .ok_or_else(|| TypeError::UnboundVariable { name: name.clone(), span: expr.span }),

        ExprKind::UnaryOperator { op, right } => {
            let right_ty = check(right, table)?;
            let (expected, result) = match op {
                UnaryOp::Neg => (Type::Int, Type::Int),
                UnaryOp::Not => (Type::Bool, Type::Bool),
            };
            if right_ty != expected {
                return Err(TypeError::OperatorMismatch {
                    op: op.to_string(),
                    expected: expected.to_string(),
                    found: vec![right_ty],
                    span: expr.span,
                });
            }
            Ok(result)
        }

        ExprKind::BinaryOp { left, op: BinOp::Assign, right } => {
            let left_ty = check(left, table)?;
            let right_ty = check(right, table)?;
            if left_ty != right_ty {
                return Err(TypeError::OperatorMismatch {
                    op: "=".into(),
                    expected: left_ty.to_string(),
                    found: vec![right_ty],
                    span: expr.span,
                });
            }
            if let ExprKind::Identifier(name) = &left.kind {
                table.define(name.clone(), right_ty);
            }
            Ok(Type::Unit)
        }

        ExprKind::BinaryOp { left, op: op @ (BinOp::Eq | BinOp::Ne), right } => {
            let left_ty = check(left, table)?;
            let right_ty = check(right, table)?;
            if left_ty != right_ty {
                return Err(TypeError::OperatorMismatch {
                    op: op.to_string(),
                    expected: format!("two operands of equal type, got '{left_ty}'"),
                    found: vec![right_ty],
                    span: expr.span,
                });
            }
            Ok(Type::Bool)
        }

        ExprKind::BinaryOp { left, op, right } => {
            let (expected_left, expected_right, result) =
                binop_signature(*op).expect("Assign/Eq/Ne handled above");
            let left_ty = check(left, table)?;
            let right_ty = check(right, table)?;
            if left_ty != expected_left || right_ty != expected_right {
                return Err(TypeError::OperatorMismatch {
                    op: op.to_string(),
                    expected: format!("({expected_left}, {expected_right})"),
                    found: vec![left_ty, right_ty],
                    span: expr.span,
                });
            }
            Ok(result)
        }

        ExprKind::IfStatement(s) => {
            let cond_ty = check(&s.first_expr, table)?;
            if cond_ty != Type::Bool {
                return Err(TypeError::NonBooleanCondition { found: cond_ty, span: s.first_expr.span });
            }
            let then_ty = check(&s.second_expr, table)?;
            match &s.third_expr {
                Some(else_expr) => {
                    let else_ty = check(else_expr, table)?;
                    if then_ty != else_ty {
                        return Err(TypeError::BranchMismatch { then_ty, else_ty, span: expr.span });
                    }
                    Ok(then_ty)
                }
                // Without else the then-branch is still checked, but the
                // if's own type is Unit (preserved design choice, spec.md §9).
                None => Ok(Type::Unit),
            }
        }

        ExprKind::WhileStatement(s) => {
            let cond_ty = check(&s.condition_expr, table)?;
            if cond_ty != Type::Bool {
                return Err(TypeError::NonBooleanCondition { found: cond_ty, span: s.condition_expr.span });
            }
            check(&s.body_expr, table)?;
            Ok(Type::Unit)
        }

        ExprKind::Block(block) => {
            table.push_scope();
            let result = (|| {
                for e in &block.expressions {
                    check(e, table)?;
                }
                if block.has_semicolon {
                    Ok(Type::Unit)
                } else {
                    check(&block.result_expression, table)
                }
            })();
            table.pop_scope();
            result
        }

        ExprKind::VariableDeclaration(decl) => {
            let rhs_ty = check(&decl.expression, table)?;
            if let Some(declared) = &decl.var_type {
                if *declared != rhs_ty {
                    return Err(TypeError::AnnotationMismatch {
                        declared: declared.clone(),
                        found: rhs_ty,
                        span: expr.span,
                    });
                }
            }
            table.define(decl.id.name.clone(), rhs_ty);
            Ok(Type::Unit)
        }

        ExprKind::FunctionCall { function_name, arguments } => {
            let fn_ty = table
                .lookup(&function_name.name)
                .cloned()
                .ok_or_else(|| TypeError::UnboundVariable {
                    name: function_name.name.clone(),
                    span: function_name.span,
                })?;
            let fun = fn_ty.as_fun().ok_or_else(|| TypeError::NotCallable {
                name: function_name.name.clone(),
                found: fn_ty.clone(),
                span: function_name.span,
            })?;
            if fun.params.len() != arguments.len() {
                return Err(TypeError::ArityMismatch {
                    name: function_name.name.clone(),
                    expected: fun.params.len(),
                    found: arguments.len(),
                    span: expr.span,
                });
            }
            for (i, (arg, expected)) in arguments.iter().zip(fun.params.iter()).enumerate() {
                let arg_ty = check(arg, table)?;
                if arg_ty != *expected {
                    return Err(TypeError::ArgumentMismatch {
                        name: function_name.name.clone(),
                        index: i,
                        expected: expected.clone(),
                        found: arg_ty,
                        span: arg.span,
                    });
                }
            }
            Ok((*fun.return_type).clone())
        }
    }
}
