//! Constant evaluation of expressions.
//!
//! Only closed expressions evaluate: literals, references to constants and
//! operators over them. Anything else (free references, decimals, ranges,
//! composite literals, accesses) is `NotEvaluable`. There is no partial or
//! three-valued evaluation here; the decider builds that on top.

use crate::numeric;
use crate::types::Value;
use num_bigint::BigInt;
use num_traits::{One, Zero};
use statexpr_core::model;
use statexpr_core::{
    AstIndex, BinaryOp, DeclarationKind, ExprError, ExprResult, Expression, MultiaryOp, NodeId,
};

/// Evaluates `expression` to an integer or a boolean.
pub fn evaluate(index: &AstIndex, expression: NodeId) -> ExprResult<Value> {
    match index.expr(expression)? {
        Expression::True => Ok(Value::Boolean(true)),
        Expression::False => Ok(Value::Boolean(false)),
        Expression::IntegerLiteral(v) => Ok(Value::Integer(v.clone())),
        Expression::EnumerationLiteral { literal, .. } => {
            let ordinal = model::ordinal_of(index, *literal)?;
            Ok(Value::Integer(BigInt::from(ordinal)))
        }

        Expression::DirectReference { declaration } => {
            let decl = index.decl(*declaration)?;
            match &decl.kind {
                DeclarationKind::Constant { expression: value, .. } => evaluate(index, *value),
                _ => Err(ExprError::not_evaluable(
                    expression,
                    format!("free reference to {} '{}'", decl.kind_name(), decl.name),
                )),
            }
        }

        Expression::Not { operand } => {
            let value = evaluate(index, *operand)?.as_bool(*operand)?;
            Ok(Value::Boolean(!value))
        }

        Expression::Multiary { op, operands } => match op {
            MultiaryOp::And | MultiaryOp::Or => {
                // every operand must evaluate, even past a deciding one
                let mut values = Vec::with_capacity(operands.len());
                for operand in operands {
                    values.push(evaluate(index, *operand)?.as_bool(*operand)?);
                }
                let result = match op {
                    MultiaryOp::And => values.iter().all(|v| *v),
                    _ => values.iter().any(|v| *v),
                };
                Ok(Value::Boolean(result))
            }
            MultiaryOp::Add => {
                let mut sum = BigInt::zero();
                for operand in operands {
                    sum += evaluate_integer(index, *operand)?;
                }
                Ok(Value::Integer(sum))
            }
            MultiaryOp::Multiply => {
                let mut product = BigInt::one();
                for operand in operands {
                    product *= evaluate_integer(index, *operand)?;
                }
                Ok(Value::Integer(product))
            }
        },

        Expression::Binary { op, left, right } => {
            let left_value = evaluate(index, *left)?;
            let right_value = evaluate(index, *right)?;
            eval_binary(expression, *op, left_value, right_value)
        }

        Expression::IfThenElse {
            condition,
            then,
            else_,
        } => {
            if evaluate_boolean(index, *condition)? {
                evaluate(index, *then)
            } else {
                evaluate(index, *else_)
            }
        }

        other => Err(ExprError::not_evaluable(
            expression,
            format!("{} is not a constant expression", other.variant_name()),
        )),
    }
}

fn eval_binary(node: NodeId, op: BinaryOp, left: Value, right: Value) -> ExprResult<Value> {
    match (op, left, right) {
        (BinaryOp::Subtract, Value::Integer(l), Value::Integer(r)) => Ok(Value::Integer(l - r)),
        (BinaryOp::Equal, Value::Boolean(l), Value::Boolean(r)) => Ok(Value::Boolean(l == r)),
        (BinaryOp::NotEqual, Value::Boolean(l), Value::Boolean(r)) => Ok(Value::Boolean(l != r)),
        (op, Value::Integer(l), Value::Integer(r)) => numeric::compare_integers(op, &l, &r)
            .map(Value::Boolean)
            .ok_or_else(|| ExprError::not_evaluable(node, "unsupported integer operator")),
        (op, l, r) => Err(ExprError::not_evaluable(
            node,
            format!(
                "cannot apply '{}' to {} and {}",
                op.symbol(),
                l.type_name(),
                r.type_name()
            ),
        )),
    }
}

pub fn evaluate_integer(index: &AstIndex, expression: NodeId) -> ExprResult<BigInt> {
    evaluate(index, expression)?.into_integer(expression)
}

pub fn evaluate_boolean(index: &AstIndex, expression: NodeId) -> ExprResult<bool> {
    evaluate(index, expression)?.as_bool(expression)
}

/// Evaluates to an integer and narrows it into `T`. Values outside the
/// range of `T` fail with `IntegerOverflow`.
pub fn evaluate_host_integer<T>(index: &AstIndex, expression: NodeId) -> ExprResult<T>
where
    T: for<'a> TryFrom<&'a BigInt>,
{
    let value = evaluate_integer(index, expression)?;
    numeric::narrow(&value)
}
