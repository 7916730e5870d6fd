//! Rewrites that fold operands through the evaluator.

use crate::evaluate::{evaluate, evaluate_integer};
use crate::numeric;
use crate::types::Value;
use num_bigint::BigInt;
use statexpr_core::build;
use statexpr_core::{AstIndex, ExprError, ExprResult, NodeId, TypeDefinition};
use std::collections::HashSet;

/// Canonical literals for the distinct values among `expressions`: at
/// most one integer literal per integer value and one boolean literal per
/// truth value, in first-seen order. Operands that do not evaluate are
/// dropped.
pub fn remove_duplicated_expressions(
    index: &mut AstIndex,
    expressions: &[NodeId],
) -> ExprResult<Vec<NodeId>> {
    let mut seen: HashSet<Value> = HashSet::new();
    let mut literals = Vec::new();
    for expression in expressions {
        let value = match evaluate(index, *expression) {
            Ok(value) => value,
            Err(err) => {
                tracing::trace!(%expression, %err, "dropping non-evaluable operand");
                continue;
            }
        };
        if !seen.insert(value.clone()) {
            continue;
        }
        let literal = match value {
            Value::Integer(v) => build::to_integer_literal(index, v)?,
            Value::Boolean(b) => build::create_boolean_literal(index, b)?,
        };
        literals.push(literal);
    }
    Ok(literals)
}

/// Enumeration literal expressions of `enumeration` selected by the
/// integer value of each expression.
pub fn map_to_enumeration_literals(
    index: &mut AstIndex,
    enumeration: NodeId,
    expressions: &[NodeId],
) -> ExprResult<Vec<NodeId>> {
    let literals = match index.type_def(enumeration)? {
        TypeDefinition::Enumeration { literals } => literals.clone(),
        _ => {
            let found = index.node(enumeration)?.variant_name();
            return Err(ExprError::unsupported(enumeration, found, "enumeration type"));
        }
    };
    let mut out = Vec::with_capacity(expressions.len());
    for expression in expressions {
        let ordinal = evaluate_integer(index, *expression)?;
        let literal = numeric::narrow::<usize>(&ordinal)
            .ok()
            .and_then(|i| literals.get(i).copied())
            .ok_or_else(|| ExprError::EnumLiteralOutOfRange {
                node: enumeration,
                ordinal: ordinal.to_string(),
            })?;
        out.push(build::create_enumeration_literal_expression(index, literal)?);
    }
    Ok(out)
}

/// Integer literal of `expression + value`.
pub fn add(index: &mut AstIndex, expression: NodeId, value: i64) -> ExprResult<NodeId> {
    let sum = evaluate_integer(index, expression)? + BigInt::from(value);
    build::to_integer_literal(index, sum)
}

/// Integer literal of `expression - value`.
pub fn subtract(index: &mut AstIndex, expression: NodeId, value: i64) -> ExprResult<NodeId> {
    let difference = evaluate_integer(index, expression)? - BigInt::from(value);
    build::to_integer_literal(index, difference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use statexpr_core::Expression;

    #[test]
    fn duplicates_collapse_per_bucket() {
        let mut index = AstIndex::new();
        let ops = [
            build::to_integer_literal(&mut index, 1).unwrap(),
            build::to_integer_literal(&mut index, 1).unwrap(),
            build::to_integer_literal(&mut index, 2).unwrap(),
            build::create_true(&mut index).unwrap(),
            build::create_true(&mut index).unwrap(),
        ];
        let out = remove_duplicated_expressions(&mut index, &ops).unwrap();
        let values: Vec<_> = out.iter().map(|e| index.expr(*e).unwrap().clone()).collect();
        assert_eq!(
            values,
            vec![
                Expression::IntegerLiteral(BigInt::from(1)),
                Expression::IntegerLiteral(BigInt::from(2)),
                Expression::True,
            ]
        );
        assert!(out.iter().all(|e| !ops.contains(e)));
    }

    #[test]
    fn non_evaluable_operands_are_dropped() {
        let mut index = AstIndex::new();
        let ty = index.add_type(TypeDefinition::Integer).unwrap();
        let x = build::create_variable_declaration(&mut index, ty, "x", None).unwrap();
        let r = build::create_reference_expression(&mut index, x).unwrap();
        let one = build::to_integer_literal(&mut index, 1).unwrap();
        let out = remove_duplicated_expressions(&mut index, &[r, one]).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn enumeration_literals_by_ordinal() {
        let mut index = AstIndex::new();
        let color = build::create_enumeration_type(&mut index, "Color", ["Red", "Green", "Blue"])
            .unwrap();
        let enum_ty = index.decl(color).unwrap().type_().unwrap();
        let two = build::to_integer_literal(&mut index, 2).unwrap();
        let zero = build::to_integer_literal(&mut index, 0).unwrap();
        let out = map_to_enumeration_literals(&mut index, enum_ty, &[two, zero]).unwrap();
        let ordinals: Vec<BigInt> = out
            .iter()
            .map(|e| evaluate_integer(&index, *e).unwrap())
            .collect();
        assert_eq!(ordinals, vec![BigInt::from(2), BigInt::from(0)]);

        let five = build::to_integer_literal(&mut index, 5).unwrap();
        assert_eq!(
            map_to_enumeration_literals(&mut index, enum_ty, &[five]).unwrap_err(),
            ExprError::EnumLiteralOutOfRange {
                node: enum_ty,
                ordinal: "5".to_string(),
            }
        );
    }

    #[test]
    fn add_and_subtract_fold_to_literals() {
        let mut index = AstIndex::new();
        let ten = build::to_integer_literal(&mut index, 10).unwrap();
        let sum = add(&mut index, ten, 5).unwrap();
        let diff = subtract(&mut index, ten, 15).unwrap();
        assert_eq!(
            index.expr(sum).unwrap(),
            &Expression::IntegerLiteral(BigInt::from(15))
        );
        assert_eq!(
            index.expr(diff).unwrap(),
            &Expression::IntegerLiteral(BigInt::from(-5))
        );
    }
}
