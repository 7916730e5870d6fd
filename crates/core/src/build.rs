//! Constructors for declarations and composite expressions.
//!
//! Every builder allocates fresh nodes in the index and returns the handle
//! of the root it created. Operands passed in must be detached; they end up
//! contained by the new node.

use crate::ast::*;
use crate::error::{ExprError, ExprResult};
use crate::index::AstIndex;
use crate::model;
use num_bigint::BigInt;
use rust_decimal::Decimal;

// ──────────────────────────────────────────────
// Literals and references
// ──────────────────────────────────────────────

pub fn create_true(index: &mut AstIndex) -> ExprResult<NodeId> {
    index.add_expr(Expression::True)
}

pub fn create_false(index: &mut AstIndex) -> ExprResult<NodeId> {
    index.add_expr(Expression::False)
}

pub fn create_boolean_literal(index: &mut AstIndex, value: bool) -> ExprResult<NodeId> {
    if value {
        create_true(index)
    } else {
        create_false(index)
    }
}

pub fn to_integer_literal(index: &mut AstIndex, value: impl Into<BigInt>) -> ExprResult<NodeId> {
    index.add_expr(Expression::IntegerLiteral(value.into()))
}

pub fn create_decimal_literal(index: &mut AstIndex, value: Decimal) -> ExprResult<NodeId> {
    index.add_expr(Expression::DecimalLiteral(value))
}

pub fn create_rational_literal(
    index: &mut AstIndex,
    numerator: impl Into<BigInt>,
    denominator: impl Into<BigInt>,
) -> ExprResult<NodeId> {
    index.add_expr(Expression::RationalLiteral {
        numerator: numerator.into(),
        denominator: denominator.into(),
    })
}

pub fn create_reference_expression(index: &mut AstIndex, declaration: NodeId) -> ExprResult<NodeId> {
    index.add_expr(Expression::DirectReference { declaration })
}

pub fn create_type_reference(index: &mut AstIndex, type_declaration: NodeId) -> ExprResult<NodeId> {
    index.add_type(TypeDefinition::Reference {
        target: type_declaration,
    })
}

/// Literal expression for `literal`, typed through a reference to the
/// type declaration owning its enumeration.
pub fn create_enumeration_literal_expression(
    index: &mut AstIndex,
    literal: NodeId,
) -> ExprResult<NodeId> {
    let type_declaration = match model::type_declaration_of(index, literal)? {
        Some(decl) => decl,
        None => {
            let owner = index.container(literal)?.unwrap_or(literal);
            return Err(ExprError::EnumNotContained { node: owner });
        }
    };
    let type_reference = create_type_reference(index, type_declaration)?;
    index.add_expr(Expression::EnumerationLiteral {
        literal,
        type_reference,
    })
}

pub fn create_integer_range_literal_expression(
    index: &mut AstIndex,
    start: NodeId,
    left_inclusive: bool,
    end: NodeId,
    right_inclusive: bool,
) -> ExprResult<NodeId> {
    index.add_expr(Expression::IntegerRange {
        left: start,
        right: end,
        left_inclusive,
        right_inclusive,
    })
}

// ──────────────────────────────────────────────
// Declarations
// ──────────────────────────────────────────────

pub fn create_type_definition(index: &mut AstIndex, type_def: TypeDefinition) -> ExprResult<NodeId> {
    index.add_type(type_def)
}

pub fn wrap_into_declaration(
    index: &mut AstIndex,
    type_: NodeId,
    name: impl Into<String>,
) -> ExprResult<NodeId> {
    index.add_decl(name, DeclarationKind::Type { type_ })
}

pub fn create_variable_declaration(
    index: &mut AstIndex,
    type_: NodeId,
    name: impl Into<String>,
    initializer: Option<NodeId>,
) -> ExprResult<NodeId> {
    index.add_decl(
        name,
        DeclarationKind::Variable {
            type_,
            initializer,
            annotations: vec![],
        },
    )
}

pub fn create_parameter_declaration(
    index: &mut AstIndex,
    type_: NodeId,
    name: impl Into<String>,
) -> ExprResult<NodeId> {
    index.add_decl(name, DeclarationKind::Parameter { type_ })
}

pub fn create_constant_declaration(
    index: &mut AstIndex,
    type_: NodeId,
    name: impl Into<String>,
    expression: NodeId,
) -> ExprResult<NodeId> {
    index.add_decl(name, DeclarationKind::Constant { type_, expression })
}

pub fn create_field_declaration(
    index: &mut AstIndex,
    type_: NodeId,
    name: impl Into<String>,
) -> ExprResult<NodeId> {
    index.add_decl(name, DeclarationKind::Field { type_ })
}

/// Enumeration type with one literal per name, wrapped into a type
/// declaration. Returns the declaration.
pub fn create_enumeration_type<S: Into<String>>(
    index: &mut AstIndex,
    name: impl Into<String>,
    literal_names: impl IntoIterator<Item = S>,
) -> ExprResult<NodeId> {
    let mut literals = Vec::new();
    for literal in literal_names {
        literals.push(index.add_decl(literal, DeclarationKind::EnumerationLiteral)?);
    }
    let enumeration = index.add_type(TypeDefinition::Enumeration { literals })?;
    wrap_into_declaration(index, enumeration, name)
}

pub fn create_package(
    index: &mut AstIndex,
    name: impl Into<String>,
    declarations: Vec<NodeId>,
    expressions: Vec<NodeId>,
) -> ExprResult<NodeId> {
    index.add(Node::Package(Package {
        name: name.into(),
        declarations,
        expressions,
    }))
}

// ──────────────────────────────────────────────
// Compositions
// ──────────────────────────────────────────────

pub fn create_not_expression(index: &mut AstIndex, operand: NodeId) -> ExprResult<NodeId> {
    index.add_expr(Expression::Not { operand })
}

pub fn create_if_then_else_expression(
    index: &mut AstIndex,
    condition: NodeId,
    then: NodeId,
    else_: NodeId,
) -> ExprResult<NodeId> {
    index.add_expr(Expression::IfThenElse {
        condition,
        then,
        else_,
    })
}

pub fn create_binary_expression(
    index: &mut AstIndex,
    op: BinaryOp,
    left: NodeId,
    right: NodeId,
) -> ExprResult<NodeId> {
    index.add_expr(Expression::Binary { op, left, right })
}

pub fn create_equality_expression(index: &mut AstIndex, lhs: NodeId, rhs: NodeId) -> ExprResult<NodeId> {
    create_binary_expression(index, BinaryOp::Equal, lhs, rhs)
}

pub fn create_inequality_expression(
    index: &mut AstIndex,
    lhs: NodeId,
    rhs: NodeId,
) -> ExprResult<NodeId> {
    create_binary_expression(index, BinaryOp::NotEqual, lhs, rhs)
}

pub fn create_less_expression(index: &mut AstIndex, lhs: NodeId, rhs: NodeId) -> ExprResult<NodeId> {
    create_binary_expression(index, BinaryOp::Less, lhs, rhs)
}

/// `if lhs < rhs then lhs else rhs`, branches holding copies.
pub fn create_min_expression(index: &mut AstIndex, lhs: NodeId, rhs: NodeId) -> ExprResult<NodeId> {
    let then = index.clone_subtree(lhs)?;
    let else_ = index.clone_subtree(rhs)?;
    let condition = create_less_expression(index, lhs, rhs)?;
    create_if_then_else_expression(index, condition, then, else_)
}

/// `if lhs < rhs then rhs else lhs`, branches holding copies.
pub fn create_max_expression(index: &mut AstIndex, lhs: NodeId, rhs: NodeId) -> ExprResult<NodeId> {
    let then = index.clone_subtree(rhs)?;
    let else_ = index.clone_subtree(lhs)?;
    let condition = create_less_expression(index, lhs, rhs)?;
    create_if_then_else_expression(index, condition, then, else_)
}

pub fn create_multiary_expression(
    index: &mut AstIndex,
    op: MultiaryOp,
    operands: Vec<NodeId>,
) -> ExprResult<NodeId> {
    index.add_expr(Expression::Multiary { op, operands })
}

// ──────────────────────────────────────────────
// Arithmetic wrappers
// ──────────────────────────────────────────────

/// `expression + value`
pub fn wrap_into_add(index: &mut AstIndex, expression: NodeId, value: i64) -> ExprResult<NodeId> {
    let literal = to_integer_literal(index, value)?;
    create_multiary_expression(index, MultiaryOp::Add, vec![expression, literal])
}

/// `expression - value`
pub fn wrap_into_subtract(index: &mut AstIndex, expression: NodeId, value: i64) -> ExprResult<NodeId> {
    let literal = to_integer_literal(index, value)?;
    create_binary_expression(index, BinaryOp::Subtract, expression, literal)
}

/// `expression * value`
pub fn wrap_into_multiply(index: &mut AstIndex, expression: NodeId, value: i64) -> ExprResult<NodeId> {
    let literal = to_integer_literal(index, value)?;
    create_multiary_expression(index, MultiaryOp::Multiply, vec![expression, literal])
}

pub fn create_increment_expression(index: &mut AstIndex, variable: NodeId) -> ExprResult<NodeId> {
    let reference = create_reference_expression(index, variable)?;
    wrap_into_add(index, reference, 1)
}

pub fn create_decrement_expression(index: &mut AstIndex, variable: NodeId) -> ExprResult<NodeId> {
    let reference = create_reference_expression(index, variable)?;
    wrap_into_subtract(index, reference, 1)
}

// ──────────────────────────────────────────────
// Multiary assembly
// ──────────────────────────────────────────────

/// Joins `original` and `addition` under a new `op` node. A missing side
/// yields the other one unchanged; no node is created in that case.
pub fn wrap_into_multiary_expression(
    index: &mut AstIndex,
    original: Option<NodeId>,
    addition: Option<NodeId>,
    op: MultiaryOp,
) -> ExprResult<Option<NodeId>> {
    match (original, addition) {
        (None, other) | (other, None) => Ok(other),
        (Some(original), Some(addition)) => {
            create_multiary_expression(index, op, vec![original, addition]).map(Some)
        }
    }
}

/// Collects `original` and every addition. Returns `None` when nothing is
/// left, the single operand when there is one, and a new `op` node
/// otherwise.
pub fn wrap_into_multiary_expression_all(
    index: &mut AstIndex,
    original: Option<NodeId>,
    additions: impl IntoIterator<Item = Option<NodeId>>,
    op: MultiaryOp,
) -> ExprResult<Option<NodeId>> {
    let operands: Vec<NodeId> = original
        .into_iter()
        .chain(additions.into_iter().flatten())
        .collect();
    wrap_into_multiary_of(index, operands, op)
}

pub fn wrap_into_multiary_of(
    index: &mut AstIndex,
    expressions: Vec<NodeId>,
    op: MultiaryOp,
) -> ExprResult<Option<NodeId>> {
    match expressions.len() {
        0 => Ok(None),
        1 => Ok(expressions.first().copied()),
        _ => create_multiary_expression(index, op, expressions).map(Some),
    }
}

pub fn wrap_into_or_expression(
    index: &mut AstIndex,
    expressions: Vec<NodeId>,
) -> ExprResult<Option<NodeId>> {
    wrap_into_multiary_of(index, expressions, MultiaryOp::Or)
}

/// Puts a new `op` node in the place of `original` and moves `original`
/// into it, next to `addition`.
pub fn replace_and_wrap_into_multiary_expression(
    index: &mut AstIndex,
    original: NodeId,
    addition: NodeId,
    op: MultiaryOp,
) -> ExprResult<NodeId> {
    index.ensure_attachable(addition, original)?;
    let container = create_multiary_expression(index, op, vec![])?;
    index.replace(container, original)?;
    index.append(container, original)?;
    index.append(container, addition)?;
    Ok(container)
}

/// Puts a new `op` node in the place of `expression` holding the
/// expression and a copy of it.
pub fn clone_into_multiary_expression(
    index: &mut AstIndex,
    expression: NodeId,
    op: MultiaryOp,
) -> ExprResult<NodeId> {
    let container = create_multiary_expression(index, op, vec![])?;
    index.replace(container, expression)?;
    let copy = index.clone_subtree(expression)?;
    index.append(container, expression)?;
    index.append(container, copy)?;
    Ok(container)
}

// ──────────────────────────────────────────────
// Negation chains
// ──────────────────────────────────────────────

/// Conjunction of the negated expressions; `And(true)` when there are none.
pub fn connect_via_negations(
    index: &mut AstIndex,
    to_be_negated: impl IntoIterator<Item = NodeId>,
) -> ExprResult<NodeId> {
    let mut operands = Vec::new();
    for expression in to_be_negated {
        operands.push(create_not_expression(index, expression)?);
    }
    if operands.is_empty() {
        operands.push(create_true(index)?);
    }
    create_multiary_expression(index, MultiaryOp::And, operands)
}

/// `And(!d1, !d2, ...)` over references to the given declarations.
pub fn connect_through_negations(
    index: &mut AstIndex,
    to_be_negated: impl IntoIterator<Item = NodeId>,
) -> ExprResult<NodeId> {
    let mut references = Vec::new();
    for declaration in to_be_negated {
        references.push(create_reference_expression(index, declaration)?);
    }
    connect_via_negations(index, references)
}

/// Like [`connect_through_negations`], with a positive reference to
/// `ponate` as the last conjunct.
pub fn connect_through_negations_with_ponate(
    index: &mut AstIndex,
    ponate: NodeId,
    to_be_negated: impl IntoIterator<Item = NodeId>,
) -> ExprResult<NodeId> {
    let and = connect_through_negations(index, to_be_negated)?;
    let reference = create_reference_expression(index, ponate)?;
    index.append(and, reference)?;
    Ok(and)
}

// ──────────────────────────────────────────────
// Unwrapping
// ──────────────────────────────────────────────

/// Strips single-operand multiary wrappers.
pub fn unwrap_if_possible(index: &AstIndex, expression: NodeId) -> ExprResult<NodeId> {
    let mut current = expression;
    while let Some((_, operands)) = index.expr(current)?.multiary() {
        match operands {
            [] => return Err(ExprError::EmptyMultiary { node: current }),
            [single] => current = *single,
            _ => break,
        }
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_variable(index: &mut AstIndex, name: &str) -> NodeId {
        let ty = index.add_type(TypeDefinition::Integer).unwrap();
        create_variable_declaration(index, ty, name, None).unwrap()
    }

    #[test]
    fn enumeration_literal_expression_references_its_type_declaration() {
        let mut index = AstIndex::new();
        let color = create_enumeration_type(&mut index, "Color", ["Red", "Green"]).unwrap();
        let enum_ty = index.decl(color).unwrap().type_().unwrap();
        let TypeDefinition::Enumeration { literals } = index.type_def(enum_ty).unwrap().clone() else {
            panic!("expected enumeration");
        };
        let green = create_enumeration_literal_expression(&mut index, literals[1]).unwrap();
        let Expression::EnumerationLiteral {
            literal,
            type_reference,
        } = index.expr(green).unwrap().clone()
        else {
            panic!("expected enumeration literal");
        };
        assert_eq!(literal, literals[1]);
        assert_eq!(
            index.type_def(type_reference).unwrap(),
            &TypeDefinition::Reference { target: color }
        );
    }

    #[test]
    fn enumeration_outside_type_declaration_is_rejected() {
        let mut index = AstIndex::new();
        let red = index.add_decl("Red", DeclarationKind::EnumerationLiteral).unwrap();
        let enum_ty = index
            .add_type(TypeDefinition::Enumeration { literals: vec![red] })
            .unwrap();
        assert_eq!(
            create_enumeration_literal_expression(&mut index, red).unwrap_err(),
            ExprError::EnumNotContained { node: enum_ty }
        );
    }

    #[test]
    fn arithmetic_wrappers_shape() {
        let mut index = AstIndex::new();
        let x = int_variable(&mut index, "x");
        let inc = create_increment_expression(&mut index, x).unwrap();
        let (op, operands) = index.expr(inc).unwrap().multiary().unwrap();
        assert_eq!(op, MultiaryOp::Add);
        assert_eq!(operands.len(), 2);
        assert_eq!(
            index.expr(operands[1]).unwrap(),
            &Expression::IntegerLiteral(BigInt::from(1))
        );

        let dec = create_decrement_expression(&mut index, x).unwrap();
        let (op, _, right) = index.expr(dec).unwrap().binary().unwrap();
        assert_eq!(op, BinaryOp::Subtract);
        assert_eq!(
            index.expr(right).unwrap(),
            &Expression::IntegerLiteral(BigInt::from(1))
        );
    }

    #[test]
    fn min_and_max_copy_their_branches() {
        let mut index = AstIndex::new();
        let a = to_integer_literal(&mut index, 3).unwrap();
        let b = to_integer_literal(&mut index, 5).unwrap();
        let min = create_min_expression(&mut index, a, b).unwrap();
        let Expression::IfThenElse {
            condition,
            then,
            else_,
        } = index.expr(min).unwrap().clone()
        else {
            panic!("expected conditional");
        };
        assert_eq!(index.container(a).unwrap(), Some(condition));
        assert_ne!(then, a);
        assert!(index.helper_equals(then, a));
        assert!(index.helper_equals(else_, b));

        let c = to_integer_literal(&mut index, 3).unwrap();
        let d = to_integer_literal(&mut index, 5).unwrap();
        let max = create_max_expression(&mut index, c, d).unwrap();
        let Expression::IfThenElse { then, else_, .. } = index.expr(max).unwrap().clone() else {
            panic!("expected conditional");
        };
        assert!(index.helper_equals(then, d));
        assert!(index.helper_equals(else_, c));
    }

    #[test]
    fn pair_wrapping_skips_missing_sides() {
        let mut index = AstIndex::new();
        let t = create_true(&mut index).unwrap();
        let before = index.len();
        assert_eq!(
            wrap_into_multiary_expression(&mut index, None, Some(t), MultiaryOp::And).unwrap(),
            Some(t)
        );
        assert_eq!(
            wrap_into_multiary_expression(&mut index, Some(t), None, MultiaryOp::And).unwrap(),
            Some(t)
        );
        assert_eq!(index.len(), before);
        let f = create_false(&mut index).unwrap();
        let and = wrap_into_multiary_expression(&mut index, Some(t), Some(f), MultiaryOp::And)
            .unwrap()
            .unwrap();
        assert_eq!(index.expr(and).unwrap().multiary().unwrap().1, &[t, f]);
    }

    #[test]
    fn collection_wrapping_drops_missing_operands() {
        let mut index = AstIndex::new();
        assert_eq!(
            wrap_into_multiary_expression_all(&mut index, None, [None, None], MultiaryOp::Or)
                .unwrap(),
            None
        );
        let t = create_true(&mut index).unwrap();
        assert_eq!(
            wrap_into_multiary_expression_all(&mut index, None, [None, Some(t)], MultiaryOp::Or)
                .unwrap(),
            Some(t)
        );
        let f = create_false(&mut index).unwrap();
        let or = wrap_into_multiary_expression_all(&mut index, Some(f), [Some(t)], MultiaryOp::Or)
            .unwrap()
            .unwrap();
        assert_eq!(
            index.expr(or).unwrap().multiary().unwrap(),
            (MultiaryOp::Or, &[f, t][..])
        );
        assert_eq!(wrap_into_or_expression(&mut index, vec![]).unwrap(), None);
    }

    #[test]
    fn replace_and_wrap_takes_the_original_slot() {
        let mut index = AstIndex::new();
        let t = create_true(&mut index).unwrap();
        let not = create_not_expression(&mut index, t).unwrap();
        let f = create_false(&mut index).unwrap();
        let and =
            replace_and_wrap_into_multiary_expression(&mut index, t, f, MultiaryOp::And).unwrap();
        assert_eq!(index.expr(not).unwrap(), &Expression::Not { operand: and });
        assert_eq!(index.expr(and).unwrap().multiary().unwrap().1, &[t, f]);
        assert_eq!(index.container(t).unwrap(), Some(and));
    }

    #[test]
    fn replace_and_wrap_rejects_an_addition_holding_the_original() {
        let mut index = AstIndex::new();
        let t = create_true(&mut index).unwrap();
        let not = create_not_expression(&mut index, t).unwrap();
        let before = index.len();
        assert_eq!(
            replace_and_wrap_into_multiary_expression(&mut index, t, not, MultiaryOp::And)
                .unwrap_err(),
            ExprError::ContainmentCycle {
                node: not,
                container: t,
            }
        );
        assert_eq!(index.len(), before);
        assert_eq!(index.container(t).unwrap(), Some(not));
        assert_eq!(index.container(not).unwrap(), None);
    }

    #[test]
    fn clone_into_multiary_duplicates_operand() {
        let mut index = AstIndex::new();
        let x = int_variable(&mut index, "x");
        let r = create_reference_expression(&mut index, x).unwrap();
        let not = create_not_expression(&mut index, r).unwrap();
        let or = clone_into_multiary_expression(&mut index, r, MultiaryOp::Or).unwrap();
        assert_eq!(index.expr(not).unwrap(), &Expression::Not { operand: or });
        let operands = index.expr(or).unwrap().multiary().unwrap().1.to_vec();
        assert_eq!(operands[0], r);
        assert!(index.helper_equals(operands[0], operands[1]));
    }

    #[test]
    fn negation_chains() {
        let mut index = AstIndex::new();
        let empty = connect_through_negations(&mut index, []).unwrap();
        let operands = index.expr(empty).unwrap().multiary().unwrap().1.to_vec();
        assert_eq!(operands.len(), 1);
        assert_eq!(index.expr(operands[0]).unwrap(), &Expression::True);

        let a = int_variable(&mut index, "a");
        let b = int_variable(&mut index, "b");
        let p = int_variable(&mut index, "p");
        let and = connect_through_negations_with_ponate(&mut index, p, [a, b]).unwrap();
        let operands = index.expr(and).unwrap().multiary().unwrap().1.to_vec();
        assert_eq!(operands.len(), 3);
        let Expression::Not { operand } = index.expr(operands[0]).unwrap().clone() else {
            panic!("expected negation");
        };
        assert_eq!(
            index.expr(operand).unwrap(),
            &Expression::DirectReference { declaration: a }
        );
        assert_eq!(
            index.expr(operands[2]).unwrap(),
            &Expression::DirectReference { declaration: p }
        );
    }

    #[test]
    fn unwrap_strips_single_operand_wrappers() {
        let mut index = AstIndex::new();
        let t = create_true(&mut index).unwrap();
        let f = create_false(&mut index).unwrap();
        let pair = create_multiary_expression(&mut index, MultiaryOp::And, vec![t, f]).unwrap();
        let inner = create_multiary_expression(&mut index, MultiaryOp::Or, vec![pair]).unwrap();
        let outer = create_multiary_expression(&mut index, MultiaryOp::And, vec![inner]).unwrap();
        assert_eq!(unwrap_if_possible(&index, outer).unwrap(), pair);
        assert_eq!(unwrap_if_possible(&index, pair).unwrap(), pair);

        let empty = create_multiary_expression(&mut index, MultiaryOp::Add, vec![]).unwrap();
        assert_eq!(
            unwrap_if_possible(&index, empty).unwrap_err(),
            ExprError::EmptyMultiary { node: empty }
        );
    }
}
