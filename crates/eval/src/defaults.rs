//! Default (initial) values of types and variables.

use crate::evaluate::evaluate_integer;
use crate::numeric;
use rust_decimal::Decimal;
use statexpr_core::build;
use statexpr_core::model;
use statexpr_core::{
    AstIndex, DeclarationKind, DefaultsConfig, ExprError, ExprResult, Expression,
    FieldAssignment, Node, NodeId, TypeDefinition,
};

/// Fresh expression holding the zero value of `type_`:
/// `false`, `0`, `0.0`, `0/1`, the first enumeration literal, and arrays and
/// records built element-wise from those.
pub fn initial_value_of_type(index: &mut AstIndex, type_: NodeId) -> ExprResult<NodeId> {
    initial_value_of_type_with(index, type_, &DefaultsConfig::default())
}

pub fn initial_value_of_type_with(
    index: &mut AstIndex,
    type_: NodeId,
    config: &DefaultsConfig,
) -> ExprResult<NodeId> {
    match index.type_def(type_)?.clone() {
        TypeDefinition::Boolean => build::create_false(index),
        TypeDefinition::Integer => build::to_integer_literal(index, 0),
        TypeDefinition::Decimal => build::create_decimal_literal(index, Decimal::ZERO),
        TypeDefinition::Rational => build::create_rational_literal(index, 0, 1),

        TypeDefinition::Enumeration { literals } => match literals.first() {
            Some(first) => build::create_enumeration_literal_expression(index, *first),
            None => Err(ExprError::EmptyEnum { node: type_ }),
        },

        TypeDefinition::Array { element_type, size } => {
            let length = evaluate_integer(index, size)?;
            let length: usize = numeric::narrow(&length)?;
            if length > config.max_array_length {
                return Err(ExprError::ArrayTooLarge {
                    length,
                    limit: config.max_array_length,
                });
            }
            let mut operands = Vec::with_capacity(length);
            for _ in 0..length {
                operands.push(initial_value_of_type_with(index, element_type, config)?);
            }
            index.add_expr(Expression::ArrayLiteral { operands })
        }

        TypeDefinition::Record { fields } => {
            let type_declaration = model::type_declaration_of(index, type_)?
                .ok_or(ExprError::RecordNotContained { node: type_ })?;
            let mut field_assignments = Vec::with_capacity(fields.len());
            for field in fields {
                let field_type = model::declared_type_of(index, field)?;
                let reference = index.add_expr(Expression::FieldReference { field })?;
                let value = initial_value_of_type_with(index, field_type, config)?;
                field_assignments.push(
                    index.add(Node::FieldAssignment(FieldAssignment { reference, value }))?,
                );
            }
            index.add_expr(Expression::RecordLiteral {
                type_declaration,
                field_assignments,
            })
        }

        TypeDefinition::Reference { target } => {
            let target_type = model::declared_type_of(index, target)?;
            initial_value_of_type_with(index, target_type, config)
        }
    }
}

/// A copy of the variable's initializer, or the default of its type when
/// it has none.
pub fn initial_value_of(index: &mut AstIndex, variable: NodeId) -> ExprResult<NodeId> {
    let decl = index.decl(variable)?;
    let DeclarationKind::Variable {
        type_, initializer, ..
    } = decl.kind
    else {
        return Err(ExprError::unsupported(
            variable,
            decl.kind_name(),
            "variable declaration",
        ));
    };
    match initializer {
        Some(expression) => index.clone_subtree(expression),
        None => initial_value_of_type(index, type_),
    }
}

/// Variable of `type_` initialized with the type's default value.
pub fn create_variable_declaration_with_default_initial_value(
    index: &mut AstIndex,
    type_: NodeId,
    name: impl Into<String>,
) -> ExprResult<NodeId> {
    let value = initial_value_of_type(index, type_)?;
    build::create_variable_declaration(index, type_, name, Some(value))
}
