//! Array and message-queue access chains.

use crate::ast::*;
use crate::build;
use crate::error::{ExprError, ExprResult};
use crate::index::AstIndex;
use crate::model;

/// `queue[0]`, the head of an array-typed declaration.
pub fn peek(index: &mut AstIndex, queue: NodeId) -> ExprResult<NodeId> {
    let not_an_array = ExprError::NotAnArray { declaration: queue };
    let Some(type_) = index.decl(queue)?.type_() else {
        return Err(not_an_array);
    };
    let definition = model::type_definition_of(index, type_)?;
    if !matches!(index.type_def(definition)?, TypeDefinition::Array { .. }) {
        return Err(not_an_array);
    }
    let operand = build::create_reference_expression(index, queue)?;
    let head = build::to_integer_literal(index, 0)?;
    index.add_expr(Expression::ArrayAccess {
        operand,
        index: head,
    })
}

/// `declaration[i0][i1]...`; a plain reference when `indexes` is empty.
pub fn index(index: &mut AstIndex, declaration: NodeId, indexes: &[NodeId]) -> ExprResult<NodeId> {
    let mut access = build::create_reference_expression(index, declaration)?;
    for position in indexes {
        access = index.add_expr(Expression::ArrayAccess {
            operand: access,
            index: *position,
        })?;
    }
    Ok(access)
}
