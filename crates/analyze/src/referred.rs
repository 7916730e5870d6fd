//! Declarations referred to by an expression.
//!
//! Three parallel analyses collect the variables, parameters and constants
//! an expression refers to directly. A reference to a constant does not
//! descend into the constant's own expression. Array accesses contribute
//! both their operand and their index.

use statexpr_core::{AstIndex, Declaration, ExprError, ExprResult, Expression, Node, NodeId};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclarationClass {
    Variable,
    Parameter,
    Constant,
}

impl DeclarationClass {
    fn matches(self, decl: &Declaration) -> bool {
        match self {
            DeclarationClass::Variable => decl.is_variable(),
            DeclarationClass::Parameter => decl.is_parameter(),
            DeclarationClass::Constant => decl.is_constant(),
        }
    }
}

fn collect(
    index: &AstIndex,
    expression: NodeId,
    class: DeclarationClass,
    out: &mut BTreeSet<NodeId>,
) -> ExprResult<()> {
    match index.expr(expression)? {
        Expression::DirectReference { declaration } => {
            if class.matches(index.decl(*declaration)?) {
                out.insert(*declaration);
            }
        }
        Expression::ArrayAccess { operand, index: i } => {
            collect_access_operand(index, *operand, class, out)?;
            collect(index, *i, class, out)?;
        }
        Expression::RecordAccess { operand, .. } => {
            collect_access_operand(index, *operand, class, out)?;
        }
        Expression::Not { operand } => collect(index, *operand, class, out)?,
        Expression::Binary { left, right, .. } => {
            collect(index, *left, class, out)?;
            collect(index, *right, class, out)?;
        }
        Expression::Multiary { operands, .. } => {
            for operand in operands {
                collect(index, *operand, class, out)?;
            }
        }
        Expression::IfThenElse {
            condition,
            then,
            else_,
        } => {
            collect(index, *condition, class, out)?;
            collect(index, *then, class, out)?;
            collect(index, *else_, class, out)?;
        }
        // nullary expressions and bare field references
        _ => {}
    }
    Ok(())
}

/// An access whose operand is not an expression contributes nothing.
fn collect_access_operand(
    index: &AstIndex,
    operand: NodeId,
    class: DeclarationClass,
    out: &mut BTreeSet<NodeId>,
) -> ExprResult<()> {
    match index.expr(operand) {
        Ok(_) => collect(index, operand, class, out),
        Err(ExprError::UnsupportedVariant { .. }) => Ok(()),
        Err(err) => Err(err),
    }
}

fn referred(
    index: &AstIndex,
    expression: NodeId,
    class: DeclarationClass,
) -> ExprResult<BTreeSet<NodeId>> {
    let mut out = BTreeSet::new();
    collect(index, expression, class, &mut out)?;
    Ok(out)
}

pub fn referred_variables(index: &AstIndex, expression: NodeId) -> ExprResult<BTreeSet<NodeId>> {
    referred(index, expression, DeclarationClass::Variable)
}

pub fn referred_parameters(index: &AstIndex, expression: NodeId) -> ExprResult<BTreeSet<NodeId>> {
    referred(index, expression, DeclarationClass::Parameter)
}

pub fn referred_constants(index: &AstIndex, expression: NodeId) -> ExprResult<BTreeSet<NodeId>> {
    referred(index, expression, DeclarationClass::Constant)
}

/// Variables, parameters and constants referred to by `expression`.
pub fn referred_values(index: &AstIndex, expression: NodeId) -> ExprResult<BTreeSet<NodeId>> {
    let mut out = BTreeSet::new();
    for class in [
        DeclarationClass::Variable,
        DeclarationClass::Parameter,
        DeclarationClass::Constant,
    ] {
        collect(index, expression, class, &mut out)?;
    }
    Ok(out)
}

// ──────────────────────────────────────────────
// Bulk forms over arbitrary subtrees
// ──────────────────────────────────────────────

fn referred_in(
    index: &AstIndex,
    root: NodeId,
    class: DeclarationClass,
) -> ExprResult<BTreeSet<NodeId>> {
    let references = index.self_and_all_contents_of(root, |n| {
        matches!(n, Node::Expression(Expression::DirectReference { .. }))
    })?;
    let mut out = BTreeSet::new();
    for reference in references {
        if let Expression::DirectReference { declaration } = index.expr(reference)? {
            if class.matches(index.decl(*declaration)?) {
                out.insert(*declaration);
            }
        }
    }
    Ok(out)
}

/// Variables referenced anywhere under `root`, whatever the context of
/// the reference.
pub fn referred_variables_in(index: &AstIndex, root: NodeId) -> ExprResult<BTreeSet<NodeId>> {
    referred_in(index, root, DeclarationClass::Variable)
}

pub fn referred_parameters_in(index: &AstIndex, root: NodeId) -> ExprResult<BTreeSet<NodeId>> {
    referred_in(index, root, DeclarationClass::Parameter)
}

pub fn referred_constants_in(index: &AstIndex, root: NodeId) -> ExprResult<BTreeSet<NodeId>> {
    referred_in(index, root, DeclarationClass::Constant)
}
