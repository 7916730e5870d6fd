//! In-place rewrites of a model: parameter substitution, reference chain
//! reduction and variable annotations.

use crate::ast::*;
use crate::build;
use crate::error::{ExprError, ExprResult};
use crate::index::AstIndex;
use crate::model;

/// Binds each parameter to its argument. For every position a constant
/// named `names[i]` with a copy of the parameter's type and a copy of
/// `arguments[i]` is created, and every reference to the parameter inside
/// the parameter's container is redirected to it.
///
/// Returns the new (detached) constants in parameter order.
pub fn extract_parameters<S: AsRef<str>>(
    index: &mut AstIndex,
    parameters: &[NodeId],
    names: &[S],
    arguments: &[NodeId],
) -> ExprResult<Vec<NodeId>> {
    for actual in [names.len(), arguments.len()] {
        if actual != parameters.len() {
            return Err(ExprError::ArgumentCountMismatch {
                operation: "extract_parameters".to_string(),
                expected: parameters.len(),
                actual,
            });
        }
    }
    let mut constants = Vec::with_capacity(parameters.len());
    for ((parameter, name), argument) in parameters.iter().zip(names).zip(arguments) {
        let type_ = model::declared_type_of(index, *parameter)?;
        let type_ = index.clone_subtree(type_)?;
        let value = index.clone_subtree(*argument)?;
        let constant = build::create_constant_declaration(index, type_, name.as_ref(), value)?;
        if let Some(container) = index.container(*parameter)? {
            let changed = index.change(constant, *parameter, container)?;
            tracing::debug!(
                parameter = %parameter,
                constant = %constant,
                name = name.as_ref(),
                changed,
                "extracted parameter"
            );
        }
        constants.push(constant);
    }
    Ok(constants)
}

/// For every element initialized with a plain reference to another
/// declaration, redirects the references to the element found under
/// `context` to that declaration.
pub fn reduce_cross_reference_chain(
    index: &mut AstIndex,
    elements: &[NodeId],
    context: NodeId,
) -> ExprResult<usize> {
    let mut changed = 0;
    for element in elements {
        let Some(expression) = index.decl(*element)?.expression() else {
            continue;
        };
        if let Expression::DirectReference { declaration } = index.expr(expression)? {
            let target = *declaration;
            changed += index.change(target, *element, context)?;
        }
    }
    Ok(changed)
}

// ──────────────────────────────────────────────
// Annotations
// ──────────────────────────────────────────────

/// Adds `annotation` to a variable. Annotations behave as a set.
pub fn add_annotation(
    index: &mut AstIndex,
    variable: NodeId,
    annotation: VariableAnnotation,
) -> ExprResult<()> {
    let annotations = index.annotations_mut(variable)?;
    if !annotations.contains(&annotation) {
        annotations.push(annotation);
    }
    Ok(())
}

pub fn add_transient_annotation(index: &mut AstIndex, variable: NodeId) -> ExprResult<()> {
    add_annotation(index, variable, VariableAnnotation::Transient)
}

pub fn add_resettable_annotation(index: &mut AstIndex, variable: NodeId) -> ExprResult<()> {
    add_annotation(index, variable, VariableAnnotation::Resettable)
}

pub fn add_environment_resettable_annotation(
    index: &mut AstIndex,
    variable: NodeId,
) -> ExprResult<()> {
    add_annotation(index, variable, VariableAnnotation::EnvironmentResettable)
}

pub fn add_clock_annotation(index: &mut AstIndex, variable: NodeId) -> ExprResult<()> {
    add_annotation(index, variable, VariableAnnotation::Clock)
}

/// Strips every `annotation` from the given variables. Returns how many
/// were removed.
pub fn remove_variable_declaration_annotations(
    index: &mut AstIndex,
    variables: &[NodeId],
    annotation: VariableAnnotation,
) -> ExprResult<usize> {
    let mut removed = 0;
    for variable in variables {
        let annotations = index.annotations_mut(*variable)?;
        let before = annotations.len();
        annotations.retain(|a| *a != annotation);
        removed += before - annotations.len();
    }
    tracing::debug!(?annotation, removed, "removed variable annotations");
    Ok(removed)
}
