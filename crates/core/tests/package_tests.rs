//! Integration tests for edits applied to a whole package.
//!
//! Sections:
//!   - Reference chains
//!   - Variable annotations
//!   - Package queries

use statexpr_core::build;
use statexpr_core::model;
use statexpr_core::rewrite;
use statexpr_core::{AstIndex, Expression, NodeId, TypeDefinition, VariableAnnotation};

// ──────────────────────────────────────────────
// Test helpers
// ──────────────────────────────────────────────

struct Component {
    package: NodeId,
    b: NodeId,
    alias: NodeId,
    guard: NodeId,
    alias_ref: NodeId,
}

/// `var b; var alias = b; guard: alias < 3`
fn component(index: &mut AstIndex) -> Component {
    let ty = index.add_type(TypeDefinition::Integer).unwrap();
    let b = build::create_variable_declaration(index, ty, "b", None).unwrap();
    let ty = index.add_type(TypeDefinition::Integer).unwrap();
    let b_ref = build::create_reference_expression(index, b).unwrap();
    let alias = build::create_variable_declaration(index, ty, "alias", Some(b_ref)).unwrap();
    let alias_ref = build::create_reference_expression(index, alias).unwrap();
    let three = build::to_integer_literal(index, 3).unwrap();
    let guard = build::create_less_expression(index, alias_ref, three).unwrap();
    let package =
        build::create_package(index, "component", vec![b, alias], vec![guard]).unwrap();
    Component {
        package,
        b,
        alias,
        guard,
        alias_ref,
    }
}

// ──────────────────────────────────────────────
// Reference chains
// ──────────────────────────────────────────────

#[test]
fn test_chain_alias_references_are_redirected() {
    let mut index = AstIndex::new();
    let c = component(&mut index);
    let changed = rewrite::reduce_cross_reference_chain(&mut index, &[c.alias], c.package).unwrap();
    assert_eq!(changed, 1);
    assert_eq!(
        index.expr(c.alias_ref).unwrap(),
        &Expression::DirectReference { declaration: c.b }
    );
    assert!(index.uses(c.alias).is_empty());
    assert_eq!(model::declaration_of(&index, c.alias_ref).unwrap(), c.b);
}

#[test]
fn test_chain_context_limits_the_redirection() {
    let mut index = AstIndex::new();
    let c = component(&mut index);
    let outside = build::create_reference_expression(&mut index, c.alias).unwrap();
    let changed = rewrite::reduce_cross_reference_chain(&mut index, &[c.alias], c.guard).unwrap();
    assert_eq!(changed, 1);
    assert_eq!(
        index.expr(outside).unwrap(),
        &Expression::DirectReference {
            declaration: c.alias
        }
    );
}

// ──────────────────────────────────────────────
// Variable annotations
// ──────────────────────────────────────────────

#[test]
fn test_annotations_removed_across_variables() {
    let mut index = AstIndex::new();
    let c = component(&mut index);
    rewrite::add_clock_annotation(&mut index, c.b).unwrap();
    rewrite::add_clock_annotation(&mut index, c.alias).unwrap();
    rewrite::add_transient_annotation(&mut index, c.alias).unwrap();
    let removed = rewrite::remove_variable_declaration_annotations(
        &mut index,
        &[c.b, c.alias],
        VariableAnnotation::Clock,
    )
    .unwrap();
    assert_eq!(removed, 2);
    assert_eq!(
        index.annotations_mut(c.alias).unwrap().as_slice(),
        &[VariableAnnotation::Transient]
    );
    assert!(index.annotations_mut(c.b).unwrap().is_empty());
}

// ──────────────────────────────────────────────
// Package queries
// ──────────────────────────────────────────────

#[test]
fn test_package_lists_appended_enumeration() {
    let mut index = AstIndex::new();
    let c = component(&mut index);
    assert!(model::type_declarations(&index, c.guard).unwrap().is_empty());
    let mode = build::create_enumeration_type(&mut index, "Mode", ["Idle", "Busy"]).unwrap();
    index.append(c.package, mode).unwrap();
    assert_eq!(model::type_declarations(&index, c.guard).unwrap(), vec![mode]);
    assert!(index.is_within(c.alias_ref, c.package).unwrap());
}
