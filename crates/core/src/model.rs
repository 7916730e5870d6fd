//! Queries over the model that follow reference and access chains.

use crate::ast::*;
use crate::error::{ExprError, ExprResult};
use crate::index::AstIndex;

/// The declaration an expression denotes:
/// direct references name it, field references name their field, record
/// accesses defer to their field reference and other accesses to their
/// operand.
pub fn declaration_of(index: &AstIndex, expression: NodeId) -> ExprResult<NodeId> {
    match index.expr(expression)? {
        Expression::DirectReference { declaration } => Ok(*declaration),
        Expression::FieldReference { field } => Ok(*field),
        Expression::RecordAccess {
            field_reference, ..
        } => declaration_of(index, *field_reference),
        Expression::ArrayAccess { operand, .. } => declaration_of(index, *operand),
        _ => Err(ExprError::NotADeclarationReference { node: expression }),
    }
}

/// Follows access operands down to the direct reference at the root of
/// the chain.
pub fn access_reference_of(index: &AstIndex, expression: NodeId) -> ExprResult<NodeId> {
    let mut current = expression;
    loop {
        let e = index.expr(current)?;
        if let Expression::DirectReference { .. } = e {
            return Ok(current);
        }
        match e.access_operand() {
            Some(operand) => current = operand,
            None => return Err(ExprError::NotAReference { node: expression }),
        }
    }
}

pub fn accessed_declaration(index: &AstIndex, expression: NodeId) -> ExprResult<NodeId> {
    let reference = access_reference_of(index, expression)?;
    declaration_of(index, reference)
}

/// Follows type references until a concrete type definition is reached.
pub fn type_definition_of(index: &AstIndex, type_: NodeId) -> ExprResult<NodeId> {
    let mut current = type_;
    // reference cycles are rejected upstream; the bound only guards
    // against malformed input
    for _ in 0..=index.len() {
        match index.type_def(current)? {
            TypeDefinition::Reference { target } => {
                current = declared_type_of(index, *target)?;
            }
            _ => return Ok(current),
        }
    }
    Err(ExprError::unsupported(type_, "TypeReference", "acyclic type reference"))
}

/// The type slot of a declaration.
pub fn declared_type_of(index: &AstIndex, declaration: NodeId) -> ExprResult<NodeId> {
    let decl = index.decl(declaration)?;
    decl.type_()
        .ok_or_else(|| ExprError::unsupported(declaration, decl.kind_name(), "typed declaration"))
}

/// Position of an enumeration literal inside its owning enumeration.
pub fn ordinal_of(index: &AstIndex, literal: NodeId) -> ExprResult<usize> {
    let owner = index
        .container(literal)?
        .ok_or_else(|| ExprError::unsupported(literal, "detached literal", "enumeration literal"))?;
    match index.type_def(owner)? {
        TypeDefinition::Enumeration { literals } => literals
            .iter()
            .position(|l| *l == literal)
            .ok_or(ExprError::UnknownNode { node: literal }),
        _ => Err(ExprError::unsupported(
            literal,
            index.node(literal)?.variant_name(),
            "enumeration literal",
        )),
    }
}

fn is_type_declaration(node: &Node) -> bool {
    matches!(
        node,
        Node::Declaration(Declaration {
            kind: DeclarationKind::Type { .. },
            ..
        })
    )
}

/// Nearest type declaration containing `node`.
pub fn type_declaration_of(index: &AstIndex, node: NodeId) -> ExprResult<Option<NodeId>> {
    index.container_of(node, is_type_declaration)
}

/// Type declarations of the package enclosing `context`.
pub fn type_declarations(index: &AstIndex, context: NodeId) -> ExprResult<Vec<NodeId>> {
    let Some(package) = index.self_or_container_of(context, |n| matches!(n, Node::Package(_)))?
    else {
        return Ok(vec![]);
    };
    let mut out = Vec::new();
    for decl in &index.package(package)?.declarations {
        if is_type_declaration(index.node(*decl)?) {
            out.push(*decl);
        }
    }
    Ok(out)
}

/// The integer range an expression denotes, directly or through a
/// referenced constant.
pub fn integer_range_of(index: &AstIndex, expression: NodeId) -> ExprResult<NodeId> {
    let e = index.expr(expression)?;
    match e {
        Expression::IntegerRange { .. } => return Ok(expression),
        Expression::DirectReference { declaration } => {
            if let DeclarationKind::Constant {
                expression: value, ..
            } = &index.decl(*declaration)?.kind
            {
                if let Expression::IntegerRange { .. } = index.expr(*value)? {
                    return Ok(*value);
                }
            }
        }
        _ => {}
    }
    Err(ExprError::unsupported(
        expression,
        e.variant_name(),
        "integer range literal",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build;

    struct Fixture {
        index: AstIndex,
        record_var: NodeId,
        field: NodeId,
        array_var: NodeId,
    }

    fn fixture() -> Fixture {
        let mut index = AstIndex::new();
        let int_ty = index.add_type(TypeDefinition::Integer).unwrap();
        let field = build::create_field_declaration(&mut index, int_ty, "speed").unwrap();
        let record = index
            .add_type(TypeDefinition::Record {
                fields: vec![field],
            })
            .unwrap();
        let record_decl = build::wrap_into_declaration(&mut index, record, "Car").unwrap();
        let record_ref = build::create_type_reference(&mut index, record_decl).unwrap();
        let record_var =
            build::create_variable_declaration(&mut index, record_ref, "car", None).unwrap();
        let elem = index.add_type(TypeDefinition::Integer).unwrap();
        let size = build::to_integer_literal(&mut index, 4).unwrap();
        let array = index
            .add_type(TypeDefinition::Array {
                element_type: elem,
                size,
            })
            .unwrap();
        let array_var =
            build::create_variable_declaration(&mut index, array, "queue", None).unwrap();
        Fixture {
            index,
            record_var,
            field,
            array_var,
        }
    }

    #[test]
    fn declaration_of_direct_reference() {
        let mut f = fixture();
        let r = build::create_reference_expression(&mut f.index, f.array_var).unwrap();
        assert_eq!(declaration_of(&f.index, r).unwrap(), f.array_var);
    }

    #[test]
    fn declaration_of_record_access_is_the_field() {
        let mut f = fixture();
        let r = build::create_reference_expression(&mut f.index, f.record_var).unwrap();
        let field_ref = f
            .index
            .add_expr(Expression::FieldReference { field: f.field })
            .unwrap();
        let access = f
            .index
            .add_expr(Expression::RecordAccess {
                operand: r,
                field_reference: field_ref,
            })
            .unwrap();
        assert_eq!(declaration_of(&f.index, access).unwrap(), f.field);
        assert_eq!(accessed_declaration(&f.index, access).unwrap(), f.record_var);
        assert_eq!(access_reference_of(&f.index, access).unwrap(), r);
    }

    #[test]
    fn declaration_of_array_access_is_the_array() {
        let mut f = fixture();
        let zero = build::to_integer_literal(&mut f.index, 0).unwrap();
        let access = crate::access::index(&mut f.index, f.array_var, &[zero]).unwrap();
        assert_eq!(declaration_of(&f.index, access).unwrap(), f.array_var);
    }

    #[test]
    fn literals_are_not_declaration_references() {
        let mut f = fixture();
        let one = build::to_integer_literal(&mut f.index, 1).unwrap();
        assert_eq!(
            declaration_of(&f.index, one).unwrap_err(),
            ExprError::NotADeclarationReference { node: one }
        );
        assert_eq!(
            access_reference_of(&f.index, one).unwrap_err(),
            ExprError::NotAReference { node: one }
        );
    }

    #[test]
    fn access_chain_over_literal_is_not_a_reference() {
        let mut f = fixture();
        let lit = build::to_integer_literal(&mut f.index, 1).unwrap();
        let arr = f
            .index
            .add_expr(Expression::ArrayLiteral {
                operands: vec![lit],
            })
            .unwrap();
        let zero = build::to_integer_literal(&mut f.index, 0).unwrap();
        let access = f
            .index
            .add_expr(Expression::ArrayAccess {
                operand: arr,
                index: zero,
            })
            .unwrap();
        assert_eq!(
            access_reference_of(&f.index, access).unwrap_err(),
            ExprError::NotAReference { node: access }
        );
    }

    #[test]
    fn type_references_resolve_to_definitions() {
        let f = fixture();
        let ty = declared_type_of(&f.index, f.record_var).unwrap();
        let def = type_definition_of(&f.index, ty).unwrap();
        assert!(matches!(
            f.index.type_def(def).unwrap(),
            TypeDefinition::Record { .. }
        ));
    }

    #[test]
    fn integer_range_through_constant() {
        let mut index = AstIndex::new();
        let lo = build::to_integer_literal(&mut index, 0).unwrap();
        let hi = build::to_integer_literal(&mut index, 9).unwrap();
        let range =
            build::create_integer_range_literal_expression(&mut index, lo, true, hi, false).unwrap();
        let ty = index.add_type(TypeDefinition::Integer).unwrap();
        let c = build::create_constant_declaration(&mut index, ty, "R", range).unwrap();
        let r = build::create_reference_expression(&mut index, c).unwrap();
        assert_eq!(integer_range_of(&index, r).unwrap(), range);
        assert_eq!(integer_range_of(&index, range).unwrap(), range);
        assert!(integer_range_of(&index, lo).is_err());
    }

    #[test]
    fn type_declarations_of_package() {
        let mut index = AstIndex::new();
        let bool_ty = index.add_type(TypeDefinition::Boolean).unwrap();
        let td = build::wrap_into_declaration(&mut index, bool_ty, "Flag").unwrap();
        let int_ty = index.add_type(TypeDefinition::Integer).unwrap();
        let v = build::create_variable_declaration(&mut index, int_ty, "v", None).unwrap();
        let pkg = build::create_package(&mut index, "p", vec![td, v], vec![]).unwrap();
        assert_eq!(type_declarations(&index, v).unwrap(), vec![td]);
        assert_eq!(type_declarations(&index, pkg).unwrap(), vec![td]);
        assert_eq!(type_declaration_of(&index, bool_ty).unwrap(), Some(td));
    }
}
