//! Node types of the expression model.
//!
//! Every node lives in the arena of an [`AstIndex`](crate::index::AstIndex)
//! and is addressed by a [`NodeId`]. Fields holding a `NodeId` are either
//! *containment* slots (the child is owned by this node) or *cross
//! references* (a non-owning link to a declaration elsewhere in the tree).
//! The two are kept apart by [`Node::children`] and
//! [`Node::cross_references`].

use num_bigint::BigInt;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ──────────────────────────────────────────────
// Handles
// ──────────────────────────────────────────────

/// Stable handle of a node inside an `AstIndex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ──────────────────────────────────────────────
// Nodes
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Package(Package),
    Type(TypeDefinition),
    Declaration(Declaration),
    Expression(Expression),
    FieldAssignment(FieldAssignment),
}

/// Host container for declarations and free-standing expressions
/// (guards, invariants) of a component.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub name: String,
    pub declarations: Vec<NodeId>,
    pub expressions: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldAssignment {
    /// A `FieldReference` expression naming the assigned field.
    pub reference: NodeId,
    pub value: NodeId,
}

// ──────────────────────────────────────────────
// Types
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefinition {
    Boolean,
    Integer,
    Decimal,
    Rational,
    Enumeration {
        literals: Vec<NodeId>,
    },
    Array {
        element_type: NodeId,
        size: NodeId,
    },
    Record {
        fields: Vec<NodeId>,
    },
    /// Indirection through a named type declaration (cross reference).
    Reference {
        target: NodeId,
    },
}

// ──────────────────────────────────────────────
// Declarations
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationKind {
    Variable {
        type_: NodeId,
        initializer: Option<NodeId>,
        annotations: Vec<VariableAnnotation>,
    },
    Parameter {
        type_: NodeId,
    },
    Constant {
        type_: NodeId,
        expression: NodeId,
    },
    Field {
        type_: NodeId,
    },
    /// Ordinal is the position inside the owning enumeration.
    EnumerationLiteral,
    Type {
        type_: NodeId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableAnnotation {
    Transient,
    Resettable,
    EnvironmentResettable,
    Clock,
}

impl Declaration {
    /// The declared type slot, if the declaration kind has one.
    pub fn type_(&self) -> Option<NodeId> {
        match &self.kind {
            DeclarationKind::Variable { type_, .. }
            | DeclarationKind::Parameter { type_ }
            | DeclarationKind::Constant { type_, .. }
            | DeclarationKind::Field { type_ }
            | DeclarationKind::Type { type_ } => Some(*type_),
            DeclarationKind::EnumerationLiteral => None,
        }
    }

    /// The expression slot of initializable elements.
    pub fn expression(&self) -> Option<NodeId> {
        match &self.kind {
            DeclarationKind::Variable { initializer, .. } => *initializer,
            DeclarationKind::Constant { expression, .. } => Some(*expression),
            _ => None,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.kind, DeclarationKind::Variable { .. })
    }

    pub fn is_parameter(&self) -> bool {
        matches!(self.kind, DeclarationKind::Parameter { .. })
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.kind, DeclarationKind::Constant { .. })
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            DeclarationKind::Variable { .. } => "variable",
            DeclarationKind::Parameter { .. } => "parameter",
            DeclarationKind::Constant { .. } => "constant",
            DeclarationKind::Field { .. } => "field",
            DeclarationKind::EnumerationLiteral => "enumeration literal",
            DeclarationKind::Type { .. } => "type declaration",
        }
    }
}

// ──────────────────────────────────────────────
// Expressions
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Subtract,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        !matches!(self, BinaryOp::Subtract)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Subtract => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MultiaryOp {
    And,
    Or,
    Add,
    Multiply,
}

/// Arity group of an expression variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionGroup {
    Nullary,
    Unary,
    Binary,
    Multiary,
    Conditional,
    Reference,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    True,
    False,
    IntegerLiteral(BigInt),
    DecimalLiteral(Decimal),
    RationalLiteral {
        numerator: BigInt,
        denominator: BigInt,
    },
    EnumerationLiteral {
        literal: NodeId,
        type_reference: NodeId,
    },
    IntegerRange {
        left: NodeId,
        right: NodeId,
        left_inclusive: bool,
        right_inclusive: bool,
    },
    ArrayLiteral {
        operands: Vec<NodeId>,
    },
    RecordLiteral {
        type_declaration: NodeId,
        field_assignments: Vec<NodeId>,
    },
    Not {
        operand: NodeId,
    },
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    Multiary {
        op: MultiaryOp,
        operands: Vec<NodeId>,
    },
    IfThenElse {
        condition: NodeId,
        then: NodeId,
        else_: NodeId,
    },
    DirectReference {
        declaration: NodeId,
    },
    ArrayAccess {
        operand: NodeId,
        index: NodeId,
    },
    RecordAccess {
        operand: NodeId,
        field_reference: NodeId,
    },
    FieldReference {
        field: NodeId,
    },
}

impl Expression {
    pub fn group(&self) -> ExpressionGroup {
        match self {
            Expression::True
            | Expression::False
            | Expression::IntegerLiteral(_)
            | Expression::DecimalLiteral(_)
            | Expression::RationalLiteral { .. }
            | Expression::EnumerationLiteral { .. }
            | Expression::IntegerRange { .. }
            | Expression::ArrayLiteral { .. }
            | Expression::RecordLiteral { .. } => ExpressionGroup::Nullary,
            Expression::Not { .. } => ExpressionGroup::Unary,
            Expression::Binary { .. } => ExpressionGroup::Binary,
            Expression::Multiary { .. } => ExpressionGroup::Multiary,
            Expression::IfThenElse { .. } => ExpressionGroup::Conditional,
            Expression::DirectReference { .. }
            | Expression::ArrayAccess { .. }
            | Expression::RecordAccess { .. }
            | Expression::FieldReference { .. } => ExpressionGroup::Reference,
        }
    }

    pub fn is_reference(&self) -> bool {
        self.group() == ExpressionGroup::Reference
    }

    /// Operand of access-chain nodes (array and record access).
    pub fn access_operand(&self) -> Option<NodeId> {
        match self {
            Expression::ArrayAccess { operand, .. } | Expression::RecordAccess { operand, .. } => {
                Some(*operand)
            }
            _ => None,
        }
    }

    pub fn is_enumeration_literal(&self) -> bool {
        matches!(self, Expression::EnumerationLiteral { .. })
    }

    pub fn binary(&self) -> Option<(BinaryOp, NodeId, NodeId)> {
        match self {
            Expression::Binary { op, left, right } => Some((*op, *left, *right)),
            _ => None,
        }
    }

    pub fn multiary(&self) -> Option<(MultiaryOp, &[NodeId])> {
        match self {
            Expression::Multiary { op, operands } => Some((*op, operands.as_slice())),
            _ => None,
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Expression::True => "TrueExpression",
            Expression::False => "FalseExpression",
            Expression::IntegerLiteral(_) => "IntegerLiteralExpression",
            Expression::DecimalLiteral(_) => "DecimalLiteralExpression",
            Expression::RationalLiteral { .. } => "RationalLiteralExpression",
            Expression::EnumerationLiteral { .. } => "EnumerationLiteralExpression",
            Expression::IntegerRange { .. } => "IntegerRangeLiteralExpression",
            Expression::ArrayLiteral { .. } => "ArrayLiteralExpression",
            Expression::RecordLiteral { .. } => "RecordLiteralExpression",
            Expression::Not { .. } => "NotExpression",
            Expression::Binary { op, .. } => match op {
                BinaryOp::Equal => "EqualityExpression",
                BinaryOp::NotEqual => "InequalityExpression",
                BinaryOp::Less => "LessExpression",
                BinaryOp::LessEqual => "LessEqualExpression",
                BinaryOp::Greater => "GreaterExpression",
                BinaryOp::GreaterEqual => "GreaterEqualExpression",
                BinaryOp::Subtract => "SubtractExpression",
            },
            Expression::Multiary { op, .. } => match op {
                MultiaryOp::And => "AndExpression",
                MultiaryOp::Or => "OrExpression",
                MultiaryOp::Add => "AddExpression",
                MultiaryOp::Multiply => "MultiplyExpression",
            },
            Expression::IfThenElse { .. } => "IfThenElseExpression",
            Expression::DirectReference { .. } => "DirectReferenceExpression",
            Expression::ArrayAccess { .. } => "ArrayAccessExpression",
            Expression::RecordAccess { .. } => "RecordAccessExpression",
            Expression::FieldReference { .. } => "FieldReferenceExpression",
        }
    }
}

// ──────────────────────────────────────────────
// Structural queries over any node
// ──────────────────────────────────────────────

impl Node {
    pub fn variant_name(&self) -> &'static str {
        match self {
            Node::Package(_) => "Package",
            Node::Type(t) => match t {
                TypeDefinition::Boolean => "BooleanTypeDefinition",
                TypeDefinition::Integer => "IntegerTypeDefinition",
                TypeDefinition::Decimal => "DecimalTypeDefinition",
                TypeDefinition::Rational => "RationalTypeDefinition",
                TypeDefinition::Enumeration { .. } => "EnumerationTypeDefinition",
                TypeDefinition::Array { .. } => "ArrayTypeDefinition",
                TypeDefinition::Record { .. } => "RecordTypeDefinition",
                TypeDefinition::Reference { .. } => "TypeReference",
            },
            Node::Declaration(d) => match d.kind {
                DeclarationKind::Variable { .. } => "VariableDeclaration",
                DeclarationKind::Parameter { .. } => "ParameterDeclaration",
                DeclarationKind::Constant { .. } => "ConstantDeclaration",
                DeclarationKind::Field { .. } => "FieldDeclaration",
                DeclarationKind::EnumerationLiteral => "EnumerationLiteralDefinition",
                DeclarationKind::Type { .. } => "TypeDeclaration",
            },
            Node::Expression(e) => e.variant_name(),
            Node::FieldAssignment(_) => "FieldAssignment",
        }
    }

    /// Contained children, in slot order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Node::Package(p) => p
                .declarations
                .iter()
                .chain(p.expressions.iter())
                .copied()
                .collect(),
            Node::Type(t) => match t {
                TypeDefinition::Enumeration { literals } => literals.clone(),
                TypeDefinition::Array { element_type, size } => vec![*element_type, *size],
                TypeDefinition::Record { fields } => fields.clone(),
                _ => vec![],
            },
            Node::Declaration(d) => match &d.kind {
                DeclarationKind::Variable {
                    type_, initializer, ..
                } => {
                    let mut out = vec![*type_];
                    out.extend(initializer.iter().copied());
                    out
                }
                DeclarationKind::Constant { type_, expression } => vec![*type_, *expression],
                DeclarationKind::Parameter { type_ }
                | DeclarationKind::Field { type_ }
                | DeclarationKind::Type { type_ } => vec![*type_],
                DeclarationKind::EnumerationLiteral => vec![],
            },
            Node::Expression(e) => match e {
                Expression::EnumerationLiteral { type_reference, .. } => vec![*type_reference],
                Expression::IntegerRange { left, right, .. } => vec![*left, *right],
                Expression::ArrayLiteral { operands } | Expression::Multiary { operands, .. } => {
                    operands.clone()
                }
                Expression::RecordLiteral {
                    field_assignments, ..
                } => field_assignments.clone(),
                Expression::Not { operand } => vec![*operand],
                Expression::Binary { left, right, .. } => vec![*left, *right],
                Expression::IfThenElse {
                    condition,
                    then,
                    else_,
                } => vec![*condition, *then, *else_],
                Expression::ArrayAccess { operand, index } => vec![*operand, *index],
                Expression::RecordAccess {
                    operand,
                    field_reference,
                } => vec![*operand, *field_reference],
                _ => vec![],
            },
            Node::FieldAssignment(a) => vec![a.reference, a.value],
        }
    }

    /// Mutable access to every containment slot.
    pub(crate) fn child_slots_mut(&mut self) -> Vec<&mut NodeId> {
        match self {
            Node::Package(p) => p
                .declarations
                .iter_mut()
                .chain(p.expressions.iter_mut())
                .collect(),
            Node::Type(t) => match t {
                TypeDefinition::Enumeration { literals } => literals.iter_mut().collect(),
                TypeDefinition::Array { element_type, size } => vec![element_type, size],
                TypeDefinition::Record { fields } => fields.iter_mut().collect(),
                _ => vec![],
            },
            Node::Declaration(d) => match &mut d.kind {
                DeclarationKind::Variable {
                    type_, initializer, ..
                } => {
                    let mut out = vec![type_];
                    out.extend(initializer.as_mut());
                    out
                }
                DeclarationKind::Constant { type_, expression } => vec![type_, expression],
                DeclarationKind::Parameter { type_ }
                | DeclarationKind::Field { type_ }
                | DeclarationKind::Type { type_ } => vec![type_],
                DeclarationKind::EnumerationLiteral => vec![],
            },
            Node::Expression(e) => match e {
                Expression::EnumerationLiteral { type_reference, .. } => vec![type_reference],
                Expression::IntegerRange { left, right, .. } => vec![left, right],
                Expression::ArrayLiteral { operands } | Expression::Multiary { operands, .. } => {
                    operands.iter_mut().collect()
                }
                Expression::RecordLiteral {
                    field_assignments, ..
                } => field_assignments.iter_mut().collect(),
                Expression::Not { operand } => vec![operand],
                Expression::Binary { left, right, .. } => vec![left, right],
                Expression::IfThenElse {
                    condition,
                    then,
                    else_,
                } => vec![condition, then, else_],
                Expression::ArrayAccess { operand, index } => vec![operand, index],
                Expression::RecordAccess {
                    operand,
                    field_reference,
                } => vec![operand, field_reference],
                _ => vec![],
            },
            Node::FieldAssignment(a) => vec![&mut a.reference, &mut a.value],
        }
    }

    /// Non-owning links to declarations.
    pub fn cross_references(&self) -> Vec<NodeId> {
        match self {
            Node::Type(TypeDefinition::Reference { target }) => vec![*target],
            Node::Expression(e) => match e {
                Expression::EnumerationLiteral { literal, .. } => vec![*literal],
                Expression::RecordLiteral {
                    type_declaration, ..
                } => vec![*type_declaration],
                Expression::DirectReference { declaration } => vec![*declaration],
                Expression::FieldReference { field } => vec![*field],
                _ => vec![],
            },
            _ => vec![],
        }
    }

    pub(crate) fn cross_reference_slots_mut(&mut self) -> Vec<&mut NodeId> {
        match self {
            Node::Type(TypeDefinition::Reference { target }) => vec![target],
            Node::Expression(e) => match e {
                Expression::EnumerationLiteral { literal, .. } => vec![literal],
                Expression::RecordLiteral {
                    type_declaration, ..
                } => vec![type_declaration],
                Expression::DirectReference { declaration } => vec![declaration],
                Expression::FieldReference { field } => vec![field],
                _ => vec![],
            },
            _ => vec![],
        }
    }

    /// Removes `child` from a list or optional slot. Returns `false` when
    /// the child sits in a mandatory slot (or is not a child at all).
    pub(crate) fn remove_child(&mut self, child: NodeId) -> bool {
        fn remove_from(list: &mut Vec<NodeId>, child: NodeId) -> bool {
            match list.iter().position(|c| *c == child) {
                Some(pos) => {
                    list.remove(pos);
                    true
                }
                None => false,
            }
        }
        match self {
            Node::Package(p) => {
                remove_from(&mut p.declarations, child) || remove_from(&mut p.expressions, child)
            }
            Node::Type(TypeDefinition::Enumeration { literals }) => remove_from(literals, child),
            Node::Type(TypeDefinition::Record { fields }) => remove_from(fields, child),
            Node::Declaration(Declaration {
                kind: DeclarationKind::Variable { initializer, .. },
                ..
            }) if *initializer == Some(child) => {
                *initializer = None;
                true
            }
            Node::Expression(Expression::ArrayLiteral { operands })
            | Node::Expression(Expression::Multiary { operands, .. }) => {
                remove_from(operands, child)
            }
            Node::Expression(Expression::RecordLiteral {
                field_assignments, ..
            }) => remove_from(field_assignments, child),
            _ => false,
        }
    }

    /// Structural comparison of the node's own attributes, ignoring
    /// every `NodeId` it holds.
    pub(crate) fn same_shape(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Package(a), Node::Package(b)) => {
                a.name == b.name
                    && a.declarations.len() == b.declarations.len()
                    && a.expressions.len() == b.expressions.len()
            }
            (Node::Type(a), Node::Type(b)) => match (a, b) {
                (TypeDefinition::Boolean, TypeDefinition::Boolean)
                | (TypeDefinition::Integer, TypeDefinition::Integer)
                | (TypeDefinition::Decimal, TypeDefinition::Decimal)
                | (TypeDefinition::Rational, TypeDefinition::Rational)
                | (TypeDefinition::Array { .. }, TypeDefinition::Array { .. })
                | (TypeDefinition::Reference { .. }, TypeDefinition::Reference { .. }) => true,
                (
                    TypeDefinition::Enumeration { literals: l },
                    TypeDefinition::Enumeration { literals: r },
                ) => l.len() == r.len(),
                (TypeDefinition::Record { fields: l }, TypeDefinition::Record { fields: r }) => {
                    l.len() == r.len()
                }
                _ => false,
            },
            (Node::Declaration(a), Node::Declaration(b)) => {
                a.name == b.name
                    && match (&a.kind, &b.kind) {
                        (
                            DeclarationKind::Variable {
                                initializer: li,
                                annotations: la,
                                ..
                            },
                            DeclarationKind::Variable {
                                initializer: ri,
                                annotations: ra,
                                ..
                            },
                        ) => li.is_some() == ri.is_some() && la == ra,
                        (l, r) => std::mem::discriminant(l) == std::mem::discriminant(r),
                    }
            }
            (Node::Expression(a), Node::Expression(b)) => match (a, b) {
                (Expression::IntegerLiteral(l), Expression::IntegerLiteral(r)) => l == r,
                (Expression::DecimalLiteral(l), Expression::DecimalLiteral(r)) => l == r,
                (
                    Expression::RationalLiteral {
                        numerator: ln,
                        denominator: ld,
                    },
                    Expression::RationalLiteral {
                        numerator: rn,
                        denominator: rd,
                    },
                ) => ln == rn && ld == rd,
                (
                    Expression::IntegerRange {
                        left_inclusive: ll,
                        right_inclusive: lr,
                        ..
                    },
                    Expression::IntegerRange {
                        left_inclusive: rl,
                        right_inclusive: rr,
                        ..
                    },
                ) => ll == rl && lr == rr,
                (Expression::ArrayLiteral { operands: l }, Expression::ArrayLiteral { operands: r }) => {
                    l.len() == r.len()
                }
                (
                    Expression::RecordLiteral {
                        field_assignments: l,
                        ..
                    },
                    Expression::RecordLiteral {
                        field_assignments: r,
                        ..
                    },
                ) => l.len() == r.len(),
                (Expression::Binary { op: l, .. }, Expression::Binary { op: r, .. }) => l == r,
                (
                    Expression::Multiary {
                        op: lo,
                        operands: l,
                    },
                    Expression::Multiary {
                        op: ro,
                        operands: r,
                    },
                ) => lo == ro && l.len() == r.len(),
                (l, r) => std::mem::discriminant(l) == std::mem::discriminant(r),
            },
            (Node::FieldAssignment(_), Node::FieldAssignment(_)) => true,
            _ => false,
        }
    }
}
