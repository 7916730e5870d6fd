//! Values produced by constant evaluation.

use num_bigint::BigInt;
use statexpr_core::{ExprError, ExprResult, NodeId};
use std::fmt;

/// Result of evaluating a closed expression. Enumeration literals evaluate
/// to their ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Integer(BigInt),
    Boolean(bool),
}

impl Value {
    /// Returns a human-readable type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Boolean(_) => "boolean",
        }
    }

    /// Extracts a boolean or reports `node` as not evaluable.
    pub fn as_bool(&self, node: NodeId) -> ExprResult<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            other => Err(ExprError::not_evaluable(
                node,
                format!("expected boolean, got {}", other.type_name()),
            )),
        }
    }

    pub fn into_integer(self, node: NodeId) -> ExprResult<BigInt> {
        match self {
            Value::Integer(v) => Ok(v),
            other => Err(ExprError::not_evaluable(
                node,
                format!("expected integer, got {}", other.type_name()),
            )),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        Value::Integer(v)
    }
}
