use crate::ast::NodeId;
use serde::Serialize;

/// All errors raised by the expression core.
///
/// Serializes as a tagged object (`{"kind": "NotEvaluable", ...}`) so
/// validators can forward them as machine-readable diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind")]
pub enum ExprError {
    /// Free reference, non-constant operand or mixed-type operands met
    /// during constant evaluation.
    #[error("expression {node} is not evaluable: {reason}")]
    NotEvaluable { node: NodeId, reason: String },

    /// An evaluated integer does not fit the requested host integer type.
    #[error("integer {value} does not fit into {target}")]
    IntegerOverflow { value: String, target: String },

    #[error("expression {node} does not denote a declaration")]
    NotADeclarationReference { node: NodeId },

    #[error("access chain {node} does not end in a direct reference")]
    NotAReference { node: NodeId },

    /// The node exists but is not of the variant the operation needs.
    #[error("node {node} is a {found}, expected {expected}")]
    UnsupportedVariant {
        node: NodeId,
        found: String,
        expected: String,
    },

    #[error("multiary expression {node} has no operands")]
    EmptyMultiary { node: NodeId },

    #[error("declaration {declaration} does not have an array type")]
    NotAnArray { declaration: NodeId },

    #[error("record type {node} is not contained by a type declaration")]
    RecordNotContained { node: NodeId },

    #[error("enumeration type {node} is not contained by a type declaration")]
    EnumNotContained { node: NodeId },

    #[error("enumeration type {node} has no literals")]
    EmptyEnum { node: NodeId },

    #[error("ordinal {ordinal} is out of range for enumeration {node}")]
    EnumLiteralOutOfRange { node: NodeId, ordinal: String },

    #[error("array of length {length} exceeds the configured limit of {limit}")]
    ArrayTooLarge { length: usize, limit: usize },

    #[error("unknown node {node}")]
    UnknownNode { node: NodeId },

    #[error("node {node} is already contained by {container}")]
    AlreadyContained { node: NodeId, container: NodeId },

    /// Attaching `node` under `container` would make `node` contain
    /// itself.
    #[error("node {node} cannot be placed under {container}, which it contains")]
    ContainmentCycle { node: NodeId, container: NodeId },

    #[error("node {child} fills more than one containment slot of a new node")]
    DuplicateChild { child: NodeId },

    #[error("node {node} cannot be removed from its container")]
    NotRemovable { node: NodeId },

    #[error("{operation}: expected {expected} arguments, got {actual}")]
    ArgumentCountMismatch {
        operation: String,
        expected: usize,
        actual: usize,
    },
}

impl ExprError {
    pub fn not_evaluable(node: NodeId, reason: impl Into<String>) -> Self {
        ExprError::NotEvaluable {
            node,
            reason: reason.into(),
        }
    }

    pub fn unsupported(node: NodeId, found: &str, expected: &str) -> Self {
        ExprError::UnsupportedVariant {
            node,
            found: found.to_owned(),
            expected: expected.to_owned(),
        }
    }

    /// Failures the decider treats as "unknown" rather than as errors.
    pub fn is_evaluation_failure(&self) -> bool {
        matches!(
            self,
            ExprError::NotEvaluable { .. }
                | ExprError::IntegerOverflow { .. }
                | ExprError::NotADeclarationReference { .. }
                | ExprError::NotAReference { .. }
                | ExprError::UnsupportedVariant { .. }
        )
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| {
            serde_json::json!({
                "kind": "Unserializable",
                "message": self.to_string(),
            })
        })
    }
}

pub type ExprResult<T> = Result<T, ExprError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_is_tagged_by_kind() {
        let err = ExprError::EmptyMultiary { node: NodeId(7) };
        let json = err.to_json_value();
        assert_eq!(json["kind"], "EmptyMultiary");
        assert_eq!(json["node"], 7);
    }

    #[test]
    fn display_names_the_node() {
        let err = ExprError::not_evaluable(NodeId(3), "free reference to variable 'x'");
        assert_eq!(
            err.to_string(),
            "expression #3 is not evaluable: free reference to variable 'x'"
        );
    }
}
