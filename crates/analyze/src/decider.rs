//! One-sided tautology and contradiction checks.
//!
//! `definitely_true` and `definitely_false` answer `true` only when a
//! syntactic argument, possibly backed by constant evaluation, proves the
//! claim for every assignment of the free declarations. `false` means
//! "unknown". Evaluation failures never surface: a rule whose operands do
//! not evaluate simply does not fire.
//!
//! Integer operands are checked against the configured host integer width
//! before they are compared; values outside of it make the rule not fire.
//! Expressions no rule covers are decided by evaluation alone.

use statexpr_core::{AstIndex, BinaryOp, DeciderConfig, Expression, MultiaryOp, NodeId};
use statexpr_eval::numeric;
use statexpr_eval::{evaluate, Value};

pub struct Decider<'a> {
    index: &'a AstIndex,
    config: DeciderConfig,
}

impl<'a> Decider<'a> {
    pub fn new(index: &'a AstIndex) -> Self {
        Self::with_config(index, DeciderConfig::default())
    }

    pub fn with_config(index: &'a AstIndex, config: DeciderConfig) -> Self {
        Decider { index, config }
    }

    /// Evaluated value of `expression`, with integers checked against the
    /// host width.
    fn host_value(&self, expression: NodeId) -> Option<Value> {
        match evaluate(self.index, expression) {
            Ok(Value::Integer(v)) => match numeric::fit_host(v, self.config.host_integer) {
                Ok(v) => Some(Value::Integer(v)),
                Err(err) => {
                    tracing::trace!(%expression, %err, "operand outside host integer");
                    None
                }
            },
            Ok(value) => Some(value),
            Err(err) => {
                if !err.is_evaluation_failure() {
                    tracing::debug!(%expression, %err, "operand rejected by the evaluator");
                }
                None
            }
        }
    }

    /// Truth of `left op right` when both sides evaluate to comparable
    /// values. Booleans only compare for (in)equality.
    fn evaluated_comparison(&self, op: BinaryOp, left: NodeId, right: NodeId) -> Option<bool> {
        let l = self.host_value(left)?;
        let r = self.host_value(right)?;
        match (l, r) {
            (Value::Integer(l), Value::Integer(r)) => numeric::compare_integers(op, &l, &r),
            (Value::Boolean(l), Value::Boolean(r)) => match op {
                BinaryOp::Equal => Some(l == r),
                BinaryOp::NotEqual => Some(l != r),
                _ => None,
            },
            _ => None,
        }
    }

    fn is_enumeration_literal(&self, expression: NodeId) -> bool {
        self.index
            .expr(expression)
            .map(Expression::is_enumeration_literal)
            .unwrap_or(false)
    }

    pub fn definitely_true(&self, expression: NodeId) -> bool {
        let Ok(e) = self.index.expr(expression) else {
            return false;
        };
        match e {
            Expression::True => true,
            Expression::Binary { op, left, right } if op.is_comparison() => {
                let reflexive = matches!(
                    op,
                    BinaryOp::Equal | BinaryOp::GreaterEqual | BinaryOp::LessEqual
                );
                if reflexive && self.index.helper_equals(*left, *right) {
                    return true;
                }
                // distinct enumeration literals may share an ordinal
                if self.is_enumeration_literal(*left) && self.is_enumeration_literal(*right) {
                    return false;
                }
                self.evaluated_comparison(*op, *left, *right) == Some(true)
            }
            Expression::Not { operand } => self.definitely_false(*operand),
            Expression::Multiary {
                op: MultiaryOp::Or,
                operands,
            } => operands.iter().any(|o| self.definitely_true(*o)),
            Expression::Multiary {
                op: MultiaryOp::And,
                operands,
            } => operands.iter().all(|o| self.definitely_true(*o)),
            _ => self.host_value(expression) == Some(Value::Boolean(true)),
        }
    }

    pub fn definitely_false(&self, expression: NodeId) -> bool {
        let Ok(e) = self.index.expr(expression) else {
            return false;
        };
        match e {
            Expression::False => true,
            Expression::Binary { op, left, right } if op.is_comparison() => {
                if *op == BinaryOp::Equal && self.different_enumeration_literals(*left, *right) {
                    return true;
                }
                self.evaluated_comparison(*op, *left, *right) == Some(false)
            }
            Expression::Not { operand } => self.definitely_true(*operand),
            Expression::Multiary {
                op: MultiaryOp::And,
                operands,
            } => {
                operands.iter().any(|o| self.definitely_false(*o))
                    || (self.config.equality_chains
                        && self.has_equality_to_different_values(expression))
            }
            Expression::Multiary {
                op: MultiaryOp::Or,
                operands,
            } => operands.iter().all(|o| self.definitely_false(*o)),
            _ => self.host_value(expression) == Some(Value::Boolean(false)),
        }
    }

    fn different_enumeration_literals(&self, left: NodeId, right: NodeId) -> bool {
        match (self.index.expr(left), self.index.expr(right)) {
            (
                Ok(Expression::EnumerationLiteral { literal: l, .. }),
                Ok(Expression::EnumerationLiteral { literal: r, .. }),
            ) => !self.index.helper_equals(*l, *r),
            _ => false,
        }
    }

    /// `x == v && ... && x == w` with `v != w`, looking through nested
    /// conjunctions. Left operands are matched structurally, so `a[i]` and
    /// `a[j]` are kept apart. Equalities whose value cannot be determined
    /// are left out.
    fn has_equality_to_different_values(&self, and: NodeId) -> bool {
        let equalities = collect_all_equality_expressions(self.index, and);
        let mut bound: Vec<(NodeId, NodeId, Value)> = Vec::new();
        for equality in filter_reference_equality_expressions(self.index, &equalities) {
            let Some((_, left, right)) = self.index.expr(equality).ok().and_then(Expression::binary)
            else {
                continue;
            };
            let Some(value) = self.host_value(right) else {
                continue;
            };
            let witness = bound.iter().find(|(l, _, v)| {
                self.index.helper_equals(*l, left)
                    && match (v, &value) {
                        (Value::Integer(a), Value::Integer(b)) => a != b,
                        (Value::Boolean(a), Value::Boolean(b)) => a != b,
                        _ => false,
                    }
            });
            if let Some((_, other, _)) = witness {
                tracing::trace!(
                    first = %other,
                    second = %equality,
                    "equality chain contradiction"
                );
                return true;
            }
            bound.push((left, equality, value));
        }
        false
    }

    /// `lhs || rhs` is `x || !x` in either order.
    pub fn is_certain_event(&self, lhs: NodeId, rhs: NodeId) -> bool {
        self.negates(lhs, rhs) || self.negates(rhs, lhs)
    }

    fn negates(&self, negation: NodeId, other: NodeId) -> bool {
        match self.index.expr(negation) {
            Ok(Expression::Not { operand }) => self.index.helper_equals(*operand, other),
            _ => false,
        }
    }
}

// ──────────────────────────────────────────────
// Equality collection
// ──────────────────────────────────────────────

/// Equalities directly under `and` or under conjunctions nested in it, in
/// operand order.
pub fn collect_all_equality_expressions(index: &AstIndex, and: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let Ok(Expression::Multiary {
        op: MultiaryOp::And,
        operands,
    }) = index.expr(and)
    else {
        return out;
    };
    for operand in operands {
        match index.expr(*operand) {
            Ok(Expression::Binary {
                op: BinaryOp::Equal,
                ..
            }) => out.push(*operand),
            Ok(Expression::Multiary {
                op: MultiaryOp::And,
                ..
            }) => out.extend(collect_all_equality_expressions(index, *operand)),
            _ => {}
        }
    }
    out
}

/// Equalities of the form `reference == non-reference`.
pub fn filter_reference_equality_expressions(index: &AstIndex, equalities: &[NodeId]) -> Vec<NodeId> {
    let is_reference = |e: NodeId| index.expr(e).map(Expression::is_reference).unwrap_or(false);
    equalities
        .iter()
        .copied()
        .filter(|eq| match index.expr(*eq).ok().and_then(Expression::binary) {
            Some((_, left, right)) => is_reference(left) && !is_reference(right),
            None => false,
        })
        .collect()
}

// ──────────────────────────────────────────────
// Shorthands with the default configuration
// ──────────────────────────────────────────────

pub fn definitely_true(index: &AstIndex, expression: NodeId) -> bool {
    Decider::new(index).definitely_true(expression)
}

pub fn definitely_false(index: &AstIndex, expression: NodeId) -> bool {
    Decider::new(index).definitely_false(expression)
}

pub fn is_certain_event(index: &AstIndex, lhs: NodeId, rhs: NodeId) -> bool {
    Decider::new(index).is_certain_event(lhs, rhs)
}
