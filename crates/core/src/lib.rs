//! statexpr-core: expression model of a statechart action language.
//!
//! Holds the node types, the arena-backed [`AstIndex`] that owns them and
//! tracks containment and cross references, and the structural operations
//! built on top: model queries, builders, rewriters and array accessors.
//!
//! # Public API
//!
//! - [`AstIndex`] -- node arena, parent pointers, reverse reference index
//! - [`ExprError`] / [`ExprResult`] -- error type shared by all statexpr crates
//! - [`Config`] -- TOML-loadable tunables
//! - AST types: [`Node`], [`Expression`], [`Declaration`],
//!   [`TypeDefinition`], [`NodeId`]
//!
//! Operations are free functions grouped by module: [`model`] (queries),
//! [`build`] (constructors), [`rewrite`] (in-place edits), [`access`]
//! (array access chains).

pub mod access;
pub mod ast;
pub mod build;
pub mod config;
pub mod error;
pub mod index;
pub mod model;
pub mod rewrite;

// ── Convenience re-exports ───────────────────────────────────────────

pub use ast::{
    BinaryOp, Declaration, DeclarationKind, Expression, ExpressionGroup, FieldAssignment,
    MultiaryOp, Node, NodeId, Package, TypeDefinition, VariableAnnotation,
};
pub use config::{Config, ConfigError, DeciderConfig, DefaultsConfig, HostInteger};
pub use error::{ExprError, ExprResult};
pub use index::AstIndex;
