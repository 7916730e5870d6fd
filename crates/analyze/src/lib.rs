//! statexpr-analyze: static questions about statexpr expressions.
//!
//! Two families of analysis live here:
//!
//! - [`referred`]: which variables, parameters and constants an expression
//!   refers to
//! - [`decider`]: one-sided checks that an expression is a tautology or a
//!   contradiction, plus the `x || !x` certain-event check
//!
//! Both read the [`statexpr_core::AstIndex`] without modifying it.

pub mod decider;
pub mod referred;

pub use decider::{
    collect_all_equality_expressions, definitely_false, definitely_true,
    filter_reference_equality_expressions, is_certain_event, Decider,
};
pub use referred::{
    referred_constants, referred_constants_in, referred_parameters, referred_parameters_in,
    referred_values, referred_variables, referred_variables_in,
};
