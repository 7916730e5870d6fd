//! statexpr-eval: constant evaluation over the statexpr model.
//!
//! Evaluates closed expressions to integers and booleans, builds default
//! values of types, and folds operands into canonical literals. All
//! integers are arbitrary precision; narrowing to a host integer is an
//! explicit, fallible step (see [`numeric`]).

pub mod defaults;
pub mod evaluate;
pub mod fold;
pub mod numeric;
pub mod types;

pub use defaults::{
    create_variable_declaration_with_default_initial_value, initial_value_of,
    initial_value_of_type, initial_value_of_type_with,
};
pub use evaluate::{evaluate, evaluate_boolean, evaluate_host_integer, evaluate_integer};
pub use types::Value;
