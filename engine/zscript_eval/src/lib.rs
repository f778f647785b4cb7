//! Tree-walking evaluator for ZScript.
//!
//! The [`Interpreter`] executes parsed programs against a persistent
//! [`Environment`], so one interpreter can run many programs in sequence
//! and keep its globals. All failures are [`EvalError`]s that convert into
//! diagnostics.

mod builtins;
mod environment;
mod errors;
mod interp;
mod operators;
mod value;

pub use builtins::{Arity, NativeCtx, NativeFn, NATIVES};
pub use environment::{Environment, LocalScope, Scope};
pub use errors::{EvalError, EvalErrorKind};
pub use interp::{Interpreter, FRAMES_MAX};
pub use value::{render, ArrayRef, Function, MapRef, Value};

#[cfg(test)]
mod tests;
