//! Host-embeddable ZScript engine.
//!
//! The embedding surface is three types: [`Engine`] (a live interpreter
//! handle), [`ScriptOutput`] (status plus owned rendered text), and
//! [`ExitStatus`] (the outcome class, numbered like `sysexits`).
//!
//! ```no_run
//! use zscript::Engine;
//!
//! let mut engine = Engine::init(&[])?;
//! let output = engine.interpret_with_result("1 + 2;", "<host>");
//! assert_eq!(output.rendered, "3");
//! engine.free();
//! # Ok::<(), zscript::EngineError>(())
//! ```

mod engine;
mod status;

pub use engine::{Engine, EngineError, ScriptOutput};
pub use status::ExitStatus;
