//! The host-facing engine handle.
//!
//! An [`Engine`] owns one interpreter plus the interner its programs
//! share. Scripts run on the calling thread and errors come back as
//! rendered text inside a [`ScriptOutput`], never as a panic.
//!
//! One engine may be live per process at a time. [`Engine::init`] claims
//! the slot and a second call fails with [`EngineError::AlreadyLive`]
//! until the first handle is dropped or [`Engine::free`]d. Using a handle
//! after teardown is unrepresentable: `free` consumes the value.
//!
//! `Engine` holds `Rc` state and is neither `Send` nor `Sync`; a host
//! that wants cross-thread access must serialize behind its own channel
//! or mutex.

use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;
use zscript_diagnostic::{Diagnostic, ErrorCode, Renderer};
use zscript_eval::{render, Interpreter};
use zscript_ir::Interner;

use crate::status::ExitStatus;

/// Whether some `Engine` currently holds the process slot.
static ENGINE_LIVE: AtomicBool = AtomicBool::new(false);

/// Host misuse of the engine lifecycle.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("an engine is already live in this process")]
    AlreadyLive,
}

impl EngineError {
    pub fn status(&self) -> ExitStatus {
        match self {
            EngineError::AlreadyLive => ExitStatus::Usage,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::AlreadyLive => ErrorCode::E9001,
        }
    }
}

/// What a script run produced: a status plus owned rendered text.
///
/// On success `rendered` is the script's result value; on failure it is
/// the diagnostic text. Either way the caller owns the string and frees
/// it by dropping it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutput {
    pub status: ExitStatus,
    pub rendered: String,
}

impl ScriptOutput {
    fn ok(rendered: String) -> Self {
        ScriptOutput {
            status: ExitStatus::Ok,
            rendered,
        }
    }

    fn failed(status: ExitStatus, rendered: String) -> Self {
        ScriptOutput { status, rendered }
    }
}

/// A live scripting engine.
pub struct Engine {
    interner: Rc<Interner>,
    interp: Interpreter,
}

impl Engine {
    /// Claim the process slot and build an engine whose scripts see
    /// `argv` as the `args` global.
    pub fn init(argv: &[String]) -> Result<Engine, EngineError> {
        Engine::init_inner(argv, None)
    }

    /// Like [`Engine::init`], but `print` and friends write to `out`
    /// instead of stdout.
    pub fn init_with_output(
        argv: &[String],
        out: Box<dyn std::io::Write>,
    ) -> Result<Engine, EngineError> {
        Engine::init_inner(argv, Some(out))
    }

    fn init_inner(
        argv: &[String],
        out: Option<Box<dyn std::io::Write>>,
    ) -> Result<Engine, EngineError> {
        if ENGINE_LIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(EngineError::AlreadyLive);
        }
        let interner = Rc::new(Interner::new());
        let mut interp = match out {
            Some(out) => Interpreter::with_output(Rc::clone(&interner), out),
            None => Interpreter::new(Rc::clone(&interner)),
        };
        interp.set_args(argv);
        debug!(args = argv.len(), "engine initialized");
        Ok(Engine { interner, interp })
    }

    /// Compile and run `source`, reporting the outcome as rendered text.
    ///
    /// `source_name` labels diagnostics, e.g. a file path or `"<repl>"`.
    /// Interpreter state (globals, functions) persists across calls, so
    /// a failed run leaves the engine usable.
    pub fn interpret_with_result(&mut self, source: &str, source_name: &str) -> ScriptOutput {
        let tokens = zscript_lexer::lex(source, &self.interner);
        let program = match zscript_parse::parse(&tokens) {
            Ok(program) => Rc::new(program),
            Err(diagnostics) => {
                let renderer = Renderer::new(source, source_name);
                return ScriptOutput::failed(
                    ExitStatus::Compile,
                    renderer.render_all(&diagnostics),
                );
            }
        };
        match self.interp.run(&program) {
            Ok(value) => ScriptOutput::ok(render(&value, &self.interner)),
            Err(err) => {
                let renderer = Renderer::new(source, source_name);
                ScriptOutput::failed(ExitStatus::Runtime, renderer.render(&err.into_diagnostic()))
            }
        }
    }

    /// Run `source` for its effects, discarding the rendered result.
    pub fn interpret(&mut self, source: &str, source_name: &str) -> ExitStatus {
        self.interpret_with_result(source, source_name).status
    }

    /// Read and run a script file, sharing the
    /// [`interpret_with_result`](Engine::interpret_with_result) contract.
    /// An unreadable file reports [`ExitStatus::Io`] and leaves the
    /// engine untouched.
    pub fn run_file(&mut self, path: &Path) -> ScriptOutput {
        let name = path.display().to_string();
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                let diagnostic =
                    Diagnostic::bare(ErrorCode::E9002, format!("could not read '{name}': {err}"));
                let renderer = Renderer::new("", &name);
                return ScriptOutput::failed(ExitStatus::Io, renderer.render(&diagnostic));
            }
        };
        self.interpret_with_result(&source, &name)
    }

    /// Tear the engine down, releasing the process slot.
    pub fn free(self) {
        drop(self);
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        ENGINE_LIVE.store(false, Ordering::Release);
        debug!("engine freed");
    }
}
