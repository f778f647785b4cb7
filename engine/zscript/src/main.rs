//! ZScript CLI
//!
//! Runs script files, evaluates one-liners, and hosts a line REPL on
//! top of the embedding API.

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Once;

use zscript::{Engine, EngineError, ExitStatus};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing output for the CLI.
///
/// Enable with `RUST_LOG=zscript_eval=trace` or similar; without
/// `RUST_LOG` the subscriber is not installed at all.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    let status = match args.get(1).map(String::as_str) {
        None => repl(),
        Some("help") | Some("-h") | Some("--help") => {
            print_usage();
            ExitStatus::Ok
        }
        Some("version") | Some("-v") | Some("--version") => {
            println!("zvm {}", env!("CARGO_PKG_VERSION"));
            ExitStatus::Ok
        }
        Some("-e") | Some("--eval") => {
            let Some(source) = args.get(2) else {
                eprintln!("error: missing source after {}", args[1]);
                eprintln!("Usage: zvm -e <source> [script args...]");
                std::process::exit(ExitStatus::Usage.code());
            };
            eval_source(source, &args[3..])
        }
        Some(path) => run_file(path, &args[2..]),
    };

    std::process::exit(status.code());
}

fn boot(script_args: &[String]) -> Engine {
    match Engine::init(script_args) {
        Ok(engine) => engine,
        Err(err @ EngineError::AlreadyLive) => {
            eprintln!("error[{}]: {err}", err.code());
            std::process::exit(err.status().code());
        }
    }
}

fn run_file(path: &str, script_args: &[String]) -> ExitStatus {
    let mut engine = boot(script_args);
    let output = engine.run_file(Path::new(path));
    if !output.status.is_ok() {
        eprint!("{}", output.rendered);
    }
    engine.free();
    output.status
}

fn eval_source(source: &str, script_args: &[String]) -> ExitStatus {
    let mut engine = boot(script_args);
    let output = engine.interpret_with_result(source, "<eval>");
    if output.status.is_ok() {
        println!("{}", output.rendered);
    } else {
        eprint!("{}", output.rendered);
    }
    engine.free();
    output.status
}

/// Read-eval-print loop. State persists across lines, so functions and
/// variables from earlier lines stay in scope.
fn repl() -> ExitStatus {
    println!("zvm {} (ctrl-d to exit)", env!("CARGO_PKG_VERSION"));
    let mut engine = boot(&[]);
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        let _ = std::io::stdout().flush();
        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(err)) => {
                eprintln!("error: could not read input: {err}");
                engine.free();
                return ExitStatus::Io;
            }
            None => break,
        };
        if line.trim().is_empty() {
            continue;
        }
        let output = engine.interpret_with_result(&line, "<repl>");
        if output.status.is_ok() {
            println!("{}", output.rendered);
        } else {
            eprint!("{}", output.rendered);
        }
    }

    engine.free();
    ExitStatus::Ok
}

fn print_usage() {
    println!("ZScript virtual machine");
    println!();
    println!("Usage: zvm [command] [options]");
    println!();
    println!("Commands:");
    println!("  <file.zs> [args...]  Run a script file");
    println!("  -e <source> [args]   Evaluate a source string");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("With no arguments, zvm starts an interactive REPL.");
    println!();
    println!("Script arguments are visible to the script as the 'args' array.");
}
