use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use zscript_ir::{Interner, Program};

use crate::{render, EvalError, EvalErrorKind, Interpreter};

/// Output sink the test keeps a handle to after the interpreter takes it.
#[derive(Clone, Default)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    fn take_string(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

fn compile(source: &str, interner: &Interner) -> Rc<Program> {
    let tokens = zscript_lexer::lex(source, interner);
    match zscript_parse::parse(&tokens) {
        Ok(program) => Rc::new(program),
        Err(diags) => panic!("parse failed: {diags:?}"),
    }
}

/// Run a script, returning the rendered result and anything it printed.
fn run(source: &str) -> Result<(String, String), EvalError> {
    let interner = Rc::new(Interner::new());
    let program = compile(source, &interner);
    let buf = SharedBuf::default();
    let mut interp = Interpreter::with_output(Rc::clone(&interner), Box::new(buf.clone()));
    let value = interp.run(&program)?;
    Ok((render(&value, &interner), buf.take_string()))
}

fn result_of(source: &str) -> String {
    match run(source) {
        Ok((rendered, _)) => rendered,
        Err(err) => panic!("eval failed: {err:?}"),
    }
}

fn error_of(source: &str) -> EvalErrorKind {
    match run(source) {
        Ok((rendered, _)) => panic!("expected an error, got {rendered}"),
        Err(err) => err.kind,
    }
}

#[test]
fn arithmetic_result() {
    assert_eq!(result_of("1 + 2;"), "3");
    assert_eq!(result_of("2 ** 3 ** 2;"), "512");
    assert_eq!(result_of("7 /_ 2;"), "3");
    assert_eq!(result_of("7 % 2;"), "1");
    assert_eq!(result_of("50 %% 200;"), "100");
    assert_eq!(result_of("10 / 4;"), "2.5");
}

#[test]
fn declarations_only_yield_null() {
    assert_eq!(result_of("var x = 1;"), "null");
    assert_eq!(result_of(""), "null");
    assert_eq!(result_of("func f() { return 1; }"), "null");
}

#[test]
fn last_expression_statement_wins() {
    assert_eq!(result_of("var x = 1; x + 1; x * 10;"), "10");
    assert_eq!(result_of("1; 2; var y = 3;"), "2");
}

#[test]
fn undefined_variable_read() {
    assert_eq!(
        error_of("ghost;"),
        EvalErrorKind::UndefinedVariable { name: "ghost".into() }
    );
}

#[test]
fn assignment_requires_declaration() {
    assert_eq!(
        error_of("x = 1;"),
        EvalErrorKind::UndefinedAssignment { name: "x".into() }
    );
    // Declared variables assign fine, and assignment is an expression.
    assert_eq!(result_of("var x; x = 5;"), "5");
}

#[test]
fn block_scoping() {
    assert_eq!(result_of("var x = 1; { var x = 2; } x;"), "1");
    assert_eq!(result_of("var x = 1; { x = 2; } x;"), "2");
}

#[test]
fn if_else() {
    assert_eq!(result_of("var r = 0; if (1 < 2) r = 1; else r = 2; r;"), "1");
    assert_eq!(result_of("var r = 0; if (false) r = 1; else r = 2; r;"), "2");
    // Zero is truthy; only null and false are not.
    assert_eq!(result_of("var r = 0; if (0) r = 1; r;"), "1");
}

#[test]
fn while_loop_with_break_and_continue() {
    assert_eq!(
        result_of("var i = 0; var sum = 0; while (i < 5) { i = i + 1; sum = sum + i; } sum;"),
        "15"
    );
    assert_eq!(
        result_of("var i = 0; while (true) { i = i + 1; if (i >= 3) break; } i;"),
        "3"
    );
    assert_eq!(
        result_of(
            "var i = 0; var odds = 0; \
             while (i < 6) { i = i + 1; if (i % 2 == 0) continue; odds = odds + 1; } odds;"
        ),
        "3"
    );
}

#[test]
fn functions_and_recursion() {
    assert_eq!(result_of("func add(a, b) { return a + b; } add(2, 3);"), "5");
    assert_eq!(
        result_of(
            "func fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); } fib(10);"
        ),
        "55"
    );
    // A function with no return produces null.
    assert_eq!(result_of("func noop() {} noop();"), "null");
}

#[test]
fn closures_capture_their_scope() {
    assert_eq!(
        result_of(
            "var counter = 0; \
             func bump() { counter = counter + 1; return counter; } \
             bump(); bump(); bump();"
        ),
        "3"
    );
}

#[test]
fn call_arity_is_checked() {
    assert_eq!(
        error_of("func f(a) { return a; } f(1, 2);"),
        EvalErrorKind::WrongArity { callee: "f".into(), expected: 1, found: 2 }
    );
    assert_eq!(
        error_of("len();"),
        EvalErrorKind::WrongArity { callee: "len".into(), expected: 1, found: 0 }
    );
}

#[test]
fn unbounded_recursion_overflows_cleanly() {
    assert_eq!(
        error_of("func f() { return f(); } f();"),
        EvalErrorKind::StackOverflow
    );
}

#[test]
fn only_functions_are_callable() {
    assert!(matches!(
        error_of("var x = 1; x();"),
        EvalErrorKind::TypeError { .. }
    ));
}

#[test]
fn println_writes_to_the_sink() {
    let (result, output) = match run("println(\"a\", 1 + 1); println(\"b\");") {
        Ok(pair) => pair,
        Err(err) => panic!("eval failed: {err:?}"),
    };
    assert_eq!(output, "a 2\nb\n");
    // println returns null, which is also the final expression value.
    assert_eq!(result, "null");
}

#[test]
fn arrays_read_write_and_grow() {
    assert_eq!(result_of("var xs = [1, 2, 3]; xs[1];"), "2");
    assert_eq!(result_of("var xs = [1, 2, 3]; xs[1] = 9; xs;"), "[1, 9, 3]");
    assert_eq!(result_of("var xs = []; push(xs, 1); push(xs, 2); len(xs);"), "2");
    assert_eq!(result_of("var xs = [1, 2]; pop(xs);"), "2");
}

#[test]
fn two_names_one_array() {
    assert_eq!(
        result_of("var a = [1]; var b = a; push(b, 2); a;"),
        "[1, 2]"
    );
}

#[test]
fn array_index_errors() {
    assert_eq!(
        error_of("var xs = [1]; xs[3];"),
        EvalErrorKind::IndexOutOfBounds { index: 3, len: 1 }
    );
    assert!(matches!(
        error_of("var xs = [1]; xs[0.5];"),
        EvalErrorKind::TypeError { .. }
    ));
    assert_eq!(
        error_of("var xs = [1]; xs[-1];"),
        EvalErrorKind::IndexOutOfBounds { index: -1, len: 1 }
    );
}

#[test]
fn maps_read_write_and_miss() {
    assert_eq!(result_of("var m = #{\"a\": 1}; m[\"a\"];"), "1");
    assert_eq!(result_of("var m = #{}; m[\"missing\"];"), "null");
    assert_eq!(result_of("var m = #{}; m[\"k\"] = 7; m[\"k\"];"), "7");
    assert_eq!(result_of("var m = #{\"b\": 2, \"a\": 1}; m;"), "#{a: 1, b: 2}");
}

#[test]
fn container_addition() {
    assert_eq!(result_of("[1, 2] + [3];"), "[1, 2, 3]");
    assert_eq!(
        result_of("var xs = [1]; var ys = xs + [2]; len(xs);"),
        "1"
    );
    assert_eq!(
        result_of("#{\"a\": 1, \"b\": 2} + #{\"b\": 9};"),
        "#{a: 1, b: 9}"
    );
}

#[test]
fn string_operations() {
    assert_eq!(result_of("\"foo\" + \"bar\";"), "foobar");
    assert_eq!(result_of("\"n = \" + 42;"), "n = 42");
    assert_eq!(result_of("\"hello world\" - \"o\";"), "hell world");
    assert_eq!(result_of("\"abc\"[1];"), "b");
    assert_eq!(result_of("to_upper(\"abc\");"), "ABC");
    assert_eq!(result_of("len(split(\"a,b,c\", \",\"));"), "3");
}

#[test]
fn logical_operators_yield_operands() {
    assert_eq!(result_of("false or 2;"), "2");
    assert_eq!(result_of("1 or ghost;"), "1");
    assert_eq!(result_of("null and ghost;"), "null");
    assert_eq!(result_of("1 and \"x\";"), "x");
}

#[test]
fn division_by_zero_is_an_error() {
    assert_eq!(error_of("1 / 0;"), EvalErrorKind::DivisionByZero);
    assert_eq!(error_of("1 % 0;"), EvalErrorKind::DivisionByZero);
}

#[test]
fn args_global_is_visible() {
    let interner = Rc::new(Interner::new());
    let program = compile("args[0] + \":\" + args[1];", &interner);
    let mut interp = Interpreter::new(Rc::clone(&interner));
    interp.set_args(&["first".to_owned(), "second".to_owned()]);
    let value = match interp.run(&program) {
        Ok(value) => value,
        Err(err) => panic!("eval failed: {err:?}"),
    };
    assert_eq!(render(&value, &interner), "first:second");
}

#[test]
fn interpreter_state_persists_across_programs() {
    let interner = Rc::new(Interner::new());
    let mut interp = Interpreter::with_output(Rc::clone(&interner), Box::new(SharedBuf::default()));

    let first = compile("var total = 10; func double(n) { return n * 2; }", &interner);
    if let Err(err) = interp.run(&first) {
        panic!("first run failed: {err:?}");
    }

    // The second program calls a function whose declaration lives in the
    // first program's arena.
    let second = compile("double(total);", &interner);
    let value = match interp.run(&second) {
        Ok(value) => value,
        Err(err) => panic!("second run failed: {err:?}"),
    };
    assert_eq!(render(&value, &interner), "20");
}

#[test]
fn runtime_error_leaves_interpreter_usable() {
    let interner = Rc::new(Interner::new());
    let mut interp = Interpreter::with_output(Rc::clone(&interner), Box::new(SharedBuf::default()));

    let bad = compile("var x = 1; ghost;", &interner);
    assert!(interp.run(&bad).is_err());

    let good = compile("x + 1;", &interner);
    let value = match interp.run(&good) {
        Ok(value) => value,
        Err(err) => panic!("recovery run failed: {err:?}"),
    };
    assert_eq!(render(&value, &interner), "2");
}
