//! Built-in native functions.
//!
//! Natives are plain function pointers in a static table; the interpreter
//! defines each one as a global before the first statement runs. They
//! report failures as bare messages and the evaluator attaches the call
//! span.

use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use zscript_ir::Interner;

use crate::value::{render, Value};

/// How many arguments a native accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }

    /// The count named in arity error messages.
    pub fn expected(self) -> usize {
        match self {
            Arity::Exact(n) | Arity::AtLeast(n) => n,
        }
    }
}

/// What a native sees besides its arguments: the interner for rendering
/// and the output sink `print` writes to.
pub struct NativeCtx<'a> {
    pub interner: &'a Interner,
    pub out: &'a mut dyn Write,
}

type NativeResult = Result<Value, String>;

/// A host-provided function callable from scripts.
pub struct NativeFn {
    pub name: &'static str,
    pub arity: Arity,
    pub run: fn(&mut NativeCtx<'_>, &[Value]) -> NativeResult,
}

impl std::fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeFn").field("name", &self.name).finish()
    }
}

/// Every native the interpreter installs, in definition order.
pub static NATIVES: &[NativeFn] = &[
    NativeFn { name: "print", arity: Arity::AtLeast(0), run: native_print },
    NativeFn { name: "println", arity: Arity::AtLeast(0), run: native_println },
    NativeFn { name: "to_str", arity: Arity::Exact(1), run: native_to_str },
    NativeFn { name: "len", arity: Arity::Exact(1), run: native_len },
    NativeFn { name: "push", arity: Arity::Exact(2), run: native_push },
    NativeFn { name: "pop", arity: Arity::Exact(1), run: native_pop },
    NativeFn { name: "str_contains", arity: Arity::Exact(2), run: native_str_contains },
    NativeFn { name: "substring", arity: Arity::Exact(3), run: native_substring },
    NativeFn { name: "to_upper", arity: Arity::Exact(1), run: native_to_upper },
    NativeFn { name: "to_lower", arity: Arity::Exact(1), run: native_to_lower },
    NativeFn { name: "trim", arity: Arity::Exact(1), run: native_trim },
    NativeFn { name: "split", arity: Arity::Exact(2), run: native_split },
    NativeFn { name: "clock", arity: Arity::Exact(0), run: native_clock },
    NativeFn { name: "sqrt", arity: Arity::Exact(1), run: native_sqrt },
    NativeFn { name: "floor", arity: Arity::Exact(1), run: native_floor },
    NativeFn { name: "ceil", arity: Arity::Exact(1), run: native_ceil },
    NativeFn { name: "abs", arity: Arity::Exact(1), run: native_abs },
];

fn want_number(name: &str, value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(format!("'{name}' expects a number, got {}", other.type_name())),
    }
}

fn want_string<'v>(name: &str, value: &'v Value) -> Result<&'v str, String> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(format!("'{name}' expects a string, got {}", other.type_name())),
    }
}

fn render_joined(ctx: &NativeCtx<'_>, args: &[Value]) -> String {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&render(arg, ctx.interner));
    }
    out
}

fn native_print(ctx: &mut NativeCtx<'_>, args: &[Value]) -> NativeResult {
    let text = render_joined(ctx, args);
    write!(ctx.out, "{text}").map_err(|e| format!("write failed: {e}"))?;
    Ok(Value::Null)
}

fn native_println(ctx: &mut NativeCtx<'_>, args: &[Value]) -> NativeResult {
    let text = render_joined(ctx, args);
    writeln!(ctx.out, "{text}").map_err(|e| format!("write failed: {e}"))?;
    Ok(Value::Null)
}

fn native_to_str(ctx: &mut NativeCtx<'_>, args: &[Value]) -> NativeResult {
    Ok(Value::string(render(&args[0], ctx.interner)))
}

/// Length in characters for strings, elements for arrays, entries for maps.
fn native_len(_: &mut NativeCtx<'_>, args: &[Value]) -> NativeResult {
    match &args[0] {
        Value::Str(s) => Ok(Value::Number(s.chars().count() as f64)),
        Value::Array(items) => Ok(Value::Number(items.borrow().len() as f64)),
        Value::Map(entries) => Ok(Value::Number(entries.borrow().len() as f64)),
        other => Err(format!("'len' expects a string, array, or map, got {}", other.type_name())),
    }
}

/// Appends in place and returns the array, so pushes chain.
fn native_push(_: &mut NativeCtx<'_>, args: &[Value]) -> NativeResult {
    match &args[0] {
        Value::Array(items) => {
            items.borrow_mut().push(args[1].clone());
            Ok(args[0].clone())
        }
        other => Err(format!("'push' expects an array, got {}", other.type_name())),
    }
}

fn native_pop(_: &mut NativeCtx<'_>, args: &[Value]) -> NativeResult {
    match &args[0] {
        Value::Array(items) => items
            .borrow_mut()
            .pop()
            .ok_or_else(|| "'pop' on an empty array".to_owned()),
        other => Err(format!("'pop' expects an array, got {}", other.type_name())),
    }
}

fn native_str_contains(_: &mut NativeCtx<'_>, args: &[Value]) -> NativeResult {
    let haystack = want_string("str_contains", &args[0])?;
    let needle = want_string("str_contains", &args[1])?;
    Ok(Value::Bool(haystack.contains(needle)))
}

/// Character-indexed substring. Bounds clamp to the string; a start past
/// the end yields the empty string.
fn native_substring(_: &mut NativeCtx<'_>, args: &[Value]) -> NativeResult {
    let s = want_string("substring", &args[0])?;
    let start = want_number("substring", &args[1])?.max(0.0) as usize;
    let end = want_number("substring", &args[2])?.max(0.0) as usize;
    let end = end.max(start);
    let out: String = s.chars().skip(start).take(end - start).collect();
    Ok(Value::string(out))
}

fn native_to_upper(_: &mut NativeCtx<'_>, args: &[Value]) -> NativeResult {
    Ok(Value::string(want_string("to_upper", &args[0])?.to_uppercase()))
}

fn native_to_lower(_: &mut NativeCtx<'_>, args: &[Value]) -> NativeResult {
    Ok(Value::string(want_string("to_lower", &args[0])?.to_lowercase()))
}

fn native_trim(_: &mut NativeCtx<'_>, args: &[Value]) -> NativeResult {
    Ok(Value::string(want_string("trim", &args[0])?.trim()))
}

/// Split on a separator. An empty separator splits into characters.
fn native_split(_: &mut NativeCtx<'_>, args: &[Value]) -> NativeResult {
    let s = want_string("split", &args[0])?;
    let sep = want_string("split", &args[1])?;
    let parts: Vec<Value> = if sep.is_empty() {
        s.chars().map(|c| Value::string(c.to_string())).collect()
    } else {
        s.split(sep).map(Value::string).collect()
    };
    Ok(Value::array(parts))
}

/// Seconds since the Unix epoch as a float.
fn native_clock(_: &mut NativeCtx<'_>, _: &[Value]) -> NativeResult {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| format!("clock unavailable: {e}"))?;
    Ok(Value::Number(elapsed.as_secs_f64()))
}

fn native_sqrt(_: &mut NativeCtx<'_>, args: &[Value]) -> NativeResult {
    Ok(Value::Number(want_number("sqrt", &args[0])?.sqrt()))
}

fn native_floor(_: &mut NativeCtx<'_>, args: &[Value]) -> NativeResult {
    Ok(Value::Number(want_number("floor", &args[0])?.floor()))
}

fn native_ceil(_: &mut NativeCtx<'_>, args: &[Value]) -> NativeResult {
    Ok(Value::Number(want_number("ceil", &args[0])?.ceil()))
}

fn native_abs(_: &mut NativeCtx<'_>, args: &[Value]) -> NativeResult {
    Ok(Value::Number(want_number("abs", &args[0])?.abs()))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn call(native: &NativeFn, args: &[Value]) -> (NativeResult, String) {
        let interner = Interner::new();
        let mut sink = Vec::new();
        let result = {
            let mut ctx = NativeCtx { interner: &interner, out: &mut sink };
            (native.run)(&mut ctx, args)
        };
        (result, String::from_utf8(sink).unwrap())
    }

    fn by_name(name: &str) -> &'static NativeFn {
        NATIVES.iter().find(|n| n.name == name).unwrap()
    }

    #[test]
    fn arity_checks() {
        assert!(Arity::Exact(2).accepts(2));
        assert!(!Arity::Exact(2).accepts(3));
        assert!(Arity::AtLeast(0).accepts(5));
    }

    #[test]
    fn println_joins_arguments_with_spaces() {
        let (result, out) = call(
            by_name("println"),
            &[Value::string("x"), Value::Number(3.0), Value::Null],
        );
        assert_eq!(result, Ok(Value::Null));
        assert_eq!(out, "x 3 null\n");
    }

    #[test]
    fn len_by_type() {
        assert_eq!(
            call(by_name("len"), &[Value::string("héllo")]).0,
            Ok(Value::Number(5.0))
        );
        assert_eq!(
            call(by_name("len"), &[Value::array(vec![Value::Null; 3])]).0,
            Ok(Value::Number(3.0))
        );
        assert!(call(by_name("len"), &[Value::Number(1.0)]).0.is_err());
    }

    #[test]
    fn push_and_pop_share_storage() {
        let arr = Value::array(vec![Value::Number(1.0)]);
        call(by_name("push"), &[arr.clone(), Value::Number(2.0)]).0.unwrap();
        let popped = call(by_name("pop"), &[arr.clone()]).0.unwrap();
        assert_eq!(popped, Value::Number(2.0));

        let emptied = Value::array(vec![]);
        call(by_name("pop"), &[emptied.clone()]).0.unwrap_err();
    }

    #[test]
    fn string_helpers() {
        assert_eq!(
            call(by_name("substring"), &[Value::string("hello"), Value::Number(1.0), Value::Number(3.0)]).0,
            Ok(Value::string("el"))
        );
        assert_eq!(
            call(by_name("substring"), &[Value::string("hi"), Value::Number(5.0), Value::Number(9.0)]).0,
            Ok(Value::string(""))
        );
        assert_eq!(
            call(by_name("str_contains"), &[Value::string("hello"), Value::string("ell")]).0,
            Ok(Value::Bool(true))
        );
        assert_eq!(
            call(by_name("trim"), &[Value::string("  x ")]).0,
            Ok(Value::string("x"))
        );
    }

    #[test]
    fn split_variants() {
        let (result, _) = call(by_name("split"), &[Value::string("a,b,c"), Value::string(",")]);
        match result.unwrap() {
            Value::Array(items) => assert_eq!(items.borrow().len(), 3),
            other => panic!("expected array, got {other:?}"),
        }

        let (result, _) = call(by_name("split"), &[Value::string("ab"), Value::string("")]);
        match result.unwrap() {
            Value::Array(items) => {
                assert_eq!(items.borrow().as_slice(), &[Value::string("a"), Value::string("b")]);
            }
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn math_natives() {
        assert_eq!(call(by_name("sqrt"), &[Value::Number(9.0)]).0, Ok(Value::Number(3.0)));
        assert_eq!(call(by_name("floor"), &[Value::Number(1.9)]).0, Ok(Value::Number(1.0)));
        assert_eq!(call(by_name("ceil"), &[Value::Number(1.1)]).0, Ok(Value::Number(2.0)));
        assert_eq!(call(by_name("abs"), &[Value::Number(-4.0)]).0, Ok(Value::Number(4.0)));
    }
}
