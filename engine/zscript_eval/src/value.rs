//! Runtime values.
//!
//! Scalars are inline; arrays and maps are `Rc`-shared with interior
//! mutability, so two variables naming the same array observe each other's
//! writes. Equality follows the language: scalars by content, heap values
//! by identity.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use zscript_ir::{FuncId, Interner, Name, Program};

use crate::environment::{LocalScope, Scope};
use crate::NativeFn;

/// Shared mutable array storage.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;
/// Shared mutable map storage, keyed by string.
pub type MapRef = Rc<RefCell<FxHashMap<Rc<str>, Value>>>;

/// A script-defined function: its declaration plus the scope it closed over.
///
/// Holds the program its declaration lives in, so a function defined by one
/// interpreter run stays callable after later runs replace the program.
#[derive(Debug)]
pub struct Function {
    pub name: Name,
    pub decl: FuncId,
    pub program: Rc<Program>,
    pub closure: LocalScope<Scope>,
}

/// A runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Array(ArrayRef),
    Map(MapRef),
    Function(Rc<Function>),
    Native(&'static NativeFn),
}

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Value {
        Value::Str(s.into())
    }

    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn map(entries: FxHashMap<Rc<str>, Value>) -> Value {
        Value::Map(Rc::new(RefCell::new(entries)))
    }

    /// Only `null` and `false` are falsey. Zero and the empty string are
    /// truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    /// The type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Function(_) => "function",
            Value::Native(_) => "function",
        }
    }

    /// Language equality: different types are never equal, scalars compare
    /// by content, arrays, maps, and functions by identity.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

/// Rendering stops descending at this depth so self-referential arrays
/// cannot hang the renderer.
const MAX_RENDER_DEPTH: usize = 32;

/// Render a value the way the host sees it: numbers in canonical decimal,
/// strings bare, composites recursively.
pub fn render(value: &Value, interner: &Interner) -> String {
    let mut out = String::new();
    render_into(&mut out, value, interner, 0);
    out
}

fn render_into(out: &mut String, value: &Value, interner: &Interner, depth: usize) {
    if depth > MAX_RENDER_DEPTH {
        out.push_str("...");
        return;
    }
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => render_number(out, *n),
        Value::Str(s) => out.push_str(s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.borrow().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_into(out, item, interner, depth + 1);
            }
            out.push(']');
        }
        Value::Map(entries) => {
            // Keys sorted so output is stable across runs.
            let entries = entries.borrow();
            let mut keys: Vec<&Rc<str>> = entries.keys().collect();
            keys.sort();
            out.push_str("#{");
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(key);
                out.push_str(": ");
                if let Some(value) = entries.get(*key) {
                    render_into(out, value, interner, depth + 1);
                }
            }
            out.push('}');
        }
        Value::Function(func) => {
            out.push_str("<fn ");
            out.push_str(&interner.lookup(func.name));
            out.push('>');
        }
        Value::Native(_) => out.push_str("<native fn>"),
    }
}

/// Canonical decimal: integral values print without a fractional part,
/// everything else uses the shortest representation that round-trips.
fn render_number(out: &mut String, n: f64) {
    use fmt::Write;
    let _ = write!(out, "{n}");
}
