//! Binary and unary operator semantics.
//!
//! Dispatch is by operand type, with every unsupported combination falling
//! through to a type error that names both sides. `and`/`or` never reach
//! this module; the evaluator short-circuits them.

use zscript_ir::{BinaryOp, Interner, Span, UnaryOp};

use crate::errors::{division_by_zero, type_error, EvalError};
use crate::value::{render, Value};

/// Apply a binary operator to two evaluated operands.
pub fn binary(
    op: BinaryOp,
    lhs: &Value,
    rhs: &Value,
    span: Span,
    interner: &Interner,
) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Add => add(lhs, rhs, span, interner),
        BinaryOp::Sub => sub(lhs, rhs, span),
        BinaryOp::Mul => arithmetic(op, lhs, rhs, span, |a, b| Ok(a * b)),
        BinaryOp::Div => arithmetic(op, lhs, rhs, span, move |a, b| {
            if b == 0.0 {
                Err(division_by_zero(span))
            } else {
                Ok(a / b)
            }
        }),
        BinaryOp::FloorDiv => arithmetic(op, lhs, rhs, span, move |a, b| {
            if b == 0.0 {
                Err(division_by_zero(span))
            } else {
                Ok((a / b).floor())
            }
        }),
        BinaryOp::Rem => arithmetic(op, lhs, rhs, span, move |a, b| {
            if b == 0.0 {
                Err(division_by_zero(span))
            } else {
                Ok(a % b)
            }
        }),
        BinaryOp::PercentOf => arithmetic(op, lhs, rhs, span, |a, b| Ok(a / 100.0 * b)),
        BinaryOp::Pow => arithmetic(op, lhs, rhs, span, |a, b| Ok(a.powf(b))),
        BinaryOp::Eq => Ok(Value::Bool(lhs.equals(rhs))),
        BinaryOp::NotEq => Ok(Value::Bool(!lhs.equals(rhs))),
        BinaryOp::Lt => comparison(op, lhs, rhs, span, |a, b| a < b),
        BinaryOp::LtEq => comparison(op, lhs, rhs, span, |a, b| a <= b),
        BinaryOp::Gt => comparison(op, lhs, rhs, span, |a, b| a > b),
        BinaryOp::GtEq => comparison(op, lhs, rhs, span, |a, b| a >= b),
        BinaryOp::And | BinaryOp::Or => Err(type_error(
            format!("'{}' is not a value operator", op.symbol()),
            span,
        )),
    }
}

/// Apply a unary operator.
pub fn unary(op: UnaryOp, operand: &Value, span: Span) -> Result<Value, EvalError> {
    match (op, operand) {
        (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
        (UnaryOp::Neg, other) => Err(type_error(
            format!("cannot negate {}", other.type_name()),
            span,
        )),
        (UnaryOp::Not, value) => Ok(Value::Bool(!value.is_truthy())),
    }
}

/// `+` adds numbers, concatenates strings and arrays, and merges maps
/// (right side wins). When only one side is a string the other side is
/// rendered first, so `"n = " + 3` works.
fn add(lhs: &Value, rhs: &Value, span: Span, interner: &Interner) -> Result<Value, EvalError> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::Str(a), Value::Str(b)) => {
            let mut s = String::with_capacity(a.len() + b.len());
            s.push_str(a);
            s.push_str(b);
            Ok(Value::string(s))
        }
        (Value::Str(a), other) => {
            let mut s = a.to_string();
            s.push_str(&render(other, interner));
            Ok(Value::string(s))
        }
        (other, Value::Str(b)) => {
            let mut s = render(other, interner);
            s.push_str(b);
            Ok(Value::string(s))
        }
        // Fresh containers: neither operand is mutated.
        (Value::Array(a), Value::Array(b)) => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::array(items))
        }
        (Value::Map(a), Value::Map(b)) => {
            let mut entries = a.borrow().clone();
            for (key, value) in b.borrow().iter() {
                entries.insert(key.clone(), value.clone());
            }
            Ok(Value::map(entries))
        }
        _ => Err(binary_type_error(BinaryOp::Add, lhs, rhs, span)),
    }
}

/// `-` subtracts numbers; on strings it crops the first occurrence of the
/// right operand from the left.
fn sub(lhs: &Value, rhs: &Value, span: Span) -> Result<Value, EvalError> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
        (Value::Str(a), Value::Str(b)) => match a.find(&**b) {
            Some(at) => {
                let mut s = String::with_capacity(a.len() - b.len());
                s.push_str(&a[..at]);
                s.push_str(&a[at + b.len()..]);
                Ok(Value::string(s))
            }
            None => Ok(Value::Str(a.clone())),
        },
        _ => Err(binary_type_error(BinaryOp::Sub, lhs, rhs, span)),
    }
}

fn arithmetic(
    op: BinaryOp,
    lhs: &Value,
    rhs: &Value,
    span: Span,
    apply: impl FnOnce(f64, f64) -> Result<f64, EvalError>,
) -> Result<Value, EvalError> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => apply(*a, *b).map(Value::Number),
        _ => Err(binary_type_error(op, lhs, rhs, span)),
    }
}

fn comparison(
    op: BinaryOp,
    lhs: &Value,
    rhs: &Value,
    span: Span,
    apply: impl FnOnce(f64, f64) -> bool,
) -> Result<Value, EvalError> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(apply(*a, *b))),
        _ => Err(binary_type_error(op, lhs, rhs, span)),
    }
}

fn binary_type_error(op: BinaryOp, lhs: &Value, rhs: &Value, span: Span) -> EvalError {
    type_error(
        format!(
            "'{}' does not apply to {} and {}",
            op.symbol(),
            lhs.type_name(),
            rhs.type_name()
        ),
        span,
    )
}
