//! The tree-walking interpreter.
//!
//! Statements execute for effect and report control flow through [`Flow`];
//! expressions evaluate to [`Value`]s. The interpreter outlives any single
//! program, so a REPL feeds it one program after another and globals
//! persist.

use std::io::{self, Write};
use std::rc::Rc;

use tracing::trace;
use zscript_ir::{BinaryOp, ExprId, ExprKind, Interner, Program, Span, StmtId, StmtKind};

use crate::builtins::{NativeCtx, NATIVES};
use crate::environment::Environment;
use crate::errors::{
    index_out_of_bounds, stack_overflow, type_error, undefined_assignment, undefined_variable,
    wrong_arity, EvalError,
};
use crate::value::{Function, Value};
use crate::operators;

/// Hard ceiling on nested calls.
pub const FRAMES_MAX: usize = 64;

/// Control flow signal from statement execution.
#[derive(Debug)]
enum Flow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

pub struct Interpreter {
    interner: Rc<Interner>,
    env: Environment,
    frames: usize,
    out: Box<dyn Write>,
}

impl Interpreter {
    /// An interpreter printing to stdout, with all natives installed.
    pub fn new(interner: Rc<Interner>) -> Self {
        Interpreter::with_output(interner, Box::new(io::stdout()))
    }

    /// An interpreter printing to the given sink.
    pub fn with_output(interner: Rc<Interner>, out: Box<dyn Write>) -> Self {
        let mut env = Environment::new();
        for native in NATIVES {
            env.define_global(interner.intern(native.name), Value::Native(native));
        }
        Interpreter {
            interner,
            env,
            frames: 0,
            out,
        }
    }

    /// Define the `args` global: the host's argument strings as an array.
    pub fn set_args(&mut self, argv: &[String]) {
        let items = argv
            .iter()
            .map(|arg| Value::string(arg.as_str()))
            .collect();
        self.env
            .define_global(self.interner.intern("args"), Value::array(items));
    }

    /// Execute a program. The result is the value of the last top-level
    /// expression statement, or `Null` when there is none.
    pub fn run(&mut self, program: &Rc<Program>) -> Result<Value, EvalError> {
        trace!(
            statements = program.ast.stmts_in(program.root).len(),
            "executing program"
        );
        let mut last = Value::Null;
        for &id in program.ast.stmts_in(program.root) {
            if let StmtKind::Expr(expr) = program.ast.stmt(id).kind {
                last = self.eval_expr(program, expr)?;
            } else {
                // Parse-time checks keep break/continue/return out of
                // top-level statements, so any flow here is Normal.
                self.exec_stmt(program, id)?;
            }
        }
        Ok(last)
    }

    fn exec_stmt(&mut self, program: &Rc<Program>, id: StmtId) -> Result<Flow, EvalError> {
        let stmt = program.ast.stmt(id);
        match stmt.kind {
            StmtKind::Expr(expr) => {
                self.eval_expr(program, expr)?;
                Ok(Flow::Normal)
            }
            StmtKind::Var { name, init } => {
                let value = match init {
                    Some(expr) => self.eval_expr(program, expr)?,
                    None => Value::Null,
                };
                self.env.define(name, value);
                Ok(Flow::Normal)
            }
            StmtKind::Func(decl) => {
                let name = program.ast.func(decl).name;
                let function = Function {
                    name,
                    decl,
                    program: Rc::clone(program),
                    closure: self.env.current_scope(),
                };
                self.env.define(name, Value::Function(Rc::new(function)));
                Ok(Flow::Normal)
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval_expr(program, cond)?.is_truthy() {
                    self.exec_stmt(program, then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_stmt(program, else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }
            StmtKind::While { cond, body } => {
                while self.eval_expr(program, cond)?.is_truthy() {
                    match self.exec_stmt(program, body)? {
                        Flow::Normal | Flow::Continue => {}
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                    }
                }
                Ok(Flow::Normal)
            }
            StmtKind::Block(range) => {
                self.env.push_scope();
                let mut flow = Flow::Normal;
                for &inner in program.ast.stmts_in(range) {
                    match self.exec_stmt(program, inner) {
                        Ok(Flow::Normal) => {}
                        Ok(other) => {
                            flow = other;
                            break;
                        }
                        Err(err) => {
                            self.env.pop_scope();
                            return Err(err);
                        }
                    }
                }
                self.env.pop_scope();
                Ok(flow)
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(program, expr)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(value))
            }
            StmtKind::Break => Ok(Flow::Break),
            StmtKind::Continue => Ok(Flow::Continue),
        }
    }

    fn eval_expr(&mut self, program: &Rc<Program>, id: ExprId) -> Result<Value, EvalError> {
        let expr = program.ast.expr(id);
        let span = expr.span;
        match expr.kind {
            ExprKind::Number(n) => Ok(Value::Number(n)),
            ExprKind::Str(name) => Ok(Value::Str(self.interner.lookup(name))),
            ExprKind::Bool(b) => Ok(Value::Bool(b)),
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Ident(name) => self
                .env
                .lookup(name)
                .ok_or_else(|| undefined_variable(&self.interner.lookup(name), span)),
            ExprKind::Unary { op, operand } => {
                let operand = self.eval_expr(program, operand)?;
                operators::unary(op, &operand, span)
            }
            ExprKind::Binary { op, lhs, rhs } => {
                // `and`/`or` evaluate the right side only when needed and
                // yield the deciding operand, not a bool.
                match op {
                    BinaryOp::And => {
                        let lhs = self.eval_expr(program, lhs)?;
                        if lhs.is_truthy() {
                            self.eval_expr(program, rhs)
                        } else {
                            Ok(lhs)
                        }
                    }
                    BinaryOp::Or => {
                        let lhs = self.eval_expr(program, lhs)?;
                        if lhs.is_truthy() {
                            Ok(lhs)
                        } else {
                            self.eval_expr(program, rhs)
                        }
                    }
                    _ => {
                        let lhs = self.eval_expr(program, lhs)?;
                        let rhs = self.eval_expr(program, rhs)?;
                        operators::binary(op, &lhs, &rhs, span, &self.interner)
                    }
                }
            }
            ExprKind::Assign { target, value } => {
                let value = self.eval_expr(program, value)?;
                if self.env.assign(target, value.clone()) {
                    Ok(value)
                } else {
                    Err(undefined_assignment(&self.interner.lookup(target), span))
                }
            }
            ExprKind::AssignIndex {
                object,
                index,
                value,
            } => {
                let object = self.eval_expr(program, object)?;
                let index = self.eval_expr(program, index)?;
                let value = self.eval_expr(program, value)?;
                self.assign_index(&object, &index, value, span)
            }
            ExprKind::Index { object, index } => {
                let object = self.eval_expr(program, object)?;
                let index = self.eval_expr(program, index)?;
                self.read_index(&object, &index, span)
            }
            ExprKind::Call { callee, args } => {
                let callee_value = self.eval_expr(program, callee)?;
                let mut arg_values = Vec::with_capacity(args.len());
                for &arg in program.ast.exprs_in(args) {
                    arg_values.push(self.eval_expr(program, arg)?);
                }
                self.call(&callee_value, &arg_values, span)
            }
            ExprKind::Array(items) => {
                let mut values = Vec::with_capacity(items.len());
                for &item in program.ast.exprs_in(items) {
                    values.push(self.eval_expr(program, item)?);
                }
                Ok(Value::array(values))
            }
            ExprKind::Map(entries) => {
                let mut map = rustc_hash::FxHashMap::default();
                for &(key, value) in program.ast.map_entries_in(entries) {
                    let key_span = program.ast.expr(key).span;
                    let key = match self.eval_expr(program, key)? {
                        Value::Str(s) => s,
                        other => {
                            return Err(type_error(
                                format!("map keys must be strings, got {}", other.type_name()),
                                key_span,
                            ))
                        }
                    };
                    let value = self.eval_expr(program, value)?;
                    map.insert(key, value);
                }
                Ok(Value::map(map))
            }
        }
    }

    fn call(&mut self, callee: &Value, args: &[Value], span: Span) -> Result<Value, EvalError> {
        match callee {
            Value::Function(func) => self.call_function(func, args, span),
            Value::Native(native) => {
                if !native.arity.accepts(args.len()) {
                    return Err(wrong_arity(
                        native.name,
                        native.arity.expected(),
                        args.len(),
                        span,
                    ));
                }
                let mut ctx = NativeCtx {
                    interner: &self.interner,
                    out: &mut *self.out,
                };
                (native.run)(&mut ctx, args).map_err(|message| type_error(message, span))
            }
            other => Err(type_error(
                format!("can only call functions, got {}", other.type_name()),
                span,
            )),
        }
    }

    fn call_function(
        &mut self,
        func: &Rc<Function>,
        args: &[Value],
        span: Span,
    ) -> Result<Value, EvalError> {
        let decl = *func.program.ast.func(func.decl);
        let params = func.program.ast.params_in(decl.params).to_vec();
        if args.len() != params.len() {
            return Err(wrong_arity(
                &self.interner.lookup(func.name),
                params.len(),
                args.len(),
                span,
            ));
        }
        if self.frames >= FRAMES_MAX {
            return Err(stack_overflow(span));
        }

        self.frames += 1;
        self.env.push_scope_with_parent(func.closure.clone());
        for (param, arg) in params.iter().zip(args) {
            self.env.define(*param, arg.clone());
        }
        let result = self.exec_stmt(&func.program, decl.body);
        self.env.pop_scope();
        self.frames -= 1;

        match result? {
            Flow::Return(value) => Ok(value),
            _ => Ok(Value::Null),
        }
    }

    fn read_index(&self, object: &Value, index: &Value, span: Span) -> Result<Value, EvalError> {
        match object {
            Value::Array(items) => {
                let items = items.borrow();
                let at = array_index(index, items.len(), span)?;
                Ok(items[at].clone())
            }
            Value::Str(s) => {
                let count = s.chars().count();
                let at = array_index(index, count, span)?;
                let c = s.chars().nth(at).unwrap_or_default();
                Ok(Value::string(c.to_string()))
            }
            Value::Map(entries) => match index {
                // A missing key reads as null; writes create the entry.
                Value::Str(key) => Ok(entries.borrow().get(key).cloned().unwrap_or(Value::Null)),
                other => Err(type_error(
                    format!("map keys must be strings, got {}", other.type_name()),
                    span,
                )),
            },
            other => Err(type_error(
                format!("cannot index {}", other.type_name()),
                span,
            )),
        }
    }

    fn assign_index(
        &self,
        object: &Value,
        index: &Value,
        value: Value,
        span: Span,
    ) -> Result<Value, EvalError> {
        match object {
            Value::Array(items) => {
                let mut items = items.borrow_mut();
                let at = array_index(index, items.len(), span)?;
                items[at] = value.clone();
                Ok(value)
            }
            Value::Map(entries) => match index {
                Value::Str(key) => {
                    entries.borrow_mut().insert(key.clone(), value.clone());
                    Ok(value)
                }
                other => Err(type_error(
                    format!("map keys must be strings, got {}", other.type_name()),
                    span,
                )),
            },
            other => Err(type_error(
                format!("cannot index-assign {}", other.type_name()),
                span,
            )),
        }
    }
}

/// Check a value is a whole in-bounds array index.
fn array_index(index: &Value, len: usize, span: Span) -> Result<usize, EvalError> {
    let n = match index {
        Value::Number(n) => *n,
        other => {
            return Err(type_error(
                format!("index must be a number, got {}", other.type_name()),
                span,
            ))
        }
    };
    if n.fract() != 0.0 || !n.is_finite() {
        return Err(type_error(format!("index must be an integer, got {n}"), span));
    }
    if n < 0.0 || n >= len as f64 {
        return Err(index_out_of_bounds(n as i64, len, span));
    }
    Ok(n as usize)
}
