//! Shared data structures for the ZScript engine.
//!
//! Everything downstream phases exchange lives here: byte spans, the string
//! interner, token kinds, and the arena syntax tree. The crate has no
//! knowledge of scanning, parsing, or evaluation.

pub mod ast;
mod name;
mod span;
mod token;

pub use ast::{
    Ast, BinaryOp, Expr, ExprId, ExprKind, ExprRange, FuncDecl, FuncId, MapRange, ParamRange,
    Program, Stmt, StmtId, StmtKind, StmtRange, UnaryOp,
};
pub use name::{Interner, Name};
pub use span::Span;
pub use token::{LexErrorKind, Token, TokenKind};
