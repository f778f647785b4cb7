//! Arena-allocated syntax tree.
//!
//! Expressions and statements live in flat `Vec` pools indexed by `u32`
//! newtypes. Child lists (call arguments, block bodies, map entries) are
//! contiguous runs in side pools addressed by start/len ranges, so no node
//! owns a heap allocation of its own.

use crate::{Name, Span};

/// Index of an expression in [`Ast::exprs`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExprId(u32);

impl ExprId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a statement in [`Ast::stmts`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StmtId(u32);

impl StmtId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a function declaration in [`Ast::funcs`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FuncId(u32);

impl FuncId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A contiguous run of expression ids in the expression-list pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExprRange {
    start: u32,
    len: u32,
}

impl ExprRange {
    pub const EMPTY: ExprRange = ExprRange { start: 0, len: 0 };

    pub fn len(self) -> usize {
        self.len as usize
    }

    pub fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// A contiguous run of statement ids in the statement-list pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StmtRange {
    start: u32,
    len: u32,
}

impl StmtRange {
    pub const EMPTY: StmtRange = StmtRange { start: 0, len: 0 };

    pub fn len(self) -> usize {
        self.len as usize
    }

    pub fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// A contiguous run of key/value pairs in the map-entry pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MapRange {
    start: u32,
    len: u32,
}

impl MapRange {
    pub const EMPTY: MapRange = MapRange { start: 0, len: 0 };

    pub fn len(self) -> usize {
        self.len as usize
    }

    pub fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// A contiguous run of parameter names in the parameter pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParamRange {
    start: u32,
    len: u32,
}

impl ParamRange {
    pub const EMPTY: ParamRange = ParamRange { start: 0, len: 0 };

    pub fn len(self) -> usize {
        self.len as usize
    }

    pub fn is_empty(self) -> bool {
        self.len == 0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `!x`
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    /// `/_` truncating division.
    FloorDiv,
    /// `%` remainder.
    Rem,
    /// `%%` percent-of: `a %% b` is `a / 100 * b`.
    PercentOf,
    /// `**` exponentiation, right-associative.
    Pow,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    /// Short-circuit conjunction. Never dispatched as an arithmetic op.
    And,
    /// Short-circuit disjunction. Never dispatched as an arithmetic op.
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "/_",
            BinaryOp::Rem => "%",
            BinaryOp::PercentOf => "%%",
            BinaryOp::Pow => "**",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ExprKind {
    Number(f64),
    Str(Name),
    Bool(bool),
    Null,
    Ident(Name),
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    /// `name = value`
    Assign {
        target: Name,
        value: ExprId,
    },
    /// `object[index] = value`
    AssignIndex {
        object: ExprId,
        index: ExprId,
        value: ExprId,
    },
    Call {
        callee: ExprId,
        args: ExprRange,
    },
    Index {
        object: ExprId,
        index: ExprId,
    },
    Array(ExprRange),
    Map(MapRange),
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StmtKind {
    Expr(ExprId),
    /// `var name;` or `var name = init;`
    Var {
        name: Name,
        init: Option<ExprId>,
    },
    Func(FuncId),
    If {
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    While {
        cond: ExprId,
        body: StmtId,
    },
    Block(StmtRange),
    Return(Option<ExprId>),
    Break,
    Continue,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

/// A `func` declaration. The body is always a `Block` statement.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FuncDecl {
    pub name: Name,
    pub params: ParamRange,
    pub body: StmtId,
    pub span: Span,
}

/// The arena all nodes live in.
#[derive(Debug, Default)]
pub struct Ast {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    funcs: Vec<FuncDecl>,
    expr_lists: Vec<ExprId>,
    stmt_lists: Vec<StmtId>,
    map_entries: Vec<(ExprId, ExprId)>,
    params: Vec<Name>,
}

impl Ast {
    pub fn new() -> Self {
        Ast::default()
    }

    pub fn alloc_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let id = ExprId(self.exprs.len() as u32);
        self.exprs.push(Expr { kind, span });
        id
    }

    pub fn alloc_stmt(&mut self, kind: StmtKind, span: Span) -> StmtId {
        let id = StmtId(self.stmts.len() as u32);
        self.stmts.push(Stmt { kind, span });
        id
    }

    pub fn alloc_func(&mut self, func: FuncDecl) -> FuncId {
        let id = FuncId(self.funcs.len() as u32);
        self.funcs.push(func);
        id
    }

    pub fn alloc_expr_list(&mut self, ids: Vec<ExprId>) -> ExprRange {
        let start = self.expr_lists.len() as u32;
        let len = ids.len() as u32;
        self.expr_lists.extend(ids);
        ExprRange { start, len }
    }

    pub fn alloc_stmt_list(&mut self, ids: Vec<StmtId>) -> StmtRange {
        let start = self.stmt_lists.len() as u32;
        let len = ids.len() as u32;
        self.stmt_lists.extend(ids);
        StmtRange { start, len }
    }

    pub fn alloc_map_entries(&mut self, entries: Vec<(ExprId, ExprId)>) -> MapRange {
        let start = self.map_entries.len() as u32;
        let len = entries.len() as u32;
        self.map_entries.extend(entries);
        MapRange { start, len }
    }

    pub fn alloc_params(&mut self, names: Vec<Name>) -> ParamRange {
        let start = self.params.len() as u32;
        let len = names.len() as u32;
        self.params.extend(names);
        ParamRange { start, len }
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    pub fn func(&self, id: FuncId) -> &FuncDecl {
        &self.funcs[id.index()]
    }

    pub fn exprs_in(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }

    pub fn stmts_in(&self, range: StmtRange) -> &[StmtId] {
        let start = range.start as usize;
        &self.stmt_lists[start..start + range.len()]
    }

    pub fn map_entries_in(&self, range: MapRange) -> &[(ExprId, ExprId)] {
        let start = range.start as usize;
        &self.map_entries[start..start + range.len()]
    }

    pub fn params_in(&self, range: ParamRange) -> &[Name] {
        let start = range.start as usize;
        &self.params[start..start + range.len()]
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }
}

/// A parsed script: the arena plus the top-level statement list.
#[derive(Debug)]
pub struct Program {
    pub ast: Ast,
    pub root: StmtRange,
}
