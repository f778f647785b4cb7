//! Declaration and statement grammar.
//!
//! The parser is a straight recursive descent over the token stream. Each
//! failed declaration records its error and synchronizes to the next likely
//! statement boundary, so one parse reports every error it can find.

mod expr;

use tracing::trace;
use zscript_diagnostic::ErrorCode;
use zscript_ir::{Ast, FuncDecl, StmtId, StmtKind, StmtRange, Token, TokenKind};

use crate::{Cursor, ParseError};

/// Functions accept at most this many parameters, and calls this many
/// arguments.
pub const MAX_ARITY: usize = 255;

pub struct Parser<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) ast: Ast,
    pub(crate) errors: Vec<ParseError>,
    /// Enclosing loops in the current function; `break` needs one.
    loop_depth: usize,
    /// Enclosing function declarations; `return` needs one.
    func_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            ast: Ast::new(),
            errors: Vec::new(),
            loop_depth: 0,
            func_depth: 0,
        }
    }

    /// Parse the whole token stream as a statement list.
    pub fn parse_program(&mut self) -> StmtRange {
        let mut stmts = Vec::new();
        while !self.cursor.at_eof() {
            if let Some(stmt) = self.declaration_with_recovery(false) {
                stmts.push(stmt);
            }
        }
        trace!(statements = stmts.len(), errors = self.errors.len(), "parsed program");
        self.ast.alloc_stmt_list(stmts)
    }

    /// Parse one declaration; on error, record it and skip to a statement
    /// boundary. `in_block` stops synchronization at a closing brace so the
    /// enclosing block can finish.
    fn declaration_with_recovery(&mut self, in_block: bool) -> Option<StmtId> {
        match self.parse_declaration() {
            Ok(stmt) => Some(stmt),
            Err(err) => {
                self.errors.push(err);
                self.synchronize(in_block);
                None
            }
        }
    }

    /// Skip tokens until a likely statement boundary: just past a `;`, or
    /// just before a token that starts a statement. Always consumes at
    /// least one token so recovery cannot loop.
    fn synchronize(&mut self, in_block: bool) {
        let start = self.cursor.position();
        while !self.cursor.at_eof() {
            let moved = self.cursor.position() > start;
            if moved && self.cursor.previous().kind == TokenKind::Semicolon {
                return;
            }
            let current = self.cursor.current().kind;
            if moved && current.starts_statement() {
                return;
            }
            if in_block && current == TokenKind::RightBrace && moved {
                return;
            }
            self.cursor.advance();
        }
    }

    fn parse_declaration(&mut self) -> Result<StmtId, ParseError> {
        match self.cursor.current().kind {
            TokenKind::Var => self.parse_var_decl(),
            TokenKind::Func => self.parse_func_decl(),
            _ => self.parse_statement(),
        }
    }

    /// `var name;` or `var name = init;`
    fn parse_var_decl(&mut self) -> Result<StmtId, ParseError> {
        let kw = self.cursor.advance();
        let (name, _) = self.cursor.expect_ident("variable name")?;
        let init = if self.cursor.eat(TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let semi = self.cursor.expect(TokenKind::Semicolon, "';'")?;
        Ok(self
            .ast
            .alloc_stmt(StmtKind::Var { name, init }, kw.span.merge(semi.span)))
    }

    /// `func name(params) { body }`
    fn parse_func_decl(&mut self) -> Result<StmtId, ParseError> {
        let kw = self.cursor.advance();
        let (name, _) = self.cursor.expect_ident("function name")?;
        self.cursor.expect(TokenKind::LeftParen, "'('")?;

        let mut params = Vec::new();
        if !self.cursor.check(TokenKind::RightParen) {
            loop {
                let (param, param_span) = self.cursor.expect_ident("parameter name")?;
                if params.len() >= MAX_ARITY {
                    return Err(ParseError::new(
                        ErrorCode::E1006,
                        format!("functions take at most {MAX_ARITY} parameters"),
                        param_span,
                    ));
                }
                params.push(param);
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
                if self.cursor.check(TokenKind::RightParen) {
                    break;
                }
            }
        }
        self.cursor.expect(TokenKind::RightParen, "')'")?;

        // A function body starts fresh: a `break` inside it cannot target a
        // loop outside it.
        let saved_loops = self.loop_depth;
        self.loop_depth = 0;
        self.func_depth += 1;
        let body = self.parse_block();
        self.func_depth -= 1;
        self.loop_depth = saved_loops;
        let body = body?;
        let span = kw.span.merge(self.ast.stmt(body).span);
        let params = self.ast.alloc_params(params);
        let func = self.ast.alloc_func(FuncDecl {
            name,
            params,
            body,
            span,
        });
        Ok(self.ast.alloc_stmt(StmtKind::Func(func), span))
    }

    fn parse_statement(&mut self) -> Result<StmtId, ParseError> {
        match self.cursor.current().kind {
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => self.parse_loop_exit(StmtKind::Break, "break"),
            TokenKind::Continue => self.parse_loop_exit(StmtKind::Continue, "continue"),
            TokenKind::LeftBrace => self.parse_block(),
            _ => self.parse_expr_stmt(),
        }
    }

    /// `if (cond) stmt` with optional `else stmt`.
    fn parse_if(&mut self) -> Result<StmtId, ParseError> {
        let kw = self.cursor.advance();
        self.cursor.expect(TokenKind::LeftParen, "'(' after 'if'")?;
        let cond = self.parse_expr()?;
        self.close(TokenKind::RightParen, "'('", "')'")?;
        let then_branch = self.parse_statement()?;
        let mut span = kw.span.merge(self.ast.stmt(then_branch).span);
        let else_branch = if self.cursor.eat(TokenKind::Else) {
            let stmt = self.parse_statement()?;
            span = span.merge(self.ast.stmt(stmt).span);
            Some(stmt)
        } else {
            None
        };
        Ok(self.ast.alloc_stmt(
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            },
            span,
        ))
    }

    /// `while (cond) stmt`
    fn parse_while(&mut self) -> Result<StmtId, ParseError> {
        let kw = self.cursor.advance();
        self.cursor
            .expect(TokenKind::LeftParen, "'(' after 'while'")?;
        let cond = self.parse_expr()?;
        self.close(TokenKind::RightParen, "'('", "')'")?;
        self.loop_depth += 1;
        let body = self.parse_statement();
        self.loop_depth -= 1;
        let body = body?;
        let span = kw.span.merge(self.ast.stmt(body).span);
        Ok(self.ast.alloc_stmt(StmtKind::While { cond, body }, span))
    }

    /// `return;` or `return expr;`
    fn parse_return(&mut self) -> Result<StmtId, ParseError> {
        let kw = self.cursor.advance();
        if self.func_depth == 0 {
            return Err(ParseError::new(
                ErrorCode::E1001,
                "cannot return from top-level code",
                kw.span,
            ));
        }
        let value = if self.cursor.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let semi = self.cursor.expect(TokenKind::Semicolon, "';'")?;
        Ok(self
            .ast
            .alloc_stmt(StmtKind::Return(value), kw.span.merge(semi.span)))
    }

    /// `break;` and `continue;` share a shape.
    fn parse_loop_exit(&mut self, kind: StmtKind, word: &str) -> Result<StmtId, ParseError> {
        let kw = self.cursor.advance();
        if self.loop_depth == 0 {
            return Err(ParseError::new(
                ErrorCode::E1001,
                format!("'{word}' outside of a loop"),
                kw.span,
            ));
        }
        let semi = self.cursor.expect(TokenKind::Semicolon, "';'")?;
        Ok(self.ast.alloc_stmt(kind, kw.span.merge(semi.span)))
    }

    /// `{ declaration* }`
    pub(crate) fn parse_block(&mut self) -> Result<StmtId, ParseError> {
        let open = self.cursor.expect(TokenKind::LeftBrace, "'{'")?;
        let mut stmts = Vec::new();
        while !self.cursor.check(TokenKind::RightBrace) && !self.cursor.at_eof() {
            if let Some(stmt) = self.declaration_with_recovery(true) {
                stmts.push(stmt);
            }
        }
        if !self.cursor.check(TokenKind::RightBrace) {
            return Err(ParseError::unclosed_delimiter(
                "'{'",
                "'}'",
                self.cursor.current().span,
            ));
        }
        let close = self.cursor.advance();
        let range = self.ast.alloc_stmt_list(stmts);
        Ok(self
            .ast
            .alloc_stmt(StmtKind::Block(range), open.span.merge(close.span)))
    }

    fn parse_expr_stmt(&mut self) -> Result<StmtId, ParseError> {
        let expr = self.parse_expr()?;
        let span = self.ast.expr(expr).span;
        let semi = self.cursor.expect(TokenKind::Semicolon, "';'")?;
        Ok(self
            .ast
            .alloc_stmt(StmtKind::Expr(expr), span.merge(semi.span)))
    }

    /// Consume a closing delimiter or report it as unclosed.
    pub(crate) fn close(
        &mut self,
        kind: TokenKind,
        open: &str,
        close: &str,
    ) -> Result<Token, ParseError> {
        if self.cursor.check(kind) {
            return Ok(self.cursor.advance());
        }
        let current = self.cursor.current();
        if let TokenKind::Error(lex_error) = current.kind {
            self.cursor.advance();
            return Err(ParseError::from_lex_error(lex_error, current.span));
        }
        Err(ParseError::unclosed_delimiter(open, close, current.span))
    }
}
