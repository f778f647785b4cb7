//! Expression parsing: one method per precedence level.
//!
//! Lowest to highest: assignment, `or`, `and`, equality, comparison,
//! additive, multiplicative, power (right-associative), unary, postfix
//! (call and index), primary.

use zscript_diagnostic::ErrorCode;
use zscript_ir::{BinaryOp, ExprId, ExprKind, TokenKind, UnaryOp};

use super::{Parser, MAX_ARITY};
use crate::ParseError;

impl Parser<'_> {
    /// Parse an expression. Assignment is handled here: when a `=` follows,
    /// the already-parsed left side must be a name or an index expression.
    pub(crate) fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        let left = self.parse_or()?;

        if self.cursor.check(TokenKind::Eq) {
            let left_span = self.ast.expr(left).span;
            self.cursor.advance();
            let value = self.parse_expr()?;
            let span = left_span.merge(self.ast.expr(value).span);
            return match self.ast.expr(left).kind {
                ExprKind::Ident(target) => {
                    Ok(self.ast.alloc_expr(ExprKind::Assign { target, value }, span))
                }
                ExprKind::Index { object, index } => Ok(self.ast.alloc_expr(
                    ExprKind::AssignIndex {
                        object,
                        index,
                        value,
                    },
                    span,
                )),
                _ => Err(ParseError::invalid_assignment_target(left_span)),
            };
        }

        Ok(left)
    }

    fn parse_or(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_and()?;
        while self.cursor.eat(TokenKind::Or) {
            let rhs = self.parse_and()?;
            left = self.binary(BinaryOp::Or, left, rhs);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_equality()?;
        while self.cursor.eat(TokenKind::And) {
            let rhs = self.parse_equality()?;
            left = self.binary(BinaryOp::And, left, rhs);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.cursor.current().kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::BangEq => BinaryOp::NotEq,
                _ => break,
            };
            self.cursor.advance();
            let rhs = self.parse_comparison()?;
            left = self.binary(op, left, rhs);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.cursor.current().kind {
                TokenKind::Less => BinaryOp::Lt,
                TokenKind::LessEq => BinaryOp::LtEq,
                TokenKind::Greater => BinaryOp::Gt,
                TokenKind::GreaterEq => BinaryOp::GtEq,
                _ => break,
            };
            self.cursor.advance();
            let rhs = self.parse_additive()?;
            left = self.binary(op, left, rhs);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.cursor.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.cursor.advance();
            let rhs = self.parse_multiplicative()?;
            left = self.binary(op, left, rhs);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_power()?;
        loop {
            let op = match self.cursor.current().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::SlashUnderscore => BinaryOp::FloorDiv,
                TokenKind::Percent => BinaryOp::Rem,
                TokenKind::PercentPercent => BinaryOp::PercentOf,
                _ => break,
            };
            self.cursor.advance();
            let rhs = self.parse_power()?;
            left = self.binary(op, left, rhs);
        }
        Ok(left)
    }

    /// `**` binds tighter than `*` and associates to the right, so
    /// `2 ** 3 ** 2` is `2 ** (3 ** 2)`.
    fn parse_power(&mut self) -> Result<ExprId, ParseError> {
        let left = self.parse_unary()?;
        if self.cursor.eat(TokenKind::StarStar) {
            let rhs = self.parse_power()?;
            return Ok(self.binary(BinaryOp::Pow, left, rhs));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        let op = match self.cursor.current().kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.parse_postfix(),
        };
        let token = self.cursor.advance();
        let operand = self.parse_unary()?;
        let span = token.span.merge(self.ast.expr(operand).span);
        Ok(self.ast.alloc_expr(ExprKind::Unary { op, operand }, span))
    }

    /// Calls and index expressions chain left to right: `f(1)[0](2)`.
    fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.cursor.current().kind {
                TokenKind::LeftParen => {
                    self.cursor.advance();
                    let mut args = Vec::new();
                    if !self.cursor.check(TokenKind::RightParen) {
                        loop {
                            let arg = self.parse_expr()?;
                            if args.len() >= MAX_ARITY {
                                return Err(ParseError::new(
                                    ErrorCode::E1006,
                                    format!("calls take at most {MAX_ARITY} arguments"),
                                    self.ast.expr(arg).span,
                                ));
                            }
                            args.push(arg);
                            if !self.cursor.eat(TokenKind::Comma) {
                                break;
                            }
                            if self.cursor.check(TokenKind::RightParen) {
                                break;
                            }
                        }
                    }
                    let close = self.close(TokenKind::RightParen, "'('", "')'")?;
                    let span = self.ast.expr(expr).span.merge(close.span);
                    let args = self.ast.alloc_expr_list(args);
                    expr = self
                        .ast
                        .alloc_expr(ExprKind::Call { callee: expr, args }, span);
                }
                TokenKind::LeftBracket => {
                    self.cursor.advance();
                    let index = self.parse_expr()?;
                    let close = self.close(TokenKind::RightBracket, "'['", "']'")?;
                    let span = self.ast.expr(expr).span.merge(close.span);
                    expr = self
                        .ast
                        .alloc_expr(ExprKind::Index { object: expr, index }, span);
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let token = self.cursor.current();
        match token.kind {
            TokenKind::Number(value) => {
                self.cursor.advance();
                Ok(self.ast.alloc_expr(ExprKind::Number(value), token.span))
            }
            TokenKind::Str(name) => {
                self.cursor.advance();
                Ok(self.ast.alloc_expr(ExprKind::Str(name), token.span))
            }
            TokenKind::True => {
                self.cursor.advance();
                Ok(self.ast.alloc_expr(ExprKind::Bool(true), token.span))
            }
            TokenKind::False => {
                self.cursor.advance();
                Ok(self.ast.alloc_expr(ExprKind::Bool(false), token.span))
            }
            TokenKind::Null => {
                self.cursor.advance();
                Ok(self.ast.alloc_expr(ExprKind::Null, token.span))
            }
            TokenKind::Ident(name) => {
                self.cursor.advance();
                Ok(self.ast.alloc_expr(ExprKind::Ident(name), token.span))
            }
            TokenKind::LeftParen => {
                self.cursor.advance();
                let inner = self.parse_expr()?;
                self.close(TokenKind::RightParen, "'('", "')'")?;
                Ok(inner)
            }
            TokenKind::LeftBracket => self.parse_array_literal(),
            TokenKind::HashBrace => self.parse_map_literal(),
            TokenKind::Error(kind) => {
                self.cursor.advance();
                Err(ParseError::from_lex_error(kind, token.span))
            }
            kind => Err(ParseError::expected_expression(kind, token.span)),
        }
    }

    /// `[a, b, c]` with an optional trailing comma.
    fn parse_array_literal(&mut self) -> Result<ExprId, ParseError> {
        let open = self.cursor.advance();
        let mut items = Vec::new();
        if !self.cursor.check(TokenKind::RightBracket) {
            loop {
                items.push(self.parse_expr()?);
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
                if self.cursor.check(TokenKind::RightBracket) {
                    break;
                }
            }
        }
        let close = self.close(TokenKind::RightBracket, "'['", "']'")?;
        let items = self.ast.alloc_expr_list(items);
        Ok(self
            .ast
            .alloc_expr(ExprKind::Array(items), open.span.merge(close.span)))
    }

    /// `#{key: value, ...}` with an optional trailing comma. Keys are
    /// expressions; the evaluator requires them to produce strings.
    fn parse_map_literal(&mut self) -> Result<ExprId, ParseError> {
        let open = self.cursor.advance();
        let mut entries = Vec::new();
        if !self.cursor.check(TokenKind::RightBrace) {
            loop {
                let key = self.parse_expr()?;
                self.cursor.expect(TokenKind::Colon, "':'")?;
                let value = self.parse_expr()?;
                entries.push((key, value));
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
                if self.cursor.check(TokenKind::RightBrace) {
                    break;
                }
            }
        }
        let close = self.close(TokenKind::RightBrace, "'#{'", "'}'")?;
        let entries = self.ast.alloc_map_entries(entries);
        Ok(self
            .ast
            .alloc_expr(ExprKind::Map(entries), open.span.merge(close.span)))
    }

    fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        let span = self.ast.expr(lhs).span.merge(self.ast.expr(rhs).span);
        self.ast.alloc_expr(ExprKind::Binary { op, lhs, rhs }, span)
    }
}
