//! Expression parsing.
//!
//! One method per precedence level, lowest first. Each binary level parses
//! its higher-precedence operand and then left-folds while its own
//! operators keep appearing, which makes every binary level
//! left-associative. `assignment` and `unary` recurse on themselves
//! instead, making them right-associative.

use loxi_lex::{Literal, TokenKind};

use crate::ast::{Expr, ExprId, LitValue};
use crate::{ParseResult, Parser};

impl Parser<'_> {
    /// Entry point: `expression -> assignment`.
    pub(crate) fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    /// `assignment -> IDENT "=" assignment | logic_or`
    ///
    /// The target is parsed as a full expression first; only afterwards is
    /// it checked to be a plain variable. An invalid target (`a + b = c`)
    /// reports without unwinding: the right-hand side has already been
    /// consumed, so the parse can continue cleanly with the target
    /// expression as the result.
    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.logic_or()?;

        if self.match_kind(TokenKind::Equal) {
            let equals = self.previous().clone();
            let value = self.assignment()?;

            return match expr {
                Expr::Variable { name, .. } => Ok(Expr::Assign {
                    id: ExprId::fresh(),
                    name,
                    value: Box::new(value),
                }),
                other => {
                    self.report(&equals, "Invalid assignment target.");
                    Ok(other)
                }
            };
        }

        Ok(expr)
    }

    /// `logic_or -> logic_and ( "or" logic_and )*`
    fn logic_or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.logic_and()?;

        while self.match_kind(TokenKind::Or) {
            let op = self.previous().clone();
            let right = self.logic_and()?;
            expr = Expr::Logical {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    /// `logic_and -> equality ( "and" equality )*`
    fn logic_and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;

        while self.match_kind(TokenKind::And) {
            let op = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::Logical {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    /// `equality -> comparison (( "!=" | "==" ) comparison)*`
    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;

        while self.match_any(&[TokenKind::BangEqual, TokenKind::EqualEqual]) {
            let op = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    /// `comparison -> term (( ">" | ">=" | "<" | "<=" ) term)*`
    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;

        while self.match_any(&[
            TokenKind::Greater,
            TokenKind::GreaterEqual,
            TokenKind::Less,
            TokenKind::LessEqual,
        ]) {
            let op = self.previous().clone();
            let right = self.term()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    /// `term -> factor (( "-" | "+" ) factor)*`
    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;

        while self.match_any(&[TokenKind::Minus, TokenKind::Plus]) {
            let op = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    /// `factor -> unary (( "/" | "*" ) unary)*`
    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;

        while self.match_any(&[TokenKind::Slash, TokenKind::Star]) {
            let op = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    /// `unary -> ( "!" | "-" ) unary | call`
    fn unary(&mut self) -> ParseResult<Expr> {
        if self.match_any(&[TokenKind::Bang, TokenKind::Minus]) {
            let op = self.previous().clone();
            let right = self.unary()?;
            return Ok(Expr::Unary {
                op,
                right: Box::new(right),
            });
        }

        self.call()
    }

    /// `call -> primary ( "(" arguments? ")" )*`
    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        while self.match_kind(TokenKind::LeftParen) {
            expr = self.finish_call(expr)?;
        }

        Ok(expr)
    }

    /// Parses the argument list and closing paren of a call whose callee
    /// and `(` are already consumed.
    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = Vec::new();

        if !self.check(TokenKind::RightParen) {
            loop {
                if arguments.len() >= 255 {
                    // Diagnostic only; the argument still parses.
                    self.report(self.peek(), "Can't have more than 255 arguments.");
                }
                arguments.push(self.expression()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }

        let paren = self.consume(TokenKind::RightParen, "Expect ')' after arguments.")?;

        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            arguments,
        })
    }

    /// `primary -> NUMBER | STRING | "true" | "false" | "nil"
    ///           | "(" expression ")" | IDENT`
    fn primary(&mut self) -> ParseResult<Expr> {
        if self.match_kind(TokenKind::False) {
            return Ok(Expr::Literal(LitValue::Bool(false)));
        }
        if self.match_kind(TokenKind::True) {
            return Ok(Expr::Literal(LitValue::Bool(true)));
        }
        if self.match_kind(TokenKind::Nil) {
            return Ok(Expr::Literal(LitValue::Nil));
        }

        if self.match_any(&[TokenKind::Number, TokenKind::String]) {
            let value = match &self.previous().literal {
                Literal::Number(n) => LitValue::Number(*n),
                Literal::Str(s) => LitValue::Str(s.clone()),
                // The lexer always attaches a literal to these kinds.
                Literal::None => LitValue::Nil,
            };
            return Ok(Expr::Literal(value));
        }

        if self.match_kind(TokenKind::Identifier) {
            let name = self.previous().clone();
            return Ok(Expr::Variable {
                id: ExprId::fresh(),
                name,
            });
        }

        if self.match_kind(TokenKind::LeftParen) {
            let inner = self.expression()?;
            self.consume(TokenKind::RightParen, "Expect ')' after expression.")?;
            return Ok(Expr::Grouping(Box::new(inner)));
        }

        Err(self.error(self.peek(), "Expect expression."))
    }
}
