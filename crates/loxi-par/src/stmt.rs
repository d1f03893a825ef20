//! Declaration and statement parsing, including the for-loop desugaring.

use std::rc::Rc;

use loxi_lex::TokenKind;

use crate::ast::{Expr, FunctionDecl, LitValue, Stmt};
use crate::{ParseResult, Parser};

impl Parser<'_> {
    /// `declaration -> varDecl | funDecl | classDecl | statement`
    ///
    /// This is the panic-mode recovery boundary: a syntax error anywhere
    /// below lands here, synchronizes, and yields `None` so the program
    /// keeps its well-formed statements.
    pub(crate) fn declaration(&mut self) -> Option<Stmt> {
        let result = if self.match_kind(TokenKind::Var) {
            self.var_declaration()
        } else if self.match_kind(TokenKind::Fun) {
            self.function_declaration()
        } else if self.match_kind(TokenKind::Class) {
            self.class_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(_) => {
                self.synchronize();
                None
            }
        }
    }

    /// `varDecl -> "var" IDENT ( "=" expression )? ";"`
    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expect variable name.")?;

        let initializer = if self.match_kind(TokenKind::Equal) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(
            TokenKind::Semicolon,
            "Expect ';' after variable declaration.",
        )?;
        Ok(Stmt::Var { name, initializer })
    }

    /// `funDecl -> "fun" IDENT "(" params? ")" block`
    fn function_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expect function name.")?;
        self.consume(TokenKind::LeftParen, "Expect '(' after function name.")?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if params.len() >= 255 {
                    self.report(self.peek(), "Can't have more than 255 parameters.");
                }
                params.push(self.consume(TokenKind::Identifier, "Expect parameter name.")?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expect ')' after parameters.")?;

        self.consume(TokenKind::LeftBrace, "Expect '{' before function body.")?;
        let body = self.block_statements()?;

        Ok(Stmt::Function(Rc::new(FunctionDecl { name, params, body })))
    }

    /// `classDecl -> "class" IDENT "{" "}"`
    fn class_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expect class name.")?;
        self.consume(TokenKind::LeftBrace, "Expect '{' before class body.")?;
        self.consume(TokenKind::RightBrace, "Expect '}' after class body.")?;
        Ok(Stmt::Class { name })
    }

    /// `statement -> printStmt | block | ifStmt | whileStmt | forStmt
    ///             | returnStmt | exprStmt`
    fn statement(&mut self) -> ParseResult<Stmt> {
        if self.match_kind(TokenKind::Print) {
            return self.print_statement();
        }
        if self.match_kind(TokenKind::LeftBrace) {
            return Ok(Stmt::Block(self.block_statements()?));
        }
        if self.match_kind(TokenKind::If) {
            return self.if_statement();
        }
        if self.match_kind(TokenKind::While) {
            return self.while_statement();
        }
        if self.match_kind(TokenKind::For) {
            return self.for_statement();
        }
        if self.match_kind(TokenKind::Return) {
            return self.return_statement();
        }

        self.expression_statement()
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let value = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print(value))
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(expr))
    }

    /// Parses declarations until `}`; the opening brace is consumed.
    ///
    /// Shared between block statements and function bodies. Recovery
    /// applies per declaration, so one bad statement does not lose the
    /// rest of the block.
    fn block_statements(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(TokenKind::RightBrace, "Expect '}' after block.")?;
        Ok(statements)
    }

    /// `ifStmt -> "if" "(" expression ")" statement ( "else" statement )?`
    ///
    /// A dangling `else` binds to the nearest `if`, which falls naturally
    /// out of consuming `else` eagerly here.
    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.match_kind(TokenKind::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    /// `whileStmt -> "while" "(" expression ")" statement`
    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after condition.")?;
        let body = Box::new(self.statement()?);

        Ok(Stmt::While { condition, body })
    }

    /// `forStmt -> "for" "(" (varDecl | exprStmt | ";") expression? ";"
    ///             expression? ")" statement`
    ///
    /// The for loop is pure syntax: it is rewritten here into the
    /// equivalent while loop,
    ///
    /// ```text
    /// { init; while (cond) { body; incr; } }
    /// ```
    ///
    /// so no later phase knows `for` exists. An omitted condition becomes
    /// literal `true`; the enclosing block only appears when there is an
    /// initializer.
    fn for_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if self.match_kind(TokenKind::Semicolon) {
            None
        } else if self.match_kind(TokenKind::Var) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if !self.check(TokenKind::Semicolon) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if !self.check(TokenKind::RightParen) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenKind::RightParen, "Expect ')' after for clauses.")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
        }

        let condition = condition.unwrap_or(Expr::Literal(LitValue::Bool(true)));
        body = Stmt::While {
            condition,
            body: Box::new(body),
        };

        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    /// `returnStmt -> "return" expression? ";"`
    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();
        let value = if !self.check(TokenKind::Semicolon) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenKind::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return { keyword, value })
    }
}
