//! loxi-par - Parser (Syntactic Analyzer)
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! The parser turns the lexer's token stream into an abstract syntax tree
//! of statements and expressions. It is a classic recursive-descent parser:
//! single-token lookahead, no backtracking, one method per grammar rule.
//!
//! GRAMMAR (lowest to highest precedence):
//! ---------------------------------------
//!
//! ```text
//! program     -> declaration* EOF
//! declaration -> "var" IDENT ("=" expression)? ";"
//!              | "fun" IDENT "(" params? ")" block
//!              | "class" IDENT "{" "}"
//!              | statement
//! statement   -> exprStmt | printStmt | block
//!              | ifStmt | whileStmt | forStmt | returnStmt
//! expression  -> assignment
//! assignment  -> IDENT "=" assignment | logic_or
//! logic_or    -> logic_and ( "or" logic_and )*
//! logic_and   -> equality  ( "and" equality )*
//! equality    -> comparison (( "!=" | "==" ) comparison)*
//! comparison  -> term       (( ">"|">="|"<"|"<=" ) term)*
//! term        -> factor     (( "-"|"+" ) factor)*
//! factor      -> unary      (( "/"|"*" ) unary)*
//! unary       -> ("!"|"-") unary | call
//! call        -> primary ( "(" arguments? ")" )*
//! primary     -> NUMBER | STRING | "true" | "false" | "nil"
//!              | "(" expression ")" | IDENT
//! ```
//!
//! Each binary level is left-associative, implemented as a left-folding
//! loop (the standard left-recursion elimination). `assignment` and
//! `unary` recurse on themselves and are right-associative.
//!
//! DESUGARING:
//! -----------
//!
//! `for` loops do not survive parsing. `for (init; cond; incr) body`
//! rewrites to:
//!
//! ```text
//! { init; while (cond) { body; incr; } }
//! ```
//!
//! with absent clauses treated as absent / literal-true / absent.
//!
//! ERROR RECOVERY (PANIC MODE):
//! ----------------------------
//!
//! On a syntax error the active rule reports a diagnostic and unwinds with
//! the [`ParseError`] sentinel to the nearest `declaration` boundary, which
//! discards tokens until the previous token is `;` or the next token begins
//! a statement (`class fun var for if while print return`). The failed
//! declaration contributes no statement; parsing then continues, so a
//! single error does not hide the rest of the file.
//!
//! Two diagnostics are deliberately *not* fatal to the active rule: an
//! invalid assignment target and the 255-argument/parameter cap. Both
//! report and let the parse proceed.

mod ast;
mod expr;
mod stmt;

pub use ast::{Expr, ExprId, FunctionDecl, LitValue, Stmt};

use loxi_lex::{Token, TokenKind};
use loxi_util::{Diagnostic, ErrorLocation, Handler};

/// Sentinel unwound to the nearest `declaration` boundary on a syntax
/// error. Carries no payload: the diagnostic is already in the handler by
/// the time this is thrown.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ParseError;

pub(crate) type ParseResult<T> = Result<T, ParseError>;

/// Recursive-descent parser over a token buffer.
pub struct Parser<'a> {
    /// The full token stream, terminated by `Eof`.
    tokens: Vec<Token>,

    /// Index of the current (not yet consumed) token.
    pos: usize,

    /// Error handler shared with the other static phases.
    handler: &'a Handler,
}

impl<'a> Parser<'a> {
    /// Creates a parser over a token stream.
    ///
    /// The stream must be terminated by an `Eof` token, which is what
    /// [`loxi_lex::Lexer::scan_tokens`] always produces.
    pub fn new(tokens: Vec<Token>, handler: &'a Handler) -> Self {
        debug_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        Self {
            tokens,
            pos: 0,
            handler,
        }
    }

    /// Parses the whole program.
    ///
    /// Never fails: syntax errors are reported to the handler, the failed
    /// declaration is skipped, and parsing resumes at the next statement
    /// boundary. Callers must check `handler.has_errors()` before treating
    /// the result as a runnable program.
    pub fn parse(mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }
        statements
    }

    // =========================================================================
    // TOKEN STREAM HELPERS
    // =========================================================================

    /// The current (unconsumed) token.
    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// The most recently consumed token.
    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.pos - 1]
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Consumes and returns the current token. At `Eof` the position does
    /// not move, so the stream cannot be overrun.
    pub(crate) fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous().clone()
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Consumes the current token if it has the given kind.
    pub(crate) fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it has any of the given kinds.
    pub(crate) fn match_any(&mut self, kinds: &[TokenKind]) -> bool {
        for &kind in kinds {
            if self.check(kind) {
                self.advance();
                return true;
            }
        }
        false
    }

    /// Consumes a token of the expected kind or reports `message` and
    /// unwinds.
    pub(crate) fn consume(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        Err(self.error(self.peek(), message))
    }

    // =========================================================================
    // ERROR REPORTING AND RECOVERY
    // =========================================================================

    /// Reports an error at the given token without unwinding.
    pub(crate) fn report(&self, token: &Token, message: &str) {
        let location = if token.kind == TokenKind::Eof {
            ErrorLocation::AtEnd
        } else {
            ErrorLocation::AtToken(token.lexeme.clone())
        };
        self.handler
            .report(Diagnostic::new(token.line(), location, message));
    }

    /// Reports an error at the given token and returns the unwind sentinel
    /// for the caller to throw.
    pub(crate) fn error(&self, token: &Token, message: &str) -> ParseError {
        self.report(token, message);
        ParseError
    }

    /// Discards tokens until a likely statement boundary.
    ///
    /// Called after a [`ParseError`] unwinds to the `declaration` driver:
    /// skipping to a boundary keeps one syntax error from producing a
    /// cascade of follow-on errors.
    pub(crate) fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }

            match self.peek().kind {
                TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}
