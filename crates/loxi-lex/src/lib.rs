//! loxi-lex - Lexical Analyzer (Lexer/Tokenizer)
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! Lexical analysis is the first phase of the pipeline. It transforms a
//! stream of characters into a stream of tokens:
//!
//! ```text
//! Source: "var x = 42;"
//!
//! Lexemes:  "var", "x", "=", "42", ";"
//! Tokens:   [Var] [Identifier("x")] [Equal] [Number(42.0)] [Semicolon] [Eof]
//!           (whitespace skipped)
//! ```
//!
//! The lexer is direct-coded: a dispatch on the current character selects a
//! scanning method per token class, rather than a table-driven state
//! machine. That keeps the character-level decisions (is `/` an operator or
//! the start of a comment? is `.` part of a number?) readable and easy to
//! extend.
//!
//! LEXICAL GRAMMAR
//! ---------------
//!
//! - Single-character punctuation: `( ) { } , . - + ; / *`
//! - One- or two-character operators: `! !=  = ==  < <=  > >=`
//! - `//` introduces a line comment, discarded to end of line
//! - Whitespace (space, tab, carriage return) is skipped; line feeds
//!   advance the line counter
//! - Strings: `"` ... `"`, may span lines, no escape sequences
//! - Numbers: `digits ('.' digits)?` - a leading or trailing `.` is not
//!   part of the number
//! - Identifiers: `[A-Za-z_][A-Za-z0-9_]*`, checked against the
//!   reserved-word table after scanning
//!
//! ERROR HANDLING
//! --------------
//!
//! The lexer never aborts. An unexpected character or unterminated string
//! is reported to the shared [`Handler`](loxi_util::Handler) with the
//! current line, and scanning resumes at the next character, so a complete
//! token stream (terminated by [`TokenKind::Eof`]) is always produced.

mod cursor;
mod edge_cases;
mod lexer;
mod token;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use token::{keyword, Literal, Token, TokenKind};
