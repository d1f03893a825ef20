//! Diagnostic module - Error reporting for the static phases.
//!
//! The lexer, parser and resolver all report through one [`Handler`]. A
//! [`Diagnostic`] renders in one of three fixed formats depending on where
//! the error was noticed:
//!
//! ```text
//! [line 4] Error: Unexpected character.            (no token available)
//! [line 4] Error at 'foo': Expect ';' after value. (at a token)
//! [line 4] Error at end: Expect expression.        (at end of input)
//! ```
//!
//! Runtime errors do not pass through the handler; they carry their own
//! line and are printed by the driver (see the interpreter crate).
//!
//! # Examples
//!
//! ```
//! use loxi_util::{Diagnostic, ErrorLocation, Handler};
//!
//! let handler = Handler::new();
//! handler.report(Diagnostic::new(1, ErrorLocation::Bare, "Unexpected character."));
//!
//! assert!(handler.has_errors());
//! assert_eq!(
//!     handler.diagnostics()[0].to_string(),
//!     "[line 1] Error: Unexpected character."
//! );
//! ```

use std::cell::RefCell;
use std::fmt;

/// Where a static error was noticed, which selects the report format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorLocation {
    /// No token context (lexical errors): `[line N] Error: <msg>`.
    Bare,
    /// At the end of the token stream: `[line N] Error at end: <msg>`.
    AtEnd,
    /// At a concrete token: `[line N] Error at '<lexeme>': <msg>`.
    AtToken(String),
}

/// A single static error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Source line (1-based).
    pub line: u32,
    /// Report location context.
    pub location: ErrorLocation,
    /// Main diagnostic message.
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(line: u32, location: ErrorLocation, message: impl Into<String>) -> Self {
        Self {
            line,
            location,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            ErrorLocation::Bare => {
                write!(f, "[line {}] Error: {}", self.line, self.message)
            }
            ErrorLocation::AtEnd => {
                write!(f, "[line {}] Error at end: {}", self.line, self.message)
            }
            ErrorLocation::AtToken(lexeme) => {
                write!(f, "[line {}] Error at '{}': {}", self.line, lexeme, self.message)
            }
        }
    }
}

/// Handler for collecting static errors.
///
/// The handler is shared by reference across the static phases, so it uses
/// interior mutability. `has_errors()` is the pipeline gate: the driver
/// refuses to evaluate a program once anything was reported. The REPL calls
/// [`Handler::clear`] between lines.
pub struct Handler {
    /// Collected diagnostics, in report order.
    diagnostics: RefCell<Vec<Diagnostic>>,
    /// Whether to panic on errors (for tests that expect a clean run).
    panic_on_error: bool,
}

impl Handler {
    /// Create a new handler.
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
            panic_on_error: false,
        }
    }

    /// Create a handler that panics on the first error (for tests).
    pub fn new_panicking() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
            panic_on_error: true,
        }
    }

    /// Record a diagnostic.
    pub fn report(&self, diagnostic: Diagnostic) {
        if self.panic_on_error {
            panic!("diagnostic error: {}", diagnostic);
        }
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Check if any errors have been reported.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.borrow().is_empty()
    }

    /// Number of errors reported so far.
    pub fn error_count(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    /// Snapshot of all diagnostics in report order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Drop all recorded diagnostics (REPL line boundary).
    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}
