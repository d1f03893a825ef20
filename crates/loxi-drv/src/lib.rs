//! loxi-drv - Interpreter Driver
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! The driver owns the pipeline orchestration and the process boundary:
//!
//! ```text
//! Source text
//!      |
//!      v
//!   [Lexer]    -> token stream      (loxi-lex)
//!      |
//!      v
//!   [Parser]   -> statement list    (loxi-par)
//!      |
//!      v
//!   [Resolver] -> scope depths      (loxi-sem)
//!      |
//!      v
//!   [Interpreter] -> program output (loxi-int)
//! ```
//!
//! The stages are strictly sequential: each consumes the previous stage's
//! fully materialised output. Any static error (lex, parse, resolve) stops
//! the pipeline before evaluation; the parser still runs after lex errors
//! so that one pass reports as much as possible, but the interpreter never
//! sees a program that failed a static phase.
//!
//! ENTRY MODES AND EXIT CODES
//! --------------------------
//!
//! - `lox`          - interactive REPL; errors never exit the loop
//! - `lox <script>` - run a file, then exit:
//!   - 0  on success
//!   - 65 after static errors
//!   - 70 after a runtime error
//! - anything else  - usage message, exit 64
//!
//! A [`Session`] holds the long-lived pieces (diagnostic handler and
//! interpreter); the REPL runs every line through the same session so
//! globals, closures and resolved depths accumulate, while diagnostics
//! reset per line.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Context;

use loxi_int::{Interpreter, PrintSink, RuntimeError};
use loxi_lex::Lexer;
use loxi_par::Parser;
use loxi_sem::Resolver;
use loxi_util::{Diagnostic, Handler};

/// Successful run.
pub const EXIT_OK: i32 = 0;
/// Bad command line.
pub const EXIT_USAGE: i32 = 64;
/// Static (lex/parse/resolve) errors.
pub const EXIT_STATIC_ERROR: i32 = 65;
/// Runtime error during evaluation.
pub const EXIT_RUNTIME_ERROR: i32 = 70;
/// The script file could not be read.
pub const EXIT_IO_ERROR: i32 = 74;

/// What happened to one source unit (a file, or one REPL line).
#[derive(Debug)]
pub enum Outcome {
    /// Ran to completion.
    Ok,
    /// Static errors; evaluation was skipped entirely.
    StaticError(Vec<Diagnostic>),
    /// Evaluation started and hit a runtime error.
    RuntimeError(RuntimeError),
}

/// One interpreter session: the diagnostic handler and evaluator state
/// shared by every source unit run through it.
pub struct Session {
    handler: Handler,
    interpreter: Interpreter,
}

impl Session {
    /// Creates a session printing program output to stdout.
    pub fn new() -> Self {
        Self {
            handler: Handler::new(),
            interpreter: Interpreter::with_stdout(),
        }
    }

    /// Creates a session with a custom `print` sink (tests, embedding).
    pub fn with_sink(sink: Box<dyn PrintSink>) -> Self {
        Self {
            handler: Handler::new(),
            interpreter: Interpreter::new(sink),
        }
    }

    /// Runs one source unit through the full pipeline.
    ///
    /// Diagnostics from any earlier unit are cleared first, so a REPL
    /// line always starts with a clean slate. The caller decides how to
    /// surface the returned [`Outcome`].
    pub fn run(&mut self, source: &str) -> Outcome {
        self.handler.clear();

        log::debug!("lexing {} bytes", source.len());
        let tokens = Lexer::new(source, &self.handler).scan_tokens();

        log::debug!("parsing {} tokens", tokens.len());
        let statements = Parser::new(tokens, &self.handler).parse();
        if self.handler.has_errors() {
            return Outcome::StaticError(self.handler.diagnostics());
        }

        log::debug!("resolving {} statements", statements.len());
        let bindings = Resolver::new(&self.handler).resolve(&statements);
        if self.handler.has_errors() {
            return Outcome::StaticError(self.handler.diagnostics());
        }
        self.interpreter.add_bindings(bindings);

        log::debug!("evaluating");
        match self.interpreter.interpret(&statements) {
            Ok(()) => Outcome::Ok,
            Err(error) => Outcome::RuntimeError(error),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints an outcome's errors to stderr and maps it to an exit code.
fn report(outcome: &Outcome) -> i32 {
    match outcome {
        Outcome::Ok => EXIT_OK,
        Outcome::StaticError(diagnostics) => {
            for diagnostic in diagnostics {
                eprintln!("{}", diagnostic);
            }
            EXIT_STATIC_ERROR
        }
        Outcome::RuntimeError(error) => {
            eprintln!("{}", error);
            EXIT_RUNTIME_ERROR
        }
    }
}

/// Batch mode: run a script file once and return the exit code.
pub fn run_file(path: &Path) -> anyhow::Result<i32> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;

    let mut session = Session::new();
    Ok(report(&session.run(&source)))
}

/// Interactive mode: read a line, run it, repeat until EOF.
///
/// A failed line reports its errors and the loop carries on; the session
/// (globals, closures) survives across lines.
pub fn run_prompt() -> anyhow::Result<i32> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut session = Session::new();

    let mut line = String::new();
    loop {
        stdout.write_all(b"> ")?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        report(&session.run(&line));
    }

    Ok(EXIT_OK)
}
