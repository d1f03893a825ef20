//! Runtime errors and non-local exits.

use thiserror::Error;

use loxi_lex::Token;

use crate::value::Value;

/// A runtime error: a message plus the line of the offending operation.
///
/// Displays in the fixed two-line report format the driver prints:
///
/// ```text
/// Operands must be numbers.
/// [line 4]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}\n[line {line}]")]
pub struct RuntimeError {
    pub message: String,
    pub line: u32,
}

impl RuntimeError {
    /// Creates an error located at the given token (usually the operator
    /// or the closing paren of a call).
    pub fn new(token: &Token, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: token.line(),
        }
    }
}

/// Non-local exits carried up the evaluation stack as the `Err` channel.
///
/// `Return` is control flow, not a diagnostic: it is caught at the
/// enclosing call site and never reaches the user. `Error` propagates all
/// the way to the driver.
#[derive(Debug)]
pub enum Unwind {
    Return(Value),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}

/// Result of evaluating an expression or executing a statement.
pub type EvalResult<T> = Result<T, Unwind>;
