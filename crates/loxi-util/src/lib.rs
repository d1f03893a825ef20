//! loxi-util - Shared infrastructure for the Lox interpreter pipeline.
//!
//! Every phase of the pipeline (lexer, parser, resolver, interpreter,
//! driver) depends on this crate for three things:
//!
//! 1. **Spans** ([`Span`]) - source locations. Diagnostics in this language
//!    only ever *print* a line number, but spans carry byte offsets and a
//!    column as well so that tooling built on top of the phases has real
//!    positions to work with.
//!
//! 2. **Symbols** ([`Symbol`]) - interned identifier strings. Environment
//!    frames and resolver scopes are keyed by identifier, and the same
//!    identifier text is looked up over and over during evaluation; a 4-byte
//!    handle with O(1) equality keeps those maps cheap.
//!
//! 3. **Diagnostics** ([`Diagnostic`], [`Handler`]) - the error reporter
//!    shared by the static phases. The lexer, parser and resolver all push
//!    errors into one [`Handler`]; the driver checks `has_errors()` after
//!    the static phases and skips evaluation entirely when anything was
//!    reported. Runtime errors are a separate taxonomy and never pass
//!    through the handler (see the interpreter crate).

mod diagnostic;
mod span;
mod symbol;

pub use diagnostic::{Diagnostic, ErrorLocation, Handler};
pub use span::Span;
pub use symbol::Symbol;
