//! loxi-int - Tree-Walking Interpreter
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! The interpreter evaluates the resolved AST directly: one `match` arm per
//! statement variant, one per expression variant, no bytecode and no
//! optimisation. All evaluation happens on one Rust call stack; the only
//! non-local control flow is the [`Unwind`] value threaded through the
//! `Err` channel:
//!
//! - `Unwind::Return` is produced by `return` statements and caught at the
//!   enclosing call site, where it becomes the call's value.
//! - `Unwind::Error` carries a [`RuntimeError`] all the way to the driver,
//!   which prints it and flags the run as failed.
//!
//! ENVIRONMENTS
//! ------------
//!
//! Bindings live in a chain of [`Environment`] frames, innermost first.
//! Frames are created on block entry, on function call entry, and once for
//! the globals. A function value captures the frame that was current at
//! its declaration; calling it hangs the fresh call frame off that capture,
//! which is the whole of closure semantics. Frames are shared (a closure
//! can outlive the block that created its capture), so the chain uses
//! `Rc<RefCell<_>>` - evaluation is strictly single-threaded.
//!
//! Variable access goes through the resolver's side-table: a reference
//! with a recorded depth reads exactly that many frames up, and everything
//! else reads the globals frame directly.
//!
//! OUTPUT
//! ------
//!
//! `print` writes through the [`PrintSink`] trait so library callers and
//! tests can capture program output ([`CollectPrint`]) instead of scraping
//! the process's stdout; the driver plugs in [`StdPrint`].

mod callable;
mod env;
mod error;
mod interp;
mod io;
mod value;

pub use callable::{Class, Function, Instance, NativeFn};
pub use env::{EnvRef, Environment};
pub use error::{EvalResult, RuntimeError, Unwind};
pub use interp::Interpreter;
pub use io::{CollectPrint, PrintSink, StdPrint};
pub use value::Value;
