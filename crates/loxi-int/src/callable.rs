//! Callable values: user functions, natives, and the class stub.

use std::fmt;
use std::rc::Rc;

use loxi_par::FunctionDecl;

use crate::env::EnvRef;
use crate::value::Value;

/// A user-declared function value.
///
/// Shares the declaration with the AST and captures (by reference, not by
/// copy) the environment that was current at the declaration site. Every
/// call hangs its frame off that capture, so the function keeps seeing the
/// declaring scope's bindings - including mutations made after capture.
pub struct Function {
    decl: Rc<FunctionDecl>,
    closure: EnvRef,
}

impl Function {
    pub fn new(decl: Rc<FunctionDecl>, closure: EnvRef) -> Self {
        Self { decl, closure }
    }

    pub fn name(&self) -> &str {
        &self.decl.name.lexeme
    }

    pub fn arity(&self) -> usize {
        self.decl.params.len()
    }

    pub fn decl(&self) -> &FunctionDecl {
        &self.decl
    }

    pub fn closure(&self) -> &EnvRef {
        &self.closure
    }
}

impl fmt::Debug for Function {
    // The captured environment can reach this function again; keep Debug
    // non-recursive.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}

/// A host-provided function value.
#[derive(Debug)]
pub struct NativeFn {
    pub name: &'static str,
    pub arity: usize,
    pub call: fn(&[Value]) -> Value,
}

/// A class declaration's runtime value.
///
/// Classes here are a stub: calling one with zero arguments produces an
/// empty [`Instance`]. There are no methods, fields, or inheritance.
#[derive(Debug)]
pub struct Class {
    name: String,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Constructor arity. Always zero for the member-less class stub.
    pub fn arity(&self) -> usize {
        0
    }
}

/// An instance of a class. Carries no state beyond its class.
#[derive(Debug)]
pub struct Instance {
    class: Rc<Class>,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Self {
        Self { class }
    }

    pub fn class_name(&self) -> &str {
        self.class.name()
    }
}
