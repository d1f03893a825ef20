//! Lexical environments.
//!
//! An [`Environment`] is one frame: a mapping from interned name to value
//! plus an optional link to the enclosing frame. Frames form a chain of
//! unbounded depth; name lookup walks the chain from innermost outward.
//!
//! Frames must be *shared*, not owned: a closure captures the frame that
//! was current at its declaration, and that frame has to stay alive (and
//! observable for mutation) after the declaring block exits. Hence
//! `Rc<RefCell<Environment>>`; evaluation is single-threaded, so `Rc`
//! suffices and no frame is ever borrowed across a user-code call
//! boundary.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use loxi_util::Symbol;

use crate::value::Value;

/// Shared handle to an environment frame.
pub type EnvRef = Rc<RefCell<Environment>>;

/// A single environment frame.
pub struct Environment {
    /// Bindings in declaration order.
    values: IndexMap<Symbol, Value>,
    /// The enclosing frame; `None` only for the globals frame.
    enclosing: Option<EnvRef>,
}

impl Environment {
    /// Creates a root frame with no parent (the globals).
    pub fn root() -> EnvRef {
        Rc::new(RefCell::new(Self {
            values: IndexMap::new(),
            enclosing: None,
        }))
    }

    /// Creates a fresh frame whose parent is `enclosing`.
    pub fn child_of(enclosing: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Self {
            values: IndexMap::new(),
            enclosing: Some(Rc::clone(enclosing)),
        }))
    }

    /// Creates or overwrites a binding in this frame.
    ///
    /// Redeclaration in the same frame rebinds: the resolver forbids it
    /// for locals, and for globals rebinding is the intended behavior.
    pub fn define(&mut self, name: Symbol, value: Value) {
        self.values.insert(name, value);
    }

    /// Reads a binding from this frame only.
    pub fn get_here(&self, name: Symbol) -> Option<Value> {
        self.values.get(&name).cloned()
    }

    /// Rewrites an existing binding in this frame only.
    ///
    /// Returns false if the name is not bound here; assignment never
    /// creates a binding.
    pub fn assign_here(&mut self, name: Symbol, value: Value) -> bool {
        match self.values.get_mut(&name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Reads a binding, walking the chain from this frame outward.
    pub fn get(&self, name: Symbol) -> Option<Value> {
        if let Some(value) = self.values.get(&name) {
            return Some(value.clone());
        }
        self.enclosing
            .as_ref()
            .and_then(|parent| parent.borrow().get(name))
    }

    /// Rewrites a binding, walking the chain from this frame outward.
    pub fn assign(&mut self, name: Symbol, value: Value) -> bool {
        if self.assign_here(name, value.clone()) {
            return true;
        }
        match &self.enclosing {
            Some(parent) => parent.borrow_mut().assign(name, value),
            None => false,
        }
    }

    /// The frame exactly `depth` links up the chain.
    ///
    /// The resolver guarantees the chain is at least that deep for every
    /// depth it records; a short chain stops at the outermost frame, where
    /// the name lookup will fail and surface as an undefined variable.
    fn ancestor(env: &EnvRef, depth: usize) -> EnvRef {
        let mut current = Rc::clone(env);
        for _ in 0..depth {
            let parent = current.borrow().enclosing.clone();
            match parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current
    }

    /// Reads a binding at a resolved depth, without walking further.
    pub fn get_at(env: &EnvRef, depth: usize, name: Symbol) -> Option<Value> {
        Self::ancestor(env, depth).borrow().get_here(name)
    }

    /// Rewrites a binding at a resolved depth, without walking further.
    ///
    /// `get_at` and `assign_at` target the same frame for the same depth:
    /// both go through `ancestor`.
    pub fn assign_at(env: &EnvRef, depth: usize, name: Symbol, value: Value) -> bool {
        Self::ancestor(env, depth).borrow_mut().assign_here(name, value)
    }
}
