//! loxi-sem - Resolver (Static Scope Analysis)
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! The resolver is a single pre-evaluation pass over the AST that binds
//! every identifier reference to a lexical scope depth. The interpreter
//! then jumps straight to the right environment frame instead of walking
//! the chain by name at every access - and, more importantly, a closure
//! keeps observing the binding that was visible where it was *declared*,
//! no matter what gets declared around the call site later.
//!
//! SCOPE DISCIPLINE
//! ----------------
//!
//! The resolver maintains a stack of scopes; each scope maps a name to a
//! "defined" flag (false = declared, initializer not yet resolved). The
//! global scope is not represented on the stack: names that fall off the
//! bottom resolve as globals at runtime, which is what lets the REPL keep
//! defining things line by line.
//!
//! For every `Variable` or `Assign` node the stack is scanned inside-out;
//! the first scope containing the name determines the depth recorded in
//! the side-table. Absence from the table means "global".
//!
//! The two-phase declare/define split exists for exactly one diagnostic:
//! `var a = a;` inside a local scope reads `a` while it is declared but
//! not yet defined, which is almost certainly a mistake and is reported
//! rather than silently resolving to the outer `a`.
//!
//! DIAGNOSTICS
//! -----------
//!
//! - `Already a variable with this name in this scope.` (local shadowing
//!   within one scope)
//! - `Can't read local variable in its own initializer.`
//! - `Can't return from top-level code.`
//!
//! The resolver does no type checking; everything else is left for the
//! runtime to discover.

use loxi_lex::Token;
use loxi_par::{Expr, ExprId, FunctionDecl, Stmt};
use loxi_util::{Diagnostic, ErrorLocation, Handler, Symbol};
use rustc_hash::FxHashMap;

/// The resolver's output: one scope depth per name-reference node.
///
/// The depth is the number of enclosing environments to skip from the
/// evaluation-time environment to reach the frame declaring the name.
/// Nodes absent from the table resolve against the globals frame.
#[derive(Debug, Default)]
pub struct Bindings {
    locals: FxHashMap<ExprId, usize>,
}

impl Bindings {
    /// Depth recorded for a node, or `None` for a global reference.
    pub fn depth(&self, id: ExprId) -> Option<usize> {
        self.locals.get(&id).copied()
    }

    /// Number of resolved (non-global) references.
    pub fn len(&self) -> usize {
        self.locals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locals.is_empty()
    }

    /// Merge another table into this one.
    ///
    /// The REPL resolves each line separately but evaluates against one
    /// long-lived interpreter, so the per-line tables accumulate. Node ids
    /// are process-unique, so entries never collide.
    pub fn extend(&mut self, other: Bindings) {
        self.locals.extend(other.locals);
    }
}

/// What kind of function body the resolver is currently inside.
#[derive(Clone, Copy, PartialEq, Eq)]
enum FunctionKind {
    None,
    Function,
}

/// The resolver pass.
pub struct Resolver<'a> {
    /// Error handler shared with the other static phases.
    handler: &'a Handler,

    /// Scope stack; innermost last. Value is the "defined" flag.
    scopes: Vec<FxHashMap<Symbol, bool>>,

    /// Accumulated side-table.
    locals: FxHashMap<ExprId, usize>,

    /// Tracks whether `return` is legal here.
    current_function: FunctionKind,
}

impl<'a> Resolver<'a> {
    pub fn new(handler: &'a Handler) -> Self {
        Self {
            handler,
            scopes: Vec::new(),
            locals: FxHashMap::default(),
            current_function: FunctionKind::None,
        }
    }

    /// Resolves a program, producing the scope-depth side-table.
    ///
    /// Errors are reported to the handler; the returned table is still
    /// complete for the parts of the program that resolved.
    pub fn resolve(mut self, statements: &[Stmt]) -> Bindings {
        self.resolve_statements(statements);
        Bindings {
            locals: self.locals,
        }
    }

    fn resolve_statements(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_stmt(statement);
        }
    }

    fn resolve_stmt(&mut self, statement: &Stmt) {
        match statement {
            Stmt::Block(statements) => {
                self.begin_scope();
                self.resolve_statements(statements);
                self.end_scope();
            }
            Stmt::Var { name, initializer } => {
                self.declare(name);
                if let Some(initializer) = initializer {
                    self.resolve_expr(initializer);
                }
                self.define(name);
            }
            Stmt::Function(decl) => {
                // The name is defined before the body resolves so the
                // function can call itself recursively.
                self.declare(&decl.name);
                self.define(&decl.name);
                self.resolve_function(decl);
            }
            Stmt::Expression(expr) | Stmt::Print(expr) => self.resolve_expr(expr),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            }
            Stmt::While { condition, body } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            }
            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionKind::None {
                    self.error(keyword, "Can't return from top-level code.");
                }
                if let Some(value) = value {
                    self.resolve_expr(value);
                }
            }
            Stmt::Class { name } => {
                self.declare(name);
                self.define(name);
            }
        }
    }

    fn resolve_function(&mut self, decl: &FunctionDecl) {
        let enclosing = std::mem::replace(&mut self.current_function, FunctionKind::Function);

        self.begin_scope();
        for param in &decl.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_statements(&decl.body);
        self.end_scope();

        self.current_function = enclosing;
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) => {}
            Expr::Grouping(inner) => self.resolve_expr(inner),
            Expr::Unary { right, .. } => self.resolve_expr(right),
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            Expr::Variable { id, name } => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(&name.symbol()) == Some(&false) {
                        self.error(name, "Can't read local variable in its own initializer.");
                    }
                }
                self.resolve_local(*id, name);
            }
            Expr::Assign { id, name, value } => {
                self.resolve_expr(value);
                self.resolve_local(*id, name);
            }
            Expr::Call {
                callee, arguments, ..
            } => {
                self.resolve_expr(callee);
                for argument in arguments {
                    self.resolve_expr(argument);
                }
            }
        }
    }

    /// Scans the scope stack inside-out and records the depth of the
    /// first scope containing the name. No entry is recorded for globals.
    fn resolve_local(&mut self, id: ExprId, name: &Token) {
        let symbol = name.symbol();
        for (index, scope) in self.scopes.iter().enumerate().rev() {
            if scope.contains_key(&symbol) {
                self.locals.insert(id, self.scopes.len() - 1 - index);
                return;
            }
        }
    }

    fn begin_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Adds the name to the innermost scope with the flag down.
    ///
    /// Redeclaring a name within one local scope is a static error;
    /// globals are exempt (the REPL relies on redefinition).
    fn declare(&mut self, name: &Token) {
        if self.scopes.is_empty() {
            return;
        }

        let symbol = name.symbol();
        let duplicate = self
            .scopes
            .last()
            .is_some_and(|scope| scope.contains_key(&symbol));
        if duplicate {
            self.error(name, "Already a variable with this name in this scope.");
        }

        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(symbol, false);
        }
    }

    /// Raises the flag: the initializer has resolved and the name is
    /// readable from here on.
    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.symbol(), true);
        }
    }

    fn error(&self, token: &Token, message: &str) {
        self.handler.report(Diagnostic::new(
            token.line(),
            ErrorLocation::AtToken(token.lexeme.clone()),
            message,
        ));
    }
}
