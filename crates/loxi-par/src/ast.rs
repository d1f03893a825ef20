//! AST node definitions.
//!
//! The parser produces a tree of [`Stmt`] and [`Expr`] sum types. Later
//! phases dispatch by pattern matching on the variants; there is no
//! visitor indirection.
//!
//! Operator nodes keep the operator [`Token`] itself (not just its kind) so
//! that runtime errors can report the operator's line. Call nodes keep the
//! closing parenthesis token for the same reason.

use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use loxi_lex::Token;

/// Identity of a name-reference node.
///
/// The resolver records one scope depth per *node*, not per name: two
/// references to the same identifier at different source positions can
/// resolve to different depths. The parser hands out a fresh `ExprId` for
/// every `Variable` and `Assign` node, and the resolver's side-table is
/// keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(pub u32);

impl ExprId {
    /// Allocates a process-unique id.
    ///
    /// Uniqueness must hold across parser instances, not just within one:
    /// the REPL parses every line with a fresh parser but accumulates all
    /// resolved depths into one side-table, and closures created on
    /// earlier lines keep their nodes (and ids) alive.
    pub fn fresh() -> ExprId {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        ExprId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A literal value as it appears in source.
#[derive(Debug, Clone, PartialEq)]
pub enum LitValue {
    Nil,
    Bool(bool),
    Number(f64),
    Str(String),
}

/// Expression node.
#[derive(Debug, Clone)]
pub enum Expr {
    /// A literal: number, string, boolean, or nil.
    Literal(LitValue),

    /// Parenthesised expression.
    Grouping(Box<Expr>),

    /// Prefix operator application: `!x`, `-x`.
    Unary { op: Token, right: Box<Expr> },

    /// Infix operator application; both operands always evaluate.
    Binary {
        left: Box<Expr>,
        op: Token,
        right: Box<Expr>,
    },

    /// `and` / `or` - distinct from `Binary` because the right operand
    /// only evaluates when the left does not decide the result.
    Logical {
        left: Box<Expr>,
        op: Token,
        right: Box<Expr>,
    },

    /// A variable reference.
    Variable { id: ExprId, name: Token },

    /// Assignment to a variable.
    Assign {
        id: ExprId,
        name: Token,
        value: Box<Expr>,
    },

    /// A call: callee followed by parenthesised arguments.
    Call {
        callee: Box<Expr>,
        /// Closing `)`, retained for error reporting.
        paren: Token,
        arguments: Vec<Expr>,
    },
}

/// Statement node.
#[derive(Debug, Clone)]
pub enum Stmt {
    /// An expression evaluated for its side effects.
    Expression(Expr),

    /// `print <expr>;`
    Print(Expr),

    /// `var <name> (= <initializer>)?;` - without an initializer the
    /// binding is created holding nil.
    Var {
        name: Token,
        initializer: Option<Expr>,
    },

    /// `{ ... }` - executed in a fresh child environment.
    Block(Vec<Stmt>),

    /// `if (<condition>) <then> (else <else>)?`
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    /// `while (<condition>) <body>` - `for` loops desugar to this.
    While { condition: Expr, body: Box<Stmt> },

    /// `fun <name>(<params>) { ... }`
    ///
    /// The declaration is reference-counted so closure values can share it
    /// with the AST instead of cloning parameter lists and bodies.
    Function(Rc<FunctionDecl>),

    /// `return (<value>)?;`
    Return { keyword: Token, value: Option<Expr> },

    /// `class <name> {}` - declares a zero-arity constructor; the class
    /// body is required to be empty.
    Class { name: Token },
}

/// A function declaration: shared between `Stmt::Function` and the
/// function values the interpreter creates from it.
#[derive(Debug)]
pub struct FunctionDecl {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}
