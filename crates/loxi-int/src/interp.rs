//! Statement execution and expression evaluation.

use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use loxi_lex::{Token, TokenKind};
use loxi_par::{Expr, ExprId, LitValue, Stmt};
use loxi_sem::Bindings;
use loxi_util::Symbol;

use crate::callable::{Class, Function, Instance, NativeFn};
use crate::env::{EnvRef, Environment};
use crate::error::{EvalResult, RuntimeError, Unwind};
use crate::io::{PrintSink, StdPrint};
use crate::value::Value;

/// The `clock` native: wall-clock seconds since the Unix epoch.
fn clock_native(_arguments: &[Value]) -> Value {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Value::Number(elapsed.as_secs_f64())
}

/// The tree-walking evaluator.
///
/// Holds the globals root, the current environment pointer, the resolver's
/// accumulated side-table, and the output sink. One interpreter lives for
/// a whole REPL session, so definitions persist across lines.
pub struct Interpreter {
    /// The globals frame; never replaced.
    globals: EnvRef,

    /// The environment evaluation currently runs in.
    environment: EnvRef,

    /// Resolved scope depths, keyed by node identity.
    bindings: Bindings,

    /// Where `print` writes.
    out: Box<dyn PrintSink>,
}

impl Interpreter {
    /// Creates an interpreter writing `print` output to the given sink.
    ///
    /// The globals come pre-populated with the `clock` native.
    pub fn new(out: Box<dyn PrintSink>) -> Self {
        let globals = Environment::root();
        globals.borrow_mut().define(
            Symbol::intern("clock"),
            Value::Native(Rc::new(NativeFn {
                name: "clock",
                arity: 0,
                call: clock_native,
            })),
        );

        Self {
            environment: Rc::clone(&globals),
            globals,
            bindings: Bindings::default(),
            out,
        }
    }

    /// Creates an interpreter printing to stdout.
    pub fn with_stdout() -> Self {
        Self::new(Box::new(StdPrint))
    }

    /// Installs freshly resolved depths.
    ///
    /// The REPL resolves each line separately and accumulates the tables
    /// here; node ids are process-unique, so entries never collide.
    pub fn add_bindings(&mut self, bindings: Bindings) {
        self.bindings.extend(bindings);
    }

    /// Executes a program.
    ///
    /// A runtime error aborts the remaining statements and is returned
    /// for the driver to report. A stray `return` unwind at the top level
    /// stops execution quietly; the resolver rejects top-level `return`,
    /// so this is reachable only when resolution was skipped.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for statement in statements {
            match self.execute(statement) {
                Ok(()) => {}
                Err(Unwind::Return(_)) => break,
                Err(Unwind::Error(error)) => return Err(error),
            }
        }
        Ok(())
    }

    // =========================================================================
    // STATEMENTS
    // =========================================================================

    fn execute(&mut self, statement: &Stmt) -> EvalResult<()> {
        match statement {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                self.out.writeln(&value.to_string());
                Ok(())
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Value::Nil,
                };
                self.environment.borrow_mut().define(name.symbol(), value);
                Ok(())
            }
            Stmt::Block(statements) => {
                let scope = Environment::child_of(&self.environment);
                self.execute_block(statements, scope)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }
                Ok(())
            }
            Stmt::Function(decl) => {
                // The closure captures the environment of the declaration
                // site by reference; mutations stay visible through it.
                let function = Function::new(Rc::clone(decl), Rc::clone(&self.environment));
                self.environment
                    .borrow_mut()
                    .define(decl.name.symbol(), Value::Function(Rc::new(function)));
                Ok(())
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(value) => self.evaluate(value)?,
                    None => Value::Nil,
                };
                Err(Unwind::Return(value))
            }
            Stmt::Class { name } => {
                let class = Class::new(name.lexeme.clone());
                self.environment
                    .borrow_mut()
                    .define(name.symbol(), Value::Class(Rc::new(class)));
                Ok(())
            }
        }
    }

    /// Executes statements in the given environment, restoring the current
    /// environment afterwards - on normal completion and on every unwind.
    fn execute_block(&mut self, statements: &[Stmt], environment: EnvRef) -> EvalResult<()> {
        let previous = std::mem::replace(&mut self.environment, environment);
        let result = statements
            .iter()
            .try_for_each(|statement| self.execute(statement));
        self.environment = previous;
        result
    }

    // =========================================================================
    // EXPRESSIONS
    // =========================================================================

    fn evaluate(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal(value) => Ok(match value {
                LitValue::Nil => Value::Nil,
                LitValue::Bool(b) => Value::Bool(*b),
                LitValue::Number(n) => Value::Number(*n),
                LitValue::Str(s) => Value::Str(Rc::from(s.as_str())),
            }),
            Expr::Grouping(inner) => self.evaluate(inner),
            Expr::Unary { op, right } => {
                let right = self.evaluate(right)?;
                match op.kind {
                    TokenKind::Minus => match right {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        _ => Err(RuntimeError::new(op, "Operand must be a number.").into()),
                    },
                    TokenKind::Bang => Ok(Value::Bool(!right.is_truthy())),
                    _ => unreachable!("not a unary operator: {:?}", op.kind),
                }
            }
            Expr::Binary { left, op, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                self.binary(left, op, right)
            }
            Expr::Logical { left, op, right } => {
                let left = self.evaluate(left)?;

                // Short-circuit: the result is the deciding operand
                // itself, never a coerced boolean.
                if op.kind == TokenKind::Or {
                    if left.is_truthy() {
                        return Ok(left);
                    }
                } else if !left.is_truthy() {
                    return Ok(left);
                }

                self.evaluate(right)
            }
            Expr::Variable { id, name } => self.look_up_variable(*id, name),
            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;

                let assigned = match self.bindings.depth(*id) {
                    Some(depth) => Environment::assign_at(
                        &self.environment,
                        depth,
                        name.symbol(),
                        value.clone(),
                    ),
                    None => self
                        .globals
                        .borrow_mut()
                        .assign(name.symbol(), value.clone()),
                };

                if assigned {
                    // Assignment is an expression; its value is the
                    // assigned value.
                    Ok(value)
                } else {
                    Err(self.undefined_variable(name))
                }
            }
            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee = self.evaluate(callee)?;

                let mut args = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    args.push(self.evaluate(argument)?);
                }

                self.call_value(callee, args, paren)
            }
        }
    }

    fn binary(&mut self, left: Value, op: &Token, right: Value) -> EvalResult<Value> {
        match op.kind {
            TokenKind::Plus => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::Str(a), Value::Str(b)) => Ok(Value::Str(Rc::from(format!("{}{}", a, b)))),
                _ => Err(RuntimeError::new(op, "Operands must be two numbers or two strings.").into()),
            },
            TokenKind::Minus => {
                let (a, b) = number_operands(op, left, right)?;
                Ok(Value::Number(a - b))
            }
            TokenKind::Star => {
                let (a, b) = number_operands(op, left, right)?;
                Ok(Value::Number(a * b))
            }
            TokenKind::Slash => {
                // No zero check: IEEE-754 division is the contract, so
                // 1/0 is inf and 0/0 is NaN.
                let (a, b) = number_operands(op, left, right)?;
                Ok(Value::Number(a / b))
            }
            TokenKind::Greater => {
                let (a, b) = number_operands(op, left, right)?;
                Ok(Value::Bool(a > b))
            }
            TokenKind::GreaterEqual => {
                let (a, b) = number_operands(op, left, right)?;
                Ok(Value::Bool(a >= b))
            }
            TokenKind::Less => {
                let (a, b) = number_operands(op, left, right)?;
                Ok(Value::Bool(a < b))
            }
            TokenKind::LessEqual => {
                let (a, b) = number_operands(op, left, right)?;
                Ok(Value::Bool(a <= b))
            }
            TokenKind::BangEqual => Ok(Value::Bool(!left.equals(&right))),
            TokenKind::EqualEqual => Ok(Value::Bool(left.equals(&right))),
            _ => unreachable!("not a binary operator: {:?}", op.kind),
        }
    }

    /// Reads a variable through the resolved depth, or from the globals
    /// frame when the resolver recorded nothing for this node.
    fn look_up_variable(&self, id: ExprId, name: &Token) -> EvalResult<Value> {
        let value = match self.bindings.depth(id) {
            Some(depth) => Environment::get_at(&self.environment, depth, name.symbol()),
            None => self.globals.borrow().get(name.symbol()),
        };

        value.ok_or_else(|| self.undefined_variable(name))
    }

    fn undefined_variable(&self, name: &Token) -> Unwind {
        RuntimeError::new(name, format!("Undefined variable '{}'.", name.lexeme)).into()
    }

    // =========================================================================
    // CALLS
    // =========================================================================

    fn call_value(&mut self, callee: Value, arguments: Vec<Value>, paren: &Token) -> EvalResult<Value> {
        match callee {
            Value::Function(function) => {
                self.check_arity(function.arity(), arguments.len(), paren)?;
                self.call_function(&function, arguments)
            }
            Value::Native(native) => {
                self.check_arity(native.arity, arguments.len(), paren)?;
                Ok((native.call)(&arguments))
            }
            Value::Class(class) => {
                self.check_arity(class.arity(), arguments.len(), paren)?;
                Ok(Value::Instance(Rc::new(Instance::new(class))))
            }
            _ => Err(RuntimeError::new(paren, "Can only call functions and classes.").into()),
        }
    }

    fn check_arity(&self, expected: usize, got: usize, paren: &Token) -> EvalResult<()> {
        if expected == got {
            Ok(())
        } else {
            Err(RuntimeError::new(
                paren,
                format!("Expected {} arguments but got {}.", expected, got),
            )
            .into())
        }
    }

    /// Invokes a user function: fresh frame under the captured closure,
    /// parameters bound positionally, body run as a block. A `Return`
    /// unwind from the body stops here and becomes the call's value;
    /// falling off the end yields nil.
    fn call_function(&mut self, function: &Function, arguments: Vec<Value>) -> EvalResult<Value> {
        let environment = Environment::child_of(function.closure());
        for (param, argument) in function.decl().params.iter().zip(arguments) {
            environment.borrow_mut().define(param.symbol(), argument);
        }

        match self.execute_block(&function.decl().body, environment) {
            Ok(()) => Ok(Value::Nil),
            Err(Unwind::Return(value)) => Ok(value),
            Err(error) => Err(error),
        }
    }
}

fn number_operands(op: &Token, left: Value, right: Value) -> EvalResult<(f64, f64)> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((a, b)),
        _ => Err(RuntimeError::new(op, "Operands must be numbers.").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loxi_lex::Lexer;
    use loxi_par::Parser;
    use loxi_sem::Resolver;
    use loxi_util::Handler;

    use crate::io::CollectPrint;

    /// Runs a program through the full pipeline, capturing output.
    fn run(source: &str) -> (Vec<String>, Option<RuntimeError>) {
        let handler = Handler::new();
        let tokens = Lexer::new(source, &handler).scan_tokens();
        let statements = Parser::new(tokens, &handler).parse();
        assert!(
            !handler.has_errors(),
            "static errors in {:?}: {:?}",
            source,
            handler.diagnostics()
        );
        let bindings = Resolver::new(&handler).resolve(&statements);
        assert!(
            !handler.has_errors(),
            "resolve errors in {:?}: {:?}",
            source,
            handler.diagnostics()
        );

        let sink = CollectPrint::new();
        let mut interpreter = Interpreter::new(Box::new(sink.clone()));
        interpreter.add_bindings(bindings);
        let error = interpreter.interpret(&statements).err();
        (sink.lines(), error)
    }

    fn run_ok(source: &str) -> Vec<String> {
        let (lines, error) = run(source);
        assert!(error.is_none(), "unexpected runtime error: {:?}", error);
        lines
    }

    fn run_err(source: &str) -> (Vec<String>, RuntimeError) {
        let (lines, error) = run(source);
        (lines, error.expect("expected a runtime error"))
    }

    // =========================================================================
    // LITERALS AND OPERATORS
    // =========================================================================

    #[test]
    fn test_print_literals() {
        assert_eq!(
            run_ok("print nil; print true; print false; print 3; print 3.5; print \"hi\";"),
            vec!["nil", "true", "false", "3", "3.5", "hi"]
        );
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(run_ok("print 1 + 2 * 3;"), vec!["7"]);
        assert_eq!(run_ok("print (1 + 2) * 3;"), vec!["9"]);
        assert_eq!(run_ok("print 10 - 4 - 3;"), vec!["3"]);
    }

    #[test]
    fn test_unary_operators() {
        assert_eq!(run_ok("print -3; print --3;"), vec!["-3", "3"]);
        assert_eq!(run_ok("print !nil; print !false; print !0; print !\"\";"),
            vec!["true", "true", "false", "false"]);
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(run_ok("print \"foo\" + \"bar\";"), vec!["foobar"]);
        assert_eq!(run_ok("print \"\" + \"\";"), vec![""]);
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(
            run_ok("print 1 < 2; print 2 <= 2; print 1 > 2; print 2 >= 3;"),
            vec!["true", "true", "false", "false"]
        );
    }

    #[test]
    fn test_equality() {
        assert_eq!(
            run_ok("print nil == nil; print 1 == 1; print \"a\" == \"a\"; print true == true;"),
            vec!["true", "true", "true", "true"]
        );
        // Cross-type never raises, it is just unequal.
        assert_eq!(
            run_ok("print 1 == \"1\"; print nil == false; print \"\" == 0;"),
            vec!["false", "false", "false"]
        );
    }

    #[test]
    fn test_division_by_zero_is_ieee() {
        assert_eq!(run_ok("print 1 / 0; print -1 / 0; print 0 / 0;"),
            vec!["inf", "-inf", "NaN"]);
    }

    // =========================================================================
    // RUNTIME TYPE ERRORS
    // =========================================================================

    #[test]
    fn test_string_plus_number_errors() {
        let (_, error) = run_err("print \"a\" + 1;");
        assert_eq!(error.message, "Operands must be two numbers or two strings.");
        assert_eq!(error.line, 1);
        assert_eq!(
            error.to_string(),
            "Operands must be two numbers or two strings.\n[line 1]"
        );
    }

    #[test]
    fn test_arithmetic_on_non_numbers_errors() {
        let (_, error) = run_err("print true * 2;");
        assert_eq!(error.message, "Operands must be numbers.");

        let (_, error) = run_err("1 < \"2\";");
        assert_eq!(error.message, "Operands must be numbers.");
    }

    #[test]
    fn test_unary_minus_on_non_number_errors() {
        let (_, error) = run_err("-\"oops\";");
        assert_eq!(error.message, "Operand must be a number.");
    }

    #[test]
    fn test_error_reports_operator_line() {
        let (_, error) = run_err("var a = 1;\nvar b = \"x\";\na\n  *\nb;");
        assert_eq!(error.line, 4);
    }

    #[test]
    fn test_output_before_error_is_kept() {
        let (lines, error) = run_err("print \"before\"; print 1 + nil;");
        assert_eq!(lines, vec!["before"]);
        assert_eq!(error.message, "Operands must be two numbers or two strings.");
    }

    // =========================================================================
    // VARIABLES AND SCOPE
    // =========================================================================

    #[test]
    fn test_var_defaults_to_nil() {
        assert_eq!(run_ok("var x; print x;"), vec!["nil"]);
    }

    #[test]
    fn test_assignment_is_an_expression() {
        assert_eq!(run_ok("var x = 1; print x = 2; print x;"), vec!["2", "2"]);
        assert_eq!(run_ok("var a; var b; a = b = 3; print a; print b;"), vec!["3", "3"]);
    }

    #[test]
    fn test_undefined_variable_read() {
        let (_, error) = run_err("print ghost;");
        assert_eq!(error.message, "Undefined variable 'ghost'.");
    }

    #[test]
    fn test_undefined_variable_assignment() {
        let (_, error) = run_err("ghost = 1;");
        assert_eq!(error.message, "Undefined variable 'ghost'.");
    }

    #[test]
    fn test_block_shadowing_restores_outer() {
        let source = r#"
            var a = "outer";
            {
                var a = "inner";
                print a;
            }
            print a;
        "#;
        assert_eq!(run_ok(source), vec!["inner", "outer"]);
    }

    #[test]
    fn test_inner_assignment_mutates_outer() {
        let source = r#"
            var a = 1;
            { a = 2; }
            print a;
        "#;
        assert_eq!(run_ok(source), vec!["2"]);
    }

    #[test]
    fn test_global_redefinition_allowed() {
        assert_eq!(run_ok("var a = 1; var a = 2; print a;"), vec!["2"]);
    }

    // =========================================================================
    // CONTROL FLOW
    // =========================================================================

    #[test]
    fn test_if_else_uses_truthiness() {
        assert_eq!(run_ok("if (0) print \"zero is true\"; else print \"no\";"),
            vec!["zero is true"]);
        assert_eq!(run_ok("if (nil) print \"yes\"; else print \"nil is false\";"),
            vec!["nil is false"]);
    }

    #[test]
    fn test_while_loop() {
        assert_eq!(
            run_ok("var n = 3; while (n > 0) { print n; n = n - 1; }"),
            vec!["3", "2", "1"]
        );
    }

    #[test]
    fn test_while_false_never_runs() {
        assert_eq!(run_ok("while (false) print \"never\";"), Vec::<String>::new());
    }

    #[test]
    fn test_for_loop() {
        assert_eq!(
            run_ok("for (var i = 0; i < 3; i = i + 1) print i;"),
            vec!["0", "1", "2"]
        );
    }

    #[test]
    fn test_for_loop_accumulates() {
        let source = r#"
            var total = 0;
            for (var i = 1; i <= 10; i = i + 1) total = total + i;
            print total;
        "#;
        assert_eq!(run_ok(source), vec!["55"]);
    }

    #[test]
    fn test_logical_short_circuit_values() {
        assert_eq!(
            run_ok("print \"hi\" or 2; print nil or \"yes\"; print nil and 3;"),
            vec!["hi", "yes", "nil"]
        );
        // The original operand comes back, not a coerced boolean.
        assert_eq!(run_ok("print 1 and 2; print 1 or 2;"), vec!["2", "1"]);
    }

    #[test]
    fn test_short_circuit_skips_evaluation() {
        let source = r#"
            var calls = 0;
            fun bump() {
                calls = calls + 1;
                return true;
            }
            true or bump();
            false and bump();
            print calls;
            false or bump();
            true and bump();
            print calls;
        "#;
        assert_eq!(run_ok(source), vec!["0", "2"]);
    }

    // =========================================================================
    // FUNCTIONS AND CLOSURES
    // =========================================================================

    #[test]
    fn test_function_call_and_return() {
        let source = r#"
            fun add(a, b) { return a + b; }
            print add(1, 2);
        "#;
        assert_eq!(run_ok(source), vec!["3"]);
    }

    #[test]
    fn test_function_without_return_yields_nil() {
        assert_eq!(run_ok("fun noop() {} print noop();"), vec!["nil"]);
        assert_eq!(run_ok("fun bare() { return; } print bare();"), vec!["nil"]);
    }

    #[test]
    fn test_return_unwinds_nested_blocks_and_loops() {
        let source = r#"
            fun first() {
                for (var i = 0; i < 10; i = i + 1) {
                    if (i == 3) { return i; }
                }
            }
            print first();
        "#;
        assert_eq!(run_ok(source), vec!["3"]);
    }

    #[test]
    fn test_recursion() {
        let source = r#"
            fun fib(n) {
                if (n <= 1) return n;
                return fib(n - 1) + fib(n - 2);
            }
            print fib(10);
        "#;
        assert_eq!(run_ok(source), vec!["55"]);
    }

    #[test]
    fn test_arguments_evaluate_left_to_right() {
        let source = r#"
            var trace = "";
            fun mark(label, value) {
                trace = trace + label;
                return value;
            }
            fun three(a, b, c) { return c; }
            three(mark("a", 1), mark("b", 2), mark("c", 3));
            print trace;
        "#;
        assert_eq!(run_ok(source), vec!["abc"]);
    }

    #[test]
    fn test_closure_captures_declaration_scope() {
        // The closure keeps seeing the binding visible where it was
        // declared, not whatever later shadows it at the call site.
        let source = r#"
            var a = "global";
            {
                fun show() { print a; }
                show();
                var a = "block";
                show();
            }
        "#;
        assert_eq!(run_ok(source), vec!["global", "global"]);
    }

    #[test]
    fn test_counter_closure() {
        let source = r#"
            fun makeCounter() {
                var n = 0;
                fun count() {
                    n = n + 1;
                    print n;
                }
                return count;
            }
            var counter = makeCounter();
            counter();
            counter();
            counter();
        "#;
        assert_eq!(run_ok(source), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_two_counters_are_independent() {
        let source = r#"
            fun makeCounter() {
                var n = 0;
                fun count() {
                    n = n + 1;
                    print n;
                }
                return count;
            }
            var a = makeCounter();
            var b = makeCounter();
            a(); a();
            b();
        "#;
        assert_eq!(run_ok(source), vec!["1", "2", "1"]);
    }

    #[test]
    fn test_closures_share_one_environment() {
        let source = r#"
            var get;
            var set;
            fun make() {
                var n = 0;
                fun g() { print n; }
                fun s() { n = 100; }
                get = g;
                set = s;
            }
            make();
            set();
            get();
        "#;
        assert_eq!(run_ok(source), vec!["100"]);
    }

    #[test]
    fn test_function_display() {
        assert_eq!(run_ok("fun f() {} print f;"), vec!["<fn f>"]);
    }

    // =========================================================================
    // CALL ERRORS
    // =========================================================================

    #[test]
    fn test_calling_non_callable() {
        let (_, error) = run_err("\"not a function\"();");
        assert_eq!(error.message, "Can only call functions and classes.");

        let (_, error) = run_err("nil();");
        assert_eq!(error.message, "Can only call functions and classes.");
    }

    #[test]
    fn test_arity_mismatch() {
        let (_, error) = run_err("fun f(a) {} f(1, 2);");
        assert_eq!(error.message, "Expected 1 arguments but got 2.");

        let (_, error) = run_err("fun g(a, b) {} g();");
        assert_eq!(error.message, "Expected 2 arguments but got 0.");
    }

    #[test]
    fn test_runtime_error_inside_call_propagates() {
        let (_, error) = run_err("fun bad() { return 1 + nil; } bad();");
        assert_eq!(error.message, "Operands must be two numbers or two strings.");
    }

    // =========================================================================
    // CLASSES AND NATIVES
    // =========================================================================

    #[test]
    fn test_class_prints_its_name() {
        assert_eq!(run_ok("class Thing {} print Thing;"), vec!["Thing"]);
    }

    #[test]
    fn test_class_instantiation() {
        assert_eq!(run_ok("class Thing {} print Thing();"), vec!["Thing instance"]);
    }

    #[test]
    fn test_class_constructor_takes_no_arguments() {
        let (_, error) = run_err("class Thing {} Thing(1);");
        assert_eq!(error.message, "Expected 0 arguments but got 1.");
    }

    #[test]
    fn test_instances_compare_by_identity() {
        let source = r#"
            class Thing {}
            var a = Thing();
            var b = Thing();
            print a == a;
            print a == b;
        "#;
        assert_eq!(run_ok(source), vec!["true", "false"]);
    }

    #[test]
    fn test_clock_native() {
        assert_eq!(run_ok("print clock;"), vec!["<native fn>"]);
        // Seconds since the epoch: positive, and non-decreasing.
        assert_eq!(run_ok("print clock() > 0;"), vec!["true"]);
        assert_eq!(
            run_ok("var a = clock(); var b = clock(); print b >= a;"),
            vec!["true"]
        );
    }

    #[test]
    fn test_clock_arity_checked() {
        let (_, error) = run_err("clock(1);");
        assert_eq!(error.message, "Expected 0 arguments but got 1.");
    }

    // =========================================================================
    // INTERPRETER STATE
    // =========================================================================

    #[test]
    fn test_state_persists_across_interpret_calls() {
        // The REPL runs each line as its own interpret() call.
        let sink = CollectPrint::new();
        let mut interpreter = Interpreter::new(Box::new(sink.clone()));

        for line in ["var x = 1;", "x = x + 1;", "print x;"] {
            let handler = Handler::new();
            let tokens = Lexer::new(line, &handler).scan_tokens();
            let statements = Parser::new(tokens, &handler).parse();
            interpreter.add_bindings(Resolver::new(&handler).resolve(&statements));
            assert!(!handler.has_errors());
            interpreter.interpret(&statements).unwrap();
        }

        assert_eq!(sink.lines(), vec!["2"]);
    }

    #[test]
    fn test_closure_created_on_earlier_line_still_resolves() {
        let sink = CollectPrint::new();
        let mut interpreter = Interpreter::new(Box::new(sink.clone()));

        let lines = [
            "fun makeCounter() { var n = 0; fun count() { n = n + 1; print n; } return count; }",
            "var counter = makeCounter();",
            "{ var n = 99; counter(); }",
        ];
        for line in lines {
            let handler = Handler::new();
            let tokens = Lexer::new(line, &handler).scan_tokens();
            let statements = Parser::new(tokens, &handler).parse();
            interpreter.add_bindings(Resolver::new(&handler).resolve(&statements));
            assert!(!handler.has_errors());
            interpreter.interpret(&statements).unwrap();
        }

        // The counter increments its own capture, not the shadowing local.
        assert_eq!(sink.lines(), vec!["1"]);
    }

    #[test]
    fn test_stray_top_level_return_stops_quietly() {
        // Reachable only when resolution is skipped; the interpreter
        // stops instead of surfacing control flow as a diagnostic.
        let handler = Handler::new();
        let tokens = Lexer::new("print 1; return 2; print 3;", &handler).scan_tokens();
        let statements = Parser::new(tokens, &handler).parse();

        let sink = CollectPrint::new();
        let mut interpreter = Interpreter::new(Box::new(sink.clone()));
        assert!(interpreter.interpret(&statements).is_ok());
        assert_eq!(sink.lines(), vec!["1"]);
    }
}
