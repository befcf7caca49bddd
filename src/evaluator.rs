use crate::ast::{self, Expression, Operator, Statement};
use crate::builtins::BUILTINS;
use crate::scope::{Scope, ScopeRef};
use crate::value::{FunctionValue, Result, RuntimeError, Value, ValueType};
use std::rc::Rc;

/// Tree-walking evaluator. Output from `say` is collected in a buffer
/// so that callers can flush whatever was produced before a runtime
/// error surfaced.
pub struct Interpreter {
    globals: ScopeRef,
    output: String,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        let globals = Scope::global();
        {
            let mut scope = globals.borrow_mut();
            for (name, builtin) in BUILTINS.iter() {
                scope.define(name, Value::Builtin(*builtin));
            }
        }
        Self {
            globals,
            output: String::new(),
        }
    }

    /// Evaluates every top-level statement and returns the value of the
    /// last one. Bindings persist across calls, which is what the REPL
    /// relies on.
    pub fn run(&mut self, program: &ast::Program) -> Result<Value> {
        let globals = Rc::clone(&self.globals);
        let mut result = Value::Undefined;
        for stmt in program.statements.iter() {
            result = self.eval_statement(stmt, &globals)?;
            // A return at the top level ends the program.
            if result.is_return_value() {
                break;
            }
        }
        Ok(result.unwrap_return())
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    fn eval_statement(&mut self, stmt: &Statement, scope: &ScopeRef) -> Result<Value> {
        match stmt {
            Statement::Let(stmt) => {
                let value = self.eval_expression(&stmt.value, scope)?;
                scope.borrow_mut().define(&stmt.name.name, value.clone());
                Ok(value)
            }
            Statement::DestructuringLet(stmt) => self.eval_destructuring_let(stmt, scope),
            Statement::Func(stmt) => {
                let function = Value::Function(FunctionValue {
                    name: stmt.name.name.clone(),
                    parameters: stmt.parameters.clone(),
                    body: stmt.body.clone(),
                    scope: Rc::clone(scope),
                });
                scope.borrow_mut().define(&stmt.name.name, function);
                Ok(Value::Undefined)
            }
            Statement::Return(stmt) => {
                let value = match &stmt.value {
                    Some(expr) => self.eval_expression(expr, scope)?,
                    None => Value::Undefined,
                };
                Ok(Value::ReturnValue(Box::new(value)))
            }
            Statement::Say(stmt) => {
                let value = self.eval_expression(&stmt.value, scope)?;
                self.output.push_str(&value.to_string());
                self.output.push('\n');
                Ok(Value::Undefined)
            }
            Statement::If(stmt) => {
                if self.eval_expression(&stmt.condition, scope)?.is_truthy() {
                    self.eval_block(&stmt.consequence, &Scope::child(scope))
                } else if let Some(alternative) = &stmt.alternative {
                    self.eval_block(alternative, &Scope::child(scope))
                } else {
                    Ok(Value::Undefined)
                }
            }
            Statement::While(stmt) => {
                while self.eval_expression(&stmt.condition, scope)?.is_truthy() {
                    let result = self.eval_block(&stmt.body, &Scope::child(scope))?;
                    if result.is_return_value() {
                        return Ok(result);
                    }
                }
                Ok(Value::Undefined)
            }
            Statement::Block(block) => self.eval_block(block, &Scope::child(scope)),
            Statement::Expr(stmt) => self.eval_expression(&stmt.expression, scope),
        }
    }

    fn eval_block(&mut self, block: &ast::BlockStatement, scope: &ScopeRef) -> Result<Value> {
        let mut result = Value::Undefined;
        for stmt in block.statements.iter() {
            result = self.eval_statement(stmt, scope)?;
            if result.is_return_value() {
                return Ok(result);
            }
        }
        Ok(result)
    }

    fn eval_destructuring_let(
        &mut self,
        stmt: &ast::DestructuringLet,
        scope: &ScopeRef,
    ) -> Result<Value> {
        let value = self.eval_expression(&stmt.value, scope)?;
        let pairs = match &value {
            Value::Object(pairs) => pairs,
            other => {
                return Err(RuntimeError::NotAnObject {
                    found: ValueType::from(other),
                })
            }
        };

        for key in stmt.keys.iter() {
            // Absent keys bind undefined rather than failing.
            let bound = pairs
                .iter()
                .find(|(name, _)| name == &key.name)
                .map(|(_, v)| v.clone())
                .unwrap_or(Value::Undefined);
            scope.borrow_mut().define(&key.name, bound);
        }
        Ok(value)
    }

    fn eval_expression(&mut self, expr: &Expression, scope: &ScopeRef) -> Result<Value> {
        match expr {
            Expression::Identifier(ident) => self.lookup(&ident.name, scope),
            Expression::Number(literal) => Ok(Value::Number(literal.0)),
            Expression::String(literal) => Ok(Value::String(literal.0.clone())),
            Expression::Boolean(literal) => Ok(Value::Boolean(literal.0)),
            Expression::Binary(binary) => {
                let left = self.eval_expression(&binary.left, scope)?;
                let right = self.eval_expression(&binary.right, scope)?;
                eval_binary(binary.operator, left, right)
            }
            Expression::Pipeline(pipeline) => self.eval_pipeline(pipeline, scope),
            Expression::Call(call) => self.eval_call(call, scope),
            Expression::List(list) => {
                let elements = list
                    .elements
                    .iter()
                    .map(|element| self.eval_expression(element, scope))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::List(elements))
            }
            Expression::Object(object) => {
                let mut pairs = Vec::with_capacity(object.pairs.len());
                for (key, value) in object.pairs.iter() {
                    pairs.push((key.name.clone(), self.eval_expression(value, scope)?));
                }
                Ok(Value::Object(pairs))
            }
            Expression::Comprehension(comp) => self.eval_comprehension(comp, scope),
            Expression::Range(range) => self.eval_range(range, scope),
            Expression::Assign(assign) => {
                let value = self.eval_expression(&assign.value, scope)?;
                if scope.borrow_mut().assign(&assign.target.name, value.clone()) {
                    Ok(value)
                } else {
                    Err(RuntimeError::UndefinedVariable {
                        name: assign.target.name.clone(),
                    })
                }
            }
        }
    }

    fn lookup(&self, name: &str, scope: &ScopeRef) -> Result<Value> {
        scope
            .borrow()
            .get(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_owned(),
            })
    }

    fn eval_pipeline(
        &mut self,
        pipeline: &ast::PipelineExpression,
        scope: &ScopeRef,
    ) -> Result<Value> {
        let left = self.eval_expression(&pipeline.left, scope)?;

        let ident = match pipeline.right.as_ref() {
            Expression::Identifier(ident) => ident,
            _ => return Err(RuntimeError::PipelineCallee),
        };

        match self.lookup(&ident.name, scope)? {
            Value::Function(function) => {
                if function.parameters.len() != 1 {
                    return Err(RuntimeError::PipelineArity {
                        name: ident.name.clone(),
                        got: function.parameters.len(),
                    });
                }
                self.call_function(&function, vec![left])
            }
            _ => Err(RuntimeError::PipelineTarget {
                name: ident.name.clone(),
            }),
        }
    }

    fn eval_call(&mut self, call: &ast::CallExpression, scope: &ScopeRef) -> Result<Value> {
        let (callee, name) = match call.callee.as_ref() {
            Expression::Identifier(ident) => (self.lookup(&ident.name, scope)?, ident.name.clone()),
            expr => (self.eval_expression(expr, scope)?, expr.to_string()),
        };

        let arguments = call
            .arguments
            .iter()
            .map(|argument| self.eval_expression(argument, scope))
            .collect::<Result<Vec<_>>>()?;

        match callee {
            Value::Function(function) => {
                if arguments.len() != function.parameters.len() {
                    return Err(RuntimeError::WrongArgumentCount {
                        name,
                        expected: function.parameters.len(),
                        got: arguments.len(),
                    });
                }
                self.call_function(&function, arguments)
            }
            Value::Builtin(builtin) => (builtin.func)(arguments),
            _ => Err(RuntimeError::NotAFunction { name }),
        }
    }

    fn call_function(&mut self, function: &FunctionValue, arguments: Vec<Value>) -> Result<Value> {
        let scope = Scope::child(&function.scope);
        for (parameter, argument) in function.parameters.iter().zip(arguments) {
            scope.borrow_mut().define(&parameter.name, argument);
        }
        let result = self.eval_block(&function.body, &scope)?;
        Ok(result.unwrap_return())
    }

    fn eval_comprehension(
        &mut self,
        comp: &ast::ListComprehension,
        scope: &ScopeRef,
    ) -> Result<Value> {
        let source = match self.eval_expression(&comp.source, scope)? {
            Value::List(elements) => elements,
            other => {
                return Err(RuntimeError::NotIterable {
                    found: ValueType::from(&other),
                })
            }
        };

        let mut elements = Vec::with_capacity(source.len());
        for item in source {
            // Each element gets its own child scope for the binding.
            let inner = Scope::child(scope);
            inner.borrow_mut().define(&comp.binding.name, item);
            elements.push(self.eval_expression(&comp.element, &inner)?);
        }
        Ok(Value::List(elements))
    }

    fn eval_range(&mut self, range: &ast::RangeExpression, scope: &ScopeRef) -> Result<Value> {
        let low = self.eval_expression(&range.low, scope)?;
        let high = self.eval_expression(&range.high, scope)?;

        match (low, high) {
            (Value::Number(low), Value::Number(high)) => {
                let mut elements = Vec::new();
                let mut i = low;
                while i <= high {
                    elements.push(Value::Number(i));
                    i += 1.0;
                }
                Ok(Value::List(elements))
            }
            (Value::Number(_), other) | (other, _) => Err(RuntimeError::RangeBound {
                found: ValueType::from(&other),
            }),
        }
    }
}

fn is_primitive(value: &Value) -> bool {
    matches!(
        value,
        Value::Number(_) | Value::String(_) | Value::Boolean(_) | Value::Undefined
    )
}

fn eval_binary(operator: Operator, left: Value, right: Value) -> Result<Value> {
    match (operator, &left, &right) {
        (Operator::Plus, Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
        (Operator::Plus, Value::String(_), other) | (Operator::Plus, other, Value::String(_))
            if is_primitive(other) =>
        {
            Ok(Value::String(format!("{}{}", left, right)))
        }
        (Operator::Minus, Value::Number(l), Value::Number(r)) => Ok(Value::Number(l - r)),
        (Operator::Asterisk, Value::Number(l), Value::Number(r)) => Ok(Value::Number(l * r)),
        (Operator::Slash, Value::Number(l), Value::Number(r)) => Ok(Value::Number(l / r)),
        (Operator::LT, Value::Number(l), Value::Number(r)) => Ok(Value::Boolean(l < r)),
        (Operator::GT, Value::Number(l), Value::Number(r)) => Ok(Value::Boolean(l > r)),
        (Operator::LT, Value::String(l), Value::String(r)) => Ok(Value::Boolean(l < r)),
        (Operator::GT, Value::String(l), Value::String(r)) => Ok(Value::Boolean(l > r)),
        // Equality only covers primitive values. Containers would need
        // the reference semantics the JS backend's === has, which the
        // cloning evaluator cannot reproduce.
        (Operator::Eq, _, _) if is_primitive(&left) && is_primitive(&right) => {
            Ok(Value::Boolean(left == right))
        }
        _ => Err(RuntimeError::TypeMismatch {
            operator,
            left: ValueType::from(&left),
            right: ValueType::from(&right),
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn parse(input: &str) -> ast::Program {
        let tokens = Lexer::new(input.to_owned())
            .tokenize()
            .expect("lex errors found");
        Parser::new(tokens).parse_program().expect("parse errors found")
    }

    fn eval(input: &str) -> Value {
        Interpreter::new()
            .run(&parse(input))
            .expect("runtime error")
    }

    fn run_capture(input: &str) -> String {
        let mut interpreter = Interpreter::new();
        interpreter.run(&parse(input)).expect("runtime error");
        interpreter.take_output()
    }

    fn run_err(input: &str) -> RuntimeError {
        Interpreter::new()
            .run(&parse(input))
            .expect_err("expected a runtime error")
    }

    #[test]
    fn test_arithmetic() {
        let cases = vec![
            ("1 + 2 * 3", 7.0),
            ("(1 + 2) * 3", 9.0),
            ("10 - 4 / 2", 8.0),
            ("10 / 4", 2.5),
            ("2.5 + 2.5", 5.0),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(eval(input), Value::Number(expected), "{}", input);
        }
    }

    #[test]
    fn test_comparisons() {
        let cases = vec![
            ("1 < 2", true),
            ("2 < 1", false),
            ("2 > 1", true),
            ("1 == 1", true),
            ("1 == 2", false),
            ("\"a\" == \"a\"", true),
            ("1 == \"1\"", false),
            ("true == true", true),
            ("\"abc\" < \"abd\"", true),
            ("func f() { return }\nf() == f()", true),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(eval(input), Value::Boolean(expected), "{}", input);
        }
    }

    #[test]
    fn test_equality_rejects_containers() {
        let cases = vec![
            "[1, 2] == [1, 2]",
            "say { a: 1 } == { a: 1 }",
            "let xs = [1]\nxs == xs",
        ];

        for input in cases.into_iter() {
            assert!(
                matches!(run_err(input), RuntimeError::TypeMismatch { .. }),
                "{}",
                input
            );
        }
    }

    #[test]
    fn test_string_concatenation() {
        let cases = vec![
            ("\"foo\" + \"bar\"", "foobar"),
            ("\"n = \" + 42", "n = 42"),
            ("1 + \"x\"", "1x"),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(eval(input), Value::String(expected.to_owned()), "{}", input);
        }
    }

    #[test]
    fn test_concatenation_rejects_containers() {
        assert!(matches!(
            run_err("\"x\" + [1]"),
            RuntimeError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_say_output() {
        let cases = vec![
            ("say 5", "5\n"),
            ("say 10 / 4", "2.5\n"),
            ("say \"hello\"", "hello\n"),
            ("say [1, 2, 3]", "[ 1, 2, 3 ]\n"),
            ("say []", "[]\n"),
            ("say [\"a\", 1]", "[ 'a', 1 ]\n"),
            ("say { a: 1, b: \"x\" }", "{ a: 1, b: 'x' }\n"),
            ("say 1 == 1", "true\n"),
            ("say 1..5", "[ 1, 2, 3, 4, 5 ]\n"),
            ("say 1\nsay 2", "1\n2\n"),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(run_capture(input), expected, "{}", input);
        }
    }

    #[test]
    fn test_let_bindings() {
        assert_eq!(eval("let x = 5\nlet y = x * 2\ny + 1"), Value::Number(11.0));
    }

    #[test]
    fn test_functions_and_calls() {
        let input = "
func addOne(x) { return x + 1 }
func double(x) { return x * 2 }
say double(addOne(10))
";
        assert_eq!(run_capture(input), "22\n");
    }

    #[test]
    fn test_implicit_return() {
        let cases = vec![
            ("func f() { 42 }\nf()", Value::Number(42.0)),
            ("func f() { let x = 9 }\nf()", Value::Number(9.0)),
            ("func f() { say 1 }\nf()", Value::Undefined),
            ("func f() { return }\nf()", Value::Undefined),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(eval(input), expected, "{}", input);
        }
    }

    #[test]
    fn test_return_short_circuits() {
        let input = "
func f(x) {
    if x > 0 { return \"positive\" }
    return \"non-positive\"
}
say f(1)
say f(0)
";
        assert_eq!(run_capture(input), "positive\nnon-positive\n");
    }

    #[test]
    fn test_closures() {
        let input = "
func outer(x) {
    func inner(y) { return x + y }
    return inner
}
let add5 = outer(5)
say add5(3)
";
        assert_eq!(run_capture(input), "8\n");
    }

    #[test]
    fn test_pipeline() {
        let input = "
func addOne(x) { return x + 1 }
func double(x) { return x * 2 }
say 10 |> addOne |> double
";
        assert_eq!(run_capture(input), "22\n");
    }

    #[test]
    fn test_pipeline_rejects_non_function() {
        let err = run_err("let x = 1\n5 |> x");
        assert_eq!(
            err.to_string(),
            "'x' is not a function and cannot be used in a pipeline."
        );
    }

    #[test]
    fn test_pipeline_arity() {
        let err = run_err("func add(a, b) { return a + b }\n5 |> add");
        assert_eq!(
            err.to_string(),
            "Function add in pipeline expects 1 argument but got 2"
        );
    }

    #[test]
    fn test_comprehension() {
        let cases = vec![
            ("say [ x * x | x in [1, 2, 3] ]", "[ 1, 4, 9 ]\n"),
            ("say [ x + 1 | x in 1..3 ]", "[ 2, 3, 4 ]\n"),
            ("say [ x | x in [] ]", "[]\n"),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(run_capture(input), expected, "{}", input);
        }
    }

    #[test]
    fn test_nested_comprehension() {
        let input = "
let matrix = [[1, 2], [3, 4]]
say [ [ x * 2 | x in row ] | row in matrix ]
";
        assert_eq!(run_capture(input), "[ [ 2, 4 ], [ 6, 8 ] ]\n");
    }

    #[test]
    fn test_comprehension_binding_does_not_leak() {
        let err = run_err("let sq = [ x * x | x in [1, 2] ]\nsay x");
        assert_eq!(err.to_string(), "Undefined variable 'x'");
    }

    #[test]
    fn test_comprehension_binding_shadows_outer_name() {
        let input = "
let x = 99
say [ x + 1 | x in [1, 2] ]
say x
";
        assert_eq!(run_capture(input), "[ 2, 3 ]\n99\n");
    }

    #[test]
    fn test_comprehension_source_must_be_list() {
        assert!(matches!(
            run_err("[ x | x in 5 ]"),
            RuntimeError::NotIterable { .. }
        ));
    }

    #[test]
    fn test_destructuring() {
        let input = "
let { a, b } = { a: 100, b: 200 }
say a + b
";
        assert_eq!(run_capture(input), "300\n");
    }

    #[test]
    fn test_destructuring_missing_key() {
        assert_eq!(run_capture("let { a, c } = { a: 1 }\nsay c"), "undefined\n");
    }

    #[test]
    fn test_destructuring_non_object() {
        assert!(matches!(
            run_err("let { a } = [1, 2]"),
            RuntimeError::NotAnObject { .. }
        ));
    }

    #[test]
    fn test_while_and_assignment() {
        let input = "
let i = 0
let total = 0
while i < 5 {
    total = total + i
    i = i + 1
}
say total
";
        assert_eq!(run_capture(input), "10\n");
    }

    #[test]
    fn test_return_breaks_out_of_while() {
        let input = "
func firstOver(limit) {
    let i = 0
    while true {
        i = i + 1
        if i > limit { return i }
    }
}
say firstOver(2)
";
        assert_eq!(run_capture(input), "3\n");
    }

    #[test]
    fn test_truthiness() {
        let cases = vec![
            ("if 0 { say 1 } else { say 2 }", "2\n"),
            ("if \"\" { say 1 } else { say 2 }", "2\n"),
            ("if [] { say 1 } else { say 2 }", "1\n"),
            ("if 3 { say 1 } else { say 2 }", "1\n"),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(run_capture(input), expected, "{}", input);
        }
    }

    #[test]
    fn test_else_if_chain() {
        let input = "
func grade(x) {
    if x < 10 { return \"low\" } else if x < 20 { return \"mid\" } else { return \"high\" }
}
say grade(5)
say grade(15)
say grade(25)
";
        assert_eq!(run_capture(input), "low\nmid\nhigh\n");
    }

    #[test]
    fn test_undefined_variable_message() {
        assert_eq!(run_err("say nope").to_string(), "Undefined variable 'nope'");
    }

    #[test]
    fn test_not_a_function_message() {
        assert_eq!(run_err("let x = 5\nx(1)").to_string(), "'x' is not a function");
    }

    #[test]
    fn test_wrong_argument_count() {
        let err = run_err("func add(a, b) { return a + b }\nadd(1)");
        assert_eq!(err.to_string(), "Function add expects 2 arguments but got 1");
    }

    #[test]
    fn test_assignment_to_unbound_name() {
        assert_eq!(run_err("x = 1").to_string(), "Undefined variable 'x'");
    }

    #[test]
    fn test_type_mismatch() {
        assert!(matches!(
            run_err("[1] - 2"),
            RuntimeError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_output_preserved_on_error() {
        let mut interpreter = Interpreter::new();
        let result = interpreter.run(&parse("say 1\nsay nope\nsay 2"));

        assert!(result.is_err());
        assert_eq!(interpreter.output(), "1\n");
    }

    #[test]
    fn test_bindings_persist_across_runs() {
        let mut interpreter = Interpreter::new();
        interpreter
            .run(&parse("let x = 40"))
            .expect("runtime error");
        assert_eq!(
            interpreter.run(&parse("x + 2")).expect("runtime error"),
            Value::Number(42.0)
        );
    }

    #[test]
    fn test_repeated_let_rebinds() {
        assert_eq!(run_capture("let x = 1\nlet x = 2\nsay x"), "2\n");
    }

    #[test]
    fn test_builtin_read_file_is_defined() {
        assert!(matches!(
            run_err("read_file(\"/no/such/file.upl\")"),
            RuntimeError::FileRead { .. }
        ));
    }
}
