use crate::ast::{self, Expression, ExpressionKind, Operator, Statement, StatementKind};
use custom_error::custom_error;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub CompileError

    UnsupportedStatement{kind: StatementKind} = "cannot compile {kind} statements to JavaScript",
    UnsupportedExpression{kind: ExpressionKind} = "cannot compile {kind} expressions to JavaScript",
}

pub type Result<T> = std::result::Result<T, CompileError>;

/// Translates a program into plain JavaScript. The output is meant to
/// behave identically to running the same program in the interpreter,
/// so binary expressions are emitted fully parenthesized and `==`
/// becomes the strict `===`.
#[derive(Debug, Default)]
pub struct Compiler;

impl Compiler {
    pub fn compile(&self, program: &ast::Program) -> Result<String> {
        let statements = program
            .statements
            .iter()
            .map(|stmt| self.compile_statement(stmt))
            .collect::<Result<Vec<_>>>()?;
        Ok(statements.join("\n"))
    }

    fn compile_statement(&self, stmt: &Statement) -> Result<String> {
        match stmt {
            Statement::Let(stmt) => Ok(format!(
                "let {} = {};",
                stmt.name,
                self.compile_expression(&stmt.value)?
            )),
            Statement::DestructuringLet(stmt) => {
                let keys: Vec<String> = stmt.keys.iter().map(ToString::to_string).collect();
                Ok(format!(
                    "let {{ {} }} = {};",
                    keys.join(", "),
                    self.compile_expression(&stmt.value)?
                ))
            }
            Statement::Func(stmt) => {
                let parameters: Vec<String> =
                    stmt.parameters.iter().map(ToString::to_string).collect();
                Ok(format!(
                    "function {}({}) {}",
                    stmt.name,
                    parameters.join(", "),
                    self.compile_block(&stmt.body)?
                ))
            }
            Statement::Return(stmt) => match &stmt.value {
                Some(value) => Ok(format!("return {};", self.compile_expression(value)?)),
                None => Ok("return;".to_owned()),
            },
            Statement::Say(stmt) => Ok(format!(
                "console.log({});",
                self.compile_expression(&stmt.value)?
            )),
            Statement::If(stmt) => {
                let mut result = format!(
                    "if ({}) {}",
                    self.compile_expression(&stmt.condition)?,
                    self.compile_block(&stmt.consequence)?
                );
                if let Some(alternative) = &stmt.alternative {
                    result.push_str(&format!(" else {}", self.compile_block(alternative)?));
                }
                Ok(result)
            }
            Statement::While(_) => Err(CompileError::UnsupportedStatement {
                kind: StatementKind::While,
            }),
            Statement::Block(block) => self.compile_block(block),
            Statement::Expr(stmt) => {
                Ok(format!("{};", self.compile_expression(&stmt.expression)?))
            }
        }
    }

    fn compile_block(&self, block: &ast::BlockStatement) -> Result<String> {
        let statements = block
            .statements
            .iter()
            .map(|stmt| self.compile_statement(stmt))
            .collect::<Result<Vec<_>>>()?;
        Ok(format!("{{\n{}\n}}", statements.join("\n")))
    }

    fn compile_expression(&self, expr: &Expression) -> Result<String> {
        match expr {
            Expression::Identifier(ident) => Ok(ident.name.clone()),
            Expression::Number(literal) => Ok(literal.0.to_string()),
            Expression::String(literal) => Ok(format!("\"{}\"", literal.0)),
            Expression::Boolean(literal) => Ok(literal.0.to_string()),
            Expression::Binary(binary) => {
                let operator = match binary.operator {
                    Operator::Eq => "===".to_owned(),
                    operator => operator.to_string(),
                };
                Ok(format!(
                    "({} {} {})",
                    self.compile_expression(&binary.left)?,
                    operator,
                    self.compile_expression(&binary.right)?
                ))
            }
            Expression::Pipeline(pipeline) => Ok(format!(
                "{}({})",
                self.compile_expression(&pipeline.right)?,
                self.compile_expression(&pipeline.left)?
            )),
            Expression::Call(call) => {
                let arguments = call
                    .arguments
                    .iter()
                    .map(|argument| self.compile_expression(argument))
                    .collect::<Result<Vec<_>>>()?;
                Ok(format!(
                    "{}({})",
                    self.compile_expression(&call.callee)?,
                    arguments.join(", ")
                ))
            }
            Expression::List(list) => {
                let elements = list
                    .elements
                    .iter()
                    .map(|element| self.compile_expression(element))
                    .collect::<Result<Vec<_>>>()?;
                Ok(format!("[{}]", elements.join(", ")))
            }
            Expression::Object(object) => {
                if object.pairs.is_empty() {
                    return Ok("{}".to_owned());
                }
                let pairs = object
                    .pairs
                    .iter()
                    .map(|(key, value)| {
                        Ok(format!("{}: {}", key, self.compile_expression(value)?))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(format!("{{ {} }}", pairs.join(", ")))
            }
            Expression::Comprehension(comp) => Ok(format!(
                "{}.map({} => {})",
                self.compile_expression(&comp.source)?,
                comp.binding,
                self.compile_expression(&comp.element)?
            )),
            Expression::Range(range) => Ok(format!(
                "(() => {{ const r = []; for (let i = {}; i <= {}; i++) r.push(i); return r; }})()",
                self.compile_expression(&range.low)?,
                self.compile_expression(&range.high)?
            )),
            Expression::Assign(_) => Err(CompileError::UnsupportedExpression {
                kind: ExpressionKind::Assign,
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn compile(input: &str) -> String {
        let tokens = Lexer::new(input.to_owned())
            .tokenize()
            .expect("lex errors found");
        let program = Parser::new(tokens).parse_program().expect("parse errors found");
        Compiler::default()
            .compile(&program)
            .expect("compile error")
    }

    fn compile_err(input: &str) -> CompileError {
        let tokens = Lexer::new(input.to_owned())
            .tokenize()
            .expect("lex errors found");
        let program = Parser::new(tokens).parse_program().expect("parse errors found");
        Compiler::default()
            .compile(&program)
            .expect_err("expected a compile error")
    }

    #[test]
    fn test_let_and_say() {
        assert_eq!(
            compile("let x = 5\nsay x"),
            "let x = 5;\nconsole.log(x);"
        );
    }

    #[test]
    fn test_binary_expressions_are_parenthesized() {
        let cases = vec![
            ("say 1 + 2 * 3", "console.log((1 + (2 * 3)));"),
            ("say (1 + 2) * 3", "console.log(((1 + 2) * 3));"),
            ("say a == b", "console.log((a === b));"),
            ("say a < b", "console.log((a < b));"),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(compile(input), expected, "{}", input);
        }
    }

    #[test]
    fn test_function_declaration() {
        assert_eq!(
            compile("func addOne(x) { return x + 1 }"),
            "function addOne(x) {\nreturn (x + 1);\n}"
        );
    }

    #[test]
    fn test_pipeline_becomes_nested_calls() {
        assert_eq!(
            compile("say 10 |> addOne |> double"),
            "console.log(double(addOne(10)));"
        );
    }

    #[test]
    fn test_range_becomes_iife() {
        assert_eq!(
            compile("let r = 1..5"),
            "let r = (() => { const r = []; for (let i = 1; i <= 5; i++) r.push(i); return r; })();"
        );
    }

    #[test]
    fn test_comprehension_becomes_map() {
        assert_eq!(
            compile("let sq = [ x * x | x in list ]"),
            "let sq = list.map(x => (x * x));"
        );
    }

    #[test]
    fn test_literals() {
        let cases = vec![
            ("say \"hi\"", "console.log(\"hi\");"),
            ("say true", "console.log(true);"),
            ("say 2.5", "console.log(2.5);"),
            ("say [1, 2, 3]", "console.log([1, 2, 3]);"),
            ("say { a: 1, b: 2 }", "console.log({ a: 1, b: 2 });"),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(compile(input), expected, "{}", input);
        }
    }

    #[test]
    fn test_destructuring_let() {
        assert_eq!(
            compile("let { a, b } = config"),
            "let { a, b } = config;"
        );
    }

    #[test]
    fn test_if_else() {
        assert_eq!(
            compile("if x < 1 { say 1 } else { say 2 }"),
            "if ((x < 1)) {\nconsole.log(1);\n} else {\nconsole.log(2);\n}"
        );
    }

    #[test]
    fn test_while_is_unsupported() {
        let err = compile_err("while x < 10 { say x }");
        assert_eq!(err.to_string(), "cannot compile While statements to JavaScript");
    }

    #[test]
    fn test_assignment_is_unsupported() {
        let err = compile_err("let x = 1\nx = 2");
        assert_eq!(err.to_string(), "cannot compile Assign expressions to JavaScript");
    }
}
