use crate::ast;
use crate::ast::{Expression, Operator, Statement};
use crate::token::{Token, TokenKind, TokenType};
use custom_error::custom_error;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub ParseError

    UnexpectedToken{expected: String, found: String, line: usize, column: usize} = "expected {expected} but found {found} at {line}:{column}",
    InvalidNumber{literal: String, line: usize, column: usize} = "invalid numeric literal '{literal}' at {line}:{column}",
    InvalidAssignment{target: String, line: usize, column: usize} = "invalid assignment target '{target}' at {line}:{column}",
}

/// Binding powers for the precedence-climbing loop; the pipeline binds
/// loosest and the range operator tightest.
const PRECEDENCE_PIPELINE: u8 = 1;
const PRECEDENCE_COMPARISON: u8 = 2;
const PRECEDENCE_ADDITIVE: u8 = 3;
const PRECEDENCE_MULTIPLICATIVE: u8 = 4;
const PRECEDENCE_RANGE: u8 = 5;

enum Infix {
    Binary(Operator),
    Pipeline,
    Range,
}

fn infix_operator(kind: &TokenKind) -> Option<(Infix, u8)> {
    Some(match TokenType::from(kind) {
        TokenType::PipeOp => (Infix::Pipeline, PRECEDENCE_PIPELINE),
        TokenType::LT => (Infix::Binary(Operator::LT), PRECEDENCE_COMPARISON),
        TokenType::GT => (Infix::Binary(Operator::GT), PRECEDENCE_COMPARISON),
        TokenType::Eq => (Infix::Binary(Operator::Eq), PRECEDENCE_COMPARISON),
        TokenType::Plus => (Infix::Binary(Operator::Plus), PRECEDENCE_ADDITIVE),
        TokenType::Minus => (Infix::Binary(Operator::Minus), PRECEDENCE_ADDITIVE),
        TokenType::Asterisk => (Infix::Binary(Operator::Asterisk), PRECEDENCE_MULTIPLICATIVE),
        TokenType::Slash => (Infix::Binary(Operator::Slash), PRECEDENCE_MULTIPLICATIVE),
        TokenType::DotDot => (Infix::Range, PRECEDENCE_RANGE),
        _ => return None,
    })
}

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// The token stream must end with an Eof token, as produced by
    /// `Lexer::tokenize`.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn parse_program(mut self) -> Result<ast::Program, ParseError> {
        let mut program = ast::Program::default();

        while !self.current().is(TokenType::Eof) {
            program.statements.push(self.parse_statement()?);
        }

        Ok(program)
    }

    fn current(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.position].clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    fn matches(&mut self, expected: TokenType) -> bool {
        if self.current().is(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, expected: TokenType) -> Result<Token, ParseError> {
        if self.current().is(expected) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&expected.to_string()))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.current();
        ParseError::UnexpectedToken {
            expected: expected.to_owned(),
            found: TokenType::from(&token.kind).to_string(),
            line: token.line,
            column: token.column,
        }
    }

    fn consume_identifier(&mut self) -> Result<ast::Identifier, ParseError> {
        let err = self.unexpected("Ident");
        match self.current().kind {
            TokenKind::Ident(_) => {}
            _ => return Err(err),
        }
        match self.advance().kind {
            TokenKind::Ident(name) => Ok(ast::Identifier { name }),
            _ => Err(err),
        }
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match TokenType::from(&self.current().kind) {
            TokenType::Let => self.parse_let_statement(),
            TokenType::Func => self.parse_func_statement().map(Statement::Func),
            TokenType::Say => self.parse_say_statement().map(Statement::Say),
            TokenType::Return => self.parse_return_statement().map(Statement::Return),
            TokenType::If => self.parse_if_statement().map(Statement::If),
            TokenType::While => self.parse_while_statement().map(Statement::While),
            TokenType::LBrace => self.parse_block().map(Statement::Block),
            _ => self.parse_expression_statement().map(Statement::Expr),
        }
    }

    fn parse_let_statement(&mut self) -> Result<Statement, ParseError> {
        self.consume(TokenType::Let)?;

        if self.matches(TokenType::LBrace) {
            let mut keys = Vec::new();
            if !self.current().is(TokenType::RBrace) {
                loop {
                    keys.push(self.consume_identifier()?);
                    if !self.matches(TokenType::Comma) {
                        break;
                    }
                }
            }
            self.consume(TokenType::RBrace)?;
            self.consume(TokenType::Assign)?;
            let value = self.parse_expression()?;
            self.matches(TokenType::Semicolon);
            return Ok(Statement::DestructuringLet(ast::DestructuringLet {
                keys,
                value,
            }));
        }

        let name = self.consume_identifier()?;
        self.consume(TokenType::Assign)?;
        let value = self.parse_expression()?;
        self.matches(TokenType::Semicolon);
        Ok(Statement::Let(ast::LetStatement { name, value }))
    }

    fn parse_func_statement(&mut self) -> Result<ast::FuncStatement, ParseError> {
        self.consume(TokenType::Func)?;
        let name = self.consume_identifier()?;

        self.consume(TokenType::LParen)?;
        let mut parameters = Vec::new();
        if !self.current().is(TokenType::RParen) {
            loop {
                parameters.push(self.consume_identifier()?);
                if !self.matches(TokenType::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenType::RParen)?;

        let body = self.parse_block()?;
        Ok(ast::FuncStatement {
            name,
            parameters,
            body,
        })
    }

    fn parse_say_statement(&mut self) -> Result<ast::SayStatement, ParseError> {
        self.consume(TokenType::Say)?;
        let value = self.parse_expression()?;
        self.matches(TokenType::Semicolon);
        Ok(ast::SayStatement { value })
    }

    fn parse_return_statement(&mut self) -> Result<ast::ReturnStatement, ParseError> {
        self.consume(TokenType::Return)?;

        let at_end = self.current().is(TokenType::Semicolon)
            || self.current().is(TokenType::RBrace)
            || self.current().is(TokenType::Eof);
        let value = if at_end {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.matches(TokenType::Semicolon);
        Ok(ast::ReturnStatement { value })
    }

    fn parse_if_statement(&mut self) -> Result<ast::IfStatement, ParseError> {
        self.consume(TokenType::If)?;
        let condition = self.parse_expression()?;
        let consequence = self.parse_block()?;

        let alternative = if self.matches(TokenType::Else) {
            if self.current().is(TokenType::If) {
                // `else if` chains wrap the nested if in a block
                Some(ast::BlockStatement {
                    statements: vec![Statement::If(self.parse_if_statement()?)],
                })
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };

        Ok(ast::IfStatement {
            condition,
            consequence,
            alternative,
        })
    }

    fn parse_while_statement(&mut self) -> Result<ast::WhileStatement, ParseError> {
        self.consume(TokenType::While)?;
        let condition = self.parse_expression()?;
        let body = self.parse_block()?;
        Ok(ast::WhileStatement { condition, body })
    }

    fn parse_block(&mut self) -> Result<ast::BlockStatement, ParseError> {
        self.consume(TokenType::LBrace)?;

        let mut statements = Vec::new();
        while !self.current().is(TokenType::RBrace) && !self.current().is(TokenType::Eof) {
            statements.push(self.parse_statement()?);
        }

        self.consume(TokenType::RBrace)?;
        Ok(ast::BlockStatement { statements })
    }

    fn parse_expression_statement(&mut self) -> Result<ast::ExpressionStatement, ParseError> {
        let expression = self.parse_expression()?;
        self.matches(TokenType::Semicolon);
        Ok(ast::ExpressionStatement { expression })
    }

    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let left = self.parse_binary_expression(PRECEDENCE_PIPELINE)?;

        if self.current().is(TokenType::Assign) {
            let token = self.advance();
            let value = self.parse_expression()?;
            return match left {
                Expression::Identifier(target) => Ok(Expression::Assign(ast::AssignExpression {
                    target,
                    value: Box::new(value),
                })),
                expr => Err(ParseError::InvalidAssignment {
                    target: expr.to_string(),
                    line: token.line,
                    column: token.column,
                }),
            };
        }

        Ok(left)
    }

    fn parse_binary_expression(&mut self, min_precedence: u8) -> Result<Expression, ParseError> {
        let mut left = self.parse_primary()?;

        loop {
            let (infix, precedence) = match infix_operator(&self.current().kind) {
                Some((infix, precedence)) if precedence >= min_precedence => (infix, precedence),
                _ => break,
            };
            self.advance();

            let right = self.parse_binary_expression(precedence + 1)?;
            left = match infix {
                Infix::Pipeline => Expression::Pipeline(ast::PipelineExpression {
                    left: Box::new(left),
                    right: Box::new(right),
                }),
                Infix::Range => Expression::Range(ast::RangeExpression {
                    low: Box::new(left),
                    high: Box::new(right),
                }),
                Infix::Binary(operator) => Expression::Binary(ast::BinaryExpression {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                }),
            };
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        match TokenType::from(&self.current().kind) {
            TokenType::Number => {
                let token = self.advance();
                // Taken out before the match so the error arm does not
                // capture the partially moved token.
                let (line, column) = (token.line, token.column);
                match token.kind {
                    TokenKind::Number(literal) => literal
                        .parse()
                        .map(|value| Expression::Number(ast::NumberLiteral(value)))
                        .map_err(|_| ParseError::InvalidNumber {
                            literal,
                            line,
                            column,
                        }),
                    _ => Err(self.unexpected("an expression")),
                }
            }
            TokenType::Str => {
                let token = self.advance();
                match token.kind {
                    TokenKind::Str(literal) => Ok(Expression::String(ast::StringLiteral(literal))),
                    _ => Err(self.unexpected("an expression")),
                }
            }
            TokenType::True => {
                self.advance();
                Ok(Expression::Boolean(ast::BooleanLiteral(true)))
            }
            TokenType::False => {
                self.advance();
                Ok(Expression::Boolean(ast::BooleanLiteral(false)))
            }
            TokenType::Ident => {
                let mut expr = Expression::Identifier(self.consume_identifier()?);
                while self.matches(TokenType::LParen) {
                    expr = self.finish_call(expr)?;
                }
                Ok(expr)
            }
            TokenType::LBracket => self.parse_list_or_comprehension(),
            TokenType::LBrace => self.parse_object_literal(),
            TokenType::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.consume(TokenType::RParen)?;
                Ok(expr)
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn finish_call(&mut self, callee: Expression) -> Result<Expression, ParseError> {
        let mut arguments = Vec::new();
        if !self.current().is(TokenType::RParen) {
            loop {
                arguments.push(self.parse_expression()?);
                if !self.matches(TokenType::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenType::RParen)?;
        Ok(Expression::Call(ast::CallExpression {
            callee: Box::new(callee),
            arguments,
        }))
    }

    /// `[a, b, c]` or `[ expr | name in source ]`, disambiguated on the
    /// `|` following the first expression.
    fn parse_list_or_comprehension(&mut self) -> Result<Expression, ParseError> {
        self.consume(TokenType::LBracket)?;

        if self.matches(TokenType::RBracket) {
            return Ok(Expression::List(ast::ListLiteral { elements: vec![] }));
        }

        let first = self.parse_expression()?;

        if self.matches(TokenType::Pipe) {
            let binding = self.consume_identifier()?;
            self.consume(TokenType::In)?;
            let source = self.parse_expression()?;
            self.consume(TokenType::RBracket)?;
            return Ok(Expression::Comprehension(ast::ListComprehension {
                element: Box::new(first),
                binding,
                source: Box::new(source),
            }));
        }

        let mut elements = vec![first];
        while self.matches(TokenType::Comma) {
            if self.current().is(TokenType::RBracket) {
                break; // trailing comma
            }
            elements.push(self.parse_expression()?);
        }
        self.consume(TokenType::RBracket)?;
        Ok(Expression::List(ast::ListLiteral { elements }))
    }

    fn parse_object_literal(&mut self) -> Result<Expression, ParseError> {
        self.consume(TokenType::LBrace)?;

        let mut pairs = Vec::new();
        if !self.current().is(TokenType::RBrace) {
            loop {
                let key = self.consume_identifier()?;
                self.consume(TokenType::Colon)?;
                let value = self.parse_expression()?;
                pairs.push((key, value));
                if !self.matches(TokenType::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenType::RBrace)?;
        Ok(Expression::Object(ast::ObjectLiteral { pairs }))
    }
}
