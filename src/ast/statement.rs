use super::{Expression, Identifier};
use std::fmt::{Display, Formatter};
use strum_macros::EnumDiscriminants;

#[derive(Debug, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(derive(strum_macros::Display))]
#[strum_discriminants(name(StatementKind))]
pub enum Statement {
    Let(LetStatement),
    DestructuringLet(DestructuringLet),
    Func(FuncStatement),
    Return(ReturnStatement),
    Say(SayStatement),
    If(IfStatement),
    While(WhileStatement),
    Block(BlockStatement),
    Expr(ExpressionStatement),
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Let(stmt) => write!(f, "{}", stmt),
            Self::DestructuringLet(stmt) => write!(f, "{}", stmt),
            Self::Func(stmt) => write!(f, "{}", stmt),
            Self::Return(stmt) => write!(f, "{}", stmt),
            Self::Say(stmt) => write!(f, "{}", stmt),
            Self::If(stmt) => write!(f, "{}", stmt),
            Self::While(stmt) => write!(f, "{}", stmt),
            Self::Block(stmt) => write!(f, "{}", stmt),
            Self::Expr(stmt) => write!(f, "{}", stmt),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetStatement {
    pub name: Identifier,
    pub value: Expression,
}

impl Display for LetStatement {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "let {} = {};", self.name, self.value)
    }
}

/// `let { a, b } = expr` — binding names must match the object keys;
/// absent keys bind the undefined sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct DestructuringLet {
    pub keys: Vec<Identifier>,
    pub value: Expression,
}

impl Display for DestructuringLet {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let keys: Vec<String> = self.keys.iter().map(Identifier::to_string).collect();
        write!(f, "let {{ {} }} = {};", keys.join(", "), self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncStatement {
    pub name: Identifier,
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
}

impl Display for FuncStatement {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let parameters: Vec<String> = self.parameters.iter().map(Identifier::to_string).collect();
        write!(f, "func {}({}) {}", self.name, parameters.join(", "), self.body)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Option<Expression>,
}

impl Display for ReturnStatement {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "return {};", value),
            None => write!(f, "return;"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SayStatement {
    pub value: Expression,
}

impl Display for SayStatement {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "say {};", self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Expression,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
}

impl Display for IfStatement {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "if {} {}", self.condition, self.consequence)?;
        if let Some(alternative) = &self.alternative {
            write!(f, " else {}", alternative)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: BlockStatement,
}

impl Display for WhileStatement {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "while {} {}", self.condition, self.body)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{{ ")?;
        for stmt in self.statements.iter() {
            write!(f, "{} ", stmt)?;
        }
        write!(f, "}}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Expression,
}

impl Display for ExpressionStatement {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.expression)
    }
}
