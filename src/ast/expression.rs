use super::Identifier;
use derive_more::Display;
use std::fmt::{self, Formatter};
use strum_macros::EnumDiscriminants;

#[derive(Display, Debug, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(derive(strum_macros::Display))]
#[strum_discriminants(name(ExpressionKind))]
pub enum Expression {
    Identifier(Identifier),
    Number(NumberLiteral),
    String(StringLiteral),
    Boolean(BooleanLiteral),
    Binary(BinaryExpression),
    Pipeline(PipelineExpression),
    Call(CallExpression),
    List(ListLiteral),
    Object(ObjectLiteral),
    Comprehension(ListComprehension),
    Range(RangeExpression),
    Assign(AssignExpression),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Operator {
    #[strum(to_string = "+")]
    Plus,
    #[strum(to_string = "-")]
    Minus,
    #[strum(to_string = "*")]
    Asterisk,
    #[strum(to_string = "/")]
    Slash,
    #[strum(to_string = "<")]
    LT,
    #[strum(to_string = ">")]
    GT,
    #[strum(to_string = "==")]
    Eq,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberLiteral(pub f64);

impl fmt::Display for NumberLiteral {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral(pub String);

impl fmt::Display for StringLiteral {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BooleanLiteral(pub bool);

impl fmt::Display for BooleanLiteral {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub left: Box<Expression>,
    pub operator: Operator,
    pub right: Box<Expression>,
}

impl fmt::Display for BinaryExpression {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator, self.right)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineExpression {
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

impl fmt::Display for PipelineExpression {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "({} |> {})", self.left, self.right)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
}

impl fmt::Display for CallExpression {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let arguments: Vec<String> = self.arguments.iter().map(Expression::to_string).collect();
        write!(f, "{}({})", self.callee, arguments.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListLiteral {
    pub elements: Vec<Expression>,
}

impl fmt::Display for ListLiteral {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let elements: Vec<String> = self.elements.iter().map(Expression::to_string).collect();
        write!(f, "[{}]", elements.join(", "))
    }
}

impl From<Vec<Expression>> for ListLiteral {
    fn from(elements: Vec<Expression>) -> Self {
        Self { elements }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLiteral {
    pub pairs: Vec<(Identifier, Expression)>,
}

impl fmt::Display for ObjectLiteral {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let pairs: Vec<String> = self
            .pairs
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect();
        write!(f, "{{ {} }}", pairs.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListComprehension {
    pub element: Box<Expression>,
    pub binding: Identifier,
    pub source: Box<Expression>,
}

impl fmt::Display for ListComprehension {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[{} | {} in {}]", self.element, self.binding, self.source)
    }
}

/// Inclusive integer range `low..high`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeExpression {
    pub low: Box<Expression>,
    pub high: Box<Expression>,
}

impl fmt::Display for RangeExpression {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}..{}", self.low, self.high)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpression {
    pub target: Identifier,
    pub value: Box<Expression>,
}

impl fmt::Display for AssignExpression {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.target, self.value)
    }
}
