mod runtime_error;
pub use runtime_error::RuntimeError;

use crate::ast::{BlockStatement, Identifier};
use crate::scope::ScopeRef;
use std::fmt::{self, Formatter};
use strum_macros::EnumDiscriminants;

pub type Result<T> = std::result::Result<T, RuntimeError>;

pub type BuiltinFn = fn(Vec<Value>) -> Result<Value>;

#[derive(Debug, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(derive(strum_macros::Display))]
#[strum_discriminants(name(ValueType))]
pub enum Value {
    Number(f64),
    String(String),
    Boolean(bool),
    List(Vec<Value>),
    Object(Vec<(String, Value)>),
    Function(FunctionValue),
    Builtin(BuiltinFunction),
    ReturnValue(Box<Value>),
    Undefined,
}

impl Value {
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Boolean(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Undefined => false,
            _ => true,
        }
    }

    pub fn is_return_value(&self) -> bool {
        matches!(self, Self::ReturnValue(_))
    }

    pub fn unwrap_return(self) -> Self {
        match self {
            Self::ReturnValue(value) => *value,
            value => value,
        }
    }

    /// Rendering used for elements inside lists and objects, where
    /// strings keep their quotes. Top-level Display prints them bare.
    fn inspect(&self) -> String {
        match self {
            Self::String(s) => format!("'{}'", s),
            value => value.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "{}", s),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::List(elements) => {
                if elements.is_empty() {
                    return write!(f, "[]");
                }
                let elements: Vec<String> = elements.iter().map(Value::inspect).collect();
                write!(f, "[ {} ]", elements.join(", "))
            }
            Self::Object(pairs) => {
                if pairs.is_empty() {
                    return write!(f, "{{}}");
                }
                let pairs: Vec<String> = pairs
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, value.inspect()))
                    .collect();
                write!(f, "{{ {} }}", pairs.join(", "))
            }
            Self::Function(function) => write!(f, "[Function: {}]", function.name),
            Self::Builtin(builtin) => write!(f, "[Function: {}]", builtin.name),
            Self::ReturnValue(value) => write!(f, "{}", value),
            Self::Undefined => write!(f, "undefined"),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Self::List(elements)
    }
}

/// A user-defined function together with the scope it closes over.
#[derive(Clone)]
pub struct FunctionValue {
    pub name: String,
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub scope: ScopeRef,
}

// The captured scope can contain the function itself, so the derived
// Debug and PartialEq impls would recurse forever through it.
impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish()
    }
}

impl PartialEq for FunctionValue {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.parameters == other.parameters
            && self.body == other.body
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub func: BuiltinFn,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display() {
        let cases: Vec<(Value, &str)> = vec![
            (Value::Number(5.0), "5"),
            (Value::Number(2.5), "2.5"),
            (Value::String("hello".to_owned()), "hello"),
            (Value::Boolean(true), "true"),
            (Value::Undefined, "undefined"),
            (Value::List(vec![]), "[]"),
            (
                Value::List(vec![1.0.into(), 2.0.into(), 3.0.into()]),
                "[ 1, 2, 3 ]",
            ),
            (
                Value::List(vec!["a".into(), 1.0.into()]),
                "[ 'a', 1 ]",
            ),
            (
                Value::List(vec![Value::List(vec![1.0.into()]), Value::List(vec![])]),
                "[ [ 1 ], [] ]",
            ),
            (Value::Object(vec![]), "{}"),
            (
                Value::Object(vec![
                    ("a".to_owned(), 100.0.into()),
                    ("b".to_owned(), "x".into()),
                ]),
                "{ a: 100, b: 'x' }",
            ),
            (
                Value::ReturnValue(Box::new(Value::Number(7.0))),
                "7",
            ),
        ];

        for (value, expected) in cases.into_iter() {
            assert_eq!(value.to_string(), expected);
        }
    }

    #[test]
    fn test_truthiness() {
        let cases = vec![
            (Value::Boolean(false), false),
            (Value::Boolean(true), true),
            (Value::Number(0.0), false),
            (Value::Number(1.0), true),
            (Value::String(String::new()), false),
            (Value::String("x".to_owned()), true),
            (Value::Undefined, false),
            (Value::List(vec![]), true),
            (Value::Object(vec![]), true),
        ];

        for (value, expected) in cases.into_iter() {
            assert_eq!(value.is_truthy(), expected, "{:?}", value);
        }
    }

    #[test]
    fn test_unwrap_return() {
        let wrapped = Value::ReturnValue(Box::new(Value::Number(3.0)));
        assert!(wrapped.is_return_value());
        assert_eq!(wrapped.unwrap_return(), Value::Number(3.0));

        let plain = Value::Number(3.0);
        assert!(!plain.is_return_value());
        assert_eq!(plain.unwrap_return(), Value::Number(3.0));
    }
}
