use super::ValueType;
use crate::ast::Operator;
use custom_error::custom_error;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub RuntimeError

    UndefinedVariable{name: String} = "Undefined variable '{name}'",
    NotAFunction{name: String} = "'{name}' is not a function",
    PipelineTarget{name: String} = "'{name}' is not a function and cannot be used in a pipeline.",
    PipelineCallee = "pipeline right side must be a function identifier",
    PipelineArity{name: String, got: usize} = "Function {name} in pipeline expects 1 argument but got {got}",
    WrongArgumentCount{name: String, expected: usize, got: usize} = "Function {name} expects {expected} arguments but got {got}",
    TypeMismatch{operator: Operator, left: ValueType, right: ValueType} = "cannot apply '{operator}' to {left} and {right}",
    NotIterable{found: ValueType} = "comprehension source must be a list, got {found}",
    NotAnObject{found: ValueType} = "cannot destructure {found}, expected an object",
    RangeBound{found: ValueType} = "range bounds must be numbers, got {found}",
    Builtin{message: String} = "{message}",
    FileRead{path: String, message: String} = "read_file: could not read '{path}': {message}",
}
