pub mod ast;
pub mod builtins;
pub mod compiler;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod scope;
pub mod token;
pub mod value;
