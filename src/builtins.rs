use crate::value::{BuiltinFunction, Result, RuntimeError, Value};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fs;

fn read_file(args: Vec<Value>) -> Result<Value> {
    match args.as_slice() {
        [Value::String(path)] => fs::read_to_string(path).map(Value::String).map_err(|err| {
            RuntimeError::FileRead {
                path: path.clone(),
                message: err.to_string(),
            }
        }),
        [_] => Err(RuntimeError::Builtin {
            message: "read_file: path must be string".to_owned(),
        }),
        _ => Err(RuntimeError::Builtin {
            message: "read_file(path) expects 1 argument".to_owned(),
        }),
    }
}

lazy_static! {
    pub static ref BUILTINS: HashMap<&'static str, BuiltinFunction> = {
        let mut builtins = HashMap::new();
        builtins.insert(
            "read_file",
            BuiltinFunction {
                name: "read_file",
                func: read_file,
            },
        );
        builtins
    };
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lookup() {
        assert!(BUILTINS.contains_key("read_file"));
        assert!(!BUILTINS.contains_key("serve"));
    }

    #[test]
    fn test_read_file_arity() {
        let err = read_file(vec![]).expect_err("expected an error");
        assert_eq!(err.to_string(), "read_file(path) expects 1 argument");
    }

    #[test]
    fn test_read_file_wants_a_string() {
        let err = read_file(vec![Value::Number(1.0)]).expect_err("expected an error");
        assert_eq!(err.to_string(), "read_file: path must be string");
    }

    #[test]
    fn test_read_file_missing_file() {
        let err = read_file(vec!["/no/such/file.upl".into()]).expect_err("expected an error");
        assert!(matches!(err, RuntimeError::FileRead { .. }));
    }
}
