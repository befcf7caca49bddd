use crate::evaluator::Interpreter;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::value::Value;
use std::io::{self, BufRead, Write};

const PROMPT: &[u8] = b">> ";

/// Interactive session. Bindings persist between lines because a
/// single interpreter is reused for the whole session.
pub fn start() -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut interpreter = Interpreter::new();

    loop {
        {
            let mut out = stdout.lock();
            out.write_all(PROMPT)?;
            out.flush()?;
        }

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let tokens = match Lexer::new(line).tokenize() {
            Ok(tokens) => tokens,
            Err(err) => {
                eprintln!("{}", err);
                continue;
            }
        };
        let program = match Parser::new(tokens).parse_program() {
            Ok(program) => program,
            Err(err) => {
                eprintln!("{}", err);
                continue;
            }
        };

        match interpreter.run(&program) {
            Ok(value) => {
                print!("{}", interpreter.take_output());
                if value != Value::Undefined {
                    println!("{}", value);
                }
            }
            Err(err) => {
                print!("{}", interpreter.take_output());
                eprintln!("{}", err);
            }
        }
    }
}
