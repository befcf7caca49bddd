use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use uplim::compiler::Compiler;
use uplim::evaluator::Interpreter;
use uplim::lexer::Lexer;
use uplim::parser::Parser;
use uplim::repl;

const USAGE: &str = "usage: uplim <command>

commands:
  run <path>                           interpret a source file
  compile <path> [-o <out>] [--stdout] compile a source file to JavaScript
  repl                                 start an interactive session";

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let result = match args.first().map(String::as_str) {
        None | Some("repl") => repl::start().map_err(|err| err.to_string()),
        Some("run") => match args.get(1) {
            Some(path) => run(path),
            None => Err(USAGE.to_owned()),
        },
        Some("compile") => match args.get(1) {
            Some(path) => compile(path, &args[2..]),
            None => Err(USAGE.to_owned()),
        },
        Some(_) => Err(USAGE.to_owned()),
    };

    if let Err(message) = result {
        eprintln!("{}", message);
        process::exit(1);
    }
}

fn parse(path: &str) -> Result<uplim::ast::Program, String> {
    let source =
        fs::read_to_string(path).map_err(|err| format!("could not read '{}': {}", path, err))?;
    let tokens = Lexer::new(source).tokenize().map_err(|err| err.to_string())?;
    Parser::new(tokens)
        .parse_program()
        .map_err(|err| err.to_string())
}

fn run(path: &str) -> Result<(), String> {
    let program = parse(path)?;
    let mut interpreter = Interpreter::new();
    let result = interpreter.run(&program);
    // Whatever was printed before a runtime error still reaches stdout.
    print!("{}", interpreter.output());
    result.map(|_| ()).map_err(|err| err.to_string())
}

fn compile(path: &str, options: &[String]) -> Result<(), String> {
    let mut out: Option<PathBuf> = None;
    let mut to_stdout = false;
    let mut options = options.iter();
    while let Some(option) = options.next() {
        match option.as_str() {
            "-o" => match options.next() {
                Some(path) => out = Some(PathBuf::from(path)),
                None => return Err("-o requires an output path".to_owned()),
            },
            "--stdout" => to_stdout = true,
            other => return Err(format!("unknown option '{}'", other)),
        }
    }

    let program = parse(path)?;
    let javascript = Compiler::default()
        .compile(&program)
        .map_err(|err| err.to_string())?;

    if to_stdout {
        println!("{}", javascript);
        return Ok(());
    }

    let out = out.unwrap_or_else(|| Path::new(path).with_extension("js"));
    fs::write(&out, javascript + "\n")
        .map_err(|err| format!("could not write '{}': {}", out.display(), err))?;
    println!("Compiled to {}", out.display());
    Ok(())
}
