//! Command-line front end: a REPL (grounded in the teacher's own
//! `src/main.rs`) plus a one-shot `pattern [input...]` argv mode grounded in
//! `original_source/tests/cli.c`'s `main` — print the parsed AST, the
//! compiled disassembly, then each input's match result.

use std::env;
use std::io::{self, Write};

use threx::ast::Ast;
use threx::compiler::compile;
use threx::parser::parse;
use threx::regex::Regex;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() >= 2 {
        one_shot(&args[1], &args[2..]);
    } else {
        repl();
    }
}

fn one_shot(pattern: &str, inputs: &[String]) {
    let ast = match parse(pattern) {
        Ok(ast) => ast,
        Err(e) => {
            eprintln!("threx: parse error: {e}");
            std::process::exit(1);
        }
    };
    print_tree(&ast, pattern);

    let program = match compile(&ast, pattern) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("threx: compile error: {e}");
            std::process::exit(1);
        }
    };
    print!("{}", program.disassemble());

    let regex = match Regex::compile(pattern) {
        Ok(regex) => regex,
        Err(e) => {
            eprintln!("threx: {e}");
            std::process::exit(1);
        }
    };

    for input in inputs {
        match regex.find_captures(input.as_str()) {
            Some(captures) => {
                print!("\"{input}\": ");
                for i in 0..captures.group_len() {
                    if i > 0 {
                        print!(", ");
                    }
                    match captures.get(i) {
                        Some(m) => {
                            print!(
                                "\"{}\"({},{})",
                                String::from_utf8_lossy(m.as_bytes()),
                                m.start(),
                                m.end()
                            );
                        }
                        None => print!("(NULL,NULL)"),
                    }
                }
                println!();
            }
            None => println!("\"{input}\": no match"),
        }
    }
}

fn print_tree(ast: &Ast, pattern: &str) {
    println!("{}", ast.debug_tree(pattern, ast.root()));
}

fn repl() {
    println!("threx REPL");
    println!("Type an empty pattern to exit.");

    loop {
        print!("regex> ");
        io::stdout().flush().unwrap();
        let mut pattern = String::new();
        if io::stdin().read_line(&mut pattern).is_err() {
            println!("Error reading pattern.");
            continue;
        }
        let pattern = pattern.trim();
        if pattern.is_empty() {
            break;
        }

        let regex = match Regex::compile(pattern) {
            Ok(regex) => regex,
            Err(e) => {
                println!("Error: {e}");
                continue;
            }
        };

        loop {
            println!("Type :disasm to print the compiled program, exit to go back.");
            print!("input> ");
            io::stdout().flush().unwrap();
            let mut input = String::new();
            if io::stdin().read_line(&mut input).is_err() {
                println!("Error reading input.");
                continue;
            }
            let input = input.trim();
            if input == "exit" {
                break;
            }
            if input == ":disasm" {
                print!("{}", regex.disassemble());
                continue;
            }
            match regex.find_captures(input) {
                Some(m) => {
                    println!("Matched: {}", String::from_utf8_lossy(m.group0().as_bytes()));
                }
                None => println!("No match."),
            }
        }
    }
}
